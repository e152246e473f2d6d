//! tcpros core: connection header negotiation and message framing.
//!
//! This crate defines the wire-level contracts shared by both ends of a TCPROS
//! connection: the header field block, per-role header builders, negotiation
//! validators, and message / service response framing. It carries no
//! transport or runtime dependencies; whoever owns the stream calls into it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied outside tests.
//! All fallible paths surface as `TcpRosError`/`Result` so a malformed peer
//! cannot crash the process.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]

pub mod error;
pub mod msgs;
pub mod protocol;

/// Shared result type.
pub use error::{ErrorCode, Result, TcpRosError};
