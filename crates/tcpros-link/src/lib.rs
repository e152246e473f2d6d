//! tcpros link library entry.
//!
//! Async helpers that drive `tcpros-core` over a single byte stream: header
//! exchange per role, message streaming, and service calls, plus the strict
//! YAML config and the probe used by the `tcpros-probe` binary. The caller
//! owns sockets, accept loops, and reconnects.

pub mod config;
pub mod endpoint;
pub mod probe;
pub mod service;
pub mod transport;

pub use endpoint::Endpoint;
