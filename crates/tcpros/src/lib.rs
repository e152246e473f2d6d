//! Top-level facade crate for tcpros.
//!
//! Re-exports the wire core and the stream link so users can depend on a single crate.

pub mod core {
    pub use tcpros_core::*;
}

pub mod link {
    pub use tcpros_link::*;
}
