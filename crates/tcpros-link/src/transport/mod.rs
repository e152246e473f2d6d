//! Transport layer (one byte stream per call).
//!
//! Exposes header/message framing over `AsyncRead + AsyncWrite` and the
//! per-role handshakes built on top of it. Connecting and accepting sockets
//! stays with the caller.

pub mod handshake;
pub mod stream;

pub use handshake::{accept_service_client, accept_subscriber, connect_service, subscribe};
pub use stream::{
    read_header, read_message, read_service_response, try_read_message, write_error_header,
    write_header, write_message, Limits,
};
