//! TCPROS wire formats.
//!
//! - `fields`: the length-prefixed `key=value` header block.
//! - `header`: per-role header builders and the parsed `ConnectionHeader`.
//! - `validate`: topic/type/md5sum negotiation checks.
//! - `message` / `response`: message and service response framing.
//!
//! All parsers are panic-free: malformed input is reported as `TcpRosError`
//! instead of panicking or indexing raw buffers.

pub mod fields;
pub mod header;
pub mod message;
pub mod response;
pub mod validate;
pub mod wire;

pub use fields::{deserialize_fields, serialize_fields};
pub use header::{
    error_header, parse_fields, publisher_header, service_client_header, service_server_header,
    subscriber_header, ConnectionHeader, WILDCARD,
};
pub use message::{decode_framed_message, decode_message, encode_message, RosMessage, RosService};
pub use response::{
    decode_service_payload, decode_service_response, encode_error_header, encode_service_response,
    ServiceOutcome, SERVICE_FAILURE_TEXT,
};
pub use validate::{
    validate_publisher_header, validate_service_client_header, validate_subscriber_header,
    Validation,
};
