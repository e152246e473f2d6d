//! Service response and error header framing.
//!
//! ```text
//! success: ┌──────┬──────────┬──────────────────┐
//!          │ 0x01 │ len u32  │ response payload │
//!          └──────┴──────────┴──────────────────┘
//! failure: ┌──────┬──────────┬────────────────────────────────┐
//!          │ 0x00 │ len u32  │ "Unable to handle service call" │
//!          └──────┴──────────┴────────────────────────────────┘
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::fields::serialize_fields;
use super::header::error_header;
use super::message::{decode_message, RosMessage};
use super::wire::{check_len, get_bytes, get_u8, put_len, put_string, LEN_PREFIX};
use crate::error::{Result, TcpRosError};

/// Text sent with every failed service call.
pub const SERVICE_FAILURE_TEXT: &str = "Unable to handle service call";

const OK_BYTE: u8 = 1;
const FAIL_BYTE: u8 = 0;

/// Result of handling one service request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceOutcome<T> {
    Success(T),
    /// Always reported with [`SERVICE_FAILURE_TEXT`].
    Failure,
}

impl<T, E> From<std::result::Result<T, E>> for ServiceOutcome<T> {
    fn from(res: std::result::Result<T, E>) -> Self {
        match res {
            Ok(v) => ServiceOutcome::Success(v),
            Err(_) => ServiceOutcome::Failure,
        }
    }
}

/// Encode a service response block.
pub fn encode_service_response<T: RosMessage>(outcome: &ServiceOutcome<T>) -> Result<Bytes> {
    let block = match outcome {
        ServiceOutcome::Success(resp) => {
            let len = resp.encoded_len();
            check_len("service response", len)?;
            let mut buf = BytesMut::with_capacity(1 + LEN_PREFIX + len);
            buf.put_u8(OK_BYTE);
            put_len(&mut buf, len);
            resp.encode(&mut buf);
            buf.freeze()
        }
        ServiceOutcome::Failure => {
            let mut buf = BytesMut::with_capacity(1 + LEN_PREFIX + SERVICE_FAILURE_TEXT.len());
            buf.put_u8(FAIL_BYTE);
            put_string(&mut buf, SERVICE_FAILURE_TEXT);
            buf.freeze()
        }
    };
    Ok(block)
}

/// Decode a service response block.
///
/// A failure block surfaces as `ServiceFailed` carrying the peer's text.
pub fn decode_service_response<T: RosMessage, B: Buf>(buf: &mut B) -> Result<T> {
    let ok = get_u8(buf, TcpRosError::MalformedMessage)?;
    let payload = get_bytes(buf, TcpRosError::MalformedMessage)?;
    decode_service_payload(ok, payload)
}

/// Interpret an already split response block: the ok byte and the payload
/// that followed its length prefix.
pub fn decode_service_payload<T: RosMessage>(ok: u8, payload: Bytes) -> Result<T> {
    match ok {
        OK_BYTE => decode_message(payload),
        FAIL_BYTE => Err(TcpRosError::ServiceFailed(
            String::from_utf8_lossy(&payload).into_owned(),
        )),
        other => Err(TcpRosError::MalformedMessage(format!(
            "invalid service ok byte {other}"
        ))),
    }
}

/// Encode the header sent back to a peer whose header was rejected.
pub fn encode_error_header(message: &str) -> Result<Bytes> {
    serialize_fields(&error_header(message))
}
