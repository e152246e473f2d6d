//! Message framing and the message-type boundary.
//!
//! Each message type implements [`RosMessage`]: it reports its encoded size,
//! writes itself into a buffer, and reads itself back from a reader positioned
//! at the start of its payload. This crate only adds the length prefix.
//!
//! ```text
//! ┌──────────────┬──────────────────────────┐
//! │ len (opt.)   │ message bytes            │
//! │ u32 LE       │ type-specific encoding   │
//! └──────────────┴──────────────────────────┘
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::wire::{check_len, get_bytes, put_len, LEN_PREFIX};
use crate::error::{Result, TcpRosError};

/// A message type that can travel over a negotiated connection.
pub trait RosMessage: Sized {
    /// Fully qualified type name, e.g. `std_msgs/String`.
    const TYPE: &'static str;
    /// Content hash of the type's field layout.
    const MD5SUM: &'static str;
    /// Full message definition text.
    const DEFINITION: &'static str;

    /// Exact number of bytes `encode` will write. Framers refuse anything
    /// past `u32::MAX` with `TooLarge`.
    fn encoded_len(&self) -> usize;

    /// Write the message body.
    fn encode<B: BufMut>(&self, buf: &mut B);

    /// Read the message body. `buf` starts at the first payload byte.
    fn decode<B: Buf>(buf: &mut B) -> Result<Self>;
}

/// A service type binding its request and response messages.
pub trait RosService {
    /// Fully qualified service type name, e.g. `std_srvs/Trigger`.
    const TYPE: &'static str;
    /// Combined content hash of request and response.
    const MD5SUM: &'static str;

    type Request: RosMessage + Send + 'static;
    type Response: RosMessage + Send + 'static;
}

/// Encode a message, optionally prefixed with its length.
///
/// # Example
///
/// ```
/// use tcpros_core::msgs::std_msgs::StringMsg;
/// use tcpros_core::protocol::message::encode_message;
///
/// let bytes = encode_message(&StringMsg::new("hi"), true).unwrap();
/// assert_eq!(&bytes[..], &[6, 0, 0, 0, 2, 0, 0, 0, b'h', b'i']);
/// ```
pub fn encode_message<M: RosMessage>(msg: &M, prepend_length: bool) -> Result<Bytes> {
    let len = msg.encoded_len();
    check_len("message", len)?;
    let mut buf = BytesMut::with_capacity(len + LEN_PREFIX);
    if prepend_length {
        put_len(&mut buf, len);
    }
    let start = buf.len();
    msg.encode(&mut buf);
    debug_assert_eq!(buf.len() - start, len, "{} encoded_len disagrees with encode", M::TYPE);
    Ok(buf.freeze())
}

/// Decode a message from its payload bytes (no length prefix).
pub fn decode_message<M: RosMessage>(payload: Bytes) -> Result<M> {
    let mut buf = payload;
    let msg = M::decode(&mut buf)?;
    if buf.has_remaining() {
        tracing::debug!(
            msg_type = M::TYPE,
            trailing = buf.remaining(),
            "ignoring trailing message bytes"
        );
    }
    Ok(msg)
}

/// Decode a length-prefixed message, leaving any following bytes in `buf`.
pub fn decode_framed_message<M: RosMessage, B: Buf>(buf: &mut B) -> Result<M> {
    let payload = get_bytes(buf, TcpRosError::MalformedMessage)?;
    decode_message(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgs::std_msgs::{Empty, StringMsg};
    use crate::msgs::RawMessage;

    #[test]
    fn prefix_is_optional() {
        let msg = StringMsg::new("abc");
        let framed = encode_message(&msg, true).unwrap();
        let bare = encode_message(&msg, false).unwrap();
        assert_eq!(framed.len(), bare.len() + LEN_PREFIX);
        assert_eq!(&framed[..4], &7u32.to_le_bytes());
        assert_eq!(&framed[4..], &bare[..]);
    }

    #[test]
    fn decode_hands_payload_to_type() {
        let bytes = encode_message(&StringMsg::new("hello"), false).unwrap();
        let msg: StringMsg = decode_message(bytes).unwrap();
        assert_eq!(msg.data, "hello");
    }

    #[test]
    fn framed_decode_stops_at_boundary() {
        let mut raw = encode_message(&StringMsg::new("one"), true).unwrap().to_vec();
        raw.extend_from_slice(&encode_message(&StringMsg::new("two"), true).unwrap());
        let mut buf = Bytes::from(raw);

        let first: StringMsg = decode_framed_message(&mut buf).unwrap();
        let second: StringMsg = decode_framed_message(&mut buf).unwrap();
        assert_eq!(first.data, "one");
        assert_eq!(second.data, "two");
        assert!(!buf.has_remaining());
    }

    #[test]
    fn truncated_frame_is_malformed_message() {
        let framed = encode_message(&StringMsg::new("hello"), true).unwrap();
        let mut short = framed.slice(..framed.len() - 1);
        let err = decode_framed_message::<StringMsg, _>(&mut short).unwrap_err();
        assert_eq!(err.code().as_str(), "MALFORMED_MESSAGE");
    }

    #[test]
    fn empty_message_is_just_a_zero_prefix() {
        assert_eq!(&encode_message(&Empty, true).unwrap()[..], &[0, 0, 0, 0]);
    }

    struct Oversized;

    impl RosMessage for Oversized {
        const TYPE: &'static str = "test/Oversized";
        const MD5SUM: &'static str = "*";
        const DEFINITION: &'static str = "";

        fn encoded_len(&self) -> usize {
            u32::MAX as usize + 1
        }

        fn encode<B: BufMut>(&self, _buf: &mut B) {}

        fn decode<B: Buf>(_buf: &mut B) -> Result<Self> {
            Ok(Oversized)
        }
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn oversized_message_is_refused_before_encoding() {
        let err = encode_message(&Oversized, true).unwrap_err();
        assert!(matches!(err, TcpRosError::TooLarge { what: "message", .. }));
    }

    #[test]
    fn raw_message_takes_whole_payload() {
        let msg: RawMessage = decode_message(Bytes::from_static(b"\x01\x02\x03")).unwrap();
        assert_eq!(msg.encoded_len(), 3);
    }
}
