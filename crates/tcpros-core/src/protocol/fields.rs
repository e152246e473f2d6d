//! Header field block codec.
//!
//! ```text
//! ┌───────────┬──────────┬──────────────┬──────────┬──────────────┬─────
//! │ total     │ len 0    │ field 0      │ len 1    │ field 1      │ ...
//! │ u32 LE    │ u32 LE   │ "key=value"  │ u32 LE   │ "key=value"  │
//! └───────────┴──────────┴──────────────┴──────────┴──────────────┴─────
//! ```
//!
//! `total` is the sum of the field lengths only. The per-field prefixes are
//! not counted, and the decoder uses the same accounting, so the two sides
//! agree with each other. Peers that count the prefixes in `total` are not
//! wire-compatible with this encoding.

use bytes::{Buf, Bytes, BytesMut};

use super::wire::{check_len, get_len, get_string, put_len, put_string, LEN_PREFIX};
use crate::error::{Result, TcpRosError};

/// Sum of the UTF-8 byte lengths of `fields` (the declared block total).
pub fn fields_len<S: AsRef<str>>(fields: &[S]) -> usize {
    fields.iter().map(|f| f.as_ref().len()).sum()
}

/// Encode an ordered field list into a header block.
///
/// Fails with `TooLarge` if the field bytes do not fit the `u32` total.
///
/// # Example
///
/// ```
/// use tcpros_core::protocol::fields::serialize_fields;
///
/// let bytes = serialize_fields(&["a=1"]).unwrap();
/// assert_eq!(&bytes[..], &[3, 0, 0, 0, 3, 0, 0, 0, b'a', b'=', b'1']);
/// ```
pub fn serialize_fields<S: AsRef<str>>(fields: &[S]) -> Result<Bytes> {
    let total = fields_len(fields);
    check_len("header", total)?;
    let mut buf = BytesMut::with_capacity(LEN_PREFIX + total + LEN_PREFIX * fields.len());
    put_len(&mut buf, total);
    for f in fields {
        put_string(&mut buf, f.as_ref());
    }
    Ok(buf.freeze())
}

/// Decode a header block into its ordered field list.
///
/// Reads fields until their accumulated length reaches the declared total.
/// Bytes after the last field are left in `buf`.
pub fn deserialize_fields<B: Buf>(buf: &mut B) -> Result<Vec<String>> {
    let total = get_len(buf, TcpRosError::MalformedHeader)?;
    let mut fields = Vec::new();
    let mut seen = 0usize;

    while seen < total {
        if !buf.has_remaining() {
            return Err(TcpRosError::MalformedHeader(format!(
                "declared {total} field bytes, input ended after {seen}"
            )));
        }
        let field = get_string(buf, TcpRosError::MalformedHeader)?;
        seen += field.len();
        fields.push(field);
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_order() {
        let fields = ["callerid=/talker", "md5sum=*", "topic=/chatter", "ключ=значение"];
        let bytes = serialize_fields(&fields).unwrap();
        let decoded = deserialize_fields(&mut bytes.clone()).unwrap();
        assert_eq!(decoded, fields);
    }

    #[test]
    fn total_excludes_field_prefixes() {
        let bytes = serialize_fields(&["ab", "cde"]).unwrap();
        assert_eq!(&bytes[..4], &5u32.to_le_bytes());
        assert_eq!(bytes.len(), 4 + 4 + 2 + 4 + 3);
    }

    #[test]
    fn total_counts_utf8_bytes_not_chars() {
        let bytes = serialize_fields(&["é"]).unwrap();
        assert_eq!(&bytes[..4], &2u32.to_le_bytes());
    }

    #[test]
    fn empty_list_is_a_zero_total() {
        let bytes = serialize_fields::<&str>(&[]).unwrap();
        assert_eq!(&bytes[..], &[0, 0, 0, 0]);
        assert!(deserialize_fields(&mut bytes.clone()).unwrap().is_empty());
    }

    #[test]
    fn trailing_bytes_are_left_unread() {
        let mut raw = serialize_fields(&["k=v"]).unwrap().to_vec();
        raw.extend_from_slice(b"tail");
        let mut buf = Bytes::from(raw);
        let fields = deserialize_fields(&mut buf).unwrap();
        assert_eq!(fields, ["k=v"]);
        assert_eq!(&buf[..], b"tail");
    }

    #[test]
    fn declared_total_past_end_fails() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&100u32.to_le_bytes());
        raw.extend_from_slice(&3u32.to_le_bytes());
        raw.extend_from_slice(b"k=v");
        let err = deserialize_fields(&mut Bytes::from(raw)).unwrap_err();
        assert!(matches!(err, TcpRosError::MalformedHeader(_)));
    }

    #[test]
    fn truncated_field_fails() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&5u32.to_le_bytes());
        raw.extend_from_slice(&5u32.to_le_bytes());
        raw.extend_from_slice(b"k=");
        let err = deserialize_fields(&mut Bytes::from(raw)).unwrap_err();
        assert_eq!(err.code().as_str(), "MALFORMED_HEADER");
    }

    #[test]
    fn missing_total_fails() {
        let err = deserialize_fields(&mut Bytes::from_static(&[1, 0])).unwrap_err();
        assert!(err.is_malformed());
    }
}
