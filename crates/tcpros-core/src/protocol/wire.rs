//! Length-prefixed primitives shared by header, message, and response framing.
//!
//! Parsing rules:
//! - Never index (`buf[0]`) — always use `Buf` and `remaining()` checks.
//! - Never `unwrap()` / `expect()` / `panic!()` in production paths.
//! - Every length prefix is a `u32` little-endian.
//!
//! Decoders take the error constructor to use on short or invalid input, so a
//! truncated header surfaces as `MalformedHeader` and a truncated message body
//! as `MalformedMessage`.

use bytes::{Buf, BufMut, Bytes};

use crate::error::{Result, TcpRosError};

/// Size of every length prefix on the wire.
pub const LEN_PREFIX: usize = 4;

/// Largest length a prefix can carry.
pub const MAX_LEN: usize = u32::MAX as usize;

/// Error constructor used when input does not follow the wire format.
pub type Malformed = fn(String) -> TcpRosError;

/// Reject a block whose length cannot be written as a `u32` prefix.
///
/// Encoders call this once on the outermost length; every nested length is
/// no larger, so the `put_*` writers below stay infallible.
pub fn check_len(what: &'static str, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| TcpRosError::TooLarge {
        what,
        len,
        limit: MAX_LEN,
    })
}

/// Write a `u32` little-endian length prefix.
///
/// `len` must already be bounded by [`check_len`]; larger values saturate.
#[inline]
pub fn put_len<B: BufMut>(buf: &mut B, len: usize) {
    buf.put_u32_le(u32::try_from(len).unwrap_or(u32::MAX));
}

/// Write a length-prefixed UTF-8 string.
#[inline]
pub fn put_string<B: BufMut>(buf: &mut B, s: &str) {
    put_len(buf, s.len());
    buf.put_slice(s.as_bytes());
}

/// Read a `u32` little-endian length prefix.
pub fn get_len<B: Buf>(buf: &mut B, malformed: Malformed) -> Result<usize> {
    if buf.remaining() < LEN_PREFIX {
        return Err(malformed(format!(
            "need {LEN_PREFIX} bytes for length prefix, have {}",
            buf.remaining()
        )));
    }
    Ok(buf.get_u32_le() as usize)
}

/// Read a length-prefixed byte block (zero-copy when `B` is `Bytes`).
pub fn get_bytes<B: Buf>(buf: &mut B, malformed: Malformed) -> Result<Bytes> {
    let len = get_len(buf, malformed)?;
    if buf.remaining() < len {
        return Err(malformed(format!(
            "length prefix {len} exceeds remaining {}",
            buf.remaining()
        )));
    }
    Ok(buf.copy_to_bytes(len))
}

/// Read a length-prefixed UTF-8 string.
pub fn get_string<B: Buf>(buf: &mut B, malformed: Malformed) -> Result<String> {
    let raw = get_bytes(buf, malformed)?;
    String::from_utf8(raw.to_vec()).map_err(|e| malformed(format!("invalid utf-8: {e}")))
}

/// Read a single byte.
pub fn get_u8<B: Buf>(buf: &mut B, malformed: Malformed) -> Result<u8> {
    if !buf.has_remaining() {
        return Err(malformed("need 1 byte, have 0".into()));
    }
    Ok(buf.get_u8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_prefix_is_little_endian() {
        let mut buf = Vec::new();
        put_string(&mut buf, "abc");
        assert_eq!(buf, [3, 0, 0, 0, b'a', b'b', b'c']);
    }

    #[test]
    fn lengths_past_u32_are_too_large() {
        assert_eq!(check_len("message", 10).unwrap(), 10);
        assert_eq!(check_len("message", MAX_LEN).unwrap(), u32::MAX);

        let err = check_len("message", MAX_LEN + 1).unwrap_err();
        assert!(matches!(
            err,
            TcpRosError::TooLarge { what: "message", limit: MAX_LEN, .. }
        ));
    }

    #[test]
    fn short_prefix_uses_given_error() {
        let mut buf = Bytes::from_static(&[1, 0]);
        let err = get_len(&mut buf, TcpRosError::MalformedMessage).unwrap_err();
        assert!(matches!(err, TcpRosError::MalformedMessage(_)));
    }

    #[test]
    fn length_past_end_is_rejected() {
        let mut buf = Bytes::from_static(&[9, 0, 0, 0, b'x']);
        let err = get_bytes(&mut buf, TcpRosError::MalformedHeader).unwrap_err();
        assert!(err.to_string().contains("exceeds remaining"));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut buf = Bytes::from_static(&[2, 0, 0, 0, 0xff, 0xfe]);
        let err = get_string(&mut buf, TcpRosError::MalformedHeader).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn get_bytes_is_zero_copy() {
        let src = Bytes::from_static(&[2, 0, 0, 0, 7, 8]);
        let mut buf = src.clone();
        let out = get_bytes(&mut buf, TcpRosError::MalformedMessage).unwrap();
        assert_eq!(out.as_ptr(), src[4..].as_ptr());
    }
}
