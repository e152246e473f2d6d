//! Async header and message framing over a single byte stream.
//!
//! Uses the same wire rules as `tcpros_core::protocol`: the header total
//! counts field bytes only, and every length prefix is `u32` little-endian.
//! A stream that ends mid-block is reported as malformed data, not as an
//! I/O error, so callers handle it like any other corrupt peer.

use std::io::ErrorKind;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use tcpros_core::error::{Result, TcpRosError};
use tcpros_core::protocol::wire::{Malformed, LEN_PREFIX};
use tcpros_core::protocol::{
    decode_message, decode_service_payload, encode_error_header, encode_message,
    serialize_fields, ConnectionHeader, RosMessage,
};

/// Upper bounds applied while reading from a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Bytes consumed by one header block, length prefixes included.
    pub max_header_bytes: usize,
    /// Bytes of one message or service response payload.
    pub max_message_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_header_bytes: 64 * 1024,
            max_message_bytes: 64 * 1024 * 1024,
        }
    }
}

fn check_limit(what: &'static str, len: usize, limit: usize) -> Result<()> {
    if len > limit {
        return Err(TcpRosError::TooLarge { what, len, limit });
    }
    Ok(())
}

async fn read_exact_or<R: AsyncRead + Unpin>(
    r: &mut R,
    buf: &mut [u8],
    malformed: Malformed,
) -> Result<()> {
    match r.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(malformed(format!(
            "stream ended inside a {}-byte read",
            buf.len()
        ))),
        Err(e) => Err(e.into()),
    }
}

async fn read_len<R: AsyncRead + Unpin>(r: &mut R, malformed: Malformed) -> Result<usize> {
    let mut raw = [0u8; LEN_PREFIX];
    read_exact_or(r, &mut raw, malformed).await?;
    Ok(u32::from_le_bytes(raw) as usize)
}

/// Like `read_len`, but a clean end of stream before the first byte is `None`.
async fn try_read_len<R: AsyncRead + Unpin>(
    r: &mut R,
    malformed: Malformed,
) -> Result<Option<usize>> {
    let mut raw = [0u8; LEN_PREFIX];
    let n = r.read(&mut raw).await?;
    if n == 0 {
        return Ok(None);
    }
    if let Some(rest) = raw.get_mut(n..) {
        read_exact_or(r, rest, malformed).await?;
    }
    Ok(Some(u32::from_le_bytes(raw) as usize))
}

async fn read_payload<R: AsyncRead + Unpin>(
    r: &mut R,
    len: usize,
    limit: usize,
    malformed: Malformed,
) -> Result<Bytes> {
    check_limit("message", len, limit)?;
    let mut buf = vec![0u8; len];
    read_exact_or(r, &mut buf, malformed).await?;
    Ok(Bytes::from(buf))
}

/// Write an ordered field list as one header block.
pub async fn write_header<W, S>(w: &mut W, fields: &[S]) -> Result<()>
where
    W: AsyncWrite + Unpin,
    S: AsRef<str>,
{
    w.write_all(&serialize_fields(fields)?).await?;
    w.flush().await?;
    Ok(())
}

/// Send a rejection reason as an error header.
pub async fn write_error_header<W: AsyncWrite + Unpin>(w: &mut W, reason: &str) -> Result<()> {
    w.write_all(&encode_error_header(reason)?).await?;
    w.flush().await?;
    Ok(())
}

/// Read one header block and parse it.
pub async fn read_header<R: AsyncRead + Unpin>(
    r: &mut R,
    limits: &Limits,
) -> Result<ConnectionHeader> {
    let malformed: Malformed = TcpRosError::MalformedHeader;
    let total = read_len(r, malformed).await?;
    check_limit("header", total, limits.max_header_bytes)?;

    let mut fields = Vec::new();
    let mut seen = 0usize;
    let mut consumed = LEN_PREFIX;

    while seen < total {
        let len = read_len(r, malformed).await?;
        consumed += LEN_PREFIX + len;
        check_limit("header", consumed, limits.max_header_bytes)?;

        let mut raw = vec![0u8; len];
        read_exact_or(r, &mut raw, malformed).await?;
        let field = String::from_utf8(raw)
            .map_err(|e| TcpRosError::MalformedHeader(format!("invalid utf-8: {e}")))?;
        seen += field.len();
        fields.push(field);
    }

    Ok(ConnectionHeader::parse(fields))
}

/// Write one length-prefixed message.
pub async fn write_message<W, M>(w: &mut W, msg: &M) -> Result<()>
where
    W: AsyncWrite + Unpin,
    M: RosMessage,
{
    w.write_all(&encode_message(msg, true)?).await?;
    w.flush().await?;
    Ok(())
}

/// Read one length-prefixed message.
pub async fn read_message<R, M>(r: &mut R, limits: &Limits) -> Result<M>
where
    R: AsyncRead + Unpin,
    M: RosMessage,
{
    let malformed: Malformed = TcpRosError::MalformedMessage;
    let len = read_len(r, malformed).await?;
    decode_message(read_payload(r, len, limits.max_message_bytes, malformed).await?)
}

/// Read one length-prefixed message, or `None` if the peer closed cleanly
/// between messages.
pub async fn try_read_message<R, M>(r: &mut R, limits: &Limits) -> Result<Option<M>>
where
    R: AsyncRead + Unpin,
    M: RosMessage,
{
    let malformed: Malformed = TcpRosError::MalformedMessage;
    let Some(len) = try_read_len(r, malformed).await? else {
        return Ok(None);
    };
    let payload = read_payload(r, len, limits.max_message_bytes, malformed).await?;
    decode_message(payload).map(Some)
}

/// Read one service response block and decode it.
///
/// A failure block surfaces as `ServiceFailed`.
pub async fn read_service_response<R, T>(r: &mut R, limits: &Limits) -> Result<T>
where
    R: AsyncRead + Unpin,
    T: RosMessage,
{
    let malformed: Malformed = TcpRosError::MalformedMessage;
    let mut flag = [0u8; 1];
    read_exact_or(r, &mut flag, malformed).await?;
    let len = read_len(r, malformed).await?;
    let payload = read_payload(r, len, limits.max_message_bytes, malformed).await?;
    let [ok] = flag;
    decode_service_payload(ok, payload)
}
