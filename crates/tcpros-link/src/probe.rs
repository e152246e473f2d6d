//! Topic probe: subscribe with wildcards and report what arrives.

use std::io;

use tokio::net::TcpStream;
use tokio::time::timeout;

use tcpros_core::error::{Result, TcpRosError};
use tcpros_core::msgs::RawMessage;

use crate::config::LinkConfig;
use crate::endpoint::Endpoint;
use crate::transport::{read_message, subscribe};

/// Connect to the configured publisher and log `probe.count` messages.
///
/// Returns the number of messages received.
pub async fn run(cfg: &LinkConfig) -> Result<u32> {
    let probe = cfg
        .probe
        .as_ref()
        .ok_or_else(|| TcpRosError::InvalidConfig("probe section missing".into()))?;
    let ep = Endpoint::from_config(cfg);
    let addr = probe.publisher_addr()?;

    let mut stream = TcpStream::connect(addr).await?;
    stream.set_nodelay(ep.tcp_nodelay)?;

    let header = timeout(
        ep.handshake_timeout,
        subscribe::<RawMessage, _>(&mut stream, &ep, &probe.topic),
    )
    .await
    .map_err(|_| {
        TcpRosError::Io(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("handshake with {addr} timed out"),
        ))
    })??;

    tracing::info!(
        %addr,
        topic = %probe.topic,
        publisher = header.callerid.as_deref().unwrap_or("<unknown>"),
        msg_type = header.msg_type.as_deref().unwrap_or("<unknown>"),
        md5sum = header.md5sum.as_deref().unwrap_or("<unknown>"),
        latching = header.latching,
        "connected to publisher"
    );

    let mut received = 0u32;
    while received < probe.count {
        let msg: RawMessage = read_message(&mut stream, &ep.limits).await?;
        received += 1;
        tracing::info!(seq = received, bytes = msg.data.len(), "message");
    }

    Ok(received)
}
