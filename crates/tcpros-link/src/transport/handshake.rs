//! Connection handshakes for each role.
//!
//! The active side writes its header first and validates the reply; the
//! passive side validates the incoming header and either answers with its own
//! header or sends an error header and gives up. Either way a refused
//! negotiation surfaces as `TcpRosError::Rejected`.

use tokio::io::{AsyncRead, AsyncWrite};

use tcpros_core::error::{Result, TcpRosError};
use tcpros_core::protocol::{
    publisher_header, service_client_header, service_server_header, subscriber_header,
    validate_publisher_header, validate_service_client_header, validate_subscriber_header,
    ConnectionHeader, RosMessage, RosService, Validation, WILDCARD,
};

use super::stream::{read_header, write_error_header, write_header};
use crate::endpoint::Endpoint;

fn peer(header: &ConnectionHeader) -> &str {
    header.callerid.as_deref().unwrap_or("<unknown>")
}

/// Fail if the peer answered with an error header.
fn refuse_on_error(header: &ConnectionHeader) -> Result<()> {
    match &header.error {
        Some(reason) => Err(TcpRosError::Rejected(format!("peer refused: {reason}"))),
        None => Ok(()),
    }
}

/// Send the rejection back to the peer and build the local error.
async fn reject<S>(stream: &mut S, header: &ConnectionHeader, reason: String) -> TcpRosError
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    tracing::warn!(peer = peer(header), %reason, "rejecting connection header");
    if let Err(e) = write_error_header(stream, &reason).await {
        return e;
    }
    TcpRosError::Rejected(reason)
}

/// Check a publisher reply against the local message type.
///
/// A wildcard local type or md5sum takes whatever the publisher advertises;
/// the reply must still carry both fields.
fn check_publisher_reply<M: RosMessage>(reply: &ConnectionHeader) -> Validation {
    let advertised = |local: &'static str, got: &Option<String>| match got.as_deref() {
        Some(got) if local == WILDCARD => got.to_owned(),
        _ => local.to_owned(),
    };
    let msg_type = advertised(M::TYPE, &reply.msg_type);
    let md5sum = advertised(M::MD5SUM, &reply.md5sum);
    validate_publisher_header(reply, &msg_type, &md5sum)
}

/// Subscribe to `topic` on a connected publisher stream.
///
/// Returns the publisher's header (check `latching` there).
pub async fn subscribe<M, S>(
    stream: &mut S,
    ep: &Endpoint,
    topic: &str,
) -> Result<ConnectionHeader>
where
    M: RosMessage,
    S: AsyncRead + AsyncWrite + Unpin,
{
    let fields = subscriber_header(
        &ep.callerid,
        M::MD5SUM,
        topic,
        M::TYPE,
        M::DEFINITION,
        ep.tcp_nodelay,
    );
    write_header(stream, &fields).await?;

    let reply = read_header(stream, &ep.limits).await?;
    refuse_on_error(&reply)?;
    check_publisher_reply::<M>(&reply).into_result()?;

    tracing::debug!(topic, publisher = peer(&reply), latching = reply.latching, "subscribed");
    Ok(reply)
}

/// Accept a subscriber for `topic` on an incoming stream.
///
/// Returns the subscriber's header (check `tcp_nodelay` there).
pub async fn accept_subscriber<M, S>(
    stream: &mut S,
    ep: &Endpoint,
    topic: &str,
    latching: bool,
) -> Result<ConnectionHeader>
where
    M: RosMessage,
    S: AsyncRead + AsyncWrite + Unpin,
{
    let header = read_header(stream, &ep.limits).await?;
    if let Validation::Rejected(reason) =
        validate_subscriber_header(&header, topic, M::TYPE, M::MD5SUM)
    {
        return Err(reject(stream, &header, reason).await);
    }

    let fields = publisher_header(&ep.callerid, M::MD5SUM, M::TYPE, M::DEFINITION, latching);
    write_header(stream, &fields).await?;

    tracing::info!(topic, subscriber = peer(&header), "subscriber accepted");
    Ok(header)
}

/// Open a service connection on a connected server stream.
///
/// Returns the server's header.
pub async fn connect_service<Srv, S>(
    stream: &mut S,
    ep: &Endpoint,
    service: &str,
    persistent: bool,
) -> Result<ConnectionHeader>
where
    Srv: RosService,
    S: AsyncRead + AsyncWrite + Unpin,
{
    let fields = service_client_header(&ep.callerid, service, Srv::MD5SUM, persistent);
    write_header(stream, &fields).await?;

    let reply = read_header(stream, &ep.limits).await?;
    refuse_on_error(&reply)?;
    // The server reply carries `type` and `md5sum`, same checks as a publisher reply.
    validate_publisher_header(&reply, Srv::TYPE, Srv::MD5SUM).into_result()?;

    tracing::debug!(service, server = peer(&reply), persistent, "service connected");
    Ok(reply)
}

/// Accept a service client for `service` on an incoming stream.
///
/// Returns the client's header (check `persistent` there).
pub async fn accept_service_client<Srv, S>(
    stream: &mut S,
    ep: &Endpoint,
    service: &str,
) -> Result<ConnectionHeader>
where
    Srv: RosService,
    S: AsyncRead + AsyncWrite + Unpin,
{
    let header = read_header(stream, &ep.limits).await?;
    if let Validation::Rejected(reason) =
        validate_service_client_header(&header, service, Srv::MD5SUM)
    {
        return Err(reject(stream, &header, reason).await);
    }

    let fields = service_server_header(&ep.callerid, Srv::MD5SUM, Srv::TYPE);
    write_header(stream, &fields).await?;

    tracing::info!(
        service,
        client = peer(&header),
        persistent = header.persistent,
        "service client accepted"
    );
    Ok(header)
}
