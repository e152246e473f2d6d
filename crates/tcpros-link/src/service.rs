//! Service calls over an already negotiated connection.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use tcpros_core::error::Result;
use tcpros_core::protocol::{encode_service_response, RosService, ServiceOutcome};

use crate::endpoint::Endpoint;
use crate::transport::stream::{read_service_response, try_read_message, write_message};

/// Server-side request handler for one service type.
///
/// Any error returned here is logged and reported to the client with the
/// fixed failure text; its details never go over the wire.
#[async_trait]
pub trait ServiceHandler<Srv: RosService>: Send + Sync {
    async fn handle(&self, req: Srv::Request) -> Result<Srv::Response>;
}

/// Send one request and wait for its response.
pub async fn call<Srv, S>(
    stream: &mut S,
    ep: &Endpoint,
    req: &Srv::Request,
) -> Result<Srv::Response>
where
    Srv: RosService,
    S: AsyncRead + AsyncWrite + Unpin,
{
    write_message(stream, req).await?;
    read_service_response(stream, &ep.limits).await
}

/// Answer requests until the client closes the stream.
///
/// Non-persistent connections stop after the first request. Returns the
/// number of requests answered.
pub async fn serve<Srv, H, S>(
    stream: &mut S,
    ep: &Endpoint,
    handler: &H,
    persistent: bool,
) -> Result<usize>
where
    Srv: RosService,
    H: ServiceHandler<Srv> + ?Sized,
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut served = 0usize;

    while let Some(req) = try_read_message::<_, Srv::Request>(stream, &ep.limits).await? {
        let outcome = match handler.handle(req).await {
            Ok(resp) => ServiceOutcome::Success(resp),
            Err(e) => {
                tracing::warn!(service_type = Srv::TYPE, error = %e, "service handler failed");
                ServiceOutcome::Failure
            }
        };
        stream.write_all(&encode_service_response(&outcome)?).await?;
        stream.flush().await?;
        served += 1;

        if !persistent {
            break;
        }
    }

    tracing::debug!(service_type = Srv::TYPE, served, "service connection done");
    Ok(served)
}
