//! Local endpoint identity and per-connection limits.
//!
//! Built once from config and passed by reference to every handshake and
//! stream helper. Holds no connection state.

use std::time::Duration;

use crate::config::LinkConfig;
use crate::transport::stream::Limits;

#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Sent as `callerid` in every header this side writes.
    pub callerid: String,
    /// Ask publishers to disable Nagle (`tcp_nodelay=1`).
    pub tcp_nodelay: bool,
    pub limits: Limits,
    pub handshake_timeout: Duration,
}

impl Endpoint {
    /// Endpoint with default limits.
    pub fn new(callerid: impl Into<String>) -> Self {
        Self {
            callerid: callerid.into(),
            tcp_nodelay: false,
            limits: Limits::default(),
            handshake_timeout: Duration::from_secs(5),
        }
    }

    pub fn from_config(cfg: &LinkConfig) -> Self {
        Self {
            callerid: cfg.node.callerid.clone(),
            tcp_nodelay: cfg.link.tcp_nodelay,
            limits: Limits {
                max_header_bytes: cfg.link.max_header_bytes,
                max_message_bytes: cfg.link.max_message_bytes,
            },
            handshake_timeout: Duration::from_millis(cfg.link.handshake_timeout_ms),
        }
    }
}
