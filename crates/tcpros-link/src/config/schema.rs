use std::net::SocketAddr;

use serde::Deserialize;
use tcpros_core::error::{Result, TcpRosError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkConfig {
    pub version: u32,

    pub node: NodeSection,

    #[serde(default)]
    pub link: LinkSection,

    #[serde(default)]
    pub probe: Option<ProbeSection>,
}

impl LinkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TcpRosError::UnsupportedVersion);
        }

        self.node.validate()?;
        self.link.validate()?;
        if let Some(probe) = &self.probe {
            probe.validate()?;
        }

        Ok(())
    }
}

fn check_graph_name(field: &str, name: &str) -> Result<()> {
    if !name.starts_with('/') || name.len() < 2 {
        return Err(TcpRosError::InvalidConfig(format!(
            "{field} must be an absolute name like /talker, got {name:?}"
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSection {
    /// Sent as `callerid` in every header.
    pub callerid: String,
}

impl NodeSection {
    pub fn validate(&self) -> Result<()> {
        check_graph_name("node.callerid", &self.callerid)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkSection {
    #[serde(default = "default_tcp_nodelay")]
    pub tcp_nodelay: bool,

    #[serde(default = "default_max_header_bytes")]
    pub max_header_bytes: usize,

    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,

    #[serde(default = "default_handshake_timeout_ms")]
    pub handshake_timeout_ms: u64,
}

impl Default for LinkSection {
    fn default() -> Self {
        Self {
            tcp_nodelay: default_tcp_nodelay(),
            max_header_bytes: default_max_header_bytes(),
            max_message_bytes: default_max_message_bytes(),
            handshake_timeout_ms: default_handshake_timeout_ms(),
        }
    }
}

impl LinkSection {
    pub fn validate(&self) -> Result<()> {
        if !(64..=16 * 1024 * 1024).contains(&self.max_header_bytes) {
            return Err(TcpRosError::InvalidConfig(
                "link.max_header_bytes must be between 64 and 16777216".into(),
            ));
        }
        if self.max_message_bytes == 0 {
            return Err(TcpRosError::InvalidConfig(
                "link.max_message_bytes must be greater than 0".into(),
            ));
        }
        if !(100..=60000).contains(&self.handshake_timeout_ms) {
            return Err(TcpRosError::InvalidConfig(
                "link.handshake_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        Ok(())
    }
}

fn default_tcp_nodelay() -> bool {
    true
}
fn default_max_header_bytes() -> usize {
    64 * 1024
}
fn default_max_message_bytes() -> usize {
    64 * 1024 * 1024
}
fn default_handshake_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSection {
    /// Publisher data address (`host:port`).
    pub publisher: String,
    pub topic: String,
    #[serde(default = "default_probe_count")]
    pub count: u32,
}

impl ProbeSection {
    pub fn validate(&self) -> Result<()> {
        self.publisher.parse::<SocketAddr>().map_err(|e| {
            TcpRosError::InvalidConfig(format!("probe.publisher must be a socket address: {e}"))
        })?;
        check_graph_name("probe.topic", &self.topic)
    }

    pub fn publisher_addr(&self) -> Result<SocketAddr> {
        self.publisher
            .parse()
            .map_err(|e| TcpRosError::InvalidConfig(format!("probe.publisher: {e}")))
    }
}

fn default_probe_count() -> u32 {
    10
}
