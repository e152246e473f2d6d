//! tcpros probe
//!
//! - Loads `tcpros.yaml` (or the path given as the first argument)
//! - Subscribes to `probe.topic` on `probe.publisher` with wildcard type/md5sum
//! - Logs the publisher header and the size of each received message

use tracing_subscriber::{fmt, EnvFilter};

use tcpros_link::{config, probe};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "tcpros.yaml".into());
    let cfg = config::load_from_file(&path).expect("config load failed");

    match probe::run(&cfg).await {
        Ok(received) => tracing::info!(received, "probe finished"),
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "probe failed");
            std::process::exit(1);
        }
    }
}
