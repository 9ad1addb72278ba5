//! Frame server entry-point: loads settings, wires adapters, serves frames.

mod server;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use nft_frames::inbound::http::health::HealthState;
use nft_frames::settings::FrameSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let frame = FrameSettings::load_from_env()
        .and_then(|settings| settings.validate())
        .map_err(|e| std::io::Error::other(format!("invalid configuration: {e}")))?;
    info!(
        bind_addr = %frame.bind_addr,
        base_path = %frame.base_path,
        collection = %frame.collection_name,
        "starting frame server"
    );

    let config = ServerConfig::new(frame);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::make_metrics()?));

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
