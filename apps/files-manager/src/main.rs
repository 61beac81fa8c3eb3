use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod config;
mod state;

use config::Config;
use state::AppState;

/// Give the drivers a moment to report connection state before the first report
const STARTUP_SETTLE: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::load()?;
    init_tracing(&config.environment);

    info!(
        document_store = %config.document_store.url(),
        cache = config.cache.url(),
        "Starting files-manager storage clients"
    );

    let state = AppState::build(&config).await?;

    tokio::time::sleep(STARTUP_SETTLE).await;
    state.report().await;

    info!("Storage clients ready, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    info!("Shutting down");
    state.shutdown().await;

    info!("files-manager shutdown complete");
    Ok(())
}
