use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use flight_network::cache::CacheConfig;
use flight_network::config::{ConfigError, ServerConfig};
use flight_network::repository::RepositoryError;
use flight_network::web::{AppState, create_router};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("flight source: {0}")]
    Source(#[from] RepositoryError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Flight network service stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;
    let source = config.flight_source()?;
    info!(
        source = %source.describe(),
        max_hops = config.route.max_hops,
        min_connection_mins = config.route.min_connection_mins,
        "Starting flight network service"
    );

    let state = AppState::new(source, config.route.clone(), &CacheConfig::default());

    if state.refresh().await.is_err() {
        warn!("Initial network build failed; route queries answer 503 until a refresh succeeds");
    }

    // Rebuild periodically; on failure the previous snapshot keeps serving.
    let refresher = state.clone();
    let period = config.refresh_interval;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            if let Err(e) = refresher.refresh().await {
                warn!(
                    error = %e,
                    source = %refresher.source.describe(),
                    "Scheduled refresh failed; keeping previous snapshot"
                );
            }
        }
    });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "Flight network listening");

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
