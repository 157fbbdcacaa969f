pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod prediction;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::api::{api_router, start_api_server, with_cors, ApiContext};
use crate::config::Settings;

/// Startup failures. Request-time failures are `api::ApiError`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Patient store error: {0}")]
    Store(#[from] db::StoreError),

    #[error("Model artifact error: {0}")]
    Artifact(#[from] prediction::ArtifactError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Load settings, serve until Ctrl-C, then drain and stop.
pub async fn run() -> Result<(), AppError> {
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let settings = Settings::from_env()?;
    let ctx = ApiContext::from_settings(&settings)?;

    tracing::info!(
        store = ctx.patients.backend(),
        prefix = %settings.api_prefix,
        "Patient store ready"
    );
    for model in ctx.predictions.describe() {
        tracing::info!(
            disease = %model.disease_type,
            model_version = %model.model_version,
            "Risk model registered"
        );
    }

    let app = with_cors(api_router(ctx), &settings.cors_origins);
    let server = start_api_server(app, settings.bind_addr).await?;
    tracing::info!(addr = %server.local_addr(), "Listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Ctrl-C received");
    server.stop().await;
    Ok(())
}
