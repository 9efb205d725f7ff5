// src/main.rs
use pallet_fit::api;
use pallet_fit::config::AppConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let dotenv_result = dotenvy::dotenv();

    init_tracing();

    if let Err(err) = dotenv_result {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            warn!("Could not load .env: {}", err);
        }
    }

    let app_config = AppConfig::from_env();
    let api_config = app_config.api.clone();
    let calculator_config = app_config.calculator.calculator_config();

    info!(
        preset = calculator_config.default_preset.name(),
        base_height = calculator_config.default_base_height,
        unit = %calculator_config.default_unit,
        "Load planning service starting"
    );
    api::start_api_server(api_config, calculator_config).await;
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter, e.g. `RUST_LOG=pallet_fit=trace`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pallet_fit=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
