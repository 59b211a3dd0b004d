//! Messenger Gateway Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p messenger-gateway
//! ```
//!
//! Configuration is loaded from environment variables and an optional `.env` file.

use messenger_common::{
    try_init_tracing, try_init_tracing_with_config, AppConfig, AppError, TracingConfig,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // APP_ENV selects the log format
    let config = AppConfig::from_env();

    let tracing_result = match &config {
        Ok(config) => try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)),
        Err(_) => try_init_tracing(),
    };
    if let Err(e) = tracing_result {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(config.map_err(AppError::from)).await {
        error!(error = %e, code = e.error_code(), "Gateway failed");
        std::process::exit(1);
    }
}

async fn run(config: Result<AppConfig, AppError>) -> Result<(), AppError> {
    info!("Starting Messenger Gateway Server...");

    let config = config.inspect_err(|e| error!(error = %e, "Failed to load configuration"))?;

    info!(
        app = %config.app.name,
        env = ?config.app.env,
        address = %config.gateway.address(),
        "Configuration loaded"
    );

    messenger_gateway::run(config).await
}
