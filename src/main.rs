//! Blog service
//!
//! Reads configuration from environment variables (and `.env` if present),
//! serves the REST API and shuts down gracefully on SIGINT/SIGTERM.

use std::process::ExitCode;

use tracing::error;

use blog_service::server::{init_tracing, ServerHandle, ServerOptions};
use blog_service::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging);

    let handle = match ServerHandle::start(ServerOptions::new(config)).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    handle.install_signal_handler();
    handle.wait().await;

    ExitCode::SUCCESS
}
