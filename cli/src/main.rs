//! Blog service - CLI server
//!
//! Same server as the `blog-service` binary, with command-line overrides for
//! deployment scripts and local development.
//!
//! ```sh
//! # Configuration from the environment / .env
//! blog-cli
//!
//! # Override the listen address
//! blog-cli --host 127.0.0.1 --port 3000
//!
//! # Validate configuration without starting
//! blog-cli --check
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use blog_service::config::AppConfig;
use blog_service::server::{init_tracing, ServerHandle, ServerOptions};

/// Blog backend with token authentication and ownership checks.
#[derive(Parser, Debug)]
#[command(
    name = "blog-cli",
    version,
    about = "Blog REST API server",
    long_about = "Blog REST API server.\n\n\
                  Configuration is read from environment variables (JWT_SECRET is \
                  required) and from a .env file in the working directory."
)]
struct Cli {
    /// Override the listen port (SERVER_PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the listen host (SERVER_HOST).
    #[arg(long)]
    host: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    cli.apply_overrides(&mut config);

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("✅ Configuration is valid");
        println!("   Address     : {}", config.server.bind_address());
        println!(
            "   Database    : {} ({})",
            config.database.driver,
            config.database_config().redacted_url()
        );
        println!("   Token TTL   : {}h", config.security.jwt_expiration_hours);
        println!("   Bcrypt cost : {}", config.security.bcrypt_cost);
        println!("   Log level   : {}", config.logging.level);
        return ExitCode::SUCCESS;
    }

    init_tracing(&config.logging);

    // ── Start server ───────────────────────────────────────────
    let mut options = ServerOptions::new(config);
    options.auto_migrate = !cli.no_migrate;

    let handle = match ServerHandle::start(options).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.wait().await;
    ExitCode::SUCCESS
}
