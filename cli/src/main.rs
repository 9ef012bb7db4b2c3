//! User admin panel — CLI server
//!
//! Headless REST backend for the user administration panel, suitable for
//! deployment as a systemd service, Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/user-admin/config.toml)
//! user-admin
//!
//! # Custom config path
//! user-admin --config /etc/user-admin/config.toml
//!
//! # Override the port
//! user-admin --port 9090
//!
//! # Validate config without starting
//! user-admin --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use user_admin::config::AppConfig;
use user_admin::server::{init_tracing, ServerHandle, ServerOptions};

/// User admin panel backend: users, roles and passwords over a SQL store.
#[derive(Parser, Debug)]
#[command(
    name = "user-admin",
    version,
    about = "REST backend for the user administration panel",
    long_about = "REST API server for creating, listing, editing and deleting \
                  user accounts and their roles.\n\n\
                  Default config: ~/.config/user-admin/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "USER_ADMIN_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(user_admin::default_config_path);

    let loaded = AppConfig::load(&config_path);
    if cli.check {
        return match loaded {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   API address : {}", config.server.address());
                println!("   Database    : {}", config.database.connection_url());
                println!("   Log level   : {}", config.logging.level);
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ {}: {}", config_path.display(), e);
                Err(e.into())
            }
        };
    }

    let mut config = match loaded {
        Ok(mut cfg) => {
            if let Some(ref level) = cli.log_level {
                cfg.logging.level = level.clone();
            }
            // Init tracing first so subsequent logs are formatted properly
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            // Fallback tracing init
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new(
                    cli.log_level.as_deref().unwrap_or("info"),
                ))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            AppConfig::default()
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    // Wait for shutdown signal, then clean up
    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
