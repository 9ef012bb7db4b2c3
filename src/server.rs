//! Reusable server runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! database init, migrations, default admin account, REST API and graceful
//! shutdown.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::UserAccountService;
use crate::config::AppConfig;
use crate::domain::{DomainResult, RepositoryProvider, User, ROLE_ADMIN, ROLE_USER};
use crate::infrastructure::database::migrator::Migrator;
use crate::interfaces::http::create_api_router;
use crate::shared::shutdown::ShutdownSignal;
use crate::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the server.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the configured admin when no user exists (default: true).
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running server.
///
/// ```rust,no_run
/// use user_admin::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub user_service: Arc<UserAccountService>,
    pub config: AppConfig,
    /// Port the API is bound to (resolved when the config asks for port 0)
    pub port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownSignal,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Connect, migrate, seed the admin account and start serving.
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting user admin service...");

        // ── Database ───────────────────────────────────────────
        let db_config = DatabaseConfig::from(&app_cfg.database);
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        // ── Repositories & Services ────────────────────────────
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let user_service = Arc::new(
            UserAccountService::new(repos).with_hash_cost(app_cfg.security.bcrypt_cost),
        );

        if opts.create_default_admin {
            if let Err(e) = create_default_admin(&user_service, &app_cfg).await {
                error!("Failed to create admin user: {}", e);
            }
        }

        // ── REST API ───────────────────────────────────────────
        let router = create_api_router(db.clone(), user_service.clone());
        let listener = tokio::net::TcpListener::bind(app_cfg.server.address()).await?;
        let port = listener.local_addr()?.port();
        info!("REST API listening on http://{}:{}", app_cfg.server.host, port);
        info!("Swagger UI available at http://{}:{}/docs/", app_cfg.server.host, port);

        let shutdown = ShutdownSignal::new();
        let api_shutdown = shutdown.clone();
        let api_task = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    api_shutdown.wait().await;
                    info!("🛑 REST API server received shutdown signal");
                })
                .await;
            if let Err(e) = result {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            user_service,
            config: app_cfg,
            port,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Trigger shutdown on SIGTERM / SIGINT.
    pub fn install_signal_handler(&self) {
        self.shutdown.install_signal_handler();
    }

    /// Trigger shutdown and wait for the server to drain.
    pub async fn shutdown(self) {
        self.shutdown.trigger();
        self.wait().await;
    }

    /// Wait for the API task to finish, bounded by `server.shutdown_timeout`
    /// once shutdown has begun, then close the pool.
    pub async fn wait(self) {
        let timeout = Duration::from_secs(self.config.server.shutdown_timeout);
        let mut api_task = self.api_task;

        tokio::select! {
            _ = &mut api_task => {}
            _ = async {
                self.shutdown.wait().await;
                tokio::time::sleep(timeout).await;
            } => {
                warn!("⚠️ Graceful shutdown timed out after {}s", timeout.as_secs());
                api_task.abort();
            }
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }
        info!("👋 Shutdown complete");
    }
}

/// Create the configured admin account if no user exists yet.
///
/// Returns the created user, or `None` when users were already present.
pub async fn create_default_admin(
    service: &UserAccountService,
    app_cfg: &AppConfig,
) -> DomainResult<Option<User>> {
    if !service.find_all().await?.is_empty() {
        return Ok(None);
    }

    info!("Creating default admin user...");
    let admin = User::new(
        app_cfg.admin.name.clone(),
        app_cfg.admin.email.clone(),
        app_cfg.admin.password.clone(),
    );
    let roles = [ROLE_ADMIN.to_string(), ROLE_USER.to_string()];
    let saved = service.save_user(admin, &roles).await?;

    info!("Default admin created: {}", saved.name);
    info!("⚠️  Please change the admin password immediately!");
    Ok(Some(saved))
}

/// Initialise the global tracing subscriber from `[logging]`.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::password::{verify_password, MIN_COST};
    use crate::infrastructure::database::test_support::migrated_db;

    async fn service() -> UserAccountService {
        let repos = Arc::new(SeaOrmRepositoryProvider::new(migrated_db().await));
        UserAccountService::new(repos).with_hash_cost(MIN_COST)
    }

    #[tokio::test]
    async fn test_default_admin_created_once() {
        let service = service().await;
        let mut cfg = AppConfig::default();
        cfg.admin.password = "changeme".to_string();

        let admin = create_default_admin(&service, &cfg).await.unwrap().unwrap();
        assert_eq!(admin.name, "admin");
        assert!(admin.has_role(ROLE_ADMIN));
        assert!(admin.has_role(ROLE_USER));
        assert!(verify_password("changeme", &admin.password).unwrap());

        assert!(create_default_admin(&service, &cfg).await.unwrap().is_none());
        assert_eq!(service.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_server_starts_and_shuts_down() {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.server.shutdown_timeout = 5;
        config.database.url = "sqlite::memory:".to_string();
        config.database.max_connections = 1;
        config.security.bcrypt_cost = MIN_COST;

        let handle = ServerHandle::start(ServerOptions {
            config,
            ..ServerOptions::default()
        })
        .await
        .unwrap();

        assert_ne!(handle.port, 0);
        let admin = handle.user_service.get_user_by_name("admin").await.unwrap();
        assert!(admin.is_some());

        tokio::time::timeout(Duration::from_secs(10), handle.shutdown())
            .await
            .expect("shutdown timed out");
    }
}
