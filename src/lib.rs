//! # User Admin Service
//!
//! User-management backend for an administrative web panel: user accounts,
//! their role assignments and bcrypt password handling, over a relational
//! store.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: User and Role entities, repository traits, unit of work
//! - **application**: `UserAccountService`, the user/role use-cases
//! - **infrastructure**: SeaORM persistence, migrations, password hashing
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: error types and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
