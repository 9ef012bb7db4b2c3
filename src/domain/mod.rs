pub mod repositories;
pub mod role;
pub mod user;

// Re-export commonly used types
pub use repositories::{DomainResult, RepositoryProvider, UnitOfWork};
pub use role::{Role, RoleRepository, ROLE_ADMIN, ROLE_USER};
pub use user::{User, UserRepository};

pub use crate::shared::errors::DomainError;
