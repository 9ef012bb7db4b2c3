//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider` — access to the user and role repositories
//! - `UnitOfWork` — the same repositories bound to one open transaction
//! - `DomainResult` — standard result type for domain operations

use async_trait::async_trait;

use super::role::RoleRepository;
use super::user::UserRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Reads go straight through `users()` / `roles()`. Mutations open a
/// [`UnitOfWork`] so that every write of one operation commits or rolls back
/// together:
///
/// ```ignore
/// let uow = repos.begin().await?;
/// let role = uow.roles().find_by_label("ROLE_USER").await?;
/// let saved = uow.users().save(user).await?;
/// uow.commit().await?;
/// ```
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn roles(&self) -> &dyn RoleRepository;

    /// Open a transaction.
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>>;
}

/// An open transaction exposing the repositories.
///
/// Dropping a unit of work without committing discards its writes.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn roles(&self) -> &dyn RoleRepository;

    async fn commit(self: Box<Self>) -> DomainResult<()>;
    async fn rollback(self: Box<Self>) -> DomainResult<()>;
}
