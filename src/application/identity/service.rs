//! User account service — application-layer orchestration
//!
//! All user/role business logic lives here. HTTP handlers are thin wrappers
//! that delegate to this service.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use super::transaction::in_transaction;
use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, Role, RoleRepository, User,
};
use crate::infrastructure::crypto::password::{hash_password, DEFAULT_COST, MAX_PASSWORD_BYTES};
use crate::shared::errors::InfraError;

/// Orchestrates the user-management use-cases over a [`RepositoryProvider`].
///
/// Every mutation runs in its own unit of work: the password hash, the user
/// row and its role links commit together or not at all.
pub struct UserAccountService {
    repos: Arc<dyn RepositoryProvider>,
    hash_cost: u32,
}

impl UserAccountService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            repos,
            hash_cost: DEFAULT_COST,
        }
    }

    /// Override the bcrypt cost factor.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Get a user by id, failing with `NotFound` when it does not exist.
    pub async fn find_by_id(&self, id: i32) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    /// All users in id order.
    pub async fn find_all(&self) -> DomainResult<Vec<User>> {
        self.repos.users().find_all().await
    }

    pub async fn get_user_by_name(&self, name: &str) -> DomainResult<Option<User>> {
        self.repos.users().find_by_name(name).await
    }

    /// Roles selectable in the admin panel.
    pub async fn list_roles(&self) -> DomainResult<Vec<Role>> {
        self.repos.roles().find_all().await
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Create a user from a plaintext password and the selected role labels.
    ///
    /// The password is replaced by its bcrypt hash before anything touches
    /// the store. Every label must name an existing role. Passwords longer
    /// than bcrypt's 72-byte input are rejected rather than truncated.
    pub async fn save_user(&self, mut user: User, selected_roles: &[String]) -> DomainResult<User> {
        if user.password.len() > MAX_PASSWORD_BYTES {
            return Err(DomainError::Validation(format!(
                "password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        user.password = self.hash(std::mem::take(&mut user.password)).await?;
        let labels = selected_roles.to_vec();

        let saved = in_transaction(self.repos.as_ref(), move |uow| {
            Box::pin(async move {
                user.roles = resolve_roles(uow.roles(), &labels).await?;
                uow.users().save(user).await
            })
        })
        .await?;

        info!(
            user_id = ?saved.id,
            name = %saved.name,
            roles = ?saved.role_labels(),
            "User saved"
        );
        Ok(saved)
    }

    /// Persist `new_user` with its role membership replaced by the selected
    /// labels.
    ///
    /// Name, email and password are taken from `old_user`; values carried by
    /// `new_user` for those fields are ignored. The id comes from `new_user`.
    pub async fn update_user(
        &self,
        old_user: &User,
        mut new_user: User,
        selected_roles: &[String],
    ) -> DomainResult<()> {
        new_user.password = old_user.password.clone();
        new_user.email = old_user.email.clone();
        new_user.name = old_user.name.clone();
        let labels = selected_roles.to_vec();

        let saved = in_transaction(self.repos.as_ref(), move |uow| {
            Box::pin(async move {
                new_user.roles = resolve_roles(uow.roles(), &labels).await?;
                uow.users().save(new_user).await
            })
        })
        .await?;

        info!(user_id = ?saved.id, roles = ?saved.role_labels(), "User updated");
        Ok(())
    }

    /// Delete a user by id. Unknown ids are not an error.
    pub async fn delete_by_id(&self, id: i32) -> DomainResult<()> {
        in_transaction(self.repos.as_ref(), move |uow| {
            Box::pin(async move { uow.users().delete_by_id(id).await })
        })
        .await?;

        info!(user_id = id, "User deleted");
        Ok(())
    }

    // ── Helpers ─────────────────────────────────────────────────

    /// bcrypt is CPU bound, keep it off the async workers.
    async fn hash(&self, plain: String) -> DomainResult<String> {
        let cost = self.hash_cost;
        let hashed = tokio::task::spawn_blocking(move || hash_password(&plain, cost))
            .await
            .map_err(|e| DomainError::Crypto(format!("Hashing task failed: {}", e)))?
            .map_err(InfraError::from)?;
        Ok(hashed)
    }
}

/// Look up every label; duplicates collapse, unknown labels fail.
async fn resolve_roles(
    roles: &dyn RoleRepository,
    labels: &[String],
) -> DomainResult<BTreeSet<Role>> {
    let unique: BTreeSet<&str> = labels.iter().map(String::as_str).collect();

    let mut resolved = BTreeSet::new();
    for label in unique {
        let role = roles
            .find_by_label(label)
            .await?
            .ok_or_else(|| DomainError::UnresolvedRole(label.to_string()))?;
        resolved.insert(role);
    }

    debug!(requested = labels.len(), resolved = resolved.len(), "Roles resolved");
    Ok(resolved)
}
