use async_trait::async_trait;

use super::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    /// All users in id order.
    async fn find_all(&self) -> DomainResult<Vec<User>>;
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<User>>;

    /// Insert a user without an id, or overwrite the row matching its id.
    ///
    /// The stored role links are replaced by `user.roles` in both cases.
    async fn save(&self, user: User) -> DomainResult<User>;
    /// Remove the user and its role links. Missing ids are not an error.
    async fn delete_by_id(&self, id: i32) -> DomainResult<()>;
}
