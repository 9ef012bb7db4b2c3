use async_trait::async_trait;

use super::Role;
use crate::domain::DomainResult;

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_label(&self, label: &str) -> DomainResult<Option<Role>>;
    async fn find_all(&self) -> DomainResult<Vec<Role>>;
}
