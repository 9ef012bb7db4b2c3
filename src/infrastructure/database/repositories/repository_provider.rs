//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::role_repository::SeaOrmRoleRepository;
use super::unit_of_work::SeaOrmUnitOfWork;
use super::user_repository::SeaOrmUserRepository;
use crate::domain::{DomainResult, RepositoryProvider, RoleRepository, UnitOfWork, UserRepository};

/// Repository provider backed by SeaORM.
///
/// Holds one connection pool; reads run on the pool and every `begin()`
/// checks out a connection for a new transaction.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let alice = repos.users().find_by_name("alice").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    users: SeaOrmUserRepository,
    roles: SeaOrmRoleRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            roles: SeaOrmRoleRepository::new(db.clone()),
            db,
        }
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn roles(&self) -> &dyn RoleRepository {
        &self.roles
    }

    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let uow = SeaOrmUnitOfWork::begin(&self.db).await?;
        Ok(Box::new(uow))
    }
}
