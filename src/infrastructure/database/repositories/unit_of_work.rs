//! Transaction-bound repositories

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use super::{role_repository, user_repository};
use crate::domain::{
    DomainResult, Role, RoleRepository, UnitOfWork, User, UserRepository,
};

/// Both repositories running on one `DatabaseTransaction`.
///
/// SeaORM rolls the transaction back when it is dropped uncommitted.
pub struct SeaOrmUnitOfWork {
    txn: DatabaseTransaction,
}

impl SeaOrmUnitOfWork {
    pub async fn begin(db: &DatabaseConnection) -> DomainResult<Self> {
        let txn = db.begin().await?;
        Ok(Self { txn })
    }
}

#[async_trait]
impl UserRepository for SeaOrmUnitOfWork {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        user_repository::find_by_id(&self.txn, id).await
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        user_repository::find_all(&self.txn).await
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<User>> {
        user_repository::find_by_name(&self.txn, name).await
    }

    async fn save(&self, user: User) -> DomainResult<User> {
        user_repository::save(&self.txn, user).await
    }

    async fn delete_by_id(&self, id: i32) -> DomainResult<()> {
        user_repository::delete_by_id(&self.txn, id).await
    }
}

#[async_trait]
impl RoleRepository for SeaOrmUnitOfWork {
    async fn find_by_label(&self, label: &str) -> DomainResult<Option<Role>> {
        role_repository::find_by_label(&self.txn, label).await
    }

    async fn find_all(&self) -> DomainResult<Vec<Role>> {
        role_repository::find_all(&self.txn).await
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn roles(&self) -> &dyn RoleRepository {
        self
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.txn.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        self.txn.rollback().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RepositoryProvider;
    use crate::infrastructure::database::test_support::migrated_db;
    use crate::infrastructure::database::SeaOrmRepositoryProvider;

    #[tokio::test]
    async fn test_commit_persists_writes() {
        let repos = SeaOrmRepositoryProvider::new(migrated_db().await);

        let uow = repos.begin().await.unwrap();
        uow.users()
            .save(User::new("erin", "e@x.com", "hash"))
            .await
            .unwrap();
        uow.commit().await.unwrap();

        assert!(repos.users().find_by_name("erin").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let repos = SeaOrmRepositoryProvider::new(migrated_db().await);

        let uow = repos.begin().await.unwrap();
        let saved = uow
            .users()
            .save(User::new("frank", "f@x.com", "hash"))
            .await
            .unwrap();
        // Visible inside the transaction
        assert!(uow.users().find_by_id(saved.id.unwrap()).await.unwrap().is_some());
        uow.rollback().await.unwrap();

        assert!(repos.users().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_drop_without_commit_discards_writes() {
        let repos = SeaOrmRepositoryProvider::new(migrated_db().await);

        {
            let uow = repos.begin().await.unwrap();
            uow.users()
                .save(User::new("grace", "g@x.com", "hash"))
                .await
                .unwrap();
        }

        assert!(repos.users().find_by_name("grace").await.unwrap().is_none());
    }
}
