use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::{DomainResult, Role, RoleRepository};
use crate::infrastructure::database::entities::role;

pub struct SeaOrmRoleRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(super) fn role_model_to_domain(model: role::Model) -> Role {
    Role {
        id: model.id,
        label: model.label,
    }
}

pub(super) async fn find_by_label<C: ConnectionTrait>(
    conn: &C,
    label: &str,
) -> DomainResult<Option<Role>> {
    let model = role::Entity::find()
        .filter(role::Column::Label.eq(label))
        .one(conn)
        .await?;
    Ok(model.map(role_model_to_domain))
}

pub(super) async fn find_all<C: ConnectionTrait>(conn: &C) -> DomainResult<Vec<Role>> {
    let models = role::Entity::find()
        .order_by_asc(role::Column::Id)
        .all(conn)
        .await?;
    Ok(models.into_iter().map(role_model_to_domain).collect())
}

#[async_trait]
impl RoleRepository for SeaOrmRoleRepository {
    async fn find_by_label(&self, label: &str) -> DomainResult<Option<Role>> {
        find_by_label(&self.db, label).await
    }

    async fn find_all(&self) -> DomainResult<Vec<Role>> {
        find_all(&self.db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ROLE_ADMIN, ROLE_USER};
    use crate::infrastructure::database::test_support::migrated_db;

    #[tokio::test]
    async fn test_seeded_roles_are_listed() {
        let repo = SeaOrmRoleRepository::new(migrated_db().await);

        let labels: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.label)
            .collect();
        assert_eq!(labels, vec![ROLE_ADMIN, ROLE_USER]);
    }

    #[tokio::test]
    async fn test_find_by_label_is_exact() {
        let repo = SeaOrmRoleRepository::new(migrated_db().await);

        assert!(repo.find_by_label(ROLE_ADMIN).await.unwrap().is_some());
        assert!(repo.find_by_label("role_admin").await.unwrap().is_none());
        assert!(repo.find_by_label("ROLE_NOBODY").await.unwrap().is_none());
    }
}
