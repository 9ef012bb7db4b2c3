use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    NotSet, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::role_repository::role_model_to_domain;
use crate::domain::{DomainError, DomainResult, Role, User, UserRepository};
use crate::infrastructure::database::entities::{role, user, users_roles};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model, roles: Vec<role::Model>) -> User {
    User {
        id: Some(model.id),
        name: model.name,
        email: model.email,
        password: model.password,
        roles: roles.into_iter().map(role_model_to_domain).collect(),
    }
}

// ── Queries shared by the pooled repository and the unit of work ──

async fn with_roles<C: ConnectionTrait>(
    conn: &C,
    model: Option<user::Model>,
) -> DomainResult<Option<User>> {
    let Some(model) = model else {
        return Ok(None);
    };
    let roles = model.find_related(role::Entity).all(conn).await?;
    Ok(Some(user_model_to_domain(model, roles)))
}

pub(super) async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i32) -> DomainResult<Option<User>> {
    let model = user::Entity::find_by_id(id).one(conn).await?;
    with_roles(conn, model).await
}

pub(super) async fn find_by_name<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> DomainResult<Option<User>> {
    let model = user::Entity::find()
        .filter(user::Column::Name.eq(name))
        .one(conn)
        .await?;
    with_roles(conn, model).await
}

pub(super) async fn find_all<C: ConnectionTrait>(conn: &C) -> DomainResult<Vec<User>> {
    let rows = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .find_with_related(role::Entity)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(model, roles)| user_model_to_domain(model, roles))
        .collect())
}

pub(super) async fn save<C: ConnectionTrait>(conn: &C, user: User) -> DomainResult<User> {
    let now = Utc::now();

    let model = match user.id {
        None => {
            let new_user = user::ActiveModel {
                id: NotSet,
                name: Set(user.name),
                email: Set(user.email),
                password: Set(user.password),
                created_at: Set(now),
                updated_at: Set(now),
            };
            new_user.insert(conn).await?
        }
        Some(id) => {
            let existing = user::Entity::find_by_id(id)
                .one(conn)
                .await?
                .ok_or_else(|| DomainError::user_not_found(id))?;

            let mut active: user::ActiveModel = existing.into();
            active.name = Set(user.name);
            active.email = Set(user.email);
            active.password = Set(user.password);
            active.updated_at = Set(now);
            active.update(conn).await?
        }
    };

    replace_role_links(conn, model.id, &user.roles).await?;

    Ok(User {
        id: Some(model.id),
        name: model.name,
        email: model.email,
        password: model.password,
        roles: user.roles,
    })
}

async fn replace_role_links<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    roles: &BTreeSet<Role>,
) -> DomainResult<()> {
    users_roles::Entity::delete_many()
        .filter(users_roles::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;

    if roles.is_empty() {
        return Ok(());
    }

    let links = roles.iter().map(|role| users_roles::ActiveModel {
        user_id: Set(user_id),
        role_id: Set(role.id),
    });
    users_roles::Entity::insert_many(links)
        .exec_without_returning(conn)
        .await?;

    Ok(())
}

pub(super) async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: i32) -> DomainResult<()> {
    users_roles::Entity::delete_many()
        .filter(users_roles::Column::UserId.eq(id))
        .exec(conn)
        .await?;

    let result = user::Entity::delete_by_id(id).exec(conn).await?;
    if result.rows_affected == 0 {
        debug!(user_id = id, "Delete of unknown user ignored");
    }

    Ok(())
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        find_by_id(&self.db, id).await
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        find_all(&self.db).await
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<User>> {
        find_by_name(&self.db, name).await
    }

    async fn save(&self, user: User) -> DomainResult<User> {
        save(&self.db, user).await
    }

    async fn delete_by_id(&self, id: i32) -> DomainResult<()> {
        delete_by_id(&self.db, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RoleRepository, ROLE_ADMIN, ROLE_USER};
    use crate::infrastructure::database::repositories::SeaOrmRoleRepository;
    use crate::infrastructure::database::test_support::migrated_db;

    async fn seeded_roles(db: &DatabaseConnection) -> (Role, Role) {
        let roles = SeaOrmRoleRepository::new(db.clone());
        let admin = roles.find_by_label(ROLE_ADMIN).await.unwrap().unwrap();
        let user = roles.find_by_label(ROLE_USER).await.unwrap().unwrap();
        (admin, user)
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_links_roles() {
        let db = migrated_db().await;
        let (admin, user_role) = seeded_roles(&db).await;
        let repo = SeaOrmUserRepository::new(db);

        let mut user = User::new("alice", "a@x.com", "hash");
        user.roles = BTreeSet::from([admin.clone(), user_role.clone()]);

        let saved = repo.save(user).await.unwrap();
        let id = saved.id.expect("id assigned");

        let loaded = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "alice");
        assert_eq!(loaded.roles, BTreeSet::from([admin, user_role]));
    }

    #[tokio::test]
    async fn test_update_replaces_role_links() {
        let db = migrated_db().await;
        let (admin, user_role) = seeded_roles(&db).await;
        let repo = SeaOrmUserRepository::new(db);

        let mut user = User::new("bob", "b@x.com", "hash");
        user.roles = BTreeSet::from([admin]);
        let mut saved = repo.save(user).await.unwrap();

        saved.roles = BTreeSet::from([user_role.clone()]);
        saved.email = "bob@x.com".to_string();
        repo.save(saved.clone()).await.unwrap();

        let loaded = repo.find_by_name("bob").await.unwrap().unwrap();
        assert_eq!(loaded.id, saved.id);
        assert_eq!(loaded.email, "bob@x.com");
        assert_eq!(loaded.roles, BTreeSet::from([user_role]));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_with_stale_id_is_not_found() {
        let db = migrated_db().await;
        let repo = SeaOrmUserRepository::new(db);

        let err = repo
            .save(User::new("ghost", "g@x.com", "hash").with_id(999))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let db = migrated_db().await;
        let repo = SeaOrmUserRepository::new(db);

        repo.save(User::new("carol", "c@x.com", "hash")).await.unwrap();
        let err = repo
            .save(User::new("carol", "other@x.com", "hash"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_find_all_in_id_order_including_roleless_users() {
        let db = migrated_db().await;
        let (admin, _) = seeded_roles(&db).await;
        let repo = SeaOrmUserRepository::new(db);

        let mut first = User::new("first", "1@x.com", "hash");
        first.roles.insert(admin);
        repo.save(first).await.unwrap();
        repo.save(User::new("second", "2@x.com", "hash")).await.unwrap();

        let names: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_delete_removes_user_and_ignores_unknown_ids() {
        let db = migrated_db().await;
        let (admin, _) = seeded_roles(&db).await;
        let repo = SeaOrmUserRepository::new(db);

        let mut user = User::new("dave", "d@x.com", "hash");
        user.roles.insert(admin);
        let id = repo.save(user).await.unwrap().id.unwrap();

        repo.delete_by_id(id).await.unwrap();
        assert!(repo.find_by_id(id).await.unwrap().is_none());

        repo.delete_by_id(12345).await.unwrap();
    }
}
