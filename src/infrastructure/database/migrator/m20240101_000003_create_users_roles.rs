//! Create users_roles join table migration

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;
use super::m20240101_000002_create_roles::Roles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UsersRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UsersRoles::UserId).integer().not_null())
                    .col(ColumnDef::new(UsersRoles::RoleId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(UsersRoles::UserId)
                            .col(UsersRoles::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_roles_user_id")
                            .from(UsersRoles::Table, UsersRoles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_roles_role_id")
                            .from(UsersRoles::Table, UsersRoles::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Reverse lookups (who holds a role) go through role_id
        manager
            .create_index(
                Index::create()
                    .name("idx_users_roles_role_id")
                    .table(UsersRoles::Table)
                    .col(UsersRoles::RoleId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UsersRoles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UsersRoles {
    Table,
    UserId,
    RoleId,
}
