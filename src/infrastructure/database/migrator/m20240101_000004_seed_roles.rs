//! Seed the standard roles

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_roles::Roles;
use crate::domain::{ROLE_ADMIN, ROLE_USER};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let insert = Query::insert()
            .into_table(Roles::Table)
            .columns([Roles::Label])
            .values_panic([ROLE_ADMIN.into()])
            .values_panic([ROLE_USER.into()])
            .to_owned();

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Roles::Table)
            .and_where(Expr::col(Roles::Label).is_in([ROLE_ADMIN, ROLE_USER]))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}
