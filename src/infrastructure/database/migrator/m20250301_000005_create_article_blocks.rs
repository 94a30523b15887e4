//! Create article_blocks table

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_users::Users;
use super::m20250301_000003_create_articles::Articles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ArticleBlocks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ArticleBlocks::ArticleId).string().not_null())
                    .col(ColumnDef::new(ArticleBlocks::UserId).string().not_null())
                    .col(
                        ColumnDef::new(ArticleBlocks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_article_blocks")
                            .col(ArticleBlocks::ArticleId)
                            .col(ArticleBlocks::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_blocks_article_id")
                            .from(ArticleBlocks::Table, ArticleBlocks::ArticleId)
                            .to(Articles::Table, Articles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_blocks_user_id")
                            .from(ArticleBlocks::Table, ArticleBlocks::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Feed reads filter by the viewer.
        manager
            .create_index(
                Index::create()
                    .name("idx_article_blocks_user_id")
                    .table(ArticleBlocks::Table)
                    .col(ArticleBlocks::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ArticleBlocks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ArticleBlocks {
    Table,
    ArticleId,
    UserId,
    CreatedAt,
}
