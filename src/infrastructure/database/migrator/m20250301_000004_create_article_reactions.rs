//! Create article_reactions table

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
                    .table(ArticleReactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ArticleReactions::ArticleId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ArticleReactions::UserId).string().not_null())
                    .col(
                        ColumnDef::new(ArticleReactions::Kind)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArticleReactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_article_reactions")
                            .col(ArticleReactions::ArticleId)
                            .col(ArticleReactions::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_reactions_article_id")
                            .from(ArticleReactions::Table, ArticleReactions::ArticleId)
                            .to(Articles::Table, Articles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_reactions_user_id")
                            .from(ArticleReactions::Table, ArticleReactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ArticleReactions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ArticleReactions {
    Table,
    ArticleId,
    UserId,
    Kind,
    CreatedAt,
}
