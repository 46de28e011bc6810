//! Create `company` table.
//!
//! The unique key on `isin` is the authoritative enforcement point for the
//! uniqueness invariant; the service pre-check is advisory.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Company::Table)
                    .if_not_exists()
                    .col(pk_auto(Company::Id))
                    .col(string_len(Company::Name, 200).not_null())
                    .col(string_len(Company::StockTicker, 10).not_null())
                    .col(string_len(Company::Exchange, 100).not_null())
                    .col(string_len(Company::Isin, 12).unique_key().not_null())
                    .col(string_len_null(Company::Website, 500))
                    .col(timestamp_with_time_zone(Company::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Company::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Company::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Company { Table, Id, Name, StockTicker, Exchange, Isin, Website, CreatedAt, UpdatedAt }
