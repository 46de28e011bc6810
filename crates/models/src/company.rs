use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Registry row for a listed company. `isin` carries a storage-level unique
/// key and is immutable once inserted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub stock_ticker: String,
    pub exchange: String,
    #[sea_orm(unique)]
    pub isin: String,
    pub website: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
