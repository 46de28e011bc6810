use sea_orm::entity::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

pub mod repository;
pub mod service;

pub use repository::{CompanyRepository, SeaOrmCompanyRepository};
pub use service::CompanyService;

/// Create input. Fields are assumed already validated at the boundary
/// (presence, lengths, ISIN shape, website URL).
#[derive(Debug, Clone)]
pub struct CreateCompany {
    pub name: String,
    pub stock_ticker: String,
    pub exchange: String,
    pub isin: String,
    pub website: Option<String>,
}

/// Update input. The ISIN is immutable and deliberately absent.
#[derive(Debug, Clone)]
pub struct UpdateCompany {
    pub name: String,
    pub stock_ticker: String,
    pub exchange: String,
    pub website: Option<String>,
}

/// External representation of a company record; serialized camelCase on the
/// wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyView {
    pub id: i32,
    pub name: String,
    pub stock_ticker: String,
    pub exchange: String,
    pub isin: String,
    pub website: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<models::company::Model> for CompanyView {
    fn from(m: models::company::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            stock_ticker: m.stock_ticker,
            exchange: m.exchange,
            isin: m.isin,
            website: m.website,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
