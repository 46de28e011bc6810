use thiserror::Error;

/// Failures the company record service can signal. Absence of a record is
/// never an error here; lookups return `Option` and delete returns `bool`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn duplicate_isin(isin: &str) -> Self {
        Self::Conflict(format!("A company with ISIN '{}' already exists.", isin))
    }
}
