use async_trait::async_trait;
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};

use models::company;

use crate::company::{CreateCompany, UpdateCompany};
use crate::errors::ServiceError;

/// Storage seam for company records. Lookups of absent rows are `Ok(None)`
/// (or `Ok(false)` for delete), never errors.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Insert a new record with both timestamps set to `now`. A storage-level
    /// unique violation on the ISIN must surface as [`ServiceError::Conflict`].
    async fn insert(
        &self,
        input: &CreateCompany,
        now: DateTimeWithTimeZone,
    ) -> Result<company::Model, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<company::Model>, ServiceError>;
    async fn find_by_isin(&self, isin: &str) -> Result<Option<company::Model>, ServiceError>;
    /// All records, ordered by name ascending.
    async fn list(&self) -> Result<Vec<company::Model>, ServiceError>;
    /// Overwrite the mutable fields and `updated_at`; `Ok(None)` when the id
    /// does not exist.
    async fn update(
        &self,
        id: i32,
        input: &UpdateCompany,
        now: DateTimeWithTimeZone,
    ) -> Result<Option<company::Model>, ServiceError>;
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
    async fn exists_by_isin(&self, isin: &str) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmCompanyRepository {
    db: DatabaseConnection,
}

impl SeaOrmCompanyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CompanyRepository for SeaOrmCompanyRepository {
    async fn insert(
        &self,
        input: &CreateCompany,
        now: DateTimeWithTimeZone,
    ) -> Result<company::Model, ServiceError> {
        let am = company::ActiveModel {
            id: NotSet,
            name: Set(input.name.clone()),
            stock_ticker: Set(input.stock_ticker.clone()),
            exchange: Set(input.exchange.clone()),
            isin: Set(input.isin.clone()),
            website: Set(input.website.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        am.insert(&self.db).await.map_err(|e| match e.sql_err() {
            // The unique key on isin is the authoritative conflict signal;
            // two creates racing past the pre-check land here.
            Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::duplicate_isin(&input.isin),
            _ => ServiceError::Db(e.to_string()),
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<company::Model>, ServiceError> {
        company::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_isin(&self, isin: &str) -> Result<Option<company::Model>, ServiceError> {
        company::Entity::find()
            .filter(company::Column::Isin.eq(isin))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<company::Model>, ServiceError> {
        company::Entity::find()
            .order_by_asc(company::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn update(
        &self,
        id: i32,
        input: &UpdateCompany,
        now: DateTimeWithTimeZone,
    ) -> Result<Option<company::Model>, ServiceError> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let mut am: company::ActiveModel = existing.into();
        am.name = Set(input.name.clone());
        am.stock_ticker = Set(input.stock_ticker.clone());
        am.exchange = Set(input.exchange.clone());
        am.website = Set(input.website.clone());
        am.updated_at = Set(now);
        let updated = am
            .update(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let res = company::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.rows_affected > 0)
    }

    async fn exists_by_isin(&self, isin: &str) -> Result<bool, ServiceError> {
        let n = company::Entity::find()
            .filter(company::Column::Isin.eq(isin))
            .count(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(n > 0)
    }
}
