use std::sync::Arc;

use chrono::Utc;

use crate::company::{CompanyRepository, CompanyView, CreateCompany, UpdateCompany};
use crate::errors::ServiceError;

/// Sole arbiter of company CRUD semantics and the ISIN-uniqueness invariant.
/// Generic over the repository seam so tests and alternative stores can
/// substitute an implementation. Performs no logging; callers interpret the
/// typed outcomes.
pub struct CompanyService<R: CompanyRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: CompanyRepository + ?Sized> CompanyService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Create a company. Fails with [`ServiceError::Conflict`] when the ISIN
    /// is already taken; the storage unique key backs the pre-check under
    /// concurrent creates.
    pub async fn create(&self, input: CreateCompany) -> Result<CompanyView, ServiceError> {
        if self.repo.exists_by_isin(&input.isin).await? {
            return Err(ServiceError::duplicate_isin(&input.isin));
        }
        let now = Utc::now().into();
        let created = self.repo.insert(&input, now).await?;
        Ok(created.into())
    }

    /// Lookup by primary key. Absence is a valid outcome, not a failure.
    pub async fn get_by_id(&self, id: i32) -> Result<Option<CompanyView>, ServiceError> {
        Ok(self.repo.find_by_id(id).await?.map(Into::into))
    }

    /// Exact-match ISIN lookup, case-sensitive as stored.
    pub async fn get_by_isin(&self, isin: &str) -> Result<Option<CompanyView>, ServiceError> {
        Ok(self.repo.find_by_isin(isin).await?.map(Into::into))
    }

    /// Every record, ordered by name ascending. No pagination.
    pub async fn list_all(&self) -> Result<Vec<CompanyView>, ServiceError> {
        Ok(self.repo.list().await?.into_iter().map(Into::into).collect())
    }

    /// Overwrite the four mutable fields and refresh `updated_at`. Returns
    /// `Ok(None)` when the id does not exist; callers must check rather than
    /// assume success.
    pub async fn update(
        &self,
        id: i32,
        input: UpdateCompany,
    ) -> Result<Option<CompanyView>, ServiceError> {
        let now = Utc::now().into();
        Ok(self.repo.update(id, &input, now).await?.map(Into::into))
    }

    /// Remove by id; `Ok(false)` when there was nothing to do.
    pub async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        self.repo.delete(id).await
    }

    /// Cheap existence pre-check on the unique ISIN key.
    pub async fn exists_by_isin(&self, isin: &str) -> Result<bool, ServiceError> {
        self.repo.exists_by_isin(isin).await
    }
}
