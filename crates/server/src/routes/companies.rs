use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use validator::Validate;

use service::company::{CompanyView, CreateCompany, UpdateCompany};
use service::errors::ServiceError;

use crate::errors::ApiError;
use crate::routes::AppState;

pub static ISIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2}[A-Za-z0-9]{9}[0-9]$").expect("valid ISIN pattern"));

const ISIN_FORMAT_MESSAGE: &str =
    "ISIN must be 12 characters: 2 letters followed by 9 alphanumeric characters and 1 digit";

/// Create payload. Shape validation happens here, before the service sees it.
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 200, message = "name is required, max length 200"))]
    pub name: String,
    #[validate(length(min = 1, max = 10, message = "stockTicker is required, max length 10"))]
    pub stock_ticker: String,
    #[validate(length(min = 1, max = 100, message = "exchange is required, max length 100"))]
    pub exchange: String,
    #[validate(regex(path = *ISIN_RE, message = "ISIN must be 12 characters: 2 letters followed by 9 alphanumeric characters and 1 digit"))]
    pub isin: String,
    #[validate(
        length(max = 500, message = "website max length is 500"),
        url(message = "website must be a well-formed URL")
    )]
    pub website: Option<String>,
}

/// Update payload. No `isin`: the ISIN is immutable after creation.
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 200, message = "name is required, max length 200"))]
    pub name: String,
    #[validate(length(min = 1, max = 10, message = "stockTicker is required, max length 10"))]
    pub stock_ticker: String,
    #[validate(length(min = 1, max = 100, message = "exchange is required, max length 100"))]
    pub exchange: String,
    #[validate(
        length(max = 500, message = "website max length is 500"),
        url(message = "website must be a well-formed URL")
    )]
    pub website: Option<String>,
}

impl From<CreateCompanyRequest> for CreateCompany {
    fn from(r: CreateCompanyRequest) -> Self {
        Self {
            name: r.name,
            stock_ticker: r.stock_ticker,
            exchange: r.exchange,
            isin: r.isin,
            website: r.website,
        }
    }
}

impl From<UpdateCompanyRequest> for UpdateCompany {
    fn from(r: UpdateCompanyRequest) -> Self {
        Self {
            name: r.name,
            stock_ticker: r.stock_ticker,
            exchange: r.exchange,
            website: r.website,
        }
    }
}

#[utoipa::path(
    get, path = "/api/companies", tag = "companies",
    responses(
        (status = 200, description = "All companies, sorted by name"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Internal error")
    ),
    security(("ApiKey" = []))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CompanyView>>, ApiError> {
    match state.companies.list_all().await {
        Ok(views) => {
            info!(count = views.len(), "listed companies");
            Ok(Json(views))
        }
        Err(e) => {
            error!(err = %e, "error retrieving all companies");
            Err(ApiError::Internal("An error occurred while retrieving companies".into()))
        }
    }
}

#[utoipa::path(
    get, path = "/api/companies/{id}", tag = "companies",
    params(("id" = i32, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Company found"),
        (status = 404, description = "No company with this id"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Internal error")
    ),
    security(("ApiKey" = []))
)]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CompanyView>, ApiError> {
    match state.companies.get_by_id(id).await {
        Ok(Some(view)) => Ok(Json(view)),
        Ok(None) => {
            info!(id, "company not found");
            Err(ApiError::NotFound(format!("Company with ID {} not found", id)))
        }
        Err(e) => {
            error!(id, err = %e, "error retrieving company");
            Err(ApiError::Internal("An error occurred while retrieving the company".into()))
        }
    }
}

#[utoipa::path(
    get, path = "/api/companies/by-isin/{isin}", tag = "companies",
    params(("isin" = String, Path, description = "12-character ISIN")),
    responses(
        (status = 200, description = "Company found"),
        (status = 400, description = "Malformed ISIN"),
        (status = 404, description = "No company with this ISIN"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Internal error")
    ),
    security(("ApiKey" = []))
)]
pub async fn get_by_isin(
    State(state): State<AppState>,
    Path(isin): Path<String>,
) -> Result<Json<CompanyView>, ApiError> {
    if !ISIN_RE.is_match(&isin) {
        return Err(ApiError::Validation(ISIN_FORMAT_MESSAGE.into()));
    }
    match state.companies.get_by_isin(&isin).await {
        Ok(Some(view)) => Ok(Json(view)),
        Ok(None) => {
            info!(%isin, "company not found by isin");
            Err(ApiError::NotFound(format!("Company with ISIN {} not found", isin)))
        }
        Err(e) => {
            error!(%isin, err = %e, "error retrieving company by isin");
            Err(ApiError::Internal("An error occurred while retrieving the company".into()))
        }
    }
}

#[utoipa::path(
    post, path = "/api/companies", tag = "companies",
    request_body = crate::openapi::CreateCompanyDoc,
    responses(
        (status = 201, description = "Created; Location points at the new company"),
        (status = 400, description = "Validation error"),
        (status = 409, description = "A company with this ISIN already exists"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Internal error")
    ),
    security(("ApiKey" = []))
)]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCompanyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    match state.companies.create(input.into()).await {
        Ok(view) => {
            info!(id = view.id, isin = %view.isin, "created company");
            let location = format!("/api/companies/{}", view.id);
            Ok((
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(view),
            ))
        }
        Err(ServiceError::Conflict(msg)) => {
            info!(%msg, "create rejected");
            Err(ApiError::Conflict(msg))
        }
        Err(e) => {
            error!(err = %e, "error creating company");
            Err(ApiError::Internal("An error occurred while creating the company".into()))
        }
    }
}

#[utoipa::path(
    put, path = "/api/companies/{id}", tag = "companies",
    params(("id" = i32, Path, description = "Company ID")),
    request_body = crate::openapi::UpdateCompanyDoc,
    responses(
        (status = 200, description = "Updated company"),
        (status = 400, description = "Validation error"),
        (status = 404, description = "No company with this id"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Internal error")
    ),
    security(("ApiKey" = []))
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateCompanyRequest>,
) -> Result<Json<CompanyView>, ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    match state.companies.update(id, input.into()).await {
        Ok(Some(view)) => {
            info!(id, "updated company");
            Ok(Json(view))
        }
        Ok(None) => {
            info!(id, "company not found for update");
            Err(ApiError::NotFound(format!("Company with ID {} not found", id)))
        }
        Err(e) => {
            error!(id, err = %e, "error updating company");
            Err(ApiError::Internal("An error occurred while updating the company".into()))
        }
    }
}

#[utoipa::path(
    delete, path = "/api/companies/{id}", tag = "companies",
    params(("id" = i32, Path, description = "Company ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No company with this id"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Internal error")
    ),
    security(("ApiKey" = []))
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> StatusCode {
    match state.companies.delete(id).await {
        Ok(true) => {
            info!(id, "deleted company");
            StatusCode::NO_CONTENT
        }
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => {
            error!(id, err = %e, "error deleting company");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
