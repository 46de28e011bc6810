use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Documentation mirror of the create payload.
#[derive(ToSchema)]
#[schema(as = CreateCompanyRequest)]
pub struct CreateCompanyDoc {
    #[schema(example = "Acme Inc.")]
    pub name: String,
    #[schema(example = "ACM")]
    pub stock_ticker: String,
    #[schema(example = "NYSE")]
    pub exchange: String,
    #[schema(example = "US1234567890")]
    pub isin: String,
    #[schema(example = "https://acme.example")]
    pub website: Option<String>,
}

/// Documentation mirror of the update payload; the ISIN is immutable and
/// deliberately absent.
#[derive(ToSchema)]
#[schema(as = UpdateCompanyRequest)]
pub struct UpdateCompanyDoc {
    pub name: String,
    pub stock_ticker: String,
    pub exchange: String,
    pub website: Option<String>,
}

#[derive(ToSchema)]
#[schema(as = CompanyView)]
pub struct CompanyDoc {
    pub id: i32,
    pub name: String,
    pub stock_ticker: String,
    pub exchange: String,
    pub isin: String,
    pub website: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Registers the `X-Api-Key` header scheme so Swagger UI can authorize.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "ApiKey",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(
                    crate::auth::API_KEY_HEADER,
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::companies::list,
        crate::routes::companies::get_by_id,
        crate::routes::companies::get_by_isin,
        crate::routes::companies::create,
        crate::routes::companies::update,
        crate::routes::companies::delete,
    ),
    components(
        schemas(
            HealthResponse,
            CreateCompanyDoc,
            UpdateCompanyDoc,
            CompanyDoc,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health"),
        (name = "companies", description = "Company registry CRUD")
    )
)]
pub struct ApiDoc;
