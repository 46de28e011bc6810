use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Secret loaded once at startup and injected as router state; the guard
/// performs no lookups at request time.
#[derive(Clone)]
pub struct ApiKeyConfig {
    pub api_key: String,
}

/// Middleware: compare `X-Api-Key` against the configured secret. Applied to
/// the `/api` routes only; root, health and the docs paths stay exempt.
pub async fn require_api_key(
    State(cfg): State<ApiKeyConfig>,
    req: Request,
    next: Next,
) -> Response {
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        None => (StatusCode::UNAUTHORIZED, "API Key is missing").into_response(),
        Some(key) if key != cfg.api_key => {
            (StatusCode::UNAUTHORIZED, "Invalid API Key").into_response()
        }
        Some(_) => next.run(req).await,
    }
}
