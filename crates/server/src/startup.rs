use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::company::{CompanyRepository, CompanyService, SeaOrmCompanyRepository};

use crate::auth::ApiKeyConfig;
use crate::routes::{self, AppState};
use crate::seed;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: load config, prepare the store, build the app and serve.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_default();

    // One immutable config at process start; pieces are injected below,
    // nothing reads the environment at request time.
    let cfg = configs::AppConfig::load_and_validate()?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("database migrated");

    let repo: Arc<dyn CompanyRepository> = Arc::new(SeaOrmCompanyRepository::new(db));
    let companies = Arc::new(CompanyService::new(repo));
    seed::seed_if_empty(&companies).await?;

    let state = AppState {
        companies,
        api: ApiKeyConfig { api_key: cfg.api.api_key.clone() },
    };

    let app: Router = routes::build_router(state, build_cors());

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting company registry server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
