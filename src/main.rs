use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use medirank_core::config::{oracle_backend_from_env_value, oracle_timeout_from_env_value};
use medirank_core::constants::{
    DEFAULT_DISEASES_FILE, DEFAULT_MEDICATION_CATALOG_FILE, DEFAULT_ORACLE_URL,
};
use medirank_core::{CoreConfig, OracleConfig};

/// Main entry point for the MediRank application
///
/// Loads the default disease list and the medication catalog once, builds the ranking oracle and
/// serves the REST API until interrupted.
///
/// # Environment Variables
/// - `MEDIRANK_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `DISEASES_FILE`: default candidate diseases (default: "data/diseases.json")
/// - `MEDICATION_CATALOG_FILE`: disease/medication catalog (default: "data/medications.yaml")
/// - `ORACLE_BACKEND`: `http` (default) or `lexical`
/// - `ORACLE_URL`: zero-shot classification endpoint
/// - `ORACLE_API_TOKEN`: optional bearer token for the endpoint
/// - `ORACLE_TIMEOUT_SECS`: upper bound on one oracle call (default: 30)
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, data loading or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medirank=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("MEDIRANK_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let cfg = core_config_from_env()?;

    let service = medirank_core::load_service(&cfg)?;
    let app = api_rest::router(AppState::new(service));

    tracing::info!("++ Starting MediRank REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("MediRank REST stopped");
    Ok(())
}

fn core_config_from_env() -> anyhow::Result<CoreConfig> {
    let diseases_file = std::env::var("DISEASES_FILE")
        .unwrap_or_else(|_| DEFAULT_DISEASES_FILE.into());
    let medication_catalog_file = std::env::var("MEDICATION_CATALOG_FILE")
        .unwrap_or_else(|_| DEFAULT_MEDICATION_CATALOG_FILE.into());

    let oracle = OracleConfig {
        backend: oracle_backend_from_env_value(std::env::var("ORACLE_BACKEND").ok())?,
        url: std::env::var("ORACLE_URL").unwrap_or_else(|_| DEFAULT_ORACLE_URL.into()),
        api_token: std::env::var("ORACLE_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty()),
        timeout: oracle_timeout_from_env_value(std::env::var("ORACLE_TIMEOUT_SECS").ok())?,
    };

    Ok(CoreConfig::new(
        PathBuf::from(diseases_file),
        PathBuf::from(medication_catalog_file),
        oracle,
    )?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
