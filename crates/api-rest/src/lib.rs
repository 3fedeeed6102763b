//! # API REST
//!
//! REST API implementation for MediRank.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS, request tracing)
//!
//! All domain behaviour lives in `medirank-core`.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod types;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::Json,
    routing::{get, post},
    Router,
};
use medirank_core::{IcdCode, PatientInput, PatientProfile, TriageService};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::{ApiError, ErrorBody, ErrorDetail};
use types::{
    ClassifyReq, ClassifyRes, DosageReq, DosageRes, HealthRes, MedicationDosageRes, PredictionRes,
};

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    service: TriageService,
}

impl AppState {
    pub fn new(service: TriageService) -> Self {
        Self { service }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, predict, dosage_query, dosage_body),
    components(schemas(
        HealthRes,
        ClassifyReq,
        ClassifyRes,
        PredictionRes,
        DosageReq,
        DosageRes,
        MedicationDosageRes,
        ErrorBody,
        ErrorDetail,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with OpenAPI documentation, CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/dosage", get(dosage_query).post(dosage_body))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: format!(
            "MediRank is alive (oracle: {}, default diseases: {}, catalog diseases: {})",
            state.service.oracle_name(),
            state.service.default_candidates().len(),
            state.service.catalog().len()
        ),
    })
}

#[utoipa::path(
    post,
    path = "/predict",
    request_body = ClassifyReq,
    responses(
        (status = 200, description = "Diseases ranked by score", body = ClassifyRes),
        (status = 400, description = "Invalid input or more than 100 candidate diseases", body = ErrorBody),
        (status = 502, description = "Ranking oracle failed", body = ErrorBody),
        (status = 504, description = "Ranking oracle timed out", body = ErrorBody)
    )
)]
/// Rank candidate diseases against reported symptoms
///
/// Structured vitals are rendered into the prompt ahead of the symptoms. The caller's
/// `candidateLabels` are ranked when given, otherwise the default disease list is used.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - a field fails validation,
/// - more than 100 candidate diseases would be ranked.
///
/// Returns `502 Bad Gateway` or `504 Gateway Timeout` if the ranking oracle fails or is too slow.
#[axum::debug_handler]
async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyReq>, JsonRejection>,
) -> Result<Json<ClassifyRes>, ApiError> {
    let Json(req) = payload?;
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("predict", %request_id);

    async move {
        let profile = PatientProfile::try_from(PatientInput::from(req))?;
        let classification = state.service.classify(&profile).await?;

        tracing::info!(
            candidates = classification.ranking.len(),
            predicted = classification.predicted_disease().unwrap_or_default(),
            "classification complete"
        );

        ClassifyRes::from_classification(classification)
            .map(Json)
            .ok_or_else(|| ApiError::Internal("ranking oracle returned no predictions".into()))
    }
    .instrument(span)
    .await
}

#[utoipa::path(
    get,
    path = "/dosage",
    params(DosageReq),
    responses(
        (status = 200, description = "Dosage for every medication of the disease", body = DosageRes),
        (status = 400, description = "Bad request", body = ErrorBody),
        (status = 404, description = "Unknown ICD code", body = ErrorBody),
        (status = 500, description = "Malformed dosage rule in the catalog", body = ErrorBody)
    )
)]
/// Resolve age-appropriate dosages for a disease, by query string
///
/// `GET /dosage?icd=J45&age=5`
#[axum::debug_handler]
async fn dosage_query(
    State(state): State<AppState>,
    query: Result<Query<DosageReq>, QueryRejection>,
) -> Result<Json<DosageRes>, ApiError> {
    let Query(req) = query?;
    resolve_dosage(&state, req).map(Json)
}

#[utoipa::path(
    post,
    path = "/dosage",
    request_body = DosageReq,
    responses(
        (status = 200, description = "Dosage for every medication of the disease", body = DosageRes),
        (status = 400, description = "Bad request", body = ErrorBody),
        (status = 404, description = "Unknown ICD code", body = ErrorBody),
        (status = 500, description = "Malformed dosage rule in the catalog", body = ErrorBody)
    )
)]
/// Resolve age-appropriate dosages for a disease, by JSON body
#[axum::debug_handler]
async fn dosage_body(
    State(state): State<AppState>,
    payload: Result<Json<DosageReq>, JsonRejection>,
) -> Result<Json<DosageRes>, ApiError> {
    let Json(req) = payload?;
    resolve_dosage(&state, req).map(Json)
}

fn resolve_dosage(state: &AppState, req: DosageReq) -> Result<DosageRes, ApiError> {
    let icd = IcdCode::parse(&req.icd).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if req.age < 0 {
        return Err(ApiError::BadRequest("age cannot be negative".into()));
    }

    match state.service.resolve_dosage(&icd, req.age) {
        Ok(rec) => Ok(rec.into()),
        Err(e) => {
            tracing::warn!(icd = %icd, age = req.age, "dosage lookup failed: {}", e);
            Err(e.into())
        }
    }
}
