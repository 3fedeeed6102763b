//! # MediRank Core
//!
//! Core logic for the MediRank triage service.
//!
//! This crate contains the pure request pipelines and the read-only data they work on:
//! - Patient profiles and the classification prompt built from them
//! - Candidate label resolution with the per-request size limit
//! - The ranking oracle boundary and its HTTP and lexical backends
//! - Age-based dosage rules and the disease/medication catalog
//!
//! **No API concerns**: HTTP routing, request/response bodies and status codes belong in
//! `api-rest`.

pub mod candidates;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod dosage;
pub mod error;
pub mod files;
pub mod oracle;
pub mod patient;
pub mod service;
pub mod validation;

pub use candidates::{resolve_candidates, DefaultCandidates};
pub use catalog::{DiseaseRecord, DosageRecommendation, Medication, MedicationCatalog, MedicationDosage};
pub use config::{CoreConfig, OracleBackend, OracleConfig};
pub use constants::{MAX_CANDIDATES, NO_DOSAGE_RULE_FOUND};
pub use dosage::{resolve_dosage, AgeDosageRule, AgeRange};
pub use error::{TriageError, TriageResult};
pub use oracle::{
    HttpZeroShotOracle, LexicalOracle, OracleScores, Prediction, RankedPrediction, RankingOracle,
};
pub use patient::{PatientInput, PatientProfile};
pub use service::{Classification, TriageService};

pub use medirank_types::{BloodPressure, Gender, IcdCode, ValueError};

use std::sync::Arc;

/// Builds the ranking oracle selected by `cfg`.
///
/// # Errors
///
/// Returns `TriageError::InvalidConfig` if the HTTP client cannot be constructed.
pub fn build_oracle(cfg: &OracleConfig) -> TriageResult<Arc<dyn RankingOracle>> {
    match cfg.backend {
        OracleBackend::Http => Ok(Arc::new(HttpZeroShotOracle::new(
            &cfg.url,
            cfg.api_token.clone(),
            cfg.timeout,
        )?)),
        OracleBackend::Lexical => Ok(Arc::new(LexicalOracle::new())),
    }
}

/// Loads both data files named by `cfg` and assembles a [`TriageService`].
///
/// # Errors
///
/// Returns a `TriageError` if either file cannot be loaded or the oracle cannot be built.
pub fn load_service(cfg: &CoreConfig) -> TriageResult<TriageService> {
    let defaults = DefaultCandidates::load(cfg.diseases_file())?;
    let catalog = MedicationCatalog::load(cfg.medication_catalog_file())?;
    let oracle = build_oracle(cfg.oracle())?;

    tracing::info!(oracle = oracle.name(), "ranking oracle ready");

    Ok(TriageService::new(
        defaults,
        Arc::new(catalog),
        oracle,
        cfg.oracle().timeout,
    ))
}
