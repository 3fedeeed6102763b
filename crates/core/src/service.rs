//! Triage service.
//!
//! Ties the pipeline stages together for the two request kinds:
//! - classification: profile → prompt → candidate set → ranking oracle → ranked predictions,
//! - dosage: ICD code → catalog record → dosage rule per medication.
//!
//! The service holds only read-only data and is cheap to clone; concurrent requests share it
//! without locking.

use crate::candidates::{resolve_candidates, DefaultCandidates};
use crate::catalog::{DosageRecommendation, MedicationCatalog};
use crate::oracle::{rank_candidates, RankedPrediction, RankingOracle};
use crate::patient::PatientProfile;
use crate::TriageResult;
use medirank_types::IcdCode;
use std::sync::Arc;
use std::time::Duration;

/// Result of one classification request.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    /// The prompt that was sent to the oracle.
    pub prompt: String,
    pub ranking: RankedPrediction,
}

impl Classification {
    /// Label of the highest-scoring prediction.
    pub fn predicted_disease(&self) -> Option<&str> {
        self.ranking.top().map(|p| p.label.as_str())
    }
}

#[derive(Clone)]
pub struct TriageService {
    defaults: DefaultCandidates,
    catalog: Arc<MedicationCatalog>,
    oracle: Arc<dyn RankingOracle>,
    oracle_timeout: Duration,
}

impl TriageService {
    /// Creates a new instance of TriageService.
    pub fn new(
        defaults: DefaultCandidates,
        catalog: Arc<MedicationCatalog>,
        oracle: Arc<dyn RankingOracle>,
        oracle_timeout: Duration,
    ) -> Self {
        Self {
            defaults,
            catalog,
            oracle,
            oracle_timeout,
        }
    }

    pub fn default_candidates(&self) -> &DefaultCandidates {
        &self.defaults
    }

    pub fn catalog(&self) -> &MedicationCatalog {
        &self.catalog
    }

    pub fn oracle_name(&self) -> &'static str {
        self.oracle.name()
    }

    /// Ranks candidate diseases for a patient.
    ///
    /// The candidate set is resolved and checked before the oracle is contacted, so an oversized
    /// or empty set never reaches it.
    ///
    /// # Errors
    ///
    /// Returns a `TriageError` if:
    /// - the candidate set is too large or empty,
    /// - the oracle fails, times out or returns malformed scores.
    pub async fn classify(&self, profile: &PatientProfile) -> TriageResult<Classification> {
        let prompt = profile.build_prompt();
        let candidates = resolve_candidates(profile.candidate_labels(), &self.defaults)?;

        tracing::debug!(
            oracle = self.oracle.name(),
            candidates = candidates.len(),
            "invoking ranking oracle"
        );
        let ranking =
            rank_candidates(self.oracle.as_ref(), &prompt, candidates, self.oracle_timeout).await?;

        Ok(Classification { prompt, ranking })
    }

    /// Resolves dosages for every medication of the disease coded `icd_code` at `age`.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::NotFound` for an unknown code and `TriageError::RuleFormat` when a
    /// catalog rule cannot be parsed.
    pub fn resolve_dosage(&self, icd_code: &IcdCode, age: i64) -> TriageResult<DosageRecommendation> {
        self.catalog.recommend(icd_code, age)
    }
}
