//! Constants used throughout the MediRank core crate.

/// Maximum number of candidate labels a single ranking call may consider.
pub const MAX_CANDIDATES: usize = 100;

/// Dosage text returned when no age rule of a medication covers the patient's age.
pub const NO_DOSAGE_RULE_FOUND: &str = "No dosage rule found";

/// Default location of the default candidate disease list.
pub const DEFAULT_DISEASES_FILE: &str = "data/diseases.json";

/// Default location of the disease/medication dosage catalog.
pub const DEFAULT_MEDICATION_CATALOG_FILE: &str = "data/medications.yaml";

/// Default zero-shot classification endpoint.
pub const DEFAULT_ORACLE_URL: &str =
    "https://api-inference.huggingface.co/models/cross-encoder/nli-deberta-v3-small";

/// Default upper bound on a single ranking oracle call, in seconds.
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 30;
