use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("disease list too long: {count} labels supplied (max {max} allowed)")]
    TooManyCandidates { count: usize, max: usize },
    #[error("no candidate labels supplied and the default disease list is empty")]
    EmptyCandidateSet,

    #[error("ranking oracle invocation failed: {0}")]
    OracleInvocation(String),
    #[error("ranking oracle returned {labels} labels and {scores} scores for {candidates} candidates")]
    OracleShapeMismatch {
        candidates: usize,
        labels: usize,
        scores: usize,
    },
    #[error("ranking oracle returned label '{label}', which is not one of the remaining candidates")]
    OracleLabelMismatch { label: String },
    #[error("ranking oracle returned a non-numeric score for '{label}'")]
    OracleNonNumericScore { label: String },
    #[error("ranking oracle did not answer within {0:?}")]
    OracleTimeout(Duration),

    #[error("malformed age range '{range}': {reason}")]
    RuleFormat { range: String, reason: &'static str },
    #[error("no disease record found for ICD code '{0}'")]
    NotFound(String),

    #[error("failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse JSON in {}: {source}", .path.display())]
    JsonDeserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse YAML in {}: {source}", .path.display())]
    YamlDeserialization {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unsupported data file extension for {} (expected .json, .yaml or .yml)", .path.display())]
    UnsupportedFileFormat { path: PathBuf },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TriageError {
    /// True for errors caused by the request itself rather than by the service or its data.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TriageError::InvalidInput(_)
                | TriageError::TooManyCandidates { .. }
                | TriageError::NotFound(_)
        )
    }

    /// True for every failure of the ranking oracle call, including malformed output.
    pub fn is_oracle_error(&self) -> bool {
        matches!(
            self,
            TriageError::OracleInvocation(_)
                | TriageError::OracleShapeMismatch { .. }
                | TriageError::OracleLabelMismatch { .. }
                | TriageError::OracleNonNumericScore { .. }
                | TriageError::OracleTimeout(_)
        )
    }
}

impl From<medirank_types::ValueError> for TriageError {
    fn from(err: medirank_types::ValueError) -> Self {
        TriageError::InvalidInput(err.to_string())
    }
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;
