//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the core services. Request
//! handling never reads environment variables, so every request sees the same settings.

use crate::constants::{DEFAULT_ORACLE_TIMEOUT_SECS, DEFAULT_ORACLE_URL};
use crate::{TriageError, TriageResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Which ranking oracle implementation the service talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OracleBackend {
    /// Remote zero-shot classification endpoint over HTTP.
    Http,
    /// Offline token-overlap scorer.
    Lexical,
}

impl FromStr for OracleBackend {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(OracleBackend::Http),
            "lexical" => Ok(OracleBackend::Lexical),
            other => Err(TriageError::InvalidConfig(format!(
                "unknown oracle backend '{other}' (expected 'http' or 'lexical')"
            ))),
        }
    }
}

/// Settings for the ranking oracle.
#[derive(Clone, Debug)]
pub struct OracleConfig {
    pub backend: OracleBackend,
    pub url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            backend: OracleBackend::Http,
            url: DEFAULT_ORACLE_URL.into(),
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_ORACLE_TIMEOUT_SECS),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    diseases_file: PathBuf,
    medication_catalog_file: PathBuf,
    oracle: OracleConfig,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidConfig` if the oracle URL is empty or the timeout is zero.
    pub fn new(
        diseases_file: PathBuf,
        medication_catalog_file: PathBuf,
        oracle: OracleConfig,
    ) -> TriageResult<Self> {
        if oracle.backend == OracleBackend::Http && oracle.url.trim().is_empty() {
            return Err(TriageError::InvalidConfig("ORACLE_URL cannot be empty".into()));
        }
        if oracle.timeout.is_zero() {
            return Err(TriageError::InvalidConfig(
                "oracle timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            diseases_file,
            medication_catalog_file,
            oracle,
        })
    }

    pub fn diseases_file(&self) -> &Path {
        &self.diseases_file
    }

    pub fn medication_catalog_file(&self) -> &Path {
        &self.medication_catalog_file
    }

    pub fn oracle(&self) -> &OracleConfig {
        &self.oracle
    }
}

/// Parse the oracle backend from an optional environment value.
///
/// `None` or blank selects the HTTP backend.
pub fn oracle_backend_from_env_value(value: Option<String>) -> TriageResult<OracleBackend> {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(v) => v.parse(),
        None => Ok(OracleBackend::Http),
    }
}

/// Parse the oracle timeout (whole seconds) from an optional environment value.
///
/// `None` or blank selects [`DEFAULT_ORACLE_TIMEOUT_SECS`].
pub fn oracle_timeout_from_env_value(value: Option<String>) -> TriageResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let secs = match value {
        Some(v) => v.parse::<u64>().map_err(|_| {
            TriageError::InvalidConfig(format!(
                "ORACLE_TIMEOUT_SECS must be a whole number of seconds, got '{v}'"
            ))
        })?,
        None => DEFAULT_ORACLE_TIMEOUT_SECS,
    };

    if secs == 0 {
        return Err(TriageError::InvalidConfig(
            "ORACLE_TIMEOUT_SECS must be greater than zero".into(),
        ));
    }

    Ok(Duration::from_secs(secs))
}
