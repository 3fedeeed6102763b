//! Candidate label resolution.
//!
//! Each ranking call scores a bounded set of disease labels: the caller's own list when one is
//! supplied, otherwise the process-wide default list loaded at startup.

use crate::constants::MAX_CANDIDATES;
use crate::files::load_data_file;
use crate::{TriageError, TriageResult};
use std::path::Path;
use std::sync::Arc;

/// The default disease labels, loaded once and shared read-only between requests.
#[derive(Clone, Debug, Default)]
pub struct DefaultCandidates(Arc<[String]>);

impl DefaultCandidates {
    pub fn new(labels: Vec<String>) -> Self {
        Self(labels.into())
    }

    /// Loads the default list from a JSON or YAML array of strings.
    ///
    /// A list longer than [`MAX_CANDIDATES`] is accepted but logged, since every request relying
    /// on it will be rejected.
    ///
    /// # Errors
    ///
    /// Returns a `TriageError` if the file cannot be read or parsed, or
    /// `TriageError::InvalidConfig` if it holds no labels.
    pub fn load(path: &Path) -> TriageResult<Self> {
        let labels: Vec<String> = load_data_file(path)?;

        if labels.is_empty() {
            return Err(TriageError::InvalidConfig(format!(
                "default disease list {} is empty",
                path.display()
            )));
        }

        if labels.len() > MAX_CANDIDATES {
            tracing::warn!(
                count = labels.len(),
                max = MAX_CANDIDATES,
                "default disease list exceeds the candidate limit; requests without their own labels will be rejected"
            );
        }
        tracing::info!(count = labels.len(), path = %path.display(), "loaded default disease list");

        Ok(Self::new(labels))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolves the labels to rank for one request.
///
/// A non-empty `supplied` list wins; otherwise the defaults are used. Labels are passed through
/// unchanged: duplicates and empty strings are the caller's responsibility.
///
/// # Errors
///
/// Returns `TriageError::TooManyCandidates` when the resolved set exceeds [`MAX_CANDIDATES`] and
/// `TriageError::EmptyCandidateSet` when there is nothing to rank.
pub fn resolve_candidates<'a>(
    supplied: &'a [String],
    defaults: &'a DefaultCandidates,
) -> TriageResult<&'a [String]> {
    let resolved = if supplied.is_empty() {
        defaults.as_slice()
    } else {
        supplied
    };

    if resolved.len() > MAX_CANDIDATES {
        return Err(TriageError::TooManyCandidates {
            count: resolved.len(),
            max: MAX_CANDIDATES,
        });
    }
    if resolved.is_empty() {
        return Err(TriageError::EmptyCandidateSet);
    }

    Ok(resolved)
}
