//! Ranking oracle boundary.
//!
//! The classifier that scores disease labels against a prompt is opaque to the service. Anything
//! implementing [`RankingOracle`] can back the classification pipeline; the adapter in this module
//! checks the oracle's answer and turns it into a [`RankedPrediction`].
//!
//! The adapter never retries, caches, clamps or normalises. Scores are passed through exactly as
//! the oracle produced them.

mod http;
mod lexical;

pub use http::HttpZeroShotOracle;
pub use lexical::LexicalOracle;

use crate::{TriageError, TriageResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Future returned by [`RankingOracle::rank`].
pub type OracleFuture<'a> = Pin<Box<dyn Future<Output = TriageResult<OracleScores>> + Send + 'a>>;

/// Raw oracle output: labels with their scores, position for position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OracleScores {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

/// A text classifier that scores every candidate label against a prompt.
pub trait RankingOracle: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    /// Scores each of `candidates` against `prompt`.
    ///
    /// Implementations report their own failures as `TriageError::OracleInvocation`.
    fn rank<'a>(&'a self, prompt: &'a str, candidates: &'a [String]) -> OracleFuture<'a>;
}

/// One scored label.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

/// Labels with scores, ordered from highest to lowest score.
///
/// Equal scores keep the order the oracle returned them in.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedPrediction {
    predictions: Vec<Prediction>,
}

impl RankedPrediction {
    /// Validates oracle output against the candidates it was asked to score and sorts it.
    ///
    /// # Errors
    ///
    /// Returns a `TriageError` if:
    /// - the number of labels or scores differs from the number of candidates,
    /// - the labels are not exactly the candidates (a foreign or repeated label),
    /// - any score is NaN or infinite.
    pub fn from_scores(candidates: &[String], output: OracleScores) -> TriageResult<Self> {
        let OracleScores { labels, scores } = output;

        if labels.len() != candidates.len() || scores.len() != candidates.len() {
            return Err(TriageError::OracleShapeMismatch {
                candidates: candidates.len(),
                labels: labels.len(),
                scores: scores.len(),
            });
        }

        let mut remaining: HashMap<&str, usize> = HashMap::with_capacity(candidates.len());
        for candidate in candidates {
            *remaining.entry(candidate.as_str()).or_default() += 1;
        }
        for label in &labels {
            match remaining.get_mut(label.as_str()) {
                Some(count) if *count > 0 => *count -= 1,
                _ => return Err(TriageError::OracleLabelMismatch { label: label.clone() }),
            }
        }

        let mut predictions = Vec::with_capacity(labels.len());
        for (label, score) in labels.into_iter().zip(scores) {
            if !score.is_finite() {
                return Err(TriageError::OracleNonNumericScore { label });
            }
            predictions.push(Prediction { label, score });
        }

        // Stable sort, so ties stay in oracle order.
        predictions.sort_by(|a, b| b.score.total_cmp(&a.score));

        Ok(Self { predictions })
    }

    /// The highest-scoring prediction.
    pub fn top(&self) -> Option<&Prediction> {
        self.predictions.first()
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    pub fn into_predictions(self) -> Vec<Prediction> {
        self.predictions
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

/// Invokes `oracle` once, bounded by `timeout`, and adapts the result.
///
/// # Errors
///
/// Returns `TriageError::OracleTimeout` if the oracle does not answer in time, any error the
/// oracle raised, or a validation error from [`RankedPrediction::from_scores`].
pub async fn rank_candidates(
    oracle: &dyn RankingOracle,
    prompt: &str,
    candidates: &[String],
    timeout: Duration,
) -> TriageResult<RankedPrediction> {
    let output = tokio::time::timeout(timeout, oracle.rank(prompt, candidates))
        .await
        .map_err(|_| TriageError::OracleTimeout(timeout))??;

    RankedPrediction::from_scores(candidates, output)
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedOracle;
    use super::*;

    fn candidates(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_from_scores_sorts_descending() {
        let cands = candidates(&["Asthma", "Influenza", "Migraine"]);
        let ranked = RankedPrediction::from_scores(
            &cands,
            OracleScores {
                labels: cands.clone(),
                scores: vec![0.2, 0.7, 0.1],
            },
        )
        .unwrap();

        let order: Vec<&str> = ranked.predictions().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(order, ["Influenza", "Asthma", "Migraine"]);
        assert_eq!(ranked.top().unwrap().label, "Influenza");
        assert_eq!(ranked.len(), cands.len());
    }

    #[test]
    fn test_from_scores_keeps_oracle_order_for_ties() {
        let cands = candidates(&["b", "a", "c"]);
        let ranked = RankedPrediction::from_scores(
            &cands,
            OracleScores {
                labels: candidates(&["b", "a", "c"]),
                scores: vec![0.4, 0.4, 0.2],
            },
        )
        .unwrap();

        let order: Vec<&str> = ranked.predictions().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(order, ["b", "a", "c"]);
    }

    #[test]
    fn test_from_scores_passes_scores_through_unclamped() {
        let cands = candidates(&["x", "y"]);
        let ranked = RankedPrediction::from_scores(
            &cands,
            OracleScores {
                labels: cands.clone(),
                scores: vec![1.7, -0.3],
            },
        )
        .unwrap();

        let scores: Vec<f64> = ranked.predictions().iter().map(|p| p.score).collect();
        assert_eq!(scores, [1.7, -0.3]);
    }

    #[test]
    fn test_from_scores_rejects_count_mismatch() {
        let cands = candidates(&["x", "y", "z"]);
        let err = RankedPrediction::from_scores(
            &cands,
            OracleScores {
                labels: candidates(&["x", "y"]),
                scores: vec![0.5, 0.5],
            },
        )
        .expect_err("two answers for three candidates");
        assert!(matches!(
            err,
            TriageError::OracleShapeMismatch { candidates: 3, labels: 2, scores: 2 }
        ));
        assert!(err.is_oracle_error());
    }

    #[test]
    fn test_from_scores_rejects_foreign_labels() {
        let cands = candidates(&["A", "B"]);
        let err = RankedPrediction::from_scores(
            &cands,
            OracleScores {
                labels: candidates(&["A", "Z"]),
                scores: vec![0.6, 0.4],
            },
        )
        .expect_err("Z was never a candidate");
        assert!(matches!(&err, TriageError::OracleLabelMismatch { label } if label == "Z"));
        assert!(err.is_oracle_error());
    }

    #[test]
    fn test_from_scores_rejects_repeated_labels() {
        let cands = candidates(&["A", "B"]);
        let err = RankedPrediction::from_scores(
            &cands,
            OracleScores {
                labels: candidates(&["A", "A"]),
                scores: vec![0.6, 0.4],
            },
        )
        .expect_err("A answered twice, B missing");
        assert!(matches!(err, TriageError::OracleLabelMismatch { label } if label == "A"));
    }

    #[test]
    fn test_from_scores_accepts_duplicate_candidates_answered_once_each() {
        let cands = candidates(&["A", "A", "B"]);
        let ranked = RankedPrediction::from_scores(
            &cands,
            OracleScores {
                labels: candidates(&["B", "A", "A"]),
                scores: vec![0.5, 0.3, 0.2],
            },
        )
        .unwrap();
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_from_scores_rejects_nan() {
        let cands = candidates(&["x", "y"]);
        let err = RankedPrediction::from_scores(
            &cands,
            OracleScores {
                labels: cands.clone(),
                scores: vec![0.5, f64::NAN],
            },
        )
        .expect_err("NaN is not a score");
        assert!(matches!(err, TriageError::OracleNonNumericScore { label } if label == "y"));
    }

    #[tokio::test]
    async fn test_rank_candidates_calls_oracle_once() {
        let oracle = ScriptedOracle::answering(&["Asthma", "Influenza"], &[0.9, 0.1]);
        let cands = candidates(&["Influenza", "Asthma"]);

        let ranked = rank_candidates(&oracle, "wheezing", &cands, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(oracle.calls(), 1);
        assert_eq!(ranked.top().unwrap().label, "Asthma");
    }

    #[tokio::test]
    async fn test_rank_candidates_surfaces_oracle_failure() {
        let oracle = ScriptedOracle::failing("model crashed");
        let cands = candidates(&["Asthma"]);

        let err = rank_candidates(&oracle, "wheezing", &cands, Duration::from_secs(1))
            .await
            .expect_err("oracle failure");
        assert!(matches!(err, TriageError::OracleInvocation(msg) if msg == "model crashed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rank_candidates_times_out() {
        let oracle = ScriptedOracle::answering(&["Asthma"], &[1.0]).delayed(Duration::from_secs(60));
        let cands = candidates(&["Asthma"]);

        let err = rank_candidates(&oracle, "wheezing", &cands, Duration::from_millis(50))
            .await
            .expect_err("slow oracle");
        assert!(matches!(err, TriageError::OracleTimeout(d) if d == Duration::from_millis(50)));
    }
}
