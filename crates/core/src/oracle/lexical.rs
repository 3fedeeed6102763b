use super::{OracleFuture, OracleScores, RankingOracle};
use std::collections::HashSet;

/// Offline oracle scoring labels by word overlap with the prompt.
///
/// A label's raw score is the fraction of its words that appear in the prompt. Raw scores are
/// divided by their sum so they add up to 1; when no label shares a word with the prompt every
/// label gets the same score. Output is ordered by score, ties in candidate order.
///
/// Useful for development and for running without network access. It has no clinical value.
#[derive(Clone, Copy, Debug, Default)]
pub struct LexicalOracle;

impl LexicalOracle {
    pub fn new() -> Self {
        Self
    }

    /// Scores `candidates` against `prompt` synchronously.
    pub fn score(&self, prompt: &str, candidates: &[String]) -> OracleScores {
        let prompt_words: HashSet<String> = words(prompt).collect();

        let raw: Vec<f64> = candidates
            .iter()
            .map(|label| {
                let label_words: HashSet<String> = words(label).collect();
                if label_words.is_empty() {
                    return 0.0;
                }
                let hits = label_words.intersection(&prompt_words).count();
                hits as f64 / label_words.len() as f64
            })
            .collect();

        let total: f64 = raw.iter().sum();
        let normalised: Vec<f64> = if total > 0.0 {
            raw.iter().map(|s| s / total).collect()
        } else {
            vec![1.0 / candidates.len().max(1) as f64; candidates.len()]
        };

        let mut scored: Vec<(String, f64)> = candidates.iter().cloned().zip(normalised).collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let (labels, scores) = scored.into_iter().unzip();
        OracleScores { labels, scores }
    }
}

impl RankingOracle for LexicalOracle {
    fn name(&self) -> &'static str {
        "lexical"
    }

    fn rank<'a>(&'a self, prompt: &'a str, candidates: &'a [String]) -> OracleFuture<'a> {
        let scores = self.score(prompt, candidates);
        Box::pin(async move { Ok(scores) })
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(str::to_lowercase)
}
