use super::{OracleFuture, OracleScores, RankingOracle};
use crate::{TriageError, TriageResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Zero-shot classification over HTTP.
///
/// Speaks the Hugging Face inference protocol: the prompt is posted as `inputs` with the candidate
/// labels under `parameters`, and the answer carries `labels` and `scores` in matching order.
pub struct HttpZeroShotOracle {
    endpoint: String,
    api_token: Option<String>,
    client: reqwest::Client,
}

impl HttpZeroShotOracle {
    /// Creates a client for `endpoint`.
    ///
    /// `connect_timeout` only bounds establishing the connection; the whole call is bounded by
    /// the caller of [`RankingOracle::rank`].
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidConfig` if the HTTP client cannot be built.
    pub fn new(
        endpoint: &str,
        api_token: Option<String>,
        connect_timeout: Duration,
    ) -> TriageResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TriageError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.trim().to_string(),
            api_token: api_token.filter(|t| !t.trim().is_empty()),
            client,
        })
    }

    async fn classify(&self, prompt: &str, candidates: &[String]) -> TriageResult<OracleScores> {
        let body = ZeroShotRequest {
            inputs: prompt,
            parameters: ZeroShotParameters {
                candidate_labels: candidates,
                multi_label: false,
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TriageError::OracleInvocation(format!("connecting to {} timed out", self.endpoint))
            } else if e.is_connect() {
                TriageError::OracleInvocation(format!("could not connect to {}", self.endpoint))
            } else {
                TriageError::OracleInvocation(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TriageError::OracleInvocation(format!(
                "oracle responded with status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: ZeroShotBody = response
            .json()
            .await
            .map_err(|e| TriageError::OracleInvocation(format!("malformed oracle response: {e}")))?;

        parsed.into_scores()
    }
}

impl RankingOracle for HttpZeroShotOracle {
    fn name(&self) -> &'static str {
        "http-zero-shot"
    }

    fn rank<'a>(&'a self, prompt: &'a str, candidates: &'a [String]) -> OracleFuture<'a> {
        Box::pin(self.classify(prompt, candidates))
    }
}

#[derive(Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [String],
    multi_label: bool,
}

#[derive(Deserialize)]
struct ZeroShotResponse {
    labels: Vec<String>,
    scores: Vec<f64>,
}

/// Some deployments wrap the single result in a one-element array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ZeroShotBody {
    Single(ZeroShotResponse),
    Batch(Vec<ZeroShotResponse>),
}

impl ZeroShotBody {
    fn into_scores(self) -> TriageResult<OracleScores> {
        let response = match self {
            ZeroShotBody::Single(r) => r,
            ZeroShotBody::Batch(mut batch) => {
                if batch.len() != 1 {
                    return Err(TriageError::OracleInvocation(format!(
                        "expected one classification result, got {}",
                        batch.len()
                    )));
                }
                batch.remove(0)
            }
        };

        Ok(OracleScores {
            labels: response.labels,
            scores: response.scores,
        })
    }
}
