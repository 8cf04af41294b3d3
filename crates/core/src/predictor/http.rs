use crate::config::Settings;
use crate::domain::recommendation::RecommendationResult;
use crate::domain::snapshot::FinancialSnapshot;
use crate::predictor::{output, Prediction, PredictionService};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PATH: &str = "/predict";
const DEFAULT_RETRIES: u32 = 2;
const BASE_BACKOFF: Duration = Duration::from_millis(250);
const MAX_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct HttpPredictionService {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    path: String,
    retries: u32,
}

impl HttpPredictionService {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        path: impl Into<String>,
        timeout: Duration,
        retries: u32,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build prediction service http client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
            path: path.into(),
            retries: retries.max(1),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_prediction_service_url()?.to_string();
        let api_key = settings.prediction_service_api_key.clone();

        let timeout_secs = std::env::var("PREDICTION_SERVICE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("PREDICTION_SERVICE_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRIES);

        let path = std::env::var("PREDICTION_SERVICE_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PATH.to_string());

        Self::new(
            base_url,
            api_key,
            path,
            Duration::from_secs(timeout_secs),
            retries,
        )
    }

    pub fn url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };

        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        }
        Ok(headers)
    }

    async fn predict_once(&self, snapshot: &FinancialSnapshot) -> Result<RecommendationResult> {
        let res = self
            .http
            .post(self.url())
            .headers(self.headers()?)
            .json(snapshot)
            .send()
            .await
            .context("prediction service request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read prediction service response")?;

        if !status.is_success() {
            anyhow::bail!("prediction service HTTP {status}: {text}");
        }

        output::parse_result(&text)
    }
}

/// Doubles from 250ms per failed attempt, capped at 5s.
fn backoff_after(attempt: u32) -> Duration {
    let doublings = attempt.saturating_sub(1).min(5);
    (BASE_BACKOFF * (1 << doublings)).min(MAX_BACKOFF)
}

#[async_trait::async_trait]
impl PredictionService for HttpPredictionService {
    fn provider(&self) -> &'static str {
        "external_http"
    }

    async fn predict(&self, snapshot: &FinancialSnapshot) -> Result<Prediction> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.predict_once(snapshot).await {
                Ok(result) => {
                    return Ok(Prediction {
                        provider: self.provider(),
                        result,
                    })
                }
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = backoff_after(attempt);
                    tracing::warn!(attempt, ?backoff, error = %err, "prediction service call failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}
