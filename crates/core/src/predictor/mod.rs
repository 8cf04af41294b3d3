//! Prediction services: the in-process rule engine and adapters for external
//! prediction backends that fall back to it.

pub mod command;
pub mod fallback;
pub mod http;
pub mod output;

use crate::config::Settings;
use crate::domain::recommendation::RecommendationResult;
use crate::domain::snapshot::FinancialSnapshot;
use crate::engine;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Which backend actually produced `result`.
    pub provider: &'static str,
    pub result: RecommendationResult,
}

#[async_trait::async_trait]
pub trait PredictionService: Send + Sync {
    fn provider(&self) -> &'static str;

    async fn predict(&self, snapshot: &FinancialSnapshot) -> anyhow::Result<Prediction>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEnginePredictor;

#[async_trait::async_trait]
impl PredictionService for RuleEnginePredictor {
    fn provider(&self) -> &'static str {
        "rule_engine"
    }

    async fn predict(&self, snapshot: &FinancialSnapshot) -> anyhow::Result<Prediction> {
        Ok(Prediction {
            provider: self.provider(),
            result: engine::evaluate(snapshot),
        })
    }
}

/// HTTP service if configured, else an external process, else the bare
/// engine. External backends always fall back to the engine.
pub fn from_settings(settings: &Settings) -> anyhow::Result<Arc<dyn PredictionService>> {
    if settings.prediction_service_url.is_some() {
        let primary = http::HttpPredictionService::from_settings(settings)?;
        tracing::info!(url = %primary.url(), "using external HTTP prediction service");
        return Ok(Arc::new(fallback::FallbackPredictor::new(Arc::new(primary))));
    }

    if settings.prediction_command.is_some() {
        let primary = command::CommandPredictionService::from_settings(settings)?;
        tracing::info!(program = %primary.program(), "using external prediction process");
        return Ok(Arc::new(fallback::FallbackPredictor::new(Arc::new(primary))));
    }

    tracing::info!("using in-process rule engine for predictions");
    Ok(Arc::new(RuleEnginePredictor))
}
