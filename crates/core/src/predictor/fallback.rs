use crate::domain::snapshot::FinancialSnapshot;
use crate::predictor::{Prediction, PredictionService, RuleEnginePredictor};
use std::sync::Arc;

/// Answers from `primary` when it can, otherwise from the in-process engine.
pub struct FallbackPredictor {
    primary: Arc<dyn PredictionService>,
    fallback: RuleEnginePredictor,
}

impl FallbackPredictor {
    pub fn new(primary: Arc<dyn PredictionService>) -> Self {
        Self {
            primary,
            fallback: RuleEnginePredictor,
        }
    }
}

#[async_trait::async_trait]
impl PredictionService for FallbackPredictor {
    fn provider(&self) -> &'static str {
        self.primary.provider()
    }

    async fn predict(&self, snapshot: &FinancialSnapshot) -> anyhow::Result<Prediction> {
        match self.primary.predict(snapshot).await {
            Ok(prediction) => Ok(prediction),
            Err(err) => {
                tracing::warn!(
                    primary = self.primary.provider(),
                    fallback = self.fallback.provider(),
                    error = %format!("{err:#}"),
                    "external prediction failed; falling back to rule engine"
                );
                self.fallback.predict(snapshot).await
            }
        }
    }
}
