//! LLM-backed financial analysis: deterministic metrics and prompts, with the
//! narrative delegated to an [`LlmClient`].

pub mod budget;
pub mod metrics;
pub mod prompts;

use crate::domain::contract::InvalidInput;
use crate::domain::recommendation::{Action, RiskLevel};
use crate::domain::snapshot::RiskProfile;
use crate::llm::{CompletionRequest, LlmClient};
use crate::predictor::PredictionService;
use anyhow::Context;
use budget::Transaction;
use chrono::{DateTime, Utc};
use metrics::{FinancialMetrics, FinancialProfile};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const ANALYSIS_TYPES: [&str; 3] = ["financial-analysis", "budget-advice", "investment-advice"];

/// Raw `{type, data}` body of an analysis request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisEnvelope {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisRequest {
    FinancialAnalysis(FinancialProfile),
    BudgetAdvice(Vec<Transaction>),
    InvestmentAdvice(InvestmentProfile),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentProfile {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub risk_tolerance: Option<RiskProfile>,
    #[serde(default, alias = "income")]
    pub annual_income: Option<f64>,
    #[serde(default)]
    pub financial_goals: Option<Vec<String>>,
    #[serde(default)]
    pub time_horizon: Option<String>,
}

impl AnalysisEnvelope {
    pub fn from_json_slice(body: &[u8]) -> Result<Self, InvalidInput> {
        serde_json::from_slice(body).map_err(|e| InvalidInput::Malformed(e.to_string()))
    }

    pub fn into_request(self) -> Result<AnalysisRequest, InvalidInput> {
        let (kind, data) = match (self.kind, self.data) {
            (Some(kind), Some(data)) if !data.is_null() => (kind, data),
            (kind, data) => {
                let mut missing = Vec::new();
                if kind.is_none() {
                    missing.push("type");
                }
                if data.map_or(true, |d| d.is_null()) {
                    missing.push("data");
                }
                return Err(InvalidInput::MissingFields(missing));
            }
        };

        let malformed = |e: serde_json::Error| InvalidInput::Malformed(format!("{kind}: {e}"));
        match kind.as_str() {
            "financial-analysis" => serde_json::from_value(data)
                .map(AnalysisRequest::FinancialAnalysis)
                .map_err(malformed),
            "budget-advice" => serde_json::from_value(data)
                .map(AnalysisRequest::BudgetAdvice)
                .map_err(malformed),
            "investment-advice" => serde_json::from_value(data)
                .map(AnalysisRequest::InvestmentAdvice)
                .map_err(malformed),
            other => Err(InvalidInput::Malformed(format!(
                "Invalid analysis type: {other} (expected one of {})",
                ANALYSIS_TYPES.join(", ")
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MlPrediction {
    pub action: Action,
    pub confidence: f64,
    pub reasoning: String,
    pub provider: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialAnalysis {
    pub analysis: String,
    pub recommendations: Vec<String>,
    pub risk_level: RiskLevel,
    pub score: u8,
    pub ml_prediction: Option<MlPrediction>,
    pub metrics: FinancialMetrics,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAdvice {
    pub advice: String,
    pub category_spending: BTreeMap<String, f64>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentAdvice {
    pub advice: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    FinancialAnalysis(FinancialAnalysis),
    BudgetAdvice(BudgetAdvice),
    InvestmentAdvice(InvestmentAdvice),
}

pub struct Analyst {
    llm: Arc<dyn LlmClient>,
    predictor: Arc<dyn PredictionService>,
}

impl Analyst {
    pub fn new(llm: Arc<dyn LlmClient>, predictor: Arc<dyn PredictionService>) -> Self {
        Self { llm, predictor }
    }

    pub async fn run(&self, req: AnalysisRequest) -> anyhow::Result<AnalysisResponse> {
        match req {
            AnalysisRequest::FinancialAnalysis(profile) => self
                .financial_analysis(&profile)
                .await
                .map(AnalysisResponse::FinancialAnalysis),
            AnalysisRequest::BudgetAdvice(transactions) => self
                .budget_advice(&transactions)
                .await
                .map(AnalysisResponse::BudgetAdvice),
            AnalysisRequest::InvestmentAdvice(profile) => self
                .investment_advice(&profile)
                .await
                .map(AnalysisResponse::InvestmentAdvice),
        }
    }

    pub async fn financial_analysis(
        &self,
        profile: &FinancialProfile,
    ) -> anyhow::Result<FinancialAnalysis> {
        let metrics = FinancialMetrics::from_profile(profile);
        let ml_prediction = self.predict(profile).await;

        let prompt = prompts::financial_analysis(
            profile,
            &metrics,
            ml_prediction.as_ref().map(|p| p.reasoning.as_str()),
        );
        let analysis = self
            .complete(prompt)
            .await
            .context("financial analysis generation failed")?;

        let rating = metrics::rate(&metrics);
        let recommendations = metrics::recommendations(
            profile,
            &metrics,
            ml_prediction.as_ref().map(|p| (p.action, p.confidence)),
        );

        Ok(FinancialAnalysis {
            analysis,
            recommendations,
            risk_level: rating.risk_level,
            score: rating.score,
            ml_prediction,
            metrics,
            generated_at: Utc::now(),
        })
    }

    pub async fn budget_advice(&self, transactions: &[Transaction]) -> anyhow::Result<BudgetAdvice> {
        let category_spending = budget::spending_by_category(transactions);
        let advice = self
            .complete(prompts::budget_advice(&category_spending))
            .await
            .context("budget advice generation failed")?;

        Ok(BudgetAdvice {
            advice,
            category_spending,
            generated_at: Utc::now(),
        })
    }

    pub async fn investment_advice(
        &self,
        profile: &InvestmentProfile,
    ) -> anyhow::Result<InvestmentAdvice> {
        let advice = self
            .complete(prompts::investment_advice(profile))
            .await
            .context("investment advice generation failed")?;

        Ok(InvestmentAdvice {
            advice,
            generated_at: Utc::now(),
        })
    }

    /// A failed prediction only drops the ML section from the analysis.
    async fn predict(&self, profile: &FinancialProfile) -> Option<MlPrediction> {
        let snapshot = profile.prediction_snapshot()?;
        match self.predictor.predict(&snapshot).await {
            Ok(prediction) => {
                let action = prediction.result.predicted_action;
                let confidence = prediction.result.confidence;
                Some(MlPrediction {
                    action,
                    confidence,
                    reasoning: format!(
                        "AI model recommends to {} with {:.1}% confidence",
                        action.phrase(),
                        confidence * 100.0
                    ),
                    provider: prediction.provider,
                })
            }
            Err(err) => {
                tracing::warn!(
                    provider = self.predictor.provider(),
                    error = %format!("{err:#}"),
                    "prediction failed; continuing analysis without it"
                );
                None
            }
        }
    }

    async fn complete(&self, prompt: String) -> anyhow::Result<String> {
        self.llm
            .complete(CompletionRequest::new(prompt).with_system(prompts::SYSTEM_PROMPT))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::FinancialSnapshot;
    use crate::llm::Provider;
    use crate::predictor::{Prediction, RuleEnginePredictor};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLlm {
        prompts: Mutex<Vec<CompletionRequest>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl LlmClient for RecordingLlm {
        fn provider(&self) -> Provider {
            Provider::Anthropic
        }

        async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String> {
            self.prompts.lock().unwrap().push(req);
            if self.fail {
                anyhow::bail!("upstream unavailable");
            }
            Ok("Looks healthy overall.".to_string())
        }
    }

    struct DownPredictor;

    #[async_trait::async_trait]
    impl PredictionService for DownPredictor {
        fn provider(&self) -> &'static str {
            "down"
        }

        async fn predict(&self, _snapshot: &FinancialSnapshot) -> anyhow::Result<Prediction> {
            anyhow::bail!("connection refused")
        }
    }

    fn analyst(llm: Arc<RecordingLlm>, predictor: Arc<dyn PredictionService>) -> Analyst {
        Analyst::new(llm, predictor)
    }

    fn profile_with_signals() -> FinancialProfile {
        let mut p = metrics::fixtures::profile();
        p.credit_score = Some(620);
        p.num_transactions = Some(40);
        p.avg_transaction_value = Some(80.0);
        p.spending_category = Some("groceries".to_string());
        p
    }

    #[test]
    fn envelope_reports_missing_type_and_data() {
        let err = AnalysisEnvelope::from_json_slice(b"{}")
            .unwrap()
            .into_request()
            .unwrap_err();
        assert_eq!(err, InvalidInput::MissingFields(vec!["type", "data"]));

        let err = AnalysisEnvelope::from_json_slice(br#"{"type": "budget-advice", "data": null}"#)
            .unwrap()
            .into_request()
            .unwrap_err();
        assert_eq!(err, InvalidInput::MissingFields(vec!["data"]));
    }

    #[test]
    fn envelope_rejects_unknown_type() {
        let err = AnalysisEnvelope::from_json_slice(br#"{"type": "horoscope", "data": {}}"#)
            .unwrap()
            .into_request()
            .unwrap_err();
        assert!(err.to_string().contains("Invalid analysis type: horoscope"));
    }

    #[test]
    fn envelope_decodes_each_kind() {
        let body = json!({
            "type": "financial-analysis",
            "data": {"income": 60000, "expenses": 3000, "assets": 20000, "liabilities": 9000},
        });
        let req = serde_json::from_value::<AnalysisEnvelope>(body)
            .unwrap()
            .into_request()
            .unwrap();
        assert!(matches!(req, AnalysisRequest::FinancialAnalysis(p) if p.monthly_expenses == 3000.0));

        let body = json!({
            "type": "budget-advice",
            "data": [{"type": "expense", "category": "dining", "amount": 12}],
        });
        let req = serde_json::from_value::<AnalysisEnvelope>(body)
            .unwrap()
            .into_request()
            .unwrap();
        assert!(matches!(req, AnalysisRequest::BudgetAdvice(t) if t.len() == 1));

        let body = json!({"type": "investment-advice", "data": {"risk_tolerance": "low"}});
        let req = serde_json::from_value::<AnalysisEnvelope>(body)
            .unwrap()
            .into_request()
            .unwrap();
        assert!(matches!(req, AnalysisRequest::InvestmentAdvice(p) if p.risk_tolerance == Some(RiskProfile::Low)));
    }

    #[test]
    fn envelope_reports_bad_data_shape() {
        let body = json!({"type": "financial-analysis", "data": {"income": "lots"}});
        let err = serde_json::from_value::<AnalysisEnvelope>(body)
            .unwrap()
            .into_request()
            .unwrap_err();
        assert!(matches!(err, InvalidInput::Malformed(ref m) if m.starts_with("financial-analysis:")));
    }

    #[tokio::test]
    async fn financial_analysis_embeds_prediction() {
        let llm = Arc::new(RecordingLlm::default());
        let analyst = analyst(llm.clone(), Arc::new(RuleEnginePredictor));

        let out = analyst.financial_analysis(&profile_with_signals()).await.unwrap();
        assert_eq!(out.analysis, "Looks healthy overall.");

        let ml = out.ml_prediction.unwrap();
        assert_eq!(ml.action, Action::PayDebt);
        assert_eq!(ml.provider, "rule_engine");
        assert_eq!(ml.reasoning, "AI model recommends to pay debt with 80.0% confidence");
        assert_eq!(
            out.recommendations.last().map(String::as_str),
            Some("AI recommends: pay debt (80.0% confidence)")
        );

        let sent = llm.prompts.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].system.as_deref(), Some(prompts::SYSTEM_PROMPT));
        assert!(sent[0].prompt.contains("ML model prediction: AI model recommends to pay debt"));
    }

    #[tokio::test]
    async fn financial_analysis_survives_prediction_failure() {
        let llm = Arc::new(RecordingLlm::default());
        let analyst = analyst(llm.clone(), Arc::new(DownPredictor));

        let out = analyst.financial_analysis(&profile_with_signals()).await.unwrap();
        assert!(out.ml_prediction.is_none());
        assert!(!llm.prompts.lock().unwrap()[0].prompt.contains("ML model prediction"));
    }

    #[tokio::test]
    async fn llm_failure_propagates() {
        let llm = Arc::new(RecordingLlm {
            fail: true,
            ..Default::default()
        });
        let analyst = analyst(llm, Arc::new(RuleEnginePredictor));
        let err = analyst
            .run(AnalysisRequest::InvestmentAdvice(InvestmentProfile {
                age: Some(30),
                risk_tolerance: None,
                annual_income: None,
                financial_goals: None,
                time_horizon: None,
            }))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("upstream unavailable"));
    }

    #[tokio::test]
    async fn budget_advice_returns_totals() {
        let llm = Arc::new(RecordingLlm::default());
        let analyst = analyst(llm.clone(), Arc::new(RuleEnginePredictor));
        let transactions: Vec<Transaction> = serde_json::from_value(json!([
            {"type": "expense", "category": "rent", "amount": 1500},
            {"type": "expense", "category": "rent", "amount": 1500},
        ]))
        .unwrap();

        let res = analyst
            .run(AnalysisRequest::BudgetAdvice(transactions))
            .await
            .unwrap();
        let AnalysisResponse::BudgetAdvice(advice) = res else {
            panic!("expected budget advice");
        };
        assert_eq!(advice.category_spending["rent"], 3000.0);
        assert!(llm.prompts.lock().unwrap()[0].prompt.contains("rent: $3,000"));
    }
}
