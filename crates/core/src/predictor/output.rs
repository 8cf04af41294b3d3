use crate::domain::contract::validate_result;
use crate::domain::recommendation::{
    Action, Insight, RecommendationResult, RiskAssessment, SavingsRecommendation,
};
use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// First stdout line that starts with `{`; external processes may print log
/// lines before their payload.
pub fn extract_json_line(stdout: &str) -> Option<&str> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with('{'))
}

/// Result as external predictors send it. Older model services name the
/// probability map `all_probabilities` and send a list of allocations.
#[derive(Debug, Deserialize)]
struct ExternalResult {
    predicted_action: Action,
    confidence: f64,
    #[serde(alias = "all_probabilities")]
    action_probabilities: BTreeMap<Action, f64>,
    insights: Vec<Insight>,
    risk_assessment: RiskAssessment,
    #[serde(default)]
    savings_recommendation: Option<SavingsRecommendation>,
    #[serde(default)]
    savings_recommendations: Vec<SavingsRecommendation>,
}

impl TryFrom<ExternalResult> for RecommendationResult {
    type Error = anyhow::Error;

    fn try_from(raw: ExternalResult) -> anyhow::Result<Self> {
        let savings_recommendation = raw
            .savings_recommendation
            .or_else(|| raw.savings_recommendations.into_iter().next())
            .context("prediction output has no savings recommendation")?;

        Ok(Self {
            predicted_action: raw.predicted_action,
            confidence: raw.confidence,
            action_probabilities: raw.action_probabilities,
            insights: raw.insights,
            risk_assessment: raw.risk_assessment,
            savings_recommendation,
        })
    }
}

/// Decodes an external prediction payload. An object carrying an `error` key
/// is a reported failure, not a result.
pub fn parse_result(text: &str) -> anyhow::Result<RecommendationResult> {
    let raw = serde_json::from_str::<Value>(text)
        .with_context(|| format!("prediction output is not valid JSON: {text}"))?;

    if let Some(err) = raw.get("error") {
        let detail = err
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        anyhow::bail!("prediction service reported an error: {detail}");
    }

    let external = serde_json::from_value::<ExternalResult>(raw)
        .context("failed to decode prediction output into RecommendationResult")?;
    let result = RecommendationResult::try_from(external)?;
    validate_result(&result)?;
    Ok(result)
}
