use crate::domain::recommendation::RecommendationResult;
use crate::domain::snapshot::{FinancialSnapshot, RiskProfile};
use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot fields in wire order. Also served by the API's self-description.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "age",
    "annual_income",
    "account_balance",
    "credit_score",
    "num_transactions",
    "avg_transaction_value",
    "spending_category",
    "risk_profile",
];

/// Raw prediction request; every field is optional until validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub age: Option<u32>,
    #[serde(alias = "income")]
    pub annual_income: Option<f64>,
    pub account_balance: Option<f64>,
    pub credit_score: Option<i32>,
    pub num_transactions: Option<u32>,
    pub avg_transaction_value: Option<f64>,
    pub spending_category: Option<String>,
    pub risk_profile: Option<RiskProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    MissingFields(Vec<&'static str>),
    Malformed(String),
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields(fields) if fields.len() == 1 => {
                write!(f, "Missing required field: {}", fields[0])
            }
            Self::MissingFields(fields) => {
                write!(f, "Missing required fields: {}", fields.join(", "))
            }
            Self::Malformed(detail) => write!(f, "Invalid request body: {detail}"),
        }
    }
}

impl std::error::Error for InvalidInput {}

impl PredictionRequest {
    pub fn from_json_slice(body: &[u8]) -> Result<Self, InvalidInput> {
        serde_json::from_slice(body).map_err(|e| InvalidInput::Malformed(e.to_string()))
    }

    pub fn validate_and_into_snapshot(self) -> Result<FinancialSnapshot, InvalidInput> {
        let mut missing = Vec::new();
        let present = [
            self.age.is_some(),
            self.annual_income.is_some(),
            self.account_balance.is_some(),
            self.credit_score.is_some(),
            self.num_transactions.is_some(),
            self.avg_transaction_value.is_some(),
            self.spending_category.is_some(),
            self.risk_profile.is_some(),
        ];
        for (field, present) in REQUIRED_FIELDS.iter().zip(present) {
            if !present {
                missing.push(*field);
            }
        }

        match self {
            Self {
                age: Some(age),
                annual_income: Some(annual_income),
                account_balance: Some(account_balance),
                credit_score: Some(credit_score),
                num_transactions: Some(num_transactions),
                avg_transaction_value: Some(avg_transaction_value),
                spending_category: Some(spending_category),
                risk_profile: Some(risk_profile),
            } => Ok(FinancialSnapshot {
                age,
                annual_income,
                account_balance,
                credit_score,
                num_transactions,
                avg_transaction_value,
                spending_category: spending_category.trim().to_string(),
                risk_profile,
            }),
            _ => Err(InvalidInput::MissingFields(missing)),
        }
    }
}

/// Parses and validates a request body in one step.
pub fn parse_snapshot(body: &[u8]) -> Result<FinancialSnapshot, InvalidInput> {
    PredictionRequest::from_json_slice(body)?.validate_and_into_snapshot()
}

/// Sanity checks for results produced outside the in-process engine.
pub fn validate_result(result: &RecommendationResult) -> anyhow::Result<()> {
    ensure!(
        result.confidence.is_finite() && (0.0..=1.0).contains(&result.confidence),
        "confidence must be between 0 and 1 (got {})",
        result.confidence
    );

    for (action, p) in &result.action_probabilities {
        ensure!(
            p.is_finite() && (0.0..=1.0).contains(p),
            "probability for {action} must be between 0 and 1 (got {p})"
        );
    }

    ensure!(!result.insights.is_empty(), "insights must be non-empty");

    let total = result.savings_recommendation.allocation.total();
    ensure!(total == 100, "allocation must sum to 100 (got {total})");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;
    use serde_json::json;

    fn full_body() -> serde_json::Value {
        json!({
            "age": 28,
            "annual_income": 60000,
            "account_balance": 2000,
            "credit_score": 600,
            "num_transactions": 40,
            "avg_transaction_value": 80,
            "spending_category": "groceries",
            "risk_profile": "medium",
        })
    }

    #[test]
    fn accepts_complete_request() {
        let body = full_body().to_string();
        let snapshot = parse_snapshot(body.as_bytes()).unwrap();
        assert_eq!(snapshot.age, 28);
        assert_eq!(snapshot.credit_score, 600);
        assert_eq!(snapshot.risk_profile, RiskProfile::Medium);
    }

    #[test]
    fn names_the_single_missing_field() {
        let mut v = full_body();
        v.as_object_mut().unwrap().remove("credit_score");
        let err = parse_snapshot(v.to_string().as_bytes()).unwrap_err();
        assert_eq!(err, InvalidInput::MissingFields(vec!["credit_score"]));
        assert_eq!(err.to_string(), "Missing required field: credit_score");
    }

    #[test]
    fn names_every_missing_field_in_wire_order() {
        let err = parse_snapshot(br#"{"age": 30, "risk_profile": "low"}"#).unwrap_err();
        assert_eq!(
            err,
            InvalidInput::MissingFields(vec![
                "annual_income",
                "account_balance",
                "credit_score",
                "num_transactions",
                "avg_transaction_value",
                "spending_category",
            ])
        );
    }

    #[test]
    fn null_counts_as_missing() {
        let mut v = full_body();
        v["account_balance"] = serde_json::Value::Null;
        let err = parse_snapshot(v.to_string().as_bytes()).unwrap_err();
        assert_eq!(err, InvalidInput::MissingFields(vec!["account_balance"]));
    }

    #[test]
    fn rejects_unknown_risk_profile() {
        let mut v = full_body();
        v["risk_profile"] = json!("extreme");
        let err = parse_snapshot(v.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, InvalidInput::Malformed(_)), "{err:?}");
    }

    #[test]
    fn rejects_non_numeric_values() {
        let mut v = full_body();
        v["age"] = json!("twenty");
        assert!(matches!(
            parse_snapshot(v.to_string().as_bytes()),
            Err(InvalidInput::Malformed(_))
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            parse_snapshot(b"{not json"),
            Err(InvalidInput::Malformed(_))
        ));
    }

    #[test]
    fn accepts_unusual_but_well_typed_values() {
        let mut v = full_body();
        v["account_balance"] = json!(-25000.0);
        v["annual_income"] = json!(0);
        v["credit_score"] = json!(120);
        assert!(parse_snapshot(v.to_string().as_bytes()).is_ok());
    }

    #[test]
    fn engine_output_passes_result_validation() {
        let snapshot = parse_snapshot(full_body().to_string().as_bytes()).unwrap();
        validate_result(&engine::evaluate(&snapshot)).unwrap();
    }

    #[test]
    fn result_validation_rejects_bad_allocation_and_confidence() {
        let snapshot = parse_snapshot(full_body().to_string().as_bytes()).unwrap();

        let mut result = engine::evaluate(&snapshot);
        result.savings_recommendation.allocation.cash += 1;
        assert!(validate_result(&result).is_err());

        let mut result = engine::evaluate(&snapshot);
        result.confidence = 1.5;
        assert!(validate_result(&result).is_err());

        let mut result = engine::evaluate(&snapshot);
        result.insights.clear();
        assert!(validate_result(&result).is_err());
    }
}
