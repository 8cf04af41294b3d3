use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SaveMoney,
    InvestMore,
    PayDebt,
    StopSpending,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::SaveMoney,
        Action::InvestMore,
        Action::PayDebt,
        Action::StopSpending,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SaveMoney => "save_money",
            Self::InvestMore => "invest_more",
            Self::PayDebt => "pay_debt",
            Self::StopSpending => "stop_spending",
        }
    }

    /// Human-readable form, e.g. `pay debt`.
    pub fn phrase(self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub predicted_action: Action,
    pub confidence: f64,
    /// Indicative per-action confidences; the values do not sum to 1.
    pub action_probabilities: BTreeMap<Action, f64>,
    pub insights: Vec<Insight>,
    pub risk_assessment: RiskAssessment,
    pub savings_recommendation: SavingsRecommendation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub actionable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub score: u8,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsRecommendation {
    #[serde(rename = "type")]
    pub kind: String,
    pub allocation: Allocation,
    pub description: String,
}

/// Percentages per asset class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub stocks: u32,
    pub bonds: u32,
    pub cash: u32,
}

impl Allocation {
    /// Widened so values from external services cannot overflow.
    pub fn total(&self) -> u64 {
        u64::from(self.stocks) + u64::from(self.bonds) + u64::from(self.cash)
    }
}
