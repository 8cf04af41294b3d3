use crate::domain::recommendation::{Action, RiskLevel};
use crate::domain::snapshot::{FinancialSnapshot, RiskProfile};
use serde::{Deserialize, Serialize};

const DEFAULT_AGE: u32 = 35;
const DEFAULT_RISK_PROFILE: RiskProfile = RiskProfile::Medium;

/// Balance-sheet view of a user, as sent by the analysis screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    #[serde(alias = "income")]
    pub annual_income: f64,
    #[serde(alias = "expenses")]
    pub monthly_expenses: f64,
    pub assets: f64,
    pub liabilities: f64,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub goals: Option<Vec<String>>,
    #[serde(default)]
    pub risk_tolerance: Option<RiskProfile>,
    #[serde(default)]
    pub credit_score: Option<i32>,
    #[serde(default)]
    pub num_transactions: Option<u32>,
    #[serde(default)]
    pub avg_transaction_value: Option<f64>,
    #[serde(default)]
    pub spending_category: Option<String>,
}

impl FinancialProfile {
    /// Only profiles carrying the transaction signals can be scored by a
    /// prediction service; age, risk profile and balance are filled in.
    pub fn prediction_snapshot(&self) -> Option<FinancialSnapshot> {
        Some(FinancialSnapshot {
            age: self.age.unwrap_or(DEFAULT_AGE),
            annual_income: self.annual_income,
            account_balance: self.assets,
            credit_score: self.credit_score?,
            num_transactions: self.num_transactions?,
            avg_transaction_value: self.avg_transaction_value?,
            spending_category: self.spending_category.clone()?,
            risk_profile: self.risk_tolerance.unwrap_or(DEFAULT_RISK_PROFILE),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub net_worth: f64,
    /// Percent of income left after expenses; `None` without positive income.
    pub savings_rate: Option<f64>,
    /// Liabilities as percent of income; `None` without positive income.
    pub debt_to_income: Option<f64>,
}

impl FinancialMetrics {
    pub fn from_profile(p: &FinancialProfile) -> Self {
        let income = (p.annual_income > 0.0).then_some(p.annual_income);
        Self {
            net_worth: p.assets - p.liabilities,
            savings_rate: income.map(|i| (i - p.monthly_expenses * 12.0) / i * 100.0),
            debt_to_income: income.map(|i| p.liabilities / i * 100.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthRating {
    pub risk_level: RiskLevel,
    pub score: u8,
}

/// Coarse rating from the two ratios. Missing ratios (no income) rate high.
pub fn rate(m: &FinancialMetrics) -> HealthRating {
    let (Some(savings_rate), Some(dti)) = (m.savings_rate, m.debt_to_income) else {
        return HealthRating {
            risk_level: RiskLevel::High,
            score: 45,
        };
    };

    if dti > 40.0 || savings_rate < 0.0 {
        HealthRating {
            risk_level: RiskLevel::High,
            score: 45,
        }
    } else if dti > 20.0 || savings_rate < 10.0 {
        HealthRating {
            risk_level: RiskLevel::Medium,
            score: 65,
        }
    } else {
        HealthRating {
            risk_level: RiskLevel::Low,
            score: 85,
        }
    }
}

pub fn recommendations(
    p: &FinancialProfile,
    m: &FinancialMetrics,
    predicted: Option<(Action, f64)>,
) -> Vec<String> {
    let mut out = Vec::new();

    if m.savings_rate.map_or(true, |r| r < 20.0) {
        out.push("Increase savings rate to at least 20% of income".to_string());
    }
    if m.debt_to_income.map_or(p.liabilities > 0.0, |d| d > 30.0) {
        out.push("Focus on debt reduction to improve debt-to-income ratio".to_string());
    }
    if m.net_worth < p.annual_income * 0.5 {
        out.push("Build emergency fund equal to 3-6 months of expenses".to_string());
    }
    if p.age.is_some_and(|age| age < 40) && p.risk_tolerance != Some(RiskProfile::Low) {
        out.push("Consider increasing investment allocation for long-term growth".to_string());
    }
    if let Some((action, confidence)) = predicted {
        out.push(format!(
            "AI recommends: {} ({:.1}% confidence)",
            action.phrase(),
            confidence * 100.0
        ));
    }

    out
}
