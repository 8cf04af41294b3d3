//! Fixed user-facing text, keyed by enum.

use crate::domain::recommendation::{Action, RiskLevel};

pub const fn action_description(action: Action) -> &'static str {
    match action {
        Action::SaveMoney => {
            "Focus on building your savings and emergency fund for financial security."
        }
        Action::InvestMore => {
            "Consider increasing your investment allocation for long-term wealth building."
        }
        Action::PayDebt => {
            "Prioritize paying down high-interest debt to improve your financial health."
        }
        Action::StopSpending => {
            "Review and reduce unnecessary expenses to improve your financial position."
        }
    }
}

pub const fn risk_description(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Low financial risk - good financial health",
        RiskLevel::Medium => "Moderate financial risk - improvements recommended",
        RiskLevel::High => "High financial risk - immediate attention needed",
    }
}

/// e.g. `Recommended Action: PAY DEBT`
pub fn action_title(action: Action) -> String {
    format!("Recommended Action: {}", action.phrase().to_uppercase())
}
