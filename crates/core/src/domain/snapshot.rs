use serde::{Deserialize, Serialize};
use std::fmt;

const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Low,
    Medium,
    High,
}

impl RiskProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's financial attributes at the time of a prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub age: u32,
    #[serde(alias = "income")]
    pub annual_income: f64,
    /// Negative for credit-type accounts.
    pub account_balance: f64,
    pub credit_score: i32,
    pub num_transactions: u32,
    pub avg_transaction_value: f64,
    /// Carried through for external services; the rule engine never reads it.
    pub spending_category: String,
    pub risk_profile: RiskProfile,
}

impl FinancialSnapshot {
    pub fn monthly_income(&self) -> f64 {
        self.annual_income / MONTHS_PER_YEAR
    }

    /// Months of income-equivalent spending the balance covers.
    ///
    /// Without a positive income there is nothing to measure against, so the
    /// fund counts as empty (0.0). A quotient that overflows saturates to the
    /// largest finite value of the same sign.
    pub fn emergency_months(&self) -> f64 {
        if self.annual_income <= 0.0 {
            return 0.0;
        }

        let months = self.account_balance / self.monthly_income();
        if months.is_nan() {
            0.0
        } else if months == f64::INFINITY {
            f64::MAX
        } else if months == f64::NEG_INFINITY {
            f64::MIN
        } else {
            months
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn emergency_months_divides_balance_by_monthly_income() {
        let s = fixtures::snapshot();
        assert!((s.emergency_months() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn emergency_months_is_zero_without_income() {
        let mut s = fixtures::snapshot();
        s.annual_income = 0.0;
        assert_eq!(s.emergency_months(), 0.0);

        s.annual_income = -12_000.0;
        assert_eq!(s.emergency_months(), 0.0);
    }

    #[test]
    fn emergency_months_saturates_instead_of_overflowing() {
        let mut s = fixtures::snapshot();
        s.annual_income = f64::MIN_POSITIVE;
        s.account_balance = 1.0e300;
        assert_eq!(s.emergency_months(), f64::MAX);

        s.account_balance = -1.0e300;
        assert_eq!(s.emergency_months(), f64::MIN);
    }

    #[test]
    fn negative_balance_yields_negative_months() {
        let mut s = fixtures::snapshot();
        s.account_balance = -5_000.0;
        assert!((s.emergency_months() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn accepts_income_alias() {
        let v = json!({
            "age": 40,
            "income": 50000,
            "account_balance": 100.5,
            "credit_score": 700,
            "num_transactions": 3,
            "avg_transaction_value": 12.5,
            "spending_category": "travel",
            "risk_profile": "low",
        });
        let s: FinancialSnapshot = serde_json::from_value(v).unwrap();
        assert_eq!(s.annual_income, 50_000.0);
        assert_eq!(s.risk_profile, RiskProfile::Low);
    }
}
