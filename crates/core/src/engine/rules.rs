use crate::domain::recommendation::Action;
use crate::domain::snapshot::RiskProfile;
use crate::engine::Signals;

const WEAK_CREDIT_BELOW: i32 = 650;
const THIN_FUND_MONTHS: f64 = 3.0;
const SURPLUS_FUND_MONTHS: f64 = 6.0;
const YOUNG_INVESTOR_BELOW_AGE: u32 = 35;
const HEAVY_SPEND_SHARE_OF_MONTHLY_INCOME: f64 = 0.3;

#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&Signals<'_>) -> bool,
    pub action: Action,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub rule: &'static str,
    pub action: Action,
    pub confidence: f64,
}

/// Evaluated top to bottom; the first rule that applies decides.
pub const DECISION_LIST: [Rule; 4] = [
    Rule {
        name: "weak_credit",
        applies: weak_credit,
        action: Action::PayDebt,
        confidence: 0.80,
    },
    Rule {
        name: "thin_emergency_fund",
        applies: thin_emergency_fund,
        action: Action::SaveMoney,
        confidence: 0.70,
    },
    Rule {
        name: "young_high_risk_surplus",
        applies: young_high_risk_surplus,
        action: Action::InvestMore,
        confidence: 0.65,
    },
    Rule {
        name: "heavy_spending",
        applies: heavy_spending,
        action: Action::StopSpending,
        confidence: 0.60,
    },
];

pub const FALLBACK: Classification = Classification {
    rule: "fallback",
    action: Action::SaveMoney,
    confidence: 0.60,
};

pub fn classify(signals: &Signals<'_>) -> Classification {
    DECISION_LIST
        .iter()
        .find(|rule| (rule.applies)(signals))
        .map(|rule| Classification {
            rule: rule.name,
            action: rule.action,
            confidence: rule.confidence,
        })
        .unwrap_or(FALLBACK)
}

fn weak_credit(s: &Signals<'_>) -> bool {
    s.snapshot.credit_score < WEAK_CREDIT_BELOW
}

fn thin_emergency_fund(s: &Signals<'_>) -> bool {
    s.emergency_months < THIN_FUND_MONTHS
}

fn young_high_risk_surplus(s: &Signals<'_>) -> bool {
    s.snapshot.age < YOUNG_INVESTOR_BELOW_AGE
        && s.snapshot.risk_profile == RiskProfile::High
        && s.emergency_months > SURPLUS_FUND_MONTHS
}

fn heavy_spending(s: &Signals<'_>) -> bool {
    s.snapshot.avg_transaction_value > s.monthly_income * HEAVY_SPEND_SHARE_OF_MONTHLY_INCOME
}
