use crate::domain::recommendation::{Action, Insight, Priority};
use crate::domain::snapshot::RiskProfile;
use crate::engine::{text, Signals};

const EMERGENCY_FUND_TARGET_MONTHS: f64 = 3.0;
const CREDIT_WATCH_BELOW: i32 = 700;
const CREDIT_URGENT_BELOW: i32 = 650;
const INVESTMENT_AGE_BELOW: u32 = 40;
const INVESTMENT_MIN_FUND_MONTHS: f64 = 3.0;

/// Primary recommendation first, then every independent check that fires.
pub fn generate(signals: &Signals<'_>, action: Action) -> Vec<Insight> {
    let mut insights = vec![primary_recommendation(action)];
    insights.extend(emergency_fund(signals));
    insights.extend(credit_score(signals));
    insights.extend(investment_opportunity(signals));
    insights
}

fn primary_recommendation(action: Action) -> Insight {
    Insight {
        kind: "primary_recommendation".to_string(),
        title: text::action_title(action),
        description: text::action_description(action).to_string(),
        priority: Priority::High,
        actionable: true,
    }
}

fn emergency_fund(s: &Signals<'_>) -> Option<Insight> {
    if s.emergency_months >= EMERGENCY_FUND_TARGET_MONTHS {
        return None;
    }
    Some(Insight {
        kind: "emergency_fund".to_string(),
        title: "Build Emergency Fund".to_string(),
        description: format!(
            "You have {:.1} months of expenses saved. Aim for 3-6 months.",
            s.emergency_months
        ),
        priority: Priority::High,
        actionable: true,
    })
}

fn credit_score(s: &Signals<'_>) -> Option<Insight> {
    let score = s.snapshot.credit_score;
    if score >= CREDIT_WATCH_BELOW {
        return None;
    }
    Some(Insight {
        kind: "credit_score".to_string(),
        title: "Improve Credit Score".to_string(),
        description: format!(
            "Your credit score of {score} can be improved for better financial opportunities."
        ),
        priority: if score < CREDIT_URGENT_BELOW {
            Priority::High
        } else {
            Priority::Medium
        },
        actionable: true,
    })
}

fn investment_opportunity(s: &Signals<'_>) -> Option<Insight> {
    let eligible = s.snapshot.age < INVESTMENT_AGE_BELOW
        && s.emergency_months > INVESTMENT_MIN_FUND_MONTHS
        && s.snapshot.risk_profile != RiskProfile::Low;
    if !eligible {
        return None;
    }
    Some(Insight {
        kind: "investment".to_string(),
        title: "Consider Investment Opportunities".to_string(),
        description: "Your age and financial stability suggest you could benefit from long-term investments."
            .to_string(),
        priority: Priority::Medium,
        actionable: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::{fixtures, FinancialSnapshot};

    fn kinds(s: &FinancialSnapshot, action: Action) -> Vec<String> {
        generate(&Signals::new(s), action)
            .into_iter()
            .map(|i| i.kind)
            .collect()
    }

    #[test]
    fn primary_recommendation_is_always_first() {
        let s = fixtures::snapshot();
        let insights = generate(&Signals::new(&s), Action::PayDebt);
        let primary = &insights[0];
        assert_eq!(primary.kind, "primary_recommendation");
        assert_eq!(primary.title, "Recommended Action: PAY DEBT");
        assert_eq!(primary.description, text::action_description(Action::PayDebt));
        assert_eq!(primary.priority, Priority::High);
        assert!(primary.actionable);
    }

    #[test]
    fn emergency_fund_reports_months_to_one_decimal() {
        let mut s = fixtures::snapshot();
        s.account_balance = 12_345.0; // 2.469 months of 5k
        s.credit_score = 800;
        let insights = generate(&Signals::new(&s), Action::SaveMoney);
        assert_eq!(insights.len(), 2);
        assert_eq!(
            insights[1].description,
            "You have 2.5 months of expenses saved. Aim for 3-6 months."
        );
    }

    #[test]
    fn credit_insight_priority_depends_on_score() {
        let mut s = fixtures::snapshot();
        s.account_balance = 100_000.0;
        s.risk_profile = RiskProfile::Low;

        s.credit_score = 649;
        let insights = generate(&Signals::new(&s), Action::PayDebt);
        assert_eq!(insights[1].priority, Priority::High);

        s.credit_score = 650;
        let insights = generate(&Signals::new(&s), Action::SaveMoney);
        assert_eq!(insights[1].priority, Priority::Medium);

        s.credit_score = 700;
        assert_eq!(kinds(&s, Action::SaveMoney), ["primary_recommendation"]);
    }

    #[test]
    fn investment_insight_requires_all_three_conditions() {
        let mut s = fixtures::snapshot();
        s.credit_score = 780;
        s.account_balance = 20_000.0; // 4 months
        assert_eq!(kinds(&s, Action::SaveMoney), ["primary_recommendation", "investment"]);

        s.risk_profile = RiskProfile::Low;
        assert_eq!(kinds(&s, Action::SaveMoney), ["primary_recommendation"]);

        s.risk_profile = RiskProfile::High;
        s.age = 40;
        assert_eq!(kinds(&s, Action::SaveMoney), ["primary_recommendation"]);

        s.age = 39;
        s.account_balance = 15_000.0; // exactly 3 months
        assert_eq!(kinds(&s, Action::SaveMoney), ["primary_recommendation"]);
    }

    #[test]
    fn checks_are_independent_and_ordered() {
        let mut s = fixtures::snapshot();
        s.credit_score = 660;
        assert_eq!(
            kinds(&s, Action::SaveMoney),
            ["primary_recommendation", "emergency_fund", "credit_score"]
        );
    }
}
