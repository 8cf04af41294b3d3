use crate::analysis::metrics::{FinancialMetrics, FinancialProfile};
use crate::analysis::InvestmentProfile;
use std::collections::BTreeMap;

pub const SYSTEM_PROMPT: &str = "You are FiSight, a personal finance assistant. \
Give specific, actionable and encouraging advice while staying realistic about challenges. \
Answer in plain text without tables.";

const NOT_SPECIFIED: &str = "Not specified";

pub fn financial_analysis(
    p: &FinancialProfile,
    m: &FinancialMetrics,
    ml_reasoning: Option<&str>,
) -> String {
    let mut lines = vec![
        "Analyze this financial profile and provide personalized insights.".to_string(),
        String::new(),
        "Financial data:".to_string(),
        format!("- Annual income: {}", money(p.annual_income)),
        format!("- Monthly expenses: {}", money(p.monthly_expenses)),
        format!("- Total assets: {}", money(p.assets)),
        format!("- Total liabilities: {}", money(p.liabilities)),
        format!("- Net worth: {}", money(m.net_worth)),
        format!("- Savings rate: {}", percent(m.savings_rate)),
        format!("- Debt-to-income ratio: {}", percent(m.debt_to_income)),
    ];

    if let Some(age) = p.age {
        lines.push(format!("- Age: {age}"));
    }
    if let Some(goals) = p.goals.as_ref().filter(|g| !g.is_empty()) {
        lines.push(format!("- Financial goals: {}", goals.join(", ")));
    }
    if let Some(risk) = p.risk_tolerance {
        lines.push(format!("- Risk tolerance: {risk}"));
    }
    if let Some(reasoning) = ml_reasoning {
        lines.push(format!("- ML model prediction: {reasoning}"));
    }

    lines.push(String::new());
    lines.push("Provide:".to_string());
    lines.push("1. Overall financial health assessment".to_string());
    lines.push("2. Specific areas of strength and concern".to_string());
    lines.push("3. Actionable recommendations for improvement".to_string());
    lines.push("4. Risk assessment and mitigation strategies".to_string());
    if ml_reasoning.is_some() {
        lines.push(
            "5. How the ML prediction aligns with traditional financial advice".to_string(),
        );
    }

    lines.join("\n")
}

pub fn budget_advice(spending: &BTreeMap<String, f64>) -> String {
    let breakdown = if spending.is_empty() {
        "(no expenses recorded)".to_string()
    } else {
        spending
            .iter()
            .map(|(category, amount)| format!("{category}: {}", money(*amount)))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Based on this spending data, provide budget advice.\n\n\
Spending by category:\n{breakdown}\n\n\
Provide:\n\
1. Spending patterns analysis\n\
2. Areas to reduce spending\n\
3. Budget allocation suggestions\n\
4. Money-saving tips\n\n\
Keep advice practical and specific."
    )
}

pub fn investment_advice(p: &InvestmentProfile) -> String {
    let age = p
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let risk = p
        .risk_tolerance
        .map(|r| r.to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let income = p
        .annual_income
        .map(money)
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let goals = p
        .financial_goals
        .as_ref()
        .filter(|g| !g.is_empty())
        .map(|g| g.join(", "))
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let horizon = p.time_horizon.as_deref().unwrap_or(NOT_SPECIFIED);

    format!(
        "Provide investment advice for this user profile:\n\n\
Age: {age}\n\
Risk tolerance: {risk}\n\
Annual income: {income}\n\
Investment goals: {goals}\n\
Time horizon: {horizon}\n\n\
Provide:\n\
1. Recommended asset allocation\n\
2. Specific investment types\n\
3. Risk management strategies\n\
4. Next steps\n\n\
Keep advice beginner-friendly but comprehensive."
    )
}

/// `$1,234.50`, `-$20,000`; cents are dropped when zero.
pub fn money(amount: f64) -> String {
    let cents_total = (amount.abs() * 100.0).round();
    let whole = (cents_total / 100.0).trunc() as u64;
    let cents = (cents_total % 100.0) as u64;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents_total > 0.0 { "-" } else { "" };
    if cents == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{cents:02}")
    }
}

fn percent(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.1}%"))
        .unwrap_or_else(|| "n/a (no income)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::metrics::fixtures;
    use crate::domain::snapshot::RiskProfile;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(0.0), "$0");
        assert_eq!(money(999.0), "$999");
        assert_eq!(money(1_000.0), "$1,000");
        assert_eq!(money(1_234_567.891), "$1,234,567.89");
        assert_eq!(money(-20_000.0), "-$20,000");
        assert_eq!(money(12.5), "$12.50");
        assert_eq!(money(-0.001), "$0");
    }

    #[test]
    fn financial_prompt_lists_metrics() {
        let p = fixtures::profile();
        let m = FinancialMetrics::from_profile(&p);
        let prompt = financial_analysis(&p, &m, None);
        assert!(prompt.contains("- Annual income: $60,000"));
        assert!(prompt.contains("- Net worth: $11,000"));
        assert!(prompt.contains("- Savings rate: 40.0%"));
        assert!(prompt.contains("- Debt-to-income ratio: 15.0%"));
        assert!(prompt.contains("- Financial goals: house, retirement"));
        assert!(prompt.contains("- Risk tolerance: medium"));
        assert!(!prompt.contains("ML model prediction"));
        assert!(!prompt.contains("5. "));
    }

    #[test]
    fn financial_prompt_includes_prediction_when_present() {
        let p = fixtures::profile();
        let m = FinancialMetrics::from_profile(&p);
        let prompt = financial_analysis(&p, &m, Some("AI model recommends to save money"));
        assert!(prompt.contains("- ML model prediction: AI model recommends to save money"));
        assert!(prompt.contains("5. How the ML prediction aligns"));
    }

    #[test]
    fn budget_prompt_lists_categories_in_order() {
        let mut spending = BTreeMap::new();
        spending.insert("groceries".to_string(), 200.0);
        spending.insert("dining".to_string(), 40.0);
        let prompt = budget_advice(&spending);
        let dining = prompt.find("dining: $40").unwrap();
        let groceries = prompt.find("groceries: $200").unwrap();
        assert!(dining < groceries);
    }

    #[test]
    fn investment_prompt_marks_missing_fields() {
        let p = InvestmentProfile {
            age: None,
            risk_tolerance: Some(RiskProfile::High),
            annual_income: Some(85_000.0),
            financial_goals: None,
            time_horizon: Some("10 years".to_string()),
        };
        let prompt = investment_advice(&p);
        assert!(prompt.contains("Age: Not specified"));
        assert!(prompt.contains("Risk tolerance: high"));
        assert!(prompt.contains("Annual income: $85,000"));
        assert!(prompt.contains("Investment goals: Not specified"));
        assert!(prompt.contains("Time horizon: 10 years"));
    }
}
