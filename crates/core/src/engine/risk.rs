use crate::domain::recommendation::{RiskAssessment, RiskLevel};
use crate::engine::{text, Signals};

pub const MAX_SCORE: u8 = 6;

const HIGH_FROM: u8 = 5;
const MEDIUM_FROM: u8 = 3;

pub fn assess(signals: &Signals<'_>) -> RiskAssessment {
    let score = liquidity_points(signals.emergency_months)
        + credit_points(signals.snapshot.credit_score);
    let level = level_for_score(score);
    RiskAssessment {
        level,
        score,
        description: text::risk_description(level).to_string(),
    }
}

pub fn liquidity_points(emergency_months: f64) -> u8 {
    if emergency_months < 1.0 {
        3
    } else if emergency_months < 3.0 {
        2
    } else if emergency_months < 6.0 {
        1
    } else {
        0
    }
}

pub fn credit_points(credit_score: i32) -> u8 {
    if credit_score < 600 {
        3
    } else if credit_score < 700 {
        2
    } else if credit_score < 750 {
        1
    } else {
        0
    }
}

pub fn level_for_score(score: u8) -> RiskLevel {
    if score >= HIGH_FROM {
        RiskLevel::High
    } else if score >= MEDIUM_FROM {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
