//! Rule-based recommendation engine.
//!
//! Everything here is a pure function of a [`FinancialSnapshot`]: no I/O, no
//! clock, no logging. Callers own timeouts and diagnostics.

pub mod allocation;
pub mod insights;
pub mod risk;
pub mod rules;
pub mod text;

use crate::domain::recommendation::{Action, RecommendationResult};
use crate::domain::snapshot::FinancialSnapshot;
use std::collections::BTreeMap;

/// Confidence recorded for every action the decision list did not choose.
pub const UNCHOSEN_ACTION_CONFIDENCE: f64 = 0.25;

/// Values derived once per evaluation and shared by every step.
#[derive(Debug, Clone, Copy)]
pub struct Signals<'a> {
    pub snapshot: &'a FinancialSnapshot,
    pub emergency_months: f64,
    pub monthly_income: f64,
}

impl<'a> Signals<'a> {
    pub fn new(snapshot: &'a FinancialSnapshot) -> Self {
        Self {
            snapshot,
            emergency_months: snapshot.emergency_months(),
            monthly_income: snapshot.monthly_income(),
        }
    }
}

pub fn evaluate(snapshot: &FinancialSnapshot) -> RecommendationResult {
    let signals = Signals::new(snapshot);
    let classification = rules::classify(&signals);

    RecommendationResult {
        predicted_action: classification.action,
        confidence: classification.confidence,
        action_probabilities: action_probabilities(classification.action, classification.confidence),
        insights: insights::generate(&signals, classification.action),
        risk_assessment: risk::assess(&signals),
        savings_recommendation: allocation::recommend(snapshot.age),
    }
}

pub fn action_probabilities(chosen: Action, confidence: f64) -> BTreeMap<Action, f64> {
    Action::ALL
        .iter()
        .map(|&action| {
            let p = if action == chosen {
                confidence
            } else {
                UNCHOSEN_ACTION_CONFIDENCE
            };
            (action, p)
        })
        .collect()
}
