use crate::config::Settings;
use crate::domain::snapshot::{FinancialSnapshot, RiskProfile};
use crate::predictor::{output, Prediction, PredictionService};
use anyhow::{Context, Result};
use serde::Serialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Runs an external predictor once per request. The snapshot JSON is passed
/// as the last argument; the payload is the first stdout line that starts
/// with `{`.
#[derive(Debug, Clone)]
pub struct CommandPredictionService {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandPredictionService {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let command_line = settings.require_prediction_command()?;
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .context("PREDICTION_COMMAND must name a program")?;

        let timeout_secs = std::env::var("PREDICTION_COMMAND_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self::new(
            program,
            parts.collect(),
            Duration::from_secs(timeout_secs),
        ))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

/// Argument payload; model scripts read the annual income as `income`.
#[derive(Debug, Serialize)]
struct ProcessInput<'a> {
    age: u32,
    income: f64,
    account_balance: f64,
    credit_score: i32,
    num_transactions: u32,
    avg_transaction_value: f64,
    spending_category: &'a str,
    risk_profile: RiskProfile,
}

impl<'a> From<&'a FinancialSnapshot> for ProcessInput<'a> {
    fn from(s: &'a FinancialSnapshot) -> Self {
        Self {
            age: s.age,
            income: s.annual_income,
            account_balance: s.account_balance,
            credit_score: s.credit_score,
            num_transactions: s.num_transactions,
            avg_transaction_value: s.avg_transaction_value,
            spending_category: &s.spending_category,
            risk_profile: s.risk_profile,
        }
    }
}

#[async_trait::async_trait]
impl PredictionService for CommandPredictionService {
    fn provider(&self) -> &'static str {
        "external_process"
    }

    async fn predict(&self, snapshot: &FinancialSnapshot) -> Result<Prediction> {
        let input = serde_json::to_string(&ProcessInput::from(snapshot))
            .context("failed to encode snapshot")?;

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let out = tokio::time::timeout(self.timeout, child)
            .await
            .with_context(|| {
                format!(
                    "prediction process {} timed out after {:?}",
                    self.program, self.timeout
                )
            })?
            .with_context(|| format!("failed to start prediction process {}", self.program))?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            anyhow::bail!(
                "prediction process {} exited with {}: {}",
                self.program,
                out.status,
                stderr.trim()
            );
        }

        let stdout = String::from_utf8_lossy(&out.stdout);
        let line = output::extract_json_line(&stdout)
            .context("no JSON payload in prediction process output")?;
        tracing::debug!(program = %self.program, bytes = line.len(), "prediction process answered");

        Ok(Prediction {
            provider: self.provider(),
            result: output::parse_result(line)?,
        })
    }
}
