use crate::llm::Provider;
use serde_json::Value;
use std::fmt;

/// Where an LLM call went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmStage {
    /// Non-2xx status from the provider.
    Http,
    /// Body was not the documented response shape.
    Decode,
    /// Well-formed response without any text.
    EmptyReply,
}

impl LlmStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Decode => "decode",
            Self::EmptyReply => "empty_reply",
        }
    }
}

/// Carries the raw provider output so callers can log or report it.
#[derive(Debug, Clone)]
pub struct LlmDiagnosticsError {
    pub provider: Provider,
    pub stage: LlmStage,
    pub detail: String,
    pub raw_output: Option<String>,
    pub raw_response_json: Option<Value>,
}

impl LlmDiagnosticsError {
    pub fn new(provider: Provider, stage: LlmStage, detail: impl Into<String>) -> Self {
        Self {
            provider,
            stage,
            detail: detail.into(),
            raw_output: None,
            raw_response_json: None,
        }
    }

    pub fn with_raw_output(mut self, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        self.raw_response_json = serde_json::from_str::<Value>(&raw).ok();
        self.raw_output = Some(raw);
        self
    }
}

impl fmt::Display for LlmDiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LLM error (provider={:?}, stage={}): {}",
            self.provider,
            self.stage.as_str(),
            self.detail
        )
    }
}

impl std::error::Error for LlmDiagnosticsError {}
