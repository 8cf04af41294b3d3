pub mod analysis;
pub mod domain;
pub mod engine;
pub mod llm;
pub mod predictor;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub anthropic_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
        pub prediction_service_url: Option<String>,
        pub prediction_service_api_key: Option<String>,
        pub prediction_command: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                prediction_service_url: non_empty_var("PREDICTION_SERVICE_URL"),
                prediction_service_api_key: non_empty_var("PREDICTION_SERVICE_API_KEY"),
                prediction_command: non_empty_var("PREDICTION_COMMAND"),
            })
        }

        pub fn require_anthropic_api_key(&self) -> anyhow::Result<&str> {
            self.anthropic_api_key
                .as_deref()
                .context("ANTHROPIC_API_KEY is required")
        }

        pub fn require_prediction_service_url(&self) -> anyhow::Result<&str> {
            self.prediction_service_url
                .as_deref()
                .context("PREDICTION_SERVICE_URL is required")
        }

        pub fn require_prediction_command(&self) -> anyhow::Result<&str> {
            self.prediction_command
                .as_deref()
                .context("PREDICTION_COMMAND is required")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}
