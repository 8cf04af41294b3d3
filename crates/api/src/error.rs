use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fisight_core::domain::contract::InvalidInput;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unavailable(&'static str),
    /// `message` is shown to the caller; `source` is logged and reported.
    Internal {
        message: &'static str,
        source: anyhow::Error,
        expose_details: bool,
    },
}

impl ApiError {
    pub fn internal(message: &'static str, source: anyhow::Error) -> Self {
        Self::Internal {
            message,
            source,
            expose_details: false,
        }
    }

    pub fn internal_with_details(message: &'static str, source: anyhow::Error) -> Self {
        Self::Internal {
            message,
            source,
            expose_details: true,
        }
    }
}

impl From<InvalidInput> for ApiError {
    fn from(e: InvalidInput) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => {
                tracing::debug!(%message, "rejecting request");
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            Self::Unavailable(message) => {
                (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": message }))).into_response()
            }
            Self::Internal {
                message,
                source,
                expose_details,
            } => {
                let error_id = Uuid::new_v4();
                sentry_anyhow::capture_anyhow(&source);
                tracing::error!(%error_id, error = %format!("{source:#}"), "{message}");

                let mut body = json!({ "error": message, "error_id": error_id });
                if expose_details {
                    body["details"] = json!(format!("{source:#}"));
                }
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
