use axum::{
    body::Bytes,
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fisight_core::analysis::{AnalysisEnvelope, AnalysisResponse, Analyst};
use fisight_core::domain::contract::{self, REQUIRED_FIELDS};
use fisight_core::domain::recommendation::RecommendationResult;
use fisight_core::llm::anthropic::AnthropicClient;
use fisight_core::predictor::{self, PredictionService};

mod error;

use error::ApiError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = fisight_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let predictor = predictor::from_settings(&settings)?;

    let analyst = match AnthropicClient::from_settings(&settings) {
        Ok(llm) => Some(Arc::new(Analyst::new(Arc::new(llm), predictor.clone()))),
        Err(e) => {
            tracing::warn!(error = %e, "LLM not configured; AI analysis disabled");
            None
        }
    };

    let state = AppState { predictor, analyst };
    let app = router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[derive(Clone)]
struct AppState {
    predictor: Arc<dyn PredictionService>,
    analyst: Option<Arc<Analyst>>,
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/ml/predict", get(describe_predict).post(predict))
        .route("/api/ai/analysis", axum::routing::post(analyze))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn describe_predict() -> Json<Value> {
    Json(json!({
        "message": "FiSight ML Prediction API",
        "endpoints": {
            "POST /api/ml/predict": "Get ML-powered financial predictions and insights",
        },
        "required_fields": REQUIRED_FIELDS,
    }))
}

#[derive(Debug, Serialize)]
struct ApiPrediction {
    provider: &'static str,
    #[serde(flatten)]
    result: RecommendationResult,
}

async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiPrediction>, ApiError> {
    let snapshot = contract::parse_snapshot(&body)?;

    let prediction = state
        .predictor
        .predict(&snapshot)
        .await
        .map_err(|e| ApiError::internal("Failed to generate ML prediction", e))?;

    tracing::info!(
        provider = prediction.provider,
        action = %prediction.result.predicted_action,
        confidence = prediction.result.confidence,
        risk_score = prediction.result.risk_assessment.score,
        "prediction served"
    );

    Ok(Json(ApiPrediction {
        provider: prediction.provider,
        result: prediction.result,
    }))
}

async fn analyze(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let request = AnalysisEnvelope::from_json_slice(&body)?.into_request()?;

    let Some(analyst) = &state.analyst else {
        return Err(ApiError::Unavailable("AI analysis is not configured"));
    };

    let response = analyst
        .run(request)
        .await
        .map_err(|e| ApiError::internal_with_details("AI analysis failed", e))?;

    Ok(Json(response))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &fisight_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
