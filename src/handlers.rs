use crate::circuit_breaker::ExternalApiBreaker;
use crate::diagnostics::TracingDiagnostics;
use crate::errors::AppError;
use crate::external_api::ExternalPredictionClient;
use crate::model::PriceModel;
use crate::models::{EstimateResponse, FALLBACK_MODEL_VERSION};
use crate::pipeline;
use crate::predictor::FallbackBreakdown;
use crate::property::PropertyRecord;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use failsafe::futures::CircuitBreaker;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Fields a web form submission must carry.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "area",
    "bedrooms",
    "bathrooms",
    "parkingSpaces",
    "propertyType",
    "neighborhood",
    "city",
];

/// Shared application state injected into handlers.
pub struct AppState {
    /// Trained model, loaded once at startup. `None` means fallback formula.
    pub model: Option<Arc<dyn PriceModel>>,
    /// Client for the external prediction API (optional).
    pub external_client: Option<ExternalPredictionClient>,
    /// Fails fast when the external API keeps failing.
    pub external_breaker: ExternalApiBreaker,
}

/// Builds the HTTP router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/predict", post(predict_rent))
        .layer(
            ServiceBuilder::new()
                // Property records are tiny; 1MB is plenty
                .layer(RequestBodyLimitLayer::new(1024 * 1024)),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-rent-estimator",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Rejects form submissions that miss any of [`REQUIRED_FIELDS`].
pub fn validate_required_fields(payload: &Value) -> Result<(), AppError> {
    let fields = payload
        .as_object()
        .ok_or_else(|| AppError::BadRequest("Request body must be a JSON object".to_string()))?;

    match REQUIRED_FIELDS
        .iter()
        .find(|field| is_blank(fields.get(**field)))
    {
        Some(field) => Err(AppError::BadRequest(format!(
            "Missing required field: {}",
            field
        ))),
        None => Ok(()),
    }
}

/// POST /api/predict
///
/// Prices a property. The external prediction API answers when it is
/// configured and healthy; otherwise the local pipeline does, and the
/// response is flagged with `fallback_used`.
pub async fn predict_rent(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EstimateResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    validate_required_fields(&payload)?;
    let record = PropertyRecord::from_value(&payload)?;

    if let Some(client) = &state.external_client {
        match state.external_breaker.call(client.predict(&record)).await {
            Ok(response) => {
                tracing::info!("External API answered the prediction");
                return Ok(Json(response));
            }
            Err(failsafe::Error::Rejected) => {
                tracing::warn!("External API circuit open, using local pipeline");
            }
            Err(failsafe::Error::Inner(e)) => {
                tracing::warn!(
                    "External API {} failed, using local pipeline: {}",
                    client.endpoint(),
                    e
                );
            }
        }
    }

    let mut response = pipeline::estimate(&record, state.model.as_deref(), &TracingDiagnostics)?;
    if response.prediction.model_version == FALLBACK_MODEL_VERSION {
        response.prediction.feature_importance =
            Some(FallbackBreakdown::for_record(&record).feature_importance());
    }
    response.fallback_used = Some(true);

    Ok(Json(response))
}
