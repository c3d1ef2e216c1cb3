use crate::errors::AppError;
use crate::market::calculate_market_comparison;
use crate::models::{
    ConfidenceInterval, EstimateResponse, FeatureImportance, Impact, PredictionResult,
    Suggestion, EXTERNAL_MODEL_VERSION,
};
use crate::property::{Furnished, PropertyRecord};
use crate::suggestions::generate_optimization_suggestions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request body understood by the external prediction API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalPredictionRequest {
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub area_first_floor_sqm: f64,
    pub has_second_floor: bool,
    pub bathrooms: i64,
    pub kitchen_quality_excellent: bool,
}

impl ExternalPredictionRequest {
    pub fn from_record(record: &PropertyRecord) -> Self {
        Self {
            city: record.city.clone(),
            neighborhood: record.neighborhood.clone(),
            area_first_floor_sqm: record.area,
            has_second_floor: record.bedrooms > 2,
            bathrooms: record.bathrooms,
            kitchen_quality_excellent: record.furnished == Furnished::Yes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalSuggestion {
    pub tip: String,
    pub value_increase: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalPrediction {
    pub price_prediction: f64,
    #[serde(default)]
    pub suggestions: Vec<ExternalSuggestion>,
}

/// Client for the external rent prediction API.
#[derive(Clone)]
pub struct ExternalPredictionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ExternalPredictionClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Full URL of the prediction endpoint.
    /// * `timeout` - Upper bound for a whole request.
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create prediction client: {}", e))
            })?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Asks the external API for a price and adapts its answer.
    pub async fn predict(&self, record: &PropertyRecord) -> Result<EstimateResponse, AppError> {
        let payload = ExternalPredictionRequest::from_record(record);
        tracing::debug!("Calling external prediction API: {:?}", payload);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::ExternalApiError("Timed out waiting for external API".to_string())
                } else {
                    AppError::ExternalApiError(format!("External API request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "External API returned status {}",
                response.status()
            )));
        }

        let external: ExternalPrediction = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse external API response: {}", e))
        })?;

        tracing::info!(
            "External API predicted {} with {} suggestions",
            external.price_prediction,
            external.suggestions.len()
        );
        Ok(adapt_external_response(&external, record))
    }
}

fn impact_for(value_increase: f64) -> Impact {
    if value_increase > 300.0 {
        Impact::High
    } else if value_increase > 150.0 {
        Impact::Medium
    } else {
        Impact::Low
    }
}

/// Converts the external API's answer into the response document.
///
/// The external service only returns a price and tips; the market comparison
/// is computed locally, as are suggestions when it returns none.
pub fn adapt_external_response(
    external: &ExternalPrediction,
    record: &PropertyRecord,
) -> EstimateResponse {
    let price = external.price_prediction;

    let suggestions: Vec<Suggestion> = external
        .suggestions
        .iter()
        .map(|s| Suggestion {
            feature: s.tip.clone(),
            impact: impact_for(s.value_increase),
            price_increase: s.value_increase,
            description: s.reason.clone(),
            roi_months: (s.value_increase * 12.0 / 100.0).round() as i64,
        })
        .collect();

    let prediction = PredictionResult {
        predicted_price: price,
        confidence_interval: ConfidenceInterval::around(price),
        feature_importance: Some(FeatureImportance {
            area: (price * 0.4).round(),
            bedrooms: (price * 0.15).round(),
            bathrooms: (price * 0.1).round(),
            parking: (price * 0.1).round(),
            elevator: None,
            pool: None,
            security: None,
        }),
        model_version: EXTERNAL_MODEL_VERSION.to_string(),
        features_used: None,
    };

    let optimization_suggestions = if suggestions.is_empty() {
        generate_optimization_suggestions(record, price)
    } else {
        suggestions
    };

    EstimateResponse {
        prediction,
        market_analysis: calculate_market_comparison(record, price),
        optimization_suggestions,
        fallback_used: None,
    }
}
