use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};

/// Model version tag reported when the fallback formula priced the request.
pub const FALLBACK_MODEL_VERSION: &str = "v1.0-fallback";

/// Model version tag reported for prices obtained from the external API.
pub const EXTERNAL_MODEL_VERSION: &str = "external-api";

/// Rounds a currency amount to two decimal places.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============ Prediction ============

/// Symmetric band around the point estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub min: f64,
    pub max: f64,
}

impl ConfidenceInterval {
    /// Builds the +/-10% band around an unrounded price.
    pub fn around(price: f64) -> Self {
        Self {
            min: round_currency(price * 0.90),
            max: round_currency(price * 1.10),
        }
    }
}

/// Contribution of each input to the predicted price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub area: f64,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub parking: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevator: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<f64>,
}

/// Price estimate for a single property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub predicted_price: f64,
    pub confidence_interval: ConfidenceInterval,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_importance: Option<FeatureImportance>,
    pub model_version: String,
    /// The feature vector fed to the regression model, when one was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features_used: Option<FeatureVector>,
}

impl PredictionResult {
    /// Builds a result from an unrounded price, rounding the price and band.
    pub fn from_price(price: f64, model_version: impl Into<String>) -> Self {
        Self {
            predicted_price: round_currency(price),
            confidence_interval: ConfidenceInterval::around(price),
            feature_importance: None,
            model_version: model_version.into(),
            features_used: None,
        }
    }
}

// ============ Market Analysis ============

/// A synthetic comparable listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarProperty {
    pub price: f64,
    pub area: f64,
    pub bedrooms: i64,
}

/// Simulated neighborhood and city benchmarks around the predicted price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketAnalysis {
    pub predicted: f64,
    pub neighborhood_average: f64,
    pub city_average: f64,
    pub percentile: u8,
    pub similar_properties: Vec<SimilarProperty>,
}

// ============ Optimization Suggestions ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

/// A renovation or amenity that would raise the rent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub feature: String,
    pub impact: Impact,
    /// Expected monthly rent increase, in currency units.
    pub price_increase: f64,
    pub description: String,
    pub roi_months: i64,
}

// ============ Combined Response ============

/// The document emitted for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateResponse {
    pub prediction: PredictionResult,
    pub market_analysis: MarketAnalysis,
    pub optimization_suggestions: Vec<Suggestion>,
    /// Set by the HTTP front end when the local pipeline answered instead of
    /// the external API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_used: Option<bool>,
}
