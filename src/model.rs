//! Trained rent regression and its loader.

use crate::diagnostics::DiagnosticSink;
use crate::errors::{AppError, ResultExt};
use crate::features::FeatureVector;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;

/// Tag reported for predictions made by the trained regression.
pub const TRAINED_MODEL_VERSION: &str = "modelo_3_regressao_linear";

/// A fitted model that turns a feature vector into a raw rent estimate.
pub trait PriceModel: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<f64, AppError>;

    /// Identifier reported as `model_version`.
    fn version(&self) -> &str;
}

/// Ordinary least squares coefficients, one per feature column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearModel {
    #[serde(default = "default_model_version")]
    pub model_version: String,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
}

fn default_model_version() -> String {
    TRAINED_MODEL_VERSION.to_string()
}

impl LinearModel {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self {
            model_version: default_model_version(),
            feature_names: None,
            coefficients,
        }
    }

    /// Reads and decodes a model artifact.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&raw).map_err(|e| {
            AppError::ModelLoad(format!("invalid model artifact {}: {}", path.display(), e))
        })
    }
}

impl PriceModel for LinearModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, AppError> {
        let row = features.as_array();
        if self.coefficients.len() != row.len() {
            return Err(AppError::Prediction(format!(
                "shapes mismatch: model has {} coefficients, feature vector has {} columns",
                self.coefficients.len(),
                row.len()
            )));
        }

        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FeatureVector::NAMES) {
                return Err(AppError::Prediction(format!(
                    "feature names mismatch: model expects {:?}",
                    names
                )));
            }
        }

        let price: f64 = self
            .coefficients
            .iter()
            .zip(row.iter())
            .map(|(coef, x)| coef * x)
            .sum();

        if !price.is_finite() {
            return Err(AppError::Prediction(format!(
                "model produced a non-finite value ({})",
                price
            )));
        }

        Ok(price)
    }

    fn version(&self) -> &str {
        &self.model_version
    }
}

/// Loads the trained model from `path`.
///
/// A missing or unreadable artifact is not an error for the caller: it is
/// reported on `diagnostics` and `None` is returned, so the fallback formula
/// takes over.
pub fn load_trained_model(path: &Path, diagnostics: &dyn DiagnosticSink) -> Option<LinearModel> {
    match std::fs::metadata(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            diagnostics.report(&format!(
                "Model not found at {}. Place modelo_3_regressao_linear.json next to the executable.",
                path.display()
            ));
            return None;
        }
        _ => {}
    }

    match LinearModel::from_file(path) {
        Ok(model) => {
            tracing::info!(
                "Loaded model {} ({} coefficients) from {}",
                model.model_version,
                model.coefficients.len(),
                path.display()
            );
            Some(model)
        }
        Err(e) => {
            diagnostics.report(&format!("Failed to load model: {}", e));
            None
        }
    }
}
