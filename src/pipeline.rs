//! End-to-end estimate for a single property.
//!
//! 1. Price the record (trained model, or fallback formula)
//! 2. Simulate the market comparison around that price
//! 3. Rank optimization suggestions against that price
use crate::diagnostics::DiagnosticSink;
use crate::errors::AppError;
use crate::market::calculate_market_comparison;
use crate::model::PriceModel;
use crate::models::EstimateResponse;
use crate::predictor::Predictor;
use crate::property::PropertyRecord;
use crate::suggestions::generate_optimization_suggestions;

/// Runs the pipeline on an already coerced record.
pub fn estimate(
    record: &PropertyRecord,
    model: Option<&dyn PriceModel>,
    diagnostics: &dyn DiagnosticSink,
) -> Result<EstimateResponse, AppError> {
    let prediction = Predictor::new(model, diagnostics).predict(record)?;
    tracing::debug!(
        "Predicted {} with {}",
        prediction.predicted_price,
        prediction.model_version
    );

    let market_analysis = calculate_market_comparison(record, prediction.predicted_price);
    let optimization_suggestions =
        generate_optimization_suggestions(record, prediction.predicted_price);

    Ok(EstimateResponse {
        prediction,
        market_analysis,
        optimization_suggestions,
        fallback_used: None,
    })
}

/// Parses one JSON document and runs the pipeline on it.
///
/// Parse and coercion failures are returned to the caller, as is a fallback
/// formula that overflows. Trained-model problems never are.
pub fn run(
    input: &str,
    model: Option<&dyn PriceModel>,
    diagnostics: &dyn DiagnosticSink,
) -> Result<EstimateResponse, AppError> {
    let record = PropertyRecord::from_json_str(input)?;
    estimate(&record, model, diagnostics)
}

/// Serializes a response as the single output line.
///
/// Non-ASCII text is written as literal UTF-8.
pub fn render(response: &EstimateResponse) -> Result<String, AppError> {
    serde_json::to_string(response)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingDiagnostics;

    #[test]
    fn output_keeps_accents_unescaped() {
        let sink = CollectingDiagnostics::new();
        let response = run(r#"{"area": 50, "hasSecurity": "no"}"#, None, &sink).unwrap();
        let line = render(&response).unwrap();

        assert!(line.contains("Segurança 24h"));
        assert!(!line.contains("\\u00e7"));
        assert!(!line.contains('\n'));
    }

    #[test]
    fn top_level_keys() {
        let sink = CollectingDiagnostics::new();
        let response = run("{}", None, &sink).unwrap();
        let value = serde_json::to_value(&response).unwrap();
        let object = value.as_object().unwrap();

        assert!(object.contains_key("prediction"));
        assert!(object.contains_key("market_analysis"));
        assert!(object.contains_key("optimization_suggestions"));
        assert!(!object.contains_key("fallback_used"));
    }
}
