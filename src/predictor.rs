//! Rent prediction: trained regression first, fixed formula as fallback.

use crate::diagnostics::DiagnosticSink;
use crate::errors::AppError;
use crate::features::map_property_to_features;
use crate::model::PriceModel;
use crate::models::{FeatureImportance, PredictionResult, FALLBACK_MODEL_VERSION};
use crate::property::PropertyRecord;

/// Lowest rent the regression is allowed to report.
pub const MIN_PREDICTED_PRICE: f64 = 500.0;

/// Anything that can price a property record.
pub trait RentEstimator {
    fn estimate(&self, record: &PropertyRecord) -> Result<PredictionResult, AppError>;
}

/// Prices a record with a trained [`PriceModel`].
pub struct RegressionEstimator<'a> {
    model: &'a dyn PriceModel,
}

impl<'a> RegressionEstimator<'a> {
    pub fn new(model: &'a dyn PriceModel) -> Self {
        Self { model }
    }
}

impl RentEstimator for RegressionEstimator<'_> {
    fn estimate(&self, record: &PropertyRecord) -> Result<PredictionResult, AppError> {
        let features = map_property_to_features(record);
        let raw = self.model.predict(&features)?;
        if !raw.is_finite() {
            return Err(AppError::Prediction(format!(
                "model produced a non-finite value ({})",
                raw
            )));
        }

        let price = raw.max(MIN_PREDICTED_PRICE);
        let mut result = PredictionResult::from_price(price, self.model.version());
        result.features_used = Some(features);
        Ok(result)
    }
}

/// Additive terms of the fallback formula, before the multipliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackBreakdown {
    pub base: f64,
    pub area: f64,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub parking: f64,
    pub elevator: f64,
    pub pool: f64,
    pub security: f64,
}

impl FallbackBreakdown {
    pub fn for_record(record: &PropertyRecord) -> Self {
        let bonus = |present: bool, amount: f64| if present { amount } else { 0.0 };
        Self {
            base: 1000.0,
            area: record.area * 18.0,
            bedrooms: record.bedrooms as f64 * 400.0,
            bathrooms: record.bathrooms as f64 * 250.0,
            parking: record.parking_spaces as f64 * 300.0,
            elevator: bonus(record.has_elevator.is_yes(), 200.0),
            pool: bonus(record.has_pool.is_yes(), 150.0),
            security: bonus(record.has_security.is_yes(), 180.0),
        }
    }

    pub fn total(&self) -> f64 {
        self.base
            + self.area
            + self.bedrooms
            + self.bathrooms
            + self.parking
            + self.elevator
            + self.pool
            + self.security
    }

    pub fn feature_importance(&self) -> FeatureImportance {
        FeatureImportance {
            area: self.area,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            parking: self.parking,
            elevator: Some(self.elevator),
            pool: Some(self.pool),
            security: Some(self.security),
        }
    }
}

/// Deterministic pricing formula used when no trained model is usable.
///
/// Not floored at [`MIN_PREDICTED_PRICE`]; only the regression output is.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackEstimator;

impl FallbackEstimator {
    pub fn price(&self, record: &PropertyRecord) -> f64 {
        FallbackBreakdown::for_record(record).total()
            * record.property_type.multiplier()
            * record.furnished.multiplier()
    }
}

impl RentEstimator for FallbackEstimator {
    /// Fails only when the record's magnitudes overflow the formula.
    fn estimate(&self, record: &PropertyRecord) -> Result<PredictionResult, AppError> {
        let price = self.price(record);
        if !price.is_finite() {
            return Err(AppError::Prediction(format!(
                "fallback formula produced a non-finite value ({}) for area {}",
                price, record.area
            )));
        }
        Ok(PredictionResult::from_price(price, FALLBACK_MODEL_VERSION))
    }
}

/// Chooses between the trained model and the fallback estimator.
pub struct Predictor<'a> {
    model: Option<&'a dyn PriceModel>,
    fallback: &'a dyn RentEstimator,
    diagnostics: &'a dyn DiagnosticSink,
}

impl<'a> Predictor<'a> {
    pub fn new(model: Option<&'a dyn PriceModel>, diagnostics: &'a dyn DiagnosticSink) -> Self {
        Self {
            model,
            fallback: &FallbackEstimator,
            diagnostics,
        }
    }

    /// Replaces the estimator that answers when the regression cannot.
    pub fn with_fallback(mut self, fallback: &'a dyn RentEstimator) -> Self {
        self.fallback = fallback;
        self
    }

    /// Regression failures are reported and the fallback answers instead.
    /// Only a fallback failure reaches the caller.
    pub fn predict(&self, record: &PropertyRecord) -> Result<PredictionResult, AppError> {
        match self.model {
            Some(model) => {
                let regression = RegressionEstimator::new(model);
                let primary: &dyn RentEstimator = &regression;
                match primary.estimate(record) {
                    Ok(result) => return Ok(result),
                    Err(e) => self.diagnostics.report(&e.to_string()),
                }
            }
            None => tracing::debug!("No trained model available, using fallback formula"),
        }

        self.fallback.estimate(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingDiagnostics;
    use crate::features::FeatureVector;
    use crate::model::LinearModel;
    use crate::property::{Flag, Furnished, PropertyType};

    struct FixedModel(f64);

    impl PriceModel for FixedModel {
        fn predict(&self, _features: &FeatureVector) -> Result<f64, AppError> {
            Ok(self.0)
        }

        fn version(&self) -> &str {
            "fixed"
        }
    }

    fn scenario_a() -> PropertyRecord {
        PropertyRecord {
            area: 70.0,
            bedrooms: 2,
            bathrooms: 1,
            parking_spaces: 1,
            ..Default::default()
        }
    }

    #[test]
    fn fallback_formula_plain_apartment() {
        let result = FallbackEstimator.estimate(&scenario_a()).unwrap();
        assert_eq!(result.predicted_price, 3610.0);
        assert_eq!(result.confidence_interval.min, 3249.0);
        assert_eq!(result.confidence_interval.max, 3971.0);
        assert_eq!(result.model_version, FALLBACK_MODEL_VERSION);
        assert!(result.features_used.is_none());
    }

    #[test]
    fn fallback_formula_applies_both_multipliers() {
        let record = PropertyRecord {
            furnished: Furnished::Yes,
            property_type: PropertyType::Condo,
            ..scenario_a()
        };
        assert_eq!(FallbackEstimator.estimate(&record).unwrap().predicted_price, 4981.8);
    }

    #[test]
    fn amenity_bonuses_add_up() {
        let record = PropertyRecord {
            has_elevator: Flag::Yes,
            has_pool: Flag::Yes,
            has_security: Flag::Yes,
            ..scenario_a()
        };
        assert_eq!(FallbackEstimator.estimate(&record).unwrap().predicted_price, 3610.0 + 530.0);
    }

    #[test]
    fn fallback_is_not_floored() {
        let record = PropertyRecord {
            bedrooms: 0,
            bathrooms: 0,
            property_type: PropertyType::Studio,
            ..Default::default()
        };
        assert_eq!(FallbackEstimator.estimate(&record).unwrap().predicted_price, 850.0);

        let tiny = PropertyRecord {
            area: -40.0,
            bedrooms: 0,
            bathrooms: 0,
            ..Default::default()
        };
        assert!(FallbackEstimator.estimate(&tiny).unwrap().predicted_price < MIN_PREDICTED_PRICE);
    }

    #[test]
    fn regression_output_is_floored() {
        let model = FixedModel(300.0);
        let sink = CollectingDiagnostics::new();
        let result = Predictor::new(Some(&model), &sink)
            .predict(&scenario_a())
            .unwrap();

        assert_eq!(result.predicted_price, 500.0);
        assert_eq!(result.confidence_interval.min, 450.0);
        assert_eq!(result.confidence_interval.max, 550.0);
        assert_eq!(result.model_version, "fixed");
        assert!(result.features_used.is_some());
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn regression_failure_falls_back_with_a_diagnostic() {
        let model = LinearModel::new(vec![1.0, 2.0]);
        let sink = CollectingDiagnostics::new();
        let result = Predictor::new(Some(&model), &sink)
            .predict(&scenario_a())
            .unwrap();

        assert_eq!(result.model_version, FALLBACK_MODEL_VERSION);
        assert_eq!(result.predicted_price, 3610.0);
        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("shapes mismatch"));
    }

    #[test]
    fn non_finite_model_output_falls_back() {
        let model = FixedModel(f64::NAN);
        let sink = CollectingDiagnostics::new();
        let result = Predictor::new(Some(&model), &sink)
            .predict(&scenario_a())
            .unwrap();

        assert_eq!(result.model_version, FALLBACK_MODEL_VERSION);
        assert_eq!(sink.messages().len(), 1);
    }

    #[test]
    fn overflowing_fallback_is_an_error() {
        let record = PropertyRecord {
            area: 1e307,
            property_type: PropertyType::Condo,
            ..Default::default()
        };
        let sink = CollectingDiagnostics::new();
        let err = Predictor::new(None, &sink).predict(&record).unwrap_err();

        assert!(matches!(err, AppError::Prediction(_)));
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn regression_failure_and_fallback_failure_both_surface() {
        let model = FixedModel(f64::INFINITY);
        let record = PropertyRecord {
            area: f64::MAX,
            ..Default::default()
        };
        let sink = CollectingDiagnostics::new();
        let result = Predictor::new(Some(&model), &sink).predict(&record);

        assert!(matches!(result, Err(AppError::Prediction(_))));
        assert_eq!(sink.messages().len(), 1);
    }

    struct FixedEstimate(f64);

    impl RentEstimator for FixedEstimate {
        fn estimate(&self, _record: &PropertyRecord) -> Result<PredictionResult, AppError> {
            Ok(PredictionResult::from_price(self.0, "stub"))
        }
    }

    #[test]
    fn injected_fallback_answers_after_a_regression_failure() {
        let model = FixedModel(f64::NAN);
        let stub = FixedEstimate(1234.0);
        let sink = CollectingDiagnostics::new();
        let result = Predictor::new(Some(&model), &sink)
            .with_fallback(&stub)
            .predict(&scenario_a())
            .unwrap();

        assert_eq!(result.predicted_price, 1234.0);
        assert_eq!(result.model_version, "stub");

        let without_model = Predictor::new(None, &sink)
            .with_fallback(&stub)
            .predict(&scenario_a())
            .unwrap();
        assert_eq!(without_model.model_version, "stub");
    }

    #[test]
    fn breakdown_reports_each_contribution() {
        let breakdown = FallbackBreakdown::for_record(&scenario_a());
        let importance = breakdown.feature_importance();
        assert_eq!(importance.area, 1260.0);
        assert_eq!(importance.bedrooms, 800.0);
        assert_eq!(importance.parking, 300.0);
        assert_eq!(importance.elevator, Some(0.0));
        assert_eq!(breakdown.total(), 3610.0);
    }
}
