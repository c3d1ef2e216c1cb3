use crate::models::{round_currency, MarketAnalysis, SimilarProperty};
use crate::property::PropertyRecord;

/// Percentile reported for every estimate.
const MARKET_PERCENTILE: u8 = 65;

/// Comparable listings as (price multiplier, area offset in m²).
const COMPARABLES: [(f64, f64); 3] = [(0.92, -5.0), (1.05, 8.0), (0.98, 2.0)];

/// Builds the simulated market comparison for a predicted price.
///
/// All figures derive from `predicted_price`; there is no market data source.
pub fn calculate_market_comparison(record: &PropertyRecord, predicted_price: f64) -> MarketAnalysis {
    let similar_properties = COMPARABLES
        .iter()
        .map(|(price_factor, area_offset)| SimilarProperty {
            price: round_currency(predicted_price * price_factor),
            area: record.area + area_offset,
            bedrooms: record.bedrooms,
        })
        .collect();

    MarketAnalysis {
        predicted: predicted_price,
        neighborhood_average: round_currency(predicted_price * 0.95),
        city_average: round_currency(predicted_price * 0.88),
        percentile: MARKET_PERCENTILE,
        similar_properties,
    }
}
