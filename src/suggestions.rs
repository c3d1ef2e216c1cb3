//! Rent optimization suggestions.
//!
//! Each rule looks at one aspect of the property and, when the property lacks
//! it, proposes an improvement with an expected monthly rent increase. Rules
//! run in a fixed order, the result is sorted by increase (ties keep rule
//! order) and only the best [`MAX_SUGGESTIONS`] are returned.

use crate::models::{round_currency, Impact, Suggestion};
use crate::property::{Furnished, PropertyRecord};

pub const MAX_SUGGESTIONS: usize = 5;

fn suggestion(
    feature: &str,
    impact: Impact,
    price_increase: f64,
    description: &str,
    roi_months: i64,
) -> Suggestion {
    Suggestion {
        feature: feature.to_string(),
        impact,
        price_increase,
        description: description.to_string(),
        roi_months,
    }
}

/// Generates the ranked suggestion list for a property priced at
/// `predicted_price`.
pub fn generate_optimization_suggestions(
    record: &PropertyRecord,
    predicted_price: f64,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    if record.has_elevator.is_no() {
        suggestions.push(suggestion(
            "Elevador",
            Impact::High,
            200.0,
            "Adicionar elevador pode aumentar o valor em até R$ 200/mês",
            120,
        ));
    }

    if record.has_pool.is_no() {
        suggestions.push(suggestion(
            "Piscina",
            Impact::Medium,
            150.0,
            "Piscina no condomínio pode aumentar o valor em até R$ 150/mês",
            80,
        ));
    }

    if record.has_security.is_no() {
        suggestions.push(suggestion(
            "Segurança 24h",
            Impact::High,
            180.0,
            "Segurança 24h aumenta o valor e a atratividade do imóvel",
            36,
        ));
    }

    if record.furnished == Furnished::No {
        suggestions.push(suggestion(
            "Mobília",
            Impact::High,
            round_currency(predicted_price * 0.15),
            "Mobiliar o imóvel pode aumentar o valor em até 15%",
            24,
        ));
    }

    if record.parking_spaces == 0 {
        suggestions.push(suggestion(
            "Vaga de Garagem",
            Impact::High,
            300.0,
            "Adicionar vaga de garagem pode aumentar significativamente o valor",
            60,
        ));
    }

    if record.bedrooms < 3 {
        suggestions.push(suggestion(
            "Reforma da Cozinha",
            Impact::Medium,
            round_currency(predicted_price * 0.08),
            "Reformar a cozinha para qualidade excelente pode aumentar o valor em até 8%",
            18,
        ));
    }

    rank(suggestions)
}

/// Sorts by descending price increase and keeps the top entries.
pub fn rank(mut suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    suggestions.sort_by(|a, b| b.price_increase.total_cmp(&a.price_increase));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}
