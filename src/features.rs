use crate::property::PropertyRecord;
use serde::Serialize;

/// Input row for the rent regression, in the column order the model was
/// fitted with.
///
/// Serializes under the model's own column names so the `features_used` echo
/// can be matched against the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    #[serde(rename = "const")]
    pub bias: i64,
    #[serde(rename = "area_primeiro_andar")]
    pub area: f64,
    #[serde(rename = "existe_segundo_andar")]
    pub has_second_floor: i64,
    #[serde(rename = "quantidade_banheiros")]
    pub bathrooms: i64,
    #[serde(rename = "qualidade_da_cozinha_Excelente")]
    pub excellent_kitchen: i64,
}

impl FeatureVector {
    /// Column names, in model order.
    pub const NAMES: [&'static str; 5] = [
        "const",
        "area_primeiro_andar",
        "existe_segundo_andar",
        "quantidade_banheiros",
        "qualidade_da_cozinha_Excelente",
    ];

    pub fn as_array(&self) -> [f64; 5] {
        [
            self.bias as f64,
            self.area,
            self.has_second_floor as f64,
            self.bathrooms as f64,
            self.excellent_kitchen as f64,
        ]
    }
}

/// Maps a property record onto the regression's feature vector.
///
/// The model was trained on houses, so two columns are inferred:
/// three or more bedrooms implies a second floor, and any premium amenity
/// (elevator, pool or security) implies an excellent kitchen.
pub fn map_property_to_features(record: &PropertyRecord) -> FeatureVector {
    let has_second_floor = record.bedrooms >= 3;
    let excellent_kitchen =
        record.has_elevator.is_yes() || record.has_pool.is_yes() || record.has_security.is_yes();

    FeatureVector {
        bias: 1,
        area: record.area,
        has_second_floor: i64::from(has_second_floor),
        bathrooms: record.bathrooms,
        excellent_kitchen: i64::from(excellent_kitchen),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Flag;

    #[test]
    fn second_floor_starts_at_three_bedrooms() {
        let two = PropertyRecord {
            bedrooms: 2,
            ..Default::default()
        };
        let three = PropertyRecord {
            bedrooms: 3,
            ..Default::default()
        };
        assert_eq!(map_property_to_features(&two).has_second_floor, 0);
        assert_eq!(map_property_to_features(&three).has_second_floor, 1);
    }

    #[test]
    fn any_premium_amenity_marks_excellent_kitchen() {
        let plain = PropertyRecord::default();
        assert_eq!(map_property_to_features(&plain).excellent_kitchen, 0);

        let with_pool = PropertyRecord {
            has_pool: Flag::Yes,
            ..Default::default()
        };
        assert_eq!(map_property_to_features(&with_pool).excellent_kitchen, 1);
    }

    #[test]
    fn vector_keeps_model_order() {
        let record = PropertyRecord {
            area: 85.0,
            bedrooms: 4,
            bathrooms: 2,
            has_security: Flag::Yes,
            ..Default::default()
        };
        let features = map_property_to_features(&record);
        assert_eq!(features.as_array(), [1.0, 85.0, 1.0, 2.0, 1.0]);

        let echoed = serde_json::to_value(features).unwrap();
        let keys: Vec<&str> = echoed
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        for name in FeatureVector::NAMES {
            assert!(keys.contains(&name), "missing column {name}");
        }
    }
}
