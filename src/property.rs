//! Property record as submitted by the caller.
//!
//! The record arrives as a loosely typed JSON object (form submissions send
//! numbers as strings), so every field goes through an explicit coercion step
//! here. Missing fields fall back to their defaults; values that are present
//! but cannot be coerced are reported as `AppError::FieldCoercion`.

use crate::errors::AppError;
use serde_json::{Map, Value};

/// A yes/no amenity flag (`hasElevator`, `hasPool`, `hasSecurity`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Yes,
    /// Explicit "no", or the field was absent.
    No,
    /// Any other value. Neither counts as having nor as lacking the amenity.
    Unrecognized,
}

impl Flag {
    fn from_field(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Flag::No,
            Some(Value::String(s)) if s == "yes" => Flag::Yes,
            Some(Value::String(s)) if s == "no" => Flag::No,
            Some(_) => Flag::Unrecognized,
        }
    }

    pub fn is_yes(self) -> bool {
        self == Flag::Yes
    }

    pub fn is_no(self) -> bool {
        self == Flag::No
    }
}

/// Furnishing status of the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Furnished {
    Yes,
    Partial,
    No,
    Unrecognized,
}

impl Furnished {
    fn from_field(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Furnished::No,
            Some(Value::String(s)) => match s.as_str() {
                "yes" => Furnished::Yes,
                "partial" => Furnished::Partial,
                "no" => Furnished::No,
                _ => Furnished::Unrecognized,
            },
            Some(_) => Furnished::Unrecognized,
        }
    }

    /// Price multiplier applied by the fallback formula.
    pub fn multiplier(self) -> f64 {
        match self {
            Furnished::Yes => 1.15,
            Furnished::Partial => 1.08,
            Furnished::No | Furnished::Unrecognized => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    Apartment,
    House,
    Condo,
    Studio,
    Unrecognized,
}

impl PropertyType {
    fn from_field(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => PropertyType::Apartment,
            Some(Value::String(s)) => match s.as_str() {
                "apartment" => PropertyType::Apartment,
                "house" => PropertyType::House,
                "condo" => PropertyType::Condo,
                "studio" => PropertyType::Studio,
                _ => PropertyType::Unrecognized,
            },
            Some(_) => PropertyType::Unrecognized,
        }
    }

    /// Price multiplier applied by the fallback formula.
    pub fn multiplier(self) -> f64 {
        match self {
            PropertyType::Apartment => 1.0,
            PropertyType::House => 1.1,
            PropertyType::Condo => 1.2,
            PropertyType::Studio => 0.85,
            PropertyType::Unrecognized => 1.0,
        }
    }
}

/// A single property description, already coerced to typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
    /// Usable area in square meters.
    pub area: f64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub parking_spaces: i64,
    pub has_elevator: Flag,
    pub has_pool: Flag,
    pub has_security: Flag,
    pub furnished: Furnished,
    pub property_type: PropertyType,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
}

impl Default for PropertyRecord {
    fn default() -> Self {
        Self {
            area: 0.0,
            bedrooms: 1,
            bathrooms: 1,
            parking_spaces: 0,
            has_elevator: Flag::No,
            has_pool: Flag::No,
            has_security: Flag::No,
            furnished: Furnished::No,
            property_type: PropertyType::Apartment,
            neighborhood: None,
            city: None,
        }
    }
}

impl PropertyRecord {
    /// Parses a record from raw JSON text.
    ///
    /// The whole input must be a single JSON object.
    pub fn from_json_str(input: &str) -> Result<Self, AppError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(&value)
    }

    /// Coerces a JSON value into a record.
    pub fn from_value(value: &Value) -> Result<Self, AppError> {
        let fields = value.as_object().ok_or_else(|| {
            AppError::InputParse(format!(
                "expected a JSON object, found {}",
                json_kind(value)
            ))
        })?;

        let defaults = Self::default();
        Ok(Self {
            area: coerce_float(fields, "area", defaults.area)?,
            bedrooms: coerce_int(fields, "bedrooms", defaults.bedrooms)?,
            bathrooms: coerce_int(fields, "bathrooms", defaults.bathrooms)?,
            parking_spaces: coerce_int(fields, "parkingSpaces", defaults.parking_spaces)?,
            has_elevator: Flag::from_field(fields.get("hasElevator")),
            has_pool: Flag::from_field(fields.get("hasPool")),
            has_security: Flag::from_field(fields.get("hasSecurity")),
            furnished: Furnished::from_field(fields.get("furnished")),
            property_type: PropertyType::from_field(fields.get("propertyType")),
            neighborhood: optional_text(fields, "neighborhood"),
            city: optional_text(fields, "city"),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn coercion_error(field: &str, value: &Value) -> AppError {
    AppError::FieldCoercion {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn coerce_float(fields: &Map<String, Value>, field: &str, default: f64) -> Result<f64, AppError> {
    let Some(value) = fields.get(field) else {
        return Ok(default);
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    // "inf", "NaN" and literals past f64::MAX parse, but price nothing
    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| coercion_error(field, value))
}

fn coerce_int(fields: &Map<String, Value>, field: &str, default: i64) -> Result<i64, AppError> {
    let Some(value) = fields.get(field) else {
        return Ok(default);
    };

    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    };

    parsed.ok_or_else(|| coercion_error(field, value))
}

fn optional_text(fields: &Map<String, Value>, field: &str) -> Option<String> {
    match fields.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
