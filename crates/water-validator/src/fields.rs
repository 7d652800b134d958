//! Operator Input Field Descriptors

use crate::error::ValidationError;
use serde::Serialize;

/// How a field is presented to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free numeric entry with a step
    Number,
    /// Select box over {0, 1}
    Choice,
    /// Integer slider
    Slider,
}

/// Descriptor for one operator prompt
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    /// Column name in the reference dataset
    pub name: &'static str,
    /// Prompt text
    pub label: &'static str,
    pub kind: FieldKind,
    pub min: f64,
    /// Upper bound, `None` when unbounded
    pub max: Option<f64>,
    pub step: f64,
    pub default: f64,
}

/// The seven prompts, in feature column order
pub static FIELDS: [FieldSpec; 7] = [
    FieldSpec {
        name: "pH",
        label: "pH",
        kind: FieldKind::Number,
        min: 0.0,
        max: Some(14.0),
        step: 0.1,
        default: 7.0,
    },
    FieldSpec {
        name: "Temperature",
        label: "Temperature (°C)",
        kind: FieldKind::Number,
        min: 0.0,
        max: None,
        step: 0.1,
        default: 25.0,
    },
    FieldSpec {
        name: "Taste",
        label: "Taste (0=Tidak Layak, 1=Layak)",
        kind: FieldKind::Choice,
        min: 0.0,
        max: Some(1.0),
        step: 1.0,
        default: 0.0,
    },
    FieldSpec {
        name: "Odor",
        label: "Odor (0=Tidak Layak, 1=Layak)",
        kind: FieldKind::Choice,
        min: 0.0,
        max: Some(1.0),
        step: 1.0,
        default: 0.0,
    },
    FieldSpec {
        name: "Fat",
        label: "Fat",
        kind: FieldKind::Number,
        min: 0.0,
        max: None,
        step: 0.1,
        default: 1.0,
    },
    FieldSpec {
        name: "Turbidity",
        label: "Turbidity",
        kind: FieldKind::Number,
        min: 0.0,
        max: None,
        step: 0.1,
        default: 1.0,
    },
    FieldSpec {
        name: "Colour",
        label: "Colour (240-255)",
        kind: FieldKind::Slider,
        min: 240.0,
        max: Some(255.0),
        step: 1.0,
        default: 250.0,
    },
];

impl FieldSpec {
    /// Find the descriptor for a column name
    pub fn lookup(name: &str) -> Option<&'static FieldSpec> {
        FIELDS.iter().find(|f| f.name == name)
    }

    /// Inclusive range, unbounded maximum as infinity
    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max.unwrap_or(f64::INFINITY))
    }

    /// Parse raw operator text into this field's numeric value.
    ///
    /// Empty text yields the default.
    pub fn parse(&self, raw: &str) -> Result<f64, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(self.default);
        }

        let value: f64 = raw.parse().map_err(|_| ValidationError::InvalidNumber {
            field: self.name,
            value: raw.to_string(),
        })?;

        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field: self.name });
        }

        match self.kind {
            FieldKind::Number => Ok(value),
            FieldKind::Choice if value == 0.0 || value == 1.0 => Ok(value),
            FieldKind::Choice => Err(ValidationError::InvalidChoice {
                field: self.name,
                value: raw.to_string(),
            }),
            FieldKind::Slider if value.fract() == 0.0 => Ok(value),
            FieldKind::Slider => Err(ValidationError::NotInteger {
                field: self.name,
                value: raw.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{Observation, FEATURE_COLUMNS};

    #[test]
    fn test_fields_follow_column_order() {
        let names: Vec<&str> = FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names, FEATURE_COLUMNS);
    }

    #[test]
    fn test_field_defaults_match_observation_default() {
        let defaults: Vec<f64> = FIELDS.iter().map(|f| f.default).collect();
        assert_eq!(defaults, Observation::default().feature_vector());
    }

    #[test]
    fn test_parse_empty_is_default() {
        let spec = FieldSpec::lookup("Temperature").unwrap();
        assert_eq!(spec.parse("  ").unwrap(), 25.0);
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        let spec = FieldSpec::lookup("Fat").unwrap();
        assert_eq!(
            spec.parse("inf"),
            Err(ValidationError::NotFinite { field: "Fat" })
        );
        assert!(spec.parse("NaN").is_err());
    }

    #[test]
    fn test_unbounded_range() {
        let spec = FieldSpec::lookup("Turbidity").unwrap();
        assert_eq!(spec.range(), (0.0, f64::INFINITY));
        assert_eq!(FieldSpec::lookup("pH").unwrap().range(), (0.0, 14.0));
    }
}
