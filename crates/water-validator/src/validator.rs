//! Observation Validator for Range Checking

use crate::error::ValidationError;
use crate::fields::FieldSpec;
use crate::observation::Observation;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// pH valid range
    pub ph_range: (f64, f64),
    /// Temperature valid range (°C)
    pub temperature_range: (f64, f64),
    /// Fat valid range
    pub fat_range: (f64, f64),
    /// Turbidity valid range
    pub turbidity_range: (f64, f64),
    /// Colour valid range
    pub colour_range: (u16, u16),
}

impl Default for ValidationConfig {
    /// Domains taken from the operator field descriptors
    fn default() -> Self {
        let (colour_min, colour_max) = field_range("Colour");
        Self {
            ph_range: field_range("pH"),
            temperature_range: field_range("Temperature"),
            fat_range: field_range("Fat"),
            turbidity_range: field_range("Turbidity"),
            colour_range: (colour_min as u16, colour_max as u16),
        }
    }
}

fn field_range(name: &str) -> (f64, f64) {
    FieldSpec::lookup(name)
        .map(FieldSpec::range)
        .unwrap_or((f64::NEG_INFINITY, f64::INFINITY))
}

/// Result of validating every field
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

/// Validator for operator-entered observations
pub struct ObservationValidator {
    config: ValidationConfig,
}

impl ObservationValidator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field });
        }
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate an observation, stopping at the first violation
    pub fn validate(&self, observation: &Observation) -> Result<(), ValidationError> {
        match self.checks(observation).into_iter().find_map(Result::err) {
            Some(err) => {
                debug!("Observation rejected: {}", err);
                Err(err)
            }
            None => Ok(()),
        }
    }

    /// Validate every field and collect all violations
    pub fn validate_all(&self, observation: &Observation) -> ValidationReport {
        let checks = self.checks(observation);
        let fields_checked = checks.len();
        let errors: Vec<ValidationError> = checks.into_iter().filter_map(Result::err).collect();
        ValidationReport {
            valid: errors.is_empty(),
            errors,
            fields_checked,
        }
    }

    fn checks(&self, observation: &Observation) -> Vec<Result<(), ValidationError>> {
        let colour_range = (
            f64::from(self.config.colour_range.0),
            f64::from(self.config.colour_range.1),
        );
        // Taste and Odor are constrained by their type
        vec![
            self.validate_range("pH", observation.ph, self.config.ph_range),
            self.validate_range("Temperature", observation.temperature, self.config.temperature_range),
            self.validate_range("Fat", observation.fat, self.config.fat_range),
            self.validate_range("Turbidity", observation.turbidity, self.config.turbidity_range),
            self.validate_range("Colour", f64::from(observation.colour), colour_range),
        ]
    }
}

impl Default for ObservationValidator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::Binary;
    use proptest::prelude::*;

    #[test]
    fn test_default_observation_is_valid() {
        let validator = ObservationValidator::default();
        assert!(validator.validate(&Observation::default()).is_ok());
    }

    #[test]
    fn test_default_ranges_follow_field_descriptors() {
        let config = ValidationConfig::default();
        assert_eq!(config.ph_range, (0.0, 14.0));
        assert_eq!(config.temperature_range, FieldSpec::lookup("Temperature").unwrap().range());
        assert_eq!(config.fat_range, FieldSpec::lookup("Fat").unwrap().range());
        assert_eq!(config.turbidity_range, (0.0, f64::INFINITY));
        assert_eq!(config.colour_range, (240, 255));
    }

    #[test]
    fn test_ph_bounds() {
        let validator = ObservationValidator::default();
        for ph in [0.0, 7.0, 14.0] {
            let obs = Observation { ph, ..Default::default() };
            assert!(validator.validate(&obs).is_ok());
        }
        let obs = Observation { ph: 14.1, ..Default::default() };
        assert!(matches!(
            validator.validate(&obs),
            Err(ValidationError::OutOfRange { field: "pH", .. })
        ));
    }

    #[test]
    fn test_colour_bounds() {
        let validator = ObservationValidator::default();
        let low = Observation { colour: 239, ..Default::default() };
        let high = Observation { colour: 256, ..Default::default() };
        assert!(validator.validate(&low).is_err());
        assert!(validator.validate(&high).is_err());
        let edge = Observation { colour: 240, ..Default::default() };
        assert!(validator.validate(&edge).is_ok());
    }

    #[test]
    fn test_negative_measurements_rejected() {
        let validator = ObservationValidator::default();
        let obs = Observation {
            temperature: -1.0,
            fat: -0.1,
            turbidity: -2.0,
            ..Default::default()
        };
        let report = validator.validate_all(&obs);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 3);
        assert_eq!(report.fields_checked, 5);
    }

    #[test]
    fn test_nan_rejected() {
        let validator = ObservationValidator::default();
        let obs = Observation { fat: f64::NAN, ..Default::default() };
        assert_eq!(
            validator.validate(&obs),
            Err(ValidationError::NotFinite { field: "Fat" })
        );
    }

    proptest! {
        #[test]
        fn prop_in_domain_observations_pass(
            ph in 0.0f64..=14.0,
            temperature in 0.0f64..1000.0,
            fat in 0.0f64..100.0,
            turbidity in 0.0f64..100.0,
            colour in 240u16..=255,
            taste in any::<bool>(),
        ) {
            let obs = Observation {
                ph,
                temperature,
                taste: if taste { Binary::Acceptable } else { Binary::Unacceptable },
                odor: Binary::Acceptable,
                fat,
                turbidity,
                colour,
            };
            prop_assert!(ObservationValidator::default().validate(&obs).is_ok());
        }
    }
}
