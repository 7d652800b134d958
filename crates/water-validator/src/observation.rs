//! Water Sample Observation

use crate::error::ValidationError;
use crate::fields::FieldSpec;
use serde::{Deserialize, Serialize};

/// Number of features in an observation
pub const FEATURE_DIMENSION: usize = 7;

/// Canonical feature column names, in feature vector order
pub const FEATURE_COLUMNS: [&str; FEATURE_DIMENSION] = [
    "pH",
    "Temperature",
    "Taste",
    "Odor",
    "Fat",
    "Turbidity",
    "Colour",
];

/// Binary sensory judgement (0 = unacceptable, 1 = acceptable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Binary {
    #[default]
    Unacceptable,
    Acceptable,
}

impl Binary {
    /// Numeric encoding used by the reference dataset
    pub fn as_f64(self) -> f64 {
        match self {
            Binary::Unacceptable => 0.0,
            Binary::Acceptable => 1.0,
        }
    }
}

impl TryFrom<u8> for Binary {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Binary::Unacceptable),
            1 => Ok(Binary::Acceptable),
            other => Err(ValidationError::InvalidChoice {
                field: "binary",
                value: other.to_string(),
            }),
        }
    }
}

impl From<Binary> for u8 {
    fn from(value: Binary) -> Self {
        match value {
            Binary::Unacceptable => 0,
            Binary::Acceptable => 1,
        }
    }
}

/// One set of operator-entered measurements.
///
/// Serialized field names match the reference dataset columns. Fields that
/// are absent when deserializing take the input form defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Observation {
    #[serde(rename = "pH")]
    pub ph: f64,
    /// Degrees Celsius
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    #[serde(rename = "Taste")]
    pub taste: Binary,
    #[serde(rename = "Odor")]
    pub odor: Binary,
    #[serde(rename = "Fat")]
    pub fat: f64,
    #[serde(rename = "Turbidity")]
    pub turbidity: f64,
    /// Colour index, 240-255
    #[serde(rename = "Colour")]
    pub colour: u16,
}

impl Default for Observation {
    fn default() -> Self {
        Self {
            ph: 7.0,
            temperature: 25.0,
            taste: Binary::Unacceptable,
            odor: Binary::Unacceptable,
            fat: 1.0,
            turbidity: 1.0,
            colour: 250,
        }
    }
}

impl Observation {
    /// Collect an observation from raw `(field, text)` pairs.
    ///
    /// Fields not present keep their defaults. Only syntax is checked here
    /// (numbers, 0/1 choices, whole numbers); ranges are the validator's job.
    pub fn collect<'a, I>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut observation = Self::default();
        for (name, raw) in pairs {
            let spec = FieldSpec::lookup(name)
                .ok_or_else(|| ValidationError::UnknownField(name.to_string()))?;
            let value = spec.parse(raw)?;
            observation.set(spec.name, value)?;
        }
        Ok(observation)
    }

    fn set(&mut self, name: &'static str, value: f64) -> Result<(), ValidationError> {
        match name {
            "pH" => self.ph = value,
            "Temperature" => self.temperature = value,
            "Taste" => self.taste = binary_from(name, value)?,
            "Odor" => self.odor = binary_from(name, value)?,
            "Fat" => self.fat = value,
            "Turbidity" => self.turbidity = value,
            "Colour" => {
                // Representable as u16; the domain check belongs to the validator
                let max = f64::from(u16::MAX);
                if !(0.0..=max).contains(&value) {
                    return Err(ValidationError::OutOfRange {
                        field: name,
                        value,
                        min: 0.0,
                        max,
                    });
                }
                self.colour = value as u16;
            }
            other => return Err(ValidationError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    /// Feature values in [`FEATURE_COLUMNS`] order
    pub fn feature_vector(&self) -> [f64; FEATURE_DIMENSION] {
        [
            self.ph,
            self.temperature,
            self.taste.as_f64(),
            self.odor.as_f64(),
            self.fat,
            self.turbidity,
            f64::from(self.colour),
        ]
    }

    /// Look up a feature value by column name
    pub fn get(&self, column: &str) -> Option<f64> {
        FEATURE_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|idx| self.feature_vector()[idx])
    }
}

fn binary_from(field: &'static str, value: f64) -> Result<Binary, ValidationError> {
    if value == 0.0 {
        Ok(Binary::Unacceptable)
    } else if value == 1.0 {
        Ok(Binary::Acceptable)
    } else {
        Err(ValidationError::InvalidChoice {
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_form() {
        let obs = Observation::default();
        assert_eq!(obs.ph, 7.0);
        assert_eq!(obs.temperature, 25.0);
        assert_eq!(obs.fat, 1.0);
        assert_eq!(obs.turbidity, 1.0);
        assert_eq!(obs.colour, 250);
    }

    #[test]
    fn test_feature_vector_order() {
        let obs = Observation {
            ph: 6.5,
            temperature: 30.0,
            taste: Binary::Acceptable,
            odor: Binary::Unacceptable,
            fat: 0.0,
            turbidity: 1.0,
            colour: 245,
        };
        assert_eq!(obs.feature_vector(), [6.5, 30.0, 1.0, 0.0, 0.0, 1.0, 245.0]);
        assert_eq!(obs.get("Colour"), Some(245.0));
        assert_eq!(obs.get("Grade"), None);
    }

    #[test]
    fn test_collect_from_pairs() {
        let obs = Observation::collect([("pH", "8.1"), ("Taste", "1"), ("Colour", "255")]).unwrap();
        assert_eq!(obs.ph, 8.1);
        assert_eq!(obs.taste, Binary::Acceptable);
        assert_eq!(obs.odor, Binary::Unacceptable);
        assert_eq!(obs.colour, 255);
    }

    #[test]
    fn test_collect_rejects_bad_input() {
        assert!(matches!(
            Observation::collect([("Odor", "2")]),
            Err(ValidationError::InvalidChoice { field: "Odor", .. })
        ));
        assert!(matches!(
            Observation::collect([("Colour", "250.5")]),
            Err(ValidationError::NotInteger { field: "Colour", .. })
        ));
        assert!(matches!(
            Observation::collect([("Salinity", "3")]),
            Err(ValidationError::UnknownField(_))
        ));
        assert!(matches!(
            Observation::collect([("pH", "abc")]),
            Err(ValidationError::InvalidNumber { field: "pH", .. })
        ));
    }

    #[test]
    fn test_collect_colour_overflow_reports_checked_bounds() {
        assert_eq!(
            Observation::collect([("Colour", "70000")]),
            Err(ValidationError::OutOfRange {
                field: "Colour",
                value: 70000.0,
                min: 0.0,
                max: 65535.0,
            })
        );
        // In range for u16 but outside 240-255: left to the validator
        assert_eq!(Observation::collect([("Colour", "100")]).unwrap().colour, 100);
    }

    #[test]
    fn test_serde_uses_dataset_column_names() {
        let json = r#"{"pH":7.2,"Temperature":40.0,"Taste":1,"Odor":1,"Fat":1.0,"Turbidity":0.0,"Colour":254}"#;
        let obs: Observation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.temperature, 40.0);
        assert_eq!(obs.odor, Binary::Acceptable);

        let back = serde_json::to_value(obs).unwrap();
        assert_eq!(back["Taste"], 1);
        assert_eq!(back["Colour"], 254);
    }

    #[test]
    fn test_serde_missing_fields_take_defaults() {
        let obs: Observation = serde_json::from_str(r#"{"Taste":1}"#).unwrap();
        assert_eq!(obs.taste, Binary::Acceptable);
        assert_eq!(obs.colour, 250);
    }

    #[test]
    fn test_serde_rejects_non_binary() {
        let result: Result<Observation, _> = serde_json::from_str(r#"{"Taste":3}"#);
        assert!(result.is_err());
    }
}
