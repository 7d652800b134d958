//! Water Sample Input Validation
//!
//! Provides the observation model, the operator input field descriptors,
//! and range checking for water quality measurements.

mod error;
mod fields;
mod observation;
mod quality;
mod validator;

pub use error::ValidationError;
pub use fields::{FieldKind, FieldSpec, FIELDS};
pub use observation::{Binary, Observation, FEATURE_COLUMNS, FEATURE_DIMENSION};
pub use quality::Quality;
pub use validator::{ObservationValidator, ValidationConfig, ValidationReport};
