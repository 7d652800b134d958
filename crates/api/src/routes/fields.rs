//! Field Descriptor Routes

use axum::Json;
use water_validator::{FieldSpec, FIELDS};

/// List the seven operator prompts
pub async fn get_fields() -> Json<Vec<FieldSpec>> {
    Json(FIELDS.to_vec())
}
