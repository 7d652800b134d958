//! Reference Dataset Parsing

use crate::DatasetError;
use feature_engine::FeatureMatrix;
use sha2::{Digest, Sha256};
use std::io::Read;
use tracing::{debug, info};
use water_validator::{FEATURE_COLUMNS, FEATURE_DIMENSION};

/// Name of the ground-truth label column
pub const LABEL_COLUMN: &str = "Grade";

/// Labeled reference table with features in [`FEATURE_COLUMNS`] order
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    features: FeatureMatrix,
    labels: Vec<usize>,
    digest: [u8; 32],
}

impl ReferenceDataset {
    /// Parse CSV text. Columns are matched by header name, so their order in
    /// the file is irrelevant.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, DatasetError> {
        Self::from_csv_reader(bytes)
    }

    /// Parse CSV from any reader. The digest is computed over the bytes read.
    pub fn from_csv_reader<R: Read>(mut reader: R) -> Result<Self, DatasetError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let digest: [u8; 32] = Sha256::digest(&bytes).into();

        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(bytes.as_slice());

        let headers = csv_reader.headers()?.clone();
        let layout = ColumnLayout::resolve(&headers)?;

        let mut features = FeatureMatrix::with_columns(FEATURE_DIMENSION);
        let mut labels = Vec::new();
        let mut values = [0.0; FEATURE_DIMENSION];

        for (idx, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = idx + 1;

            for (slot, (&column_idx, column)) in layout
                .features
                .iter()
                .zip(FEATURE_COLUMNS.iter())
                .enumerate()
            {
                let raw = record.get(column_idx).unwrap_or_default();
                values[slot] = parse_feature(raw).ok_or_else(|| DatasetError::InvalidValue {
                    row,
                    column: (*column).to_string(),
                    value: raw.to_string(),
                })?;
            }

            let raw_label = record.get(layout.label).unwrap_or_default();
            let label = parse_label(raw_label).ok_or_else(|| DatasetError::InvalidLabel {
                row,
                value: raw_label.to_string(),
            })?;

            features.push_row(&values)?;
            labels.push(label);
        }

        if labels.is_empty() {
            return Err(DatasetError::Empty);
        }

        info!("Loaded reference dataset: {} rows", labels.len());

        Ok(Self {
            features,
            labels,
            digest,
        })
    }

    /// Feature matrix (rows x 7)
    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    /// Grade per row (0 or 1)
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// SHA-256 of the source bytes
    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    /// Hex-encoded digest
    pub fn digest_hex(&self) -> String {
        self.digest.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Count of (grade 0, grade 1) rows
    pub fn class_counts(&self) -> (usize, usize) {
        let positives = self.labels.iter().filter(|&&l| l == 1).count();
        (self.labels.len() - positives, positives)
    }
}

/// CSV column indices for each canonical feature and the label
struct ColumnLayout {
    features: [usize; FEATURE_DIMENSION],
    label: usize,
}

impl ColumnLayout {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, DatasetError> {
        let names: Vec<&str> = headers.iter().collect();

        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(DatasetError::DuplicateColumn((*name).to_string()));
            }
        }

        let label = names
            .iter()
            .position(|n| *n == LABEL_COLUMN)
            .ok_or(DatasetError::MissingLabel(LABEL_COLUMN))?;

        let missing: Vec<String> = FEATURE_COLUMNS
            .iter()
            .filter(|c| !names.contains(*c))
            .map(|c| (*c).to_string())
            .collect();
        let extra: Vec<String> = names
            .iter()
            .filter(|n| **n != LABEL_COLUMN && !FEATURE_COLUMNS.contains(*n))
            .map(|n| (*n).to_string())
            .collect();

        if !missing.is_empty() || !extra.is_empty() {
            debug!("Schema mismatch: missing={:?} extra={:?}", missing, extra);
            return Err(DatasetError::SchemaMismatch { missing, extra });
        }

        let mut features = [0usize; FEATURE_DIMENSION];
        for (slot, column) in FEATURE_COLUMNS.iter().enumerate() {
            // Presence checked above
            features[slot] = names.iter().position(|n| n == column).unwrap_or_default();
        }

        Ok(Self { features, label })
    }
}

fn parse_feature(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_label(raw: &str) -> Option<usize> {
    match raw.parse::<f64>().ok()? {
        v if v == 0.0 => Some(0),
        v if v == 1.0 => Some(1),
        _ => None,
    }
}
