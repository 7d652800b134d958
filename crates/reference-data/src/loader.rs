//! Dataset Source Resolution

use crate::dataset::ReferenceDataset;
use crate::DatasetError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default local dataset file
pub const DEFAULT_DATASET_PATH: &str = "processed_data.csv";

/// Loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Fixed local dataset path, checked first
    pub local_path: PathBuf,
    /// Largest accepted upload
    pub max_upload_bytes: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            local_path: PathBuf::from(DEFAULT_DATASET_PATH),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Operator-supplied dataset file
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: Option<String>, bytes: Vec<u8>) -> Self {
        Self { file_name, bytes }
    }
}

/// Where the reference dataset will be read from
#[derive(Debug, Clone)]
pub enum DatasetSource {
    LocalFile(PathBuf),
    Upload(Upload),
}

impl DatasetSource {
    /// Read and parse the dataset
    pub fn read(&self) -> Result<ReferenceDataset, DatasetError> {
        match self {
            DatasetSource::LocalFile(path) => {
                let bytes = std::fs::read(path)?;
                ReferenceDataset::from_csv_bytes(&bytes)
            }
            DatasetSource::Upload(upload) => ReferenceDataset::from_csv_bytes(&upload.bytes),
        }
    }

    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            DatasetSource::LocalFile(path) => format!("local file {}", path.display()),
            DatasetSource::Upload(upload) => format!(
                "upload {} ({} bytes)",
                upload.file_name.as_deref().unwrap_or("<unnamed>"),
                upload.bytes.len()
            ),
        }
    }
}

/// Resolves the local file first, then the upload
pub struct DatasetLoader {
    config: LoaderConfig,
}

impl DatasetLoader {
    /// Create a new loader with given config
    pub fn new(config: LoaderConfig) -> Self {
        info!("Creating dataset loader for {}", config.local_path.display());
        Self { config }
    }

    /// Pick the dataset source. An empty upload counts as no upload.
    pub fn resolve(&self, upload: Option<Upload>) -> Result<DatasetSource, DatasetError> {
        if self.config.local_path.is_file() {
            debug!("Using local dataset {}", self.config.local_path.display());
            return Ok(DatasetSource::LocalFile(self.config.local_path.clone()));
        }

        match upload.filter(|u| !u.bytes.is_empty()) {
            Some(upload) if upload.bytes.len() > self.config.max_upload_bytes => {
                Err(DatasetError::TooLarge {
                    size: upload.bytes.len(),
                    limit: self.config.max_upload_bytes,
                })
            }
            Some(upload) => Ok(DatasetSource::Upload(upload)),
            None => {
                warn!(
                    "No dataset at {} and no upload provided",
                    self.config.local_path.display()
                );
                Err(DatasetError::Missing {
                    path: display_name(&self.config.local_path),
                })
            }
        }
    }

    /// Resolve and read in one step
    pub fn load(&self, upload: Option<Upload>) -> Result<ReferenceDataset, DatasetError> {
        let source = self.resolve(upload)?;
        info!("Reading reference dataset from {}", source.describe());
        source.read()
    }

    /// Whether the local file is currently present
    pub fn local_available(&self) -> bool {
        self.config.local_path.is_file()
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "pH,Temperature,Taste,Odor,Fat,Turbidity,Colour,Grade\n7,25,1,1,1,1,250,1\n6,30,0,1,0,1,245,0\n";

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("reference-data-{}.csv", uuid::Uuid::new_v4()))
    }

    fn loader_for(path: PathBuf) -> DatasetLoader {
        DatasetLoader::new(LoaderConfig {
            local_path: path,
            max_upload_bytes: 1024,
        })
    }

    #[test]
    fn test_missing_without_upload() {
        let loader = loader_for(scratch_path());
        let err = loader.load(None).unwrap_err();
        assert!(matches!(err, DatasetError::Missing { .. }));
    }

    #[test]
    fn test_missing_message_names_file() {
        let loader = loader_for(PathBuf::from("/nonexistent/dir/processed_data.csv"));
        let err = loader.resolve(None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "File 'processed_data.csv' tidak ditemukan. Silakan upload file untuk melanjutkan."
        );
    }

    #[test]
    fn test_empty_upload_counts_as_missing() {
        let loader = loader_for(scratch_path());
        let upload = Upload::new(Some(String::new()), Vec::new());
        assert!(matches!(
            loader.resolve(Some(upload)),
            Err(DatasetError::Missing { .. })
        ));
    }

    #[test]
    fn test_upload_used_when_local_absent() {
        let loader = loader_for(scratch_path());
        let upload = Upload::new(Some("data.csv".into()), CSV.as_bytes().to_vec());
        let ds = loader.load(Some(upload)).unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_oversized_upload_rejected() {
        let loader = loader_for(scratch_path());
        let upload = Upload::new(None, vec![b'a'; 2048]);
        assert!(matches!(
            loader.resolve(Some(upload)),
            Err(DatasetError::TooLarge { size: 2048, limit: 1024 })
        ));
    }

    #[test]
    fn test_local_file_wins_over_upload() {
        let path = scratch_path();
        std::fs::write(&path, CSV).unwrap();
        let loader = loader_for(path.clone());

        let bogus = Upload::new(None, b"not a dataset".to_vec());
        let source = loader.resolve(Some(bogus)).unwrap();
        assert!(matches!(source, DatasetSource::LocalFile(_)));
        assert_eq!(source.read().unwrap().len(), 2);
        assert!(loader.local_available());

        std::fs::remove_file(path).unwrap();
    }
}
