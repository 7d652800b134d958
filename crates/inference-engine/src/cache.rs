//! Content-Addressed Model Cache

use crate::predictor::TrainedModels;
use crate::InferenceError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Identifies one training run: same dataset bytes and hyperparameters give
/// the same models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub digest: [u8; 32],
    pub seed: u64,
    pub n_trees: usize,
}

/// Bounded cache of trained models (oldest entry evicted first)
pub struct ModelCache {
    entries: Mutex<VecDeque<(CacheKey, Arc<TrainedModels>)>>,
    capacity: usize,
}

impl ModelCache {
    /// Create a cache holding at most `capacity` model sets
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    /// Look up trained models
    pub fn get(&self, key: &CacheKey) -> Result<Option<Arc<TrainedModels>>, InferenceError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| InferenceError::Cache(format!("Lock error: {}", e)))?;
        Ok(entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, models)| Arc::clone(models)))
    }

    /// Store trained models, evicting the oldest entry when full
    pub fn insert(&self, key: CacheKey, models: Arc<TrainedModels>) -> Result<(), InferenceError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| InferenceError::Cache(format!("Lock error: {}", e)))?;

        entries.retain(|(k, _)| *k != key);
        while entries.len() >= self.capacity {
            entries.pop_front();
            debug!("Model cache full, evicted oldest entry");
        }
        entries.push_back((key, models));
        Ok(())
    }

    /// Number of cached model sets
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry
    pub fn clear(&self) -> Result<(), InferenceError> {
        self.entries
            .lock()
            .map_err(|e| InferenceError::Cache(format!("Lock error: {}", e)))?
            .clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::PredictorConfig;
    use reference_data::ReferenceDataset;

    fn models() -> Arc<TrainedModels> {
        let csv = "pH,Temperature,Taste,Odor,Fat,Turbidity,Colour,Grade\n7,25,1,1,1,1,250,1\n9,60,0,1,0,1,241,0\n";
        let ds = ReferenceDataset::from_csv_bytes(csv.as_bytes()).unwrap();
        let config = PredictorConfig {
            n_trees: 2,
            ..Default::default()
        };
        Arc::new(TrainedModels::fit(&ds, &config).unwrap())
    }

    fn key(byte: u8) -> CacheKey {
        CacheKey {
            digest: [byte; 32],
            seed: 42,
            n_trees: 2,
        }
    }

    #[test]
    fn test_get_after_insert() {
        let cache = ModelCache::new(2);
        assert!(cache.is_empty());
        cache.insert(key(1), models()).unwrap();
        assert!(cache.get(&key(1)).unwrap().is_some());
        assert!(cache.get(&key(2)).unwrap().is_none());
    }

    #[test]
    fn test_seed_is_part_of_key() {
        let cache = ModelCache::new(2);
        cache.insert(key(1), models()).unwrap();
        let other_seed = CacheKey { seed: 7, ..key(1) };
        assert!(cache.get(&other_seed).unwrap().is_none());
    }

    #[test]
    fn test_evicts_oldest() {
        let cache = ModelCache::new(2);
        let shared = models();
        cache.insert(key(1), Arc::clone(&shared)).unwrap();
        cache.insert(key(2), Arc::clone(&shared)).unwrap();
        cache.insert(key(3), shared).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key(1)).unwrap().is_none());
        assert!(cache.get(&key(3)).unwrap().is_some());
    }

    #[test]
    fn test_reinsert_does_not_duplicate() {
        let cache = ModelCache::new(3);
        cache.insert(key(1), models()).unwrap();
        cache.insert(key(1), models()).unwrap();
        assert_eq!(cache.len(), 1);
        cache.clear().unwrap();
        assert!(cache.is_empty());
    }
}
