//! Dataset provider interfaces and built-in providers.
//!
//! Ownership model:
//! - `DatasetProvider` is the task-facing interface that returns raw rows for a
//!   (dataset, config, split) triple.
//! - `LocalSnapshotProvider` reads shard files already on disk.
//! - `HuggingFaceProvider` fills a snapshot directory from the hub, then reads it
//!   through the same snapshot reader.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::constants::source::DEFAULT_CONFIG_DIR;
use crate::errors::TaskError;
use crate::types::{ConfigName, DatasetId, RawExample, SplitName};

/// Snapshot-backed and hub-backed provider implementations.
pub mod backends;

#[cfg(feature = "huggingface")]
pub use backends::huggingface::{HuggingFaceConfig, HuggingFaceProvider};
pub use backends::snapshot::LocalSnapshotProvider;

/// Dataset identity as published on the hub.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DatasetRef {
    /// Repository id, e.g. `nyu-mll/glue`.
    pub dataset: DatasetId,
    /// Config (subset) name, e.g. `sst2`. `None` uses the dataset default.
    pub config: Option<ConfigName>,
}

impl DatasetRef {
    /// Dataset without an explicit config.
    pub fn new(dataset: impl Into<DatasetId>) -> Self {
        Self {
            dataset: dataset.into(),
            config: None,
        }
    }

    /// Dataset with an explicit config.
    pub fn with_config(dataset: impl Into<DatasetId>, config: impl Into<ConfigName>) -> Self {
        Self {
            dataset: dataset.into(),
            config: Some(config.into()),
        }
    }

    /// Directory name used for this config inside a snapshot root.
    pub fn config_dir(&self) -> &str {
        self.config.as_deref().unwrap_or(DEFAULT_CONFIG_DIR)
    }
}

impl fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.config {
            Some(config) => write!(f, "{}/{}", self.dataset, config),
            None => f.write_str(&self.dataset),
        }
    }
}

/// Task-facing dataset fetcher.
///
/// For a fixed backing store, repeated calls must return rows in the same order.
pub trait DatasetProvider: Send + Sync {
    /// Stable provider identifier used in logs.
    fn id(&self) -> &str;
    /// Load every raw row of `split`.
    fn load_split(&self, dataset: &DatasetRef, split: &str)
    -> Result<Vec<RawExample>, TaskError>;
}

/// Provider serving rows registered in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryProvider {
    splits: HashMap<(DatasetRef, SplitName), Arc<Vec<RawExample>>>,
}

impl InMemoryProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rows` for `split` of `dataset`, replacing earlier rows.
    pub fn insert(&mut self, dataset: DatasetRef, split: impl Into<SplitName>, rows: Vec<RawExample>) {
        self.splits.insert((dataset, split.into()), Arc::new(rows));
    }

    /// Builder form of [`InMemoryProvider::insert`].
    pub fn with_split(
        mut self,
        dataset: DatasetRef,
        split: impl Into<SplitName>,
        rows: Vec<RawExample>,
    ) -> Self {
        self.insert(dataset, split, rows);
        self
    }
}

impl DatasetProvider for InMemoryProvider {
    fn id(&self) -> &str {
        "in_memory"
    }

    fn load_split(
        &self,
        dataset: &DatasetRef,
        split: &str,
    ) -> Result<Vec<RawExample>, TaskError> {
        self.splits
            .get(&(dataset.clone(), split.to_string()))
            .map(|rows| rows.as_ref().clone())
            .ok_or_else(|| TaskError::SourceUnavailable {
                dataset: dataset.to_string(),
                reason: format!("no rows registered for split '{split}'"),
            })
    }
}

impl<P: DatasetProvider + ?Sized> DatasetProvider for Arc<P> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn load_split(
        &self,
        dataset: &DatasetRef,
        split: &str,
    ) -> Result<Vec<RawExample>, TaskError> {
        (**self).load_split(dataset, split)
    }
}
