#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line runners shared by the crate binaries.
pub mod apps;
/// Load-time and train-set sampling configuration.
pub mod config;
/// Centralized constants used across tasks, sampling, and sources.
pub mod constants;
/// Sample, candidate, and answer types.
pub mod data;
mod hash;
/// Seeded subset and train-set sampling.
pub mod sampling;
/// Dataset provider traits and built-in providers.
pub mod source;
/// Split labels, split collections, and load-time caps.
pub mod splits;
/// Benchmark adapters and task-name dispatch.
pub mod tasks;
/// Prompt template identifiers.
pub mod templates;
/// Shared type aliases.
pub mod types;
/// Typed accessors over raw example fields.
pub mod utils;

mod errors;

pub use config::{TaskConfig, TrainSetRequest};
pub use data::{Answer, Candidate, Sample, SampleId};
pub use errors::TaskError;
pub use sampling::{TrainSetSeeds, sample_subset, sample_train_sets};
pub use source::{DatasetProvider, DatasetRef, InMemoryProvider, LocalSnapshotProvider};
#[cfg(feature = "huggingface")]
pub use source::{HuggingFaceConfig, HuggingFaceProvider};
pub use splits::{CapPolicy, SampleSplits, SplitCap, SplitLabel};
pub use tasks::{Benchmark, TaskDataset, TaskSpec, get_task, resolve_task};
pub use templates::TemplateId;
pub use types::{ConfigName, DatasetId, FieldName, RawExample, SplitName, SubtaskName, TaskName};
