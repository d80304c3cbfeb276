use std::io;

use thiserror::Error;

use crate::types::{DatasetId, FieldName, SplitName, TaskName};

/// Error type for task lookup, dataset loading, and sampling failures.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("unknown task group '{group}' in task name '{name}'")]
    UnknownTask { name: TaskName, group: String },
    #[error("task '{task}' has no template version {version}")]
    UnknownTemplate { task: TaskName, version: u32 },
    #[error("cannot draw {requested} samples from split '{split}' holding {available}")]
    Sampling {
        split: SplitName,
        requested: usize,
        available: usize,
    },
    #[error("{task} example is missing required field '{field}'")]
    MissingField { task: TaskName, field: FieldName },
    #[error("{task} example has invalid field '{field}': {reason}")]
    InvalidField {
        task: TaskName,
        field: FieldName,
        reason: String,
    },
    #[error("dataset '{dataset}' is unavailable: {reason}")]
    SourceUnavailable { dataset: DatasetId, reason: String },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
}
