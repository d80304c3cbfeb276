use parquet::file::reader::{FileReader, SerializedFileReader};
use rayon::prelude::*;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::constants::source::SHARD_EXTENSIONS;
use crate::errors::TaskError;
use crate::source::{DatasetProvider, DatasetRef};
use crate::types::RawExample;

/// Provider reading shard files from a local snapshot tree.
///
/// Layout: `<root>/<dataset>/<config or "default">/...`. A shard belongs to a
/// split when a directory on its relative path is named after the split, or
/// when its file stem is the split name or starts with `<split>-`
/// (`train-00000-of-00001.parquet`).
#[derive(Clone, Debug)]
pub struct LocalSnapshotProvider {
    root: PathBuf,
    shard_extensions: Vec<String>,
}

impl LocalSnapshotProvider {
    /// Create a provider rooted at `root`, accepting every supported shard extension.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            shard_extensions: SHARD_EXTENSIONS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Restrict accepted shard extensions (leading dots and case are ignored).
    pub fn with_shard_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.shard_extensions = extensions
            .iter()
            .map(|value| {
                value
                    .as_ref()
                    .trim()
                    .trim_start_matches('.')
                    .to_ascii_lowercase()
            })
            .collect();
        self
    }

    /// Snapshot root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every split of `dataset`.
    pub fn config_root(&self, dataset: &DatasetRef) -> PathBuf {
        self.root.join(&dataset.dataset).join(dataset.config_dir())
    }

    /// Directory the hub provider downloads `split` shards into.
    pub fn split_root(&self, dataset: &DatasetRef, split: &str) -> PathBuf {
        self.config_root(dataset).join(split)
    }

    /// Sorted shard paths of `split`; empty when none exist.
    pub fn split_shards(&self, dataset: &DatasetRef, split: &str) -> Vec<PathBuf> {
        let config_root = self.config_root(dataset);
        let mut shards = WalkDir::new(&config_root)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| self.accepts(path))
            .filter(|path| {
                path.strip_prefix(&config_root)
                    .is_ok_and(|relative| shard_matches_split(relative, split))
            })
            .collect::<Vec<_>>();
        shards.sort();
        shards
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.shard_extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }
}

impl DatasetProvider for LocalSnapshotProvider {
    fn id(&self) -> &str {
        "local_snapshot"
    }

    fn load_split(
        &self,
        dataset: &DatasetRef,
        split: &str,
    ) -> Result<Vec<RawExample>, TaskError> {
        let started = Instant::now();
        let shards = self.split_shards(dataset, split);
        if shards.is_empty() {
            return Err(TaskError::SourceUnavailable {
                dataset: dataset.to_string(),
                reason: format!(
                    "no shard files for split '{}' under {} with extensions {:?}",
                    split,
                    self.config_root(dataset).display(),
                    self.shard_extensions
                ),
            });
        }

        let label = dataset.to_string();
        let rows = shards
            .par_iter()
            .map(|path| read_shard(&label, path))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        info!(
            "[fewshot:snapshot] loaded {} split '{}' in {:.2}s (rows={}, shards={})",
            label,
            split,
            started.elapsed().as_secs_f64(),
            rows.len(),
            shards.len()
        );
        Ok(rows)
    }
}

/// Whether a shard path (relative to its config root) belongs to `split`.
pub(crate) fn shard_matches_split(relative: &Path, split: &str) -> bool {
    let in_split_dir = relative
        .parent()
        .is_some_and(|parent| parent.components().any(|part| part.as_os_str() == split));
    if in_split_dir {
        return true;
    }
    let split_prefix = format!("{split}-");
    relative
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem == split || stem.starts_with(&split_prefix))
}

/// Read every row of one shard file.
pub(crate) fn read_shard(dataset: &str, path: &Path) -> Result<Vec<RawExample>, TaskError> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();
    debug!("[fewshot:snapshot] reading shard {}", path.display());
    match ext.as_str() {
        "parquet" => read_parquet(dataset, path),
        "json" => read_json_array(dataset, path),
        _ => read_json_lines(dataset, path),
    }
}

fn read_parquet(dataset: &str, path: &Path) -> Result<Vec<RawExample>, TaskError> {
    let file = File::open(path).map_err(|err| unavailable(dataset, "opening parquet shard", path, err))?;
    let reader = SerializedFileReader::new(file)
        .map_err(|err| unavailable(dataset, "reading parquet shard", path, err))?;
    let rows = reader
        .get_row_iter(None)
        .map_err(|err| unavailable(dataset, "iterating parquet shard", path, err))?;

    let mut examples = Vec::new();
    for (position, row) in rows.enumerate() {
        let row = row.map_err(|err| {
            unavailable(dataset, &format!("reading parquet row {position} of"), path, err)
        })?;
        examples.push(into_example(dataset, path, position, row.to_json_value())?);
    }
    Ok(examples)
}

fn read_json_lines(dataset: &str, path: &Path) -> Result<Vec<RawExample>, TaskError> {
    let file = File::open(path).map_err(|err| unavailable(dataset, "opening shard", path, err))?;
    let mut examples = Vec::new();
    for (position, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|err| unavailable(dataset, "reading shard", path, err))?;
        if line.trim().is_empty() {
            continue;
        }
        let value = serde_json::from_str::<Value>(&line).map_err(|err| {
            unavailable(dataset, &format!("parsing line {} of", position + 1), path, err)
        })?;
        examples.push(into_example(dataset, path, position, value)?);
    }
    Ok(examples)
}

fn read_json_array(dataset: &str, path: &Path) -> Result<Vec<RawExample>, TaskError> {
    let body = fs::read_to_string(path).map_err(|err| unavailable(dataset, "reading shard", path, err))?;
    let value = serde_json::from_str::<Value>(&body)
        .map_err(|err| unavailable(dataset, "parsing shard", path, err))?;
    let Value::Array(items) = value else {
        return Err(TaskError::SourceUnavailable {
            dataset: dataset.to_string(),
            reason: format!("{} must hold a JSON array of objects", path.display()),
        });
    };
    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| into_example(dataset, path, position, item))
        .collect()
}

fn into_example(
    dataset: &str,
    path: &Path,
    position: usize,
    value: Value,
) -> Result<RawExample, TaskError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(TaskError::SourceUnavailable {
            dataset: dataset.to_string(),
            reason: format!(
                "row {} of {} is not an object: {}",
                position,
                path.display(),
                other
            ),
        }),
    }
}

fn unavailable(
    dataset: &str,
    action: &str,
    path: &Path,
    err: impl std::fmt::Display,
) -> TaskError {
    TaskError::SourceUnavailable {
        dataset: dataset.to_string(),
        reason: format!("failed {action} {}: {err}", path.display()),
    }
}
