use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Repo, RepoType};
use serde_json::Value;
use std::env;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use crate::constants::source::{
    CACHE_DIR_ENV, DEFAULT_CACHE_DIR, HUB_RETRIES, PARQUET_ENDPOINT_ENV,
    PARQUET_MANIFEST_ENDPOINT, PARTIAL_DOWNLOAD_EXTENSION, SHARD_EXTENSIONS, STAGING_DIR,
};
use crate::errors::TaskError;
use crate::source::backends::snapshot::{LocalSnapshotProvider, shard_matches_split};
use crate::source::{DatasetProvider, DatasetRef};
use crate::types::RawExample;

/// Configuration for the hub-backed provider.
#[derive(Clone, Debug)]
pub struct HuggingFaceConfig {
    /// Snapshot root that downloaded shards are written into.
    pub cache_dir: PathBuf,
    /// Datasets-server endpoint listing converted parquet shards.
    pub parquet_endpoint: String,
    /// File extensions accepted as shard files.
    pub shard_extensions: Vec<String>,
    /// Optional hub access token for gated datasets.
    pub token: Option<String>,
}

impl HuggingFaceConfig {
    /// Create a config writing shards under `cache_dir`.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            parquet_endpoint: PARQUET_MANIFEST_ENDPOINT.to_string(),
            shard_extensions: SHARD_EXTENSIONS.iter().map(ToString::to_string).collect(),
            token: None,
        }
    }

    /// Config resolved from `FEWSHOT_CACHE_DIR`, `FEWSHOT_HF_PARQUET_ENDPOINT`, and `HF_TOKEN`.
    pub fn from_env() -> Self {
        let cache_dir = env::var(CACHE_DIR_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CACHE_DIR.to_string());
        let mut config = Self::new(cache_dir);
        if let Ok(endpoint) = env::var(PARQUET_ENDPOINT_ENV)
            && !endpoint.trim().is_empty()
        {
            config.parquet_endpoint = endpoint;
        }
        config.token = env::var("HF_TOKEN")
            .ok()
            .filter(|value| !value.trim().is_empty());
        config
    }
}

/// One shard listed by the datasets-server parquet manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ManifestShard {
    url: String,
    filename: String,
    size: Option<u64>,
}

/// Provider that downloads split shards from the hub into a local snapshot,
/// then serves rows from that snapshot.
///
/// Splits already present in the snapshot are read without network access.
pub struct HuggingFaceProvider {
    config: HuggingFaceConfig,
    snapshot: LocalSnapshotProvider,
}

impl HuggingFaceProvider {
    /// Build a provider and create its cache directory.
    pub fn new(config: HuggingFaceConfig) -> Result<Self, TaskError> {
        fs::create_dir_all(&config.cache_dir).map_err(|err| TaskError::SourceUnavailable {
            dataset: "*".to_string(),
            reason: format!(
                "failed creating cache_dir {}: {err}",
                config.cache_dir.display()
            ),
        })?;
        let snapshot = LocalSnapshotProvider::new(&config.cache_dir)
            .with_shard_extensions(config.shard_extensions.as_slice());
        Ok(Self { config, snapshot })
    }

    /// Snapshot reader backing this provider.
    pub fn snapshot(&self) -> &LocalSnapshotProvider {
        &self.snapshot
    }

    /// Directory a split is downloaded into before it is published.
    ///
    /// It sits outside every config root, so the snapshot reader never sees a
    /// partially fetched split.
    fn staging_root(&self, dataset: &DatasetRef, split: &str) -> PathBuf {
        self.config
            .cache_dir
            .join(STAGING_DIR)
            .join(&dataset.dataset)
            .join(dataset.config_dir())
            .join(split)
    }

    /// Fetch every shard of `split` into staging, then move the whole split
    /// into the snapshot layout. Nothing is published unless all shards landed.
    fn materialize_split(&self, dataset: &DatasetRef, split: &str) -> Result<usize, TaskError> {
        let staging = self.staging_root(dataset, split);
        remove_dir_if_present(dataset, &staging)?;

        let fetched = match self.fetch_into(dataset, split, &staging) {
            Ok(fetched) => fetched,
            Err(err) => {
                let _ = fs::remove_dir_all(&staging);
                return Err(err);
            }
        };
        publish_split(dataset, &staging, &self.snapshot.split_root(dataset, split))?;
        Ok(fetched)
    }

    fn fetch_into(
        &self,
        dataset: &DatasetRef,
        split: &str,
        target_dir: &Path,
    ) -> Result<usize, TaskError> {
        let shards = match self.list_manifest_shards(dataset, split) {
            Ok(shards) => shards,
            Err(err) => {
                warn!("[fewshot:hf] parquet manifest unavailable for {dataset}: {err}");
                Vec::new()
            }
        };

        if !shards.is_empty() {
            info!(
                "[fewshot:hf] downloading {} manifest shard(s) for {} split '{}'",
                shards.len(),
                dataset,
                split
            );
            for shard in &shards {
                self.download_shard(dataset, shard, target_dir)?;
            }
            return Ok(shards.len());
        }

        warn!(
            "[fewshot:hf] parquet manifest listed no shards for {} split '{}'; falling back to repository listing",
            dataset, split
        );
        self.fetch_from_repository(dataset, split, target_dir)
    }

    fn list_manifest_shards(
        &self,
        dataset: &DatasetRef,
        split: &str,
    ) -> Result<Vec<ManifestShard>, TaskError> {
        info!(
            "[fewshot:hf] reading datasets-server parquet manifest for {}",
            dataset
        );
        let mut request = ureq::get(&self.config.parquet_endpoint)
            .query("dataset", &dataset.dataset)
            .query("split", split);
        if let Some(config) = &dataset.config {
            request = request.query("config", config);
        }
        if let Some(token) = &self.config.token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }
        let response = request.call().map_err(|err| TaskError::SourceUnavailable {
            dataset: dataset.to_string(),
            reason: format!("failed querying datasets-server parquet endpoint: {err}"),
        })?;
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|err| TaskError::SourceUnavailable {
                dataset: dataset.to_string(),
                reason: format!("failed reading datasets-server parquet response body: {err}"),
            })?;
        parse_parquet_manifest(dataset, split, &self.snapshot_extensions(), &body)
    }

    fn snapshot_extensions(&self) -> Vec<String> {
        self.config
            .shard_extensions
            .iter()
            .map(|value| value.trim().trim_start_matches('.').to_ascii_lowercase())
            .collect()
    }

    fn download_shard(
        &self,
        dataset: &DatasetRef,
        shard: &ManifestShard,
        target_dir: &Path,
    ) -> Result<PathBuf, TaskError> {
        let target = target_dir.join(&shard.filename);
        if target_matches_expected_size(&target, shard.size) {
            return Ok(target);
        }
        fs::create_dir_all(target_dir).map_err(|err| TaskError::SourceUnavailable {
            dataset: dataset.to_string(),
            reason: format!("failed creating split dir {}: {err}", target_dir.display()),
        })?;

        let partial = target.with_extension(PARTIAL_DOWNLOAD_EXTENSION);
        let mut request = ureq::get(&shard.url);
        if let Some(token) = &self.config.token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }
        let response = request.call().map_err(|err| TaskError::SourceUnavailable {
            dataset: dataset.to_string(),
            reason: format!("failed downloading shard URL '{}': {err}", shard.url),
        })?;
        let mut reader = response.into_body().into_reader();
        let mut file = File::create(&partial).map_err(|err| TaskError::SourceUnavailable {
            dataset: dataset.to_string(),
            reason: format!("failed creating {}: {err}", partial.display()),
        })?;

        let started = Instant::now();
        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; 1024 * 1024];
        loop {
            let read = reader
                .read(&mut buffer)
                .map_err(|err| TaskError::SourceUnavailable {
                    dataset: dataset.to_string(),
                    reason: format!("failed reading shard stream '{}': {err}", shard.url),
                })?;
            if read == 0 {
                break;
            }
            file.write_all(&buffer[..read])
                .map_err(|err| TaskError::SourceUnavailable {
                    dataset: dataset.to_string(),
                    reason: format!("failed writing {}: {err}", partial.display()),
                })?;
            total_bytes = total_bytes.saturating_add(read as u64);
        }
        drop(file);

        if let Some(expected) = shard.size
            && expected > 0
            && expected != total_bytes
        {
            let _ = fs::remove_file(&partial);
            return Err(TaskError::SourceUnavailable {
                dataset: dataset.to_string(),
                reason: format!(
                    "shard '{}' truncated: expected {expected} bytes, got {total_bytes}",
                    shard.url
                ),
            });
        }

        fs::rename(&partial, &target).map_err(|err| TaskError::SourceUnavailable {
            dataset: dataset.to_string(),
            reason: format!(
                "failed moving downloaded shard {} -> {}: {err}",
                partial.display(),
                target.display()
            ),
        })?;
        info!(
            "[fewshot:hf] download complete {}: {:.1} MiB in {:.1}s",
            target.display(),
            total_bytes as f64 / (1024.0 * 1024.0),
            started.elapsed().as_secs_f64()
        );
        Ok(target)
    }

    fn fetch_from_repository(
        &self,
        dataset: &DatasetRef,
        split: &str,
        target_dir: &Path,
    ) -> Result<usize, TaskError> {
        let api = ApiBuilder::new()
            .with_progress(false)
            .with_retries(HUB_RETRIES)
            .with_token(self.config.token.clone())
            .build()
            .map_err(|err| TaskError::SourceUnavailable {
                dataset: dataset.to_string(),
                reason: format!("failed building hf-hub client: {err}"),
            })?;
        let repo_api = api.repo(Repo::new(dataset.dataset.clone(), RepoType::Dataset));
        info!("[fewshot:hf] reading remote file list for {}", dataset.dataset);
        let info = repo_api
            .info()
            .map_err(|err| TaskError::SourceUnavailable {
                dataset: dataset.to_string(),
                reason: format!("failed reading hf-hub repository info: {err}"),
            })?;

        let siblings = info
            .siblings
            .into_iter()
            .map(|entry| entry.rfilename)
            .collect::<Vec<_>>();
        let candidates =
            repository_candidates(dataset, split, &self.snapshot_extensions(), &siblings);
        if candidates.is_empty() {
            return Err(TaskError::SourceUnavailable {
                dataset: dataset.to_string(),
                reason: format!("no remote shard files match split '{split}'"),
            });
        }

        fs::create_dir_all(target_dir).map_err(|err| TaskError::SourceUnavailable {
            dataset: dataset.to_string(),
            reason: format!("failed creating split dir {}: {err}", target_dir.display()),
        })?;
        for remote_path in &candidates {
            let cached = repo_api
                .get(remote_path)
                .map_err(|err| TaskError::SourceUnavailable {
                    dataset: dataset.to_string(),
                    reason: format!("failed downloading '{remote_path}' from hf-hub: {err}"),
                })?;
            let target = target_dir.join(repository_relative_path(dataset, remote_path));
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|err| TaskError::SourceUnavailable {
                    dataset: dataset.to_string(),
                    reason: format!("failed creating {}: {err}", parent.display()),
                })?;
            }
            fs::copy(&cached, &target).map_err(|err| TaskError::SourceUnavailable {
                dataset: dataset.to_string(),
                reason: format!(
                    "failed copying {} -> {}: {err}",
                    cached.display(),
                    target.display()
                ),
            })?;
        }
        Ok(candidates.len())
    }
}

impl DatasetProvider for HuggingFaceProvider {
    fn id(&self) -> &str {
        "huggingface"
    }

    fn load_split(
        &self,
        dataset: &DatasetRef,
        split: &str,
    ) -> Result<Vec<RawExample>, TaskError> {
        if self.snapshot.split_shards(dataset, split).is_empty() {
            let fetched = self.materialize_split(dataset, split)?;
            info!("[fewshot:hf] materialized {fetched} shard(s) for {dataset} split '{split}'");
        } else {
            info!("[fewshot:hf] using cached shards for {dataset} split '{split}'");
        }
        self.snapshot.load_split(dataset, split)
    }
}

fn parse_parquet_manifest(
    dataset: &DatasetRef,
    split: &str,
    accepted: &[String],
    body: &str,
) -> Result<Vec<ManifestShard>, TaskError> {
    let json: Value = serde_json::from_str(body).map_err(|err| TaskError::SourceUnavailable {
        dataset: dataset.to_string(),
        reason: format!("failed parsing datasets-server parquet response: {err}"),
    })?;

    let mut shards = Vec::new();
    let Some(entries) = json.get("parquet_files").and_then(Value::as_array) else {
        return Ok(shards);
    };
    for entry in entries {
        let Some(url) = entry.get("url").and_then(Value::as_str) else {
            continue;
        };
        if entry
            .get("split")
            .and_then(Value::as_str)
            .is_some_and(|value| value != split)
        {
            continue;
        }
        if let Some(config) = &dataset.config
            && entry
                .get("config")
                .and_then(Value::as_str)
                .is_some_and(|value| value != config)
        {
            continue;
        }
        let filename = entry
            .get("filename")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .or_else(|| url.rsplit('/').next().map(ToString::to_string))
            .unwrap_or_default();
        let accepted_ext = Path::new(&filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| accepted.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)));
        if !accepted_ext {
            continue;
        }
        shards.push(ManifestShard {
            url: url.to_string(),
            filename,
            size: entry.get("size").and_then(Value::as_u64),
        });
    }
    shards.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(shards)
}

fn repository_candidates(
    dataset: &DatasetRef,
    split: &str,
    accepted: &[String],
    siblings: &[String],
) -> Vec<String> {
    let mut candidates = siblings
        .iter()
        .filter(|remote_path| {
            Path::new(remote_path.as_str())
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| accepted.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
        })
        .filter(|remote_path| {
            let relative = match &dataset.config {
                Some(config) => match Path::new(remote_path.as_str()).strip_prefix(config) {
                    Ok(relative) => relative,
                    Err(_) => return false,
                },
                None => Path::new(remote_path.as_str()),
            };
            shard_matches_split(relative, split)
        })
        .cloned()
        .collect::<Vec<_>>();
    candidates.sort();
    candidates
}

/// Path of a repository file below the config directory, so files sharing a
/// name in different remote directories stay distinct.
fn repository_relative_path(dataset: &DatasetRef, remote_path: &str) -> PathBuf {
    let remote = Path::new(remote_path);
    let relative = dataset
        .config
        .as_deref()
        .and_then(|config| remote.strip_prefix(config).ok())
        .unwrap_or(remote);
    relative
        .components()
        .filter_map(|part| match part {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

fn remove_dir_if_present(dataset: &DatasetRef, dir: &Path) -> Result<(), TaskError> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(TaskError::SourceUnavailable {
            dataset: dataset.to_string(),
            reason: format!("failed clearing {}: {err}", dir.display()),
        }),
    }
}

/// Move a fully staged split into place, replacing any stale split directory.
fn publish_split(dataset: &DatasetRef, staging: &Path, target: &Path) -> Result<(), TaskError> {
    remove_dir_if_present(dataset, target)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|err| TaskError::SourceUnavailable {
            dataset: dataset.to_string(),
            reason: format!("failed creating {}: {err}", parent.display()),
        })?;
    }
    fs::rename(staging, target).map_err(|err| TaskError::SourceUnavailable {
        dataset: dataset.to_string(),
        reason: format!(
            "failed publishing staged split {} -> {}: {err}",
            staging.display(),
            target.display()
        ),
    })
}

fn target_matches_expected_size(path: &Path, expected_bytes: Option<u64>) -> bool {
    if !path.exists() {
        return false;
    }
    if let Some(expected) = expected_bytes
        && expected > 0
    {
        return fs::metadata(path)
            .map(|meta| meta.len() == expected)
            .unwrap_or(false);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::net::TcpListener;
    use std::thread;
    use tempfile::tempdir;

    fn accepted() -> Vec<String> {
        SHARD_EXTENSIONS.iter().map(ToString::to_string).collect()
    }

    fn spawn_one_shot_http(payload: Vec<u8>) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request_buf = [0u8; 1024];
            let _ = stream.read(&mut request_buf);
            let headers = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                payload.len()
            );
            stream.write_all(headers.as_bytes()).unwrap();
            stream.write_all(&payload).unwrap();
            let _ = stream.flush();
        });
        (format!("http://{addr}"), handle)
    }

    #[test]
    fn manifest_parsing_filters_split_config_and_extension() {
        let dataset = DatasetRef::with_config("nyu-mll/glue", "sst2");
        let body = json!({
            "parquet_files": [
                {"config": "sst2", "split": "train", "url": "https://h/sst2/train/0001.parquet", "filename": "0001.parquet", "size": 10},
                {"config": "sst2", "split": "train", "url": "https://h/sst2/train/0000.parquet", "filename": "0000.parquet", "size": 12},
                {"config": "sst2", "split": "validation", "url": "https://h/sst2/validation/0000.parquet", "filename": "0000.parquet"},
                {"config": "cola", "split": "train", "url": "https://h/cola/train/0000.parquet", "filename": "0000.parquet"},
                {"config": "sst2", "split": "train", "url": "https://h/sst2/train/readme.md", "filename": "readme.md"}
            ]
        })
        .to_string();

        let shards = parse_parquet_manifest(&dataset, "train", &accepted(), &body).unwrap();
        assert_eq!(
            shards,
            vec![
                ManifestShard {
                    url: "https://h/sst2/train/0000.parquet".to_string(),
                    filename: "0000.parquet".to_string(),
                    size: Some(12),
                },
                ManifestShard {
                    url: "https://h/sst2/train/0001.parquet".to_string(),
                    filename: "0001.parquet".to_string(),
                    size: Some(10),
                },
            ]
        );
    }

    #[test]
    fn manifest_without_files_yields_no_shards() {
        let dataset = DatasetRef::new("google/boolq");
        let shards = parse_parquet_manifest(&dataset, "train", &accepted(), "{}").unwrap();
        assert!(shards.is_empty());
        assert!(parse_parquet_manifest(&dataset, "train", &accepted(), "not json").is_err());
    }

    #[test]
    fn repository_candidates_respect_config_prefix_and_split() {
        let dataset = DatasetRef::with_config("aps/super_glue", "copa");
        let siblings = vec![
            "copa/train-00000-of-00001.parquet".to_string(),
            "copa/validation-00000-of-00001.parquet".to_string(),
            "cb/train-00000-of-00001.parquet".to_string(),
            "README.md".to_string(),
        ];
        assert_eq!(
            repository_candidates(&dataset, "train", &accepted(), &siblings),
            vec!["copa/train-00000-of-00001.parquet".to_string()]
        );
    }

    #[test]
    fn target_size_check_handles_missing_and_mismatched_files() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("0000.parquet");
        assert!(!target_matches_expected_size(&path, Some(3)));
        fs::write(&path, b"abc").unwrap();
        assert!(target_matches_expected_size(&path, Some(3)));
        assert!(!target_matches_expected_size(&path, Some(4)));
        assert!(target_matches_expected_size(&path, None));
    }

    #[test]
    fn download_shard_writes_payload_and_verifies_size() {
        let temp = tempdir().unwrap();
        let provider = HuggingFaceProvider::new(HuggingFaceConfig::new(temp.path())).unwrap();
        let dataset = DatasetRef::new("google/boolq");
        let payload = b"{\"question\":\"q\",\"passage\":\"p\",\"answer\":true}\n".to_vec();
        let size = payload.len() as u64;
        let (url, handle) = spawn_one_shot_http(payload);
        let shard = ManifestShard {
            url: format!("{url}/train/0000.jsonl"),
            filename: "0000.jsonl".to_string(),
            size: Some(size),
        };

        let target_dir = provider.snapshot().split_root(&dataset, "train");
        let target = provider.download_shard(&dataset, &shard, &target_dir).unwrap();
        handle.join().unwrap();

        assert!(target.exists());
        assert!(!target.with_extension(PARTIAL_DOWNLOAD_EXTENSION).exists());
        let rows = provider.load_split(&dataset, "train").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["answer"], true);
    }

    fn unreachable_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/train/0001.jsonl")
    }

    fn manifest_body(shards: &[(String, &str, usize)]) -> Vec<u8> {
        let files = shards
            .iter()
            .map(|(url, filename, size)| {
                json!({"split": "train", "url": url, "filename": filename, "size": size})
            })
            .collect::<Vec<_>>();
        json!({"parquet_files": files}).to_string().into_bytes()
    }

    #[test]
    fn failed_shard_download_publishes_nothing() {
        let temp = tempdir().unwrap();
        let dataset = DatasetRef::new("google/boolq");
        let payload = b"{\"question\":\"q\",\"passage\":\"p\",\"answer\":true}\n".to_vec();
        let size = payload.len();
        let (shard_url, shard_handle) = spawn_one_shot_http(payload);
        let body = manifest_body(&[
            (format!("{shard_url}/train/0000.jsonl"), "0000.jsonl", size),
            (unreachable_url(), "0001.jsonl", size),
        ]);
        let (manifest_url, manifest_handle) = spawn_one_shot_http(body);

        let mut config = HuggingFaceConfig::new(temp.path());
        config.parquet_endpoint = manifest_url;
        let provider = HuggingFaceProvider::new(config).unwrap();

        assert!(provider.load_split(&dataset, "train").is_err());
        manifest_handle.join().unwrap();
        shard_handle.join().unwrap();

        assert!(provider.snapshot().split_shards(&dataset, "train").is_empty());
        assert!(!provider.snapshot().split_root(&dataset, "train").exists());
        assert!(!provider.staging_root(&dataset, "train").exists());
    }

    #[test]
    fn complete_split_is_published_after_every_shard_lands() {
        let temp = tempdir().unwrap();
        let dataset = DatasetRef::new("google/boolq");
        let first = b"{\"question\":\"a\",\"passage\":\"p\",\"answer\":true}\n".to_vec();
        let second = b"{\"question\":\"b\",\"passage\":\"p\",\"answer\":false}\n".to_vec();
        let (first_size, second_size) = (first.len(), second.len());
        let (first_url, first_handle) = spawn_one_shot_http(first);
        let (second_url, second_handle) = spawn_one_shot_http(second);
        let body = manifest_body(&[
            (format!("{first_url}/train/0000.jsonl"), "0000.jsonl", first_size),
            (format!("{second_url}/train/0001.jsonl"), "0001.jsonl", second_size),
        ]);
        let (manifest_url, manifest_handle) = spawn_one_shot_http(body);

        let mut config = HuggingFaceConfig::new(temp.path());
        config.parquet_endpoint = manifest_url;
        let provider = HuggingFaceProvider::new(config).unwrap();

        let rows = provider.load_split(&dataset, "train").unwrap();
        manifest_handle.join().unwrap();
        first_handle.join().unwrap();
        second_handle.join().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["question"], "a");
        assert_eq!(rows[1]["question"], "b");
        assert_eq!(provider.snapshot().split_shards(&dataset, "train").len(), 2);
        assert!(!provider.staging_root(&dataset, "train").exists());

        // Served from the published split; every server has shut down.
        assert_eq!(provider.load_split(&dataset, "train").unwrap().len(), 2);
    }

    #[test]
    fn repository_files_keep_their_directories() {
        let dataset = DatasetRef::with_config("org/data", "main");
        let first = repository_relative_path(&dataset, "main/train/a/0000.parquet");
        let second = repository_relative_path(&dataset, "main/train/b/0000.parquet");
        assert_eq!(first, PathBuf::from("train/a/0000.parquet"));
        assert_ne!(first, second);

        let plain = DatasetRef::new("org/data");
        assert_eq!(
            repository_relative_path(&plain, "data/train-00000-of-00001.parquet"),
            PathBuf::from("data/train-00000-of-00001.parquet")
        );
        assert_eq!(
            repository_relative_path(&plain, "../escape/train.jsonl"),
            PathBuf::from("escape/train.jsonl")
        );
    }

    #[test]
    fn publishing_replaces_a_stale_split_directory() {
        let temp = tempdir().unwrap();
        let dataset = DatasetRef::new("google/boolq");
        let staging = temp.path().join("staging");
        let target = temp.path().join("snapshot/train");
        fs::create_dir_all(&staging).unwrap();
        fs::create_dir_all(&target).unwrap();
        fs::write(staging.join("0000.jsonl"), b"{}\n").unwrap();
        fs::write(target.join("stale.jsonl"), b"{}\n").unwrap();

        publish_split(&dataset, &staging, &target).unwrap();
        assert!(!staging.exists());
        assert!(target.join("0000.jsonl").exists());
        assert!(!target.join("stale.jsonl").exists());
    }
}
