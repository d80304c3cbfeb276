/// Constants used by task-name dispatch and task defaults.
pub mod tasks {
    /// Separator between task group and subtask (`MultiRC__sub`).
    pub const SUBTASK_SEPARATOR: &str = "__";
    /// Separator placed between demonstrations when a harness joins them.
    pub const DEFAULT_TRAIN_SEP: &str = "\n\n";
    /// Metric name reported by generation tasks.
    pub const GENERATION_METRIC: &str = "f1";
    /// Default seed for load-time subsampling.
    pub const DEFAULT_LOAD_SEED: u64 = 42;
}

/// Constants used by split capping.
pub mod caps {
    /// Standard train cap.
    pub const TRAIN_CAP: usize = 1000;
    /// Standard valid cap.
    pub const VALID_CAP: usize = 500;
    /// TREC train cap.
    pub const TREC_TRAIN_CAP: usize = 500;
    /// TREC valid cap.
    pub const TREC_VALID_CAP: usize = 250;
}

/// Constants used by train-set sampling.
pub mod sampling {
    /// Default number of demonstrations per train set.
    pub const DEFAULT_NUM_TRAIN: usize = 32;
    /// Seed of the RNG that draws per-evaluation-sample seeds.
    pub const PER_EVAL_SEED_SOURCE: u64 = 0;
    /// Exclusive upper bound of per-evaluation-sample seeds.
    pub const PER_EVAL_SEED_BOUND: u64 = 10_000;
}

/// Constants used by dataset providers.
pub mod source {
    /// Environment variable overriding the provider cache directory.
    pub const CACHE_DIR_ENV: &str = "FEWSHOT_CACHE_DIR";
    /// Default provider cache directory (relative to the working directory).
    pub const DEFAULT_CACHE_DIR: &str = ".fewshot_cache/datasets";
    /// Directory name used when a dataset has no explicit config.
    pub const DEFAULT_CONFIG_DIR: &str = "default";
    /// Shard extensions accepted by the snapshot reader.
    pub const SHARD_EXTENSIONS: [&str; 4] = ["parquet", "jsonl", "ndjson", "json"];
    /// Datasets-server endpoint listing converted parquet shards.
    pub const PARQUET_MANIFEST_ENDPOINT: &str = "https://datasets-server.huggingface.co/parquet";
    /// Environment variable overriding the parquet manifest endpoint.
    pub const PARQUET_ENDPOINT_ENV: &str = "FEWSHOT_HF_PARQUET_ENDPOINT";
    /// Suffix of partially downloaded shard files.
    pub const PARTIAL_DOWNLOAD_EXTENSION: &str = "part";
    /// Directory under the cache root where a split is assembled before it is
    /// moved into the snapshot layout.
    pub const STAGING_DIR: &str = ".staging";
    /// Retries configured on the hub client.
    pub const HUB_RETRIES: usize = 5;
}
