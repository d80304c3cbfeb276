use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, error::ErrorKind};

use crate::config::{TaskConfig, TrainSetRequest};
use crate::constants::sampling::DEFAULT_NUM_TRAIN;
use crate::errors::TaskError;
use crate::source::{DatasetProvider, LocalSnapshotProvider};
use crate::splits::SplitLabel;
use crate::tasks::{Benchmark, TaskDataset, get_task};

#[derive(Debug, Parser)]
#[command(
    name = "inspect_task",
    disable_help_subcommand = true,
    about = "Load a benchmark task and print its splits",
    long_about = "Resolve a task name, load and cap its splits, draw demonstration sets, and print a few normalized samples as JSON.",
    after_help = "Without --snapshot-root, datasets are fetched from the Hugging Face hub into --cache-dir (or $FEWSHOT_CACHE_DIR, then .fewshot_cache/datasets)."
)]
/// CLI for `inspect_task`.
///
/// Common usage:
/// - List task groups: `--list`
/// - Read pre-fetched shards: `--snapshot-root /data/snapshots SST2`
/// - Draw 4 seeded demonstration sets: `--num-train-sets 4 --num-train 16 BoolQ`
struct InspectTaskCli {
    #[arg(value_name = "TASK", required_unless_present = "list")]
    task: Option<String>,
    #[arg(long, help = "Print supported task groups and exit")]
    list: bool,
    #[arg(
        long = "snapshot-root",
        value_name = "DIR",
        help = "Read shards from a local snapshot root instead of the hub"
    )]
    snapshot_root: Option<PathBuf>,
    #[arg(
        long = "cache-dir",
        value_name = "DIR",
        conflicts_with = "snapshot_root",
        help = "Directory hub shards are downloaded into"
    )]
    cache_dir: Option<PathBuf>,
    #[arg(long, help = "Seed for the load-time capped draw")]
    seed: Option<u64>,
    #[arg(long = "train-cap", help = "Override the benchmark's train cap")]
    train_cap: Option<usize>,
    #[arg(long = "valid-cap", help = "Override the benchmark's valid cap")]
    valid_cap: Option<usize>,
    #[arg(long = "template-version", help = "Template version to report")]
    template_version: Option<u32>,
    #[arg(
        long = "num-train",
        default_value_t = DEFAULT_NUM_TRAIN,
        help = "Demonstrations per train set"
    )]
    num_train: usize,
    #[arg(long = "num-dev", help = "Dev samples appended to each train set")]
    num_dev: Option<usize>,
    #[arg(long = "num-eval", help = "Evaluation samples (one train set each)")]
    num_eval: Option<usize>,
    #[arg(long = "num-train-sets", help = "Number of seeded train sets")]
    num_train_sets: Option<usize>,
    #[arg(long = "train-set-seed", help = "Single fixed train-set seed")]
    train_set_seed: Option<u64>,
    #[arg(
        long,
        default_value_t = 2,
        help = "Number of valid samples to print as JSON"
    )]
    show: usize,
}

/// Run the `inspect_task` CLI over `args_iter` (program name excluded).
pub fn run_inspect_task<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) =
        parse_cli::<InspectTaskCli, _>(std::iter::once("inspect_task".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    if cli.list {
        print_task_groups();
        return Ok(());
    }
    let Some(task_name) = cli.task.as_deref() else {
        return Err(TaskError::Configuration("a task name is required".to_string()).into());
    };

    let provider = build_provider(cli.snapshot_root.clone(), cli.cache_dir.clone())?;
    let mut config = TaskConfig::default();
    config.seed = cli.seed.unwrap_or(config.seed);
    config.train_cap = cli.train_cap;
    config.valid_cap = cli.valid_cap;

    let task = get_task(task_name, provider.as_ref(), &config)?;
    print_task_summary(&task, cli.template_version)?;

    let request = TrainSetRequest {
        num_train: cli.num_train,
        num_dev: cli.num_dev,
        num_eval: cli.num_eval,
        num_train_sets: cli.num_train_sets,
        seed: cli.train_set_seed,
    };
    let train_sets = task.sample_train_sets(&request)?;
    let sizes = train_sets.iter().map(Vec::len).collect::<Vec<_>>();
    println!(
        "Drew {} train set(s); first sizes: {:?}",
        train_sets.len(),
        &sizes[..sizes.len().min(8)]
    );

    for sample in task.valid_samples().iter().take(cli.show) {
        println!("{}", serde_json::to_string_pretty(sample)?);
    }
    Ok(())
}

fn build_provider(
    snapshot_root: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
) -> Result<Box<dyn DatasetProvider>, Box<dyn Error>> {
    if let Some(root) = snapshot_root {
        println!("Reading snapshot shards from {}", root.display());
        return Ok(Box::new(LocalSnapshotProvider::new(root)));
    }
    hub_provider(cache_dir)
}

#[cfg(feature = "huggingface")]
fn hub_provider(cache_dir: Option<PathBuf>) -> Result<Box<dyn DatasetProvider>, Box<dyn Error>> {
    use crate::source::{HuggingFaceConfig, HuggingFaceProvider};

    let mut config = HuggingFaceConfig::from_env();
    if let Some(dir) = cache_dir {
        config.cache_dir = dir;
    }
    println!("Caching hub shards under {}", config.cache_dir.display());
    Ok(Box::new(HuggingFaceProvider::new(config)?))
}

#[cfg(not(feature = "huggingface"))]
fn hub_provider(_cache_dir: Option<PathBuf>) -> Result<Box<dyn DatasetProvider>, Box<dyn Error>> {
    Err(TaskError::Configuration(
        "built without the `huggingface` feature; pass --snapshot-root".to_string(),
    )
    .into())
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn print_task_groups() {
    println!("Supported task groups:");
    for benchmark in Benchmark::ALL {
        let layout = benchmark.layout();
        println!(
            "  {:<8} {}  (train={}, eval={}{})",
            benchmark.name(),
            layout.dataset_ref(),
            layout.train_split,
            layout.eval_split,
            if benchmark.is_generation() {
                ", generation"
            } else {
                ""
            }
        );
    }
}

fn print_task_summary(task: &TaskDataset, template_version: Option<u32>) -> Result<(), TaskError> {
    let template = task.template(template_version)?;
    println!("=== {} ===", task.benchmark());
    if let Some(subtask) = task.task_name() {
        println!("subtask: {subtask}");
    }
    for label in SplitLabel::ALL {
        println!("{:<6} {}", label.as_str(), task.split(label).len());
    }
    println!("template: {template}");
    if let Some(metric) = task.metric_name() {
        println!("metric: {metric}");
    }
    println!("train separator: {:?}", task.train_sep());
    Ok(())
}
