//! Benchmark adapters and task-name dispatch.
//!
//! Each supported benchmark is a `Benchmark` variant. A variant knows where its
//! raw rows live (`SourceLayout`), how large each split may grow, and how a raw
//! row becomes a `Sample`. Row builders live in per-family modules.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use tracing::info;

use crate::config::{TaskConfig, TrainSetRequest};
use crate::constants::caps::{TRAIN_CAP, TREC_TRAIN_CAP, TREC_VALID_CAP, VALID_CAP};
use crate::constants::tasks::{DEFAULT_TRAIN_SEP, GENERATION_METRIC, SUBTASK_SEPARATOR};
use crate::data::{Answer, Candidate, RawExample, Sample, SampleId};
use crate::errors::TaskError;
use crate::sampling;
use crate::source::{DatasetProvider, DatasetRef};
use crate::splits::{SampleSplits, SplitCap, SplitLabel};
use crate::templates::TemplateId;
use crate::types::SubtaskName;
use crate::utils::{optional_i64, require_i64};

mod generation;
mod glue;
mod superglue;

/// Supported benchmarks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Benchmark {
    /// GLUE SST-2 binary sentiment.
    Sst2,
    /// SST-5 five-way sentiment.
    Sst5,
    /// SNLI entailment.
    Snli,
    /// TREC coarse question type.
    Trec,
    /// GLUE MNLI (matched validation).
    Mnli,
    /// SuperGLUE COPA.
    Copa,
    /// BoolQ yes/no questions.
    BoolQ,
    /// SuperGLUE MultiRC.
    MultiRc,
    /// SuperGLUE CommitmentBank.
    Cb,
    /// SuperGLUE Words-in-Context.
    Wic,
    /// SuperGLUE Winograd schema (fixed).
    Wsc,
    /// SuperGLUE ReCoRD entity cloze.
    ReCoRD,
    /// SuperGLUE RTE.
    Rte,
    /// SQuAD extractive QA.
    Squad,
    /// DROP reading comprehension.
    Drop,
}

/// Which samples make up the `test` split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestSplit {
    /// The capped valid samples.
    SameAsValid,
    /// Every built sample of the eval split, uncapped.
    AllEval,
}

/// Where a benchmark's raw rows live and how its splits are capped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceLayout {
    /// Hub dataset id.
    pub dataset: &'static str,
    /// Hub config name, if the dataset has several.
    pub config: Option<&'static str>,
    /// Source split feeding `train`.
    pub train_split: &'static str,
    /// Source split feeding `valid` (and `test`).
    pub eval_split: &'static str,
    /// Cap applied to `train`.
    pub train_cap: SplitCap,
    /// Cap applied to `valid`.
    pub valid_cap: SplitCap,
    /// Composition of `test`.
    pub test: TestSplit,
}

impl SourceLayout {
    const fn standard(dataset: &'static str, config: Option<&'static str>) -> Self {
        Self {
            dataset,
            config,
            train_split: "train",
            eval_split: "validation",
            train_cap: SplitCap::at_most(TRAIN_CAP),
            valid_cap: SplitCap::at_most(VALID_CAP),
            test: TestSplit::SameAsValid,
        }
    }

    const fn exact_caps(self) -> Self {
        Self {
            train_cap: SplitCap::exact(self.train_cap.limit),
            valid_cap: SplitCap::exact(self.valid_cap.limit),
            ..self
        }
    }

    const fn eval_split(self, eval_split: &'static str) -> Self {
        Self { eval_split, ..self }
    }

    /// Dataset reference passed to providers.
    pub fn dataset_ref(&self) -> DatasetRef {
        match self.config {
            Some(config) => DatasetRef::with_config(self.dataset, config),
            None => DatasetRef::new(self.dataset),
        }
    }
}

impl Benchmark {
    /// Every supported benchmark, in registry order.
    pub const ALL: [Benchmark; 15] = [
        Benchmark::Sst2,
        Benchmark::Sst5,
        Benchmark::Snli,
        Benchmark::Trec,
        Benchmark::Mnli,
        Benchmark::Copa,
        Benchmark::BoolQ,
        Benchmark::MultiRc,
        Benchmark::Cb,
        Benchmark::Wic,
        Benchmark::Wsc,
        Benchmark::ReCoRD,
        Benchmark::Rte,
        Benchmark::Squad,
        Benchmark::Drop,
    ];

    /// Task group name used in task names (`SST2`, `ReCoRD`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Benchmark::Sst2 => "SST2",
            Benchmark::Sst5 => "SST5",
            Benchmark::Snli => "SNLI",
            Benchmark::Trec => "TREC",
            Benchmark::Mnli => "MNLI",
            Benchmark::Copa => "Copa",
            Benchmark::BoolQ => "BoolQ",
            Benchmark::MultiRc => "MultiRC",
            Benchmark::Cb => "CB",
            Benchmark::Wic => "WIC",
            Benchmark::Wsc => "WSC",
            Benchmark::ReCoRD => "ReCoRD",
            Benchmark::Rte => "RTE",
            Benchmark::Squad => "SQuAD",
            Benchmark::Drop => "DROP",
        }
    }

    /// Exact, case-sensitive lookup of a task group name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|benchmark| benchmark.name() == name)
    }

    /// Source location and split caps.
    pub fn layout(self) -> SourceLayout {
        match self {
            Benchmark::Sst2 => SourceLayout::standard("nyu-mll/glue", Some("sst2")).exact_caps(),
            Benchmark::Sst5 => SourceLayout::standard("SetFit/sst5", None)
                .eval_split("test")
                .exact_caps(),
            Benchmark::Snli => {
                SourceLayout::standard("stanfordnlp/snli", Some("plain_text")).exact_caps()
            }
            Benchmark::Trec => SourceLayout {
                train_cap: SplitCap::exact(TREC_TRAIN_CAP),
                valid_cap: SplitCap::exact(TREC_VALID_CAP),
                ..SourceLayout::standard("CogComp/trec", None).eval_split("test")
            },
            Benchmark::Mnli => SourceLayout::standard("nyu-mll/glue", Some("mnli"))
                .eval_split("validation_matched")
                .exact_caps(),
            Benchmark::Copa => SourceLayout::standard("aps/super_glue", Some("copa")),
            Benchmark::BoolQ => SourceLayout::standard("google/boolq", None),
            Benchmark::MultiRc => SourceLayout::standard("aps/super_glue", Some("multirc")),
            Benchmark::Cb => SourceLayout::standard("aps/super_glue", Some("cb")),
            Benchmark::Wic => SourceLayout::standard("aps/super_glue", Some("wic")),
            Benchmark::Wsc => SourceLayout::standard("aps/super_glue", Some("wsc.fixed")),
            Benchmark::ReCoRD => SourceLayout::standard("aps/super_glue", Some("record")),
            Benchmark::Rte => SourceLayout {
                train_cap: SplitCap::exact(TRAIN_CAP),
                test: TestSplit::AllEval,
                ..SourceLayout::standard("aps/super_glue", Some("rte"))
            },
            Benchmark::Squad => SourceLayout::standard("rajpurkar/squad", Some("plain_text")),
            Benchmark::Drop => SourceLayout::standard("ucinlp/drop", None),
        }
    }

    /// Whether answers are generated text rather than a chosen candidate.
    pub fn is_generation(self) -> bool {
        matches!(self, Benchmark::Squad | Benchmark::Drop)
    }

    /// Metric a harness should score this task with, when it is fixed.
    pub fn metric_name(self) -> Option<&'static str> {
        self.is_generation().then_some(GENERATION_METRIC)
    }

    /// Separator between demonstrations.
    pub fn train_sep(self) -> &'static str {
        DEFAULT_TRAIN_SEP
    }

    /// Template version used when the caller does not pick one.
    pub fn default_template_version(self) -> u32 {
        match self {
            Benchmark::BoolQ => 2,
            _ => 0,
        }
    }

    /// Template for `version` (or the default version).
    pub fn template(self, version: Option<u32>) -> Result<TemplateId, TaskError> {
        let version = version.unwrap_or_else(|| self.default_template_version());
        let template = match (self, version) {
            (Benchmark::Sst2, 0) => TemplateId::Sst2,
            (Benchmark::Sst5, 0) => TemplateId::Sst5,
            (Benchmark::Snli, 0) => TemplateId::Snli,
            (Benchmark::Trec, 0) => TemplateId::Trec,
            (Benchmark::Mnli, 0) => TemplateId::Mnli,
            (Benchmark::Copa, 0) => TemplateId::Copa,
            (Benchmark::BoolQ, 0) => TemplateId::BoolQ,
            (Benchmark::BoolQ, 1) => TemplateId::BoolQV2,
            (Benchmark::BoolQ, 2) => TemplateId::BoolQV3,
            (Benchmark::MultiRc, 0) => TemplateId::MultiRc,
            (Benchmark::Cb, 0) => TemplateId::Cb,
            (Benchmark::Wic, 0) => TemplateId::Wic,
            (Benchmark::Wsc, 0) => TemplateId::Wsc,
            (Benchmark::ReCoRD, 0) => TemplateId::ReCoRDGpt3,
            (Benchmark::Rte, 0) => TemplateId::Rte,
            (Benchmark::Squad, 0) => TemplateId::SquadV2,
            (Benchmark::Drop, 0) => TemplateId::Drop,
            _ => {
                return Err(TaskError::UnknownTemplate {
                    task: self.name().to_string(),
                    version,
                });
            }
        };
        Ok(template)
    }

    /// Whether a raw row takes part in the task at all.
    fn keeps(self, example: &RawExample) -> bool {
        match self {
            Benchmark::Snli => optional_i64(example, "label") != Some(-1),
            _ => true,
        }
    }

    /// Normalize one raw row; `ordinal` is the row position in its source split.
    pub fn build_sample(self, example: RawExample, ordinal: usize) -> Result<Sample, TaskError> {
        match self {
            Benchmark::Sst2 => glue::sst2(example),
            Benchmark::Sst5 => glue::sst5(example),
            Benchmark::Snli => glue::snli(example),
            Benchmark::Trec => glue::trec(example),
            Benchmark::Mnli => glue::mnli(example),
            Benchmark::Copa => superglue::copa(example),
            Benchmark::BoolQ => superglue::boolq(example),
            Benchmark::MultiRc => labelled_sample(self, example, "label", 2, None),
            Benchmark::Cb => labelled_sample(self, example, "label", 3, None),
            Benchmark::Wic => labelled_sample(self, example, "label", 2, None),
            Benchmark::Wsc => labelled_sample(self, example, "label", 2, None),
            Benchmark::ReCoRD => superglue::record(example),
            Benchmark::Rte => labelled_sample(self, example, "label", 2, None),
            Benchmark::Squad => generation::squad(example, ordinal),
            Benchmark::Drop => generation::drop(example, ordinal),
        }
    }

    /// Filter and normalize every row of a source split.
    pub fn build_samples(self, rows: Vec<RawExample>) -> Result<Vec<Sample>, TaskError> {
        rows.into_iter()
            .enumerate()
            .filter(|(_, example)| self.keeps(example))
            .map(|(ordinal, example)| self.build_sample(example, ordinal))
            .collect()
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of resolving a task name, before any data is loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskSpec {
    /// Resolved benchmark.
    pub benchmark: Benchmark,
    /// Subtask after the `__` separator, if any.
    pub subtask: Option<SubtaskName>,
}

/// Resolve `"<group>"` or `"<group>__<subtask>"` to a benchmark.
///
/// A name with more than one separator keeps its first segment as the group
/// and carries no subtask.
pub fn resolve_task(name: &str) -> Result<TaskSpec, TaskError> {
    let parts = name.split(SUBTASK_SEPARATOR).collect::<Vec<_>>();
    let (group, subtask) = match parts.as_slice() {
        [group, subtask] => (*group, Some(subtask.to_string())),
        [group, ..] => (*group, None),
        [] => (name, None),
    };
    let benchmark = Benchmark::from_name(group).ok_or_else(|| TaskError::UnknownTask {
        name: name.to_string(),
        group: group.to_string(),
    })?;
    Ok(TaskSpec { benchmark, subtask })
}

/// Resolve `name` and load its dataset through `provider`.
pub fn get_task<P: DatasetProvider + ?Sized>(
    name: &str,
    provider: &P,
    config: &TaskConfig,
) -> Result<TaskDataset, TaskError> {
    let spec = resolve_task(name)?;
    TaskDataset::load(spec, provider, config)
}

/// A loaded benchmark: capped split collection plus sampling helpers.
#[derive(Clone, Debug)]
pub struct TaskDataset {
    benchmark: Benchmark,
    subtask: Option<SubtaskName>,
    samples: SampleSplits,
}

impl TaskDataset {
    /// Fetch, normalize, and cap the splits of `spec`.
    pub fn load<P: DatasetProvider + ?Sized>(
        spec: TaskSpec,
        provider: &P,
        config: &TaskConfig,
    ) -> Result<Self, TaskError> {
        let benchmark = spec.benchmark;
        let layout = benchmark.layout();
        let dataset = layout.dataset_ref();
        info!(
            "[fewshot:tasks] loading {} from {} via {}",
            benchmark,
            dataset,
            provider.id()
        );

        let train = benchmark.build_samples(provider.load_split(&dataset, layout.train_split)?)?;
        let eval = benchmark.build_samples(provider.load_split(&dataset, layout.eval_split)?)?;

        let train_cap = config
            .train_cap
            .map_or(layout.train_cap, |limit| layout.train_cap.with_limit(limit));
        let valid_cap = config
            .valid_cap
            .map_or(layout.valid_cap, |limit| layout.valid_cap.with_limit(limit));

        let full_eval = (layout.test == TestSplit::AllEval).then(|| eval.clone());
        let mut rng = StdRng::seed_from_u64(config.seed);
        let train = train_cap.apply(SplitLabel::Train, train, &mut rng)?;
        let valid = valid_cap.apply(SplitLabel::Valid, eval, &mut rng)?;
        let test = full_eval.unwrap_or_else(|| valid.clone());

        let samples = SampleSplits { train, valid, test };
        info!(
            "[fewshot:tasks] {} ready (train={}, valid={}, test={})",
            benchmark,
            samples.train.len(),
            samples.valid.len(),
            samples.test.len()
        );
        Ok(Self::from_splits(benchmark, spec.subtask, samples))
    }

    /// Wrap already-built splits.
    pub fn from_splits(
        benchmark: Benchmark,
        subtask: Option<SubtaskName>,
        samples: SampleSplits,
    ) -> Self {
        Self {
            benchmark,
            subtask,
            samples,
        }
    }

    /// Benchmark this dataset was loaded for.
    pub fn benchmark(&self) -> Benchmark {
        self.benchmark
    }

    /// Subtask carried by the task name, if any.
    pub fn task_name(&self) -> Option<&str> {
        self.subtask.as_deref()
    }

    /// All three splits.
    pub fn samples(&self) -> &SampleSplits {
        &self.samples
    }

    /// Samples of one split.
    pub fn split(&self, label: SplitLabel) -> &[Sample] {
        self.samples.get(label)
    }

    /// Evaluation samples.
    pub fn valid_samples(&self) -> &[Sample] {
        &self.samples.valid
    }

    /// See [`sampling::sample_subset`].
    pub fn sample_subset(
        &self,
        label: SplitLabel,
        seed: u64,
        num: usize,
        exclude: Option<usize>,
    ) -> Vec<Sample> {
        sampling::sample_subset(self.samples.get(label), seed, num, exclude)
    }

    /// See [`sampling::sample_train_sets`].
    pub fn sample_train_sets(
        &self,
        request: &TrainSetRequest,
    ) -> Result<Vec<Vec<Sample>>, TaskError> {
        sampling::sample_train_sets(&self.samples, request)
    }

    /// Template for `version`; see [`Benchmark::template`].
    pub fn template(&self, version: Option<u32>) -> Result<TemplateId, TaskError> {
        self.benchmark.template(version)
    }

    /// See [`Benchmark::is_generation`].
    pub fn is_generation(&self) -> bool {
        self.benchmark.is_generation()
    }

    /// See [`Benchmark::metric_name`].
    pub fn metric_name(&self) -> Option<&'static str> {
        self.benchmark.metric_name()
    }

    /// Separator between demonstrations.
    pub fn train_sep(&self) -> &'static str {
        self.benchmark.train_sep()
    }
}

/// Classification sample whose label column indexes `0..num_labels`.
fn labelled_sample(
    benchmark: Benchmark,
    example: RawExample,
    field: &str,
    num_labels: i64,
    id: Option<SampleId>,
) -> Result<Sample, TaskError> {
    let label = require_i64(benchmark.name(), &example, field)?;
    if !(0..num_labels).contains(&label) {
        return Err(TaskError::InvalidField {
            task: benchmark.name().to_string(),
            field: field.to_string(),
            reason: format!("label {label} outside 0..{num_labels}"),
        });
    }
    Ok(Sample {
        id,
        data: example,
        correct_candidate: Answer::Label(label),
        candidates: Some(Candidate::labels(num_labels)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> RawExample {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn every_benchmark_round_trips_through_its_name() {
        for benchmark in Benchmark::ALL {
            assert_eq!(Benchmark::from_name(benchmark.name()), Some(benchmark));
        }
        assert_eq!(Benchmark::from_name("sst2"), None);
    }

    #[test]
    fn resolve_splits_group_and_subtask() {
        let spec = resolve_task("MultiRC__sub").unwrap();
        assert_eq!(spec.benchmark, Benchmark::MultiRc);
        assert_eq!(spec.subtask.as_deref(), Some("sub"));

        let spec = resolve_task("SST2__a__b").unwrap();
        assert_eq!(spec.benchmark, Benchmark::Sst2);
        assert_eq!(spec.subtask, None);
    }

    #[test]
    fn resolve_rejects_unknown_groups() {
        let err = resolve_task("unknown__x").unwrap_err();
        assert!(matches!(
            err,
            TaskError::UnknownTask { ref group, .. } if group == "unknown"
        ));
        assert!(resolve_task("").is_err());
    }

    #[test]
    fn every_benchmark_has_a_default_template() {
        for benchmark in Benchmark::ALL {
            assert!(benchmark.template(None).is_ok(), "{benchmark}");
        }
        assert_eq!(Benchmark::BoolQ.template(None).unwrap(), TemplateId::BoolQV3);
        assert_eq!(Benchmark::BoolQ.template(Some(0)).unwrap(), TemplateId::BoolQ);
        assert!(matches!(
            Benchmark::Sst2.template(Some(1)),
            Err(TaskError::UnknownTemplate { version: 1, .. })
        ));
    }

    #[test]
    fn layouts_match_benchmark_sources() {
        let mnli = Benchmark::Mnli.layout();
        assert_eq!(mnli.eval_split, "validation_matched");
        assert_eq!(mnli.train_cap, SplitCap::exact(1000));

        let trec = Benchmark::Trec.layout();
        assert_eq!((trec.train_cap.limit, trec.valid_cap.limit), (500, 250));
        assert_eq!(trec.eval_split, "test");

        let rte = Benchmark::Rte.layout();
        assert_eq!(rte.train_cap, SplitCap::exact(1000));
        assert_eq!(rte.valid_cap, SplitCap::at_most(500));
        assert_eq!(rte.test, TestSplit::AllEval);

        assert_eq!(
            Benchmark::Wsc.layout().dataset_ref(),
            DatasetRef::with_config("aps/super_glue", "wsc.fixed")
        );
    }

    #[test]
    fn generation_flags_and_metrics() {
        assert!(Benchmark::Squad.is_generation());
        assert_eq!(Benchmark::Drop.metric_name(), Some("f1"));
        assert_eq!(Benchmark::Copa.metric_name(), None);
        assert!(Benchmark::ALL.iter().all(|b| b.train_sep() == "\n\n"));
    }

    #[test]
    fn snli_drops_unlabelled_rows() {
        let rows = vec![
            row(json!({"premise": "p", "hypothesis": "h", "label": -1})),
            row(json!({"premise": "p", "hypothesis": "h2", "label": 2, "pairID": "x"})),
        ];
        let samples = Benchmark::Snli.build_samples(rows).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].correct_candidate, Answer::Label(2));
    }

    #[test]
    fn labelled_sample_rejects_out_of_range_labels() {
        let err = Benchmark::Cb
            .build_sample(row(json!({"premise": "p", "label": 3})), 0)
            .unwrap_err();
        assert!(matches!(err, TaskError::InvalidField { .. }));

        let ok = Benchmark::Wic
            .build_sample(row(json!({"word": "w", "label": 1})), 0)
            .unwrap();
        assert_eq!(ok.candidates, Some(Candidate::labels(2)));
        assert_eq!(ok.id, None);
    }
}
