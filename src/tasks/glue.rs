//! Single-sentence and sentence-pair classification benchmarks.

use super::{Benchmark, labelled_sample};
use crate::data::{RawExample, Sample, SampleId};
use crate::errors::TaskError;
use crate::hash::content_hash;
use crate::utils::{optional_i64, optional_str, require_i64, require_str};

pub(super) fn sst2(example: RawExample) -> Result<Sample, TaskError> {
    let idx = require_i64(Benchmark::Sst2.name(), &example, "idx")?;
    labelled_sample(Benchmark::Sst2, example, "label", 2, Some(SampleId::Index(idx)))
}

/// SST-5 rows without an `idx` column get id 0.
pub(super) fn sst5(example: RawExample) -> Result<Sample, TaskError> {
    let idx = optional_i64(&example, "idx").unwrap_or(0);
    labelled_sample(Benchmark::Sst5, example, "label", 5, Some(SampleId::Index(idx)))
}

/// Id preference: `pairID`, then `idx`, then a hash of premise and hypothesis.
pub(super) fn snli(example: RawExample) -> Result<Sample, TaskError> {
    let task = Benchmark::Snli.name();
    let id = match optional_str(&example, "pairID") {
        Some(pair_id) => SampleId::Key(pair_id.to_string()),
        None => match optional_i64(&example, "idx") {
            Some(idx) => SampleId::Index(idx),
            None => {
                let premise = require_str(task, &example, "premise")?;
                let hypothesis = require_str(task, &example, "hypothesis")?;
                SampleId::Hash(content_hash(&[premise, hypothesis]))
            }
        },
    };
    labelled_sample(Benchmark::Snli, example, "label", 3, Some(id))
}

/// TREC has no id column; the question text is hashed instead.
pub(super) fn trec(example: RawExample) -> Result<Sample, TaskError> {
    let text = require_str(Benchmark::Trec.name(), &example, "text")?;
    let id = SampleId::Hash(content_hash(&[text]));
    labelled_sample(Benchmark::Trec, example, "coarse_label", 6, Some(id))
}

pub(super) fn mnli(example: RawExample) -> Result<Sample, TaskError> {
    let idx = require_i64(Benchmark::Mnli.name(), &example, "idx")?;
    labelled_sample(Benchmark::Mnli, example, "label", 3, Some(SampleId::Index(idx)))
}
