//! SuperGLUE-style benchmarks whose candidates are answer texts.
//!
//! The label-only SuperGLUE tasks (MultiRC, CB, WIC, WSC, RTE) are built by
//! `labelled_sample` directly.

use super::Benchmark;
use crate::data::{Answer, Candidate, RawExample, Sample, SampleId};
use crate::errors::TaskError;
use crate::utils::{require, require_bool, require_i64, require_str, str_list};

const BOOLQ_CANDIDATES: [&str; 2] = ["Yes", "No"];

pub(super) fn copa(example: RawExample) -> Result<Sample, TaskError> {
    let task = Benchmark::Copa.name();
    let idx = require_i64(task, &example, "idx")?;
    let label = require_i64(task, &example, "label")?;
    let choices = [
        require_str(task, &example, "choice1")?.to_string(),
        require_str(task, &example, "choice2")?.to_string(),
    ];
    let correct = usize::try_from(label)
        .ok()
        .and_then(|index| choices.get(index))
        .cloned()
        .ok_or_else(|| TaskError::InvalidField {
            task: task.to_string(),
            field: "label".to_string(),
            reason: format!("label {label} does not select choice1 or choice2"),
        })?;
    Ok(Sample {
        id: Some(SampleId::Index(idx)),
        data: example,
        correct_candidate: Answer::Text(correct),
        candidates: Some(Candidate::texts(&choices)),
    })
}

pub(super) fn boolq(example: RawExample) -> Result<Sample, TaskError> {
    let answer = require_bool(Benchmark::BoolQ.name(), &example, "answer")?;
    let correct = if answer {
        BOOLQ_CANDIDATES[0]
    } else {
        BOOLQ_CANDIDATES[1]
    };
    Ok(Sample {
        id: None,
        data: example,
        correct_candidate: Answer::Text(correct.to_string()),
        candidates: Some(Candidate::texts(&BOOLQ_CANDIDATES)),
    })
}

/// Every listed answer must be one of the passage entities.
pub(super) fn record(example: RawExample) -> Result<Sample, TaskError> {
    let task = Benchmark::ReCoRD.name();
    let entities = str_list(task, "entities", require(task, &example, "entities")?)?;
    let answers = str_list(task, "answers", require(task, &example, "answers")?)?;
    let candidates = Candidate::texts(&entities);
    let correct = Answer::Texts(answers);
    if !correct.is_drawn_from(&candidates) {
        return Err(TaskError::InvalidField {
            task: task.to_string(),
            field: "answers".to_string(),
            reason: "answer is not among the entities".to_string(),
        });
    }
    Ok(Sample {
        id: None,
        data: example,
        correct_candidate: correct,
        candidates: Some(candidates),
    })
}
