//! Extractive question answering benchmarks scored by generation.
//!
//! Samples carry a trimmed `data` object and every acceptable answer text; there
//! are no candidates. The row ordinal in its source split becomes the id.

use serde_json::{Map, Value};

use super::Benchmark;
use crate::data::{Answer, RawExample, Sample, SampleId};
use crate::errors::TaskError;
use crate::utils::{require, require_path, require_str, str_list};

pub(super) fn squad(example: RawExample, ordinal: usize) -> Result<Sample, TaskError> {
    let task = Benchmark::Squad.name();
    let answers = answer_texts(
        task,
        "answers.text",
        require_path(task, &example, &["answers", "text"])?,
    )?;
    let mut data = Map::new();
    data.insert("title".into(), require(task, &example, "title")?.clone());
    data.insert("context".into(), require_str(task, &example, "context")?.into());
    data.insert("question".into(), require_str(task, &example, "question")?.into());
    Ok(generation_sample(data, answers, ordinal))
}

pub(super) fn drop(example: RawExample, ordinal: usize) -> Result<Sample, TaskError> {
    let task = Benchmark::Drop.name();
    let answers = answer_texts(
        task,
        "answers_spans.spans",
        require_path(task, &example, &["answers_spans", "spans"])?,
    )?;
    let mut data = Map::new();
    data.insert("context".into(), require_str(task, &example, "passage")?.into());
    data.insert("question".into(), require_str(task, &example, "question")?.into());
    Ok(generation_sample(data, answers, ordinal))
}

fn answer_texts(task: &str, field: &str, value: &Value) -> Result<Vec<String>, TaskError> {
    let answers = str_list(task, field, value)?;
    if answers.is_empty() {
        return Err(TaskError::InvalidField {
            task: task.to_string(),
            field: field.to_string(),
            reason: "expected at least one answer".to_string(),
        });
    }
    Ok(answers)
}

/// `data` gains an `answers` list mirroring the correct answers.
fn generation_sample(mut data: RawExample, answers: Vec<String>, ordinal: usize) -> Sample {
    data.insert(
        "answers".into(),
        Value::Array(answers.iter().cloned().map(Value::String).collect()),
    );
    Sample {
        id: Some(SampleId::Index(ordinal as i64)),
        data,
        correct_candidate: Answer::Texts(answers),
        candidates: None,
    }
}
