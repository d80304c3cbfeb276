#![allow(dead_code)]

use fewshot_tasks::{Benchmark, InMemoryProvider, RawExample};
use serde_json::{Value, json};

pub fn row(value: Value) -> RawExample {
    value
        .as_object()
        .cloned()
        .expect("fixture rows are JSON objects")
}

/// A well-formed raw row of `benchmark`, varied by `i`.
pub fn fixture_row(benchmark: Benchmark, i: usize) -> RawExample {
    let value = match benchmark {
        Benchmark::Sst2 => json!({"idx": i, "sentence": format!("sentence {i}"), "label": i % 2}),
        Benchmark::Sst5 => json!({"text": format!("review {i}"), "label": i % 5, "label_text": "x"}),
        Benchmark::Snli => json!({
            "premise": format!("premise {i}"),
            "hypothesis": format!("hypothesis {i}"),
            "label": i % 3
        }),
        Benchmark::Trec => json!({"text": format!("question {i}?"), "coarse_label": i % 6, "fine_label": i % 50}),
        Benchmark::Mnli => json!({
            "idx": i,
            "premise": format!("premise {i}"),
            "hypothesis": format!("hypothesis {i}"),
            "label": i % 3
        }),
        Benchmark::Copa => json!({
            "idx": i,
            "premise": format!("premise {i}"),
            "question": "cause",
            "choice1": format!("first {i}"),
            "choice2": format!("second {i}"),
            "label": i % 2
        }),
        Benchmark::BoolQ => json!({
            "question": format!("is {i} even"),
            "passage": "numbers",
            "answer": i % 2 == 0
        }),
        Benchmark::MultiRc => json!({
            "paragraph": "p",
            "question": format!("q{i}"),
            "answer": "a",
            "idx": {"paragraph": 0, "question": i, "answer": 0},
            "label": i % 2
        }),
        Benchmark::Cb => json!({"premise": format!("p{i}"), "hypothesis": "h", "idx": i, "label": i % 3}),
        Benchmark::Wic => json!({
            "word": "bank",
            "sentence1": format!("s{i}"),
            "sentence2": "t",
            "idx": i,
            "label": i % 2
        }),
        Benchmark::Wsc => json!({
            "text": format!("text {i}"),
            "span1_text": "it",
            "span2_text": "the cat",
            "idx": i,
            "label": i % 2
        }),
        Benchmark::ReCoRD => json!({
            "passage": format!("passage {i}"),
            "query": "@placeholder won",
            "entities": ["Alpha", "Beta", format!("Gamma{i}")],
            "answers": ["Beta"],
            "idx": {"passage": i, "query": 0}
        }),
        Benchmark::Rte => json!({"premise": format!("p{i}"), "hypothesis": "h", "idx": i, "label": i % 2}),
        Benchmark::Squad => json!({
            "id": format!("sq{i}"),
            "title": "Title",
            "context": format!("context {i}"),
            "question": "what?",
            "answers": {"text": [format!("answer {i}")], "answer_start": [0]}
        }),
        Benchmark::Drop => json!({
            "section_id": "s",
            "query_id": format!("q{i}"),
            "passage": format!("passage {i}"),
            "question": "how many?",
            "answers_spans": {"spans": [format!("{i}")], "types": ["number"]}
        }),
    };
    row(value)
}

pub fn fixture_rows(benchmark: Benchmark, count: usize) -> Vec<RawExample> {
    (0..count).map(|i| fixture_row(benchmark, i)).collect()
}

/// Provider holding `train_rows` / `eval_rows` fixture rows for `benchmark`.
pub fn fixture_provider(
    benchmark: Benchmark,
    train_rows: usize,
    eval_rows: usize,
) -> InMemoryProvider {
    let layout = benchmark.layout();
    InMemoryProvider::new()
        .with_split(
            layout.dataset_ref(),
            layout.train_split,
            fixture_rows(benchmark, train_rows),
        )
        .with_split(
            layout.dataset_ref(),
            layout.eval_split,
            fixture_rows(benchmark, eval_rows),
        )
}
