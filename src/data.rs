use serde::{Deserialize, Serialize};
use std::fmt;

pub use crate::types::RawExample;

/// Identifier attached to a sample.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleId {
    /// Integer id from the source row (`idx`) or the row ordinal.
    Index(i64),
    /// String key from the source row (e.g. SNLI `pairID`).
    Key(String),
    /// Content hash for rows without a native id.
    Hash(u64),
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleId::Index(value) => write!(f, "{value}"),
            SampleId::Key(value) => f.write_str(value),
            SampleId::Hash(value) => write!(f, "{value:016x}"),
        }
    }
}

/// One permissible answer for a classification-style task.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Candidate {
    /// Class label index.
    Label(i64),
    /// Literal answer text.
    Text(String),
}

impl Candidate {
    /// Label candidates `0..count`.
    pub fn labels(count: i64) -> Vec<Candidate> {
        (0..count).map(Candidate::Label).collect()
    }

    /// Text candidates from string slices.
    pub fn texts<S: AsRef<str>>(values: &[S]) -> Vec<Candidate> {
        values
            .iter()
            .map(|value| Candidate::Text(value.as_ref().to_string()))
            .collect()
    }
}

/// Ground-truth answer of a sample.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Class label index.
    Label(i64),
    /// Single answer text.
    Text(String),
    /// Every acceptable answer text.
    Texts(Vec<String>),
}

impl Answer {
    /// Whether this answer is drawn from `candidates`.
    ///
    /// A list answer is drawn from the candidates when every entry is one.
    pub fn is_drawn_from(&self, candidates: &[Candidate]) -> bool {
        match self {
            Answer::Label(label) => candidates.contains(&Candidate::Label(*label)),
            Answer::Text(text) => candidates
                .iter()
                .any(|candidate| matches!(candidate, Candidate::Text(value) if value == text)),
            Answer::Texts(texts) => texts.iter().all(|text| {
                candidates
                    .iter()
                    .any(|candidate| matches!(candidate, Candidate::Text(value) if value == text))
            }),
        }
    }
}

/// Normalized benchmark example.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Optional identifier (source id, row ordinal, or content hash).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SampleId>,
    /// Source example fields consumed by prompt templates.
    pub data: RawExample,
    /// Ground-truth answer.
    pub correct_candidate: Answer,
    /// Answer candidates; `None` for generation tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,
}

impl Sample {
    /// Whether `correct_candidate` is consistent with `candidates`.
    ///
    /// Samples without candidates (or with an empty list) are always consistent.
    pub fn is_consistent(&self) -> bool {
        match self.candidates.as_deref() {
            None | Some([]) => true,
            Some(candidates) => self.correct_candidate.is_drawn_from(candidates),
        }
    }

    /// Whether this sample belongs to a generation task.
    pub fn is_generation(&self) -> bool {
        self.candidates.is_none()
    }
}
