use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::data::Sample;
use crate::errors::TaskError;

/// Logical partitions exposed to the harness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitLabel {
    /// Demonstration pool.
    Train,
    /// Evaluation split.
    Valid,
    /// Held-out split; usually the same samples as `Valid`.
    Test,
}

impl SplitLabel {
    /// Every split, in collection order.
    pub const ALL: [SplitLabel; 3] = [SplitLabel::Train, SplitLabel::Valid, SplitLabel::Test];

    /// Canonical split key.
    pub fn as_str(self) -> &'static str {
        match self {
            SplitLabel::Train => "train",
            SplitLabel::Valid => "valid",
            SplitLabel::Test => "test",
        }
    }
}

impl fmt::Display for SplitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitLabel {
    type Err = TaskError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "train" => Ok(SplitLabel::Train),
            "valid" | "validation" => Ok(SplitLabel::Valid),
            "test" => Ok(SplitLabel::Test),
            other => Err(TaskError::Configuration(format!(
                "unknown split '{other}' (expected train, valid, or test)"
            ))),
        }
    }
}

/// Split-keyed sample collection built once at task load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSplits {
    /// Demonstration pool.
    pub train: Vec<Sample>,
    /// Evaluation samples.
    pub valid: Vec<Sample>,
    /// Held-out samples.
    pub test: Vec<Sample>,
}

impl SampleSplits {
    /// Samples for `label`.
    pub fn get(&self, label: SplitLabel) -> &[Sample] {
        match label {
            SplitLabel::Train => &self.train,
            SplitLabel::Valid => &self.valid,
            SplitLabel::Test => &self.test,
        }
    }

    /// `(label, samples)` pairs in collection order.
    pub fn iter(&self) -> impl Iterator<Item = (SplitLabel, &[Sample])> {
        SplitLabel::ALL.into_iter().map(|label| (label, self.get(label)))
    }

    /// Total sample count across splits.
    pub fn total_len(&self) -> usize {
        self.train.len() + self.valid.len() + self.test.len()
    }
}

/// How a load-time cap treats a source split smaller than the cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapPolicy {
    /// The source must hold at least `limit` samples.
    Exact,
    /// Draw `min(limit, len)` samples.
    AtMost,
}

/// Load-time size cap for one split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitCap {
    /// Number of samples to keep.
    pub limit: usize,
    /// Behavior when the source is smaller than `limit`.
    pub policy: CapPolicy,
}

impl SplitCap {
    /// Cap that requires at least `limit` source samples.
    pub const fn exact(limit: usize) -> Self {
        Self {
            limit,
            policy: CapPolicy::Exact,
        }
    }

    /// Cap that keeps at most `limit` source samples.
    pub const fn at_most(limit: usize) -> Self {
        Self {
            limit,
            policy: CapPolicy::AtMost,
        }
    }

    /// Same policy with a different limit.
    pub fn with_limit(self, limit: usize) -> Self {
        Self { limit, ..self }
    }

    /// Draw a random subset of `samples` without replacement.
    ///
    /// The draw order is random, not source order.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        split: SplitLabel,
        samples: Vec<Sample>,
        rng: &mut R,
    ) -> Result<Vec<Sample>, TaskError> {
        let available = samples.len();
        let amount = match self.policy {
            CapPolicy::Exact if available < self.limit => {
                return Err(TaskError::Sampling {
                    split: split.to_string(),
                    requested: self.limit,
                    available,
                });
            }
            CapPolicy::Exact => self.limit,
            CapPolicy::AtMost => self.limit.min(available),
        };

        let mut slots = samples.into_iter().map(Some).collect::<Vec<_>>();
        Ok(index::sample(rng, available, amount)
            .into_iter()
            .filter_map(|idx| slots[idx].take())
            .collect())
    }
}
