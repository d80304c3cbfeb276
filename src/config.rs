use crate::constants::sampling::DEFAULT_NUM_TRAIN;
use crate::constants::tasks::DEFAULT_LOAD_SEED;

/// Load-time configuration shared by every task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskConfig {
    /// RNG seed for the capped train/valid draw at load time.
    pub seed: u64,
    /// Override of the benchmark's train cap (its exact/at-most policy is kept).
    pub train_cap: Option<usize>,
    /// Override of the benchmark's valid cap (its exact/at-most policy is kept).
    pub valid_cap: Option<usize>,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_LOAD_SEED,
            train_cap: None,
            valid_cap: None,
        }
    }
}

/// Options for drawing demonstration (train) sets for an evaluation run.
///
/// Seed selection precedence: `seed`, then `num_train_sets`, then one set per
/// evaluation sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainSetRequest {
    /// Demonstrations per train set.
    pub num_train: usize,
    /// Dev samples appended to the end of each train set.
    pub num_dev: Option<usize>,
    /// Evaluation sample count used for per-sample seeds (defaults to the valid size).
    pub num_eval: Option<usize>,
    /// Number of train sets, seeded `0..num_train_sets`.
    pub num_train_sets: Option<usize>,
    /// Single fixed seed.
    pub seed: Option<u64>,
}

impl Default for TrainSetRequest {
    fn default() -> Self {
        Self {
            num_train: DEFAULT_NUM_TRAIN,
            num_dev: None,
            num_eval: None,
            num_train_sets: None,
            seed: None,
        }
    }
}

impl TrainSetRequest {
    /// Train samples drawn per set, dev included.
    pub fn draw_size(&self) -> usize {
        self.num_train + self.num_dev.unwrap_or(0)
    }
}
