//! Seeded subset sampling over split collections.
//!
//! Every draw uses a locally seeded `StdRng`; no process-wide RNG state is read
//! or modified, so interleaved calls cannot disturb each other.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::config::TrainSetRequest;
use crate::constants::sampling::{PER_EVAL_SEED_BOUND, PER_EVAL_SEED_SOURCE};
use crate::data::Sample;
use crate::errors::TaskError;
use crate::splits::{SampleSplits, SplitLabel};

/// Seeds used to draw reproducible train sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrainSetSeeds {
    /// One train set from this seed.
    Fixed(u64),
    /// `n` train sets seeded `0..n`.
    Enumerated(usize),
    /// One train set per evaluation sample.
    PerEvalSample(usize),
}

impl TrainSetSeeds {
    /// Resolve the seed set of `request` against a valid split of `valid_len`.
    pub fn from_request(request: &TrainSetRequest, valid_len: usize) -> Result<Self, TaskError> {
        if let Some(seed) = request.seed {
            return Ok(TrainSetSeeds::Fixed(seed));
        }
        if let Some(count) = request.num_train_sets {
            return Ok(TrainSetSeeds::Enumerated(count));
        }
        if request.num_dev.is_some() {
            return Err(TaskError::Configuration(
                "num_dev is not supported with one train set per evaluation sample".to_string(),
            ));
        }
        Ok(TrainSetSeeds::PerEvalSample(
            request.num_eval.unwrap_or(valid_len),
        ))
    }

    /// Concrete seeds, in train-set order.
    pub fn seeds(&self) -> Vec<u64> {
        match self {
            TrainSetSeeds::Fixed(seed) => vec![*seed],
            TrainSetSeeds::Enumerated(count) => (0..*count as u64).collect(),
            TrainSetSeeds::PerEvalSample(count) => {
                let mut rng = StdRng::seed_from_u64(PER_EVAL_SEED_SOURCE);
                (0..*count)
                    .map(|_| rng.random_range(0..PER_EVAL_SEED_BOUND))
                    .collect()
            }
        }
    }
}

/// Seeded permutation of `0..len`.
pub fn permutation(seed: u64, len: usize) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut order = (0..len).collect::<Vec<_>>();
    order.shuffle(&mut rng);
    order
}

/// Draw a reproducible subset of `samples`.
///
/// Takes the first `num` positions of a `seed` permutation, or `num + 1` when
/// `exclude` is set; an `exclude` index among those positions is removed,
/// otherwise the result is truncated to `num`. An excluded index outside the
/// first `num + 1` positions is therefore not excluded at all.
pub fn sample_subset(
    samples: &[Sample],
    seed: u64,
    num: usize,
    exclude: Option<usize>,
) -> Vec<Sample> {
    let take = if exclude.is_some() {
        num.saturating_add(1)
    } else {
        num
    };
    let mut order = permutation(seed, samples.len());
    order.truncate(take);

    match exclude.and_then(|excluded| order.iter().position(|idx| *idx == excluded)) {
        Some(pos) => {
            order.remove(pos);
        }
        None => order.truncate(num),
    }

    order.into_iter().map(|idx| samples[idx].clone()).collect()
}

/// Draw one train set per resolved seed from the train split.
///
/// When `num_dev` is set the dev samples sit at the end of each set.
pub fn sample_train_sets(
    splits: &SampleSplits,
    request: &TrainSetRequest,
) -> Result<Vec<Vec<Sample>>, TaskError> {
    let seeds = TrainSetSeeds::from_request(request, splits.valid.len())?.seeds();
    let train = splits.get(SplitLabel::Train);
    let draw_size = request.draw_size();
    if request.num_dev.is_some() && draw_size > train.len() {
        warn!(
            "[fewshot:sampling] num_train + num_dev ({}) > available training examples ({})",
            draw_size,
            train.len()
        );
    }

    let mut train_sets = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let set = sample_subset(train, seed, draw_size, None);
        if let Some(num_dev) = request.num_dev {
            info!(
                "[fewshot:sampling] sample train set {}/{}",
                set.len(),
                train.len()
            );
            info!("[fewshot:sampling] ... including dev set {num_dev} samples");
        }
        train_sets.push(set);
    }
    Ok(train_sets)
}
