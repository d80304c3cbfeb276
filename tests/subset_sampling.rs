mod common;

use common::fixture_provider;
use fewshot_tasks::sampling::permutation;
use fewshot_tasks::{
    Benchmark, Sample, SplitLabel, TaskConfig, TaskDataset, TaskError, TrainSetRequest, get_task,
};

fn copa_task() -> TaskDataset {
    let provider = fixture_provider(Benchmark::Copa, 120, 40);
    get_task("Copa", &provider, &TaskConfig::default()).expect("Copa loads")
}

fn position_of(pool: &[Sample], sample: &Sample) -> usize {
    pool.iter()
        .position(|candidate| candidate == sample)
        .expect("subset samples come from the pool")
}

#[test]
fn same_split_seed_and_count_give_identical_subsets() {
    let task = copa_task();
    let first = task.sample_subset(SplitLabel::Train, 11, 16, None);
    let second = task.sample_subset(SplitLabel::Train, 11, 16, None);
    assert_eq!(first, second);
    assert_eq!(first.len(), 16);

    let other_seed = task.sample_subset(SplitLabel::Train, 12, 16, None);
    assert_ne!(first, other_seed);
}

#[test]
fn subset_size_never_exceeds_the_split() {
    let task = copa_task();
    let valid_len = task.split(SplitLabel::Valid).len();
    let everything = task.sample_subset(SplitLabel::Valid, 3, valid_len + 25, None);
    assert_eq!(everything.len(), valid_len);
    assert!(task.sample_subset(SplitLabel::Valid, 3, 0, None).is_empty());
}

#[test]
fn excluding_a_drawn_index_removes_exactly_that_sample() {
    let task = copa_task();
    let pool = task.split(SplitLabel::Train);
    let order = permutation(5, pool.len());
    let excluded = order[2];

    let subset = task.sample_subset(SplitLabel::Train, 5, 8, Some(excluded));
    assert_eq!(subset.len(), 8);
    let positions = subset
        .iter()
        .map(|sample| position_of(pool, sample))
        .collect::<Vec<_>>();
    assert!(!positions.contains(&excluded));

    let expected = order[..9]
        .iter()
        .copied()
        .filter(|idx| *idx != excluded)
        .collect::<Vec<_>>();
    assert_eq!(positions, expected);
}

#[test]
fn excluding_an_undrawn_index_keeps_the_plain_prefix() {
    let task = copa_task();
    let pool = task.split(SplitLabel::Train);
    let order = permutation(5, pool.len());
    let undrawn = order[50];

    let subset = task.sample_subset(SplitLabel::Train, 5, 8, Some(undrawn));
    let plain = task.sample_subset(SplitLabel::Train, 5, 8, None);
    assert_eq!(subset, plain);
}

#[test]
fn fixed_seed_draws_a_single_train_set() {
    let task = copa_task();
    let request = TrainSetRequest {
        num_train: 10,
        seed: Some(99),
        num_train_sets: Some(5),
        ..TrainSetRequest::default()
    };
    let sets = task.sample_train_sets(&request).expect("train sets");
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0], task.sample_subset(SplitLabel::Train, 99, 10, None));
}

#[test]
fn enumerated_train_sets_use_seeds_zero_to_n() {
    let task = copa_task();
    let request = TrainSetRequest {
        num_train: 6,
        num_dev: Some(2),
        num_train_sets: Some(3),
        ..TrainSetRequest::default()
    };
    let sets = task.sample_train_sets(&request).expect("train sets");
    assert_eq!(sets.len(), 3);
    for (seed, set) in sets.iter().enumerate() {
        assert_eq!(set.len(), 8);
        assert_eq!(
            *set,
            task.sample_subset(SplitLabel::Train, seed as u64, 8, None)
        );
    }
}

#[test]
fn per_eval_train_sets_follow_the_valid_size() {
    let task = copa_task();
    let request = TrainSetRequest {
        num_train: 4,
        ..TrainSetRequest::default()
    };
    let sets = task.sample_train_sets(&request).expect("train sets");
    assert_eq!(sets.len(), task.valid_samples().len());
    assert!(sets.iter().all(|set| set.len() == 4));

    let again = task.sample_train_sets(&request).expect("train sets again");
    assert_eq!(sets, again);

    let limited = TrainSetRequest {
        num_eval: Some(5),
        ..request
    };
    assert_eq!(task.sample_train_sets(&limited).expect("limited").len(), 5);
}

#[test]
fn per_eval_train_sets_reject_dev_samples() {
    let task = copa_task();
    let request = TrainSetRequest {
        num_dev: Some(4),
        ..TrainSetRequest::default()
    };
    assert!(matches!(
        task.sample_train_sets(&request),
        Err(TaskError::Configuration(_))
    ));
}

#[test]
fn oversized_dev_requests_are_clamped_to_the_train_split() {
    let task = copa_task();
    let request = TrainSetRequest {
        num_train: 110,
        num_dev: Some(30),
        num_train_sets: Some(1),
        ..TrainSetRequest::default()
    };
    let sets = task.sample_train_sets(&request).expect("train sets");
    assert_eq!(sets[0].len(), task.split(SplitLabel::Train).len());
}
