use itertools::{Itertools, MinMaxResult};

use crate::partition::Group;

/// Threshold below which (inclusive) a draft counts as balanced
pub const DEFAULT_THRESHOLD: f64 = 0.001;

/// Arithmetic mean, 0 for an empty input.
pub fn average<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    match count {
        0 => 0.0,
        n => sum / n as f64,
    }
}

/// Difference between the highest and lowest group mean frequency.
/// Empty groups take part with a mean of 0.
pub fn evaluate(groups: &[Group]) -> f64 {
    match groups.iter().map(|g| g.mean_frequency).minmax() {
        MinMaxResult::NoElements | MinMaxResult::OneElement(_) => 0.0,
        MinMaxResult::MinMax(min, max) => max - min,
    }
}

pub fn is_balanced(spread: f64, threshold: f64) -> bool {
    spread <= threshold
}

/// A partition together with its measured spread
#[derive(Debug, Clone, PartialEq)]
pub struct TrialResult {
    pub groups: Vec<Group>,
    pub spread: f64,
}

impl TrialResult {
    pub fn new(groups: Vec<Group>) -> Self {
        let spread = evaluate(&groups);
        Self { groups, spread }
    }

    pub fn is_balanced(&self, threshold: f64) -> bool {
        is_balanced(self.spread, threshold)
    }
}
