use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::balance::average;
use crate::frequency::LetterStat;

/// Number of shafts in a standard four-shaft draft
pub const DEFAULT_SHAFTS: usize = 4;

/// One shaft of a draft: a stable 1-based index and its member letters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub index: usize,
    pub members: Vec<LetterStat>,
    pub mean_frequency: f64,
}

impl Group {
    pub fn new(index: usize, members: Vec<LetterStat>) -> Self {
        let mean_frequency = average(members.iter().map(|m| m.frequency));
        Self {
            index,
            members,
            mean_frequency,
        }
    }

    /// Member letters sorted alphabetically, e.g. "AEKT"
    pub fn label(&self) -> String {
        self.members.iter().map(|m| m.letter).sorted().collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Splits a letter set into `shafts` random groups of near-equal size.
///
/// Sizes follow a fixed apportionment: every group gets `n / shafts` letters
/// from consecutive blocks of a shuffled order, then the `n % shafts` leftover
/// letters go one each to the lowest-indexed groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partitioner {
    shafts: usize,
}

impl Default for Partitioner {
    fn default() -> Self {
        Self::new(DEFAULT_SHAFTS)
    }
}

impl Partitioner {
    pub fn new(shafts: usize) -> Self {
        Self { shafts }
    }

    pub fn shafts(&self) -> usize {
        self.shafts
    }

    /// Uniformly random permutation of `0..len`
    pub fn shuffle_order<R: Rng + ?Sized>(&self, len: usize, rng: &mut R) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(rng);
        order
    }

    /// Deterministically build the groups for a given permutation of `stats`.
    pub fn apportion(&self, stats: &[LetterStat], order: &[usize]) -> Vec<Group> {
        debug_assert_eq!(stats.len(), order.len());

        let k = self.shafts;
        if k == 0 {
            return Vec::new();
        }
        let base = order.len() / k;

        let mut members: Vec<Vec<LetterStat>> = order
            .chunks(base.max(1))
            .take(if base == 0 { 0 } else { k })
            .map(|block| block.iter().map(|&i| stats[i]).collect())
            .collect();
        members.resize_with(k, Vec::new);

        // the tail holds the n % k leftover letters
        for (slot, &i) in order[k * base..].iter().enumerate() {
            members[slot].push(stats[i]);
        }

        members
            .into_iter()
            .enumerate()
            .map(|(i, group)| Group::new(i + 1, group))
            .collect()
    }

    pub fn partition<R: Rng + ?Sized>(&self, stats: &[LetterStat], rng: &mut R) -> Vec<Group> {
        let order = self.shuffle_order(stats.len(), rng);
        self.apportion(stats, &order)
    }
}
