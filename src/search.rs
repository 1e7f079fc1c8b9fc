use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::balance::{TrialResult, DEFAULT_THRESHOLD};
use crate::error::{DraftError, Result};
use crate::frequency::FrequencyTable;
use crate::partition::{Group, Partitioner, DEFAULT_SHAFTS};

pub const DEFAULT_TRIALS: usize = 100_000;

/// Budget and acceptance settings for one search run
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub trials: usize,
    pub shafts: usize,
    pub threshold: f64,
    /// Stop early once this much wall time has passed
    pub time_limit: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            shafts: DEFAULT_SHAFTS,
            threshold: DEFAULT_THRESHOLD,
            time_limit: None,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.shafts == 0 {
            return Err(DraftError::InvalidConfig(
                "shaft count must be at least 1".to_string(),
            ));
        }
        if self.threshold.is_nan() || self.threshold < 0.0 {
            return Err(DraftError::InvalidConfig(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Running,
    Done,
}

/// An accepted trial, kept as the permutation that produced it
#[derive(Debug, Clone, PartialEq)]
struct AcceptedTrial {
    acceptance: usize,
    trial: usize,
    order: Box<[u8]>,
    spread: f64,
}

/// Append-only record of every balanced trial found during a run
#[derive(Debug, Clone, Default)]
pub struct BalancedSet {
    entries: Vec<AcceptedTrial>,
}

impl BalancedSet {
    fn push(&mut self, trial: usize, order: &[usize], spread: f64) {
        let acceptance = self.entries.len() + 1;
        self.entries.push(AcceptedTrial {
            acceptance,
            trial,
            // tables hold at most ALPHABET_LEN distinct letters
            order: order.iter().map(|&i| i as u8).collect(),
            spread,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&AcceptedTrial> {
        self.entries.choose(rng)
    }
}

/// The balanced draft picked at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChosenDraft {
    /// 1-based position among accepted trials
    pub acceptance: usize,
    /// 0-based trial number that produced it
    pub trial: usize,
    pub spread: f64,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub trials_run: usize,
    pub accepted: usize,
    pub baseline: f64,
    pub chosen: Option<ChosenDraft>,
}

impl SearchOutcome {
    pub fn acceptance_rate(&self) -> f64 {
        if self.trials_run == 0 {
            0.0
        } else {
            self.accepted as f64 / self.trials_run as f64
        }
    }
}

/// Drives partition trials one at a time until the budget is spent.
///
/// Every trial draws a fresh permutation from `rng`; nothing is reused
/// between trials and the loop never stops on the first success. When the
/// budget (or deadline) is exhausted one accepted trial is picked uniformly.
pub struct SearchLoop<'a, R: Rng> {
    table: &'a FrequencyTable,
    partitioner: Partitioner,
    config: SearchConfig,
    rng: R,
    trial_count: usize,
    balanced: BalancedSet,
    started_at: Option<Instant>,
    state: SearchState,
}

impl<'a, R: Rng> SearchLoop<'a, R> {
    pub fn new(table: &'a FrequencyTable, config: SearchConfig, rng: R) -> Result<Self> {
        config.validate()?;
        if table.is_empty() {
            return Err(DraftError::EmptyCorpus);
        }

        let state = if config.trials == 0 {
            SearchState::Done
        } else {
            SearchState::Running
        };

        Ok(Self {
            table,
            partitioner: Partitioner::new(config.shafts),
            config,
            rng,
            trial_count: 0,
            balanced: BalancedSet::default(),
            started_at: None,
            state,
        })
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn trial_count(&self) -> usize {
        self.trial_count
    }

    pub fn balanced(&self) -> &BalancedSet {
        &self.balanced
    }

    fn deadline_passed(&self) -> bool {
        match (self.config.time_limit, self.started_at) {
            (Some(limit), Some(started_at)) => started_at.elapsed() >= limit,
            _ => false,
        }
    }

    /// Run a single trial. Returns the state after the trial.
    pub fn step(&mut self) -> SearchState {
        if self.state == SearchState::Done {
            return self.state;
        }
        // the clock starts with the first trial, not at construction
        self.started_at.get_or_insert_with(Instant::now);
        if self.deadline_passed() {
            log::debug!(
                "time limit reached after {} of {} trials",
                self.trial_count,
                self.config.trials
            );
            self.state = SearchState::Done;
            return self.state;
        }

        let stats = self.table.stats();
        let order = self.partitioner.shuffle_order(stats.len(), &mut self.rng);
        let trial = TrialResult::new(self.partitioner.apportion(stats, &order));

        if trial.is_balanced(self.config.threshold) {
            log::trace!(
                "trial {} accepted with spread {}",
                self.trial_count,
                trial.spread
            );
            self.balanced.push(self.trial_count, &order, trial.spread);
        }

        self.trial_count += 1;
        if self.trial_count >= self.config.trials {
            self.state = SearchState::Done;
        }
        self.state
    }

    pub fn run(mut self) -> SearchOutcome {
        log::info!(
            "searching {} trials for {} shafts over {} letters (threshold {})",
            self.config.trials,
            self.config.shafts,
            self.table.len(),
            self.config.threshold
        );
        while self.step() == SearchState::Running {}
        self.finish()
    }

    /// Pick the result from whatever has been collected so far
    pub fn finish(mut self) -> SearchOutcome {
        let chosen = self.balanced.choose(&mut self.rng).map(|entry| {
            let order: Vec<usize> = entry.order.iter().map(|&i| i as usize).collect();
            ChosenDraft {
                acceptance: entry.acceptance,
                trial: entry.trial,
                spread: entry.spread,
                groups: self.partitioner.apportion(self.table.stats(), &order),
            }
        });

        let outcome = SearchOutcome {
            trials_run: self.trial_count,
            accepted: self.balanced.len(),
            baseline: self.table.baseline(),
            chosen,
        };
        log::info!(
            "{} of {} trials balanced ({:.3}%), baseline frequency {:.5}",
            outcome.accepted,
            outcome.trials_run,
            outcome.acceptance_rate() * 100.0,
            outcome.baseline
        );
        outcome
    }
}

/// Run a full search over `table` with the given settings.
pub fn search<R: Rng>(
    table: &FrequencyTable,
    config: SearchConfig,
    rng: &mut R,
) -> Result<SearchOutcome> {
    Ok(SearchLoop::new(table, config, rng)?.run())
}
