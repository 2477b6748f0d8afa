//! Stagnation handling and diversity injection.
//!
//! Three independent mechanisms, each optional:
//!
//! - **Failure streaks**: a candidate that keeps failing against a
//!   reference fitness is either re-randomized or pulled halfway toward
//!   the best once its streak exceeds a threshold.
//! - **Scheduled reinitialization**: every `reinit_interval` iterations
//!   (iteration 0 included) the first half of the population is
//!   re-randomized.
//! - **Pull toward best**: after each movement step, every candidate moves
//!   halfway toward the best with a fixed probability.

use rand::Rng;
use tracing::{debug, trace};

use super::movement::Bounds;
use super::population::Population;
use crate::error::ConfigError;

/// Reference fitness a candidate's streak is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StreakBasis {
    /// Fail whenever worse than the global best. Every candidate except
    /// the best holder accumulates failures, giving aggressive turnover.
    #[default]
    GlobalBest,
    /// Fail whenever the candidate's own personal best did not improve.
    PersonalBest,
}

/// Per-candidate failure streak rule.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreakRule {
    /// A response triggers once a streak exceeds this length.
    pub failure_threshold: usize,
    /// Probability of full reinitialization; otherwise the candidate is
    /// mutated toward the best.
    ///
    /// Defaults to 1.0, so a stale candidate is always re-randomized.
    pub reinit_probability: f64,
    pub basis: StreakBasis,
}

impl Default for StreakRule {
    fn default() -> Self {
        Self {
            failure_threshold: 60,
            reinit_probability: 1.0,
            basis: StreakBasis::GlobalBest,
        }
    }
}

/// Which stagnation mechanisms are active and how they are tuned.
///
/// # Examples
///
/// ```
/// use u_swarmsched::swarm::{StagnationPolicy, StreakBasis};
///
/// let policy = StagnationPolicy::default()
///     .with_reinit_interval(Some(400))
///     .with_streak_basis(StreakBasis::PersonalBest);
/// assert!(policy.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StagnationPolicy {
    /// Failure streak rule; `None` disables streak tracking responses.
    pub streak: Option<StreakRule>,
    /// Iterations between bulk reinitializations; `None` disables them.
    pub reinit_interval: Option<usize>,
    /// Per-iteration probability of moving each candidate halfway to the best.
    pub best_pull_probability: f64,
}

impl Default for StagnationPolicy {
    fn default() -> Self {
        Self {
            streak: Some(StreakRule::default()),
            reinit_interval: Some(800),
            best_pull_probability: 0.0,
        }
    }
}

impl StagnationPolicy {
    /// No stagnation handling at all.
    pub fn disabled() -> Self {
        Self {
            streak: None,
            reinit_interval: None,
            best_pull_probability: 0.0,
        }
    }

    pub fn with_streak(mut self, rule: Option<StreakRule>) -> Self {
        self.streak = rule;
        self
    }

    /// Sets the streak basis, enabling the default streak rule if none is set.
    pub fn with_streak_basis(mut self, basis: StreakBasis) -> Self {
        self.streak.get_or_insert_with(StreakRule::default).basis = basis;
        self
    }

    pub fn with_reinit_interval(mut self, interval: Option<usize>) -> Self {
        self.reinit_interval = interval;
        self
    }

    pub fn with_best_pull_probability(mut self, p: f64) -> Self {
        self.best_pull_probability = p;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(rule) = &self.streak {
            if !(0.0..=1.0).contains(&rule.reinit_probability) {
                return Err(ConfigError::OutOfUnitRange {
                    name: "reinit_probability",
                    value: rule.reinit_probability,
                });
            }
        }
        if self.reinit_interval == Some(0) {
            return Err(ConfigError::ZeroReinitInterval);
        }
        if !(0.0..=1.0).contains(&self.best_pull_probability) {
            return Err(ConfigError::OutOfUnitRange {
                name: "best_pull_probability",
                value: self.best_pull_probability,
            });
        }
        Ok(())
    }
}

/// Applies a [`StagnationPolicy`] to a population.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StagnationManager {
    policy: StagnationPolicy,
    bounds: Bounds,
}

impl StagnationManager {
    pub fn new(policy: StagnationPolicy, bounds: Bounds) -> Self {
        Self { policy, bounds }
    }

    /// Updates failure streaks after an evaluation.
    ///
    /// `improved[i]` tells whether candidate `i` improved its personal
    /// best in that evaluation; `global_best` is the best-known fitness
    /// after the evaluation.
    pub fn record(&self, population: &mut Population, improved: &[bool], global_best: f64) {
        let Some(rule) = self.policy.streak else {
            return;
        };
        for (i, &improved) in improved.iter().enumerate() {
            let failed = match rule.basis {
                StreakBasis::GlobalBest => population.fitness(i) > global_best,
                StreakBasis::PersonalBest => !improved,
            };
            let streak = population.streak_mut(i);
            *streak = if failed { *streak + 1 } else { 0 };
        }
    }

    /// Re-randomizes the first half of the population when `t` is a
    /// multiple of the interval. Returns the number of candidates reset.
    pub fn scheduled_reinit<R: Rng>(
        &self,
        t: usize,
        population: &mut Population,
        rng: &mut R,
    ) -> usize {
        let Some(interval) = self.policy.reinit_interval else {
            return 0;
        };
        if !t.is_multiple_of(interval) {
            return 0;
        }
        let count = population.len() / 2;
        for i in 0..count {
            population.randomize(i, rng);
        }
        debug!(iteration = t, count, "scheduled reinitialization");
        count
    }

    /// Responds to streaks above the threshold. Returns the number of
    /// candidates that were reset or mutated.
    pub fn respond<R: Rng>(
        &self,
        population: &mut Population,
        best: &[usize],
        rng: &mut R,
    ) -> usize {
        let Some(rule) = self.policy.streak else {
            return 0;
        };
        let mut responses = 0;
        for i in 0..population.len() {
            let streak = population.streak(i);
            if streak <= rule.failure_threshold {
                continue;
            }
            if rng.random_range(0.0..1.0) < rule.reinit_probability {
                population.randomize(i, rng);
                trace!(candidate = i, streak, "stagnant candidate reinitialized");
            } else {
                halve_toward(population.candidate_mut(i), best, self.bounds);
                *population.streak_mut(i) = 0;
                trace!(candidate = i, streak, "stagnant candidate mutated toward best");
            }
            responses += 1;
        }
        responses
    }

    /// Moves each candidate halfway toward `best` with the configured
    /// probability.
    pub fn pull_toward_best<R: Rng>(
        &self,
        population: &mut Population,
        best: &[usize],
        rng: &mut R,
    ) {
        let p = self.policy.best_pull_probability;
        if p <= 0.0 {
            return;
        }
        for i in 0..population.len() {
            if rng.random_range(0.0..1.0) < p {
                halve_toward(population.candidate_mut(i), best, self.bounds);
            }
        }
    }
}

/// `pos += (best - pos) / 2` per dimension, integer division toward zero.
fn halve_toward(candidate: &mut [usize], best: &[usize], bounds: Bounds) {
    for (pos, &target) in candidate.iter_mut().zip(best) {
        let p = *pos as i64;
        *pos = bounds.clamp_int(p + (target as i64 - p) / 2);
    }
}
