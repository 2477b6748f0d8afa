//! Population storage.
//!
//! Candidates live in a fixed-size vector; fitness, failure streaks,
//! velocities and personal bests are parallel vectors indexed by the
//! same position.

use rand::Rng;

use crate::fitness::FitnessEvaluator;

/// Assignment vector: `candidate[task] = resource index`.
pub type Candidate = Vec<usize>;

/// Fixed-size population with per-position search state.
#[derive(Debug, Clone)]
pub struct Population {
    candidates: Vec<Candidate>,
    fitness: Vec<f64>,
    streaks: Vec<usize>,
    velocities: Vec<Vec<i64>>,
    personal_best: Vec<Candidate>,
    personal_best_fitness: Vec<f64>,
    resources: usize,
}

impl Population {
    /// `size` candidates of `dims` tasks, each value uniform in
    /// `[0, resources)`.
    ///
    /// # Panics
    /// Panics if `resources` is zero and `dims` is not.
    pub fn random<R: Rng>(size: usize, dims: usize, resources: usize, rng: &mut R) -> Self {
        let candidates: Vec<Candidate> = (0..size)
            .map(|_| random_candidate(dims, resources, rng))
            .collect();
        Self {
            fitness: vec![f64::INFINITY; size],
            streaks: vec![0; size],
            velocities: vec![vec![0; dims]; size],
            personal_best: candidates.clone(),
            personal_best_fitness: vec![f64::INFINITY; size],
            candidates,
            resources,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn candidate(&self, i: usize) -> &Candidate {
        &self.candidates[i]
    }

    pub(crate) fn candidate_mut(&mut self, i: usize) -> &mut Candidate {
        &mut self.candidates[i]
    }

    pub(crate) fn replace_all(&mut self, next: Vec<Candidate>) {
        debug_assert_eq!(next.len(), self.candidates.len());
        self.candidates = next;
    }

    /// Fitness from the latest evaluation (`INFINITY` before the first).
    pub fn fitness(&self, i: usize) -> f64 {
        self.fitness[i]
    }

    pub fn fitness_values(&self) -> &[f64] {
        &self.fitness
    }

    pub fn streak(&self, i: usize) -> usize {
        self.streaks[i]
    }

    pub(crate) fn streak_mut(&mut self, i: usize) -> &mut usize {
        &mut self.streaks[i]
    }

    pub fn velocity(&self, i: usize) -> &[i64] {
        &self.velocities[i]
    }

    /// Position and velocity of candidate `i`, borrowed together.
    pub(crate) fn motion_mut(&mut self, i: usize) -> (&mut Candidate, &mut Vec<i64>, &Candidate) {
        (
            &mut self.candidates[i],
            &mut self.velocities[i],
            &self.personal_best[i],
        )
    }

    pub fn personal_best(&self, i: usize) -> (&Candidate, f64) {
        (&self.personal_best[i], self.personal_best_fitness[i])
    }

    /// Re-evaluates every candidate from scratch and refreshes personal
    /// bests. Returns, per position, whether the personal best strictly
    /// improved.
    pub fn evaluate(&mut self, evaluator: &FitnessEvaluator, parallel: bool) -> Vec<bool> {
        self.fitness = evaluate_all(&self.candidates, evaluator, parallel);

        (0..self.candidates.len())
            .map(|i| {
                let f = self.fitness[i];
                if f < self.personal_best_fitness[i] {
                    self.personal_best_fitness[i] = f;
                    self.personal_best[i].clone_from(&self.candidates[i]);
                    true
                } else {
                    false
                }
            })
            .collect()
    }

    /// Position with the lowest current fitness.
    pub fn best_index(&self) -> Option<usize> {
        self.fitness
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }

    /// Replaces candidate `i` with a fresh uniform draw and discards its
    /// history: fitness, streak, velocity and personal best.
    pub(crate) fn randomize<R: Rng>(&mut self, i: usize, rng: &mut R) {
        let dims = self.candidates[i].len();
        self.candidates[i] = random_candidate(dims, self.resources, rng);
        self.fitness[i] = f64::INFINITY;
        self.streaks[i] = 0;
        self.velocities[i].iter_mut().for_each(|v| *v = 0);
        self.personal_best[i].clone_from(&self.candidates[i]);
        self.personal_best_fitness[i] = f64::INFINITY;
    }
}

fn random_candidate<R: Rng>(dims: usize, resources: usize, rng: &mut R) -> Candidate {
    (0..dims).map(|_| rng.random_range(0..resources)).collect()
}

#[cfg(feature = "parallel")]
fn evaluate_all(
    candidates: &[Candidate],
    evaluator: &FitnessEvaluator,
    parallel: bool,
) -> Vec<f64> {
    use rayon::prelude::*;

    if parallel {
        candidates.par_iter().map(|c| evaluator.fitness(c)).collect()
    } else {
        candidates.iter().map(|c| evaluator.fitness(c)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all(
    candidates: &[Candidate],
    evaluator: &FitnessEvaluator,
    _parallel: bool,
) -> Vec<f64> {
    candidates.iter().map(|c| evaluator.fitness(c)).collect()
}
