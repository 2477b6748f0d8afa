//! Swarm search loop execution.
//!
//! [`SwarmRunner`] drives the one loop shared by every variant:
//! evaluate → track best → update streaks → move → scheduled
//! reinitialization → streak responses → pull toward best → repeat.

use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::config::{SwarmConfig, UpdateMode};
use super::movement::{
    brownian, eddy_formation, encircle, sine_cosine, velocity_update, Bounds, EncircleCoefficients,
    LevyFlight, MovementStrategy, VelocityCoefficients,
};
use super::phase::{Kernel, Phase, PhaseScheduler};
use super::population::{Candidate, Population};
use super::stagnation::StagnationManager;
use crate::error::{ProblemError, SwarmError};
use crate::fitness::{EnergyModel, FitnessReport};
use crate::model::{AllocationProblem, Assignment};

/// Best candidate found during a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BestSolution {
    /// Resource index per task position.
    pub candidate: Candidate,
    pub fitness: f64,
    /// Iteration whose evaluation produced this candidate.
    pub iteration: usize,
}

/// Result of a swarm search run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwarmResult {
    /// Best solution, or `None` when nothing was evaluated (no resources,
    /// an empty population, or cancelled before the first iteration).
    pub best: Option<BestSolution>,

    /// Number of iterations executed.
    pub iterations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best-known fitness at the end of each iteration. Never increases.
    pub fitness_history: Vec<f64>,

    /// Candidates reset by scheduled bulk reinitialization.
    pub reinitialized: usize,

    /// Candidates reset or mutated because of a failure streak.
    pub stagnation_responses: usize,
}

impl SwarmResult {
    fn unsolved(cancelled: bool) -> Self {
        Self {
            best: None,
            iterations: 0,
            cancelled,
            fitness_history: Vec::new(),
            reinitialized: 0,
            stagnation_responses: 0,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.best.is_some()
    }

    pub fn best_fitness(&self) -> Option<f64> {
        self.best.as_ref().map(|b| b.fitness)
    }

    /// Maps the best candidate onto task and resource ids.
    pub fn bind(&self, problem: &AllocationProblem) -> Result<Option<Assignment>, ProblemError> {
        self.best
            .as_ref()
            .map(|b| problem.bind(&b.candidate))
            .transpose()
    }

    /// Full objective breakdown of the best candidate.
    pub fn report(
        &self,
        problem: &AllocationProblem,
        model: &EnergyModel,
    ) -> Result<Option<FitnessReport>, ProblemError> {
        self.best
            .as_ref()
            .map(|b| problem.report(&b.candidate, model))
            .transpose()
    }
}

/// Executes the swarm search loop.
///
/// # Usage
///
/// ```
/// use u_swarmsched::model::AllocationProblem;
/// use u_swarmsched::swarm::{SwarmConfig, SwarmRunner};
///
/// let problem = AllocationProblem::from_raw(&[500, 500], &[100.0, 100.0]).unwrap();
/// let config = SwarmConfig::immpa().with_max_iterations(100).with_seed(42);
/// let result = SwarmRunner::run(&problem, &config).unwrap();
///
/// let assignment = result.bind(&problem).unwrap().unwrap();
/// assert_eq!(assignment.len(), 2);
/// ```
pub struct SwarmRunner;

impl SwarmRunner {
    /// Runs the search to completion.
    pub fn run(
        problem: &AllocationProblem,
        config: &SwarmConfig,
    ) -> Result<SwarmResult, SwarmError> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the search
    /// stops before the next iteration and returns the best solution
    /// found so far.
    pub fn run_with_cancel(
        problem: &AllocationProblem,
        config: &SwarmConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SwarmResult, SwarmError> {
        let mut rng = u_numflow::random::create_rng(config.seed.unwrap_or_else(rand::random));
        Self::run_with_rng(problem, config, &mut rng, cancel)
    }

    /// Runs the search drawing every random number from `rng`.
    ///
    /// `config.seed` is ignored.
    #[instrument(
        level = "debug",
        skip_all,
        fields(
            strategy = config.strategy.name(),
            tasks = problem.task_count(),
            resources = problem.resource_count(),
        )
    )]
    pub fn run_with_rng<R: Rng>(
        problem: &AllocationProblem,
        config: &SwarmConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SwarmResult, SwarmError> {
        config.validate()?;

        let resources = problem.resource_count();
        if resources == 0 {
            info!("no resources, nothing to place");
            return Ok(SwarmResult::unsolved(false));
        }
        if config.population_size == 0 {
            info!("empty population, nothing to evaluate");
            return Ok(SwarmResult::unsolved(false));
        }

        info!(
            population = config.population_size,
            max_iterations = config.max_iterations,
            "swarm search started"
        );

        let evaluator = problem.evaluator(config.energy.clone());
        let bounds = Bounds::new(resources);
        let scheduler = PhaseScheduler::new(config.max_iterations);
        let mover = Mover::new(config.strategy, config.update_mode, bounds, scheduler);
        let stagnation = StagnationManager::new(config.stagnation, bounds);

        let mut population =
            Population::random(config.population_size, problem.task_count(), resources, rng);

        let mut best: Option<BestSolution> = None;
        let mut fitness_history = Vec::with_capacity(config.max_iterations);
        let mut reinitialized = 0;
        let mut stagnation_responses = 0;
        let mut cancelled = false;
        let mut phase: Option<Phase> = None;

        for t in 0..config.max_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            // Evaluate and track the best
            let improved = population.evaluate(&evaluator, config.parallel);
            if let Some(i) = population.best_index() {
                let fitness = population.fitness(i);
                if best.as_ref().is_none_or(|b| fitness < b.fitness) {
                    debug!(iteration = t, fitness, "new best");
                    best = Some(BestSolution {
                        candidate: population.candidate(i).clone(),
                        fitness,
                        iteration: t,
                    });
                }
            }
            let Some(current) = best.as_ref() else {
                break;
            };
            stagnation.record(&mut population, &improved, current.fitness);
            fitness_history.push(current.fitness);

            if mover.is_phased() {
                let now = scheduler.phase(t);
                if phase != Some(now) {
                    debug!(iteration = t, phase = ?now, "phase transition");
                    phase = Some(now);
                }
            }

            // Move, then inject diversity
            mover.step(t, &mut population, &current.candidate, rng);
            reinitialized += stagnation.scheduled_reinit(t, &mut population, rng);
            stagnation_responses += stagnation.respond(&mut population, &current.candidate, rng);
            stagnation.pull_toward_best(&mut population, &current.candidate, rng);
        }

        let iterations = fitness_history.len();
        info!(
            iterations,
            cancelled,
            best_fitness = best.as_ref().map(|b| b.fitness),
            reinitialized,
            stagnation_responses,
            "swarm search finished"
        );

        Ok(SwarmResult {
            best,
            iterations,
            cancelled,
            fitness_history,
            reinitialized,
            stagnation_responses,
        })
    }
}

/// Applies one movement strategy to a whole population.
#[derive(Debug, Clone, Copy)]
struct Mover {
    strategy: MovementStrategy,
    mode: UpdateMode,
    bounds: Bounds,
    scheduler: PhaseScheduler,
    levy: Option<LevyFlight>,
}

impl Mover {
    fn new(
        strategy: MovementStrategy,
        mode: UpdateMode,
        bounds: Bounds,
        scheduler: PhaseScheduler,
    ) -> Self {
        let levy = match strategy {
            MovementStrategy::Predator { levy_beta, .. } => Some(LevyFlight::new(levy_beta)),
            _ => None,
        };
        Self {
            strategy,
            mode,
            bounds,
            scheduler,
            levy,
        }
    }

    fn is_phased(&self) -> bool {
        self.levy.is_some()
    }

    fn step<R: Rng>(&self, t: usize, population: &mut Population, best: &[usize], rng: &mut R) {
        match self.strategy {
            MovementStrategy::Predator {
                brownian_step,
                eddy_threshold,
                ..
            } => self.predator(t, population, brownian_step, eddy_threshold, rng),
            MovementStrategy::Swarm {
                inertia,
                cognitive,
                social,
            } => {
                let coeffs = VelocityCoefficients {
                    inertia,
                    cognitive,
                    social,
                };
                for i in 0..population.len() {
                    let (candidate, velocity, personal_best) = population.motion_mut(i);
                    for d in 0..candidate.len() {
                        let (pos, vel) = velocity_update(
                            candidate[d],
                            velocity[d],
                            personal_best[d],
                            best[d],
                            coeffs,
                            self.bounds,
                            rng,
                        );
                        candidate[d] = pos;
                        velocity[d] = vel;
                    }
                }
            }
            MovementStrategy::SineCosine { amplitude } => {
                let r1 = self.scheduler.linear_decay(amplitude, 0.0, t);
                for i in 0..population.len() {
                    for (pos, &target) in population.candidate_mut(i).iter_mut().zip(best) {
                        *pos = sine_cosine(*pos, target, r1, self.bounds, rng);
                    }
                }
            }
            MovementStrategy::Encircle { spiral_shape } => {
                let a = self.scheduler.linear_decay(2.0, 0.0, t);
                let a2 = self.scheduler.linear_decay(-1.0, -2.0, t);
                let peers = population.len();
                for i in 0..peers {
                    let coeffs = EncircleCoefficients::draw(a, a2, rng);
                    let mut next = population.candidate(i).clone();
                    for (d, pos) in next.iter_mut().enumerate() {
                        *pos = encircle(
                            *pos,
                            best[d],
                            coeffs,
                            spiral_shape,
                            peers,
                            |k| population.candidate(k)[d],
                            self.bounds,
                            rng,
                        );
                    }
                    *population.candidate_mut(i) = next;
                }
            }
        }
    }

    fn predator<R: Rng>(
        &self,
        t: usize,
        population: &mut Population,
        brownian_step: f64,
        eddy_threshold: f64,
        rng: &mut R,
    ) {
        let phase = self.scheduler.phase(t);
        let cf = self.scheduler.control_factor(t);
        let peers = population.len();

        match self.mode {
            UpdateMode::InPlace | UpdateMode::Sequential => {
                for i in 0..peers {
                    let own = (self.mode == UpdateMode::InPlace).then_some(i);
                    let next = self.predator_move(
                        population.candidate(i),
                        phase,
                        cf,
                        brownian_step,
                        eddy_threshold,
                        population.candidates(),
                        own,
                        rng,
                    );
                    *population.candidate_mut(i) = next;
                }
            }
            UpdateMode::Synchronous => {
                let snapshot = population.candidates().to_vec();
                let next = snapshot
                    .iter()
                    .map(|c| {
                        self.predator_move(
                            c,
                            phase,
                            cf,
                            brownian_step,
                            eddy_threshold,
                            &snapshot,
                            None,
                            rng,
                        )
                    })
                    .collect();
                population.replace_all(next);
            }
        }
    }

    /// Kernel move then eddy formation for every dimension of `candidate`.
    ///
    /// When `own` is the candidate's index in `peers`, picking itself as
    /// the eddy peer yields its moved value instead of the stored one.
    #[allow(clippy::too_many_arguments)]
    fn predator_move<R: Rng>(
        &self,
        candidate: &[usize],
        phase: Phase,
        cf: f64,
        brownian_step: f64,
        eddy_threshold: f64,
        peers: &[Candidate],
        own: Option<usize>,
        rng: &mut R,
    ) -> Candidate {
        let dims = candidate.len();
        candidate
            .iter()
            .enumerate()
            .map(|(d, &pos)| {
                let moved = match (PhaseScheduler::kernel(phase, d, dims), &self.levy) {
                    (Kernel::Levy, Some(levy)) => levy.apply(pos, self.bounds, rng),
                    _ => brownian(pos, brownian_step, self.bounds, rng),
                };
                eddy_formation(
                    moved,
                    cf,
                    eddy_threshold,
                    peers.len(),
                    |k| if own == Some(k) { moved } else { peers[k][d] },
                    self.bounds,
                    rng,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Deployment;
    use crate::swarm::{StagnationPolicy, StreakRule, Variant};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn primary() -> AllocationProblem {
        Deployment::primary().problem().unwrap()
    }

    #[test]
    fn test_mover_keeps_every_variant_in_bounds() {
        let problem = primary();
        let resources = problem.resource_count();
        let evaluator = problem.evaluator(EnergyModel::default());

        for variant in Variant::ALL {
            let config = variant.config().with_max_iterations(90);
            let bounds = Bounds::new(resources);
            let scheduler = PhaseScheduler::new(config.max_iterations);
            let mover = Mover::new(config.strategy, config.update_mode, bounds, scheduler);
            let mut rng = StdRng::seed_from_u64(7);
            let mut pop = Population::random(10, problem.task_count(), resources, &mut rng);

            for t in 0..config.max_iterations {
                pop.evaluate(&evaluator, false);
                let best = pop.candidate(pop.best_index().unwrap()).clone();
                mover.step(t, &mut pop, &best, &mut rng);
                for c in pop.candidates() {
                    assert_eq!(c.len(), 12);
                    assert!(
                        c.iter().all(|&v| v < resources),
                        "{} left bounds at t={t}: {c:?}",
                        variant.name()
                    );
                }
            }
        }
    }

    #[test]
    fn test_history_never_increases() {
        let problem = primary();
        for variant in Variant::ALL {
            let config = variant.config().with_max_iterations(200).with_seed(3);
            let result = SwarmRunner::run(&problem, &config).unwrap();

            assert_eq!(result.iterations, 200);
            assert_eq!(result.fitness_history.len(), 200);
            assert!(
                result.fitness_history.windows(2).all(|w| w[1] <= w[0]),
                "{} history increased",
                variant.name()
            );
            let best = result.best.unwrap();
            assert_eq!(best.fitness, *result.fitness_history.last().unwrap());
            assert!(best.candidate.iter().all(|&v| v < 60));
        }
    }

    #[test]
    fn test_two_equal_tasks_split_across_resources() {
        let problem = AllocationProblem::from_raw(&[500, 500], &[100.0, 100.0]).unwrap();
        let evaluator = problem.evaluator(EnergyModel::default());
        let stacked = evaluator.fitness(&[0, 0]);

        for variant in Variant::ALL {
            let config = variant.config().with_max_iterations(100).with_seed(11);
            let result = SwarmRunner::run(&problem, &config).unwrap();
            let best = result.best.unwrap();
            assert!(best.fitness <= stacked + 1e-12, "{}", variant.name());
        }
    }

    #[test]
    fn test_best_matches_reevaluation() {
        let problem = primary();
        let config = SwarmConfig::immpa().with_max_iterations(150).with_seed(5);
        let result = SwarmRunner::run(&problem, &config).unwrap();

        let report = result.report(&problem, &config.energy).unwrap().unwrap();
        let best = result.best.as_ref().unwrap();
        assert!((report.fitness - best.fitness).abs() < 1e-12);
        assert!(best.iteration < result.iterations);

        let assignment = result.bind(&problem).unwrap().unwrap();
        assert_eq!(assignment.len(), 12);
    }

    #[test]
    fn test_seeded_runs_reproducible() {
        let problem = primary();
        let config = SwarmConfig::mpa().with_max_iterations(120).with_seed(42);
        let a = SwarmRunner::run(&problem, &config).unwrap();
        let b = SwarmRunner::run(&problem, &config).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.fitness_history, b.fitness_history);
    }

    #[test]
    fn test_run_with_rng() {
        let problem = primary();
        let config = SwarmConfig::woa().with_max_iterations(50);
        let mut r1 = StdRng::seed_from_u64(9);
        let mut r2 = StdRng::seed_from_u64(9);
        let a = SwarmRunner::run_with_rng(&problem, &config, &mut r1, None).unwrap();
        let b = SwarmRunner::run_with_rng(&problem, &config, &mut r2, None).unwrap();
        assert_eq!(a.best, b.best);
    }

    #[test]
    fn test_cancelled_before_start() {
        let problem = primary();
        let flag = Arc::new(AtomicBool::new(true));
        let config = SwarmConfig::default().with_seed(1);
        let result = SwarmRunner::run_with_cancel(&problem, &config, Some(flag)).unwrap();

        assert!(result.cancelled);
        assert!(!result.is_solved());
        assert_eq!(result.iterations, 0);
        assert!(result.fitness_history.is_empty());
        assert_eq!(result.bind(&problem).unwrap(), None);
    }

    #[test]
    fn test_no_resources_is_unsolved() {
        let problem = AllocationProblem::from_raw(&[100, 200], &[]).unwrap();
        let result = SwarmRunner::run(&problem, &SwarmConfig::default().with_seed(1)).unwrap();
        assert!(result.best.is_none());
        assert!(!result.cancelled);
        assert_eq!(result.best_fitness(), None);
    }

    #[test]
    fn test_no_tasks_has_trivial_best() {
        let problem = AllocationProblem::from_raw(&[], &[100.0, 200.0]).unwrap();
        let config = SwarmConfig::default().with_max_iterations(10).with_seed(1);
        let result = SwarmRunner::run(&problem, &config).unwrap();

        let best = result.best.unwrap();
        assert!(best.candidate.is_empty());
        assert_eq!(best.fitness, 0.0);
        assert_eq!(result.iterations, 10);
    }

    #[test]
    fn test_empty_population_is_unsolved() {
        let problem = primary();
        let config = SwarmConfig::default().with_population_size(0).with_seed(1);
        let result = SwarmRunner::run(&problem, &config).unwrap();
        assert!(!result.is_solved());
        assert!(!result.cancelled);
        assert_eq!(result.iterations, 0);
        assert!(result.fitness_history.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let problem = primary();
        let config = SwarmConfig::default().with_max_iterations(0);
        let err = SwarmRunner::run(&problem, &config).unwrap_err();
        assert!(matches!(err, SwarmError::Config(_)));
    }

    /// Predator mover over 100 resources that always takes the peer jump.
    fn jumping_predator(mode: UpdateMode, brownian_step: f64) -> Mover {
        let strategy = MovementStrategy::Predator {
            brownian_step,
            levy_beta: 1.5,
            eddy_threshold: 0.0,
        };
        Mover::new(strategy, mode, Bounds::new(100), PhaseScheduler::new(100))
    }

    #[test]
    fn test_sequential_peers_see_earlier_moves() {
        // Zero Brownian step at t = 0 leaves positions as they are, so only
        // the eddy jump moves. Candidate 0 at 20, candidate 1 at 60.
        // From a snapshot, candidate 1 either stays (self) or jumps past 20
        // toward 0. Sequentially, candidate 0 may already sit above 60, and
        // a jump relative to it lands above 60 too.
        let mut rng = StdRng::seed_from_u64(21);
        let mut above = 0;
        for _ in 0..200 {
            for mode in [UpdateMode::Sequential, UpdateMode::Synchronous] {
                let mut pop = Population::random(2, 1, 100, &mut rng);
                *pop.candidate_mut(0) = vec![20];
                *pop.candidate_mut(1) = vec![60];
                jumping_predator(mode, 0.0).step(0, &mut pop, &[0], &mut rng);

                let second = pop.candidate(1)[0];
                match mode {
                    UpdateMode::Synchronous => {
                        assert!(second <= 20 || second == 60, "snapshot gave {second}")
                    }
                    _ => above += usize::from(second > 60),
                }
            }
        }
        assert!(above > 0);
    }

    #[test]
    fn test_in_place_self_peer_sees_moved_value() {
        // A lone candidate can only pick itself. A huge Brownian step pins
        // the kernel move to a boundary. In place, jumping relative to that
        // moved value is a no-op. Sequentially, the jump is relative to the
        // old position 50 and lands in between.
        let mut rng = StdRng::seed_from_u64(33);
        let mut inside = 0;
        for _ in 0..100 {
            for mode in [UpdateMode::InPlace, UpdateMode::Sequential] {
                let mut pop = Population::random(1, 1, 100, &mut rng);
                *pop.candidate_mut(0) = vec![50];
                jumping_predator(mode, 1e12).step(0, &mut pop, &[0], &mut rng);

                let pos = pop.candidate(0)[0];
                if mode == UpdateMode::InPlace {
                    assert!(pos == 0 || pos == 99, "in place gave {pos}");
                } else {
                    inside += usize::from(pos > 0 && pos < 99);
                }
            }
        }
        assert!(inside > 0);
    }

    #[test]
    fn test_single_resource() {
        let problem = Deployment::secondary().problem().unwrap();
        let single = AllocationProblem::from_raw(&[600], &problem.speeds()[..1]).unwrap();
        let config = SwarmConfig::immpa().with_max_iterations(30).with_seed(2);
        let result = SwarmRunner::run(&single, &config).unwrap();
        assert_eq!(result.best.unwrap().candidate, vec![0]);
    }

    #[test]
    fn test_scheduled_reinit_counter() {
        let problem = primary();
        let config = SwarmConfig::default()
            .with_max_iterations(801)
            .with_stagnation(StagnationPolicy::disabled().with_reinit_interval(Some(800)))
            .with_seed(4);
        let result = SwarmRunner::run(&problem, &config).unwrap();
        // Iterations 0 and 800, first half of 10 each time.
        assert_eq!(result.reinitialized, 10);
        assert_eq!(result.stagnation_responses, 0);
    }

    #[test]
    fn test_streak_responses_counted() {
        let problem = primary();
        let rule = StreakRule {
            failure_threshold: 2,
            ..StreakRule::default()
        };
        let config = SwarmConfig::sca()
            .with_max_iterations(300)
            .with_stagnation(StagnationPolicy::disabled().with_streak(Some(rule)))
            .with_seed(8);
        let result = SwarmRunner::run(&problem, &config).unwrap();
        assert!(result.stagnation_responses > 0);
        assert_eq!(result.reinitialized, 0);
    }

    #[test]
    fn test_secondary_deployment_prefers_fast_resource() {
        let problem = Deployment::secondary().problem().unwrap();
        let config = SwarmConfig::immpa().with_max_iterations(300).with_seed(12);
        let result = SwarmRunner::run(&problem, &config).unwrap();
        let fast = problem.evaluator(config.energy.clone()).fitness(&[11]);
        assert!(result.best.unwrap().fitness <= fast + 1e-12);
    }
}
