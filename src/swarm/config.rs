//! Swarm search configuration.
//!
//! [`SwarmConfig`] holds every parameter of the search loop. The six
//! optimizer variants are presets over the same loop; see [`Variant`].

use super::movement::MovementStrategy;
use super::stagnation::StagnationPolicy;
use crate::error::ConfigError;
use crate::fitness::EnergyModel;

/// How the predator strategy writes new positions back.
///
/// The modes differ only in which positions eddy formation sees when it
/// picks a random peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateMode {
    /// Candidates are moved one after another directly in the population.
    /// Earlier candidates are seen at their new positions, and a candidate
    /// that picks itself sees its own freshly moved value.
    InPlace,
    /// Candidates are moved one after another on a copy that replaces the
    /// original once complete. Earlier candidates are seen at their new
    /// positions, the moving candidate at its old one.
    #[default]
    Sequential,
    /// New positions are computed from a snapshot of the whole population
    /// and swapped in together.
    Synchronous,
}

/// Named optimizer variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Variant {
    /// Marine predators: phased Brownian/Lévy moves with eddy formation.
    Mpa,
    /// Marine predators with snapshot (synchronous) updates.
    Mmpa,
    /// Improved marine predators: sequential updates, failure streaks,
    /// scheduled reinitialization and a pull toward the best.
    Immpa,
    /// Particle swarm.
    Pso,
    /// Sine cosine algorithm.
    Sca,
    /// Whale optimization (encircle/spiral).
    Woa,
}

impl Variant {
    pub const ALL: [Variant; 6] = [
        Variant::Mpa,
        Variant::Mmpa,
        Variant::Immpa,
        Variant::Pso,
        Variant::Sca,
        Variant::Woa,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Mpa => "mpa",
            Variant::Mmpa => "mmpa",
            Variant::Immpa => "immpa",
            Variant::Pso => "pso",
            Variant::Sca => "sca",
            Variant::Woa => "woa",
        }
    }

    /// Preset configuration for this variant.
    pub fn config(&self) -> SwarmConfig {
        match self {
            Variant::Mpa => SwarmConfig::mpa(),
            Variant::Mmpa => SwarmConfig::mmpa(),
            Variant::Immpa => SwarmConfig::immpa(),
            Variant::Pso => SwarmConfig::pso(),
            Variant::Sca => SwarmConfig::sca(),
            Variant::Woa => SwarmConfig::woa(),
        }
    }
}

/// Configuration for the swarm search.
///
/// # Defaults
///
/// ```
/// use u_swarmsched::swarm::SwarmConfig;
///
/// let config = SwarmConfig::default();
/// assert_eq!(config.population_size, 10);
/// assert_eq!(config.max_iterations, 1500);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_swarmsched::swarm::{MovementStrategy, StagnationPolicy, SwarmConfig};
///
/// let config = SwarmConfig::default()
///     .with_population_size(20)
///     .with_max_iterations(300)
///     .with_strategy(MovementStrategy::sine_cosine())
///     .with_stagnation(StagnationPolicy::disabled())
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwarmConfig {
    /// Number of candidates tracked per run. Zero is accepted and yields a
    /// run with no solution.
    pub population_size: usize,

    /// Total iteration budget. Every run performs exactly this many
    /// iterations unless cancelled.
    pub max_iterations: usize,

    /// Movement strategy.
    pub strategy: MovementStrategy,

    /// Write-back mode of the predator strategy. Ignored by the others.
    pub update_mode: UpdateMode,

    /// Stagnation handling.
    pub stagnation: StagnationPolicy,

    /// Energy, emission and fitness weighting.
    pub energy: EnergyModel,

    /// Whether to evaluate candidates in parallel using rayon.
    ///
    /// Only effective with the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            max_iterations: 1500,
            strategy: MovementStrategy::default(),
            update_mode: UpdateMode::default(),
            stagnation: StagnationPolicy::default(),
            energy: EnergyModel::default(),
            parallel: false,
            seed: None,
        }
    }
}

impl SwarmConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_strategy(mut self, strategy: MovementStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_update_mode(mut self, mode: UpdateMode) -> Self {
        self.update_mode = mode;
        self
    }

    pub fn with_stagnation(mut self, policy: StagnationPolicy) -> Self {
        self.stagnation = policy;
        self
    }

    pub fn with_energy(mut self, energy: EnergyModel) -> Self {
        self.energy = energy;
        self
    }

    /// Sets the energy weight `α` of the fitness.
    pub fn with_energy_weight(mut self, weight: f64) -> Self {
        self.energy.energy_weight = weight;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Marine predators preset: in-place updates, no stagnation handling.
    pub fn mpa() -> Self {
        Self {
            strategy: MovementStrategy::predator(),
            update_mode: UpdateMode::InPlace,
            stagnation: StagnationPolicy::disabled(),
            ..Self::default()
        }
    }

    /// Marine predators with snapshot updates.
    pub fn mmpa() -> Self {
        Self {
            strategy: MovementStrategy::predator(),
            update_mode: UpdateMode::Synchronous,
            stagnation: StagnationPolicy::disabled(),
            ..Self::default()
        }
    }

    /// Improved marine predators: streaks above 60 re-randomize, the first
    /// half is re-randomized every 800 iterations, and every candidate is
    /// pulled halfway toward the best after each move. Candidates are
    /// moved sequentially.
    pub fn immpa() -> Self {
        Self {
            strategy: MovementStrategy::predator(),
            update_mode: UpdateMode::Sequential,
            stagnation: StagnationPolicy::default().with_best_pull_probability(1.0),
            ..Self::default()
        }
    }

    /// Particle swarm preset (`w = 0.5`, `c1 = 1`, `c2 = 2`).
    pub fn pso() -> Self {
        Self {
            strategy: MovementStrategy::swarm(),
            stagnation: StagnationPolicy::disabled(),
            ..Self::default()
        }
    }

    /// Sine cosine preset (`a = 2`).
    pub fn sca() -> Self {
        Self {
            strategy: MovementStrategy::sine_cosine(),
            stagnation: StagnationPolicy::disabled(),
            ..Self::default()
        }
    }

    /// Whale optimization preset (`b = 1`).
    pub fn woa() -> Self {
        Self {
            strategy: MovementStrategy::encircle(),
            stagnation: StagnationPolicy::disabled(),
            ..Self::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        self.strategy.validate()?;
        self.stagnation.validate()?;
        self.energy.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swarm::StreakBasis;

    #[test]
    fn test_default_config() {
        let config = SwarmConfig::default();
        assert_eq!(config.population_size, 10);
        assert_eq!(config.max_iterations, 1500);
        assert_eq!(config.strategy, MovementStrategy::predator());
        assert_eq!(config.update_mode, UpdateMode::Sequential);
        assert!((config.energy.energy_weight - 0.8).abs() < 1e-12);
        assert_eq!(config.stagnation.reinit_interval, Some(800));

        let rule = config.stagnation.streak.unwrap();
        assert_eq!(rule.failure_threshold, 60);
        assert!((rule.reinit_probability - 1.0).abs() < 1e-12);
        assert_eq!(rule.basis, StreakBasis::GlobalBest);

        assert!(!config.parallel);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SwarmConfig::default()
            .with_population_size(30)
            .with_max_iterations(200)
            .with_strategy(MovementStrategy::swarm())
            .with_update_mode(UpdateMode::Synchronous)
            .with_energy_weight(0.5)
            .with_parallel(true)
            .with_seed(42);

        assert_eq!(config.population_size, 30);
        assert_eq!(config.max_iterations, 200);
        assert_eq!(config.strategy, MovementStrategy::swarm());
        assert_eq!(config.update_mode, UpdateMode::Synchronous);
        assert!((config.energy.energy_weight - 0.5).abs() < 1e-12);
        assert!(config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate_ok() {
        assert!(SwarmConfig::default().validate().is_ok());
        for variant in Variant::ALL {
            assert!(variant.config().validate().is_ok(), "{}", variant.name());
        }
    }

    #[test]
    fn test_validate_errors() {
        assert!(SwarmConfig::default().with_population_size(0).validate().is_ok());
        assert_eq!(
            SwarmConfig::default().with_max_iterations(0).validate(),
            Err(ConfigError::ZeroIterations)
        );
        assert!(SwarmConfig::default().with_energy_weight(-0.1).validate().is_err());
        assert!(SwarmConfig::default()
            .with_strategy(MovementStrategy::Encircle { spiral_shape: 0.0 })
            .validate()
            .is_err());
    }

    #[test]
    fn test_presets() {
        assert_eq!(SwarmConfig::mpa().update_mode, UpdateMode::InPlace);
        assert_eq!(SwarmConfig::mpa().stagnation, StagnationPolicy::disabled());
        assert_eq!(SwarmConfig::mmpa().update_mode, UpdateMode::Synchronous);

        let immpa = SwarmConfig::immpa();
        assert_eq!(immpa.update_mode, UpdateMode::Sequential);
        assert!(immpa.stagnation.streak.is_some());
        assert_eq!(immpa.stagnation.reinit_interval, Some(800));
        assert!((immpa.stagnation.best_pull_probability - 1.0).abs() < 1e-12);

        assert_eq!(SwarmConfig::pso().strategy, MovementStrategy::swarm());
        assert_eq!(SwarmConfig::sca().strategy, MovementStrategy::sine_cosine());
        assert_eq!(SwarmConfig::woa().strategy, MovementStrategy::encircle());
    }

    #[test]
    fn test_variant_names_unique() {
        let mut names: Vec<_> = Variant::ALL.iter().map(Variant::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn test_presets_chainable() {
        let config = SwarmConfig::woa().with_max_iterations(50).with_seed(1);
        assert_eq!(config.strategy, MovementStrategy::encircle());
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.seed, Some(1));
    }
}
