//! Energy, emission and fitness-weighting coefficients.

use crate::error::ConfigError;

/// Default emission factors per energy source: oil, coal, natural gas,
/// non-fossil.
pub const EMISSION_FACTORS: [f64; 4] = [0.5825, 0.7476, 0.4435, 0.0];

/// Mass ratio of CO2 to carbon.
pub const CARBON_TO_CO2_RATIO: f64 = 44.0 / 12.0;

/// CO2 model: energy is split across sources by `shares`, each source
/// emitting `factors[k]` units of carbon per unit of energy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmissionModel {
    pub factors: Vec<f64>,
    pub shares: Vec<f64>,
    pub carbon_to_co2: f64,
}

impl Default for EmissionModel {
    fn default() -> Self {
        Self {
            factors: EMISSION_FACTORS.to_vec(),
            shares: vec![0.25; EMISSION_FACTORS.len()],
            carbon_to_co2: CARBON_TO_CO2_RATIO,
        }
    }
}

impl EmissionModel {
    /// CO2 emitted for `total_energy`.
    pub fn co2(&self, total_energy: f64) -> f64 {
        self.factors
            .iter()
            .zip(&self.shares)
            .map(|(factor, share)| total_energy * share * factor * self.carbon_to_co2)
            .sum()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.factors.len() != self.shares.len() {
            return Err(ConfigError::EmissionShape {
                factors: self.factors.len(),
                shares: self.shares.len(),
            });
        }
        Ok(())
    }
}

/// Power and fitness model.
///
/// A resource of speed `s` draws `power_coefficient * s^2` while busy;
/// idle time up to the makespan is charged at the same rate, and the sum
/// is scaled by `active_fraction`. Fitness is
/// `energy_weight * energy + (1 - energy_weight) * makespan`.
///
/// # Examples
///
/// ```
/// use u_swarmsched::fitness::EnergyModel;
///
/// let model = EnergyModel::default();
/// assert!((model.fitness(10.0, 5.0) - 9.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyModel {
    /// `K` in `K * s^2`.
    pub power_coefficient: f64,
    /// Fraction of the drawn power attributed to the active state.
    pub active_fraction: f64,
    /// Weight `α` of energy in the scalar fitness, in `[0, 1]`.
    pub energy_weight: f64,
    pub emission: EmissionModel,
}

impl Default for EnergyModel {
    fn default() -> Self {
        Self {
            power_coefficient: 1e-8,
            active_fraction: 0.6,
            energy_weight: 0.8,
            emission: EmissionModel::default(),
        }
    }
}

impl EnergyModel {
    pub fn with_energy_weight(mut self, weight: f64) -> Self {
        self.energy_weight = weight;
        self
    }

    pub fn with_emission(mut self, emission: EmissionModel) -> Self {
        self.emission = emission;
        self
    }

    /// Energy of one task that runs for `execution_time` on a resource of
    /// `speed`, within a schedule of length `makespan`.
    #[inline]
    pub fn task_energy(&self, speed: f64, execution_time: f64, makespan: f64) -> f64 {
        let power = self.power_coefficient * speed * speed;
        let active = execution_time * power;
        let idle = (makespan - execution_time) * power;
        (active + idle) * self.active_fraction
    }

    /// Scalarized fitness. Lower is better.
    #[inline]
    pub fn fitness(&self, energy: f64, makespan: f64) -> f64 {
        self.energy_weight * energy + (1.0 - self.energy_weight) * makespan
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.energy_weight) {
            return Err(ConfigError::OutOfUnitRange {
                name: "energy_weight",
                value: self.energy_weight,
            });
        }
        if !(0.0..=1.0).contains(&self.active_fraction) {
            return Err(ConfigError::OutOfUnitRange {
                name: "active_fraction",
                value: self.active_fraction,
            });
        }
        if self.power_coefficient.is_nan() || self.power_coefficient <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "power_coefficient",
                value: self.power_coefficient,
            });
        }
        self.emission.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fitness_composition() {
        let model = EnergyModel::default();
        assert!((model.fitness(10.0, 5.0) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_task_energy_without_idle() {
        let model = EnergyModel::default();
        let energy = model.task_energy(100.0, 2.0, 2.0);
        assert!((energy - 1.2e-4).abs() < 1e-15, "got {energy}");
    }

    #[test]
    fn test_task_energy_charges_idle_time() {
        let model = EnergyModel::default();
        // Idle time is billed at the active rate, so only the makespan matters.
        let short = model.task_energy(100.0, 1.0, 4.0);
        let long = model.task_energy(100.0, 3.0, 4.0);
        assert!((short - long).abs() < 1e-15);
        assert!((short - 4.0 * 1e-8 * 1e4 * 0.6).abs() < 1e-15);
    }

    #[test]
    fn test_co2_uniform_shares() {
        let co2 = EmissionModel::default().co2(100.0);
        assert!((co2 - 162.58).abs() < 0.01, "got {co2}");
    }

    #[test]
    fn test_validate() {
        assert!(EnergyModel::default().validate().is_ok());
        assert!(EnergyModel::default().with_energy_weight(1.2).validate().is_err());

        let lopsided = EmissionModel {
            shares: vec![1.0],
            ..EmissionModel::default()
        };
        assert_eq!(
            EnergyModel::default().with_emission(lopsided).validate(),
            Err(ConfigError::EmissionShape {
                factors: 4,
                shares: 1
            })
        );
    }
}
