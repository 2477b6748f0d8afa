//! Per-dimension movement rules.
//!
//! Each rule takes the current resource index of one task in one
//! candidate and returns a new index. Real-valued moves are truncated
//! toward zero and then clamped into `[0, resources - 1]`, so every rule
//! preserves the bounds invariant.
//!
//! # References
//!
//! - Mantegna (1994), "Fast, accurate algorithm for numerical simulation
//!   of Lévy stable stochastic processes"
//! - Faramarzi et al. (2020), "Marine Predators Algorithm"
//! - Kennedy & Eberhart (1995), "Particle Swarm Optimization"
//! - Mirjalili (2016), "SCA: A Sine Cosine Algorithm"
//! - Mirjalili & Lewis (2016), "The Whale Optimization Algorithm"

use rand::Rng;
use rand_distr::StandardNormal;
use std::f64::consts::PI;

use crate::error::ConfigError;

/// Movement strategy driving the population update.
///
/// One variant per family of update rules. The loop in
/// [`SwarmRunner`](super::SwarmRunner) is the same for all of them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementStrategy {
    /// Phase-scheduled Brownian/Lévy moves followed by eddy formation.
    Predator {
        /// Scale of the Brownian step (`0.1`).
        brownian_step: f64,
        /// Lévy stability index β (`1.5`).
        levy_beta: f64,
        /// Probability of the small eddy perturbation (`0.2`).
        eddy_threshold: f64,
    },
    /// Velocity update toward personal and global best.
    Swarm {
        inertia: f64,
        cognitive: f64,
        social: f64,
    },
    /// Sine/cosine oscillation around the best, amplitude decaying to 0.
    SineCosine { amplitude: f64 },
    /// Encircling of the best or a random peer, or a logarithmic spiral
    /// toward the best.
    Encircle { spiral_shape: f64 },
}

impl Default for MovementStrategy {
    fn default() -> Self {
        Self::predator()
    }
}

impl MovementStrategy {
    pub fn predator() -> Self {
        Self::Predator {
            brownian_step: 0.1,
            levy_beta: 1.5,
            eddy_threshold: 0.2,
        }
    }

    pub fn swarm() -> Self {
        Self::Swarm {
            inertia: 0.5,
            cognitive: 1.0,
            social: 2.0,
        }
    }

    pub fn sine_cosine() -> Self {
        Self::SineCosine { amplitude: 2.0 }
    }

    pub fn encircle() -> Self {
        Self::Encircle { spiral_shape: 1.0 }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Predator { .. } => "predator",
            Self::Swarm { .. } => "swarm",
            Self::SineCosine { .. } => "sine_cosine",
            Self::Encircle { .. } => "encircle",
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Predator {
                brownian_step,
                levy_beta,
                eddy_threshold,
            } => {
                positive("brownian_step", brownian_step)?;
                if !(levy_beta > 0.0 && levy_beta <= 2.0) {
                    return Err(ConfigError::LevyIndex(levy_beta));
                }
                unit("eddy_threshold", eddy_threshold)
            }
            Self::Swarm {
                inertia,
                cognitive,
                social,
            } => {
                positive("inertia", inertia)?;
                positive("cognitive", cognitive)?;
                positive("social", social)
            }
            Self::SineCosine { amplitude } => positive("amplitude", amplitude),
            Self::Encircle { spiral_shape } => positive("spiral_shape", spiral_shape),
        }
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn unit(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { name, value })
    }
}

/// Valid resource index range `[0, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    upper: usize,
}

impl Bounds {
    /// Bounds for `resources` resources. `resources` must be non-zero.
    pub fn new(resources: usize) -> Self {
        debug_assert!(resources > 0);
        Self {
            upper: resources.saturating_sub(1),
        }
    }

    pub fn upper(&self) -> usize {
        self.upper
    }

    /// Truncates toward zero, then clamps. NaN maps to 0.
    #[inline]
    pub fn clamp(&self, value: f64) -> usize {
        let value = value.trunc();
        if value.is_nan() || value <= 0.0 {
            0
        } else if value >= self.upper as f64 {
            self.upper
        } else {
            value as usize
        }
    }

    #[inline]
    pub fn clamp_int(&self, value: i64) -> usize {
        if value <= 0 {
            0
        } else {
            (value as u64).min(self.upper as u64) as usize
        }
    }
}

#[inline]
pub(crate) fn gaussian<R: Rng>(rng: &mut R) -> f64 {
    rng.sample(StandardNormal)
}

/// `pos + step * N(0, 1)`.
pub fn brownian<R: Rng>(pos: usize, step: f64, bounds: Bounds, rng: &mut R) -> usize {
    bounds.clamp(pos as f64 + step * gaussian(rng))
}

/// Lévy-stable step generator (Mantegna's algorithm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevyFlight {
    beta: f64,
    sigma: f64,
}

impl LevyFlight {
    pub fn new(beta: f64) -> Self {
        let numerator = libm::tgamma(1.0 + beta) * (PI * beta / 2.0).sin();
        let denominator = libm::tgamma((1.0 + beta) / 2.0) * beta * 2f64.powf((beta - 1.0) / 2.0);
        Self {
            beta,
            sigma: (numerator / denominator).powf(1.0 / beta),
        }
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// One heavy-tailed step. A zero denominator draw yields an infinite
    /// step, which clamps to a boundary.
    pub fn step<R: Rng>(&self, rng: &mut R) -> f64 {
        let u = gaussian(rng) * self.sigma;
        let v: f64 = gaussian(rng);
        u / v.abs().powf(1.0 / self.beta)
    }

    pub fn apply<R: Rng>(&self, pos: usize, bounds: Bounds, rng: &mut R) -> usize {
        bounds.clamp(pos as f64 + self.step(rng))
    }
}

/// Eddy-formation perturbation.
///
/// With probability `threshold` the position is nudged upward by
/// `cf * r * upper`; otherwise it jumps relative to a random peer:
/// `peer + trunc((threshold * (1 - r) + r) * (peer - pos))`.
///
/// `peer_at(k)` returns the value of peer `k` in the current dimension,
/// for `k` in `0..peers`.
pub fn eddy_formation<R, F>(
    pos: usize,
    cf: f64,
    threshold: f64,
    peers: usize,
    peer_at: F,
    bounds: Bounds,
    rng: &mut R,
) -> usize
where
    R: Rng,
    F: Fn(usize) -> usize,
{
    let r: f64 = rng.random_range(0.0..1.0);
    if r < threshold || peers == 0 {
        let scale: f64 = rng.random_range(0.0..1.0);
        bounds.clamp(pos as f64 + cf * (scale * bounds.upper() as f64))
    } else {
        let peer = peer_at(rng.random_range(0..peers)) as i64;
        let jump = ((threshold * (1.0 - r) + r) * (peer - pos as i64) as f64).trunc() as i64;
        bounds.clamp_int(peer + jump)
    }
}

/// Velocity coefficients of the swarm update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityCoefficients {
    pub inertia: f64,
    pub cognitive: f64,
    pub social: f64,
}

/// Integer velocity update; returns the new position and velocity.
pub fn velocity_update<R: Rng>(
    pos: usize,
    velocity: i64,
    personal_best: usize,
    global_best: usize,
    coeffs: VelocityCoefficients,
    bounds: Bounds,
    rng: &mut R,
) -> (usize, i64) {
    let r1: f64 = rng.random_range(0.0..1.0);
    let r2: f64 = rng.random_range(0.0..1.0);
    let p = pos as f64;
    let v = coeffs.inertia * velocity as f64
        + coeffs.cognitive * r1 * (personal_best as f64 - p)
        + coeffs.social * r2 * (global_best as f64 - p);
    let v = v.trunc() as i64;
    (bounds.clamp_int(pos as i64 + v), v)
}

/// Sine/cosine oscillation with amplitude `r1`.
pub fn sine_cosine<R: Rng>(pos: usize, best: usize, r1: f64, bounds: Bounds, rng: &mut R) -> usize {
    let r2 = rng.random_range(0.0..(2.0 * PI));
    let r3 = rng.random_range(0.0..2.0);
    let r4: f64 = rng.random_range(0.0..1.0);
    let wave = if r4 < 0.5 { r2.sin() } else { r2.cos() };
    let delta = (r1 * wave * (r3 * best as f64 - pos as f64).abs()).trunc() as i64;
    bounds.clamp_int(pos as i64 + delta)
}

/// Per-candidate coefficients of the encircle/spiral update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncircleCoefficients {
    /// `A = 2a * r1 - a`.
    pub a: f64,
    /// `C = 2 * r2`.
    pub c: f64,
    /// Spiral parameter `l = (a2 - 1) * r + 1`.
    pub l: f64,
}

impl EncircleCoefficients {
    /// Draws coefficients for the decayed control values `a` (2 → 0) and
    /// `a2` (-1 → -2).
    pub fn draw<R: Rng>(a: f64, a2: f64, rng: &mut R) -> Self {
        let r1: f64 = rng.random_range(0.0..1.0);
        let r2: f64 = rng.random_range(0.0..1.0);
        let r3: f64 = rng.random_range(0.0..1.0);
        Self {
            a: 2.0 * a * r1 - a,
            c: 2.0 * r2,
            l: (a2 - 1.0) * r3 + 1.0,
        }
    }
}

/// Encircle/spiral update of one dimension.
///
/// With probability 0.5 the position encircles a reference: a random
/// peer when `|A| < 1`, the best otherwise. Else it follows a
/// logarithmic spiral of shape `b` toward the best.
#[allow(clippy::too_many_arguments)]
pub fn encircle<R, F>(
    pos: usize,
    best: usize,
    coeffs: EncircleCoefficients,
    spiral_shape: f64,
    peers: usize,
    peer_at: F,
    bounds: Bounds,
    rng: &mut R,
) -> usize
where
    R: Rng,
    F: Fn(usize) -> usize,
{
    let p = pos as f64;
    if rng.random_bool(0.5) {
        let reference = if coeffs.a.abs() < 1.0 && peers > 0 {
            peer_at(rng.random_range(0..peers))
        } else {
            best
        } as f64;
        let delta = (coeffs.a * (coeffs.c * reference - p).abs()).trunc() as i64;
        bounds.clamp_int(reference as i64 - delta)
    } else {
        let b = best as f64;
        let distance = (b - p).abs();
        bounds.clamp(distance * (spiral_shape * coeffs.l).exp() * (2.0 * PI * coeffs.l).cos() + b)
    }
}

// ============================================================================
// Tests
// ============================================================================
