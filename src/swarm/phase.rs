//! Iteration schedules.
//!
//! The predator strategy switches between discrete phases by thirds of
//! the budget. The other strategies use continuous linear decays. All
//! schedules are pure functions of `t / max_iterations`.

/// Search phase of the predator strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// First third: every dimension moves by Brownian motion.
    Exploration,
    /// Middle third: first half of the dimensions Brownian, rest Lévy.
    Balance,
    /// Last third: every dimension moves by Lévy flight.
    Exploitation,
}

/// Step kernel applied to one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    Brownian,
    Levy,
}

/// Maps iteration numbers to phases, kernels and decay coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseScheduler {
    max_iterations: usize,
}

impl PhaseScheduler {
    pub fn new(max_iterations: usize) -> Self {
        Self { max_iterations }
    }

    /// Phase at iteration `t`. Thresholds are `max / 3` and `2 * max / 3`
    /// in integer arithmetic.
    pub fn phase(&self, t: usize) -> Phase {
        if t < self.max_iterations / 3 {
            Phase::Exploration
        } else if t < 2 * self.max_iterations / 3 {
            Phase::Balance
        } else {
            Phase::Exploitation
        }
    }

    /// Kernel for dimension `dim` of a `dims`-dimensional candidate.
    pub fn kernel(phase: Phase, dim: usize, dims: usize) -> Kernel {
        match phase {
            Phase::Exploration => Kernel::Brownian,
            Phase::Balance if dim < dims / 2 => Kernel::Brownian,
            Phase::Balance | Phase::Exploitation => Kernel::Levy,
        }
    }

    fn progress(&self, t: usize) -> f64 {
        if self.max_iterations == 0 {
            return 1.0;
        }
        t as f64 / self.max_iterations as f64
    }

    /// Eddy-formation control factor `(1 - t/T) * (2t/T)`: zero at both ends,
    /// peaking at 0.5 mid-run.
    pub fn control_factor(&self, t: usize) -> f64 {
        let p = self.progress(t);
        (1.0 - p) * (2.0 * p)
    }

    /// Linear interpolation from `start` at `t = 0` to `end` at `t = T`.
    pub fn linear_decay(&self, start: f64, end: f64, t: usize) -> f64 {
        start + (end - start) * self.progress(t)
    }
}
