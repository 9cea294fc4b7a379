//! # Monte Carlo Simulator
//!
//! Sensitivity of the DCF value to revenue growth and discount rate.
//!
//! Each iteration perturbs `rev_growth` and `wacc` by uniform shocks, re-runs
//! the [`DcfEngine`] and records the per-share value. The sorted values yield
//! the 10th, 50th and 90th percentiles by linear interpolation.
//!
//! # Determinism
//!
//! Iteration `i` always consumes samples `2i` (growth) and `2i + 1` (wacc) of
//! the stream seeded by `seed`. The parallel path jumps straight to its slice
//! with [`RngState::advance`], so sequential and parallel runs produce
//! bit-identical values for the same seed.
//!
//! # Examples
//!
//! ```
//! use equity_valuation::domain::entities::{Assumptions, DcfInput};
//! use equity_valuation::domain::services::monte_carlo::MonteCarloSimulator;
//!
//! let input = DcfInput::new(100.0, Assumptions::default(), 10.0);
//! let simulator = MonteCarloSimulator::default();
//!
//! let a = simulator.run(&input, 500, 42).unwrap();
//! let b = simulator.run(&input, 500, 42).unwrap();
//! assert_eq!(a, b);
//! assert!(a.p10 <= a.p50 && a.p50 <= a.p90);
//! ```

use crate::domain::entities::{Assumptions, DcfInput, SimulationQuantiles};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::dcf_engine::DcfEngine;
use crate::domain::value_objects::RngState;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Uniform samples consumed per iteration.
pub const SAMPLES_PER_ITERATION: u64 = 2;

/// Shock amplitudes and execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    /// Maximum absolute shock applied to revenue growth.
    pub rev_growth_amplitude: f64,
    /// Maximum absolute shock applied to the discount rate.
    pub wacc_amplitude: f64,
    /// Minimum gap kept between shocked `wacc` and terminal growth.
    pub min_wacc_spread: f64,
    /// Run iterations on the rayon pool.
    pub parallel: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            rev_growth_amplitude: 0.02,
            wacc_amplitude: 0.01,
            min_wacc_spread: 0.005,
            parallel: false,
        }
    }
}

/// Seeded DCF sensitivity simulator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonteCarloSimulator {
    engine: DcfEngine,
    config: MonteCarloConfig,
}

#[inline]
fn shock(u: f64, amplitude: f64) -> f64 {
    (u - 0.5) * 2.0 * amplitude
}

impl MonteCarloSimulator {
    /// Creates a simulator with the given configuration.
    #[must_use]
    pub fn new(config: MonteCarloConfig) -> Self {
        Self {
            engine: DcfEngine,
            config,
        }
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Runs `iterations` draws and returns the p10/p50/p90 quantiles.
    ///
    /// # Arguments
    ///
    /// * `input` - Unperturbed DCF input.
    /// * `iterations` - Number of draws; must be positive.
    /// * `seed` - Stream seed; equal seeds give equal quantiles.
    ///
    /// # Errors
    ///
    /// - `invalid_simulation_iterations` when `iterations` is zero
    /// - any DCF validation error of the unperturbed input
    /// - `invalid_simulation_value` when a draw is not finite
    pub fn run(
        &self,
        input: &DcfInput,
        iterations: usize,
        seed: u64,
    ) -> DomainResult<SimulationQuantiles> {
        let mut values = if self.config.parallel {
            self.values_parallel(input, iterations, seed)?
        } else {
            self.values_sequential(input, iterations, seed)?
        };
        values.sort_by(f64::total_cmp);
        quantiles(&values).ok_or(DomainError::InvalidSimulationIterations(iterations))
    }

    /// Per-iteration values in iteration order, computed on one thread.
    ///
    /// # Errors
    ///
    /// Same as [`MonteCarloSimulator::run`].
    pub fn values_sequential(
        &self,
        input: &DcfInput,
        iterations: usize,
        seed: u64,
    ) -> DomainResult<Vec<f64>> {
        self.precheck(input, iterations)?;
        let mut state = RngState::from_seed(seed);
        let mut values = Vec::with_capacity(iterations);
        for iteration in 0..iterations {
            let (value, next) = self.iterate(input, state, iteration)?;
            values.push(value);
            state = next;
        }
        Ok(values)
    }

    /// Per-iteration values in iteration order, computed on the rayon pool.
    ///
    /// # Errors
    ///
    /// Same as [`MonteCarloSimulator::run`]. When several draws fail, which
    /// iteration is reported is unspecified.
    pub fn values_parallel(
        &self,
        input: &DcfInput,
        iterations: usize,
        seed: u64,
    ) -> DomainResult<Vec<f64>> {
        self.precheck(input, iterations)?;
        let start = RngState::from_seed(seed);
        (0..iterations)
            .into_par_iter()
            .map(|iteration| {
                let offset = (iteration as u64).wrapping_mul(SAMPLES_PER_ITERATION);
                self.iterate(input, start.advance(offset), iteration)
                    .map(|(value, _)| value)
            })
            .collect()
    }

    fn precheck(&self, input: &DcfInput, iterations: usize) -> DomainResult<()> {
        if iterations == 0 {
            return Err(DomainError::InvalidSimulationIterations(iterations));
        }
        DcfEngine::validate(input)
    }

    fn iterate(
        &self,
        input: &DcfInput,
        state: RngState,
        iteration: usize,
    ) -> DomainResult<(f64, RngState)> {
        let (u_growth, state) = state.next_uniform();
        let (u_wacc, state) = state.next_uniform();

        let base = input.assumptions;
        let floor = base.terminal_growth + self.config.min_wacc_spread;
        let shocked = Assumptions {
            rev_growth: base.rev_growth + shock(u_growth, self.config.rev_growth_amplitude),
            wacc: (base.wacc + shock(u_wacc, self.config.wacc_amplitude)).max(floor),
            ..base
        };

        let value = self
            .engine
            .run(&input.with_assumptions(shocked))
            .map_err(|_| DomainError::InvalidSimulationValue { iteration })?
            .value_per_share;
        if !value.is_finite() {
            return Err(DomainError::InvalidSimulationValue { iteration });
        }
        Ok((value, state))
    }
}

/// Linear-interpolation quantile of ascending `sorted` at `q` in `[0, 1]`.
#[must_use]
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = last as f64 * q.clamp(0.0, 1.0);
    let lower = position.floor();
    let lo = *sorted.get(lower as usize)?;
    let hi = *sorted.get(position.ceil() as usize)?;
    Some(lo + (hi - lo) * (position - lower))
}

/// p10, p50 and p90 of ascending `sorted`.
#[must_use]
pub fn quantiles(sorted: &[f64]) -> Option<SimulationQuantiles> {
    Some(SimulationQuantiles {
        p10: quantile(sorted, 0.10)?,
        p50: quantile(sorted, 0.50)?,
        p90: quantile(sorted, 0.90)?,
    })
}
