//! Solver configuration and diagnostics.

use serde::{Deserialize, Serialize};

use crate::convergence::clamp_precision;
use crate::error::{LaborValueError, Result};

/// When the iteration stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HaltingPolicy {
    /// Run exactly this many passes.
    FixedCount(usize),
    /// Run until no price moves by more than `10^-digits` in one pass.
    Precision(u32),
}

impl HaltingPolicy {
    /// Precision policy with the digit count clamped to the supported maximum.
    pub fn precision(digits: u32) -> Self {
        Self::Precision(clamp_precision(digits))
    }

    /// Resolves the policy from mutually exclusive command-line style flags.
    pub fn from_flags(iterations: Option<usize>, precision: Option<u32>) -> Result<Self> {
        match (iterations, precision) {
            (Some(count), None) => Ok(Self::FixedCount(count)),
            (None, Some(digits)) => Ok(Self::precision(digits)),
            (Some(_), Some(_)) => Err(LaborValueError::AmbiguousHaltingPolicy {
                reason: "both an iteration count and a precision were given",
            }),
            (None, None) => Err(LaborValueError::AmbiguousHaltingPolicy {
                reason: "neither an iteration count nor a precision was given",
            }),
        }
    }
}

/// How each pass is executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Single-threaded walk over the table.
    Sequential,
    /// Product-partitioned pass on a worker pool; `threads = 0` means one per core.
    Parallel { threads: usize },
}

/// Configuration for a full price computation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Stopping rule.
    pub halting: HaltingPolicy,
    /// Pass execution strategy.
    pub strategy: Strategy,
    /// Upper bound on passes under the precision policy.
    pub max_iterations: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            halting: HaltingPolicy::Precision(6),
            strategy: Strategy::Parallel { threads: 0 },
            max_iterations: 100_000,
        }
    }
}

impl SolverOptions {
    /// Override the halting policy while keeping other defaults.
    pub fn with_halting(mut self, halting: HaltingPolicy) -> Self {
        self.halting = halting;
        self
    }

    /// Override the pass strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the iteration cap for the precision policy (at least one pass).
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }
}

/// Diagnostics returned alongside the final prices.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveSummary {
    /// Number of passes performed.
    pub iterations: usize,
    /// Maximum absolute price change observed in the final pass.
    pub max_gap: f64,
}
