//! Stopping rule for the precision halting policy.

use log::warn;

use crate::error::{LaborValueError, Result};
use crate::prices::PriceVector;

/// Largest number of decimal digits a precision request may ask for.
pub const PRECISION_MAX: u32 = 15;

/// Clamps a requested precision to [`PRECISION_MAX`], warning when it had to.
pub fn clamp_precision(requested: u32) -> u32 {
    if requested > PRECISION_MAX {
        warn!("precision {requested} exceeds the maximum of {PRECISION_MAX}; using {PRECISION_MAX}");
        PRECISION_MAX
    } else {
        requested
    }
}

/// Absolute tolerance `10^-precision`.
pub fn tolerance(precision: u32) -> f64 {
    10f64.powi(-(precision as i32))
}

/// Largest absolute per-product change from `previous` to `current`.
///
/// Every product in `current` must be priced in `previous`. An empty `current`
/// has a gap of zero.
pub fn max_gap(previous: &PriceVector, current: &PriceVector) -> Result<f64> {
    if current.is_empty() {
        return Ok(0.0);
    }
    if previous.same_layout(current) {
        let diff = current.values() - previous.values();
        return Ok(diff.amax());
    }

    let mut gap = 0.0f64;
    for (product, price) in current.iter() {
        let before = previous
            .get(product)
            .ok_or_else(|| LaborValueError::key_mismatch(product))?;
        gap = gap.max((price - before).abs());
    }
    Ok(gap)
}

/// Outcome of one convergence check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Convergence {
    pub converged: bool,
    pub max_gap: f64,
}

/// Convergence rule for a fixed precision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConvergenceCheck {
    precision: u32,
    tolerance: f64,
}

impl ConvergenceCheck {
    /// Creates a check for an already clamped `precision`.
    pub fn new(precision: u32) -> Self {
        Self {
            precision,
            tolerance: tolerance(precision),
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Compares two successive snapshots.
    ///
    /// An empty `current` never counts as converged.
    pub fn check(&self, previous: &PriceVector, current: &PriceVector) -> Result<Convergence> {
        let max_gap = max_gap(previous, current)?;
        Ok(Convergence {
            converged: !current.is_empty() && max_gap <= self.tolerance,
            max_gap,
        })
    }
}

/// Whether every price moved by at most `10^-precision` between snapshots.
pub fn converged(previous: &PriceVector, current: &PriceVector, precision: u32) -> Result<bool> {
    ConvergenceCheck::new(precision)
        .check(previous, current)
        .map(|outcome| outcome.converged)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn empty_current_is_never_converged() {
        let empty = PriceVector::empty();
        assert!(!converged(&empty, &empty, 0).unwrap());
    }

    #[test]
    fn gap_within_tolerance_converges() {
        let previous = PriceVector::from_pairs([(1, 1.0), (2, 2.0)]);
        let current = PriceVector::from_pairs([(1, 1.004), (2, 1.999)]);
        assert!(converged(&previous, &current, 2).unwrap());
        assert!(!converged(&previous, &current, 3).unwrap());
    }

    #[test]
    fn gap_is_largest_absolute_change() {
        let previous = PriceVector::from_pairs([(1, 1.0), (2, 2.0)]);
        let current = PriceVector::from_pairs([(1, 0.5), (2, 2.25)]);
        assert_relative_eq!(max_gap(&previous, &current).unwrap(), 0.5);
    }

    #[test]
    fn missing_previous_key_is_a_mismatch() {
        let previous = PriceVector::from_pairs([(1, 1.0)]);
        let current = PriceVector::from_pairs([(1, 1.0), (2, 2.0)]);
        assert!(matches!(
            converged(&previous, &current, 4),
            Err(LaborValueError::KeySetMismatch { product: 2 })
        ));
    }

    #[test]
    fn extra_previous_keys_are_ignored() {
        let previous = PriceVector::from_pairs([(1, 1.0), (2, 9.0)]);
        let current = PriceVector::from_pairs([(1, 1.0)]);
        assert!(converged(&previous, &current, 6).unwrap());
    }

    #[test]
    fn precision_is_clamped() {
        assert_eq!(clamp_precision(3), 3);
        assert_eq!(clamp_precision(40), PRECISION_MAX);
        assert_relative_eq!(tolerance(0), 1.0);
        assert_relative_eq!(ConvergenceCheck::new(3).tolerance(), 1e-3);
    }
}
