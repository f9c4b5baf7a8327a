//! Repeated accumulation passes under a halting policy.

use log::{debug, info};

use crate::accumulation::{AccumulationPass, SequentialAccumulator};
use crate::baseline::labor_baseline;
use crate::convergence::{clamp_precision, max_gap, ConvergenceCheck};
use crate::error::{LaborValueError, Result};
use crate::parallel::ParallelAccumulator;
use crate::prices::PriceVector;
use crate::solving::{HaltingPolicy, SolveSummary, SolverOptions, Strategy};
use crate::table::SparseIoTable;

/// Drives the Cockshott–Cottrell price iteration over one table.
///
/// The labor-only baseline is derived once at construction and reused as the
/// starting point of every pass. At most two snapshots are alive while
/// iterating: the read-only previous vector and the one being accumulated.
#[derive(Debug)]
pub struct IterationDriver<'t, A> {
    table: &'t SparseIoTable,
    baseline: PriceVector,
    accumulator: A,
}

impl<'t, A: AccumulationPass> IterationDriver<'t, A> {
    /// Validates the table and computes the labor-only baseline.
    pub fn new(table: &'t SparseIoTable, accumulator: A) -> Result<Self> {
        info!(
            "initializing: {} products, {} table facts",
            table.product_count(),
            table.len()
        );
        let baseline = labor_baseline(table)?;
        Ok(Self {
            table,
            baseline,
            accumulator,
        })
    }

    /// Labor-only prices the iteration starts from.
    pub fn baseline(&self) -> &PriceVector {
        &self.baseline
    }

    fn pass(&self, previous: &PriceVector) -> Result<PriceVector> {
        let current = self
            .accumulator
            .accumulate(self.table, previous, &self.baseline)?;
        if !current.is_finite() {
            return Err(LaborValueError::NumericalError {
                context: "price accumulation",
            });
        }
        Ok(current)
    }

    /// Runs exactly `iterations` passes; zero passes returns the baseline.
    pub fn run_fixed(&self, iterations: usize) -> Result<(PriceVector, SolveSummary)> {
        info!(
            "iterating: {} passes with the {} accumulator",
            iterations,
            self.accumulator.name()
        );
        let mut previous = self.baseline.clone();
        let mut gap = 0.0f64;

        for iteration in 1..=iterations {
            let current = self.pass(&previous)?;
            gap = max_gap(&previous, &current)?;
            debug!("iteration {iteration} of {iterations} complete; max gap {gap}");
            previous = current;
        }

        info!("completed after {iterations} iterations");
        Ok((
            previous,
            SolveSummary {
                iterations,
                max_gap: gap,
            },
        ))
    }

    /// Runs passes until no price moves by more than `10^-precision`.
    ///
    /// A table without products returns the empty baseline immediately since
    /// there is nothing to converge. Fails with
    /// [`NonConvergent`](LaborValueError::NonConvergent) once `max_iterations`
    /// passes have run without converging.
    pub fn run_until_converged(
        &self,
        precision: u32,
        max_iterations: usize,
    ) -> Result<(PriceVector, SolveSummary)> {
        let check = ConvergenceCheck::new(clamp_precision(precision));
        if self.baseline.is_empty() {
            info!("completed: table has no products to price");
            return Ok((
                self.baseline.clone(),
                SolveSummary {
                    iterations: 0,
                    max_gap: 0.0,
                },
            ));
        }

        info!(
            "iterating: until precision {} (tolerance {:e}) with the {} accumulator",
            check.precision(),
            check.tolerance(),
            self.accumulator.name()
        );
        let mut previous = self.baseline.clone();
        let mut iteration = 0usize;
        let mut gap = f64::INFINITY;

        while iteration < max_iterations {
            let current = self.pass(&previous)?;
            iteration += 1;

            let outcome = check.check(&previous, &current)?;
            gap = outcome.max_gap;
            debug!("iteration {iteration} complete; max gap {gap}");

            if outcome.converged {
                info!("completed after {iteration} iterations");
                return Ok((
                    current,
                    SolveSummary {
                        iterations: iteration,
                        max_gap: gap,
                    },
                ));
            }
            previous = current;
        }

        Err(LaborValueError::NonConvergent {
            iterations: iteration,
            max_gap: gap,
        })
    }

    /// Runs under `halting`; `max_iterations` only bounds the precision policy.
    pub fn run(
        &self,
        halting: HaltingPolicy,
        max_iterations: usize,
    ) -> Result<(PriceVector, SolveSummary)> {
        match halting {
            HaltingPolicy::FixedCount(iterations) => self.run_fixed(iterations),
            HaltingPolicy::Precision(precision) => {
                self.run_until_converged(precision, max_iterations)
            }
        }
    }
}

/// Builds the pass strategy selected by `strategy`.
pub fn accumulator_for(strategy: Strategy) -> Result<Box<dyn AccumulationPass>> {
    Ok(match strategy {
        Strategy::Sequential => Box::new(SequentialAccumulator),
        Strategy::Parallel { threads } => Box::new(ParallelAccumulator::new(threads)?),
    })
}

/// Computes labor-value prices for `table` as configured by `options`.
pub fn solve_prices(
    table: &SparseIoTable,
    options: &SolverOptions,
) -> Result<(PriceVector, SolveSummary)> {
    let accumulator = accumulator_for(options.strategy)?;
    IterationDriver::new(table, accumulator)?.run(options.halting, options.max_iterations)
}
