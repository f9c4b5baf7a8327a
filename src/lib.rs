//! Labor-value prices from sparse input-output tables.
//!
//! This crate implements the iterative price computation described by
//! Cockshott and Cottrell in *Towards a New Socialism* (1993, ch. 3): the
//! price of a product is its direct labor per unit plus the per-unit cost of
//! its material inputs, priced at the previous iteration. Starting from
//! labor-only prices, passes are repeated for a fixed count or until prices
//! stabilize to a requested number of decimal digits.
//!
//! The crate offers tools to
//!
//! - hold and load the sparse input-output table (`table`, `io` modules),
//! - derive the labor-only starting prices (`baseline` module),
//! - run a single pass sequentially or on a worker pool (`accumulation`,
//!   `parallel` modules),
//! - decide when to stop (`convergence`, `solving` modules), and
//! - drive the whole iteration (`driver` module).
//!
//! # Quick start
//!
//! ```
//! use labor_value::{solve_prices, HaltingPolicy, SolverOptions, SparseIoTable, Strategy};
//!
//! // Product 100 needs one unit of product 200 for every two units it makes.
//! let table = SparseIoTable::builder()
//!     .labor(100, 10.0)
//!     .output(100, 2.0)
//!     .input(100, 200, 1.0)
//!     .labor(200, 4.0)
//!     .output(200, 1.0)
//!     .build();
//!
//! let options = SolverOptions::default()
//!     .with_halting(HaltingPolicy::FixedCount(1))
//!     .with_strategy(Strategy::Sequential);
//!
//! let (prices, summary) = solve_prices(&table, &options).expect("well-formed table");
//! assert_eq!(prices.get(100), Some(7.0));
//! assert_eq!(prices.get(200), Some(4.0));
//! assert_eq!(summary.iterations, 1);
//! ```

pub mod accumulation;
pub mod baseline;
pub mod convergence;
pub mod driver;
pub mod error;
pub mod generator;
pub mod io;
pub mod parallel;
pub mod prices;
pub mod solving;
pub mod table;

pub use accumulation::{AccumulationPass, SequentialAccumulator};
pub use baseline::labor_baseline;
pub use convergence::{converged, ConvergenceCheck, PRECISION_MAX};
pub use driver::{accumulator_for, solve_prices, IterationDriver};
pub use error::{LaborValueError, Result};
pub use parallel::ParallelAccumulator;
pub use prices::PriceVector;
pub use solving::{HaltingPolicy, SolveSummary, SolverOptions, Strategy};
pub use table::{ProductKey, SparseIoTable, TableKey};
