//! Multi-threaded accumulation pass.
//!
//! The sorted product list is split into contiguous ranges, one per worker.
//! Every input fact belongs to exactly one producer, so each worker only ever
//! writes the price slots of its own range and no locking is needed. The
//! previous vector and the table are shared read-only. `try_for_each` returns
//! only after every range is finished, so a pass never hands out a partially
//! accumulated vector.

use std::sync::Arc;

use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::accumulation::{accumulate_product, AccumulationPass};
use crate::error::{LaborValueError, Result};
use crate::prices::PriceVector;
use crate::table::SparseIoTable;

/// Accumulation pass running on a dedicated worker pool.
#[derive(Debug)]
pub struct ParallelAccumulator {
    pool: ThreadPool,
}

impl ParallelAccumulator {
    /// Builds a pool with `threads` workers; `0` uses the available hardware parallelism.
    pub fn new(threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("labor-value-worker-{index}"))
            .build()
            .map_err(|err| LaborValueError::ThreadPool {
                message: err.to_string(),
            })?;
        debug!("parallel accumulator using {} workers", pool.current_num_threads());
        Ok(Self { pool })
    }

    /// Number of workers in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

/// Length of each contiguous product range when `products` are spread over `workers`.
pub fn partition_len(products: usize, workers: usize) -> usize {
    products.div_ceil(workers.max(1)).max(1)
}

impl AccumulationPass for ParallelAccumulator {
    fn accumulate(
        &self,
        table: &SparseIoTable,
        previous: &PriceVector,
        baseline: &PriceVector,
    ) -> Result<PriceVector> {
        if let Some(product) = table
            .products()
            .iter()
            .find(|product| baseline.index_of(**product).is_none())
        {
            return Err(LaborValueError::key_mismatch(*product));
        }

        let products = Arc::clone(baseline.products());
        let mut prices = baseline.values().clone();
        let chunk = partition_len(products.len(), self.threads());

        self.pool.install(|| {
            prices
                .as_mut_slice()
                .par_chunks_mut(chunk)
                .zip(products.par_chunks(chunk))
                .try_for_each(|(slots, keys)| {
                    for (price, &product) in slots.iter_mut().zip(keys) {
                        accumulate_product(table, product, previous, price)?;
                    }
                    Ok::<(), LaborValueError>(())
                })
        })?;

        PriceVector::new(products, prices)
    }

    fn name(&self) -> &'static str {
        "parallel"
    }
}
