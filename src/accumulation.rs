//! A single price-iteration pass.
//!
//! Each pass starts from the labor-only floor and adds, for every input fact
//! `(p, i, q)`, the per-unit material cost `q * previous[i] / output[p]`.
//! Material costs are recomputed from scratch every pass; only direct labor
//! carries over.

use crate::error::{LaborValueError, Result};
use crate::prices::PriceVector;
use crate::table::{InputFact, ProductKey, SparseIoTable};

/// Strategy for computing the next price vector from the previous one.
///
/// Implementations must leave `previous` and `baseline` untouched and return a
/// vector laid out over the same products as `baseline`.
pub trait AccumulationPass {
    /// Runs one pass over `table`.
    fn accumulate(
        &self,
        table: &SparseIoTable,
        previous: &PriceVector,
        baseline: &PriceVector,
    ) -> Result<PriceVector>;

    /// Short label used in log output.
    fn name(&self) -> &'static str;
}

impl<A: AccumulationPass + ?Sized> AccumulationPass for Box<A> {
    fn accumulate(
        &self,
        table: &SparseIoTable,
        previous: &PriceVector,
        baseline: &PriceVector,
    ) -> Result<PriceVector> {
        (**self).accumulate(table, previous, baseline)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Per-unit cost that one input fact adds to its producer.
pub fn contribution(table: &SparseIoTable, fact: InputFact, previous: &PriceVector) -> Result<f64> {
    let input_price = previous
        .get(fact.input)
        .ok_or(LaborValueError::UnknownInput {
            product: fact.product,
            input: fact.input,
        })?;
    let output = table
        .output_quantity(fact.product)
        .ok_or(LaborValueError::MissingOutputQuantity {
            product: fact.product,
        })?;
    Ok(fact.quantity * input_price / output)
}

/// Adds every material cost of `product` onto `price`, in table order.
pub(crate) fn accumulate_product(
    table: &SparseIoTable,
    product: ProductKey,
    previous: &PriceVector,
    price: &mut f64,
) -> Result<()> {
    for fact in table.inputs_of(product) {
        *price += contribution(table, fact, previous)?;
    }
    Ok(())
}

/// Walks every input fact on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialAccumulator;

impl AccumulationPass for SequentialAccumulator {
    fn accumulate(
        &self,
        table: &SparseIoTable,
        previous: &PriceVector,
        baseline: &PriceVector,
    ) -> Result<PriceVector> {
        let (products, mut prices) = baseline.clone().into_parts();

        for fact in table.input_facts() {
            let index = baseline
                .index_of(fact.product)
                .ok_or_else(|| LaborValueError::key_mismatch(fact.product))?;
            prices[index] += contribution(table, fact, previous)?;
        }

        PriceVector::new(products, prices)
    }

    fn name(&self) -> &'static str {
        "sequential"
    }
}
