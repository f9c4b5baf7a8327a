//! Labor-only starting prices.

use std::sync::Arc;

use nalgebra::DVector;

use crate::error::{LaborValueError, Result};
use crate::prices::PriceVector;
use crate::table::{SparseIoTable, LABOR_COLUMN, OUTPUT_COLUMN};

/// Computes `labor / output` for every producing product in `table`.
///
/// The result is the price floor each accumulation pass starts from.
pub fn labor_baseline(table: &SparseIoTable) -> Result<PriceVector> {
    let products = Arc::clone(table.products());
    let mut prices = DVector::zeros(products.len());

    for (index, &product) in products.iter().enumerate() {
        let labor = table
            .labor(product)
            .ok_or(LaborValueError::MissingColumn {
                product,
                column: LABOR_COLUMN,
            })?;
        let output = table
            .output_quantity(product)
            .ok_or(LaborValueError::MissingColumn {
                product,
                column: OUTPUT_COLUMN,
            })?;
        if output == 0.0 {
            return Err(LaborValueError::DivisionByZero { product });
        }
        prices[index] = labor / output;
    }

    PriceVector::new(products, prices)
}
