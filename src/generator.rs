//! Seeded synthetic input-output tables for testing and benchmarking.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::{LaborValueError, Result};
use crate::table::{
    ProductKey, SparseIoTable, TableBuilder, TableKey, LABOR_COLUMN, OUTPUT_COLUMN,
};

/// Shape of a generated table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of distinct products.
    pub products: usize,
    /// Expected fraction of the `products × products` input matrix that is filled.
    pub density: f64,
    /// Seed for the random number generator.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            products: 10_000,
            density: 0.01,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    pub fn new(products: usize, density: f64, seed: u64) -> Self {
        Self {
            products,
            density,
            seed,
        }
    }

    /// Number of input facts drawn (before duplicate keys collapse).
    pub fn input_draws(&self) -> usize {
        (self.density * (self.products as f64).powi(2)) as usize
    }

    fn validate(&self) -> Result<()> {
        if self.products == 0 {
            return Err(LaborValueError::InvalidGeneratorConfig {
                reason: "at least one product is required",
            });
        }
        if !(0.0..=1.0).contains(&self.density) {
            return Err(LaborValueError::InvalidGeneratorConfig {
                reason: "density must lie in [0, 1]",
            });
        }
        Ok(())
    }
}

/// Draws a random but well-formed table.
///
/// Products get 12-digit codes, labor in `[100, 10_000)` hours, and random
/// input facts with quantities in `[10, 10_000)`; a product may consume
/// itself. Each output quantity is the product's total input quantity plus a
/// surplus in `[100, 1_000)`, so every material cost share stays below one and
/// the price iteration contracts.
pub fn generate_table(config: &GeneratorConfig) -> Result<SparseIoTable> {
    config.validate()?;
    let mut rng = SmallRng::seed_from_u64(config.seed);

    let codes = Uniform::new(100_000_000_000u64, 999_999_999_999u64);
    let mut seen = BTreeSet::new();
    let mut products: Vec<ProductKey> = Vec::with_capacity(config.products);
    while products.len() < config.products {
        let code = codes.sample(&mut rng);
        if seen.insert(code) {
            products.push(code);
        }
    }

    let mut builder = TableBuilder::default();
    let labor = Uniform::new(100u32, 10_000u32);
    for &product in &products {
        builder.insert(TableKey::new(product, LABOR_COLUMN), f64::from(labor.sample(&mut rng)));
    }

    let pick = Uniform::new(0usize, products.len());
    let quantity = Uniform::new(10u32, 10_000u32);
    let mut consumed = vec![0.0f64; products.len()];
    let mut inputs = BTreeMap::new();
    for _ in 0..config.input_draws() {
        let producer = pick.sample(&mut rng);
        let input = products[pick.sample(&mut rng)];
        inputs.insert((producer, input), f64::from(quantity.sample(&mut rng)));
    }
    for (&(producer, input), &units) in &inputs {
        consumed[producer] += units;
        builder.insert(TableKey::new(products[producer], input), units);
    }

    let surplus = Uniform::new(100u32, 1_000u32);
    for (index, &product) in products.iter().enumerate() {
        let output = consumed[index] + f64::from(surplus.sample(&mut rng));
        builder.insert(TableKey::new(product, OUTPUT_COLUMN), output);
    }

    Ok(builder.build())
}
