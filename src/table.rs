//! Sparse input-output table and its builder.
//!
//! Every fact in the table is keyed by a `(product, column)` pair. Column `0`
//! holds direct labor hours, column `1` holds total output, and any other
//! column names an input product whose consumed quantity is stored.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::warn;

/// Opaque product identifier (a UPC-like code).
pub type ProductKey = u64;

/// Column identifier within a product's row.
pub type Column = u64;

/// Column holding direct labor hours per period.
pub const LABOR_COLUMN: Column = 0;
/// Column holding total output quantity per period.
pub const OUTPUT_COLUMN: Column = 1;
/// Smallest column that names an input product.
pub const FIRST_INPUT_COLUMN: Column = 2;

/// Key of a single table fact.
///
/// Ordering is by product first, so all facts of one product are contiguous.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableKey {
    pub product: ProductKey,
    pub column: Column,
}

impl TableKey {
    pub fn new(product: ProductKey, column: Column) -> Self {
        Self { product, column }
    }

    /// Interprets the column of this key.
    pub fn kind(&self) -> ColumnKind {
        match self.column {
            LABOR_COLUMN => ColumnKind::Labor,
            OUTPUT_COLUMN => ColumnKind::Output,
            input => ColumnKind::Input(input),
        }
    }
}

/// Meaning of a table column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// Direct labor hours.
    Labor,
    /// Units produced.
    Output,
    /// Units of the named input product consumed.
    Input(ProductKey),
}

/// One input-consumption fact: `product` consumed `quantity` units of `input`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputFact {
    pub product: ProductKey,
    pub input: ProductKey,
    pub quantity: f64,
}

/// Immutable sparse input-output table.
#[derive(Clone, Debug)]
pub struct SparseIoTable {
    entries: BTreeMap<TableKey, f64>,
    products: Arc<[ProductKey]>,
}

impl SparseIoTable {
    /// Starts an empty builder.
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    /// Number of stored facts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no facts at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted, deduplicated list of products that appear as producers.
    pub fn products(&self) -> &Arc<[ProductKey]> {
        &self.products
    }

    /// Number of producing products.
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Looks up a single fact.
    pub fn get(&self, product: ProductKey, column: Column) -> Option<f64> {
        self.entries.get(&TableKey::new(product, column)).copied()
    }

    /// Direct labor hours for `product`, if recorded.
    pub fn labor(&self, product: ProductKey) -> Option<f64> {
        self.get(product, LABOR_COLUMN)
    }

    /// Output quantity for `product`, if recorded.
    pub fn output_quantity(&self, product: ProductKey) -> Option<f64> {
        self.get(product, OUTPUT_COLUMN)
    }

    /// Iterates over all facts in key order.
    pub fn entries(&self) -> impl Iterator<Item = (TableKey, f64)> + '_ {
        self.entries.iter().map(|(key, value)| (*key, *value))
    }

    /// Iterates over every input-consumption fact in key order.
    pub fn input_facts(&self) -> impl Iterator<Item = InputFact> + '_ {
        self.entries().filter_map(|(key, quantity)| match key.kind() {
            ColumnKind::Input(input) => Some(InputFact {
                product: key.product,
                input,
                quantity,
            }),
            _ => None,
        })
    }

    /// Iterates over the inputs consumed by a single product.
    pub fn inputs_of(&self, product: ProductKey) -> impl Iterator<Item = InputFact> + '_ {
        let start = TableKey::new(product, FIRST_INPUT_COLUMN);
        let end = TableKey::new(product, Column::MAX);
        self.entries
            .range(start..=end)
            .map(move |(key, quantity)| InputFact {
                product,
                input: key.column,
                quantity: *quantity,
            })
    }
}

impl Default for SparseIoTable {
    fn default() -> Self {
        TableBuilder::default().build()
    }
}

impl FromIterator<(TableKey, f64)> for SparseIoTable {
    fn from_iter<I: IntoIterator<Item = (TableKey, f64)>>(iter: I) -> Self {
        let mut builder = TableBuilder::default();
        for (key, quantity) in iter {
            builder.insert(key, quantity);
        }
        builder.build()
    }
}

/// Collects facts before freezing them into a [`SparseIoTable`].
///
/// A repeated key overwrites the earlier value.
#[derive(Debug, Default)]
pub struct TableBuilder {
    entries: BTreeMap<TableKey, f64>,
}

impl TableBuilder {
    /// Records a fact in place.
    pub fn insert(&mut self, key: TableKey, quantity: f64) {
        if let Some(previous) = self.entries.insert(key, quantity) {
            warn!(
                "fact ({},{}) redefined: {} replaced by {}",
                key.product, key.column, previous, quantity
            );
        }
    }

    /// Records a fact, consuming and returning the builder.
    pub fn entry(mut self, product: ProductKey, column: Column, quantity: f64) -> Self {
        self.insert(TableKey::new(product, column), quantity);
        self
    }

    /// Sets the labor hours of `product`.
    pub fn labor(self, product: ProductKey, hours: f64) -> Self {
        self.entry(product, LABOR_COLUMN, hours)
    }

    /// Sets the output quantity of `product`.
    pub fn output(self, product: ProductKey, quantity: f64) -> Self {
        self.entry(product, OUTPUT_COLUMN, quantity)
    }

    /// Records that `product` consumed `quantity` units of `input`.
    ///
    /// Input keys below [`FIRST_INPUT_COLUMN`] land in the labor and output columns.
    pub fn input(self, product: ProductKey, input: ProductKey, quantity: f64) -> Self {
        self.entry(product, input, quantity)
    }

    /// Number of facts collected so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no facts have been collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freezes the collected facts.
    pub fn build(self) -> SparseIoTable {
        let mut products: Vec<ProductKey> = self.entries.keys().map(|key| key.product).collect();
        products.dedup();
        SparseIoTable {
            entries: self.entries,
            products: products.into(),
        }
    }
}
