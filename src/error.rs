use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::table::{Column, ProductKey};

/// Unified error type for `labor_value` operations.
#[derive(Debug, Error)]
pub enum LaborValueError {
    /// Raised when the input-output table cannot be opened or read.
    #[error("table file `{}` cannot be read or does not exist", path.display())]
    InvalidTableFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Raised when a line of the table file does not follow `<product>,<column> <quantity>`.
    #[error("malformed table line {line} (`{content}`): {reason}")]
    MalformedTableLine {
        /// One-based line number within the file.
        line: usize,
        /// The offending line, trimmed.
        content: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// Raised when a producer lacks its labor (column 0) or output (column 1) fact.
    #[error("product {product} has no entry for column {column}")]
    MissingColumn { product: ProductKey, column: Column },

    /// Raised when a producer reports an output quantity of zero.
    #[error("product {product} has a zero output quantity")]
    DivisionByZero { product: ProductKey },

    /// Raised when an input has no price of its own in the previous iteration.
    #[error("product {product} consumes input {input}, which has no price")]
    UnknownInput {
        product: ProductKey,
        input: ProductKey,
    },

    /// Raised when an accumulation pass cannot find a producer's output quantity.
    #[error("product {product} has inputs but no output quantity")]
    MissingOutputQuantity { product: ProductKey },

    /// Raised when two price vectors that must share a key set do not.
    #[error("price vectors disagree on product {product}")]
    KeySetMismatch { product: ProductKey },

    /// Raised when neither or both halting policies were requested.
    #[error("halting point unclear: {reason}; use exactly one of -i or -p")]
    AmbiguousHaltingPolicy { reason: &'static str },

    /// Raised when the price destination cannot be written.
    #[error("cannot write prices to `{}`", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Raised when a price CSV record cannot be parsed back.
    #[error("malformed price record on line {line}: `{content}`")]
    MalformedPriceRecord { line: usize, content: String },

    /// Raised when the precision policy exhausts its iteration cap.
    #[error("prices did not converge after {iterations} iterations; last max gap {max_gap}")]
    NonConvergent {
        /// Number of passes performed before giving up.
        iterations: usize,
        /// Largest absolute price change in the last pass.
        max_gap: f64,
    },

    /// Raised when a pass produces NaN or infinite prices.
    #[error("encountered a non-finite value during {context}")]
    NumericalError { context: &'static str },

    /// Raised when the worker pool for parallel accumulation cannot be built.
    #[error("failed to build worker pool: {message}")]
    ThreadPool { message: String },

    /// Raised when a price vector is assembled from mismatched parts.
    #[error("dimension mismatch in {context}: expected {expected} but found {found}")]
    DimensionMismatch {
        /// Human-readable context describing the operation.
        context: &'static str,
        /// The number of prices the key list requires.
        expected: usize,
        /// The number of prices that was actually supplied.
        found: usize,
    },

    /// Raised when the synthetic table generator is misconfigured.
    #[error("invalid generator configuration: {reason}")]
    InvalidGeneratorConfig { reason: &'static str },
}

impl LaborValueError {
    /// Helper to format a [`DimensionMismatch`](LaborValueError::DimensionMismatch) error.
    pub fn dimension_mismatch(context: &'static str, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            found,
        }
    }

    /// Helper for table lines that fail to parse.
    pub fn malformed_line(line: usize, content: &str, reason: &'static str) -> Self {
        Self::MalformedTableLine {
            line,
            content: content.trim().to_string(),
            reason,
        }
    }

    /// Helper for price vectors that are missing a key the other side has.
    pub fn key_mismatch(product: ProductKey) -> Self {
        Self::KeySetMismatch { product }
    }
}

/// Type alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, LaborValueError>;
