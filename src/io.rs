//! Text formats at the edges of the solver.
//!
//! Input tables hold one fact per line, `<product>,<column> <quantity>`, with
//! blank lines skipped. Prices are written as CSV with a
//! `ProductUPC,Price` header or listed as `<product>: <price> lh/unit`.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use log::info;

use crate::error::{LaborValueError, Result};
use crate::prices::PriceVector;
use crate::table::{Column, ProductKey, SparseIoTable, TableBuilder, TableKey};

/// Header row of the price CSV.
pub const CSV_HEADER: &str = "ProductUPC,Price";

/// Parses one table line; `Ok(None)` for blank lines.
pub fn parse_table_line(line_number: usize, line: &str) -> Result<Option<(TableKey, f64)>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (product, rest) = trimmed
        .split_once(',')
        .ok_or_else(|| LaborValueError::malformed_line(line_number, line, "missing comma"))?;
    let (column, quantity) = rest
        .trim_start()
        .split_once(char::is_whitespace)
        .ok_or_else(|| {
            LaborValueError::malformed_line(line_number, line, "missing quantity")
        })?;

    let product: ProductKey = product.trim().parse().map_err(|_| {
        LaborValueError::malformed_line(line_number, line, "product is not an unsigned integer")
    })?;
    let column: Column = column.parse().map_err(|_| {
        LaborValueError::malformed_line(line_number, line, "column is not an unsigned integer")
    })?;
    let quantity: f64 = quantity.trim().parse().map_err(|_| {
        LaborValueError::malformed_line(line_number, line, "quantity is not a number")
    })?;
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(LaborValueError::malformed_line(
            line_number,
            line,
            "quantity must be finite and non-negative",
        ));
    }

    Ok(Some((TableKey::new(product, column), quantity)))
}

/// Reads a table from any buffered source.
///
/// Read failures are reported against `<reader>`; use [`load_table`] to have
/// them name the file.
pub fn read_table<R: BufRead>(reader: R) -> Result<SparseIoTable> {
    read_table_from(reader, Path::new("<reader>"))
}

fn read_table_from<R: BufRead>(reader: R, path: &Path) -> Result<SparseIoTable> {
    let mut builder = TableBuilder::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| match source.kind() {
            ErrorKind::InvalidData => {
                LaborValueError::malformed_line(index + 1, "", "line is not valid UTF-8")
            }
            _ => LaborValueError::InvalidTableFile {
                path: path.to_path_buf(),
                source,
            },
        })?;
        if let Some((key, quantity)) = parse_table_line(index + 1, &line)? {
            builder.insert(key, quantity);
        }
    }
    Ok(builder.build())
}

/// Loads a table file.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<SparseIoTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LaborValueError::InvalidTableFile {
        path: path.to_path_buf(),
        source,
    })?;
    info!("loading table from {}", path.display());
    let table = read_table_from(BufReader::new(file), path)?;
    info!(
        "loaded {} facts for {} products",
        table.len(),
        table.product_count()
    );
    Ok(table)
}

/// Writes a table in the line format [`read_table`] accepts.
pub fn write_table<W: Write>(table: &SparseIoTable, mut writer: W) -> std::io::Result<()> {
    for (key, quantity) in table.entries() {
        writeln!(writer, "{},{} {}", key.product, key.column, quantity)?;
    }
    writer.flush()
}

/// Writes prices as CSV with a header row.
pub fn write_prices_csv<W: Write>(prices: &PriceVector, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for (product, price) in prices.iter() {
        writeln!(writer, "{product},{price}")?;
    }
    writer.flush()
}

/// Saves prices to a CSV file.
pub fn save_prices<P: AsRef<Path>>(prices: &PriceVector, path: P) -> Result<()> {
    let path = path.as_ref();
    let to_error = |source| LaborValueError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_error)?;
    write_prices_csv(prices, BufWriter::new(file)).map_err(to_error)?;
    info!("prices saved to {}", path.display());
    Ok(())
}

/// Reads prices back from the CSV format written by [`write_prices_csv`].
pub fn read_prices_csv<R: BufRead>(reader: R) -> Result<PriceVector> {
    let mut pairs = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|_| LaborValueError::MalformedPriceRecord {
            line: line_number,
            content: String::new(),
        })?;
        let record = line.trim();
        if record.is_empty() || (line_number == 1 && record == CSV_HEADER) {
            continue;
        }

        let malformed = || LaborValueError::MalformedPriceRecord {
            line: line_number,
            content: record.to_string(),
        };
        let (product, price) = record.split_once(',').ok_or_else(malformed)?;
        let product: ProductKey = product.trim().parse().map_err(|_| malformed())?;
        let price: f64 = price.trim().parse().map_err(|_| malformed())?;
        pairs.push((product, price));
    }
    Ok(PriceVector::from_pairs(pairs))
}

/// Lists prices as `<product>: <price> lh/unit`, one per line.
pub fn write_price_listing<W: Write>(prices: &PriceVector, mut writer: W) -> std::io::Result<()> {
    for (product, price) in prices.iter() {
        writeln!(writer, "{product}: {price} lh/unit")?;
    }
    writer.flush()
}
