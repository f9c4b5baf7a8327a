// CLI entry for iotable-gen
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use labor_value::generator::{generate_table, GeneratorConfig};
use labor_value::io::write_table;
use log::info;

#[derive(Parser, Debug)]
#[command(
    name = "iotable-gen",
    version,
    about = "Write a random input-output table for lvprice"
)]
struct Cli {
    /// Number of distinct products
    #[arg(short = 'n', long = "products", default_value_t = 10_000)]
    products: usize,

    /// Fraction of the product-by-product input matrix to fill
    #[arg(short = 'd', long = "density", default_value_t = 0.01)]
    density: f64,

    /// Random seed
    #[arg(short = 's', long = "seed", default_value_t = 0)]
    seed: u64,

    /// Destination file (defaults to `iotable-<products>.txt`)
    #[arg(short = 'o', long = "output", value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = GeneratorConfig::new(cli.products, cli.density, cli.seed);
    info!(
        "generating {} products with about {} input facts",
        config.products,
        config.input_draws()
    );
    let table = generate_table(&config)?;

    let path = cli
        .output
        .unwrap_or_else(|| PathBuf::from(format!("iotable-{}.txt", cli.products)));
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    write_table(&table, BufWriter::new(file))
        .with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {} facts to {}", table.len(), path.display());
    Ok(())
}
