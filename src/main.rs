// CLI entry for lvprice
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, ValueHint};
use labor_value::io::{load_table, save_prices, write_price_listing};
use labor_value::{solve_prices, HaltingPolicy, SolverOptions, Strategy};
use log::info;

#[derive(Parser, Debug)]
#[command(
    name = "lvprice",
    version,
    about = "Labor-value prices from a sparse input-output table"
)]
struct Cli {
    /// Input-output table with one `<product>,<column> <quantity>` fact per line.
    /// Column 0 holds labor hours, column 1 units produced, any other column
    /// the units of that input product consumed.
    #[arg(short = 'f', long = "file", value_hint = ValueHint::FilePath)]
    file: PathBuf,

    /// Number of iterations to run
    #[arg(short = 'i', long = "iterations")]
    iterations: Option<usize>,

    /// Stop once prices are stable to this many decimal digits (at most 15)
    #[arg(short = 'p', long = "precision")]
    precision: Option<u32>,

    /// CSV file to save prices to; prices are printed when absent
    #[arg(short = 'o', long = "output", value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Worker threads per pass (0 = one per core)
    #[arg(short = 't', long = "threads", default_value_t = 0)]
    threads: usize,

    /// Run every pass on the main thread
    #[arg(long = "sequential")]
    sequential: bool,

    /// Give up after this many passes when iterating to a precision
    #[arg(long = "max-iterations", default_value_t = 100_000)]
    max_iterations: usize,
}

fn build_options(cli: &Cli) -> labor_value::Result<SolverOptions> {
    let halting = HaltingPolicy::from_flags(cli.iterations, cli.precision)?;
    let strategy = if cli.sequential {
        Strategy::Sequential
    } else {
        Strategy::Parallel {
            threads: cli.threads,
        }
    };
    Ok(SolverOptions::default()
        .with_halting(halting)
        .with_strategy(strategy)
        .with_max_iterations(cli.max_iterations))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let started = Instant::now();
    let cli = Cli::parse();
    if let Err(err) = build_options(&cli) {
        Cli::command().print_help()?;
        return Err(err.into());
    }

    run(&cli)?;
    info!("time taken: {:.3} s", started.elapsed().as_secs_f64());
    Ok(())
}

/// Validates the flags, then loads, solves and writes prices.
fn run(cli: &Cli) -> Result<()> {
    let options = build_options(cli)?;
    let table = load_table(&cli.file).context("loading input-output table")?;
    let (prices, summary) = solve_prices(&table, &options).context("computing prices")?;
    info!(
        "{} products priced in {} iterations (last max gap {:e})",
        prices.len(),
        summary.iterations,
        summary.max_gap
    );

    match &cli.output {
        Some(path) => save_prices(&prices, path)?,
        None => write_price_listing(&prices, BufWriter::new(io::stdout().lock()))
            .context("printing prices")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use labor_value::LaborValueError;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(["lvprice", "-f", "/no/such/table.txt"].iter().chain(args)).unwrap()
    }

    #[test]
    fn iterations_and_precision_together_fail_before_loading() {
        let cli = parse(&["-i", "3", "-p", "2"]);
        assert!(matches!(
            build_options(&cli),
            Err(LaborValueError::AmbiguousHaltingPolicy { .. })
        ));

        let err = run(&cli).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LaborValueError>(),
            Some(LaborValueError::AmbiguousHaltingPolicy { .. })
        ));
    }

    #[test]
    fn a_halting_flag_is_required() {
        assert!(matches!(
            build_options(&parse(&[])),
            Err(LaborValueError::AmbiguousHaltingPolicy { .. })
        ));
    }

    #[test]
    fn missing_table_is_reported_once_flags_are_valid() {
        let err = run(&parse(&["-i", "3"])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LaborValueError>(),
            Some(LaborValueError::InvalidTableFile { .. })
        ));
    }

    #[test]
    fn flags_map_onto_solver_options() {
        let options = build_options(&parse(&["-p", "40", "--sequential"])).unwrap();
        assert_eq!(options.halting, HaltingPolicy::Precision(15));
        assert_eq!(options.strategy, Strategy::Sequential);

        let options = build_options(&parse(&["-i", "7", "-t", "3"])).unwrap();
        assert_eq!(options.halting, HaltingPolicy::FixedCount(7));
        assert_eq!(options.strategy, Strategy::Parallel { threads: 3 });
    }
}
