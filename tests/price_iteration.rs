use approx::assert_relative_eq;
use labor_value::convergence::{max_gap, tolerance};
use labor_value::generator::{generate_table, GeneratorConfig};
use labor_value::io::{load_table, read_prices_csv, save_prices, write_table};
use labor_value::{
    labor_baseline, solve_prices, HaltingPolicy, IterationDriver, LaborValueError,
    ParallelAccumulator, SequentialAccumulator, SolverOptions, SparseIoTable, Strategy,
};

const A: u64 = 100;
const B: u64 = 200;

/// `A` makes 2 units from 10 labor hours and 1 unit of `B`; `B` makes 1 unit from 4 hours.
fn two_product_table() -> SparseIoTable {
    SparseIoTable::builder()
        .labor(A, 10.0)
        .output(A, 2.0)
        .input(A, B, 1.0)
        .labor(B, 4.0)
        .output(B, 1.0)
        .build()
}

fn options(halting: HaltingPolicy, strategy: Strategy) -> SolverOptions {
    SolverOptions::default()
        .with_halting(halting)
        .with_strategy(strategy)
        .with_max_iterations(10_000)
}

/// A product without inputs keeps its labor-only price under every policy.
#[test]
fn product_without_inputs_keeps_labor_price() {
    let table = SparseIoTable::builder().labor(A, 10.0).output(A, 2.0).build();
    for halting in [
        HaltingPolicy::FixedCount(0),
        HaltingPolicy::FixedCount(7),
        HaltingPolicy::Precision(0),
        HaltingPolicy::Precision(15),
    ] {
        let (prices, _) = solve_prices(&table, &options(halting, Strategy::Sequential)).unwrap();
        assert_eq!(prices.to_map().into_iter().collect::<Vec<_>>(), vec![(A, 5.0)]);
    }
}

#[test]
fn one_pass_adds_half_a_unit_of_input() {
    let table = two_product_table();
    let baseline = labor_baseline(&table).unwrap();
    assert_relative_eq!(baseline.get(A).unwrap(), 5.0);
    assert_relative_eq!(baseline.get(B).unwrap(), 4.0);

    for strategy in [Strategy::Sequential, Strategy::Parallel { threads: 3 }] {
        let (prices, summary) =
            solve_prices(&table, &options(HaltingPolicy::FixedCount(1), strategy)).unwrap();
        assert_relative_eq!(prices.get(A).unwrap(), 7.0);
        assert_relative_eq!(prices.get(B).unwrap(), 4.0);
        assert_relative_eq!(summary.max_gap, 2.0);
    }
}

/// `B` never moves and `A* = 5 + B / 2 = 7`, reached on the first pass and confirmed on the second.
#[test]
fn precision_policy_terminates_on_fixed_point() {
    let table = two_product_table();
    let (prices, summary) = solve_prices(
        &table,
        &options(HaltingPolicy::Precision(2), Strategy::Parallel { threads: 2 }),
    )
    .unwrap();
    assert_eq!(summary.iterations, 2);
    assert!(summary.max_gap <= tolerance(2));
    assert_relative_eq!(prices.get(A).unwrap(), 7.0);
    assert_relative_eq!(prices.get(B).unwrap(), 4.0);
}

#[test]
fn zero_iterations_return_the_baseline() {
    let table = generate_table(&GeneratorConfig::new(60, 0.05, 3)).unwrap();
    let (prices, summary) = solve_prices(
        &table,
        &options(HaltingPolicy::FixedCount(0), Strategy::Parallel { threads: 4 }),
    )
    .unwrap();
    assert_eq!(summary.iterations, 0);
    assert_eq!(prices, labor_baseline(&table).unwrap());
    assert_eq!(labor_baseline(&table).unwrap(), labor_baseline(&table).unwrap());
}

#[test]
fn parallel_passes_match_sequential_passes() {
    let table = generate_table(&GeneratorConfig::new(300, 0.03, 11)).unwrap();
    let sequential = IterationDriver::new(&table, SequentialAccumulator).unwrap();
    let parallel = IterationDriver::new(&table, ParallelAccumulator::new(4).unwrap()).unwrap();

    for passes in [1, 2, 5, 12] {
        let (seq, _) = sequential.run_fixed(passes).unwrap();
        let (par, _) = parallel.run_fixed(passes).unwrap();
        assert!(seq.same_layout(&par));
        assert_relative_eq!(*seq.values(), *par.values(), epsilon = 1e-9);
    }
}

/// The returned vector is within tolerance of the pass before it, and that pass was not.
#[test]
fn converged_prices_are_within_tolerance_of_previous_pass() {
    let table = generate_table(&GeneratorConfig::new(200, 0.05, 5)).unwrap();
    let driver = IterationDriver::new(&table, ParallelAccumulator::new(0).unwrap()).unwrap();

    for precision in [0, 3, 6] {
        let (current, summary) = driver.run_until_converged(precision, 10_000).unwrap();
        assert!(summary.iterations >= 1);
        let (previous, _) = driver.run_fixed(summary.iterations - 1).unwrap();
        let gap = max_gap(&previous, &current).unwrap();
        assert!(gap <= tolerance(precision));
        assert_relative_eq!(gap, summary.max_gap);

        if summary.iterations >= 2 {
            let (before, _) = driver.run_fixed(summary.iterations - 2).unwrap();
            assert!(max_gap(&before, &previous).unwrap() > tolerance(precision));
        }
    }
}

#[test]
fn empty_table_terminates_under_precision_policy() {
    let table = SparseIoTable::default();
    let (prices, summary) = solve_prices(
        &table,
        &options(HaltingPolicy::Precision(6), Strategy::Parallel { threads: 2 }),
    )
    .unwrap();
    assert!(prices.is_empty());
    assert_eq!(summary.iterations, 0);
}

#[test]
fn dangling_input_aborts_the_run() {
    let table = SparseIoTable::builder()
        .labor(A, 10.0)
        .output(A, 2.0)
        .input(A, 555, 1.0)
        .build();
    let result = solve_prices(
        &table,
        &options(HaltingPolicy::FixedCount(3), Strategy::Sequential),
    );
    assert!(matches!(
        result,
        Err(LaborValueError::UnknownInput {
            product: A,
            input: 555
        })
    ));
}

#[test]
fn prices_survive_a_csv_file_round_trip() {
    let table = generate_table(&GeneratorConfig::new(40, 0.1, 21)).unwrap();
    let (prices, _) = solve_prices(
        &table,
        &options(HaltingPolicy::FixedCount(25), Strategy::Parallel { threads: 2 }),
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.csv");
    save_prices(&prices, &path).unwrap();
    let file = std::io::BufReader::new(std::fs::File::open(&path).unwrap());
    let back = read_prices_csv(file).unwrap();

    assert_eq!(back, prices);
}

#[test]
fn generated_table_file_loads_and_solves() {
    let table = generate_table(&GeneratorConfig::new(80, 0.05, 8)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("iotable.txt");
    write_table(&table, std::fs::File::create(&path).unwrap()).unwrap();

    let loaded = load_table(&path).unwrap();
    assert_eq!(loaded.entries().collect::<Vec<_>>(), table.entries().collect::<Vec<_>>());

    let fixed = options(HaltingPolicy::FixedCount(4), Strategy::Sequential);
    let (a, _) = solve_prices(&loaded, &fixed).unwrap();
    let (b, _) = solve_prices(&table, &fixed).unwrap();
    assert_eq!(a, b);
}

#[test]
fn unwritable_destination_is_reported() {
    let prices = labor_baseline(&two_product_table()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let result = save_prices(&prices, dir.path().join("missing").join("prices.csv"));
    assert!(matches!(result, Err(LaborValueError::OutputWrite { .. })));
}
