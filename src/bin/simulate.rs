//! Randomised multi-threaded driver for a shared [`Grid`] and [`Multiset`].
//!
//! ```text
//! simulate <rows> <columns> <threads> <operations> <sleep_ms> [search_limit]
//! ```
//!
//! Seeds every cell with `Test{row}{column}`, then spawns `threads` workers that each perform
//! `operations` randomly chosen public operations with a `sleep_ms` pause between them, printing
//! one line per operation.
//! Operation failures (such as a randomly inverted search range) are printed as `catch:` lines
//! and the run continues.

use std::time::Duration;

use rand::{thread_rng, Rng};

use gridlock::grid::{Grid, GridBuilder, GridError};
use gridlock::multiset::Multiset;

struct Options {
    rows: usize,
    columns: usize,
    threads: usize,
    operations: usize,
    sleep_ms: u64,
    search_limit: Option<usize>,
}

fn main() {
    let options = match parse_args(std::env::args()) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("usage: simulate <rows> <columns> <threads> <operations> <sleep_ms> [search_limit]");
            std::process::exit(2);
        }
    };

    let mut builder = GridBuilder::new(options.rows, options.columns);
    if let Some(limit) = options.search_limit {
        builder.concurrent_search_limit(limit);
    }
    let grid = match builder.build() {
        Ok(grid) => grid,
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    };

    for row in 0..options.rows {
        for column in 0..options.columns {
            if let Err(error) = grid.set_cell(row, column, format!("Test{row}{column}")) {
                eprintln!("error: {error}");
                std::process::exit(1);
            }
        }
    }

    let multiset = Multiset::new();
    std::thread::scope(|scope| {
        for thread_index in 0..options.threads {
            let grid = &grid;
            let multiset = &multiset;
            let options = &options;
            scope.spawn(move || worker(thread_index, options, grid, multiset));
        }
    });

    println!(
        "simulation completed: grid is {}, multiset holds {} values",
        grid.size(),
        multiset.len()
    );
}

fn parse_args(args: std::env::Args) -> Result<Options, String> {
    let args: Vec<String> = args.skip(1).collect();
    if args.len() < 5 || args.len() > 6 {
        return Err(format!("expected 5 or 6 arguments, got {}", args.len()));
    }
    let number = |index: usize, name: &str| -> Result<usize, String> {
        args[index]
            .parse()
            .map_err(|_| format!("<{name}> must be a non-negative number, got {}", args[index]))
    };
    Ok(Options {
        rows: number(0, "rows")?,
        columns: number(1, "columns")?,
        threads: number(2, "threads")?,
        operations: number(3, "operations")?,
        sleep_ms: number(4, "sleep_ms")? as u64,
        search_limit: match args.get(5) {
            Some(_) => Some(number(5, "search_limit")?),
            None => None,
        },
    })
}

fn worker(thread_index: usize, options: &Options, grid: &Grid, multiset: &Multiset) {
    let mut rng = thread_rng();
    for _ in 0..options.operations {
        match operation(&mut rng, options, grid, multiset) {
            Ok(line) => println!("thread {thread_index}: {line}"),
            Err(error) => println!("catch: {error}"),
        }
        std::thread::sleep(Duration::from_millis(options.sleep_ms));
    }
}

/// Perform one randomly chosen operation and describe it.
///
/// Indices are drawn from the seeded dimensions, which stay in bounds because the grid only
/// grows. The range search draws unordered bounds, so it genuinely exercises the error path.
fn operation(
    rng: &mut impl Rng,
    options: &Options,
    grid: &Grid,
    multiset: &Multiset,
) -> Result<String, GridError> {
    let rows = options.rows;
    let columns = options.columns;
    match rng.gen_range(0..16u8) {
        0 => {
            let (row, column) = (rng.gen_range(0..rows), rng.gen_range(0..columns));
            let value = grid.get_cell(row, column)?;
            Ok(format!("get_cell({row}, {column}) = {value}"))
        }
        1 => {
            let (row, column) = (rng.gen_range(0..rows), rng.gen_range(0..columns));
            let value = format!("Value{row}{column}");
            grid.set_cell(row, column, value.clone())?;
            Ok(format!("set_cell({row}, {column}, {value})"))
        }
        2 => {
            let needle = format!("Test{}{}", rng.gen_range(0..rows), rng.gen_range(0..columns));
            let found = grid.search_string(&needle);
            Ok(format!("search_string({needle}) = {found:?}"))
        }
        3 => {
            let (row1, row2) = (rng.gen_range(0..rows), rng.gen_range(0..rows));
            grid.exchange_rows(row1, row2)?;
            Ok(format!("exchange_rows({row1}, {row2})"))
        }
        4 => {
            let (col1, col2) = (rng.gen_range(0..columns), rng.gen_range(0..columns));
            grid.exchange_columns(col1, col2)?;
            Ok(format!("exchange_columns({col1}, {col2})"))
        }
        5 => {
            let row = rng.gen_range(0..rows);
            let needle = format!("Test{row}{}", rng.gen_range(0..columns));
            let found = grid.search_in_row(row, &needle)?;
            Ok(format!("search_in_row({row}, {needle}) = {found:?}"))
        }
        6 => {
            let column = rng.gen_range(0..columns);
            let needle = format!("Test{}{column}", rng.gen_range(0..rows));
            let found = grid.search_in_column(column, &needle)?;
            Ok(format!("search_in_column({column}, {needle}) = {found:?}"))
        }
        7 => {
            let (row1, row2) = (rng.gen_range(0..rows), rng.gen_range(0..rows));
            let (col1, col2) = (rng.gen_range(0..columns), rng.gen_range(0..columns));
            let needle = format!("Test{}{}", rng.gen_range(0..rows), rng.gen_range(0..columns));
            let found = grid.search_in_range(col1, col2, row1, row2, &needle)?;
            Ok(format!(
                "search_in_range({col1}, {col2}, {row1}, {row2}, {needle}) = {found:?}"
            ))
        }
        8 => {
            let row = rng.gen_range(0..rows);
            grid.add_row(row)?;
            Ok(format!("add_row({row})"))
        }
        9 => {
            let column = rng.gen_range(0..columns);
            grid.add_column(column)?;
            Ok(format!("add_column({column})"))
        }
        10 => {
            let needle = format!("Test{}{}", rng.gen_range(0..rows), rng.gen_range(0..columns));
            let found = grid.find_all(&needle, true);
            Ok(format!("find_all({needle}, true) = {found:?}"))
        }
        11 => {
            let old = format!("Test{}{}", rng.gen_range(0..rows), rng.gen_range(0..columns));
            let new = format!("New{}{}", rng.gen_range(0..rows), rng.gen_range(0..columns));
            grid.set_all(&old, &new, false);
            Ok(format!("set_all({old}, {new}, false)"))
        }
        12 => Ok(format!("size() = {}", grid.size())),
        13 => {
            let word = format!("Word{}", rng.gen_range(0..8u8));
            multiset.add(word.clone());
            Ok(format!("multiset add({word})"))
        }
        14 => {
            let word = format!("Word{}", rng.gen_range(0..8u8));
            multiset.delete(&word);
            Ok(format!("multiset delete({word})"))
        }
        _ => {
            let word = format!("Word{}", rng.gen_range(0..8u8));
            let count = multiset.search(&word);
            Ok(format!("multiset search({word}) = {count}"))
        }
    }
}
