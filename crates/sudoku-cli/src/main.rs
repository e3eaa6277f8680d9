//! Command-line front end: load a puzzle, solve it, print the result.

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use sudoku_engine::{Grid, SolveStatus, Solver};

#[derive(Parser)]
#[command(name = "sudoku", about = "Solve a 9x9 Sudoku puzzle")]
struct Cli {
    /// Puzzle as 81 characters, row-major; '0' or '.' for empty cells.
    /// Omit to solve the built-in default board.
    puzzle: Option<String>,

    /// Read the puzzle string from a file instead.
    #[arg(long, conflicts_with = "puzzle")]
    file: Option<PathBuf>,

    /// Emit the outcome as JSON instead of a rendered board.
    #[arg(long)]
    json: bool,
}

/// Machine-readable solve outcome for `--json`.
#[derive(Serialize)]
struct SolveReport {
    status: SolveStatus,
    grid: Vec<Vec<u8>>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let solver = match load_puzzle(cli)? {
        Some(grid) => Solver::new(grid)?,
        None => Solver::with_default_puzzle(),
    };
    Ok(solve_and_report(solver, cli.json))
}

fn load_puzzle(cli: &Cli) -> Result<Option<Grid>, Box<dyn std::error::Error>> {
    let text = match (&cli.puzzle, &cli.file) {
        (Some(s), _) => s.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => return Ok(None),
    };
    Ok(Some(Grid::from_string(&text)?))
}

fn solve_and_report(mut solver: Solver, json: bool) -> ExitCode {
    if !json {
        println!("Before:");
        println!("{}", solver.grid());
    }

    let status = solver.solve();

    if json {
        let report = SolveReport {
            status,
            grid: solver.grid().to_rows(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("report serializes")
        );
    } else {
        match status {
            SolveStatus::Solved => {
                println!("After:");
                println!("{}", solver.grid());
            }
            _ => println!("Sudoku is not solvable."),
        }
    }

    match status {
        SolveStatus::Solved => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
