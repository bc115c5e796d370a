//! Solves a 9x9 Sudoku puzzle with a per-value callback table expressing
//! row/column/box uniqueness, reporting progress the same way the
//! checkerboard demo does.

#[path = "grid_world.rs"]
mod grid_world;

use clap::Parser;
use grid_world::GridWorld;
use indicatif::{ProgressBar, ProgressStyle};
use wfc_solver::{CallbackTable, Constrainer, LcgSelector, RangeMap, Solver, SolverEvents, SolverView};

type SudokuWorld = GridWorld<i64>;

/// Sudoku demo configuration.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Config {
    /// 81 characters, row-major, `.` for a blank cell.
    #[arg(short, long, default_value = "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79")]
    puzzle: String,

    #[arg(short, long, default_value_t = 1)]
    seed: u64,
}

/// Excludes `digit` from every cell sharing a row, column or 3x3 box with
/// `cell`. The same rule is registered for every digit: Sudoku's
/// uniqueness constraint does not depend on which digit just collapsed.
fn exclude_from_peers(_world: &SudokuWorld, cell: usize, digit: usize, constrainer: &mut Constrainer<'_, u16>) {
    let (row, col) = (cell / 9, cell % 9);
    let (box_row, box_col) = (row / 3, col / 3);
    for peer in 0..81 {
        if peer == cell {
            continue;
        }
        let (pr, pc) = (peer / 9, peer % 9);
        let shares_row = pr == row;
        let shares_col = pc == col;
        let shares_box = pr / 3 == box_row && pc / 3 == box_col;
        if shares_row || shares_col || shares_box {
            constrainer.exclude(peer, [digit]);
        }
    }
}

struct ProgressEvents {
    bar: ProgressBar,
}

impl SolverEvents<SudokuWorld, u16> for ProgressEvents {
    fn on_cell_collapsed(&mut self, _view: &SolverView<'_, SudokuWorld, u16>) {
        self.bar.inc(1);
    }

    fn on_branch(&mut self, _view: &SolverView<'_, SudokuWorld, u16>) {
        self.bar.set_message("guessing");
    }
}

fn main() {
    let config = Config::parse();
    assert_eq!(config.puzzle.len(), 81, "a Sudoku puzzle is 81 cells");

    let mut world: SudokuWorld = GridWorld::new(9, 9);
    for (cell, ch) in config.puzzle.chars().enumerate() {
        if let Some(digit) = ch.to_digit(10) {
            world.set_value(cell, i64::from(digit));
        }
    }

    let mut rules = CallbackTable::new(9);
    for digit in 0..9 {
        rules = rules.set(digit, exclude_from_peers);
    }

    let varmap = RangeMap::new(1, 10);
    let selector = LcgSelector::new(config.seed);

    let bar = ProgressBar::new(81);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} cells ({msg})")
            .unwrap()
            .progress_chars("##-"),
    );
    bar.set_message("propagating");

    let mut solver =
        Solver::new(varmap, rules, selector).with_events(ProgressEvents { bar: bar.clone() });
    solver.run(&mut world).expect("puzzle has a unique solution");
    bar.finish_and_clear();

    for row in 0..9 {
        let line: String = (0..9)
            .map(|col| {
                world
                    .get_value(world.id_of(col, row))
                    .map_or('.', |v| char::from_digit(v as u32, 10).unwrap())
            })
            .collect();
        println!("{line}");
    }
}
