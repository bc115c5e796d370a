//! Solves a wraparound grid checkerboard and prints it as ASCII, reporting
//! progress through the same event callbacks a caller would use for
//! diagnostics in production.

#[path = "grid_world.rs"]
mod grid_world;

use clap::Parser;
use grid_world::GridWorld;
use indicatif::{ProgressBar, ProgressStyle};
use wfc_solver::{AdjacencyTable, BitDomain, EnumMap, LcgSelector, Solver, SolverEvents, SolverView};

/// Checkerboard demo configuration.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Config {
    #[arg(short, long, default_value_t = 8)]
    width: usize,

    #[arg(short = 'H', long, default_value_t = 8)]
    height: usize,

    #[arg(short, long, default_value_t = 1)]
    seed: u64,
}

struct ProgressEvents {
    bar: ProgressBar,
}

impl SolverEvents<GridWorld<usize>, u8> for ProgressEvents {
    fn on_cell_collapsed(&mut self, _view: &SolverView<'_, GridWorld<usize>, u8>) {
        self.bar.inc(1);
    }

    fn on_branch(&mut self, view: &SolverView<'_, GridWorld<usize>, u8>) {
        let remaining = (0..view.wave.len())
            .filter(|&cell| !view.wave.is_collapsed(cell))
            .count();
        self.bar.set_message(remaining.to_string());
    }
}

fn main() {
    let config = Config::parse();
    let mut world: GridWorld<usize> = GridWorld::new(config.width, config.height);
    world.set_value(0, 0);

    let varmap = EnumMap::new(vec![0usize, 1]);
    let black = u8::mask_for([1]);
    let white = u8::mask_for([0]);
    let compat = vec![[white, white, white, white], [black, black, black, black]];
    let rules = AdjacencyTable::new(compat, GridWorld::<usize>::neighbor);
    let selector = LcgSelector::new(config.seed);

    let bar = ProgressBar::new((config.width * config.height) as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} cells (remaining open: {msg})")
            .unwrap()
            .progress_chars("##-"),
    );
    bar.set_message("0");

    let mut solver =
        Solver::new(varmap, rules, selector).with_events(ProgressEvents { bar: bar.clone() });
    solver.run(&mut world).expect("a checkerboard is always satisfiable");
    bar.finish_and_clear();

    for y in 0..world.height() {
        let row: String = (0..world.width())
            .map(|x| match world.get_value(world.id_of(x, y)) {
                Some(1) => '#',
                _ => '.',
            })
            .collect();
        println!("{row}");
    }
}
