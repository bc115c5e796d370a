//! # `wfc-solver`
//!
//! A generic Wave Function Collapse constraint solver. The engine knows
//! nothing about grids, tiles, or Sudoku boards: it operates on an abstract
//! [`World`] of cells, a [`VariableMap`] translating domain-specific values
//! to dense bit indices, and a [`RuleTable`] saying which values are
//! compatible across an edge. Everything domain-specific — what a cell
//! actually represents, how neighbours are found, what the rules mean —
//! lives on the caller's side of those traits.
//!
//! The moving parts:
//!
//! - [`Wave`] holds one [`BitDomain`] per variable.
//! - [`PropagationQueue`] drives constraint propagation to a fixed point.
//! - [`Arena`] provides scoped scratch memory for the branching search.
//! - [`Solver`] ties it together: seed, propagate, guess, backtrack.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod arena;
mod bitdomain;
mod constrainer;
mod events;
mod queue;
mod rules;
mod selector;
mod solver;
mod varmap;
mod wave;
mod world;

pub use arena::{Arena, Frame, DEFAULT_POOL_BYTES};
pub use bitdomain::{BitDomain, WideMask};
pub use constrainer::Constrainer;
pub use events::{SolverEvents, SolverView};
pub use queue::{Checkpoint, PropagationQueue};
pub use rules::{AdjacencyTable, CallbackTable, RuleTable};
pub use selector::{LcgSelector, MersenneTwisterSelector, Selector};
pub use solver::{Solver, DEFAULT_MAX_ITERATIONS};
pub use varmap::{EnumMap, RangeMap, VariableMap};
pub use wave::Wave;
pub use world::World;
