//! Observability hooks into a running solve.
//!
//! The engine has no logging of its own; callers who want progress bars,
//! tracing, or metrics implement [`SolverEvents`] and pass it to
//! [`crate::solver::Solver::with_events`]. Each callback receives an
//! immutable [`SolverView`] of the world and wave, refreshed from the
//! current wave just before the callback fires.

use crate::bitdomain::BitDomain;
use crate::wave::Wave;
use crate::world::World;

/// A read-only snapshot handed to an event callback: the world (already
/// refreshed with every currently collapsed cell's value) alongside the
/// wave driving that refresh.
pub struct SolverView<'a, W: World, D: BitDomain> {
    /// The world, refreshed from `wave` just before this view was built.
    pub world: &'a W,
    /// The wave as it stood at the moment of the event.
    pub wave: &'a Wave<D>,
}

/// Callbacks fired at the significant moments of a solve.
///
/// All methods default to doing nothing, so an implementor only overrides
/// the events it cares about.
#[allow(unused_variables)]
pub trait SolverEvents<W: World, D: BitDomain> {
    /// Fired whenever propagation collapses a cell to a single value.
    fn on_cell_collapsed(&mut self, view: &SolverView<'_, W, D>) {}

    /// Fired when propagation drains with at least one cell contradicted.
    fn on_contradiction(&mut self, view: &SolverView<'_, W, D>) {}

    /// Fired just before the solver opens a branch to guess a cell's value.
    fn on_branch(&mut self, view: &SolverView<'_, W, D>) {}
}

impl<W: World, D: BitDomain> SolverEvents<W, D> for () {}
