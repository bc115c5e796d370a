//! The abstract shape of whatever the solver is filling in.
//!
//! `World` is deliberately thin: a size, a per-cell getter and setter. Any
//! topology a rule table needs (neighbour functions, coordinate lookups) is
//! passed to the rule table separately and stays opaque to the engine.

/// A fixed collection of cells, each holding an optional domain-specific
/// value.
pub trait World {
    /// The domain-specific value stored per cell (a tile id, a digit, ...).
    type Value: Clone;

    /// Total number of cells, `N`.
    fn size(&self) -> usize;

    /// The value at `cell`, if the caller pre-assigned or already solved it.
    fn get_value(&self, cell: usize) -> Option<Self::Value>;

    /// Write `value` into `cell`. The solver calls this only to report a
    /// collapsed cell's value back (on success, or on an event fire);
    /// rule functions must never call it themselves.
    fn set_value(&mut self, cell: usize, value: Self::Value);
}
