//! Propagation rule tables: the part of the model that narrows a cell's
//! neighbours once that cell collapses.
//!
//! Two equivalent shapes are supported, per the data model. [`CallbackTable`]
//! indexes an array of closures by variable id, suited to irregular
//! constraints (Sudoku's rows, columns and boxes). [`AdjacencyTable`]
//! precomputes a per-direction compatibility matrix, suited to grid- or
//! tile-like worlds where the same small set of adjacency rules applies
//! everywhere. Exactly one is bound at solver-construction time.

use crate::bitdomain::BitDomain;
use crate::constrainer::Constrainer;
use crate::world::World;

/// Applies the propagation rule for a newly collapsed cell.
pub trait RuleTable<W: World, D: BitDomain> {
    /// `cell` has just collapsed to variable index `variable`; narrow
    /// whatever neighbouring cells this rule concerns through `constrainer`.
    fn apply(&self, world: &W, cell: usize, variable: usize, constrainer: &mut Constrainer<'_, D>);
}

/// A [`RuleTable`] indexed by variable id: entry `k` fires whenever a cell
/// collapses to variable index `k`. Values with no registered rule are a
/// no-op, matching the data model's "shared constrain-all default / no-op
/// otherwise" composition.
pub struct CallbackTable<W, D> {
    #[allow(clippy::type_complexity)]
    callbacks: Vec<Option<Box<dyn Fn(&W, usize, usize, &mut Constrainer<'_, D>)>>>,
}

impl<W, D> CallbackTable<W, D> {
    /// A table with `num_values` entries, all starting as no-ops.
    pub fn new(num_values: usize) -> Self {
        let mut callbacks = Vec::with_capacity(num_values);
        callbacks.resize_with(num_values, || None);
        Self { callbacks }
    }

    /// Register the rule fired when a cell collapses to variable `k`.
    pub fn set(mut self, k: usize, rule: impl Fn(&W, usize, usize, &mut Constrainer<'_, D>) + 'static) -> Self {
        self.callbacks[k] = Some(Box::new(rule));
        self
    }
}

impl<W: World, D: BitDomain> RuleTable<W, D> for CallbackTable<W, D> {
    fn apply(&self, world: &W, cell: usize, variable: usize, constrainer: &mut Constrainer<'_, D>) {
        if let Some(rule) = &self.callbacks[variable] {
            rule(world, cell, variable, constrainer);
        }
    }
}

/// A [`RuleTable`] backed by a precomputed compatibility matrix: entry
/// `compat[k][dir]` is the mask of neighbour values still allowed across
/// direction `dir` when the collapsing cell holds variable `k`.
///
/// `DIRS` is the number of distinct directions a cell has (4 on a square
/// grid, 6 on a hex grid, and so on); `neighbor` maps `(world, cell, dir)` to
/// the neighbouring cell id the engine should narrow.
pub struct AdjacencyTable<W, D, const DIRS: usize, N> {
    compat: Vec<[D; DIRS]>,
    neighbor: N,
    _world: std::marker::PhantomData<fn(&W)>,
}

impl<W, D, const DIRS: usize, N> AdjacencyTable<W, D, DIRS, N>
where
    D: BitDomain,
    N: Fn(&W, usize, usize) -> usize,
{
    /// Build a table from an explicit `compat[k][dir]` matrix and a
    /// neighbour function.
    pub fn new(compat: Vec<[D; DIRS]>, neighbor: N) -> Self {
        Self {
            compat,
            neighbor,
            _world: std::marker::PhantomData,
        }
    }
}

impl<W, D, const DIRS: usize, N> RuleTable<W, D> for AdjacencyTable<W, D, DIRS, N>
where
    W: World,
    D: BitDomain,
    N: Fn(&W, usize, usize) -> usize,
{
    fn apply(&self, world: &W, cell: usize, variable: usize, constrainer: &mut Constrainer<'_, D>) {
        let row = &self.compat[variable];
        for (dir, &mask) in row.iter().enumerate() {
            let neighbor = (self.neighbor)(world, cell, dir);
            constrainer.collapse(neighbor, mask);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::PropagationQueue;
    use crate::wave::Wave;

    struct Line(usize);

    impl World for Line {
        type Value = usize;

        fn size(&self) -> usize {
            self.0
        }

        fn get_value(&self, _cell: usize) -> Option<usize> {
            None
        }

        fn set_value(&mut self, _cell: usize, _value: usize) {}
    }

    #[test]
    fn callback_table_fires_registered_rule_only() {
        let world = Line(2);
        let mut wave = Wave::<u8>::new(2, 2);
        let mut queue = PropagationQueue::new(2);
        let mut constrainer = Constrainer::new(&mut wave, &mut queue);

        let table: CallbackTable<Line, u8> =
            CallbackTable::new(2).set(0, |_w: &Line, _cell, _var, c: &mut Constrainer<'_, u8>| {
                c.only(1, [1]);
            });

        table.apply(&world, 0, 0, &mut constrainer);
        assert_eq!(wave.mask(1), u8::mask_for([1]));

        table.apply(&world, 0, 1, &mut constrainer);
        // variable 1 has no registered rule: no further change beyond above.
        assert_eq!(wave.mask(1), u8::mask_for([1]));
    }

    #[test]
    fn adjacency_table_checkerboard() {
        let world = Line(3);
        let mut wave = Wave::<u8>::new(3, 2);
        let mut queue = PropagationQueue::new(3);
        let mut constrainer = Constrainer::new(&mut wave, &mut queue);

        let compat = vec![[u8::mask_for([1])], [u8::mask_for([0])]];
        let table = AdjacencyTable::new(compat, |_w: &Line, cell: usize, _dir: usize| cell + 1);

        table.apply(&world, 0, 0, &mut constrainer);
        assert_eq!(wave.mask(1), u8::mask_for([1]));
    }
}
