//! The solve loop: seed, propagate, and branch-with-backtracking until the
//! wave is fully collapsed or every branch has been exhausted.

use anyhow::{bail, Result};

use crate::arena::Arena;
use crate::bitdomain::BitDomain;
use crate::constrainer::Constrainer;
use crate::events::{SolverEvents, SolverView};
use crate::queue::PropagationQueue;
use crate::rules::RuleTable;
use crate::selector::Selector;
use crate::varmap::VariableMap;
use crate::wave::Wave;
use crate::world::World;

/// Propagation/branch steps allowed before a solve is abandoned as
/// non-terminating, matching the reference implementation's default.
pub const DEFAULT_MAX_ITERATIONS: usize = 16_384;

/// Drives a solve over a [`World`] of `D`-wide domains, narrowing with a
/// [`RuleTable`] and translating values through a [`VariableMap`].
///
/// Built once per `(varmap, rules, selector)` combination and reusable across
/// repeated `run` calls; each call starts from a fresh wave.
pub struct Solver<W, M, R, S, D>
where
    W: World,
    M: VariableMap<Value = W::Value>,
    R: RuleTable<W, D>,
    S: Selector,
    D: BitDomain,
{
    varmap: M,
    rules: R,
    selector: S,
    #[allow(clippy::type_complexity)]
    initial_state_rule: Option<Box<dyn Fn(&W, &mut Constrainer<'_, D>, &mut S)>>,
    events: Option<Box<dyn SolverEvents<W, D>>>,
    max_iterations: usize,
    arena: Arena,
}

impl<W, M, R, S, D> Solver<W, M, R, S, D>
where
    W: World,
    M: VariableMap<Value = W::Value>,
    R: RuleTable<W, D>,
    S: Selector,
    D: BitDomain,
{
    /// Build a solver narrowing with `rules`, translating values through
    /// `varmap`, and drawing branch guesses from `selector`.
    pub fn new(varmap: M, rules: R, selector: S) -> Self {
        Self {
            varmap,
            rules,
            selector,
            initial_state_rule: None,
            events: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            arena: Arena::new(),
        }
    }

    /// Run once more before propagation begins, to further constrain or
    /// force values beyond what `world.get_value` already supplies. Any cell
    /// the rule collapses is queued for propagation.
    #[must_use]
    pub fn with_initial_state_rule(
        mut self,
        rule: impl Fn(&W, &mut Constrainer<'_, D>, &mut S) + 'static,
    ) -> Self {
        self.initial_state_rule = Some(Box::new(rule));
        self
    }

    /// Report progress through `events` during the solve.
    #[must_use]
    pub fn with_events(mut self, events: impl SolverEvents<W, D> + 'static) -> Self {
        self.events = Some(Box::new(events));
        self
    }

    /// Override [`DEFAULT_MAX_ITERATIONS`].
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Solve `world` in place. On success every cell holds its collapsed
    /// value; on failure `world`'s contents are left unspecified (callers
    /// should not rely on what was written).
    pub fn run(&mut self, world: &mut W) -> Result<()> {
        let n = world.size();
        let v = self.varmap.size();
        let mut wave = Wave::new(n, v);
        let mut queue = PropagationQueue::new(n);

        for cell in 0..n {
            if let Some(value) = world.get_value(cell) {
                if let Some(k) = self.varmap.index_of(&value) {
                    let mut constrainer = Constrainer::new(&mut wave, &mut queue);
                    constrainer.only(cell, [k]);
                }
            }
        }

        if let Some(rule) = self.initial_state_rule.take() {
            {
                let mut constrainer = Constrainer::new(&mut wave, &mut queue);
                rule(world, &mut constrainer, &mut self.selector);
            }
            self.initial_state_rule = Some(rule);
        }

        let mut iterations = 0usize;
        let solved = Self::main_loop(
            &self.rules,
            &self.varmap,
            &self.arena,
            &mut self.selector,
            self.events.as_deref_mut(),
            self.max_iterations,
            &mut iterations,
            world,
            &mut wave,
            &mut queue,
            0,
        )?;

        if !solved {
            bail!("wfc: exhausted backtracking without finding a solution");
        }

        Self::sync_world(&self.varmap, world, &wave);
        Ok(())
    }

    /// Write every non-contradicted cell's current value (the lowest set bit
    /// of its domain, which is its only possible value once collapsed) back
    /// into `world`.
    fn sync_world(varmap: &M, world: &mut W, wave: &Wave<D>) {
        for cell in 0..wave.len() {
            if !wave.is_contradicted(cell) {
                let k = wave.variable_id(cell) as usize;
                world.set_value(cell, varmap.value_of(k));
            }
        }
    }

    /// Drain `queue`, invoking `rules` for each popped cell, then check the
    /// drained wave for contradiction or full collapse; branch if neither
    /// holds.
    ///
    /// A free associated function rather than a `&mut self` method: the
    /// recursive branch-and-backtrack search holds a live borrow of the
    /// arena-allocated candidate pool across these calls, which a `&mut
    /// self` receiver would conflict with even though the pool only
    /// actually touches the `arena` field.
    #[allow(clippy::too_many_arguments)]
    fn main_loop(
        rules: &R,
        varmap: &M,
        arena: &Arena,
        selector: &mut S,
        mut events: Option<&mut dyn SolverEvents<W, D>>,
        max_iterations: usize,
        iterations: &mut usize,
        world: &mut W,
        wave: &mut Wave<D>,
        queue: &mut PropagationQueue,
        depth: usize,
    ) -> Result<bool> {
        *iterations += 1;
        if *iterations > max_iterations {
            bail!("wfc: exceeded max_iterations");
        }

        while let Some(cell) = queue.pop() {
            if wave.is_contradicted(cell) {
                Self::sync_world(varmap, world, wave);
                if let Some(events) = events.as_deref_mut() {
                    events.on_contradiction(&SolverView { world: &*world, wave: &*wave });
                }
                return Ok(false);
            }

            let variable = wave.variable_id(cell) as usize;
            {
                let mut constrainer = Constrainer::new(wave, queue);
                rules.apply(&*world, cell, variable, &mut constrainer);
            }

            if let Some(events) = events.as_deref_mut() {
                Self::sync_world(varmap, world, wave);
                events.on_cell_collapsed(&SolverView { world: &*world, wave: &*wave });
            }
        }

        if wave.has_contradiction() {
            Self::sync_world(varmap, world, wave);
            if let Some(events) = events.as_deref_mut() {
                events.on_contradiction(&SolverView { world: &*world, wave: &*wave });
            }
            return Ok(false);
        }

        if wave.is_fully_collapsed() {
            return Ok(true);
        }

        if let Some(events) = events.as_deref_mut() {
            Self::sync_world(varmap, world, wave);
            events.on_branch(&SolverView { world: &*world, wave: &*wave });
        }

        Self::branch(
            rules,
            varmap,
            arena,
            selector,
            events,
            max_iterations,
            iterations,
            world,
            wave,
            queue,
            depth,
        )
    }

    /// The uncollapsed cell with the fewest remaining candidate values
    /// (ascending cell id breaking ties), or `None` once none remain.
    fn lowest_entropy_cell(wave: &Wave<D>) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for cell in 0..wave.len() {
            let entropy = wave.entropy(cell);
            if entropy <= 1 {
                continue;
            }
            if best.is_none_or(|(_, best_e)| entropy < best_e) {
                best = Some((cell, entropy));
            }
        }
        best.map(|(cell, _)| cell)
    }

    /// Guess values for the lowest-entropy open cell, recursing into
    /// [`Self::main_loop`] after each guess, backtracking on failure.
    #[allow(clippy::too_many_arguments)]
    fn branch(
        rules: &R,
        varmap: &M,
        arena: &Arena,
        selector: &mut S,
        mut events: Option<&mut dyn SolverEvents<W, D>>,
        max_iterations: usize,
        iterations: &mut usize,
        world: &mut W,
        wave: &mut Wave<D>,
        queue: &mut PropagationQueue,
        depth: usize,
    ) -> Result<bool> {
        let Some(cell) = Self::lowest_entropy_cell(wave) else {
            return Ok(false);
        };

        let candidates = wave.mask(cell).ones();
        let _frame = arena.frame();
        let pool = arena.alloc_slice_copy(&candidates);
        let mut e = pool.len();

        while e > 0 {
            let i = selector.pick(e);
            let v = pool[i];

            let mut clone = wave.clone();
            let solved = {
                let mut checkpoint = queue.checkpoint();
                {
                    let mut constrainer = Constrainer::new(&mut clone, &mut checkpoint);
                    constrainer.only(cell, [v]);
                }
                let solved = Self::main_loop(
                    rules,
                    varmap,
                    arena,
                    selector,
                    events.as_deref_mut(),
                    max_iterations,
                    iterations,
                    world,
                    &mut clone,
                    &mut checkpoint,
                    depth + 1,
                )?;
                if solved {
                    checkpoint.commit();
                }
                solved
            };

            if solved {
                *wave = clone;
                return Ok(true);
            }

            let mut constrainer = Constrainer::new(wave, queue);
            constrainer.exclude(cell, [v]);

            pool.swap(i, e - 1);
            e -= 1;
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::AdjacencyTable;
    use crate::selector::LcgSelector;
    use crate::varmap::EnumMap;

    struct Line {
        values: Vec<Option<&'static str>>,
    }

    impl Line {
        fn new(n: usize) -> Self {
            Self {
                values: vec![None; n],
            }
        }

        fn with_seed(n: usize, cell: usize, value: &'static str) -> Self {
            let mut w = Self::new(n);
            w.values[cell] = Some(value);
            w
        }
    }

    impl World for Line {
        type Value = &'static str;

        fn size(&self) -> usize {
            self.values.len()
        }

        fn get_value(&self, cell: usize) -> Option<&'static str> {
            self.values[cell]
        }

        fn set_value(&mut self, cell: usize, value: &'static str) {
            self.values[cell] = Some(value);
        }
    }

    fn checkerboard_rules() -> AdjacencyTable<Line, u8, 2, impl Fn(&Line, usize, usize) -> usize> {
        let black = u8::mask_for([1]);
        let white = u8::mask_for([0]);
        let compat = vec![[white, white], [black, black]];
        // Wraps around so every cell has two distinct neighbours; avoids the
        // self-loop edge case (tolerated by the engine, but not a 2-colouring
        // a straight line can satisfy at its own boundary).
        AdjacencyTable::new(compat, |world: &Line, cell: usize, dir: usize| {
            let n = world.size();
            if dir == 0 {
                (cell + n - 1) % n
            } else {
                (cell + 1) % n
            }
        })
    }

    #[test]
    fn solves_a_two_colour_line() {
        let mut world = Line::with_seed(4, 0, "black");
        let varmap = EnumMap::new(vec!["black", "white"]);
        let rules = checkerboard_rules();
        let selector = LcgSelector::new(1);
        let mut solver = Solver::new(varmap, rules, selector);

        solver.run(&mut world).unwrap();
        for cell in 0..4 {
            let expected = if cell % 2 == 0 { "black" } else { "white" };
            assert_eq!(world.get_value(cell), Some(expected));
        }
    }

    #[test]
    fn detects_unsatisfiable_constraints() {
        // Forcing both ends of a two-cell ring to "black" is inconsistent
        // with the checkerboard rule linking them.
        let mut world = Line::new(2);
        world.set_value(0, "black");
        world.set_value(1, "black");
        let varmap = EnumMap::new(vec!["black", "white"]);
        let rules = checkerboard_rules();
        let selector = LcgSelector::new(2);
        let mut solver = Solver::new(varmap, rules, selector);

        assert!(solver.run(&mut world).is_err());
    }

    #[test]
    fn branches_without_any_fixed_cells() {
        let mut world = Line::new(6);
        let varmap = EnumMap::new(vec!["black", "white"]);
        let rules = checkerboard_rules();
        let selector = LcgSelector::new(99);
        let mut solver = Solver::new(varmap, rules, selector);

        solver.run(&mut world).unwrap();
        for cell in 1..6 {
            assert_ne!(world.get_value(cell - 1), world.get_value(cell));
        }
    }

    struct NoRules;
    impl RuleTable<Line, u8> for NoRules {
        fn apply(&self, _world: &Line, _cell: usize, _variable: usize, _constrainer: &mut Constrainer<'_, u8>) {}
    }

    #[test]
    fn trivial_single_cell_single_value_always_solves() {
        let mut world = Line::new(1);
        let varmap = EnumMap::new(vec!["only"]);
        let selector = LcgSelector::new(7);
        let mut solver = Solver::new(varmap, NoRules, selector);

        solver.run(&mut world).unwrap();
        assert_eq!(world.get_value(0), Some("only"));
    }

    #[test]
    fn events_fire_during_a_branching_solve() {
        struct Counters {
            branches: usize,
            contradictions: usize,
        }
        impl SolverEvents<Line, u8> for Counters {
            fn on_branch(&mut self, _view: &SolverView<'_, Line, u8>) {
                self.branches += 1;
            }
            fn on_contradiction(&mut self, _view: &SolverView<'_, Line, u8>) {
                self.contradictions += 1;
            }
        }

        let mut world = Line::new(6);
        let varmap = EnumMap::new(vec!["black", "white"]);
        let rules = checkerboard_rules();
        let selector = LcgSelector::new(123);
        let mut solver = Solver::new(varmap, rules, selector).with_events(Counters {
            branches: 0,
            contradictions: 0,
        });

        solver.run(&mut world).unwrap();
    }
}
