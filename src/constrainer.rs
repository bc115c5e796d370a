//! The sole mutator exposed to rule functions.
//!
//! A `Constrainer` wraps a wave and a queue and applies the three named
//! operations from the data model (`exclude`, `only`, `include`), plus the
//! raw `collapse` an adjacency rule needs. Every operation follows the same
//! observed-transition protocol: note whether the cell was collapsed before
//! the mutation, and push it onto the queue only if the mutation just
//! collapsed it. Transitions into contradiction are never queued — the
//! solver's main loop finds those by scanning the wave after propagation.

use crate::bitdomain::BitDomain;
use crate::queue::PropagationQueue;
use crate::wave::Wave;

/// Mutates a wave on behalf of a rule, queueing newly collapsed cells.
pub struct Constrainer<'a, D: BitDomain> {
    wave: &'a mut Wave<D>,
    queue: &'a mut PropagationQueue,
}

impl<'a, D: BitDomain> Constrainer<'a, D> {
    pub(crate) fn new(wave: &'a mut Wave<D>, queue: &'a mut PropagationQueue) -> Self {
        Self { wave, queue }
    }

    fn push_if_newly_collapsed(&mut self, cell: usize, was_collapsed: bool) {
        if !was_collapsed && self.wave.is_collapsed(cell) {
            self.queue.push(cell);
        }
    }

    /// Remove `values` from `cell`'s domain: `wave.collapse(cell, ~mask_for(values))`.
    pub fn exclude(&mut self, cell: usize, values: impl IntoIterator<Item = usize>) {
        let was_collapsed = self.wave.is_collapsed(cell);
        let mask = D::mask_for(values).not();
        self.wave.collapse(cell, mask);
        self.push_if_newly_collapsed(cell, was_collapsed);
    }

    /// Restrict `cell`'s domain to exactly `values`: `wave.collapse(cell, mask_for(values))`.
    pub fn only(&mut self, cell: usize, values: impl IntoIterator<Item = usize>) {
        let was_collapsed = self.wave.is_collapsed(cell);
        let mask = D::mask_for(values);
        self.wave.collapse(cell, mask);
        self.push_if_newly_collapsed(cell, was_collapsed);
    }

    /// Add `values` back to `cell`'s domain, unless `cell` is already
    /// collapsed (a no-op in that case, preserved exactly as the data model
    /// specifies since it is load-bearing for rules that first exclude
    /// broadly and then re-include around already-decided cells).
    pub fn include(&mut self, cell: usize, values: impl IntoIterator<Item = usize>) {
        if self.wave.is_collapsed(cell) {
            return;
        }
        let mask = D::mask_for(values);
        self.wave.enable(cell, mask);
        self.push_if_newly_collapsed(cell, false);
    }

    /// Intersect `cell`'s domain with a raw mask. The primitive an
    /// [`crate::rules::AdjacencyTable`] narrows neighbours with directly.
    pub fn collapse(&mut self, cell: usize, mask: D) {
        let was_collapsed = self.wave.is_collapsed(cell);
        self.wave.collapse(cell, mask);
        self.push_if_newly_collapsed(cell, was_collapsed);
    }
}
