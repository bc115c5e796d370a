//! The wave: one bit domain per cell, plus the queries the solver loop needs
//! to detect collapse and contradiction.

use crate::bitdomain::BitDomain;

/// A sequence of `N` bit domains, one per cell.
///
/// Indexing follows the [`crate::world::World`] the solver is working over;
/// `Wave` itself knows nothing about coordinates or adjacency. Cheaply
/// `Clone`-able: cloning is a single contiguous copy of `Copy` elements,
/// which is what the branch-per-guess search clones on every recursive call.
#[derive(Clone, Debug)]
pub struct Wave<D: BitDomain> {
    domains: Vec<D>,
}

impl<D: BitDomain> Wave<D> {
    /// A wave of `n` cells, every domain set to `D::full(values)`.
    pub fn new(n: usize, values: usize) -> Self {
        Self {
            domains: vec![D::full(values); n],
        }
    }

    /// Number of cells, `N`.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Whether there are no cells at all.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// The raw domain currently held for `cell`.
    pub fn mask(&self, cell: usize) -> D {
        self.domains[cell]
    }

    /// `popcount` of `cell`'s domain: how many values are still possible.
    pub fn entropy(&self, cell: usize) -> u32 {
        self.domains[cell].popcount()
    }

    /// Whether `cell` has exactly one possible value left.
    pub fn is_collapsed(&self, cell: usize) -> bool {
        self.entropy(cell) == 1
    }

    /// Whether `cell` has no possible values left.
    pub fn is_contradicted(&self, cell: usize) -> bool {
        self.domains[cell].is_empty()
    }

    /// The variable index `cell` is collapsed to. Only meaningful when
    /// [`Wave::is_collapsed`] holds for `cell`.
    pub fn variable_id(&self, cell: usize) -> u32 {
        self.domains[cell].countr_zero()
    }

    /// Whether every cell's entropy is exactly one.
    pub fn is_fully_collapsed(&self) -> bool {
        self.domains.iter().all(|d| d.popcount() == 1)
    }

    /// Whether any cell's domain is empty.
    pub fn has_contradiction(&self) -> bool {
        self.domains.iter().any(BitDomain::is_empty)
    }

    /// Intersect `cell`'s domain with `mask` (narrowing).
    pub fn collapse(&mut self, cell: usize, mask: D) {
        self.domains[cell] = self.domains[cell].and(&mask);
    }

    /// Union `cell`'s domain with `mask` (widening).
    ///
    /// Callers are responsible for the "only legal on a not-yet-collapsed
    /// cell" rule from the data model; `Wave` itself applies the mask
    /// unconditionally, the same way `collapse` does.
    pub fn enable(&mut self, cell: usize, mask: D) {
        self.domains[cell] = self.domains[cell].or(&mask);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_wave_with_one_value_starts_fully_collapsed() {
        let wave = Wave::<u8>::new(4, 1);
        assert!(wave.is_fully_collapsed());
        assert_eq!(wave.variable_id(0), 0);
    }

    #[test]
    fn new_wave_with_many_values_starts_uncollapsed() {
        let wave = Wave::<u8>::new(4, 3);
        assert!(!wave.is_fully_collapsed());
        assert_eq!(wave.entropy(0), 3);
    }

    #[test]
    fn collapse_narrows_and_enable_widens() {
        let mut wave = Wave::<u8>::new(1, 3);
        wave.collapse(0, u8::mask_for([0, 1]));
        assert_eq!(wave.entropy(0), 2);
        wave.collapse(0, u8::mask_for([1]));
        assert!(wave.is_collapsed(0));
        assert_eq!(wave.variable_id(0), 1);

        let mut wave = Wave::<u8>::new(1, 3);
        wave.collapse(0, u8::mask_for([0]));
        wave.enable(0, u8::mask_for([2]));
        assert_eq!(wave.mask(0), u8::mask_for([0, 2]));
    }

    #[test]
    fn collapse_to_empty_is_a_contradiction() {
        let mut wave = Wave::<u8>::new(1, 3);
        wave.collapse(0, u8::empty());
        assert!(wave.is_contradicted(0));
        assert!(wave.has_contradiction());
    }
}
