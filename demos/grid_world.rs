//! A minimal rectangular grid [`World`], shared by the demo binaries.
//!
//! Backed by `ndarray::Array2`, the teacher's own convention for the board
//! it solves over.

use ndarray::Array2;
use wfc_solver::World;

/// A `width x height` grid of optional values, indexed row-major.
pub struct GridWorld<V> {
    values: Array2<Option<V>>,
}

impl<V: Clone> GridWorld<V> {
    /// An empty `width x height` grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            values: Array2::from_elem((height, width), None),
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.values.nrows()
    }

    /// The `(x, y)` coordinate of a row-major cell id.
    pub fn coord_of(&self, cell: usize) -> (usize, usize) {
        (cell % self.width(), cell / self.width())
    }

    /// The row-major cell id of an `(x, y)` coordinate.
    pub fn id_of(&self, x: usize, y: usize) -> usize {
        y * self.width() + x
    }

    /// The neighbouring cell across `dir` (`0` = west, `1` = east, `2` =
    /// north, `3` = south), wrapping at the grid's edges so every cell has
    /// four distinct neighbours.
    pub fn neighbor(&self, cell: usize, dir: usize) -> usize {
        let (x, y) = self.coord_of(cell);
        let (w, h) = (self.width(), self.height());
        let (nx, ny) = match dir {
            0 => ((x + w - 1) % w, y),
            1 => ((x + 1) % w, y),
            2 => (x, (y + h - 1) % h),
            _ => (x, (y + 1) % h),
        };
        self.id_of(nx, ny)
    }
}

impl<V: Clone> World for GridWorld<V> {
    type Value = V;

    fn size(&self) -> usize {
        self.values.len()
    }

    fn get_value(&self, cell: usize) -> Option<V> {
        let (x, y) = self.coord_of(cell);
        self.values[(y, x)].clone()
    }

    fn set_value(&mut self, cell: usize, value: V) {
        let (x, y) = self.coord_of(cell);
        self.values[(y, x)] = Some(value);
    }
}
