pub mod knot_index;
pub mod knot_vector;
pub use knot_index::*;
pub use knot_vector::*;

/// A knot of a B-spline basis: an abscissa repeated `multiplicity` times.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Knot<T> {
    abscissa: T,
    multiplicity: usize,
}

impl<T: Copy> Knot<T> {
    pub fn new(abscissa: T, multiplicity: usize) -> Self {
        Self {
            abscissa,
            multiplicity,
        }
    }

    pub fn abscissa(&self) -> T {
        self.abscissa
    }

    pub fn multiplicity(&self) -> usize {
        self.multiplicity
    }
}
