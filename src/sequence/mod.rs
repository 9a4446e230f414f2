mod closure;
pub mod configuration;
pub mod conversion;
pub mod extraction;
pub mod increasing_open_knot_sequence;
pub mod increasing_periodic_knot_sequence;
pub mod periodic_expansion;
pub mod strictly_increasing_open_knot_sequence;
pub mod strictly_increasing_periodic_knot_sequence;
mod validation;

pub use configuration::*;
pub use conversion::{to_increasing_index, to_strictly_increasing_index};
pub use extraction::*;
pub use increasing_open_knot_sequence::*;
pub use increasing_periodic_knot_sequence::*;
pub use periodic_expansion::*;
pub use strictly_increasing_open_knot_sequence::StrictlyIncreasingOpenKnotSequenceClosedCurve;
pub use strictly_increasing_periodic_knot_sequence::StrictlyIncreasingPeriodicKnotSequence;
pub use validation::MIN_MAX_MULTIPLICITY_ORDER;

#[cfg(test)]
mod tests;
