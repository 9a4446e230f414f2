//! Conversions between the increasing and strictly increasing representations,
//! and between the periodic and open forms.

use crate::{error::KnotSequenceError, knot::KnotVector, misc::FloatingPoint};

use super::{
    IncreasingOpenKnotSequenceClosedCurve, IncreasingPeriodicKnotSequence,
    StrictlyIncreasingOpenKnotSequenceClosedCurve, StrictlyIncreasingPeriodicKnotSequence,
};

/// Flat index of the first repetition of the distinct knot at `index`
///
/// # Example
/// ```
/// use closed_knots::prelude::*;
/// assert_eq!(to_increasing_index(&[2, 1, 3], 2), Some(3));
/// assert_eq!(to_increasing_index(&[2, 1, 3], 3), None);
/// ```
pub fn to_increasing_index(multiplicities: &[usize], index: usize) -> Option<usize> {
    (index < multiplicities.len()).then(|| multiplicities[..index].iter().sum())
}

/// Distinct index of the knot repeated at the flat position `index`
///
/// # Example
/// ```
/// use closed_knots::prelude::*;
/// assert_eq!(to_strictly_increasing_index(&[2, 1, 3], 4), Some(2));
/// assert_eq!(to_strictly_increasing_index(&[2, 1, 3], 6), None);
/// ```
pub fn to_strictly_increasing_index(multiplicities: &[usize], index: usize) -> Option<usize> {
    let mut cumulative = 0;
    multiplicities.iter().position(|m| {
        cumulative += m;
        index < cumulative
    })
}

impl<T: FloatingPoint> From<&IncreasingPeriodicKnotSequence<T>>
    for StrictlyIncreasingPeriodicKnotSequence<T>
{
    fn from(value: &IncreasingPeriodicKnotSequence<T>) -> Self {
        let (abscissae, multiplicities) = value.knots().run_length_encode();
        Self::from_parts_unchecked(value.max_multiplicity_order(), abscissae, multiplicities)
    }
}

impl<T: FloatingPoint> From<StrictlyIncreasingPeriodicKnotSequence<T>>
    for IncreasingPeriodicKnotSequence<T>
{
    fn from(value: StrictlyIncreasingPeriodicKnotSequence<T>) -> Self {
        Self::from(&value)
    }
}

impl<T: FloatingPoint> From<&StrictlyIncreasingPeriodicKnotSequence<T>>
    for IncreasingPeriodicKnotSequence<T>
{
    fn from(value: &StrictlyIncreasingPeriodicKnotSequence<T>) -> Self {
        let knots = KnotVector::from_multiplicities(value.abscissae(), &value.multiplicities());
        Self::from_parts_unchecked(value.max_multiplicity_order(), knots)
    }
}

impl<T: FloatingPoint> From<&IncreasingOpenKnotSequenceClosedCurve<T>>
    for StrictlyIncreasingOpenKnotSequenceClosedCurve<T>
{
    fn from(value: &IncreasingOpenKnotSequenceClosedCurve<T>) -> Self {
        Self::from_parts_unchecked(value.parts())
    }
}

impl<T: FloatingPoint> From<StrictlyIncreasingOpenKnotSequenceClosedCurve<T>>
    for IncreasingOpenKnotSequenceClosedCurve<T>
{
    fn from(value: StrictlyIncreasingOpenKnotSequenceClosedCurve<T>) -> Self {
        Self::from(&value)
    }
}

impl<T: FloatingPoint> From<&StrictlyIncreasingOpenKnotSequenceClosedCurve<T>>
    for IncreasingOpenKnotSequenceClosedCurve<T>
{
    fn from(value: &StrictlyIncreasingOpenKnotSequenceClosedCurve<T>) -> Self {
        Self::from_parts_unchecked(value.parts())
    }
}

impl<T: FloatingPoint> TryFrom<&StrictlyIncreasingPeriodicKnotSequence<T>>
    for StrictlyIncreasingOpenKnotSequenceClosedCurve<T>
{
    type Error = KnotSequenceError;

    fn try_from(value: &StrictlyIncreasingPeriodicKnotSequence<T>) -> Result<Self, Self::Error> {
        Self::try_from_periodic(value, false)
    }
}

impl<T: FloatingPoint> TryFrom<&IncreasingPeriodicKnotSequence<T>>
    for IncreasingOpenKnotSequenceClosedCurve<T>
{
    type Error = KnotSequenceError;

    fn try_from(value: &IncreasingPeriodicKnotSequence<T>) -> Result<Self, Self::Error> {
        Self::try_from_periodic(value, false)
    }
}
