use itertools::Itertools;

use crate::{
    error::{KnotSequenceError, KnotSequenceResult},
    misc::{is_same_abscissa, knot_tolerance, to_f64, FloatingPoint},
};

/// Lowest maximum multiplicity order accepted by every sequence form
pub const MIN_MAX_MULTIPLICITY_ORDER: usize = 1;

pub(crate) fn check_max_multiplicity_order(order: usize) -> KnotSequenceResult<()> {
    if order < MIN_MAX_MULTIPLICITY_ORDER {
        return Err(KnotSequenceError::MultiplicityOrder {
            order,
            reason: format!("must be at least {}", MIN_MAX_MULTIPLICITY_ORDER),
        });
    }
    Ok(())
}

/// Cumulative multiplicity one period must reach to support a basis of `order`
pub(crate) fn minimal_cumulative_multiplicity(order: usize) -> usize {
    if order == 1 {
        order + 1
    } else {
        order
    }
}

/// Number of spans of the smallest uniform period supporting a basis of `order`
pub(crate) fn minimal_basis_size(order: usize) -> usize {
    minimal_cumulative_multiplicity(order) - 1
}

pub(crate) fn check_basis_size(order: usize, cumulative: usize) -> KnotSequenceResult<()> {
    if cumulative < minimal_cumulative_multiplicity(order) {
        return Err(KnotSequenceError::InsufficientBasisSize { cumulative, order });
    }
    Ok(())
}

/// Structural checks of a run-length encoded sequence
pub(crate) fn check_strictly_increasing_knots<T: FloatingPoint>(
    abscissae: &[T],
    multiplicities: &[usize],
) -> KnotSequenceResult<()> {
    if abscissae.is_empty() {
        return Err(KnotSequenceError::EmptySequence);
    }
    if abscissae.len() != multiplicities.len() {
        return Err(KnotSequenceError::LengthMismatch {
            abscissae: abscissae.len(),
            multiplicities: multiplicities.len(),
        });
    }
    if let Some(index) = multiplicities.iter().position(|m| *m == 0) {
        return Err(KnotSequenceError::ZeroMultiplicity { index });
    }
    if let Some((index, _)) = abscissae
        .iter()
        .tuple_windows()
        .find_position(|(a, b)| **b - **a <= knot_tolerance())
    {
        return Err(KnotSequenceError::NonStrictlyIncreasing { index: index + 1 });
    }
    Ok(())
}

/// Structural checks of a flat sequence
pub(crate) fn check_increasing_knots<T: FloatingPoint>(knots: &[T]) -> KnotSequenceResult<()> {
    if knots.is_empty() {
        return Err(KnotSequenceError::EmptySequence);
    }
    if let Some((index, _)) = knots
        .iter()
        .tuple_windows()
        .find_position(|(a, b)| **b < **a && !is_same_abscissa(**a, **b))
    {
        return Err(KnotSequenceError::NonIncreasing { index: index + 1 });
    }
    Ok(())
}

pub(crate) fn check_origin<T: FloatingPoint>(abscissa: T) -> KnotSequenceResult<()> {
    if !is_same_abscissa(abscissa, T::zero()) {
        return Err(KnotSequenceError::Origin {
            abscissa: to_f64(abscissa),
        });
    }
    Ok(())
}

/// Every knot must stay under the maximum multiplicity order
pub(crate) fn check_multiplicities_under_order(
    order: usize,
    multiplicities: &[usize],
) -> KnotSequenceResult<()> {
    if let Some((index, m)) = multiplicities.iter().find_position(|m| **m > order) {
        return Err(KnotSequenceError::MultiplicityOrder {
            order,
            reason: format!("knot at index {} has multiplicity {}", index, m),
        });
    }
    Ok(())
}

/// Maximum multiplicity of a knot strictly inside the normalized basis window
/// A basis of order 1 has no continuity to lose, so its interior knots are simple knots.
pub(crate) fn intermediate_multiplicity_cap(order: usize, up_to_c0_discontinuity: bool) -> usize {
    if up_to_c0_discontinuity || order == 1 {
        order
    } else {
        order - 1
    }
}

/// Check the multiplicity of every knot except the two bounds of the normalized basis
pub(crate) fn check_intermediate_multiplicities(
    order: usize,
    up_to_c0_discontinuity: bool,
    multiplicities: &[usize],
    bounds: (usize, usize),
) -> KnotSequenceResult<()> {
    let maximum = intermediate_multiplicity_cap(order, up_to_c0_discontinuity);
    match multiplicities
        .iter()
        .enumerate()
        .find(|(i, m)| *i != bounds.0 && *i != bounds.1 && **m > maximum)
    {
        Some((index, multiplicity)) => Err(KnotSequenceError::IntermediateMultiplicity {
            index,
            multiplicity: *multiplicity,
            maximum,
        }),
        None => Ok(()),
    }
}

/// Check if consecutive distinct abscissae are evenly spaced
pub(crate) fn is_spacing_uniform<T: FloatingPoint>(abscissae: &[T]) -> bool {
    abscissae
        .iter()
        .tuple_windows()
        .map(|(a, b)| *b - *a)
        .tuple_windows()
        .all(|(d0, d1)| is_same_abscissa(d0, d1))
}

pub(crate) fn is_multiplicity_uniform(multiplicities: &[usize]) -> bool {
    multiplicities.iter().all_equal()
}
