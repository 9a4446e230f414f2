//! Closure consistency of the clamped knots of a closed curve.
//!
//! The clamped sequence of a closed curve must read identically from both tails:
//! walking left from the origin must meet the same intervals and multiplicities
//! as walking left from the upper bound of the normalized basis, and walking right
//! from the upper bound must mirror walking right from the origin. Only the two
//! extremity knots may carry a truncated multiplicity. The cumulative multiplicity
//! from the first knot through the origin, and from the upper bound through the
//! last knot, must equal the maximum multiplicity order.

use crate::{
    error::{KnotSequenceError, KnotSequenceResult},
    knot::KnotVector,
    misc::{is_same_abscissa, FloatingPoint},
};

use super::validation::check_origin;

/// Closure check in the strictly increasing index space.
/// `origin` and `upper_bound` are the distinct indices of the normalized basis bounds.
pub(crate) fn check_strictly_increasing_closure<T: FloatingPoint>(
    order: usize,
    abscissae: &[T],
    multiplicities: &[usize],
    origin: usize,
    upper_bound: usize,
) -> KnotSequenceResult<()> {
    let last = abscissae.len() - 1;
    let cumulative_left: usize = multiplicities[..=origin].iter().sum();
    let cumulative_right: usize = multiplicities[upper_bound..].iter().sum();

    if multiplicities[0] >= order && multiplicities[last] >= order {
        check_cumulative_multiplicities(order, cumulative_left, cumulative_right)?;
        return Ok(());
    }

    check_origin(abscissae[origin])?;
    if multiplicities[origin] != multiplicities[upper_bound] {
        return Err(KnotSequenceError::LeftClosure { index: origin });
    }

    for step in 1..=origin {
        let left = origin - step;
        let mirror = upper_bound - step;
        let interval = abscissae[left + 1] - abscissae[left];
        let mirrored = abscissae[mirror + 1] - abscissae[mirror];
        let same_multiplicity = if left == 0 {
            multiplicities[left] <= multiplicities[mirror]
        } else {
            multiplicities[left] == multiplicities[mirror]
        };
        if !is_same_abscissa(interval, mirrored) || !same_multiplicity {
            return Err(KnotSequenceError::LeftClosure { index: left });
        }
    }
    if cumulative_left != order {
        return Err(KnotSequenceError::FirstKnotMultiplicity {
            cumulative: cumulative_left,
            order,
        });
    }

    for step in 1..=(last - upper_bound) {
        let right = upper_bound + step;
        let mirror = origin + step;
        let interval = abscissae[right] - abscissae[right - 1];
        let mirrored = abscissae[mirror] - abscissae[mirror - 1];
        let same_multiplicity = if right == last {
            multiplicities[right] <= multiplicities[mirror]
        } else {
            multiplicities[right] == multiplicities[mirror]
        };
        if !is_same_abscissa(interval, mirrored) || !same_multiplicity {
            return Err(KnotSequenceError::RightClosure { index: right });
        }
    }
    if cumulative_right != order {
        return Err(KnotSequenceError::LastKnotMultiplicity {
            cumulative: cumulative_right,
            order,
        });
    }

    Ok(())
}

/// Closure check in the increasing (flat) index space.
/// `origin` and `upper_bound` are the flat indices of the first repetition of the
/// normalized basis bounds. Repeated knots show up as null distances, so comparing
/// distances to the bound also compares multiplicities.
pub(crate) fn check_increasing_closure<T: FloatingPoint>(
    order: usize,
    knots: &KnotVector<T>,
    origin: usize,
    upper_bound: usize,
) -> KnotSequenceResult<()> {
    let n = knots.len();
    let origin_last = last_repetition(knots, origin);
    let upper_bound_last = last_repetition(knots, upper_bound);
    let cumulative_left = origin_last + 1;
    let cumulative_right = n - upper_bound;

    if knots.is_clamped(order - 1) {
        check_cumulative_multiplicities(order, cumulative_left, cumulative_right)?;
        return Ok(());
    }

    check_origin(knots[origin])?;
    if origin_last - origin != upper_bound_last - upper_bound {
        return Err(KnotSequenceError::LeftClosure { index: origin });
    }

    for step in 1..=origin {
        let left = origin - step;
        let mirror = upper_bound - step;
        if !is_same_abscissa(
            knots[origin] - knots[left],
            knots[upper_bound] - knots[mirror],
        ) {
            return Err(KnotSequenceError::LeftClosure { index: left });
        }
    }
    if cumulative_left != order {
        return Err(KnotSequenceError::FirstKnotMultiplicity {
            cumulative: cumulative_left,
            order,
        });
    }

    for step in 1..(n - upper_bound_last) {
        let right = upper_bound_last + step;
        let mirror = origin_last + step;
        if !is_same_abscissa(
            knots[right] - knots[upper_bound_last],
            knots[mirror] - knots[origin_last],
        ) {
            return Err(KnotSequenceError::RightClosure { index: right });
        }
    }
    if cumulative_right != order {
        return Err(KnotSequenceError::LastKnotMultiplicity {
            cumulative: cumulative_right,
            order,
        });
    }

    Ok(())
}

fn check_cumulative_multiplicities(
    order: usize,
    cumulative_left: usize,
    cumulative_right: usize,
) -> KnotSequenceResult<()> {
    if cumulative_left != order {
        return Err(KnotSequenceError::FirstKnotMultiplicity {
            cumulative: cumulative_left,
            order,
        });
    }
    if cumulative_right != order {
        return Err(KnotSequenceError::LastKnotMultiplicity {
            cumulative: cumulative_right,
            order,
        });
    }
    Ok(())
}

/// Flat index of the last repetition of the knot starting at `first`
pub(crate) fn last_repetition<T: FloatingPoint>(knots: &KnotVector<T>, first: usize) -> usize {
    let mut last = first;
    while last + 1 < knots.len() && is_same_abscissa(knots[last + 1], knots[first]) {
        last += 1;
    }
    last
}
