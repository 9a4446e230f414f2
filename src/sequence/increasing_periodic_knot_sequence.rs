use crate::{
    error::{KnotSequenceError, KnotSequenceResult},
    knot::{Knot, KnotIndexIncreasing, KnotIndexStrictlyIncreasing, KnotVector},
    misc::{is_same_abscissa, knot_tolerance, to_f64, FloatingPoint, Invertible},
};

use super::{
    conversion::{to_increasing_index, to_strictly_increasing_index},
    strictly_increasing_periodic_knot_sequence::wrap_into_period,
    validation::{check_increasing_knots, check_max_multiplicity_order},
    StrictlyIncreasingPeriodicKnotSequence,
};

/// One period of the knots of a closed curve, one entry per unit of multiplicity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IncreasingPeriodicKnotSequence<T> {
    max_multiplicity_order: usize,
    knots: KnotVector<T>,
}

impl<T: FloatingPoint> IncreasingPeriodicKnotSequence<T> {
    /// Create a periodic sequence from a flat array of abscissae
    /// A repeated abscissa stands for a multiple knot.
    ///
    /// # Example
    /// ```
    /// use closed_knots::prelude::*;
    /// let periodic = IncreasingPeriodicKnotSequence::try_new(3, vec![0., 1., 1., 2.]).unwrap();
    /// assert_eq!(periodic.multiplicities(), vec![1, 2, 1]);
    /// ```
    pub fn try_new(max_multiplicity_order: usize, knots: Vec<T>) -> KnotSequenceResult<Self> {
        check_max_multiplicity_order(max_multiplicity_order)?;
        check_increasing_knots(&knots)?;
        let knots = KnotVector::new(knots);
        let (abscissae, multiplicities) = knots.run_length_encode();
        // the distinct view carries the remaining period checks
        StrictlyIncreasingPeriodicKnotSequence::try_new(
            max_multiplicity_order,
            abscissae,
            multiplicities,
        )?;
        Ok(Self {
            max_multiplicity_order,
            knots,
        })
    }

    pub(crate) fn from_parts_unchecked(
        max_multiplicity_order: usize,
        knots: KnotVector<T>,
    ) -> Self {
        Self {
            max_multiplicity_order,
            knots,
        }
    }

    pub fn max_multiplicity_order(&self) -> usize {
        self.max_multiplicity_order
    }

    pub fn knots(&self) -> &KnotVector<T> {
        &self.knots
    }

    pub fn distinct_abscissae(&self) -> Vec<T> {
        self.knots.knots().map(|k| k.abscissa()).collect()
    }

    pub fn multiplicities(&self) -> Vec<usize> {
        self.knots.knots().map(|k| k.multiplicity()).collect()
    }

    pub fn length(&self) -> usize {
        self.knots.len()
    }

    pub fn index_knot_origin(&self) -> KnotIndexIncreasing {
        KnotIndexIncreasing::new(0)
    }

    pub fn u_max(&self) -> T {
        self.knots.last()
    }

    /// The knots of the period without its two extremities
    ///
    /// Every repetition of the extremities is dropped while interior repetitions are
    /// kept, so the result holds `length - m(0) - m(u_max)` knots.
    pub fn free_knots(&self) -> Vec<T> {
        let u_max = self.u_max();
        self.knots
            .iter()
            .filter(|t| !is_same_abscissa(**t, T::zero()) && !is_same_abscissa(**t, u_max))
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = Knot<T>> + '_ {
        self.knots.knots()
    }

    pub fn knot_multiplicity(&self, index: KnotIndexIncreasing) -> KnotSequenceResult<usize> {
        let strictly = self.to_strictly_increasing_index(index)?;
        Ok(self.multiplicities()[strictly.get()])
    }

    /// Cyclic lookup: the index wraps around the flat knots of one period
    pub fn abscissa_at_index(&self, index: KnotIndexIncreasing) -> T {
        let seam = self.knots.knots().last().map_or(1, |k| k.multiplicity());
        let period = (self.knots.len() - seam).max(1);
        self.knots[index.get() % period]
    }

    /// Find the span containing `u`, as the flat index of the last repetition of its lower knot
    /// A parameter beyond `u_max` is brought back into the first period.
    pub fn find_span(&self, u: T) -> KnotSequenceResult<KnotIndexIncreasing> {
        let u = wrap_into_period(u, self.u_max());
        if u < T::zero() && !is_same_abscissa(u, T::zero()) {
            return Err(KnotSequenceError::OutOfRange {
                u: to_f64(u),
                lower: 0.,
                upper: to_f64(self.u_max()),
            });
        }

        if is_same_abscissa(u, self.u_max()) {
            let seam = self.knots.knots().last().map_or(1, |k| k.multiplicity());
            return Ok(KnotIndexIncreasing::new(self.knots.len() - seam - 1));
        }

        let span = self.knots.floor(u + knot_tolerance()).unwrap_or(0);
        Ok(KnotIndexIncreasing::new(span))
    }

    pub fn insert_knot(&self, abscissa: T, multiplicity: usize) -> KnotSequenceResult<Self> {
        let sequence = self
            .to_strictly_increasing()
            .insert_knot(abscissa, multiplicity)?;
        Ok(sequence.into())
    }

    pub fn raise_knot_multiplicity(
        &self,
        index: KnotIndexIncreasing,
        amount: usize,
    ) -> KnotSequenceResult<Self> {
        let strictly = self.to_strictly_increasing_index(index)?;
        let sequence = self
            .to_strictly_increasing()
            .raise_knot_multiplicity(strictly, amount)?;
        Ok(sequence.into())
    }

    pub fn decrement_knot_multiplicity(
        &self,
        index: KnotIndexIncreasing,
    ) -> KnotSequenceResult<Self> {
        let strictly = self.to_strictly_increasing_index(index)?;
        let sequence = self
            .to_strictly_increasing()
            .decrement_knot_multiplicity(strictly)?;
        Ok(sequence.into())
    }

    pub fn revert_knot_sequence(&self) -> Self {
        self.inverse()
    }

    pub fn to_strictly_increasing(&self) -> StrictlyIncreasingPeriodicKnotSequence<T> {
        self.into()
    }

    pub fn to_strictly_increasing_index(
        &self,
        index: KnotIndexIncreasing,
    ) -> KnotSequenceResult<KnotIndexStrictlyIncreasing> {
        to_strictly_increasing_index(&self.multiplicities(), index.get())
            .map(KnotIndexStrictlyIncreasing::new)
            .ok_or(KnotSequenceError::IndexRange {
                index: index.get(),
                length: self.knots.len(),
            })
    }

    pub fn to_increasing_index(
        &self,
        index: KnotIndexStrictlyIncreasing,
    ) -> KnotSequenceResult<KnotIndexIncreasing> {
        let multiplicities = self.multiplicities();
        to_increasing_index(&multiplicities, index.get())
            .map(KnotIndexIncreasing::new)
            .ok_or(KnotSequenceError::IndexRange {
                index: index.get(),
                length: multiplicities.len(),
            })
    }
}

impl<T: FloatingPoint> Invertible for IncreasingPeriodicKnotSequence<T> {
    fn invert(&mut self) {
        self.knots = self.knots.reflect(self.u_max());
    }
}

impl<'a, T: FloatingPoint> IntoIterator for &'a IncreasingPeriodicKnotSequence<T> {
    type Item = Knot<T>;
    type IntoIter = Box<dyn Iterator<Item = Knot<T>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
