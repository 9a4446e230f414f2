use crate::{
    error::{KnotSequenceError, KnotSequenceResult},
    knot::{Knot, KnotIndexStrictlyIncreasing},
    misc::{is_same_abscissa, knot_tolerance, to_f64, FloatingPoint, Invertible},
};

use super::validation::{
    check_basis_size, check_max_multiplicity_order, check_multiplicities_under_order,
    check_origin, check_strictly_increasing_knots,
};

/// One period of the knots of a closed curve, one entry per distinct abscissa.
///
/// The first knot lies at the origin `0`, the last one at `u_max`, the length of the
/// period. Both stand for the same knot of the closed curve, which is why edits of
/// one of them are applied to the other one as well.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrictlyIncreasingPeriodicKnotSequence<T> {
    max_multiplicity_order: usize,
    abscissae: Vec<T>,
    multiplicities: Vec<usize>,
}

impl<T: FloatingPoint> StrictlyIncreasingPeriodicKnotSequence<T> {
    /// Create a periodic sequence from distinct abscissae and their multiplicities
    /// # Failures
    /// - if the maximum multiplicity order is lower than 1
    /// - if the sequence is empty, not strictly increasing or does not start at the origin
    /// - if the cumulative multiplicity of the period cannot support a basis of the given order
    ///
    /// # Example
    /// ```
    /// use closed_knots::prelude::*;
    /// let periodic = StrictlyIncreasingPeriodicKnotSequence::try_new(3, vec![0., 1., 2.], vec![1, 1, 1]);
    /// assert!(periodic.is_ok());
    /// let too_short = StrictlyIncreasingPeriodicKnotSequence::try_new(3, vec![0., 1.], vec![1, 1]);
    /// assert!(too_short.is_err());
    /// ```
    pub fn try_new(
        max_multiplicity_order: usize,
        abscissae: Vec<T>,
        multiplicities: Vec<usize>,
    ) -> KnotSequenceResult<Self> {
        check_max_multiplicity_order(max_multiplicity_order)?;
        check_strictly_increasing_knots(&abscissae, &multiplicities)?;
        check_origin(abscissae[0])?;
        check_period(max_multiplicity_order, &multiplicities)?;
        check_multiplicities_under_order(max_multiplicity_order, &multiplicities)?;
        Ok(Self {
            max_multiplicity_order,
            abscissae,
            multiplicities,
        })
    }

    /// Create an uniform periodic sequence made of `basis_size` unit spans
    pub fn try_uniform(
        max_multiplicity_order: usize,
        basis_size: usize,
    ) -> KnotSequenceResult<Self> {
        let abscissae = (0..=basis_size)
            .map(|i| T::from_usize(i).unwrap_or_else(T::zero))
            .collect();
        Self::try_new(max_multiplicity_order, abscissae, vec![1; basis_size + 1])
    }

    pub(crate) fn from_parts_unchecked(
        max_multiplicity_order: usize,
        abscissae: Vec<T>,
        multiplicities: Vec<usize>,
    ) -> Self {
        Self {
            max_multiplicity_order,
            abscissae,
            multiplicities,
        }
    }

    pub fn max_multiplicity_order(&self) -> usize {
        self.max_multiplicity_order
    }

    pub fn abscissae(&self) -> &[T] {
        &self.abscissae
    }

    pub fn distinct_abscissae(&self) -> Vec<T> {
        self.abscissae.clone()
    }

    pub fn multiplicities(&self) -> Vec<usize> {
        self.multiplicities.clone()
    }

    pub fn length(&self) -> usize {
        self.abscissae.len()
    }

    pub fn index_knot_origin(&self) -> KnotIndexStrictlyIncreasing {
        KnotIndexStrictlyIncreasing::new(0)
    }

    /// End of the period, which is also its length
    pub fn u_max(&self) -> T {
        self.abscissae[self.abscissae.len() - 1]
    }

    /// The knots of the period without its two extremities
    pub fn free_knots(&self) -> Vec<T> {
        self.abscissae[1..self.abscissae.len() - 1].to_vec()
    }

    pub fn iter(&self) -> impl Iterator<Item = Knot<T>> + '_ {
        self.abscissae
            .iter()
            .zip(self.multiplicities.iter())
            .map(|(a, m)| Knot::new(*a, *m))
    }

    pub fn knot_multiplicity(
        &self,
        index: KnotIndexStrictlyIncreasing,
    ) -> KnotSequenceResult<usize> {
        self.check_index(index)?;
        Ok(self.multiplicities[index.get()])
    }

    /// Cyclic lookup: the index wraps around the period
    pub fn abscissa_at_index(&self, index: KnotIndexStrictlyIncreasing) -> T {
        self.abscissae[index.get() % (self.abscissae.len() - 1)]
    }

    /// Find the span containing `u`
    /// A parameter beyond `u_max` is brought back into the first period.
    /// A parameter located at `u_max` belongs to the last span of the period.
    pub fn find_span(&self, u: T) -> KnotSequenceResult<KnotIndexStrictlyIncreasing> {
        let u = wrap_into_period(u, self.u_max());
        if u < T::zero() && !is_same_abscissa(u, T::zero()) {
            return Err(KnotSequenceError::OutOfRange {
                u: to_f64(u),
                lower: 0.,
                upper: to_f64(self.u_max()),
            });
        }

        let last = self.abscissae.len() - 1;
        if is_same_abscissa(u, self.u_max()) {
            return Ok(KnotIndexStrictlyIncreasing::new(last - 1));
        }

        let span = (0..last)
            .rev()
            .find(|j| self.abscissae[*j] <= u + knot_tolerance())
            .unwrap_or(0);
        Ok(KnotIndexStrictlyIncreasing::new(span))
    }

    /// Insert a new knot strictly inside the period
    pub fn insert_knot(&self, abscissa: T, multiplicity: usize) -> KnotSequenceResult<Self> {
        self.check_insertion(abscissa, multiplicity)?;
        let position = self
            .abscissae
            .iter()
            .position(|a| *a > abscissa)
            .unwrap_or(self.abscissae.len());
        let mut sequence = self.clone();
        sequence.abscissae.insert(position, abscissa);
        sequence.multiplicities.insert(position, multiplicity);
        Ok(sequence)
    }

    /// Raise the multiplicity of a knot by `amount`
    pub fn raise_knot_multiplicity(
        &self,
        index: KnotIndexStrictlyIncreasing,
        amount: usize,
    ) -> KnotSequenceResult<Self> {
        self.check_index(index)?;
        let mut sequence = self.clone();
        for i in self.seam_indices(index) {
            sequence.multiplicities[i] += amount;
            if sequence.multiplicities[i] > self.max_multiplicity_order {
                return Err(KnotSequenceError::AtKnotMultiplicity {
                    index: i,
                    multiplicity: sequence.multiplicities[i],
                    order: self.max_multiplicity_order,
                });
            }
        }
        Ok(sequence)
    }

    /// Decrement the multiplicity of a knot, a knot reaching a null multiplicity is removed
    /// The knot at the origin of the period cannot be removed.
    pub fn decrement_knot_multiplicity(
        &self,
        index: KnotIndexStrictlyIncreasing,
    ) -> KnotSequenceResult<Self> {
        self.check_index(index)?;
        let i = index.get();
        let last = self.abscissae.len() - 1;
        let mut sequence = self.clone();
        if i == 0 || i == last {
            if self.multiplicities[i] == 1 {
                return Err(KnotSequenceError::NormalizedBasisModification { index: i });
            }
            sequence.multiplicities[0] -= 1;
            sequence.multiplicities[last] -= 1;
        } else if self.multiplicities[i] == 1 {
            sequence.abscissae.remove(i);
            sequence.multiplicities.remove(i);
        } else {
            sequence.multiplicities[i] -= 1;
        }
        check_period(self.max_multiplicity_order, &sequence.multiplicities)?;
        Ok(sequence)
    }

    /// Reverse the parameterization of the period: `u` becomes `u_max - u`
    pub fn revert_knot_sequence(&self) -> Self {
        self.inverse()
    }

    fn check_index(&self, index: KnotIndexStrictlyIncreasing) -> KnotSequenceResult<()> {
        if index.get() >= self.abscissae.len() {
            return Err(KnotSequenceError::IndexRange {
                index: index.get(),
                length: self.abscissae.len(),
            });
        }
        Ok(())
    }

    fn check_insertion(&self, abscissa: T, multiplicity: usize) -> KnotSequenceResult<()> {
        if let Some(knot) = self
            .abscissae
            .iter()
            .find(|a| is_same_abscissa(**a, abscissa))
        {
            return Err(KnotSequenceError::TooCloseToExistingKnot {
                abscissa: to_f64(abscissa),
                knot: to_f64(*knot),
            });
        }
        if abscissa < T::zero() {
            return Err(KnotSequenceError::UnderOrigin {
                abscissa: to_f64(abscissa),
            });
        }
        if abscissa > self.u_max() {
            return Err(KnotSequenceError::OverUpperBound {
                abscissa: to_f64(abscissa),
                upper_bound: to_f64(self.u_max()),
            });
        }
        if multiplicity == 0 || multiplicity > self.max_multiplicity_order {
            return Err(KnotSequenceError::MultiplicityOrder {
                order: self.max_multiplicity_order,
                reason: format!("cannot insert a knot of multiplicity {}", multiplicity),
            });
        }
        Ok(())
    }

    /// Both ends of the period when `index` designates one of them
    fn seam_indices(&self, index: KnotIndexStrictlyIncreasing) -> Vec<usize> {
        let last = self.abscissae.len() - 1;
        match index.get() {
            0 => vec![0, last],
            i if i == last => vec![0, last],
            i => vec![i],
        }
    }
}

impl<T: FloatingPoint> Invertible for StrictlyIncreasingPeriodicKnotSequence<T> {
    fn invert(&mut self) {
        let u_max = self.u_max();
        self.abscissae = self.abscissae.iter().rev().map(|a| u_max - *a).collect();
        self.multiplicities.reverse();
    }
}

impl<'a, T: FloatingPoint> IntoIterator for &'a StrictlyIncreasingPeriodicKnotSequence<T> {
    type Item = Knot<T>;
    type IntoIter = Box<dyn Iterator<Item = Knot<T>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// A period must span two knots at least and support a basis of the given order
pub(crate) fn check_period(order: usize, multiplicities: &[usize]) -> KnotSequenceResult<()> {
    let cumulative = multiplicities.iter().sum();
    if multiplicities.len() < 2 {
        return Err(KnotSequenceError::InsufficientBasisSize { cumulative, order });
    }
    check_basis_size(order, cumulative)
}

/// Bring a parameter located beyond the end of the period back into it
pub(crate) fn wrap_into_period<T: FloatingPoint>(u: T, period: T) -> T {
    if u > period && !is_same_abscissa(u, period) {
        let wrapped = u - period * (u / period).floor();
        if is_same_abscissa(wrapped, period) {
            T::zero()
        } else {
            wrapped
        }
    } else {
        u
    }
}
