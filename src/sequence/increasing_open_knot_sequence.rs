use crate::{
    error::{KnotSequenceError, KnotSequenceResult},
    knot::{Knot, KnotIndexIncreasing, KnotIndexStrictlyIncreasing, KnotVector},
    misc::{is_same_abscissa, to_f64, FloatingPoint, Invertible},
};

use super::{
    closure::{check_increasing_closure, last_repetition},
    conversion::{to_increasing_index, to_strictly_increasing_index},
    periodic_expansion::expand_periodic_knots,
    strictly_increasing_open_knot_sequence::{
        check_boundary_multiplicities, check_parameter_range, OpenKnotSequenceParts,
    },
    validation::{
        check_basis_size, check_increasing_knots, check_intermediate_multiplicities,
        check_max_multiplicity_order, check_multiplicities_under_order,
        check_strictly_increasing_knots, is_multiplicity_uniform, is_spacing_uniform,
    },
    IncreasingPeriodicKnotSequence, KnotSequenceConfiguration,
    StrictlyIncreasingOpenKnotSequenceClosedCurve,
};

/// Clamped knot sequence of a closed curve, one entry per unit of multiplicity.
///
/// Same sequence as `StrictlyIncreasingOpenKnotSequenceClosedCurve` read as the flat knot
/// vector a B-spline evaluator consumes. With `N` knots and order `k`, the normalized basis
/// spans `[knots[k - 1], knots[N - k]] = [0, u_max]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IncreasingOpenKnotSequenceClosedCurve<T> {
    max_multiplicity_order: usize,
    knots: KnotVector<T>,
    index_knot_origin: KnotIndexIncreasing,
    u_max: T,
    is_sequence_up_to_c0_discontinuity: bool,
    is_knot_spacing_uniform: bool,
    is_knot_multiplicity_uniform: bool,
    is_knot_multiplicity_non_uniform: bool,
}

impl<T: FloatingPoint> IncreasingOpenKnotSequenceClosedCurve<T> {
    /// Create a sequence from a construction configuration
    ///
    /// # Example
    /// ```
    /// use closed_knots::prelude::*;
    /// let sequence = IncreasingOpenKnotSequenceClosedCurve::<f64>::try_from_configuration(
    ///     KnotSequenceConfiguration::PeriodicKnots {
    ///         max_multiplicity_order: 4,
    ///         periodic_knots: vec![0., 0., 0., 0., 1., 1., 1., 1.],
    ///         multiplicities: None,
    ///     },
    /// ).unwrap();
    /// assert_eq!(sequence.knots().to_vec(), vec![0., 0., 0., 0., 1., 1., 1., 1.]);
    /// assert_eq!(sequence.index_knot_origin().get(), 0);
    /// ```
    pub fn try_from_configuration(
        configuration: KnotSequenceConfiguration<T>,
    ) -> KnotSequenceResult<Self> {
        let up_to_c0_discontinuity = configuration.is_up_to_c0_discontinuity();
        match configuration {
            KnotSequenceConfiguration::AllKnots {
                max_multiplicity_order,
                knots,
                multiplicities,
            }
            | KnotSequenceConfiguration::AllKnotsUpToC0Discontinuity {
                max_multiplicity_order,
                knots,
                multiplicities,
            } => {
                let knots = match multiplicities {
                    Some(multiplicities) => {
                        check_strictly_increasing_knots(&knots, &multiplicities)?;
                        KnotVector::from_multiplicities(&knots, &multiplicities)
                    }
                    None => KnotVector::new(knots),
                };
                Self::try_assemble(max_multiplicity_order, knots, up_to_c0_discontinuity)
            }
            configuration => {
                let strictly =
                    StrictlyIncreasingOpenKnotSequenceClosedCurve::try_from_configuration(
                        configuration,
                    )?;
                let knots = KnotVector::from_multiplicities(
                    strictly.abscissae(),
                    &strictly.multiplicities(),
                );
                Self::try_assemble(
                    strictly.max_multiplicity_order(),
                    knots,
                    up_to_c0_discontinuity,
                )
            }
        }
    }

    /// Create the smallest uniform sequence supporting a basis of the given order
    pub fn try_minimal(max_multiplicity_order: usize) -> KnotSequenceResult<Self> {
        Self::try_from_configuration(KnotSequenceConfiguration::Minimal {
            max_multiplicity_order,
        })
    }

    /// Create an uniform sequence with `basis_size` unit spans per period
    pub fn try_uniform(
        max_multiplicity_order: usize,
        basis_size: usize,
    ) -> KnotSequenceResult<Self> {
        Self::try_from_configuration(KnotSequenceConfiguration::Uniform {
            max_multiplicity_order,
            basis_size,
        })
    }

    /// Create a sequence from its complete flat knots
    pub fn try_new(max_multiplicity_order: usize, knots: Vec<T>) -> KnotSequenceResult<Self> {
        Self::try_assemble(max_multiplicity_order, KnotVector::new(knots), false)
    }

    /// Same as `try_new`, intermediate knots may reach the maximum multiplicity order
    pub fn try_new_up_to_c0_discontinuity(
        max_multiplicity_order: usize,
        knots: Vec<T>,
    ) -> KnotSequenceResult<Self> {
        Self::try_assemble(max_multiplicity_order, KnotVector::new(knots), true)
    }

    /// Expand one period of knots into a clamped sequence and validate it
    pub fn try_from_periodic(
        periodic: &IncreasingPeriodicKnotSequence<T>,
        up_to_c0_discontinuity: bool,
    ) -> KnotSequenceResult<Self> {
        let order = periodic.max_multiplicity_order();
        let (abscissae, multiplicities) = expand_periodic_knots(
            order,
            &periodic.distinct_abscissae(),
            &periodic.multiplicities(),
        );
        Self::try_assemble(
            order,
            KnotVector::from_multiplicities(&abscissae, &multiplicities),
            up_to_c0_discontinuity,
        )
    }

    fn try_assemble(
        max_multiplicity_order: usize,
        knots: KnotVector<T>,
        up_to_c0_discontinuity: bool,
    ) -> KnotSequenceResult<Self> {
        let order = max_multiplicity_order;
        check_max_multiplicity_order(order)?;
        check_increasing_knots(knots.as_slice())?;

        let (abscissae, multiplicities) = knots.run_length_encode();
        let is_knot_multiplicity_uniform = is_multiplicity_uniform(&multiplicities);
        let is_knot_spacing_uniform = is_spacing_uniform(&abscissae);

        let origin = knots
            .iter()
            .position(|t| is_same_abscissa(*t, T::zero()))
            .ok_or(KnotSequenceError::Origin {
                abscissa: to_f64(knots.first()),
            })?;
        let n = knots.len();
        if n < order {
            return Err(KnotSequenceError::InsufficientBasisSize {
                cumulative: n,
                order,
            });
        }
        let upper_bound = first_repetition(&knots, n - order);
        let origin_last = last_repetition(&knots, origin);
        if upper_bound <= origin_last {
            return Err(KnotSequenceError::InsufficientBasisSize {
                cumulative: origin_last - origin + 1,
                order,
            });
        }
        let upper_bound_last = last_repetition(&knots, upper_bound);
        check_basis_size(order, upper_bound_last - origin + 1)?;

        check_boundary_multiplicities(
            order,
            origin_last - origin + 1,
            upper_bound_last - upper_bound + 1,
        )?;
        check_increasing_closure(order, &knots, origin, upper_bound)?;

        check_multiplicities_under_order(order, &multiplicities)?;
        let distinct_bounds = (
            to_strictly_increasing_index(&multiplicities, origin).unwrap_or(0),
            to_strictly_increasing_index(&multiplicities, upper_bound).unwrap_or(0),
        );
        check_intermediate_multiplicities(
            order,
            up_to_c0_discontinuity,
            &multiplicities,
            distinct_bounds,
        )
        .map_err(|e| match e {
            KnotSequenceError::IntermediateMultiplicity {
                index,
                multiplicity,
                maximum,
            } => KnotSequenceError::IntermediateMultiplicity {
                index: to_increasing_index(&multiplicities, index).unwrap_or(index),
                multiplicity,
                maximum,
            },
            e => e,
        })?;

        let u_max = knots[upper_bound];
        Ok(Self {
            max_multiplicity_order,
            knots,
            index_knot_origin: KnotIndexIncreasing::new(origin),
            u_max,
            is_sequence_up_to_c0_discontinuity: up_to_c0_discontinuity,
            is_knot_spacing_uniform,
            is_knot_multiplicity_uniform,
            is_knot_multiplicity_non_uniform: false,
        })
    }

    /// Rebuild from the fields of the strictly increasing form, which may be in an
    /// unchecked state
    pub(crate) fn from_parts_unchecked(parts: OpenKnotSequenceParts<T>) -> Self {
        let origin = to_increasing_index(&parts.multiplicities, parts.index_knot_origin)
            .unwrap_or(parts.index_knot_origin);
        Self {
            max_multiplicity_order: parts.max_multiplicity_order,
            knots: KnotVector::from_multiplicities(&parts.abscissae, &parts.multiplicities),
            index_knot_origin: KnotIndexIncreasing::new(origin),
            u_max: parts.u_max,
            is_sequence_up_to_c0_discontinuity: parts.is_sequence_up_to_c0_discontinuity,
            is_knot_spacing_uniform: parts.is_knot_spacing_uniform,
            is_knot_multiplicity_uniform: parts.is_knot_multiplicity_uniform,
            is_knot_multiplicity_non_uniform: parts.is_knot_multiplicity_non_uniform,
        }
    }

    pub(crate) fn parts(&self) -> OpenKnotSequenceParts<T> {
        let (abscissae, multiplicities) = self.knots.run_length_encode();
        let origin = to_strictly_increasing_index(&multiplicities, self.index_knot_origin.get())
            .unwrap_or(0);
        OpenKnotSequenceParts {
            max_multiplicity_order: self.max_multiplicity_order,
            abscissae,
            multiplicities,
            index_knot_origin: origin,
            u_max: self.u_max,
            is_sequence_up_to_c0_discontinuity: self.is_sequence_up_to_c0_discontinuity,
            is_knot_spacing_uniform: self.is_knot_spacing_uniform,
            is_knot_multiplicity_uniform: self.is_knot_multiplicity_uniform,
            is_knot_multiplicity_non_uniform: self.is_knot_multiplicity_non_uniform,
        }
    }

    pub fn max_multiplicity_order(&self) -> usize {
        self.max_multiplicity_order
    }

    pub fn knots(&self) -> &KnotVector<T> {
        &self.knots
    }

    /// Flat index of the first repetition of the origin
    pub fn index_knot_origin(&self) -> KnotIndexIncreasing {
        self.index_knot_origin
    }

    /// Flat index of the first repetition of `u_max`
    pub fn index_upper_bound(&self) -> KnotIndexIncreasing {
        let index = self
            .knots
            .iter()
            .position(|t| is_same_abscissa(*t, self.u_max))
            .unwrap_or(self.knots.len() - 1);
        KnotIndexIncreasing::new(index)
    }

    pub fn u_max(&self) -> T {
        self.u_max
    }

    pub fn is_sequence_up_to_c0_discontinuity(&self) -> bool {
        self.is_sequence_up_to_c0_discontinuity
    }

    pub fn is_knot_spacing_uniform(&self) -> bool {
        self.is_knot_spacing_uniform
    }

    pub fn is_knot_multiplicity_uniform(&self) -> bool {
        self.is_knot_multiplicity_uniform
    }

    pub fn is_knot_multiplicity_non_uniform(&self) -> bool {
        self.is_knot_multiplicity_non_uniform
    }

    pub fn length(&self) -> usize {
        self.knots.len()
    }

    pub fn distinct_abscissae(&self) -> Vec<T> {
        self.knots.knots().map(|k| k.abscissa()).collect()
    }

    pub fn multiplicities(&self) -> Vec<usize> {
        self.knots.knots().map(|k| k.multiplicity()).collect()
    }

    /// Flat knots of the normalized basis window `[0, u_max]`
    pub fn periodic_knots(&self) -> Vec<T> {
        let upper_bound_last = last_repetition(&self.knots, self.index_upper_bound().get());
        self.knots.as_slice()[self.index_knot_origin.get()..=upper_bound_last].to_vec()
    }

    /// Periodic knots without the origin and `u_max`
    ///
    /// Every repetition of these two knots is dropped while interior repetitions are
    /// kept: the result holds the summed multiplicities of the interior knots of the
    /// period, where the strictly increasing form returns one abscissa per interior knot.
    pub fn free_knots(&self) -> Vec<T> {
        self.periodic_knots()
            .into_iter()
            .filter(|t| !is_same_abscissa(*t, T::zero()) && !is_same_abscissa(*t, self.u_max))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = Knot<T>> + '_ {
        self.knots.knots()
    }

    pub fn abscissa_at_index(&self, index: KnotIndexIncreasing) -> KnotSequenceResult<T> {
        self.check_index(index)?;
        Ok(self.knots[index.get()])
    }

    /// Multiplicity of the knot repeated at the flat position `index`
    pub fn knot_multiplicity(&self, index: KnotIndexIncreasing) -> KnotSequenceResult<usize> {
        self.check_index(index)?;
        let abscissa = self.knots[index.get()];
        Ok(self
            .knots
            .iter()
            .filter(|t| is_same_abscissa(**t, abscissa))
            .count())
    }

    pub fn find_knot_multiplicity_at_abscissa(&self, abscissa: T) -> Option<usize> {
        let multiplicity = self
            .knots
            .iter()
            .filter(|t| is_same_abscissa(**t, abscissa))
            .count();
        (multiplicity > 0).then_some(multiplicity)
    }

    /// Multiplicity of the knot located at `abscissa`, 0 when no knot lies there
    pub fn knot_multiplicity_at_abscissa(&self, abscissa: T) -> usize {
        match self.find_knot_multiplicity_at_abscissa(abscissa) {
            Some(multiplicity) => multiplicity,
            None => {
                #[cfg(feature = "log")]
                log::warn!("no knot at abscissa {}, multiplicity is 0", abscissa);
                0
            }
        }
    }

    /// Check if `abscissa` coincides with a knot of the normalized basis window
    /// # Failures
    /// - if the matching knot lies outside of `[0, u_max]`
    pub fn is_abscissa_coinciding_with_knot(&self, abscissa: T) -> KnotSequenceResult<bool> {
        let coinciding = self
            .knots
            .iter()
            .any(|t| is_same_abscissa(*t, abscissa));
        let outside = (abscissa < T::zero() && !is_same_abscissa(abscissa, T::zero()))
            || (abscissa > self.u_max && !is_same_abscissa(abscissa, self.u_max));
        match (coinciding, outside) {
            (true, true) => Err(KnotSequenceError::AbscissaOutOfRange {
                abscissa: to_f64(abscissa),
            }),
            (coinciding, _) => Ok(coinciding),
        }
    }

    /// Find the span containing `u` in `[0, u_max]`, as the flat index of the last
    /// repetition of its lower knot
    ///
    /// # Example
    /// ```
    /// use closed_knots::prelude::*;
    /// let sequence = IncreasingOpenKnotSequenceClosedCurve::try_new(
    ///     3,
    ///     vec![-2., -1., 0., 1., 2., 3., 4.],
    /// ).unwrap();
    /// assert_eq!(sequence.find_span(0.).unwrap().get(), 2);
    /// assert_eq!(sequence.find_span(1.5).unwrap().get(), 3);
    /// assert_eq!(sequence.find_span(2.).unwrap().get(), 3);
    /// ```
    pub fn find_span(&self, u: T) -> KnotSequenceResult<KnotIndexIncreasing> {
        check_parameter_range(u, self.u_max)?;
        let degree = self.max_multiplicity_order - 1;
        let n = self.knots.len() - self.max_multiplicity_order - 1;
        Ok(KnotIndexIncreasing::new(
            self.knots.find_knot_span_index(n, degree, u),
        ))
    }

    pub fn insert_knot(&self, abscissa: T, multiplicity: usize) -> KnotSequenceResult<Self> {
        self.insert_knots(&[abscissa], multiplicity)
    }

    pub fn insert_knots(&self, abscissae: &[T], multiplicity: usize) -> KnotSequenceResult<Self> {
        Ok(self
            .to_strictly_increasing()
            .insert_knots(abscissae, multiplicity)?
            .into())
    }

    /// Raise the multiplicity of the knots repeated at the flat positions `indices`
    /// Several positions of the same knot raise it once.
    pub fn raise_knot_multiplicity(
        &self,
        indices: &[KnotIndexIncreasing],
        amount: usize,
        check_consistency: bool,
    ) -> KnotSequenceResult<Self> {
        let strictly = self.to_strictly_increasing();
        let indices = self.to_strictly_increasing_indices(indices)?;
        Ok(strictly
            .raise_knot_multiplicity(&indices, amount, check_consistency)?
            .into())
    }

    pub fn decrement_knot_multiplicity(
        &self,
        indices: &[KnotIndexIncreasing],
        check_consistency: bool,
    ) -> KnotSequenceResult<Self> {
        let strictly = self.to_strictly_increasing();
        let indices = self.to_strictly_increasing_indices(indices)?;
        Ok(strictly
            .decrement_knot_multiplicity(&indices, check_consistency)?
            .into())
    }

    pub fn decrement_max_multiplicity_order(&self) -> KnotSequenceResult<Self> {
        Ok(self
            .to_strictly_increasing()
            .decrement_max_multiplicity_order()?
            .into())
    }

    pub fn revert_knot_sequence(&self) -> Self {
        self.inverse()
    }

    pub fn update_knot_sequence_through_normalized_basis_analysis(
        &self,
    ) -> KnotSequenceResult<Self> {
        Ok(self
            .to_strictly_increasing()
            .update_knot_sequence_through_normalized_basis_analysis()?
            .into())
    }

    pub fn to_strictly_increasing(&self) -> StrictlyIncreasingOpenKnotSequenceClosedCurve<T> {
        self.into()
    }

    /// The knots of the normalized basis window as one period
    pub fn to_periodic_knot_sequence(&self) -> IncreasingPeriodicKnotSequence<T> {
        IncreasingPeriodicKnotSequence::from_parts_unchecked(
            self.max_multiplicity_order,
            KnotVector::new(self.periodic_knots()),
        )
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

    fn to_strictly_increasing_indices(
        &self,
        indices: &[KnotIndexIncreasing],
    ) -> KnotSequenceResult<Vec<KnotIndexStrictlyIncreasing>> {
        indices
            .iter()
            .map(|index| self.to_strictly_increasing_index(*index))
            .collect()
    }

    fn check_index(&self, index: KnotIndexIncreasing) -> KnotSequenceResult<()> {
        if index.get() >= self.knots.len() {
            return Err(KnotSequenceError::IndexRange {
                index: index.get(),
                length: self.knots.len(),
            });
        }
        Ok(())
    }
}

impl<T: FloatingPoint> Invertible for IncreasingOpenKnotSequenceClosedCurve<T> {
    fn invert(&mut self) {
        self.knots = self.knots.reflect(self.u_max);
        let origin = self
            .knots
            .iter()
            .position(|t| is_same_abscissa(*t, T::zero()))
            .unwrap_or(0);
        self.index_knot_origin = KnotIndexIncreasing::new(origin);
    }
}

impl<'a, T: FloatingPoint> IntoIterator for &'a IncreasingOpenKnotSequenceClosedCurve<T> {
    type Item = Knot<T>;
    type IntoIter = Box<dyn Iterator<Item = Knot<T>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Flat index of the first repetition of the knot at `index`
fn first_repetition<T: FloatingPoint>(knots: &KnotVector<T>, index: usize) -> usize {
    let mut first = index;
    while first > 0 && is_same_abscissa(knots[first - 1], knots[index]) {
        first -= 1;
    }
    first
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform() -> IncreasingOpenKnotSequenceClosedCurve<f64> {
        IncreasingOpenKnotSequenceClosedCurve::try_new(3, vec![-2., -1., 0., 1., 2., 3., 4.])
            .unwrap()
    }

    #[test]
    fn bounds_of_the_normalized_basis() {
        let sequence = uniform();
        assert_eq!(sequence.index_knot_origin().get(), 2);
        assert_eq!(sequence.index_upper_bound().get(), 4);
        assert_eq!(sequence.u_max(), 2.);
        assert_eq!(sequence.periodic_knots(), vec![0., 1., 2.]);
        assert_eq!(sequence.free_knots(), vec![1.]);
        assert!(sequence.is_knot_spacing_uniform());
        assert!(sequence.is_knot_multiplicity_uniform());
        assert!(!sequence.is_knot_multiplicity_non_uniform());
    }

    #[test]
    fn upper_bound_multiplicity_overshoot() {
        // u_max would be a triple knot while only two of its repetitions are expected
        assert_eq!(
            IncreasingOpenKnotSequenceClosedCurve::try_new(2, vec![0., 0., 1., 1., 1.]),
            Err(KnotSequenceError::BoundaryMultiplicityMismatch {
                origin: 2,
                upper_bound: 3
            })
        );
    }

    #[test]
    fn find_span_with_multiple_knots() {
        let sequence =
            IncreasingOpenKnotSequenceClosedCurve::try_new(4, vec![0., 0., 0., 0., 1., 1., 1., 1.])
                .unwrap();
        assert_eq!(sequence.find_span(0.).unwrap().get(), 3);
        assert_eq!(sequence.find_span(0.5).unwrap().get(), 3);
        assert_eq!(sequence.find_span(1.).unwrap().get(), 3);
        assert!(matches!(
            sequence.find_span(1.5),
            Err(KnotSequenceError::OutOfRange { .. })
        ));
    }

    #[test]
    fn multiplicity_lookups() {
        let sequence = IncreasingOpenKnotSequenceClosedCurve::try_new(
            3,
            vec![0., 0., 0., 0.5, 0.5, 1., 1., 1.],
        )
        .unwrap();
        assert_eq!(
            sequence.knot_multiplicity(KnotIndexIncreasing::new(4)),
            Ok(2)
        );
        assert_eq!(sequence.knot_multiplicity_at_abscissa(0.5), 2);
        assert_eq!(sequence.knot_multiplicity_at_abscissa(0.25), 0);
        assert_eq!(sequence.is_abscissa_coinciding_with_knot(0.5), Ok(true));
        assert_eq!(sequence.is_abscissa_coinciding_with_knot(0.25), Ok(false));
        assert_eq!(
            sequence
                .to_strictly_increasing_index(KnotIndexIncreasing::new(4))
                .map(|i| i.get()),
            Ok(1)
        );
    }

    #[test]
    fn mirrored_knot_outside_of_the_window() {
        let sequence = uniform();
        assert_eq!(
            sequence.is_abscissa_coinciding_with_knot(-1.),
            Err(KnotSequenceError::AbscissaOutOfRange { abscissa: -1. })
        );
    }

    #[test]
    fn revert_uniform() {
        let reverted = uniform().revert_knot_sequence();
        assert_eq!(
            reverted.knots().to_vec(),
            vec![-2., -1., 0., 1., 2., 3., 4.]
        );
        assert_eq!(reverted.index_knot_origin().get(), 2);
    }
}
