use itertools::Itertools;

use crate::{
    error::{KnotSequenceError, KnotSequenceResult},
    knot::{Knot, KnotIndexIncreasing, KnotIndexStrictlyIncreasing, KnotVector},
    misc::{is_same_abscissa, knot_tolerance, to_f64, FloatingPoint, Invertible},
};

use super::{
    closure::check_strictly_increasing_closure,
    conversion::{to_increasing_index, to_strictly_increasing_index},
    periodic_expansion::expand_periodic_knots,
    strictly_increasing_periodic_knot_sequence::check_period,
    validation::{
        check_basis_size, check_increasing_knots, check_intermediate_multiplicities,
        check_max_multiplicity_order, check_multiplicities_under_order,
        check_strictly_increasing_knots, intermediate_multiplicity_cap, is_multiplicity_uniform,
        is_spacing_uniform, minimal_basis_size, MIN_MAX_MULTIPLICITY_ORDER,
    },
    KnotSequenceConfiguration, StrictlyIncreasingPeriodicKnotSequence,
};

/// Clamped knot sequence of a closed curve, one entry per distinct abscissa.
///
/// The normalized basis spans `[0, u_max]`: the cumulative multiplicity from the first
/// knot through the origin equals the maximum multiplicity order, and so does the one
/// from the knot at `u_max` through the last knot. Knots outside of this window mirror
/// the knots at the opposite end of the period so that the curve closes up.
///
/// Instances are values: every edit returns a new sequence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrictlyIncreasingOpenKnotSequenceClosedCurve<T> {
    max_multiplicity_order: usize,
    abscissae: Vec<T>,
    multiplicities: Vec<usize>,
    index_knot_origin: KnotIndexStrictlyIncreasing,
    u_max: T,
    is_sequence_up_to_c0_discontinuity: bool,
    is_knot_spacing_uniform: bool,
    is_knot_multiplicity_uniform: bool,
    is_knot_multiplicity_non_uniform: bool,
}

impl<T: FloatingPoint> StrictlyIncreasingOpenKnotSequenceClosedCurve<T> {
    /// Create a sequence from a construction configuration
    ///
    /// # Example
    /// ```
    /// use closed_knots::prelude::*;
    /// let sequence = StrictlyIncreasingOpenKnotSequenceClosedCurve::<f64>::try_from_configuration(
    ///     KnotSequenceConfiguration::Minimal { max_multiplicity_order: 3 },
    /// ).unwrap();
    /// assert_eq!(sequence.distinct_abscissae(), vec![-2., -1., 0., 1., 2., 3., 4.]);
    /// assert_eq!(sequence.periodic_knots(), vec![0., 1., 2.]);
    /// assert_eq!(sequence.u_max(), 2.);
    /// ```
    pub fn try_from_configuration(
        configuration: KnotSequenceConfiguration<T>,
    ) -> KnotSequenceResult<Self> {
        let up_to_c0_discontinuity = configuration.is_up_to_c0_discontinuity();
        match configuration {
            KnotSequenceConfiguration::Minimal {
                max_multiplicity_order,
            } => Self::try_minimal(max_multiplicity_order),
            KnotSequenceConfiguration::Uniform {
                max_multiplicity_order,
                basis_size,
            } => Self::try_uniform(max_multiplicity_order, basis_size),
            KnotSequenceConfiguration::PeriodicKnots {
                max_multiplicity_order,
                periodic_knots,
                multiplicities,
            }
            | KnotSequenceConfiguration::PeriodicKnotsUpToC0Discontinuity {
                max_multiplicity_order,
                periodic_knots,
                multiplicities,
            } => {
                let periodic = match multiplicities {
                    Some(multiplicities) => StrictlyIncreasingPeriodicKnotSequence::try_new(
                        max_multiplicity_order,
                        periodic_knots,
                        multiplicities,
                    )?,
                    None => super::IncreasingPeriodicKnotSequence::try_new(
                        max_multiplicity_order,
                        periodic_knots,
                    )?
                    .to_strictly_increasing(),
                };
                Self::try_from_periodic(&periodic, up_to_c0_discontinuity)
            }
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
                let (abscissae, multiplicities) = match multiplicities {
                    Some(multiplicities) => (knots, multiplicities),
                    None => {
                        check_increasing_knots(&knots)?;
                        KnotVector::new(knots).run_length_encode()
                    }
                };
                Self::try_assemble(
                    max_multiplicity_order,
                    abscissae,
                    multiplicities,
                    up_to_c0_discontinuity,
                )
            }
        }
    }

    /// Create the smallest uniform sequence supporting a basis of the given order
    pub fn try_minimal(max_multiplicity_order: usize) -> KnotSequenceResult<Self> {
        check_max_multiplicity_order(max_multiplicity_order)?;
        Self::try_uniform(
            max_multiplicity_order,
            minimal_basis_size(max_multiplicity_order),
        )
    }

    /// Create an uniform sequence with `basis_size` unit spans per period
    pub fn try_uniform(
        max_multiplicity_order: usize,
        basis_size: usize,
    ) -> KnotSequenceResult<Self> {
        let periodic = StrictlyIncreasingPeriodicKnotSequence::try_uniform(
            max_multiplicity_order,
            basis_size,
        )?;
        Self::try_from_periodic(&periodic, false)
    }

    /// Create a sequence from its complete distinct abscissae and multiplicities
    pub fn try_new(
        max_multiplicity_order: usize,
        abscissae: Vec<T>,
        multiplicities: Vec<usize>,
    ) -> KnotSequenceResult<Self> {
        Self::try_assemble(max_multiplicity_order, abscissae, multiplicities, false)
    }

    /// Same as `try_new`, intermediate knots may reach the maximum multiplicity order
    pub fn try_new_up_to_c0_discontinuity(
        max_multiplicity_order: usize,
        abscissae: Vec<T>,
        multiplicities: Vec<usize>,
    ) -> KnotSequenceResult<Self> {
        Self::try_assemble(max_multiplicity_order, abscissae, multiplicities, true)
    }

    /// Expand one period of knots into a clamped sequence and validate it
    pub fn try_from_periodic(
        periodic: &StrictlyIncreasingPeriodicKnotSequence<T>,
        up_to_c0_discontinuity: bool,
    ) -> KnotSequenceResult<Self> {
        let (abscissae, multiplicities) = expand_periodic_knots(
            periodic.max_multiplicity_order(),
            periodic.abscissae(),
            &periodic.multiplicities(),
        );
        Self::try_assemble(
            periodic.max_multiplicity_order(),
            abscissae,
            multiplicities,
            up_to_c0_discontinuity,
        )
    }

    /// Validate a clamped sequence and derive its bookkeeping
    fn try_assemble(
        max_multiplicity_order: usize,
        abscissae: Vec<T>,
        multiplicities: Vec<usize>,
        up_to_c0_discontinuity: bool,
    ) -> KnotSequenceResult<Self> {
        let order = max_multiplicity_order;
        check_max_multiplicity_order(order)?;
        check_strictly_increasing_knots(&abscissae, &multiplicities)?;

        let is_knot_multiplicity_uniform = is_multiplicity_uniform(&multiplicities);
        let is_knot_spacing_uniform = is_spacing_uniform(&abscissae);

        let origin = abscissae
            .iter()
            .position(|a| is_same_abscissa(*a, T::zero()))
            .ok_or(KnotSequenceError::Origin {
                abscissa: to_f64(abscissae[0]),
            })?;
        let upper_bound = normalized_basis_upper_bound(order, &multiplicities)?;
        if upper_bound <= origin {
            return Err(KnotSequenceError::InsufficientBasisSize {
                cumulative: multiplicities[origin],
                order,
            });
        }
        check_basis_size(order, multiplicities[origin..=upper_bound].iter().sum())?;

        check_boundary_multiplicities(
            order,
            multiplicities[origin],
            multiplicities[upper_bound],
        )?;
        check_strictly_increasing_closure(order, &abscissae, &multiplicities, origin, upper_bound)?;

        check_multiplicities_under_order(order, &multiplicities)?;
        check_intermediate_multiplicities(
            order,
            up_to_c0_discontinuity,
            &multiplicities,
            (origin, upper_bound),
        )?;

        let u_max = abscissae[upper_bound];
        Ok(Self {
            max_multiplicity_order,
            abscissae,
            multiplicities,
            index_knot_origin: KnotIndexStrictlyIncreasing::new(origin),
            u_max,
            is_sequence_up_to_c0_discontinuity: up_to_c0_discontinuity,
            is_knot_spacing_uniform,
            is_knot_multiplicity_uniform,
            is_knot_multiplicity_non_uniform: false,
        })
    }

    pub(crate) fn from_parts_unchecked(parts: OpenKnotSequenceParts<T>) -> Self {
        Self {
            max_multiplicity_order: parts.max_multiplicity_order,
            abscissae: parts.abscissae,
            multiplicities: parts.multiplicities,
            index_knot_origin: KnotIndexStrictlyIncreasing::new(parts.index_knot_origin),
            u_max: parts.u_max,
            is_sequence_up_to_c0_discontinuity: parts.is_sequence_up_to_c0_discontinuity,
            is_knot_spacing_uniform: parts.is_knot_spacing_uniform,
            is_knot_multiplicity_uniform: parts.is_knot_multiplicity_uniform,
            is_knot_multiplicity_non_uniform: parts.is_knot_multiplicity_non_uniform,
        }
    }

    pub(crate) fn parts(&self) -> OpenKnotSequenceParts<T> {
        OpenKnotSequenceParts {
            max_multiplicity_order: self.max_multiplicity_order,
            abscissae: self.abscissae.clone(),
            multiplicities: self.multiplicities.clone(),
            index_knot_origin: self.index_knot_origin.get(),
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

    pub fn index_knot_origin(&self) -> KnotIndexStrictlyIncreasing {
        self.index_knot_origin
    }

    /// Index of the knot at `u_max`, the right bound of the normalized basis
    pub fn index_upper_bound(&self) -> KnotIndexStrictlyIncreasing {
        let index = self
            .abscissae
            .iter()
            .position(|a| is_same_abscissa(*a, self.u_max))
            .unwrap_or(self.abscissae.len() - 1);
        KnotIndexStrictlyIncreasing::new(index)
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

    /// Always false: closed curves never report this classification
    pub fn is_knot_multiplicity_non_uniform(&self) -> bool {
        self.is_knot_multiplicity_non_uniform
    }

    pub fn length(&self) -> usize {
        self.abscissae.len()
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

    /// Abscissae of the normalized basis window `[0, u_max]`
    pub fn periodic_knots(&self) -> Vec<T> {
        let upper_bound = self.index_upper_bound().get();
        self.abscissae[self.index_knot_origin.get()..=upper_bound].to_vec()
    }

    /// Periodic knots without the origin and `u_max`
    pub fn free_knots(&self) -> Vec<T> {
        let periodic = self.periodic_knots();
        periodic[1..periodic.len() - 1].to_vec()
    }

    pub fn iter(&self) -> impl Iterator<Item = Knot<T>> + '_ {
        self.abscissae
            .iter()
            .zip(self.multiplicities.iter())
            .map(|(a, m)| Knot::new(*a, *m))
    }

    pub fn abscissa_at_index(&self, index: KnotIndexStrictlyIncreasing) -> KnotSequenceResult<T> {
        self.check_index(index)?;
        Ok(self.abscissae[index.get()])
    }

    pub fn knot_multiplicity(
        &self,
        index: KnotIndexStrictlyIncreasing,
    ) -> KnotSequenceResult<usize> {
        self.check_index(index)?;
        Ok(self.multiplicities[index.get()])
    }

    /// Multiplicity of the knot located at `abscissa`, if any
    pub fn find_knot_multiplicity_at_abscissa(&self, abscissa: T) -> Option<usize> {
        self.abscissae
            .iter()
            .position(|a| is_same_abscissa(*a, abscissa))
            .map(|i| self.multiplicities[i])
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
        match self
            .abscissae
            .iter()
            .position(|a| is_same_abscissa(*a, abscissa))
        {
            Some(i) if i < self.index_knot_origin.get() || i > self.index_upper_bound().get() => {
                Err(KnotSequenceError::AbscissaOutOfRange {
                    abscissa: to_f64(abscissa),
                })
            }
            Some(_) => Ok(true),
            None => Ok(false),
        }
    }

    /// Find the span containing `u` in `[0, u_max]`
    /// A parameter located on a knot belongs to the span starting at this knot,
    /// a parameter located at `u_max` belongs to the last span of the normalized basis.
    pub fn find_span(&self, u: T) -> KnotSequenceResult<KnotIndexStrictlyIncreasing> {
        check_parameter_range(u, self.u_max)?;
        let origin = self.index_knot_origin.get();
        let upper_bound = self.index_upper_bound().get();
        if is_same_abscissa(u, self.u_max) {
            return Ok(KnotIndexStrictlyIncreasing::new(upper_bound - 1));
        }
        let span = (origin..upper_bound)
            .rev()
            .find(|j| self.abscissae[*j] <= u + knot_tolerance())
            .unwrap_or(origin);
        Ok(KnotIndexStrictlyIncreasing::new(span))
    }

    /// Insert a knot inside the normalized basis window
    pub fn insert_knot(&self, abscissa: T, multiplicity: usize) -> KnotSequenceResult<Self> {
        self.insert_knots(&[abscissa], multiplicity)
    }

    /// Insert knots inside the normalized basis window, all with the same multiplicity
    /// The knots mirrored outside of the window are synthesized again from the new period.
    ///
    /// # Example
    /// ```
    /// use closed_knots::prelude::*;
    /// let sequence = StrictlyIncreasingOpenKnotSequenceClosedCurve::try_new(
    ///     4,
    ///     vec![0., 0.5, 0.6, 0.7, 1.],
    ///     vec![4, 1, 1, 2, 4],
    /// ).unwrap();
    /// let inserted = sequence.insert_knot(0.3, 3).unwrap();
    /// assert_eq!(inserted.distinct_abscissae(), vec![0., 0.3, 0.5, 0.6, 0.7, 1.]);
    /// assert_eq!(inserted.multiplicities(), vec![4, 3, 1, 1, 2, 4]);
    /// ```
    pub fn insert_knots(&self, abscissae: &[T], multiplicity: usize) -> KnotSequenceResult<Self> {
        for (i, abscissa) in abscissae.iter().enumerate() {
            let existing = self
                .abscissae
                .iter()
                .chain(abscissae[..i].iter())
                .find(|a| is_same_abscissa(**a, *abscissa));
            if let Some(knot) = existing {
                return Err(KnotSequenceError::TooCloseToExistingKnot {
                    abscissa: to_f64(*abscissa),
                    knot: to_f64(*knot),
                });
            }
            if *abscissa > self.u_max {
                return Err(KnotSequenceError::OverUpperBound {
                    abscissa: to_f64(*abscissa),
                    upper_bound: to_f64(self.u_max),
                });
            }
            if *abscissa < T::zero() {
                return Err(KnotSequenceError::UnderOrigin {
                    abscissa: to_f64(*abscissa),
                });
            }
        }
        if multiplicity == 0 || multiplicity > self.max_multiplicity_order {
            return Err(KnotSequenceError::MultiplicityOrder {
                order: self.max_multiplicity_order,
                reason: format!("cannot insert a knot of multiplicity {}", multiplicity),
            });
        }

        let (mut periodic_abscissae, mut periodic_multiplicities) = self.periodic_projection();
        for abscissa in abscissae.iter() {
            let position = periodic_abscissae
                .iter()
                .position(|a| *a > *abscissa)
                .unwrap_or(periodic_abscissae.len());
            periodic_abscissae.insert(position, *abscissa);
            periodic_multiplicities.insert(position, multiplicity);
        }
        self.rebuild(
            self.max_multiplicity_order,
            periodic_abscissae,
            periodic_multiplicities,
        )
    }

    /// Raise the multiplicity of the knots at `indices` by `amount`
    ///
    /// With `check_consistency`, the intermediate and absolute multiplicity caps are enforced,
    /// a bound of the normalized basis already at the maximum multiplicity order is left
    /// untouched, and the knots outside of the window are synthesized again.
    /// Without it, the multiplicities are raised in place and nothing is checked: the result
    /// must go through `update_knot_sequence_through_normalized_basis_analysis` before use.
    pub fn raise_knot_multiplicity(
        &self,
        indices: &[KnotIndexStrictlyIncreasing],
        amount: usize,
        check_consistency: bool,
    ) -> KnotSequenceResult<Self> {
        for index in indices {
            self.check_index(*index)?;
        }
        if !check_consistency {
            let mut sequence = self.clone();
            for i in indices.iter().map(|i| i.get()).unique() {
                sequence.multiplicities[i] += amount;
            }
            return Ok(sequence);
        }

        let order = self.max_multiplicity_order;
        let maximum = intermediate_multiplicity_cap(order, self.is_sequence_up_to_c0_discontinuity);
        let (periodic_abscissae, mut periodic_multiplicities) = self.periodic_projection();
        let last = periodic_multiplicities.len() - 1;
        let images = self.window_images(indices)?;
        for (index, j) in images {
            let boundary = j == 0 || j == last;
            if boundary && periodic_multiplicities[j] >= order {
                return Err(KnotSequenceError::NormalizedBasisModification { index });
            }
            let raised = periodic_multiplicities[j] + amount;
            if raised > order {
                return Err(KnotSequenceError::AtKnotMultiplicity {
                    index,
                    multiplicity: raised,
                    order,
                });
            }
            if boundary {
                periodic_multiplicities[0] = raised;
                periodic_multiplicities[last] = raised;
            } else {
                if raised > maximum {
                    return Err(KnotSequenceError::IntermediateMultiplicity {
                        index,
                        multiplicity: raised,
                        maximum,
                    });
                }
                periodic_multiplicities[j] = raised;
            }
        }
        self.rebuild(order, periodic_abscissae, periodic_multiplicities)
    }

    /// Decrement the multiplicity of the knots at `indices`, a knot reaching a null
    /// multiplicity is removed. The bounds of the normalized basis cannot be decremented.
    ///
    /// With `check_consistency`, the whole sequence is rebuilt from its edited period,
    /// which may move the origin index. Without it, the edit stays local.
    pub fn decrement_knot_multiplicity(
        &self,
        indices: &[KnotIndexStrictlyIncreasing],
        check_consistency: bool,
    ) -> KnotSequenceResult<Self> {
        let origin = self.index_knot_origin.get();
        let upper_bound = self.index_upper_bound().get();
        for index in indices {
            self.check_index(*index)?;
            if index.get() == origin || index.get() == upper_bound {
                return Err(KnotSequenceError::NormalizedBasisModification { index: index.get() });
            }
        }

        if !check_consistency {
            let mut sequence = self.clone();
            for i in indices.iter().map(|i| i.get()).unique().sorted().rev() {
                if sequence.multiplicities[i] > 1 {
                    sequence.multiplicities[i] -= 1;
                } else {
                    sequence.abscissae.remove(i);
                    sequence.multiplicities.remove(i);
                    if i < sequence.index_knot_origin.get() {
                        sequence.index_knot_origin =
                            KnotIndexStrictlyIncreasing::new(sequence.index_knot_origin.get() - 1);
                    }
                }
            }
            return Ok(sequence);
        }

        let (mut periodic_abscissae, mut periodic_multiplicities) = self.periodic_projection();
        let last = periodic_multiplicities.len() - 1;
        let images = self.window_images(indices)?;
        for (index, j) in images.iter() {
            if *j == 0 || *j == last {
                return Err(KnotSequenceError::NormalizedBasisModification { index: *index });
            }
            periodic_multiplicities[*j] -= 1;
        }
        for j in images.iter().map(|(_, j)| *j).sorted().rev() {
            if periodic_multiplicities[j] == 0 {
                periodic_abscissae.remove(j);
                periodic_multiplicities.remove(j);
            }
        }
        self.rebuild(
            self.max_multiplicity_order,
            periodic_abscissae,
            periodic_multiplicities,
        )
    }

    /// Reduce the maximum multiplicity order by one
    ///
    /// Knots at the former maximum multiplicity order lose one multiplicity, every other
    /// knot collapses to a simple knot, then the sequence is rebuilt from its period.
    /// Reducing an order 2 sequence yields an order 1 sequence, made of simple knots only.
    ///
    /// # Failures
    /// - if the order is already the lowest one
    /// - if an intermediate knot carries the full order outside of a C0 discontinuity sequence
    pub fn decrement_max_multiplicity_order(&self) -> KnotSequenceResult<Self> {
        let order = self.max_multiplicity_order;
        if order <= MIN_MAX_MULTIPLICITY_ORDER {
            return Err(KnotSequenceError::MultiplicityOrder {
                order,
                reason: "cannot be decremented any further".to_string(),
            });
        }
        let (periodic_abscissae, periodic_multiplicities) = self.periodic_projection();
        let last = periodic_multiplicities.len() - 1;
        if !self.is_sequence_up_to_c0_discontinuity {
            if let Some(j) = (1..last).find(|j| periodic_multiplicities[*j] >= order) {
                return Err(KnotSequenceError::IntermediateMultiplicity {
                    index: self.index_knot_origin.get() + j,
                    multiplicity: periodic_multiplicities[j],
                    maximum: order - 1,
                });
            }
        }
        let reduced = periodic_multiplicities
            .iter()
            .map(|m| if *m >= order { order - 1 } else { 1 })
            .collect();
        self.rebuild(order - 1, periodic_abscissae, reduced)
    }

    /// Reverse the parameterization: `u` becomes `u_max - u`
    pub fn revert_knot_sequence(&self) -> Self {
        self.inverse()
    }

    /// Rebuild a validated sequence from the knots of the current normalized basis window
    ///
    /// This is the way back to a consistent sequence after unchecked edits.
    /// The origin and `u_max` are one knot of the closed curve: when an unchecked edit
    /// raised only one of them, both take the larger multiplicity.
    pub fn update_knot_sequence_through_normalized_basis_analysis(
        &self,
    ) -> KnotSequenceResult<Self> {
        let origin = self.index_knot_origin.get();
        if origin >= self.abscissae.len() || !is_same_abscissa(self.abscissae[origin], T::zero()) {
            return Err(KnotSequenceError::Origin {
                abscissa: to_f64(self.abscissae[origin.min(self.abscissae.len() - 1)]),
            });
        }
        let upper_bound = self.index_upper_bound().get();
        if upper_bound <= origin {
            return Err(KnotSequenceError::InsufficientBasisSize {
                cumulative: self.multiplicities[origin],
                order: self.max_multiplicity_order,
            });
        }
        let abscissae = self.abscissae[origin..=upper_bound].to_vec();
        let mut multiplicities = self.multiplicities[origin..=upper_bound].to_vec();
        let last = multiplicities.len() - 1;
        let seam = multiplicities[0].max(multiplicities[last]);
        multiplicities[0] = seam;
        multiplicities[last] = seam;
        check_strictly_increasing_knots(&abscissae, &multiplicities)?;
        check_period(self.max_multiplicity_order, &multiplicities)?;
        let periodic = StrictlyIncreasingPeriodicKnotSequence::from_parts_unchecked(
            self.max_multiplicity_order,
            abscissae,
            multiplicities,
        );
        Self::try_from_periodic(&periodic, self.is_sequence_up_to_c0_discontinuity)
    }

    /// The knots of the normalized basis window as one period
    pub fn to_periodic_knot_sequence(&self) -> StrictlyIncreasingPeriodicKnotSequence<T> {
        let (abscissae, multiplicities) = self.periodic_projection();
        StrictlyIncreasingPeriodicKnotSequence::from_parts_unchecked(
            self.max_multiplicity_order,
            abscissae,
            multiplicities,
        )
    }

    pub fn to_increasing_index(
        &self,
        index: KnotIndexStrictlyIncreasing,
    ) -> KnotSequenceResult<KnotIndexIncreasing> {
        to_increasing_index(&self.multiplicities, index.get())
            .map(KnotIndexIncreasing::new)
            .ok_or(KnotSequenceError::IndexRange {
                index: index.get(),
                length: self.multiplicities.len(),
            })
    }

    pub fn to_strictly_increasing_index(
        &self,
        index: KnotIndexIncreasing,
    ) -> KnotSequenceResult<KnotIndexStrictlyIncreasing> {
        to_strictly_increasing_index(&self.multiplicities, index.get())
            .map(KnotIndexStrictlyIncreasing::new)
            .ok_or(KnotSequenceError::IndexRange {
                index: index.get(),
                length: self.multiplicities.iter().sum(),
            })
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

    fn periodic_projection(&self) -> (Vec<T>, Vec<usize>) {
        let origin = self.index_knot_origin.get();
        let upper_bound = self.index_upper_bound().get();
        (
            self.abscissae[origin..=upper_bound].to_vec(),
            self.multiplicities[origin..=upper_bound].to_vec(),
        )
    }

    /// Map knot indices onto the period, knots outside of the window onto their mirror.
    /// Returns `(index, index in the period)` pairs, one per distinct image.
    fn window_images(
        &self,
        indices: &[KnotIndexStrictlyIncreasing],
    ) -> KnotSequenceResult<Vec<(usize, usize)>> {
        let origin = self.index_knot_origin.get();
        let upper_bound = self.index_upper_bound().get();
        let period = self.u_max;
        let images = indices
            .iter()
            .map(|index| {
                let i = index.get();
                if (origin..=upper_bound).contains(&i) {
                    return Ok((i, i - origin));
                }
                let a = self.abscissae[i];
                let wrapped = a - period * (a / period).floor();
                (origin..=upper_bound)
                    .position(|w| {
                        is_same_abscissa(self.abscissae[w], wrapped)
                            || is_same_abscissa(self.abscissae[w] + period, wrapped)
                    })
                    .map(|j| (i, j))
                    .ok_or(if i < origin {
                        KnotSequenceError::LeftClosure { index: i }
                    } else {
                        KnotSequenceError::RightClosure { index: i }
                    })
            })
            .collect::<KnotSequenceResult<Vec<_>>>()?;
        Ok(images.into_iter().unique_by(|(_, j)| *j).collect())
    }

    fn rebuild(
        &self,
        max_multiplicity_order: usize,
        abscissae: Vec<T>,
        multiplicities: Vec<usize>,
    ) -> KnotSequenceResult<Self> {
        let periodic = StrictlyIncreasingPeriodicKnotSequence::try_new(
            max_multiplicity_order,
            abscissae,
            multiplicities,
        )?;
        Self::try_from_periodic(&periodic, self.is_sequence_up_to_c0_discontinuity)
    }
}

impl<T: FloatingPoint> Invertible for StrictlyIncreasingOpenKnotSequenceClosedCurve<T> {
    fn invert(&mut self) {
        let u_max = self.u_max;
        self.abscissae = self.abscissae.iter().rev().map(|a| u_max - *a).collect();
        self.multiplicities.reverse();
        let origin = self
            .abscissae
            .iter()
            .position(|a| is_same_abscissa(*a, T::zero()))
            .unwrap_or(0);
        self.index_knot_origin = KnotIndexStrictlyIncreasing::new(origin);
    }
}

impl<'a, T: FloatingPoint> IntoIterator for &'a StrictlyIncreasingOpenKnotSequenceClosedCurve<T> {
    type Item = Knot<T>;
    type IntoIter = Box<dyn Iterator<Item = Knot<T>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Plain fields shared by the two open representations
#[derive(Clone, Debug)]
pub(crate) struct OpenKnotSequenceParts<T> {
    pub max_multiplicity_order: usize,
    pub abscissae: Vec<T>,
    pub multiplicities: Vec<usize>,
    /// index of the origin in the strictly increasing space
    pub index_knot_origin: usize,
    pub u_max: T,
    pub is_sequence_up_to_c0_discontinuity: bool,
    pub is_knot_spacing_uniform: bool,
    pub is_knot_multiplicity_uniform: bool,
    pub is_knot_multiplicity_non_uniform: bool,
}

/// Index of the first knot, walking from the end, where the cumulative multiplicity
/// reaches the order
fn normalized_basis_upper_bound(
    order: usize,
    multiplicities: &[usize],
) -> KnotSequenceResult<usize> {
    let mut cumulative = 0;
    (0..multiplicities.len())
        .rev()
        .find(|i| {
            cumulative += multiplicities[*i];
            cumulative >= order
        })
        .ok_or(KnotSequenceError::InsufficientBasisSize {
            cumulative: multiplicities.iter().sum(),
            order,
        })
}

pub(crate) fn check_boundary_multiplicities(
    order: usize,
    origin: usize,
    upper_bound: usize,
) -> KnotSequenceResult<()> {
    if origin != upper_bound && (origin >= order || upper_bound >= order) {
        return Err(KnotSequenceError::BoundaryMultiplicityMismatch {
            origin,
            upper_bound,
        });
    }
    Ok(())
}

pub(crate) fn check_parameter_range<T: FloatingPoint>(u: T, u_max: T) -> KnotSequenceResult<()> {
    let under = u < T::zero() && !is_same_abscissa(u, T::zero());
    let over = u > u_max && !is_same_abscissa(u, u_max);
    if under || over {
        return Err(KnotSequenceError::OutOfRange {
            u: to_f64(u),
            lower: 0.,
            upper: to_f64(u_max),
        });
    }
    Ok(())
}
