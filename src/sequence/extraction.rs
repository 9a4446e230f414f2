use crate::misc::FloatingPoint;

use super::{
    IncreasingOpenKnotSequenceClosedCurve, IncreasingPeriodicKnotSequence,
    StrictlyIncreasingOpenKnotSequenceClosedCurve, StrictlyIncreasingPeriodicKnotSequence,
};

/// Plain description of a clamped sequence, as consumed by a B-spline evaluator
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenKnotSequenceParameters<T> {
    pub max_multiplicity_order: usize,
    /// flat index of the left bound of the normalized basis, `order - 1`
    pub index_left_normalized_basis: usize,
    /// flat index of the right bound of the normalized basis, `length - order`
    pub index_right_normalized_basis: usize,
    pub knots: Vec<T>,
    pub abscissae: Vec<T>,
    pub multiplicities: Vec<usize>,
}

/// Plain description of one period of knots
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeriodicKnotSequenceParameters<T> {
    pub max_multiplicity_order: usize,
    pub periodic_knots: Vec<T>,
    pub multiplicities: Vec<usize>,
    pub free_knots: Vec<T>,
}

impl<T: FloatingPoint> From<&IncreasingOpenKnotSequenceClosedCurve<T>>
    for OpenKnotSequenceParameters<T>
{
    fn from(value: &IncreasingOpenKnotSequenceClosedCurve<T>) -> Self {
        let order = value.max_multiplicity_order();
        Self {
            max_multiplicity_order: order,
            index_left_normalized_basis: order - 1,
            index_right_normalized_basis: value.length() - order,
            knots: value.knots().to_vec(),
            abscissae: value.distinct_abscissae(),
            multiplicities: value.multiplicities(),
        }
    }
}

impl<T: FloatingPoint> From<&StrictlyIncreasingOpenKnotSequenceClosedCurve<T>>
    for OpenKnotSequenceParameters<T>
{
    fn from(value: &StrictlyIncreasingOpenKnotSequenceClosedCurve<T>) -> Self {
        Self::from(&IncreasingOpenKnotSequenceClosedCurve::from(value))
    }
}

impl<T: FloatingPoint> From<&StrictlyIncreasingPeriodicKnotSequence<T>>
    for PeriodicKnotSequenceParameters<T>
{
    fn from(value: &StrictlyIncreasingPeriodicKnotSequence<T>) -> Self {
        Self {
            max_multiplicity_order: value.max_multiplicity_order(),
            periodic_knots: value.distinct_abscissae(),
            multiplicities: value.multiplicities(),
            free_knots: value.free_knots(),
        }
    }
}

impl<T: FloatingPoint> From<&IncreasingPeriodicKnotSequence<T>>
    for PeriodicKnotSequenceParameters<T>
{
    fn from(value: &IncreasingPeriodicKnotSequence<T>) -> Self {
        Self::from(&StrictlyIncreasingPeriodicKnotSequence::from(value))
    }
}

impl<T: FloatingPoint> IncreasingOpenKnotSequenceClosedCurve<T> {
    /// Extract the parameters of the clamped sequence
    ///
    /// # Example
    /// ```
    /// use closed_knots::prelude::*;
    /// let sequence = IncreasingOpenKnotSequenceClosedCurve::<f64>::try_minimal(3).unwrap();
    /// let parameters = sequence.open_parameters();
    /// assert_eq!(parameters.index_left_normalized_basis, 2);
    /// assert_eq!(parameters.index_right_normalized_basis, 4);
    /// assert_eq!(parameters.knots[4], 2.);
    /// ```
    pub fn open_parameters(&self) -> OpenKnotSequenceParameters<T> {
        self.into()
    }

    /// Extract the parameters of the period
    pub fn periodic_parameters(&self) -> PeriodicKnotSequenceParameters<T> {
        (&self.to_periodic_knot_sequence()).into()
    }
}

impl<T: FloatingPoint> StrictlyIncreasingOpenKnotSequenceClosedCurve<T> {
    pub fn open_parameters(&self) -> OpenKnotSequenceParameters<T> {
        self.into()
    }

    pub fn periodic_parameters(&self) -> PeriodicKnotSequenceParameters<T> {
        (&self.to_periodic_knot_sequence()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_parameters() {
        let sequence = StrictlyIncreasingOpenKnotSequenceClosedCurve::try_new(
            4,
            vec![0., 0.5, 0.6, 0.7, 1.],
            vec![4, 1, 1, 2, 4],
        )
        .unwrap();
        let open = sequence.open_parameters();
        assert_eq!(open.index_left_normalized_basis, 3);
        assert_eq!(open.index_right_normalized_basis, 8);
        assert_eq!(open.knots.len(), 12);
        assert_eq!(open.knots[3], 0.);
        assert_eq!(open.knots[8], 1.);
        assert_eq!(open.abscissae, vec![0., 0.5, 0.6, 0.7, 1.]);

        let periodic = sequence.periodic_parameters();
        assert_eq!(periodic.periodic_knots, vec![0., 0.5, 0.6, 0.7, 1.]);
        assert_eq!(periodic.multiplicities, vec![4, 1, 1, 2, 4]);
        assert_eq!(periodic.free_knots, vec![0.5, 0.6, 0.7]);
    }
}
