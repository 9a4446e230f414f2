/// Construction configurations of the knot sequence of a closed curve.
///
/// `multiplicities`, when present, runs parallel to the abscissae which must then be
/// strictly increasing. When absent, the abscissae are read as a flat non-decreasing
/// array where a repeated abscissa stands for a multiple knot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KnotSequenceConfiguration<T> {
    /// Smallest uniform sequence supporting a basis of the given order
    Minimal { max_multiplicity_order: usize },
    /// Uniform sequence with `basis_size` unit spans per period
    Uniform {
        max_multiplicity_order: usize,
        basis_size: usize,
    },
    /// One period of knots starting at the origin, expanded into a clamped sequence
    PeriodicKnots {
        max_multiplicity_order: usize,
        periodic_knots: Vec<T>,
        multiplicities: Option<Vec<usize>>,
    },
    /// The complete clamped sequence
    AllKnots {
        max_multiplicity_order: usize,
        knots: Vec<T>,
        multiplicities: Option<Vec<usize>>,
    },
    /// Same as `PeriodicKnots`, intermediate knots may reach the maximum multiplicity order
    PeriodicKnotsUpToC0Discontinuity {
        max_multiplicity_order: usize,
        periodic_knots: Vec<T>,
        multiplicities: Option<Vec<usize>>,
    },
    /// Same as `AllKnots`, intermediate knots may reach the maximum multiplicity order
    AllKnotsUpToC0Discontinuity {
        max_multiplicity_order: usize,
        knots: Vec<T>,
        multiplicities: Option<Vec<usize>>,
    },
}

impl<T> KnotSequenceConfiguration<T> {
    pub fn max_multiplicity_order(&self) -> usize {
        match self {
            Self::Minimal {
                max_multiplicity_order,
            }
            | Self::Uniform {
                max_multiplicity_order,
                ..
            }
            | Self::PeriodicKnots {
                max_multiplicity_order,
                ..
            }
            | Self::AllKnots {
                max_multiplicity_order,
                ..
            }
            | Self::PeriodicKnotsUpToC0Discontinuity {
                max_multiplicity_order,
                ..
            }
            | Self::AllKnotsUpToC0Discontinuity {
                max_multiplicity_order,
                ..
            } => *max_multiplicity_order,
        }
    }

    /// Check if intermediate knots may carry C0 discontinuities
    pub fn is_up_to_c0_discontinuity(&self) -> bool {
        matches!(
            self,
            Self::PeriodicKnotsUpToC0Discontinuity { .. } | Self::AllKnotsUpToC0Discontinuity { .. }
        )
    }
}
