use thiserror::Error;

/// Errors raised while building, querying or editing a knot sequence.
///
/// Abscissae are reported as `f64` whatever the scalar type of the sequence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KnotSequenceError {
    // ─── Structural input errors ─────────────────────────────────────────────
    #[error("knot sequence is empty")]
    EmptySequence,

    #[error("abscissae and multiplicities differ in length: {abscissae} != {multiplicities}")]
    LengthMismatch {
        abscissae: usize,
        multiplicities: usize,
    },

    #[error("knot at index {index} has a null multiplicity")]
    ZeroMultiplicity { index: usize },

    #[error("abscissae are not increasing at index {index}")]
    NonIncreasing { index: usize },

    #[error("abscissae are not strictly increasing at index {index}")]
    NonStrictlyIncreasing { index: usize },

    // ─── Multiplicity order errors ───────────────────────────────────────────
    #[error("invalid maximum multiplicity order {order}: {reason}")]
    MultiplicityOrder { order: usize, reason: String },

    #[error(
        "multiplicity {multiplicity} of the intermediate knot at index {index} exceeds the allowed {maximum}"
    )]
    IntermediateMultiplicity {
        index: usize,
        multiplicity: usize,
        maximum: usize,
    },

    #[error(
        "multiplicity {multiplicity} of the knot at index {index} exceeds the maximum multiplicity order {order}"
    )]
    AtKnotMultiplicity {
        index: usize,
        multiplicity: usize,
        order: usize,
    },

    // ─── Normalized basis / closure errors ───────────────────────────────────
    #[error("no knot lies at the origin of the parameter domain (found {abscissa})")]
    Origin { abscissa: f64 },

    #[error(
        "cumulative multiplicity {cumulative} over one period is too small to build a basis of order {order}"
    )]
    InsufficientBasisSize { cumulative: usize, order: usize },

    #[error(
        "normalized basis boundary multiplicities differ: origin {origin}, upper bound {upper_bound}"
    )]
    BoundaryMultiplicityMismatch { origin: usize, upper_bound: usize },

    #[error("knot pattern left of the origin does not close the curve at index {index}")]
    LeftClosure { index: usize },

    #[error("knot pattern right of the upper bound does not close the curve at index {index}")]
    RightClosure { index: usize },

    #[error(
        "cumulative multiplicity from the first knot through the origin is {cumulative}, expected {order}"
    )]
    FirstKnotMultiplicity { cumulative: usize, order: usize },

    #[error(
        "cumulative multiplicity from the upper bound through the last knot is {cumulative}, expected {order}"
    )]
    LastKnotMultiplicity { cumulative: usize, order: usize },

    #[error("knot at index {index} bounds the normalized basis and cannot be modified")]
    NormalizedBasisModification { index: usize },

    // ─── Range errors ────────────────────────────────────────────────────────
    #[error("parameter {u} lies outside the knot domain [{lower}, {upper}]")]
    OutOfRange { u: f64, lower: f64, upper: f64 },

    #[error("index {index} is out of range, length is {length}")]
    IndexRange { index: usize, length: usize },

    #[error("abscissa {abscissa} matches a knot outside the normalized basis")]
    AbscissaOutOfRange { abscissa: f64 },

    #[error("abscissa {abscissa} is too close to the existing knot {knot}")]
    TooCloseToExistingKnot { abscissa: f64, knot: f64 },

    #[error("abscissa {abscissa} is over the upper bound {upper_bound}")]
    OverUpperBound { abscissa: f64, upper_bound: f64 },

    #[error("abscissa {abscissa} is under the origin")]
    UnderOrigin { abscissa: f64 },
}

pub type KnotSequenceResult<T> = Result<T, KnotSequenceError>;
