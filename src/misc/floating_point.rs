use approx::AbsDiffEq;
use nalgebra::{convert, RealField};
use num_traits::ToPrimitive;

/// Trait for floating point types (f32, f64)
/// Mainly used to identify the type of the field in nalgebra
pub trait FloatingPoint: RealField + ToPrimitive + Copy {}

impl FloatingPoint for f32 {}
impl FloatingPoint for f64 {}

/// Distance under which two abscissae are considered to be the same knot.
/// Callers must not supply distinct knots closer than this value.
pub const KNOT_COINCIDENCE_TOLERANCE: f64 = 1e-10;

/// Scale of the machine epsilon absorbing the rounding of knots translated by a period
const EPSILON_SCALE: f64 = 64.;

/// The knot coincidence tolerance for the scalar type:
/// `KNOT_COINCIDENCE_TOLERANCE`, widened to a few ulps for scalars coarser than `f64`
pub fn knot_tolerance<T: FloatingPoint>() -> T {
    let absolute: T = convert(KNOT_COINCIDENCE_TOLERANCE);
    let scaled = T::default_epsilon() * convert(EPSILON_SCALE);
    if scaled > absolute {
        scaled
    } else {
        absolute
    }
}

/// Check if two abscissae designate the same knot
pub fn is_same_abscissa<T: FloatingPoint>(a: T, b: T) -> bool {
    (a - b).abs() <= knot_tolerance()
}

/// Lossy conversion used to report abscissae in errors
pub(crate) fn to_f64<T: FloatingPoint>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coincidence() {
        assert!(is_same_abscissa(1.0, 1.0 + 1e-12));
        assert!(!is_same_abscissa(1.0, 1.0 + 1e-6));
        assert!(is_same_abscissa(0.0_f64, -0.0));
    }

    #[test]
    fn tolerance_follows_the_scalar_precision() {
        assert_eq!(knot_tolerance::<f64>(), KNOT_COINCIDENCE_TOLERANCE);
        assert!(knot_tolerance::<f32>() > f32::EPSILON);
        assert!(is_same_abscissa(1.3_f32 - 0.6, 0.7));
        assert!(!is_same_abscissa(0.7_f32, 0.7001));
    }
}
