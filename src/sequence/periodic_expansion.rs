use crate::misc::FloatingPoint;

/// Synthesize the clamped knots of a closed curve from one period of knots.
///
/// `abscissae` and `multiplicities` describe one period in strictly increasing form:
/// the first abscissa is the origin and the last one the end of the period, both
/// standing for the same knot of the closed curve.
///
/// Knots are borrowed from the opposite end of the period, translated by the period
/// length, until the cumulative multiplicity from the first knot through the origin
/// (and from the end of the period through the last knot) reaches `order`.
/// The multiplicity of the outermost borrowed knot is clipped so that the count
/// never exceeds `order`; the walk wraps around the period if a single period
/// does not carry enough multiplicity.
///
/// The returned sequence is `left complement + period + right complement`,
/// in strictly increasing form. No validation is performed here.
///
/// # Example
/// ```
/// use closed_knots::prelude::*;
/// let (abscissae, multiplicities) = expand_periodic_knots(3, &[0., 1., 2.], &[1, 1, 1]);
/// assert_eq!(abscissae, vec![-2., -1., 0., 1., 2., 3., 4.]);
/// assert_eq!(multiplicities, vec![1; 7]);
/// ```
pub fn expand_periodic_knots<T: FloatingPoint>(
    order: usize,
    abscissae: &[T],
    multiplicities: &[usize],
) -> (Vec<T>, Vec<usize>) {
    let n = abscissae.len().min(multiplicities.len());
    if n < 2 {
        return (abscissae[..n].to_vec(), multiplicities[..n].to_vec());
    }

    let period = abscissae[n - 1] - abscissae[0];

    // walk leftwards from the knot preceding the end of the period
    let left = complement(order, multiplicities[0], n, |step| {
        let turn = step / (n - 1);
        let j = n - 2 - step % (n - 1);
        let shift = period * T::from_usize(turn + 1).unwrap_or_else(T::one);
        (abscissae[j] - shift, multiplicities[j])
    });

    // walk rightwards from the knot following the origin
    let right = complement(order, multiplicities[n - 1], n, |step| {
        let turn = step / (n - 1);
        let j = 1 + step % (n - 1);
        let shift = period * T::from_usize(turn + 1).unwrap_or_else(T::one);
        (abscissae[j] + shift, multiplicities[j])
    });

    let mut expanded_abscissae = Vec::with_capacity(left.len() + n + right.len());
    let mut expanded_multiplicities = Vec::with_capacity(left.len() + n + right.len());
    left.iter().rev().for_each(|(a, m)| {
        expanded_abscissae.push(*a);
        expanded_multiplicities.push(*m);
    });
    expanded_abscissae.extend_from_slice(&abscissae[..n]);
    expanded_multiplicities.extend_from_slice(&multiplicities[..n]);
    right.iter().for_each(|(a, m)| {
        expanded_abscissae.push(*a);
        expanded_multiplicities.push(*m);
    });

    (expanded_abscissae, expanded_multiplicities)
}

/// Collect the complementary knots of one side, nearest to the boundary first
fn complement<T, F>(
    order: usize,
    boundary_multiplicity: usize,
    n: usize,
    candidate: F,
) -> Vec<(T, usize)>
where
    F: Fn(usize) -> (T, usize),
{
    let mut deficit = order.saturating_sub(boundary_multiplicity);
    let mut knots = vec![];
    let mut step = 0;
    while deficit > 0 && n > 1 {
        let (abscissa, multiplicity) = candidate(step);
        let multiplicity = multiplicity.min(deficit);
        if multiplicity == 0 {
            break;
        }
        knots.push((abscissa, multiplicity));
        deficit -= multiplicity;
        step += 1;
    }
    knots
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::expand_periodic_knots;

    #[test]
    fn uniform_period() {
        let (abscissae, multiplicities) =
            expand_periodic_knots(4, &[0., 1., 2., 3., 4., 5., 6., 7.], &[1; 8]);
        let expected: Vec<f64> = (-3..=10).map(|i| i as f64).collect();
        assert_eq!(abscissae, expected);
        assert_eq!(multiplicities, vec![1; 14]);
    }

    #[test]
    fn clamped_period_is_left_untouched() {
        let (abscissae, multiplicities) =
            expand_periodic_knots(4, &[0., 0.5, 0.6, 0.7, 1.], &[4, 1, 1, 2, 4]);
        assert_eq!(abscissae, vec![0., 0.5, 0.6, 0.7, 1.]);
        assert_eq!(multiplicities, vec![4, 1, 1, 2, 4]);
    }

    #[test]
    fn outermost_knot_multiplicity_is_clipped() {
        // order 4, boundary multiplicity 1: three knots are borrowed on each side
        let (abscissae, multiplicities) =
            expand_periodic_knots(4, &[0., 0.2, 0.5, 1.], &[1, 1, 3, 1]);
        let expected = [-0.5, 0., 0.2, 0.5, 1., 1.2, 1.5];
        assert_eq!(abscissae.len(), expected.len());
        abscissae
            .iter()
            .zip(expected.iter())
            .for_each(|(a, e)| assert_relative_eq!(*a, *e, epsilon = 1e-12));
        assert_eq!(multiplicities, vec![3, 1, 1, 3, 1, 1, 2]);
    }

    #[test]
    fn walk_wraps_around_short_periods() {
        // a single interior-free period of order 1 needs no complement
        let (abscissae, multiplicities) = expand_periodic_knots(1, &[0., 1.], &[1, 1]);
        assert_eq!(abscissae, vec![0., 1.]);
        assert_eq!(multiplicities, vec![1, 1]);

        // order 3 with the minimal period [0, 1] (insufficient basis) still terminates
        let (abscissae, multiplicities) = expand_periodic_knots(3, &[0., 1.], &[1, 1]);
        assert_eq!(abscissae, vec![-2., -1., 0., 1., 2., 3.]);
        assert_eq!(multiplicities, vec![1; 6]);
    }
}
