use std::ops::Index;

use itertools::Itertools;

use crate::misc::{is_same_abscissa, FloatingPoint};

use super::Knot;

/// Flat knot vector representation
/// Every knot appears as many times as its multiplicity, in non-decreasing order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnotVector<T>(Vec<T>);

impl<T: FloatingPoint> KnotVector<T> {
    pub fn new(knots: Vec<T>) -> Self {
        Self(knots)
    }

    /// Create a knot vector from distinct abscissae and their multiplicities
    /// # Example
    /// ```
    /// use closed_knots::prelude::KnotVector;
    /// let knots = KnotVector::from_multiplicities(&[0., 0.5, 1.], &[2, 1, 2]);
    /// assert_eq!(knots.to_vec(), vec![0., 0., 0.5, 1., 1.]);
    /// ```
    pub fn from_multiplicities(abscissae: &[T], multiplicities: &[usize]) -> Self {
        abscissae
            .iter()
            .zip(multiplicities.iter())
            .flat_map(|(a, m)| std::iter::repeat_n(*a, *m))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.0.clone()
    }

    pub fn first(&self) -> T {
        self.0[0]
    }

    pub fn last(&self) -> T {
        self.0[self.0.len() - 1]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Returns the index of the last knot lower than or equal to knot
    pub fn floor(&self, knot: T) -> Option<usize> {
        self.iter().rposition(|t| *t <= knot)
    }

    /// Iterate over the distinct knots with their multiplicity
    /// Abscissae closer than the knot coincidence tolerance are merged.
    pub fn knots(&self) -> impl Iterator<Item = Knot<T>> + '_ {
        self.0
            .iter()
            .dedup_by_with_count(|a, b| is_same_abscissa(**a, **b))
            .map(|(multiplicity, abscissa)| Knot::new(*abscissa, multiplicity))
    }

    /// Get the multiplicity of each knot
    /// # Example
    /// ```
    /// use closed_knots::prelude::KnotVector;
    /// let knots = KnotVector::new(vec![0., 0., 0., 1., 2., 3., 3., 3.]);
    /// let knot_multiplicity = knots.multiplicity();
    /// assert_eq!(knot_multiplicity[0].multiplicity(), 3);
    /// assert_eq!(knot_multiplicity[1].multiplicity(), 1);
    /// assert_eq!(knot_multiplicity[2].multiplicity(), 1);
    /// assert_eq!(knot_multiplicity[3].multiplicity(), 3);
    /// ```
    pub fn multiplicity(&self) -> Vec<Knot<T>> {
        self.knots().collect()
    }

    /// Split the knot vector into distinct abscissae and multiplicities
    pub fn run_length_encode(&self) -> (Vec<T>, Vec<usize>) {
        self.knots()
            .map(|knot| (knot.abscissa(), knot.multiplicity()))
            .unzip()
    }

    /// Check if the knot vector is clamped
    /// `clamped` means the first and last knots have a multiplicity greater than the degree
    /// e.g. [0, 0, 0, 1, 2, 3, 3, 3] with degree 2 is clamped
    pub fn is_clamped(&self, degree: usize) -> bool {
        let multiplicity = self.multiplicity();
        let start = multiplicity.first();
        let end = multiplicity.last();
        match (start, end) {
            (Some(start), Some(end)) => {
                start.multiplicity() > degree && end.multiplicity() > degree
            }
            _ => false,
        }
    }

    /// Find the knot span index by binary search
    /// `n` is the number of basis functions - 1, so that the domain is `[knots[degree], knots[n + 1]]`.
    /// A parameter at the upper bound of the domain falls in the last non empty span.
    ///
    /// # Example
    /// ```
    /// use closed_knots::prelude::KnotVector;
    /// let knots = KnotVector::new(vec![0., 0., 0., 1., 2., 3., 3., 3.]);
    /// let idx = knots.find_knot_span_index(4, 2, 2.5);
    /// assert_eq!(idx, 4);
    /// ```
    pub fn find_knot_span_index(&self, n: usize, degree: usize, u: T) -> usize {
        if is_same_abscissa(u, self[n + 1]) || u > self[n + 1] {
            return n;
        }

        if u < self[degree] || is_same_abscissa(u, self[degree]) {
            return degree;
        }

        // binary search
        let mut low = degree;
        let mut high = n + 1;
        let mut mid = (low + high) / 2;
        while u < self[mid] || self[mid + 1] <= u {
            if u < self[mid] {
                high = mid;
            } else {
                low = mid;
            }
            let next = (low + high) / 2;
            if mid == next {
                break;
            }
            mid = next;
        }

        // a parameter within the tolerance of the next knot belongs to the next span
        while mid < n && is_same_abscissa(u, self[mid + 1]) {
            mid += 1;
        }

        mid
    }

    /// Reflect the knot vector around `axis / 2`, i.e. map every knot `t` to `axis - t`
    /// while keeping the vector non-decreasing.
    /// # Example
    /// ```
    /// use closed_knots::prelude::KnotVector;
    /// let knots = KnotVector::new(vec![-1., -0.5, 0., 0.5, 2., 2.5, 3.]);
    /// let reflected = knots.reflect(2.);
    /// assert_eq!(reflected.to_vec(), vec![-1., -0.5, 0., 1.5, 2., 2.5, 3.]);
    /// ```
    pub fn reflect(&self, axis: T) -> Self {
        self.0.iter().rev().map(|t| axis - *t).collect()
    }
}

impl<T> Index<usize> for KnotVector<T> {
    type Output = T;
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T> FromIterator<T> for KnotVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
