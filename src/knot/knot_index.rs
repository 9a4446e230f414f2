//! Index handles of the two knot sequence representations.
//!
//! A knot sequence is either stored flat (one entry per unit of multiplicity,
//! the *increasing* form) or run-length encoded (one entry per distinct abscissa,
//! the *strictly increasing* form). An index is only meaningful in the space it
//! was produced in, so each space gets its own phantom-tagged wrapper around
//! `usize`: passing an increasing index where a strictly increasing one is
//! expected does not compile. Converting between the two spaces depends on the
//! multiplicities and is therefore an operation of the sequence itself.

use std::marker::PhantomData;

/// Tag naming an index space for display purposes.
pub trait KnotIndexTag: Clone {
    const NAME: &'static str;
}

/// Tag of the flat (increasing) index space.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct IncreasingTag;

impl KnotIndexTag for IncreasingTag {
    const NAME: &'static str = "KnotIndexIncreasing";
}

/// Tag of the run-length encoded (strictly increasing) index space.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StrictlyIncreasingTag;

impl KnotIndexTag for StrictlyIncreasingTag {
    const NAME: &'static str = "KnotIndexStrictlyIncreasing";
}

/// A `usize` index bound to one knot index space.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent, bound = "")
)]
pub struct KnotIndex<S> {
    index: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    _space: PhantomData<S>,
}

/// Index of a knot in the increasing (flat) representation
pub type KnotIndexIncreasing = KnotIndex<IncreasingTag>;

/// Index of a knot in the strictly increasing (run-length encoded) representation
pub type KnotIndexStrictlyIncreasing = KnotIndex<StrictlyIncreasingTag>;

impl<S> KnotIndex<S> {
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _space: PhantomData,
        }
    }

    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }

    #[inline(always)]
    pub const fn is_zero(&self) -> bool {
        self.index == 0
    }
}

impl<S: KnotIndexTag> std::fmt::Debug for KnotIndex<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", S::NAME, self.index)
    }
}

impl<S: KnotIndexTag> std::fmt::Display for KnotIndex<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", S::NAME, self.index)
    }
}
