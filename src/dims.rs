//! Per-axis index bounds of an inspected array.

use std::fmt;

use smallvec::SmallVec;

/// Maximum rank of arrays that can be inspected.
///
/// This matches the highest-rank array class in the ObjexxFCL library
/// (`Array6`).
pub const MAX_RANK: usize = 6;

/// Inclusive index bounds `{lower:upper}` for one axis of an array.
///
/// Arrays in the inspected library use arbitrary, Fortran-style index ranges
/// rather than zero-based ones, so a dimension declared as `{2:4}` has three
/// elements with indices 2, 3 and 4.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DimBounds {
    lower: i64,
    upper: i64,
}

impl DimBounds {
    pub fn new(lower: i64, upper: i64) -> DimBounds {
        DimBounds { lower, upper }
    }

    /// Return the first valid index along this axis.
    pub fn lower(&self) -> i64 {
        self.lower
    }

    /// Return the last valid index along this axis.
    pub fn upper(&self) -> i64 {
        self.upper
    }

    /// Return the number of indices in `lower..=upper`.
    ///
    /// An upper bound below the lower bound describes an empty dimension and
    /// has size zero. Sizes that do not fit in a `usize` saturate.
    pub fn size(&self) -> usize {
        let size = (self.upper as i128 - self.lower as i128 + 1).max(0);
        usize::try_from(size).unwrap_or(usize::MAX)
    }

    /// Return true if this dimension contains no indices.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Map a zero-based position along this axis to the declared index.
    pub fn index_label(&self, position: usize) -> i64 {
        debug_assert!(position < self.size(), "position out of bounds");
        self.lower.wrapping_add(position as i64)
    }
}

impl fmt::Display for DimBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}:{}}}", self.lower, self.upper)
    }
}

/// Bounds of every discovered axis, in discovery order.
pub type DimList = SmallVec<[DimBounds; MAX_RANK]>;

/// Return the sizes of each dimension in `dims`.
pub fn shape_of(dims: &[DimBounds]) -> SmallVec<[usize; MAX_RANK]> {
    dims.iter().map(|d| d.size()).collect()
}

/// Render bounds as `{l:u} x {l:u} x ...`.
pub fn format_bounds(dims: &[DimBounds]) -> String {
    let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
    parts.join(" x ")
}

/// Label of one element, formed from the declared index along each axis.
///
/// Labels of rank-1 elements display as a bare index (`3`), higher ranks as
/// a parenthesized tuple in axis order (`(1, 3)`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexLabel(SmallVec<[i64; MAX_RANK]>);

impl IndexLabel {
    /// Build the label for a zero-based multi-index.
    pub fn new(dims: &[DimBounds], index: &[usize]) -> IndexLabel {
        assert_eq!(dims.len(), index.len(), "index rank mismatch");
        IndexLabel(
            dims.iter()
                .zip(index)
                .map(|(dim, &pos)| dim.index_label(pos))
                .collect(),
        )
    }

    /// Return the declared index along each axis.
    pub fn indices(&self) -> &[i64] {
        &self.0
    }
}

impl fmt::Display for IndexLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [index] = self.0.as_slice() {
            return write!(f, "{}", index);
        }
        write!(f, "(")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, ")")
    }
}
