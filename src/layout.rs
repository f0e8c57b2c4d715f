//! Column-major mapping between multi-indices and storage offsets.

use smallvec::SmallVec;

use crate::dims::MAX_RANK;
use crate::index_iterator::{Index, Indices};

/// Describes the shape of a densely packed array stored in column-major
/// (Fortran) order, ie. the first axis varies fastest.
///
/// Axis 0 has stride 1, axis 1 has stride `shape[0]`, axis 2 has stride
/// `shape[0] * shape[1]` and so on.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnMajorLayout {
    shape: SmallVec<[usize; MAX_RANK]>,
    strides: SmallVec<[usize; MAX_RANK]>,
    len: usize,
}

impl ColumnMajorLayout {
    /// Create a layout for an array with a given shape.
    ///
    /// Returns `None` if the number of elements overflows `usize`.
    pub fn from_shape(shape: &[usize]) -> Option<ColumnMajorLayout> {
        let mut strides = SmallVec::with_capacity(shape.len());
        let len = if shape.contains(&0) {
            // Strides are never used to compute an offset when the array is
            // empty, so saturating keeps them well-defined.
            let mut stride = 1usize;
            for &size in shape {
                strides.push(stride);
                stride = stride.saturating_mul(size);
            }
            0
        } else {
            let mut stride = 1usize;
            for &size in shape {
                strides.push(stride);
                stride = stride.checked_mul(size)?;
            }
            stride
        };

        Some(ColumnMajorLayout {
            shape: SmallVec::from_slice(shape),
            strides,
            len,
        })
    }

    /// Return the number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Return the number of elements in the array.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return true if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return the size of each dimension.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Return the offset between adjacent indices along each dimension.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Map a zero-based index to a storage offset.
    ///
    /// Panics if any dimension of the index is out of bounds.
    pub fn offset(&self, index: &[usize]) -> usize {
        self.try_offset(index).unwrap_or_else(|| {
            panic!(
                "index {:?} out of bounds for shape {:?}",
                index,
                self.shape.as_slice()
            )
        })
    }

    /// Map a zero-based index to a storage offset, or return `None` if the
    /// index has the wrong length or is out of bounds along any dimension.
    pub fn try_offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.ndim() {
            return None;
        }

        let mut offset = 0;
        let mut stride = 1;
        for axis in 0..self.ndim() {
            if index[axis] >= self.shape[axis] {
                return None;
            }
            offset += index[axis] * stride;
            stride *= self.shape[axis];
        }
        Some(offset)
    }

    /// Map a storage offset back to the zero-based index that refers to it.
    ///
    /// This is the column-major mixed-radix decomposition of `offset`, with
    /// the dimension sizes as radices. Returns `None` if `offset` is out of
    /// bounds.
    pub fn index_of(&self, offset: usize) -> Option<Index> {
        if offset >= self.len {
            return None;
        }
        let mut remainder = offset;
        let index = self
            .shape
            .iter()
            .map(|&size| {
                let pos = remainder % size;
                remainder /= size;
                pos
            })
            .collect();
        Some(index)
    }

    /// Return an iterator over all valid indices, in storage order.
    pub fn indices(&self) -> Indices {
        Indices::from_shape(&self.shape)
    }
}
