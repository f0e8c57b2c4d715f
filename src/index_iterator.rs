use std::iter::FusedIterator;

use smallvec::{smallvec, SmallVec};

use crate::dims::MAX_RANK;

/// Zero-based multi-index into an array, one entry per axis.
pub type Index = SmallVec<[usize; MAX_RANK]>;

/// Iterator over the N-dimensional indices of an array with a given shape,
/// in column-major order.
///
/// The index advances like an odometer whose first wheel turns fastest:
/// axis 0 is incremented, and when it reaches its size it wraps to zero and
/// carries into axis 1, and so on. This visits indices in the same order as
/// nested loops with axis 0 innermost.
///
/// Unlike row-major index iterators, a rank-0 shape is not meaningful here
/// and yields no indices.
#[derive(Clone, Debug)]
pub struct Indices {
    shape: Index,

    next: Option<Index>,

    /// Linear position of `next`.
    position: usize,

    /// Total number of indices.
    len: usize,
}

impl Indices {
    /// Return an iterator over all the indices where each dimension is between
    /// `0` and `shape[dim]`.
    pub fn from_shape(shape: &[usize]) -> Indices {
        let len = if shape.is_empty() {
            0
        } else {
            shape
                .iter()
                .try_fold(1usize, |acc, &size| acc.checked_mul(size))
                .unwrap_or(usize::MAX)
        };
        Indices {
            shape: SmallVec::from_slice(shape),
            next: (len > 0).then(|| smallvec![0; shape.len()]),
            position: 0,
            len,
        }
    }

    /// Return the linear position of the next index that will be yielded.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Decompose a linear position into a multi-index.
    fn index_at(&self, position: usize) -> Index {
        let mut remainder = position;
        self.shape
            .iter()
            .map(|&size| {
                let pos = remainder % size;
                remainder /= size;
                pos
            })
            .collect()
    }
}

impl Iterator for Indices {
    type Item = Index;

    /// Return the next index in the sequence, or `None` after all indices
    /// have been returned.
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        let mut next = current.clone();
        let mut has_next = false;
        for (&size, index) in self.shape.iter().zip(next.iter_mut()) {
            *index += 1;
            if *index == size {
                *index = 0;
            } else {
                has_next = true;
                break;
            }
        }

        self.next = has_next.then_some(next);
        self.position += 1;

        Some(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.position;
        (remaining, Some(remaining))
    }

    /// Skip ahead `n` indices without visiting the ones in between.
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let target = match self.position.checked_add(n) {
            Some(target) if target < self.len => target,
            _ => {
                self.next = None;
                self.position = self.len;
                return None;
            }
        };
        if n > 0 {
            self.next = Some(self.index_at(target));
            self.position = target;
        }
        self.next()
    }
}

impl ExactSizeIterator for Indices {}

impl FusedIterator for Indices {}
