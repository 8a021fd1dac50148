//! Mutable integer sequence
//!
//! Plain `Vec`-backed storage with bounds-checked O(1) reads and writes.
//! The caches in `memocache` read from it on a miss but never own it.

use crate::error::{Error, Result};

/// Indexable numeric sequence with O(1) element access
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    values: Vec<i64>,
}

impl Sequence {
    /// Create a sequence from the given values
    pub fn new(values: Vec<i64>) -> Self {
        Self { values }
    }

    /// Read the element at `position`
    pub fn read(&self, position: usize) -> Result<i64> {
        self.values
            .get(position)
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                index: position,
                len: self.values.len(),
            })
    }

    /// Overwrite the element at `position`
    pub fn write(&mut self, position: usize, value: i64) -> Result<()> {
        let len = self.values.len();
        match self.values.get_mut(position) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds {
                index: position,
                len,
            }),
        }
    }

    /// Sum of the elements at positions `l..=r`, computed without any cache
    ///
    /// # Errors
    /// * `Error::SumOverflow` - the sum does not fit in an `i64`
    pub fn range_sum(&self, l: usize, r: usize) -> Result<i64> {
        self.check_range(l, r)?;
        // Widened so only the final total has to fit
        let total: i128 = self.values[l..=r].iter().map(|&v| i128::from(v)).sum();
        i64::try_from(total).map_err(|_| Error::SumOverflow { l, r })
    }

    /// Validate an inclusive interval against the current length
    pub fn check_range(&self, l: usize, r: usize) -> Result<()> {
        if l > r {
            return Err(Error::InvalidRange { l, r });
        }
        if r >= self.values.len() {
            return Err(Error::IndexOutOfBounds {
                index: r,
                len: self.values.len(),
            });
        }
        Ok(())
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the raw values
    pub fn as_slice(&self) -> &[i64] {
        &self.values
    }
}

impl FromIterator<i64> for Sequence {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<i64>> for Sequence {
    fn from(values: Vec<i64>) -> Self {
        Self::new(values)
    }
}
