//! Model of the tape of the generated program.
//!
//! [`GrowableTape::move_by`] follows the emitted `move()` routine step by
//! step, so that tests and the `interpret` mode observe exactly the growth
//! behaviour of the compiled output.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::BfNum;

/// Error type for tape operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TapeError {
    /// Growing the tape failed (`mem_fail()` in the generated program).
    #[error("error while allocating memory: {0}")]
    AllocationFailed(#[from] TryReserveError),
    /// Pointer arithmetic left the range of a `long long`.
    #[error("Tape pointer overflow")]
    PointerOverflow,
    /// Tape sizes must be at least one cell.
    #[error("Tape size must be at least one cell")]
    ZeroSize,
    /// Tape grew beyond the fuzzing limit.
    #[error("Tape grew too large")]
    TooLarge,
}

/// A tape that grows in either direction, by a fixed number of cells at a
/// time, and never shrinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowableTape {
    data: Vec<BfNum>,
    ptr: usize,
    extend_size: usize,
}

impl GrowableTape {
    /// Allocate `init_size` zeroed cells, pointer at cell 0.
    pub fn new(init_size: u64, extend_size: u64) -> Result<Self, TapeError> {
        if init_size == 0 || extend_size == 0 {
            return Err(TapeError::ZeroSize);
        }
        let init_size = usize::try_from(init_size).map_err(|_| TapeError::TooLarge)?;
        let extend_size = usize::try_from(extend_size).map_err(|_| TapeError::TooLarge)?;
        let mut data = Vec::new();
        data.try_reserve_exact(init_size)?;
        data.resize(init_size, BfNum::default());
        Ok(Self {
            data,
            ptr: 0,
            extend_size,
        })
    }

    /// Current size in cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// A tape always holds at least one cell.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current pointer (an index into the tape, renumbered on left growth).
    pub fn ptr(&self) -> usize {
        self.ptr
    }

    /// Contents of the whole tape.
    pub fn cells(&self) -> &[BfNum] {
        &self.data
    }

    /// Value of the cell under the pointer.
    pub fn get(&self) -> BfNum {
        self.data[self.ptr]
    }

    /// Overwrite the cell under the pointer.
    pub fn set(&mut self, value: BfNum) {
        self.data[self.ptr] = value;
    }

    /// Add a (wrapping) amount to the cell under the pointer.
    pub fn modify(&mut self, diff: i64) {
        self.data[self.ptr] += BfNum::from(diff);
    }

    /// Move the pointer by `delta` cells, growing the tape as needed.
    pub fn move_by(&mut self, delta: i64) -> Result<(), TapeError> {
        let extend = i64::try_from(self.extend_size).map_err(|_| TapeError::PointerOverflow)?;
        let mut ptr_new = i64::try_from(self.ptr)
            .ok()
            .and_then(|p| p.checked_add(delta))
            .ok_or(TapeError::PointerOverflow)?;
        while ptr_new < 0 {
            self.grow_left()?;
            ptr_new += extend;
        }
        while ptr_new as u64 >= self.data.len() as u64 {
            self.grow_right()?;
        }
        self.ptr = ptr_new as usize;
        Ok(())
    }

    fn reserve(&mut self) -> Result<(), TapeError> {
        #[cfg(fuzzing)]
        if self.data.len() + self.extend_size > 2usize.pow(20) {
            return Err(TapeError::TooLarge);
        }
        self.data.try_reserve_exact(self.extend_size)?;
        Ok(())
    }

    /// Add `extend_size` zeroed cells before the existing ones.
    fn grow_left(&mut self) -> Result<(), TapeError> {
        self.reserve()?;
        let old_len = self.data.len();
        self.data.resize(old_len + self.extend_size, BfNum::default());
        self.data.copy_within(0..old_len, self.extend_size);
        self.data[..self.extend_size].fill(BfNum::default());
        Ok(())
    }

    /// Add `extend_size` zeroed cells after the existing ones.
    fn grow_right(&mut self) -> Result<(), TapeError> {
        self.reserve()?;
        let new_len = self.data.len() + self.extend_size;
        self.data.resize(new_len, BfNum::default());
        Ok(())
    }
}
