// Core Layer: Owned host buffer
//
// Explicit allocate/release container backing each CSR array. An unallocated
// buffer and an allocated empty buffer are distinct states.

use crate::core::error::Result;

/// Owned contiguous array with an explicit allocated/released state
#[derive(Debug, Clone)]
pub struct HostBuffer<T> {
    data: Option<Vec<T>>,
}

impl<T: Copy + Default> HostBuffer<T> {
    /// Create an unallocated buffer
    pub fn new() -> Self {
        Self { data: None }
    }

    /// Whether storage has been materialized
    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    /// Allocated length, or 0 when unallocated
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    /// True when unallocated or allocated with zero length
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocate `len` default-filled slots unless already allocated
    ///
    /// An existing allocation is left untouched regardless of its length.
    pub fn allocate(&mut self, len: usize) -> Result<()> {
        if self.data.is_none() {
            self.data = Some(Self::try_filled(len)?);
        }
        Ok(())
    }

    /// Make the buffer exactly `len` long, reallocating if the length differs
    pub fn ensure_len(&mut self, len: usize) -> Result<()> {
        if self.len() != len || !self.is_allocated() {
            self.data = None;
            self.data = Some(Self::try_filled(len)?);
        }
        Ok(())
    }

    /// Shrink an allocated buffer to its first `len` slots
    pub fn truncate(&mut self, len: usize) {
        if let Some(data) = self.data.as_mut() {
            data.truncate(len);
            data.shrink_to_fit();
        }
    }

    /// Replace contents with an already-built vector
    pub fn install(&mut self, data: Vec<T>) {
        self.data = Some(data);
    }

    /// Release storage; releasing an unallocated buffer is a no-op
    pub fn release(&mut self) {
        self.data = None;
    }

    /// Borrow as a slice (empty when unallocated)
    pub fn as_slice(&self) -> &[T] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// Borrow as a mutable slice (empty when unallocated)
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data.as_deref_mut().unwrap_or(&mut [])
    }

    fn try_filled(len: usize) -> Result<Vec<T>> {
        try_filled_vec(len, T::default())
    }
}

/// `len` copies of `value`, or `OutOfMemory` instead of aborting
///
/// Kernels use this for scratch arrays sized by a matrix dimension.
pub(crate) fn try_filled_vec<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)?;
    data.resize(len, value);
    Ok(data)
}

impl<T: Copy + Default> Default for HostBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}
