// Core Layer: Read-only CSR view
//
// Kernels never reach into a SparseMatrix directly. They receive a CsrView,
// whose lifetime is tied to a shared borrow of the store, so the arrays cannot
// be mutated or released while any kernel holds one.

use crate::types::Index;

/// Borrowed CSR arrays plus shape, issued by `SparseMatrix::view`
#[derive(Debug, Clone, Copy)]
pub struct CsrView<'a, T> {
    nrows: Index,
    ncols: Index,
    nvals: Index,
    row_ptr: &'a [Index],
    col_ind: &'a [Index],
    values: &'a [T],
}

impl<'a, T> CsrView<'a, T> {
    pub(crate) fn new(
        nrows: Index,
        ncols: Index,
        nvals: Index,
        row_ptr: &'a [Index],
        col_ind: &'a [Index],
        values: &'a [T],
    ) -> Self {
        debug_assert_eq!(row_ptr.len(), nrows + 1);
        debug_assert_eq!(col_ind.len(), nvals);
        debug_assert_eq!(values.len(), nvals);
        Self {
            nrows,
            ncols,
            nvals,
            row_ptr,
            col_ind,
            values,
        }
    }

    /// Get number of rows
    pub fn nrows(&self) -> Index {
        self.nrows
    }

    /// Get number of columns
    pub fn ncols(&self) -> Index {
        self.ncols
    }

    /// Get shape as (nrows, ncols)
    pub fn shape(&self) -> (Index, Index) {
        (self.nrows, self.ncols)
    }

    /// Get number of stored values
    pub fn nvals(&self) -> Index {
        self.nvals
    }

    /// Row offsets, `nrows + 1` long
    pub fn row_ptr(&self) -> &'a [Index] {
        self.row_ptr
    }

    /// Column index of each stored entry
    pub fn col_ind(&self) -> &'a [Index] {
        self.col_ind
    }

    /// Value of each stored entry
    pub fn values(&self) -> &'a [T] {
        self.values
    }

    /// Column indices and values stored in `row`, in storage order
    pub fn row(&self, row: Index) -> (&'a [Index], &'a [T]) {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        (&self.col_ind[start..end], &self.values[start..end])
    }
}
