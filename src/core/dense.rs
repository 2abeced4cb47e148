// Core Layer: Dense matrix operand
//
// Just enough of a dense matrix to serve as the B operand and C output of a
// sparse-by-dense multiply.

use crate::core::error::{GraphBlasError, Result};
use crate::types::{GraphBLASType, Index};

/// Element order of a dense matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    RowMajor,
    ColMajor,
}

/// Dense matrix stored contiguously in row- or column-major order
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T: GraphBLASType> {
    nrows: Index,
    ncols: Index,
    layout: Layout,
    data: Vec<T>,
}

impl<T: GraphBLASType> DenseMatrix<T> {
    /// Create a row-major matrix filled with `T::default()`
    pub fn new(nrows: Index, ncols: Index) -> Result<Self> {
        Self::filled(nrows, ncols, T::default(), Layout::RowMajor)
    }

    /// Create a matrix with every element set to `value`
    pub fn filled(nrows: Index, ncols: Index, value: T, layout: Layout) -> Result<Self> {
        let len = nrows
            .checked_mul(ncols)
            .ok_or(GraphBlasError::OutOfMemory)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)?;
        data.resize(len, value);
        Ok(Self {
            nrows,
            ncols,
            layout,
            data,
        })
    }

    /// Wrap existing data laid out as `layout`
    pub fn from_vec(nrows: Index, ncols: Index, data: Vec<T>, layout: Layout) -> Result<Self> {
        if nrows.checked_mul(ncols) != Some(data.len()) {
            return Err(GraphBlasError::InvalidValue);
        }
        Ok(Self {
            nrows,
            ncols,
            layout,
            data,
        })
    }

    /// Build a row-major matrix from rows of equal length
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let ncols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != ncols) {
            return Err(GraphBlasError::InvalidValue);
        }
        let data = rows.iter().flatten().copied().collect();
        Self::from_vec(rows.len(), ncols, data, Layout::RowMajor)
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

    /// Element order of the backing storage
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Raw storage in `layout` order
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Element at (row, col)
    pub fn get(&self, row: Index, col: Index) -> T {
        self.data[self.offset(row, col)]
    }

    /// Overwrite element at (row, col)
    pub fn set(&mut self, row: Index, col: Index, value: T) {
        let offset = self.offset(row, col);
        self.data[offset] = value;
    }

    /// Reset every element to `value` and switch to `layout`
    pub fn reset(&mut self, value: T, layout: Layout) {
        self.layout = layout;
        self.data.fill(value);
    }

    fn offset(&self, row: Index, col: Index) -> usize {
        debug_assert!(row < self.nrows && col < self.ncols);
        match self.layout {
            Layout::RowMajor => row * self.ncols + col,
            Layout::ColMajor => col * self.nrows + row,
        }
    }
}
