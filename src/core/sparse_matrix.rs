// Core Layer: Compressed sparse row store
//
// SparseMatrix owns the three CSR arrays of one matrix. Triplets are turned
// into CSR by a counting sort that reuses row_ptr as its per-row write cursor,
// so no scratch array proportional to nrows is needed.

use std::fmt;

use crate::core::binary_op::BinaryOp;
use crate::core::buffer::{try_filled_vec, HostBuffer};
use crate::core::error::{GraphBlasError, Result};
use crate::core::view::CsrView;
use crate::types::{GraphBLASType, Index, TypeCode};

/// Rows and columns shown by the pattern dump
const PATTERN_LIMIT: usize = 20;
/// Entries shown per array by the array dump
const ARRAY_LIMIT: usize = 40;

/// Sparse matrix in compressed sparse row form
///
/// Storage starts unallocated. It is materialized by `allocate` or `build`
/// and released by `clear` or drop. Dimensions are never inferred from data.
#[derive(Debug, Clone)]
pub struct SparseMatrix<T: GraphBLASType> {
    nrows: Index,
    ncols: Index,
    nvals: Index,
    /// `nrows + 1` offsets into `col_ind`/`values`
    row_ptr: HostBuffer<Index>,
    col_ind: HostBuffer<Index>,
    values: HostBuffer<T>,
    /// Arrays hold a consistent CSR image (last build or kernel output succeeded)
    built: bool,
}

impl<T: GraphBLASType> SparseMatrix<T> {
    /// Create an unallocated matrix with known dimensions
    pub fn new(nrows: Index, ncols: Index) -> Result<Self> {
        Ok(Self {
            nrows,
            ncols,
            nvals: 0,
            row_ptr: HostBuffer::new(),
            col_ind: HostBuffer::new(),
            values: HostBuffer::new(),
            built: false,
        })
    }

    /// Create a matrix and build it from triplets in one step
    pub fn from_tuples(
        nrows: Index,
        ncols: Index,
        row_indices: &[Index],
        col_indices: &[Index],
        values: &[T],
    ) -> Result<Self> {
        let mut matrix = Self::new(nrows, ncols)?;
        matrix.build(row_indices, col_indices, values, values.len())?;
        Ok(matrix)
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

    /// Get type code
    pub fn type_code(&self) -> TypeCode {
        T::TYPE_CODE
    }

    /// True if any of the three arrays is allocated
    pub fn is_allocated(&self) -> bool {
        self.row_ptr.is_allocated() || self.col_ind.is_allocated() || self.values.is_allocated()
    }

    /// True if the arrays hold a complete CSR image
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Set dimensions
    ///
    /// Changing the dimensions of a matrix whose storage is allocated is
    /// rejected with `InvalidState`; re-stating the current ones is allowed.
    pub fn nnew(&mut self, nrows: Index, ncols: Index) -> Result<()> {
        if (nrows, ncols) != self.shape() && self.is_allocated() {
            log::warn!(
                "Refusing to resize allocated {}x{} matrix to {}x{}",
                self.nrows,
                self.ncols,
                nrows,
                ncols
            );
            return Err(GraphBlasError::InvalidState);
        }
        self.nrows = nrows;
        self.ncols = ncols;
        Ok(())
    }

    /// Allocate any array that is required and not yet allocated
    ///
    /// row_ptr needs `nrows > 0`; col_ind and values need `nvals > 0`. Arrays
    /// already allocated are never reallocated. On `OutOfMemory` the arrays
    /// allocated earlier in the call stay in place for `clear` to release.
    ///
    /// col_ind and values can only be missing with `nvals > 0` after a build
    /// whose own reservation failed past row_ptr; this completes that state.
    pub fn allocate(&mut self) -> Result<()> {
        log::trace!(
            "Allocating CSR storage: nrows={}, nvals={}",
            self.nrows,
            self.nvals
        );
        if self.nrows != 0 {
            let len = self
                .nrows
                .checked_add(1)
                .ok_or(GraphBlasError::OutOfMemory)?;
            self.row_ptr.allocate(len)?;
        }
        if self.nvals != 0 {
            self.col_ind.allocate(self.nvals)?;
            self.values.allocate(self.nvals)?;
        }
        Ok(())
    }

    /// Release all storage; dimensions are kept
    pub fn clear(&mut self) -> Result<()> {
        log::trace!("Clearing {}x{} matrix", self.nrows, self.ncols);
        self.row_ptr.release();
        self.col_ind.release();
        self.values.release();
        self.nvals = 0;
        self.built = false;
        Ok(())
    }

    /// Build from `nvals` triplets given in any order
    ///
    /// Duplicate coordinates are kept as separate entries in input order.
    /// Row bounds are checked while counting, column bounds while scattering;
    /// either violation abandons the build with `IndexOutOfBounds`, leaving
    /// `nvals` set and the arrays as the failing pass left them.
    pub fn build(
        &mut self,
        row_indices: &[Index],
        col_indices: &[Index],
        values: &[T],
        nvals: Index,
    ) -> Result<()> {
        if row_indices.len() < nvals || col_indices.len() < nvals || values.len() < nvals {
            log::warn!(
                "build given {} tuples but inputs hold {}/{}/{}",
                nvals,
                row_indices.len(),
                col_indices.len(),
                values.len()
            );
            return Err(GraphBlasError::InvalidValue);
        }
        log::debug!(
            "Building {}x{} CSR matrix from {} tuples",
            self.nrows,
            self.ncols,
            nvals
        );

        self.built = false;
        self.nvals = nvals;
        self.reserve_for_build()?;

        let nrows = self.nrows;
        let ncols = self.ncols;
        let row_ptr = self.row_ptr.as_mut_slice();
        let col_ind = self.col_ind.as_mut_slice();
        let vals = self.values.as_mut_slice();

        // Count entries per row
        row_ptr.fill(0);
        for &row in &row_indices[..nvals] {
            if row >= nrows {
                log::debug!("Row index {} out of bounds for {} rows", row, nrows);
                return Err(GraphBlasError::IndexOutOfBounds);
            }
            row_ptr[row] += 1;
        }

        // Exclusive scan turns counts into row starts
        let mut cumsum = 0;
        for ptr in row_ptr[..nrows].iter_mut() {
            let count = *ptr;
            *ptr = cumsum;
            cumsum += count;
        }
        row_ptr[nrows] = nvals;

        // Scatter; row_ptr[row] is the next free slot of `row` during this pass
        for i in 0..nvals {
            let row = row_indices[i];
            let dest = row_ptr[row];
            let col = col_indices[i];
            if col >= ncols {
                log::debug!("Column index {} out of bounds for {} columns", col, ncols);
                return Err(GraphBlasError::IndexOutOfBounds);
            }
            col_ind[dest] = col;
            vals[dest] = values[i];
            row_ptr[row] += 1;
        }

        // Each cursor now sits at its row's end, which is the next row's start
        let mut start = 0;
        for ptr in row_ptr.iter_mut() {
            let end = *ptr;
            *ptr = start;
            start = end;
        }

        self.built = true;
        Ok(())
    }

    /// Build from triplets, merging duplicates and filtering through a mask
    ///
    /// Triplets that land on the same coordinate are folded left to right in
    /// input order with `dup`; the merged entry keeps the first occurrence's
    /// position. With a mask, only coordinates stored in the mask survive.
    pub fn build_with_dup<M: GraphBLASType>(
        &mut self,
        row_indices: &[Index],
        col_indices: &[Index],
        values: &[T],
        nvals: Index,
        mask: Option<&SparseMatrix<M>>,
        dup: &BinaryOp<T, T, T>,
    ) -> Result<()> {
        let mask = match mask {
            Some(m) if m.shape() != self.shape() => {
                return Err(GraphBlasError::DimensionMismatch);
            }
            Some(m) => Some(m.view()?),
            None => None,
        };

        // Scratch is sized by ncols; get it before the store is touched
        let mut slot_of_col = try_filled_vec(self.ncols, Index::MAX)?;
        let mut allowed_row = if mask.is_some() {
            Some(try_filled_vec(self.ncols, Index::MAX)?)
        } else {
            None
        };

        self.build(row_indices, col_indices, values, nvals)?;
        self.built = false;

        log::debug!(
            "Combining duplicates with '{}'{}",
            dup.name(),
            if mask.is_some() { " under mask" } else { "" }
        );

        let nrows = self.nrows;

        let row_ptr = self.row_ptr.as_mut_slice();
        let col_ind = self.col_ind.as_mut_slice();
        let vals = self.values.as_mut_slice();

        // Compact in place; the write cursor never passes the read cursor
        let mut write = 0;
        let mut read_start = 0;
        for row in 0..nrows {
            let read_end = row_ptr[row + 1];
            let row_start = write;
            row_ptr[row] = row_start;

            if let (Some(mask), Some(allowed)) = (mask.as_ref(), allowed_row.as_mut()) {
                for &col in mask.row(row).0 {
                    allowed[col] = row;
                }
            }

            for slot in read_start..read_end {
                let col = col_ind[slot];
                let val = vals[slot];
                if let Some(allowed) = allowed_row.as_ref() {
                    if allowed[col] != row {
                        continue;
                    }
                }
                let existing = slot_of_col[col];
                if existing != Index::MAX && existing >= row_start {
                    vals[existing] = dup.apply(vals[existing], val);
                } else {
                    slot_of_col[col] = write;
                    col_ind[write] = col;
                    vals[write] = val;
                    write += 1;
                }
            }
            read_start = read_end;
        }
        row_ptr[nrows] = write;

        if write != self.nvals {
            log::debug!("Merged {} tuples into {} entries", self.nvals, write);
        }
        self.nvals = write;
        self.col_ind.truncate(write);
        self.values.truncate(write);
        self.built = true;
        Ok(())
    }

    /// Extract all stored entries as triplets, row by row in storage order
    ///
    /// The output vectors are cleared first. A matrix with no storage yields
    /// nothing; one whose last build failed reports `InvalidState`.
    pub fn extract_tuples(
        &self,
        row_indices: &mut Vec<Index>,
        col_indices: &mut Vec<Index>,
        values: &mut Vec<T>,
    ) -> Result<()> {
        row_indices.clear();
        col_indices.clear();
        values.clear();

        if !self.built {
            return if self.nvals == 0 {
                Ok(())
            } else {
                Err(GraphBlasError::InvalidState)
            };
        }

        row_indices.try_reserve_exact(self.nvals)?;
        col_indices.try_reserve_exact(self.nvals)?;
        values.try_reserve_exact(self.nvals)?;

        for (row, col, val) in self.iter() {
            row_indices.push(row);
            col_indices.push(col);
            values.push(val);
        }
        Ok(())
    }

    /// Iterate stored entries as `(row, col, value)` in extraction order
    ///
    /// Yields nothing unless the matrix is built.
    pub fn iter(&self) -> impl Iterator<Item = (Index, Index, T)> + '_ {
        let view = self.view().ok();
        view.into_iter().flat_map(|view| {
            (0..view.nrows()).flat_map(move |row| {
                let (cols, vals) = view.row(row);
                cols.iter()
                    .zip(vals.iter())
                    .map(move |(&col, &val)| (row, col, val))
            })
        })
    }

    /// Issue a read-only view of the CSR arrays for a kernel
    pub fn view(&self) -> Result<CsrView<'_, T>> {
        if !self.built {
            return Err(GraphBlasError::UninitializedObject);
        }
        Ok(CsrView::new(
            self.nrows,
            self.ncols,
            self.nvals,
            self.row_ptr.as_slice(),
            self.col_ind.as_slice(),
            self.values.as_slice(),
        ))
    }

    /// Replace contents with kernel output that is already in CSR form
    ///
    /// Backends use this to publish a result. The arrays are checked against
    /// the CSR invariants before they are taken over.
    pub fn install_csr(
        &mut self,
        row_ptr: Vec<Index>,
        col_ind: Vec<Index>,
        values: Vec<T>,
    ) -> Result<()> {
        if self.nrows.checked_add(1) != Some(row_ptr.len())
            || col_ind.len() != values.len()
            || row_ptr.first() != Some(&0)
            || row_ptr.last() != Some(&col_ind.len())
            || row_ptr.windows(2).any(|w| w[0] > w[1])
        {
            return Err(GraphBlasError::InvalidValue);
        }
        if col_ind.iter().any(|&col| col >= self.ncols) {
            return Err(GraphBlasError::IndexOutOfBounds);
        }
        self.nvals = col_ind.len();
        self.row_ptr.install(row_ptr);
        self.col_ind.install(col_ind);
        self.values.install(values);
        self.built = true;
        Ok(())
    }

    /// Dump raw arrays and the sparsity pattern to stdout
    pub fn print(&self) -> Result<()> {
        println!("{}", self);
        self.print_csr("pretty print")
    }

    /// Dump the sparsity pattern (top-left 20x20 corner) to stdout
    pub fn print_csr(&self, label: &str) -> Result<()> {
        print!("{}", self.pattern(label));
        Ok(())
    }

    /// Render the top-left corner of the sparsity pattern, `x` for stored
    pub fn pattern(&self, label: &str) -> String {
        let mut out = format!("{}:\n", label);
        let Ok(view) = self.view() else {
            return out;
        };
        let nrows = self.nrows.min(PATTERN_LIMIT);
        let ncols = self.ncols.min(PATTERN_LIMIT);
        for row in 0..nrows {
            let (cols, _) = view.row(row);
            for col in 0..ncols {
                out.push_str(if cols.contains(&col) { "x " } else { "0 " });
            }
            out.push('\n');
        }
        out
    }

    fn reserve_for_build(&mut self) -> Result<()> {
        let ptr_len = self
            .nrows
            .checked_add(1)
            .ok_or(GraphBlasError::OutOfMemory)?;
        self.row_ptr.ensure_len(ptr_len)?;
        self.col_ind.ensure_len(self.nvals)?;
        self.values.ensure_len(self.nvals)?;
        Ok(())
    }
}

impl<T: GraphBLASType> Default for SparseMatrix<T> {
    fn default() -> Self {
        Self {
            nrows: 0,
            ncols: 0,
            nvals: 0,
            row_ptr: HostBuffer::new(),
            col_ind: HostBuffer::new(),
            values: HostBuffer::new(),
            built: false,
        }
    }
}

fn write_array<V: fmt::Debug>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    data: &[V],
) -> fmt::Result {
    let shown = &data[..data.len().min(ARRAY_LIMIT)];
    write!(f, "{}: {:?}", name, shown)?;
    if data.len() > shown.len() {
        write!(f, " ... ({} total)", data.len())?;
    }
    writeln!(f)
}

impl<T: GraphBLASType> fmt::Display for SparseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "SparseMatrix<{}> {}x{}, nvals={}",
            T::type_name(),
            self.nrows,
            self.ncols,
            self.nvals
        )?;
        write_array(f, "csrColInd", self.col_ind.as_slice())?;
        write_array(f, "csrRowPtr", self.row_ptr.as_slice())?;
        write_array(f, "csrVal", self.values.as_slice())
    }
}
