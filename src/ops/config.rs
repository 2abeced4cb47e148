// Kernel Configuration
//
// Tuning knobs for sparse-by-dense multiply. GPU backends read the tile and
// thread fields as launch parameters; the sequential backend uses the tiles as
// loop blocking and ignores the thread count.
// - tile_rows (TA): rows of A processed per block
// - tile_cols (TB): columns of B processed per block
// - threads (NT): threads per block
// - row_major: element order the kernel writes C in

use crate::core::dense::Layout;
use crate::core::error::{GraphBlasError, Result};

/// Configuration for `spmm`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpmmConfig {
    /// Rows of A per block
    pub tile_rows: usize,

    /// Columns of B per block
    pub tile_cols: usize,

    /// Threads per block
    pub threads: usize,

    /// Write C in row-major order (column-major otherwise)
    pub row_major: bool,
}

impl SpmmConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self {
            tile_rows: 32,
            tile_cols: 32,
            threads: 128,
            row_major: true,
        }
    }

    /// Create configuration with explicit tile sizes
    pub fn with_tiles(tile_rows: usize, tile_cols: usize) -> Self {
        Self {
            tile_rows,
            tile_cols,
            ..Self::new()
        }
    }

    /// Create configuration that writes C column-major
    pub fn with_col_major() -> Self {
        Self {
            row_major: false,
            ..Self::new()
        }
    }

    /// Set rows of A per block
    pub fn set_tile_rows(&mut self, value: usize) -> &mut Self {
        self.tile_rows = value;
        self
    }

    /// Set columns of B per block
    pub fn set_tile_cols(&mut self, value: usize) -> &mut Self {
        self.tile_cols = value;
        self
    }

    /// Set threads per block
    pub fn set_threads(&mut self, value: usize) -> &mut Self {
        self.threads = value;
        self
    }

    /// Set output element order
    pub fn set_row_major(&mut self, value: bool) -> &mut Self {
        self.row_major = value;
        self
    }

    /// Element order of C implied by `row_major`
    pub fn output_layout(&self) -> Layout {
        if self.row_major {
            Layout::RowMajor
        } else {
            Layout::ColMajor
        }
    }

    /// Reject zero-sized tiles or thread counts
    pub fn validate(&self) -> Result<()> {
        if self.tile_rows == 0 || self.tile_cols == 0 || self.threads == 0 {
            return Err(GraphBlasError::InvalidValue);
        }
        Ok(())
    }
}

impl Default for SpmmConfig {
    fn default() -> Self {
        Self::new()
    }
}
