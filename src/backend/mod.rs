// Backend Abstraction
//
// Trait for compute backends (CPU sequential, GPU, vendor math library) that
// multiply over a semiring. Backends receive operands as read-only CsrViews
// and write only into a separate output.

pub mod plan;
pub mod sequential;

use crate::core::dense::DenseMatrix;
use crate::core::error::{GraphBlasError, Result};
use crate::core::semiring::Semiring;
use crate::core::sparse_matrix::SparseMatrix;
use crate::core::view::CsrView;
use crate::ops::config::SpmmConfig;
use crate::types::{GraphBLASType, Index};

pub use plan::{CacheStats, PatternKey, PlanCache, SpgemmPlan};
pub use sequential::SequentialBackend;

/// Compute backend trait
pub trait Backend: Send + Sync {
    /// Get backend name
    fn name(&self) -> &str;

    /// Check if backend supports a specific feature
    fn supports_feature(&self, feature: BackendFeature) -> bool;

    /// Sparse-by-dense multiply: C = A ⊕.⊗ B
    fn spmm<T: GraphBLASType>(
        &self,
        c: &mut DenseMatrix<T>,
        semiring: &Semiring<T>,
        a: CsrView<'_, T>,
        b: &DenseMatrix<T>,
        config: &SpmmConfig,
    ) -> Result<()>;

    /// Symbolic phase of sparse-by-sparse multiply
    fn spgemm_analyze<T: GraphBLASType>(
        &self,
        a: CsrView<'_, T>,
        b: CsrView<'_, T>,
    ) -> Result<SpgemmPlan>;

    /// Numeric phase of sparse-by-sparse multiply, reusing `plan`
    fn spgemm_compute<T: GraphBLASType>(
        &self,
        c: &mut SparseMatrix<T>,
        semiring: &Semiring<T>,
        a: CsrView<'_, T>,
        b: CsrView<'_, T>,
        plan: &SpgemmPlan,
    ) -> Result<()>;

    /// One-shot sparse-by-sparse multiply
    ///
    /// Vendor-library backends override this with their single-call routine.
    fn spgemm<T: GraphBLASType>(
        &self,
        c: &mut SparseMatrix<T>,
        semiring: &Semiring<T>,
        a: CsrView<'_, T>,
        b: CsrView<'_, T>,
    ) -> Result<()> {
        let plan = self.spgemm_analyze(a, b)?;
        self.spgemm_compute(c, semiring, a, b, &plan)
    }
}

/// Backend features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendFeature {
    /// SIMD vectorization
    SIMD,
    /// Multi-threading
    MultiThreading,
    /// GPU offload
    GPU,
    /// Multiplies delegated to a vendor math library
    VendorLibrary,
    /// Separate analyze/compute phases for sparse-by-sparse multiply
    TwoPhaseSpgemm,
}

/// Shape check for C = A * B with A sparse and B, C dense
pub fn check_spmm_shapes<T: GraphBLASType>(
    c: &DenseMatrix<T>,
    a: &CsrView<'_, T>,
    b: &DenseMatrix<T>,
) -> Result<()> {
    check_product_shapes(c.shape(), a.shape(), b.shape())
}

/// Shape check for C = A * B with all three sparse
pub fn check_spgemm_shapes(
    c: (Index, Index),
    a: (Index, Index),
    b: (Index, Index),
) -> Result<()> {
    check_product_shapes(c, a, b)
}

fn check_product_shapes(c: (Index, Index), a: (Index, Index), b: (Index, Index)) -> Result<()> {
    if a.1 != b.0 || c != (a.0, b.1) {
        log::debug!("Shape mismatch: C{:?} = A{:?} * B{:?}", c, a, b);
        return Err(GraphBlasError::DimensionMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_shapes() {
        assert!(check_spgemm_shapes((2, 4), (2, 3), (3, 4)).is_ok());
        assert_eq!(
            check_spgemm_shapes((2, 4), (2, 3), (2, 4)),
            Err(GraphBlasError::DimensionMismatch)
        );
        assert_eq!(
            check_spgemm_shapes((3, 4), (2, 3), (3, 4)),
            Err(GraphBlasError::DimensionMismatch)
        );
    }
}
