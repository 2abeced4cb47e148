// High-Level Matrix Multiplication Operations
//
// Validates operands, issues read-only views of the sparse stores, and hands
// them to a backend. Results always land in a separate output.
//
// Operations:
// - spmm: Sparse-dense multiply (C = A * B, B and C dense)
// - spgemm: Sparse-sparse multiply (C = A * B), reusing cached analyses
// - spgemm_analyze / spgemm_compute: explicit two-phase sparse-sparse multiply

use crate::backend::plan::{CacheStats, PatternKey, PlanCache, SpgemmPlan};
use crate::backend::{check_spgemm_shapes, check_spmm_shapes, Backend, BackendFeature};
use crate::core::dense::DenseMatrix;
use crate::core::error::Result;
use crate::core::semiring::Semiring;
use crate::core::sparse_matrix::SparseMatrix;
use crate::ops::config::SpmmConfig;
use crate::types::GraphBLASType;
use std::sync::Arc;

lazy_static! {
    /// Global spgemm plan cache (64 MB default)
    static ref PLAN_CACHE: PlanCache = PlanCache::new(64);
}

/// Sparse-dense multiplication: C = A * B
///
/// # Arguments
/// * `backend` - Backend that runs the kernel
/// * `output` - Dense output matrix (overwritten)
/// * `semiring` - Semiring for multiplication
/// * `left_matrix` - Sparse input matrix (must be built)
/// * `right_matrix` - Dense input matrix
/// * `config` - Optional kernel configuration
pub fn spmm<T: GraphBLASType, B: Backend>(
    backend: &B,
    output: &mut DenseMatrix<T>,
    semiring: &Semiring<T>,
    left_matrix: &SparseMatrix<T>,
    right_matrix: &DenseMatrix<T>,
    config: Option<&SpmmConfig>,
) -> Result<()> {
    let default_config = SpmmConfig::default();
    let config = config.unwrap_or(&default_config);
    config.validate()?;

    let a = left_matrix.view()?;
    check_spmm_shapes(output, &a, right_matrix)?;

    log::debug!(
        "spmm on '{}' backend: {:?} x {:?} with semiring '{}'",
        backend.name(),
        a.shape(),
        right_matrix.shape(),
        semiring.name()
    );
    backend.spmm(output, semiring, a, right_matrix, config)
}

/// Sparse-sparse multiplication: C = A * B
///
/// Backends with a two-phase path reuse a cached analysis when A and B have
/// the same sparsity patterns as an earlier call. Others run their one-shot
/// routine.
pub fn spgemm<T: GraphBLASType, B: Backend>(
    backend: &B,
    output: &mut SparseMatrix<T>,
    semiring: &Semiring<T>,
    left_matrix: &SparseMatrix<T>,
    right_matrix: &SparseMatrix<T>,
) -> Result<()> {
    let a = left_matrix.view()?;
    let b = right_matrix.view()?;
    check_spgemm_shapes(output.shape(), a.shape(), b.shape())?;

    if !backend.supports_feature(BackendFeature::TwoPhaseSpgemm) {
        log::debug!("spgemm on '{}' backend (one-shot)", backend.name());
        return backend.spgemm(output, semiring, a, b);
    }

    let key = PatternKey::new(&a, &b);
    let plan = if let Some(cached) = PLAN_CACHE.get(&key) {
        log::info!("Using cached spgemm plan");
        cached
    } else {
        log::info!("Analyzing new spgemm pattern");
        let plan = Arc::new(backend.spgemm_analyze(a, b)?);
        PLAN_CACHE.insert(plan.clone());
        plan
    };

    backend.spgemm_compute(output, semiring, a, b, &plan)
}

/// Symbolic phase of a sparse-sparse multiplication
///
/// The returned plan can be passed to `spgemm_compute` any number of times
/// while A and B keep their sparsity patterns.
pub fn spgemm_analyze<T: GraphBLASType, B: Backend>(
    backend: &B,
    output: &SparseMatrix<T>,
    left_matrix: &SparseMatrix<T>,
    right_matrix: &SparseMatrix<T>,
) -> Result<SpgemmPlan> {
    let a = left_matrix.view()?;
    let b = right_matrix.view()?;
    check_spgemm_shapes(output.shape(), a.shape(), b.shape())?;

    log::debug!("spgemm analyze on '{}' backend", backend.name());
    backend.spgemm_analyze(a, b)
}

/// Numeric phase of a sparse-sparse multiplication
///
/// Fails with `InvalidState` if A or B no longer match the plan.
pub fn spgemm_compute<T: GraphBLASType, B: Backend>(
    backend: &B,
    output: &mut SparseMatrix<T>,
    semiring: &Semiring<T>,
    left_matrix: &SparseMatrix<T>,
    right_matrix: &SparseMatrix<T>,
    plan: &SpgemmPlan,
) -> Result<()> {
    let a = left_matrix.view()?;
    let b = right_matrix.view()?;
    check_spgemm_shapes(output.shape(), a.shape(), b.shape())?;

    log::debug!(
        "spgemm compute on '{}' backend with semiring '{}'",
        backend.name(),
        semiring.name()
    );
    backend.spgemm_compute(output, semiring, a, b, plan)
}

/// Statistics of the global spgemm plan cache
pub fn plan_cache_stats() -> CacheStats {
    PLAN_CACHE.stats()
}

/// Drop every cached spgemm plan
pub fn clear_plan_cache() {
    PLAN_CACHE.clear();
}
