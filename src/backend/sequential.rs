// Sequential CPU Backend
//
// Single-threaded reference kernels.
//
// spmm: row-blocked sweep over A, column-blocked over B, accumulating into C
// with the semiring starting from its zero.
//
// spgemm (Gustavson):
// - analyze: per output row, collect the distinct columns reachable through
//   A(i,k) -> B(k,:) with a row-stamped marker array, then sort them
// - compute: map each planned column to its slot, accumulate products there

use crate::backend::plan::{PatternKey, SpgemmPlan};
use crate::backend::{check_spgemm_shapes, check_spmm_shapes, Backend, BackendFeature};
use crate::core::buffer::try_filled_vec;
use crate::core::dense::DenseMatrix;
use crate::core::error::{GraphBlasError, Result};
use crate::core::semiring::Semiring;
use crate::core::sparse_matrix::SparseMatrix;
use crate::core::view::CsrView;
use crate::ops::config::SpmmConfig;
use crate::types::{GraphBLASType, Index};

/// Single-threaded CPU backend
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialBackend;

impl SequentialBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for SequentialBackend {
    fn name(&self) -> &str {
        "sequential"
    }

    fn supports_feature(&self, feature: BackendFeature) -> bool {
        matches!(feature, BackendFeature::TwoPhaseSpgemm)
    }

    fn spmm<T: GraphBLASType>(
        &self,
        c: &mut DenseMatrix<T>,
        semiring: &Semiring<T>,
        a: CsrView<'_, T>,
        b: &DenseMatrix<T>,
        config: &SpmmConfig,
    ) -> Result<()> {
        config.validate()?;
        check_spmm_shapes(c, &a, b)?;
        if config.threads > 1 {
            log::trace!("sequential backend ignores threads={}", config.threads);
        }

        let (m, n) = c.shape();
        c.reset(semiring.zero(), config.output_layout());

        for row_block in (0..m).step_by(config.tile_rows) {
            let row_end = (row_block + config.tile_rows).min(m);
            for col_block in (0..n).step_by(config.tile_cols) {
                let col_end = (col_block + config.tile_cols).min(n);
                for i in row_block..row_end {
                    let (cols, vals) = a.row(i);
                    for j in col_block..col_end {
                        let acc = cols.iter().zip(vals).fold(c.get(i, j), |acc, (&k, &av)| {
                            semiring.add(acc, semiring.multiply(av, b.get(k, j)))
                        });
                        c.set(i, j, acc);
                    }
                }
            }
        }
        Ok(())
    }

    fn spgemm_analyze<T: GraphBLASType>(
        &self,
        a: CsrView<'_, T>,
        b: CsrView<'_, T>,
    ) -> Result<SpgemmPlan> {
        if a.ncols() != b.nrows() {
            return Err(GraphBlasError::DimensionMismatch);
        }
        let (m, n) = (a.nrows(), b.ncols());

        let mut row_ptr: Vec<Index> = Vec::new();
        row_ptr.try_reserve_exact(m + 1)?;
        row_ptr.push(0);
        let mut col_ind: Vec<Index> = Vec::new();
        let mut marker = try_filled_vec(n, Index::MAX)?;

        for i in 0..m {
            let row_start = col_ind.len();
            for &k in a.row(i).0 {
                for &j in b.row(k).0 {
                    if marker[j] != i {
                        marker[j] = i;
                        col_ind.push(j);
                    }
                }
            }
            col_ind[row_start..].sort_unstable();
            row_ptr.push(col_ind.len());
        }

        log::debug!("spgemm analysis: {}x{} result with {} entries", m, n, col_ind.len());
        Ok(SpgemmPlan::new(PatternKey::new(&a, &b), m, n, row_ptr, col_ind))
    }

    fn spgemm_compute<T: GraphBLASType>(
        &self,
        c: &mut SparseMatrix<T>,
        semiring: &Semiring<T>,
        a: CsrView<'_, T>,
        b: CsrView<'_, T>,
        plan: &SpgemmPlan,
    ) -> Result<()> {
        if plan.key() != &PatternKey::new(&a, &b) {
            log::warn!("spgemm plan does not match operand patterns");
            return Err(GraphBlasError::InvalidState);
        }
        check_spgemm_shapes(c.shape(), a.shape(), b.shape())?;
        if plan.shape() != (a.nrows(), b.ncols()) {
            return Err(GraphBlasError::InvalidState);
        }
        plan.validate()?;

        let row_ptr = plan.row_ptr();
        let col_ind = plan.col_ind();
        let mut values = try_filled_vec(plan.nvals(), semiring.zero())?;
        let mut slot_of_col = try_filled_vec(b.ncols(), Index::MAX)?;

        for i in 0..a.nrows() {
            let (row_start, row_end) = (row_ptr[i], row_ptr[i + 1]);
            for p in row_start..row_end {
                slot_of_col[col_ind[p]] = p;
            }
            let (a_cols, a_vals) = a.row(i);
            for (&k, &av) in a_cols.iter().zip(a_vals) {
                let (b_cols, b_vals) = b.row(k);
                for (&j, &bv) in b_cols.iter().zip(b_vals) {
                    // Slots left over from earlier rows fall outside this row
                    let p = slot_of_col[j];
                    if p < row_start || p >= row_end {
                        log::warn!("spgemm plan is missing C({}, {})", i, j);
                        return Err(GraphBlasError::InvalidState);
                    }
                    values[p] = semiring.add(values[p], semiring.multiply(av, bv));
                }
            }
        }

        c.install_csr(row_ptr.to_vec(), col_ind.to_vec(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dense::Layout;

    fn a_matrix() -> SparseMatrix<f64> {
        // [[1, 0, 2],
        //  [0, 3, 0]]
        SparseMatrix::from_tuples(2, 3, &[0, 1, 0], &[0, 1, 2], &[1.0, 3.0, 2.0]).unwrap()
    }

    #[test]
    fn test_spmm_plus_times() {
        let a = a_matrix();
        let b = DenseMatrix::from_rows(&[vec![4.0, 1.0], vec![0.0, 5.0], vec![6.0, 0.0]]).unwrap();
        let mut c = DenseMatrix::new(2, 2).unwrap();
        let semiring = Semiring::<f64>::plus_times().unwrap();

        SequentialBackend
            .spmm(&mut c, &semiring, a.view().unwrap(), &b, &SpmmConfig::with_tiles(1, 1))
            .unwrap();

        assert_eq!(c.get(0, 0), 16.0);
        assert_eq!(c.get(0, 1), 1.0);
        assert_eq!(c.get(1, 0), 0.0);
        assert_eq!(c.get(1, 1), 15.0);
    }

    #[test]
    fn test_spmm_col_major_output() {
        let a = a_matrix();
        let b = DenseMatrix::from_rows(&[vec![1.0], vec![1.0], vec![1.0]]).unwrap();
        let mut c = DenseMatrix::new(2, 1).unwrap();
        let semiring = Semiring::<f64>::plus_times().unwrap();

        SequentialBackend
            .spmm(&mut c, &semiring, a.view().unwrap(), &b, &SpmmConfig::with_col_major())
            .unwrap();

        assert_eq!(c.layout(), Layout::ColMajor);
        assert_eq!(c.as_slice(), &[3.0, 3.0]);
    }

    #[test]
    fn test_analyze_sorts_columns() {
        // Row 0 reaches columns 2 then 0 through B
        let a = SparseMatrix::from_tuples(1, 2, &[0, 0], &[0, 1], &[1.0, 1.0]).unwrap();
        let b = SparseMatrix::from_tuples(2, 3, &[0, 1], &[2, 0], &[1.0, 1.0]).unwrap();

        let plan = SequentialBackend
            .spgemm_analyze(a.view().unwrap(), b.view().unwrap())
            .unwrap();
        assert_eq!(plan.row_ptr(), &[0, 2]);
        assert_eq!(plan.col_ind(), &[0, 2]);
    }

    #[test]
    fn test_compute_rejects_foreign_plan() {
        let a = a_matrix();
        let b = SparseMatrix::from_tuples(3, 1, &[0], &[0], &[1.0]).unwrap();
        let b_other = SparseMatrix::from_tuples(3, 1, &[1], &[0], &[1.0]).unwrap();
        let mut c = SparseMatrix::new(2, 1).unwrap();
        let semiring = Semiring::<f64>::plus_times().unwrap();

        let plan = SequentialBackend
            .spgemm_analyze(a.view().unwrap(), b.view().unwrap())
            .unwrap();
        let err = SequentialBackend
            .spgemm_compute(&mut c, &semiring, a.view().unwrap(), b_other.view().unwrap(), &plan)
            .unwrap_err();
        assert_eq!(err, GraphBlasError::InvalidState);
    }

    #[test]
    fn test_analyze_wide_operand_reports_oom() {
        let a = SparseMatrix::from_tuples(1, 1, &[0], &[0], &[1.0]).unwrap();
        let b = SparseMatrix::from_tuples(1, usize::MAX / 2, &[0], &[7], &[1.0]).unwrap();

        let err = SequentialBackend
            .spgemm_analyze(a.view().unwrap(), b.view().unwrap())
            .unwrap_err();
        assert_eq!(err, GraphBlasError::OutOfMemory);
    }

    #[test]
    fn test_compute_rejects_plan_missing_columns() {
        // A = [[1], [1]], B = [[0, 3]]: C = [[0, 3], [0, 3]]
        let a = SparseMatrix::from_tuples(2, 1, &[0, 1], &[0, 0], &[1.0, 1.0]).unwrap();
        let b = SparseMatrix::from_tuples(1, 2, &[0], &[1], &[3.0]).unwrap();
        let (av, bv) = (a.view().unwrap(), b.view().unwrap());
        let semiring = Semiring::<f64>::plus_times().unwrap();

        // Right key, wrong structure: row 1 plans column 0 instead of 1
        let plan = SpgemmPlan::new(PatternKey::new(&av, &bv), 2, 2, vec![0, 1, 2], vec![1, 0]);
        let mut c = SparseMatrix::new(2, 2).unwrap();
        let err = SequentialBackend
            .spgemm_compute(&mut c, &semiring, av, bv, &plan)
            .unwrap_err();
        assert_eq!(err, GraphBlasError::InvalidState);
        assert!(!c.is_built());

        // Short row offsets are rejected before any slot is read
        let plan = SpgemmPlan::new(PatternKey::new(&av, &bv), 2, 2, vec![0, 1], vec![1]);
        let err = SequentialBackend
            .spgemm_compute(&mut c, &semiring, av, bv, &plan)
            .unwrap_err();
        assert_eq!(err, GraphBlasError::InvalidState);

        let plan = SequentialBackend.spgemm_analyze(av, bv).unwrap();
        SequentialBackend
            .spgemm_compute(&mut c, &semiring, av, bv, &plan)
            .unwrap();
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![(0, 1, 3.0), (1, 1, 3.0)]);
    }

    #[test]
    fn test_features() {
        let backend = SequentialBackend::new();
        assert_eq!(backend.name(), "sequential");
        assert!(backend.supports_feature(BackendFeature::TwoPhaseSpgemm));
        assert!(!backend.supports_feature(BackendFeature::GPU));
    }
}
