// SpGEMM Plans: symbolic analysis results and their cache
//
// A plan records the structure of C = A * B. It depends only on the sparsity
// patterns of A and B, so it is keyed by a hash of their shapes and index
// arrays and reused for every multiply with the same patterns.

use crate::core::error::{GraphBlasError, Result};
use crate::core::view::CsrView;
use crate::types::Index;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Cache key identifying the sparsity patterns of a pair of operands
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatternKey {
    /// SHA-256 over both operands' shapes, row_ptr and col_ind
    pattern_hash: [u8; 32],
}

impl PatternKey {
    /// Hash the patterns of `a` and `b`; values do not participate
    pub fn new<T, U>(a: &CsrView<'_, T>, b: &CsrView<'_, U>) -> Self {
        let mut hasher = Sha256::new();
        Self::hash_pattern(&mut hasher, a);
        Self::hash_pattern(&mut hasher, b);

        let result = hasher.finalize();
        let mut pattern_hash = [0u8; 32];
        pattern_hash.copy_from_slice(&result);
        Self { pattern_hash }
    }

    fn hash_pattern<T>(hasher: &mut Sha256, view: &CsrView<'_, T>) {
        hasher.update((view.nrows() as u64).to_le_bytes());
        hasher.update((view.ncols() as u64).to_le_bytes());
        hasher.update((view.nvals() as u64).to_le_bytes());
        for &ptr in view.row_ptr() {
            hasher.update((ptr as u64).to_le_bytes());
        }
        for &col in view.col_ind() {
            hasher.update((col as u64).to_le_bytes());
        }
    }
}

/// Symbolic structure of a sparse-sparse product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpgemmPlan {
    key: PatternKey,
    nrows: Index,
    ncols: Index,
    /// Row offsets of C
    row_ptr: Vec<Index>,
    /// Column indices of C, ascending within each row
    col_ind: Vec<Index>,
}

impl SpgemmPlan {
    /// Assemble a plan; backends producing their own analysis call this and
    /// numeric phases check the result with `validate`
    pub fn new(
        key: PatternKey,
        nrows: Index,
        ncols: Index,
        row_ptr: Vec<Index>,
        col_ind: Vec<Index>,
    ) -> Self {
        Self {
            key,
            nrows,
            ncols,
            row_ptr,
            col_ind,
        }
    }

    pub fn key(&self) -> &PatternKey {
        &self.key
    }

    /// Shape of C
    pub fn shape(&self) -> (Index, Index) {
        (self.nrows, self.ncols)
    }

    /// Number of entries C will store
    pub fn nvals(&self) -> Index {
        self.col_ind.len()
    }

    pub fn row_ptr(&self) -> &[Index] {
        &self.row_ptr
    }

    pub fn col_ind(&self) -> &[Index] {
        &self.col_ind
    }

    /// Check the structure is a CSR pattern of the planned shape
    ///
    /// `row_ptr` must hold `nrows + 1` non-decreasing offsets from 0 to
    /// `nvals`, and each row's columns must be strictly ascending and below
    /// `ncols`. A violation is `InvalidState`.
    pub fn validate(&self) -> Result<()> {
        let row_ptr = &self.row_ptr;
        if self.nrows.checked_add(1) != Some(row_ptr.len())
            || row_ptr.first() != Some(&0)
            || row_ptr.last() != Some(&self.col_ind.len())
            || row_ptr.windows(2).any(|w| w[0] > w[1])
        {
            log::warn!("spgemm plan has malformed row offsets");
            return Err(GraphBlasError::InvalidState);
        }
        for bounds in row_ptr.windows(2) {
            let cols = &self.col_ind[bounds[0]..bounds[1]];
            let unordered = cols.windows(2).any(|w| w[0] >= w[1]);
            if unordered || cols.last().map_or(false, |&c| c >= self.ncols) {
                log::warn!("spgemm plan has unordered or out-of-range columns");
                return Err(GraphBlasError::InvalidState);
            }
        }
        Ok(())
    }

    /// Approximate heap footprint, used for cache accounting
    pub fn size_bytes(&self) -> usize {
        (self.row_ptr.len() + self.col_ind.len()) * std::mem::size_of::<Index>()
    }
}

/// Cached plan with metadata
struct CachedPlan {
    plan: Arc<SpgemmPlan>,
    /// Number of times this plan has been used
    use_count: usize,
    /// Approximate size in bytes (for eviction)
    size_bytes: usize,
}

struct CacheState {
    entries: HashMap<PatternKey, CachedPlan>,
    current_size: usize,
}

/// Plan cache with least-used eviction
pub struct PlanCache {
    state: Mutex<CacheState>,
    /// Maximum cache size in bytes
    max_size_bytes: usize,
}

impl PlanCache {
    /// Create a new plan cache
    ///
    /// # Arguments
    /// * `max_size_mb` - Maximum cache size in megabytes
    pub fn new(max_size_mb: usize) -> Self {
        Self::with_max_bytes(max_size_mb.saturating_mul(1024 * 1024))
    }

    /// Create a plan cache bounded by an exact byte count
    pub fn with_max_bytes(max_size_bytes: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                current_size: 0,
            }),
            max_size_bytes,
        }
    }

    /// Try to get a plan from the cache
    pub fn get(&self, key: &PatternKey) -> Option<Arc<SpgemmPlan>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        state.entries.get_mut(key).map(|cached| {
            cached.use_count += 1;
            cached.plan.clone()
        })
    }

    /// Insert a plan; plans larger than the whole cache are not retained
    pub fn insert(&self, plan: Arc<SpgemmPlan>) {
        let size_bytes = plan.size_bytes();
        if size_bytes > self.max_size_bytes {
            log::debug!(
                "Plan of {} bytes exceeds cache capacity of {} bytes",
                size_bytes,
                self.max_size_bytes
            );
            return;
        }

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        // Evict if necessary
        while state.current_size + size_bytes > self.max_size_bytes && !state.entries.is_empty() {
            Self::evict_least_used(&mut state);
        }

        let key = plan.key().clone();
        let cached = CachedPlan {
            plan,
            use_count: 1,
            size_bytes,
        };
        if let Some(old) = state.entries.insert(key, cached) {
            state.current_size = state.current_size.saturating_sub(old.size_bytes);
        }
        state.current_size += size_bytes;
    }

    fn evict_least_used(state: &mut CacheState) {
        if let Some((key_to_remove, size_to_remove)) = state
            .entries
            .iter()
            .min_by_key(|(_, cached)| cached.use_count)
            .map(|(k, cached)| (k.clone(), cached.size_bytes))
        {
            log::trace!("Evicting plan of {} bytes", size_to_remove);
            state.entries.remove(&key_to_remove);
            state.current_size = state.current_size.saturating_sub(size_to_remove);
        }
    }

    /// Clear the cache
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.entries.clear();
        state.current_size = 0;
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        CacheStats {
            num_entries: state.entries.len(),
            size_bytes: state.current_size,
            max_size_bytes: self.max_size_bytes,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub num_entries: usize,
    pub size_bytes: usize,
    pub max_size_bytes: usize,
}

impl Default for PlanCache {
    fn default() -> Self {
        // Default to 64 MB cache
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(row_ptr: &'a [Index], col_ind: &'a [Index], values: &'a [f64]) -> CsrView<'a, f64> {
        CsrView::new(row_ptr.len() - 1, 4, col_ind.len(), row_ptr, col_ind, values)
    }

    fn plan_for(key: PatternKey, nvals: usize) -> Arc<SpgemmPlan> {
        Arc::new(SpgemmPlan::new(key, 1, 4, vec![0, nvals], (0..nvals).collect()))
    }

    #[test]
    fn test_key_ignores_values() {
        let a = view(&[0, 1], &[2], &[1.0]);
        let a_other_value = view(&[0, 1], &[2], &[9.0]);
        let b = view(&[0, 0, 0, 1, 1], &[3], &[1.0]);

        assert_eq!(PatternKey::new(&a, &b), PatternKey::new(&a_other_value, &b));
    }

    #[test]
    fn test_key_tracks_pattern() {
        let a = view(&[0, 1], &[2], &[1.0]);
        let a_moved = view(&[0, 1], &[1], &[1.0]);
        let b = view(&[0, 0, 0, 1, 1], &[3], &[1.0]);

        assert_ne!(PatternKey::new(&a, &b), PatternKey::new(&a_moved, &b));
        assert_ne!(PatternKey::new(&a, &b), PatternKey::new(&b, &a));
    }

    #[test]
    fn test_cache_operations() {
        let cache = PlanCache::new(1);
        let a = view(&[0, 1], &[2], &[1.0]);
        let b = view(&[0, 0, 0, 1, 1], &[3], &[1.0]);
        let key = PatternKey::new(&a, &b);

        assert!(cache.get(&key).is_none());
        cache.insert(plan_for(key.clone(), 1));
        assert!(cache.get(&key).is_some());

        let stats = cache.stats();
        assert_eq!(stats.num_entries, 1);
        assert_eq!(stats.size_bytes, 3 * std::mem::size_of::<Index>());

        cache.clear();
        assert_eq!(cache.stats().num_entries, 0);
    }

    #[test]
    fn test_eviction_prefers_least_used() {
        let entry_bytes = 3 * std::mem::size_of::<Index>();
        let cache = PlanCache::with_max_bytes(2 * entry_bytes);

        let b = view(&[0, 0, 0, 1, 1], &[3], &[1.0]);
        let a0 = view(&[0, 1], &[0], &[1.0]);
        let a1 = view(&[0, 1], &[1], &[1.0]);
        let a2 = view(&[0, 1], &[2], &[1.0]);
        let (k0, k1, k2) = (
            PatternKey::new(&a0, &b),
            PatternKey::new(&a1, &b),
            PatternKey::new(&a2, &b),
        );

        cache.insert(plan_for(k0.clone(), 1));
        cache.insert(plan_for(k1.clone(), 1));
        cache.get(&k0);
        cache.insert(plan_for(k2.clone(), 1));

        assert!(cache.get(&k0).is_some());
        assert!(cache.get(&k1).is_none());
        assert!(cache.get(&k2).is_some());
        assert_eq!(cache.stats().size_bytes, 2 * entry_bytes);
    }

    #[test]
    fn test_oversized_plan_not_cached() {
        let cache = PlanCache::with_max_bytes(4);
        let a = view(&[0, 1], &[2], &[1.0]);
        let key = PatternKey::new(&a, &a);
        cache.insert(plan_for(key.clone(), 1));
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_validate_structure() {
        let a = view(&[0, 1], &[2], &[1.0]);
        let key = PatternKey::new(&a, &a);
        let plan = |row_ptr: Vec<Index>, col_ind: Vec<Index>| {
            SpgemmPlan::new(key.clone(), 2, 3, row_ptr, col_ind)
        };

        assert!(plan(vec![0, 2, 3], vec![0, 2, 1]).validate().is_ok());
        assert!(plan(vec![0, 0, 0], vec![]).validate().is_ok());

        let bad = [
            plan(vec![0, 1], vec![0]),
            plan(vec![1, 1, 1], vec![0]),
            plan(vec![0, 2, 1], vec![0]),
            plan(vec![0, 2, 2], vec![2, 0]),
            plan(vec![0, 2, 2], vec![1, 1]),
            plan(vec![0, 1, 1], vec![3]),
        ];
        for p in &bad {
            assert_eq!(p.validate(), Err(GraphBlasError::InvalidState));
        }
    }
}
