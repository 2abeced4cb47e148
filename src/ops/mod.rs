// High-Level Operations Module
//
// Multiply entry points that dispatch over a Backend, plus kernel configuration.

pub mod config;
pub mod matmul;

// Re-exports
pub use config::SpmmConfig;
pub use matmul::{
    clear_plan_cache, plan_cache_stats, spgemm, spgemm_analyze, spgemm_compute, spmm,
};
