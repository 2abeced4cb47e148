// sparsestore: compressed sparse row storage for GraphBLAS backends
//
// Converts coordinate triplets into CSR and exposes the arrays to semiring
// multiply kernels through read-only views.
//
// Architecture:
// - types: index type and element type trait
// - core: CSR store, coordinate builder, views, operand and operator types
// - backend: compute backend trait, sequential CPU backend, spgemm plans
// - ops: validated multiply entry points and kernel configuration
// - ffi: GraphBLAS C status codes

#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]

#[macro_use]
extern crate lazy_static;

// Public modules
pub mod types;
pub mod core;
pub mod ffi;

// Compute dispatch
pub mod backend;
pub mod ops;

// Re-export commonly used items for convenience
pub use types::{GraphBLASType, Index, TypeCode};
pub use core::{GraphBlasError, Result};
pub use core::{CsrView, DenseMatrix, SparseMatrix};
