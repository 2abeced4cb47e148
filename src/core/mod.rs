// Core Layer: Rust Implementation Module
//
// Storage types and the operator vocabulary kernels are parameterized by

pub mod binary_op;
pub mod buffer;
pub mod dense;
pub mod error;
pub mod semiring;
pub mod sparse_matrix;
pub mod view;

// Re-export commonly used types
pub use binary_op::BinaryOp;
pub use buffer::HostBuffer;
pub use dense::{DenseMatrix, Layout};
pub use error::{GraphBlasError, Result};
pub use semiring::Semiring;
pub use sparse_matrix::SparseMatrix;
pub use view::CsrView;
