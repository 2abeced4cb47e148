// FFI Layer: C status-code compatibility
//
// Only the status codes survive here. Stores and kernels are plain Rust values;
// callers that speak the GraphBLAS C contract translate results through
// GraphBlasError::to_grb_info.

pub mod error;

pub use error::*;
