// Core Layer: Rust Error Types
// Idiomatic Rust error handling

use crate::ffi::error::*;
use std::fmt;

/// Rust-native GraphBLAS error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphBlasError {
    /// Object has not been built or allocated
    UninitializedObject,
    /// Invalid parameter value
    InvalidValue,
    /// Dimension mismatch between operands
    DimensionMismatch,
    /// Method not implemented by this backend
    NotImplemented,
    /// Memory allocation failed
    OutOfMemory,
    /// Index exceeds valid bounds
    IndexOutOfBounds,
    /// Operation not permitted in the object's current allocation state
    InvalidState,
}

impl GraphBlasError {
    /// Convert Rust error to C API error code
    pub fn to_grb_info(&self) -> GrB_Info {
        match self {
            Self::UninitializedObject => GrB_UNINITIALIZED_OBJECT,
            Self::InvalidValue => GrB_INVALID_VALUE,
            Self::DimensionMismatch => GrB_DIMENSION_MISMATCH,
            Self::NotImplemented => GrB_NOT_IMPLEMENTED,
            Self::OutOfMemory => GrB_OUT_OF_MEMORY,
            Self::IndexOutOfBounds => GrB_INDEX_OUT_OF_BOUNDS,
            Self::InvalidState => GrB_INVALID_OBJECT,
        }
    }

    /// Convert C API error code to Rust error
    pub fn from_grb_info(info: GrB_Info) -> Option<Self> {
        match info {
            GrB_SUCCESS | GrB_NO_VALUE => None,
            GrB_UNINITIALIZED_OBJECT => Some(Self::UninitializedObject),
            GrB_INVALID_VALUE => Some(Self::InvalidValue),
            GrB_DIMENSION_MISMATCH => Some(Self::DimensionMismatch),
            GrB_NOT_IMPLEMENTED => Some(Self::NotImplemented),
            GrB_OUT_OF_MEMORY => Some(Self::OutOfMemory),
            GrB_INDEX_OUT_OF_BOUNDS => Some(Self::IndexOutOfBounds),
            GrB_INVALID_OBJECT => Some(Self::InvalidState),
            _ => Some(Self::InvalidValue),
        }
    }
}

/// Collapse a Result into the C status code it would report
pub fn to_grb_info<T>(result: &Result<T>) -> GrB_Info {
    match result {
        Ok(_) => GrB_SUCCESS,
        Err(e) => e.to_grb_info(),
    }
}

impl fmt::Display for GraphBlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UninitializedObject => write!(f, "Object has not been initialized"),
            Self::InvalidValue => write!(f, "Invalid parameter value"),
            Self::DimensionMismatch => write!(f, "Dimension mismatch between operands"),
            Self::NotImplemented => write!(f, "Method not implemented"),
            Self::OutOfMemory => write!(f, "Memory allocation failed"),
            Self::IndexOutOfBounds => write!(f, "Index exceeds valid bounds"),
            Self::InvalidState => write!(f, "Operation not permitted in current state"),
        }
    }
}

impl std::error::Error for GraphBlasError {}

impl From<std::collections::TryReserveError> for GraphBlasError {
    fn from(_: std::collections::TryReserveError) -> Self {
        Self::OutOfMemory
    }
}

/// Result type for GraphBLAS operations
pub type Result<T> = std::result::Result<T, GraphBlasError>;
