// FFI Layer: GraphBLAS C API Error Codes
// GrB_Info status codes for callers that consume result codes instead of Result

/// GraphBLAS return status codes
pub type GrB_Info = i32;

// Success codes (>= 0)
pub const GrB_SUCCESS: GrB_Info = 0;
pub const GrB_NO_VALUE: GrB_Info = 1; // Requested value not present (sparse structure)

// Standard GraphBLAS C API error codes (< 0)
pub const GrB_UNINITIALIZED_OBJECT: GrB_Info = -1;
pub const GrB_INVALID_VALUE: GrB_Info = -3;
pub const GrB_DIMENSION_MISMATCH: GrB_Info = -6;
pub const GrB_NOT_IMPLEMENTED: GrB_Info = -8;

// Execution error codes
pub const GrB_OUT_OF_MEMORY: GrB_Info = -102;
pub const GrB_INVALID_OBJECT: GrB_Info = -104;
pub const GrB_INDEX_OUT_OF_BOUNDS: GrB_Info = -105;

/// Helper to get error message for a GrB_Info code
pub fn grb_info_to_string(info: GrB_Info) -> &'static str {
    match info {
        GrB_SUCCESS => "GrB_SUCCESS: operation completed successfully",
        GrB_NO_VALUE => "GrB_NO_VALUE: requested value not present in sparse structure",
        GrB_UNINITIALIZED_OBJECT => "GrB_UNINITIALIZED_OBJECT: object has not been initialized",
        GrB_INVALID_VALUE => "GrB_INVALID_VALUE: invalid parameter value",
        GrB_DIMENSION_MISMATCH => "GrB_DIMENSION_MISMATCH: dimension mismatch between operands",
        GrB_NOT_IMPLEMENTED => "GrB_NOT_IMPLEMENTED: method not implemented",
        GrB_OUT_OF_MEMORY => "GrB_OUT_OF_MEMORY: memory allocation failed",
        GrB_INVALID_OBJECT => "GrB_INVALID_OBJECT: object state does not permit the operation",
        GrB_INDEX_OUT_OF_BOUNDS => "GrB_INDEX_OUT_OF_BOUNDS: index exceeds valid bounds",
        _ => "Unknown GrB_Info code",
    }
}
