// Type System: index vocabulary and element types
//
// Storage is generic over the element type. Kernels and diagnostics still
// need a runtime description of T, so every element type carries a TypeCode.
// 1. Index - row/column position and offset type
// 2. TypeCode - Runtime enum representation
// 3. GraphBLASType trait - Compile-time type information

/// Row, column, and offset type used by every stored array
pub type Index = usize;

/// Runtime type code enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    /// Boolean type
    Bool,
    /// Signed 8-bit integer
    Int8,
    /// Signed 16-bit integer
    Int16,
    /// Signed 32-bit integer
    Int32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 8-bit integer
    Uint8,
    /// Unsigned 16-bit integer
    Uint16,
    /// Unsigned 32-bit integer
    Uint32,
    /// Unsigned 64-bit integer
    Uint64,
    /// 32-bit floating point
    Fp32,
    /// 64-bit floating point
    Fp64,
}

impl TypeCode {
    /// Get human-readable name for this type code
    pub fn name(&self) -> &'static str {
        match self {
            TypeCode::Bool => "bool",
            TypeCode::Int8 => "int8",
            TypeCode::Int16 => "int16",
            TypeCode::Int32 => "int32",
            TypeCode::Int64 => "int64",
            TypeCode::Uint8 => "uint8",
            TypeCode::Uint16 => "uint16",
            TypeCode::Uint32 => "uint32",
            TypeCode::Uint64 => "uint64",
            TypeCode::Fp32 => "float32",
            TypeCode::Fp64 => "float64",
        }
    }
}

/// Trait for element types a sparse store can hold
///
/// `Default` supplies the fill value for freshly allocated value slots,
/// which the coordinate builder overwrites before they are ever read.
pub trait GraphBLASType: Copy + Default + std::fmt::Debug + 'static {
    /// The runtime type code for this type
    const TYPE_CODE: TypeCode;

    /// Get human-readable type name
    fn type_name() -> &'static str {
        Self::TYPE_CODE.name()
    }
}

macro_rules! impl_graphblas_type {
    ($($ty:ty => $code:ident),* $(,)?) => {
        $(
            impl GraphBLASType for $ty {
                const TYPE_CODE: TypeCode = TypeCode::$code;
            }
        )*
    };
}

impl_graphblas_type! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    f32 => Fp32,
    f64 => Fp64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_trait() {
        assert_eq!(i32::TYPE_CODE, TypeCode::Int32);
        assert_eq!(f64::TYPE_CODE, TypeCode::Fp64);
        assert_eq!(bool::TYPE_CODE, TypeCode::Bool);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(i32::type_name(), "int32");
        assert_eq!(f64::type_name(), "float64");
        assert_eq!(bool::type_name(), "bool");
    }
}
