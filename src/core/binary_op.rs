// Core Layer: BinaryOp implementation

use crate::core::error::Result;
use crate::types::GraphBLASType;

/// Binary operator: z = f(x, y)
///
/// Used as the duplicate-combining strategy of `SparseMatrix::build_with_dup`.
pub struct BinaryOp<T: GraphBLASType, U: GraphBLASType, V: GraphBLASType> {
    /// Function pointer: (x, y) -> z
    op: fn(T, U) -> V,
    /// Name of operation
    name: String,
}

impl<T: GraphBLASType, U: GraphBLASType, V: GraphBLASType> BinaryOp<T, U, V> {
    /// Create a new binary operator
    pub fn new(op: fn(T, U) -> V, name: String) -> Result<Self> {
        Ok(Self { op, name })
    }

    /// Apply the operation
    pub fn apply(&self, x: T, y: U) -> V {
        (self.op)(x, y)
    }

    /// Get operator name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T: GraphBLASType> BinaryOp<T, T, T> {
    /// z = x (keep the earlier duplicate)
    pub fn first() -> Result<Self> {
        Self::new(|x, _| x, "first".to_string())
    }

    /// z = y (keep the later duplicate)
    pub fn second() -> Result<Self> {
        Self::new(|_, y| y, "second".to_string())
    }
}

impl BinaryOp<f64, f64, f64> {
    /// z = x + y
    pub fn plus() -> Result<Self> {
        Self::new(|x, y| x + y, "plus".to_string())
    }

    /// z = min(x, y)
    pub fn min() -> Result<Self> {
        Self::new(|x, y| x.min(y), "min".to_string())
    }
}
