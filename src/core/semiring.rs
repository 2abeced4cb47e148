// Core Layer: Semirings for multiply kernels
//
// A kernel computes C(i,j) = add over k of mul(A(i,k), B(k,j)), starting
// from `zero`. Sparse kernels never visit absent entries, so `zero` is also
// what a dense output cell holds when its row of A has no products.
//
// Built-in sets per element type:
// - plus_times on every numeric type (wrapping for integers)
// - min_plus / max_plus on every numeric type (saturating for integers),
//   zero is the type's +inf / -inf or MAX / MIN
// - max_times on floats
// - lor_land on bool

use crate::core::error::Result;
use crate::types::GraphBLASType;

/// Additive monoid plus multiplicative operator over one element type
///
/// The element type is fixed by `T`, so a semiring can only be paired with
/// stores of that same type.
pub struct Semiring<T: GraphBLASType> {
    add_op: fn(T, T) -> T,
    mul_op: fn(T, T) -> T,
    /// Identity of `add_op`
    zero: T,
    name: &'static str,
}

impl<T: GraphBLASType> Semiring<T> {
    /// Create a semiring from its operators and additive identity
    pub fn new(
        add_op: fn(T, T) -> T,
        mul_op: fn(T, T) -> T,
        zero: T,
        name: &'static str,
    ) -> Result<Self> {
        Ok(Self {
            add_op,
            mul_op,
            zero,
            name,
        })
    }

    pub fn add(&self, left: T, right: T) -> T {
        (self.add_op)(left, right)
    }

    pub fn multiply(&self, left: T, right: T) -> T {
        (self.mul_op)(left, right)
    }

    /// Starting value of every accumulation
    pub fn zero(&self) -> T {
        self.zero
    }

    pub fn name(&self) -> &str {
        self.name
    }
}

macro_rules! float_semirings {
    ($($ty:ty),*) => {
        $(
            impl Semiring<$ty> {
                /// Ordinary arithmetic: (+, *, 0)
                pub fn plus_times() -> Result<Self> {
                    Self::new(|a, b| a + b, |a, b| a * b, 0.0, "plus_times")
                }

                /// Shortest path: (min, +, +inf)
                pub fn min_plus() -> Result<Self> {
                    Self::new(|a, b| a.min(b), |a, b| a + b, <$ty>::INFINITY, "min_plus")
                }

                /// Longest path: (max, +, -inf)
                pub fn max_plus() -> Result<Self> {
                    Self::new(|a, b| a.max(b), |a, b| a + b, <$ty>::NEG_INFINITY, "max_plus")
                }

                /// Most reliable path: (max, *, -inf)
                pub fn max_times() -> Result<Self> {
                    Self::new(|a, b| a.max(b), |a, b| a * b, <$ty>::NEG_INFINITY, "max_times")
                }
            }
        )*
    };
}

macro_rules! int_semirings {
    ($($ty:ty),*) => {
        $(
            impl Semiring<$ty> {
                /// Ordinary arithmetic, wrapping on overflow: (+, *, 0)
                pub fn plus_times() -> Result<Self> {
                    Self::new(|a, b| a.wrapping_add(b), |a, b| a.wrapping_mul(b), 0, "plus_times")
                }

                /// (min, +, MAX); with non-negative weights MAX stays MAX under `+`
                pub fn min_plus() -> Result<Self> {
                    Self::new(|a, b| a.min(b), |a, b| a.saturating_add(b), <$ty>::MAX, "min_plus")
                }

                /// (max, +, MIN)
                pub fn max_plus() -> Result<Self> {
                    Self::new(|a, b| a.max(b), |a, b| a.saturating_add(b), <$ty>::MIN, "max_plus")
                }
            }
        )*
    };
}

float_semirings!(f32, f64);
int_semirings!(i8, i16, i32, i64, u8, u16, u32, u64);

impl Semiring<bool> {
    /// Reachability: (or, and, false)
    pub fn lor_land() -> Result<Self> {
        Self::new(|a, b| a || b, |a, b| a && b, false, "lor_land")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plus_times() {
        let s = Semiring::<f64>::plus_times().unwrap();
        assert_eq!(s.add(2.0, 3.0), 5.0);
        assert_eq!(s.multiply(2.0, 3.0), 6.0);
        assert_eq!(s.zero(), 0.0);
    }

    #[test]
    fn test_min_plus_identity() {
        let s = Semiring::<f64>::min_plus().unwrap();
        assert_eq!(s.add(s.zero(), 4.0), 4.0);
        assert_eq!(s.multiply(1.0, 4.0), 5.0);
        assert_eq!(s.name(), "min_plus");
    }

    #[test]
    fn test_integer_min_plus_saturates() {
        let s = Semiring::<u32>::min_plus().unwrap();
        // An infinite edge stays infinite instead of wrapping around
        assert_eq!(s.multiply(s.zero(), 5), u32::MAX);
        assert_eq!(s.add(s.zero(), 7), 7);

        let s = Semiring::<i64>::max_plus().unwrap();
        assert_eq!(s.multiply(s.zero(), -1), i64::MIN);
    }

    #[test]
    fn test_integer_plus_times() {
        let s = Semiring::<i32>::plus_times().unwrap();
        assert_eq!(s.add(s.zero(), s.multiply(3, 4)), 12);
    }

    #[test]
    fn test_lor_land() {
        let s = Semiring::<bool>::lor_land().unwrap();
        assert!(!s.zero());
        assert!(s.add(false, s.multiply(true, true)));
        assert!(!s.multiply(true, false));
    }
}
