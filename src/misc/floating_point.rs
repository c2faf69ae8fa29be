use nalgebra::RealField;
use num_traits::ToPrimitive;

/// Trait for floating point types (f32, f64)
/// Mainly used to identify the type of the field in nalgebra
pub trait FloatingPoint: RealField + ToPrimitive + Copy {
    /// Convert an `f64` constant into the scalar type.
    fn constant(value: f64) -> Self {
        Self::from_subset(&value)
    }

    /// Half of the sum of two values.
    fn mean(a: Self, b: Self) -> Self {
        (a + b) * Self::constant(0.5)
    }
}

impl FloatingPoint for f32 {}
impl FloatingPoint for f64 {}
