//! Element types that can be stored in an [`ArrayView`].
//!
//! [`ArrayView`]: super::ArrayView

use std::cmp::{Ordering};
use std::fmt::{self, Debug, Display};
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_traits::{One, Zero};

/// The name of an [`Element`] type, as reported by [`ArrayView::dtype()`].
///
/// [`ArrayView::dtype()`]: super::ArrayView::dtype()
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum DType {
    Float32,
    Float64,
    Complex64,
    Complex128,
}

impl Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
        })
    }
}

// ----------------------------------------------------------------------------

/// A numeric type on which every [`Ufunc`] is defined.
///
/// The methods are the per-element kernels of the ufuncs. They deliberately
/// share names with the inherent methods of the primitive types, so generic
/// code should call them as `A::exp(x)` rather than `x.exp()`.
///
/// [`Ufunc`]: super::Ufunc
pub trait Element:
    'static + Copy + Debug + Display + PartialEq + Zero + One
    + Add<Output=Self> + Sub<Output=Self> + Mul<Output=Self> + Div<Output=Self>
    + Neg<Output=Self>
{
    const DTYPE: DType;

    /// The magnitude of `self`, as an element of the same type.
    fn abs(self) -> Self;
    fn sqrt(self) -> Self;
    fn exp(self) -> Self;
    /// The natural logarithm.
    fn ln(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn tan(self) -> Self;
    fn pow(self, exponent: Self) -> Self;
    /// The remainder of `self / other`. For real types it has the sign of
    /// `other`.
    fn rem(self, other: Self) -> Self;
    fn conj(self) -> Self;

    /// The ordering used by `maximum`, `minimum` and the comparison
    /// operators. Complex numbers are ordered lexicographically.
    fn compare(&self, other: &Self) -> Option<Ordering>;

    /// Returns `true` if `self` contains a NaN.
    fn is_nan(self) -> bool { self != self }

    /// Convert an element count, e.g. to compute a mean.
    fn from_count(n: usize) -> Self;
}

macro_rules! impl_real_element {
    ($t:ty, $dtype:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$dtype;
            fn abs(self) -> Self { <$t>::abs(self) }
            fn sqrt(self) -> Self { <$t>::sqrt(self) }
            fn exp(self) -> Self { <$t>::exp(self) }
            fn ln(self) -> Self { <$t>::ln(self) }
            fn sin(self) -> Self { <$t>::sin(self) }
            fn cos(self) -> Self { <$t>::cos(self) }
            fn tan(self) -> Self { <$t>::tan(self) }
            fn pow(self, exponent: Self) -> Self { <$t>::powf(self, exponent) }

            fn rem(self, other: Self) -> Self {
                let r = self % other;
                if r != 0.0 && (r < 0.0) != (other < 0.0) { r + other } else { r }
            }

            fn conj(self) -> Self { self }
            fn compare(&self, other: &Self) -> Option<Ordering> { self.partial_cmp(other) }
            fn from_count(n: usize) -> Self { n as $t }
        }
    };
}

impl_real_element!(f32, Float32);
impl_real_element!(f64, Float64);

#[cfg(feature = "complex")]
mod complex {
    use num_complex::{Complex};

    use super::*;

    macro_rules! impl_complex_element {
        ($t:ty, $dtype:ident) => {
            impl Element for Complex<$t> {
                const DTYPE: DType = DType::$dtype;
                fn abs(self) -> Self { Complex::new(self.norm(), 0.0) }
                fn sqrt(self) -> Self { Complex::sqrt(self) }
                fn exp(self) -> Self { Complex::exp(self) }
                fn ln(self) -> Self { Complex::ln(self) }
                fn sin(self) -> Self { Complex::sin(self) }
                fn cos(self) -> Self { Complex::cos(self) }
                fn tan(self) -> Self { Complex::tan(self) }
                fn pow(self, exponent: Self) -> Self { self.powc(exponent) }
                fn rem(self, other: Self) -> Self { self % other }
                fn conj(self) -> Self { Complex::conj(&self) }

                fn compare(&self, other: &Self) -> Option<Ordering> {
                    match self.re.partial_cmp(&other.re)? {
                        Ordering::Equal => self.im.partial_cmp(&other.im),
                        ordering => Some(ordering),
                    }
                }

                fn from_count(n: usize) -> Self { Complex::new(n as $t, 0.0) }
            }
        };
    }

    impl_complex_element!(f32, Complex64);
    impl_complex_element!(f64, Complex128);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remainder_has_sign_of_divisor() {
        assert_eq!(Element::rem(7.0f64, 3.0), 1.0);
        assert_eq!(Element::rem(-7.0f64, 3.0), 2.0);
        assert_eq!(Element::rem(7.0f64, -3.0), -2.0);
        assert_eq!(Element::rem(-6.0f64, 3.0), 0.0);
    }

    #[test]
    fn nan() {
        assert!(Element::is_nan(f64::NAN));
        assert!(!Element::is_nan(1.0f32));
        assert_eq!(Element::compare(&f64::NAN, &1.0), None);
    }

    #[cfg(feature = "complex")]
    #[test]
    fn complex_ordering() {
        use num_complex::{Complex64};
        let a = Complex64::new(1.0, 5.0);
        let b = Complex64::new(2.0, 0.0);
        let c = Complex64::new(1.0, 6.0);
        assert_eq!(a.compare(&b), Some(Ordering::Less));
        assert_eq!(a.compare(&c), Some(Ordering::Less));
        assert_eq!(Element::abs(Complex64::new(3.0, 4.0)), Complex64::new(5.0, 0.0));
        assert_eq!(Complex64::DTYPE.to_string(), "complex128");
    }
}
