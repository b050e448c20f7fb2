//! Named elementwise operations, and the ways of applying them.
//!
//! A [`Ufunc`] is an operation on one or two elements, such as
//! [`Ufunc::Add`] or [`Ufunc::Exp`]. A [`Method`] says how to lift it to
//! whole arrays: pointwise with broadcasting, or as a reduction, and so on.
//! Pass both to [`apply()`] to execute them.
//!
//! [`apply()`]: super::apply()

use std::cmp::{Ordering};

use super::{Element, Key};

/// A named elementwise operation.
///
/// A `Ufunc` is applied with [`call()`] or [`apply()`], which check the
/// number of operands against [`nin()`] and report a mismatch as
/// [`Error::Arity`].
///
/// ```
/// use ndproperty::{call, Error, Operand, Ufunc};
/// assert!(matches!(
///     call(Ufunc::Add, &[Operand::Scalar(1.0)]),
///     Err(Error::Arity {expected: 2, given: 1, ..}),
/// ));
/// ```
///
/// The per-element kernels are private to the crate:
///
/// ```compile_fail
/// use ndproperty::{Ufunc};
/// let _ = Ufunc::Add.unary(1.0);
/// ```
///
/// [`call()`]: super::call()
/// [`apply()`]: super::apply()
/// [`nin()`]: Self::nin()
/// [`Error::Arity`]: super::Error::Arity
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum Ufunc {
    Negative,
    Absolute,
    Sqrt,
    Square,
    Exp,
    Log,
    Sin,
    Cos,
    Tan,
    Conjugate,
    Reciprocal,

    Add,
    Subtract,
    Multiply,
    Divide,
    /// Remainder with the sign of the divisor.
    Remainder,
    Power,
    /// The larger of two elements. NaNs propagate.
    Maximum,
    /// The smaller of two elements. NaNs propagate.
    Minimum,
}

impl Ufunc {
    pub fn name(self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Absolute => "absolute",
            Self::Sqrt => "sqrt",
            Self::Square => "square",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Conjugate => "conjugate",
            Self::Reciprocal => "reciprocal",
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Remainder => "remainder",
            Self::Power => "power",
            Self::Maximum => "maximum",
            Self::Minimum => "minimum",
        }
    }

    /// The number of inputs.
    pub fn nin(self) -> usize {
        match self {
            Self::Negative | Self::Absolute | Self::Sqrt | Self::Square | Self::Exp
            | Self::Log | Self::Sin | Self::Cos | Self::Tan | Self::Conjugate
            | Self::Reciprocal => 1,
            _ => 2,
        }
    }

    /// The value `e` such that `self(e, x) == x` for all `x`, if any. A
    /// reduction over zero elements returns this.
    pub fn identity<A: Element>(self) -> Option<A> {
        match self {
            Self::Add => Some(A::zero()),
            Self::Multiply => Some(A::one()),
            _ => None,
        }
    }

    /// Apply a unary `self` to `x`. The caller checks [`nin()`] first.
    ///
    /// [`nin()`]: Self::nin()
    pub(crate) fn unary<A: Element>(self, x: A) -> A {
        match self {
            Self::Negative => -x,
            Self::Absolute => A::abs(x),
            Self::Sqrt => A::sqrt(x),
            Self::Square => x * x,
            Self::Exp => A::exp(x),
            Self::Log => A::ln(x),
            Self::Sin => A::sin(x),
            Self::Cos => A::cos(x),
            Self::Tan => A::tan(x),
            Self::Conjugate => A::conj(x),
            Self::Reciprocal => A::one() / x,
            _ => panic!("`{}` is not a unary ufunc", self.name()),
        }
    }

    /// Apply a binary `self` to `x` and `y`. The caller checks [`nin()`]
    /// first.
    ///
    /// [`nin()`]: Self::nin()
    pub(crate) fn binary<A: Element>(self, x: A, y: A) -> A {
        match self {
            Self::Add => x + y,
            Self::Subtract => x - y,
            Self::Multiply => x * y,
            Self::Divide => x / y,
            Self::Remainder => A::rem(x, y),
            Self::Power => A::pow(x, y),
            Self::Maximum => extremum(x, y, Ordering::Greater),
            Self::Minimum => extremum(x, y, Ordering::Less),
            _ => panic!("`{}` is not a binary ufunc", self.name()),
        }
    }
}

/// Returns whichever of `x` and `y` is further in direction `wanted`,
/// or whichever is NaN.
fn extremum<A: Element>(x: A, y: A, wanted: Ordering) -> A {
    match x.compare(&y) {
        Some(o) if o == wanted || o == Ordering::Equal => x,
        Some(_) => y,
        None => if x.is_nan() { x } else { y },
    }
}

// ----------------------------------------------------------------------------

/// How to apply a [`Ufunc`] to arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// Apply the ufunc pointwise, broadcasting the inputs together.
    Call,

    /// Fold a binary ufunc along `axis`, or along every axis if `None`.
    Reduce {axis: Option<usize>},

    /// Like `Reduce`, but keep the running results along `axis`.
    Accumulate {axis: usize},

    /// Apply a binary ufunc to every pair of elements. The result's shape is
    /// the first input's shape followed by the second's.
    Outer,

    /// Update the region `key` of the first input in place. Returns nothing.
    At {key: Key},
}

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Call => "__call__",
            Self::Reduce {..} => "reduce",
            Self::Accumulate {..} => "accumulate",
            Self::Outer => "outer",
            Self::At {..} => "at",
        }
    }
}

// ----------------------------------------------------------------------------

/// A pointwise comparison producing booleans.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl Comparison {
    pub fn call<A: Element>(self, x: A, y: A) -> bool {
        let ordering = x.compare(&y);
        match self {
            Self::Equal => x == y,
            Self::NotEqual => x != y,
            Self::Less => ordering == Some(Ordering::Less),
            Self::LessEqual => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            Self::Greater => ordering == Some(Ordering::Greater),
            Self::GreaterEqual => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        }
    }
}
