//! The error type shared by views, properties and the ufunc adapter.
//!
//! Nothing here is recovered from internally. Errors raised by a getter or a
//! setter reach the caller unchanged.

use thiserror::Error;

use super::KeyError;

/// Everything that can go wrong while reading, writing or computing with an
/// [`ArrayView`].
///
/// [`ArrayView`]: super::ArrayView
#[derive(Debug, Error)]
pub enum Error {
    /// A write was attempted on a property declared without a setter.
    #[error("can't set `{name}`: property has no setter")]
    ReadOnly { name: &'static str },

    /// A key could not be applied to an array of the given shape.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// A value could not be broadcast to the shape of the region it was
    /// written to.
    #[error("could not broadcast array from shape {from:?} into shape {to:?}")]
    Broadcast { from: Vec<usize>, to: Vec<usize> },

    /// Two operands had no common broadcast shape.
    #[error("operands could not be broadcast together with shapes {lhs:?} {rhs:?}")]
    ShapeMismatch { lhs: Vec<usize>, rhs: Vec<usize> },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[error("axis {axis} is out of bounds for array of dimension {ndim}")]
    AxisOutOfBounds { axis: usize, ndim: usize },

    /// A ufunc was given the wrong number of operands for the method.
    #[error("`{op}` expects {expected} operand(s), got {given}")]
    Arity { op: &'static str, expected: usize, given: usize },

    #[error("{capability} is not supported: {reason}")]
    Unsupported { capability: &'static str, reason: String },

    /// An error raised by the storage behind a getter or setter.
    #[error(transparent)]
    Storage(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Wrap an error raised by a consumer's own storage.
    pub fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(e))
    }

    pub(crate) fn unsupported(capability: &'static str, reason: impl Into<String>) -> Self {
        Self::Unsupported {capability, reason: reason.into()}
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
