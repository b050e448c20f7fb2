use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use ndarray::{SliceInfoElem};
use thiserror::Error;

/// One component of a [`Key`], addressing zero or more axes.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum Selector {
    /// Select a single position and remove the axis. Negative values count
    /// from the end.
    Index(isize),

    /// Select a strided range of positions, with the same clamping rules as
    /// a Python slice. `step` must not be zero.
    Slice {start: Option<isize>, stop: Option<isize>, step: isize},

    /// Insert a new axis of length 1.
    NewAxis,

    /// Stands for as many full slices as needed to address every axis.
    Ellipsis,
}

impl Selector {
    /// The full slice `..`.
    pub const ALL: Self = Self::Slice {start: None, stop: None, step: 1};

    /// Replace the step of a slice. Has no effect on other selectors.
    ///
    /// ```
    /// use ndproperty::Selector;
    /// assert_eq!(
    ///     Selector::from(1..).step_by(2),
    ///     Selector::Slice {start: Some(1), stop: None, step: 2},
    /// );
    /// ```
    pub fn step_by(self, step: isize) -> Self {
        match self {
            Self::Slice {start, stop, ..} => Self::Slice {start, stop, step},
            other => other,
        }
    }

    /// Whether this selector addresses an axis of the source array.
    fn consumes_axis(&self) -> bool {
        matches!(self, Self::Index(_) | Self::Slice {..})
    }
}

/// Convert an integer bound. Values too large for `isize` saturate, and then
/// fail or clamp when the key is resolved.
fn to_isize<T: TryInto<isize>>(t: T) -> isize {
    t.try_into().unwrap_or(isize::MAX)
}

/// The exclusive stop of a slice that ends at `end` inclusive.
fn inclusive_stop(end: isize, step: isize) -> Option<isize> {
    // `..=-1` with a positive step and `..=0` with a negative step run
    // through the last position visited.
    match (step > 0, end) {
        (true, -1) | (false, 0) => None,
        (true, _) => end.checked_add(1),
        (false, _) => end.checked_sub(1),
    }
}

macro_rules! impl_selector_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Selector {
            fn from(i: $t) -> Self { Self::Index(to_isize(i)) }
        }

        impl From<Range<$t>> for Selector {
            fn from(r: Range<$t>) -> Self { r.stepped(1) }
        }

        impl From<RangeInclusive<$t>> for Selector {
            fn from(r: RangeInclusive<$t>) -> Self { r.stepped(1) }
        }

        impl From<RangeFrom<$t>> for Selector {
            fn from(r: RangeFrom<$t>) -> Self { r.stepped(1) }
        }

        impl From<RangeTo<$t>> for Selector {
            fn from(r: RangeTo<$t>) -> Self { r.stepped(1) }
        }

        impl From<RangeToInclusive<$t>> for Selector {
            fn from(r: RangeToInclusive<$t>) -> Self { r.stepped(1) }
        }

        impl Stepped for Range<$t> {
            fn stepped(self, step: isize) -> Selector {
                Selector::Slice {start: Some(to_isize(self.start)), stop: Some(to_isize(self.end)), step}
            }
        }

        impl Stepped for RangeInclusive<$t> {
            fn stepped(self, step: isize) -> Selector {
                let (start, end) = self.into_inner();
                Selector::Slice {start: Some(to_isize(start)), stop: inclusive_stop(to_isize(end), step), step}
            }
        }

        impl Stepped for RangeFrom<$t> {
            fn stepped(self, step: isize) -> Selector {
                Selector::Slice {start: Some(to_isize(self.start)), stop: None, step}
            }
        }

        impl Stepped for RangeTo<$t> {
            fn stepped(self, step: isize) -> Selector {
                Selector::Slice {start: None, stop: Some(to_isize(self.end)), step}
            }
        }

        impl Stepped for RangeToInclusive<$t> {
            fn stepped(self, step: isize) -> Selector {
                Selector::Slice {start: None, stop: inclusive_stop(to_isize(self.end), step), step}
            }
        }
    )*};
}

impl_selector_from_int!(isize, i32, usize);

impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self { Self::ALL }
}

/// A range that can be turned into a strided [`Selector::Slice`]. This is
/// what `range;step` means in [`key!`].
///
/// Unlike [`Selector::step_by()`], this knows whether the range includes its
/// end, so the end is still included when `step` is negative.
///
/// ```
/// use ndproperty::{Selector, Stepped};
/// assert_eq!(
///     (3isize..=1).stepped(-1),
///     Selector::Slice {start: Some(3), stop: Some(0), step: -1},
/// );
/// ```
///
/// [`key!`]: crate::key!
pub trait Stepped {
    fn stepped(self, step: isize) -> Selector;
}

impl Stepped for RangeFull {
    fn stepped(self, step: isize) -> Selector { Selector::ALL.step_by(step) }
}

impl Stepped for Selector {
    fn stepped(self, step: isize) -> Selector { self.step_by(step) }
}

// ----------------------------------------------------------------------------

/// Errors raised when a [`Key`] cannot be applied to an array.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("index {index} is out of bounds for axis {axis} with size {len}")]
    OutOfBounds {axis: usize, index: isize, len: usize},

    #[error("too many indices for array: array is {ndim}-dimensional, but {given} were indexed")]
    TooManyIndices {ndim: usize, given: usize},

    #[error("an index can only have a single ellipsis")]
    MultipleEllipsis,

    #[error("slice step cannot be zero (axis {axis})")]
    ZeroStep {axis: usize},
}

// ----------------------------------------------------------------------------

/// An index expression addressing a region of an array.
///
/// A `Key` is a list of [`Selector`]s, applied to the axes of an array from
/// left to right. Axes that are not addressed are selected in full. The
/// empty `Key` therefore selects the whole array, and so does a `Key`
/// consisting of a single [`Selector::Ellipsis`]. Both count as the "full
/// selection"; see [`Key::is_full()`].
///
/// `Key`s are usually built with the [`key!`] macro:
///
/// ```
/// use ndproperty::{key, Key, Selector};
/// assert_eq!(key![1..3], Key::from(Selector::from(1..3)));
/// assert_eq!(key![0, ..;2], Key::new(vec![
///     Selector::Index(0),
///     Selector::Slice {start: None, stop: None, step: 2},
/// ]));
/// assert!(key![].is_full());
/// ```
///
/// [`key!`]: crate::key!
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq)]
pub struct Key(Vec<Selector>);

impl Key {
    pub fn new(selectors: Vec<Selector>) -> Self { Self(selectors) }

    /// The key that selects the entire array.
    pub fn full() -> Self { Self(vec![Selector::Ellipsis]) }

    pub fn selectors(&self) -> &[Selector] { &self.0 }

    /// Returns `true` if `self` selects an entire array of any shape
    /// without adding or removing axes.
    pub fn is_full(&self) -> bool {
        self.0.iter().all(|s| matches!(s, Selector::Ellipsis))
            && self.0.len() <= 1
    }

    /// Translate `self` into `ndarray` slice arguments for an array of shape
    /// `shape`, checking every index against the axis it addresses.
    ///
    /// ```
    /// use ndarray::{SliceInfoElem};
    /// use ndproperty::{key};
    /// let elems = key![-1, 1..;2].resolve(&[4, 5, 6]).unwrap();
    /// assert_eq!(elems, vec![
    ///     SliceInfoElem::Index(3),
    ///     SliceInfoElem::Slice {start: 1, end: Some(5), step: 2},
    ///     SliceInfoElem::Slice {start: 0, end: Some(6), step: 1},
    /// ]);
    /// ```
    pub fn resolve(&self, shape: &[usize]) -> Result<Vec<SliceInfoElem>, KeyError> {
        let ellipses = self.0.iter().filter(|s| matches!(s, Selector::Ellipsis)).count();
        if ellipses > 1 { return Err(KeyError::MultipleEllipsis); }
        let given = self.0.iter().filter(|s| s.consumes_axis()).count();
        if given > shape.len() {
            return Err(KeyError::TooManyIndices {ndim: shape.len(), given});
        }
        let mut elems = Vec::with_capacity(self.0.len() + shape.len() - given);
        let mut axis = 0;
        for selector in &self.0 {
            match *selector {
                Selector::Index(index) => {
                    elems.push(SliceInfoElem::Index(resolve_index(axis, index, shape[axis])?));
                    axis += 1;
                },
                Selector::Slice {start, stop, step} => {
                    elems.push(resolve_slice(axis, start, stop, step, shape[axis])?);
                    axis += 1;
                },
                Selector::NewAxis => elems.push(SliceInfoElem::NewAxis),
                Selector::Ellipsis => {
                    for _ in 0..(shape.len() - given) {
                        elems.push(full_slice(shape[axis]));
                        axis += 1;
                    }
                },
            }
        }
        while axis < shape.len() {
            elems.push(full_slice(shape[axis]));
            axis += 1;
        }
        Ok(elems)
    }
}

impl From<Selector> for Key {
    fn from(s: Selector) -> Self { Self(vec![s]) }
}

impl From<Vec<Selector>> for Key {
    fn from(selectors: Vec<Selector>) -> Self { Self(selectors) }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self { key.clone() }
}

macro_rules! impl_key_from {
    ($($t:ty),*) => {$(
        impl From<$t> for Key {
            fn from(t: $t) -> Self { Self(vec![Selector::from(t)]) }
        }
    )*};
}

impl_key_from!(
    isize, i32, usize,
    Range<isize>, Range<i32>, Range<usize>,
    RangeInclusive<isize>, RangeInclusive<i32>, RangeInclusive<usize>,
    RangeFrom<isize>, RangeFrom<i32>, RangeFrom<usize>,
    RangeTo<isize>, RangeTo<i32>, RangeTo<usize>,
    RangeToInclusive<isize>, RangeToInclusive<i32>, RangeToInclusive<usize>,
    RangeFull
);

fn full_slice(len: usize) -> SliceInfoElem {
    SliceInfoElem::Slice {start: 0, end: Some(len as isize), step: 1}
}

fn resolve_index(axis: usize, index: isize, len: usize) -> Result<isize, KeyError> {
    let resolved = if index < 0 { index + len as isize } else { index };
    if resolved < 0 || resolved >= len as isize {
        return Err(KeyError::OutOfBounds {axis, index, len});
    }
    Ok(resolved)
}

/// Clamp a Python-style slice to an axis of length `len` and express it the
/// way `ndarray` expects. For a negative step, `ndarray` walks the range
/// `start..end` backwards from its last element.
fn resolve_slice(
    axis: usize,
    start: Option<isize>,
    stop: Option<isize>,
    step: isize,
    len: usize,
) -> Result<SliceInfoElem, KeyError> {
    if step == 0 { return Err(KeyError::ZeroStep {axis}); }
    let len = len as isize;
    let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };
    let clamp = |bound: isize| {
        if bound < 0 { (bound + len).max(lower) } else { bound.min(upper) }
    };
    let start = start.map_or(if step < 0 { upper } else { lower }, clamp);
    let stop = stop.map_or(if step < 0 { lower } else { upper }, clamp);
    Ok(if step > 0 {
        SliceInfoElem::Slice {start, end: Some(stop.max(start)), step}
    } else if start > stop {
        SliceInfoElem::Slice {start: stop + 1, end: Some(start + 1), step}
    } else {
        SliceInfoElem::Slice {start: 0, end: Some(0), step: 1}
    })
}

// ----------------------------------------------------------------------------

/// Construct a [`Key`], with syntax like `ndarray`'s `s![]` but the meaning
/// of a Python slice.
///
/// Each comma-separated item is converted with [`Selector::from()`]. A range
/// may be followed by `;step`, which is applied with [`Stepped`]. Use
/// [`Selector::NewAxis`] and [`Selector::Ellipsis`] directly where needed.
///
/// A negative step walks from the start of the range down towards its end,
/// as in Python. `key![3..=1;-1]` selects positions 3, 2 and 1, and
/// `key![1..4;-1]` selects nothing. This differs from `s![1..4;-1]`, which
/// reverses the range `1..4`.
///
/// ```
/// use ndproperty::{key, Selector};
/// let k = key![1..;2, Selector::Ellipsis, -1];
/// assert_eq!(k.selectors(), [
///     Selector::Slice {start: Some(1), stop: None, step: 2},
///     Selector::Ellipsis,
///     Selector::Index(-1),
/// ]);
/// ```
#[macro_export]
macro_rules! key {
    (@push $v:ident;) => {};
    (@push $v:ident; $r:expr ; $step:expr , $($rest:tt)*) => {
        $v.push($crate::Stepped::stepped($r, $step as isize));
        $crate::key!(@push $v; $($rest)*);
    };
    (@push $v:ident; $r:expr ; $step:expr) => {
        $v.push($crate::Stepped::stepped($r, $step as isize));
    };
    (@push $v:ident; $r:expr , $($rest:tt)*) => {
        $v.push($crate::Selector::from($r));
        $crate::key!(@push $v; $($rest)*);
    };
    (@push $v:ident; $r:expr) => {
        $v.push($crate::Selector::from($r));
    };
    ($($t:tt)*) => {{
        #[allow(unused_mut)]
        let mut selectors: ::std::vec::Vec<$crate::Selector> = ::std::vec::Vec::new();
        $crate::key!(@push selectors; $($t)*);
        $crate::Key::new(selectors)
    }};
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use ndarray::{SliceInfoElem as E};
    use pretty_assertions::{assert_eq};

    use super::*;

    fn slice(start: isize, end: isize, step: isize) -> E {
        E::Slice {start, end: Some(end), step}
    }

    #[test]
    fn full_selection() {
        assert!(Key::full().is_full());
        assert!(Key::default().is_full());
        assert!(!key![..].is_full());
        assert!(!key![0].is_full());
        assert_eq!(Key::full().resolve(&[2, 3]).unwrap(), vec![slice(0, 2, 1), slice(0, 3, 1)]);
        assert_eq!(Key::full().resolve(&[]).unwrap(), vec![]);
    }

    #[test]
    fn negative_index() {
        assert_eq!(key![-1].resolve(&[4]).unwrap(), vec![E::Index(3)]);
        assert_eq!(key![-4].resolve(&[4]).unwrap(), vec![E::Index(0)]);
        assert_eq!(
            key![-5].resolve(&[4]),
            Err(KeyError::OutOfBounds {axis: 0, index: -5, len: 4}),
        );
        assert_eq!(
            key![0, 4].resolve(&[4, 4]),
            Err(KeyError::OutOfBounds {axis: 1, index: 4, len: 4}),
        );
    }

    #[test]
    fn slices_clamp() {
        assert_eq!(key![1..3].resolve(&[4]).unwrap(), vec![slice(1, 3, 1)]);
        assert_eq!(key![2..100].resolve(&[4]).unwrap(), vec![slice(2, 4, 1)]);
        assert_eq!(key![3..1].resolve(&[4]).unwrap(), vec![slice(3, 3, 1)]);
        assert_eq!(key![-2..].resolve(&[4]).unwrap(), vec![slice(2, 4, 1)]);
        assert_eq!(key![..-1].resolve(&[4]).unwrap(), vec![slice(0, 3, 1)]);
        assert_eq!(key![1..=2].resolve(&[4]).unwrap(), vec![slice(1, 3, 1)]);
    }

    #[test]
    fn negative_step() {
        // Python: list(range(5))[::-1] == [4, 3, 2, 1, 0]
        assert_eq!(key![..;-1].resolve(&[5]).unwrap(), vec![slice(0, 5, -1)]);
        // Python: list(range(5))[3:0:-2] == [3, 1]
        assert_eq!(key![3..0;-2].resolve(&[5]).unwrap(), vec![slice(1, 4, -2)]);
        // Python: list(range(5))[0:3:-1] == []
        assert_eq!(key![0..3;-1].resolve(&[5]).unwrap(), vec![slice(0, 0, 1)]);
        assert_eq!(key![..;0].resolve(&[5]), Err(KeyError::ZeroStep {axis: 0}));
    }

    #[test]
    fn inclusive_end_with_negative_step() {
        // Python: list(range(5))[3:0:-1] == [3, 2, 1]
        assert_eq!(key![3..=1;-1].resolve(&[5]).unwrap(), vec![slice(1, 4, -1)]);
        // Python: list(range(5))[3::-1] == [3, 2, 1, 0]
        assert_eq!(key![3..=0;-1].resolve(&[5]).unwrap(), vec![slice(0, 4, -1)]);
        // Python: list(range(5))[:-3:-1] == [4, 3]
        assert_eq!(key![..=-2;-1].resolve(&[5]).unwrap(), vec![slice(3, 5, -1)]);
        // Python: list(range(5))[1:4:-1] == []
        assert_eq!(key![1..4;-1].resolve(&[5]).unwrap(), vec![slice(0, 0, 1)]);
        // Positive steps are unaffected.
        assert_eq!(key![1..=3;2].resolve(&[5]).unwrap(), vec![slice(1, 4, 2)]);
        assert_eq!(key![..=-1;2].resolve(&[5]).unwrap(), vec![slice(0, 5, 2)]);
    }

    #[test]
    fn huge_bounds_saturate() {
        assert_eq!(Selector::from(usize::MAX), Selector::Index(isize::MAX));
        assert_eq!(
            key![usize::MAX].resolve(&[3]),
            Err(KeyError::OutOfBounds {axis: 0, index: isize::MAX, len: 3}),
        );
        assert_eq!(key![1..usize::MAX].resolve(&[3]).unwrap(), vec![slice(1, 3, 1)]);
        assert_eq!(key![..=isize::MAX].resolve(&[3]).unwrap(), vec![slice(0, 3, 1)]);
        assert_eq!(key![1..=usize::MAX].resolve(&[3]).unwrap(), vec![slice(1, 3, 1)]);
    }

    #[test]
    fn ellipsis_and_new_axis() {
        let k = Key::new(vec![Selector::Ellipsis, Selector::Index(0)]);
        assert_eq!(k.resolve(&[2, 3, 4]).unwrap(), vec![slice(0, 2, 1), slice(0, 3, 1), E::Index(0)]);
        let k = Key::new(vec![Selector::NewAxis, Selector::Index(1)]);
        assert_eq!(k.resolve(&[2, 3]).unwrap(), vec![E::NewAxis, E::Index(1), slice(0, 3, 1)]);
        let k = Key::new(vec![Selector::Ellipsis, Selector::Ellipsis]);
        assert_eq!(k.resolve(&[2]), Err(KeyError::MultipleEllipsis));
    }

    #[test]
    fn too_many_indices() {
        assert_eq!(key![0, 0].resolve(&[3]), Err(KeyError::TooManyIndices {ndim: 1, given: 2}));
        assert_eq!(key![0].resolve(&[]), Err(KeyError::TooManyIndices {ndim: 0, given: 1}));
    }
}
