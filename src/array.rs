//! Functions on concrete arrays that underlie every read and write made
//! through an [`ArrayView`].
//!
//! [`ArrayView`]: super::ArrayView

use ndarray::{ArrayD};

use super::{Key, Result, broadcast_to};

/// Returns the region of `array` addressed by `key`, as a new array.
///
/// The full selection returns `array` itself, without copying.
///
/// ```
/// use ndarray::{arr1, arr2};
/// use ndproperty::{key, select};
/// let a = arr2(&[[1, 2, 3], [4, 5, 6]]).into_dyn();
/// assert_eq!(select(a.clone(), &key![1]).unwrap(), arr1(&[4, 5, 6]).into_dyn());
/// assert_eq!(select(a.clone(), &key![.., 1..]).unwrap(), arr2(&[[2, 3], [5, 6]]).into_dyn());
/// assert!(select(a, &key![2]).is_err());
/// ```
pub fn select<A: Clone>(array: ArrayD<A>, key: &Key) -> Result<ArrayD<A>> {
    if key.is_full() { return Ok(array); }
    let elems = key.resolve(array.shape())?;
    Ok(array.slice(elems.as_slice()).to_owned())
}

/// Overwrite the region of `array` addressed by `key` with `values`.
///
/// `values` must be broadcastable to the shape of the region. If it is not,
/// `array` is left unchanged.
///
/// ```
/// use ndarray::{arr0, arr1};
/// use ndproperty::{key, patch};
/// let mut a = arr1(&[0.0; 4]).into_dyn();
/// patch(&mut a, &arr1(&[5.0, 6.0]).into_dyn(), &key![1..3]).unwrap();
/// patch(&mut a, &arr0(9.0).into_dyn(), &key![-1]).unwrap();
/// assert_eq!(a, arr1(&[0.0, 5.0, 6.0, 9.0]).into_dyn());
/// assert!(patch(&mut a, &arr1(&[1.0, 2.0, 3.0]).into_dyn(), &key![..2]).is_err());
/// ```
pub fn patch<A: Clone>(array: &mut ArrayD<A>, values: &ArrayD<A>, key: &Key) -> Result<()> {
    let elems = key.resolve(array.shape())?;
    let mut region = array.slice_mut(elems.as_slice());
    let source = broadcast_to(values, region.shape())?;
    region.assign(&source);
    Ok(())
}

/// Returns a copy of `array` with the elements at `key` replaced by
/// `values`.
///
/// This is the primitive behind every nested write: the caller keeps
/// `array`, and owns the result.
///
/// ```
/// use ndarray::{arr1};
/// use ndproperty::{key, replace};
/// let a = arr1(&[1, 2, 3, 4]).into_dyn();
/// let b = replace(&a, &arr1(&[0]).into_dyn(), &key![1..;2]).unwrap();
/// assert_eq!(a, arr1(&[1, 2, 3, 4]).into_dyn());
/// assert_eq!(b, arr1(&[1, 0, 3, 0]).into_dyn());
/// ```
pub fn replace<A: Clone>(array: &ArrayD<A>, values: &ArrayD<A>, key: &Key) -> Result<ArrayD<A>> {
    let mut result = array.clone();
    patch(&mut result, values, key)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use ndarray::{arr0, arr1, arr2};
    use pretty_assertions::{assert_eq};

    use crate::{key, Error, Selector};
    use super::*;

    #[test]
    fn select_index_gives_zero_dimensional() {
        let a = arr1(&[1.0, 2.0, 3.0]).into_dyn();
        let x = select(a, &key![-1]).unwrap();
        assert_eq!(x.ndim(), 0);
        assert_eq!(x, arr0(3.0).into_dyn());
    }

    #[test]
    fn select_new_axis() {
        let a = arr1(&[1, 2]).into_dyn();
        let b = select(a, &Key::new(vec![Selector::NewAxis])).unwrap();
        assert_eq!(b.shape(), [1, 2]);
    }

    #[test]
    fn patch_broadcasts_rows() {
        let mut a = arr2(&[[0, 0, 0], [0, 0, 0]]).into_dyn();
        patch(&mut a, &arr1(&[1, 2, 3]).into_dyn(), &Key::full()).unwrap();
        assert_eq!(a, arr2(&[[1, 2, 3], [1, 2, 3]]).into_dyn());
        patch(&mut a, &arr0(7).into_dyn(), &key![.., 0]).unwrap();
        assert_eq!(a, arr2(&[[7, 2, 3], [7, 2, 3]]).into_dyn());
    }

    #[test]
    fn patch_rejects_bad_shape_without_writing() {
        let mut a = arr1(&[1, 2, 3]).into_dyn();
        match patch(&mut a, &arr1(&[9, 9]).into_dyn(), &Key::full()) {
            Err(Error::Broadcast {from, to}) => {
                assert_eq!(from, vec![2]);
                assert_eq!(to, vec![3]);
            },
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(a, arr1(&[1, 2, 3]).into_dyn());
    }

    #[test]
    fn replace_reversed_slice() {
        let a = arr1(&[1, 2, 3, 4]).into_dyn();
        let b = replace(&a, &arr1(&[10, 20, 30, 40]).into_dyn(), &key![..;-1]).unwrap();
        assert_eq!(b, arr1(&[40, 30, 20, 10]).into_dyn());
    }
}
