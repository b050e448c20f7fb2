use ndarray::{ArrayBase, ArrayD, ArrayViewD, Data, IxDyn};

use super::{Error, Result};

/// Returns the shape that results from broadcasting `lhs` with `rhs`.
///
/// The shapes are aligned at their last axis. Each pair of aligned axes must
/// be the same length, or one of them must be `1`, in which case its sole
/// element is replicated to fill out the other. Missing leading axes behave
/// like axes of length `1`.
///
/// ```
/// use ndproperty::broadcast_shape;
/// assert_eq!(broadcast_shape(&[4, 1, 3], &[2, 1]).unwrap(), [4, 2, 3]);
/// assert_eq!(broadcast_shape(&[], &[5]).unwrap(), [5]);
/// assert!(broadcast_shape(&[3], &[4]).is_err());
/// ```
pub fn broadcast_shape(lhs: &[usize], rhs: &[usize]) -> Result<Vec<usize>> {
    let ndim = lhs.len().max(rhs.len());
    let axis = |shape: &[usize], i: usize| {
        (i + shape.len()).checked_sub(ndim).map_or(1, |j| shape[j])
    };
    (0..ndim).map(|i| {
        match (axis(lhs, i), axis(rhs, i)) {
            (l, r) if l == r => Ok(l),
            (1, r) => Ok(r),
            (l, 1) => Ok(l),
            _ => Err(Error::ShapeMismatch {lhs: lhs.to_vec(), rhs: rhs.to_vec()}),
        }
    }).collect()
}

/// Broadcast `array` to exactly `shape`, or explain why not.
pub fn broadcast_to<'v, A, S: Data<Elem=A>>(
    array: &'v ArrayBase<S, IxDyn>,
    shape: &[usize],
) -> Result<ArrayViewD<'v, A>> {
    array.broadcast(shape).ok_or_else(|| Error::Broadcast {
        from: array.shape().to_vec(),
        to: shape.to_vec(),
    })
}

/// Broadcast `lhs` and `rhs` against each other.
pub fn broadcast_pair<'v, A>(
    lhs: &'v ArrayD<A>,
    rhs: &'v ArrayD<A>,
) -> Result<(ArrayViewD<'v, A>, ArrayViewD<'v, A>)> {
    let shape = broadcast_shape(lhs.shape(), rhs.shape())?;
    Ok((broadcast_to(lhs, &shape)?, broadcast_to(rhs, &shape)?))
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, arr2};

    use super::*;

    #[test]
    fn shapes() {
        assert_eq!(broadcast_shape(&[3], &[3]).unwrap(), vec![3]);
        assert_eq!(broadcast_shape(&[2, 1], &[1, 3]).unwrap(), vec![2, 3]);
        assert_eq!(broadcast_shape(&[], &[]).unwrap(), Vec::<usize>::new());
        assert_eq!(broadcast_shape(&[0], &[1]).unwrap(), vec![0]);
        match broadcast_shape(&[2, 3], &[2]) {
            Err(Error::ShapeMismatch {lhs, rhs}) => {
                assert_eq!(lhs, vec![2, 3]);
                assert_eq!(rhs, vec![2]);
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn pair() {
        let a = arr2(&[[1.0], [2.0]]).into_dyn();
        let b = arr1(&[10.0, 20.0, 30.0]).into_dyn();
        let (x, y) = broadcast_pair(&a, &b).unwrap();
        assert_eq!(x.shape(), [2, 3]);
        assert_eq!(y.shape(), [2, 3]);
        assert_eq!(x[[1, 2]], 2.0);
        assert_eq!(y[[1, 2]], 30.0);
    }

    #[test]
    fn pair_mismatch_names_both_operands() {
        let a = arr1(&[1.0, 2.0, 3.0]).into_dyn();
        let b = arr1(&[1.0, 2.0, 3.0, 4.0]).into_dyn();
        let e = broadcast_pair(&a, &b).unwrap_err();
        assert_eq!(e.to_string(), "operands could not be broadcast together with shapes [3] [4]");
        let e = broadcast_to(&a, &[4]).unwrap_err();
        assert_eq!(e.to_string(), "could not broadcast array from shape [3] into shape [4]");
    }
}
