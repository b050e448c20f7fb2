//! The adapter that lets [`ArrayView`]s take part in ufunc calls, as inputs
//! or as the output destination.
//!
//! Every call follows the same sequence. Each view among the inputs is
//! materialized. A view given as the output is materialized too, and the
//! ufunc's result is written into that copy. The copy is then written back
//! whole, through the view's setter. The storage behind a view is therefore
//! touched at most once per call, and not at all if the ufunc fails.

use std::borrow::{Cow};

use ndarray::{arr0, ArrayD, Axis, Zip};
use tracing::{debug, trace};

use super::{
    ArrayView, Comparison, Element, Error, Key, Method, Result, Ufunc,
    broadcast_pair, broadcast_to, patch, select,
};

/// An input to [`apply()`].
#[derive(Debug)]
pub enum Operand<'o, A> {
    View(&'o ArrayView<'o, A>),
    Array(&'o ArrayD<A>),
    Scalar(A),
}

impl<'o, A: Element> Operand<'o, A> {
    /// The concrete array this operand stands for. Views are read through
    /// their getter.
    pub fn materialize(&self) -> Result<Cow<'o, ArrayD<A>>> {
        Ok(match *self {
            Self::View(view) => Cow::Owned(view.materialize()?),
            Self::Array(array) => Cow::Borrowed(array),
            Self::Scalar(x) => Cow::Owned(arr0(x).into_dyn()),
        })
    }
}

impl<'o, A> From<&'o ArrayView<'o, A>> for Operand<'o, A> {
    fn from(view: &'o ArrayView<'o, A>) -> Self { Self::View(view) }
}

impl<'o, A> From<&'o ArrayD<A>> for Operand<'o, A> {
    fn from(array: &'o ArrayD<A>) -> Self { Self::Array(array) }
}

/// The output destination of [`apply()`].
#[derive(Debug)]
pub enum Out<'o, A> {
    /// Write the result back through the view's setter.
    View(&'o ArrayView<'o, A>),
    Array(&'o mut ArrayD<A>),
}

// ----------------------------------------------------------------------------

/// Apply `op` to `inputs` in the manner described by `method`.
///
/// If `out` is given, the result is broadcast into it, and the updated
/// output is returned. A view output is updated by calling its
/// [`assign()`] with the full selection. [`Method::At`] updates its first
/// input, which must be a view, and returns `None`.
///
/// ```
/// use std::cell::{RefCell};
/// use ndarray::{arr1};
/// use ndproperty::{apply, key, ArrayView, Method, Operand, Out, Ufunc};
///
/// let storage = RefCell::new(arr1(&[1.0, 2.0, 3.0, 4.0]).into_dyn());
/// let view = ArrayView::over(&storage);
/// let head = view.index(key![..2]);
/// let tail = view.index(key![2..]);
/// let sum = apply(
///     Ufunc::Add,
///     Method::Call,
///     &[Operand::View(&head), Operand::View(&tail)],
///     Some(Out::View(&tail)),
/// ).unwrap();
/// assert_eq!(sum, Some(arr1(&[4.0, 6.0]).into_dyn()));
/// assert_eq!(*storage.borrow(), arr1(&[1.0, 2.0, 4.0, 6.0]).into_dyn());
///
/// let total = apply(Ufunc::Add, Method::Reduce {axis: None}, &[Operand::View(&view)], None).unwrap();
/// assert_eq!(total, Some(ndarray::arr0(13.0).into_dyn()));
/// ```
///
/// [`assign()`]: ArrayView::assign()
pub fn apply<A: Element>(
    op: Ufunc,
    method: Method,
    inputs: &[Operand<'_, A>],
    out: Option<Out<'_, A>>,
) -> Result<Option<ArrayD<A>>> {
    trace!(ufunc = op.name(), method = method.name(), inputs = inputs.len(), "applying ufunc");
    match method {
        Method::At {key} => {
            if out.is_some() {
                return Err(Error::unsupported("at", "an output destination cannot be given"));
            }
            at(op, &key, inputs).map(|()| None)
        },
        method => evaluate(op, &method, inputs, out).map(Some),
    }
}

/// Apply `op` pointwise to `inputs`, with broadcasting.
///
/// ```
/// use std::cell::{RefCell};
/// use ndarray::{arr1};
/// use ndproperty::{call, ArrayView, Operand, Ufunc};
///
/// let storage = RefCell::new(arr1(&[1.0, 4.0, 9.0]).into_dyn());
/// let view = ArrayView::over(&storage);
/// let roots = call(Ufunc::Sqrt, &[Operand::View(&view)]).unwrap();
/// assert_eq!(roots, arr1(&[1.0, 2.0, 3.0]).into_dyn());
/// ```
pub fn call<A: Element>(op: Ufunc, inputs: &[Operand<'_, A>]) -> Result<ArrayD<A>> {
    evaluate(op, &Method::Call, inputs, None)
}

/// Compare `lhs` with `rhs` pointwise, with broadcasting.
///
/// ```
/// use std::cell::{RefCell};
/// use ndarray::{arr1};
/// use ndproperty::{compare, ArrayView, Comparison, Operand};
///
/// let storage = RefCell::new(arr1(&[1.0, 5.0, 3.0]).into_dyn());
/// let view = ArrayView::over(&storage);
/// let big = compare(Comparison::Greater, Operand::View(&view), Operand::Scalar(2.0)).unwrap();
/// assert_eq!(big, arr1(&[false, true, true]).into_dyn());
/// ```
pub fn compare<A: Element>(
    cmp: Comparison,
    lhs: Operand<'_, A>,
    rhs: Operand<'_, A>,
) -> Result<ArrayD<bool>> {
    let lhs = lhs.materialize()?;
    let rhs = rhs.materialize()?;
    let (lhs, rhs) = broadcast_pair(&lhs, &rhs)?;
    Ok(Zip::from(&lhs).and(&rhs).map_collect(|&x, &y| cmp.call(x, y)))
}

// ----------------------------------------------------------------------------

/// Everything except `Method::At`.
pub(crate) fn evaluate<A: Element>(
    op: Ufunc,
    method: &Method,
    inputs: &[Operand<'_, A>],
    out: Option<Out<'_, A>>,
) -> Result<ArrayD<A>> {
    let arrays = inputs.iter().map(Operand::materialize).collect::<Result<Vec<_>>>()?;
    match out {
        None => execute(op, method, &arrays),
        Some(Out::Array(array)) => {
            let result = execute(op, method, &arrays)?;
            patch(array, &result, &Key::full())?;
            Ok(array.clone())
        },
        Some(Out::View(view)) => {
            let mut buffer = view.materialize()?;
            let result = execute(op, method, &arrays)?;
            patch(&mut buffer, &result, &Key::full())?;
            debug!(ufunc = op.name(), shape = ?buffer.shape(), "writing ufunc result back through output view");
            view.assign(Key::full(), buffer.clone())?;
            Ok(buffer)
        },
    }
}

fn at<A: Element>(op: Ufunc, key: &Key, inputs: &[Operand<'_, A>]) -> Result<()> {
    let target = match inputs.first() {
        Some(Operand::View(view)) => *view,
        _ => return Err(Error::unsupported("at", "the first operand must be an ArrayView")),
    };
    expect_operands(op, op.nin(), inputs.len())?;
    let mut array = target.materialize()?;
    let region = select(array.clone(), key)?;
    let mut args = vec![Cow::Owned(region)];
    for operand in &inputs[1..] { args.push(operand.materialize()?); }
    let updated = execute(op, &Method::Call, &args)?;
    patch(&mut array, &updated, key)?;
    debug!(ufunc = op.name(), ?key, "writing in-place update back through target view");
    target.assign(Key::full(), array)
}

fn execute<A: Element>(op: Ufunc, method: &Method, arrays: &[Cow<'_, ArrayD<A>>]) -> Result<ArrayD<A>> {
    match method {
        Method::Call => {
            expect_operands(op, op.nin(), arrays.len())?;
            match arrays {
                [x] => Ok(x.mapv(|x| op.unary(x))),
                [x, y] => {
                    let (x, y) = broadcast_pair(x, y)?;
                    Ok(Zip::from(&x).and(&y).map_collect(|&x, &y| op.binary(x, y)))
                },
                _ => Err(Error::Arity {op: op.name(), expected: op.nin(), given: arrays.len()}),
            }
        },
        Method::Reduce {axis} => {
            expect_binary(op, method)?;
            expect_operands(op, 1, arrays.len())?;
            reduce(op, &arrays[0], *axis)
        },
        Method::Accumulate {axis} => {
            expect_binary(op, method)?;
            expect_operands(op, 1, arrays.len())?;
            accumulate(op, &arrays[0], *axis)
        },
        Method::Outer => {
            expect_binary(op, method)?;
            expect_operands(op, 2, arrays.len())?;
            outer(op, &arrays[0], &arrays[1])
        },
        Method::At {..} => Err(Error::unsupported("at", "cannot be combined with other methods")),
    }
}

fn expect_operands(op: Ufunc, expected: usize, given: usize) -> Result<()> {
    if expected != given {
        return Err(Error::Arity {op: op.name(), expected, given});
    }
    Ok(())
}

fn expect_binary(op: Ufunc, method: &Method) -> Result<()> {
    if op.nin() != 2 {
        return Err(Error::unsupported(
            method.name(),
            format!("only binary ufuncs can be used, and `{}` is unary", op.name()),
        ));
    }
    Ok(())
}

fn check_axis(axis: usize, ndim: usize) -> Result<()> {
    if axis >= ndim { return Err(Error::AxisOutOfBounds {axis, ndim}); }
    Ok(())
}

fn fold_lane<'x, A: Element>(op: Ufunc, lane: impl Iterator<Item=&'x A>) -> Option<A> {
    lane.copied().reduce(|x, y| op.binary(x, y)).or_else(|| op.identity())
}

fn no_identity(op: Ufunc) -> Error {
    Error::unsupported(
        "reduce",
        format!("zero-size array to reduction operation `{}` which has no identity", op.name()),
    )
}

fn reduce<A: Element>(op: Ufunc, array: &ArrayD<A>, axis: Option<usize>) -> Result<ArrayD<A>> {
    let Some(axis) = axis else {
        let value = fold_lane(op, array.iter()).ok_or_else(|| no_identity(op))?;
        return Ok(arr0(value).into_dyn());
    };
    check_axis(axis, array.ndim())?;
    let folded = array.map_axis(Axis(axis), |lane| fold_lane(op, lane.iter()));
    let values = folded.iter().copied().collect::<Option<Vec<A>>>().ok_or_else(|| no_identity(op))?;
    Ok(ArrayD::from_shape_vec(folded.raw_dim(), values)?)
}

fn accumulate<A: Element>(op: Ufunc, array: &ArrayD<A>, axis: usize) -> Result<ArrayD<A>> {
    check_axis(axis, array.ndim())?;
    let mut result = array.clone();
    for mut lane in result.lanes_mut(Axis(axis)) {
        let mut running: Option<A> = None;
        for x in lane.iter_mut() {
            let next = match running {
                Some(acc) => op.binary(acc, *x),
                None => *x,
            };
            *x = next;
            running = Some(next);
        }
    }
    Ok(result)
}

fn outer<A: Element>(op: Ufunc, lhs: &ArrayD<A>, rhs: &ArrayD<A>) -> Result<ArrayD<A>> {
    let shape: Vec<usize> = lhs.shape().iter().chain(rhs.shape()).copied().collect();
    let mut lhs = lhs.view();
    for _ in 0..rhs.ndim() { lhs.insert_axis_inplace(Axis(lhs.ndim())); }
    let x = broadcast_to(&lhs, &shape)?;
    let y = broadcast_to(rhs, &shape)?;
    Ok(Zip::from(&x).and(&y).map_collect(|&x, &y| op.binary(x, y)))
}
