use std::cell::{RefCell};
use std::fmt::{self, Debug, Display};
use std::rc::{Rc};

use ndarray::{arr0, ArrayD};
use num_traits::{AsPrimitive};
use tracing::{debug, trace};

use super::{
    DType, Element, Error, Key, Method, Operand, Out, Result, Ufunc,
    apply, call, patch, replace, select,
};
use super::ufunc::{evaluate};

/// Reads the region of a virtual array addressed by a [`Key`].
type Getter<'a, A> = dyn Fn(&Key) -> Result<ArrayD<A>> + 'a;

/// Overwrites the region of a virtual array addressed by a [`Key`].
type Setter<'a, A> = dyn Fn(&Key, ArrayD<A>) -> Result<()> + 'a;

/// An array that owns no data, but reads and writes it through a getter and
/// a setter.
///
/// Every read calls the getter afresh; nothing is cached. Indexing an
/// `ArrayView` with [`index()`] gives a narrower `ArrayView`. Writes through
/// the narrower view read the parent's region, patch it, and write it back
/// whole through the parent's setter, so the root setter only ever sees
/// keys it was written to understand.
///
/// ```
/// use std::cell::{RefCell};
/// use ndarray::{arr1};
/// use ndproperty::{key, ArrayView};
///
/// let storage = RefCell::new(arr1(&[0.0; 4]).into_dyn());
/// let view = ArrayView::over(&storage);
/// view.index(key![0..2]).index(key![1]).fill(9.0).unwrap();
/// assert_eq!(*storage.borrow(), arr1(&[0.0, 9.0, 0.0, 0.0]).into_dyn());
/// ```
///
/// Two views over the same storage are not coordinated in any way. Writing
/// through one while a computation involving the other is in progress is
/// the caller's responsibility.
///
/// ### Arithmetic
///
/// The standard operators `+`, `-`, `*`, `/`, `%` and unary `-` are
/// implemented for `&ArrayView`, with a right-hand side that is another
/// `&ArrayView` or an `&ArrayD`. They materialize their operands and return
/// a concrete array, or the first error encountered.
///
/// ```
/// use std::cell::{RefCell};
/// use ndarray::{arr1};
/// use ndproperty::{key, ArrayView};
///
/// let storage = RefCell::new(arr1(&[1.0, 2.0, 3.0]).into_dyn());
/// let view = ArrayView::over(&storage);
/// let doubled = (&view + &view).unwrap();
/// assert_eq!(doubled, arr1(&[2.0, 4.0, 6.0]).into_dyn());
/// assert!((&view + &view.index(key![..2])).is_err());
/// ```
///
/// [`index()`]: Self::index()
pub struct ArrayView<'a, A> {
    getter: Rc<Getter<'a, A>>,
    setter: Rc<Setter<'a, A>>,
}

impl<'a, A> Clone for ArrayView<'a, A> {
    fn clone(&self) -> Self {
        Self {getter: Rc::clone(&self.getter), setter: Rc::clone(&self.setter)}
    }
}

impl<'a, A: Clone + 'a> ArrayView<'a, A> {
    /// Wrap a getter and a setter.
    ///
    /// `getter(key)` must return the region addressed by `key`.
    /// `setter(key, value)` must overwrite that region with `value`, which
    /// may need broadcasting.
    pub fn new(
        getter: impl Fn(&Key) -> Result<ArrayD<A>> + 'a,
        setter: impl Fn(&Key, ArrayD<A>) -> Result<()> + 'a,
    ) -> Self {
        trace!("creating array view");
        Self {getter: Rc::new(getter), setter: Rc::new(setter)}
    }

    /// Wrap a getter. Every write fails with [`Error::ReadOnly`].
    pub fn read_only(
        name: &'static str,
        getter: impl Fn(&Key) -> Result<ArrayD<A>> + 'a,
    ) -> Self {
        Self::new(getter, move |_, _| Err(Error::ReadOnly {name}))
    }

    /// Read and write `storage` directly.
    ///
    /// The `RefCell` is borrowed only for the duration of each read or
    /// write. A borrow conflict is reported as [`Error::Storage`].
    pub fn over(storage: &'a RefCell<ArrayD<A>>) -> Self {
        Self::new(
            move |key| {
                let array = storage.try_borrow().map_err(Error::storage)?;
                select(array.clone(), key)
            },
            move |key, value| {
                let mut array = storage.try_borrow_mut().map_err(Error::storage)?;
                patch(&mut array, &value, key)
            },
        )
    }

    /// Read the whole array.
    pub fn materialize(&self) -> Result<ArrayD<A>> {
        trace!("materializing array view");
        (*self.getter)(&Key::full())
    }

    /// Read the whole array, converting every element to `B`.
    ///
    /// ```
    /// use std::cell::{RefCell};
    /// use ndarray::{arr1};
    /// use ndproperty::{ArrayView};
    ///
    /// let storage = RefCell::new(arr1(&[1.5f64, 2.0]).into_dyn());
    /// let narrow = ArrayView::over(&storage).materialize_as::<f32>().unwrap();
    /// assert_eq!(narrow, arr1(&[1.5f32, 2.0]).into_dyn());
    /// ```
    pub fn materialize_as<B>(&self) -> Result<ArrayD<B>> where
        A: AsPrimitive<B>,
        B: 'static + Copy,
    {
        Ok(self.materialize()?.mapv(|x| x.as_()))
    }

    /// Returns a view of the region of `self` addressed by `key`.
    ///
    /// No data is read until the new view is used.
    pub fn index(&self, key: impl Into<Key>) -> Self {
        let outer: Key = key.into();
        trace!(key = ?outer, "indexing array view");
        let getter = {
            let getter = Rc::clone(&self.getter);
            let outer = outer.clone();
            move |inner: &Key| select((*getter)(&outer)?, inner)
        };
        let setter = {
            let getter = Rc::clone(&self.getter);
            let setter = Rc::clone(&self.setter);
            move |inner: &Key, value: ArrayD<A>| {
                let current = (*getter)(&outer)?;
                debug!(outer = ?outer, inner = ?inner, "patching region of parent view");
                (*setter)(&outer, replace(&current, &value, inner)?)
            }
        };
        Self {getter: Rc::new(getter), setter: Rc::new(setter)}
    }

    /// Overwrite the region addressed by `key` with `value`, which is
    /// broadcast as needed.
    ///
    /// The setter is called exactly once, and not at all if `value` is
    /// rejected before it gets that far.
    pub fn assign(&self, key: impl Into<Key>, value: ArrayD<A>) -> Result<()> {
        let key = key.into();
        trace!(key = ?key, shape = ?value.shape(), "assigning through array view");
        (*self.setter)(&key, value)
    }

    /// Set every element to `value`.
    pub fn fill(&self, value: A) -> Result<()> {
        self.assign(Key::full(), arr0(value).into_dyn())
    }
}

// ----------------------------------------------------------------------------

impl<'a, A: Element> ArrayView<'a, A> {
    /// Replace `self` with `self op rhs`, e.g. `self += rhs` for
    /// [`Ufunc::Add`].
    ///
    /// ```
    /// use std::cell::{RefCell};
    /// use ndarray::{arr1};
    /// use ndproperty::{key, ArrayView, Operand, Ufunc};
    ///
    /// let storage = RefCell::new(arr1(&[1.0, 2.0, 3.0]).into_dyn());
    /// let view = ArrayView::over(&storage);
    /// view.index(key![1..]).update(Ufunc::Multiply, Operand::Scalar(10.0)).unwrap();
    /// assert_eq!(*storage.borrow(), arr1(&[1.0, 20.0, 30.0]).into_dyn());
    /// ```
    pub fn update(&self, op: Ufunc, rhs: Operand<'_, A>) -> Result<()> {
        apply(op, Method::Call, &[Operand::View(self), rhs], Some(Out::View(self)))?;
        Ok(())
    }

    pub fn shape(&self) -> Result<Vec<usize>> {
        Ok(self.materialize()?.shape().to_vec())
    }

    pub fn ndim(&self) -> Result<usize> {
        Ok(self.materialize()?.ndim())
    }

    /// The total number of elements.
    pub fn size(&self) -> Result<usize> {
        Ok(self.materialize()?.len())
    }

    /// The length of the first axis.
    pub fn len(&self) -> Result<usize> {
        match self.materialize()?.shape().first() {
            Some(&len) => Ok(len),
            None => Err(Error::unsupported("len", "len() of unsized object")),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn dtype(&self) -> DType { A::DTYPE }

    /// The elements in logical order, i.e. with the last index varying
    /// fastest.
    pub fn to_vec(&self) -> Result<Vec<A>> {
        Ok(self.materialize()?.iter().copied().collect())
    }

    /// A view of each position along the first axis.
    ///
    /// ```
    /// use std::cell::{RefCell};
    /// use ndarray::{arr1, arr2};
    /// use ndproperty::{ArrayView};
    ///
    /// let storage = RefCell::new(arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn());
    /// let view = ArrayView::over(&storage);
    /// for row in view.outer_views().unwrap() {
    ///     row.index(0).fill(0.0).unwrap();
    /// }
    /// assert_eq!(*storage.borrow(), arr2(&[[0.0, 2.0], [0.0, 4.0]]).into_dyn());
    /// assert_eq!(view.outer_views().unwrap()[1].materialize().unwrap(), arr1(&[0.0, 4.0]).into_dyn());
    /// ```
    pub fn outer_views(&self) -> Result<Vec<Self>> {
        Ok((0..self.len()?).map(|i| self.index(i)).collect())
    }

    /// Returns `true` if `self` and `other` have the same shape and
    /// elements.
    pub fn equals(&self, other: Operand<'_, A>) -> Result<bool> {
        Ok(self.materialize()? == *other.materialize()?)
    }

    /// The transpose, with the order of the axes reversed.
    pub fn t(&self) -> Result<ArrayD<A>> {
        Ok(self.materialize()?.reversed_axes())
    }

    /// Add up the elements along `axis`, or all of them if `None`.
    pub fn sum(&self, axis: Option<usize>) -> Result<ArrayD<A>> { self.reduce(Ufunc::Add, axis) }

    pub fn prod(&self, axis: Option<usize>) -> Result<ArrayD<A>> { self.reduce(Ufunc::Multiply, axis) }

    /// The largest element along `axis`. Fails on an empty array.
    pub fn max(&self, axis: Option<usize>) -> Result<ArrayD<A>> { self.reduce(Ufunc::Maximum, axis) }

    /// The smallest element along `axis`. Fails on an empty array.
    pub fn min(&self, axis: Option<usize>) -> Result<ArrayD<A>> { self.reduce(Ufunc::Minimum, axis) }

    /// The arithmetic mean along `axis`, or of every element if `None`.
    ///
    /// ```
    /// use std::cell::{RefCell};
    /// use ndarray::{arr0, arr1, arr2};
    /// use ndproperty::{ArrayView};
    ///
    /// let storage = RefCell::new(arr2(&[[1.0, 2.0], [3.0, 6.0]]).into_dyn());
    /// let view = ArrayView::over(&storage);
    /// assert_eq!(view.mean(None).unwrap(), arr0(3.0).into_dyn());
    /// assert_eq!(view.mean(Some(1)).unwrap(), arr1(&[1.5, 4.5]).into_dyn());
    /// ```
    pub fn mean(&self, axis: Option<usize>) -> Result<ArrayD<A>> {
        let array = self.materialize()?;
        let total = evaluate(Ufunc::Add, &Method::Reduce {axis}, &[Operand::Array(&array)], None)?;
        let count = match axis {
            Some(axis) => array.shape()[axis],
            None => array.len(),
        };
        let count = A::from_count(count);
        Ok(total.mapv(|x| x / count))
    }

    fn reduce(&self, op: Ufunc, axis: Option<usize>) -> Result<ArrayD<A>> {
        evaluate(op, &Method::Reduce {axis}, &[Operand::View(self)], None)
    }

    /// The text that [`Display`] would produce for the materialized array.
    pub fn repr(&self) -> Result<String> {
        Ok(self.materialize()?.to_string())
    }

    /// A concrete copy of the array.
    pub fn copy(&self) -> Result<ArrayD<A>> { self.materialize() }

    /// Same as [`copy()`], since elements own no data.
    ///
    /// [`copy()`]: Self::copy()
    pub fn deep_copy(&self) -> Result<ArrayD<A>> { self.copy() }
}

impl<'a, A: Debug> Debug for ArrayView<'a, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (*self.getter)(&Key::full()) {
            Ok(array) => Debug::fmt(&array, f),
            Err(e) => write!(f, "<unreadable array view: {}>", e),
        }
    }
}

impl<'a, A: Display> Display for ArrayView<'a, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (*self.getter)(&Key::full()) {
            Ok(array) => Display::fmt(&array, f),
            Err(e) => write!(f, "<unreadable array view: {}>", e),
        }
    }
}

// ----------------------------------------------------------------------------

/// Implement one of the [`std::ops`] traits for `&ArrayView`, with an
/// `&ArrayView` or an `&ArrayD` on the right.
macro_rules! impl_op_for_view {
    ($op:ident { $method:ident } => $ufunc:ident) => {
        impl<'a, 'b, 'c, A: Element> std::ops::$op<&'c ArrayView<'b, A>> for &ArrayView<'a, A> {
            type Output = Result<ArrayD<A>>;
            fn $method(self, other: &'c ArrayView<'b, A>) -> Self::Output {
                call(Ufunc::$ufunc, &[Operand::View(self), Operand::View(other)])
            }
        }

        impl<'a, 'c, A: Element> std::ops::$op<&'c ArrayD<A>> for &ArrayView<'a, A> {
            type Output = Result<ArrayD<A>>;
            fn $method(self, other: &'c ArrayD<A>) -> Self::Output {
                call(Ufunc::$ufunc, &[Operand::View(self), Operand::Array(other)])
            }
        }
    };
}

impl_op_for_view! { Add { add } => Add }
impl_op_for_view! { Sub { sub } => Subtract }
impl_op_for_view! { Mul { mul } => Multiply }
impl_op_for_view! { Div { div } => Divide }
impl_op_for_view! { Rem { rem } => Remainder }

impl<'a, A: Element> std::ops::Neg for &ArrayView<'a, A> {
    type Output = Result<ArrayD<A>>;
    fn neg(self) -> Self::Output { call(Ufunc::Negative, &[Operand::View(self)]) }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::{Cell};

    use ndarray::{arr1, arr2};
    use pretty_assertions::{assert_eq};
    use proptest::prelude::*;

    use crate::{key, KeyError, Selector};
    use super::*;

    /// A view over `storage` built from explicit closures, counting setter
    /// calls in `writes`.
    fn counted<'a>(storage: &'a RefCell<ArrayD<f64>>, writes: &'a Cell<usize>) -> ArrayView<'a, f64> {
        ArrayView::new(
            move |key| select(storage.borrow().clone(), key),
            move |key, value| {
                writes.set(writes.get() + 1);
                patch(&mut storage.borrow_mut(), &value, key)
            },
        )
    }

    #[test]
    fn top_level_write() {
        let storage = RefCell::new(ArrayD::zeros(vec![4]));
        let writes = Cell::new(0);
        let view = counted(&storage, &writes);
        view.assign(key![1..3], arr1(&[5.0, 6.0]).into_dyn()).unwrap();
        assert_eq!(view.materialize().unwrap(), arr1(&[0.0, 5.0, 6.0, 0.0]).into_dyn());
        assert_eq!(writes.get(), 1);
    }

    #[test]
    fn nested_write() {
        let storage = RefCell::new(arr1(&[1.0, 2.0, 3.0, 4.0]).into_dyn());
        let writes = Cell::new(0);
        let view = counted(&storage, &writes);
        view.index(key![0..2]).assign(key![1], arr0(9.0).into_dyn()).unwrap();
        assert_eq!(*storage.borrow(), arr1(&[1.0, 9.0, 3.0, 4.0]).into_dyn());
        assert_eq!(writes.get(), 1);

        view.index(key![1..]).index(key![..;2]).fill(0.0).unwrap();
        assert_eq!(*storage.borrow(), arr1(&[1.0, 0.0, 3.0, 0.0]).into_dyn());
        assert_eq!(writes.get(), 2);
    }

    #[test]
    fn out_view_aliasing_input() {
        let storage = RefCell::new(arr1(&[1.0, 2.0, 3.0, 4.0, 5.0]).into_dyn());
        let view = ArrayView::over(&storage);
        let first = view.index(key![..2]);
        let second = view.index(key![2..4]);
        let target = view.index(key![..2]);
        let result = apply(
            Ufunc::Add, Method::Call,
            &[Operand::View(&first), Operand::View(&second)],
            Some(Out::View(&target)),
        ).unwrap();
        assert_eq!(result, Some(arr1(&[4.0, 6.0]).into_dyn()));
        assert_eq!(target.materialize().unwrap(), arr1(&[4.0, 6.0]).into_dyn());
        assert_eq!(*storage.borrow(), arr1(&[4.0, 6.0, 3.0, 4.0, 5.0]).into_dyn());
    }

    #[test]
    fn read_only_fails_on_write() {
        let data = arr1(&[1.0, 2.0]).into_dyn();
        let view = ArrayView::read_only("field", |key| select(data.clone(), key));
        assert_eq!(view.materialize().unwrap(), data);
        assert!(matches!(view.fill(0.0), Err(Error::ReadOnly {name: "field"})));
        assert!(matches!(view.index(key![0]).fill(0.0), Err(Error::ReadOnly {name: "field"})));
    }

    #[test]
    fn errors_propagate() {
        let storage = RefCell::new(arr1(&[1.0, 2.0, 3.0]).into_dyn());
        let view = ArrayView::over(&storage);
        assert!(matches!(
            view.index(key![3]).materialize(),
            Err(Error::Key(KeyError::OutOfBounds {axis: 0, index: 3, len: 3})),
        ));
        assert!(matches!(
            view.index(key![usize::MAX]).materialize(),
            Err(Error::Key(KeyError::OutOfBounds {axis: 0, index: isize::MAX, len: 3})),
        ));
        assert!(matches!(
            view.index(key![..2]).assign(Key::full(), arr1(&[1.0, 2.0, 3.0]).into_dyn()),
            Err(Error::Broadcast {..}),
        ));
        assert_eq!(*storage.borrow(), arr1(&[1.0, 2.0, 3.0]).into_dyn());
        let _guard = storage.borrow_mut();
        assert!(matches!(view.materialize(), Err(Error::Storage(_))));
    }

    #[test]
    fn substitutability() {
        let storage = RefCell::new(arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).into_dyn());
        let view = ArrayView::over(&storage);
        let array = view.materialize().unwrap();
        assert_eq!(view.len().unwrap(), array.shape()[0]);
        assert_eq!(view.repr().unwrap(), format!("{}", array));
        assert_eq!(format!("{:?}", view), format!("{:?}", array));
        assert_eq!(view.copy().unwrap(), array);
        assert_eq!(view.deep_copy().unwrap(), array);
        assert_eq!(view.shape().unwrap(), vec![2, 3]);
        assert_eq!(view.ndim().unwrap(), 2);
        assert_eq!(view.size().unwrap(), 6);
        assert_eq!(view.dtype(), DType::Float64);
        assert_eq!(view.to_vec().unwrap(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(view.t().unwrap(), arr2(&[[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]).into_dyn());
        assert!(view.equals(Operand::Array(&array)).unwrap());
        assert!(!view.equals(Operand::View(&view.index(key![0]))).unwrap());
    }

    #[test]
    fn len_of_scalar_fails() {
        let storage = RefCell::new(arr0(1.0).into_dyn());
        let view = ArrayView::over(&storage);
        assert!(matches!(view.len(), Err(Error::Unsupported {capability: "len", ..})));
        assert_eq!(view.size().unwrap(), 1);
    }

    #[test]
    fn reductions() {
        let storage = RefCell::new(arr2(&[[1.0, -2.0], [3.0, 4.0]]).into_dyn());
        let view = ArrayView::over(&storage);
        assert_eq!(view.sum(None).unwrap(), arr0(6.0).into_dyn());
        assert_eq!(view.sum(Some(0)).unwrap(), arr1(&[4.0, 2.0]).into_dyn());
        assert_eq!(view.prod(None).unwrap(), arr0(-24.0).into_dyn());
        assert_eq!(view.max(Some(1)).unwrap(), arr1(&[1.0, 4.0]).into_dyn());
        assert_eq!(view.min(None).unwrap(), arr0(-2.0).into_dyn());
        assert!(matches!(view.mean(Some(2)), Err(Error::AxisOutOfBounds {axis: 2, ndim: 2})));
    }

    #[test]
    fn operators() {
        let storage = RefCell::new(arr1(&[6.0, 8.0]).into_dyn());
        let view = ArrayView::over(&storage);
        let two = arr1(&[2.0]).into_dyn();
        assert_eq!((&view - &two).unwrap(), arr1(&[4.0, 6.0]).into_dyn());
        assert_eq!((&view * &two).unwrap(), arr1(&[12.0, 16.0]).into_dyn());
        assert_eq!((&view / &view).unwrap(), arr1(&[1.0, 1.0]).into_dyn());
        assert_eq!((&view % &arr1(&[4.0, -5.0]).into_dyn()).unwrap(), arr1(&[2.0, -2.0]).into_dyn());
        assert_eq!((-&view).unwrap(), arr1(&[-6.0, -8.0]).into_dyn());
        // Operators never write.
        assert_eq!(*storage.borrow(), arr1(&[6.0, 8.0]).into_dyn());
    }

    #[test]
    fn update_in_place() {
        let storage = RefCell::new(arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn());
        let view = ArrayView::over(&storage);
        let row = arr1(&[10.0, 20.0]).into_dyn();
        view.index(key![1]).update(Ufunc::Add, Operand::Array(&row)).unwrap();
        assert_eq!(*storage.borrow(), arr2(&[[1.0, 2.0], [13.0, 24.0]]).into_dyn());
        assert_eq!(view.materialize_as::<f32>().unwrap()[[1, 1]], 24.0f32);
    }

    // ------------------------------------------------------------------------

    fn arb_slice() -> impl Strategy<Value=Selector> {
        (
            prop::option::of(-12isize..12),
            prop::option::of(-12isize..12),
            prop_oneof![-3isize..=-1, 1isize..=3],
        ).prop_map(|(start, stop, step)| Selector::Slice {start, stop, step})
    }

    fn arb_storage() -> impl Strategy<Value=ArrayD<f64>> {
        prop::collection::vec(-100i32..100, 1..12)
            .prop_map(|v| arr1(&v.into_iter().map(f64::from).collect::<Vec<_>>()).into_dyn())
    }

    proptest! {
        #[test]
        fn read_composition(data in arb_storage(), k1 in arb_slice(), k2 in arb_slice()) {
            let storage = RefCell::new(data.clone());
            let view = ArrayView::over(&storage);
            let (k1, k2) = (Key::from(k1), Key::from(k2));
            let expected = select(select(data, &k1).unwrap(), &k2).unwrap();
            prop_assert_eq!(view.index(&k1).index(&k2).materialize().unwrap(), expected);
        }

        #[test]
        fn nested_write_equivalence(
            data in arb_storage(),
            k1 in arb_slice(),
            k2 in arb_slice(),
            x in -100i32..100,
        ) {
            let (k1, k2) = (Key::from(k1), Key::from(k2));
            let value = arr0(f64::from(x)).into_dyn();

            let storage = RefCell::new(data.clone());
            ArrayView::over(&storage).index(&k1).index(&k2).assign(Key::full(), value.clone()).unwrap();

            let mut expected = data;
            let mut region = select(expected.clone(), &k1).unwrap();
            patch(&mut region, &value, &k2).unwrap();
            patch(&mut expected, &region, &k1).unwrap();
            prop_assert_eq!(storage.borrow().clone(), expected);
        }

        #[test]
        fn out_parameter_locality(data in arb_storage(), k in arb_slice(), x in -100i32..100) {
            let k = Key::from(k);
            let storage = RefCell::new(data.clone());
            let view = ArrayView::over(&storage);
            let target = view.index(&k);
            let result = apply(
                Ufunc::Add, Method::Call,
                &[Operand::View(&target), Operand::Scalar(f64::from(x))],
                Some(Out::View(&target)),
            ).unwrap().unwrap();

            let region = select(data.clone(), &k).unwrap().mapv(|y| y + f64::from(x));
            prop_assert_eq!(&result, &region);
            prop_assert_eq!(target.materialize().unwrap(), region.clone());
            prop_assert_eq!(storage.borrow().clone(), replace(&data, &region, &k).unwrap());
        }
    }
}
