//! Array-valued properties whose storage lives somewhere else.
//!
//! An [`ArrayView`] looks like a dense multi-dimensional array, but owns no
//! data. Instead it holds a getter, which reads the region of the array
//! addressed by a [`Key`], and a setter, which overwrites such a region.
//! Every read calls the getter afresh. Indexing an `ArrayView` gives a
//! narrower `ArrayView`, and writing through the narrower view reads the
//! parent's region, patches it using [`replace()`], and writes it back
//! whole. The getter and setter can therefore compute the array from other
//! data, and never see a key they were not written to understand.
//!
//! A [`ComputedArrayProperty`] declares such a field on a type, and binds it
//! to instances of the type.
//!
//! Arithmetic on `ArrayView`s goes through [`apply()`], which names the
//! operation with a [`Ufunc`] and says how to apply it with a [`Method`].
//! The operands are materialized first, and the result is a concrete
//! [`ndarray::ArrayD`]. An `ArrayView` given as the output is updated by
//! writing the whole result back through its setter.
//!
//! ```
//! use std::cell::{RefCell};
//! use ndarray::{arr1};
//! use ndproperty::{key, apply, ArrayView, Method, Operand, Out, Ufunc};
//!
//! let storage = RefCell::new(arr1(&[0.0; 4]).into_dyn());
//! let view = ArrayView::over(&storage);
//! view.assign(key![1..3], arr1(&[5.0, 6.0]).into_dyn()).unwrap();
//! view.index(key![0..2]).assign(key![0], ndarray::arr0(1.0).into_dyn()).unwrap();
//! assert_eq!(view.materialize().unwrap(), arr1(&[1.0, 5.0, 6.0, 0.0]).into_dyn());
//!
//! let tail = view.index(key![2..]);
//! apply(Ufunc::Add, Method::Call, &[Operand::View(&tail), Operand::Scalar(1.0)], Some(Out::View(&tail))).unwrap();
//! assert_eq!(*storage.borrow(), arr1(&[1.0, 5.0, 7.0, 1.0]).into_dyn());
//! ```

pub use ndarray;

mod error;
pub use error::{Error, Result};

mod key;
pub use key::{Key, KeyError, Selector, Stepped};

mod broadcast;
pub use broadcast::{broadcast_shape, broadcast_to, broadcast_pair};

mod element;
pub use element::{DType, Element};

mod array;
pub use array::{patch, replace, select};

pub mod ops;
pub use ops::{Comparison, Method, Ufunc};

mod view;
pub use view::{ArrayView};

mod ufunc;
pub use ufunc::{apply, call, compare, Operand, Out};

mod property;
pub use property::{ComputedArrayProperty, FieldGetter, FieldSetter};
