//! Array-valued fields that are computed from other fields.

use std::cell::{RefCell};
use std::fmt::{self, Debug};

use ndarray::{ArrayD};

use super::{ArrayView, Error, Key, Result};

/// Reads the region `key` of a field of `T`.
pub type FieldGetter<T, A> = fn(&T, &Key) -> Result<ArrayD<A>>;

/// Overwrites the region `key` of a field of `T` with a value, which may
/// need broadcasting.
pub type FieldSetter<T, A> = fn(&mut T, ArrayD<A>, &Key) -> Result<()>;

/// The declaration of an array-valued field of `T`, whose elements are
/// computed by a getter and optionally written by a setter.
///
/// Declare one as an associated constant. The constant itself describes the
/// field; [`get()`] binds it to an instance, giving an [`ArrayView`].
///
/// ```
/// use std::cell::{RefCell};
/// use ndarray::{arr1, ArrayD};
/// use ndproperty::{key, select, ComputedArrayProperty, Key, Result};
///
/// struct C { x: ArrayD<f64> }
///
/// impl C {
///     const Y: ComputedArrayProperty<Self, f64> = ComputedArrayProperty::new("y", C::y)
///         .with_setter(C::set_y)
///         .with_doc("The square of `x`.");
///
///     fn y(&self, key: &Key) -> Result<ArrayD<f64>> {
///         Ok(select(self.x.clone(), key)?.mapv(|x| x * x))
///     }
///
///     fn set_y(&mut self, value: ArrayD<f64>, key: &Key) -> Result<()> {
///         ndproperty::patch(&mut self.x, &value.mapv(f64::sqrt), key)
///     }
/// }
///
/// let c = RefCell::new(C {x: arr1(&[1.0, 2.0, 3.0, 4.0]).into_dyn()});
/// assert_eq!(C::Y.get(&c).materialize().unwrap(), arr1(&[1.0, 4.0, 9.0, 16.0]).into_dyn());
/// C::Y.get(&c).index(key![1..3]).fill(25.0).unwrap();
/// assert_eq!(c.borrow().x, arr1(&[1.0, 5.0, 5.0, 4.0]).into_dyn());
/// ```
///
/// [`get()`]: Self::get()
pub struct ComputedArrayProperty<T, A> {
    name: &'static str,
    doc: Option<&'static str>,
    fget: FieldGetter<T, A>,
    fset: Option<FieldSetter<T, A>>,
}

impl<T, A> Clone for ComputedArrayProperty<T, A> {
    fn clone(&self) -> Self { *self }
}

impl<T, A> Copy for ComputedArrayProperty<T, A> {}

impl<T, A> Debug for ComputedArrayProperty<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedArrayProperty")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .field("settable", &self.is_settable())
            .finish()
    }
}

impl<T, A> ComputedArrayProperty<T, A> {
    /// A read-only field called `name`.
    pub const fn new(name: &'static str, fget: FieldGetter<T, A>) -> Self {
        Self {name, doc: None, fget, fset: None}
    }

    /// Make the field writable.
    pub const fn with_setter(mut self, fset: FieldSetter<T, A>) -> Self {
        self.fset = Some(fset);
        self
    }

    pub const fn with_doc(mut self, doc: &'static str) -> Self {
        self.doc = Some(doc);
        self
    }

    pub fn name(&self) -> &'static str { self.name }

    pub fn doc(&self) -> Option<&'static str> { self.doc }

    pub fn is_settable(&self) -> bool { self.fset.is_some() }
}

impl<T, A: Clone> ComputedArrayProperty<T, A> {
    /// The field of `instance`, as an [`ArrayView`].
    ///
    /// `instance` is borrowed for the duration of each read or write, and
    /// a conflicting borrow is reported as [`Error::Storage`]. If the field
    /// has no setter, every write fails with [`Error::ReadOnly`].
    pub fn get<'a>(&self, instance: &'a RefCell<T>) -> ArrayView<'a, A> where A: 'a {
        let Self {name, fget, fset, ..} = *self;
        let getter = move |key: &Key| {
            let this = instance.try_borrow().map_err(Error::storage)?;
            fget(&*this, key)
        };
        match fset {
            Some(fset) => ArrayView::new(getter, move |key: &Key, value: ArrayD<A>| {
                let mut this = instance.try_borrow_mut().map_err(Error::storage)?;
                fset(&mut *this, value, key)
            }),
            None => ArrayView::read_only(name, getter),
        }
    }

    /// Overwrite the region `key` of the field of `instance`.
    pub fn set(&self, instance: &RefCell<T>, value: ArrayD<A>, key: impl Into<Key>) -> Result<()> {
        self.get(instance).assign(key, value)
    }
}

// ----------------------------------------------------------------------------

/// Define a trait of accessor methods for [`ComputedArrayProperty`]s, and
/// implement it for `&RefCell` of the owning type.
///
/// Each line `getter, setter: A = PROPERTY;` declares two methods. The
/// getter returns the field as an [`ArrayView`]. The setter takes a value
/// and a key, and writes the value into the region of the field addressed
/// by the key.
///
/// ```
/// use std::cell::{RefCell};
/// use ndarray::{arr1, ArrayD};
/// use ndproperty::{array_accessors, key, select, ComputedArrayProperty};
///
/// struct Grid { x: ArrayD<f64> }
///
/// impl Grid {
///     const X: ComputedArrayProperty<Self, f64> = ComputedArrayProperty::<Grid, f64>::new(
///         "x", |grid, key| select(grid.x.clone(), key),
///     ).with_setter(|grid, value, key| ndproperty::patch(&mut grid.x, &value, key));
/// }
///
/// array_accessors! {
///     pub trait GridFields for Grid {
///         x, set_x: f64 = Grid::X;
///     }
/// }
///
/// let grid = RefCell::new(Grid {x: arr1(&[1.0, 2.0, 3.0]).into_dyn()});
/// grid.set_x(arr1(&[0.0]).into_dyn(), key![..2]).unwrap();
/// assert_eq!(grid.x().materialize().unwrap(), arr1(&[0.0, 0.0, 3.0]).into_dyn());
/// ```
#[macro_export]
macro_rules! array_accessors {
    ($vis:vis trait $tr:ident for $t:ty {
        $($get:ident, $set:ident: $a:ty = $prop:expr;)*
    }) => {
        $vis trait $tr<'a> {
            $(
                fn $get(self) -> $crate::ArrayView<'a, $a>;

                fn $set(
                    self,
                    value: $crate::ndarray::ArrayD<$a>,
                    key: impl Into<$crate::Key>,
                ) -> $crate::Result<()>;
            )*
        }

        impl<'a> $tr<'a> for &'a ::std::cell::RefCell<$t> {
            $(
                fn $get(self) -> $crate::ArrayView<'a, $a> { $prop.get(self) }

                fn $set(
                    self,
                    value: $crate::ndarray::ArrayD<$a>,
                    key: impl Into<$crate::Key>,
                ) -> $crate::Result<()> {
                    $prop.set(self, value, key)
                }
            )*
        }
    };
}
