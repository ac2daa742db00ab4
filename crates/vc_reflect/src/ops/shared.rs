use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::Reflect;
use crate::info::{TypeInfo, Typed};
use crate::ops::ReflectError;

// -----------------------------------------------------------------------------
// Shared

/// A shared, mutable object with identity.
///
/// Cloning a `Shared` yields another pointer to the same object, so a graph
/// may hold one object in several places or in a cycle. Two `Shared` compare
/// equal only if they point to the same object.
///
/// # Examples
///
/// ```
/// use vc_reflect::ops::Shared;
///
/// let a = Shared::new(1);
/// let b = a.clone();
/// *b.borrow_mut() += 1;
///
/// assert_eq!(*a.borrow(), 2);
/// assert_eq!(a, b);
/// assert_ne!(a, Shared::new(2));
/// ```
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn from_rc(rc: Rc<RefCell<T>>) -> Self {
        Self(rc)
    }

    #[inline]
    pub fn as_rc(&self) -> &Rc<RefCell<T>> {
        &self.0
    }

    #[inline]
    pub fn into_rc(self) -> Rc<RefCell<T>> {
        self.0
    }

    /// Panics if the object is mutably borrowed.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Panics if the object is already borrowed.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.0, &other.0)
    }

    /// The address of the object, stable for as long as it is alive.
    #[inline]
    pub fn address(&self) -> usize {
        Rc::as_ptr(&self.0).addr()
    }
}

impl<T> Clone for Shared<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Default> Default for Shared<T> {
    #[inline]
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for Shared<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> PartialEq for Shared<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl<T> Eq for Shared<T> {}

// Only the address: the content may point back to this object.
impl<T> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shared").field(&Rc::as_ptr(&self.0)).finish()
    }
}

// -----------------------------------------------------------------------------
// Handle

/// A type-erased [`Shared`].
///
/// Holds two views of one allocation: a `dyn Reflect` view to read and
/// write the content, and a `dyn Any` view to recover the typed `Shared`.
#[derive(Clone)]
pub struct Handle {
    object: Rc<RefCell<dyn Reflect>>,
    any: Rc<dyn Any>,
    info: &'static TypeInfo,
}

impl Handle {
    pub fn new<T: Reflect + Typed>(shared: &Shared<T>) -> Self {
        Self {
            object: shared.0.clone(),
            any: shared.0.clone(),
            info: <Shared<T> as Typed>::type_info(),
        }
    }

    /// The information of the `Shared<T>` type.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    /// The information of the content type `T`.
    pub fn inner_info(&self) -> &'static TypeInfo {
        match self.info {
            TypeInfo::Shared(info) => info.inner_info(),
            other => other,
        }
    }

    #[inline]
    pub fn address(&self) -> usize {
        Rc::as_ptr(&self.object).cast::<()>().addr()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Handle) -> bool {
        self.address() == other.address()
    }

    pub fn try_borrow(&self) -> Result<Ref<'_, dyn Reflect>, ReflectError> {
        self.object
            .try_borrow()
            .map_err(|_| ReflectError::AlreadyBorrowed {
                type_path: self.info.type_path(),
            })
    }

    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, dyn Reflect>, ReflectError> {
        self.object
            .try_borrow_mut()
            .map_err(|_| ReflectError::AlreadyBorrowed {
                type_path: self.info.type_path(),
            })
    }

    /// Recovers the typed object, `None` if the content is not a `T`.
    pub fn downcast<T: Reflect>(&self) -> Option<Shared<T>> {
        Rc::clone(&self.any)
            .downcast::<RefCell<T>>()
            .ok()
            .map(Shared)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({} @ {:#x})", self.info.type_path(), self.address())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Handle, Shared};

    #[test]
    fn handle_keeps_identity() {
        let shared = Shared::new(5_i32);
        let a = Handle::new(&shared);
        let b = Handle::new(&shared.clone());
        assert!(a.ptr_eq(&b));
        assert_eq!(a.address(), shared.address());
        assert!(!a.ptr_eq(&Handle::new(&Shared::new(5_i32))));
    }

    #[test]
    fn handle_downcast() {
        let shared = Shared::new(String::from("x"));
        let handle = Handle::new(&shared);

        assert!(handle.downcast::<i32>().is_none());
        let back = handle.downcast::<String>().unwrap();
        assert_eq!(back, shared);
        assert_eq!(handle.inner_info().type_path(), "alloc::string::String");
    }

    #[test]
    fn borrow_conflicts_are_errors() {
        let shared = Shared::new(1_u8);
        let handle = Handle::new(&shared);
        let guard = shared.borrow_mut();
        assert!(handle.try_borrow().is_err());
        drop(guard);
        assert!(handle.try_borrow_mut().is_ok());
    }
}
