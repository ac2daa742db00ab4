use crate::{Instance, Reflect};
use crate::ops::ReflectError;

/// A struct with named fields, visited in declaration order.
///
/// Usually implemented through [`reflect_struct!`](crate::reflect_struct).
pub trait Struct: Reflect {
    /// Returns the field named `name`.
    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    /// Returns the field at `index` in declaration order.
    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    /// Returns the name of the field at `index`.
    fn name_at(&self, index: usize) -> Option<&'static str>;

    fn field_len(&self) -> usize;

    /// Replaces the field named `name` with `value`.
    ///
    /// Fails if there is no such field or the value has the wrong type.
    fn set_field(&mut self, name: &str, value: Instance) -> Result<(), ReflectError>;

    fn iter_fields(&self) -> StructFieldIter<'_>;
}

/// An iterator over `(name, value)` pairs of a [`Struct`].
pub struct StructFieldIter<'a> {
    inner: &'a dyn Struct,
    index: usize,
}

impl<'a> StructFieldIter<'a> {
    #[inline]
    pub fn new(inner: &'a dyn Struct) -> Self {
        Self { inner, index: 0 }
    }
}

impl<'a> Iterator for StructFieldIter<'a> {
    type Item = (&'static str, &'a dyn Reflect);

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.inner.name_at(self.index)?;
        let value = self.inner.field_at(self.index)?;
        self.index += 1;
        Some((name, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.inner.field_len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for StructFieldIter<'_> {}
