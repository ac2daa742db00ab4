use std::borrow::Cow;

use crate::Reflect;
use crate::info::Typed;
use crate::ops::ReflectError;

/// A reflected value in transit: `None` is null, otherwise an owned value.
pub type Instance = Option<Box<dyn Reflect>>;

/// Builds a concrete value by taking ownership of an [`Instance`].
///
/// This is how decoded values are moved into typed slots: struct fields,
/// list items, map entries and array cells.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `FromReflect` so cannot be created through reflection",
    note = "consider declaring `{Self}` with `reflect_struct!` or `reflect_opaque!`"
)]
pub trait FromReflect: Reflect + Sized {
    fn from_reflect(value: Instance) -> Result<Self, ReflectError>;
}

/// Moves a value of exactly type `T` out of an [`Instance`].
///
/// The default [`FromReflect`] for value types.
pub fn take_instance<T: Reflect + Typed>(value: Instance) -> Result<T, ReflectError> {
    let Some(value) = value else {
        return Err(ReflectError::UnexpectedNull {
            expected: Cow::Borrowed(T::type_path()),
        });
    };
    value.take::<T>().map_err(|value| ReflectError::MismatchedTypes {
        expected: Cow::Borrowed(T::type_path()),
        found: Cow::Borrowed(value.reflect_type_path()),
    })
}
