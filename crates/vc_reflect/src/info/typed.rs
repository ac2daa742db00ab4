use crate::info::{TypeInfo, TypePath};

/// A static accessor to compile-time type information.
///
/// Implemented by every reflected type, usually through a static cell:
///
/// ```ignore
/// impl Typed for Foo {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Struct(StructInfo::new::<Self>(&[/* fields */])))
///     }
/// }
/// ```
///
/// `Option<T>` is transparent here: it reports the information of `T`,
/// and a `None` value is the null of `T`.
pub trait Typed: TypePath {
    fn type_info() -> &'static TypeInfo;
}
