// -----------------------------------------------------------------------------
// Modules

mod containers;
mod driver;
mod encoder;

// -----------------------------------------------------------------------------
// Exports

pub use driver::SerializeDriver;

pub(crate) use encoder::Encoder;

use vc_reflect::Reflect;
use vc_reflect::info::{TypeInfo, Typed};

/// The fragment of the root frame.
pub(crate) const ROOT: &str = "root";

/// The erased expected type, under which every value is tagged.
#[inline]
pub(crate) fn erased_type() -> &'static TypeInfo {
    <Box<dyn Reflect> as Typed>::type_info()
}

/// Returns `true` if a value of type `runtime` needs `@@type@@` where
/// `expected` is the type known from context.
#[inline]
pub(crate) fn needs_tag(runtime: &TypeInfo, expected: Option<&TypeInfo>) -> bool {
    match expected {
        None => true,
        Some(expected) => expected.is_dynamic() || expected.type_id() != runtime.type_id(),
    }
}
