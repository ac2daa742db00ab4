use serde::{Deserialize, Serialize};
use vc_reflect::info::TypeInfo;
use vc_reflect::registry::TypeRegistry;

use crate::naming::{format_identifier, parse_identifier};

// -----------------------------------------------------------------------------
// AssemblyStyle

/// How type identifiers are written. See [`naming`](crate::naming).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssemblyStyle {
    /// Type path and crate; generic arguments nested as identifiers.
    #[default]
    Simple,
    /// Type path, crate and crate version.
    Full,
}

// -----------------------------------------------------------------------------
// Binder

/// Maps types to the identifiers written under `@@type@@`, and back.
///
/// The two directions must agree: an identifier produced by
/// [`bind_to_name`](Binder::bind_to_name) has to bind to the same type.
pub trait Binder {
    /// Resolves an identifier read from a document, `None` if unknown.
    fn bind_to_type(&self, identifier: &str, registry: &TypeRegistry) -> Option<&'static TypeInfo>;

    fn bind_to_name(&self, info: &'static TypeInfo, style: AssemblyStyle) -> String;
}

/// The registry-backed [`Binder`].
///
/// Accepts both identifier styles. The crate named by the identifier must
/// match the crate of the registered type; the version is informative.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBinder;

impl Binder for DefaultBinder {
    fn bind_to_type(&self, identifier: &str, registry: &TypeRegistry) -> Option<&'static TypeInfo> {
        let parsed = parse_identifier(identifier)?;
        let info = registry.get_with_type_path(&parsed.type_path)?.type_info();
        (info.crate_name() == parsed.crate_name).then_some(info)
    }

    #[inline]
    fn bind_to_name(&self, info: &'static TypeInfo, style: AssemblyStyle) -> String {
        format_identifier(info, style)
    }
}

// -----------------------------------------------------------------------------
// Tests
