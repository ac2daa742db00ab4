//! Member names and type identifiers.
//!
//! A type identifier names a type and the crate defining it, in one of two
//! [`AssemblyStyle`]s:
//!
//! - simple: `alloc::vec::Vec[[i32, core]], alloc`. Generic arguments are
//!   nested simple identifiers in brackets; arrays keep their `[,]` suffix.
//! - full: `demo::Node, demo, Version=0.3.1`. The type path as is, the
//!   crate, and the crate version when known.
//!
//! [`AssemblyStyle`]: crate::AssemblyStyle

use vc_reflect::info::TypeInfo;

use crate::AssemblyStyle;

// -----------------------------------------------------------------------------
// Member names

/// Normalizes the name of a struct member as written in the document.
///
/// Strips the `r#` prefix of raw identifiers, a leading path qualifier
/// (`Base::name`) and a trailing `__field` marker.
///
/// ```
/// use vc_json::naming::normalize_member_name;
///
/// assert_eq!(normalize_member_name("r#type"), "type");
/// assert_eq!(normalize_member_name("Base::id"), "id");
/// assert_eq!(normalize_member_name("value__field"), "value");
/// assert_eq!(normalize_member_name("plain"), "plain");
/// ```
pub fn normalize_member_name(name: &str) -> &str {
    let name = match name.rfind("::") {
        Some(index) => &name[index + 2..],
        None => name,
    };
    let name = name.strip_prefix("r#").unwrap_or(name);
    match name.strip_suffix("__field") {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => name,
    }
}

// -----------------------------------------------------------------------------
// Formatting

/// Formats the identifier of a type.
pub fn format_identifier(info: &TypeInfo, style: AssemblyStyle) -> String {
    match style {
        AssemblyStyle::Simple => {
            let mut out = String::new();
            write_simple(&mut out, info);
            out
        }
        AssemblyStyle::Full => {
            let mut out = String::new();
            out.push_str(info.type_path());
            out.push_str(", ");
            out.push_str(info.crate_name());
            if let Some(version) = info.crate_version() {
                out.push_str(", Version=");
                out.push_str(version);
            }
            out
        }
    }
}

fn write_simple(out: &mut String, info: &TypeInfo) {
    write_simple_name(out, info);
    out.push_str(", ");
    out.push_str(info.crate_name());
}

fn write_simple_name(out: &mut String, info: &TypeInfo) {
    if let TypeInfo::Array(array) = info {
        write_simple_name(out, array.item_info());
        out.push_str(&array_suffix(array.rank()));
        return;
    }
    let generics = info.generics();
    if generics.is_empty() {
        out.push_str(info.type_path());
        return;
    }
    out.push_str(info.ty().base_path());
    out.push('[');
    for (index, arg) in generics.iter().enumerate() {
        if index != 0 {
            out.push_str(", ");
        }
        out.push('[');
        write_simple(out, arg);
        out.push(']');
    }
    out.push(']');
}

fn array_suffix(rank: usize) -> String {
    let mut suffix = String::from("[");
    for _ in 1..rank {
        suffix.push(',');
    }
    suffix.push(']');
    suffix
}

// -----------------------------------------------------------------------------
// Parsing

/// A parsed type identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeIdentifier {
    /// The type path, generic arguments written the Rust way.
    pub type_path: String,
    pub crate_name: String,
    pub version: Option<String>,
}

/// Parses an identifier of either style; `None` if it is malformed.
///
/// ```
/// use vc_json::naming::parse_identifier;
///
/// let id = parse_identifier("alloc::vec::Vec[[i32, core]], alloc").unwrap();
/// assert_eq!(id.type_path, "alloc::vec::Vec<i32>");
/// assert_eq!(id.crate_name, "alloc");
///
/// let id = parse_identifier("demo::Pair<u8, i8>, demo, Version=1.0.0").unwrap();
/// assert_eq!(id.type_path, "demo::Pair<u8, i8>");
/// assert_eq!(id.version.as_deref(), Some("1.0.0"));
/// ```
pub fn parse_identifier(identifier: &str) -> Option<TypeIdentifier> {
    let parts = split_top_level(identifier.trim());
    let (name, crate_name, rest) = match parts.as_slice() {
        [name, crate_name] => (*name, *crate_name, None),
        [name, crate_name, rest] => (*name, *crate_name, Some(*rest)),
        _ => return None,
    };
    let version = match rest {
        Some(rest) => Some(rest.strip_prefix("Version=")?.to_owned()),
        None => None,
    };
    if name.is_empty() || crate_name.is_empty() {
        return None;
    }
    Some(TypeIdentifier {
        type_path: simple_name_to_path(name)?,
        crate_name: crate_name.to_owned(),
        version,
    })
}

/// Splits at `, ` outside of brackets and angle brackets.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_i32;
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'[' | b'<' => depth += 1,
            b']' | b'>' => depth -= 1,
            b',' if depth == 0 && bytes.get(index + 1) == Some(&b' ') => {
                parts.push(&text[start..index]);
                start = index + 2;
                index += 1;
            }
            _ => {}
        }
        index += 1;
    }
    parts.push(&text[start..]);
    parts
}

/// Rewrites a simple name to a type path:
/// `a::Map[[K, k], [V, v]][,]` becomes `a::Map<K, V>[,]`.
///
/// Full-style names contain no bracketed arguments and pass through.
fn simple_name_to_path(name: &str) -> Option<String> {
    let Some(open) = name.find('[') else {
        return Some(name.to_owned());
    };
    let (base, rest) = name.split_at(open);
    if !rest.starts_with("[[") {
        // An array suffix only.
        return is_array_suffix(rest).then(|| name.to_owned());
    }

    let close = matching_bracket(rest)?;
    let args = &rest[1..close];
    let suffix = &rest[close + 1..];
    if !suffix.is_empty() && !is_array_suffix(suffix) {
        return None;
    }

    let mut path = String::from(base);
    path.push('<');
    for (index, arg) in split_top_level(args).into_iter().enumerate() {
        let arg = arg.strip_prefix('[')?.strip_suffix(']')?;
        let parsed = parse_identifier(arg)?;
        if index != 0 {
            path.push_str(", ");
        }
        path.push_str(&parsed.type_path);
    }
    path.push('>');
    path.push_str(suffix);
    Some(path)
}

fn is_array_suffix(text: &str) -> bool {
    text.strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .is_some_and(|commas| commas.bytes().all(|b| b == b','))
}

/// The index of the bracket closing the one at index 0.
fn matching_bracket(text: &str) -> Option<usize> {
    let mut depth = 0_i32;
    for (index, byte) in text.bytes().enumerate() {
        match byte {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use vc_reflect::Reflect;
    use vc_reflect::info::Typed;
    use vc_reflect::ops::{NdArray, Shared};

    use super::{format_identifier, normalize_member_name, parse_identifier};
    use crate::AssemblyStyle;

    #[test]
    fn normalized_names() {
        assert_eq!(normalize_member_name("r#match"), "match");
        assert_eq!(normalize_member_name("Outer::r#type"), "type");
        assert_eq!(normalize_member_name("__field"), "__field");
    }

    #[test]
    fn simple_identifiers() {
        let id = format_identifier(i32::type_info(), AssemblyStyle::Simple);
        assert_eq!(id, "i32, core");

        let id = format_identifier(<Vec<String>>::type_info(), AssemblyStyle::Simple);
        assert_eq!(id, "alloc::vec::Vec[[alloc::string::String, alloc]], alloc");

        let id = format_identifier(<BTreeMap<u8, Vec<i8>>>::type_info(), AssemblyStyle::Simple);
        assert_eq!(
            id,
            "alloc::collections::BTreeMap[[u8, core], [alloc::vec::Vec[[i8, core]], alloc]], alloc"
        );

        let id = format_identifier(<NdArray<Vec<u8>, 2>>::type_info(), AssemblyStyle::Simple);
        assert_eq!(id, "alloc::vec::Vec[[u8, core]][,], alloc");

        let id = format_identifier(<Box<dyn Reflect>>::type_info(), AssemblyStyle::Simple);
        assert_eq!(id, "alloc::boxed::Box<dyn vc_reflect::Reflect>, alloc");
    }

    #[test]
    fn full_identifiers() {
        let id = format_identifier(<Shared<u8>>::type_info(), AssemblyStyle::Full);
        assert!(id.starts_with("vc_reflect::ops::Shared<u8>, vc_reflect, Version="));
        assert_eq!(format_identifier(u8::type_info(), AssemblyStyle::Full), "u8, core");
    }

    #[test]
    fn identifiers_parse_back_to_paths() {
        let infos = [
            i32::type_info(),
            <Vec<String>>::type_info(),
            <BTreeMap<u8, Vec<i8>>>::type_info(),
            <NdArray<Vec<u8>, 2>>::type_info(),
            <NdArray<f64, 3>>::type_info(),
            <Shared<Vec<u8>>>::type_info(),
            <Box<dyn Reflect>>::type_info(),
        ];
        for info in infos {
            for style in [AssemblyStyle::Simple, AssemblyStyle::Full] {
                let id = parse_identifier(&format_identifier(info, style)).unwrap();
                assert_eq!(id.type_path, info.type_path(), "{style:?}");
                assert_eq!(id.crate_name, info.crate_name());
            }
        }
    }

    #[test]
    fn malformed_identifiers() {
        assert!(parse_identifier("no_crate").is_none());
        assert!(parse_identifier("a, b, c").is_none());
        assert!(parse_identifier("a::B[[x, y], c").is_none());
        assert!(parse_identifier("a::B[x], c").is_none());
    }
}
