use std::io;

use thiserror::Error;
use vc_reflect::ops::ReflectError;

use crate::converter::ConvertError;
use crate::path::PathError;
use crate::protocol::ProtocolError;

// -----------------------------------------------------------------------------
// FormatError

/// An error of [`JsonFormatter`](crate::JsonFormatter).
///
/// Errors raised while walking a graph carry the path of the node at fault.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FormatError {
    #[error("cannot decide the type of the value at `{path}`")]
    UndecidableType { path: String },

    #[error("unknown type `{identifier}` at `{path}`")]
    UnresolvedType { path: String, identifier: String },

    #[error("`{path}` refers to `{reference}`, which holds no shared object")]
    UnknownReference { path: String, reference: String },

    #[error("`{path}` refers to `{reference}`, but `{type_path}` is a value type")]
    ValueTypeReference {
        path: String,
        reference: String,
        type_path: &'static str,
    },

    #[error("duplicate bag entry `{key}` at `{path}`")]
    DuplicateKey { path: String, key: String },

    #[error("`{key}` at `{path}` is a reserved key")]
    ReservedKey { path: String, key: String },

    #[error("type `{type_path}` at `{path}` has no way to read a bag")]
    MissingInitializer { path: String, type_path: &'static str },

    #[error("type `{type_path}` at `{path}` cannot be default-constructed")]
    NoDefault { path: String, type_path: &'static str },

    #[error("expected {expected} at `{path}`, found {found}")]
    UnexpectedShape {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("type `{type_path}` at `{path}` is not serializable")]
    NotSerializable { path: String, type_path: &'static str },

    #[error("expected an array of rank {expected} at `{path}`, found rank {found}")]
    RankMismatch {
        path: String,
        expected: usize,
        found: usize,
    },

    #[error("the array at `{path}` is not rectangular")]
    RaggedArray { path: String },

    #[error("conversion failed at `{path}`: {source}")]
    Convert { path: String, source: ConvertError },

    #[error("custom protocol failed at `{path}`: {source}")]
    Protocol { path: String, source: ProtocolError },

    #[error("reflection failed at `{path}`: {source}")]
    Reflect { path: String, source: ReflectError },

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl FormatError {
    /// The path of the node at fault, if the error has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::UndecidableType { path }
            | Self::UnresolvedType { path, .. }
            | Self::UnknownReference { path, .. }
            | Self::ValueTypeReference { path, .. }
            | Self::DuplicateKey { path, .. }
            | Self::ReservedKey { path, .. }
            | Self::MissingInitializer { path, .. }
            | Self::NoDefault { path, .. }
            | Self::UnexpectedShape { path, .. }
            | Self::NotSerializable { path, .. }
            | Self::RankMismatch { path, .. }
            | Self::RaggedArray { path }
            | Self::Convert { path, .. }
            | Self::Protocol { path, .. }
            | Self::Reflect { path, .. } => Some(path),
            Self::Path(_) | Self::Json(_) | Self::Io(_) => None,
        }
    }
}
