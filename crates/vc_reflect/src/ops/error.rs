use std::borrow::Cow;
use std::{error, fmt};

/// An enumeration of all error outcomes of reflected reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectError {
    /// A value of one type was given where another type was required.
    MismatchedTypes {
        expected: Cow<'static, str>,
        found: Cow<'static, str>,
    },
    /// A null was given for a type that cannot hold it.
    UnexpectedNull { expected: Cow<'static, str> },
    /// The struct has no field with the given name.
    NoSuchField {
        type_path: &'static str,
        field: String,
    },
    /// A scalar could not be converted to the target type.
    Conversion {
        target: &'static str,
        value: String,
    },
    /// An array index lies outside the array's bounds.
    IndexOutOfBounds { index: Vec<isize> },
    /// Lengths or lower bounds do not match the array's rank.
    InvalidShape { expected_rank: usize, found_rank: usize },
    /// The cell count or an end index of a shape leaves the integer range.
    ShapeOverflow {
        lengths: Vec<usize>,
        lower_bounds: Vec<isize>,
    },
    /// The operation needs an empty container.
    NotEmpty { type_path: &'static str },
    /// A shared object is currently borrowed.
    AlreadyBorrowed { type_path: &'static str },
    /// The type does not support the operation.
    Unsupported {
        type_path: &'static str,
        operation: &'static str,
    },
}

impl ReflectError {
    pub(crate) fn conversion(target: &'static str, value: impl fmt::Debug) -> Self {
        Self::Conversion {
            target,
            value: format!("{value:?}"),
        }
    }
}

impl fmt::Display for ReflectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MismatchedTypes { expected, found } => {
                write!(f, "expected a value of type `{expected}`, found `{found}`")
            }
            Self::UnexpectedNull { expected } => {
                write!(f, "type `{expected}` cannot hold a null value")
            }
            Self::NoSuchField { type_path, field } => {
                write!(f, "type `{type_path}` has no field named `{field}`")
            }
            Self::Conversion { target, value } => {
                write!(f, "cannot convert {value} to `{target}`")
            }
            Self::IndexOutOfBounds { index } => {
                write!(f, "array index {index:?} is out of bounds")
            }
            Self::InvalidShape {
                expected_rank,
                found_rank,
            } => {
                write!(
                    f,
                    "array of rank {expected_rank} cannot take a shape of rank {found_rank}"
                )
            }
            Self::ShapeOverflow {
                lengths,
                lower_bounds,
            } => {
                write!(
                    f,
                    "array shape {lengths:?} with lower bounds {lower_bounds:?} is too large"
                )
            }
            Self::NotEmpty { type_path } => {
                write!(f, "container `{type_path}` must be empty")
            }
            Self::AlreadyBorrowed { type_path } => {
                write!(f, "shared object `{type_path}` is already borrowed")
            }
            Self::Unsupported {
                type_path,
                operation,
            } => {
                write!(f, "type `{type_path}` does not support {operation}")
            }
        }
    }
}

impl error::Error for ReflectError {}
