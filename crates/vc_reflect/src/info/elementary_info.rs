use crate::Reflect;
use crate::info::{Type, TypePath};
use crate::ops::{Elementary, ReflectError, Scalar, ScalarKind};

/// Information of an elementary (scalar or text) type.
///
/// Carries a constructor from [`Scalar`] that applies the type's coercion
/// rules, so a value can be built from a decoded scalar without knowing the
/// concrete type statically.
#[derive(Clone, Debug)]
pub struct ElementaryInfo {
    ty: Type,
    kind: ScalarKind,
    from_scalar: fn(Scalar) -> Result<Box<dyn Reflect>, ReflectError>,
}

impl ElementaryInfo {
    pub fn new<T: Elementary + TypePath>() -> Self {
        Self {
            ty: Type::of::<T>(),
            kind: T::KIND,
            from_scalar: |scalar| T::from_scalar(scalar).map(|v| Box::new(v) as Box<dyn Reflect>),
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Builds a value of this type from `scalar`, coercing it if needed.
    #[inline]
    pub fn from_scalar(&self, scalar: Scalar) -> Result<Box<dyn Reflect>, ReflectError> {
        (self.from_scalar)(scalar)
    }
}
