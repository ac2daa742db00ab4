use std::mem;

use serde_json::Value;
use vc_reflect::hash::HashMap;
use vc_reflect::info::{StructInfo, TypeInfo};
use vc_reflect::ops::{Handle, ReflectError, ReflectMut};
use vc_reflect::registry::TypeTraitDefault;
use vc_reflect::{Instance, Reflect};

use super::Placement;
use crate::naming::normalize_member_name;
use crate::path::{Gather, PathStack, Slot};
use crate::ser::{ROOT, erased_type};
use crate::value::{REFERENCE_KEY, TYPE_KEY, VALUE_KEY, get_str, is_envelope_key, json_to_scalar, kind_name};
use crate::{FormatError, JsonFormatter, SerializationBag};
use crate::{TypeTraitDeserializationCallback, TypeTraitDeserializeBag, TypeTraitObjectReference};
use crate::TypeTraitSerializeBag;

// -----------------------------------------------------------------------------
// Decoder

/// A shared object waiting for its callback.
struct Pending {
    path: String,
    handle: Handle,
    callback: TypeTraitDeserializationCallback,
}

/// The state of one JSON-to-graph conversion.
///
/// Shared objects are registered under their path before their content is
/// decoded, so a `@@reference@@` met while decoding the content resolves to
/// the object being built.
pub(crate) struct Decoder<'f, 'r> {
    pub(super) formatter: &'f JsonFormatter<'r>,
    pub(super) stack: PathStack<Instance>,
    processed: HashMap<String, Handle>,
    pending: Vec<Pending>,
    nodes: usize,
}

impl<'f, 'r> Decoder<'f, 'r> {
    pub fn new(formatter: &'f JsonFormatter<'r>) -> Self {
        Self {
            formatter,
            stack: PathStack::new(),
            processed: HashMap::default(),
            pending: Vec::new(),
            nodes: 0,
        }
    }

    pub fn run(
        mut self,
        json: &Value,
        expected: Option<&'static TypeInfo>,
    ) -> Result<Instance, FormatError> {
        log::debug!(
            "decoding {} expected as `{}`",
            kind_name(json),
            expected.map_or("<unknown>", TypeInfo::type_path),
        );

        let root = Slot::new();
        self.scoped(ROOT, root.setter(), |this| this.decode(json, expected))?;
        self.notify()?;

        log::debug!(
            "decoded {} nodes, {} shared objects",
            self.nodes,
            self.processed.len()
        );
        Ok(root.take().flatten())
    }

    /// Runs the deserialization callbacks in first-visit order.
    fn notify(&mut self) -> Result<(), FormatError> {
        let formatter = self.formatter;
        let ctx = formatter.context();
        for Pending {
            path,
            handle,
            callback,
        } in mem::take(&mut self.pending)
        {
            log::trace!("notifying `{}` at `{path}`", handle.inner_info().type_path());
            let mut object = match handle.try_borrow_mut() {
                Ok(object) => object,
                Err(source) => return Err(FormatError::Reflect { path, source }),
            };
            if let Err(source) = callback.on_deserialization(&mut *object, ctx) {
                return Err(FormatError::Protocol { path, source });
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Frames

impl Decoder<'_, '_> {
    /// Pushes a frame, runs `f`, then pops the frame.
    pub(super) fn scoped(
        &mut self,
        fragment: impl Into<String>,
        commit: impl FnOnce(Instance) + 'static,
        f: impl FnOnce(&mut Self) -> Result<(), FormatError>,
    ) -> Result<(), FormatError> {
        let depth = self.stack.enter(fragment, commit);
        let result = f(self);
        let left = self.stack.leave(depth);
        result?;
        left?;
        Ok(())
    }

    #[inline]
    pub(super) fn commit(&mut self, value: Instance) -> Result<(), FormatError> {
        self.stack.commit(value)?;
        Ok(())
    }

    #[inline]
    pub(super) fn path(&self) -> String {
        self.stack.current_path()
    }

    pub(super) fn reflect_error(&self, source: ReflectError) -> FormatError {
        FormatError::Reflect {
            path: self.path(),
            source,
        }
    }

    pub(super) fn unexpected(&self, expected: &'static str, found: &Value) -> FormatError {
        FormatError::UnexpectedShape {
            path: self.path(),
            expected,
            found: kind_name(found),
        }
    }

    pub(super) fn not_serializable(&self, info: &TypeInfo) -> FormatError {
        FormatError::NotSerializable {
            path: self.path(),
            type_path: info.type_path(),
        }
    }

    /// A default-constructed value of `info`.
    pub(super) fn default_of(&self, info: &'static TypeInfo) -> Result<Box<dyn Reflect>, FormatError> {
        match self
            .formatter
            .registry()
            .get_type_trait::<TypeTraitDefault>(info.type_id())
        {
            Some(default) => Ok(default.default()),
            None => Err(FormatError::NoDefault {
                path: self.path(),
                type_path: info.type_path(),
            }),
        }
    }

    /// Stores a complete value, replacing it by its real object first.
    pub(super) fn commit_value(
        &mut self,
        value: Box<dyn Reflect>,
        placement: Placement,
    ) -> Result<(), FormatError> {
        let value = match placement {
            Placement::Value => self.resolve_real_object(value)?,
            Placement::SharedBody => value,
        };
        self.commit(Some(value))
    }

    fn resolve_real_object(&mut self, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, FormatError> {
        let registry = self.formatter.registry();
        let type_id = value.reflect_type_info().type_id();

        let value = match registry.get_type_trait::<TypeTraitObjectReference>(type_id) {
            Some(reference) => reference
                .resolve_real_object(&*value, self.formatter.context())
                .map_err(|source| FormatError::Protocol {
                    path: self.path(),
                    source,
                })?,
            None => value,
        };

        match value.as_handle() {
            Some(handle) => {
                let path = self.path();
                if !self.processed.contains_key(&path) {
                    log::trace!("`{path}` resolved to a `{}`", handle.type_info().type_path());
                    self.register(path, handle);
                }
            }
            None => {
                let type_id = value.reflect_type_info().type_id();
                if registry
                    .get_type_trait::<TypeTraitDeserializationCallback>(type_id)
                    .is_some()
                {
                    log::warn!(
                        "ignoring the deserialization callback of value type `{}` at `{}`",
                        value.reflect_type_path(),
                        self.path(),
                    );
                }
            }
        }
        Ok(value)
    }

    /// Makes `handle` the target of references to `path` and queues its callback.
    fn register(&mut self, path: String, handle: Handle) {
        let callback = self
            .formatter
            .registry()
            .get_type_trait::<TypeTraitDeserializationCallback>(handle.inner_info().type_id());
        if let Some(callback) = callback {
            self.pending.push(Pending {
                path: path.clone(),
                handle: handle.clone(),
                callback: callback.clone(),
            });
        }
        self.processed.insert(path, handle);
    }
}

// -----------------------------------------------------------------------------
// Classification

impl Decoder<'_, '_> {
    /// Decodes `node`, held as `expected`, into the current frame.
    pub(super) fn decode(
        &mut self,
        node: &Value,
        expected: Option<&'static TypeInfo>,
    ) -> Result<(), FormatError> {
        self.nodes += 1;
        if node.is_null() {
            return self.commit(None);
        }

        let mut target = expected;
        let mut payload = node;
        if let Some(identifier) = get_str(node, TYPE_KEY) {
            match self.formatter.bind(identifier) {
                Some(info) => target = Some(info),
                None => {
                    return Err(FormatError::UnresolvedType {
                        path: self.path(),
                        identifier: identifier.to_owned(),
                    });
                }
            }
        }
        // Envelopes may leave out the type tag when the expected type suffices.
        if let Some(inner) = node.get(VALUE_KEY) {
            payload = inner;
        }
        if payload.is_null() {
            return self.commit(None);
        }

        match target {
            Some(target) if !target.is_dynamic() => {
                self.decode_typed(node, payload, target, Placement::Value)
            }
            _ => match get_str(payload, REFERENCE_KEY) {
                Some(reference) => self.resolve_reference(reference),
                None => Err(FormatError::UndecidableType { path: self.path() }),
            },
        }
    }

    /// Decodes `payload` as a `target`.
    ///
    /// `node` is the enveloping object, or `payload` itself when the value
    /// is not enveloped.
    pub(super) fn decode_typed(
        &mut self,
        node: &Value,
        payload: &Value,
        target: &'static TypeInfo,
        placement: Placement,
    ) -> Result<(), FormatError> {
        if let Some(reference) = get_str(payload, REFERENCE_KEY) {
            if !target.is_shared() {
                return Err(FormatError::ValueTypeReference {
                    path: self.path(),
                    reference: reference.to_owned(),
                    type_path: target.type_path(),
                });
            }
            return self.resolve_reference(reference);
        }

        match target {
            TypeInfo::Elementary(info) => {
                let Some(scalar) = json_to_scalar(payload) else {
                    return Err(self.unexpected("a scalar", payload));
                };
                let value = info
                    .from_scalar(scalar)
                    .map_err(|source| self.reflect_error(source))?;
                return self.commit_value(value, placement);
            }
            TypeInfo::Shared(info) => {
                return self.decode_shared(node, payload, target, info.inner_info());
            }
            TypeInfo::Map(info) => {
                return self.decode_map(node, payload, target, info, placement);
            }
            TypeInfo::List(info) => {
                return self.decode_list(payload, target, info.item_info(), placement);
            }
            _ => {}
        }

        if self.try_decode_bag(payload, target, placement)? {
            return Ok(());
        }

        if !target.is_serializable() {
            return Err(self.not_serializable(target));
        }

        if let TypeInfo::Array(info) = target {
            return self.decode_array(node, payload, target, info, placement);
        }

        if let Some(text) = payload.as_str()
            && let Some(converter) = self.formatter.converter(target.type_id())
        {
            let value = converter
                .convert_from_string(text)
                .map_err(|source| FormatError::Convert {
                    path: self.path(),
                    source,
                })?;
            return self.commit_value(value, placement);
        }

        match target {
            TypeInfo::Struct(info) => self.decode_struct(payload, target, info, placement),
            _ => Err(self.not_serializable(target)),
        }
    }

    fn resolve_reference(&mut self, reference: &str) -> Result<(), FormatError> {
        let Some(handle) = self.processed.get(reference).cloned() else {
            return Err(FormatError::UnknownReference {
                path: self.path(),
                reference: reference.to_owned(),
            });
        };
        log::trace!("`{}` refers to `{reference}`", self.path());
        self.commit(Some(Box::new(handle)))
    }
}

// -----------------------------------------------------------------------------
// Shared objects

impl Decoder<'_, '_> {
    /// Commits a placeholder, registers it, then fills it.
    ///
    /// The content is decoded into a separate value and stored with a single
    /// mutable borrow, so references to the object met meanwhile are free
    /// to clone it.
    fn decode_shared(
        &mut self,
        node: &Value,
        payload: &Value,
        target: &'static TypeInfo,
        inner: &'static TypeInfo,
    ) -> Result<(), FormatError> {
        if inner.is_shared() {
            return Err(self.not_serializable(target));
        }
        let placeholder = self.default_of(target)?;
        let Some(handle) = placeholder.as_handle() else {
            return Err(self.not_serializable(target));
        };
        self.register(self.path(), handle.clone());
        self.commit(Some(placeholder))?;

        let body = Slot::new();
        self.scoped("", body.setter(), |this| {
            this.decode_typed(node, payload, inner, Placement::SharedBody)
        })?;

        if let Some(content) = body.take().flatten() {
            let mut object = handle
                .try_borrow_mut()
                .map_err(|source| self.reflect_error(source))?;
            if let Err(content) = object.set(content) {
                return Err(self.reflect_error(ReflectError::MismatchedTypes {
                    expected: inner.type_path().into(),
                    found: content.reflect_type_path().into(),
                }));
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Custom protocol

impl Decoder<'_, '_> {
    /// Decodes a bag if `target` has a surrogate or reads itself from one.
    ///
    /// Returns `false` if the type uses no custom protocol.
    fn try_decode_bag(
        &mut self,
        payload: &Value,
        target: &'static TypeInfo,
        placement: Placement,
    ) -> Result<bool, FormatError> {
        let formatter = self.formatter;
        let registry = formatter.registry();
        let surrogate = formatter.surrogate(target);
        let absorb = registry.get_type_trait::<TypeTraitDeserializeBag>(target.type_id());

        if surrogate.is_none() && absorb.is_none() {
            if registry
                .get_type_trait::<TypeTraitSerializeBag>(target.type_id())
                .is_some()
            {
                return Err(FormatError::MissingInitializer {
                    path: self.path(),
                    type_path: target.type_path(),
                });
            }
            return Ok(false);
        }

        let Some(object) = payload.as_object() else {
            return Err(self.unexpected("an object", payload));
        };

        let mut bag = SerializationBag::new();
        for (name, entry) in object {
            if is_envelope_key(name) {
                continue;
            }
            let slot = Slot::new();
            self.scoped(format!(".{name}"), slot.setter(), |this| {
                this.decode(entry, Some(erased_type()))
            })?;
            bag.add_instance(name.as_str(), slot.take().flatten());
        }

        let mut value = self.default_of(target)?;
        let ctx = formatter.context();
        let result = match surrogate {
            Some(surrogate) => surrogate.absorb_bag(&mut *value, &mut bag, ctx),
            None => match absorb {
                Some(absorb) => absorb.absorb_bag(&mut *value, &mut bag, ctx),
                None => Ok(()),
            },
        };
        result.map_err(|source| FormatError::Protocol {
            path: self.path(),
            source,
        })?;

        self.commit_value(value, placement)?;
        Ok(true)
    }
}

// -----------------------------------------------------------------------------
// Plain composites

impl Decoder<'_, '_> {
    /// Decodes the members present in `payload`; the others keep their default.
    fn decode_struct(
        &mut self,
        payload: &Value,
        target: &'static TypeInfo,
        info: &StructInfo,
        placement: Placement,
    ) -> Result<(), FormatError> {
        let Some(object) = payload.as_object() else {
            return Err(self.unexpected("an object", payload));
        };

        let members = Gather::with_capacity(info.field_len());
        let mut names: Vec<(&'static str, &str)> = Vec::with_capacity(info.field_len());
        for field in info.iter() {
            let name = normalize_member_name(field.name());
            if names.iter().any(|(_, seen)| *seen == name) {
                continue;
            }
            let Some(member) = object.get(name) else {
                continue;
            };
            self.scoped(format!(".{name}"), members.pusher(), |this| {
                this.decode(member, Some(field.type_info()))
            })?;
            names.push((field.name(), name));
        }

        let mut value = self.default_of(target)?;
        let ReflectMut::Struct(fields) = value.reflect_mut() else {
            return Err(self.not_serializable(target));
        };
        for ((field, name), member) in names.into_iter().zip(members.take()) {
            if let Err(source) = fields.set_field(field, member) {
                return Err(FormatError::Reflect {
                    path: format!("{}.{name}", self.path()),
                    source,
                });
            }
        }

        self.commit_value(value, placement)
    }
}
