use serde_json::{Map as JsonMap, Value};
use vc_reflect::Reflect;
use vc_reflect::hash::HashMap;
use vc_reflect::info::TypeInfo;
use vc_reflect::ops::{Handle, ReflectError, ReflectRef, Struct};

use super::{ROOT, erased_type, needs_tag};
use crate::naming::normalize_member_name;
use crate::path::{PathStack, Slot};
use crate::value::{REFERENCE_KEY, VALUE_KEY, envelope, is_envelope_key, scalar_to_json};
use crate::{FormatError, JsonFormatter, SerializationBag, TypeTraitSerializeBag};

// -----------------------------------------------------------------------------
// Encoder

/// The state of one graph-to-JSON conversion.
///
/// Shared objects are keyed by address; the first visit records the path
/// the body is written at, before any child is encoded.
pub(crate) struct Encoder<'f, 'r> {
    pub(super) formatter: &'f JsonFormatter<'r>,
    pub(super) stack: PathStack<Value>,
    visited: HashMap<usize, String>,
    nodes: usize,
}

impl<'f, 'r> Encoder<'f, 'r> {
    pub fn new(formatter: &'f JsonFormatter<'r>) -> Self {
        Self {
            formatter,
            stack: PathStack::new(),
            visited: HashMap::default(),
            nodes: 0,
        }
    }

    pub fn run(
        mut self,
        value: &dyn Reflect,
        expected: Option<&'static TypeInfo>,
    ) -> Result<Value, FormatError> {
        log::debug!(
            "encoding `{}` expected as `{}`",
            value.reflect_type_path(),
            expected.map_or("<unknown>", TypeInfo::type_path),
        );

        let root = Slot::new();
        self.scoped(ROOT, root.setter(), |this| this.encode(value, expected))?;

        log::debug!(
            "encoded {} nodes, {} shared objects",
            self.nodes,
            self.visited.len()
        );
        Ok(root.take().unwrap_or(Value::Null))
    }
}

// -----------------------------------------------------------------------------
// Frames

impl Encoder<'_, '_> {
    /// Pushes a frame, runs `f`, then pops the frame.
    pub(super) fn scoped(
        &mut self,
        fragment: impl Into<String>,
        commit: impl FnOnce(Value) + 'static,
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
    pub(super) fn commit(&mut self, json: Value) -> Result<(), FormatError> {
        self.stack.commit(json)?;
        Ok(())
    }

    /// Encodes `value` in a child frame and returns what it committed.
    pub(super) fn encode_child(
        &mut self,
        fragment: String,
        value: &dyn Reflect,
        expected: Option<&'static TypeInfo>,
    ) -> Result<Value, FormatError> {
        let slot = Slot::new();
        self.scoped(fragment, slot.setter(), |this| this.encode(value, expected))?;
        Ok(slot.take().unwrap_or(Value::Null))
    }

    #[inline]
    pub(super) fn path(&self) -> String {
        self.stack.current_path()
    }

    /// Starts an envelope at the current path, tagged with `info` if `tagged`.
    pub(super) fn open(&self, info: &'static TypeInfo, tagged: bool) -> JsonMap<String, Value> {
        let identifier = tagged.then(|| self.formatter.type_name(info));
        envelope(self.path(), identifier)
    }

    /// `{"@@info@@", "@@type@@", "@@value@@": payload}`.
    pub(super) fn wrap(&self, info: &'static TypeInfo, payload: Value) -> Value {
        let mut object = self.open(info, true);
        object.insert(VALUE_KEY.to_owned(), payload);
        Value::Object(object)
    }

    pub(super) fn reflect_error(&self, source: ReflectError) -> FormatError {
        FormatError::Reflect {
            path: self.path(),
            source,
        }
    }

    pub(super) fn not_serializable(&self, info: &TypeInfo) -> FormatError {
        FormatError::NotSerializable {
            path: self.path(),
            type_path: info.type_path(),
        }
    }
}

// -----------------------------------------------------------------------------
// Classification

impl Encoder<'_, '_> {
    /// Encodes `value`, held as `expected`, into the current frame.
    pub(super) fn encode(
        &mut self,
        value: &dyn Reflect,
        expected: Option<&'static TypeInfo>,
    ) -> Result<(), FormatError> {
        self.nodes += 1;
        let info = value.reflect_type_info();
        match value.reflect_ref() {
            ReflectRef::Null => {
                let json = match expected {
                    Some(_) => Value::Null,
                    None => self.wrap(erased_type(), Value::Null),
                };
                self.commit(json)
            }
            ReflectRef::Elementary(scalar) => {
                let json = scalar_to_json(scalar);
                let json = if needs_tag(info, expected) {
                    self.wrap(info, json)
                } else {
                    json
                };
                self.commit(json)
            }
            ReflectRef::Shared(handle) => self.encode_shared(&handle, expected),
            _ => self.encode_body(value, info, needs_tag(info, expected)),
        }
    }

    fn encode_shared(
        &mut self,
        handle: &Handle,
        expected: Option<&'static TypeInfo>,
    ) -> Result<(), FormatError> {
        let info = handle.type_info();
        let path = self.path();

        if let Some(first) = self.visited.get(&handle.address()) {
            log::trace!("`{path}` refers to `{first}`");
            let mut object = envelope(path, None);
            object.insert(REFERENCE_KEY.to_owned(), Value::String(first.clone()));
            return self.commit(Value::Object(object));
        }
        self.visited.insert(handle.address(), path);

        let inner = handle
            .try_borrow()
            .map_err(|source| self.reflect_error(source))?;
        if inner.reflect_type_info().is_shared() {
            return Err(self.not_serializable(info));
        }
        self.encode_body(&*inner, info, needs_tag(info, expected))
    }

    /// Encodes a value that is neither null nor a shared reference.
    ///
    /// `tag_info` names the type written to `@@type@@`; it differs from the
    /// value's own type for the body of a shared object.
    fn encode_body(
        &mut self,
        value: &dyn Reflect,
        tag_info: &'static TypeInfo,
        tagged: bool,
    ) -> Result<(), FormatError> {
        let info = value.reflect_type_info();
        match value.reflect_ref() {
            ReflectRef::Elementary(scalar) => {
                let json = scalar_to_json(scalar);
                let json = if tagged { self.wrap(tag_info, json) } else { json };
                return self.commit(json);
            }
            ReflectRef::Map(map) => return self.encode_map(map, tag_info, tagged),
            ReflectRef::List(list) => return self.encode_list(list, tag_info, tagged),
            _ => {}
        }

        if let Some(bag) = self.produce_bag(value, info)? {
            return self.encode_bag(bag, tag_info);
        }

        if !info.is_serializable() {
            return Err(self.not_serializable(info));
        }

        if let ReflectRef::Array(array) = value.reflect_ref() {
            return self.encode_array(array, tag_info, tagged);
        }

        if let Some(converter) = self.formatter.converter(info.type_id()) {
            let text = converter
                .convert_to_string(value)
                .map_err(|source| FormatError::Convert {
                    path: self.path(),
                    source,
                })?;
            let json = if tagged {
                self.wrap(tag_info, Value::String(text))
            } else {
                Value::String(text)
            };
            return self.commit(json);
        }

        match value.reflect_ref() {
            ReflectRef::Struct(value) => self.encode_struct(value, tag_info, tagged),
            _ => Err(self.not_serializable(info)),
        }
    }
}

// -----------------------------------------------------------------------------
// Custom protocol

impl Encoder<'_, '_> {
    /// Asks the surrogate of the type, then the type itself, for a bag.
    fn produce_bag(
        &self,
        value: &dyn Reflect,
        info: &'static TypeInfo,
    ) -> Result<Option<SerializationBag>, FormatError> {
        let ctx = self.formatter.context();
        let mut bag = SerializationBag::new();

        let result = if let Some(surrogate) = self.formatter.surrogate(info) {
            surrogate.produce_bag(value, &mut bag, ctx)
        } else if let Some(produce) = self
            .formatter
            .registry()
            .get_type_trait::<TypeTraitSerializeBag>(info.type_id())
        {
            produce.produce_bag(value, &mut bag, ctx)
        } else {
            return Ok(None);
        };

        result.map_err(|source| FormatError::Protocol {
            path: self.path(),
            source,
        })?;
        Ok(Some(bag))
    }

    /// `{"@@info@@", "@@type@@", entries...}`; always tagged.
    fn encode_bag(
        &mut self,
        bag: SerializationBag,
        tag_info: &'static TypeInfo,
    ) -> Result<(), FormatError> {
        let mut object = self.open(bag.type_info().unwrap_or(tag_info), true);

        for (name, value) in bag.into_entries() {
            if is_envelope_key(&name) {
                return Err(FormatError::ReservedKey {
                    path: self.path(),
                    key: name,
                });
            }
            if object.contains_key(&name) {
                return Err(FormatError::DuplicateKey {
                    path: self.path(),
                    key: name,
                });
            }
            let json = match value {
                Some(value) => self.encode_child(format!(".{name}"), &*value, Some(erased_type()))?,
                None => Value::Null,
            };
            object.insert(name, json);
        }

        self.commit(Value::Object(object))
    }
}

// -----------------------------------------------------------------------------
// Plain composites

impl Encoder<'_, '_> {
    /// Members in declaration order under their normalized names.
    fn encode_struct(
        &mut self,
        value: &dyn Struct,
        tag_info: &'static TypeInfo,
        tagged: bool,
    ) -> Result<(), FormatError> {
        let own_info = value.reflect_type_info();
        let Some(info) = own_info.as_struct() else {
            return Err(self.not_serializable(own_info));
        };

        let mut object = self.open(tag_info, tagged);
        for (index, field) in info.iter().enumerate() {
            let name = normalize_member_name(field.name());
            if is_envelope_key(name) {
                return Err(FormatError::ReservedKey {
                    path: self.path(),
                    key: name.to_owned(),
                });
            }
            if object.contains_key(name) {
                continue;
            }
            let Some(member) = value.field_at(index) else {
                continue;
            };
            let json = self.encode_child(format!(".{name}"), member, Some(field.type_info()))?;
            object.insert(name.to_owned(), json);
        }

        self.commit(Value::Object(object))
    }
}
