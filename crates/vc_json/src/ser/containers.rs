use serde_json::Value;
use vc_reflect::info::TypeInfo;
use vc_reflect::ops::{Array, List, Map, ReflectError};

use super::encoder::Encoder;
use super::erased_type;
use crate::FormatError;
use crate::path::{Gather, Slot};
use crate::value::{COMPARER_KEY, LOWER_BOUNDS_KEY, PAIR_KEY, PAIR_VALUE, VALUE_KEY, envelope};

// -----------------------------------------------------------------------------
// Lists

impl Encoder<'_, '_> {
    /// A bare array of elements, enveloped only when tagged.
    pub(super) fn encode_list(
        &mut self,
        list: &dyn List,
        tag_info: &'static TypeInfo,
        tagged: bool,
    ) -> Result<(), FormatError> {
        let item_info = match list.reflect_type_info() {
            TypeInfo::List(info) => info.item_info(),
            other => return Err(self.not_serializable(other)),
        };

        if !tagged {
            return self.encode_items(list, item_info);
        }
        let mut object = self.open(tag_info, true);
        let payload = Slot::new();
        self.scoped("", payload.setter(), |this| this.encode_items(list, item_info))?;
        object.insert(VALUE_KEY.to_owned(), payload.take().unwrap_or(Value::Null));
        self.commit(Value::Object(object))
    }

    fn encode_items(
        &mut self,
        list: &dyn List,
        item_info: &'static TypeInfo,
    ) -> Result<(), FormatError> {
        let items = Gather::with_capacity(list.len());
        for (index, item) in list.iter().enumerate() {
            self.scoped(format!("[{index}]"), items.pusher(), |this| {
                this.encode(item, Some(item_info))
            })?;
        }
        self.commit(Value::Array(items.take()))
    }
}

// -----------------------------------------------------------------------------
// Maps

impl Encoder<'_, '_> {
    /// An array of pair records.
    ///
    /// A map with a non-default comparer is always enveloped, the comparer
    /// is written before the pairs.
    pub(super) fn encode_map(
        &mut self,
        map: &dyn Map,
        tag_info: &'static TypeInfo,
        tagged: bool,
    ) -> Result<(), FormatError> {
        let (key_info, value_info) = match map.reflect_type_info() {
            TypeInfo::Map(info) => (info.key_info(), info.value_info()),
            other => return Err(self.not_serializable(other)),
        };
        let comparer = map.comparer();

        if comparer.is_none() && !tagged {
            return self.encode_pairs(map, key_info, value_info);
        }
        let mut object = self.open(tag_info, true);
        if let Some(comparer) = comparer {
            let json = self.encode_child(format!(".{COMPARER_KEY}"), comparer, Some(erased_type()))?;
            object.insert(COMPARER_KEY.to_owned(), json);
        }
        let payload = Slot::new();
        self.scoped("", payload.setter(), |this| {
            this.encode_pairs(map, key_info, value_info)
        })?;
        object.insert(VALUE_KEY.to_owned(), payload.take().unwrap_or(Value::Null));
        self.commit(Value::Object(object))
    }

    fn encode_pairs(
        &mut self,
        map: &dyn Map,
        key_info: &'static TypeInfo,
        value_info: &'static TypeInfo,
    ) -> Result<(), FormatError> {
        let pairs = Gather::with_capacity(map.len());
        for (index, (key, value)) in map.iter().enumerate() {
            self.scoped(format!("[{index}]"), pairs.pusher(), |this| {
                let mut record = envelope(this.path(), None);
                let key = this.encode_child(format!(".{PAIR_KEY}"), key, Some(key_info))?;
                record.insert(PAIR_KEY.to_owned(), key);
                let value = this.encode_child(format!(".{PAIR_VALUE}"), value, Some(value_info))?;
                record.insert(PAIR_VALUE.to_owned(), value);
                this.commit(Value::Object(record))
            })?;
        }
        self.commit(Value::Array(pairs.take()))
    }
}

// -----------------------------------------------------------------------------
// Arrays

impl Encoder<'_, '_> {
    /// Nested arrays, outermost dimension first.
    ///
    /// Enveloped when tagged or when any lower bound is non-zero; only then
    /// are the bounds written.
    pub(super) fn encode_array(
        &mut self,
        array: &dyn Array,
        tag_info: &'static TypeInfo,
        tagged: bool,
    ) -> Result<(), FormatError> {
        let item_info = match array.reflect_type_info() {
            TypeInfo::Array(info) => info.item_info(),
            other => return Err(self.not_serializable(other)),
        };
        let rank = array.rank();
        let shape = Shape {
            lengths: (0..rank).map(|d| array.length(d)).collect(),
            lower_bounds: (0..rank).map(|d| array.lower_bound(d)).collect(),
        };
        let mut index = Vec::with_capacity(rank);

        let bounded = shape.lower_bounds.as_slice().iter().any(|&bound| bound != 0);
        if !tagged && !bounded {
            return self.encode_level(array, item_info, &shape, &mut index);
        }

        let mut object = self.open(tag_info, true);
        if bounded {
            let bounds = shape
                .lower_bounds
                .as_slice()
                .iter()
                .map(|&bound| Value::from(bound))
                .collect();
            object.insert(LOWER_BOUNDS_KEY.to_owned(), Value::Array(bounds));
        }
        let payload = Slot::new();
        self.scoped("", payload.setter(), |this| {
            this.encode_level(array, item_info, &shape, &mut index)
        })?;
        object.insert(VALUE_KEY.to_owned(), payload.take().unwrap_or(Value::Null));
        self.commit(Value::Object(object))
    }

    /// Encodes dimension `index.len()` with the outer indices fixed.
    fn encode_level(
        &mut self,
        array: &dyn Array,
        item_info: &'static TypeInfo,
        shape: &Shape,
        index: &mut Vec<isize>,
    ) -> Result<(), FormatError> {
        let dimension = index.len();
        let Some(&length) = shape.lengths.as_slice().get(dimension) else {
            return self.commit(Value::Array(Vec::new()));
        };
        let lower_bound = shape.lower_bounds[dimension];
        let innermost = dimension + 1 == shape.lengths.len();

        let items = Gather::with_capacity(length);
        for offset in 0..length {
            let at = lower_bound + offset as isize;
            index.push(at);
            let result = self.scoped(format!("[{at}]"), items.pusher(), |this| {
                if !innermost {
                    return this.encode_level(array, item_info, shape, index);
                }
                match array.get(index.as_slice()) {
                    Some(cell) => this.encode(cell, Some(item_info)),
                    None => Err(this.reflect_error(ReflectError::IndexOutOfBounds {
                        index: index.clone(),
                    })),
                }
            });
            index.pop();
            result?;
        }
        self.commit(Value::Array(items.take()))
    }
}

struct Shape {
    lengths: Vec<usize>,
    lower_bounds: Vec<isize>,
}
