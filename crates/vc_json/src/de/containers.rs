use serde_json::Value;
use vc_reflect::Instance;
use vc_reflect::info::{ArrayInfo, MapInfo, TypeInfo};
use vc_reflect::ops::ReflectMut;

use super::Placement;
use super::decoder::Decoder;
use crate::FormatError;
use crate::path::{Gather, Slot};
use crate::ser::erased_type;
use crate::value::{COMPARER_KEY, LOWER_BOUNDS_KEY, PAIR_KEY, PAIR_VALUE, kind_name};

static NULL: Value = Value::Null;

// -----------------------------------------------------------------------------
// Lists

impl Decoder<'_, '_> {
    pub(super) fn decode_list(
        &mut self,
        payload: &Value,
        target: &'static TypeInfo,
        item_info: &'static TypeInfo,
        placement: Placement,
    ) -> Result<(), FormatError> {
        let Some(nodes) = payload.as_array() else {
            return Err(self.unexpected("an array", payload));
        };

        let items = Gather::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            self.scoped(format!("[{index}]"), items.pusher(), |this| {
                this.decode(node, Some(item_info))
            })?;
        }

        let mut value = self.default_of(target)?;
        let ReflectMut::List(list) = value.reflect_mut() else {
            return Err(self.not_serializable(target));
        };
        for item in items.take() {
            list.push(item).map_err(|source| self.reflect_error(source))?;
        }
        self.commit_value(value, placement)
    }
}

// -----------------------------------------------------------------------------
// Maps

impl Decoder<'_, '_> {
    /// Installs the comparer, decodes every pair, then inserts them.
    pub(super) fn decode_map(
        &mut self,
        node: &Value,
        payload: &Value,
        target: &'static TypeInfo,
        info: &MapInfo,
        placement: Placement,
    ) -> Result<(), FormatError> {
        let Some(pairs) = payload.as_array() else {
            return Err(self.unexpected("an array of pairs", payload));
        };

        let comparer = match node.as_object().and_then(|object| object.get(COMPARER_KEY)) {
            Some(comparer) => {
                let slot = Slot::new();
                self.scoped(format!(".{COMPARER_KEY}"), slot.setter(), |this| {
                    this.decode(comparer, Some(erased_type()))
                })?;
                slot.take().flatten()
            }
            None => None,
        };

        let keys = Gather::with_capacity(pairs.len());
        let values = Gather::with_capacity(pairs.len());
        for (index, pair) in pairs.iter().enumerate() {
            let Some(record) = pair.as_object() else {
                return Err(FormatError::UnexpectedShape {
                    path: format!("{}[{index}]", self.path()),
                    expected: "a pair record",
                    found: kind_name(pair),
                });
            };
            let key = record.get(PAIR_KEY).unwrap_or(&NULL);
            self.scoped(format!("[{index}].{PAIR_KEY}"), keys.pusher(), |this| {
                this.decode(key, Some(info.key_info()))
            })?;
            let value = record.get(PAIR_VALUE).unwrap_or(&NULL);
            self.scoped(format!("[{index}].{PAIR_VALUE}"), values.pusher(), |this| {
                this.decode(value, Some(info.value_info()))
            })?;
        }

        let mut value = self.default_of(target)?;
        let ReflectMut::Map(map) = value.reflect_mut() else {
            return Err(self.not_serializable(target));
        };
        map.set_comparer(comparer)
            .map_err(|source| self.reflect_error(source))?;
        for (key, item) in keys.take().into_iter().zip(values.take()) {
            map.insert(key, item)
                .map_err(|source| self.reflect_error(source))?;
        }
        self.commit_value(value, placement)
    }
}

// -----------------------------------------------------------------------------
// Arrays

/// The shape read from a nested array node.
struct Grid {
    lengths: Vec<usize>,
    lower_bounds: Vec<isize>,
}

/// Decoded cells and their indices, in row-major order.
struct Cells {
    values: Gather<Instance>,
    indices: Vec<Vec<isize>>,
}

impl Decoder<'_, '_> {
    /// Infers the lengths from the first element of each level, for exactly
    /// the rank of the type, then fills the array cell by cell.
    pub(super) fn decode_array(
        &mut self,
        node: &Value,
        payload: &Value,
        target: &'static TypeInfo,
        info: &ArrayInfo,
        placement: Placement,
    ) -> Result<(), FormatError> {
        let rank = info.rank();
        let lengths = self.infer_lengths(payload, rank)?;
        let grid = Grid {
            lower_bounds: self.read_lower_bounds(node, &lengths)?,
            lengths,
        };

        // Inferred lengths are unchecked until every level is decoded.
        let mut cells = Cells {
            values: Gather::new(),
            indices: Vec::new(),
        };
        let mut index = Vec::with_capacity(rank);
        self.decode_level(payload, info.item_info(), &grid, &mut index, &mut cells)?;

        let mut value = self.default_of(target)?;
        let ReflectMut::Array(array) = value.reflect_mut() else {
            return Err(self.not_serializable(target));
        };
        array
            .reshape(&grid.lengths, &grid.lower_bounds)
            .map_err(|source| self.reflect_error(source))?;
        for (index, cell) in cells.indices.iter().zip(cells.values.take()) {
            array
                .set_at(index, cell)
                .map_err(|source| self.reflect_error(source))?;
        }
        self.commit_value(value, placement)
    }

    fn infer_lengths(&self, payload: &Value, rank: usize) -> Result<Vec<usize>, FormatError> {
        let mut lengths = Vec::with_capacity(rank);
        let mut level = Some(payload);
        for dimension in 0..rank {
            let Some(current) = level else {
                lengths.push(0);
                continue;
            };
            let Some(items) = current.as_array() else {
                return Err(FormatError::RankMismatch {
                    path: self.path(),
                    expected: rank,
                    found: dimension,
                });
            };
            lengths.push(items.len());
            level = items.first();
        }
        Ok(lengths)
    }

    /// Every `bound + length` must fit in an `isize`.
    fn read_lower_bounds(
        &self,
        node: &Value,
        lengths: &[usize],
    ) -> Result<Vec<isize>, FormatError> {
        let rank = lengths.len();
        let Some(bounds) = node.as_object().and_then(|object| object.get(LOWER_BOUNDS_KEY)) else {
            return Ok(vec![0; rank]);
        };
        let Some(bounds) = bounds.as_array() else {
            return Err(self.unexpected("an array of lower bounds", bounds));
        };
        if bounds.len() != rank {
            return Err(FormatError::RankMismatch {
                path: self.path(),
                expected: rank,
                found: bounds.len(),
            });
        }
        bounds
            .iter()
            .zip(lengths)
            .map(|(bound, &length)| {
                let value = bound
                    .as_i64()
                    .and_then(|bound| isize::try_from(bound).ok())
                    .ok_or_else(|| self.unexpected("an integer lower bound", bound))?;
                match value.checked_add_unsigned(length) {
                    Some(_) => Ok(value),
                    None => Err(self.unexpected("a lower bound within the index range", bound)),
                }
            })
            .collect()
    }

    /// Decodes dimension `index.len()` with the outer indices fixed.
    fn decode_level(
        &mut self,
        level: &Value,
        item_info: &'static TypeInfo,
        grid: &Grid,
        index: &mut Vec<isize>,
        cells: &mut Cells,
    ) -> Result<(), FormatError> {
        let dimension = index.len();
        let Some(&length) = grid.lengths.get(dimension) else {
            return Ok(());
        };
        let Some(items) = level.as_array() else {
            return Err(FormatError::RankMismatch {
                path: self.path(),
                expected: grid.lengths.len(),
                found: dimension,
            });
        };
        if items.len() != length {
            return Err(FormatError::RaggedArray { path: self.path() });
        }
        let lower_bound = grid.lower_bounds[dimension];
        let innermost = dimension + 1 == grid.lengths.len();

        for (offset, item) in items.iter().enumerate() {
            let Some(at) = lower_bound.checked_add_unsigned(offset) else {
                return Err(FormatError::RaggedArray { path: self.path() });
            };
            index.push(at);
            let result = if innermost {
                cells.indices.push(index.clone());
                self.scoped(format!("[{at}]"), cells.values.pusher(), |this| {
                    this.decode(item, Some(item_info))
                })
            } else {
                self.scoped(format!("[{at}]"), |_| {}, |this| {
                    this.decode_level(item, item_info, grid, index, cells)?;
                    this.commit(None)
                })
            };
            index.pop();
            result?;
        }
        Ok(())
    }
}
