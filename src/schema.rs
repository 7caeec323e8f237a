//! Schema introspection: a custom serde `Serializer` that walks a config value
//! and records every leaf position with its declared kind.
//!
//! serde's data model stands in for runtime reflection. Each `serialize_*`
//! call tells us the declared type of the field being visited, so an `i8`
//! field and an `i64` field stay distinct even though YAML would not keep them
//! apart. [`Duration`] is recognised by its reserved newtype-struct name.
//!
//! Records (`struct`s and string-keyed maps) extend the path with the
//! lowercased field name. A `#[serde(flatten)]` field serializes its members
//! straight into the parent, so embedded structs contribute their leaves at
//! the parent's path without a segment of their own.

use serde::Serialize;
use serde::ser;

use crate::duration::{DURATION_TOKEN, Duration};
use crate::error::ConfpathError;
use crate::types::Setting;
use crate::value::Value;

/// What sits at a leaf position.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Slot {
    Leaf(Value),
    /// `Option::None`: no sub-tree to descend into.
    Absent,
    /// Present but not settable; carries a type description.
    Unsupported(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Field {
    pub path: String,
    pub slot: Slot,
}

/// List the settable paths of `config`, depth-first in declaration order.
///
/// Optional sub-trees that are currently `None` are skipped, as are fields of
/// kinds that cannot be set from a string (enums, tuples, non-string lists).
pub fn settings<C: Serialize + ?Sized>(config: &C) -> Result<Vec<Setting>, ConfpathError> {
    let settings = fields(config)?
        .into_iter()
        .filter_map(|field| match field.slot {
            Slot::Leaf(value) => Some(Setting {
                path: field.path,
                kind: value.kind(),
                default: value.default_text(),
            }),
            Slot::Absent | Slot::Unsupported(_) => None,
        })
        .collect();
    Ok(settings)
}

/// Record every leaf position of `config`, including absent and unsupported ones.
pub(crate) fn fields<C: Serialize + ?Sized>(config: &C) -> Result<Vec<Field>, ConfpathError> {
    let mut out = Vec::new();
    config
        .serialize(FieldSerializer {
            prefix: String::new(),
            out: &mut out,
        })
        .map_err(|e| ConfpathError::Serialize(e.0))?;
    Ok(out)
}

pub(crate) fn find<'a>(fields: &'a [Field], path: &str) -> Option<&'a Field> {
    fields.iter().find(|f| f.path == path)
}

#[derive(Debug)]
pub(crate) struct SchemaError(String);

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "schema error: {}", self.0)
    }
}

impl std::error::Error for SchemaError {}

impl ser::Error for SchemaError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        SchemaError(msg.to_string())
    }
}

fn dotted(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Serialize `value` on its own and return the single string it produced, if
/// that is all it produced.
fn probe_string<T: Serialize + ?Sized>(value: &T) -> Result<Option<String>, SchemaError> {
    let mut probe = Vec::new();
    value.serialize(FieldSerializer {
        prefix: String::new(),
        out: &mut probe,
    })?;
    Ok(match probe.pop() {
        Some(Field {
            path,
            slot: Slot::Leaf(Value::String(s)),
        }) if probe.is_empty() && path.is_empty() => Some(s),
        _ => None,
    })
}

struct FieldSerializer<'a> {
    prefix: String,
    out: &'a mut Vec<Field>,
}

impl FieldSerializer<'_> {
    fn push(self, slot: Slot) -> Result<(), SchemaError> {
        self.out.push(Field {
            path: self.prefix,
            slot,
        });
        Ok(())
    }

    fn leaf(self, value: Value) -> Result<(), SchemaError> {
        self.push(Slot::Leaf(value))
    }
}

impl<'a> ser::Serializer for FieldSerializer<'a> {
    type Ok = ();
    type Error = SchemaError;
    type SerializeSeq = SeqCollector<'a>;
    type SerializeTuple = SeqCollector<'a>;
    type SerializeTupleStruct = SeqCollector<'a>;
    type SerializeTupleVariant = Skip;
    type SerializeMap = MapCollector<'a>;
    type SerializeStruct = StructCollector<'a>;
    type SerializeStructVariant = Skip;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> Result<(), SchemaError> {
        self.leaf(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<(), SchemaError> {
        self.leaf(Value::I8(v))
    }

    fn serialize_i16(self, v: i16) -> Result<(), SchemaError> {
        self.leaf(Value::I16(v))
    }

    fn serialize_i32(self, v: i32) -> Result<(), SchemaError> {
        self.leaf(Value::I32(v))
    }

    fn serialize_i64(self, v: i64) -> Result<(), SchemaError> {
        self.leaf(Value::I64(v))
    }

    fn serialize_i128(self, _v: i128) -> Result<(), SchemaError> {
        self.push(Slot::Unsupported("i128"))
    }

    fn serialize_u8(self, v: u8) -> Result<(), SchemaError> {
        self.leaf(Value::U8(v))
    }

    fn serialize_u16(self, v: u16) -> Result<(), SchemaError> {
        self.leaf(Value::U16(v))
    }

    fn serialize_u32(self, v: u32) -> Result<(), SchemaError> {
        self.leaf(Value::U32(v))
    }

    fn serialize_u64(self, v: u64) -> Result<(), SchemaError> {
        self.leaf(Value::U64(v))
    }

    fn serialize_u128(self, _v: u128) -> Result<(), SchemaError> {
        self.push(Slot::Unsupported("u128"))
    }

    fn serialize_f32(self, v: f32) -> Result<(), SchemaError> {
        self.leaf(Value::F32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<(), SchemaError> {
        self.leaf(Value::F64(v))
    }

    fn serialize_char(self, _v: char) -> Result<(), SchemaError> {
        self.push(Slot::Unsupported("char"))
    }

    fn serialize_str(self, v: &str) -> Result<(), SchemaError> {
        self.leaf(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<(), SchemaError> {
        self.push(Slot::Unsupported("bytes"))
    }

    fn serialize_none(self) -> Result<(), SchemaError> {
        self.push(Slot::Absent)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<(), SchemaError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), SchemaError> {
        self.push(Slot::Unsupported("()"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<(), SchemaError> {
        self.push(Slot::Unsupported(name))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<(), SchemaError> {
        self.push(Slot::Unsupported(name))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<(), SchemaError> {
        if name != DURATION_TOKEN {
            return value.serialize(self);
        }
        let mut inner = Vec::new();
        value.serialize(FieldSerializer {
            prefix: String::new(),
            out: &mut inner,
        })?;
        match inner.pop() {
            Some(Field {
                slot: Slot::Leaf(Value::I64(nanos)),
                ..
            }) => self.leaf(Value::Duration(Duration::from_nanos(nanos))),
            _ => self.push(Slot::Unsupported("Duration")),
        }
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<(), SchemaError> {
        self.push(Slot::Unsupported(name))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqCollector<'a>, SchemaError> {
        Ok(SeqCollector {
            prefix: self.prefix,
            out: self.out,
            items: Vec::with_capacity(len.unwrap_or(0)),
            strings_only: true,
            tuple: false,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqCollector<'a>, SchemaError> {
        let mut seq = self.serialize_seq(Some(len))?;
        seq.tuple = true;
        Ok(seq)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqCollector<'a>, SchemaError> {
        self.serialize_tuple(len)
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Skip, SchemaError> {
        self.push(Slot::Unsupported(name))?;
        Ok(Skip)
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapCollector<'a>, SchemaError> {
        Ok(MapCollector {
            prefix: self.prefix,
            out: self.out,
            current_key: None,
            sorted: len.is_some(),
            entries: Vec::new(),
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<StructCollector<'a>, SchemaError> {
        Ok(StructCollector {
            prefix: self.prefix,
            out: self.out,
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Skip, SchemaError> {
        self.push(Slot::Unsupported(name))?;
        Ok(Skip)
    }
}

// --- Records ---

struct StructCollector<'a> {
    prefix: String,
    out: &'a mut Vec<Field>,
}

impl ser::SerializeStruct for StructCollector<'_> {
    type Ok = ();
    type Error = SchemaError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), SchemaError> {
        value.serialize(FieldSerializer {
            prefix: dotted(&self.prefix, &key.to_lowercase()),
            out: self.out,
        })
    }

    fn end(self) -> Result<(), SchemaError> {
        Ok(())
    }
}

/// Maps reach us from `#[serde(flatten)]` parents as well as from map-typed
/// fields. Entries whose key is not a string are not addressable and are
/// dropped.
///
/// Map-typed fields announce their length and are listed in key order, so a
/// `HashMap` lists the same way every run. Flatten parents serialize with an
/// unknown length and keep declaration order.
struct MapCollector<'a> {
    prefix: String,
    out: &'a mut Vec<Field>,
    current_key: Option<String>,
    sorted: bool,
    entries: Vec<(String, Vec<Field>)>,
}

impl ser::SerializeMap for MapCollector<'_> {
    type Ok = ();
    type Error = SchemaError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), SchemaError> {
        self.current_key = serde_yaml::to_value(key)
            .ok()
            .and_then(|k| k.as_str().map(str::to_lowercase));
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SchemaError> {
        let Some(key) = self.current_key.take() else {
            return Ok(());
        };
        let mut fields = Vec::new();
        value.serialize(FieldSerializer {
            prefix: dotted(&self.prefix, &key),
            out: &mut fields,
        })?;
        self.entries.push((key, fields));
        Ok(())
    }

    fn end(mut self) -> Result<(), SchemaError> {
        if self.sorted {
            self.entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        }
        for (_, fields) in self.entries {
            self.out.extend(fields);
        }
        Ok(())
    }
}

// --- Sequences ---

struct SeqCollector<'a> {
    prefix: String,
    out: &'a mut Vec<Field>,
    items: Vec<String>,
    strings_only: bool,
    tuple: bool,
}

impl SeqCollector<'_> {
    fn element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SchemaError> {
        if !self.strings_only {
            return Ok(());
        }
        match probe_string(value)? {
            Some(s) => self.items.push(s),
            None => self.strings_only = false,
        }
        Ok(())
    }

    fn finish(self) -> Result<(), SchemaError> {
        let slot = match (self.tuple, self.strings_only) {
            (true, _) => Slot::Unsupported("tuple"),
            (false, true) => Slot::Leaf(Value::StringList(self.items)),
            (false, false) => Slot::Unsupported("Vec"),
        };
        self.out.push(Field {
            path: self.prefix,
            slot,
        });
        Ok(())
    }
}

impl ser::SerializeSeq for SeqCollector<'_> {
    type Ok = ();
    type Error = SchemaError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SchemaError> {
        self.element(value)
    }

    fn end(self) -> Result<(), SchemaError> {
        self.finish()
    }
}

impl ser::SerializeTuple for SeqCollector<'_> {
    type Ok = ();
    type Error = SchemaError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SchemaError> {
        self.element(value)
    }

    fn end(self) -> Result<(), SchemaError> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SeqCollector<'_> {
    type Ok = ();
    type Error = SchemaError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SchemaError> {
        self.element(value)
    }

    fn end(self) -> Result<(), SchemaError> {
        self.finish()
    }
}

// --- Enum variants with payloads: recorded as unsupported, contents ignored ---

struct Skip;

impl ser::SerializeTupleVariant for Skip {
    type Ok = ();
    type Error = SchemaError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, _value: &T) -> Result<(), SchemaError> {
        Ok(())
    }

    fn end(self) -> Result<(), SchemaError> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for Skip {
    type Ok = ();
    type Error = SchemaError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _key: &'static str,
        _value: &T,
    ) -> Result<(), SchemaError> {
        Ok(())
    }

    fn end(self) -> Result<(), SchemaError> {
        Ok(())
    }
}
