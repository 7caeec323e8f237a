//! Typed leaf values and the per-kind string parser.
//!
//! A [`Value`] is what a leaf holds: one variant per [`Kind`]. Callers build
//! one through the `From` impls for a typed [`set`](crate::set), and the
//! string binder builds one with [`Value::parse`].
//!
//! | Kind | Accepted text |
//! |------|---------------|
//! | `bool` | `true`/`false`, `yes`/`no`, `y`/`n`, `on`/`off` (any case) |
//! | integers | base-10, range-checked against the field's width |
//! | `f32`/`f64` | decimal float at that precision |
//! | `String` | the text verbatim |
//! | `Duration` | e.g. `1h30m`, `10h9m8.007006005s` |
//! | `Vec<String>` | empty text, a JSON string array, or a single item |

use std::fmt;

use serde_yaml::Value as Yaml;

use crate::duration::Duration;
use crate::error::ValueError;
use crate::types::Kind;

/// The current or new contents of a settable leaf, tagged with its kind.
///
/// `isize` and `usize` convert into [`Value::I64`] and [`Value::U64`], the
/// widths serde reports for them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    /// Written to YAML in its text form, e.g. `1m30s`.
    Duration(Duration),
    /// A `Vec<String>` field.
    StringList(Vec<String>),
}

impl Value {
    /// The kind a field must declare to accept this value in [`set`](crate::set).
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::I8(_) => Kind::I8,
            Value::I16(_) => Kind::I16,
            Value::I32(_) => Kind::I32,
            Value::I64(_) => Kind::I64,
            Value::U8(_) => Kind::U8,
            Value::U16(_) => Kind::U16,
            Value::U32(_) => Kind::U32,
            Value::U64(_) => Kind::U64,
            Value::F32(_) => Kind::F32,
            Value::F64(_) => Kind::F64,
            Value::String(_) => Kind::String,
            Value::Duration(_) => Kind::Duration,
            Value::StringList(_) => Kind::StringList,
        }
    }

    /// Parse `text` as a value of `kind`.
    pub fn parse(kind: Kind, text: &str) -> Result<Value, ValueError> {
        Ok(match kind {
            Kind::Bool => Value::Bool(parse_bool(text)?),
            Kind::I8 => Value::I8(text.parse()?),
            Kind::I16 => Value::I16(text.parse()?),
            Kind::I32 => Value::I32(text.parse()?),
            Kind::I64 => Value::I64(text.parse()?),
            Kind::U8 => Value::U8(text.parse()?),
            Kind::U16 => Value::U16(text.parse()?),
            Kind::U32 => Value::U32(text.parse()?),
            Kind::U64 => Value::U64(text.parse()?),
            Kind::F32 => Value::F32(parse_f32(text)?),
            Kind::F64 => Value::F64(text.parse()?),
            Kind::String => Value::String(text.to_string()),
            Kind::Duration => Value::Duration(text.parse()?),
            Kind::StringList => Value::StringList(parse_list(text)?),
        })
    }

    /// True if this is the zero value of its kind.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Bool(v) => !v,
            Value::I8(v) => *v == 0,
            Value::I16(v) => *v == 0,
            Value::I32(v) => *v == 0,
            Value::I64(v) => *v == 0,
            Value::U8(v) => *v == 0,
            Value::U16(v) => *v == 0,
            Value::U32(v) => *v == 0,
            Value::U64(v) => *v == 0,
            Value::F32(v) => *v == 0.0,
            Value::F64(v) => *v == 0.0,
            Value::String(v) => v.is_empty(),
            Value::Duration(v) => v.is_zero(),
            Value::StringList(v) => v.is_empty(),
        }
    }

    /// Rendering used as a setting's default text: empty for zero values.
    pub(crate) fn default_text(&self) -> String {
        if self.is_zero() {
            String::new()
        } else {
            self.to_string()
        }
    }

    pub(crate) fn to_yaml(&self) -> Yaml {
        match self {
            Value::Bool(v) => Yaml::Bool(*v),
            Value::I8(v) => Yaml::Number(i64::from(*v).into()),
            Value::I16(v) => Yaml::Number(i64::from(*v).into()),
            Value::I32(v) => Yaml::Number(i64::from(*v).into()),
            Value::I64(v) => Yaml::Number((*v).into()),
            Value::U8(v) => Yaml::Number(u64::from(*v).into()),
            Value::U16(v) => Yaml::Number(u64::from(*v).into()),
            Value::U32(v) => Yaml::Number(u64::from(*v).into()),
            Value::U64(v) => Yaml::Number((*v).into()),
            Value::F32(v) => Yaml::Number(f32_as_f64(*v).into()),
            Value::F64(v) => Yaml::Number((*v).into()),
            Value::String(v) => Yaml::String(v.clone()),
            Value::Duration(v) => Yaml::String(v.to_string()),
            Value::StringList(v) => {
                Yaml::Sequence(v.iter().cloned().map(Yaml::String).collect())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::I8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Duration(v) => write!(f, "{v}"),
            Value::StringList(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item:?}")?;
                }
                f.write_str("]")
            }
        }
    }
}

fn parse_bool(text: &str) -> Result<bool, ValueError> {
    match text.to_lowercase().as_str() {
        "true" | "yes" | "y" | "on" => Ok(true),
        "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(ValueError::Bool(text.to_string())),
    }
}

fn parse_f32(text: &str) -> Result<f32, ValueError> {
    let v: f32 = text.parse()?;
    let literal_inf = text
        .trim_start_matches(['+', '-'])
        .to_ascii_lowercase()
        .starts_with("inf");
    if v.is_infinite() && !literal_inf {
        return Err(ValueError::FloatRange(text.to_string()));
    }
    Ok(v)
}

/// Widen through the shortest decimal form, so `0.1f32` becomes `0.1` rather
/// than `0.10000000149011612`.
pub(crate) fn f32_as_f64(v: f32) -> f64 {
    v.to_string().parse().unwrap_or(f64::from(v))
}

/// Empty text is an empty list, text starting with `[` is a JSON string
/// array, anything else is a single item.
fn parse_list(text: &str) -> Result<Vec<String>, ValueError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    if text.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(text)?);
    }
    Ok(vec![text.to_string()])
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    Duration => Duration,
    Vec<String> => StringList,
}

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::I64(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::U64(v as u64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::StringList(v.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Value {
    fn from(v: &[&str]) -> Self {
        Value::StringList(v.iter().map(|s| s.to_string()).collect())
    }
}
