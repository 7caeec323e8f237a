use std::fmt;

/// The declared kind of a settable leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `bool`, set from `true`/`yes`/`y`/`on` and their negations.
    Bool,
    I8,
    I16,
    I32,
    /// Also covers `isize`, which serde serializes as 64-bit.
    I64,
    U8,
    U16,
    U32,
    /// Also covers `usize`, which serde serializes as 64-bit.
    U64,
    F32,
    F64,
    String,
    /// [`Duration`](crate::Duration), distinct from `I64` even though both
    /// hold 64-bit integers.
    Duration,
    /// `Vec<String>`. An empty `Vec` of any element type also reports this
    /// kind, since serde does not reveal the element type of an empty list.
    StringList,
}

impl Kind {
    /// The Rust type name shown in settings listings.
    pub fn type_name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::String => "String",
            Kind::Duration => "Duration",
            Kind::StringList => "Vec<String>",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A settable configuration path, as listed by [`settings()`](crate::settings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    /// Canonical dotted path: lowercased field names joined by `.`.
    pub path: String,
    pub kind: Kind,
    /// The current value rendered for display, or empty if it is the kind's
    /// zero value.
    pub default: String,
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}
