use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;

use thiserror::Error;

use crate::types::Kind;

#[derive(Debug, Error)]
pub enum ConfpathError {
    #[error("unknown config key: {0:?}")]
    UnknownKey(String),

    #[error("config key {path:?} passes through an unset optional value")]
    NullIndirection { path: String },

    #[error("cannot assign {actual} to {path:?} of type {expected}")]
    TypeMismatch {
        path: String,
        expected: Kind,
        actual: Kind,
    },

    #[error("invalid value for {path:?}: {source}")]
    InvalidValue { path: String, source: ValueError },

    #[error("unsupported field type: {ty}")]
    UnsupportedType { path: String, ty: String },

    #[error("invalid assignment expression: {0:?}")]
    InvalidAssignment(String),

    #[error("value for {path:?} was rejected by the config type: {source}")]
    Rejected {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownYamlKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in config file")]
    UnknownKeys(Vec<ConfpathError>),

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("config did not serialize: {0}")]
    Serialize(String),
}

impl ConfpathError {
    /// True for an I/O error whose cause is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ConfpathError::IoError { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// Why a string could not be parsed as a value of a field's kind.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("invalid boolean string: {0:?}")]
    Bool(String),

    #[error(transparent)]
    Int(#[from] ParseIntError),

    #[error(transparent)]
    Float(#[from] ParseFloatError),

    #[error("{0:?} is out of range for f32")]
    FloatRange(String),

    #[error(transparent)]
    Duration(#[from] ParseDurationError),

    #[error("invalid string list: {0}")]
    List(#[from] serde_json::Error),
}

/// Why a string is not a valid [`Duration`](crate::Duration).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDurationError {
    #[error("invalid duration {0:?}")]
    Invalid(String),

    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },

    #[error("duration {0:?} out of range")]
    Overflow(String),
}
