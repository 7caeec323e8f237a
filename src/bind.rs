//! Reading and writing single fields by path.
//!
//! Every mutation goes through the same steps:
//!
//! 1. Introspect the config to learn each leaf's declared [`Kind`].
//! 2. Serialize the config into a YAML tree and resolve the path in it.
//! 3. Build the new leaf value (exact-kind check or string parse).
//! 4. Write it into the tree and deserialize the whole tree back.
//!
//! The caller's value is only replaced once step 4 succeeds, so a failing
//! operation never leaves the config half-updated.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value as Yaml;
use tracing::debug;

use crate::assign::Assignment;
use crate::error::ConfpathError;
use crate::resolve::{resolve, resolve_mut};
use crate::schema::{self, Field, Slot};
use crate::types::Kind;
use crate::value::Value;

/// Set the field at `path` to `value`.
///
/// The value's kind must be exactly the field's declared kind: an `i32` does
/// not go into an `i64` field, and an `i64` does not go into a
/// [`Duration`](crate::Duration) field.
///
/// ```
/// # use serde::{Deserialize, Serialize};
/// #[derive(Serialize, Deserialize, Default)]
/// struct Config { port: u16 }
///
/// let mut config = Config::default();
/// confpath::set(&mut config, "port", 8080u16).unwrap();
/// assert_eq!(config.port, 8080);
/// assert!(confpath::set(&mut config, "port", 8080i64).is_err());
/// ```
pub fn set<C, V>(config: &mut C, path: &str, value: V) -> Result<(), ConfpathError>
where
    C: Serialize + DeserializeOwned,
    V: Into<Value>,
{
    let value = value.into();
    bind(config, path, |canonical, kind| {
        if value.kind() == kind {
            Ok(value)
        } else {
            Err(ConfpathError::TypeMismatch {
                path: canonical.to_string(),
                expected: kind,
                actual: value.kind(),
            })
        }
    })
}

/// Parse `text` according to the declared kind of the field at `path`, then
/// set it. See [`Value::parse`] for the accepted forms.
pub fn set_from_str<C>(config: &mut C, path: &str, text: &str) -> Result<(), ConfpathError>
where
    C: Serialize + DeserializeOwned,
{
    bind(config, path, |canonical, kind| {
        Value::parse(kind, text).map_err(|source| ConfpathError::InvalidValue {
            path: canonical.to_string(),
            source,
        })
    })
}

/// Apply a `path=value` expression with [`set_from_str`].
pub fn assign<C>(config: &mut C, expr: &str) -> Result<(), ConfpathError>
where
    C: Serialize + DeserializeOwned,
{
    let assignment: Assignment = expr.parse()?;
    set_from_str(config, &assignment.path, &assignment.value)
}

/// Read the leaf at `path`.
pub fn get<C: Serialize + ?Sized>(config: &C, path: &str) -> Result<Value, ConfpathError> {
    let fields = schema::fields(config)?;
    let tree = serde_yaml::to_value(config)?;
    let (canonical, node) = resolve(&tree, path)?;
    leaf(&fields, &canonical, node).cloned()
}

/// Read whatever sits at `path`, including whole sub-records, as a `T`.
pub fn get_as<T, C>(config: &C, path: &str) -> Result<T, ConfpathError>
where
    T: DeserializeOwned,
    C: Serialize + ?Sized,
{
    let tree = serde_yaml::to_value(config)?;
    let (_, node) = resolve(&tree, path)?;
    Ok(serde_yaml::from_value(node.clone())?)
}

/// Like [`set`], but panics on failure.
pub fn must_set<C, V>(config: &mut C, path: &str, value: V)
where
    C: Serialize + DeserializeOwned,
    V: Into<Value>,
{
    if let Err(e) = set(config, path, value) {
        panic!("{e}");
    }
}

/// Like [`set_from_str`], but panics on failure.
pub fn must_set_from_str<C>(config: &mut C, path: &str, text: &str)
where
    C: Serialize + DeserializeOwned,
{
    if let Err(e) = set_from_str(config, path, text) {
        panic!("{e}");
    }
}

/// Like [`assign`], but panics on failure.
pub fn must_assign<C>(config: &mut C, expr: &str)
where
    C: Serialize + DeserializeOwned,
{
    if let Err(e) = assign(config, expr) {
        panic!("{e}");
    }
}

fn bind<C, F>(config: &mut C, path: &str, make: F) -> Result<(), ConfpathError>
where
    C: Serialize + DeserializeOwned,
    F: FnOnce(&str, Kind) -> Result<Value, ConfpathError>,
{
    let fields = schema::fields(config)?;
    let mut tree = serde_yaml::to_value(&*config)?;
    let (canonical, slot) = resolve_mut(&mut tree, path)?;
    let kind = leaf(&fields, &canonical, slot)?.kind();
    let value = make(&canonical, kind)?;
    *slot = value.to_yaml();

    let updated: C = serde_yaml::from_value(tree).map_err(|source| ConfpathError::Rejected {
        path: canonical.clone(),
        source,
    })?;
    *config = updated;
    debug!(path = %canonical, %value, "config value set");
    Ok(())
}

/// Look up the schema entry for a resolved path, turning everything that is
/// not a settable leaf into the matching error.
fn leaf<'a>(fields: &'a [Field], path: &str, node: &Yaml) -> Result<&'a Value, ConfpathError> {
    match schema::find(fields, path).map(|f| &f.slot) {
        Some(Slot::Leaf(value)) => Ok(value),
        Some(Slot::Absent) => Err(ConfpathError::NullIndirection {
            path: path.to_string(),
        }),
        Some(Slot::Unsupported(ty)) => Err(ConfpathError::UnsupportedType {
            path: path.to_string(),
            ty: ty.to_string(),
        }),
        None => Err(ConfpathError::UnsupportedType {
            path: path.to_string(),
            ty: describe(node).to_string(),
        }),
    }
}

fn describe(node: &Yaml) -> &'static str {
    match node {
        Yaml::Mapping(_) => "struct",
        Yaml::Sequence(_) => "Vec",
        Yaml::Tagged(_) => "enum",
        Yaml::Null => "Option",
        Yaml::Bool(_) | Yaml::Number(_) | Yaml::String(_) => "value",
    }
}
