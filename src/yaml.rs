//! YAML documents in and out of a config.
//!
//! Reading overlays a document on the config's current values: keys the
//! document does not mention keep what they had, and document keys match
//! field names case-insensitively. Writing emits only what the schema can
//! address: keys are lowercased, unsupported fields are left out, and empty
//! records and unset optional sections are omitted entirely.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value as Yaml};
use tracing::debug;

use crate::error::ConfpathError;
use crate::merge::deep_merge;
use crate::schema::{self, Slot};
use crate::validate;
use crate::value::Value;

/// Origin reported in errors for documents that do not come from a file.
const STREAM: &str = "<stream>";

/// Read a YAML document from `reader` into `config`.
///
/// Keys the config does not know are ignored; see [`read_strict`] to reject
/// them instead.
pub fn read<R, C>(reader: R, config: &mut C) -> Result<(), ConfpathError>
where
    R: io::Read,
    C: Serialize + DeserializeOwned,
{
    read_from(reader, config, false, Path::new(STREAM))
}

/// Like [`read`], but fails with [`ConfpathError::UnknownKeys`] if the
/// document has keys the config does not consume.
pub fn read_strict<R, C>(reader: R, config: &mut C) -> Result<(), ConfpathError>
where
    R: io::Read,
    C: Serialize + DeserializeOwned,
{
    read_from(reader, config, true, Path::new(STREAM))
}

/// Write `config` as a sanitized YAML document.
pub fn write<W, C>(writer: W, config: &C) -> Result<(), ConfpathError>
where
    W: io::Write,
    C: Serialize + ?Sized,
{
    let doc = sanitized(config)?;
    serde_yaml::to_writer(writer, &doc)?;
    Ok(())
}

/// Render `config` as the same document [`write`] produces.
pub fn to_string<C: Serialize + ?Sized>(config: &C) -> Result<String, ConfpathError> {
    let doc = sanitized(config)?;
    Ok(serde_yaml::to_string(&doc)?)
}

pub(crate) fn read_from<R, C>(
    mut reader: R,
    config: &mut C,
    strict: bool,
    origin: &Path,
) -> Result<(), ConfpathError>
where
    R: io::Read,
    C: Serialize + DeserializeOwned,
{
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| ConfpathError::IoError {
            path: origin.to_path_buf(),
            source,
        })?;
    apply_document(&text, config, strict, origin)
}

/// Overlay the document in `text` onto `config`.
pub(crate) fn apply_document<C>(
    text: &str,
    config: &mut C,
    strict: bool,
    origin: &Path,
) -> Result<(), ConfpathError>
where
    C: Serialize + DeserializeOwned,
{
    let parse_error = |source| ConfpathError::ParseError {
        path: origin.to_path_buf(),
        source,
    };

    if is_blank(text) {
        return Ok(());
    }
    let doc: Yaml = serde_yaml::from_str(text).map_err(parse_error)?;
    if doc.is_null() {
        return Ok(());
    }

    let merged = deep_merge(serde_yaml::to_value(&*config)?, doc);
    let updated: C = if strict {
        validate::deserialize_strict(merged, text, origin)?
    } else {
        serde_yaml::from_value(merged).map_err(parse_error)?
    };
    *config = updated;
    debug!(origin = %origin.display(), strict, "config document applied");
    Ok(())
}

/// True for a document with nothing but comments and markers.
fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// The config's YAML tree reduced to the keys the schema lists as leaves.
fn sanitized<C: Serialize + ?Sized>(config: &C) -> Result<Yaml, ConfpathError> {
    let fields = schema::fields(config)?;
    let leaves: HashMap<&str, &Value> = fields
        .iter()
        .filter_map(|f| match &f.slot {
            Slot::Leaf(value) => Some((f.path.as_str(), value)),
            Slot::Absent | Slot::Unsupported(_) => None,
        })
        .collect();
    let tree = serde_yaml::to_value(config)?;
    Ok(prune(tree, "", &leaves).unwrap_or_else(|| Yaml::Mapping(Mapping::new())))
}

fn prune(node: Yaml, path: &str, leaves: &HashMap<&str, &Value>) -> Option<Yaml> {
    match node {
        Yaml::Mapping(map) => {
            let mut out = Mapping::new();
            for (key, value) in map {
                let Some(key) = key.as_str().map(str::to_lowercase) else {
                    continue;
                };
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                if let Some(value) = prune(value, &child, leaves) {
                    out.insert(Yaml::String(key), value);
                }
            }
            (!out.is_empty()).then_some(Yaml::Mapping(out))
        }
        // serde_yaml widens f32 to f64 digit for digit; the schema kept the
        // declared width.
        leaf => match leaves.get(path)? {
            value @ Value::F32(_) => Some(value.to_yaml()),
            _ => Some(leaf),
        },
    }
}
