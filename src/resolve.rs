//! Path resolution over the YAML view of a config.
//!
//! A path is a non-empty sequence of field names joined by `.`. Each segment
//! is matched case-insensitively against the keys of the current mapping; the
//! first key that matches wins. `#[serde(flatten)]` fields already sit at
//! their parent's level in the YAML view, so embedded members resolve without
//! a segment of their own.

use serde_yaml::Value as Yaml;
use tracing::trace;

use crate::error::ConfpathError;

fn key_matches(key: &Yaml, segment: &str) -> bool {
    key.as_str().is_some_and(|k| k.to_lowercase() == segment)
}

/// Lowercase each segment and reject empty ones.
fn segments(path: &str) -> Result<Vec<String>, ConfpathError> {
    let segments: Vec<String> = path.split('.').map(str::to_lowercase).collect();
    if segments.iter().any(String::is_empty) {
        return Err(ConfpathError::UnknownKey(path.to_string()));
    }
    Ok(segments)
}

/// Walk `tree` along `path`. Returns the canonical (lowercased) path and the
/// node it names.
pub(crate) fn resolve<'a>(tree: &'a Yaml, path: &str) -> Result<(String, &'a Yaml), ConfpathError> {
    let segments = segments(path)?;
    let mut current = tree;
    for (depth, segment) in segments.iter().enumerate() {
        let map = match current {
            Yaml::Mapping(map) => map,
            Yaml::Null if depth > 0 => {
                return Err(ConfpathError::NullIndirection {
                    path: segments[..depth].join("."),
                });
            }
            _ => return Err(ConfpathError::UnknownKey(path.to_string())),
        };
        current = map
            .iter()
            .find(|(k, _)| key_matches(k, segment))
            .map(|(_, v)| v)
            .ok_or_else(|| ConfpathError::UnknownKey(path.to_string()))?;
    }
    Ok((segments.join("."), current))
}

/// Mutable counterpart of [`resolve`].
pub(crate) fn resolve_mut<'a>(
    tree: &'a mut Yaml,
    path: &str,
) -> Result<(String, &'a mut Yaml), ConfpathError> {
    let segments = segments(path)?;
    let mut current = tree;
    for (depth, segment) in segments.iter().enumerate() {
        let map = match current {
            Yaml::Mapping(map) => map,
            Yaml::Null if depth > 0 => {
                return Err(ConfpathError::NullIndirection {
                    path: segments[..depth].join("."),
                });
            }
            _ => return Err(ConfpathError::UnknownKey(path.to_string())),
        };
        current = map
            .iter_mut()
            .find(|(k, _)| key_matches(k, segment))
            .map(|(_, v)| v)
            .ok_or_else(|| ConfpathError::UnknownKey(path.to_string()))?;
    }
    let canonical = segments.join(".");
    trace!(path, canonical, "path resolved for update");
    Ok((canonical, current))
}
