//! Strict-mode validation: detect unknown keys in YAML documents.
//!
//! Uses `serde_ignored` to deserialize the merged tree into `C` and capture
//! any keys that `C` doesn't consume. Reports each unknown key with the
//! document's origin and a best-effort line number.
//!
//! Keys inside a `#[serde(flatten)]` field's parent are collected by serde
//! itself and never reach the callback, so they cannot be reported.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_yaml::Value;

use crate::error::ConfpathError;

/// Deserialize `tree` into `C`, failing if any key goes unused.
///
/// `source` is the document text the tree was built from; it is only used to
/// locate line numbers for the error report.
pub(crate) fn deserialize_strict<C: DeserializeOwned>(
    tree: Value,
    source: &str,
    origin: &Path,
) -> Result<C, ConfpathError> {
    let mut unknown_keys: Vec<String> = Vec::new();

    let config: C = serde_ignored::deserialize(tree, |ignored_path| {
        unknown_keys.push(ignored_path.to_string());
    })
    .map_err(|e| ConfpathError::ParseError {
        path: origin.to_path_buf(),
        source: e,
    })?;

    if unknown_keys.is_empty() {
        return Ok(config);
    }

    let errors: Vec<ConfpathError> = unknown_keys
        .into_iter()
        .map(|key| {
            let line = find_key_line(source, &key);
            ConfpathError::UnknownYamlKey {
                key,
                path: origin.to_path_buf(),
                line,
            }
        })
        .collect();

    Err(ConfpathError::UnknownKeys(errors))
}

/// Find the 1-indexed line number for a dotted key in block-style YAML.
///
/// Tracks the chain of enclosing `key:` lines by indentation and matches the
/// full chain against `dotted_key`, ignoring case. Flow mappings, sequence
/// items and multi-line scalars are not understood. Returns 0 if the key
/// cannot be located.
fn find_key_line(content: &str, dotted_key: &str) -> usize {
    let wanted: Vec<String> = dotted_key.split('.').map(str::to_lowercase).collect();
    let mut open: Vec<(usize, String)> = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("---") {
            continue;
        }
        let indent = line.len() - trimmed.len();
        let Some(key) = mapping_key(trimmed) else {
            continue;
        };

        while open.last().is_some_and(|(depth, _)| *depth >= indent) {
            open.pop();
        }
        open.push((indent, key.to_lowercase()));

        if open.len() == wanted.len() && open.iter().zip(&wanted).all(|((_, k), w)| k == w) {
            return i + 1;
        }
    }
    0
}

/// The key of a `key: value` or `key:` line, with surrounding quotes removed.
fn mapping_key(trimmed: &str) -> Option<&str> {
    if trimmed.starts_with('-') {
        return None;
    }
    let (key, rest) = trimmed.split_once(':')?;
    if !(rest.is_empty() || rest.starts_with(' ')) {
        return None;
    }
    let key = key.trim();
    let key = key
        .strip_prefix('"')
        .and_then(|k| k.strip_suffix('"'))
        .or_else(|| key.strip_prefix('\'').and_then(|k| k.strip_suffix('\'')))
        .unwrap_or(key);
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::TestConfig;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("/test/config.yaml")
    }

    fn strict(content: &str) -> Result<TestConfig, ConfpathError> {
        let tree: Value = serde_yaml::from_str(content).unwrap();
        deserialize_strict(tree, content, &path())
    }

    fn single_unknown(result: Result<TestConfig, ConfpathError>) -> (String, usize) {
        match result {
            Err(ConfpathError::UnknownKeys(keys)) => {
                assert_eq!(keys.len(), 1);
                match &keys[0] {
                    ConfpathError::UnknownYamlKey { key, line, .. } => (key.clone(), *line),
                    other => panic!("Expected UnknownYamlKey, got: {other:?}"),
                }
            }
            other => panic!("Expected UnknownKeys, got: {other:?}"),
        }
    }

    #[test]
    fn valid_config_passes() {
        let content = "foo:\n  key1: true\n  key11:\n  - a\nbar: 3\n";
        let config = strict(content).unwrap();
        assert!(config.foo.key1);
        assert_eq!(config.bar, 3);
    }

    #[test]
    fn unknown_top_level_key() {
        let (key, line) = single_unknown(strict("bar: 1\ntypo_key: 42\n"));
        assert_eq!(key, "typo_key");
        assert_eq!(line, 2);
    }

    #[test]
    fn unknown_nested_key() {
        let (key, line) = single_unknown(strict("baz:\n  quux:\n    key_a: x\n    typo: bad\n"));
        assert_eq!(key, "baz.quux.typo");
        assert_eq!(line, 4);
    }

    #[test]
    fn multiple_unknown_keys() {
        match strict("typo1: 1\ntypo2: 2\n") {
            Err(ConfpathError::UnknownKeys(keys)) => assert_eq!(keys.len(), 2),
            other => panic!("Expected UnknownKeys, got: {other:?}"),
        }
    }

    #[test]
    fn line_number_skips_comments_and_blanks() {
        let (_, line) = single_unknown(strict("bar: 1\n\n# comment\nfoo:\n  key1: true\nbad_key: 1\n"));
        assert_eq!(line, 6);
    }

    #[test]
    fn line_number_finds_correct_section_for_duplicate_leaf() {
        let content = "typo: 1\nbaz:\n  typo: 2\n";
        match strict(content) {
            Err(ConfpathError::UnknownKeys(keys)) => {
                let lines: Vec<(String, usize)> = keys
                    .iter()
                    .map(|k| match k {
                        ConfpathError::UnknownYamlKey { key, line, .. } => (key.clone(), *line),
                        other => panic!("Expected UnknownYamlKey, got: {other:?}"),
                    })
                    .collect();
                assert!(lines.contains(&("typo".to_string(), 1)));
                assert!(lines.contains(&("baz.typo".to_string(), 3)));
            }
            other => panic!("Expected UnknownKeys, got: {other:?}"),
        }
    }

    #[test]
    fn type_errors_name_the_origin() {
        match strict("bar: [1, 2]\n") {
            Err(ConfpathError::ParseError { path: p, .. }) => assert_eq!(p, path()),
            other => panic!("Expected ParseError, got: {other:?}"),
        }
    }

    #[test]
    fn mapping_key_extraction() {
        assert_eq!(mapping_key("key: value"), Some("key"));
        assert_eq!(mapping_key("key:"), Some("key"));
        assert_eq!(mapping_key("\"quoted\": 1"), Some("quoted"));
        assert_eq!(mapping_key("'single': 1"), Some("single"));
        assert_eq!(mapping_key("- item"), None);
        assert_eq!(mapping_key("url: http://x"), Some("url"));
        assert_eq!(mapping_key("http://x"), None);
    }

    #[test]
    fn unlocatable_key_reports_zero() {
        assert_eq!(find_key_line("{a: 1, typo: 2}", "typo"), 0);
    }
}
