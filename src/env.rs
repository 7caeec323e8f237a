use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::bind::set_from_str;
use crate::error::ConfpathError;

/// Apply environment variables named `{PREFIX}__*` to `config`.
///
/// Double underscore `__` separates nesting levels.
/// Single `_` within a segment is literal (part of the field name).
/// Segments are lowercased, so `MYAPP__BAZ__QUUX__KEY_A` sets `baz.quux.key_a`.
///
/// Values go through [`set_from_str`], so they follow the same per-kind parsing
/// as `-c path=value` flags. A variable that names no field is an error, and
/// on any error `config` is left as it was.
pub fn apply_env<C>(config: &mut C, prefix: &str) -> Result<(), ConfpathError>
where
    C: Serialize + DeserializeOwned,
{
    apply_env_from(config, prefix, std::env::vars())
}

/// Like [`apply_env`], but reads from `vars` instead of the process
/// environment, so tests can pass synthetic data.
pub fn apply_env_from<C>(
    config: &mut C,
    prefix: &str,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<(), ConfpathError>
where
    C: Serialize + DeserializeOwned,
{
    let assignments = env_assignments(prefix, vars);
    if assignments.is_empty() {
        return Ok(());
    }

    let mut scratch: C = serde_yaml::from_value(serde_yaml::to_value(&*config)?)?;
    for (path, value) in &assignments {
        set_from_str(&mut scratch, path, value)?;
    }
    *config = scratch;
    debug!(prefix, count = assignments.len(), "environment overlay applied");
    Ok(())
}

/// Collect `(dotted_path, value)` pairs for variables under `prefix`, sorted
/// by path so the outcome does not depend on environment order.
fn env_assignments(
    prefix: &str,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Vec<(String, String)> {
    let needle = format!("{prefix}__");
    let mut pairs: Vec<(String, String)> = vars
        .into_iter()
        .filter_map(|(key, value)| {
            let rest = key.strip_prefix(&needle)?;
            if rest.is_empty() {
                return None;
            }
            let path = rest
                .split("__")
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
                .join(".");
            Some((path, value))
        })
        .collect();
    pairs.sort();
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::Duration;
    use crate::fixtures::test::{TestConfig, layered_config};

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn simple_key() {
        let mut c = TestConfig::default();
        apply_env_from(&mut c, "MYAPP", vars(&[("MYAPP__BAR", "42")])).unwrap();
        assert_eq!(c.bar, 42);
    }

    #[test]
    fn nested_key_with_single_underscore() {
        let mut c = TestConfig::default();
        apply_env_from(&mut c, "MYAPP", vars(&[("MYAPP__BAZ__QUUX__KEY_A", "x")])).unwrap();
        assert_eq!(c.baz.quux.key_a, "x");
    }

    #[test]
    fn values_use_field_kind() {
        let mut c = TestConfig::default();
        apply_env_from(
            &mut c,
            "APP",
            vars(&[
                ("APP__FOO__KEY1", "yes"),
                ("APP__FOO__KEY10", "42"),
                ("APP__FOO__KEY11", r#"["a","b"]"#),
                ("APP__BAZ__INTERVAL", "90s"),
            ]),
        )
        .unwrap();
        assert!(c.foo.key1);
        assert_eq!(c.foo.key10, "42");
        assert_eq!(c.foo.key11, vec!["a", "b"]);
        assert_eq!(c.baz.interval, Duration::from_secs(90));
    }

    #[test]
    fn wrong_prefix_ignored() {
        let mut c = TestConfig::default();
        apply_env_from(
            &mut c,
            "MYAPP",
            vars(&[("OTHER__BAR", "1"), ("MYAPPBAR", "2"), ("MYAPP__", "3")]),
        )
        .unwrap();
        assert_eq!(c.bar, 0);
    }

    #[test]
    fn unknown_variable_fails_without_mutation() {
        let mut c = TestConfig::default();
        let result = apply_env_from(
            &mut c,
            "APP",
            vars(&[("APP__BAR", "5"), ("APP__NOPE", "1")]),
        );
        match result {
            Err(ConfpathError::UnknownKey(path)) => assert_eq!(path, "nope"),
            other => panic!("Expected UnknownKey, got {other:?}"),
        }
        assert_eq!(c.bar, 0);
    }

    #[test]
    fn bad_value_names_field() {
        let mut c = TestConfig::default();
        match apply_env_from(&mut c, "APP", vars(&[("APP__FOO__KEY5B", "300")])) {
            Err(ConfpathError::InvalidValue { path, .. }) => assert_eq!(path, "foo.key5b"),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn embedded_fields_addressed_at_parent_level() {
        let mut c = layered_config();
        apply_env_from(&mut c, "SVC", vars(&[("SVC__RETRIES", "7")])).unwrap();
        assert_eq!(c.common.retries, 7);
    }

    #[test]
    fn no_matching_vars_is_a_no_op() {
        let mut c = TestConfig::default();
        c.bar = 11;
        apply_env_from(&mut c, "APP", vars(&[])).unwrap();
        assert_eq!(c.bar, 11);
    }
}
