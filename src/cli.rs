//! Clap adapter for confpath.
//!
//! This module is the **optional integration layer** between confpath's
//! framework-agnostic core and the [clap](https://docs.rs/clap) CLI parser.
//! It is compiled only when the `clap` Cargo feature is enabled (on by
//! default).
//!
//! [`ConfigArgs`] is a clap derive type to `#[command(flatten)]` into your
//! parser. It adds two repeatable flags:
//!
//! - `-f, --config-file <FILE>` reads a YAML file into the config.
//! - `-c, --config <PATH=VALUE>` applies an assignment expression.
//!
//! [`ConfigArgs::apply`] runs all files, then all assignments. When the
//! relative order of `-f` and `-c` on the command line matters, use
//! [`apply_in_order`] on the raw [`ArgMatches`] instead; it handles each
//! occurrence in the order it was given, like a stateful flag callback would.
//!
//! [`with_settings_help`] appends the "Configuration settings:" listing to a
//! command's `--help` output.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{ArgMatches, Args, Command};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::assign::Assignment;
use crate::bind::set_from_str;
use crate::error::ConfpathError;
use crate::file::read_file;
use crate::usage::settings_help;

/// Clap-derived flags for loading and overriding configuration.
///
/// Embed this into your app's clap derive:
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     config: ConfigArgs,
/// }
/// ```
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Read config from YAML files.
    #[arg(short = 'f', long = "config-file", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Set config keys (path.to.key=value).
    #[arg(short = 'c', long = "config", value_name = "PATH=VALUE")]
    pub assignments: Vec<Assignment>,
}

impl ConfigArgs {
    /// Read every `-f` file in order, then apply every `-c` assignment in
    /// order. Stops at the first failure.
    pub fn apply<C>(&self, config: &mut C) -> Result<(), ConfpathError>
    where
        C: Serialize + DeserializeOwned,
    {
        for path in &self.files {
            read_file(path, config)?;
        }
        for a in &self.assignments {
            set_from_str(config, &a.path, &a.value)?;
        }
        Ok(())
    }
}

enum Occurrence<'a> {
    File(&'a PathBuf),
    Assign(&'a Assignment),
}

/// Apply the [`ConfigArgs`] flags found in `matches` in command-line order.
///
/// Failures are reported as clap value-validation errors naming the
/// offending flag value, so they surface the same way as parse errors.
pub fn apply_in_order<C>(matches: &ArgMatches, config: &mut C) -> Result<(), clap::Error>
where
    C: Serialize + DeserializeOwned,
{
    let mut occurrences: Vec<(usize, Occurrence<'_>)> = Vec::new();
    if let Ok(Some(files)) = matches.try_get_many::<PathBuf>("files")
        && let Some(indices) = matches.indices_of("files")
    {
        occurrences.extend(indices.zip(files.map(Occurrence::File)));
    }
    if let Ok(Some(assignments)) = matches.try_get_many::<Assignment>("assignments")
        && let Some(indices) = matches.indices_of("assignments")
    {
        occurrences.extend(indices.zip(assignments.map(Occurrence::Assign)));
    }
    occurrences.sort_by_key(|(index, _)| *index);

    for (_, occurrence) in occurrences {
        let (flag, raw, result) = match occurrence {
            Occurrence::File(path) => (
                "--config-file",
                path.display().to_string(),
                read_file(path, config),
            ),
            Occurrence::Assign(a) => (
                "--config",
                a.to_string(),
                set_from_str(config, &a.path, &a.value),
            ),
        };
        result.map_err(|e| flag_error(flag, &raw, &e))?;
    }
    Ok(())
}

/// Append the settings listing of `config` to the command's long help.
pub fn with_settings_help<C>(cmd: Command, config: &C) -> Result<Command, ConfpathError>
where
    C: Serialize + ?Sized,
{
    Ok(cmd.after_help(settings_help(config)?))
}

fn flag_error(flag: &str, raw: &str, e: &ConfpathError) -> clap::Error {
    clap::Error::raw(
        ErrorKind::ValueValidation,
        format!("invalid value '{raw}' for '{flag}': {e}\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::Duration;
    use crate::fixtures::test::{TEST_CONFIG_YAML, TestConfig, assert_test_config_values};
    use clap::{CommandFactory, FromArgMatches, Parser};
    use std::fs;
    use tempfile::TempDir;

    /// Wrapper so we can use `try_parse_from` on the flattened args.
    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,
    }

    fn parse(args: &[&str]) -> ConfigArgs {
        TestCli::try_parse_from(args).unwrap().config
    }

    #[test]
    fn file_reader_flag_reads_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, TEST_CONFIG_YAML).unwrap();

        let args = parse(&["test", "-f", path.to_str().unwrap()]);
        let mut c = TestConfig::default();
        args.apply(&mut c).unwrap();
        assert_test_config_values(&c);
    }

    #[test]
    fn assigner_flag_is_repeatable() {
        let args = parse(&[
            "test",
            "-c",
            "foo.key1=true",
            "-c",
            "foo.key4=-100000000000000",
            "-c",
            r#"foo.key11=["hello", "world"]"#,
            "--config",
            "baz.interval=10h9m8s7ms6µs5ns",
        ]);
        assert_eq!(args.assignments.len(), 4);

        let mut c = TestConfig::default();
        args.apply(&mut c).unwrap();
        assert!(c.foo.key1);
        assert_eq!(c.foo.key4, -100000000000000);
        assert_eq!(c.foo.key11, vec!["hello", "world"]);
        assert_eq!(
            c.baz.interval,
            "10h9m8.007006005s".parse::<Duration>().unwrap()
        );
    }

    #[test]
    fn assignment_without_equals_is_a_parse_error() {
        let result = TestCli::try_parse_from(["test", "-c", "foo.key1"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn unknown_paths_fail_without_mutation() {
        for path in [
            "nonexistent",
            "non.existent",
            "foo.nonexistent",
            "nonexistent.key1",
            "baz.quux.nonexistent",
            "baz.quux.0",
            "0",
        ] {
            let expr = format!("{path}=1");
            let args = parse(&["test", "-c", &expr]);
            let mut c = TestConfig::default();
            assert!(matches!(
                args.apply(&mut c),
                Err(ConfpathError::UnknownKey(_))
            ));
            assert_eq!(c, TestConfig::default());
        }
    }

    #[test]
    fn string_list_shapes() {
        for (arg, len) in [
            ("", 0),
            ("[]", 0),
            ("one", 1),
            (r#"["one"]"#, 1),
            (r#"[""]"#, 1),
            (r#"["two","two"]"#, 2),
            (r#"["",""]"#, 2),
            (r#" [ "th", "r", "ee" ] "#, 3),
        ] {
            let expr = format!("foo.key11={arg}");
            let args = parse(&["test", "-c", &expr]);
            let mut c = TestConfig::default();
            args.apply(&mut c).unwrap();
            assert_eq!(c.foo.key11.len(), len, "{arg:?}");
        }
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.yaml");
        let args = parse(&["test", "-f", path.to_str().unwrap()]);
        let err = args.apply(&mut TestConfig::default()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn in_order_application_interleaves_flags() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "bar: 1\nfoo:\n  key10: from-file\n").unwrap();

        let cmd = ConfigArgs::augment_args(Command::new("test"));
        let matches = cmd
            .try_get_matches_from([
                "test",
                "-c",
                "bar=5",
                "-f",
                path.to_str().unwrap(),
                "-c",
                "foo.key10=from-flag",
            ])
            .unwrap();

        let mut c = TestConfig::default();
        apply_in_order(&matches, &mut c).unwrap();
        // The file came after `bar=5`, so it wins for bar.
        assert_eq!(c.bar, 1);
        assert_eq!(c.foo.key10, "from-flag");
    }

    #[test]
    fn in_order_failure_is_a_clap_error() {
        let matches = TestCli::command()
            .try_get_matches_from(["test", "-c", "foo.key2=lots"])
            .unwrap();
        let mut c = TestConfig::default();
        let err = apply_in_order(&matches, &mut c).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("foo.key2=lots"));

        // The derive path sees the same matches.
        let cli = TestCli::from_arg_matches(&matches).unwrap();
        assert_eq!(cli.config.assignments[0].path, "foo.key2");
    }

    #[test]
    fn no_flags_is_a_no_op() {
        let matches = TestCli::command().try_get_matches_from(["test"]).unwrap();
        let mut c = TestConfig::default();
        c.bar = 8;
        apply_in_order(&matches, &mut c).unwrap();
        assert_eq!(c.bar, 8);
        assert_eq!(parse(&["test"]).files.len(), 0);
    }

    #[test]
    fn help_lists_settings() {
        let mut c = TestConfig::default();
        c.bar = 12345;
        let mut cmd = with_settings_help(TestCli::command(), &c).unwrap();
        let help = cmd.render_help().to_string();
        assert!(help.contains("--config-file"));
        assert!(help.contains("Configuration settings:"));
        assert!(help.contains("  bar i64 (12345)"));
        assert!(help.contains("  baz.interval Duration"));
    }
}
