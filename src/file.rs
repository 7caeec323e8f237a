//! YAML config files on disk.
//!
//! Reading is the stream-level [`read`](crate::read) with the file path
//! attached to every error. [`read_file_if_exists`] is the only operation
//! that tolerates a failure, and only a missing file.
//!
//! Writing goes through a temporary file in the destination directory that is
//! renamed over the target, so readers never observe a half-written file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ConfpathError;
use crate::yaml;

/// Read a YAML file into `config`.
pub fn read_file<C>(path: impl AsRef<Path>, config: &mut C) -> Result<(), ConfpathError>
where
    C: Serialize + DeserializeOwned,
{
    load(path.as_ref(), config, false)
}

/// Like [`read_file`], but a missing file is not an error.
pub fn read_file_if_exists<C>(path: impl AsRef<Path>, config: &mut C) -> Result<(), ConfpathError>
where
    C: Serialize + DeserializeOwned,
{
    match read_file(path.as_ref(), config) {
        Err(e) if e.is_not_found() => {
            debug!(path = %path.as_ref().display(), "config file not found, skipped");
            Ok(())
        }
        other => other,
    }
}

/// Like [`read_file`], but rejects keys the config does not consume.
pub fn read_file_strict<C>(path: impl AsRef<Path>, config: &mut C) -> Result<(), ConfpathError>
where
    C: Serialize + DeserializeOwned,
{
    load(path.as_ref(), config, true)
}

/// Write `config` as YAML to `path`, replacing any existing file.
pub fn write_file<C>(path: impl AsRef<Path>, config: &C) -> Result<(), ConfpathError>
where
    C: Serialize + ?Sized,
{
    let path = path.as_ref();
    let text = yaml::to_string(config)?;
    let write_error = |source| ConfpathError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(text.as_bytes()).map_err(write_error)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o644)).map_err(write_error)?;
    }
    tmp.persist(path).map_err(|e| write_error(e.error))?;

    debug!(path = %path.display(), "config file written");
    Ok(())
}

/// The conventional per-user config file for `app_name`:
/// `<platform config dir>/<app_name>.yaml`.
///
/// Returns `None` if no home directory can be determined.
pub fn platform_config_file(app_name: &str) -> Option<PathBuf> {
    let proj = directories::ProjectDirs::from("", "", app_name)?;
    Some(proj.config_dir().join(format!("{app_name}.yaml")))
}

pub(crate) fn load<C>(path: &Path, config: &mut C, strict: bool) -> Result<(), ConfpathError>
where
    C: Serialize + DeserializeOwned,
{
    let file = fs::File::open(path).map_err(|source| ConfpathError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    yaml::read_from(file, config, strict, path)?;
    debug!(path = %path.display(), strict, "config file read");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{TEST_CONFIG_YAML, TestConfig, assert_test_config_values};
    use tempfile::TempDir;

    #[test]
    fn read_file_loads_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.yaml");
        fs::write(&path, TEST_CONFIG_YAML).unwrap();

        let mut c = TestConfig::default();
        read_file(&path, &mut c).unwrap();
        assert_test_config_values(&c);
    }

    #[test]
    fn read_file_missing_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.yaml");
        let mut c = TestConfig::default();
        match read_file(&path, &mut c) {
            Err(e @ ConfpathError::IoError { .. }) => {
                assert!(e.is_not_found());
                assert!(e.to_string().contains("missing.yaml"));
            }
            other => panic!("Expected IoError, got {other:?}"),
        }
    }

    #[test]
    fn read_file_if_exists_skips_missing() {
        let dir = TempDir::new().unwrap();
        let mut c = TestConfig::default();
        c.bar = 4;
        read_file_if_exists(dir.path().join("missing.yaml"), &mut c).unwrap();
        assert_eq!(c.bar, 4);
    }

    #[test]
    fn read_file_if_exists_still_reports_bad_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "foo: [unclosed\n").unwrap();

        let mut c = TestConfig::default();
        match read_file_if_exists(&path, &mut c) {
            Err(ConfpathError::ParseError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn read_file_if_exists_reads_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.yaml");
        fs::write(&path, "bar: 99\n").unwrap();
        let mut c = TestConfig::default();
        read_file_if_exists(&path, &mut c).unwrap();
        assert_eq!(c.bar, 99);
    }

    #[test]
    fn read_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut c = TestConfig::default();
        let err = read_file_if_exists(dir.path(), &mut c).unwrap_err();
        assert!(!err.is_not_found());
    }

    #[test]
    fn strict_file_read_names_file_in_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.yaml");
        fs::write(&path, "bar: 1\nbogus: 2\n").unwrap();

        let mut c = TestConfig::default();
        match read_file_strict(&path, &mut c) {
            Err(ConfpathError::UnknownKeys(keys)) => match &keys[0] {
                ConfpathError::UnknownYamlKey { key, path: p, line } => {
                    assert_eq!(key, "bogus");
                    assert_eq!(p, &path);
                    assert_eq!(*line, 2);
                }
                other => panic!("Expected UnknownYamlKey, got {other:?}"),
            },
            other => panic!("Expected UnknownKeys, got {other:?}"),
        }
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.yaml");

        let mut c = TestConfig::default();
        read_file_if_exists(&path, &mut c).unwrap();
        c.foo.key10 = "written".into();
        c.bar = -3;
        write_file(&path, &c).unwrap();

        let mut back = TestConfig::default();
        read_file(&path, &mut back).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn write_file_reproduces_fixture() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.yaml");
        let c: TestConfig = serde_yaml::from_str(TEST_CONFIG_YAML).unwrap();
        write_file(&path, &c).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), TEST_CONFIG_YAML);
    }

    #[test]
    fn write_file_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.yaml");
        fs::write(&path, "stale: true\n".repeat(100)).unwrap();
        let c = TestConfig::default();
        write_file(&path, &c).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert!(text.starts_with("foo:\n"));
    }

    #[cfg(unix)]
    #[test]
    fn written_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.yaml");
        write_file(&path, &TestConfig::default()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no").join("such").join("app.yaml");
        assert!(matches!(
            write_file(&path, &TestConfig::default()),
            Err(ConfpathError::WriteError { .. })
        ));
    }

    #[test]
    fn platform_file_is_named_after_app() {
        if let Some(path) = platform_config_file("confpath-test") {
            assert_eq!(path.file_name().unwrap(), "confpath-test.yaml");
        }
    }
}
