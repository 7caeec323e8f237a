use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::bind::assign;
use crate::env::apply_env_from;
use crate::error::ConfpathError;
use crate::file::{self, platform_config_file};

/// One config file layer.
#[derive(Debug, Clone)]
struct FileLayer {
    path: PathBuf,
    required: bool,
}

/// Builder for applying several config layers to a value in one call.
///
/// Layers are applied in a fixed order, each overriding the previous:
///
/// 1. YAML files, in the order they were added.
/// 2. Environment variables under [`env_prefix`](Self::env_prefix).
/// 3. `path=value` assignments, in the order they were added.
///
/// Whatever the config held before loading is the base layer, so defaults are
/// simply the values the caller starts from.
///
/// ```no_run
/// # use serde::{Deserialize, Serialize};
/// #[derive(Serialize, Deserialize, Default)]
/// struct Config { port: u16 }
///
/// let mut config = Config { port: 8080 };
/// confpath::Loader::new()
///     .platform_file("myapp")
///     .optional_file("myapp.yaml")
///     .env_prefix("MYAPP")
///     .assign("port=9000")
///     .load_into(&mut config)?;
/// # Ok::<(), confpath::ConfpathError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Loader {
    files: Vec<FileLayer>,
    env_prefix: Option<String>,
    env_vars: Option<Vec<(String, String)>>,
    strict: bool,
    assignments: Vec<String>,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a YAML file that must exist.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.push(FileLayer {
            path: path.as_ref().to_path_buf(),
            required: true,
        });
        self
    }

    /// Add a YAML file that is skipped if it does not exist.
    pub fn optional_file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.push(FileLayer {
            path: path.as_ref().to_path_buf(),
            required: false,
        });
        self
    }

    /// Add the per-user file from [`platform_config_file`] as an optional
    /// layer. Nothing is added if the platform has no config directory.
    pub fn platform_file(self, app_name: &str) -> Self {
        match platform_config_file(app_name) {
            Some(path) => self.optional_file(path),
            None => self,
        }
    }

    /// Read `{PREFIX}__*` environment variables after the files.
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Use these pairs instead of the process environment.
    pub fn env_vars(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env_vars = Some(vars.into_iter().collect());
        self
    }

    /// Enable or disable strict mode (default: `false`).
    /// In strict mode, unknown keys in config files produce errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Add a `path=value` assignment, applied after files and environment.
    pub fn assign(mut self, expr: impl Into<String>) -> Self {
        self.assignments.push(expr.into());
        self
    }

    /// Add several assignments at once.
    pub fn assignments<I, S>(mut self, exprs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignments.extend(exprs.into_iter().map(Into::into));
        self
    }

    /// Apply every layer to `config`. On error `config` is left unchanged.
    pub fn load_into<C>(&self, config: &mut C) -> Result<(), ConfpathError>
    where
        C: Serialize + DeserializeOwned,
    {
        let mut scratch: C = serde_yaml::from_value(serde_yaml::to_value(&*config)?)?;

        for layer in &self.files {
            match file::load(&layer.path, &mut scratch, self.strict) {
                Err(e) if !layer.required && e.is_not_found() => {
                    debug!(path = %layer.path.display(), "optional config file not found");
                }
                other => other?,
            }
        }

        if let Some(prefix) = &self.env_prefix {
            match &self.env_vars {
                Some(vars) => apply_env_from(&mut scratch, prefix, vars.iter().cloned())?,
                None => apply_env_from(&mut scratch, prefix, std::env::vars())?,
            }
        }

        for expr in &self.assignments {
            assign(&mut scratch, expr)?;
        }

        *config = scratch;
        Ok(())
    }
}
