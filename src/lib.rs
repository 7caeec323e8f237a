//! Path-addressed, type-directed configuration for Rust applications. Define
//! a struct, then read it from YAML and override single fields by name.
//!
//! Confpath treats your config struct as the schema. Every leaf field gets a
//! dotted path (`audio.sample_rate`), and every path can be set from a string
//! that is parsed according to the field's declared type:
//!
//! ```
//! # use serde::{Deserialize, Serialize};
//! #[derive(Serialize, Deserialize, Default)]
//! struct Config {
//!     comment: String,
//!     audio: Audio,
//! }
//!
//! #[derive(Serialize, Deserialize, Default)]
//! struct Audio {
//!     enabled: bool,
//!     sample_rate: u32,
//! }
//!
//! let mut config = Config::default();
//! confpath::assign(&mut config, "audio.sample_rate=44100")?;
//! confpath::set_from_str(&mut config, "Audio.Enabled", "yes")?;
//! assert_eq!(config.audio.sample_rate, 44100);
//! assert!(config.audio.enabled);
//! # Ok::<(), confpath::ConfpathError>(())
//! ```
//!
//! # Design: struct as source of truth
//!
//! Any type implementing `serde::Serialize + serde::de::DeserializeOwned` is a
//! valid config. Confpath walks it through serde's data model, so there is no
//! derive macro, no key registry, and no separate schema file.
//!
//! - **Nested structs** add a path segment: the lowercased field name.
//! - **`#[serde(flatten)]` fields** are embedded: their fields appear at the
//!   parent's level, without a segment of their own.
//! - **`Option<T>` sections** are followed when `Some`. While `None`, paths
//!   through them are unlisted and fail with
//!   [`NullIndirection`](ConfpathError::NullIndirection).
//! - **String-keyed maps** behave like records, one segment per key.
//!
//! Path segments match field names case-insensitively.
//!
//! Updates rebuild the config from its serialized form, so a field serde
//! never sees (`#[serde(skip)]`, `#[serde(skip_serializing)]`) comes back as
//! its `Default` after every successful set or read. Keep runtime-only state
//! outside the config struct.
//!
//! # Supported leaf types
//!
//! | Type | String form |
//! |------|-------------|
//! | `bool` | `true`/`false`, `yes`/`no`, `y`/`n`, `on`/`off`, any case |
//! | `i8`..`i64`, `isize` | base-10, range-checked |
//! | `u8`..`u64`, `usize` | base-10, range-checked |
//! | `f32`, `f64` | decimal float |
//! | `String` | taken verbatim |
//! | [`Duration`] | `1h30m`, `10h9m8.007006005s`, `250ms` |
//! | `Vec<String>` | empty, a JSON array (`["a", "b"]`), or one bare item |
//!
//! Fields of other types (enums, tuples, lists of non-strings) still load and
//! save through serde, but are not listed and cannot be set by path.
//!
//! An empty list has no visible element type, so an empty `Vec<u16>` is
//! listed as `Vec<String>` and written as `[]`. Setting it to strings then
//! fails with [`Rejected`](ConfpathError::Rejected).
//!
//! # Typed and string setters
//!
//! [`set`] takes a [`Value`] and requires its kind to match the field's
//! declared kind exactly, so an `i32` never lands in an `i64` field and an
//! `i64` never lands in a [`Duration`]. [`set_from_str`] parses text by the
//! field's kind instead, and [`assign`] does the same for `path=value`
//! expressions. The `must_*` variants panic instead of returning an error.
//!
//! A failing operation never leaves the config half-updated: the value is
//! rebuilt on the side and only swapped in once everything succeeded.
//!
//! # YAML
//!
//! [`read`] overlays a YAML document onto the current values: keys the
//! document omits keep their values, so defaults are simply whatever the
//! struct held beforehand. [`write`] emits only settable fields with
//! lowercased keys, dropping empty records and unset optional sections.
//! Durations are written in their text form:
//!
//! ```yaml
//! audio:
//!   enabled: true
//!   sample_rate: 44100
//! timeout: 1m30s
//! ```
//!
//! [`read_file`], [`read_file_if_exists`] and [`write_file`] wrap these for
//! paths. Writes are atomic: a temporary file is renamed over the target.
//!
//! # Strict mode
//!
//! The plain readers ignore keys the config does not know. The `*_strict`
//! readers fail instead, naming each key and a best-effort line number:
//!
//! ```text
//! Unknown key 'typo_key' in /home/user/.config/myapp/myapp.yaml (line 5)
//! ```
//!
//! # Layered loading
//!
//! [`Loader`] applies files, `PREFIX__*` environment variables and
//! assignment expressions in that order:
//!
//! ```text
//! Current values        whatever the struct held
//!        ↑ overridden by
//! Config files          in the order added, later files win
//!        ↑ overridden by
//! Environment vars      PREFIX__SECTION__KEY
//!        ↑ overridden by
//! Assignments           path=value
//! ```
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` Cargo feature, on by default) adds
//! repeatable `-f FILE` and `-c PATH=VALUE` flags via [`ConfigArgs`], and
//! [`with_settings_help`] appends a settings listing to `--help`:
//!
//! ```text
//! Configuration settings:
//!   comment String
//!   audio.enabled bool
//!   audio.sample_rate u32 (44100)
//! ```
//!
//! To use confpath without clap:
//!
//! ```toml
//! confpath = { version = "...", default-features = false }
//! ```
//!
//! # Error handling
//!
//! All fallible operations return [`ConfpathError`]. See the [`error`] module
//! for the full set.

pub mod error;
pub mod types;

mod assign;
mod bind;
mod builder;
#[cfg(feature = "clap")]
mod cli;
mod duration;
mod env;
mod file;
pub(crate) mod merge;
mod resolve;
mod schema;
mod usage;
mod validate;
mod value;
mod yaml;

#[cfg(test)]
mod fixtures;

pub use assign::Assignment;
pub use bind::{assign, get, get_as, must_assign, must_set, must_set_from_str, set, set_from_str};
pub use builder::Loader;
#[cfg(feature = "clap")]
pub use cli::{ConfigArgs, apply_in_order, with_settings_help};
pub use duration::Duration;
pub use env::{apply_env, apply_env_from};
pub use error::{ConfpathError, ParseDurationError, ValueError};
pub use file::{platform_config_file, read_file, read_file_if_exists, read_file_strict, write_file};
pub use schema::settings;
pub use types::{Kind, Setting};
pub use usage::{SETTINGS_HEADING, print_settings, settings_help};
pub use value::Value;
pub use yaml::{read, read_strict, to_string, write};
