//! Usage text listing a config's settings.
//!
//! ```text
//! Configuration settings:
//!   foo.key1 bool
//!   bar i64 (12345)
//!   baz.interval Duration (1m30s)
//! ```

use std::io;

use serde::Serialize;

use crate::error::ConfpathError;
use crate::schema::settings;

/// Heading that introduces the settings list in help output.
pub const SETTINGS_HEADING: &str = "Configuration settings:";

/// Write one line per setting: `  <path> <type>`, followed by ` (<default>)`
/// when the current value is not the zero value.
pub fn print_settings<W, C>(mut writer: W, config: &C) -> Result<(), ConfpathError>
where
    W: io::Write,
    C: Serialize + ?Sized,
{
    let text = settings_lines(config)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|source| ConfpathError::WriteError {
            path: "<stream>".into(),
            source,
        })
}

/// The settings list under its heading, ready to append to a command's help.
pub fn settings_help<C: Serialize + ?Sized>(config: &C) -> Result<String, ConfpathError> {
    Ok(format!("{SETTINGS_HEADING}\n{}", settings_lines(config)?))
}

fn settings_lines<C: Serialize + ?Sized>(config: &C) -> Result<String, ConfpathError> {
    let lines = settings(config)?.into_iter().map(|s| {
        if s.default.is_empty() {
            format!("  {} {}\n", s.path, s.kind)
        } else {
            format!("  {} {} ({})\n", s.path, s.kind, s.default)
        }
    });
    Ok(lines.collect())
}
