//! Configuration structs for the confpath demo application.
//!
//! A root [`DemoConfig`] with two nested sections, [`ServerConfig`] and
//! [`DisplayConfig`]. Defaults come from the `Default` impls: confpath only
//! ever overlays values onto whatever the struct already holds.
//!
//! # Paths
//!
//! | Path                     | Type          | Env var                                 |
//! |--------------------------|---------------|-----------------------------------------|
//! | `name`                   | `String`      | `CONFPATH_DEMO__NAME`                   |
//! | `verbose`                | `bool`        | `CONFPATH_DEMO__VERBOSE`                |
//! | `server.host`            | `String`      | `CONFPATH_DEMO__SERVER__HOST`           |
//! | `server.port`            | `u16`         | `CONFPATH_DEMO__SERVER__PORT`           |
//! | `server.max_connections` | `u32`         | `CONFPATH_DEMO__SERVER__MAX_CONNECTIONS` |
//! | `server.timeout`         | `Duration`    | `CONFPATH_DEMO__SERVER__TIMEOUT`        |
//! | `display.color`          | `String`      | `CONFPATH_DEMO__DISPLAY__COLOR`         |
//! | `display.tags`           | `Vec<String>` | `CONFPATH_DEMO__DISPLAY__TAGS`          |

use confpath::Duration;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct DemoConfig {
    /// Application name shown in the echo banner.
    pub name: String,

    /// Enable verbose output.
    pub verbose: bool,

    pub server: ServerConfig,

    pub display: DisplayConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            name: "confpath-demo".into(),
            verbose: false,
            server: ServerConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    /// Idle timeout, e.g. `90s` or `1m30s`.
    pub timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            max_connections: 100,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct DisplayConfig {
    /// Terminal color for the echo command output.
    ///
    /// Supported values: red, green, yellow, blue, magenta, cyan, white.
    pub color: String,

    /// Labels printed after the banner.
    pub tags: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: "yellow".into(),
            tags: Vec::new(),
        }
    }
}
