use std::fmt;
use std::str::FromStr;

use crate::error::ConfpathError;

/// A parsed `path=value` expression.
///
/// The text is split at the first `=`. Whitespace around the path is trimmed;
/// the value is kept verbatim, so it may contain further `=` signs or
/// surrounding spaces.
///
/// ```
/// use confpath::Assignment;
///
/// let a: Assignment = " server.dsn =host=db port=5432".parse().unwrap();
/// assert_eq!(a.path, "server.dsn");
/// assert_eq!(a.value, "host=db port=5432");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub path: String,
    pub value: String,
}

impl FromStr for Assignment {
    type Err = ConfpathError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let (path, value) = expr
            .split_once('=')
            .ok_or_else(|| ConfpathError::InvalidAssignment(expr.to_string()))?;
        Ok(Assignment {
            path: path.trim().to_string(),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.path, self.value)
    }
}
