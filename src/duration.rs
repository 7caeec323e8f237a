//! Signed nanosecond durations with a human-readable textual form.
//!
//! [`Duration`] is the only leaf type that is not a Rust primitive. It is an
//! `i64` count of nanoseconds, but the schema treats it as its own kind: a
//! duration field accepts `10h9m8.007006005s` on the command line and in
//! YAML, and is written back in the same canonical form.
//!
//! The textual form is a concatenation of signed decimal coefficients with a
//! unit suffix each: `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. A leading `-`
//! or `+` applies to the whole value. `0` is accepted without a unit.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::ParseDurationError;

/// Newtype-struct name used when serializing a [`Duration`]. The schema
/// serializer recognises it to tell durations apart from plain `i64` fields.
pub(crate) const DURATION_TOKEN: &str = "$confpath::Duration";

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SEC: u64 = 1_000_000_000;

/// A signed span of time with nanosecond resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(i64);

impl Duration {
    pub const ZERO: Duration = Duration(0);
    pub const NANOSECOND: Duration = Duration(1);
    pub const MICROSECOND: Duration = Duration(1_000);
    pub const MILLISECOND: Duration = Duration(1_000_000);
    pub const SECOND: Duration = Duration(1_000_000_000);
    pub const MINUTE: Duration = Duration(60 * 1_000_000_000);
    pub const HOUR: Duration = Duration(60 * 60 * 1_000_000_000);

    pub const fn from_nanos(nanos: i64) -> Self {
        Duration(nanos)
    }

    /// Overflows like `i64` multiplication past roughly ±292 years: a panic
    /// in debug builds, wrapping in release builds.
    pub const fn from_millis(millis: i64) -> Self {
        Duration(millis * 1_000_000)
    }

    /// Same overflow behaviour as [`from_millis`](Self::from_millis).
    pub const fn from_secs(secs: i64) -> Self {
        Duration(secs * 1_000_000_000)
    }

    /// `self + rhs`, or `None` on overflow.
    pub const fn checked_add(self, rhs: Duration) -> Option<Duration> {
        match self.0.checked_add(rhs.0) {
            Some(n) => Some(Duration(n)),
            None => None,
        }
    }

    /// `self - rhs`, or `None` on overflow.
    pub const fn checked_sub(self, rhs: Duration) -> Option<Duration> {
        match self.0.checked_sub(rhs.0) {
            Some(n) => Some(Duration(n)),
            None => None,
        }
    }

    /// `self * rhs`, or `None` on overflow.
    pub const fn checked_mul(self, rhs: i64) -> Option<Duration> {
        match self.0.checked_mul(rhs) {
            Some(n) => Some(Duration(n)),
            None => None,
        }
    }

    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Convert to a `std::time::Duration`. Negative durations have no
    /// std counterpart and yield `None`.
    pub fn to_std(self) -> Option<std::time::Duration> {
        u64::try_from(self.0)
            .ok()
            .map(std::time::Duration::from_nanos)
    }

    /// Convert from a `std::time::Duration`, or `None` if it does not fit in
    /// an `i64` nanosecond count.
    pub fn from_std(d: std::time::Duration) -> Option<Self> {
        i64::try_from(d.as_nanos()).ok().map(Duration)
    }
}

// The operators follow `i64` arithmetic: overflow panics in debug builds and
// wraps in release builds. Use the `checked_*` methods to detect it.

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0 + rhs.0)
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        Duration(-self.0)
    }
}

impl Mul<i64> for Duration {
    type Output = Duration;

    fn mul(self, rhs: i64) -> Duration {
        Duration(self.0 * rhs)
    }
}

impl Mul<Duration> for i64 {
    type Output = Duration;

    fn mul(self, rhs: Duration) -> Duration {
        Duration(self * rhs.0)
    }
}

// --- Formatting ---

/// Split `v` into `v / 10^prec` and the rendered fraction `.ddd` with trailing
/// zeros removed (empty when the fraction is zero).
fn split_frac(v: u64, prec: u32) -> (u64, String) {
    let scale = 10u64.pow(prec);
    let frac = v % scale;
    if frac == 0 {
        return (v / scale, String::new());
    }
    let digits = format!("{frac:0width$}", width = prec as usize);
    (v / scale, format!(".{}", digits.trim_end_matches('0')))
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let u = self.0.unsigned_abs();
        if u == 0 {
            return f.write_str("0s");
        }
        if self.0 < 0 {
            f.write_str("-")?;
        }

        if u < NANOS_PER_SEC {
            let (unit, prec) = if u < NANOS_PER_MICRO {
                ("ns", 0)
            } else if u < NANOS_PER_MILLI {
                ("µs", 3)
            } else {
                ("ms", 6)
            };
            let (whole, frac) = split_frac(u, prec);
            return write!(f, "{whole}{frac}{unit}");
        }

        let (secs, frac) = split_frac(u, 9);
        let mins = secs / 60;
        let hours = mins / 60;
        if hours > 0 {
            write!(f, "{hours}h")?;
        }
        if mins > 0 {
            write!(f, "{}m", mins % 60)?;
        }
        write!(f, "{}{frac}s", secs % 60)
    }
}

// --- Parsing ---

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(60 * 60 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Consume leading ASCII digits. Returns the value (or `None` on overflow) and
/// the remaining input.
fn leading_int(s: &str) -> (Option<u64>, usize) {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    let mut value: Option<u64> = Some(0);
    for b in s[..len].bytes() {
        value = value
            .and_then(|v| v.checked_mul(10))
            .and_then(|v| v.checked_add(u64::from(b - b'0')));
    }
    (value, len)
}

/// Consume leading fraction digits. Digits past the precision an `u64` can
/// hold are consumed but ignored. Returns `(numerator, scale, consumed)`.
fn leading_fraction(s: &str) -> (u64, u128, usize) {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    let mut value: u64 = 0;
    let mut scale: u128 = 1;
    for b in s[..len].bytes() {
        match value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
        {
            Some(v) => {
                value = v;
                scale *= 10;
            }
            None => break,
        }
    }
    (value, scale, len)
}

impl FromStr for Duration {
    type Err = ParseDurationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseDurationError::Invalid(input.to_string());
        let overflow = || ParseDurationError::Overflow(input.to_string());

        let (neg, mut s) = match input.as_bytes().first() {
            Some(b'-') => (true, &input[1..]),
            Some(b'+') => (false, &input[1..]),
            _ => (false, input),
        };

        if s == "0" {
            return Ok(Duration::ZERO);
        }
        if s.is_empty() {
            return Err(invalid());
        }

        const LIMIT: u64 = 1 << 63;
        let mut total: u64 = 0;

        while !s.is_empty() {
            let first = s.as_bytes()[0];
            if !(first == b'.' || first.is_ascii_digit()) {
                return Err(invalid());
            }

            let (whole, consumed) = leading_int(s);
            let whole = whole.ok_or_else(invalid)?;
            let has_whole = consumed > 0;
            s = &s[consumed..];

            let mut frac = (0u64, 1u128);
            let mut has_frac = false;
            if let Some(rest) = s.strip_prefix('.') {
                let (num, scale, consumed) = leading_fraction(rest);
                frac = (num, scale);
                has_frac = consumed > 0;
                s = &rest[consumed..];
            }
            if !has_whole && !has_frac {
                return Err(invalid());
            }

            let unit_len = s
                .bytes()
                .take_while(|b| !(*b == b'.' || b.is_ascii_digit()))
                .count();
            if unit_len == 0 {
                return Err(ParseDurationError::MissingUnit(input.to_string()));
            }
            let unit_text = &s[..unit_len];
            s = &s[unit_len..];
            let unit = unit_nanos(unit_text).ok_or_else(|| ParseDurationError::UnknownUnit {
                unit: unit_text.to_string(),
                input: input.to_string(),
            })?;

            if whole > LIMIT / unit {
                return Err(overflow());
            }
            let mut v = whole * unit;
            if frac.0 > 0 {
                let extra = u128::from(frac.0) * u128::from(unit) / frac.1;
                v = u64::try_from(u128::from(v) + extra).map_err(|_| overflow())?;
                if v > LIMIT {
                    return Err(overflow());
                }
            }
            total = total.checked_add(v).filter(|t| *t <= LIMIT).ok_or_else(overflow)?;
        }

        if neg {
            // LIMIT itself is i64::MIN's magnitude.
            return Ok(Duration(0i64.wrapping_sub_unsigned(total)));
        }
        i64::try_from(total).map(Duration).map_err(|_| overflow())
    }
}

// --- Serde ---

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_newtype_struct(DURATION_TOKEN, &self.to_string())
        } else {
            serializer.serialize_newtype_struct(DURATION_TOKEN, &self.0)
        }
    }
}

struct DurationVisitor;

impl<'de> Visitor<'de> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a duration such as \"1h30m\" or an integer nanosecond count")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Duration, E> {
        Ok(Duration(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Duration, E> {
        i64::try_from(v)
            .map(Duration)
            .map_err(|_| E::custom(format!("duration {v}ns out of range")))
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(self, d: D) -> Result<Duration, D::Error> {
        if d.is_human_readable() {
            d.deserialize_any(self)
        } else {
            i64::deserialize(d).map(Duration)
        }
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_newtype_struct(DURATION_TOKEN, DurationVisitor)
    }
}
