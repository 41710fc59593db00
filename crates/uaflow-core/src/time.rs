// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Time value and unit helpers.
//!
//! Flow nodes configure intervals as a number plus a unit code (`ms`, `s`,
//! `m`, `h`). These helpers turn that pair into milliseconds and give the
//! short display name used in node status text.
//!
//! # Examples
//!
//! ```
//! use uaflow_core::time::{calc_milliseconds, time_unit_name};
//!
//! assert_eq!(calc_milliseconds(2, "s"), 2_000);
//! assert_eq!(calc_milliseconds(2, "weeks"), 10_000);
//! assert_eq!(time_unit_name("m"), "min.");
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Interval used when the unit code is not recognized.
pub const DEFAULT_INTERVAL_MS: u64 = 10_000;

// =============================================================================
// TimeUnit
// =============================================================================

/// Time unit codes accepted in node configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Milliseconds (`ms`).
    #[serde(rename = "ms")]
    Milliseconds,
    /// Seconds (`s`).
    #[serde(rename = "s")]
    Seconds,
    /// Minutes (`m`).
    #[serde(rename = "m")]
    Minutes,
    /// Hours (`h`).
    #[serde(rename = "h")]
    Hours,
}

impl TimeUnit {
    /// Returns the unit code.
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Milliseconds => "ms",
            Self::Seconds => "s",
            Self::Minutes => "m",
            Self::Hours => "h",
        }
    }

    /// Returns the short display name (`msec.`, `sec.`, `min.`, `h.`).
    #[inline]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Milliseconds => "msec.",
            Self::Seconds => "sec.",
            Self::Minutes => "min.",
            Self::Hours => "h.",
        }
    }

    /// Returns the number of milliseconds in one unit.
    #[inline]
    pub const fn factor_ms(&self) -> u64 {
        match self {
            Self::Milliseconds => 1,
            Self::Seconds => 1_000,
            Self::Minutes => 60_000,
            Self::Hours => 3_600_000,
        }
    }

    /// Converts `time` units to milliseconds, saturating on overflow.
    #[inline]
    pub const fn to_millis(&self, time: u64) -> u64 {
        time.saturating_mul(self.factor_ms())
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for TimeUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms" => Ok(Self::Milliseconds),
            "s" => Ok(Self::Seconds),
            "m" => Ok(Self::Minutes),
            "h" => Ok(Self::Hours),
            other => Err(CoreError::invalid_time_unit(other)),
        }
    }
}

// =============================================================================
// Free functions
// =============================================================================

/// Returns the display name for a unit code, or an empty string if unknown.
pub fn time_unit_name(code: &str) -> &'static str {
    code.parse::<TimeUnit>()
        .map(|unit| unit.display_name())
        .unwrap_or("")
}

/// Converts a time value and unit code to milliseconds.
///
/// An unknown unit yields [`DEFAULT_INTERVAL_MS`] regardless of `time`.
pub fn calc_milliseconds(time: u64, code: &str) -> u64 {
    match code.parse::<TimeUnit>() {
        Ok(unit) => unit.to_millis(time),
        Err(_) => {
            tracing::debug!(unit = code, "Unknown time unit, using default interval");
            DEFAULT_INTERVAL_MS
        }
    }
}

/// Same as [`calc_milliseconds`], returned as a [`Duration`].
pub fn calc_duration(time: u64, code: &str) -> Duration {
    Duration::from_millis(calc_milliseconds(time, code))
}

// =============================================================================
// Tests
// =============================================================================
