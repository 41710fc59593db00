// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA status codes and value quality.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `Good`.
pub const GOOD: u32 = 0x0000_0000;
/// `Uncertain`.
pub const UNCERTAIN: u32 = 0x4000_0000;
/// `Bad`.
pub const BAD: u32 = 0x8000_0000;
/// `BadSessionIdInvalid`.
pub const BAD_SESSION_ID_INVALID: u32 = 0x8025_0000;
/// `BadSessionClosed`.
pub const BAD_SESSION_CLOSED: u32 = 0x8026_0000;
/// `BadNodeIdUnknown`.
pub const BAD_NODE_ID_UNKNOWN: u32 = 0x8034_0000;
/// `BadTypeMismatch`.
pub const BAD_TYPE_MISMATCH: u32 = 0x8074_0000;

/// Returns the symbolic name of common status codes, `"Unknown"` otherwise.
pub fn status_code_name(code: u32) -> &'static str {
    match code {
        GOOD => "Good",
        UNCERTAIN => "Uncertain",
        BAD => "Bad",
        0x8001_0000 => "BadUnexpectedError",
        0x8002_0000 => "BadInternalError",
        0x800A_0000 => "BadTimeout",
        0x800D_0000 => "BadServerNotConnected",
        0x800E_0000 => "BadServerHalted",
        0x800F_0000 => "BadNothingToDo",
        0x8010_0000 => "BadTooManyOperations",
        0x801F_0000 => "BadUserAccessDenied",
        0x8031_0000 => "BadNoCommunication",
        BAD_SESSION_ID_INVALID => "BadSessionIdInvalid",
        BAD_SESSION_CLOSED => "BadSessionClosed",
        0x8027_0000 => "BadSessionNotActivated",
        0x8033_0000 => "BadNodeIdInvalid",
        BAD_NODE_ID_UNKNOWN => "BadNodeIdUnknown",
        0x8035_0000 => "BadAttributeIdInvalid",
        0x803A_0000 => "BadNotReadable",
        0x803B_0000 => "BadNotWritable",
        0x803C_0000 => "BadOutOfRange",
        0x803D_0000 => "BadNotSupported",
        0x803E_0000 => "BadNotFound",
        0x8073_0000 => "BadWriteNotSupported",
        BAD_TYPE_MISMATCH => "BadTypeMismatch",
        0x8075_0000 => "BadMethodInvalid",
        0x8076_0000 => "BadArgumentsMissing",
        0x80AB_0000 => "BadInvalidArgument",
        0x80E5_0000 => "BadTooManyArguments",
        0x408F_0000 => "UncertainNoCommunicationLastUsableValue",
        0x4090_0000 => "UncertainLastUsableValue",
        _ => "Unknown",
    }
}

/// A status code rendered with its name, as attached to responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCodeInfo {
    /// Raw code.
    pub value: u32,
    /// Human readable description.
    pub description: String,
    /// Symbolic name.
    pub name: String,
}

impl StatusCodeInfo {
    /// Describes a status code.
    pub fn from_code(code: u32) -> Self {
        let name = status_code_name(code);
        let description = match code {
            GOOD => "No Error".to_string(),
            _ => name.to_string(),
        };
        Self {
            value: code,
            description,
            name: name.to_string(),
        }
    }
}

// =============================================================================
// Quality
// =============================================================================

/// Severity class of a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// Value is usable.
    #[default]
    Good,
    /// Value may be usable.
    Uncertain,
    /// Value must not be used.
    Bad,
}

impl Quality {
    /// Classifies a status code by its two severity bits.
    pub const fn from_status_code(status_code: u32) -> Self {
        if status_code & 0x8000_0000 != 0 {
            Self::Bad
        } else if status_code & 0x4000_0000 != 0 {
            Self::Uncertain
        } else {
            Self::Good
        }
    }

    /// Returns `true` for good quality.
    #[inline]
    pub const fn is_good(&self) -> bool {
        matches!(self, Self::Good)
    }

    /// Returns `true` for bad quality.
    #[inline]
    pub const fn is_bad(&self) -> bool {
        matches!(self, Self::Bad)
    }

    /// Returns the string representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Uncertain => "uncertain",
            Self::Bad => "bad",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// EntryStatus
// =============================================================================

/// Per-response tally of result qualities, serialized as `[good, bad, other]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "[usize; 3]", into = "[usize; 3]")]
pub struct EntryStatus {
    /// Results with good status.
    pub good: usize,
    /// Results with bad status.
    pub bad: usize,
    /// Results with uncertain status.
    pub other: usize,
}

impl EntryStatus {
    /// Tallies a sequence of status codes.
    pub fn from_status_codes<I: IntoIterator<Item = u32>>(codes: I) -> Self {
        codes.into_iter().fold(Self::default(), |mut acc, code| {
            acc.record(code);
            acc
        })
    }

    /// Records one status code.
    pub fn record(&mut self, code: u32) {
        match Quality::from_status_code(code) {
            Quality::Good => self.good += 1,
            Quality::Bad => self.bad += 1,
            Quality::Uncertain => self.other += 1,
        }
    }

    /// Total number of recorded results.
    pub fn total(&self) -> usize {
        self.good + self.bad + self.other
    }
}

impl From<[usize; 3]> for EntryStatus {
    fn from([good, bad, other]: [usize; 3]) -> Self {
        Self { good, bad, other }
    }
}

impl From<EntryStatus> for [usize; 3] {
    fn from(status: EntryStatus) -> Self {
        [status.good, status.bad, status.other]
    }
}
