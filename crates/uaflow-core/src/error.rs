// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core error types for uaflow.
//!
//! Errors raised here concern the message envelope and the small helpers
//! that live in this crate. Protocol-level errors belong to `uaflow-opcua`.
//!
//! # Examples
//!
//! ```
//! use uaflow_core::error::CoreError;
//!
//! let error = CoreError::invalid_time_unit("d");
//! assert_eq!(error.error_type(), "time_unit");
//! ```

use thiserror::Error;

// =============================================================================
// CoreError
// =============================================================================

/// Errors produced by the core message and helper types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The message could not be decoded into an envelope.
    #[error("Invalid message: {message}")]
    InvalidMessage {
        /// Description of the decoding failure.
        message: String,
    },

    /// A message field has an unexpected shape.
    #[error("Invalid field '{field}': {message}")]
    InvalidField {
        /// Field name as it appears on the wire.
        field: String,
        /// Description of the problem.
        message: String,
    },

    /// An unknown time unit code.
    #[error("Invalid time unit '{unit}' (expected one of ms, s, m, h)")]
    InvalidTimeUnit {
        /// The unit code that was supplied.
        unit: String,
    },
}

impl CoreError {
    /// Creates an invalid message error.
    pub fn invalid_message(message: impl Into<String>) -> Self {
        Self::InvalidMessage {
            message: message.into(),
        }
    }

    /// Creates an invalid field error.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid time unit error.
    pub fn invalid_time_unit(unit: impl Into<String>) -> Self {
        Self::InvalidTimeUnit { unit: unit.into() }
    }

    /// Returns the error type as a string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidMessage { .. } => "message",
            Self::InvalidField { .. } => "field",
            Self::InvalidTimeUnit { .. } => "time_unit",
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_message(err.to_string())
    }
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_field("nodesToRead", "expected an array of strings");
        assert_eq!(
            err.to_string(),
            "Invalid field 'nodesToRead': expected an array of strings"
        );

        let err = CoreError::invalid_time_unit("d");
        assert!(err.to_string().contains("'d'"));
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CoreError = json_err.into();
        assert_eq!(err.error_type(), "message");
    }
}
