// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA translation error types.
//!
//! The translation core never aborts the host process. Every failure is a
//! value of [`OpcUaError`], grouped by the concern that produced it:
//!
//! ```text
//! OpcUaError
//! ├── Address       - Topic or NodeId text does not match the address grammar
//! ├── Conversion    - A value could not be encoded for its DataType
//! ├── Session       - Transport reported an invalidated session or channel
//! └── Configuration - Invalid method or data type settings
//! ```
//!
//! Address errors are reported per address: batch operations collect them
//! alongside the addresses that did resolve.
//!
//! # Examples
//!
//! ```
//! use uaflow_opcua::error::{is_session_bad, AddressError, OpcUaError};
//!
//! let error = OpcUaError::address(AddressError::missing_namespace("i=85"));
//! assert!(error.is_malformed_address());
//! assert_eq!(error.error_code().to_string(), "UA-0102");
//!
//! assert!(is_session_bad(&"BadSessionIdInvalid (0x80250000)"));
//! assert!(!is_session_bad(&"Session closed"));
//! ```

use std::fmt;

use thiserror::Error;
use tracing::Level;

/// Markers in transport error text that mean the session is no longer usable.
pub const SESSION_INVALIDATING_MARKERS: [&str; 2] = ["BadSession", "Invalid Channel"];

/// Returns `true` if an error's text marks the session as invalid.
///
/// The check is a case-sensitive substring match on `BadSession` and
/// `Invalid Channel`.
pub fn is_session_bad(error: &dyn fmt::Display) -> bool {
    let text = error.to_string();
    SESSION_INVALIDATING_MARKERS
        .iter()
        .any(|marker| text.contains(marker))
}

// =============================================================================
// OpcUaError - Main Error Type
// =============================================================================

/// The main error type for the OPC UA translation core.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OpcUaError {
    /// Malformed topic or NodeId address.
    #[error("{0}")]
    Address(#[from] AddressError),

    /// Value conversion errors.
    #[error("{0}")]
    Conversion(#[from] ConversionError),

    /// Session invalidation reported by the transport.
    #[error("{0}")]
    Session(#[from] SessionError),

    /// Configuration errors.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
}

impl OpcUaError {
    // =========================================================================
    // Factory Methods
    // =========================================================================

    /// Creates an address error.
    #[inline]
    pub fn address(error: AddressError) -> Self {
        Self::Address(error)
    }

    /// Creates a conversion error.
    #[inline]
    pub fn conversion(error: ConversionError) -> Self {
        Self::Conversion(error)
    }

    /// Creates a session error.
    #[inline]
    pub fn session(error: SessionError) -> Self {
        Self::Session(error)
    }

    /// Creates a configuration error.
    #[inline]
    pub fn configuration(error: ConfigurationError) -> Self {
        Self::Configuration(error)
    }

    /// Classifies a transport error message.
    ///
    /// Messages carrying a session-invalidating marker become
    /// [`SessionError`]s; anything else is returned as `None`.
    pub fn from_transport_message(message: impl Into<String>) -> Option<Self> {
        let message = message.into();
        if message.contains("BadSession") {
            Some(Self::Session(SessionError::BadSession { message }))
        } else if message.contains("Invalid Channel") {
            Some(Self::Session(SessionError::InvalidChannel { message }))
        } else {
            None
        }
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// Returns `true` if this is a malformed address error.
    #[inline]
    pub fn is_malformed_address(&self) -> bool {
        matches!(self, Self::Address(_))
    }

    /// Returns `true` if the session must be discarded and re-established.
    pub fn is_session_invalidating(&self) -> bool {
        match self {
            Self::Session(e) => e.is_invalidating(),
            other => is_session_bad(other),
        }
    }

    /// Returns `true` if the operation may succeed on a new attempt.
    ///
    /// Only session invalidation is transient here; every other error is
    /// caused by the input itself.
    pub fn is_retryable(&self) -> bool {
        self.is_session_invalidating()
    }

    /// Returns the severity level of this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Address(_) => ErrorSeverity::Warning,
            Self::Conversion(e) => e.severity(),
            Self::Session(_) => ErrorSeverity::Error,
            Self::Configuration(_) => ErrorSeverity::Critical,
        }
    }

    /// Returns the error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Address(_) => "address",
            Self::Conversion(_) => "conversion",
            Self::Session(_) => "session",
            Self::Configuration(_) => "configuration",
        }
    }

    /// Returns a unique error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Address(e) => e.error_code(),
            Self::Conversion(e) => e.error_code(),
            Self::Session(e) => e.error_code(),
            Self::Configuration(e) => e.error_code(),
        }
    }

    /// Returns recovery hints for this error.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::Address(e) => e.recovery_hints(),
            Self::Conversion(e) => e.recovery_hints(),
            Self::Session(e) => e.recovery_hints(),
            Self::Configuration(e) => e.recovery_hints(),
        }
    }

    /// Returns the tracing level for this error.
    pub fn tracing_level(&self) -> Level {
        self.severity().to_tracing_level()
    }

    /// Logs this error with appropriate level and context.
    pub fn log(&self, context: &str) {
        let level = self.tracing_level();
        let code = self.error_code();

        match level {
            Level::ERROR => tracing::error!(
                error_code = %code,
                category = self.category(),
                context = context,
                retryable = self.is_retryable(),
                "{self}"
            ),
            Level::WARN => tracing::warn!(
                error_code = %code,
                category = self.category(),
                context = context,
                retryable = self.is_retryable(),
                "{self}"
            ),
            _ => tracing::debug!(
                error_code = %code,
                category = self.category(),
                context = context,
                retryable = self.is_retryable(),
                "{self}"
            ),
        }
    }
}

// =============================================================================
// AddressError
// =============================================================================

/// A topic or NodeId string that does not match `ns=<n>;<kind>=<value>`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The message carries no topic.
    #[error("Malformed address: message has no topic")]
    MissingTopic,

    /// The `ns=` prefix is missing.
    #[error("Malformed address '{address}': missing 'ns=' namespace prefix")]
    MissingNamespace {
        /// The offending address.
        address: String,
    },

    /// The namespace is not an unsigned 16-bit integer.
    #[error("Malformed address '{address}': invalid namespace index '{namespace}'")]
    InvalidNamespace {
        /// The offending address.
        address: String,
        /// The namespace text.
        namespace: String,
    },

    /// No `<kind>=<value>` part follows the namespace.
    #[error("Malformed address '{address}': missing identifier")]
    MissingIdentifier {
        /// The offending address.
        address: String,
    },

    /// The identifier kind marker is not one of `i`, `s`, `g`, `b`.
    #[error("Malformed address '{address}': unknown identifier kind '{marker}' (expected i, s, g or b)")]
    UnknownIdentifierKind {
        /// The offending address.
        address: String,
        /// The marker found.
        marker: String,
    },

    /// The identifier value is invalid for its kind.
    #[error("Malformed address '{address}': {reason}")]
    InvalidIdentifier {
        /// The offending address.
        address: String,
        /// Why the identifier was rejected.
        reason: String,
    },
}

impl AddressError {
    /// Creates a missing namespace error.
    pub fn missing_namespace(address: impl Into<String>) -> Self {
        Self::MissingNamespace {
            address: address.into(),
        }
    }

    /// Creates an invalid namespace error.
    pub fn invalid_namespace(address: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::InvalidNamespace {
            address: address.into(),
            namespace: namespace.into(),
        }
    }

    /// Creates a missing identifier error.
    pub fn missing_identifier(address: impl Into<String>) -> Self {
        Self::MissingIdentifier {
            address: address.into(),
        }
    }

    /// Creates an unknown identifier kind error.
    pub fn unknown_kind(address: impl Into<String>, marker: impl Into<String>) -> Self {
        Self::UnknownIdentifierKind {
            address: address.into(),
            marker: marker.into(),
        }
    }

    /// Creates an invalid identifier error.
    pub fn invalid_identifier(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Returns the offending address, if there was one.
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::MissingTopic => None,
            Self::MissingNamespace { address }
            | Self::InvalidNamespace { address, .. }
            | Self::MissingIdentifier { address }
            | Self::UnknownIdentifierKind { address, .. }
            | Self::InvalidIdentifier { address, .. } => Some(address),
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingTopic => ErrorCode::new(1, 1),
            Self::MissingNamespace { .. } => ErrorCode::new(1, 2),
            Self::InvalidNamespace { .. } => ErrorCode::new(1, 3),
            Self::MissingIdentifier { .. } => ErrorCode::new(1, 4),
            Self::UnknownIdentifierKind { .. } => ErrorCode::new(1, 5),
            Self::InvalidIdentifier { .. } => ErrorCode::new(1, 6),
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::MissingTopic => vec!["Set msg.topic to a NodeId such as ns=2;s=Temperature"],
            Self::MissingNamespace { .. } | Self::InvalidNamespace { .. } => vec![
                "Prefix the address with ns=<index>;",
                "Namespace index must be between 0 and 65535",
            ],
            Self::MissingIdentifier { .. } | Self::UnknownIdentifierKind { .. } => {
                vec!["Use one of i=, s=, g= or b= after the namespace"]
            }
            Self::InvalidIdentifier { .. } => vec![
                "Numeric identifiers must fit in an unsigned 32-bit integer",
                "GUID identifiers must be in 8-4-4-4-12 hex form",
            ],
        }
    }
}

// =============================================================================
// ConversionError
// =============================================================================

/// Value conversion errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversionError {
    /// The DataType is not known to the catalog.
    #[error("Unsupported data type: {data_type}")]
    UnsupportedDataType {
        /// The DataType reference as given.
        data_type: String,
    },

    /// The value cannot be represented as the DataType.
    #[error("Invalid value {value} for {data_type}: {reason}")]
    InvalidValue {
        /// Target DataType name.
        data_type: String,
        /// The raw value, rendered as JSON.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A method input argument could not be built.
    #[error("Invalid input argument '{name}': {reason}")]
    InvalidArgument {
        /// Argument name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ConversionError {
    /// Creates an unsupported data type error.
    pub fn unsupported_data_type(data_type: impl Into<String>) -> Self {
        Self::UnsupportedDataType {
            data_type: data_type.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(
        data_type: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            data_type: data_type.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnsupportedDataType { .. } => ErrorSeverity::Warning,
            Self::InvalidValue { .. } | Self::InvalidArgument { .. } => ErrorSeverity::Error,
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedDataType { .. } => ErrorCode::new(3, 1),
            Self::InvalidValue { .. } => ErrorCode::new(3, 2),
            Self::InvalidArgument { .. } => ErrorCode::new(3, 3),
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::UnsupportedDataType { .. } => vec![
                "Use a built-in DataType name such as Int32, Double or String",
                "Switch the codec to lenient mode to pass unknown types through",
            ],
            Self::InvalidValue { .. } => vec![
                "Check the value format",
                "Ensure value is valid for the target type",
            ],
            Self::InvalidArgument { .. } => vec!["Check the dataType and value of the argument"],
        }
    }
}

// =============================================================================
// SessionError
// =============================================================================

/// Session-level failures surfaced by the transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The server rejected the session (`BadSession...` status).
    #[error("Session invalid: {message}")]
    BadSession {
        /// Transport error text.
        message: String,
    },

    /// The secure channel was lost.
    #[error("Channel invalid: {message}")]
    InvalidChannel {
        /// Transport error text.
        message: String,
    },

    /// A request was attempted while the node was not active.
    #[error("Session not active (node status: {status})")]
    NotActive {
        /// Node status at the time of the request.
        status: String,
    },
}

impl SessionError {
    /// Returns `true` if the session must be discarded.
    #[inline]
    pub const fn is_invalidating(&self) -> bool {
        matches!(self, Self::BadSession { .. } | Self::InvalidChannel { .. })
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::BadSession { .. } => ErrorCode::new(2, 1),
            Self::InvalidChannel { .. } => ErrorCode::new(2, 2),
            Self::NotActive { .. } => ErrorCode::new(2, 3),
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::BadSession { .. } | Self::InvalidChannel { .. } => vec![
                "Reconnect the connector to open a new session",
                "Check server session timeout settings",
            ],
            Self::NotActive { .. } => vec!["Wait for the connector to report OPEN"],
        }
    }
}

// =============================================================================
// ConfigurationError
// =============================================================================

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Unknown data type name or id.
    #[error("Invalid data type: {data_type}")]
    InvalidDataType {
        /// The invalid data type.
        data_type: String,
    },

    /// Missing required field.
    #[error("Missing required configuration: {field}")]
    MissingField {
        /// The missing field.
        field: String,
    },

    /// Unknown codec mode.
    #[error("Invalid codec mode: {mode} (expected lenient or strict)")]
    InvalidCodecMode {
        /// The invalid mode.
        mode: String,
    },
}

impl ConfigurationError {
    /// Creates an invalid data type error.
    pub fn invalid_data_type(data_type: impl Into<String>) -> Self {
        Self::InvalidDataType {
            data_type: data_type.into(),
        }
    }

    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an invalid codec mode error.
    pub fn invalid_codec_mode(mode: impl Into<String>) -> Self {
        Self::InvalidCodecMode { mode: mode.into() }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidDataType { .. } => ErrorCode::new(4, 1),
            Self::MissingField { .. } => ErrorCode::new(4, 2),
            Self::InvalidCodecMode { .. } => ErrorCode::new(4, 3),
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::InvalidDataType { .. } => vec!["Use a built-in DataType name or ns=0;i=<id>"],
            Self::MissingField { .. } => vec!["Add the missing field to the node configuration"],
            Self::InvalidCodecMode { .. } => vec!["Set the codec mode to lenient or strict"],
        }
    }
}

// =============================================================================
// ErrorSeverity
// =============================================================================

/// Error severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational - no action required.
    Info,
    /// Warning - action may be required.
    Warning,
    /// Error - action required, but recoverable.
    Error,
    /// Critical - immediate action required.
    Critical,
}

impl ErrorSeverity {
    /// Converts to tracing level.
    pub fn to_tracing_level(self) -> Level {
        match self {
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error | Self::Critical => Level::ERROR,
        }
    }

    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// ErrorCode
// =============================================================================

/// Structured error code for categorization.
///
/// Format: `UA-XXYY` where XX is category and YY is specific error.
///
/// Categories:
/// - 1: Address
/// - 2: Session
/// - 3: Conversion
/// - 4: Configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    /// Category (1-4).
    pub category: u8,
    /// Specific error within category.
    pub code: u8,
}

impl ErrorCode {
    /// Creates a new error code.
    pub const fn new(category: u8, code: u8) -> Self {
        Self { category, code }
    }

    /// Returns the full error code as a u16.
    pub fn as_u16(&self) -> u16 {
        ((self.category as u16) << 8) | (self.code as u16)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UA-{:02X}{:02X}", self.category, self.code)
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// A Result type with OpcUaError.
pub type OpcUaResult<T> = Result<T, OpcUaError>;

// =============================================================================
// Tests
// =============================================================================
