// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA address-space and data types.
//!
//! - **NodeId**: All four OPC UA node identifier types with parsing
//! - **OpcUaDataType**: the closed set of built-in DataTypes handled by the codec
//! - **LocalizedText**: locale-tagged text records
//!
//! # Examples
//!
//! ```
//! use uaflow_opcua::types::{NodeId, OpcUaDataType};
//!
//! let node_id: NodeId = "ns=2;s=MyDevice.Temperature".parse().unwrap();
//! assert!(node_id.is_string());
//!
//! let data_type: OpcUaDataType = "uint16".parse().unwrap();
//! assert_eq!(data_type.type_id(), 5);
//! ```

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AddressError, ConfigurationError, OpcUaError};

// =============================================================================
// NodeId
// =============================================================================

/// OPC UA Node Identifier.
///
/// A NodeId uniquely identifies a node within an OPC UA server.
/// It consists of a namespace index and an identifier which can be
/// numeric, string, GUID, or opaque (byte string).
///
/// # Examples
///
/// ```
/// use uaflow_opcua::types::NodeId;
///
/// let numeric = NodeId::numeric(2, 1001);
/// assert_eq!(numeric.to_string(), "ns=2;i=1001");
///
/// let parsed: NodeId = "ns=0;i=85".parse().unwrap();
/// assert_eq!(parsed, NodeId::OBJECTS_FOLDER);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    /// Namespace index (0 = OPC UA standard namespace).
    pub namespace_index: u16,

    /// The node identifier.
    pub identifier: NodeIdentifier,
}

impl NodeId {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a numeric node ID.
    #[inline]
    pub fn numeric(namespace_index: u16, value: u32) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Numeric(value),
        }
    }

    /// Creates a string node ID.
    #[inline]
    pub fn string(namespace_index: u16, value: impl Into<String>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::String(value.into()),
        }
    }

    /// Creates a GUID node ID.
    #[inline]
    pub fn guid(namespace_index: u16, value: Uuid) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Guid(value),
        }
    }

    /// Creates an opaque (byte string) node ID.
    #[inline]
    pub fn opaque(namespace_index: u16, value: Vec<u8>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Opaque(value),
        }
    }

    // =========================================================================
    // Standard Node IDs
    // =========================================================================

    /// Objects folder node (ns=0, i=85).
    pub const OBJECTS_FOLDER: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(85),
    };

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns `true` if this is a numeric identifier.
    #[inline]
    pub const fn is_numeric(&self) -> bool {
        matches!(self.identifier, NodeIdentifier::Numeric(_))
    }

    /// Returns `true` if this is a string identifier.
    #[inline]
    pub const fn is_string(&self) -> bool {
        matches!(self.identifier, NodeIdentifier::String(_))
    }

    /// Returns `true` if this is a GUID identifier.
    #[inline]
    pub const fn is_guid(&self) -> bool {
        matches!(self.identifier, NodeIdentifier::Guid(_))
    }

    /// Returns the numeric value if this is a numeric identifier.
    #[inline]
    pub fn as_numeric(&self) -> Option<u32> {
        match &self.identifier {
            NodeIdentifier::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string value if this is a string identifier.
    #[inline]
    pub fn as_string(&self) -> Option<&str> {
        match &self.identifier {
            NodeIdentifier::String(v) => Some(v),
            _ => None,
        }
    }

    /// Converts to the canonical `ns=<namespace>;{i|s|g|b}=<identifier>` form.
    ///
    /// The namespace prefix is always written, including for namespace 0,
    /// so the result is accepted by the topic parser.
    pub fn to_opc_string(&self) -> String {
        format!("ns={};{}", self.namespace_index, self.identifier)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_opc_string())
    }
}

impl FromStr for NodeId {
    type Err = OpcUaError;

    /// Parses a NodeId from OPC UA string format.
    ///
    /// Supported formats:
    /// - `ns=2;i=1001` (numeric)
    /// - `ns=2;s=MyNode` (string)
    /// - `ns=2;g=550e8400-e29b-41d4-a716-446655440000` (GUID)
    /// - `ns=2;b=SGVsbG8=` (opaque, base64 encoded)
    /// - `i=1001` (numeric, namespace 0)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (namespace_index, identifier_part) = match s.strip_prefix("ns=") {
            Some(rest) => {
                let (ns_str, identifier_part) = rest
                    .split_once(';')
                    .ok_or_else(|| AddressError::missing_identifier(s))?;
                let ns: u16 = parse_decimal(ns_str)
                    .ok_or_else(|| AddressError::invalid_namespace(s, ns_str))?;
                (ns, identifier_part)
            }
            None => (0, s),
        };

        let (marker, value) = identifier_part
            .split_once('=')
            .ok_or_else(|| AddressError::missing_identifier(s))?;

        let identifier = match marker {
            "i" => NodeIdentifier::Numeric(parse_decimal(value).ok_or_else(|| {
                AddressError::invalid_identifier(s, "Invalid numeric identifier")
            })?),
            "s" => NodeIdentifier::String(value.to_string()),
            "g" => NodeIdentifier::Guid(Uuid::parse_str(value).map_err(|e| {
                AddressError::invalid_identifier(s, format!("Invalid GUID: {}", e))
            })?),
            "b" => NodeIdentifier::Opaque(BASE64.decode(value).map_err(|e| {
                AddressError::invalid_identifier(s, format!("Invalid base64: {}", e))
            })?),
            other => return Err(AddressError::unknown_kind(s, other).into()),
        };

        Ok(Self {
            namespace_index,
            identifier,
        })
    }
}

/// Parses unsigned decimal text. Signs, whitespace and empty text are
/// rejected.
pub(crate) fn parse_decimal<T: FromStr>(text: &str) -> Option<T> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

// =============================================================================
// NodeIdentifier
// =============================================================================

/// OPC UA node identifier types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum NodeIdentifier {
    /// Numeric identifier.
    Numeric(u32),

    /// String identifier.
    String(String),

    /// GUID identifier.
    Guid(Uuid),

    /// Opaque identifier (application-specific byte array).
    Opaque(Vec<u8>),
}

impl fmt::Display for NodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "i={}", v),
            Self::String(v) => write!(f, "s={}", v),
            Self::Guid(v) => write!(f, "g={}", v),
            Self::Opaque(v) => write!(f, "b={}", BASE64.encode(v)),
        }
    }
}

// =============================================================================
// OpcUaDataType
// =============================================================================

/// Built-in OPC UA DataTypes understood by the codec and extractor.
///
/// Serialized as the canonical DataType name (`"Boolean"`, `"UInt16"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpcUaDataType {
    /// Boolean value.
    Boolean,

    /// Signed 8-bit integer.
    SByte,

    /// Unsigned 8-bit integer.
    Byte,

    /// Signed 16-bit integer.
    Int16,

    /// Unsigned 16-bit integer.
    UInt16,

    /// Signed 32-bit integer.
    Int32,

    /// Unsigned 32-bit integer.
    UInt32,

    /// Signed 64-bit integer.
    Int64,

    /// Unsigned 64-bit integer.
    UInt64,

    /// 32-bit IEEE 754 float.
    Float,

    /// 64-bit IEEE 754 double.
    Double,

    /// UTF-8 string.
    String,

    /// Date and time.
    DateTime,

    /// GUID.
    Guid,

    /// Raw byte string.
    ByteString,

    /// XML element.
    XmlElement,

    /// Node ID.
    NodeId,

    /// Expanded node ID.
    ExpandedNodeId,

    /// Status code.
    StatusCode,

    /// Qualified name.
    QualifiedName,

    /// Localized text.
    LocalizedText,

    /// Variant (can contain any type).
    Variant,

    /// The `IdType` enumeration (identifier kind of a NodeId).
    NodeIdType,
}

impl OpcUaDataType {
    /// Every built-in DataType, in type id order.
    pub const ALL: [OpcUaDataType; 23] = [
        Self::Boolean,
        Self::SByte,
        Self::Byte,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Float,
        Self::Double,
        Self::String,
        Self::DateTime,
        Self::Guid,
        Self::ByteString,
        Self::XmlElement,
        Self::NodeId,
        Self::ExpandedNodeId,
        Self::StatusCode,
        Self::QualifiedName,
        Self::LocalizedText,
        Self::Variant,
        Self::NodeIdType,
    ];

    /// Returns the OPC UA type ID (the numeric identifier in namespace 0).
    pub const fn type_id(&self) -> u32 {
        match self {
            Self::Boolean => 1,
            Self::SByte => 2,
            Self::Byte => 3,
            Self::Int16 => 4,
            Self::UInt16 => 5,
            Self::Int32 => 6,
            Self::UInt32 => 7,
            Self::Int64 => 8,
            Self::UInt64 => 9,
            Self::Float => 10,
            Self::Double => 11,
            Self::String => 12,
            Self::DateTime => 13,
            Self::Guid => 14,
            Self::ByteString => 15,
            Self::XmlElement => 16,
            Self::NodeId => 17,
            Self::ExpandedNodeId => 18,
            Self::StatusCode => 19,
            Self::QualifiedName => 20,
            Self::LocalizedText => 21,
            Self::Variant => 24,
            Self::NodeIdType => 256,
        }
    }

    /// Looks up a DataType by its type ID.
    pub fn from_type_id(id: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|dt| dt.type_id() == id)
    }

    /// Returns `true` if this is a numeric type.
    #[inline]
    pub const fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Returns `true` if this is an integer type.
    #[inline]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::SByte
                | Self::Byte
                | Self::Int16
                | Self::UInt16
                | Self::Int32
                | Self::UInt32
                | Self::Int64
                | Self::UInt64
        )
    }

    /// Returns `true` if this is a floating point type.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    /// Returns `true` if values of this type are carried through the codec
    /// unchanged.
    #[inline]
    pub const fn is_pass_through(&self) -> bool {
        matches!(
            self,
            Self::NodeId
                | Self::NodeIdType
                | Self::ByteString
                | Self::QualifiedName
                | Self::ExpandedNodeId
                | Self::Variant
        )
    }

    /// Returns the canonical name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::SByte => "SByte",
            Self::Byte => "Byte",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::String => "String",
            Self::DateTime => "DateTime",
            Self::Guid => "Guid",
            Self::ByteString => "ByteString",
            Self::XmlElement => "XmlElement",
            Self::NodeId => "NodeId",
            Self::ExpandedNodeId => "ExpandedNodeId",
            Self::StatusCode => "StatusCode",
            Self::QualifiedName => "QualifiedName",
            Self::LocalizedText => "LocalizedText",
            Self::Variant => "Variant",
            Self::NodeIdType => "NodeIdType",
        }
    }
}

impl fmt::Display for OpcUaDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for OpcUaDataType {
    type Err = OpcUaError;

    /// Parses a canonical DataType name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|dt| dt.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| OpcUaError::configuration(ConfigurationError::invalid_data_type(s)))
    }
}

// =============================================================================
// LocalizedText
// =============================================================================

/// Locale-tagged text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalizedText {
    /// The text.
    #[serde(default)]
    pub text: String,

    /// Locale id such as `en` or `de-DE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl LocalizedText {
    /// Creates a localized text.
    pub fn new(text: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            locale: Some(locale.into()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
