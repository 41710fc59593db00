// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Topic address parsing.
//!
//! Message topics address a node with the grammar
//! `ns=<uint>;<kind>=<payload>` where `<kind>` is one of:
//!
//! | Marker | Kind         | Identifier                |
//! |--------|--------------|---------------------------|
//! | `i`    | `NUMERIC`    | unsigned 32-bit integer   |
//! | `s`    | `STRING`     | payload verbatim          |
//! | `g`    | `GUID`       | payload verbatim          |
//! | `b`    | `BYTESTRING` | payload verbatim          |
//!
//! The identifier kind comes from the marker alone and is never inferred
//! from the payload. Everything after the first `=` of the identifier part
//! is payload, so string identifiers may contain `;` and `=`.
//!
//! # Examples
//!
//! ```
//! use uaflow_core::Message;
//! use uaflow_opcua::topic::{parse_identifier, parse_namespace, IdentifierKind, IdentifierValue};
//!
//! let msg = Message::new().with_topic("ns=0;i=85");
//! assert_eq!(parse_namespace(&msg).unwrap(), "0");
//!
//! let id = parse_identifier(&msg).unwrap();
//! assert_eq!(id.identifier, IdentifierValue::Numeric(85));
//! assert_eq!(id.kind, IdentifierKind::Numeric);
//! ```

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use uaflow_core::Message;
use uuid::Uuid;

use crate::error::{AddressError, OpcUaResult};
use crate::types::{parse_decimal, NodeId, NodeIdentifier};

// =============================================================================
// IdentifierKind / IdentifierValue
// =============================================================================

/// Identifier kind of a topic address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentifierKind {
    /// `i=` marker.
    Numeric,
    /// `s=` marker.
    String,
    /// `g=` marker.
    Guid,
    /// `b=` marker.
    #[serde(rename = "BYTESTRING")]
    ByteString,
}

impl IdentifierKind {
    /// Maps a marker to its kind.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "i" => Some(Self::Numeric),
            "s" => Some(Self::String),
            "g" => Some(Self::Guid),
            "b" => Some(Self::ByteString),
            _ => None,
        }
    }

    /// Returns the marker.
    #[inline]
    pub const fn marker(&self) -> &'static str {
        match self {
            Self::Numeric => "i",
            Self::String => "s",
            Self::Guid => "g",
            Self::ByteString => "b",
        }
    }

    /// Returns the kind name (`NUMERIC`, `STRING`, `GUID`, `BYTESTRING`).
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "NUMERIC",
            Self::String => "STRING",
            Self::Guid => "GUID",
            Self::ByteString => "BYTESTRING",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifier value of a topic address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdentifierValue {
    /// Integer identifier (`i=`).
    Numeric(u32),
    /// Verbatim text identifier (`s=`, `g=`, `b=`).
    Text(String),
}

impl fmt::Display for IdentifierValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Parsed identifier: `{identifier, type}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicIdentifier {
    /// The identifier value.
    pub identifier: IdentifierValue,

    /// The identifier kind.
    #[serde(rename = "type")]
    pub kind: IdentifierKind,
}

// =============================================================================
// TopicAddress
// =============================================================================

/// A fully parsed topic address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicAddress {
    /// Namespace index exactly as written in the topic.
    pub namespace: String,

    /// The identifier.
    #[serde(flatten)]
    pub identifier: TopicIdentifier,
}

impl TopicAddress {
    /// Parses a topic string.
    ///
    /// # Errors
    ///
    /// Returns an [`AddressError`] if the text does not match
    /// `ns=<uint>;<kind>=<payload>`.
    pub fn parse(topic: &str) -> OpcUaResult<Self> {
        let rest = topic
            .strip_prefix("ns=")
            .ok_or_else(|| AddressError::missing_namespace(topic))?;

        let (namespace, identifier_part) = rest
            .split_once(';')
            .ok_or_else(|| AddressError::missing_identifier(topic))?;

        parse_decimal::<u16>(namespace)
            .ok_or_else(|| AddressError::invalid_namespace(topic, namespace))?;

        let (marker, payload) = identifier_part
            .split_once('=')
            .ok_or_else(|| AddressError::missing_identifier(topic))?;

        let kind = IdentifierKind::from_marker(marker)
            .ok_or_else(|| AddressError::unknown_kind(topic, marker))?;

        if payload.is_empty() {
            return Err(AddressError::missing_identifier(topic).into());
        }

        let identifier = match kind {
            IdentifierKind::Numeric => IdentifierValue::Numeric(parse_decimal(payload).ok_or_else(|| {
                AddressError::invalid_identifier(topic, "Invalid numeric identifier")
            })?),
            IdentifierKind::String | IdentifierKind::Guid | IdentifierKind::ByteString => {
                IdentifierValue::Text(payload.to_string())
            }
        };

        Ok(Self {
            namespace: namespace.to_string(),
            identifier: TopicIdentifier { identifier, kind },
        })
    }

    /// Returns the namespace as a number.
    pub fn namespace_index(&self) -> u16 {
        // Validated as u16 during parsing.
        self.namespace.parse().unwrap_or_default()
    }

    /// Converts to a typed [`NodeId`].
    ///
    /// GUID payloads must be valid UUIDs. ByteString payloads are decoded
    /// as base64 when possible and otherwise taken as their UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// Returns an [`AddressError`] for a GUID payload that is not a UUID.
    pub fn to_node_id(&self) -> OpcUaResult<NodeId> {
        let ns = self.namespace_index();
        let node_id = match (&self.identifier.kind, &self.identifier.identifier) {
            (_, IdentifierValue::Numeric(v)) => NodeId::numeric(ns, *v),
            (IdentifierKind::Guid, IdentifierValue::Text(text)) => {
                let uuid = Uuid::parse_str(text).map_err(|e| {
                    AddressError::invalid_identifier(self.to_string(), format!("Invalid GUID: {}", e))
                })?;
                NodeId::guid(ns, uuid)
            }
            (IdentifierKind::ByteString, IdentifierValue::Text(text)) => {
                let bytes = BASE64
                    .decode(text)
                    .unwrap_or_else(|_| text.as_bytes().to_vec());
                NodeId {
                    namespace_index: ns,
                    identifier: NodeIdentifier::Opaque(bytes),
                }
            }
            (_, IdentifierValue::Text(text)) => NodeId::string(ns, text.clone()),
        };
        Ok(node_id)
    }
}

impl fmt::Display for TopicAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ns={};{}={}",
            self.namespace,
            self.identifier.kind.marker(),
            self.identifier.identifier
        )
    }
}

// =============================================================================
// Message-level parsing
// =============================================================================

/// Parses the topic of a message.
///
/// # Errors
///
/// Returns [`AddressError::MissingTopic`] if the message has no topic, or
/// another [`AddressError`] if the topic is malformed.
pub fn parse_topic(msg: &Message) -> OpcUaResult<TopicAddress> {
    let topic = msg.topic_str().ok_or(AddressError::MissingTopic)?;
    TopicAddress::parse(topic)
}

/// Returns the namespace of the message topic, verbatim (`"0"`, `"5"`).
///
/// # Errors
///
/// Returns an [`AddressError`] if the topic is missing or malformed.
pub fn parse_namespace(msg: &Message) -> OpcUaResult<String> {
    parse_topic(msg).map(|address| address.namespace)
}

/// Returns the identifier and kind of the message topic.
///
/// # Errors
///
/// Returns an [`AddressError`] if the topic is missing or malformed.
pub fn parse_identifier(msg: &Message) -> OpcUaResult<TopicIdentifier> {
    parse_topic(msg).map(|address| address.identifier)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpcUaError;

    fn msg(topic: &str) -> Message {
        Message::new().with_topic(topic).with_payload(serde_json::json!(""))
    }

    mod namespace {
        use super::*;

        #[test]
        fn test_namespace_zero() {
            assert_eq!(parse_namespace(&msg("ns=0;i=85")).unwrap(), "0");
        }

        #[test]
        fn test_namespace_five() {
            assert_eq!(parse_namespace(&msg("ns=5;s=TestReadWrite")).unwrap(), "5");
        }

        #[test]
        fn test_namespace_two_bytestring() {
            assert_eq!(parse_namespace(&msg("ns=2;b=TestReadWrite")).unwrap(), "2");
        }

        #[test]
        fn test_namespace_out_of_range() {
            let err = parse_namespace(&msg("ns=70000;i=1")).unwrap_err();
            assert!(matches!(
                err,
                OpcUaError::Address(AddressError::InvalidNamespace { .. })
            ));
        }
    }

    mod identifier {
        use super::*;

        #[test]
        fn test_numeric() {
            let id = parse_identifier(&msg("ns=0;i=85")).unwrap();
            assert_eq!(id.identifier, IdentifierValue::Numeric(85));
            assert_eq!(id.kind, IdentifierKind::Numeric);
        }

        #[test]
        fn test_string() {
            let id = parse_identifier(&msg("ns=5;s=TestReadWrite")).unwrap();
            assert_eq!(id.identifier, IdentifierValue::Text("TestReadWrite".into()));
            assert_eq!(id.kind, IdentifierKind::String);
        }

        #[test]
        fn test_bytestring() {
            let id = parse_identifier(&msg("ns=2;b=TestReadWrite")).unwrap();
            assert_eq!(id.identifier, IdentifierValue::Text("TestReadWrite".into()));
            assert_eq!(id.kind, IdentifierKind::ByteString);
        }

        #[test]
        fn test_guid_is_verbatim() {
            let id = parse_identifier(&msg("ns=1;g=not-a-uuid")).unwrap();
            assert_eq!(id.kind, IdentifierKind::Guid);
            assert_eq!(id.identifier, IdentifierValue::Text("not-a-uuid".into()));
        }

        #[test]
        fn test_kind_never_inferred_from_payload() {
            let id = parse_identifier(&msg("ns=1;s=1234")).unwrap();
            assert_eq!(id.kind, IdentifierKind::String);
            assert_eq!(id.identifier, IdentifierValue::Text("1234".into()));
        }

        #[test]
        fn test_payload_may_contain_separators() {
            let id = parse_identifier(&msg("ns=3;s=a;b=c")).unwrap();
            assert_eq!(id.identifier, IdentifierValue::Text("a;b=c".into()));
        }

        #[test]
        fn test_serialized_shape() {
            let id = parse_identifier(&msg("ns=0;i=85")).unwrap();
            let json = serde_json::to_value(&id).unwrap();
            assert_eq!(json, serde_json::json!({ "identifier": 85, "type": "NUMERIC" }));
        }
    }

    mod malformed {
        use super::*;

        #[test]
        fn test_missing_topic() {
            let err = parse_identifier(&Message::new()).unwrap_err();
            assert_eq!(err, OpcUaError::Address(AddressError::MissingTopic));
            assert_eq!(
                parse_namespace(&Message::new().with_topic("")).unwrap_err(),
                OpcUaError::Address(AddressError::MissingTopic)
            );
        }

        #[test]
        fn test_malformed_topics() {
            for topic in [
                "i=85",
                "ns=;i=85",
                "ns=a;i=85",
                "ns=1",
                "ns=1;85",
                "ns=1;x=85",
                "ns=1;i=",
                "ns=1;i=abc",
                "ns=1;i=-5",
                "ns=-1;i=5",
                "ns=1;i=+5",
                "ns=+1;i=5",
                "ns=1;i= 5",
                "ns=1;i=4294967296",
            ] {
                let err = parse_identifier(&msg(topic)).unwrap_err();
                assert!(err.is_malformed_address(), "{topic}");
            }
        }
    }

    mod node_id {
        use super::*;

        #[test]
        fn test_to_node_id() {
            let address = TopicAddress::parse("ns=5;s=TestReadWrite").unwrap();
            assert_eq!(address.to_node_id().unwrap(), NodeId::string(5, "TestReadWrite"));

            let address = TopicAddress::parse("ns=0;i=85").unwrap();
            assert_eq!(address.to_node_id().unwrap(), NodeId::OBJECTS_FOLDER);
        }

        #[test]
        fn test_bytestring_node_id() {
            let address = TopicAddress::parse("ns=2;b=SGVsbG8=").unwrap();
            assert_eq!(
                address.to_node_id().unwrap().identifier,
                NodeIdentifier::Opaque(b"Hello".to_vec())
            );

            let address = TopicAddress::parse("ns=2;b=TestReadWrite").unwrap();
            assert_eq!(
                address.to_node_id().unwrap().identifier,
                NodeIdentifier::Opaque(b"TestReadWrite".to_vec())
            );
        }

        #[test]
        fn test_invalid_guid_node_id() {
            let address = TopicAddress::parse("ns=1;g=nope").unwrap();
            assert!(address.to_node_id().unwrap_err().is_malformed_address());
        }

        #[test]
        fn test_display_round_trip() {
            let address = TopicAddress::parse("ns=7;g=550e8400-e29b-41d4-a716-446655440000").unwrap();
            assert_eq!(TopicAddress::parse(&address.to_string()).unwrap(), address);
        }
    }
}
