// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Flow message envelope.
//!
//! Messages arriving from the flow runtime are loosely shaped JSON objects.
//! The fields that drive OPC UA requests (`topic`, `nodesToRead`,
//! `nodesToWrite`, `addressSpaceItems`, `addressItemsToRead`) are typed here;
//! every other field is preserved untouched in [`Message::extra`] so a
//! message can be passed on without losing data.
//!
//! Request fields may appear either on the message root or nested once
//! under `payload`. Root fields are typed members; payload fields are read
//! on demand with [`Message::payload_field`].
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use uaflow_core::message::Message;
//!
//! let msg = Message::from_value(json!({
//!     "topic": "ns=5;s=TestReadWrite",
//!     "payload": { "nodesToWrite": ["ns=4;s=X"] }
//! })).unwrap();
//!
//! assert_eq!(msg.topic.as_deref(), Some("ns=5;s=TestReadWrite"));
//! let nodes: Option<Vec<String>> = msg.payload_field("nodesToWrite");
//! assert_eq!(nodes, Some(vec!["ns=4;s=X".to_string()]));
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreResult;

/// Field name for NodeId lists used by read requests.
pub const FIELD_NODES_TO_READ: &str = "nodesToRead";
/// Field name for NodeId lists used by write requests.
pub const FIELD_NODES_TO_WRITE: &str = "nodesToWrite";
/// Field name for address-space item lists.
pub const FIELD_ADDRESS_SPACE_ITEMS: &str = "addressSpaceItems";
/// Field name for address-space items selected for listening.
pub const FIELD_ADDRESS_ITEMS_TO_READ: &str = "addressItemsToRead";

// =============================================================================
// AddressSpaceItem
// =============================================================================

/// A configured reference to a node in the server address space.
///
/// `name` is a label only and is never used for addressing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSpaceItem {
    /// Display label.
    #[serde(default)]
    pub name: String,

    /// NodeId address string, e.g. `ns=2;s=Temperature`.
    pub node_id: String,

    /// Optional DataType tag used to decode values read from this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype_name: Option<String>,
}

impl AddressSpaceItem {
    /// Creates an item without a DataType tag.
    pub fn new(name: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_id: node_id.into(),
            datatype_name: None,
        }
    }

    /// Sets the DataType tag.
    pub fn with_datatype(mut self, datatype_name: impl Into<String>) -> Self {
        self.datatype_name = Some(datatype_name.into());
        self
    }
}

// =============================================================================
// Message
// =============================================================================

/// A flow message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Topic, usually a NodeId address string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Payload. Any JSON value.
    #[serde(default)]
    pub payload: Value,

    /// Node type tag set by the producing node (e.g. `browse`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodetype: Option<String>,

    /// NodeId strings to read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes_to_read: Option<Vec<String>>,

    /// NodeId strings to write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes_to_write: Option<Vec<String>>,

    /// Address-space items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_space_items: Option<Vec<AddressSpaceItem>>,

    /// Address-space items selected for listening.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_items_to_read: Option<Vec<AddressSpaceItem>>,

    /// All other fields, preserved as received.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    /// Creates an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a browse request message for `topic`.
    pub fn browse(topic: impl Into<String>) -> Self {
        Self {
            topic: Some(topic.into()),
            payload: Value::String(String::new()),
            nodetype: Some("browse".to_string()),
            ..Self::default()
        }
    }

    /// Decodes a message from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidMessage`](crate::error::CoreError::InvalidMessage)
    /// if a typed field has the wrong shape.
    pub fn from_value(value: Value) -> CoreResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Decodes a message from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or a typed field has
    /// the wrong shape.
    pub fn from_json(text: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encodes the message back into a JSON value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Sets the topic.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Sets the payload.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Sets `nodesToRead` on the message root.
    pub fn with_nodes_to_read<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes_to_read = Some(nodes.into_iter().map(Into::into).collect());
        self
    }

    /// Sets `nodesToWrite` on the message root.
    pub fn with_nodes_to_write<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes_to_write = Some(nodes.into_iter().map(Into::into).collect());
        self
    }

    /// Sets `addressSpaceItems` on the message root.
    pub fn with_address_space_items(mut self, items: Vec<AddressSpaceItem>) -> Self {
        self.address_space_items = Some(items);
        self
    }

    /// Sets `addressItemsToRead` on the message root.
    pub fn with_address_items_to_read(mut self, items: Vec<AddressSpaceItem>) -> Self {
        self.address_items_to_read = Some(items);
        self
    }

    /// Inserts an extra field on the message root.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.extra.insert(key.into(), value);
    }

    /// Returns the topic if present and non-empty.
    pub fn topic_str(&self) -> Option<&str> {
        self.topic.as_deref().filter(|t| !t.is_empty())
    }

    /// Returns a raw payload field if the payload is an object.
    pub fn payload_value(&self, key: &str) -> Option<&Value> {
        self.payload.as_object()?.get(key)
    }

    /// Decodes a payload field into `T`.
    ///
    /// Returns `None` if the payload is not an object, the field is absent,
    /// or it does not decode as `T`.
    pub fn payload_field<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.payload_value(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::debug!(field = key, error = %err, "Ignoring payload field with unexpected shape");
                None
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
