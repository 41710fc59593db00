// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Builders
//!
//! Builders for messages shaped the way flow users write them.

use serde_json::{Map, Value};
use uaflow_config::{FlowNodeConfig, FlowNodeKind};
use uaflow_core::{AddressSpaceItem, Message};
use uaflow_opcua::MethodDefaults;

// =============================================================================
// MessageBuilder
// =============================================================================

/// Builds a message from raw JSON fields, so fields can be placed on the
/// root or under `payload` freely.
#[derive(Debug, Default)]
pub struct MessageBuilder {
    root: Map<String, Value>,
    payload: Map<String, Value>,
}

impl MessageBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the topic.
    pub fn topic(self, topic: &str) -> Self {
        self.root_field("topic", Value::String(topic.to_string()))
    }

    /// Sets a field on the message root.
    pub fn root_field(mut self, key: &str, value: Value) -> Self {
        self.root.insert(key.to_string(), value);
        self
    }

    /// Sets a field under `payload`.
    pub fn payload_field(mut self, key: &str, value: Value) -> Self {
        self.payload.insert(key.to_string(), value);
        self
    }

    /// Returns the message as raw JSON.
    pub fn build_value(mut self) -> Value {
        if !self.payload.is_empty() {
            self.root.insert("payload".to_string(), Value::Object(self.payload));
        }
        Value::Object(self.root)
    }

    /// Builds the message.
    pub fn build(self) -> Message {
        Message::from_value(self.build_value()).expect("Builder produced an invalid message")
    }
}

// =============================================================================
// FlowNodeBuilder
// =============================================================================

/// Builds a [`FlowNodeConfig`].
#[derive(Debug)]
pub struct FlowNodeBuilder {
    node: FlowNodeConfig,
}

impl FlowNodeBuilder {
    /// Creates a builder for a node of the given kind.
    pub fn new(name: &str, kind: FlowNodeKind) -> Self {
        Self {
            node: FlowNodeConfig::new(name, kind),
        }
    }

    /// Sets the topic.
    pub fn topic(mut self, topic: &str) -> Self {
        self.node.topic = Some(topic.to_string());
        self
    }

    /// Adds an address-space item.
    pub fn item(mut self, name: &str, node_id: &str, datatype: Option<&str>) -> Self {
        let mut item = AddressSpaceItem::new(name, node_id);
        if let Some(datatype) = datatype {
            item = item.with_datatype(datatype);
        }
        self.node.address_space_items.push(item);
        self
    }

    /// Sets the interval.
    pub fn interval(mut self, interval: u64, unit: &str) -> Self {
        self.node.interval = Some(interval);
        self.node.interval_unit = Some(unit.to_string());
        self
    }

    /// Sets the method defaults.
    pub fn method(mut self, object_id: &str, method_id: &str) -> Self {
        self.node.method = Some(MethodDefaults {
            object_id: object_id.to_string(),
            method_id: method_id.to_string(),
            ..MethodDefaults::default()
        });
        self
    }

    /// Builds the node.
    pub fn build(self) -> FlowNodeConfig {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_builder_places_fields() {
        let value = MessageBuilder::new()
            .topic("ns=1;i=1")
            .payload_field("nodesToRead", json!(["ns=1;i=2"]))
            .build_value();
        assert_eq!(value, json!({ "topic": "ns=1;i=1", "payload": { "nodesToRead": ["ns=1;i=2"] } }));
    }
}
