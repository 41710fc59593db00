// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built messages, DataValues and configuration files.

use serde_json::json;
use uaflow_core::{AddressSpaceItem, Message};
use uaflow_opcua::status::{BAD_NODE_ID_UNKNOWN, UNCERTAIN};
use uaflow_opcua::{DataValue, ReadResult};

// =============================================================================
// Message Fixtures
// =============================================================================

/// Messages in each of the shapes the normalizer accepts.
pub struct MessageFixtures;

impl MessageFixtures {
    /// `{topic: "ns=0;i=85"}`: the Objects folder.
    pub fn objects_folder() -> Message {
        Message::new().with_topic("ns=0;i=85")
    }

    /// A string-identifier topic.
    pub fn test_read_write() -> Message {
        Message::new().with_topic("ns=5;s=TestReadWrite")
    }

    /// `nodesToWrite` on the message root.
    pub fn write_at_root() -> Message {
        Message::new().with_nodes_to_write(["ns=4;s=X"])
    }

    /// `nodesToWrite` nested under `payload`.
    pub fn write_in_payload() -> Message {
        Message::new().with_payload(json!({ "nodesToWrite": ["ns=4;s=X"] }))
    }

    /// A message carrying every shape at once.
    pub fn all_shapes() -> Message {
        Message::new()
            .with_topic("ns=1;s=FromTopic")
            .with_nodes_to_read(["ns=1;s=Read"])
            .with_nodes_to_write(["ns=1;s=Write"])
            .with_address_space_items(AddressSpaceFixtures::boiler())
            .with_address_items_to_read(vec![AddressSpaceItem::new("Selected", "ns=1;s=Selected")])
    }
}

// =============================================================================
// Address Space Fixtures
// =============================================================================

/// Configured address-space items.
pub struct AddressSpaceFixtures;

impl AddressSpaceFixtures {
    /// A small boiler with typed items.
    pub fn boiler() -> Vec<AddressSpaceItem> {
        vec![
            AddressSpaceItem::new("Pressure", "ns=1;s=Boiler.Pressure").with_datatype("Double"),
            AddressSpaceItem::new("Running", "ns=1;s=Boiler.Running").with_datatype("Boolean"),
            AddressSpaceItem::new("Mode", "ns=1;i=2001").with_datatype("Byte"),
        ]
    }
}

// =============================================================================
// DataValue Fixtures
// =============================================================================

/// Read results as a transport would deliver them.
pub struct DataValueFixtures;

impl DataValueFixtures {
    /// Results for [`AddressSpaceFixtures::boiler`]: two good, one bad.
    pub fn boiler_results() -> Vec<ReadResult> {
        vec![
            ReadResult::new(
                "ns=1;s=Boiler.Pressure",
                DataValue::new(json!({ "dataType": "Double", "value": "2.75" })),
            ),
            ReadResult::new("ns=1;s=Boiler.Running", DataValue::new(json!("true"))),
            ReadResult::new(
                "ns=1;i=2001",
                DataValue::new(json!(null)).with_status(BAD_NODE_ID_UNKNOWN),
            ),
        ]
    }

    /// A single uncertain result.
    pub fn uncertain(node_id: &str) -> ReadResult {
        ReadResult::new(node_id, DataValue::new(json!(0)).with_status(UNCERTAIN))
    }
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Configuration file contents.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// A YAML file with one node of each kind.
    pub fn yaml() -> &'static str {
        r#"
codec:
  mode: lenient
nodes:
  - name: reader
    kind: read
    addressSpaceItems:
      - name: Pressure
        nodeId: "ns=1;s=Boiler.Pressure"
        datatypeName: Double
  - name: writer
    kind: write
    topic: "ns=4;s=X"
  - name: watcher
    kind: listen
    topic: "ns=1;i=1001"
    interval: 5
    intervalUnit: s
  - name: caller
    kind: method
    method:
      objectId: "ns=1;i=1000"
      methodId: "ns=1;i=1001"
      inputArguments:
        - name: Setpoint
          dataType: Double
          value: "21.5"
logging:
  level: debug
  format: json
"#
    }

    /// The same reader node as TOML.
    pub fn toml() -> &'static str {
        r#"
[codec]
mode = "strict"

[[nodes]]
name = "reader"
kind = "read"

[[nodes.addressSpaceItems]]
name = "Pressure"
nodeId = "ns=1;s=Boiler.Pressure"
datatypeName = "Double"
"#
    }

    /// The same reader node as JSON.
    pub fn json() -> &'static str {
        r#"{
  "nodes": [
    {
      "name": "reader",
      "addressSpaceItems": [
        { "name": "Pressure", "nodeId": "ns=1;s=Boiler.Pressure", "datatypeName": "Double" }
      ]
    }
  ]
}"#
    }
}
