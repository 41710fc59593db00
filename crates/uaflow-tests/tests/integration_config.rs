// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Configuration Integration Tests
//!
//! - `test_load_*`: loading files in each format
//! - `test_node_*`: request messages and method calls built from nodes
//! - `test_validation_*`: rejected configurations

use serde_json::json;
use uaflow_config::{
    ConfigError, ConfigLoader, FlowNodeKind, LogFormat, LogLevel, UaFlowConfig,
};
use uaflow_core::Message;
use uaflow_opcua::{
    build_nodes_to_listen, build_nodes_to_read, method_response, CodecMode, MethodCallRequest,
    MethodCallResult, NodeId, VariantCodec, VariantValue,
};
use uaflow_tests::common::temp_config_file;
use uaflow_tests::prelude::*;

fn load(content: &str, extension: &str) -> Result<UaFlowConfig, ConfigError> {
    let file = temp_config_file(content, extension);
    ConfigLoader::new()
        .with_env_prefix("UAFLOW_INTEGRATION_UNSET")
        .load(file.path())
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_load_yaml() {
    init_test_logging();
    let config = load(ConfigFixtures::yaml(), "yaml").unwrap();

    assert_eq!(config.codec.mode, CodecMode::Lenient);
    assert_eq!(config.nodes.len(), 4);
    assert_eq!(config.logging.level, LogLevel::Debug);
    assert_eq!(config.logging.format, LogFormat::Json);

    let watcher = config.node("watcher").unwrap();
    assert_eq!(watcher.kind, FlowNodeKind::Listen);
    assert_eq!(watcher.interval_ms(), Some(5000));
}

#[test]
fn test_load_formats_agree() {
    let toml = load(ConfigFixtures::toml(), "toml").unwrap();
    let json = load(ConfigFixtures::json(), "json").unwrap();

    assert_eq!(toml.codec.mode, CodecMode::Strict);
    assert_eq!(json.codec.mode, CodecMode::Lenient);
    assert_eq!(toml.nodes, json.nodes);
}

// =============================================================================
// Node Tests
// =============================================================================

#[test]
fn test_node_request_messages() {
    let config = load(ConfigFixtures::yaml(), "yaml").unwrap();

    let reader = config.node("reader").unwrap().request_message();
    assert_nodes(&build_nodes_to_read(&reader), &["ns=1;s=Boiler.Pressure"]);

    let writer = config.node("writer").unwrap().request_message();
    assert_nodes(&build_nodes_to_read(&writer), &["ns=4;s=X"]);

    let watcher = config.node("watcher").unwrap().request_message();
    assert_item_node_ids(&build_nodes_to_listen(&watcher), &["ns=1;i=1001"]);
}

#[test]
fn test_node_method_call_from_config() {
    let config = load(ConfigFixtures::yaml(), "yaml").unwrap();
    let defaults = config.node("caller").unwrap().method.clone().unwrap();
    let codec = VariantCodec::lenient();

    let call = MethodCallRequest::from_message(&Message::new(), &defaults, &codec).unwrap();
    assert_eq!(call.object_id, NodeId::numeric(1, 1000));
    assert_eq!(call.method_id, NodeId::numeric(1, 1001));
    assert_eq!(call.input_arguments[0].value, VariantValue::Double(21.5));

    let msg = MessageBuilder::new()
        .payload_field("methodId", json!("ns=1;i=1002"))
        .payload_field(
            "inputArguments",
            json!([{ "name": "Count", "dataType": "ns=0;i=7", "value": "3" }]),
        )
        .build();
    let call = MethodCallRequest::from_message(&msg, &defaults, &codec).unwrap();
    assert_eq!(call.object_id, NodeId::numeric(1, 1000));
    assert_eq!(call.method_id, NodeId::numeric(1, 1002));
    assert_eq!(call.input_arguments[0].value, VariantValue::UInt32(3));

    let response = method_response(&msg, "ns=1;i=1002", &[MethodCallResult::good(Vec::new())], false);
    assert_eq!(response.nodetype.as_deref(), Some("method"));
    assert_eq!(response.payload["definition"]["methodId"], "ns=1;i=1002");
    assert_entry_status(&response, [1, 0, 0]);
}

#[test]
fn test_node_method_bad_ids() {
    let node = FlowNodeBuilder::new("caller", FlowNodeKind::Method)
        .method("ns=1;i=1000", "ns=1;i=1001")
        .build();
    let defaults = node.method.unwrap();

    let msg = MessageBuilder::new()
        .payload_field("objectId", json!("ns=1;q=1"))
        .build();
    let err = MethodCallRequest::from_message(&msg, &defaults, &VariantCodec::lenient()).unwrap_err();
    assert_malformed_address(&err);
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_validation_duplicate_names() {
    let yaml = "nodes:\n  - name: a\n    topic: \"ns=1;i=1\"\n  - name: a\n    topic: \"ns=1;i=2\"\n";
    let err = load(yaml, "yaml").unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateNodeName { .. }));
}

#[test]
fn test_validation_unknown_datatype() {
    let yaml = r#"
nodes:
  - name: reader
    addressSpaceItems:
      - name: X
        nodeId: "ns=1;s=X"
        datatypeName: Quantum
"#;
    let err = load(yaml, "yaml").unwrap_err();
    assert!(err.is_validation_error());
}

#[test]
fn test_validation_unknown_field() {
    let err = load("nodes:\n  - name: a\n    topc: \"ns=1;i=1\"\n", "yaml").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_validation_builder_nodes() {
    let config = UaFlowConfig {
        nodes: vec![
            FlowNodeBuilder::new("reader", FlowNodeKind::Read)
                .item("Pressure", "ns=1;s=Pressure", Some("Double"))
                .build(),
            FlowNodeBuilder::new("watcher", FlowNodeKind::Listen)
                .topic("ns=1;i=1001")
                .interval(250, "ms")
                .build(),
        ],
        ..UaFlowConfig::default()
    };
    assert!(config.validate().is_ok());
}
