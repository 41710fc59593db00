// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Node-Address Normalizer Integration Tests
//!
//! - `test_read_*`: read/write list precedence
//! - `test_listen_*`: subscription list precedence
//! - `test_resolve_*`: batch NodeId resolution

use serde_json::json;
use uaflow_core::{AddressSpaceItem, Message};
use uaflow_opcua::nodes::{Rule, LISTEN_RULES};
use uaflow_opcua::{build_nodes_to_listen, build_nodes_to_read, NodeAddressNormalizer, NodeId};
use uaflow_tests::prelude::*;

// =============================================================================
// Read Tests
// =============================================================================

#[test]
fn test_read_nodes_to_write_root_or_payload() {
    init_test_logging();
    assert_nodes(&build_nodes_to_read(&MessageFixtures::write_at_root()), &["ns=4;s=X"]);
    assert_nodes(&build_nodes_to_read(&MessageFixtures::write_in_payload()), &["ns=4;s=X"]);
}

#[test]
fn test_read_precedence() {
    let msg = MessageFixtures::all_shapes();
    assert_nodes(&build_nodes_to_read(&msg), &["ns=1;s=Read"]);

    let msg = MessageBuilder::new()
        .topic("ns=1;s=FromTopic")
        .payload_field("addressSpaceItems", json!([{ "name": "A", "nodeId": "ns=1;s=A" }]))
        .build();
    assert_nodes(&build_nodes_to_read(&msg), &["ns=1;s=A"]);

    let msg = MessageBuilder::new().topic("ns=1;s=FromTopic").build();
    assert_nodes(&build_nodes_to_read(&msg), &["ns=1;s=FromTopic"]);
}

#[test]
fn test_read_root_wins_over_payload() {
    let msg = MessageBuilder::new()
        .root_field("nodesToRead", json!(["ns=1;s=Root"]))
        .payload_field("nodesToRead", json!(["ns=1;s=Payload"]))
        .build();
    assert_nodes(&build_nodes_to_read(&msg), &["ns=1;s=Root"]);
}

#[test]
fn test_read_any_root_shape_wins_over_payload() {
    let msg = MessageBuilder::new()
        .root_field("nodesToWrite", json!(["ns=1;s=RootWrite"]))
        .payload_field("nodesToRead", json!(["ns=1;s=PayloadRead"]))
        .build();
    assert_nodes(&build_nodes_to_read(&msg), &["ns=1;s=RootWrite"]);

    let msg = MessageBuilder::new()
        .root_field("nodesToRead", json!([]))
        .payload_field("nodesToRead", json!(["ns=1;s=PayloadRead"]))
        .root_field("nodesToWrite", json!(["ns=1;s=RootWrite"]))
        .build();
    assert_nodes(&build_nodes_to_read(&msg), &["ns=1;s=RootWrite"]);
}

#[test]
fn test_read_empty_lists_fall_through() {
    let msg = MessageBuilder::new()
        .root_field("nodesToRead", json!([]))
        .payload_field("nodesToWrite", json!(["ns=4;s=X"]))
        .build();
    assert_nodes(&build_nodes_to_read(&msg), &["ns=4;s=X"]);
}

#[test]
fn test_read_no_shape() {
    assert!(build_nodes_to_read(&Message::new()).is_empty());

    let msg = MessageBuilder::new().topic("not a node id").build();
    assert!(build_nodes_to_read(&msg).is_empty());

    let msg = MessageBuilder::new()
        .payload_field("nodesToRead", json!("ns=1;s=NotAList"))
        .build();
    assert!(build_nodes_to_read(&msg).is_empty());
}

// =============================================================================
// Listen Tests
// =============================================================================

#[test]
fn test_listen_precedence() {
    let msg = MessageFixtures::all_shapes();
    assert_item_node_ids(&build_nodes_to_listen(&msg), &["ns=1;s=Selected"]);

    let msg = Message::new()
        .with_topic("ns=1;s=FromTopic")
        .with_address_space_items(AddressSpaceFixtures::boiler());
    assert_item_node_ids(
        &build_nodes_to_listen(&msg),
        &["ns=1;s=Boiler.Pressure", "ns=1;s=Boiler.Running", "ns=1;i=2001"],
    );
}

#[test]
fn test_listen_topic_fallback() {
    let items = build_nodes_to_listen(&MessageFixtures::objects_folder());
    assert_eq!(items, vec![AddressSpaceItem::new("", "ns=0;i=85")]);
}

#[test]
fn test_listen_ignores_nodes_to_read() {
    let msg = Message::new().with_nodes_to_read(["ns=1;s=Read"]);
    assert!(build_nodes_to_listen(&msg).is_empty());
}

// =============================================================================
// Custom Rule Tests
// =============================================================================

fn tagged_nodes(msg: &Message) -> Option<Vec<String>> {
    msg.extra
        .get("tags")
        .and_then(|tags| serde_json::from_value(tags.clone()).ok())
}

#[test]
fn test_custom_rule_table() {
    let normalizer = NodeAddressNormalizer::with_rules(
        vec![Rule::new("tags", tagged_nodes)],
        LISTEN_RULES.to_vec(),
    );

    let msg = MessageBuilder::new()
        .root_field("tags", json!(["ns=7;s=Tagged"]))
        .root_field("nodesToRead", json!(["ns=1;s=Ignored"]))
        .build();
    assert_nodes(&normalizer.nodes_to_read(&msg), &["ns=7;s=Tagged"]);
}

// =============================================================================
// Resolve Tests
// =============================================================================

#[test]
fn test_resolve_collects_failures() {
    let msg = Message::new().with_nodes_to_read(["ns=2;s=Good", "ns=2;x=Bad", "i=2258", "ns=;s=Empty"]);
    let resolution = NodeAddressNormalizer::new().resolve_node_ids(&msg);

    assert_eq!(
        resolution.node_ids(),
        vec![NodeId::string(2, "Good"), NodeId::numeric(0, 2258)]
    );
    assert_eq!(resolution.failed.len(), 2);
    assert_eq!(resolution.failed[0].0, "ns=2;x=Bad");
    for (_, error) in &resolution.failed {
        assert_malformed_address(error);
    }
    assert!(!resolution.is_complete());
}

#[test]
fn test_resolve_complete() {
    let msg = Message::new().with_address_space_items(AddressSpaceFixtures::boiler());
    let resolution = NodeAddressNormalizer::new().resolve_node_ids(&msg);
    assert!(resolution.is_complete());
    assert_eq!(resolution.resolved.len(), 3);
}
