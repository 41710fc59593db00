// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Session-State Integration Tests
//!
//! - `test_state_*`: connector state to node status mapping
//! - `test_session_*`: session sharing and invalidation

use std::sync::Arc;

use uaflow_opcua::{
    is_session_bad, set_initial_state, Connector, ConnectorState, FlowNodeState, NodeStatus,
    OpcUaError,
};
use uaflow_tests::prelude::*;

// =============================================================================
// State Mapping Tests
// =============================================================================

#[test]
fn test_state_mapping_is_total() {
    init_test_logging();
    let connector = MockConnector::new();
    let cases = [
        ("INIT", NodeStatus::Connecting),
        ("OPEN", NodeStatus::Active),
        ("LOCKED", NodeStatus::Locked),
        ("UNLOCKED", NodeStatus::Unlocked),
        ("", NodeStatus::Waiting),
        ("garbage", NodeStatus::Waiting),
    ];

    for (tag, expected) in cases {
        connector.set_state(tag);
        let mut node = FlowNodeState::new("reader");
        assert_eq!(node.apply(&connector), expected, "state {tag:?}");
        assert_eq!(node.status(), expected);
    }
}

#[test]
fn test_state_status_strings() {
    let statuses: Vec<&str> = ["INIT", "OPEN", "LOCKED", "UNLOCKED", "CLOSED"]
        .into_iter()
        .map(|tag| ConnectorState::from_tag(tag).node_status().as_str())
        .collect();
    assert_eq!(statuses, ["connecting", "active", "locked", "unlocked", "waiting"]);
}

#[test]
fn test_state_reevaluated_on_each_change() {
    let connector = MockConnector::new();
    let mut node = FlowNodeState::new("reader");

    assert_eq!(node.apply(&connector), NodeStatus::Connecting);
    connector.open_session();
    assert_eq!(node.apply(&connector), NodeStatus::Active);
    connector.set_state("LOCKED");
    assert_eq!(node.apply(&connector), NodeStatus::Locked);
    connector.set_state("UNLOCKED");
    assert_eq!(node.apply(&connector), NodeStatus::Unlocked);
}

// =============================================================================
// Session Tests
// =============================================================================

#[test]
fn test_session_shared_on_open() {
    let connector = MockConnector::new();
    let session = connector.open_session();

    let mut first = FlowNodeState::new("reader");
    let mut second = FlowNodeState::new("writer");
    set_initial_state(connector.state(), &connector, &mut first);
    set_initial_state(connector.state(), &connector, &mut second);

    assert!(Arc::ptr_eq(first.session().unwrap(), &session));
    assert!(Arc::ptr_eq(second.session().unwrap(), &session));
    assert_eq!(Arc::strong_count(&session), 4);
}

#[test]
fn test_session_kept_on_other_states() {
    let connector = MockConnector::new();
    let session = connector.open_session();
    let mut node = FlowNodeState::new("reader");
    node.apply(&connector);

    connector.drop_session();
    connector.set_state("LOCKED");
    node.apply(&connector);
    assert!(Arc::ptr_eq(node.session().unwrap(), &session));

    connector.set_state("OPEN");
    node.apply(&connector);
    assert!(node.session().is_none());
}

#[test]
fn test_session_replaced_on_reopen() {
    let connector = MockConnector::new();
    let first = connector.open_session();
    let mut node = FlowNodeState::new("reader");
    node.apply(&connector);

    let second = connector.open_session();
    node.apply(&connector);

    assert_ne!(first.id, second.id);
    assert!(Arc::ptr_eq(node.session().unwrap(), &second));
}

#[test]
fn test_session_invalidating_errors() {
    assert!(is_session_bad(&"Error: BadSessionIdInvalid (0x80250000)"));
    assert!(is_session_bad(&"Invalid Channel"));
    assert!(!is_session_bad(&"invalid channel"));
    assert!(!is_session_bad(&"BadNodeIdUnknown"));

    let err = OpcUaError::from_transport_message("BadSessionClosed: session was closed").unwrap();
    assert!(err.is_session_invalidating());
    assert!(OpcUaError::from_transport_message("BadTimeout").is_none());
}
