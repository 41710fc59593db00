// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Node-address normalization.
//!
//! Requests name their target nodes in one of several shapes. The normalizer
//! turns them into one canonical, order-preserving list by walking an
//! ordered table of extraction rules and taking the first non-empty result.
//!
//! The whole table is evaluated on the message root first. Only when no
//! rule matches there is it evaluated again on `msg.payload`, which acts as
//! a fallback container. The topic rule is root-only and is tried last,
//! after both passes.
//!
//! Read/write precedence:
//!
//! 1. `nodesToRead`
//! 2. `nodesToWrite`
//! 3. `addressSpaceItems`, projected to their `nodeId`
//! 4. the topic, when it is a valid node address (root only)
//!
//! Listen precedence:
//!
//! 1. `addressItemsToRead`
//! 2. `addressSpaceItems`
//! 3. the topic, when it is a valid node address (root only)
//!
//! Lists are never merged or de-duplicated. A message with none of these
//! shapes yields an empty list.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use uaflow_core::Message;
//! use uaflow_opcua::nodes::build_nodes_to_read;
//!
//! let msg = Message::new().with_payload(json!({ "nodesToWrite": ["ns=4;s=X"] }));
//! assert_eq!(build_nodes_to_read(&msg), vec!["ns=4;s=X".to_string()]);
//! ```

use std::fmt;

use uaflow_core::message::{
    FIELD_ADDRESS_ITEMS_TO_READ, FIELD_ADDRESS_SPACE_ITEMS, FIELD_NODES_TO_READ,
    FIELD_NODES_TO_WRITE,
};
use uaflow_core::{AddressSpaceItem, Message};

use crate::error::OpcUaError;
use crate::topic::TopicAddress;
use crate::types::NodeId;

/// A rule that extracts node addresses from one request shape.
pub type ExtractionRule<T> = fn(&Message) -> Option<Vec<T>>;

/// Where a rule is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// On the message root, then on `msg.payload` as a fallback container.
    RootThenPayload,
    /// On the message root only, once no `RootThenPayload` rule matched
    /// in either location.
    RootOnly,
}

/// A named extraction rule.
pub struct Rule<T> {
    /// Shape name, used in logs.
    pub name: &'static str,
    /// Extraction function.
    pub extract: ExtractionRule<T>,
    /// Where the rule is evaluated.
    pub scope: RuleScope,
}

impl<T> Rule<T> {
    /// Creates a rule evaluated on the root, then on the payload.
    pub const fn new(name: &'static str, extract: ExtractionRule<T>) -> Self {
        Self {
            name,
            extract,
            scope: RuleScope::RootThenPayload,
        }
    }

    /// Creates a rule evaluated on the root only, after the payload pass.
    pub const fn root_only(name: &'static str, extract: ExtractionRule<T>) -> Self {
        Self {
            name,
            extract,
            scope: RuleScope::RootOnly,
        }
    }
}

impl<T> Clone for Rule<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Rule<T> {}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Default read/write rules in precedence order.
pub const READ_RULES: [Rule<String>; 4] = [
    Rule::new(FIELD_NODES_TO_READ, nodes_to_read),
    Rule::new(FIELD_NODES_TO_WRITE, nodes_to_write),
    Rule::new(FIELD_ADDRESS_SPACE_ITEMS, address_space_node_ids),
    Rule::root_only("topic", topic_node_id),
];

/// Default listen rules in precedence order.
pub const LISTEN_RULES: [Rule<AddressSpaceItem>; 3] = [
    Rule::new(FIELD_ADDRESS_ITEMS_TO_READ, address_items_to_read),
    Rule::new(FIELD_ADDRESS_SPACE_ITEMS, address_space_items),
    Rule::root_only("topic", topic_item),
];

// =============================================================================
// Rules
// =============================================================================

fn non_empty<T: Clone>(list: &Option<Vec<T>>) -> Option<Vec<T>> {
    list.clone().filter(|l| !l.is_empty())
}

fn nodes_to_read(msg: &Message) -> Option<Vec<String>> {
    non_empty(&msg.nodes_to_read)
}

fn nodes_to_write(msg: &Message) -> Option<Vec<String>> {
    non_empty(&msg.nodes_to_write)
}

fn address_space_items(msg: &Message) -> Option<Vec<AddressSpaceItem>> {
    non_empty(&msg.address_space_items)
}

fn address_items_to_read(msg: &Message) -> Option<Vec<AddressSpaceItem>> {
    non_empty(&msg.address_items_to_read)
}

fn address_space_node_ids(msg: &Message) -> Option<Vec<String>> {
    address_space_items(msg).map(|items| items.into_iter().map(|item| item.node_id).collect())
}

fn valid_topic(msg: &Message) -> Option<&str> {
    msg.topic_str()
        .filter(|topic| TopicAddress::parse(topic).is_ok())
}

fn topic_node_id(msg: &Message) -> Option<Vec<String>> {
    valid_topic(msg).map(|topic| vec![topic.to_string()])
}

fn topic_item(msg: &Message) -> Option<Vec<AddressSpaceItem>> {
    valid_topic(msg).map(|topic| vec![AddressSpaceItem::new("", topic)])
}

/// Lifts the request fields found under `msg.payload` into a message of
/// their own, so rules read both locations the same way. Fields with an
/// unexpected shape are dropped one by one.
fn payload_view(msg: &Message) -> Option<Message> {
    msg.payload.as_object()?;

    let mut view = Message::new();
    view.nodes_to_read = msg.payload_field(FIELD_NODES_TO_READ);
    view.nodes_to_write = msg.payload_field(FIELD_NODES_TO_WRITE);
    view.address_space_items = msg.payload_field(FIELD_ADDRESS_SPACE_ITEMS);
    view.address_items_to_read = msg.payload_field(FIELD_ADDRESS_ITEMS_TO_READ);
    Some(view)
}

fn first_match<T>(rules: &[Rule<T>], msg: &Message, operation: &str) -> Vec<T> {
    let payload = payload_view(msg);
    let passes = [
        ("root", Some(msg), RuleScope::RootThenPayload),
        ("payload", payload.as_ref(), RuleScope::RootThenPayload),
        ("root", Some(msg), RuleScope::RootOnly),
    ];

    for (location, view, scope) in passes {
        let Some(view) = view else { continue };
        for rule in rules.iter().filter(|rule| rule.scope == scope) {
            if let Some(list) = (rule.extract)(view) {
                tracing::debug!(
                    operation,
                    shape = rule.name,
                    location,
                    count = list.len(),
                    "Resolved node addresses"
                );
                return list;
            }
        }
    }

    tracing::debug!(operation, "No node address shape in message");
    Vec::new()
}

// =============================================================================
// NodeAddressNormalizer
// =============================================================================

/// Normalizes request messages into node address lists.
#[derive(Debug, Clone)]
pub struct NodeAddressNormalizer {
    read_rules: Vec<Rule<String>>,
    listen_rules: Vec<Rule<AddressSpaceItem>>,
}

impl Default for NodeAddressNormalizer {
    fn default() -> Self {
        Self {
            read_rules: READ_RULES.to_vec(),
            listen_rules: LISTEN_RULES.to_vec(),
        }
    }
}

impl NodeAddressNormalizer {
    /// Creates a normalizer with the default rule tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a normalizer with custom rule tables.
    pub fn with_rules(read_rules: Vec<Rule<String>>, listen_rules: Vec<Rule<AddressSpaceItem>>) -> Self {
        Self {
            read_rules,
            listen_rules,
        }
    }

    /// Returns the NodeId strings to read or write.
    pub fn nodes_to_read(&self, msg: &Message) -> Vec<String> {
        first_match(&self.read_rules, msg, "read")
    }

    /// Returns the items to subscribe to.
    pub fn nodes_to_listen(&self, msg: &Message) -> Vec<AddressSpaceItem> {
        first_match(&self.listen_rules, msg, "listen")
    }

    /// Parses every address from [`nodes_to_read`](Self::nodes_to_read).
    ///
    /// Malformed addresses are collected per address and do not stop the
    /// batch.
    pub fn resolve_node_ids(&self, msg: &Message) -> NodeResolution {
        let mut resolution = NodeResolution::default();
        for address in self.nodes_to_read(msg) {
            match address.parse::<NodeId>() {
                Ok(node_id) => resolution.resolved.push((address, node_id)),
                Err(error) => {
                    error.log("resolve_node_ids");
                    resolution.failed.push((address, error));
                }
            }
        }
        resolution
    }
}

/// Outcome of resolving a batch of node addresses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeResolution {
    /// Addresses that parsed, with their NodeIds, in input order.
    pub resolved: Vec<(String, NodeId)>,
    /// Addresses that did not parse, in input order.
    pub failed: Vec<(String, OpcUaError)>,
}

impl NodeResolution {
    /// Returns the parsed NodeIds.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.resolved.iter().map(|(_, id)| id.clone()).collect()
    }

    /// Returns `true` if every address parsed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Returns the NodeId strings to read or write, using the default rules.
pub fn build_nodes_to_read(msg: &Message) -> Vec<String> {
    first_match(&READ_RULES, msg, "read")
}

/// Returns the items to subscribe to, using the default rules.
pub fn build_nodes_to_listen(msg: &Message) -> Vec<AddressSpaceItem> {
    first_match(&LISTEN_RULES, msg, "listen")
}

// =============================================================================
// Tests
// =============================================================================
