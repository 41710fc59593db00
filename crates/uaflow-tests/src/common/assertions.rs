// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Domain-specific assertion helpers with informative failure messages.

use serde_json::Value;
use uaflow_core::{AddressSpaceItem, Message};
use uaflow_opcua::response::FIELD_ENTRY_STATUS;
use uaflow_opcua::{OpcUaDataType, OpcUaError, Variant};

// =============================================================================
// Variant Assertions
// =============================================================================

/// Assertion extensions for [`Variant`].
pub trait VariantAssertions {
    /// Assert the DataType.
    fn assert_data_type(&self, expected: OpcUaDataType);

    /// Assert the rendered JSON form.
    fn assert_json(&self, expected: &Value);
}

impl VariantAssertions for Variant {
    fn assert_data_type(&self, expected: OpcUaDataType) {
        assert_eq!(
            self.data_type, expected,
            "Expected DataType {:?}, got {:?} (value {:?})",
            expected, self.data_type, self.value
        );
    }

    fn assert_json(&self, expected: &Value) {
        assert_eq!(&self.to_json(), expected, "Variant JSON mismatch");
    }
}

// =============================================================================
// Node List Assertions
// =============================================================================

/// Assert a normalized NodeId list.
pub fn assert_nodes(actual: &[String], expected: &[&str]) {
    let actual: Vec<&str> = actual.iter().map(String::as_str).collect();
    assert_eq!(actual, expected, "Normalized node list mismatch");
}

/// Assert the NodeIds of a normalized item list.
pub fn assert_item_node_ids(actual: &[AddressSpaceItem], expected: &[&str]) {
    let actual: Vec<&str> = actual.iter().map(|item| item.node_id.as_str()).collect();
    assert_eq!(actual, expected, "Normalized item list mismatch");
}

// =============================================================================
// Response Assertions
// =============================================================================

/// Assert the `[good, bad, other]` entry status of a response.
pub fn assert_entry_status(response: &Message, expected: [usize; 3]) {
    let actual = response
        .extra
        .get(FIELD_ENTRY_STATUS)
        .unwrap_or_else(|| panic!("Response has no {} field", FIELD_ENTRY_STATUS));
    assert_eq!(actual, &serde_json::json!(expected), "Entry status mismatch");
}

// =============================================================================
// Error Assertions
// =============================================================================

/// Assert that an error is a malformed-address error.
pub fn assert_malformed_address(error: &OpcUaError) {
    assert!(
        error.is_malformed_address(),
        "Expected malformed address error, got {:?}",
        error
    );
}
