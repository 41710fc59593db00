// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Outbound response messages.
//!
//! Read and method results are attached to a copy of the request message.
//! The topic and any unknown request fields are kept, `payload` is replaced
//! with the results and `entryStatus` holds the `[good, bad, other]` tally.
//! `nodetype` is set to `read` or `method` to tag the response kind.

use serde_json::{json, Map, Value};
use uaflow_core::{AddressSpaceItem, Message};

use crate::extract::{DataValue, ValueExtractor};
use crate::method::MethodCallResult;
use crate::status::{status_code_name, EntryStatus};

/// Field holding the result tally on response messages.
pub const FIELD_ENTRY_STATUS: &str = "entryStatus";

/// `nodetype` of read responses.
pub const NODETYPE_READ: &str = "read";

/// `nodetype` of method call responses.
pub const NODETYPE_METHOD: &str = "method";

/// One read result as returned by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadResult {
    /// The address that was read.
    pub node_id: String,
    /// The returned DataValue.
    pub data_value: DataValue,
}

impl ReadResult {
    /// Creates a read result.
    pub fn new(node_id: impl Into<String>, data_value: DataValue) -> Self {
        Self {
            node_id: node_id.into(),
            data_value,
        }
    }
}

/// Builds read response messages.
#[derive(Debug, Clone, Default)]
pub struct ReadResponseBuilder {
    extractor: ValueExtractor,
    items: Vec<AddressSpaceItem>,
    just_value: bool,
}

impl ReadResponseBuilder {
    /// Creates a builder over the given extractor.
    pub fn new(extractor: ValueExtractor) -> Self {
        Self {
            extractor,
            ..Self::default()
        }
    }

    /// Sets the configured items used to look up names and DataTypes.
    pub fn with_items(mut self, items: Vec<AddressSpaceItem>) -> Self {
        self.items = items;
        self
    }

    /// Emits bare values instead of result records.
    pub fn just_value(mut self, just_value: bool) -> Self {
        self.just_value = just_value;
        self
    }

    fn item_for(&self, node_id: &str) -> Option<&AddressSpaceItem> {
        self.items.iter().find(|item| item.node_id == node_id)
    }

    fn entry(&self, result: &ReadResult) -> Value {
        let item = self.item_for(&result.node_id);
        // Configured datatypeName first, then the type the server reported.
        let data_type = item
            .and_then(|item| item.datatype_name.as_deref())
            .filter(|name| !name.is_empty())
            .or_else(|| result.data_value.variant_data_type())
            .unwrap_or_default();

        let value = self.extractor.extract(&result.data_value, data_type);
        if self.just_value {
            return value;
        }

        let status = result.data_value.status();
        let mut entry = Map::new();
        entry.insert("nodeId".to_string(), Value::String(result.node_id.clone()));
        if let Some(item) = item.filter(|item| !item.name.is_empty()) {
            entry.insert("name".to_string(), Value::String(item.name.clone()));
        }
        if !data_type.is_empty() {
            entry.insert("dataType".to_string(), Value::String(data_type.to_string()));
        }
        entry.insert("value".to_string(), value);
        entry.insert("statusCode".to_string(), json!(status));
        entry.insert("statusName".to_string(), json!(status_code_name(status)));
        entry.insert("quality".to_string(), json!(result.data_value.quality().as_str()));
        if let Some(ts) = result.data_value.source_timestamp {
            entry.insert("sourceTimestamp".to_string(), json!(ts));
        }
        if let Some(ts) = result.data_value.server_timestamp {
            entry.insert("serverTimestamp".to_string(), json!(ts));
        }
        Value::Object(entry)
    }

    /// Builds the response for `request`.
    pub fn build(&self, request: &Message, results: &[ReadResult]) -> Message {
        let status = EntryStatus::from_status_codes(results.iter().map(|r| r.data_value.status()));
        let payload = Value::Array(results.iter().map(|result| self.entry(result)).collect());

        tracing::debug!(
            results = results.len(),
            good = status.good,
            bad = status.bad,
            "Built read response"
        );

        let mut response = request.clone().with_payload(payload);
        response.nodetype = Some(NODETYPE_READ.to_string());
        response.insert(FIELD_ENTRY_STATUS, json!(status));
        response
    }
}

/// Builds a method call response for `request`.
///
/// With `just_value` the payload is the list of rendered results, otherwise
/// it is `{results, definition: {methodId}}`.
pub fn method_response(
    request: &Message,
    method_id: &str,
    results: &[MethodCallResult],
    just_value: bool,
) -> Message {
    let rendered: Vec<Value> = results.iter().map(MethodCallResult::to_json).collect();
    let payload = if just_value {
        Value::Array(rendered)
    } else {
        json!({
            "results": rendered,
            "definition": { "methodId": method_id },
        })
    };

    let status = EntryStatus::from_status_codes(results.iter().map(|r| r.status_code));
    let mut response = request.clone().with_payload(payload);
    response.nodetype = Some(NODETYPE_METHOD.to_string());
    response.insert(FIELD_ENTRY_STATUS, json!(status));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{BAD_NODE_ID_UNKNOWN, GOOD};
    use chrono::{TimeZone, Utc};

    fn items() -> Vec<AddressSpaceItem> {
        vec![
            AddressSpaceItem::new("Pressure", "ns=1;s=Pressure").with_datatype("Double"),
            AddressSpaceItem::new("Flag", "ns=1;s=Flag").with_datatype("Boolean"),
        ]
    }

    #[test]
    fn test_read_response_entries() {
        let request = Message::new().with_topic("TestTopic").with_payload(json!("ignored"));
        let ts = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let results = vec![
            ReadResult::new("ns=1;s=Pressure", DataValue::new(json!("22.5")).with_source_timestamp(ts)),
            ReadResult::new("ns=1;s=Flag", DataValue::new(json!("true"))),
            ReadResult::new("ns=1;s=Gone", DataValue::new(Value::Null).with_status(BAD_NODE_ID_UNKNOWN)),
        ];

        let response = ReadResponseBuilder::default().with_items(items()).build(&request, &results);

        assert_eq!(response.topic.as_deref(), Some("TestTopic"));
        assert_eq!(response.nodetype.as_deref(), Some("read"));
        assert_eq!(response.extra.get(FIELD_ENTRY_STATUS), Some(&json!([2, 1, 0])));

        let entries = response.payload.as_array().unwrap();
        assert_eq!(entries[0]["name"], "Pressure");
        assert_eq!(entries[0]["value"], json!(22.5));
        assert_eq!(entries[0]["statusName"], "Good");
        assert!(entries[0].get("sourceTimestamp").is_some());
        assert_eq!(entries[1]["value"], json!(true));
        assert_eq!(entries[2]["statusCode"], json!(BAD_NODE_ID_UNKNOWN));
        assert_eq!(entries[2]["statusName"], "BadNodeIdUnknown");
        assert_eq!(entries[2]["quality"], "bad");
        assert!(entries[2].get("name").is_none());
    }

    #[test]
    fn test_reported_type_used_without_item() {
        let results = vec![ReadResult::new(
            "ns=1;s=Count",
            DataValue::new(json!({ "dataType": "Byte", "value": true })),
        )];
        let response = ReadResponseBuilder::default().just_value(true).build(&Message::new(), &results);
        assert_eq!(response.payload, json!([1]));
    }

    #[test]
    fn test_nodetype_replaces_request_nodetype() {
        let request = Message::browse("ns=0;i=85");
        let response = ReadResponseBuilder::default().build(&request, &[]);
        assert_eq!(response.nodetype.as_deref(), Some("read"));
        assert_eq!(response.to_value()["nodetype"], "read");

        let response = method_response(&request, "ns=4;i=1", &[], false);
        assert_eq!(response.nodetype.as_deref(), Some("method"));
    }

    #[test]
    fn test_method_response() {
        let results = vec![MethodCallResult {
            status_code: GOOD,
            output_arguments: vec![json!({ "dataType": "String", "value": "ok" })],
        }];
        let request = Message::new().with_topic("TestTopicMethod");

        let response = method_response(&request, "ns=4;i=12345", &results, false);
        assert_eq!(response.nodetype.as_deref(), Some("method"));
        assert_eq!(response.payload["definition"]["methodId"], "ns=4;i=12345");
        assert_eq!(response.payload["results"][0]["statusCode"]["name"], "Good");
        assert_eq!(response.extra.get(FIELD_ENTRY_STATUS), Some(&json!([1, 0, 0])));

        let response = method_response(&request, "ns=4;i=12345", &results, true);
        assert_eq!(response.payload.as_array().map(Vec::len), Some(1));
    }
}
