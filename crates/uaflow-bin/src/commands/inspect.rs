// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `topic`, `encode`, `extract` and `state` commands.

use std::sync::Arc;

use serde_json::{json, Value};
use uaflow_opcua::{
    set_initial_state, BuiltinCatalog, Connector, ConnectorState, DataValue, FlowNodeState,
    TopicAddress, ValueExtractor, VariantCodec,
};

use crate::cli::{EncodeArgs, ExtractArgs, StateArgs, TopicArgs};
use crate::error::{BinError, BinResult};

/// Executes the `topic` command.
pub fn topic(args: &TopicArgs) -> BinResult<Value> {
    let address = TopicAddress::parse(&args.topic)?;
    let node_id = address.to_node_id()?;
    tracing::debug!(topic = %args.topic, node_id = %node_id, "Parsed topic");

    Ok(json!({
        "namespace": address.namespace,
        "identifier": address.identifier,
        "nodeId": node_id.to_string(),
    }))
}

/// Reads a command-line value as JSON, falling back to a plain string.
fn raw_value(value: &str, force_string: bool) -> Value {
    if force_string {
        return Value::String(value.to_string());
    }
    serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

/// Executes the `encode` command.
pub fn encode(args: &EncodeArgs) -> BinResult<Value> {
    let codec = VariantCodec::new(BuiltinCatalog::shared(), args.mode);
    let raw = raw_value(&args.value, args.string);
    let variant = codec.build_variant(args.data_type.as_str(), &raw)?;
    Ok(variant.to_json())
}

/// Executes the `extract` command.
pub fn extract(args: &ExtractArgs) -> BinResult<Value> {
    let raw: Value = serde_json::from_str(&args.data_value)
        .map_err(|e| BinError::input(format!("DataValue is not valid JSON: {}", e)))?;

    let is_data_value = raw
        .as_object()
        .is_some_and(|object| !object.contains_key("dataType") && object.contains_key("value"));
    let data_value = if is_data_value {
        serde_json::from_value::<DataValue>(raw)?
    } else {
        DataValue::new(raw)
    };

    let value = ValueExtractor::default().extract(&data_value, args.data_type.as_str());
    Ok(json!({
        "value": value,
        "statusCode": data_value.status(),
        "quality": data_value.quality().as_str(),
    }))
}

/// A connector that only reports a state tag.
struct ReportedState(ConnectorState);

impl Connector for ReportedState {
    type Session = ();

    fn state(&self) -> ConnectorState {
        self.0
    }

    fn session(&self) -> Option<Arc<()>> {
        None
    }
}

/// Executes the `state` command.
pub fn state(args: &StateArgs) -> Value {
    let connector = ReportedState(ConnectorState::from_tag(&args.state));
    let mut node = FlowNodeState::new("cli");
    let status = set_initial_state(connector.state(), &connector, &mut node);

    json!({
        "state": connector.state().as_str(),
        "status": status.as_str(),
        "usable": status.is_usable(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uaflow_opcua::CodecMode;

    fn encode_args(data_type: &str, value: &str, mode: CodecMode) -> EncodeArgs {
        EncodeArgs {
            data_type: data_type.to_string(),
            value: value.to_string(),
            string: false,
            mode,
        }
    }

    #[test]
    fn test_topic() {
        let output = topic(&TopicArgs { topic: "ns=0;i=85".to_string() }).unwrap();
        assert_eq!(
            output,
            json!({
                "namespace": "0",
                "identifier": { "identifier": 85, "type": "NUMERIC" },
                "nodeId": "ns=0;i=85",
            })
        );

        let err = topic(&TopicArgs { topic: "i=85".to_string() }).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_encode() {
        let output = encode(&encode_args("Boolean", "1", CodecMode::Lenient)).unwrap();
        assert_eq!(output, json!({ "dataType": "Boolean", "value": true }));

        let output = encode(&encode_args("String", "hello", CodecMode::Lenient)).unwrap();
        assert_eq!(output, json!({ "dataType": "String", "value": "hello" }));

        let mut args = encode_args("String", "42", CodecMode::Lenient);
        args.string = true;
        assert_eq!(encode(&args).unwrap()["value"], json!("42"));

        assert!(encode(&encode_args("Quantum", "1", CodecMode::Strict)).is_err());
    }

    #[test]
    fn test_extract() {
        let args = ExtractArgs {
            data_type: "Byte".to_string(),
            data_value: r#"{ "value": true, "statusCode": 0 }"#.to_string(),
        };
        assert_eq!(extract(&args).unwrap()["value"], json!(1));

        let args = ExtractArgs {
            data_type: "Double".to_string(),
            data_value: r#"{ "dataType": "Double", "value": "22.5" }"#.to_string(),
        };
        assert_eq!(extract(&args).unwrap()["value"], json!(22.5));

        let args = ExtractArgs {
            data_type: "Double".to_string(),
            data_value: "not json".to_string(),
        };
        assert!(extract(&args).is_err());
    }

    #[test]
    fn test_state() {
        let output = state(&StateArgs { state: "OPEN".to_string() });
        assert_eq!(output["status"], "active");
        assert_eq!(output["usable"], true);

        let output = state(&StateArgs { state: "garbage".to_string() });
        assert_eq!(output, json!({ "state": "UNKNOWN", "status": "waiting", "usable": false }));
    }
}
