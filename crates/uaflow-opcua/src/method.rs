// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Method call requests.
//!
//! A method call is configured on the flow node (object, method, input
//! arguments) and may be overridden per message through `msg.payload`.
//! Payload fields win over configured defaults. Empty strings count as
//! absent.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use uaflow_core::Message;
//! use uaflow_opcua::codec::VariantCodec;
//! use uaflow_opcua::method::{MethodCallRequest, MethodDefaults};
//! use uaflow_opcua::types::NodeId;
//!
//! let msg = Message::new().with_payload(json!({
//!     "objectId": "ns=4;i=1234",
//!     "methodId": "ns=4;i=12345",
//!     "inputArguments": [
//!         { "name": "barks", "dataType": "UInt32", "value": "3" }
//!     ]
//! }));
//!
//! let call = MethodCallRequest::from_message(&msg, &MethodDefaults::default(), &VariantCodec::lenient())
//!     .unwrap();
//! assert_eq!(call.object_id, NodeId::numeric(4, 1234));
//! assert_eq!(call.input_arguments.len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uaflow_core::Message;

use crate::catalog::DataTypeRef;
use crate::codec::VariantCodec;
use crate::error::{ConfigurationError, ConversionError, OpcUaError, OpcUaResult};
use crate::status::{StatusCodeInfo, GOOD};
use crate::types::NodeId;
use crate::variant::Variant;

/// Default method type.
pub const DEFAULT_METHOD_TYPE: &str = "basic";

// =============================================================================
// Arguments
// =============================================================================

/// An argument DataType as written in configuration: a tag, a NodeId
/// string, or a numeric type id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataTypeTag {
    /// Numeric type id.
    Id(u32),
    /// Tag or NodeId string.
    Name(String),
}

impl From<&DataTypeTag> for DataTypeRef {
    fn from(tag: &DataTypeTag) -> Self {
        match tag {
            DataTypeTag::Id(id) => DataTypeRef::Id(*id),
            DataTypeTag::Name(name) => DataTypeRef::Name(name.clone()),
        }
    }
}

/// One method input argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodArgument {
    /// Argument label.
    #[serde(default)]
    pub name: String,
    /// Argument DataType.
    pub data_type: DataTypeTag,
    /// Raw value.
    #[serde(default)]
    pub value: Value,
}

impl MethodArgument {
    /// Creates an argument.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            data_type: DataTypeTag::Name(data_type.into()),
            value,
        }
    }

    /// Encodes the argument value as a Variant.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::InvalidArgument`] when the codec rejects
    /// the value (strict mode only).
    pub fn to_variant(&self, codec: &VariantCodec) -> OpcUaResult<Variant> {
        codec
            .build_variant(DataTypeRef::from(&self.data_type), &self.value)
            .map_err(|error| match error {
                OpcUaError::Conversion(inner) => {
                    ConversionError::invalid_argument(&self.name, inner.to_string()).into()
                }
                other => other,
            })
    }
}

// =============================================================================
// Defaults / request
// =============================================================================

/// Method call settings configured on a flow node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDefaults {
    /// Object NodeId.
    #[serde(default)]
    pub object_id: String,
    /// Method NodeId.
    #[serde(default)]
    pub method_id: String,
    /// Method type label.
    #[serde(default)]
    pub method_type: String,
    /// Input arguments.
    #[serde(default)]
    pub input_arguments: Vec<MethodArgument>,
}

/// The method call fields a message may carry in its payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodCallRequest {
    /// Object NodeId.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    /// Method NodeId.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_id: Option<String>,
    /// Method type label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_type: Option<String>,
    /// Input arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_arguments: Option<Vec<MethodArgument>>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn pick(overriding: Option<String>, fallback: &str) -> Option<String> {
    present(overriding).or_else(|| present(Some(fallback.to_string())))
}

impl MethodCallRequest {
    /// Reads the override fields from `msg.payload`. A payload that is not
    /// an object yields no overrides.
    pub fn from_payload(msg: &Message) -> Self {
        match &msg.payload {
            Value::Object(_) => serde_json::from_value(msg.payload.clone()).unwrap_or_else(|error| {
                tracing::debug!(error = %error, "Ignoring malformed method call payload");
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Builds a call from the message payload and the configured defaults.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::MissingField`] if no object or method id is
    ///   available
    /// - an address error for an unparseable object or method id
    /// - a conversion error for a rejected argument (strict mode)
    pub fn from_message(
        msg: &Message,
        defaults: &MethodDefaults,
        codec: &VariantCodec,
    ) -> OpcUaResult<CallMethod> {
        Self::from_payload(msg).resolve(defaults, codec)
    }

    /// Merges these overrides with `defaults` and encodes the arguments.
    ///
    /// # Errors
    ///
    /// Same as [`from_message`](Self::from_message).
    pub fn resolve(self, defaults: &MethodDefaults, codec: &VariantCodec) -> OpcUaResult<CallMethod> {
        let object_id = pick(self.object_id, &defaults.object_id)
            .ok_or_else(|| ConfigurationError::missing_field("objectId"))?;
        let method_id = pick(self.method_id, &defaults.method_id)
            .ok_or_else(|| ConfigurationError::missing_field("methodId"))?;
        let method_type = pick(self.method_type, &defaults.method_type)
            .unwrap_or_else(|| DEFAULT_METHOD_TYPE.to_string());

        let arguments = self
            .input_arguments
            .unwrap_or_else(|| defaults.input_arguments.clone());
        let input_arguments = arguments
            .iter()
            .map(|argument| argument.to_variant(codec))
            .collect::<OpcUaResult<Vec<_>>>()?;

        Ok(CallMethod {
            object_id: object_id.parse()?,
            method_id: method_id.parse()?,
            method_type,
            input_arguments,
        })
    }
}

// =============================================================================
// CallMethod / result
// =============================================================================

/// A resolved method call, ready for the transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallMethod {
    /// Object owning the method.
    pub object_id: NodeId,
    /// Method to call.
    pub method_id: NodeId,
    /// Method type label.
    pub method_type: String,
    /// Encoded input arguments.
    pub input_arguments: Vec<Variant>,
}

/// The outcome of a method call as reported by the transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodCallResult {
    /// Call status code.
    #[serde(default)]
    pub status_code: u32,
    /// Output arguments as rendered Variants.
    #[serde(default)]
    pub output_arguments: Vec<Value>,
}

impl MethodCallResult {
    /// Creates a good result.
    pub fn good(output_arguments: Vec<Variant>) -> Self {
        Self {
            status_code: GOOD,
            output_arguments: output_arguments.iter().map(Variant::to_json).collect(),
        }
    }

    /// Renders the result as `{statusCode: {value, description, name}, outputArguments}`.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "statusCode": StatusCodeInfo::from_code(self.status_code),
            "outputArguments": self.output_arguments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OpcUaDataType;
    use crate::variant::VariantValue;
    use serde_json::json;

    fn defaults() -> MethodDefaults {
        MethodDefaults {
            object_id: "ns=4;i=1234".to_string(),
            method_id: "ns=4;i=12345".to_string(),
            method_type: "basic".to_string(),
            input_arguments: vec![
                MethodArgument::new("barks", "UInt32", json!("3")),
                MethodArgument::new("volume", "UInt32", json!("6")),
            ],
        }
    }

    #[test]
    fn test_defaults_only() {
        let call =
            MethodCallRequest::from_message(&Message::new().with_payload(json!(12345)), &defaults(), &VariantCodec::lenient())
                .unwrap();

        assert_eq!(call.object_id, NodeId::numeric(4, 1234));
        assert_eq!(call.method_id, NodeId::numeric(4, 12345));
        assert_eq!(call.method_type, "basic");
        assert_eq!(
            call.input_arguments,
            vec![
                Variant::scalar(OpcUaDataType::UInt32, VariantValue::UInt32(3)),
                Variant::scalar(OpcUaDataType::UInt32, VariantValue::UInt32(6)),
            ]
        );
    }

    #[test]
    fn test_payload_overrides() {
        let msg = Message::new().with_payload(json!({
            "objectId": "ns=4;i=1234",
            "methodId": "ns=4;i=12345",
            "inputArguments": [
                { "name": "barks", "dataType": "UInt32", "value": "6" },
                { "name": "volume", "dataType": "ns=0;i=7", "value": "12" }
            ],
            "methodType": "basic"
        }));
        let empty = MethodDefaults::default();
        let call = MethodCallRequest::from_message(&msg, &empty, &VariantCodec::lenient()).unwrap();

        assert_eq!(
            call.input_arguments,
            vec![
                Variant::scalar(OpcUaDataType::UInt32, VariantValue::UInt32(6)),
                Variant::scalar(OpcUaDataType::UInt32, VariantValue::UInt32(12)),
            ]
        );
    }

    #[test]
    fn test_empty_override_falls_back() {
        let msg = Message::new().with_payload(json!({ "objectId": "", "methodId": "ns=1;s=Go" }));
        let call = MethodCallRequest::from_message(&msg, &defaults(), &VariantCodec::lenient()).unwrap();
        assert_eq!(call.object_id, NodeId::numeric(4, 1234));
        assert_eq!(call.method_id, NodeId::string(1, "Go"));
    }

    #[test]
    fn test_missing_ids() {
        let err = MethodCallRequest::from_message(&Message::new(), &MethodDefaults::default(), &VariantCodec::lenient())
            .unwrap_err();
        assert!(matches!(
            err,
            OpcUaError::Configuration(ConfigurationError::MissingField { ref field }) if field == "objectId"
        ));
    }

    #[test]
    fn test_malformed_object_id() {
        let mut config = defaults();
        config.object_id = "object".to_string();
        let err = MethodCallRequest::from_message(&Message::new(), &config, &VariantCodec::lenient()).unwrap_err();
        assert!(err.is_malformed_address());
    }

    #[test]
    fn test_strict_rejects_bad_argument() {
        let mut config = defaults();
        config.input_arguments = vec![MethodArgument::new("barks", "UInt32", json!("many"))];

        let err = MethodCallRequest::from_message(&Message::new(), &config, &VariantCodec::strict()).unwrap_err();
        assert!(matches!(
            err,
            OpcUaError::Conversion(ConversionError::InvalidArgument { ref name, .. }) if name == "barks"
        ));
        assert!(MethodCallRequest::from_message(&Message::new(), &config, &VariantCodec::lenient()).is_ok());
    }

    #[test]
    fn test_result_rendering() {
        let output = Variant::array(
            OpcUaDataType::String,
            vec![VariantValue::String("Whaff!!!!!".to_string())],
        );
        let rendered = MethodCallResult::good(vec![output]).to_json();
        assert_eq!(
            rendered,
            json!({
                "statusCode": { "value": 0, "description": "No Error", "name": "Good" },
                "outputArguments": [
                    { "dataType": "String", "arrayType": "Array", "value": ["Whaff!!!!!"] }
                ]
            })
        );
    }
}
