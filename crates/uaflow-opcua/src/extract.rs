// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! DataValue extraction.
//!
//! Values read from a server arrive as DataValues. The extractor takes the
//! value out and coerces it toward the DataType configured for the node
//! (usually an [`AddressSpaceItem`](uaflow_core::AddressSpaceItem)'s
//! `datatypeName`), leaving anything it does not recognize untouched:
//!
//! - `Byte`, `SByte`: booleans become `1`/`0`
//! - `Float`, `Double`: numeric text becomes a number, other text is kept
//! - `Boolean`: `"true"`/`"false"` become booleans
//! - `String`: non-strings are stringified
//! - everything else, including unknown DataTypes: unchanged
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use uaflow_opcua::extract::{extract_value, DataValue};
//!
//! let data_value = DataValue::new(json!(true));
//! assert_eq!(extract_value(&data_value, "Byte"), json!(1));
//! assert_eq!(extract_value(&data_value, "String"), json!("true"));
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::catalog::{BuiltinCatalog, DataTypeCatalog, DataTypeRef};
use crate::codec::stringify;
use crate::status::{Quality, GOOD};
use crate::types::OpcUaDataType;
use crate::variant::Variant;

// =============================================================================
// DataValue
// =============================================================================

/// A value with status and timestamps, as returned by a read.
///
/// `value` is either a rendered Variant (`{"dataType": .., "value": ..}`)
/// or a bare value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataValue {
    /// The value.
    #[serde(default)]
    pub value: Value,

    /// OPC UA status code; absent means `Good`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u32>,

    /// Source timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_timestamp: Option<DateTime<Utc>>,

    /// Server timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_timestamp: Option<DateTime<Utc>>,
}

impl DataValue {
    /// Creates a good DataValue without timestamps.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Creates a DataValue holding a rendered Variant.
    pub fn from_variant(variant: &Variant) -> Self {
        Self::new(variant.to_json())
    }

    /// Sets the status code.
    pub fn with_status(mut self, status_code: u32) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Sets the source timestamp.
    pub fn with_source_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.source_timestamp = Some(timestamp);
        self
    }

    /// Returns the status code, `Good` when absent.
    #[inline]
    pub fn status(&self) -> u32 {
        self.status_code.unwrap_or(GOOD)
    }

    /// Returns the quality class of the status code.
    #[inline]
    pub fn quality(&self) -> Quality {
        Quality::from_status_code(self.status())
    }

    /// Returns the value as a rendered Variant object, if it is one.
    ///
    /// A rendered Variant carries `dataType` and `value`, plus `arrayType`
    /// for arrays, and nothing else. Structured values that merely contain
    /// a `dataType` field, such as method argument records, do not qualify.
    fn rendered_variant(&self) -> Option<&Map<String, Value>> {
        let object = self.value.as_object()?;
        let shaped = object.contains_key("dataType")
            && object.contains_key("value")
            && object
                .keys()
                .all(|key| matches!(key.as_str(), "dataType" | "value" | "arrayType"));
        shaped.then_some(object)
    }

    /// Returns the DataType name recorded in a rendered Variant, if any.
    pub fn variant_data_type(&self) -> Option<&str> {
        self.rendered_variant()?.get("dataType")?.as_str()
    }

    /// Returns the native value, unwrapping a rendered Variant.
    pub fn native_value(&self) -> &Value {
        self.rendered_variant()
            .and_then(|object| object.get("value"))
            .unwrap_or(&self.value)
    }
}

// =============================================================================
// ValueExtractor
// =============================================================================

/// Coerces DataValue contents toward a target DataType.
#[derive(Debug, Clone)]
pub struct ValueExtractor {
    catalog: Arc<dyn DataTypeCatalog>,
}

impl Default for ValueExtractor {
    fn default() -> Self {
        Self::new(BuiltinCatalog::shared())
    }
}

impl ValueExtractor {
    /// Creates an extractor over the given catalog.
    pub fn new(catalog: Arc<dyn DataTypeCatalog>) -> Self {
        Self { catalog }
    }

    /// Extracts the native value of `data_value` for `data_type`.
    ///
    /// Never fails: unresolvable DataTypes leave the value unchanged.
    pub fn extract(&self, data_value: &DataValue, data_type: impl Into<DataTypeRef>) -> Value {
        extract_with(self.catalog.as_ref(), data_value, &data_type.into())
    }
}

/// Extracts a value with the built-in catalog.
pub fn extract_value(data_value: &DataValue, data_type: impl Into<DataTypeRef>) -> Value {
    extract_with(&BuiltinCatalog, data_value, &data_type.into())
}

fn extract_with(catalog: &dyn DataTypeCatalog, data_value: &DataValue, reference: &DataTypeRef) -> Value {
    let raw = data_value.native_value();
    match catalog.resolve(reference) {
        Some(data_type) => convert_for(data_type, raw),
        None => raw.clone(),
    }
}

fn convert_for(data_type: OpcUaDataType, raw: &Value) -> Value {
    match data_type {
        OpcUaDataType::Byte | OpcUaDataType::SByte => match raw {
            Value::Bool(b) => Value::from(u8::from(*b)),
            other => other.clone(),
        },
        OpcUaDataType::Float | OpcUaDataType::Double => match raw {
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map_or_else(|| raw.clone(), Value::Number),
            other => other.clone(),
        },
        OpcUaDataType::Boolean => match raw {
            Value::String(s) if s == "true" => Value::Bool(true),
            Value::String(s) if s == "false" => Value::Bool(false),
            other => other.clone(),
        },
        OpcUaDataType::String => match raw {
            Value::String(_) => raw.clone(),
            other => Value::String(stringify(other)),
        },
        _ => raw.clone(),
    }
}

// =============================================================================
// Tests
// =============================================================================
