// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Typed OPC UA Variants.
//!
//! A [`Variant`] pairs a built-in [`OpcUaDataType`] with a decoded native
//! value. Variants are produced by the [`VariantCodec`](crate::codec::VariantCodec)
//! and rendered back to JSON with [`Variant::to_json`]:
//!
//! ```text
//! { "dataType": "UInt16", "value": 220 }
//! { "dataType": "Double", "arrayType": "Array", "value": [1.5, 2.5] }
//! ```
//!
//! Feeding the rendered `value` back through the codec with the same
//! `dataType` yields an equal Variant.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

use crate::types::{LocalizedText, OpcUaDataType};

// =============================================================================
// ArrayType
// =============================================================================

/// Whether a Variant holds a single value or an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArrayType {
    /// A single value.
    #[default]
    Scalar,
    /// A one-dimensional array.
    Array,
}

impl ArrayType {
    /// Returns the name used in the JSON form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scalar => "Scalar",
            Self::Array => "Array",
        }
    }
}

// =============================================================================
// VariantValue
// =============================================================================

/// Native value carried by a [`Variant`].
#[derive(Debug, Clone, PartialEq)]
pub enum VariantValue {
    /// No value.
    Null,
    /// Boolean.
    Boolean(bool),
    /// Signed 8-bit integer.
    SByte(i8),
    /// Unsigned 8-bit integer.
    Byte(u8),
    /// Signed 16-bit integer.
    Int16(i16),
    /// Unsigned 16-bit integer.
    UInt16(u16),
    /// Signed 32-bit integer.
    Int32(i32),
    /// Unsigned 32-bit integer.
    UInt32(u32),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Text.
    String(String),
    /// UTC instant.
    DateTime(DateTime<Utc>),
    /// GUID.
    Guid(Uuid),
    /// Status code.
    StatusCode(u32),
    /// Localized text records.
    LocalizedText(Vec<LocalizedText>),
    /// Array elements.
    Array(Vec<VariantValue>),
    /// A value carried through unchanged.
    Json(Value),
}

impl VariantValue {
    /// Returns `true` if this is a floating point NaN.
    pub fn is_nan(&self) -> bool {
        match self {
            Self::Float(v) => v.is_nan(),
            Self::Double(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Returns `false` for infinite or NaN floats.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Float(v) => v.is_finite(),
            Self::Double(v) => v.is_finite(),
            _ => true,
        }
    }

    /// Renders the value as JSON.
    ///
    /// Non-finite floats render as `null`. DateTimes render as RFC 3339 in
    /// UTC with as many fractional digits as needed.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Boolean(v) => Value::Bool(*v),
            Self::SByte(v) => Value::from(*v),
            Self::Byte(v) => Value::from(*v),
            Self::Int16(v) => Value::from(*v),
            Self::UInt16(v) => Value::from(*v),
            Self::Int32(v) => Value::from(*v),
            Self::UInt32(v) => Value::from(*v),
            Self::Int64(v) => Value::from(*v),
            Self::UInt64(v) => Value::from(*v),
            // Shortest decimal form of the f32, so 22.2f32 renders as 22.2.
            Self::Float(v) => v
                .to_string()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map_or(Value::Null, Value::Number),
            Self::Double(v) => Number::from_f64(*v).map_or(Value::Null, Value::Number),
            Self::String(v) => Value::String(v.clone()),
            Self::DateTime(v) => Value::String(v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Guid(v) => Value::String(v.to_string()),
            Self::StatusCode(v) => Value::from(*v),
            Self::LocalizedText(items) => {
                serde_json::to_value(items).unwrap_or(Value::Array(Vec::new()))
            }
            Self::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Json(v) => v.clone(),
        }
    }
}

// =============================================================================
// Variant
// =============================================================================

/// A typed OPC UA value.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// Built-in DataType.
    pub data_type: OpcUaDataType,
    /// Scalar or array.
    pub array_type: ArrayType,
    /// Native value.
    pub value: VariantValue,
}

impl Variant {
    /// Creates a scalar Variant.
    pub fn scalar(data_type: OpcUaDataType, value: VariantValue) -> Self {
        Self {
            data_type,
            array_type: ArrayType::Scalar,
            value,
        }
    }

    /// Creates an array Variant.
    pub fn array(data_type: OpcUaDataType, values: Vec<VariantValue>) -> Self {
        Self {
            data_type,
            array_type: ArrayType::Array,
            value: VariantValue::Array(values),
        }
    }

    /// Returns `true` for array Variants.
    #[inline]
    pub fn is_array(&self) -> bool {
        self.array_type == ArrayType::Array
    }

    /// Renders the Variant as `{dataType, value}` JSON, adding
    /// `"arrayType": "Array"` for arrays.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert(
            "dataType".to_string(),
            Value::String(self.data_type.name().to_string()),
        );
        if self.is_array() {
            object.insert(
                "arrayType".to_string(),
                Value::String(self.array_type.as_str().to_string()),
            );
        }
        object.insert("value".to_string(), self.value.to_json());
        Value::Object(object)
    }
}

impl Serialize for Variant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_json() {
        let variant = Variant::scalar(OpcUaDataType::UInt16, VariantValue::UInt16(220));
        assert_eq!(variant.to_json(), json!({ "dataType": "UInt16", "value": 220 }));
    }

    #[test]
    fn test_array_json() {
        let variant = Variant::array(
            OpcUaDataType::Double,
            vec![VariantValue::Double(1.5), VariantValue::Double(2.5)],
        );
        assert_eq!(
            variant.to_json(),
            json!({ "dataType": "Double", "arrayType": "Array", "value": [1.5, 2.5] })
        );
    }

    #[test]
    fn test_float_renders_shortest_form() {
        assert_eq!(VariantValue::Float(22.2).to_json(), json!(22.2));
        assert_eq!(VariantValue::Float(f32::NAN).to_json(), Value::Null);
        assert!(VariantValue::Double(f64::NAN).is_nan());
    }

    #[test]
    fn test_datetime_renders_rfc3339() {
        let instant = DateTime::from_timestamp_millis(1_522_274_988_816).unwrap();
        assert_eq!(
            VariantValue::DateTime(instant).to_json(),
            json!("2018-03-28T22:09:48.816Z")
        );
    }

    #[test]
    fn test_localized_text_renders_records() {
        let value = VariantValue::LocalizedText(vec![LocalizedText::new("Hello", "en")]);
        assert_eq!(value.to_json(), json!([{ "text": "Hello", "locale": "en" }]));
    }

    #[test]
    fn test_serialize_matches_to_json() {
        let variant = Variant::scalar(OpcUaDataType::Boolean, VariantValue::Boolean(true));
        assert_eq!(serde_json::to_value(&variant).unwrap(), variant.to_json());
    }
}
