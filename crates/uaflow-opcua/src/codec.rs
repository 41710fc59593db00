// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Variant codec: untyped message values to typed OPC UA Variants.
//!
//! The codec resolves the DataType reference once through the injected
//! [`DataTypeCatalog`] and then converts the raw JSON value by the rules of
//! that type:
//!
//! | DataType            | Accepted input                        | Result                              |
//! |---------------------|---------------------------------------|-------------------------------------|
//! | integer types       | number, integer text, `0x` hex, bool  | wrapped to the declared width       |
//! | `Float`, `Double`   | number, numeric text, bool            | float; NaN when not numeric, input unchanged when out of range |
//! | `Boolean`           | `true`, `"true"`, `1`, `"1"`          | `true`; everything else `false`     |
//! | `String`            | anything                              | stringified                         |
//! | `DateTime`          | epoch ms (number or text), RFC 3339   | UTC instant; other input unchanged  |
//! | `LocalizedText`     | JSON text, array or object            | list of `{text, locale}` records    |
//! | `NodeId`, `QualifiedName`, `ByteString`, ... | anything     | unchanged                           |
//!
//! Every conversion step returns `Result<T, Degraded<T>>`. A [`Degraded`]
//! outcome carries the best-effort fallback together with a
//! [`ConversionWarning`]. The [`CodecMode`] chosen at construction decides
//! what happens to it: `Lenient` logs the warning and uses the fallback,
//! `Strict` turns it into an [`OpcUaError::Conversion`].
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use uaflow_opcua::codec::VariantCodec;
//! use uaflow_opcua::types::OpcUaDataType;
//!
//! let codec = VariantCodec::lenient();
//! let from_text = codec.build_variant("Boolean", &json!("1")).unwrap();
//! let from_native = codec.build_variant(OpcUaDataType::Boolean, &json!(true)).unwrap();
//! assert_eq!(from_text, from_native);
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::catalog::{BuiltinCatalog, DataTypeCatalog, DataTypeRef};
use crate::error::{ConfigurationError, ConversionError, OpcUaError, OpcUaResult};
use crate::types::{LocalizedText, OpcUaDataType};
use crate::variant::{Variant, VariantValue};

// =============================================================================
// CodecMode
// =============================================================================

/// How the codec treats degraded conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecMode {
    /// Accept the fallback value and log a warning.
    #[default]
    Lenient,
    /// Reject with a conversion error.
    Strict,
}

impl CodecMode {
    /// Returns the string representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for CodecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CodecMode {
    type Err = OpcUaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(OpcUaError::configuration(
                ConfigurationError::invalid_codec_mode(s),
            )),
        }
    }
}

// =============================================================================
// ConversionWarning / Degraded
// =============================================================================

/// Why a conversion fell back to a best-effort value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionWarning {
    /// The DataType reference did not resolve.
    UnsupportedDataType {
        /// The reference as given.
        data_type: String,
    },
    /// The value does not fit the DataType.
    InvalidValue {
        /// Target DataType.
        data_type: OpcUaDataType,
        /// The raw value, rendered as JSON.
        value: String,
        /// Why the value was not accepted.
        reason: &'static str,
    },
}

impl ConversionWarning {
    fn invalid(data_type: OpcUaDataType, raw: &Value, reason: &'static str) -> Self {
        Self::InvalidValue {
            data_type,
            value: raw.to_string(),
            reason,
        }
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedDataType { data_type } => {
                write!(f, "unsupported data type '{}', value passed through", data_type)
            }
            Self::InvalidValue {
                data_type,
                value,
                reason,
            } => write!(f, "{} for {}: {}", value, data_type, reason),
        }
    }
}

impl From<ConversionWarning> for ConversionError {
    fn from(warning: ConversionWarning) -> Self {
        match warning {
            ConversionWarning::UnsupportedDataType { data_type } => {
                ConversionError::unsupported_data_type(data_type)
            }
            ConversionWarning::InvalidValue {
                data_type,
                value,
                reason,
            } => ConversionError::invalid_value(data_type.name(), value, reason),
        }
    }
}

/// A best-effort result paired with the warning that explains it.
#[derive(Debug, Clone, PartialEq)]
pub struct Degraded<T> {
    /// The value to use when degraded results are accepted.
    pub fallback: T,
    /// What went wrong.
    pub warning: ConversionWarning,
}

impl<T> Degraded<T> {
    fn new(fallback: T, warning: ConversionWarning) -> Self {
        Self { fallback, warning }
    }

    /// Maps the fallback value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Degraded<U> {
        Degraded {
            fallback: f(self.fallback),
            warning: self.warning,
        }
    }
}

/// Result of one conversion step.
pub type Conversion<T> = Result<T, Degraded<T>>;

// =============================================================================
// VariantCodec
// =============================================================================

/// Converts raw JSON values to typed Variants.
///
/// The codec holds no mutable state and is `Send + Sync`; share it freely.
#[derive(Debug, Clone)]
pub struct VariantCodec {
    catalog: Arc<dyn DataTypeCatalog>,
    mode: CodecMode,
}

impl Default for VariantCodec {
    fn default() -> Self {
        Self::lenient()
    }
}

impl VariantCodec {
    /// Creates a codec with the given catalog and mode.
    pub fn new(catalog: Arc<dyn DataTypeCatalog>, mode: CodecMode) -> Self {
        Self { catalog, mode }
    }

    /// Creates a lenient codec over the built-in catalog.
    pub fn lenient() -> Self {
        Self::new(BuiltinCatalog::shared(), CodecMode::Lenient)
    }

    /// Creates a strict codec over the built-in catalog.
    pub fn strict() -> Self {
        Self::new(BuiltinCatalog::shared(), CodecMode::Strict)
    }

    /// Returns the codec mode.
    #[inline]
    pub fn mode(&self) -> CodecMode {
        self.mode
    }

    /// Returns the catalog.
    #[inline]
    pub fn catalog(&self) -> &Arc<dyn DataTypeCatalog> {
        &self.catalog
    }

    /// Builds a Variant, applying the codec mode to degraded conversions.
    ///
    /// A JSON array given for any DataType other than `LocalizedText` or a
    /// pass-through type is encoded element-wise as an array Variant.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`OpcUaError::Conversion`] for an unknown
    /// DataType or a value that does not fit it. Lenient mode never fails.
    pub fn build_variant(&self, data_type: impl Into<DataTypeRef>, raw: &Value) -> OpcUaResult<Variant> {
        let reference = data_type.into();
        let outcome = self.encode_variant(&reference, raw);
        self.settle(&reference, outcome)
    }

    /// Builds an array Variant from a list of raw values.
    ///
    /// # Errors
    ///
    /// Same as [`build_variant`](Self::build_variant).
    pub fn build_variant_array(
        &self,
        data_type: impl Into<DataTypeRef>,
        raw: &[Value],
    ) -> OpcUaResult<Variant> {
        let reference = data_type.into();
        let outcome = match self.catalog.resolve(&reference) {
            Some(data_type) => encode_array(data_type, raw),
            None => Err(unsupported(&reference, &Value::Array(raw.to_vec()))),
        };
        self.settle(&reference, outcome)
    }

    /// Converts a value without applying the codec mode.
    ///
    /// `Err` carries the fallback Variant and the warning. An unknown
    /// DataType yields a `Variant`-typed fallback holding the raw value.
    pub fn encode_variant(&self, reference: &DataTypeRef, raw: &Value) -> Conversion<Variant> {
        let Some(data_type) = self.catalog.resolve(reference) else {
            return Err(unsupported(reference, raw));
        };

        match raw {
            Value::Array(items) if accepts_array(data_type) => encode_array(data_type, items),
            _ => encode_value(data_type, raw)
                .map(|value| Variant::scalar(data_type, value))
                .map_err(|degraded| degraded.map(|value| Variant::scalar(data_type, value))),
        }
    }

    fn settle(&self, reference: &DataTypeRef, outcome: Conversion<Variant>) -> OpcUaResult<Variant> {
        match outcome {
            Ok(variant) => Ok(variant),
            Err(degraded) => match self.mode {
                CodecMode::Lenient => {
                    tracing::warn!(
                        data_type = %reference,
                        warning = %degraded.warning,
                        "Degraded variant conversion"
                    );
                    Ok(degraded.fallback)
                }
                CodecMode::Strict => Err(OpcUaError::conversion(degraded.warning.into())),
            },
        }
    }
}

fn unsupported(reference: &DataTypeRef, raw: &Value) -> Degraded<Variant> {
    Degraded::new(
        Variant::scalar(OpcUaDataType::Variant, VariantValue::Json(raw.clone())),
        ConversionWarning::UnsupportedDataType {
            data_type: reference.to_string(),
        },
    )
}

fn accepts_array(data_type: OpcUaDataType) -> bool {
    !data_type.is_pass_through() && data_type != OpcUaDataType::LocalizedText
}

fn encode_array(data_type: OpcUaDataType, items: &[Value]) -> Conversion<Variant> {
    let mut values = Vec::with_capacity(items.len());
    let mut first_warning = None;

    for item in items {
        match encode_value(data_type, item) {
            Ok(value) => values.push(value),
            Err(degraded) => {
                values.push(degraded.fallback);
                first_warning.get_or_insert(degraded.warning);
            }
        }
    }

    let variant = Variant::array(data_type, values);
    match first_warning {
        None => Ok(variant),
        Some(warning) => Err(Degraded::new(variant, warning)),
    }
}

// =============================================================================
// Scalar conversion
// =============================================================================

/// Converts a scalar raw value to the native value of `data_type`.
pub fn encode_value(data_type: OpcUaDataType, raw: &Value) -> Conversion<VariantValue> {
    use OpcUaDataType as T;

    match data_type {
        T::SByte | T::Byte | T::Int16 | T::UInt16 | T::Int32 | T::UInt32 | T::Int64
        | T::UInt64 | T::StatusCode => encode_integer(data_type, raw),
        T::Float | T::Double => encode_float(data_type, raw),
        T::Boolean => encode_boolean(raw),
        T::String | T::XmlElement => Ok(VariantValue::String(stringify(raw))),
        T::DateTime => encode_datetime(raw),
        T::Guid => encode_guid(raw),
        T::LocalizedText => encode_localized_text(raw),
        T::NodeId | T::NodeIdType | T::ByteString | T::QualifiedName | T::ExpandedNodeId
        | T::Variant => Ok(VariantValue::Json(raw.clone())),
    }
}

fn encode_integer(data_type: OpcUaDataType, raw: &Value) -> Conversion<VariantValue> {
    let Some(n) = parse_integer(raw) else {
        return Err(Degraded::new(
            VariantValue::Json(raw.clone()),
            ConversionWarning::invalid(data_type, raw, "not an integer, value passed through"),
        ));
    };

    // Fixed-width truncation: out-of-range values wrap.
    let value = match data_type {
        OpcUaDataType::SByte => VariantValue::SByte(n as i8),
        OpcUaDataType::Byte => VariantValue::Byte(n as u8),
        OpcUaDataType::Int16 => VariantValue::Int16(n as i16),
        OpcUaDataType::UInt16 => VariantValue::UInt16(n as u16),
        OpcUaDataType::Int32 => VariantValue::Int32(n as i32),
        OpcUaDataType::UInt32 => VariantValue::UInt32(n as u32),
        OpcUaDataType::Int64 => VariantValue::Int64(n as i64),
        OpcUaDataType::UInt64 => VariantValue::UInt64(n as u64),
        _ => VariantValue::StatusCode(n as u32),
    };
    Ok(value)
}

fn encode_float(data_type: OpcUaDataType, raw: &Value) -> Conversion<VariantValue> {
    let make = |v: f64| match data_type {
        OpcUaDataType::Float => VariantValue::Float(v as f32),
        _ => VariantValue::Double(v),
    };

    match parse_float(raw).map(make) {
        Some(value) if value.is_finite() => Ok(value),
        Some(_) => Err(Degraded::new(
            VariantValue::Json(raw.clone()),
            ConversionWarning::invalid(data_type, raw, "out of range, value passed through"),
        )),
        None => Err(Degraded::new(
            make(f64::NAN),
            ConversionWarning::invalid(data_type, raw, "not a number"),
        )),
    }
}

fn encode_boolean(raw: &Value) -> Conversion<VariantValue> {
    match raw {
        Value::Bool(b) => Ok(VariantValue::Boolean(*b)),
        Value::String(s) if s == "true" || s == "1" => Ok(VariantValue::Boolean(true)),
        Value::String(s) if s == "false" || s == "0" => Ok(VariantValue::Boolean(false)),
        Value::Number(n) if n.as_f64() == Some(1.0) => Ok(VariantValue::Boolean(true)),
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(VariantValue::Boolean(false)),
        _ => Err(Degraded::new(
            VariantValue::Boolean(false),
            ConversionWarning::invalid(OpcUaDataType::Boolean, raw, "not a boolean form, using false"),
        )),
    }
}

fn encode_datetime(raw: &Value) -> Conversion<VariantValue> {
    let millis = match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(ms) => Some(ms),
                Err(_) => {
                    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
                        return Ok(VariantValue::DateTime(instant.with_timezone(&Utc)));
                    }
                    None
                }
            }
        }
        _ => None,
    };

    match millis.and_then(DateTime::from_timestamp_millis) {
        Some(instant) => Ok(VariantValue::DateTime(instant)),
        None => Err(Degraded::new(
            VariantValue::Json(raw.clone()),
            ConversionWarning::invalid(OpcUaDataType::DateTime, raw, "not an epoch or RFC 3339 time, value passed through"),
        )),
    }
}

fn encode_guid(raw: &Value) -> Conversion<VariantValue> {
    match raw.as_str().map(|s| Uuid::parse_str(s.trim())) {
        Some(Ok(uuid)) => Ok(VariantValue::Guid(uuid)),
        _ => Err(Degraded::new(
            VariantValue::Json(raw.clone()),
            ConversionWarning::invalid(OpcUaDataType::Guid, raw, "not a GUID, value passed through"),
        )),
    }
}

fn encode_localized_text(raw: &Value) -> Conversion<VariantValue> {
    let parsed = match raw {
        Value::String(text) => serde_json::from_str::<Value>(text).ok(),
        Value::Array(_) | Value::Object(_) => Some(raw.clone()),
        _ => None,
    };

    let records = parsed.and_then(|value| match value {
        Value::Array(_) => serde_json::from_value::<Vec<LocalizedText>>(value).ok(),
        Value::Object(_) => serde_json::from_value::<LocalizedText>(value).ok().map(|t| vec![t]),
        _ => None,
    });

    match records {
        Some(records) => Ok(VariantValue::LocalizedText(records)),
        None => Err(Degraded::new(
            VariantValue::Json(raw.clone()),
            ConversionWarning::invalid(
                OpcUaDataType::LocalizedText,
                raw,
                "not a list of {text, locale} records, value passed through",
            ),
        )),
    }
}

// =============================================================================
// Parsing helpers
// =============================================================================

/// Parses an integer the way flow users write them.
///
/// Numbers are truncated toward zero, booleans are 1/0, and text takes an
/// optional sign followed by a decimal digit prefix or a `0x` hex prefix
/// (`"42abc"` is 42). Overlong text wraps in 128 bits, which keeps the low
/// bits exact for every declared width.
pub fn parse_integer(raw: &Value) -> Option<i128> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i128)),
        Value::Bool(b) => Some(i128::from(*b)),
        Value::String(s) => parse_integer_text(s),
        _ => None,
    }
}

fn parse_integer_text(text: &str) -> Option<i128> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = match digits.get(..2) {
        Some("0x") | Some("0X") => (16, &digits[2..]),
        _ => (10, digits),
    };

    let mut value: i128 = 0;
    let mut seen = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else { break };
        value = value.wrapping_mul(i128::from(radix)).wrapping_add(i128::from(d));
        seen = true;
    }

    seen.then(|| if negative { value.wrapping_neg() } else { value })
}

/// Parses a floating point value from a number, numeric text or boolean.
pub fn parse_float(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| !f.is_nan()),
        _ => None,
    }
}

/// Renders any JSON value as text.
///
/// Strings are returned as-is, integral numbers without a fraction, and
/// other values in their JSON form.
pub fn stringify(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{}", f as i128),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
