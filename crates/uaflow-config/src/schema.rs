// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions for uaflow.
//!
//! # Schema Structure
//!
//! ```text
//! UaFlowConfig
//! ├── codec: CodecConfig
//! ├── nodes: Vec<FlowNodeConfig>
//! └── logging: LoggingConfig
//! ```

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uaflow_core::{calc_milliseconds, AddressSpaceItem, Message, TimeUnit};
use uaflow_opcua::{BuiltinCatalog, CodecMode, DataTypeCatalog, DataTypeRef, MethodDefaults, NodeId};

use crate::error::{ConfigError, ConfigResult};

/// Interval unit used when a node sets `interval` without `intervalUnit`.
pub const DEFAULT_INTERVAL_UNIT: &str = "ms";

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure for uaflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UaFlowConfig {
    /// Codec configuration.
    #[serde(default)]
    pub codec: CodecConfig,

    /// Flow node configurations.
    #[serde(default)]
    pub nodes: Vec<FlowNodeConfig>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl UaFlowConfig {
    /// Validates the entire configuration.
    ///
    /// Checks unique node names, parseable NodeIds, known DataTypes and
    /// known interval units.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut names = HashSet::new();
        for (index, node) in self.nodes.iter().enumerate() {
            node.validate(index)?;
            if !names.insert(node.name.as_str()) {
                return Err(ConfigError::duplicate_node_name(&node.name));
            }
        }
        Ok(())
    }

    /// Returns the node with the given name.
    pub fn node(&self, name: &str) -> Option<&FlowNodeConfig> {
        self.nodes.iter().find(|node| node.name == name)
    }
}

/// Codec settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// How degraded conversions are treated.
    #[serde(default)]
    pub mode: CodecMode,
}

// =============================================================================
// Flow nodes
// =============================================================================

/// What a flow node does with its addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowNodeKind {
    /// Reads node values.
    #[default]
    Read,
    /// Writes node values.
    Write,
    /// Subscribes to node values.
    Listen,
    /// Calls a method.
    Method,
}

impl FlowNodeKind {
    /// Returns the string representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Listen => "listen",
            Self::Method => "method",
        }
    }
}

impl fmt::Display for FlowNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A configured flow node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FlowNodeConfig {
    /// Unique node name.
    pub name: String,

    /// Node kind.
    #[serde(default)]
    pub kind: FlowNodeKind,

    /// Default topic (a NodeId address).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Configured address-space items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address_space_items: Vec<AddressSpaceItem>,

    /// Polling or publishing interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,

    /// Unit code of `interval` (`ms`, `s`, `m`, `h`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_unit: Option<String>,

    /// Method call settings for `method` nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<MethodDefaults>,
}

impl FlowNodeConfig {
    /// Creates a node with the given name and kind.
    pub fn new(name: impl Into<String>, kind: FlowNodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    /// Returns the interval unit code.
    pub fn interval_unit(&self) -> &str {
        self.interval_unit.as_deref().unwrap_or(DEFAULT_INTERVAL_UNIT)
    }

    /// Returns the interval in milliseconds, if an interval is set.
    pub fn interval_ms(&self) -> Option<u64> {
        self.interval
            .map(|interval| calc_milliseconds(interval, self.interval_unit()))
    }

    /// Builds the request message this node sends by default.
    pub fn request_message(&self) -> Message {
        let mut msg = Message::new();
        if let Some(topic) = &self.topic {
            msg = msg.with_topic(topic.clone());
        }
        if !self.address_space_items.is_empty() {
            msg = msg.with_address_space_items(self.address_space_items.clone());
        }
        msg
    }

    fn field(&self, index: usize, name: &str) -> String {
        format!("nodes[{}].{}", index, name)
    }

    fn check_address(&self, address: &str) -> ConfigResult<()> {
        NodeId::from_str(address)
            .map(|_| ())
            .map_err(|e| ConfigError::invalid_address(&self.name, address, e.to_string()))
    }

    fn check_data_type(&self, field: String, data_type: DataTypeRef) -> ConfigResult<()> {
        match BuiltinCatalog.resolve(&data_type) {
            Some(_) => Ok(()),
            None => Err(ConfigError::validation(
                field,
                format!("unknown data type '{}'", data_type),
            )),
        }
    }

    /// Validates this node. `index` is used in error field paths.
    pub fn validate(&self, index: usize) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::missing_field(self.field(index, "name")));
        }

        if let Some(topic) = self.topic.as_deref().filter(|t| !t.is_empty()) {
            self.check_address(topic)?;
        }

        for (i, item) in self.address_space_items.iter().enumerate() {
            self.check_address(&item.node_id)?;
            if let Some(name) = item.datatype_name.as_deref().filter(|n| !n.is_empty()) {
                self.check_data_type(
                    self.field(index, &format!("addressSpaceItems[{}].datatypeName", i)),
                    DataTypeRef::from(name),
                )?;
            }
        }

        if let Some(unit) = &self.interval_unit {
            TimeUnit::from_str(unit).map_err(|e| {
                ConfigError::validation(self.field(index, "intervalUnit"), e.to_string())
            })?;
        }

        match (&self.method, self.kind) {
            (Some(method), _) => self.validate_method(index, method),
            (None, FlowNodeKind::Method) => Err(ConfigError::missing_field(self.field(index, "method"))),
            (None, _) => Ok(()),
        }
    }

    fn validate_method(&self, index: usize, method: &MethodDefaults) -> ConfigResult<()> {
        if method.object_id.is_empty() {
            return Err(ConfigError::missing_field(self.field(index, "method.objectId")));
        }
        if method.method_id.is_empty() {
            return Err(ConfigError::missing_field(self.field(index, "method.methodId")));
        }
        self.check_address(&method.object_id)?;
        self.check_address(&method.method_id)?;

        for (i, argument) in method.input_arguments.iter().enumerate() {
            self.check_data_type(
                self.field(index, &format!("method.inputArguments[{}].dataType", i)),
                DataTypeRef::from(&argument.data_type),
            )?;
        }
        Ok(())
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the filter directive for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name, accepting `warning` for `warn`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable text.
    #[default]
    Text,
    /// JSON lines.
    Json,
    /// Compact single-line text.
    Compact,
}

impl LogFormat {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }

    /// Parses a format name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use uaflow_opcua::MethodArgument;

    fn reader() -> FlowNodeConfig {
        FlowNodeConfig {
            address_space_items: vec![
                AddressSpaceItem::new("Pressure", "ns=1;s=Pressure").with_datatype("Double")
            ],
            interval: Some(5),
            interval_unit: Some("s".to_string()),
            ..FlowNodeConfig::new("reader", FlowNodeKind::Read)
        }
    }

    #[test]
    fn test_valid_config() {
        let config = UaFlowConfig {
            nodes: vec![reader(), FlowNodeConfig::new("listener", FlowNodeKind::Listen)],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.node("reader").and_then(FlowNodeConfig::interval_ms), Some(5_000));
    }

    #[test]
    fn test_duplicate_names() {
        let config = UaFlowConfig {
            nodes: vec![reader(), reader()],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateNodeName { ref name }) if name == "reader"
        ));
    }

    #[test]
    fn test_empty_name() {
        let node = FlowNodeConfig::new("  ", FlowNodeKind::Read);
        assert!(matches!(node.validate(3), Err(ConfigError::MissingField { ref field }) if field == "nodes[3].name"));
    }

    #[test]
    fn test_invalid_addresses() {
        let mut node = reader();
        node.topic = Some("ns=;i=1".to_string());
        assert!(matches!(node.validate(0), Err(ConfigError::InvalidAddress { .. })));

        let mut node = reader();
        node.address_space_items.push(AddressSpaceItem::new("Bad", "Pressure"));
        assert!(matches!(node.validate(0), Err(ConfigError::InvalidAddress { .. })));
    }

    #[test]
    fn test_unknown_data_type_and_unit() {
        let mut node = reader();
        node.address_space_items[0].datatype_name = Some("Decimal128".to_string());
        assert!(matches!(node.validate(0), Err(ConfigError::Validation { .. })));

        let mut node = reader();
        node.interval_unit = Some("d".to_string());
        let err = node.validate(0).unwrap_err();
        assert!(err.to_string().contains("nodes[0].intervalUnit"));
    }

    #[test]
    fn test_method_node() {
        let mut node = FlowNodeConfig::new("caller", FlowNodeKind::Method);
        assert!(matches!(node.validate(0), Err(ConfigError::MissingField { .. })));

        node.method = Some(MethodDefaults {
            object_id: "ns=4;i=1234".to_string(),
            method_id: "ns=4;i=12345".to_string(),
            method_type: "basic".to_string(),
            input_arguments: vec![MethodArgument::new("barks", "UInt32", serde_json::json!("3"))],
        });
        assert!(node.validate(0).is_ok());

        if let Some(method) = node.method.as_mut() {
            method.input_arguments[0] = MethodArgument::new("barks", "Quantum", serde_json::json!("3"));
        }
        assert!(node.validate(0).is_err());
    }

    #[test]
    fn test_interval_defaults() {
        let mut node = FlowNodeConfig::new("n", FlowNodeKind::Read);
        assert_eq!(node.interval_ms(), None);
        node.interval = Some(250);
        assert_eq!(node.interval_ms(), Some(250));
    }

    #[test]
    fn test_request_message() {
        let mut node = reader();
        node.topic = Some("ns=1;s=Pressure".to_string());
        let msg = node.request_message();
        assert_eq!(msg.topic.as_deref(), Some("ns=1;s=Pressure"));
        assert_eq!(msg.address_space_items.map(|items| items.len()), Some(1));
    }

    #[test]
    fn test_log_parsing() {
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
    }
}
