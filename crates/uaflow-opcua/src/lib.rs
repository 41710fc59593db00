// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA data-model translation for uaflow.
//!
//! This crate sits between flow messages and an OPC UA client. It owns no
//! connection: it prepares the payloads the transport sends and interprets
//! the results it returns.
//!
//! # Features
//!
//! - NodeId parsing from `ns=<n>;<kind>=<value>` topics
//! - Variant encoding for the built-in scalar DataTypes, scalars and arrays
//! - DataValue extraction toward a configured DataType
//! - Normalization of read, write and listen requests into node lists
//! - Connector state to node status mapping
//! - Method call requests and response messages
//!
//! # Error Handling
//!
//! ```text
//! OpcUaError
//! ├── Address       - Malformed NodeId addresses
//! ├── Conversion    - Values rejected by the codec (strict mode)
//! ├── Session       - Session-invalidating transport errors
//! └── Configuration - Unknown DataTypes, missing fields
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use uaflow_core::Message;
//! use uaflow_opcua::{build_nodes_to_read, TopicAddress, VariantCodec};
//!
//! let msg = Message::new().with_topic("ns=5;s=TestReadWrite");
//! let address = TopicAddress::parse(msg.topic_str().unwrap())?;
//! let nodes = build_nodes_to_read(&msg);
//!
//! let codec = VariantCodec::lenient();
//! let variant = codec.build_variant("Boolean", &json!("1"))?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod codec;
pub mod error;
pub mod extract;
pub mod method;
pub mod nodes;
pub mod response;
pub mod session;
pub mod status;
pub mod topic;
pub mod types;
pub mod variant;

// Re-export commonly used types
pub use error::{
    is_session_bad, AddressError, ConfigurationError, ConversionError, ErrorCode, ErrorSeverity,
    OpcUaError, OpcUaResult, SessionError,
};
pub use types::{LocalizedText, NodeId, NodeIdentifier, OpcUaDataType};

pub use catalog::{BuiltinCatalog, DataTypeCatalog, DataTypeRef};
pub use codec::{CodecMode, Conversion, ConversionWarning, Degraded, VariantCodec};
pub use extract::{extract_value, DataValue, ValueExtractor};
pub use nodes::{build_nodes_to_listen, build_nodes_to_read, NodeAddressNormalizer, NodeResolution};
pub use session::{set_initial_state, Connector, ConnectorState, FlowNodeState, NodeStatus, SessionObserver};
pub use status::{status_code_name, EntryStatus, Quality, StatusCodeInfo};
pub use topic::{
    parse_identifier, parse_namespace, parse_topic, IdentifierKind, IdentifierValue, TopicAddress,
    TopicIdentifier,
};
pub use variant::{ArrayType, Variant, VariantValue};

pub use method::{CallMethod, MethodArgument, MethodCallRequest, MethodCallResult, MethodDefaults};
pub use response::{method_response, ReadResponseBuilder, ReadResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
