// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uaflow-config
//!
//! Configuration management for uaflow.
//!
//! ## Features
//!
//! - **Schema Definition**: flow nodes, codec mode and logging settings
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `UAFLOW_LOG_LEVEL`, `UAFLOW_LOG_FORMAT`, `UAFLOW_CODEC_MODE`
//! - **Validation**: unique node names, parseable NodeIds, known DataTypes and units
//!
//! ## Quick Start
//!
//! ```no_run
//! use uaflow_config::loader::load_config;
//!
//! let config = load_config("uaflow.yaml").unwrap();
//! println!("Codec mode: {}", config.codec.mode);
//! println!("Nodes: {}", config.nodes.len());
//! ```
//!
//! ## Example File
//!
//! ```yaml
//! codec:
//!   mode: lenient
//! nodes:
//!   - name: reader
//!     kind: read
//!     interval: 5
//!     intervalUnit: s
//!     addressSpaceItems:
//!       - name: Pressure
//!         nodeId: "ns=1;s=Pressure"
//!         datatypeName: Double
//! logging:
//!   level: info
//!   format: text
//! ```
//!
//! Values may reference environment variables:
//!
//! ```yaml
//! nodes:
//!   - name: reader
//!     topic: "${READER_TOPIC:ns=1;s=Pressure}"
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{
    CodecConfig, FlowNodeConfig, FlowNodeKind, LogFormat, LogLevel, LoggingConfig, UaFlowConfig,
    DEFAULT_INTERVAL_UNIT,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
