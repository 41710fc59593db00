// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uaflow Integration Tests
//!
//! Integration tests for the uaflow translation core, plus the fixtures,
//! builders and assertions they share.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Pre-built messages, DataValues and configuration files
//!   - `builders`: Builder patterns for messages and flow nodes
//!   - `assertions`: Custom assertion helpers
//!   - `mocks`: A scripted connector
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p uaflow-tests
//!
//! # Run a specific suite
//! cargo test -p uaflow-tests --test integration_topic_codec
//! cargo test -p uaflow-tests --test integration_nodes
//! cargo test -p uaflow-tests --test integration_session
//! cargo test -p uaflow-tests --test integration_config
//! cargo test -p uaflow-tests --test integration_concurrency
//! ```
//!
//! ## Test Categories
//!
//! ### Topic and Codec Tests (`integration_topic_codec.rs`)
//! - Topic grammar and NodeId conversion
//! - Encoding-path equivalence and lenient/strict handling
//! - DataValue extraction and read responses
//!
//! ### Node Tests (`integration_nodes.rs`)
//! - Read/write and listen normalization precedence
//! - Batch NodeId resolution
//!
//! ### Session Tests (`integration_session.rs`)
//! - Connector state mapping and session sharing
//! - Session-invalidating error detection
//!
//! ### Config Tests (`integration_config.rs`)
//! - Loading YAML, TOML and JSON files
//! - Node request messages and method calls from configuration
//!
//! ### Concurrency Tests (`integration_concurrency.rs`)
//! - Shared codec and normalizer across tasks
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use uaflow_tests::prelude::*;
//!
//! #[test]
//! fn test_something() {
//!     let msg = MessageBuilder::new()
//!         .topic("ns=5;s=TestReadWrite")
//!         .payload_field("nodesToWrite", json!(["ns=4;s=X"]))
//!         .build();
//!     assert_nodes(&build_nodes_to_read(&msg), &["ns=4;s=X"]);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::mocks::*;
    pub use crate::common::init_test_logging;
}
