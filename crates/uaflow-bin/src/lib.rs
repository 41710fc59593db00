// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uaflow-bin
//!
//! Command-line front end for the uaflow translation core.
//!
//! This crate provides:
//!
//! - CLI argument parsing with clap
//! - Logging initialization
//! - Command implementations (topic, encode, extract, nodes, state, validate, version)
//!
//! ## Architecture
//!
//! ```text
//!                    ┌─────────────┐
//!                    │   main.rs   │
//!                    └──────┬──────┘
//!                           │
//!                    ┌──────▼──────┐
//!                    │   cli.rs    │
//!                    └──────┬──────┘
//!                           │
//!               ┌───────────┼───────────┐
//!               ▼                       ▼
//!        ┌──────────┐             ┌──────────┐
//!        │ commands │             │ logging  │
//!        └────┬─────┘             └──────────┘
//!             │
//!      ┌──────▼──────┐
//!      │  uaflow-*   │
//!      │  (crates)   │
//!      └─────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Parse a topic
//! uaflow topic "ns=5;s=TestReadWrite"
//!
//! # Build a Variant
//! uaflow encode -d Boolean 1
//!
//! # Normalize the addresses of a configured node
//! uaflow -c flow.yaml nodes --node reader --resolve
//!
//! # Validate configuration
//! uaflow validate --show-config
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands, LogFormat};
pub use error::{BinError, BinResult};

/// Binary version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
