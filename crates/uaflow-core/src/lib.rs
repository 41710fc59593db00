// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uaflow-core
//!
//! Shared types for the uaflow OPC UA bridge.
//!
//! - **Message**: the flow message envelope and [`AddressSpaceItem`]
//! - **Time**: interval unit helpers
//! - **Error**: core error type
//!
//! ## Example
//!
//! ```rust,ignore
//! use uaflow_core::{Message, calc_milliseconds};
//!
//! let msg = Message::browse("ns=0;i=85");
//! let interval = calc_milliseconds(5, "s");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod message;
pub mod time;

// =============================================================================
// Re-exports for convenience
// =============================================================================

pub use error::{CoreError, CoreResult};
pub use message::{AddressSpaceItem, Message};
pub use time::{calc_duration, calc_milliseconds, time_unit_name, TimeUnit, DEFAULT_INTERVAL_MS};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
