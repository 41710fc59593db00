// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use serde_json::{json, Value};

/// Executes the `version` command.
pub fn version() -> Value {
    json!({
        "name": "uaflow",
        "version": crate::VERSION,
        "components": {
            "uaflow-core": uaflow_core::VERSION,
            "uaflow-opcua": uaflow_opcua::VERSION,
            "uaflow-config": uaflow_config::VERSION,
        },
        "target": {
            "arch": std::env::consts::ARCH,
            "os": std::env::consts::OS,
        },
    })
}
