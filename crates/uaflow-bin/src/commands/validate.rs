// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use serde_json::{json, Value};
use uaflow_config::{ConfigLoader, FlowNodeKind, UaFlowConfig};

use crate::cli::{Cli, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Executes the `validate` command.
///
/// Loading already validates the file; this adds a per-node summary and
/// warnings for settings that are valid but probably unintended.
pub fn validate(cli: &Cli, args: &ValidateArgs) -> BinResult<Value> {
    tracing::info!(path = %cli.config.display(), "Validating configuration");

    let config = ConfigLoader::new().load(&cli.config)?;
    let warnings = collect_warnings(&config);
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let nodes: Vec<Value> = config
        .nodes
        .iter()
        .map(|node| {
            json!({
                "name": node.name,
                "kind": node.kind,
                "topic": node.topic,
                "addressSpaceItems": node.address_space_items.len(),
                "intervalMs": node.interval_ms(),
            })
        })
        .collect();

    let mut output = json!({
        "valid": true,
        "configPath": cli.config.display().to_string(),
        "codecMode": config.codec.mode.to_string(),
        "nodes": nodes,
        "warnings": warnings,
    });

    if args.show_config {
        let rendered = serde_json::to_value(&config)
            .map_err(|e| BinError::input(e.to_string()).with_context("validate"))?;
        output["config"] = rendered;
    }

    Ok(output)
}

fn collect_warnings(config: &UaFlowConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.nodes.is_empty() {
        warnings.push("No flow nodes configured".to_string());
    }

    for node in &config.nodes {
        let has_topic = node.topic.as_deref().is_some_and(|t| !t.is_empty());
        let addressed = has_topic || !node.address_space_items.is_empty();
        if !addressed && node.kind != FlowNodeKind::Method {
            warnings.push(format!("Node '{}' has no topic or address space items", node.name));
        }
        if node.interval_unit.is_some() && node.interval.is_none() {
            warnings.push(format!("Node '{}' sets intervalUnit without an interval", node.name));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cli_for(path: &str) -> Cli {
        Cli::parse_from(["uaflow", "-c", path, "validate"])
    }

    #[test]
    fn test_validate_valid_config() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            "codec:\n  mode: strict\nnodes:\n  - name: watcher\n    kind: listen\n    topic: \"ns=1;i=1001\"\n    interval: 2\n    intervalUnit: s"
        )
        .unwrap();

        let cli = cli_for(file.path().to_str().unwrap());
        let output = validate(&cli, &ValidateArgs { show_config: true }).unwrap();

        assert_eq!(output["valid"], true);
        assert_eq!(output["codecMode"], "strict");
        assert_eq!(output["nodes"][0]["name"], "watcher");
        assert_eq!(output["nodes"][0]["intervalMs"], 2000);
        assert_eq!(output["warnings"], json!([]));
        assert!(output["config"].is_object());
    }

    #[test]
    fn test_validate_warnings() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "nodes:\n  - name: empty\n    intervalUnit: s").unwrap();

        let cli = cli_for(file.path().to_str().unwrap());
        let output = validate(&cli, &ValidateArgs::default()).unwrap();
        let warnings = output["warnings"].as_array().unwrap();

        assert_eq!(warnings.len(), 2);
        assert!(output.get("config").is_none());
    }

    #[test]
    fn test_validate_invalid_config() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "nodes:\n  - name: bad\n    topic: \"ns=1;q=1\"").unwrap();

        let cli = cli_for(file.path().to_str().unwrap());
        let err = validate(&cli, &ValidateArgs::default()).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_validate_missing_file() {
        let cli = cli_for("/nonexistent/uaflow.yaml");
        assert!(validate(&cli, &ValidateArgs::default()).is_err());
    }
}
