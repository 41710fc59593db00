// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `nodes` command.

use serde_json::{json, Value};
use uaflow_config::load_config;
use uaflow_core::Message;
use uaflow_opcua::NodeAddressNormalizer;

use crate::cli::{Cli, NodesArgs};
use crate::error::{BinError, BinResult};

/// Executes the `nodes` command.
pub fn nodes(cli: &Cli, args: &NodesArgs) -> BinResult<Value> {
    let msg = request_message(cli, args)?;
    let normalizer = NodeAddressNormalizer::default();

    if args.listen {
        let items = normalizer.nodes_to_listen(&msg);
        return Ok(json!({ "items": items }));
    }

    let addresses = normalizer.nodes_to_read(&msg);
    if !args.resolve {
        return Ok(json!({ "nodes": addresses }));
    }

    let resolution = normalizer.resolve_node_ids(&msg);
    let resolved: Vec<Value> = resolution
        .resolved
        .iter()
        .map(|(address, node_id)| json!({ "address": address, "nodeId": node_id.to_string() }))
        .collect();
    let failed: Vec<Value> = resolution
        .failed
        .iter()
        .map(|(address, error)| {
            json!({
                "address": address,
                "code": error.error_code().to_string(),
                "error": error.to_string(),
            })
        })
        .collect();

    Ok(json!({
        "nodes": addresses,
        "resolved": resolved,
        "failed": failed,
        "complete": resolution.is_complete(),
    }))
}

fn request_message(cli: &Cli, args: &NodesArgs) -> BinResult<Message> {
    if let Some(name) = args.node.as_deref() {
        let config = load_config(&cli.config)?;
        let node = config
            .node(name)
            .ok_or_else(|| BinError::input(format!("No node named '{}' in {}", name, cli.config.display())))?;
        tracing::debug!(node = %name, kind = ?node.kind, "Using configured request message");
        return Ok(node.request_message());
    }

    let text = args.message.as_deref().unwrap_or("{}");
    Message::from_json(text).map_err(|e| BinError::from(e).with_context("nodes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn run(argv: &[&str]) -> BinResult<Value> {
        let cli = Cli::parse_from(argv);
        match &cli.command {
            crate::cli::Commands::Nodes(args) => nodes(&cli, args),
            other => panic!("Expected Nodes command, got {:?}", other),
        }
    }

    #[test]
    fn test_nodes_from_message() {
        let output = run(&[
            "uaflow",
            "nodes",
            r#"{"topic":"ns=5;s=A","payload":{"nodesToRead":["ns=2;s=X","ns=2;s=Y"]}}"#,
        ])
        .unwrap();
        assert_eq!(output, json!({ "nodes": ["ns=2;s=X", "ns=2;s=Y"] }));
    }

    #[test]
    fn test_nodes_listen() {
        let output = run(&["uaflow", "nodes", "--listen", r#"{"topic":"ns=1;i=1001"}"#]).unwrap();
        assert_eq!(output["items"][0]["nodeId"], "ns=1;i=1001");
        assert_eq!(output["items"][0]["name"], "");
    }

    #[test]
    fn test_nodes_resolve() {
        let output = run(&[
            "uaflow",
            "nodes",
            "--resolve",
            r#"{"nodesToRead":["ns=2;s=X","ns=2;q=Y"]}"#,
        ])
        .unwrap();
        assert_eq!(output["resolved"][0]["nodeId"], "ns=2;s=X");
        assert_eq!(output["failed"][0]["address"], "ns=2;q=Y");
        assert_eq!(output["complete"], false);
    }

    #[test]
    fn test_nodes_from_config() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            "nodes:\n  - name: reader\n    addressSpaceItems:\n      - name: Pressure\n        nodeId: \"ns=1;s=Pressure\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let output = run(&["uaflow", "-c", path, "nodes", "--node", "reader"]).unwrap();
        assert_eq!(output, json!({ "nodes": ["ns=1;s=Pressure"] }));

        let err = run(&["uaflow", "-c", path, "nodes", "--node", "writer"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_nodes_invalid_message() {
        let err = run(&["uaflow", "nodes", "not json"]).unwrap_err();
        assert!(err.to_string().starts_with("nodes: "));
    }
}
