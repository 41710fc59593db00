// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `topic`: Parse a NodeId topic
//! - `encode`: Build a Variant from a raw value
//! - `extract`: Extract a native value from a DataValue
//! - `nodes`: Normalize the node addresses of a message
//! - `state`: Map a connector state to a node status
//! - `validate`: Validate the configuration file
//! - `version`: Show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use uaflow_opcua::CodecMode;

// =============================================================================
// Main CLI Structure
// =============================================================================

/// uaflow - OPC UA data-model translation tool
///
/// Inspects how flow messages map onto OPC UA NodeIds, Variants and node
/// address lists. Every command prints JSON to stdout; logs go to stderr.
#[derive(Parser, Debug)]
#[command(
    name = "uaflow",
    author = "Sylvex",
    version = uaflow_core::VERSION,
    about = "OPC UA data-model translation tool",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "uaflow.yaml",
        env = "UAFLOW_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        default_value = "warn",
        env = "UAFLOW_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json, compact)
    #[arg(long, default_value = "text", env = "UAFLOW_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the uaflow CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Parse a NodeId topic such as `ns=5;s=TestReadWrite`
    Topic(TopicArgs),

    /// Build a Variant from a raw value
    ///
    /// The value is read as JSON when it parses as JSON, otherwise as a
    /// plain string.
    Encode(EncodeArgs),

    /// Extract a native value from a DataValue
    Extract(ExtractArgs),

    /// Normalize the node addresses of a message
    ///
    /// Reads the message from the argument, or builds it from a node in
    /// the configuration file.
    Nodes(NodesArgs),

    /// Map a connector state to a node status
    State(StateArgs),

    /// Validate the configuration file
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `topic` command.
#[derive(Args, Debug, Clone)]
pub struct TopicArgs {
    /// Topic string
    pub topic: String,
}

/// Arguments for the `encode` command.
#[derive(Args, Debug, Clone)]
pub struct EncodeArgs {
    /// DataType tag, numeric id or `ns=0;i=<id>`
    #[arg(short, long)]
    pub data_type: String,

    /// Raw value
    pub value: String,

    /// Treat the value as a string even if it parses as JSON
    #[arg(long)]
    pub string: bool,

    /// Codec mode
    #[arg(short, long, default_value = "lenient", env = "UAFLOW_CODEC_MODE")]
    pub mode: CodecMode,
}

/// Arguments for the `extract` command.
#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Target DataType
    #[arg(short, long)]
    pub data_type: String,

    /// DataValue JSON (`{"value": ..}`) or a bare JSON value
    pub data_value: String,
}

/// Arguments for the `nodes` command.
#[derive(Args, Debug, Clone)]
pub struct NodesArgs {
    /// Message JSON
    #[arg(required_unless_present = "node")]
    pub message: Option<String>,

    /// Use the request message of this configured node
    #[arg(short, long, conflicts_with = "message")]
    pub node: Option<String>,

    /// Build the subscription list instead of the read list
    #[arg(long)]
    pub listen: bool,

    /// Also parse every address into a NodeId
    #[arg(long, conflicts_with = "listen")]
    pub resolve: bool,
}

/// Arguments for the `state` command.
#[derive(Args, Debug, Clone)]
pub struct StateArgs {
    /// Connector state tag
    pub state: String,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Include the parsed configuration in the output
    #[arg(short, long)]
    pub show_config: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<uaflow_config::LogFormat> for LogFormat {
    fn from(format: uaflow_config::LogFormat) -> Self {
        match format {
            uaflow_config::LogFormat::Text => LogFormat::Text,
            uaflow_config::LogFormat::Json => LogFormat::Json,
            uaflow_config::LogFormat::Compact => LogFormat::Compact,
        }
    }
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective log level based on flags.
    pub fn effective_log_level(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_command() {
        let cli = Cli::parse_from(["uaflow", "topic", "ns=0;i=85"]);
        match cli.command {
            Commands::Topic(args) => assert_eq!(args.topic, "ns=0;i=85"),
            other => panic!("Expected Topic command, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_command() {
        let cli = Cli::parse_from(["uaflow", "encode", "--data-type", "Boolean", "1", "--mode", "strict"]);
        match cli.command {
            Commands::Encode(args) => {
                assert_eq!(args.data_type, "Boolean");
                assert_eq!(args.value, "1");
                assert_eq!(args.mode, CodecMode::Strict);
                assert!(!args.string);
            }
            other => panic!("Expected Encode command, got {:?}", other),
        }
    }

    #[test]
    fn test_nodes_command() {
        let cli = Cli::parse_from(["uaflow", "nodes", "--listen", "{}"]);
        match cli.command {
            Commands::Nodes(args) => {
                assert!(args.listen);
                assert_eq!(args.message.as_deref(), Some("{}"));
            }
            other => panic!("Expected Nodes command, got {:?}", other),
        }

        let cli = Cli::try_parse_from(["uaflow", "nodes"]);
        assert!(cli.is_err());

        let cli = Cli::parse_from(["uaflow", "nodes", "--node", "reader"]);
        assert!(matches!(cli.command, Commands::Nodes(NodesArgs { node: Some(_), .. })));
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::parse_from(["uaflow", "-c", "/etc/uaflow/flow.toml", "-l", "debug", "state", "OPEN"]);
        assert_eq!(cli.config, PathBuf::from("/etc/uaflow/flow.toml"));
        assert_eq!(cli.log_level, "debug");

        let cli = Cli::parse_from(["uaflow", "version", "-v"]);
        assert_eq!(cli.effective_log_level(), "debug");
    }

    #[test]
    fn test_log_format() {
        let cli = Cli::parse_from(["uaflow", "--log-format", "json", "version"]);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(LogFormat::from(uaflow_config::LogFormat::Compact), LogFormat::Compact);
    }
}
