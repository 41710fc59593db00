// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! Every command returns its result as JSON; [`execute`] prints it.

mod inspect;
mod nodes;
mod validate;
mod version;

pub use inspect::{encode, extract, state, topic};
pub use nodes::nodes;
pub use validate::validate;
pub use version::version;

use serde_json::Value;

use crate::cli::{Cli, Commands};
use crate::error::BinResult;

/// Runs the command selected on the command line and returns its output.
pub fn run(cli: &Cli) -> BinResult<Value> {
    match &cli.command {
        Commands::Topic(args) => topic(args),
        Commands::Encode(args) => encode(args),
        Commands::Extract(args) => extract(args),
        Commands::Nodes(args) => nodes(cli, args),
        Commands::State(args) => Ok(state(args)),
        Commands::Validate(args) => validate(cli, args),
        Commands::Version => Ok(version()),
    }
}

/// Executes the appropriate command and prints its JSON output.
pub fn execute(cli: &Cli) -> BinResult<()> {
    let output = run(cli)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
