// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! uaflow - OPC UA data-model translation tool
//!
//! Main binary entry point.

use uaflow_bin::cli::Cli;
use uaflow_bin::commands::execute;
use uaflow_bin::error::report_error_and_exit;
use uaflow_bin::logging::init_logging;

fn main() {
    let cli = Cli::parse_args();
    init_logging(cli.effective_log_level(), cli.log_format);

    tracing::debug!(version = uaflow_bin::VERSION, command = ?cli.command, "Starting uaflow");

    if let Err(error) = execute(&cli) {
        report_error_and_exit(error);
    }
}
