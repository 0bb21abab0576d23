// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

#[derive(Parser, Debug)]
#[command(
    name = "agentmesh",
    about = "Multi-project MCP server coordinating a fleet of autonomous coding agents",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Comma-separated list of tool names to expose over MCP, or "all".
    /// Unknown names are ignored. Defaults to the full tool surface.
    #[arg(long, default_value = "all")]
    pub tools: String,

    /// Increase verbosity (-v = debug, -vv = trace). Overrides AGENTMESH_LOG/RUST_LOG.
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the MCP server on stdio (the default when no subcommand is given).
    Serve {
        /// Comma-separated list of tool names to expose over MCP, or "all".
        #[arg(long, default_value = "all")]
        tools: String,
    },
    /// Print the effective configuration and exit.
    ShowConfig,
    /// List every tool name the server can expose over MCP.
    ListTools,
    /// Generate a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "agentmesh", &mut std::io::stdout());
}
