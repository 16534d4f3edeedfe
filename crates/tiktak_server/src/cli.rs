//! Command-line interface for tiktak.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tiktak - session-scoped tic-tac-toe server with an MCP adapter
#[derive(Parser, Debug)]
#[command(name = "tiktak")]
#[command(about = "Tic-tac-toe game server for HTTP clients and LLM agents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the REST game server
    Serve {
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Run the MCP tool adapter on stdio
    Mcp {
        /// REST server to forward to
        #[arg(long, conflicts_with = "local")]
        api_base: Option<String>,

        /// Play against an in-process registry instead of a REST server
        #[arg(long)]
        local: bool,
    },
}
