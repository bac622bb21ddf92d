// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "berth")]
#[command(about = "Inspect and control containers on a Docker daemon")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List containers with status, resource usage, and links
    Ps {
        /// Emit the view models as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the last lines of a container's logs
    Logs {
        /// Container name or id
        container: String,
        /// Number of lines (clamped to the configured maximum)
        #[arg(short, long)]
        tail: Option<i64>,
    },

    /// Start a container and report its settled state
    Start {
        /// Container name or id
        container: String,
    },

    /// Stop a container and report its settled state
    Stop {
        /// Container name or id
        container: String,
    },

    /// Restart a container and report its settled state
    Restart {
        /// Container name or id
        container: String,
    },

    /// Print copy-paste attach commands for each configured platform profile
    Exec {
        /// Container name or id
        container: String,
    },
}
