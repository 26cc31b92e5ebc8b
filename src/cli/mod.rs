//! Command-line interface, parsed with clap.

mod commands;

use clap::{Parser, Subcommand};

/// Mediatrack - media catalog API
/// Films, series, seasons, episodes and ratings over REST
#[derive(Parser)]
#[command(name = "mediatrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    #[command(alias = "daemon", alias = "-d")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// List user accounts
    #[command(alias = "ls")]
    Users,

    /// Give a user the admin role
    Promote {
        /// Username to promote
        username: String,
    },

    /// Issue a new API key for a user, revoking the old one
    RotateKey {
        /// Username whose key is replaced
        username: String,
    },
}

pub use commands::*;
