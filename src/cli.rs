//! Command-line interface for the gridmatch server.

use clap::Parser;

/// Gridmatch - session engine for two-player grid games
#[derive(Parser, Debug)]
#[command(name = "gridmatch")]
#[command(about = "Authoritative game session server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind to
    #[arg(short, long, default_value = "3000")]
    pub port: u16,
}
