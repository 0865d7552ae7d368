//! Gridmatch server binary.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use gridmatch::{GameService, router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!(host = %cli.host, port = cli.port, "Starting gridmatch server");

    let service = GameService::new();
    let app = router(service);

    let listener = tokio::net::TcpListener::bind((cli.host.as_str(), cli.port)).await?;
    info!("Server ready at http://{}:{}/", cli.host, cli.port);

    axum::serve(listener, app).await?;

    Ok(())
}
