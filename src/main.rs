mod config;
mod github;
mod inspect;
mod tools;

pub const USER_AGENT: &str = concat!("repo-probe/", env!("CARGO_PKG_VERSION"));

use clap::Parser;
use config::Config;
use rmcp::{ServiceExt, transport::stdio};
use tools::{Cli, RepoTools};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("repo_probe=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let tools = RepoTools::new(&config)
        .inspect_err(|e| tracing::error!("failed to build HTTP client: {e}"))?;

    let Some(command) = cli.command else {
        info!("starting repo-probe MCP server");
        let service = tools
            .serve(stdio())
            .await
            .inspect_err(|e| tracing::error!("failed to start server: {e}"))?;
        service.waiting().await?;
        info!("server stopped");
        return Ok(());
    };

    match tools.run(command).await {
        Ok(output) => {
            println!("{output}");
            info!("done");
            Ok(())
        }
        Err(message) => {
            tracing::error!(%message, "request failed");
            eprintln!("Error: {message}");
            std::process::exit(1);
        }
    }
}
