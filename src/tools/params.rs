use clap::{Args, Parser, Subcommand};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::inspect::DEFAULT_TREE_DEPTH;

/// Inspect a remote GitHub repository.
///
/// Without a subcommand, serves the repository tools over MCP on stdio. With one,
/// runs that operation once and prints the result.
/// Set GITHUB_TOKEN (or GH_TOKEN) to use the authenticated API path.
#[derive(Parser, Debug)]
#[command(name = "repo-probe", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Metadata, README preview, and top-level structure
    Info(RepoArgs),
    /// File structure down to a depth bound
    Structure(StructureArgs),
    /// README content as plain text
    Readme(RepoArgs),
    /// Dependencies from well-known manifest files
    Deps(RepoArgs),
}

#[derive(Args, Debug)]
pub struct RepoArgs {
    /// GitHub repository URL (e.g., https://github.com/owner/repo)
    pub repo_url: String,
}

#[derive(Args, Debug)]
pub struct StructureArgs {
    #[command(flatten)]
    pub repo: RepoArgs,
    /// Maximum depth to traverse (0 returns an empty listing)
    #[arg(long, default_value_t = DEFAULT_TREE_DEPTH)]
    pub max_depth: usize,
}

#[derive(Deserialize, JsonSchema)]
pub struct RepoUrlParams {
    /// GitHub repository URL (e.g., "https://github.com/owner/repo")
    pub repo_url: String,
}

#[derive(Deserialize, JsonSchema)]
pub struct RepoStructureParams {
    /// GitHub repository URL
    pub repo_url: String,
    /// Maximum depth to traverse (default: 3)
    pub max_depth: Option<usize>,
}
