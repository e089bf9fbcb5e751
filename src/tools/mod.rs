mod errors;
mod params;

pub use errors::ToolError;
pub use params::{Cli, Command, RepoStructureParams, RepoUrlParams};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use tracing::info;

use errors::{to_json, tool_error_message, tool_to_mcp_error};

use crate::config::Config;
use crate::github::types::RepositoryLocator;
use crate::github::{self, Source};
use crate::inspect::{self, DEFAULT_TREE_DEPTH};

/// The four repository operations, each taking a repository URL.
///
/// Served as MCP tools (`get_repo_info`, `get_repo_structure`, `get_repo_readme`,
/// `analyze_repo_dependencies`) and reachable one-shot through [`RepoTools::run`].
/// The access path is fixed at construction: authenticated when `Config` carries a token.
#[derive(Clone)]
pub struct RepoTools {
    source: Source,
    web_host: String,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl RepoTools {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::with_source(Source::from_config(config)?, config))
    }

    pub fn with_source(source: Source, config: &Config) -> Self {
        info!(
            authenticated = source.is_authenticated(),
            api = %config.api_base,
            "repository tools ready"
        );
        Self {
            source,
            web_host: config.web_host.clone(),
            tool_router: Self::tool_router(),
        }
    }

    fn locate(&self, repo_url: &str) -> Result<RepositoryLocator, ToolError> {
        Ok(github::parse_locator(repo_url, &self.web_host)?)
    }

    /// Run one CLI command, rendering failures as user-facing messages.
    pub async fn run(&self, command: Command) -> Result<String, String> {
        let result = match command {
            Command::Info(args) => self.repo_info(&args.repo_url).await,
            Command::Structure(args) => {
                self.repo_structure(&args.repo.repo_url, args.max_depth)
                    .await
            }
            Command::Readme(args) => self.repo_readme(&args.repo_url).await,
            Command::Deps(args) => self.repo_dependencies(&args.repo_url).await,
        };
        result.map_err(|e| tool_error_message(&e))
    }

    /// Metadata, a 500-character README preview, and the first ten top-level entries.
    pub async fn repo_info(&self, repo_url: &str) -> Result<String, ToolError> {
        let repo = self.locate(repo_url)?;
        info!(%repo, "tool:repo_info");

        let summary = inspect::repo_info(&self.source, repo_url, &repo).await?;

        info!(
            top_level = summary.structure_summary.len(),
            "repo_info complete"
        );
        to_json(&summary)
    }

    pub async fn repo_structure(&self, repo_url: &str, max_depth: usize) -> Result<String, ToolError> {
        let repo = self.locate(repo_url)?;
        info!(%repo, max_depth, "tool:repo_structure");

        let tree = inspect::build_tree(&self.source, &repo, max_depth).await?;

        info!(top_level = tree.len(), "repo_structure complete");
        to_json(&tree)
    }

    pub async fn repo_readme(&self, repo_url: &str) -> Result<String, ToolError> {
        let repo = self.locate(repo_url)?;
        info!(%repo, "tool:repo_readme");

        let text = inspect::fetch_document(&self.source, &repo).await?;

        info!(chars = text.chars().count(), "repo_readme complete");
        Ok(text)
    }

    pub async fn repo_dependencies(&self, repo_url: &str) -> Result<String, ToolError> {
        let repo = self.locate(repo_url)?;
        info!(%repo, "tool:repo_dependencies");

        let report = inspect::collect_dependencies(&self.source, &repo).await;

        info!(manifests = report.len(), "repo_dependencies complete");
        to_json(&report)
    }

    #[tool(
        name = "get_repo_info",
        description = "Get comprehensive information about a GitHub repository: metadata, a README preview (first 500 characters), and the first 10 top-level entries of its file structure. Returns JSON."
    )]
    async fn get_repo_info(
        &self,
        Parameters(params): Parameters<RepoUrlParams>,
    ) -> Result<CallToolResult, McpError> {
        let output = self
            .repo_info(&params.repo_url)
            .await
            .map_err(tool_to_mcp_error)?;
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "get_repo_structure",
        description = "Get the file structure of a GitHub repository as a JSON tree, down to max_depth levels (default: 3). Directories that cannot be listed are kept with empty children and an error note."
    )]
    async fn get_repo_structure(
        &self,
        Parameters(params): Parameters<RepoStructureParams>,
    ) -> Result<CallToolResult, McpError> {
        let max_depth = params.max_depth.unwrap_or(DEFAULT_TREE_DEPTH);
        let output = self
            .repo_structure(&params.repo_url, max_depth)
            .await
            .map_err(tool_to_mcp_error)?;
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "get_repo_readme",
        description = "Get the README content of a GitHub repository as plain text."
    )]
    async fn get_repo_readme(
        &self,
        Parameters(params): Parameters<RepoUrlParams>,
    ) -> Result<CallToolResult, McpError> {
        let output = self
            .repo_readme(&params.repo_url)
            .await
            .map_err(tool_to_mcp_error)?;
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "analyze_repo_dependencies",
        description = "Analyze repository dependencies from package files at the repository root (package.json, requirements.txt, Pipfile, pyproject.toml, Gemfile, composer.json, pom.xml, build.gradle, Cargo.toml, go.mod). Returns JSON keyed by filename; missing files are omitted."
    )]
    async fn analyze_repo_dependencies(
        &self,
        Parameters(params): Parameters<RepoUrlParams>,
    ) -> Result<CallToolResult, McpError> {
        let output = self
            .repo_dependencies(&params.repo_url)
            .await
            .map_err(tool_to_mcp_error)?;
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }
}

#[tool_handler]
impl ServerHandler for RepoTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "repo-probe".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "repo-probe inspects public or token-accessible GitHub repositories by URL: metadata and summary (get_repo_info), bounded file tree (get_repo_structure), README text (get_repo_readme), and dependency manifests (analyze_repo_dependencies)."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
