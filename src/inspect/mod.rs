//! Repository introspection: metadata, README, bounded structure, and dependency manifests.

#[cfg(test)]
pub(crate) mod fake;
pub mod manifest;
pub mod tree;

pub use manifest::collect_dependencies;
pub use tree::{TreeNode, build_tree};

use serde::Serialize;
use tracing::debug;

use crate::github::types::{RepoResponse, RepositoryLocator};
use crate::github::{RepoError, RepoSource};

pub const DEFAULT_TREE_DEPTH: usize = 3;
pub(crate) const PREVIEW_CHARS: usize = 500;
const SUMMARY_TREE_ENTRIES: usize = 10;

/// Descriptive fields of a repository. Identical regardless of access path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryMetadata {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub created_at: String,
    pub updated_at: String,
    pub size: u64,
    pub default_branch: String,
    pub topics: Vec<String>,
    pub license: Option<String>,
    pub homepage: Option<String>,
    pub clone_url: String,
    pub ssh_url: String,
}

impl From<RepoResponse> for RepositoryMetadata {
    fn from(repo: RepoResponse) -> Self {
        Self {
            name: repo.name,
            full_name: repo.full_name,
            description: repo.description,
            language: repo.language,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            open_issues: repo.open_issues_count,
            created_at: repo.created_at,
            updated_at: repo.updated_at,
            size: repo.size,
            default_branch: repo.default_branch,
            topics: repo.topics.unwrap_or_default(),
            license: repo.license.map(|l| l.name),
            homepage: repo.homepage.filter(|h| !h.trim().is_empty()),
            clone_url: repo.clone_url,
            ssh_url: repo.ssh_url,
        }
    }
}

/// Size-bounded, one-shot summary combining metadata, README, and top-level structure.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryInfoSummary {
    pub repository_url: String,
    pub locator: RepositoryLocator,
    pub metadata: RepositoryMetadata,
    pub readme_preview: String,
    pub structure_summary: Vec<TreeNode>,
}

pub async fn fetch_metadata<S: RepoSource>(
    source: &S,
    repo: &RepositoryLocator,
) -> Result<RepositoryMetadata, RepoError> {
    Ok(source.repository(repo).await?.into())
}

pub async fn fetch_document<S: RepoSource>(
    source: &S,
    repo: &RepositoryLocator,
) -> Result<String, RepoError> {
    source.readme(repo).await
}

/// Fetch metadata, README, and structure concurrently; the first failure aborts.
pub async fn repo_info<S: RepoSource>(
    source: &S,
    repository_url: &str,
    repo: &RepositoryLocator,
) -> Result<RepositoryInfoSummary, RepoError> {
    let (metadata, readme, mut structure) = tokio::try_join!(
        fetch_metadata(source, repo),
        fetch_document(source, repo),
        build_tree(source, repo, DEFAULT_TREE_DEPTH),
    )?;

    structure.truncate(SUMMARY_TREE_ENTRIES);
    debug!(%repo, readme_chars = readme.chars().count(), "repository info assembled");

    Ok(RepositoryInfoSummary {
        repository_url: repository_url.to_string(),
        locator: repo.clone(),
        metadata,
        readme_preview: truncate_chars(&readme, PREVIEW_CHARS),
        structure_summary: structure,
    })
}

/// First `limit` characters of `text`, with `...` appended when anything was cut.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
