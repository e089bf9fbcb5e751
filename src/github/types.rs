use serde::{Deserialize, Serialize};

/// The `(owner, name)` pair identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryLocator {
    pub owner: String,
    pub name: String,
}

impl std::fmt::Display for RepositoryLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Repository record from `GET /repos/{owner}/{repo}`.
#[derive(Deserialize, Debug, Clone)]
pub struct RepoResponse {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub created_at: String,
    pub updated_at: String,
    pub size: u64,
    pub default_branch: String,
    pub topics: Option<Vec<String>>,
    pub license: Option<LicenseInfo>,
    pub homepage: Option<String>,
    pub clone_url: String,
    pub ssh_url: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LicenseInfo {
    pub name: String,
}

/// Contents API object type. `Other` captures unknown types via `#[serde(other)]` for forward compat.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// One element of a directory listing from `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Deserialize, Debug, Clone)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub size: Option<u64>,
}

/// Single-file response from the contents and readme endpoints.
///
/// `content` is omitted (and `encoding` is `"none"`) for files above the
/// inline size limit.
#[derive(Deserialize, Debug)]
pub struct ContentsResponse {
    pub sha: String,
    pub content: Option<String>,
    pub encoding: Option<String>,
}

/// Response from `GET /repos/{owner}/{repo}/git/blobs/{sha}`.
#[derive(Deserialize, Debug)]
pub struct BlobResponse {
    pub content: String,
    pub encoding: String,
}
