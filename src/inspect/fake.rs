use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{Value, json};

use crate::github::types::{ContentEntry, EntryType, RepoResponse, RepositoryLocator};
use crate::github::{RepoError, RepoSource};

/// In-memory `RepoSource`. Unknown paths answer 404; failing paths answer 500.
///
/// `list_dir` on a delayed path sleeps before answering, so siblings can be made to
/// finish out of listing order; `finished()` records the order listings completed in.
#[derive(Default)]
pub struct FakeSource {
    repo: Option<Value>,
    readme: Option<String>,
    dirs: HashMap<String, Vec<ContentEntry>>,
    files: HashMap<String, String>,
    failing: HashSet<String>,
    undecodable: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
    finished: Mutex<Vec<String>>,
}

pub fn file(path: &str, size: u64) -> ContentEntry {
    entry(path, EntryType::File, Some(size))
}

pub fn dir(path: &str) -> ContentEntry {
    entry(path, EntryType::Dir, Some(0))
}

fn entry(path: &str, entry_type: EntryType, size: Option<u64>) -> ContentEntry {
    ContentEntry {
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        entry_type,
        size,
    }
}

pub fn repo_response() -> Value {
    json!({
        "name": "repo",
        "full_name": "owner/repo",
        "description": "A test repository",
        "language": "Rust",
        "stargazers_count": 42,
        "forks_count": 7,
        "open_issues_count": 3,
        "created_at": "2020-01-01T00:00:00Z",
        "updated_at": "2024-06-01T12:00:00Z",
        "size": 1024,
        "default_branch": "main",
        "topics": ["cli", "github"],
        "license": {"key": "mit", "name": "MIT License", "spdx_id": "MIT"},
        "homepage": "https://example.com",
        "clone_url": "https://github.com/owner/repo.git",
        "ssh_url": "git@github.com:owner/repo.git"
    })
}

fn not_found(path: &str) -> RepoError {
    RepoError::RemoteFetchFailed {
        status: 404,
        message: format!("Not Found: {path}"),
    }
}

fn server_error() -> RepoError {
    RepoError::RemoteFetchFailed {
        status: 500,
        message: "simulated failure".into(),
    }
}

impl FakeSource {
    pub fn with_repo(mut self, repo: Value) -> Self {
        self.repo = Some(repo);
        self
    }

    pub fn with_readme(mut self, text: &str) -> Self {
        self.readme = Some(text.to_string());
        self
    }

    pub fn with_dir(mut self, path: &str, entries: Vec<ContentEntry>) -> Self {
        self.dirs.insert(path.to_string(), entries);
        self
    }

    pub fn with_failing_dir(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    pub fn with_file(mut self, path: &str, text: &str) -> Self {
        self.files.insert(path.to_string(), text.to_string());
        self
    }

    pub fn with_failing_file(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    pub fn with_undecodable_file(mut self, path: &str) -> Self {
        self.undecodable.insert(path.to_string());
        self
    }

    pub fn with_delay(mut self, path: &str, millis: u64) -> Self {
        self.delays
            .insert(path.to_string(), Duration::from_millis(millis));
        self
    }

    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl RepoSource for FakeSource {
    async fn repository(&self, repo: &RepositoryLocator) -> Result<RepoResponse, RepoError> {
        self.record("repository".into());
        let raw = self.repo.clone().ok_or_else(|| not_found(&repo.to_string()))?;
        Ok(serde_json::from_value(raw).unwrap())
    }

    async fn readme(&self, _repo: &RepositoryLocator) -> Result<String, RepoError> {
        self.record("readme".into());
        self.readme.clone().ok_or_else(|| not_found("readme"))
    }

    async fn list_dir(
        &self,
        _repo: &RepositoryLocator,
        path: &str,
    ) -> Result<Vec<ContentEntry>, RepoError> {
        self.record(format!("list:{path}"));
        match self.delays.get(path) {
            Some(&delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }
        self.finished.lock().unwrap().push(path.to_string());
        if self.failing.contains(path) {
            return Err(server_error());
        }
        self.dirs.get(path).cloned().ok_or_else(|| not_found(path))
    }

    async fn file_text(&self, _repo: &RepositoryLocator, path: &str) -> Result<String, RepoError> {
        self.record(format!("file:{path}"));
        if self.failing.contains(path) {
            return Err(server_error());
        }
        if self.undecodable.contains(path) {
            return Err(RepoError::DecodeFailed("invalid base64".into()));
        }
        self.files.get(path).cloned().ok_or_else(|| not_found(path))
    }
}
