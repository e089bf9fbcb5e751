mod authenticated;
mod helpers;
mod public;
pub mod types;

pub use authenticated::AuthenticatedSource;
pub use helpers::parse_locator;
pub use public::PublicSource;

use std::sync::Arc;

use reqwest::Client;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::config::{CONNECT_TIMEOUT, Config, MAX_REDIRECTS, Token};
use types::{ContentEntry, RepoResponse, RepositoryLocator};

/// Errors returned by repository access.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Invalid repository URL: {0}")]
    InvalidLocator(String),

    #[error("GitHub API request failed ({status}): {message}")]
    RemoteFetchFailed { status: u16, message: String },

    #[error("GitHub API rate limit exceeded. Set GITHUB_TOKEN for higher limits.")]
    RateLimited,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Content decode error: {0}")]
    DecodeFailed(String),
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoError::RemoteFetchFailed { status: 404, .. })
    }
}

/// Read access to one hosted repository.
///
/// Implemented by [`AuthenticatedSource`] and [`PublicSource`]; both must
/// yield identical logical data for the same upstream repository. Futures are
/// `Send` so the recursive tree walk can be boxed and served from a multi-threaded
/// runtime.
pub trait RepoSource: Sync {
    fn repository(
        &self,
        repo: &RepositoryLocator,
    ) -> impl Future<Output = Result<RepoResponse, RepoError>> + Send;

    /// Decoded text of the repository's primary README.
    fn readme(
        &self,
        repo: &RepositoryLocator,
    ) -> impl Future<Output = Result<String, RepoError>> + Send;

    /// Directory entries at `path` (empty for the root), in the order the API returns them.
    fn list_dir(
        &self,
        repo: &RepositoryLocator,
        path: &str,
    ) -> impl Future<Output = Result<Vec<ContentEntry>, RepoError>> + Send;

    /// Decoded text of the file at `path`.
    fn file_text(
        &self,
        repo: &RepositoryLocator,
        path: &str,
    ) -> impl Future<Output = Result<String, RepoError>> + Send;
}

/// The access path chosen once per construction: authenticated when a token is configured.
#[derive(Clone)]
pub enum Source {
    Authenticated(AuthenticatedSource),
    Public(PublicSource),
}

impl Source {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: Client, config: &Config) -> Self {
        let limiter = Arc::new(Semaphore::new(config.max_in_flight.max(1)));
        match &config.token {
            Some(token) => {
                debug!(api = %config.api_base, "using authenticated access path");
                Source::Authenticated(AuthenticatedSource::new(Transport::new(
                    http,
                    &config.api_base,
                    Some(token.clone()),
                    limiter,
                )))
            }
            None => {
                debug!(api = %config.api_base, "using public access path");
                Source::Public(PublicSource::new(Transport::new(
                    http,
                    &config.api_base,
                    None,
                    limiter,
                )))
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Source::Authenticated(_))
    }
}

impl RepoSource for Source {
    async fn repository(&self, repo: &RepositoryLocator) -> Result<RepoResponse, RepoError> {
        match self {
            Source::Authenticated(s) => s.repository(repo).await,
            Source::Public(s) => s.repository(repo).await,
        }
    }

    async fn readme(&self, repo: &RepositoryLocator) -> Result<String, RepoError> {
        match self {
            Source::Authenticated(s) => s.readme(repo).await,
            Source::Public(s) => s.readme(repo).await,
        }
    }

    async fn list_dir(
        &self,
        repo: &RepositoryLocator,
        path: &str,
    ) -> Result<Vec<ContentEntry>, RepoError> {
        match self {
            Source::Authenticated(s) => s.list_dir(repo, path).await,
            Source::Public(s) => s.list_dir(repo, path).await,
        }
    }

    async fn file_text(&self, repo: &RepositoryLocator, path: &str) -> Result<String, RepoError> {
        match self {
            Source::Authenticated(s) => s.file_text(repo, path).await,
            Source::Public(s) => s.file_text(repo, path).await,
        }
    }
}

/// Shared HTTP plumbing for both access paths.
///
/// Every request holds a permit from `limiter` until its body is read, which caps
/// in-flight calls across the whole (possibly concurrent) tree walk.
/// Owner/repo parameters are safe for direct URL interpolation because `parse_locator`
/// restricts them to `[a-zA-Z0-9._-]`.
#[derive(Clone)]
pub(crate) struct Transport {
    http: Client,
    base_url: String,
    token: Option<Token>,
    limiter: Arc<Semaphore>,
}

impl Transport {
    fn new(http: Client, base_url: &str, token: Option<Token>, limiter: Arc<Semaphore>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            limiter,
        }
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let mut req = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", crate::USER_AGENT)
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(ref token) = self.token {
            req = req.header("Authorization", format!("Bearer {}", token.expose()));
        }
        req
    }

    /// GET `path` and deserialize a 2xx body.
    ///
    /// Non-2xx statuses become `RemoteFetchFailed`. With a token configured, 429 and
    /// 403-with-exhausted-quota are reported as `RateLimited` instead. A 2xx body that
    /// does not match `T` is `DecodeFailed`, not a transport error.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, RepoError> {
        // The semaphore is never closed, so acquire only fails if that invariant breaks.
        let _permit = self.limiter.acquire().await.ok();
        let response = self.request(path).send().await?;
        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            return serde_json::from_slice(&body).map_err(|e| {
                debug!(path, error = %e, "unexpected response shape");
                RepoError::DecodeFailed(format!("unexpected response for {path}: {e}"))
            });
        }

        let code = status.as_u16();
        if self.token.is_some() {
            let remaining = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            if code == 429 || (code == 403 && remaining == Some(0)) {
                return Err(RepoError::RateLimited);
            }
        }

        let message = extract_error_message(
            &response
                .text()
                .await
                .unwrap_or_else(|_| format!("HTTP {status}")),
        );
        debug!(path, status = code, %message, "GitHub API request failed");
        Err(RepoError::RemoteFetchFailed {
            status: code,
            message,
        })
    }
}

fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.chars().take(200).collect())
}
