use tracing::debug;

use super::helpers::{contents_path, decode_declared};
use super::types::{BlobResponse, ContentEntry, ContentsResponse, RepoResponse, RepositoryLocator};
use super::{RepoError, RepoSource, Transport};

/// Token-authenticated access path.
///
/// Honors the declared `encoding` of returned content and fetches files above the
/// inline size limit through the git blob endpoint.
#[derive(Clone)]
pub struct AuthenticatedSource {
    transport: Transport,
}

impl AuthenticatedSource {
    pub(super) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    #[cfg(test)]
    pub(super) fn transport(&self) -> &Transport {
        &self.transport
    }

    async fn decode(
        &self,
        repo: &RepositoryLocator,
        contents: ContentsResponse,
    ) -> Result<String, RepoError> {
        if let Some(text) = decode_declared(contents.content.as_deref(), contents.encoding.as_deref())? {
            return Ok(text);
        }

        debug!(%repo, sha = %contents.sha, "content not inline, fetching blob");
        let blob: BlobResponse = self
            .transport
            .get_json(&format!(
                "/repos/{}/{}/git/blobs/{}",
                repo.owner, repo.name, contents.sha
            ))
            .await?;
        decode_declared(Some(blob.content.as_str()), Some(blob.encoding.as_str()))?
            .ok_or_else(|| RepoError::DecodeFailed("blob has no content".into()))
    }
}

impl RepoSource for AuthenticatedSource {
    async fn repository(&self, repo: &RepositoryLocator) -> Result<RepoResponse, RepoError> {
        self.transport
            .get_json(&format!("/repos/{}/{}", repo.owner, repo.name))
            .await
    }

    async fn readme(&self, repo: &RepositoryLocator) -> Result<String, RepoError> {
        let contents: ContentsResponse = self
            .transport
            .get_json(&format!("/repos/{}/{}/readme", repo.owner, repo.name))
            .await?;
        self.decode(repo, contents).await
    }

    async fn list_dir(
        &self,
        repo: &RepositoryLocator,
        path: &str,
    ) -> Result<Vec<ContentEntry>, RepoError> {
        self.transport.get_json(&contents_path(repo, path)).await
    }

    async fn file_text(&self, repo: &RepositoryLocator, path: &str) -> Result<String, RepoError> {
        let contents: ContentsResponse = self.transport.get_json(&contents_path(repo, path)).await?;
        self.decode(repo, contents).await
    }
}
