use super::helpers::{contents_path, decode_declared};
use super::types::{ContentEntry, ContentsResponse, RepoResponse, RepositoryLocator};
use super::{RepoError, RepoSource, Transport};

/// Unauthenticated access path: one plain GET per logical operation.
///
/// Content not returned inline (files over the contents API size limit) is a
/// decode failure here; there is no follow-up blob request.
#[derive(Clone)]
pub struct PublicSource {
    transport: Transport,
}

impl PublicSource {
    pub(super) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    #[cfg(test)]
    pub(super) fn transport(&self) -> &Transport {
        &self.transport
    }

    async fn get_text(&self, path: &str) -> Result<String, RepoError> {
        let contents: ContentsResponse = self.transport.get_json(path).await?;
        decode_declared(contents.content.as_deref(), contents.encoding.as_deref())?
            .ok_or_else(|| RepoError::DecodeFailed(format!("content not inline (sha {})", contents.sha)))
    }
}

impl RepoSource for PublicSource {
    async fn repository(&self, repo: &RepositoryLocator) -> Result<RepoResponse, RepoError> {
        self.transport
            .get_json(&format!("/repos/{}/{}", repo.owner, repo.name))
            .await
    }

    async fn readme(&self, repo: &RepositoryLocator) -> Result<String, RepoError> {
        self.get_text(&format!("/repos/{}/{}/readme", repo.owner, repo.name))
            .await
    }

    async fn list_dir(
        &self,
        repo: &RepositoryLocator,
        path: &str,
    ) -> Result<Vec<ContentEntry>, RepoError> {
        self.transport.get_json(&contents_path(repo, path)).await
    }

    async fn file_text(&self, repo: &RepositoryLocator, path: &str) -> Result<String, RepoError> {
        self.get_text(&contents_path(repo, path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::public_source;
    use super::*;
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo() -> RepositoryLocator {
        RepositoryLocator {
            owner: "owner".into(),
            name: "repo".into(),
        }
    }

    #[tokio::test]
    async fn readme_decodes_base64_content() {
        let server = MockServer::start().await;
        let encoded = STANDARD.encode("hello readme");
        // GitHub wraps base64 at 60 columns.
        let wrapped = format!("{}\n{}", &encoded[..8], &encoded[8..]);
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/readme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sha": "abc",
                "content": wrapped,
                "encoding": "base64"
            })))
            .mount(&server)
            .await;

        let source = public_source(&server.uri());
        assert_eq!(source.readme(&repo()).await.unwrap(), "hello readme");
    }

    #[tokio::test]
    async fn readme_too_large_for_inline_content_fails_to_decode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/readme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sha": "deadbeef",
                "content": "",
                "encoding": "none"
            })))
            .mount(&server)
            .await;

        let source = public_source(&server.uri());
        let err = source.readme(&repo()).await.unwrap_err();
        assert!(
            matches!(err, RepoError::DecodeFailed(ref reason) if reason.contains("not inline")),
            "got: {err}"
        );
    }

    #[tokio::test]
    async fn file_with_unsupported_encoding_fails_to_decode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/contents/go.mod"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sha": "abc",
                "content": "bW9kdWxl",
                "encoding": "rot13"
            })))
            .mount(&server)
            .await;

        let source = public_source(&server.uri());
        let err = source.file_text(&repo(), "go.mod").await.unwrap_err();
        assert!(matches!(err, RepoError::DecodeFailed(_)), "got: {err}");
    }

    #[tokio::test]
    async fn missing_readme_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/readme"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = public_source(&server.uri());
        let err = source.readme(&repo()).await.unwrap_err();
        assert!(err.is_not_found(), "got: {err}");
    }

    #[tokio::test]
    async fn list_dir_preserves_api_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/contents/src"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "z.rs", "path": "src/z.rs", "type": "file", "size": 3},
                {"name": "a", "path": "src/a", "type": "dir", "size": 0},
                {"name": "link", "path": "src/link", "type": "symlink", "size": 7}
            ])))
            .mount(&server)
            .await;

        let source = public_source(&server.uri());
        let entries = source.list_dir(&repo(), "src").await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["z.rs", "a", "link"]);
    }
}
