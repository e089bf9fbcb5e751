use base64::{Engine as _, engine::general_purpose::STANDARD};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::Url;

use super::RepoError;
use super::types::RepositoryLocator;

/// Characters to percent-encode in URL path segments.
/// Preserves `/` for path structure but encodes query/fragment delimiters and special chars.
const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'?')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'@')
    .add(b'[')
    .add(b']')
    .add(b';')
    .add(b'=');

pub(super) fn encode_path(s: &str) -> String {
    utf8_percent_encode(s, PATH_ENCODE_SET).to_string()
}

/// API path for a directory listing or single file. An empty `path` is the repository root.
pub(super) fn contents_path(repo: &RepositoryLocator, path: &str) -> String {
    let base = format!("/repos/{}/{}/contents", repo.owner, repo.name);
    let path = path.trim_matches('/');
    if path.is_empty() {
        base
    } else {
        format!("{base}/{}", encode_path(path))
    }
}

fn is_valid_github_name(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && s != ".."
        && s != "."
}

/// Parse a repository URL into a [`RepositoryLocator`].
///
/// The host must equal `expected_host`. Extra path segments (`/tree/main/src`)
/// and a trailing slash are ignored; one `.git` suffix is stripped from the name.
pub fn parse_locator(url: &str, expected_host: &str) -> Result<RepositoryLocator, RepoError> {
    let invalid = |reason: &str| RepoError::InvalidLocator(format!("{reason}: '{url}'"));

    let parsed = Url::parse(url.trim()).map_err(|_| invalid("not a valid URL"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("URL must use http or https"));
    }
    let host = parsed.host_str().unwrap_or_default();
    if !host.eq_ignore_ascii_case(expected_host) {
        return Err(invalid(&format!("expected a {expected_host} URL")));
    }

    let mut segments = parsed
        .path_segments()
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let (Some(owner), Some(name)) = (segments.next(), segments.next()) else {
        return Err(invalid("expected https://host/owner/repo"));
    };
    let name = name.strip_suffix(".git").unwrap_or(name);

    if !is_valid_github_name(owner) || !is_valid_github_name(name) {
        return Err(invalid("owner and repository may only contain [A-Za-z0-9._-]"));
    }
    Ok(RepositoryLocator {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

/// Decode base64-encoded content from the GitHub Contents/Blob API.
pub fn decode_base64(encoded: &str) -> Result<String, RepoError> {
    let clean: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(&clean)
        .map_err(|e| RepoError::DecodeFailed(e.to_string()))?;
    String::from_utf8(bytes)
        .map_err(|_| RepoError::DecodeFailed("file appears to be binary (not valid UTF-8)".into()))
}

/// Decode `content` according to the API's declared `encoding`.
///
/// Returns `Ok(None)` when the content is not inline and must be fetched another way.
pub(super) fn decode_declared(
    content: Option<&str>,
    encoding: Option<&str>,
) -> Result<Option<String>, RepoError> {
    match (content, encoding.unwrap_or_default()) {
        (None, _) | (_, "none") => Ok(None),
        (Some(c), "base64") => decode_base64(c).map(Some),
        (Some(c), "" | "utf-8" | "utf8") => Ok(Some(c.to_string())),
        (Some(_), other) => Err(RepoError::DecodeFailed(format!(
            "unsupported content encoding '{other}'"
        ))),
    }
}
