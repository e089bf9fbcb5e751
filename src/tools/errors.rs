use rmcp::ErrorData as McpError;
use tracing::warn;

use crate::github::RepoError;

/// Failure of one repository operation, before it is rendered for a front end.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("could not serialize result: {0}")]
    Render(#[from] serde_json::Error),
}

pub(super) fn retriable_error(e: &impl std::fmt::Display) -> String {
    format!("{e} (retriable)")
}

/// User-facing message for a failed repository call.
pub(super) fn repo_error_message(e: &RepoError) -> String {
    match e {
        RepoError::RateLimited
        | RepoError::Network(_)
        | RepoError::RemoteFetchFailed {
            status: 500..=599, ..
        } => retriable_error(e),
        RepoError::RemoteFetchFailed {
            status: 401 | 403, ..
        } => format!("{e}; check that your GITHUB_TOKEN is valid and has the required scopes"),
        _ => e.to_string(),
    }
}

pub(super) fn tool_error_message(e: &ToolError) -> String {
    match e {
        ToolError::Repo(e) => repo_error_message(e),
        ToolError::Render(_) => e.to_string(),
    }
}

pub(super) fn tool_to_mcp_error(e: ToolError) -> McpError {
    let message = tool_error_message(&e);
    match e {
        ToolError::Repo(RepoError::InvalidLocator(_)) => McpError::invalid_params(message, None),
        ToolError::Repo(ref repo) if repo.is_not_found() => McpError::invalid_params(message, None),
        _ => McpError::internal_error(message, None),
    }
}

pub(super) fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ToolError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        warn!(%e, "failed to serialize result");
        ToolError::Render(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_is_retriable() {
        let msg = repo_error_message(&RepoError::RateLimited);
        assert!(msg.contains("retriable"));
    }

    #[test]
    fn server_error_is_retriable() {
        let msg = repo_error_message(&RepoError::RemoteFetchFailed {
            status: 502,
            message: "bad gateway".into(),
        });
        assert!(msg.contains("retriable"), "got: {msg}");
    }

    #[test]
    fn decode_failure_is_not_retriable() {
        let msg = repo_error_message(&RepoError::DecodeFailed(
            "unexpected response for /repos/o/r: invalid type".into(),
        ));
        assert!(!msg.contains("retriable"), "got: {msg}");
        assert!(msg.starts_with("Content decode error"));
    }

    #[test]
    fn forbidden_hints_token() {
        let msg = repo_error_message(&RepoError::RemoteFetchFailed {
            status: 403,
            message: "denied".into(),
        });
        assert!(msg.contains("GITHUB_TOKEN"));
    }

    #[test]
    fn not_found_is_not_retriable() {
        let msg = repo_error_message(&RepoError::RemoteFetchFailed {
            status: 404,
            message: "Not Found".into(),
        });
        assert!(!msg.contains("retriable"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn invalid_locator_passes_through() {
        let msg = tool_error_message(&RepoError::InvalidLocator("bad".into()).into());
        assert_eq!(msg, "Invalid repository URL: bad");
    }

    #[test]
    fn mcp_error_kind_follows_cause() {
        let invalid = tool_to_mcp_error(RepoError::InvalidLocator("bad".into()).into());
        assert_eq!(invalid.code, rmcp::model::ErrorCode::INVALID_PARAMS);

        let missing = tool_to_mcp_error(
            RepoError::RemoteFetchFailed {
                status: 404,
                message: "Not Found".into(),
            }
            .into(),
        );
        assert_eq!(missing.code, rmcp::model::ErrorCode::INVALID_PARAMS);

        let limited = tool_to_mcp_error(RepoError::RateLimited.into());
        assert_eq!(limited.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
        assert!(limited.message.contains("retriable"));
    }
}
