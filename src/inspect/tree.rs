use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use serde::Serialize;
use tracing::{debug, warn};

use crate::github::types::{ContentEntry, EntryType, RepositoryLocator};
use crate::github::{RepoError, RepoSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Dir,
}

/// One entry of the bounded structure snapshot.
///
/// `children` is absent for files and for directories left unexpanded by the depth
/// bound. A directory whose listing failed carries `children: []` plus `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ContentEntry> for TreeNode {
    fn from(entry: ContentEntry) -> Self {
        let kind = match entry.entry_type {
            EntryType::Dir => NodeKind::Dir,
            _ => NodeKind::File,
        };
        Self {
            name: entry.name,
            kind,
            path: entry.path,
            size: entry.size.filter(|_| entry.entry_type == EntryType::File),
            children: None,
            error: None,
        }
    }
}

/// List the repository down to `max_depth` levels.
///
/// `max_depth == 0` returns an empty listing without touching the network. A failure
/// listing the root is returned as an error; failures below the root only mark the
/// affected directory node.
pub async fn build_tree<S: RepoSource>(
    source: &S,
    repo: &RepositoryLocator,
    max_depth: usize,
) -> Result<Vec<TreeNode>, RepoError> {
    if max_depth == 0 {
        return Ok(Vec::new());
    }
    let entries = source.list_dir(repo, "").await?;
    let nodes = expand_level(source, repo, entries, 0, max_depth).await;
    debug!(%repo, max_depth, top_level = nodes.len(), "structure built");
    Ok(nodes)
}

// Boxed to break the async recursion cycle. Siblings expand concurrently; join_all
// keeps them in listing order.
fn expand_level<'a, S: RepoSource>(
    source: &'a S,
    repo: &'a RepositoryLocator,
    entries: Vec<ContentEntry>,
    depth: usize,
    max_depth: usize,
) -> BoxFuture<'a, Vec<TreeNode>> {
    async move {
        join_all(
            entries
                .into_iter()
                .map(|entry| expand_node(source, repo, entry, depth, max_depth)),
        )
        .await
    }
    .boxed()
}

async fn expand_node<S: RepoSource>(
    source: &S,
    repo: &RepositoryLocator,
    entry: ContentEntry,
    depth: usize,
    max_depth: usize,
) -> TreeNode {
    let mut node = TreeNode::from(entry);
    if node.kind != NodeKind::Dir || depth + 1 >= max_depth {
        return node;
    }

    match source.list_dir(repo, &node.path).await {
        Ok(entries) => {
            node.children = Some(expand_level(source, repo, entries, depth + 1, max_depth).await);
        }
        Err(e) => {
            warn!(%repo, path = %node.path, error = %e, "could not access directory");
            node.children = Some(Vec::new());
            node.error = Some(e.to_string());
        }
    }
    node
}
