use std::collections::BTreeMap;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{PREVIEW_CHARS, truncate_chars};
use crate::github::types::RepositoryLocator;
use crate::github::{RepoError, RepoSource};

/// Manifest filename → summary. Filenames not present in the repository are omitted.
pub type DependencyReport = BTreeMap<String, ManifestSummary>;

type ParseError = Box<dyn std::error::Error + Send + Sync>;
type Parser = fn(&str) -> Result<ManifestSummary, ParseError>;

/// Format-specific summary of one manifest file. Serializes without a tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ManifestSummary {
    Npm {
        dependencies: Map<String, Value>,
        #[serde(rename = "devDependencies")]
        dev_dependencies: Map<String, Value>,
        scripts: Map<String, Value>,
    },
    Requirements {
        requirements: Vec<String>,
    },
    Excerpt {
        content: String,
    },
    Unparseable {
        error: String,
    },
}

impl ManifestSummary {
    fn unparseable(file_name: &str) -> Self {
        ManifestSummary::Unparseable {
            error: format!("could not parse {file_name}"),
        }
    }
}

/// A well-known dependency manifest and the parser that summarizes it.
pub struct Manifest {
    pub file_name: &'static str,
    parser: Parser,
}

impl Manifest {
    pub fn summarize(&self, text: &str) -> ManifestSummary {
        (self.parser)(text).unwrap_or_else(|e| {
            warn!(file = self.file_name, error = %e, "could not parse manifest");
            ManifestSummary::unparseable(self.file_name)
        })
    }
}

/// Files probed at the repository root, in probe order.
pub const CATALOG: &[Manifest] = &[
    Manifest {
        file_name: "package.json",
        parser: parse_package_json,
    },
    Manifest {
        file_name: "requirements.txt",
        parser: parse_requirements,
    },
    Manifest {
        file_name: "Pipfile",
        parser: excerpt,
    },
    Manifest {
        file_name: "pyproject.toml",
        parser: excerpt,
    },
    Manifest {
        file_name: "Gemfile",
        parser: excerpt,
    },
    Manifest {
        file_name: "composer.json",
        parser: excerpt,
    },
    Manifest {
        file_name: "pom.xml",
        parser: excerpt,
    },
    Manifest {
        file_name: "build.gradle",
        parser: excerpt,
    },
    Manifest {
        file_name: "Cargo.toml",
        parser: excerpt,
    },
    Manifest {
        file_name: "go.mod",
        parser: excerpt,
    },
];

// A section may be missing or explicitly `null`; both read as empty.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default)]
    dependencies: Option<Map<String, Value>>,
    #[serde(default)]
    dev_dependencies: Option<Map<String, Value>>,
    #[serde(default)]
    scripts: Option<Map<String, Value>>,
}

fn parse_package_json(text: &str) -> Result<ManifestSummary, ParseError> {
    let package: PackageJson = serde_json::from_str(text)?;
    Ok(ManifestSummary::Npm {
        dependencies: package.dependencies.unwrap_or_default(),
        dev_dependencies: package.dev_dependencies.unwrap_or_default(),
        scripts: package.scripts.unwrap_or_default(),
    })
}

fn parse_requirements(text: &str) -> Result<ManifestSummary, ParseError> {
    let requirements = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect();
    Ok(ManifestSummary::Requirements { requirements })
}

// No structural parsing for TOML/XML/Gradle and friends; a bounded excerpt is enough.
fn excerpt(text: &str) -> Result<ManifestSummary, ParseError> {
    Ok(ManifestSummary::Excerpt {
        content: truncate_chars(text, PREVIEW_CHARS),
    })
}

/// Probe every catalog entry and summarize the ones that exist.
///
/// Best-effort: missing files are skipped silently, other fetch failures are skipped
/// with a warning, and undecodable or unparseable files become an error record.
pub async fn collect_dependencies<S: RepoSource>(
    source: &S,
    repo: &RepositoryLocator,
) -> DependencyReport {
    let probes = CATALOG.iter().map(|manifest| async move {
        let summary = match source.file_text(repo, manifest.file_name).await {
            Ok(text) => manifest.summarize(&text),
            Err(e) if e.is_not_found() => {
                debug!(%repo, file = manifest.file_name, "manifest not present");
                return None;
            }
            Err(RepoError::DecodeFailed(reason)) => {
                warn!(%repo, file = manifest.file_name, %reason, "could not decode manifest");
                ManifestSummary::unparseable(manifest.file_name)
            }
            Err(e) => {
                warn!(%repo, file = manifest.file_name, error = %e, "skipping unreadable manifest");
                return None;
            }
        };
        Some((manifest.file_name.to_string(), summary))
    });

    let report: DependencyReport = join_all(probes).await.into_iter().flatten().collect();
    debug!(%repo, manifests = report.len(), "dependency scan complete");
    report
}
