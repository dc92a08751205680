//! Core types for the update engine

use serde::{Deserialize, Serialize};

/// A dependency file as supplied by the caller.
///
/// Instances are immutable values: an update never mutates a file in place,
/// it produces a new instance carrying the new content. Identity is the
/// `(name, directory)` pair, not the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyFile {
    /// Path of the file within the project, including any relative directory
    pub name: String,
    /// Raw text content
    pub content: String,
    /// Directory the project lives in, relative to the repository root
    pub directory: Option<String>,
}

impl DependencyFile {
    /// Create a file with no project directory
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            directory: None,
        }
    }

    /// The identity of this file within a working set
    pub fn id(&self) -> (&str, Option<&str>) {
        (&self.name, self.directory.as_deref())
    }

    /// Final path component of `name`
    pub fn base_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// A copy of this file carrying `content` instead of the current content
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            content: content.into(),
            directory: self.directory.clone(),
        }
    }
}

/// A network location packages and manifests may be fetched from.
///
/// `id` is an optional stable name used for deduplication: once an id has
/// been seen, any later origin sharing it is discarded even if its URL
/// differs. Nearer-scope declarations therefore beat inherited ones as long
/// as they are ordered first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    /// Absolute base URL of the origin
    pub url: String,
    /// Stable name for deduplication, when declared
    pub id: Option<String>,
}

impl Origin {
    /// Create an origin with no id
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            id: None,
        }
    }

    /// Create an origin with a stable id
    pub fn with_id(url: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            id: Some(id.into()),
        }
    }
}

/// One place a dependency is declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Name of the declaring file (must be present in the working file set)
    pub file: String,
    /// The requirement string as written in the file, e.g. `==2.31.0` or `4.13.2`
    pub requirement: String,
    /// Declaration groups, e.g. `default`/`develop` or dependency scopes
    pub groups: Vec<String>,
    /// Origin the requirement resolves against, when declared
    pub source: Option<Origin>,
}

/// A logical package reference across the working file set.
///
/// Maven dependencies are named `group:artifact`; Python dependencies use
/// their distribution name. `requirements` describes every declaration after
/// the update, `previous_requirements` mirrors it before the update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Resolved version before the update, when known
    pub current_version: Option<String>,
    /// Resolved version after the update, when known
    pub desired_version: Option<String>,
    /// Declarations after the update
    pub requirements: Vec<Requirement>,
    /// Declarations before the update
    pub previous_requirements: Vec<Requirement>,
}

impl Dependency {
    /// Pairs of (previous, updated) requirements, matched by declaring file
    /// and groups. Entries with no counterpart on the other side are skipped.
    pub fn changed_requirement_pairs(&self) -> Vec<(&Requirement, &Requirement)> {
        self.requirements
            .iter()
            .filter_map(|req| {
                let previous = self
                    .previous_requirements
                    .iter()
                    .find(|prev| prev.file == req.file && prev.groups == req.groups)?;
                Some((previous, req))
            })
            .collect()
    }

    /// Maven group and artifact parts of `name`, when it has the `group:artifact` shape
    pub fn maven_coordinates(&self) -> Option<(&str, &str)> {
        self.name.split_once(':')
    }
}
