//! Credential entries supplied by the caller

use crate::types::Origin;
use serde::{Deserialize, Serialize};

/// Credential kind that contributes package origins
pub const MAVEN_REPOSITORY_KIND: &str = "maven_repository";

/// One credential entry from the caller's configuration.
///
/// The engine only reads entries whose `kind` names a package origin; other
/// kinds (API tokens, git credentials) pass through untouched for the outer
/// layers to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Entry kind, e.g. `maven_repository`
    pub kind: String,
    /// Origin URL the credential applies to
    #[serde(default)]
    pub url: Option<String>,
    /// Username, when the origin requires one
    #[serde(default)]
    pub username: Option<String>,
    /// Password or token, when the origin requires one
    #[serde(default)]
    pub password: Option<String>,
}

impl Credential {
    /// The origin this credential contributes, if it is of an origin kind
    pub fn origin(&self) -> Option<Origin> {
        if self.kind != MAVEN_REPOSITORY_KIND {
            return None;
        }
        let url = self.url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        Some(Origin::new(url.strip_suffix('/').unwrap_or(url)))
    }
}

/// Origins contributed by a credential set, in declaration order
pub fn registry_origins(credentials: &[Credential]) -> Vec<Origin> {
    credentials.iter().filter_map(Credential::origin).collect()
}
