//! Package-origin collection across a POM's inheritance chain
//!
//! Origins are gathered nearest-scope-first: credential-supplied origins,
//! then the manifest's own declarations, then each ancestor's, with the
//! well-known central repository appended as the last resort. Deduplication
//! by id keeps the first occurrence, so nearer declarations override
//! inherited ones that reuse an id.

use crate::credentials::registry_origins;
use crate::maven::pom::parse_pom;
use crate::maven::properties::resolve_in_local_chain;
use crate::maven::{Context, MAX_PARENT_DEPTH};
use crate::types::{DependencyFile, Origin};
use std::collections::HashSet;

/// URL of the implicit default origin every chain ends in
pub const CENTRAL_REPOSITORY_URL: &str = "https://repo.maven.apache.org/maven2";

/// Stable id of the implicit default origin
pub const CENTRAL_REPOSITORY_ID: &str = "central";

/// The implicit default origin as an [`Origin`] value
pub fn central_origin() -> Origin {
    Origin::with_id(CENTRAL_REPOSITORY_URL, CENTRAL_REPOSITORY_ID)
}

/// Drop empty URLs, id duplicates and URL duplicates, keeping first
/// occurrences. Order is otherwise preserved.
pub(crate) fn dedupe_origins(origins: Vec<Origin>) -> Vec<Origin> {
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut deduped = Vec::with_capacity(origins.len());

    for origin in origins {
        if origin.url.trim().is_empty() {
            continue;
        }
        if let Some(id) = &origin.id {
            if !seen_ids.insert(id.clone()) {
                continue;
            }
        }
        if !seen_urls.insert(origin.url.clone()) {
            continue;
        }
        deduped.push(origin);
    }

    deduped
}

impl Context<'_> {
    /// Collect the package origins visible from `file`, nearest scope first.
    ///
    /// This never fails: fetch or parse trouble while walking the ancestor
    /// chain stops the walk, and the result degrades to whatever was found
    /// plus the implicit default origin. With `exclude_inherited` the walk
    /// stops at the manifest's own declarations (parent lookup itself uses
    /// this to avoid depending on a full collection of the chain it is in
    /// the middle of resolving).
    pub async fn collect_origins(
        &mut self,
        file: &DependencyFile,
        exclude_inherited: bool,
    ) -> Vec<Origin> {
        let mut ordered = registry_origins(self.credentials);

        let mut current = file.clone();
        for _ in 0..MAX_PARENT_DEPTH {
            let own = self.own_declared_origins(&current);
            ordered.extend(own.iter().cloned());

            if exclude_inherited {
                break;
            }
            match self.find_parent(&current, &own).await {
                Some(parent) => current = parent,
                None => break,
            }
        }

        ordered.push(central_origin());
        dedupe_origins(ordered)
    }

    /// Origins declared directly inside `file`, resolved and normalized.
    ///
    /// Declarations are dropped rather than failing: non-absolute URLs are
    /// not valid package sources, and a placeholder that cannot be resolved
    /// from the local chain leaves the URL malformed.
    pub(crate) fn own_declared_origins(&self, file: &DependencyFile) -> Vec<Origin> {
        let pom = match parse_pom(file) {
            Ok(pom) => pom,
            Err(_) => return Vec::new(),
        };

        pom.repositories
            .iter()
            .filter_map(|decl| {
                if !decl.url.starts_with("http://") && !decl.url.starts_with("https://") {
                    return None;
                }
                let resolved = resolve_in_local_chain(self.files, &decl.url, file)?;
                url::Url::parse(&resolved).ok()?;
                let normalized = resolved.strip_suffix('/').unwrap_or(&resolved);
                Some(Origin {
                    url: normalized.to_string(),
                    id: decl.id.clone(),
                })
            })
            .collect()
    }
}
