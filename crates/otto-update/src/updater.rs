//! Update orchestration
//!
//! The sole public entry point of the engine: validate the caller's file
//! set, select the one strategy that applies, dispatch, and hand back only
//! the files that actually changed. The orchestrator performs no filesystem
//! mutation of its own; any scratch space belongs to the strategy that
//! allocates it and is gone before `apply` returns.

use crate::credentials::Credential;
use crate::error::{Error, Result};
use crate::strategy::{select_strategy, StrategyKind};
use crate::types::{Dependency, DependencyFile};
use crate::{maven, pip};
use otto_fetch::{HttpClient, Transport};

/// The update orchestrator.
///
/// Holds the transport used for remote manifest resolution; everything else
/// is scoped to a single call. Two calls with identical inputs produce
/// byte-identical outputs.
pub struct FileUpdater<T: Transport = HttpClient> {
    transport: T,
}

impl FileUpdater {
    /// Create an updater backed by the default HTTP client
    pub fn new() -> Result<Self> {
        Ok(Self {
            transport: HttpClient::new()?,
        })
    }
}

impl<T: Transport> FileUpdater<T> {
    /// Create an updater with an injected transport
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Compute the files that must change so `dependency` moves to its new
    /// requirements.
    ///
    /// Files that need no change are omitted from the result, not returned
    /// with identical content.
    ///
    /// # Errors
    ///
    /// Fails on caller contract violations (empty file set, requirements
    /// referencing files outside the set) and on strategy-internal failures,
    /// which are propagated unchanged.
    pub async fn updated_dependency_files(
        &self,
        files: &[DependencyFile],
        dependency: &Dependency,
        credentials: &[Credential],
    ) -> Result<Vec<DependencyFile>> {
        if files.is_empty() {
            return Err(Error::UnsupportedFileSet("empty file set".to_string()));
        }
        for requirement in dependency
            .requirements
            .iter()
            .chain(&dependency.previous_requirements)
        {
            if !files.iter().any(|f| f.name == requirement.file) {
                return Err(Error::MissingRequirementFile {
                    dependency: dependency.name.clone(),
                    file: requirement.file.clone(),
                });
            }
        }

        let kind = select_strategy(files);
        let updated = self.apply(kind, files, dependency, credentials).await?;

        Ok(updated
            .into_iter()
            .filter(|updated_file| {
                files
                    .iter()
                    .find(|original| original.id() == updated_file.id())
                    .is_none_or(|original| original.content != updated_file.content)
            })
            .collect())
    }

    /// Run one strategy against the file set.
    ///
    /// Dispatch is an exhaustive match over the closed strategy enum; a new
    /// strategy means a new arm here and a new selection rule, nothing else.
    pub async fn apply(
        &self,
        kind: StrategyKind,
        files: &[DependencyFile],
        dependency: &Dependency,
        credentials: &[Credential],
    ) -> Result<Vec<DependencyFile>> {
        match kind {
            StrategyKind::Pipenv => pip::pipenv::update_files(files, dependency),
            StrategyKind::Poetry => pip::poetry::update_files(files, dependency),
            StrategyKind::PipCompile => pip::compile::update_files(files, dependency),
            StrategyKind::Requirements => pip::requirements::update_files(files, dependency),
            StrategyKind::MavenPom => {
                let mut ctx = maven::Context::new(files, credentials, &self.transport);
                maven::updater::update_files(&mut ctx, dependency).await
            }
        }
    }
}
