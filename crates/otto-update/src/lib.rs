//! # otto-update
//!
//! Dependency file update engine for Maven and Python projects.
//!
//! Given a project's manifest and lock files as in-memory values, this crate
//! works out how to rewrite them so a named dependency moves from one
//! requirement to another, preserving every other byte of the files:
//! - Infer which update strategy applies from the shape of the file set
//!   (Pipfile/lock, pyproject/poetry.lock, pip-compile pairs, POMs, flat
//!   requirements) without the caller declaring it
//! - Resolve POM inheritance chains across local files and remote
//!   repositories, including `${property}` placeholders and package-origin
//!   precedence
//! - Edit manifests with `toml_edit`/byte splicing so formatting and
//!   comments survive untouched
//!
//! ## Architecture
//!
//! Strategies form a closed enum selected by structural rules over file
//! names; dispatch is an exhaustive match in [`FileUpdater`]. Everything
//! that touches the network goes through the injected
//! [`otto_fetch::Transport`], and all per-run caches live in a context
//! scoped to one call.
//!
//! ## Example
//!
//! ```rust,no_run
//! use otto_update::{Dependency, DependencyFile, FileUpdater, Requirement};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let files = vec![DependencyFile::new("requirements.txt", "requests==2.31.0\n")];
//! let dependency = Dependency {
//!     name: "requests".to_string(),
//!     current_version: Some("2.31.0".to_string()),
//!     desired_version: Some("2.32.0".to_string()),
//!     requirements: vec![Requirement {
//!         file: "requirements.txt".to_string(),
//!         requirement: "==2.32.0".to_string(),
//!         groups: vec![],
//!         source: None,
//!     }],
//!     previous_requirements: vec![Requirement {
//!         file: "requirements.txt".to_string(),
//!         requirement: "==2.31.0".to_string(),
//!         groups: vec![],
//!         source: None,
//!     }],
//! };
//!
//! let updater = FileUpdater::new()?;
//! for file in updater.updated_dependency_files(&files, &dependency, &[]).await? {
//!     println!("{} changed", file.name);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod credentials;
pub mod editor;
pub mod error;
pub mod maven;
pub mod pip;
pub mod strategy;
pub mod types;
pub mod updater;

// Re-export main types
pub use credentials::Credential;
pub use error::{Error, Result};
pub use strategy::{select_strategy, StrategyKind};
pub use types::{Dependency, DependencyFile, Origin, Requirement};
pub use updater::FileUpdater;

// Re-export the maven resolution surface
pub use maven::Context as MavenContext;
