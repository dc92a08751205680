//! Error types for otto-update

use thiserror::Error;

/// Result type alias using otto-update Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in otto-update
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlEdit(#[from] toml_edit::TomlError),

    /// XML parsing error
    #[error("XML parse error in {0}: {1}")]
    Xml(String, String),

    /// Transport error surfaced outside a fail-soft path
    #[error("Fetch error: {0}")]
    Fetch(#[from] otto_fetch::Error),

    /// A placeholder references a property that exists nowhere in the
    /// manifest's ancestor chain, or only in an ancestor that is not part of
    /// the working file set and so cannot be edited
    #[error("Property '{property}' could not be resolved from {file} or its ancestors")]
    PropertyNotFound {
        /// Name of the unresolvable property
        property: String,
        /// File the placeholder was found in
        file: String,
    },

    /// A strategy could not locate the dependency inside its declared file
    #[error("Dependency '{dependency}' not found in {file}")]
    DependencyNotFound {
        /// Package name
        dependency: String,
        /// File the declaration was expected in
        file: String,
    },

    /// A requirement references a file missing from the working set
    #[error("Requirement for '{dependency}' references '{file}', which is not in the file set")]
    MissingRequirementFile {
        /// Package name
        dependency: String,
        /// The missing file name
        file: String,
    },

    /// The supplied file set violates the caller contract
    #[error("Unsupported file set: {0}")]
    UnsupportedFileSet(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}
