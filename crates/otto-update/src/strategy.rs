//! Strategy selection over a dependency file set
//!
//! Different manifest/lock-file combinations need mutually exclusive
//! handling, and the caller never declares which applies: the selector infers
//! it from the *names* of the supplied files. The rules are priority-ordered
//! and the flat-requirements strategy is an exhaustive fallback, so exactly
//! one strategy is selected per invocation.

use crate::types::DependencyFile;

/// The closed set of update strategies.
///
/// Adding support for a new file-set shape means adding a variant here and a
/// structural rule in [`select_strategy`]; dispatch stays an exhaustive
/// `match` in the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// `Pipfile` with its `Pipfile.lock`
    Pipenv,
    /// `pyproject.toml` with its `poetry.lock`
    Poetry,
    /// `requirements.in` sources compiled into `.txt` output
    PipCompile,
    /// `pom.xml` manifests with inheritance metadata
    MavenPom,
    /// Flat requirements files; the fallback, always applicable
    Requirements,
}

fn has_base_name(files: &[DependencyFile], base: &str) -> bool {
    files.iter().any(|f| f.base_name() == base)
}

/// Whether `source` (`*.in`) has a compiled counterpart (`*.txt`) in the set.
///
/// The naming convention links the two through a shared stem, directories
/// included: `requirements/dev.in` pairs with `requirements/dev.txt`.
fn has_compiled_output(files: &[DependencyFile], source: &DependencyFile) -> bool {
    let stem = match source.name.strip_suffix(".in") {
        Some(stem) => stem,
        None => return false,
    };
    files
        .iter()
        .any(|f| f.directory == source.directory && f.name == format!("{stem}.txt"))
}

/// Pick the single strategy that applies to `files`.
///
/// First matching rule wins; the fallback makes the selection total, so this
/// never fails.
pub fn select_strategy(files: &[DependencyFile]) -> StrategyKind {
    if has_base_name(files, "Pipfile") && has_base_name(files, "Pipfile.lock") {
        return StrategyKind::Pipenv;
    }
    if has_base_name(files, "pyproject.toml") && has_base_name(files, "poetry.lock") {
        return StrategyKind::Poetry;
    }
    if files
        .iter()
        .any(|f| f.name.ends_with(".in") && has_compiled_output(files, f))
    {
        return StrategyKind::PipCompile;
    }
    if has_base_name(files, "pom.xml") {
        return StrategyKind::MavenPom;
    }
    StrategyKind::Requirements
}
