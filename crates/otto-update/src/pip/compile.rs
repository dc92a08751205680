//! pip-compile strategy for `.in` sources with compiled `.txt` output
//!
//! The file set is staged into a scoped scratch directory, edited there, and
//! read back; the directory is removed on every exit path when the `TempDir`
//! guard drops, so nothing the strategy does is observable on disk
//! afterwards. Beyond rewriting the source declaration, the exact pin in the
//! compiled output is moved to the target version so source and output stay
//! consistent without running a resolver.

use crate::editor::rewrite_requirement;
use crate::error::{Error, Result};
use crate::types::{Dependency, DependencyFile};
use std::fs;
use std::path::Path;

fn staged_path(root: &Path, file: &DependencyFile) -> Result<std::path::PathBuf> {
    if Path::new(&file.name)
        .components()
        .any(|c| !matches!(c, std::path::Component::Normal(_)))
    {
        return Err(Error::UnsupportedFileSet(format!(
            "file name '{}' escapes the working area",
            file.name
        )));
    }
    Ok(root.join(&file.name))
}

fn is_compiled_output(files: &[DependencyFile], file: &DependencyFile) -> bool {
    file.name
        .strip_suffix(".txt")
        .is_some_and(|stem| files.iter().any(|f| f.name == format!("{stem}.in")))
}

/// Apply a dependency change across `.in` sources and their compiled output
pub(crate) fn update_files(
    files: &[DependencyFile],
    dependency: &Dependency,
) -> Result<Vec<DependencyFile>> {
    let staging = tempfile::TempDir::new()?;

    for file in files {
        let path = staged_path(staging.path(), file)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &file.content)?;
    }

    // Rewrite the declarations in the source files.
    for (previous, requirement) in dependency.changed_requirement_pairs() {
        if !requirement.file.ends_with(".in") || previous.requirement == requirement.requirement {
            continue;
        }
        let file = files
            .iter()
            .find(|f| f.name == requirement.file)
            .ok_or_else(|| Error::MissingRequirementFile {
                dependency: dependency.name.clone(),
                file: requirement.file.clone(),
            })?;
        let path = staged_path(staging.path(), file)?;
        let staged = fs::read_to_string(&path)?;
        let rewritten = rewrite_requirement(
            &staged,
            &dependency.name,
            &previous.requirement,
            &requirement.requirement,
        )
        .ok_or_else(|| Error::DependencyNotFound {
            dependency: dependency.name.clone(),
            file: file.name.clone(),
        })?;
        fs::write(&path, rewritten)?;
    }

    // Move the exact pin in each compiled output. Sub-dependency pins are
    // updated too; they have no declaration in any source file.
    if let (Some(current), Some(desired)) = (
        dependency.current_version.as_deref(),
        dependency.desired_version.as_deref(),
    ) {
        for file in files.iter().filter(|f| is_compiled_output(files, f)) {
            let path = staged_path(staging.path(), file)?;
            let staged = fs::read_to_string(&path)?;
            if let Some(rewritten) = rewrite_requirement(
                &staged,
                &dependency.name,
                &format!("=={current}"),
                &format!("=={desired}"),
            ) {
                fs::write(&path, rewritten)?;
            }
        }
    }

    // Read back whatever changed relative to the input set.
    let mut updated = Vec::new();
    for file in files {
        let staged = fs::read_to_string(staged_path(staging.path(), file)?)?;
        if staged != file.content {
            updated.push(file.with_content(staged));
        }
    }

    Ok(updated)
}
