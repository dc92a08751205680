//! Flat requirements-file strategy, the fallback for plain file sets

use crate::editor::rewrite_requirement;
use crate::error::{Error, Result};
use crate::types::{Dependency, DependencyFile};

/// Rewrite each changed requirement in its declaring file
pub(crate) fn update_files(
    files: &[DependencyFile],
    dependency: &Dependency,
) -> Result<Vec<DependencyFile>> {
    let mut updated: Vec<DependencyFile> = Vec::new();

    for (previous, requirement) in dependency.changed_requirement_pairs() {
        if previous.requirement == requirement.requirement {
            continue;
        }

        let file = updated
            .iter()
            .find(|f| f.name == requirement.file)
            .cloned()
            .or_else(|| files.iter().find(|f| f.name == requirement.file).cloned())
            .ok_or_else(|| Error::MissingRequirementFile {
                dependency: dependency.name.clone(),
                file: requirement.file.clone(),
            })?;

        let new_content = rewrite_requirement(
            &file.content,
            &dependency.name,
            &previous.requirement,
            &requirement.requirement,
        )
        .ok_or_else(|| Error::DependencyNotFound {
            dependency: dependency.name.clone(),
            file: file.name.clone(),
        })?;

        match updated.iter_mut().find(|f| f.id() == file.id()) {
            Some(existing) => *existing = file.with_content(new_content),
            None => updated.push(file.with_content(new_content)),
        }
    }

    Ok(updated)
}
