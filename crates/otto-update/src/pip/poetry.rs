//! pyproject.toml/poetry.lock strategy

use crate::editor::normalize_name;
use crate::error::{Error, Result};
use crate::pip::set_toml_requirement;
use crate::types::{Dependency, DependencyFile};
use toml_edit::{DocumentMut, Item, TableLike};

/// Candidate table paths for a requirement's groups. Poetry has carried its
/// dev dependencies under two different tables over time, so both spellings
/// are tried in order.
fn candidate_tables(groups: &[String]) -> Vec<Vec<&'static str>> {
    let dev = groups
        .iter()
        .any(|g| g == "dev" || g == "dev-dependencies" || g == "develop");
    if dev {
        vec![
            vec!["tool", "poetry", "dev-dependencies"],
            vec!["tool", "poetry", "group", "dev", "dependencies"],
        ]
    } else {
        vec![vec!["tool", "poetry", "dependencies"]]
    }
}

fn table_at<'a>(root: &'a mut Item, path: &[&str]) -> Option<&'a mut dyn TableLike> {
    match path.split_first() {
        None => root.as_table_like_mut(),
        Some((first, rest)) => table_at(root.as_table_like_mut()?.get_mut(first)?, rest),
    }
}

fn updated_pyproject_content(
    pyproject: &DependencyFile,
    dependency: &Dependency,
) -> Result<Option<String>> {
    let mut doc = pyproject
        .content
        .parse::<DocumentMut>()
        .map_err(Error::TomlEdit)?;
    let mut changed = false;

    for (previous, requirement) in dependency.changed_requirement_pairs() {
        if requirement.file != pyproject.name || previous.requirement == requirement.requirement {
            continue;
        }

        let mut applied = false;
        for path in candidate_tables(&requirement.groups) {
            let table = match table_at(doc.as_item_mut(), &path) {
                Some(table) => table,
                None => continue,
            };
            let entry_key = table
                .iter()
                .map(|(key, _)| key.to_string())
                .find(|key| normalize_name(key) == normalize_name(&dependency.name));
            if let Some(entry_key) = entry_key {
                if let Some(entry) = table.get_mut(&entry_key) {
                    if set_toml_requirement(entry, &requirement.requirement) {
                        applied = true;
                        changed = true;
                        break;
                    }
                }
            }
        }

        if !applied {
            return Err(Error::DependencyNotFound {
                dependency: dependency.name.clone(),
                file: pyproject.name.clone(),
            });
        }
    }

    Ok(changed.then(|| doc.to_string()))
}

fn updated_lockfile_content(
    lock: &DependencyFile,
    name: &str,
    version: &str,
) -> Result<Option<String>> {
    let mut doc = lock.content.parse::<DocumentMut>().map_err(Error::TomlEdit)?;
    let mut changed = false;

    if let Some(packages) = doc.get_mut("package").and_then(Item::as_array_of_tables_mut) {
        for package in packages.iter_mut() {
            let matches = package
                .get("name")
                .and_then(Item::as_str)
                .is_some_and(|n| normalize_name(n) == normalize_name(name));
            if !matches {
                continue;
            }
            if package.get("version").and_then(Item::as_str) != Some(version) {
                if let Some(entry) = package.get_mut("version") {
                    *entry = toml_edit::value(version);
                    changed = true;
                }
            }
        }
    }

    Ok(changed.then(|| doc.to_string()))
}

/// Apply a dependency change to pyproject.toml and poetry.lock
pub(crate) fn update_files(
    files: &[DependencyFile],
    dependency: &Dependency,
) -> Result<Vec<DependencyFile>> {
    let pyproject = files
        .iter()
        .find(|f| f.base_name() == "pyproject.toml")
        .ok_or_else(|| {
            Error::UnsupportedFileSet("pyproject.toml missing from file set".to_string())
        })?;

    let mut updated = Vec::new();
    if let Some(content) = updated_pyproject_content(pyproject, dependency)? {
        updated.push(pyproject.with_content(content));
    }

    if let Some(lock) = files.iter().find(|f| f.base_name() == "poetry.lock") {
        if let Some(version) = dependency.desired_version.as_deref() {
            if let Some(content) = updated_lockfile_content(lock, &dependency.name, version)? {
                updated.push(lock.with_content(content));
            }
        }
    }

    Ok(updated)
}
