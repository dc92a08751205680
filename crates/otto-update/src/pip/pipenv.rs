//! Pipfile/Pipfile.lock strategy
//!
//! The Pipfile is edited with `toml_edit` so untouched entries, comments and
//! ordering survive byte-for-byte. The lock file is a generated artifact:
//! its locked version is rewritten and the JSON re-emitted the way pipenv
//! itself writes it (four-space indentation, trailing newline). Hashes are
//! not regenerated; resolving new package archives is out of scope.

use crate::editor::normalize_name;
use crate::error::{Error, Result};
use crate::pip::set_toml_requirement;
use crate::types::{Dependency, DependencyFile};
use serde::Serialize;
use toml_edit::{DocumentMut, Item};

fn section_for(groups: &[String]) -> &'static str {
    if groups.iter().any(|g| g == "develop" || g == "dev-packages") {
        "dev-packages"
    } else {
        "packages"
    }
}

fn updated_pipfile_content(
    pipfile: &DependencyFile,
    dependency: &Dependency,
) -> Result<Option<String>> {
    let mut doc = pipfile.content.parse::<DocumentMut>().map_err(Error::TomlEdit)?;
    let mut changed = false;

    for (previous, requirement) in dependency.changed_requirement_pairs() {
        if requirement.file != pipfile.name || previous.requirement == requirement.requirement {
            continue;
        }

        let section = section_for(&requirement.groups);
        let entry_key = doc
            .get(section)
            .and_then(Item::as_table)
            .and_then(|table| {
                table
                    .iter()
                    .map(|(key, _)| key.to_string())
                    .find(|key| normalize_name(key) == normalize_name(&dependency.name))
            })
            .ok_or_else(|| Error::DependencyNotFound {
                dependency: dependency.name.clone(),
                file: pipfile.name.clone(),
            })?;

        let applied = doc[section]
            .as_table_mut()
            .and_then(|table| table.get_mut(&entry_key))
            .map(|entry| set_toml_requirement(entry, &requirement.requirement))
            .unwrap_or(false);
        if !applied {
            return Err(Error::DependencyNotFound {
                dependency: dependency.name.clone(),
                file: pipfile.name.clone(),
            });
        }
        changed = true;
    }

    Ok(changed.then(|| doc.to_string()))
}

fn updated_lockfile_content(
    lock: &DependencyFile,
    name: &str,
    version: &str,
) -> Result<Option<String>> {
    let mut root: serde_json::Value = serde_json::from_str(&lock.content)?;
    let mut changed = false;

    for section in ["default", "develop"] {
        let entries = match root.get_mut(section).and_then(|v| v.as_object_mut()) {
            Some(entries) => entries,
            None => continue,
        };
        let entry_key = entries
            .keys()
            .find(|key| normalize_name(key) == normalize_name(name))
            .cloned();
        if let Some(entry_key) = entry_key {
            if let Some(entry) = entries.get_mut(&entry_key).and_then(|v| v.as_object_mut()) {
                let locked = serde_json::Value::String(format!("=={version}"));
                if entry.get("version") != Some(&locked) {
                    entry.insert("version".to_string(), locked);
                    changed = true;
                }
            }
        }
    }

    if !changed {
        return Ok(None);
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    root.serialize(&mut serializer)?;
    let mut text = String::from_utf8(buf).expect("serde_json emits UTF-8");
    text.push('\n');
    Ok(Some(text))
}

/// Apply a dependency change to the Pipfile and its lock file
pub(crate) fn update_files(
    files: &[DependencyFile],
    dependency: &Dependency,
) -> Result<Vec<DependencyFile>> {
    let pipfile = files
        .iter()
        .find(|f| f.base_name() == "Pipfile")
        .ok_or_else(|| Error::UnsupportedFileSet("Pipfile missing from file set".to_string()))?;

    let mut updated = Vec::new();
    if let Some(content) = updated_pipfile_content(pipfile, dependency)? {
        updated.push(pipfile.with_content(content));
    }

    if let Some(lock) = files.iter().find(|f| f.base_name() == "Pipfile.lock") {
        if let Some(version) = dependency.desired_version.as_deref() {
            if let Some(content) = updated_lockfile_content(lock, &dependency.name, version)? {
                updated.push(lock.with_content(content));
            }
        }
    }

    Ok(updated)
}
