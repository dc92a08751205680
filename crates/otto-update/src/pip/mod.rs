//! Python ecosystem support
//!
//! Four file-set shapes, four strategies: flat requirements files, pip-compile
//! source/output pairs, Pipfile/Pipfile.lock, and pyproject.toml/poetry.lock.
//! Manifests are edited in place preserving bytes; lock files are generated
//! files and get regenerated content where needed.

pub mod compile;
pub mod pipenv;
pub mod poetry;
pub mod requirements;

use toml_edit::{Formatted, Item, Value};

/// Set the requirement of a TOML dependency entry, handling both the plain
/// string form (`requests = "==2.31.0"`) and the inline-table form
/// (`requests = { version = "==2.31.0", extras = [...] }`).
pub(crate) fn set_toml_requirement(item: &mut Item, requirement: &str) -> bool {
    match item {
        Item::Value(Value::String(s)) => {
            *s = Formatted::new(requirement.to_string());
            true
        }
        Item::Value(Value::InlineTable(table)) => match table.get_mut("version") {
            Some(version) => {
                *version = Value::String(Formatted::new(requirement.to_string()));
                true
            }
            None => false,
        },
        _ => false,
    }
}
