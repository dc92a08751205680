//! Line-scoped requirement rewriting for requirements-style files
//!
//! Given a file's content and an exact old/new requirement pair, rewrites
//! only that occurrence and leaves every other byte untouched. This is the
//! text-editor boundary the update strategies build on; anything structured
//! (TOML, JSON, XML) has its own editing path.

/// Normalize a Python distribution name per PEP 503.
///
/// Runs of `-`, `_` and `.` compare equal and matching is case-insensitive.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut last_was_sep = false;
    for ch in name.chars() {
        if ch == '-' || ch == '_' || ch == '.' {
            if !last_was_sep {
                normalized.push('-');
            }
            last_was_sep = true;
        } else {
            normalized.push(ch.to_ascii_lowercase());
            last_was_sep = false;
        }
    }
    normalized
}

/// Whether `line` declares the distribution `name`.
///
/// The declaration must start the line (after leading whitespace) and be
/// followed by a specifier, extras bracket, environment marker, whitespace or
/// end of line, so that `requests` does not match `requests-toolbelt`.
fn declares(line: &str, name: &str) -> bool {
    let trimmed = line.trim_start();
    let candidate: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    if candidate.is_empty() {
        return false;
    }
    let rest = &trimmed[candidate.len()..];
    let boundary_ok = rest.is_empty()
        || rest.starts_with(|c: char| {
            c.is_whitespace() || matches!(c, '=' | '<' | '>' | '!' | '~' | ';' | '[' | '#')
        });
    boundary_ok && normalize_name(&candidate) == normalize_name(name)
}

/// Rewrite the requirement for `name` from `old` to `new`.
///
/// Scans for the first line declaring `name` that contains `old`, and
/// replaces the first occurrence of `old` on that line. Returns `None` when
/// no such line exists, leaving the decision of whether that is an error to
/// the caller.
pub fn rewrite_requirement(content: &str, name: &str, old: &str, new: &str) -> Option<String> {
    let mut offset = 0usize;
    for line in content.split_inclusive('\n') {
        if declares(line, name) {
            if let Some(pos) = line.find(old) {
                let mut rewritten = String::with_capacity(content.len());
                rewritten.push_str(&content[..offset + pos]);
                rewritten.push_str(new);
                rewritten.push_str(&content[offset + pos + old.len()..]);
                return Some(rewritten);
            }
        }
        offset += line.len();
    }
    None
}
