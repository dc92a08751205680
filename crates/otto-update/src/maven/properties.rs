//! Symbolic property resolution for POM values
//!
//! Values like `${httpclient.version}` are resolved on demand against the
//! declaring manifest and its ancestor chain, never eagerly for a whole
//! document: most placeholders in a large manifest are irrelevant to the one
//! dependency being updated. Substitution is single-pass: a property value
//! that itself contains a placeholder is not re-expanded.

use crate::error::{Error, Result};
use crate::maven::pom::{parse_pom, Pom};
use crate::maven::pom_fetcher::local_parent_of;
use crate::maven::{Context, MAX_PARENT_DEPTH};
use crate::types::DependencyFile;
use regex::Regex;

/// A placeholder occurrence inside a raw value
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placeholder {
    /// Property name between the delimiters
    pub name: String,
    /// Byte range of the whole `${...}` span
    pub start: usize,
    /// End of the span, exclusive
    pub end: usize,
}

/// First placeholder in `raw`, if any
pub(crate) fn find_placeholder(raw: &str) -> Option<Placeholder> {
    let pattern = Regex::new(r"\$\{([A-Za-z0-9._\-]+)\}").ok()?;
    let captures = pattern.captures(raw)?;
    let whole = captures.get(0)?;
    Some(Placeholder {
        name: captures.get(1)?.as_str().to_string(),
        start: whole.start(),
        end: whole.end(),
    })
}

fn substitute(raw: &str, placeholder: &Placeholder, value: &str) -> String {
    format!(
        "{}{}{}",
        &raw[..placeholder.start],
        value,
        &raw[placeholder.end..]
    )
}

/// `project.*` pseudo-properties resolve against the manifest being
/// consulted rather than a `<properties>` entry
fn project_pseudo_property(name: &str, pom: &Pom) -> Option<String> {
    match name {
        "project.version" => pom
            .version
            .clone()
            .or_else(|| pom.parent.as_ref()?.version.clone()),
        "project.groupId" => pom.effective_group_id().map(str::to_string),
        "project.artifactId" => pom.artifact_id.clone(),
        _ => None,
    }
}

/// Resolve a placeholder using only the manifest and its *local* ancestors.
///
/// Used where a fetch would be circular or unwanted, e.g. while collecting
/// the origins that remote lookup itself needs. Returns `None` when the
/// property is not locally resolvable; values without placeholders pass
/// through unchanged.
pub(crate) fn resolve_in_local_chain(
    files: &[DependencyFile],
    raw: &str,
    file: &DependencyFile,
) -> Option<String> {
    let placeholder = match find_placeholder(raw) {
        Some(placeholder) => placeholder,
        None => return Some(raw.to_string()),
    };

    let mut current = file.clone();
    for _ in 0..MAX_PARENT_DEPTH {
        let pom = parse_pom(&current).ok()?;
        let value = project_pseudo_property(&placeholder.name, &pom)
            .or_else(|| pom.property(&placeholder.name).map(str::to_string));
        if let Some(value) = value {
            return Some(substitute(raw, &placeholder, &value));
        }
        current = local_parent_of(files, &pom, &current)?.clone();
    }
    None
}

impl Context<'_> {
    /// Resolve the first placeholder in `raw` against `file` and its
    /// ancestor chain, local manifests first, remote ancestors after.
    ///
    /// Values without a placeholder are returned unchanged. A placeholder
    /// whose property exists nowhere in the chain fails with
    /// [`Error::PropertyNotFound`]; a partially substituted string is never
    /// produced.
    pub async fn resolve_value(&mut self, raw: &str, file: &DependencyFile) -> Result<String> {
        let placeholder = match find_placeholder(raw) {
            Some(placeholder) => placeholder,
            None => return Ok(raw.to_string()),
        };

        let value = self
            .lookup_property(&placeholder.name, file)
            .await
            .ok_or_else(|| Error::PropertyNotFound {
                property: placeholder.name.clone(),
                file: file.name.clone(),
            })?;

        Ok(substitute(raw, &placeholder, &value))
    }

    /// Value of `name` as seen from `file`, walking the ancestor chain.
    /// Cached per `(file, property)` for the rest of the run.
    pub(crate) async fn lookup_property(
        &mut self,
        name: &str,
        file: &DependencyFile,
    ) -> Option<String> {
        let key = (file.name.clone(), name.to_string());
        if let Some(cached) = self.property_cache.get(&key) {
            return cached.clone();
        }
        if !self.in_flight.insert(key.clone()) {
            // A lookup for this exact property is already on the stack:
            // a self-referential declaration resolves to nothing.
            return None;
        }

        let value = self.walk_for_property(name, file).await;

        self.in_flight.remove(&key);
        self.property_cache.insert(key, value.clone());
        value
    }

    async fn walk_for_property(&mut self, name: &str, file: &DependencyFile) -> Option<String> {
        let mut current = file.clone();
        for _ in 0..MAX_PARENT_DEPTH {
            let pom = parse_pom(&current).ok()?;

            if let Some(value) = project_pseudo_property(name, &pom) {
                return Some(value);
            }
            if let Some(value) = pom.property(name) {
                return Some(value.to_string());
            }

            let own = self.own_declared_origins(&current);
            current = self.find_parent(&current, &own).await?;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maven::testing::StubTransport;

    fn pom(name: &str, body: &str) -> DependencyFile {
        DependencyFile::new(name, format!("<project>{body}</project>"))
    }

    #[test]
    fn test_find_placeholder_spans() {
        let placeholder = find_placeholder("https://${nexus.host}/repo").unwrap();
        assert_eq!(placeholder.name, "nexus.host");
        assert_eq!(placeholder.start, 8);
        assert_eq!(placeholder.end, 21);

        assert_eq!(find_placeholder("4.5.13"), None);
        assert_eq!(find_placeholder("${}"), None);
    }

    #[tokio::test]
    async fn test_value_without_placeholder_passes_through() {
        let files = vec![pom("pom.xml", "<artifactId>app</artifactId>")];
        let transport = StubTransport::new();
        let mut ctx = Context::new(&files, &[], &transport);

        let resolved = ctx.resolve_value("4.5.13", &files[0]).await.unwrap();
        assert_eq!(resolved, "4.5.13");
        assert!(transport.requested().is_empty());
    }

    #[tokio::test]
    async fn test_local_declaration_resolves() {
        let files = vec![pom(
            "pom.xml",
            "<artifactId>app</artifactId>\
             <properties><httpclient.version>4.5.13</httpclient.version></properties>",
        )];
        let transport = StubTransport::new();
        let mut ctx = Context::new(&files, &[], &transport);

        let resolved = ctx
            .resolve_value("${httpclient.version}", &files[0])
            .await
            .unwrap();
        assert_eq!(resolved, "4.5.13");
    }

    #[tokio::test]
    async fn test_parent_chain_resolves_through_local_files() {
        let files = vec![
            pom(
                "pom.xml",
                "<groupId>com.example</groupId><artifactId>app</artifactId>\
                 <parent><groupId>com.example</groupId><artifactId>parent</artifactId>\
                 <version>1.0</version></parent>",
            ),
            pom(
                "parent/pom.xml",
                "<groupId>com.example</groupId><artifactId>parent</artifactId>\
                 <version>1.0</version>\
                 <properties><jackson.version>2.15.2</jackson.version></properties>",
            ),
        ];
        let transport = StubTransport::new();
        let mut ctx = Context::new(&files, &[], &transport);

        let resolved = ctx
            .resolve_value("${jackson.version}", &files[0])
            .await
            .unwrap();
        assert_eq!(resolved, "2.15.2");
    }

    #[tokio::test]
    async fn test_remote_ancestor_resolves() {
        let files = vec![pom(
            "pom.xml",
            "<artifactId>app</artifactId>\
             <parent><groupId>com.example</groupId><artifactId>parent</artifactId>\
             <version>3.0.0</version></parent>",
        )];
        let transport = StubTransport::new().respond(
            "https://repo.maven.apache.org/maven2/com/example/parent/3.0.0/parent-3.0.0.pom",
            200,
            "<project><artifactId>parent</artifactId>\
             <properties><spring.version>6.1.3</spring.version></properties></project>",
        );
        let mut ctx = Context::new(&files, &[], &transport);

        let resolved = ctx
            .resolve_value("${spring.version}", &files[0])
            .await
            .unwrap();
        assert_eq!(resolved, "6.1.3");
    }

    #[tokio::test]
    async fn test_unknown_property_is_an_error_not_a_partial_string() {
        let files = vec![pom("pom.xml", "<artifactId>app</artifactId>")];
        let transport = StubTransport::new();
        let mut ctx = Context::new(&files, &[], &transport);

        let err = ctx
            .resolve_value("${no.such.property}", &files[0])
            .await
            .unwrap_err();
        match err {
            Error::PropertyNotFound { property, file } => {
                assert_eq!(property, "no.such.property");
                assert_eq!(file, "pom.xml");
            }
            other => panic!("expected PropertyNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_substitution_is_single_pass() {
        // The resolved value contains another placeholder; it must come out
        // verbatim, not expanded again.
        let files = vec![pom(
            "pom.xml",
            "<artifactId>app</artifactId>\
             <properties>\
               <outer>${inner}</outer>\
               <inner>should-not-appear</inner>\
             </properties>",
        )];
        let transport = StubTransport::new();
        let mut ctx = Context::new(&files, &[], &transport);

        let resolved = ctx.resolve_value("${outer}", &files[0]).await.unwrap();
        assert_eq!(resolved, "${inner}");
    }

    #[tokio::test]
    async fn test_project_version_pseudo_property() {
        let files = vec![pom(
            "pom.xml",
            "<artifactId>app</artifactId><version>2.4.0</version>",
        )];
        let transport = StubTransport::new();
        let mut ctx = Context::new(&files, &[], &transport);

        let resolved = ctx
            .resolve_value("${project.version}", &files[0])
            .await
            .unwrap();
        assert_eq!(resolved, "2.4.0");
    }

    #[test]
    fn test_local_chain_resolution_does_not_fetch() {
        let files = vec![pom(
            "pom.xml",
            "<artifactId>app</artifactId>\
             <properties><nexus.host>nexus.example.com</nexus.host></properties>",
        )];

        let resolved =
            resolve_in_local_chain(&files, "https://${nexus.host}/repo", &files[0]).unwrap();
        assert_eq!(resolved, "https://nexus.example.com/repo");

        assert_eq!(
            resolve_in_local_chain(&files, "https://${unknown}/repo", &files[0]),
            None
        );
    }
}
