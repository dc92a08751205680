//! POM update strategy
//!
//! Rewrites the `<version>` text of a dependency declaration, or, when the
//! version is declared through a property, rewrites the property value at
//! its declaration site. Every edit is a byte splice: the rest of the
//! document, comments and formatting included, passes through untouched.

use crate::error::{Error, Result};
use crate::maven::pom::parse_pom;
use crate::maven::pom_fetcher::local_parent_of;
use crate::maven::properties::find_placeholder;
use crate::maven::{Context, MAX_PARENT_DEPTH};
use crate::types::{Dependency, DependencyFile};
use std::ops::Range;

/// A located `<version>` text node inside a dependency declaration
struct DeclaredVersion {
    text: String,
    range: Range<usize>,
}

/// Locate the version text of the first declaration of `group:artifact`.
///
/// Only the first match per file is considered: redundant sibling
/// declarations are deliberately left to later invocations.
fn declaration_version(content: &str, group: &str, artifact: &str) -> Option<DeclaredVersion> {
    let group_tag = format!("<groupId>{group}</groupId>");
    let artifact_tag = format!("<artifactId>{artifact}</artifactId>");

    let mut from = 0;
    while let Some(found) = content[from..].find(&group_tag) {
        let after_group = from + found + group_tag.len();
        // The artifactId and version must follow within the same declaration
        // element; bound the scan at the element's closing tag.
        let bound = content[after_group..]
            .find("</dependency>")
            .map(|i| after_group + i)
            .unwrap_or(content.len());

        if let Some(artifact_at) = content[after_group..bound].find(&artifact_tag) {
            let after_artifact = after_group + artifact_at + artifact_tag.len();
            let version_at = content[after_artifact..bound].find("<version>")?;
            let value_start = after_artifact + version_at + "<version>".len();
            let value_len = content[value_start..bound].find("</version>")?;
            return Some(DeclaredVersion {
                text: content[value_start..value_start + value_len].to_string(),
                range: value_start..value_start + value_len,
            });
        }
        from = after_group;
    }
    None
}

/// Byte range of a `<properties>` entry value
fn property_declaration_span(content: &str, name: &str) -> Option<Range<usize>> {
    let properties_start = content.find("<properties>")?;
    let properties_end = content
        .find("</properties>")
        .unwrap_or(content.len());

    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let value_at = content[properties_start..properties_end].find(&open)?;
    let value_start = properties_start + value_at + open.len();
    let value_len = content[value_start..properties_end].find(&close)?;
    Some(value_start..value_start + value_len)
}

fn splice(content: &str, range: Range<usize>, replacement: &str) -> String {
    format!(
        "{}{}{}",
        &content[..range.start],
        replacement,
        &content[range.end..]
    )
}

fn upsert(updated: &mut Vec<DependencyFile>, file: DependencyFile) {
    match updated.iter_mut().find(|f| f.id() == file.id()) {
        Some(existing) => *existing = file,
        None => updated.push(file),
    }
}

/// Apply a dependency change across the POM files it is declared in
pub(crate) async fn update_files(
    ctx: &mut Context<'_>,
    dependency: &Dependency,
) -> Result<Vec<DependencyFile>> {
    let (group, artifact) = dependency.maven_coordinates().ok_or_else(|| {
        Error::UnsupportedFileSet(format!(
            "dependency '{}' is not addressed as group:artifact",
            dependency.name
        ))
    })?;

    let mut updated: Vec<DependencyFile> = Vec::new();

    for (previous, requirement) in dependency.changed_requirement_pairs() {
        let file = updated
            .iter()
            .find(|f| f.name == previous.file)
            .cloned()
            .or_else(|| ctx.file_named(&previous.file).cloned())
            .ok_or_else(|| Error::MissingRequirementFile {
                dependency: dependency.name.clone(),
                file: previous.file.clone(),
            })?;

        let declared =
            declaration_version(&file.content, group, artifact).ok_or_else(|| {
                Error::DependencyNotFound {
                    dependency: dependency.name.clone(),
                    file: file.name.clone(),
                }
            })?;

        if let Some(placeholder) = find_placeholder(&declared.text) {
            // The chain must resolve the property at all before we hunt for
            // an editable declaration site; an unevaluatable version string
            // would corrupt the update.
            ctx.resolve_value(&declared.text, &file).await?;
            let target = update_property_declaration(
                ctx,
                &updated,
                &file,
                &placeholder.name,
                dependency,
            )?;
            upsert(&mut updated, target);
        } else {
            if declared.text != previous.requirement {
                return Err(Error::DependencyNotFound {
                    dependency: dependency.name.clone(),
                    file: file.name.clone(),
                });
            }
            let new_content = splice(&file.content, declared.range, &requirement.requirement);
            upsert(&mut updated, file.with_content(new_content));
        }
    }

    Ok(updated)
}

/// Rewrite the property value at its declaration site, walking the local
/// parent chain from the declaring manifest. A property that is only
/// declared in a remote ancestor cannot be edited and fails the update.
fn update_property_declaration(
    ctx: &Context<'_>,
    updated: &[DependencyFile],
    from: &DependencyFile,
    property: &str,
    dependency: &Dependency,
) -> Result<DependencyFile> {
    let target_version = dependency.desired_version.as_deref().ok_or_else(|| {
        Error::Other(format!(
            "no target version for property-declared dependency '{}'",
            dependency.name
        ))
    })?;

    let mut current = from.clone();
    for _ in 0..MAX_PARENT_DEPTH {
        // Prefer content already rewritten earlier in this run.
        if let Some(copy) = updated.iter().find(|f| f.id() == current.id()) {
            current = copy.clone();
        }

        if let Some(range) = property_declaration_span(&current.content, property) {
            let new_content = splice(&current.content, range, target_version);
            return Ok(current.with_content(new_content));
        }

        let pom = parse_pom(&current)?;
        match local_parent_of(ctx.files, &pom, &current) {
            Some(parent) => current = parent.clone(),
            None => break,
        }
    }

    Err(Error::PropertyNotFound {
        property: property.to_string(),
        file: from.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maven::testing::StubTransport;
    use crate::types::Requirement;

    fn dependency(name: &str, old_req: &str, new_req: &str, file: &str) -> Dependency {
        let requirement = |req: &str| Requirement {
            file: file.to_string(),
            requirement: req.to_string(),
            groups: vec![],
            source: None,
        };
        Dependency {
            name: name.to_string(),
            current_version: None,
            desired_version: Some(new_req.to_string()),
            requirements: vec![requirement(new_req)],
            previous_requirements: vec![requirement(old_req)],
        }
    }

    const LITERAL_POM: &str = r#"<?xml version="1.0"?>
<project>
  <groupId>com.example</groupId>
  <artifactId>app</artifactId>
  <version>0.1.0</version>

  <dependencies>
    <!-- transport layer -->
    <dependency>
      <groupId>org.apache.httpcomponents</groupId>
      <artifactId>httpclient</artifactId>
      <version>4.5.13</version>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.13.2</version>
      <scope>test</scope>
    </dependency>
  </dependencies>
</project>
"#;

    #[tokio::test]
    async fn test_literal_version_is_spliced_in_place() {
        let files = vec![DependencyFile::new("pom.xml", LITERAL_POM)];
        let transport = StubTransport::new();
        let mut ctx = Context::new(&files, &[], &transport);

        let dep = dependency(
            "org.apache.httpcomponents:httpclient",
            "4.5.13",
            "4.5.14",
            "pom.xml",
        );
        let updated = update_files(&mut ctx, &dep).await.unwrap();

        assert_eq!(updated.len(), 1);
        let expected = LITERAL_POM.replace("4.5.13", "4.5.14");
        assert_eq!(updated[0].content, expected);
        // the sibling declaration was left alone
        assert!(updated[0].content.contains("<version>4.13.2</version>"));
    }

    #[tokio::test]
    async fn test_property_version_updates_declaration_site() {
        let content = r#"<project>
  <artifactId>app</artifactId>
  <properties>
    <httpclient.version>4.5.13</httpclient.version>
  </properties>
  <dependencies>
    <dependency>
      <groupId>org.apache.httpcomponents</groupId>
      <artifactId>httpclient</artifactId>
      <version>${httpclient.version}</version>
    </dependency>
  </dependencies>
</project>
"#;
        let files = vec![DependencyFile::new("pom.xml", content)];
        let transport = StubTransport::new();
        let mut ctx = Context::new(&files, &[], &transport);

        let mut dep = dependency(
            "org.apache.httpcomponents:httpclient",
            "${httpclient.version}",
            "4.5.14",
            "pom.xml",
        );
        // the requirement string itself stays `${httpclient.version}`
        dep.requirements[0].requirement = "${httpclient.version}".to_string();
        let updated = update_files(&mut ctx, &dep).await.unwrap();

        assert_eq!(updated.len(), 1);
        assert!(updated[0]
            .content
            .contains("<httpclient.version>4.5.14</httpclient.version>"));
        assert!(updated[0]
            .content
            .contains("<version>${httpclient.version}</version>"));
    }

    #[tokio::test]
    async fn test_property_in_local_parent_updates_parent_file() {
        let child = r#"<project>
  <artifactId>app</artifactId>
  <parent>
    <groupId>com.example</groupId>
    <artifactId>parent</artifactId>
    <version>1.0</version>
  </parent>
  <dependencies>
    <dependency>
      <groupId>com.fasterxml.jackson.core</groupId>
      <artifactId>jackson-databind</artifactId>
      <version>${jackson.version}</version>
    </dependency>
  </dependencies>
</project>
"#;
        let parent = r#"<project>
  <groupId>com.example</groupId>
  <artifactId>parent</artifactId>
  <version>1.0</version>
  <properties>
    <jackson.version>2.15.2</jackson.version>
  </properties>
</project>
"#;
        let files = vec![
            DependencyFile::new("pom.xml", child),
            DependencyFile::new("parent/pom.xml", parent),
        ];
        let transport = StubTransport::new();
        let mut ctx = Context::new(&files, &[], &transport);

        let mut dep = dependency(
            "com.fasterxml.jackson.core:jackson-databind",
            "${jackson.version}",
            "2.16.1",
            "pom.xml",
        );
        dep.requirements[0].requirement = "${jackson.version}".to_string();
        let updated = update_files(&mut ctx, &dep).await.unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].name, "parent/pom.xml");
        assert!(updated[0]
            .content
            .contains("<jackson.version>2.16.1</jackson.version>"));
    }

    #[tokio::test]
    async fn test_property_only_in_remote_ancestor_aborts() {
        let child = "<project><artifactId>app</artifactId>\
             <parent><groupId>com.example</groupId><artifactId>parent</artifactId>\
             <version>3.0.0</version></parent>\
             <dependencies><dependency>\
               <groupId>org.example</groupId><artifactId>lib</artifactId>\
               <version>${lib.version}</version>\
             </dependency></dependencies></project>";
        let files = vec![DependencyFile::new("pom.xml", child)];
        let transport = StubTransport::new().respond(
            "https://repo.maven.apache.org/maven2/com/example/parent/3.0.0/parent-3.0.0.pom",
            200,
            "<project><artifactId>parent</artifactId>\
             <properties><lib.version>1.0.0</lib.version></properties></project>",
        );
        let mut ctx = Context::new(&files, &[], &transport);

        let mut dep = dependency("org.example:lib", "${lib.version}", "1.1.0", "pom.xml");
        dep.requirements[0].requirement = "${lib.version}".to_string();
        let err = update_files(&mut ctx, &dep).await.unwrap_err();
        assert!(matches!(err, Error::PropertyNotFound { .. }));
    }

    #[tokio::test]
    async fn test_unresolvable_property_aborts() {
        let content = "<project><artifactId>app</artifactId>\
             <dependencies><dependency>\
               <groupId>org.example</groupId><artifactId>lib</artifactId>\
               <version>${lib.version}</version>\
             </dependency></dependencies></project>";
        let files = vec![DependencyFile::new("pom.xml", content)];
        let transport = StubTransport::new();
        let mut ctx = Context::new(&files, &[], &transport);

        let mut dep = dependency("org.example:lib", "${lib.version}", "1.1.0", "pom.xml");
        dep.requirements[0].requirement = "${lib.version}".to_string();
        let err = update_files(&mut ctx, &dep).await.unwrap_err();
        assert!(matches!(err, Error::PropertyNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_declaration_is_a_strategy_failure() {
        let files = vec![DependencyFile::new(
            "pom.xml",
            "<project><artifactId>app</artifactId></project>",
        )];
        let transport = StubTransport::new();
        let mut ctx = Context::new(&files, &[], &transport);

        let dep = dependency("org.example:lib", "1.0.0", "1.1.0", "pom.xml");
        let err = update_files(&mut ctx, &dep).await.unwrap_err();
        assert!(matches!(err, Error::DependencyNotFound { .. }));
    }

    #[test]
    fn test_declaration_version_skips_other_artifacts() {
        let declared =
            declaration_version(LITERAL_POM, "junit", "junit").expect("declaration found");
        assert_eq!(declared.text, "4.13.2");
    }

    #[test]
    fn test_declaration_version_in_dependency_management() {
        let content = "<project><artifactId>bom</artifactId>\
             <dependencyManagement><dependencies><dependency>\
               <groupId>org.example</groupId><artifactId>lib</artifactId>\
               <version>1.0.0</version>\
             </dependency></dependencies></dependencyManagement></project>";
        let declared = declaration_version(content, "org.example", "lib").unwrap();
        assert_eq!(declared.text, "1.0.0");
    }
}
