//! POM document parsing
//!
//! POMs are parsed eagerly into owned values so no DOM handle outlives the
//! parse call; `${...}` placeholders inside the extracted values stay
//! unresolved until something asks for them.

use crate::error::{Error, Result};
use crate::types::DependencyFile;
use sxd_document::dom::{ChildOfElement, ChildOfRoot, Document, Element};
use sxd_document::parser;
use sxd_xpath::evaluate_xpath;

/// Reference to a parent manifest: a composite key of identity plus version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    /// Parent group id, when declared
    pub group_id: Option<String>,
    /// Parent artifact id, when declared
    pub artifact_id: Option<String>,
    /// Parent version token, when declared; may be a range expression
    pub version: Option<String>,
}

/// A repository declaration as written, placeholders unresolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDecl {
    /// Declared URL text
    pub url: String,
    /// Declared id, when present
    pub id: Option<String>,
}

/// Owned view of one parsed POM
#[derive(Debug, Clone, Default)]
pub struct Pom {
    /// Declared group id
    pub group_id: Option<String>,
    /// Declared artifact id
    pub artifact_id: Option<String>,
    /// Declared version
    pub version: Option<String>,
    /// Parent reference, when the POM declares one
    pub parent: Option<ParentRef>,
    /// `<properties>` entries in document order
    pub properties: Vec<(String, String)>,
    /// `<repositories>` declarations in document order
    pub repositories: Vec<RepositoryDecl>,
}

impl Pom {
    /// Group id under which this POM is addressable, falling back to the
    /// parent's group id when the POM inherits it
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or_else(|| self.parent.as_ref()?.group_id.as_deref())
    }

    /// Value of a `<properties>` entry
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Maven POMs may or may not carry the default POM namespace, so selectors
/// match on local names only.
fn local_name_path(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| format!("/*[local-name()='{part}']"))
        .collect()
}

fn xpath_string(doc: &Document<'_>, parts: &[&str]) -> Option<String> {
    let value = evaluate_xpath(doc, &local_name_path(parts)).ok()?;
    let text = value.string();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn root_element<'d>(doc: &Document<'d>) -> Option<Element<'d>> {
    doc.root().children().into_iter().find_map(ChildOfRoot::element)
}

fn child_elements<'d>(element: Element<'d>, name: &str) -> Vec<Element<'d>> {
    element
        .children()
        .into_iter()
        .filter_map(ChildOfElement::element)
        .filter(|child| child.name().local_part() == name)
        .collect()
}

fn child_element<'d>(element: Element<'d>, name: &str) -> Option<Element<'d>> {
    child_elements(element, name).into_iter().next()
}

fn element_text(element: Element<'_>) -> String {
    element
        .children()
        .into_iter()
        .filter_map(|child| child.text())
        .map(|text| text.text().to_string())
        .collect::<String>()
        .trim()
        .to_string()
}

fn child_text(element: Element<'_>, name: &str) -> Option<String> {
    let text = element_text(child_element(element, name)?);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parse `file` as a POM
pub fn parse_pom(file: &DependencyFile) -> Result<Pom> {
    parse_content(&file.content)
        .ok_or_else(|| Error::Xml(file.name.clone(), "not a well-formed POM".to_string()))
}

/// Whether `content` parses as a POM carrying the required top-level
/// identity field. Used to sanity-check remote fetch results before
/// accepting them.
pub fn is_well_formed_pom(content: &str) -> bool {
    matches!(parse_content(content), Some(pom) if pom.artifact_id.is_some())
}

fn parse_content(content: &str) -> Option<Pom> {
    let package = parser::parse(content).ok()?;
    let doc = package.as_document();

    let root = root_element(&doc)?;
    if root.name().local_part() != "project" {
        return None;
    }

    let parent = child_element(root, "parent").map(|parent| ParentRef {
        group_id: child_text(parent, "groupId"),
        artifact_id: child_text(parent, "artifactId"),
        version: child_text(parent, "version"),
    });

    let properties = child_element(root, "properties")
        .map(|properties| {
            properties
                .children()
                .into_iter()
                .filter_map(ChildOfElement::element)
                .map(|property| {
                    (
                        property.name().local_part().to_string(),
                        element_text(property),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    let repositories = child_element(root, "repositories")
        .map(|repositories| {
            child_elements(repositories, "repository")
                .into_iter()
                .filter_map(|repository| {
                    Some(RepositoryDecl {
                        url: child_text(repository, "url")?,
                        id: child_text(repository, "id"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Some(Pom {
        group_id: xpath_string(&doc, &["project", "groupId"]),
        artifact_id: xpath_string(&doc, &["project", "artifactId"]),
        version: xpath_string(&doc, &["project", "version"]),
        parent,
        properties,
        repositories,
    })
}
