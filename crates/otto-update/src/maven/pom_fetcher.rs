//! Parent manifest lookup, local first, then remote
//!
//! A parent reference is a `(groupId, artifactId, version)` composite key.
//! Manifests already in the working file set always win over remote lookup;
//! remote lookup tries each candidate origin in priority order and accepts a
//! response only when the status is exactly `200 OK` and the body parses as
//! a POM carrying its identity field.

use crate::credentials::registry_origins;
use crate::maven::pom::{parse_pom, Pom};
use crate::maven::repositories::{central_origin, dedupe_origins};
use crate::maven::Context;
use crate::types::{DependencyFile, Origin};

/// Per-attempt retry budget: one round trip plus one retry, then the next
/// origin. Failing origins must not stall resolution that is expected to
/// fall over to a public default.
const FETCH_RETRIES: u32 = 1;

/// Whether a version token is a range expression rather than an exact
/// version. Ranges make parent resolution ambiguous.
pub(crate) fn is_version_range(version: &str) -> bool {
    version.contains(['(', ')', '[', ']', ','])
}

/// Path of the remote POM for `group:artifact` at `version` under `origin`
fn remote_pom_url(origin: &str, group: &str, artifact: &str, version: &str) -> String {
    let base = origin.strip_suffix('/').unwrap_or(origin);
    let group_path = group.replace('.', "/");
    format!("{base}/{group_path}/{artifact}/{version}/{artifact}-{version}.pom")
}

/// The working-set POM matching `(group, artifact)`, excluding `of` itself
/// so a self-referential parent declaration terminates instead of recursing.
pub(crate) fn local_parent_file<'f>(
    files: &'f [DependencyFile],
    group: &str,
    artifact: &str,
    of: &DependencyFile,
) -> Option<&'f DependencyFile> {
    files
        .iter()
        .filter(|candidate| candidate.base_name() == "pom.xml" && candidate.id() != of.id())
        .find(|candidate| match parse_pom(candidate) {
            Ok(pom) => {
                pom.effective_group_id() == Some(group)
                    && pom.artifact_id.as_deref() == Some(artifact)
            }
            Err(_) => false,
        })
}

/// Parent lookup for an already-parsed POM, shared by the local-only
/// property walk
pub(crate) fn local_parent_of<'f>(
    files: &'f [DependencyFile],
    pom: &Pom,
    of: &DependencyFile,
) -> Option<&'f DependencyFile> {
    let parent = pom.parent.as_ref()?;
    local_parent_file(
        files,
        parent.group_id.as_deref()?,
        parent.artifact_id.as_deref()?,
        of,
    )
}

impl Context<'_> {
    /// Fetch a remote POM body, caching the outcome per exact URL for the
    /// rest of this run. Rejected and failed fetches cache as `None` so a
    /// bad origin is only tried once per run.
    pub(crate) async fn fetch_pom(&mut self, url: &str) -> Option<String> {
        if let Some(cached) = self.pom_cache.get(url) {
            return cached.clone();
        }

        let outcome = match self.transport.get(url, FETCH_RETRIES).await {
            Ok(response)
                if response.is_ok() && crate::maven::pom::is_well_formed_pom(&response.body) =>
            {
                Some(response.body)
            }
            _ => None,
        };

        self.pom_cache.insert(url.to_string(), outcome.clone());
        outcome
    }

    /// Locate the parent manifest of `file`.
    ///
    /// Returns `None` when no parent is declared, the declaration is missing
    /// its identity, the version is a range (guessing among candidates would
    /// be unsound), or no candidate origin yields an acceptable POM. Remote
    /// candidates are `known_origins`, then credential origins, then the
    /// implicit default, deduplicated, tried strictly in order.
    pub async fn find_parent(
        &mut self,
        file: &DependencyFile,
        known_origins: &[Origin],
    ) -> Option<DependencyFile> {
        let pom = parse_pom(file).ok()?;
        let parent = pom.parent?;
        let group = parent.group_id?;
        let artifact = parent.artifact_id?;

        if let Some(local) = local_parent_file(self.files, &group, &artifact, file) {
            return Some(local.clone());
        }

        let version = parent.version?;
        if is_version_range(&version) {
            return None;
        }

        let mut candidates = known_origins.to_vec();
        candidates.extend(registry_origins(self.credentials));
        candidates.push(central_origin());

        for origin in dedupe_origins(candidates) {
            let url = remote_pom_url(&origin.url, &group, &artifact, &version);
            if let Some(body) = self.fetch_pom(&url).await {
                return Some(DependencyFile::new(
                    format!("{artifact}-{version}.pom"),
                    body,
                ));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maven::testing::StubTransport;

    const PARENT_REF: &str = "<parent>\
        <groupId>com.example</groupId>\
        <artifactId>parent</artifactId>\
        <version>1.2.3</version>\
        </parent>";

    fn child_pom() -> DependencyFile {
        DependencyFile::new(
            "pom.xml",
            format!("<project><artifactId>app</artifactId>{PARENT_REF}</project>"),
        )
    }

    #[test]
    fn test_version_range_detection() {
        assert!(is_version_range("[1.0,2.0)"));
        assert!(is_version_range("[1.0]"));
        assert!(!is_version_range("1.2.3"));
        assert!(!is_version_range("1.2.3-SNAPSHOT"));
    }

    #[test]
    fn test_remote_pom_url_shape() {
        assert_eq!(
            remote_pom_url("https://repo.example/", "com.example.libs", "util", "2.0.1"),
            "https://repo.example/com/example/libs/util/2.0.1/util-2.0.1.pom"
        );
    }

    #[tokio::test]
    async fn test_local_parent_wins_without_network() {
        let files = vec![
            child_pom(),
            DependencyFile::new(
                "parent/pom.xml",
                "<project><groupId>com.example</groupId>\
                 <artifactId>parent</artifactId><version>1.2.3</version></project>",
            ),
        ];
        let transport = StubTransport::new();
        let mut ctx = Context::new(&files, &[], &transport);

        let parent = ctx.find_parent(&files[0], &[]).await.unwrap();
        assert_eq!(parent.name, "parent/pom.xml");
        assert!(transport.requested().is_empty());
    }

    #[tokio::test]
    async fn test_missing_identity_means_no_parent() {
        let files = vec![DependencyFile::new(
            "pom.xml",
            "<project><artifactId>app</artifactId>\
             <parent><version>1.0</version></parent></project>",
        )];
        let transport = StubTransport::new();
        let mut ctx = Context::new(&files, &[], &transport);

        assert_eq!(ctx.find_parent(&files[0], &[]).await, None);
        assert!(transport.requested().is_empty());
    }

    #[tokio::test]
    async fn test_range_version_is_ambiguous() {
        let files = vec![DependencyFile::new(
            "pom.xml",
            "<project><artifactId>app</artifactId>\
             <parent><groupId>g</groupId><artifactId>a</artifactId>\
             <version>[1.0,2.0)</version></parent></project>",
        )];
        let transport = StubTransport::new();
        let mut ctx = Context::new(&files, &[], &transport);

        assert_eq!(ctx.find_parent(&files[0], &[]).await, None);
        assert!(transport.requested().is_empty());
    }

    #[tokio::test]
    async fn test_remote_parent_fetched_from_first_working_origin() {
        let files = vec![child_pom()];
        let parent_body = "<project><groupId>com.example</groupId>\
             <artifactId>parent</artifactId><version>1.2.3</version></project>";
        let transport = StubTransport::new().respond(
            "https://repo.example/com/example/parent/1.2.3/parent-1.2.3.pom",
            200,
            parent_body,
        );
        let mut ctx = Context::new(&files, &[], &transport);

        let known = vec![Origin::new("https://repo.example")];
        let parent = ctx.find_parent(&files[0], &known).await.unwrap();
        assert_eq!(parent.name, "parent-1.2.3.pom");
        assert_eq!(parent.content, parent_body);
    }

    #[tokio::test]
    async fn test_malformed_body_falls_through_to_next_origin() {
        // 200 OK with a body lacking the identity field must be rejected,
        // not accepted as a parse.
        let files = vec![child_pom()];
        let transport = StubTransport::new()
            .respond(
                "https://repo.example/com/example/parent/1.2.3/parent-1.2.3.pom",
                200,
                "<project><groupId>com.example</groupId></project>",
            )
            .respond(
                "https://repo.maven.apache.org/maven2/com/example/parent/1.2.3/parent-1.2.3.pom",
                200,
                "<project><artifactId>parent</artifactId></project>",
            );
        let mut ctx = Context::new(&files, &[], &transport);

        let known = vec![Origin::new("https://repo.example")];
        let parent = ctx.find_parent(&files[0], &known).await.unwrap();
        assert_eq!(
            parent.content,
            "<project><artifactId>parent</artifactId></project>"
        );
        assert_eq!(transport.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_non_ok_status_is_rejected() {
        let files = vec![child_pom()];
        let transport = StubTransport::new().respond(
            "https://repo.example/com/example/parent/1.2.3/parent-1.2.3.pom",
            404,
            "not here",
        );
        let mut ctx = Context::new(&files, &[], &transport);

        let known = vec![Origin::new("https://repo.example")];
        assert_eq!(ctx.find_parent(&files[0], &known).await, None);
        // the default origin was still tried after the failure
        assert_eq!(transport.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_outcomes_are_cached_per_url() {
        let files = vec![child_pom()];
        let transport = StubTransport::new();
        let mut ctx = Context::new(&files, &[], &transport);

        let known = vec![Origin::new("https://repo.example")];
        assert_eq!(ctx.find_parent(&files[0], &known).await, None);
        let first_round = transport.requested().len();
        assert_eq!(ctx.find_parent(&files[0], &known).await, None);
        assert_eq!(transport.requested().len(), first_round);
    }

    #[tokio::test]
    async fn test_self_referential_parent_terminates() {
        let files = vec![DependencyFile::new(
            "pom.xml",
            "<project><groupId>com.example</groupId><artifactId>app</artifactId>\
             <parent><groupId>com.example</groupId><artifactId>app</artifactId>\
             </parent></project>",
        )];
        let transport = StubTransport::new();
        let mut ctx = Context::new(&files, &[], &transport);

        // No version on the self-referential declaration either, so remote
        // lookup is ruled out too.
        assert_eq!(ctx.find_parent(&files[0], &[]).await, None);
    }
}
