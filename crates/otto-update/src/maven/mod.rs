//! Maven ecosystem support
//!
//! POM manifests inherit from parent manifests that may live in the working
//! file set or behind a repository URL. Everything that walks that chain
//! (origin collection, property resolution, parent lookup) goes through a
//! per-run [`Context`] so network results and property values are cached for
//! exactly one top-level update call and then discarded.

pub mod pom;
pub mod pom_fetcher;
pub mod properties;
pub mod repositories;
pub mod updater;

use crate::credentials::Credential;
use crate::types::DependencyFile;
use otto_fetch::Transport;
use std::collections::{HashMap, HashSet};

/// Upper bound on any ancestor walk. Normal chains terminate naturally well
/// below this; the bound exists so a malformed cyclic declaration stops
/// instead of looping.
pub const MAX_PARENT_DEPTH: usize = 16;

/// Per-run resolution state.
///
/// Constructed inside one `updated_dependency_files` call and dropped with
/// it; concurrent top-level calls must not share a context (the transport
/// itself may be shared).
pub struct Context<'a> {
    pub(crate) files: &'a [DependencyFile],
    pub(crate) credentials: &'a [Credential],
    pub(crate) transport: &'a dyn Transport,
    /// Fetch outcome per exact request URL; rejected responses cache as `None`
    pub(crate) pom_cache: HashMap<String, Option<String>>,
    /// Resolved property values per `(file name, property name)`
    pub(crate) property_cache: HashMap<(String, String), Option<String>>,
    /// Guard against self-referential property lookups
    pub(crate) in_flight: HashSet<(String, String)>,
}

impl<'a> Context<'a> {
    /// Create a context over one working file set
    pub fn new(
        files: &'a [DependencyFile],
        credentials: &'a [Credential],
        transport: &'a dyn Transport,
    ) -> Self {
        Self {
            files,
            credentials,
            transport,
            pom_cache: HashMap::new(),
            property_cache: HashMap::new(),
            in_flight: HashSet::new(),
        }
    }

    /// Look a file up by name within the working set
    pub(crate) fn file_named(&self, name: &str) -> Option<&'a DependencyFile> {
        self.files.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use otto_fetch::{FetchResponse, StatusCode, Transport};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned-response transport: configured URLs answer with a status and
    /// body, everything else fails at the transport level.
    pub(crate) struct StubTransport {
        responses: HashMap<String, (u16, String)>,
        requested: Mutex<Vec<String>>,
    }

    impl StubTransport {
        pub(crate) fn new() -> Self {
            Self {
                responses: HashMap::new(),
                requested: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn respond(mut self, url: &str, status: u16, body: &str) -> Self {
            self.responses
                .insert(url.to_string(), (status, body.to_string()));
            self
        }

        pub(crate) fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Transport for StubTransport {
        async fn get(&self, url: &str, _retry_limit: u32) -> otto_fetch::Result<FetchResponse> {
            self.requested.lock().unwrap().push(url.to_string());
            match self.responses.get(url) {
                Some((status, body)) => Ok(FetchResponse {
                    status: StatusCode::from_u16(*status).expect("valid status in stub"),
                    body: body.clone(),
                }),
                None => Err(otto_fetch::Error::other(format!("no route to {url}"))),
            }
        }
    }
}
