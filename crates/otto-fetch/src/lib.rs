//! HTTP transport for registry and remote manifest fetching
//!
//! This crate is the network boundary of the otto update engine. It wraps
//! `reqwest` behind the [`Transport`] trait so that resolution code receives
//! its fetch function by injection and tests can substitute canned responses.
//!
//! # Example
//!
//! ```no_run
//! use otto_fetch::HttpClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new()?;
//!
//!     let response = client
//!         .get("https://repo.maven.apache.org/maven2/junit/junit/4.13.2/junit-4.13.2.pom", 1)
//!         .await?;
//!     println!("{} ({} bytes)", response.status, response.body.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;

pub use client::{FetchResponse, HttpClient, RegistryRateLimiter, Transport};
pub use error::{Error, Result};

// Re-exported so downstream crates can construct and inspect responses
// without depending on reqwest directly.
pub use reqwest::StatusCode;
