//! GitHub implementation of the Forgedeck client boundary
//!
//! One logical action maps to one REST call; responses are reduced to typed
//! results or a `ClientError` whose display text matches what the rest of
//! the stack renders.
//!
//! Modules:
//! - `client` - the `ForgeClient` implementation and its factory
//! - `config` - base URL handling (github.com vs. enterprise)
//! - `types` - wire-only response shapes

mod client;
mod config;
mod types;

pub use client::{
    GitHubClient,
    GitHubClientFactory,
};
pub use config::DEFAULT_BASE_URL;
