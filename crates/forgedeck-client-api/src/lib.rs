//! Forge client boundary for Forgedeck
//!
//! This crate defines the contract between the core (bulk runner, credential
//! management) and a concrete forge implementation:
//! - `client` - the `ForgeClient` trait and the per-credential factory
//! - `error` - typed errors with display-compatible messages
//! - `types` - data returned by forge calls

pub mod client;
pub mod error;
pub mod types;

pub use client::{
    ForgeClient,
    ForgeClientFactory,
};
pub use error::{
    ClientError,
    ClientResult,
};
pub use types::{
    ContentEntry,
    ProfileUpdate,
    Repository,
    UserProfile,
    UserSummary,
};
