pub mod application;
pub mod domain;
pub mod event;
pub mod infrastructure;
pub mod logging;

use std::sync::Arc;

pub use application::{
    BulkService,
    RunHandle,
    RunId,
};
pub use domain::{
    Action,
    AttemptOutcome,
    CredentialContext,
    DomainError,
    DomainResult,
    OperationKind,
    RunSummary,
};
pub use event::{
    CoreEvent,
    EventBus,
    NoOpEventBus,
};
use forgedeck_client_api::ForgeClientFactory;
pub use infrastructure::{
    CredentialStore,
    FileCredentialStore,
    MemoryCredentialStore,
};

/// Everything a presentation layer embeds: the credential store it edits,
/// the bulk service it drives, and the event bus it listens on.
pub struct CoreContext {
    pub event_bus: Arc<dyn EventBus>,

    pub credential_store: Arc<dyn CredentialStore>,

    pub bulk: Arc<BulkService>,
}

impl CoreContext {
    pub fn new(
        event_bus: Arc<dyn EventBus>, credential_store: Arc<dyn CredentialStore>,
        client_factory: Arc<dyn ForgeClientFactory>,
    ) -> Self {
        let bulk = Arc::new(BulkService::new(client_factory, Arc::clone(&event_bus)));
        Self {
            event_bus,
            credential_store,
            bulk,
        }
    }

    /// GitHub-backed context with the credential file at its default
    /// location under the user config dir.
    pub fn github(event_bus: Arc<dyn EventBus>) -> anyhow::Result<Self> {
        let path = FileCredentialStore::default_location()?;
        Ok(Self::github_at(event_bus, path))
    }

    /// GitHub-backed context with an explicit credential file path.
    pub fn github_at(event_bus: Arc<dyn EventBus>, credentials_path: std::path::PathBuf) -> Self {
        let store = Arc::new(FileCredentialStore::new(credentials_path));
        let factory = Arc::new(forgedeck_github::GitHubClientFactory::default());
        Self::new(event_bus, store, factory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_github_context_wires_store_and_runner() {
        let dir = tempfile::tempdir().unwrap();
        let context =
            CoreContext::github_at(Arc::new(NoOpEventBus), dir.path().join("accounts.env"));

        context.credential_store.put("main", "token").await.unwrap();
        assert_eq!(context.credential_store.get("main").await.unwrap(), "token");
        assert!(!context.bulk.is_active().await);
    }
}
