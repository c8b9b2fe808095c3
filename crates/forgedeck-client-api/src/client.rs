use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{
    ClientError,
    ClientResult,
};
use crate::types::*;

fn not_supported(what: &str) -> ClientError {
    ClientError::NotSupported(format!("{what} not supported by this forge"))
}

/// A forge client bound to one bearer credential.
///
/// The four action methods are the bulk runner's contract: each issues
/// exactly one HTTP request and either returns the human-readable success
/// message or a `ClientError` whose `Display` output is what callers show.
/// Implementations must not retry and must not let transport failures
/// escape as anything other than `ClientError::Transport`.
///
/// Everything beyond the actions has a default `NotSupported` implementation
/// so minimal forges (and test doubles) implement only what they need.
#[async_trait]
pub trait ForgeClient: Send + Sync {
    /// Follow an account. Success message: `Followed {login}`.
    async fn follow(&self, login: &str) -> ClientResult<String>;

    /// Unfollow an account. Success message: `Unfollowed {login}`.
    async fn unfollow(&self, login: &str) -> ClientResult<String>;

    /// Star a repository. Success message: `Starred {owner}/{repo}`.
    async fn star(&self, owner: &str, repo: &str) -> ClientResult<String>;

    /// Unstar a repository. Success message: `Unstarred {owner}/{repo}`.
    async fn unstar(&self, owner: &str, repo: &str) -> ClientResult<String>;

    /// Validate the bound credential by fetching the authenticated user.
    async fn validate_token(&self) -> ClientResult<UserProfile> {
        Err(not_supported("token validation"))
    }

    async fn user_info(&self, _login: &str) -> ClientResult<UserProfile> {
        Err(not_supported("user lookup"))
    }

    async fn search_users(&self, _query: &str) -> ClientResult<Vec<UserSummary>> {
        Err(not_supported("user search"))
    }

    /// Accounts the authenticated user follows.
    async fn following(&self) -> ClientResult<Vec<UserSummary>> {
        Err(not_supported("follow listing"))
    }

    /// Repositories of the authenticated user.
    async fn repositories(&self) -> ClientResult<Vec<Repository>> {
        Err(not_supported("repository listing"))
    }

    async fn create_repository(
        &self, _name: &str, _description: &str, _private: bool,
    ) -> ClientResult<Repository> {
        Err(not_supported("repository creation"))
    }

    /// Directory listing or single-file entry at `path` (empty = repo root).
    async fn contents(
        &self, _owner: &str, _repo: &str, _path: &str,
    ) -> ClientResult<Vec<ContentEntry>> {
        Err(not_supported("content browsing"))
    }

    /// Create a new file from raw bytes. Success message: `Uploaded {name}`.
    async fn upload_file(
        &self, _owner: &str, _repo: &str, _path: &str, _content: &[u8],
    ) -> ClientResult<String> {
        Err(not_supported("file upload"))
    }

    /// Replace an existing file identified by its blob `sha`.
    async fn update_file(
        &self, _owner: &str, _repo: &str, _path: &str, _message: &str, _content: &str, _sha: &str,
    ) -> ClientResult<ContentEntry> {
        Err(not_supported("file update"))
    }

    /// Delete a file identified by its blob `sha`.
    async fn delete_file(
        &self, _owner: &str, _repo: &str, _path: &str, _message: &str, _sha: &str,
    ) -> ClientResult<String> {
        Err(not_supported("file deletion"))
    }

    async fn update_profile(&self, _update: &ProfileUpdate) -> ClientResult<UserProfile> {
        Err(not_supported("profile editing"))
    }

    async fn set_wiki_enabled(
        &self, _owner: &str, _repo: &str, _enabled: bool,
    ) -> ClientResult<String> {
        Err(not_supported("wiki toggling"))
    }

    async fn create_branch(
        &self, _owner: &str, _repo: &str, _branch: &str, _base_sha: &str,
    ) -> ClientResult<String> {
        Err(not_supported("branch creation"))
    }

    async fn delete_branch(&self, _owner: &str, _repo: &str, _branch: &str) -> ClientResult<String> {
        Err(not_supported("branch deletion"))
    }
}

/// Builds a fresh `ForgeClient` bound to one credential. The bulk runner
/// constructs one client per credential context per run.
pub trait ForgeClientFactory: Send + Sync {
    fn create(&self, token: &str) -> ClientResult<Arc<dyn ForgeClient>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ActionsOnly;

    #[async_trait]
    impl ForgeClient for ActionsOnly {
        async fn follow(&self, login: &str) -> ClientResult<String> {
            Ok(format!("Followed {login}"))
        }

        async fn unfollow(&self, login: &str) -> ClientResult<String> {
            Ok(format!("Unfollowed {login}"))
        }

        async fn star(&self, owner: &str, repo: &str) -> ClientResult<String> {
            Ok(format!("Starred {owner}/{repo}"))
        }

        async fn unstar(&self, owner: &str, repo: &str) -> ClientResult<String> {
            Ok(format!("Unstarred {owner}/{repo}"))
        }
    }

    #[tokio::test]
    async fn test_minimal_impl_covers_actions() {
        let client = ActionsOnly;
        assert_eq!(client.follow("alice").await.unwrap(), "Followed alice");
        assert_eq!(client.star("a", "b").await.unwrap(), "Starred a/b");
    }

    #[tokio::test]
    async fn test_extended_surface_defaults_to_not_supported() {
        let client = ActionsOnly;
        let err = client.repositories().await.unwrap_err();
        assert!(matches!(err, ClientError::NotSupported(_)));
    }
}
