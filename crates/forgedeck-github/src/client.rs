use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use forgedeck_client_api::{
    ClientError,
    ClientResult,
    ContentEntry,
    ForgeClient,
    ForgeClientFactory,
    ProfileUpdate,
    Repository,
    UserProfile,
    UserSummary,
};
use reqwest::{
    Method,
    RequestBuilder,
    Response,
    StatusCode,
};
use secrecy::{
    ExposeSecret,
    SecretString,
};
use tracing::debug;

use crate::config;
use crate::types;

/// GitHub REST client bound to one bearer credential.
pub struct GitHubClient {
    http: reqwest::Client,
    token: SecretString,
    api_url: String,
}

impl GitHubClient {
    const API_TIMEOUT_SECS: u64 = 30;

    pub fn new(token: &str, base_url: &str) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::API_TIMEOUT_SECS))
            .user_agent("forgedeck")
            .build()
            .map_err(|e| ClientError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            token: SecretString::from(token.to_string()),
            api_url: config::build_api_url(base_url),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.api_url, path))
            .header(
                "Authorization",
                format!("token {}", self.token.expose_secret()),
            )
            .header("Accept", "application/vnd.github+json")
    }

    async fn send(&self, builder: RequestBuilder) -> ClientResult<Response> {
        builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))
    }

    /// Reduces an action response: 204 No Content yields the success
    /// message, anything else the status error.
    fn action_outcome(status: StatusCode, message: String) -> ClientResult<String> {
        if status == StatusCode::NO_CONTENT {
            Ok(message)
        } else {
            Err(ClientError::Api {
                status: status.as_u16(),
            })
        }
    }

    /// Consumes a failed response, logging the forge's own message before
    /// reducing it to the numeric status.
    async fn status_error(response: Response) -> ClientError {
        let status = response.status().as_u16();
        if let Ok(body) = response.json::<types::ApiErrorBody>().await {
            if !body.message.is_empty() {
                debug!(status, message = %body.message, "GitHub API error");
            }
        }
        ClientError::Api { status }
    }

    async fn expect_json<T: serde::de::DeserializeOwned>(
        response: Response, expected: &[StatusCode],
    ) -> ClientResult<T> {
        if expected.contains(&response.status()) {
            response
                .json::<T>()
                .await
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))
        } else {
            Err(Self::status_error(response).await)
        }
    }

    async fn expect_status(response: Response, expected: &[StatusCode]) -> ClientResult<()> {
        if expected.contains(&response.status()) {
            Ok(())
        } else {
            Err(Self::status_error(response).await)
        }
    }
}

#[async_trait]
impl ForgeClient for GitHubClient {
    async fn follow(&self, login: &str) -> ClientResult<String> {
        let response = self
            .send(self.request(Method::PUT, &format!("/user/following/{login}")))
            .await?;
        Self::action_outcome(response.status(), format!("Followed {login}"))
    }

    async fn unfollow(&self, login: &str) -> ClientResult<String> {
        let response = self
            .send(self.request(Method::DELETE, &format!("/user/following/{login}")))
            .await?;
        Self::action_outcome(response.status(), format!("Unfollowed {login}"))
    }

    async fn star(&self, owner: &str, repo: &str) -> ClientResult<String> {
        let response = self
            .send(self.request(Method::PUT, &format!("/user/starred/{owner}/{repo}")))
            .await?;
        Self::action_outcome(response.status(), format!("Starred {owner}/{repo}"))
    }

    async fn unstar(&self, owner: &str, repo: &str) -> ClientResult<String> {
        let response = self
            .send(self.request(Method::DELETE, &format!("/user/starred/{owner}/{repo}")))
            .await?;
        Self::action_outcome(response.status(), format!("Unstarred {owner}/{repo}"))
    }

    async fn validate_token(&self) -> ClientResult<UserProfile> {
        let response = self.send(self.request(Method::GET, "/user")).await?;
        match response.status() {
            StatusCode::OK => response
                .json::<UserProfile>()
                .await
                .map_err(|e| ClientError::InvalidResponse(e.to_string())),
            status => Err(ClientError::AuthenticationFailed(format!(
                "Error {}: Token invalid",
                status.as_u16()
            ))),
        }
    }

    async fn user_info(&self, login: &str) -> ClientResult<UserProfile> {
        let response = self
            .send(self.request(Method::GET, &format!("/users/{login}")))
            .await?;
        Self::expect_json(response, &[StatusCode::OK]).await
    }

    async fn search_users(&self, query: &str) -> ClientResult<Vec<UserSummary>> {
        let response = self
            .send(self.request(
                Method::GET,
                &format!("/search/users?q={}", urlencoding::encode(query)),
            ))
            .await?;
        let page: types::SearchPage = Self::expect_json(response, &[StatusCode::OK]).await?;
        Ok(page.items)
    }

    async fn following(&self) -> ClientResult<Vec<UserSummary>> {
        let response = self
            .send(self.request(Method::GET, "/user/following?per_page=100"))
            .await?;
        Self::expect_json(response, &[StatusCode::OK]).await
    }

    async fn repositories(&self) -> ClientResult<Vec<Repository>> {
        let response = self
            .send(self.request(Method::GET, "/user/repos?per_page=100"))
            .await?;
        Self::expect_json(response, &[StatusCode::OK]).await
    }

    async fn create_repository(
        &self, name: &str, description: &str, private: bool,
    ) -> ClientResult<Repository> {
        let body = serde_json::json!({
            "name": name,
            "description": description,
            "private": private,
        });
        let response = self
            .send(self.request(Method::POST, "/user/repos").json(&body))
            .await?;
        Self::expect_json(response, &[StatusCode::CREATED]).await
    }

    async fn contents(
        &self, owner: &str, repo: &str, path: &str,
    ) -> ClientResult<Vec<ContentEntry>> {
        let response = self
            .send(self.request(
                Method::GET,
                &format!("/repos/{owner}/{repo}/contents/{path}"),
            ))
            .await?;
        let contents: types::ContentsResponse =
            Self::expect_json(response, &[StatusCode::OK]).await?;
        Ok(contents.into_entries())
    }

    async fn upload_file(
        &self, owner: &str, repo: &str, path: &str, content: &[u8],
    ) -> ClientResult<String> {
        let name = config::file_name(path);
        let body = serde_json::json!({
            "message": format!("Add {name}"),
            "content": BASE64.encode(content),
        });
        let response = self
            .send(
                self.request(
                    Method::PUT,
                    &format!("/repos/{owner}/{repo}/contents/{name}"),
                )
                .json(&body),
            )
            .await?;
        Self::expect_status(response, &[StatusCode::OK, StatusCode::CREATED]).await?;
        Ok(format!("Uploaded {name}"))
    }

    async fn update_file(
        &self, owner: &str, repo: &str, path: &str, message: &str, content: &str, sha: &str,
    ) -> ClientResult<ContentEntry> {
        let body = serde_json::json!({
            "message": message,
            "content": BASE64.encode(content.as_bytes()),
            "sha": sha,
        });
        let response = self
            .send(
                self.request(
                    Method::PUT,
                    &format!("/repos/{owner}/{repo}/contents/{path}"),
                )
                .json(&body),
            )
            .await?;
        let written: types::ContentWriteResponse =
            Self::expect_json(response, &[StatusCode::OK, StatusCode::CREATED]).await?;
        Ok(written.content)
    }

    async fn delete_file(
        &self, owner: &str, repo: &str, path: &str, message: &str, sha: &str,
    ) -> ClientResult<String> {
        let body = serde_json::json!({
            "message": message,
            "sha": sha,
        });
        let response = self
            .send(
                self.request(
                    Method::DELETE,
                    &format!("/repos/{owner}/{repo}/contents/{path}"),
                )
                .json(&body),
            )
            .await?;
        Self::expect_status(response, &[StatusCode::OK]).await?;
        Ok(format!("File '{path}' deleted"))
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<UserProfile> {
        let response = self
            .send(self.request(Method::PATCH, "/user").json(update))
            .await?;
        Self::expect_json(response, &[StatusCode::OK]).await
    }

    async fn set_wiki_enabled(
        &self, owner: &str, repo: &str, enabled: bool,
    ) -> ClientResult<String> {
        let body = serde_json::json!({ "has_wiki": enabled });
        let response = self
            .send(
                self.request(Method::PATCH, &format!("/repos/{owner}/{repo}"))
                    .json(&body),
            )
            .await?;
        Self::expect_status(response, &[StatusCode::OK]).await?;
        Ok(if enabled {
            "Wiki enabled.".to_string()
        } else {
            "Wiki disabled.".to_string()
        })
    }

    async fn create_branch(
        &self, owner: &str, repo: &str, branch: &str, base_sha: &str,
    ) -> ClientResult<String> {
        let body = serde_json::json!({
            "ref": format!("refs/heads/{branch}"),
            "sha": base_sha,
        });
        let response = self
            .send(
                self.request(Method::POST, &format!("/repos/{owner}/{repo}/git/refs"))
                    .json(&body),
            )
            .await?;
        Self::expect_status(response, &[StatusCode::CREATED]).await?;
        Ok(format!("Branch '{branch}' created."))
    }

    async fn delete_branch(&self, owner: &str, repo: &str, branch: &str) -> ClientResult<String> {
        let response = self
            .send(self.request(
                Method::DELETE,
                &format!("/repos/{owner}/{repo}/git/refs/heads/{branch}"),
            ))
            .await?;
        Self::expect_status(response, &[StatusCode::NO_CONTENT]).await?;
        Ok(format!("Branch '{branch}' deleted."))
    }
}

/// Factory handed to the bulk runner; builds one `GitHubClient` per
/// credential context.
pub struct GitHubClientFactory {
    base_url: String,
}

impl GitHubClientFactory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for GitHubClientFactory {
    fn default() -> Self {
        Self::new(config::DEFAULT_BASE_URL)
    }
}

impl ForgeClientFactory for GitHubClientFactory {
    fn create(&self, token: &str) -> ClientResult<Arc<dyn ForgeClient>> {
        Ok(Arc::new(GitHubClient::new(token, &self.base_url)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_outcome_maps_no_content_to_message() {
        let result =
            GitHubClient::action_outcome(StatusCode::NO_CONTENT, "Followed alice".to_string());
        assert_eq!(result.unwrap(), "Followed alice");
    }

    #[test]
    fn test_action_outcome_maps_other_statuses_to_error() {
        let result =
            GitHubClient::action_outcome(StatusCode::NOT_FOUND, "Followed ghost".to_string());
        assert_eq!(result.unwrap_err().to_string(), "Error 404");

        let result = GitHubClient::action_outcome(StatusCode::OK, "Starred a/b".to_string());
        assert_eq!(result.unwrap_err().to_string(), "Error 200");
    }

    #[test]
    fn test_client_targets_public_api_host() {
        let client = GitHubClient::new("tok", "https://github.com").unwrap();
        assert_eq!(client.api_url, "https://api.github.com");

        let client = GitHubClient::new("tok", "https://github.corp.example").unwrap();
        assert_eq!(client.api_url, "https://github.corp.example/api/v3");
    }

    #[test]
    fn test_factory_builds_per_token_clients() {
        let factory = GitHubClientFactory::default();
        assert!(factory.create("token-a").is_ok());
        assert!(factory.create("token-b").is_ok());
    }
}
