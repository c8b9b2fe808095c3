//! Wire-only response shapes for the GitHub REST API
//!
//! Shared result types live in `forgedeck-client-api`; this module only
//! holds the envelopes GitHub wraps them in.

use forgedeck_client_api::{
    ContentEntry,
    UserSummary,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchPage {
    #[serde(default)]
    pub items: Vec<UserSummary>,
}

/// Contents endpoint returns an array for directories and a bare object for
/// single files.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ContentsResponse {
    Many(Vec<ContentEntry>),
    One(ContentEntry),
}

impl ContentsResponse {
    pub fn into_entries(self) -> Vec<ContentEntry> {
        match self {
            ContentsResponse::Many(entries) => entries,
            ContentsResponse::One(entry) => vec![entry],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentWriteResponse {
    pub content: ContentEntry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contents_response_single_file() {
        let json = r#"{"name": "README.md", "path": "README.md", "sha": "abc", "type": "file"}"#;
        let response: ContentsResponse = serde_json::from_str(json).unwrap();
        let entries = response.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "README.md");
    }

    #[test]
    fn test_contents_response_directory() {
        let json = r#"[
            {"name": "a.rs", "path": "src/a.rs", "sha": "a1", "type": "file"},
            {"name": "b.rs", "path": "src/b.rs", "sha": "b2", "type": "file"}
        ]"#;
        let response: ContentsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_entries().len(), 2);
    }

    #[test]
    fn test_search_page_defaults_to_empty() {
        let page: SearchPage = serde_json::from_str(r#"{"total_count": 0}"#).unwrap();
        assert!(page.items.is_empty());
    }
}
