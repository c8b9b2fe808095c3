//! Base URL handling for the GitHub client

pub const DEFAULT_BASE_URL: &str = "https://github.com";

/// Builds the API URL from the base URL
///
/// GitHub Enterprise serves the API under `/api/v3`, while github.com uses
/// the dedicated `api.github.com` host.
pub(crate) fn build_api_url(base_url: &str) -> String {
    if base_url.contains("github.com") && !base_url.contains("api.github.com") {
        "https://api.github.com".to_string()
    } else {
        format!("{}/api/v3", base_url.trim_end_matches('/'))
    }
}

/// Last path segment of an upload target, mirroring how files picked from a
/// local filesystem dialog are named in the repository.
pub(crate) fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
