use serde::{
    Deserialize,
    Serialize,
};

/// The closed set of bulk operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Follow,
    Unfollow,
    Star,
    Unstar,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Follow => "follow",
            OperationKind::Unfollow => "unfollow",
            OperationKind::Star => "star",
            OperationKind::Unstar => "unstar",
        }
    }

    /// Resolves a raw target string into the action to dispatch.
    ///
    /// Follow/unfollow take the whole string as an account handle. Star and
    /// unstar split on `/` and keep the last two segments, so full web URLs
    /// resolve to the same repository as a bare `owner/repo` pair. A
    /// star/unstar target with fewer than two segments cannot be resolved
    /// and yields `None`; the runner records those as skipped.
    pub fn resolve(&self, target: &str) -> Option<Action> {
        match self {
            OperationKind::Follow => Some(Action::Follow(target.to_string())),
            OperationKind::Unfollow => Some(Action::Unfollow(target.to_string())),
            OperationKind::Star => {
                parse_repo_target(target).map(|(owner, repo)| Action::Star { owner, repo })
            }
            OperationKind::Unstar => {
                parse_repo_target(target).map(|(owner, repo)| Action::Unstar { owner, repo })
            }
        }
    }
}

/// One resolved attempt: the operation plus the data it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Follow(String),
    Unfollow(String),
    Star { owner: String, repo: String },
    Unstar { owner: String, repo: String },
}

/// Takes the last two slash-delimited segments of a repository target.
/// Anything preceding them is ignored.
fn parse_repo_target(target: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = target.split('/').collect();
    if parts.len() >= 2 {
        Some((
            parts[parts.len() - 2].to_string(),
            parts[parts.len() - 1].to_string(),
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_takes_whole_target() {
        assert_eq!(
            OperationKind::Follow.resolve("alice"),
            Some(Action::Follow("alice".to_string()))
        );
    }

    #[test]
    fn test_star_takes_last_two_segments() {
        let expected = Action::Star {
            owner: "owner".to_string(),
            repo: "repo".to_string(),
        };
        assert_eq!(OperationKind::Star.resolve("owner/repo"), Some(expected));
    }

    #[test]
    fn test_url_and_bare_pair_resolve_identically() {
        assert_eq!(
            OperationKind::Star.resolve("https://forge.example/owner/repo"),
            OperationKind::Star.resolve("owner/repo"),
        );
    }

    #[test]
    fn test_star_without_slash_is_unresolvable() {
        assert_eq!(OperationKind::Star.resolve("not-a-valid-target"), None);
        assert_eq!(OperationKind::Unstar.resolve(""), None);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OperationKind::Unstar).unwrap(),
            "\"unstar\""
        );
        let kind: OperationKind = serde_json::from_str("\"follow\"").unwrap();
        assert_eq!(kind, OperationKind::Follow);
    }
}
