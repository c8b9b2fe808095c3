/// A named bearer credential for one forge account.
///
/// The name is the lookup key and is unique within a store; token values are
/// not deduplicated (nothing stops a user from saving the same token twice
/// under two names).
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialContext {
    pub name: String,
    pub token: String,
}

impl CredentialContext {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
        }
    }
}

// Keep tokens out of log output.
impl std::fmt::Debug for CredentialContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialContext")
            .field("name", &self.name)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let credential = CredentialContext::new("work", "ghp_secret");
        let rendered = format!("{credential:?}");
        assert!(rendered.contains("work"));
        assert!(!rendered.contains("ghp_secret"));
    }
}
