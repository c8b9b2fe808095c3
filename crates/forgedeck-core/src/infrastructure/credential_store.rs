use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{
    CredentialContext,
    DomainError,
    DomainResult,
};

/// Storage for named account credentials.
///
/// Names are unique keys; token values are not. Implementations own
/// persistence only; validation against the forge happens before `put` at
/// the caller's discretion.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// All stored credentials, in a stable order.
    async fn list(&self) -> DomainResult<Vec<CredentialContext>>;

    async fn get(&self, name: &str) -> DomainResult<String>;

    /// Inserts or replaces the credential under `name`.
    async fn put(&self, name: &str, token: &str) -> DomainResult<()>;

    /// Removes the credential under `name`. Removing an absent name is not
    /// an error.
    async fn delete(&self, name: &str) -> DomainResult<()>;

    async fn rename(&self, old_name: &str, new_name: &str) -> DomainResult<()> {
        if old_name == new_name {
            return Ok(());
        }
        if self.get(new_name).await.is_ok() {
            return Err(DomainError::CredentialExists(new_name.to_string()));
        }
        let token = self.get(old_name).await?;
        self.put(new_name, &token).await?;
        self.delete(old_name).await
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.is_empty() {
        return Err(DomainError::InvalidInput(
            "Account name cannot be empty".to_string(),
        ));
    }
    if name.contains('=') || name.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidInput(format!(
            "Account name cannot contain '=' or whitespace: {name}"
        )));
    }
    Ok(())
}

pub struct MemoryCredentialStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn with_credentials(credentials: Vec<CredentialContext>) -> Self {
        let entries = credentials
            .into_iter()
            .map(|c| (c.name, c.token))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn list(&self) -> DomainResult<Vec<CredentialContext>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::InternalError(format!("Lock poisoned: {e}")))?;
        Ok(entries
            .iter()
            .map(|(name, token)| CredentialContext::new(name.clone(), token.clone()))
            .collect())
    }

    async fn get(&self, name: &str) -> DomainResult<String> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::InternalError(format!("Lock poisoned: {e}")))?;
        entries
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::CredentialNotFound(name.to_string()))
    }

    async fn put(&self, name: &str, token: &str) -> DomainResult<()> {
        validate_name(name)?;
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::InternalError(format!("Lock poisoned: {e}")))?;
        entries.insert(name.to_string(), token.to_string());
        Ok(())
    }

    async fn delete(&self, name: &str) -> DomainResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::InternalError(format!("Lock poisoned: {e}")))?;
        entries.remove(name);
        Ok(())
    }
}

/// Flat dotenv-style credential file: one `FORGE_TOKEN_<name>=<token>` line
/// per account. Lines that do not carry the prefix are preserved verbatim
/// on rewrite, so the file can double as a generic env file.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    const PREFIX: &'static str = "FORGE_TOKEN_";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user config dir.
    pub fn default_location() -> DomainResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("forgedeck").join("accounts.env"))
            .ok_or_else(|| {
                DomainError::StoreError("Could not resolve user config directory".to_string())
            })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read_lines(&self) -> DomainResult<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| DomainError::StoreError(format!("Failed to read {:?}: {e}", self.path)))?;
        Ok(text.lines().map(str::to_string).collect())
    }

    // Write-temp-then-rename so a crash mid-write cannot truncate the file.
    fn write_lines(&self, lines: &[String]) -> DomainResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::StoreError(format!("Failed to create {parent:?}: {e}"))
            })?;
        }
        let mut text = lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        let tmp = self.path.with_extension("env.tmp");
        std::fs::write(&tmp, text)
            .map_err(|e| DomainError::StoreError(format!("Failed to write {tmp:?}: {e}")))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| DomainError::StoreError(format!("Failed to replace {:?}: {e}", self.path)))
    }

    fn parse_entry(line: &str) -> Option<(String, String)> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        let (key, value) = trimmed.split_once('=')?;
        let name = key.trim().strip_prefix(Self::PREFIX)?;
        Some((name.to_string(), value.trim().to_string()))
    }

    fn entry_line(name: &str, token: &str) -> String {
        format!("{}{name}={token}", Self::PREFIX)
    }

    fn is_entry_for(line: &str, name: &str) -> bool {
        matches!(Self::parse_entry(line), Some((n, _)) if n == name)
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn list(&self) -> DomainResult<Vec<CredentialContext>> {
        Ok(self
            .read_lines()?
            .iter()
            .filter_map(|line| Self::parse_entry(line))
            .map(|(name, token)| CredentialContext::new(name, token))
            .collect())
    }

    async fn get(&self, name: &str) -> DomainResult<String> {
        self.read_lines()?
            .iter()
            .filter_map(|line| Self::parse_entry(line))
            .find(|(n, _)| n == name)
            .map(|(_, token)| token)
            .ok_or_else(|| DomainError::CredentialNotFound(name.to_string()))
    }

    async fn put(&self, name: &str, token: &str) -> DomainResult<()> {
        validate_name(name)?;
        let mut lines = self.read_lines()?;
        let replacement = Self::entry_line(name, token);
        if let Some(existing) = lines.iter_mut().find(|l| Self::is_entry_for(l, name)) {
            *existing = replacement;
        } else {
            lines.push(replacement);
        }
        self.write_lines(&lines)
    }

    async fn delete(&self, name: &str) -> DomainResult<()> {
        let mut lines = self.read_lines()?;
        lines.retain(|l| !Self::is_entry_for(l, name));
        self.write_lines(&lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryCredentialStore::new();

        store.put("work", "token-1").await.unwrap();
        assert_eq!(store.get("work").await.unwrap(), "token-1");

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "work");

        store.delete("work").await.unwrap();
        assert!(store.get("work").await.is_err());
    }

    #[tokio::test]
    async fn test_memory_store_with_initial_credentials() {
        let store = MemoryCredentialStore::with_credentials(vec![
            CredentialContext::new("a", "token-a"),
            CredentialContext::new("b", "token-b"),
        ]);

        assert_eq!(store.get("a").await.unwrap(), "token-a");
        assert_eq!(store.get("b").await.unwrap(), "token-b");
    }

    #[tokio::test]
    async fn test_rename_moves_token_and_rejects_collisions() {
        let store = MemoryCredentialStore::new();
        store.put("old", "token").await.unwrap();
        store.put("taken", "other").await.unwrap();

        assert!(matches!(
            store.rename("old", "taken").await,
            Err(DomainError::CredentialExists(_))
        ));

        store.rename("old", "new").await.unwrap();
        assert_eq!(store.get("new").await.unwrap(), "token");
        assert!(store.get("old").await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_names_rejected() {
        let store = MemoryCredentialStore::new();
        assert!(store.put("", "t").await.is_err());
        assert!(store.put("has space", "t").await.is_err());
        assert!(store.put("has=eq", "t").await.is_err());
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("accounts.env"));

        store.put("work", "ghp_work").await.unwrap();
        store.put("personal", "ghp_personal").await.unwrap();

        assert_eq!(store.get("work").await.unwrap(), "ghp_work");
        assert_eq!(store.list().await.unwrap().len(), 2);

        // Replacing keeps a single line per name.
        store.put("work", "ghp_rotated").await.unwrap();
        assert_eq!(store.get("work").await.unwrap(), "ghp_rotated");
        assert_eq!(store.list().await.unwrap().len(), 2);

        store.delete("work").await.unwrap();
        assert!(store.get("work").await.is_err());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_file_store_preserves_foreign_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.env");
        std::fs::write(&path, "# accounts\nOTHER_VAR=1\n").unwrap();

        let store = FileCredentialStore::new(&path);
        store.put("work", "token").await.unwrap();
        store.delete("missing").await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("# accounts"));
        assert!(text.contains("OTHER_VAR=1"));
        assert!(text.contains("FORGE_TOKEN_work=token"));
    }

    #[tokio::test]
    async fn test_file_store_missing_file_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("absent.env"));
        assert!(store.list().await.unwrap().is_empty());
        assert!(matches!(
            store.get("anyone").await,
            Err(DomainError::CredentialNotFound(_))
        ));
    }
}
