//! Locally cached API key
//!
//! A single credential string stored under a fixed key. It is read once at
//! startup to prefill the API key field and rewritten whenever the field
//! changes: a non-empty value is stored, an empty one clears the cache.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::app_dir;

/// Key the credential is stored under
pub const CREDENTIAL_KEY: &str = "gemini_api_key";

pub const CREDENTIALS_FILE_NAME: &str = "credentials.toml";

pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.interview-assistant/credentials.toml`
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(app_dir()?.join(CREDENTIALS_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached credential, if one was saved
    pub fn load(&self) -> Result<Option<String>> {
        Ok(self
            .read_entries()?
            .remove(CREDENTIAL_KEY)
            .filter(|v| !v.trim().is_empty()))
    }

    /// Follow a change of the API key field
    pub fn remember(&self, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return self.clear();
        }

        let mut entries = self.read_entries()?;
        entries.insert(CREDENTIAL_KEY.to_string(), value.to_string());
        self.write_entries(&entries)?;
        debug!("Cached API key at {}", self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(CREDENTIAL_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)?;
        debug!("Cleared cached API key");
        Ok(())
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let contents = toml::to_string(entries).context("Failed to serialize credentials")?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)
                .with_context(|| format!("Failed to restrict permissions on {}", self.path.display()))?;
        }

        Ok(())
    }
}

/// First four characters followed by a fixed-width mask
pub fn mask(value: &str) -> String {
    let visible: String = value.chars().take(4).collect();
    format!("{}{}", visible, "*".repeat(8))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("sub").join(CREDENTIALS_FILE_NAME));
        (dir, store)
    }

    #[test]
    fn test_empty_store() {
        let (_dir, store) = store();
        assert_eq!(store.load().unwrap(), None);
        // clearing nothing is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_remember_and_load() {
        let (_dir, store) = store();
        store.remember("  AIzaSyA1234567890abcdefghij ").unwrap();
        assert_eq!(
            store.load().unwrap().as_deref(),
            Some("AIzaSyA1234567890abcdefghij")
        );

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains(CREDENTIAL_KEY));
    }

    #[test]
    fn test_empty_value_clears() {
        let (_dir, store) = store();
        store.remember("AIzaSyA1234567890abcdefghij").unwrap();
        store.remember("   ").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = store();
        store.remember("AIzaSyA1234567890abcdefghij").unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("AIzaSyA1234567890"), "AIza********");
        assert_eq!(mask("ab"), "ab********");
    }
}
