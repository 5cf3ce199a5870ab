//! Persisted token storage - one file under the config directory.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::constants::{CONFIG_DIR, TOKEN_FILE};

/// Stores the bearer token on disk. The only durable client state.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR);
        Self::in_dir(config_dir)
    }

    /// Store rooted at an explicit directory (used by tests)
    pub fn in_dir(dir: PathBuf) -> Self {
        TokenStore {
            path: dir.join(TOKEN_FILE),
        }
    }

    /// Read the persisted token, if any
    pub fn load(&self) -> Option<String> {
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim().to_string();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }

    /// Persist the token, creating the config directory if needed
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(&self.path, token)?;
        Ok(())
    }

    /// Remove the persisted token. Idempotent.
    pub fn clear(&self) {
        let _ = fs::remove_file(&self.path);
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::in_dir(dir.path().join("cfg"));

        assert!(store.load().is_none());
        store.save("tok-abc").unwrap();
        assert_eq!(store.load().as_deref(), Some("tok-abc"));
        store.clear();
        assert!(store.load().is_none());
        // clearing again is fine
        store.clear();
    }

    #[test]
    fn test_blank_file_counts_as_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::in_dir(dir.path().to_path_buf());
        store.save("  \n").unwrap();
        assert!(store.load().is_none());
    }
}
