//! File-backed token persistence
//!
//! One JSON file per profile at `<config_path>/tokens/<profile>.token.json`.
//! Writes go to a temporary sibling first and are renamed over the target,
//! so a crash never leaves a torn token file behind.
//!
//! There is no file locking. Two processes sharing a config path and a
//! profile race on refresh; run one poller per profile.

use super::types::{AccessToken, AuthError, AuthResult};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::debug;

/// Directory under the config path that holds token files
pub const TOKENS_DIR: &str = "tokens";

/// Token storage for a single profile
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Create a store for `profile` under `config_path`
    pub fn new(config_path: &Path, profile: &str) -> Self {
        Self {
            path: Self::token_path(config_path, profile),
        }
    }

    /// Create a token store at a specific path
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Deterministic token file location for a profile
    pub fn token_path(config_path: &Path, profile: &str) -> PathBuf {
        config_path
            .join(TOKENS_DIR)
            .join(format!("{profile}.token.json"))
    }

    /// Location of the token file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token; `None` when no file exists
    ///
    /// Malformed contents are reported as [`AuthError::SerdeError`].
    pub async fn load(&self) -> AuthResult<Option<AccessToken>> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No stored token at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let token: AccessToken = serde_json::from_str(&data)?;
        debug!("Loaded stored token from {}", self.path.display());
        Ok(Some(token))
    }

    /// Replace the stored token
    pub async fn save(&self, token: &AccessToken) -> AuthResult<()> {
        static COUNTER: AtomicU32 = AtomicU32::new(0);

        let parent = self.path.parent().ok_or_else(|| {
            AuthError::StorageError(format!("Invalid token path: {}", self.path.display()))
        })?;
        tokio::fs::create_dir_all(parent).await?;

        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                AuthError::StorageError(format!("Invalid token path: {}", self.path.display()))
            })?;

        let data = serde_json::to_string_pretty(token)?;
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_path = parent.join(format!(".{file_name}.{}.{seq}.tmp", std::process::id()));

        tokio::fs::write(&tmp_path, data).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(AuthError::StorageError(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            )));
        }

        debug!("Stored token at {}", self.path.display());
        Ok(())
    }

    /// Remove the stored token; a missing file is not an error
    pub async fn delete(&self) -> AuthResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn token(access: &str) -> AccessToken {
        AccessToken {
            access_token: access.to_string(),
            refresh_token: "refresh".to_string(),
            expires_in: 7200,
            expires_at: 1_700_007_080,
            token_type: Some("bearer".to_string()),
        }
    }

    #[test]
    fn test_token_path_layout() {
        let path = TokenStore::token_path(Path::new("/etc/aruba"), "Default");
        assert_eq!(path, PathBuf::from("/etc/aruba/tokens/Default.token.json"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path(), "Default");
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path(), "Default");

        store.save(&token("first")).await.unwrap();
        store.save(&token("second")).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.access_token, "second");

        // Only the token file remains, no temp files
        let entries: Vec<_> = std::fs::read_dir(dir.path().join(TOKENS_DIR))
            .unwrap()
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path(), "Default");
        std::fs::create_dir_all(dir.path().join(TOKENS_DIR)).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, AuthError::SerdeError(_)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path(), "Default");

        store.save(&token("abc")).await.unwrap();
        store.delete().await.unwrap();
        store.delete().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path(), "Default");
        store.save(&token("abc")).await.unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
