//! Bearer token storage.
//!
//! The token is the only state persisted on the client. It lives in memory
//! behind a lock and, when a path is configured, in a single file so it
//! survives between runs.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors that can occur when persisting the token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Reading or writing the token file failed.
    #[error("token file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Shared holder for the current bearer token.
///
/// Cheap to clone; all clones see the same token.
#[derive(Clone, Default)]
pub struct TokenStore {
    inner: Arc<TokenStoreInner>,
}

#[derive(Default)]
struct TokenStoreInner {
    path: Option<PathBuf>,
    token: RwLock<Option<SecretString>>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("path", &self.inner.path)
            .field("token", &self.get().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl TokenStore {
    /// An in-memory store that never touches the filesystem.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// An in-memory store pre-loaded with a token.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::in_memory();
        store.replace(Some(SecretString::from(token.into())));
        store
    }

    /// Open a file-backed store, loading any token already on disk.
    ///
    /// A missing file means "logged out" and is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TokenError> {
        let path = path.into();
        let token = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let trimmed = contents.trim();
                (!trimmed.is_empty()).then(|| SecretString::from(trimmed.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(source) => return Err(TokenError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), present = token.is_some(), "Loaded token store");

        Ok(Self {
            inner: Arc::new(TokenStoreInner {
                path: Some(path),
                token: RwLock::new(token),
            }),
        })
    }

    /// The current token, if any.
    #[must_use]
    pub fn get(&self) -> Option<SecretString> {
        self.inner
            .token
            .read()
            .map_or_else(|poisoned| poisoned.into_inner().clone(), |guard| guard.clone())
    }

    /// Whether a token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    /// Store a new token, persisting it when file-backed.
    ///
    /// # Errors
    ///
    /// Returns an error if the token file cannot be written.
    pub fn set(&self, token: impl Into<String>) -> Result<(), TokenError> {
        let token = SecretString::from(token.into());
        if let Some(path) = &self.inner.path {
            write_token_file(path, token.expose_secret())?;
        }
        self.replace(Some(token));
        Ok(())
    }

    /// Remove the token, deleting the file when file-backed.
    ///
    /// # Errors
    ///
    /// Returns an error if the token file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), TokenError> {
        if let Some(path) = &self.inner.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(TokenError::Io {
                        path: path.clone(),
                        source,
                    });
                }
            }
        }
        self.replace(None);
        Ok(())
    }

    fn replace(&self, token: Option<SecretString>) {
        match self.inner.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }
}

fn write_token_file(path: &Path, token: &str) -> Result<(), TokenError> {
    let io_err = |source| TokenError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, token).map_err(io_err)
}
