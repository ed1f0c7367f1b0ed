use serde_json::{Map, Value};
use std::fmt::{self, Debug, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "adminToken";

/// Small JSON key-value file used to persist the bearer token between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    fn entries(&self) -> io::Result<Map<String, Value>> {
        match fs::read_to_string(&self.path) {
            Ok(s) => Ok(serde_json::from_str(&s).unwrap_or_default()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e),
        }
    }
    pub fn load(&self) -> io::Result<Option<String>> {
        Ok(self
            .entries()?
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .map(String::from))
    }
    pub fn save(&self, token: Option<&str>) -> io::Result<()> {
        let mut entries = self.entries()?;
        match token {
            Some(token) => entries.insert(TOKEN_KEY.to_string(), Value::from(token)),
            None => entries.remove(TOKEN_KEY),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)
    }
}

/// Holds the admin session token and is handed to everything that talks to
/// the API.
#[derive(Clone, Default)]
pub struct AuthContext {
    token: Arc<RwLock<Option<String>>>,
    store: Option<TokenStore>,
}

impl Debug for AuthContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("logged_in", &self.is_logged_in())
            .field("store", &self.store)
            .finish()
    }
}

impl AuthContext {
    /// Creates a context, restoring a previously persisted token if any.
    pub fn new(store: Option<TokenStore>) -> Self {
        let token = store.as_ref().and_then(|store| match store.load() {
            Ok(token) => token,
            Err(e) => {
                log::warn!("failed to load token from {}: {e}", store.path().display());
                None
            }
        });
        Self {
            token: Arc::new(RwLock::new(token)),
            store,
        }
    }
    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|token| token.clone())
    }
    pub fn is_logged_in(&self) -> bool {
        self.token
            .read()
            .map(|token| token.is_some())
            .unwrap_or_default()
    }
    pub fn set_token(&self, token: String) {
        self.persist(Some(&token));
        if let Ok(mut current) = self.token.write() {
            current.replace(token);
        }
    }
    pub fn clear(&self) {
        self.persist(None);
        if let Ok(mut current) = self.token.write() {
            current.take();
        }
    }
    fn persist(&self, token: Option<&str>) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(token) {
                log::warn!("failed to persist token to {}: {e}", store.path().display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = TokenStore::new(dir.path().join("storage.json"));
        let auth = AuthContext::new(Some(store.clone()));
        assert!(!auth.is_logged_in());

        auth.set_token(String::from("mock-admin-token-1"));
        assert_eq!(auth.token().as_deref(), Some("mock-admin-token-1"));
        let restored = AuthContext::new(Some(store.clone()));
        assert_eq!(restored.token().as_deref(), Some("mock-admin-token-1"));

        restored.clear();
        assert!(!restored.is_logged_in());
        assert_eq!(store.load().expect("failed to load"), None);
    }

    #[test]
    fn keeps_other_entries() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("storage.json");
        fs::write(&path, r#"{"theme":"dark"}"#).expect("failed to write");
        let store = TokenStore::new(&path);
        store.save(Some("t")).expect("failed to save");
        store.save(None).expect("failed to save");
        let content = fs::read_to_string(&path).expect("failed to read");
        assert!(content.contains("theme"));
        assert!(!content.contains(TOKEN_KEY));
    }

    #[test]
    fn shared_between_clones() {
        let auth = AuthContext::new(None);
        let cloned = auth.clone();
        auth.set_token(String::from("t"));
        assert!(cloned.is_logged_in());
        cloned.clear();
        assert!(!auth.is_logged_in());
    }
}
