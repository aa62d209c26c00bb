//! Persisted session: the current identity, its role flag and the bearer token.
//!
//! The session lives in a small string key/value medium so it survives
//! restarts. The medium may be unavailable (no writable data directory, a
//! sandboxed context); the store then behaves as empty and every write is a
//! no-op. Medium failures are logged and swallowed here, never surfaced.
//!
//! Only [`AuthSession`](crate::AuthSession) writes through this store; everyone
//! else may read.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, anyhow};

use academia_auth::{BearerToken, Identity, Role};

pub const CURRENT_USER_KEY: &str = "currentUser";
pub const USER_ROLE_KEY: &str = "userRole";
pub const TOKEN_KEY: &str = "token";

/// String key/value persistence medium.
pub trait KeyValueStore: Send + Sync {
    /// `false` when the medium does not exist in this context at all.
    fn is_available(&self) -> bool {
        true
    }

    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    fn remove(&self, key: &str) -> anyhow::Result<()>;

    /// Remove every key.
    fn clear(&self) -> anyhow::Result<()>;
}

/// Process-local medium. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> anyhow::Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        self.entries()?.clear();
        Ok(())
    }
}

/// One JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub const FILE_NAME: &'static str = "session.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `<dir>/session.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> anyhow::Result<HashMap<String, String>> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("session file {:?} is not a JSON object of strings", self.path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e).with_context(|| format!("failed to read session file {:?}", self.path)),
        }
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create session directory {:?}", parent))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(entries).context("failed to encode session file")?;
        std::fs::write(&tmp, bytes).with_context(|| format!("failed to write {:?}", tmp))?;
        std::fs::rename(&tmp, &self.path).with_context(|| format!("failed to replace {:?}", self.path))?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut HashMap<String, String>)) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().map_err(|_| anyhow!("file store lock poisoned"))?;
        let mut entries = self.read_all()?;
        f(&mut entries);
        self.write_all(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().map_err(|_| anyhow!("file store lock poisoned"))?;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to remove {:?}", self.path)),
        }
    }
}

/// A context with no persistence medium at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn is_available(&self) -> bool {
        false
    }

    fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        Err(anyhow!("no persistence medium in this context"))
    }

    fn remove(&self, _key: &str) -> anyhow::Result<()> {
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Typed view over a [`KeyValueStore`] using the fixed session keys.
#[derive(Clone)]
pub struct SessionStore {
    medium: Arc<dyn KeyValueStore>,
}

impl core::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStore")
            .field("available", &self.medium.is_available())
            .finish()
    }
}

impl SessionStore {
    pub fn new(medium: Arc<dyn KeyValueStore>) -> Self {
        Self { medium }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn unavailable() -> Self {
        Self::new(Arc::new(UnavailableStore))
    }

    /// File-backed when a directory is given, memory-only otherwise.
    pub fn for_dir(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::new(Arc::new(FileStore::in_dir(dir))),
            None => Self::in_memory(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.medium.is_available()
    }

    /// The persisted identity, if it exists and still validates.
    ///
    /// A record whose role flag disagrees with the stored user is treated as
    /// absent.
    pub fn load(&self) -> Option<Identity> {
        let raw = self.read(CURRENT_USER_KEY)?;
        let identity: Identity = match serde_json::from_str(&raw) {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable persisted identity");
                return None;
            }
        };

        if let Some(flag) = self.read(USER_ROLE_KEY) {
            match flag.parse::<Role>() {
                Ok(role) if role == identity.role() => {}
                _ => {
                    tracing::warn!(flag = %flag, role = %identity.role(), "persisted role flag disagrees with identity");
                    return None;
                }
            }
        }

        Some(identity)
    }

    pub fn load_token(&self) -> Option<BearerToken> {
        self.read(TOKEN_KEY).map(BearerToken::new).filter(|t| !t.is_blank())
    }

    pub(crate) fn save(&self, identity: &Identity, token: &BearerToken) {
        if !self.medium.is_available() {
            tracing::debug!("no persistence medium; session kept in memory only");
            return;
        }

        let user = match serde_json::to_string(identity) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode identity for persistence");
                return;
            }
        };

        self.write(TOKEN_KEY, token.as_str());
        self.write(CURRENT_USER_KEY, &user);
        self.write(USER_ROLE_KEY, identity.role().as_str());
    }

    pub(crate) fn clear(&self) {
        if !self.medium.is_available() {
            return;
        }
        if let Err(e) = self.medium.clear() {
            tracing::warn!(error = %e, "failed to clear persisted session; removing keys individually");
            for key in [TOKEN_KEY, CURRENT_USER_KEY, USER_ROLE_KEY] {
                if let Err(e) = self.medium.remove(key) {
                    tracing::warn!(key, error = %e, "failed to remove persisted session key");
                }
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        if !self.medium.is_available() {
            return None;
        }
        match self.medium.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "session store read failed");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.medium.set(key, value) {
            tracing::warn!(key, error = %e, "session store write failed");
        }
    }
}
