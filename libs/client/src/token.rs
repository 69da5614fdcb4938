//! Bearer token lifecycle
//!
//! The token is written to two places: a persistent key-value store that only
//! the client reads, and a site-wide cookie that server-rendered requests can
//! see. Both are replaced wholesale on login and cleared together on logout.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use common::config::HubConfig;
use cookie::time::{Duration, OffsetDateTime};
use cookie::{Cookie, CookieJar};
use tracing::{info, warn};

/// Key of the token in the persistent store and name of the cookie
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Lifetime of the auth cookie in days
pub const AUTH_COOKIE_TTL_DAYS: i64 = 7;

/// Build the site-wide auth cookie carrying `token`
pub fn auth_cookie(token: impl Into<String>) -> Cookie<'static> {
    Cookie::build((AUTH_TOKEN_KEY, token.into()))
        .path("/")
        .max_age(Duration::days(AUTH_COOKIE_TTL_DAYS))
        .expires(OffsetDateTime::now_utc() + Duration::days(AUTH_COOKIE_TTL_DAYS))
        .build()
}

/// Build the cookie that removes the auth cookie
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((AUTH_TOKEN_KEY, "")).path("/").build();
    cookie.make_removal();
    cookie
}

/// Anything that can hand out the current bearer token
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// A fixed token, used for request-scoped server-side calls
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl TokenSource for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone().filter(|t| !t.is_empty())
    }
}

/// Client-readable persistent key-value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Store persisted as a JSON object in a single file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> io::Result<HashMap<String, String>> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e),
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, bytes)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        match self.load() {
            Ok(entries) => entries.get(key).cloned(),
            Err(e) => {
                warn!("Failed to read token store {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// Dual-written bearer token store
pub struct TokenStore {
    local: Arc<dyn KeyValueStore>,
    cookies: RwLock<CookieJar>,
}

impl TokenStore {
    pub fn new(local: Arc<dyn KeyValueStore>) -> Self {
        Self {
            local,
            cookies: RwLock::new(CookieJar::new()),
        }
    }

    /// Store backed by process memory only
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// File-backed store when `TOKEN_STORE_PATH` is set, in-memory otherwise
    pub fn from_config(config: &HubConfig) -> Self {
        match &config.token_store_path {
            Some(path) if !path.is_empty() => Self::new(Arc::new(FileStore::new(path))),
            _ => Self::in_memory(),
        }
    }

    /// Write the token to the persistent store and the cookie jar
    pub fn set(&self, token: &str) {
        if let Err(e) = self.local.set(AUTH_TOKEN_KEY, token) {
            warn!("Failed to persist auth token: {}", e);
        }
        self.cookies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add(auth_cookie(token));
        info!("Auth token stored");
    }

    /// Read the token, preferring the persistent store over the cookie
    pub fn get(&self) -> Option<String> {
        if let Some(token) = self.local.get(AUTH_TOKEN_KEY).filter(|t| !t.is_empty()) {
            return Some(token);
        }
        self.cookie_value()
    }

    /// Remove the token from both locations
    pub fn clear(&self) {
        if let Err(e) = self.local.remove(AUTH_TOKEN_KEY) {
            warn!("Failed to remove persisted auth token: {}", e);
        }
        self.cookies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(Cookie::build(AUTH_TOKEN_KEY).path("/"));
        info!("Auth token cleared");
    }

    /// The auth cookie currently held, if any
    pub fn cookie(&self) -> Option<Cookie<'static>> {
        self.cookies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(AUTH_TOKEN_KEY)
            .cloned()
    }

    fn cookie_value(&self) -> Option<String> {
        let cookie = self.cookie()?;
        let expired = cookie
            .expires_datetime()
            .is_some_and(|at| at <= OffsetDateTime::now_utc());
        if expired || cookie.value().is_empty() {
            return None;
        }
        Some(cookie.value().to_string())
    }
}

impl TokenSource for TokenStore {
    fn token(&self) -> Option<String> {
        self.get()
    }
}
