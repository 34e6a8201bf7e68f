//! Durable cookie storage
//!
//! Session continuity across calls and process restarts comes from a cookie
//! store that round-trips durable storage on every request: the jar reloads
//! its backend before cookies are attached and writes through after every
//! `Set-Cookie`. The backend is injectable so tests can substitute an
//! in-memory store.
//!
//! Two client instances with the same email and session directory share one
//! store file; nothing locks it, so concurrent use under the same identity
//! is the caller's responsibility to serialize.

use crate::Result;
use reqwest::header::HeaderValue;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use url::Url;

/// Cookie name/value pairs grouped by domain
pub type CookieMap = BTreeMap<String, BTreeMap<String, String>>;

/// Read/write interface for persisted session cookies
pub trait CookieBackend: Send + Sync + std::fmt::Debug {
    /// Load the persisted cookie map, empty when nothing was stored yet
    fn load(&self) -> Result<CookieMap>;

    /// Persist the full cookie map
    fn store(&self, cookies: &CookieMap) -> Result<()>;
}

/// Stable hex hash of an account identifier, used to name its store file
pub fn identity_hash(identifier: &str) -> String {
    use sha2::{Digest, Sha256};
    hex::encode(Sha256::digest(identifier.as_bytes()))
}

/// Cookie backend persisting to a JSON file
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Backend at an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backend at the conventional per-identity location inside `dir`
    pub fn for_identity(dir: &Path, identifier: &str) -> Self {
        Self::new(dir.join(format!("{}.json", identity_hash(identifier))))
    }

    /// Location of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CookieBackend for FileBackend {
    fn load(&self) -> Result<CookieMap> {
        if !self.path.exists() {
            return Ok(CookieMap::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(cookies) => Ok(cookies),
            Err(e) => {
                // A corrupted store only costs a re-login
                tracing::warn!(path = %self.path.display(), "discarding unreadable cookie store: {}", e);
                Ok(CookieMap::new())
            }
        }
    }

    fn store(&self, cookies: &CookieMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(cookies)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Cookie backend holding everything in memory, for tests and ephemeral
/// sessions
#[derive(Debug, Default)]
pub struct MemoryBackend {
    cookies: Mutex<CookieMap>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieBackend for MemoryBackend {
    fn load(&self) -> Result<CookieMap> {
        Ok(self.cookies.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn store(&self, cookies: &CookieMap) -> Result<()> {
        *self.cookies.lock().unwrap_or_else(|e| e.into_inner()) = cookies.clone();
        Ok(())
    }
}

/// Cookie jar plugged into the HTTP client, backed by a [`CookieBackend`]
#[derive(Debug)]
pub struct PersistentJar {
    backend: Box<dyn CookieBackend>,
    cookies: Mutex<CookieMap>,
}

impl PersistentJar {
    /// Create a jar over the given backend, seeded from its current state
    pub fn new(backend: Box<dyn CookieBackend>) -> Self {
        let cookies = backend.load().unwrap_or_else(|e| {
            tracing::warn!("cookie store unreadable, starting empty: {}", e);
            CookieMap::new()
        });

        Self {
            backend,
            cookies: Mutex::new(cookies),
        }
    }

    fn domain_of(url: &Url) -> String {
        url.host_str().unwrap_or_default().to_string()
    }
}

impl reqwest::cookie::CookieStore for PersistentJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let domain = Self::domain_of(url);
        let mut cookies = self.cookies.lock().unwrap_or_else(|e| e.into_inner());
        let entry = cookies.entry(domain).or_default();

        for header in cookie_headers {
            let Ok(line) = header.to_str() else {
                continue;
            };
            // Only the leading name=value pair matters for replaying the
            // session; attributes are dropped
            let pair = line.split(';').next().unwrap_or_default();
            if let Some((name, value)) = pair.split_once('=') {
                entry.insert(name.trim().to_string(), value.trim().to_string());
            }
        }

        if let Err(e) = self.backend.store(&cookies) {
            tracing::warn!("failed to persist cookie store: {}", e);
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let mut cookies = self.cookies.lock().unwrap_or_else(|e| e.into_inner());

        // Re-read the backend before every send so a store shared across
        // processes stays authoritative
        match self.backend.load() {
            Ok(loaded) => *cookies = loaded,
            Err(e) => tracing::warn!("failed to reload cookie store: {}", e),
        }

        let domain = Self::domain_of(url);
        let entry = cookies.get(&domain)?;
        if entry.is_empty() {
            return None;
        }

        let header = entry
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");

        HeaderValue::from_str(&header).ok()
    }
}
