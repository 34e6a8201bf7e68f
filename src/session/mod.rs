//! Session and authentication layer
//!
//! This module owns everything with protocol handling in it: the cookie
//! store that persists the session, anti-forgery token scraping, the login
//! flow, the generic request dispatcher, and the anti-fraud fingerprint
//! collector.

pub mod auth;
pub mod client;
pub mod fingerprint;
pub mod store;
pub mod token;

pub use client::DashboardClient;
pub use fingerprint::{FingerprintProvider, OnlineMetrixCollector};
pub use store::{CookieBackend, CookieMap, FileBackend, MemoryBackend, PersistentJar, identity_hash};
pub use token::{TokenOutcome, extract_token};
