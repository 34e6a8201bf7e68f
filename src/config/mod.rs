//! Configuration management for the dashboard client
//!
//! This module handles loading and managing configuration settings
//! for the client, including endpoint and cookie store overrides.

pub mod settings;

pub use settings::Settings;
