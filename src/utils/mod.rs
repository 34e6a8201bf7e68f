//! Utility functions and helpers
//!
//! This module contains utility functions used throughout the crate.

pub mod format;

pub use format::format_field;
