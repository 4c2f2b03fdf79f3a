//! Common types and utilities shared across cronbox crates.
//!
//! This crate defines the shared error type and the observability helpers
//! used by every job in the workspace. It stays dependency-light so the
//! pipeline crates can depend on it without pulling in HTTP or config
//! machinery.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`CronboxError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! Classifying an error as recoverable for a single source:
//!
//! ```rust
//! use cronbox_common::CronboxError;
//!
//! let err = CronboxError::fetch("https://example.com/", "timed out");
//! assert!(err.is_per_source());
//! assert!(!CronboxError::Config("missing recipient".into()).is_per_source());
//! ```

pub mod observability;

/// Error types used across the cronbox system.
#[derive(thiserror::Error, Debug)]
pub enum CronboxError {
    /// A source page could not be retrieved (network, timeout, non-2xx, bad encoding).
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Markup or a base URL could not be interpreted.
    #[error("Parse error for {url}: {message}")]
    Parse { url: String, message: String },

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The notification channel rejected or failed to accept a message.
    #[error("Delivery error: {0}")]
    Delivery(String),
}

impl CronboxError {
    pub fn fetch(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn parse(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Fetch and parse failures only cost the run one source; everything else is fatal.
    pub fn is_per_source(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Parse { .. })
    }
}

/// Convenient alias for results that use [`CronboxError`].
pub type Result<T> = std::result::Result<T, CronboxError>;
