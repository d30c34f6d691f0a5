//! Typed errors for each fallible boundary of the simulation.
//!
//! The kitchen core itself never fails on a per-order basis (see
//! [`crate::shelf`]); these types exist for the boundaries that can:
//! loading configuration, reading the order source, and talking to a
//! kitchen whose event loop thread has already exited.

use std::path::PathBuf;

/// Errors that can occur while loading and validating [`crate::config::Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that can occur while reading the order source file.
#[derive(Debug, thiserror::Error)]
pub enum OrderSourceError {
    #[error("could not read orders file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single order record that failed to parse; reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedOrder {
    pub line: usize,
    pub reason: String,
}

/// Errors surfaced by [`crate::kitchen::KitchenHandle`] when talking to a
/// kitchen whose event loop has already terminated.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum KitchenError {
    #[error("kitchen event loop is no longer running")]
    Disconnected,
}
