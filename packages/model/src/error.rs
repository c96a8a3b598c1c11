//! Error types for the model

use std::fmt;
use thiserror::Error;

/// Which half of the plugin namespace a lookup targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    Content,
    Layout,
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginKind::Content => write!(f, "content"),
            PluginKind::Layout => write!(f, "layout"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PluginError {
    /// A document referencing an unknown plugin cannot be rendered or
    /// edited, so resolution failures are hard errors.
    #[error("no {kind} plugin registered for {name}@{version}")]
    NotFound {
        kind: PluginKind,
        name: String,
        version: String,
    },
}

impl PluginError {
    pub fn not_found(kind: PluginKind, name: &str, version: &str) -> Self {
        PluginError::NotFound {
            kind,
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}
