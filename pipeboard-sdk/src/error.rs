//! Error types for the board.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while presenting a snapshot or serving the board.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The snapshot could not be encoded as JSON.
    #[error("{0}")]
    Encode(#[from] serde_json::Error),

    /// The dashboard template could not be read.
    #[error("can't read template {path}: {source}")]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dashboard template has a syntax error.
    #[error("{0}")]
    TemplateParse(#[source] minijinja::Error),

    /// The dashboard template failed while rendering the snapshot.
    #[error("{0}")]
    TemplateRender(#[source] minijinja::Error),

    /// The configured listen address is not a socket address.
    #[error("invalid listen address {addr:?}: {source}")]
    InvalidAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Socket or file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BoardError {
    /// True for failures that happened before the template could run.
    pub fn is_template_parse(&self) -> bool {
        matches!(
            self,
            BoardError::TemplateLoad { .. } | BoardError::TemplateParse(_)
        )
    }
}
