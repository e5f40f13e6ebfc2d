//! Error taxonomy for the injection pipeline.

use std::path::PathBuf;

/// All failure classes the pipeline distinguishes.
///
/// Only [`SeoError::Template`] is fatal: without a readable base template
/// there is no valid document to serve at all. Everything else degrades to
/// the unmodified SPA shell so a crawler still receives a working page.
#[derive(thiserror::Error, Debug)]
pub enum SeoError {
    /// No backing record matched the requested slug or id.
    #[error("content not found: {0}")]
    NotFound(String),

    /// A backing store or upstream API call failed. Logged at the resolver
    /// boundary and downgraded to a fallback-chain miss.
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// The base SPA template could not be read.
    #[error("template read failed: {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type SeoResult<T> = Result<T, SeoError>;
