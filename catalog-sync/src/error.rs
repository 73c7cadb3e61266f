//! Error types for catalog-sync.

use std::path::PathBuf;

use thiserror::Error;

use catalog_core::DescriptorError;

/// All errors that can arise while syncing a single descriptor.
///
/// Every variant is caught at the per-file boundary by the driver; none of
/// them ends the batch.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Reading repository metadata or an artifact payload failed, including
    /// HTTP errors, malformed metadata, and missing archive entries.
    #[error("failed to retrieve {url}: {reason}")]
    Retrieval { url: String, reason: String },

    /// The registry answered with a status other than 202 or 409.
    #[error("publish to {url} rejected: {status} -> {body}")]
    Publish {
        url: String,
        status: u16,
        body: String,
    },

    /// The publish request never produced a response (connect failure,
    /// timeout, interrupted send).
    #[error("publish to {url} failed: {reason}")]
    PublishTransport { url: String, reason: String },

    /// Reading or writing the local descriptor failed.
    #[error("descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A git invocation failed (open, stage, or commit).
    #[error("git {command} failed: {detail}")]
    Git { command: String, detail: String },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

/// Convenience constructor for [`SyncError::Retrieval`].
pub(crate) fn retrieval_err(url: impl Into<String>, reason: impl ToString) -> SyncError {
    SyncError::Retrieval {
        url: url.into(),
        reason: reason.to_string(),
    }
}
