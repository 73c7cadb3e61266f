//! Error types for catalog-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from reading, scanning, or writing descriptors.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// Underlying I/O failure, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse descriptor at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed, but its root is not a YAML mapping.
    #[error("descriptor at {path} is not a YAML mapping")]
    NotAMapping { path: PathBuf },

    /// YAML serialization error (write path).
    #[error("YAML serialization error: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// A descriptor directory (`platforms/` or `extensions/`) did not exist.
    #[error("descriptor directory not found at {path}")]
    DirectoryNotFound { path: PathBuf },
}

/// Convenience constructor for [`DescriptorError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DescriptorError {
    DescriptorError::Io {
        path: path.into(),
        source,
    }
}
