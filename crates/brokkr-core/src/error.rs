//! Error types for brokkr-core

use thiserror::Error;

/// Result type alias using brokkr-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Brokkr
///
/// Planning-input errors (`UnknownVersion`, `SameVersion`,
/// `DowngradeNotAllowed`) are the only errors meant to reach the end
/// user; extraction degrades silently for missing optional fields and
/// fails only when the input cannot be read at all.
#[derive(Error, Debug)]
pub enum Error {
    /// Input archive or document is structurally unreadable
    #[error("Cannot read project input: {message}")]
    ExtractionFailed { message: String },

    /// Version is not present in the release catalog
    #[error("Unknown TYPO3 version: {version} ({side})")]
    UnknownVersion { version: String, side: String },

    /// Source and target versions are identical
    #[error("Already on TYPO3 {version}; nothing to plan")]
    SameVersion { version: String },

    /// Target is older than source and downgrades were not allowed
    #[error("Downgrade from {from} to {to} is not allowed. Pass --allow-downgrade to plan it anyway")]
    DowngradeNotAllowed { from: String, to: String },

    /// Version literal could not be parsed as major.minor[.patch]
    #[error("Invalid version format: {version}")]
    InvalidVersion { version: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an extraction failure error
    pub fn extraction_failed(message: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            message: message.into(),
        }
    }

    /// Create an unknown version error, naming the failing side
    pub fn unknown_version(version: impl Into<String>, side: impl Into<String>) -> Self {
        Self::UnknownVersion {
            version: version.into(),
            side: side.into(),
        }
    }

    /// Create a same version error
    pub fn same_version(version: impl Into<String>) -> Self {
        Self::SameVersion {
            version: version.into(),
        }
    }

    /// Create a downgrade not allowed error
    pub fn downgrade_not_allowed(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::DowngradeNotAllowed {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create an invalid version error
    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }
}
