use std::path::PathBuf;
use thiserror::Error;

/// Error types for the triage pipeline.
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Destination directory already exists: {path}")]
    DestinationExists { path: PathBuf },

    #[error("Archive extraction failed: {message}")]
    ArchiveExtraction { message: String },

    #[error("Manifest normalization failed: {message}")]
    ManifestConversion { message: String },

    #[error("No Info.plist found under Payload/*.app in {path}")]
    ManifestNotFound { path: PathBuf },

    #[error("No .app bundle directories found in {path}")]
    NoBundles { path: PathBuf },

    #[error("{tool} failed: {message}")]
    ToolFailure { tool: String, message: String },
}

pub type Result<T> = std::result::Result<T, TriageError>;

impl TriageError {
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput { message: message.into() }
    }

    pub fn path_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    pub fn destination_exists<P: Into<PathBuf>>(path: P) -> Self {
        Self::DestinationExists { path: path.into() }
    }

    pub fn archive_extraction<S: Into<String>>(message: S) -> Self {
        Self::ArchiveExtraction { message: message.into() }
    }

    pub fn manifest_conversion<S: Into<String>>(message: S) -> Self {
        Self::ManifestConversion { message: message.into() }
    }

    pub fn manifest_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::ManifestNotFound { path: path.into() }
    }

    pub fn no_bundles<P: Into<PathBuf>>(path: P) -> Self {
        Self::NoBundles { path: path.into() }
    }

    pub fn tool_failure<S1: Into<String>, S2: Into<String>>(tool: S1, message: S2) -> Self {
        Self::ToolFailure { tool: tool.into(), message: message.into() }
    }

    /// Returns true for precondition failures reported before any side effect
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::PathNotFound { .. } | Self::DestinationExists { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_path() {
        let err = TriageError::path_not_found("/tmp/missing.ipa");
        assert_eq!(err.to_string(), "Path does not exist: /tmp/missing.ipa");
    }

    #[test]
    fn test_tool_failure_display() {
        let err = TriageError::tool_failure("plutil", "exit status 1");
        assert_eq!(err.to_string(), "plutil failed: exit status 1");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: TriageError = io_err.into();
        assert!(matches!(err, TriageError::Io(_)));
    }

    #[test]
    fn test_is_validation() {
        assert!(TriageError::invalid_input("bad extension").is_validation());
        assert!(TriageError::destination_exists("/tmp/out").is_validation());
        assert!(!TriageError::archive_extraction("truncated").is_validation());
    }
}
