//! # Error Types
//!
//! Error handling for rule extraction.
//! Every failure is returned to the caller; nothing in the library aborts the process.

use std::fmt;
use std::path::PathBuf;

/// Error types that can occur while loading, merging or writing rules.
///
/// Filtering and merging never fail; these cover the source and sink boundaries
/// plus records that break the alert/record invariant.
#[derive(Debug)]
pub enum ExtractError {
    /// Internal error with custom message
    Internal(String),
    /// A rule record with both or neither of `alert` and `record` set
    InvalidRule {
        namespace: String,
        resource: String,
        group: String,
        reason: String,
    },
    /// I/O error reading manifests or writing documents
    Io(std::io::Error),
    /// Error walking a manifest directory
    WalkDir(walkdir::Error),
    /// Error parsing or emitting YAML
    SerdeYaml(serde_yaml::Error),
    /// Error parsing JSON data
    SerdeJson(serde_json::Error),
    /// Kubernetes API or configuration error
    Kube(kube::Error),
    /// Requested file not found
    FileNotFound(PathBuf),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::Internal(msg) => write!(f, "Internal error: {msg}"),
            ExtractError::InvalidRule {
                namespace,
                resource,
                group,
                reason,
            } => write!(
                f,
                "Invalid rule in [{namespace}/{resource}] group [{group}]: {reason}"
            ),
            ExtractError::Io(err) => write!(f, "IO error: {err}"),
            ExtractError::WalkDir(err) => write!(f, "Directory traversal error: {err}"),
            ExtractError::SerdeYaml(err) => write!(f, "YAML error: {err}"),
            ExtractError::SerdeJson(err) => write!(f, "JSON error: {err}"),
            ExtractError::Kube(err) => write!(f, "Kubernetes error: {err}"),
            ExtractError::FileNotFound(path) => write!(f, "File not found: {}", path.display()),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::Io(err) => Some(err),
            ExtractError::WalkDir(err) => Some(err),
            ExtractError::SerdeYaml(err) => Some(err),
            ExtractError::SerdeJson(err) => Some(err),
            ExtractError::Kube(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        ExtractError::Io(err)
    }
}

impl From<walkdir::Error> for ExtractError {
    fn from(err: walkdir::Error) -> Self {
        ExtractError::WalkDir(err)
    }
}

impl From<serde_yaml::Error> for ExtractError {
    fn from(err: serde_yaml::Error) -> Self {
        ExtractError::SerdeYaml(err)
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(err: serde_json::Error) -> Self {
        ExtractError::SerdeJson(err)
    }
}

impl From<kube::Error> for ExtractError {
    fn from(err: kube::Error) -> Self {
        ExtractError::Kube(err)
    }
}
