//! Error types for meshscope
//!
//! Host resolution and registry lookups are total and never produce errors.
//! Errors only arise at the edges: loading mesh configuration and decoding
//! Istio manifests. Each variant carries the context needed to point an
//! operator at the offending file, field, or kind.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for meshscope operations
#[derive(Debug, Error)]
pub enum Error {
    /// A value was syntactically valid but semantically unusable
    #[error("validation error: {message}")]
    Validation {
        /// Description of what's invalid
        message: String,
        /// The invalid field path (e.g., "istioIdentityDomain")
        field: Option<String>,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The object kind being decoded (if known)
        kind: Option<String>,
    },

    /// Mesh configuration could not be loaded
    #[error("config error [{}]: {message}", .path.display())]
    Config {
        /// Config file that failed to load
        path: PathBuf,
        /// Description of what failed
        message: String,
    },

    /// Filesystem error
    #[error("io error: {source}")]
    Io {
        /// The underlying io error
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a validation error with the given message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a validation error naming the offending field
    pub fn validation_for_field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: None,
        }
    }

    /// Create a serialization error with object kind context
    pub fn serialization_for_kind(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: Some(kind.into()),
        }
    }

    /// Create a config error for the given file
    pub fn config(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Get the field path if this is a validation error that names one
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Get the object kind if this is a serialization error that names one
    pub fn kind(&self) -> Option<&str> {
        match self {
            Error::Serialization { kind, .. } => kind.as_deref(),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Story: an empty identity domain in a config file is rejected with the field name
    #[test]
    fn story_validation_names_the_field() {
        let err = Error::validation_for_field("istioIdentityDomain", "must not be empty");
        assert!(err.to_string().contains("validation error"));
        assert!(err.to_string().contains("must not be empty"));
        assert_eq!(err.field(), Some("istioIdentityDomain"));

        assert_eq!(Error::validation("plain").field(), None);
    }

    /// Story: a manifest with a malformed VirtualService reports its kind
    #[test]
    fn story_serialization_errors_carry_kind() {
        let err = Error::serialization_for_kind("VirtualService", "spec.hosts must be a list");
        assert!(err.to_string().contains("spec.hosts"));
        assert_eq!(err.kind(), Some("VirtualService"));

        assert_eq!(Error::serialization("bad").kind(), None);
    }

    #[test]
    fn config_error_includes_path() {
        let err = Error::config("/etc/meshscope/config.yaml", "file not found");
        let msg = err.to_string();
        assert!(msg.contains("/etc/meshscope/config.yaml"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn yaml_errors_become_serialization_errors() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("a: [unclosed").unwrap_err();
        let err: Error = yaml_err.into();
        assert!(matches!(err, Error::Serialization { kind: None, .. }));
    }
}
