use std::sync::Arc;

use thiserror::Error;

/// Result type alias using LoadError
pub type Result<T> = std::result::Result<T, LoadError>;

/// Failure raised by a snapshot's base loader
///
/// The collection layer defines no error taxonomy of its own: whatever goes
/// wrong while the base set is being enumerated surfaces unmodified at the
/// read that drove iteration (`count`, `to_vec`, the logical-view iterator,
/// or the scan fallback of `contains`). Identity collisions and unusual
/// identity tokens are not errors anywhere in the collection.
///
/// The underlying cause is held behind an `Arc` so the error stays `Clone`
/// and can travel through cloned iterators.
#[derive(Debug, Clone, Error)]
#[error("failed to load base items: {message}")]
pub struct LoadError {
    message: String,
    cause: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
}

impl LoadError {
    /// Create a load error from a plain message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Wrap an underlying error raised by the base source
    pub fn from_source(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            message: source.to_string(),
            cause: Some(Arc::new(source)),
        }
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the underlying cause, if any
    pub fn source_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_from_message() {
        let err = LoadError::new("connection refused");
        assert_eq!(err.message(), "connection refused");
        assert!(err.source_error().is_none());
        assert_eq!(
            err.to_string(),
            "failed to load base items: connection refused"
        );
    }

    #[test]
    fn test_load_error_wraps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = LoadError::from_source(io);
        assert_eq!(err.message(), "disk gone");
        assert!(err.source_error().is_some());
    }

    #[test]
    fn test_load_error_is_cloneable() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = LoadError::from_source(io);
        let copy = err.clone();
        assert_eq!(copy.message(), err.message());
        assert!(copy.source_error().is_some());
    }
}
