//! Error types for compiling and rendering line formats.

use thiserror::Error;

/// Errors from compiling a printf-style template.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    /// The template ends with an unmatched `%`.
    #[error("dangling '%' escape at end of template")]
    DanglingEscape,
}

/// Resolution failures raised by value sources.
///
/// `NotFound` and `NoCurrent` are distinct conditions: the first means the
/// source has no mapping or extractor for the key, the second means a
/// [`Projection`](crate::Projection) was used before any record was set.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The source has no value registered for this key.
    #[error("no value for field '{0}'")]
    NotFound(String),

    /// A projection adapter was consulted before `set_current` was called.
    #[error("no current record has been set")]
    NoCurrent,

    /// A fallible extractor returned an error.
    #[error("extractor for field '{key}' failed")]
    Extract {
        /// The key whose extractor failed.
        key: String,
        /// The extractor's own error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// The single failure type surfaced at the render boundary.
///
/// A render either fully succeeds or fails with this error; the underlying
/// [`ResolveError`] is attached as the source, so callers never see a raw
/// resolution error leak through a render call.
#[derive(Debug, Error)]
#[error("failed to format record")]
pub struct FormatError {
    #[source]
    cause: ResolveError,
}

impl FormatError {
    /// The resolution failure that aborted the render.
    pub fn cause(&self) -> &ResolveError {
        &self.cause
    }
}

impl From<ResolveError> for FormatError {
    fn from(cause: ResolveError) -> Self {
        FormatError { cause }
    }
}

/// Errors from building a projection adapter.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    /// An extractor for this key was already registered.
    #[error("an extractor for field '{0}' is already registered")]
    DuplicateField(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_key() {
        let err = ResolveError::NotFound("%s".into());
        assert!(err.to_string().contains("%s"));
    }

    #[test]
    fn test_format_error_exposes_cause() {
        let err = FormatError::from(ResolveError::NoCurrent);
        assert!(matches!(err.cause(), ResolveError::NoCurrent));
        assert_eq!(err.to_string(), "failed to format record");
    }

    #[test]
    fn test_format_error_source_chain() {
        use std::error::Error;

        let err = FormatError::from(ResolveError::NotFound("key".into()));
        let source = err.source().expect("cause is attached as source");
        assert!(source.to_string().contains("key"));
    }

    #[test]
    fn test_duplicate_field_display() {
        let err = ProjectionError::DuplicateField("id".into());
        assert!(err.to_string().contains("already registered"));
    }
}
