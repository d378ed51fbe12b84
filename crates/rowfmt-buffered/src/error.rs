//! Error types for buffered streaming.

use rowfmt::FormatError;
use thiserror::Error;

/// Errors raised while configuring or driving a [`BufferedLines`]
/// formatter.
///
/// [`BufferedLines`]: crate::BufferedLines
#[derive(Debug, Error)]
pub enum StreamError {
    /// The configured block size was not a positive integer.
    #[error("block size must be a positive integer, got {0}")]
    InvalidBlockSize(usize),

    /// A line was demanded but the batch is empty and cannot be refilled.
    /// This is an end-of-iteration condition, not a formatting failure.
    #[error("no further lines; the input is exhausted")]
    Exhausted,

    /// Rendering or width discovery failed to resolve a value.
    #[error(transparent)]
    Format(#[from] FormatError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_block_size_names_value() {
        let err = StreamError::InvalidBlockSize(0);
        assert!(err.to_string().contains('0'));
    }
}
