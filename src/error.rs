use std::io;

use thiserror::Error;

/// Every way a `compress` or `decompress` call can fail.
#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("data can't be empty")]
    EmptyInput,

    /// A fixed-width field declared more bytes than the stream held.
    #[error("truncated input: {field} needs {expected} bytes, found {found}")]
    TruncatedInput {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("corrupt tree: {0}")]
    CorruptTree(&'static str),

    /// A count does not fit in the 32-bit length fields of the format.
    #[error("input too large: {0} exceeds the 32-bit length field")]
    InputTooLarge(u64),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CompressionError {
    /// True when the failure is caused by the bytes being decoded rather than the stream.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            CompressionError::TruncatedInput { .. } | CompressionError::CorruptTree(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;
