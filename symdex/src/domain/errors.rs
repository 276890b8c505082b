//! Structured error types for symdex
//!
//! Using thiserror for automatic Display implementation and error chaining.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from building an index.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(
        "format error: expected BINARY or BINARY:LIB_FILTER \
         (e.g. \"out/debug/myprog:out/debug\"), got {0:?}"
    )]
    InvalidSpec(String),

    #[error("invalid substitution {0:?}: expected FROM=TO")]
    InvalidRewrite(String),

    #[error("block size must be positive")]
    InvalidBlockSize,

    #[error("failed to encode index block: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors from opening or querying an index.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("index not found: {} (run `symdex index` first)", .0.display())]
    NotFound(PathBuf),

    #[error("failed to decode index data: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_spec_display() {
        let err = BuildError::InvalidSpec("a:b:c".to_string());
        assert!(err.to_string().contains("a:b:c"));
        assert!(err.to_string().contains("format error"));
    }

    #[test]
    fn test_not_found_display() {
        let err = IndexError::NotFound(PathBuf::from(".symdex_index"));
        assert!(err.to_string().contains("index not found"));
        assert!(err.to_string().contains(".symdex_index"));
    }
}
