//! Domain model for symdex
//!
//! Core data types shared between the extraction, build, and lookup
//! pipelines, plus structured error types.

pub mod errors;
pub mod types;

pub use errors::{BuildError, IndexError};
pub use types::{BinarySpec, DefinitionMatch, PathRewrite, SourceLocation, SymbolRecord};
