//! Core data types for the definition index.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use crate::domain::errors::BuildError;

/// A source file location: normalized path plus 1-based line number.
///
/// The path is final at construction time: any configured prefix rewrite is
/// applied by the extractor before a `SourceLocation` is built, never after.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    pub path: String,
    pub line: u32,
}

impl SourceLocation {
    #[must_use]
    pub fn new(path: impl Into<String>, line: u32) -> Self {
        Self { path: path.into(), line }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

/// One indexed symbol definition.
///
/// `full` is the complete decorated name as reported by the symbol table and
/// is assumed unique per definition site; equality and hashing use only
/// `full` so that the same definition seen twice collapses to one record.
/// `leaf` is intentionally non-unique: overloads and same-named methods in
/// different scopes share a leaf and are all preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub leaf: String,
    pub full: String,
    pub location: SourceLocation,
}

impl SymbolRecord {
    /// Sort key for the on-disk index: records are ordered by (leaf, full).
    #[must_use]
    pub fn sort_key(&self) -> (&str, &str) {
        (&self.leaf, &self.full)
    }
}

impl PartialEq for SymbolRecord {
    fn eq(&self, other: &Self) -> bool {
        self.full == other.full
    }
}

impl Eq for SymbolRecord {}

impl Hash for SymbolRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full.hash(state);
    }
}

impl PartialOrd for SymbolRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SymbolRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// A single lookup result, ordered by (path, line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionMatch {
    pub path: String,
    pub line: u32,
    pub full: String,
    pub leaf: String,
}

impl DefinitionMatch {
    /// Sort key for query results.
    #[must_use]
    pub fn sort_key(&self) -> (&str, u32) {
        (&self.path, self.line)
    }
}

impl From<SymbolRecord> for DefinitionMatch {
    fn from(record: SymbolRecord) -> Self {
        Self {
            path: record.location.path,
            line: record.location.line,
            full: record.full,
            leaf: record.leaf,
        }
    }
}

impl fmt::Display for DefinitionMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.path, self.line, self.full)
    }
}

/// A source-path prefix substitution, applied once at ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRewrite {
    pub from: String,
    pub to: String,
}

impl PathRewrite {
    /// Parse a `FROM=TO` argument. `TO` may be empty (`"../../="` strips the
    /// prefix), `FROM` may not.
    ///
    /// # Errors
    /// Returns `BuildError::InvalidRewrite` unless the value contains exactly
    /// one `=` with a non-empty left-hand side.
    pub fn parse(value: &str) -> Result<Self, BuildError> {
        let mut parts = value.split('=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(from), Some(to), None) if !from.is_empty() => {
                Ok(Self { from: from.to_string(), to: to.to_string() })
            }
            _ => Err(BuildError::InvalidRewrite(value.to_string())),
        }
    }

    /// Apply the substitution to a path that starts with `from`; other paths
    /// pass through unchanged.
    #[must_use]
    pub fn apply(&self, path: &str) -> String {
        path.strip_prefix(&self.from)
            .map_or_else(|| path.to_string(), |rest| format!("{}{}", self.to, rest))
    }
}

/// One build input: a binary to index plus an optional substring selecting
/// which of its shared libraries to index as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinarySpec {
    pub path: PathBuf,
    pub shared_lib_filter: String,
}

impl BinarySpec {
    /// Parse a `BINARY[:LIB_FILTER]` argument.
    ///
    /// # Errors
    /// Returns `BuildError::InvalidSpec` if the value has more than two
    /// `:`-separated fields or an empty binary path.
    pub fn parse(value: &str) -> Result<Self, BuildError> {
        let fields: Vec<&str> = value.split(':').collect();
        match fields.as_slice() {
            [path] if !path.is_empty() => {
                Ok(Self { path: PathBuf::from(path), shared_lib_filter: String::new() })
            }
            [path, filter] if !path.is_empty() => {
                Ok(Self { path: PathBuf::from(path), shared_lib_filter: (*filter).to_string() })
            }
            _ => Err(BuildError::InvalidSpec(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_equality_ignores_location() {
        let a = SymbolRecord {
            leaf: "Foo".to_string(),
            full: "Lib::Foo()".to_string(),
            location: SourceLocation::new("/src/a.cpp", 10),
        };
        let b = SymbolRecord {
            leaf: "Foo".to_string(),
            full: "Lib::Foo()".to_string(),
            location: SourceLocation::new("/src/b.cpp", 99),
        };
        assert_eq!(a, b);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_rewrite_strips_prefix() {
        let rewrite = PathRewrite::parse("/home/user/proj/=").unwrap();
        assert_eq!(rewrite.apply("/home/user/proj/src/a.cpp"), "src/a.cpp");
        assert_eq!(rewrite.apply("/other/src/a.cpp"), "/other/src/a.cpp");
    }

    #[test]
    fn test_rewrite_replaces_prefix() {
        let rewrite = PathRewrite::parse("../../=src/").unwrap();
        assert_eq!(rewrite.apply("../../a.cpp"), "src/a.cpp");
    }

    #[test]
    fn test_rewrite_rejects_malformed() {
        assert!(PathRewrite::parse("no-separator").is_err());
        assert!(PathRewrite::parse("a=b=c").is_err());
        assert!(PathRewrite::parse("=to").is_err());
    }

    #[test]
    fn test_spec_parse() {
        let spec = BinarySpec::parse("out/debug/myprog:out/debug").unwrap();
        assert_eq!(spec.path, PathBuf::from("out/debug/myprog"));
        assert_eq!(spec.shared_lib_filter, "out/debug");

        let spec = BinarySpec::parse("out/debug/myprog").unwrap();
        assert!(spec.shared_lib_filter.is_empty());
    }

    #[test]
    fn test_spec_parse_rejects_extra_fields() {
        assert!(BinarySpec::parse("a:b:c").is_err());
        assert!(BinarySpec::parse("").is_err());
    }
}
