//! Address data extraction from native binaries
//!
//! The index is built by correlating two independently produced tables:
//!
//! - the symbol table: `(decorated_symbol, address)` pairs for code symbols,
//!   dumped by `nm -C`;
//! - the decoded line-number table: `(address, path, line)` triples, dumped
//!   by `readelf --debug-dump=decodedline --wide`.
//!
//! `ldd` resolves dynamically linked libraries so they can be indexed too.
//!
//! The tools are invoked synchronously and sequentially; only the text-output
//! contract matters here, so the adapters are plain parsers behind the
//! [`DebugDataSource`] seam and tests can substitute an in-memory source.
//!
//! Tool failure or empty output means "no debug info" and yields empty
//! collections, never an error.

pub mod binutils;
pub mod line_table;
pub mod shared_libs;
pub mod symbols;

pub use binutils::BinutilsSource;

use crate::domain::SourceLocation;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The collaborator contract the index builder consumes.
///
/// Implementations are replaceable as long as the three operations hold their
/// contracts; the production implementation is [`BinutilsSource`].
pub trait DebugDataSource {
    /// Decorated symbol names and addresses for code symbols of `binary`
    /// (text and weak symbols only).
    fn code_symbols(&self, binary: &Path) -> Vec<(String, u64)>;

    /// `(address, location)` rows decoded from the binary's debug-line data.
    ///
    /// When `addresses` is given, rows outside the set are discarded during
    /// decoding; full decoding of large binaries is too slow and memory-heavy
    /// otherwise.
    fn line_rows(
        &self,
        binary: &Path,
        addresses: Option<&HashSet<u64>>,
    ) -> Vec<(u64, SourceLocation)>;

    /// Resolved filesystem paths of shared libraries linked by `binary` whose
    /// path contains `filter`. An empty filter selects nothing.
    fn shared_libraries(&self, binary: &Path, filter: &str) -> Vec<PathBuf>;
}

/// Render an address as canonical hex: `0x` plus significant digits only, so
/// renderings from sources with different zero-padding compare equal.
#[must_use]
pub fn canonical_hex(addr: u64) -> String {
    format!("{addr:#x}")
}

/// Parse a hex address token, with or without a `0x` prefix and with any
/// amount of leading-zero padding.
#[must_use]
pub fn parse_hex(token: &str) -> Option<u64> {
    let digits = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")).unwrap_or(token);
    u64::from_str_radix(digits, 16).ok()
}
