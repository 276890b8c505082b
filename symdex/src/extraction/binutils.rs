//! Production [`DebugDataSource`] backed by the binutils tools.

use crate::domain::{PathRewrite, SourceLocation};
use crate::extraction::{line_table, shared_libs, symbols, DebugDataSource};
use log::{debug, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Extracts address data by running `nm`, `readelf` and `ldd` and parsing
/// their output. Invocations are synchronous and sequential, with no timeout.
///
/// A tool that fails to spawn, exits non-zero, or prints nothing is treated
/// as "no debug info": the extractor returns empty collections and the build
/// moves on.
#[derive(Debug, Default)]
pub struct BinutilsSource {
    rewrite: Option<PathRewrite>,
}

impl BinutilsSource {
    #[must_use]
    pub fn new(rewrite: Option<PathRewrite>) -> Self {
        Self { rewrite }
    }
}

impl DebugDataSource for BinutilsSource {
    fn code_symbols(&self, binary: &Path) -> Vec<(String, u64)> {
        let output = run_tool("nm", &["-C".as_ref(), binary.as_os_str()]);
        symbols::parse_nm_output(&output)
    }

    fn line_rows(
        &self,
        binary: &Path,
        addresses: Option<&HashSet<u64>>,
    ) -> Vec<(u64, SourceLocation)> {
        // objdump has a long-standing bug where --wide never takes effect and
        // filenames get truncated; readelf --wide behaves.
        let output = run_tool(
            "readelf",
            &["--debug-dump=decodedline".as_ref(), "--wide".as_ref(), binary.as_os_str()],
        );
        line_table::parse_decoded_lines(&output, addresses, self.rewrite.as_ref())
    }

    fn shared_libraries(&self, binary: &Path, filter: &str) -> Vec<PathBuf> {
        if filter.is_empty() {
            return Vec::new();
        }
        let output = run_tool("ldd", &[binary.as_os_str()]);
        shared_libs::parse_ldd_output(&output, filter)
    }
}

/// Run a tool and return its stdout, lossily decoded.
///
/// Any failure is downgraded to an empty string; the caller treats that the
/// same as a binary without debug info.
fn run_tool(program: &str, args: &[&std::ffi::OsStr]) -> String {
    match Command::new(program).args(args).output() {
        Ok(output) => {
            if !output.status.success() {
                debug!("{program} exited with {}", output.status);
            }
            String::from_utf8_lossy(&output.stdout).into_owned()
        }
        Err(e) => {
            warn!("failed to run {program}: {e}");
            String::new()
        }
    }
}
