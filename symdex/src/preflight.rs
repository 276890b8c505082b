//! Pre-flight checks for symdex
//!
//! Validates that the external binutils tools exist before starting a build,
//! with actionable error messages when they don't. A hung or missing tool
//! discovered halfway through a multi-binary build is a much worse failure
//! mode than refusing up front.

use anyhow::{bail, Result};
use std::path::Path;
use std::process::{Command, Stdio};

/// External tools a build invokes, in invocation order.
const REQUIRED_TOOLS: &[&str] = &["nm", "readelf", "ldd"];

/// Run all pre-flight checks before an index build.
///
/// # Errors
/// Returns an error naming the first missing tool, or a binary path that
/// does not exist.
pub fn run_preflight_checks(binaries: &[impl AsRef<Path>]) -> Result<()> {
    check_tools()?;
    for binary in binaries {
        check_binary_exists(binary.as_ref())?;
    }
    Ok(())
}

/// Check that every external tool resolves on PATH.
fn check_tools() -> Result<()> {
    for tool in REQUIRED_TOOLS {
        if !tool_exists(tool) {
            bail!(
                "The program '{tool}' is currently not installed.\n\n\
                 Install binutils:\n  \
                 sudo apt-get install binutils    (Debian/Ubuntu)\n  \
                 sudo dnf install binutils        (Fedora)"
            );
        }
    }
    Ok(())
}

fn tool_exists(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Check that a build input exists and is a file.
fn check_binary_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!(
            "Binary not found: {}\n\n\
             Make sure the path is correct and the binary exists.",
            path.display()
        );
    }
    if !path.is_file() {
        bail!(
            "Not a file: {}\n\n\
             Build inputs must be executable files, not directories.",
            path.display()
        );
    }
    Ok(())
}
