//! Decoded debug-line table parsing (`readelf --debug-dump=decodedline`).

use crate::domain::{PathRewrite, SourceLocation};
use crate::extraction::parse_hex;
use log::{debug, warn};
use std::collections::HashSet;

/// Parse decoded line-table output into `(address, location)` rows.
///
/// The dump groups rows under file/section headers (lines ending in `:`); a
/// `CU: ` prefix marks a compilation-unit path. Rows are
/// `FILENAME LINE ADDRESS`; lines with any other field count are skipped.
///
/// When a row's filename disagrees with the active section's filename it is
/// reconciled against the declared CU filename (using the CU path for that
/// row); a filename matching neither is dropped with a warning, non-fatal.
///
/// `addresses`, when given, is applied before anything else so that decoding
/// a large binary only retains rows the caller can actually use. The path
/// `rewrite` is applied at `SourceLocation` construction, never later.
#[must_use]
pub fn parse_decoded_lines(
    output: &str,
    addresses: Option<&HashSet<u64>>,
    rewrite: Option<&PathRewrite>,
) -> Vec<(u64, SourceLocation)> {
    let mut result = Vec::new();

    let mut cu_path: Option<String> = None;
    let mut cu_filename: Option<String> = None;
    let mut path: Option<String> = None;
    let mut filename: Option<String> = None;

    for line in output.lines() {
        if let Some(header) = line.strip_suffix(':') {
            if header.is_empty() {
                continue;
            }
            // A new section with a new path.
            let (is_cu, header) = match header.strip_prefix("CU: ") {
                Some(rest) => (true, rest),
                None => (false, header),
            };
            let section_path = if header.starts_with('/') {
                normalize_absolute(header)
            } else {
                header.to_string()
            };
            let section_filename = basename(&section_path).to_string();
            if is_cu {
                cu_path = Some(section_path.clone());
                cu_filename = Some(section_filename.clone());
            }
            path = Some(section_path);
            filename = Some(section_filename);
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [row_filename, row_line, row_address] = fields.as_slice() else {
            continue;
        };

        let Some(address) = parse_hex(row_address) else {
            debug!("skip line-table row with unparsable address: {line}");
            continue;
        };
        // Keep only addresses the caller asked for; full tables for large
        // binaries would exhaust memory.
        if let Some(wanted) = addresses {
            if !wanted.contains(&address) {
                continue;
            }
        }
        let Ok(line_number) = row_line.parse::<u32>() else {
            debug!("skip line-table row with unparsable line number: {line}");
            continue;
        };

        let row_path = if Some(*row_filename) == filename.as_deref() {
            path.as_deref()
        } else if Some(*row_filename) == cu_filename.as_deref() {
            cu_path.as_deref()
        } else {
            warn!(
                "skip unexpected filename <{}>; CU <{}> and section <{}>",
                row_filename,
                cu_path.as_deref().unwrap_or("?"),
                path.as_deref().unwrap_or("?"),
            );
            continue;
        };
        let Some(row_path) = row_path else {
            warn!("skip line-table row before any section header: {line}");
            continue;
        };

        let final_path = match rewrite {
            Some(r) => r.apply(row_path),
            None => row_path.to_string(),
        };
        result.push((address, SourceLocation::new(final_path, line_number)));
    }

    result
}

/// Lexically normalize an absolute path: resolve `.` and `..` components.
fn normalize_absolute(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    format!("/{}", parts.join("/"))
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
