//! Shared-library resolution (`ldd` output).

use std::path::PathBuf;

/// Parse `ldd` output into resolved library paths containing `filter`.
///
/// Lines look like `libcc.so => /path/to/libcc.so (0x00007fa842a83000)`;
/// lines without a ` => ` arrow (the vdso, the loader) carry no resolved
/// path and are skipped, as are arrows pointing at nothing (`=> not found`
/// still yields a token, but it will not match a path filter in practice).
#[must_use]
pub fn parse_ldd_output(output: &str, filter: &str) -> Vec<PathBuf> {
    if filter.is_empty() {
        return Vec::new();
    }

    let mut result = Vec::new();
    for line in output.lines() {
        if !line.contains(" => ") {
            continue;
        }
        let Some(path) = line.trim().split_whitespace().nth(2) else {
            continue;
        };
        if path.contains(filter) {
            result.push(PathBuf::from(path));
        }
    }
    result
}
