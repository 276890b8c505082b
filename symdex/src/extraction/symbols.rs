//! Symbol-table dump parsing (`nm -C` output).

use crate::extraction::parse_hex;
use log::debug;

/// Symbol types that live in code sections: local/global text and weak.
const CODE_SYMBOL_TYPES: &str = "tTwW";

/// Parse `nm -C` output into `(decorated_symbol, address)` pairs restricted
/// to code symbols.
///
/// Each line is `ADDRESS TYPE SYMBOL`; the symbol field may contain spaces
/// (demangled C++ signatures), so the line splits into at most three fields.
/// Undefined symbols have no address field and are skipped by the field-count
/// check. Malformed address tokens are skipped with a diagnostic.
#[must_use]
pub fn parse_nm_output(output: &str) -> Vec<(String, u64)> {
    let mut result = Vec::new();
    for line in output.lines() {
        let mut fields = line.trim().splitn(3, ' ');
        let (Some(address), Some(kind), Some(symbol)) =
            (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        if kind.len() != 1 || !CODE_SYMBOL_TYPES.contains(kind) {
            continue;
        }
        let Some(address) = parse_hex(address) else {
            debug!("skip nm line with unparsable address: {line}");
            continue;
        };
        result.push((symbol.to_string(), address));
    }
    result
}
