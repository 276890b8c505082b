//! Symbol name canonicalization
//!
//! Reduces a fully qualified, possibly templated, possibly nested-function
//! decorated name to its innermost unqualified identifier (the "leaf"):
//!
//! ```text
//! A B::C(D::E)       -> C
//! A::B()::C::D()     -> D     (method of a class defined inside a function)
//! A::B<C::D>()       -> B
//! A::B::operator()() -> operator()
//! ```
//!
//! The second-to-last-fragment rule in [`leaf_of`] has no formal grammar
//! behind it; it is kept literally as-is because changing it would silently
//! change which definitions callers consider matches.

/// Remove `open`...`close` groups from a string.
///
/// With `keep_top == false` every group is deleted outright, including any
/// nested groups inside it (used to strip template argument lists).
///
/// With `keep_top == true` the delimiters of outermost groups survive while
/// all bracketed content is dropped, nested delimiters included (used to
/// drop parameter-type noise while preserving call parens, so that
/// `operator()` and `f()::Inner::g()` forms stay recognizable).
///
/// Kept text is tracked as runs of the input: a run opens at the first
/// ordinary top-level character and is emitted as a contiguous slice, either
/// when an `open` delimiter at depth zero closes it or at end of input. An
/// unbalanced `close` never closes a run, so the remainder of the string
/// passes through verbatim; comparison operators (`operator>`, `operator->`,
/// `operator>=`, `operator>>`) survive the template pass intact this way.
fn strip_groups(symbol: &str, open: char, close: char, keep_top: bool) -> String {
    let mut out = String::with_capacity(symbol.len());
    let mut run_start: Option<usize> = None;
    let mut depth: i32 = 0;
    for (i, c) in symbol.char_indices() {
        if c == open {
            if depth == 0 {
                if let Some(start) = run_start.take() {
                    out.push_str(&symbol[start..i]);
                    if keep_top {
                        out.push(open);
                    }
                }
            }
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 && keep_top {
                out.push(close);
            }
        } else if depth == 0 && run_start.is_none() {
            run_start = Some(i);
        }
    }
    if let Some(start) = run_start {
        out.push_str(&symbol[start..]);
    }
    out
}

/// Extract the leaf identifier from a decorated symbol name.
///
/// Deterministic and pure. Non-virtual-thunk wrappers are filtered out by the
/// builder and never reach this function.
#[must_use]
pub fn leaf_of(full_symbol: &str) -> String {
    if full_symbol.is_empty() {
        return String::new();
    }

    // Remove template argument lists, then collapse nested parentheses.
    let cleaned = strip_groups(full_symbol, '<', '>', false);
    let cleaned = strip_groups(&cleaned, '(', ')', true);

    // NOTE: an inner class defined in operator()() is not handled.
    if cleaned.contains("operator()") {
        return "operator()".to_string();
    }

    let fragments: Vec<&str> = cleaned.split('(').collect();
    // More than two fragments means a function/class defined inside a
    // function; the second-to-last fragment holds the definition's own name.
    let target =
        if fragments.len() > 2 { fragments[fragments.len() - 2] } else { fragments[0] };
    target.rsplit("::").next().unwrap_or(target).to_string()
}
