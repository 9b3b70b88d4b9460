//! Marker scanning primitives for the `%...%` directive vocabulary.

use std::ops::Range;

/// A single-line `%name ARGS%` marker found in template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InlineDirective {
    /// Byte span of the whole marker, including both `%` delimiters.
    pub span: Range<usize>,
    /// Argument text between the directive name and the closing `%`.
    pub args: String,
}

/// Find the first `%name ARGS%` marker.
///
/// The directive name must be followed by whitespace, and the marker cannot
/// span lines. Positional `%f0%`-style markers therefore never re-match as
/// `%f ...%` directives.
pub(crate) fn find_inline(text: &str, name: &str) -> Option<InlineDirective> {
    let open = format!("%{name} ");
    let mut search_from = 0;
    while let Some(found) = text[search_from..].find(&open) {
        let begin = search_from + found;
        let after = begin + open.len();
        let line_end = text[after..].find('\n').map_or(text.len(), |i| after + i);
        if let Some(close_offset) = text[after..line_end].find('%') {
            let close = after + close_offset;
            return Some(InlineDirective {
                span: begin..close + 1,
                args: text[after..close].trim().to_string(),
            });
        }
        search_from = after;
    }
    None
}

/// Extract the body of a `%name begin% ... %name end%` block.
///
/// `require_newline` demands a line break immediately after the begin marker;
/// the break itself is not part of the body. The body ends at the first
/// matching end marker.
pub(crate) fn extract_block(text: &str, name: &str, require_newline: bool) -> Option<String> {
    let open = format!("%{name} begin%");
    let close = format!("%{name} end%");
    let after_open = text.find(&open)? + open.len();
    let body_start = if require_newline {
        if text[after_open..].starts_with("\r\n") {
            after_open + 2
        } else if text[after_open..].starts_with('\n') {
            after_open + 1
        } else {
            return None;
        }
    } else {
        after_open
    };
    let body_end = body_start + text[body_start..].find(&close)?;
    Some(text[body_start..body_end].to_string())
}
