//! User block markers.
//!
//! A user block is delimited by two whole lines:
//!
//! ```text
//! // @canopy-user-start [label]
//! ...hand-written code...
//! // @canopy-user-end
//! ```
//!
//! Markers are matched on the trimmed line, so indentation is free.

/// Opening marker, optionally followed by whitespace and a label.
pub const START_MARKER: &str = "// @canopy-user-start";

/// Closing marker, alone on its line.
pub const END_MARKER: &str = "// @canopy-user-end";

/// Label of a start marker line.
///
/// `None` when the line is not a start marker; `Some(None)` for an unlabeled
/// marker.
pub fn parse_start(line: &str) -> Option<Option<String>> {
    let rest = line.trim().strip_prefix(START_MARKER)?;
    if rest.is_empty() {
        return Some(None);
    }
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let label = rest.trim();
    Some((!label.is_empty()).then(|| label.to_string()))
}

pub fn is_end(line: &str) -> bool {
    line.trim() == END_MARKER
}

/// A start marker line.
pub fn start_line(label: Option<&str>, indent: &str) -> String {
    match label {
        Some(label) => format!("{}{} {}", indent, START_MARKER, label),
        None => format!("{}{}", indent, START_MARKER),
    }
}

pub fn end_line(indent: &str) -> String {
    format!("{}{}", indent, END_MARKER)
}

/// An empty labeled block, one line per marker.
pub fn user_block(label: &str, indent: &str) -> String {
    format!("{}\n{}", start_line(Some(label), indent), end_line(indent))
}
