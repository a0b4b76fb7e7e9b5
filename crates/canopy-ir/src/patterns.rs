//! Repetition detection.
//!
//! Finds runs of structurally identical siblings so the markup builder can
//! render them as one iterated template.

use canopy_core::ir::{IrNode, RepeatInfo};
use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum number of matching siblings for a container to count as repeating.
pub const MIN_REPEAT: usize = 3;

static NUMERIC_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_\-]*\d+$").expect("suffix pattern is valid"));

/// Layer name without a trailing copy counter (`Card 2` gives `Card`).
pub fn base_name(name: &str) -> &str {
    match NUMERIC_SUFFIX.find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    }
}

/// Whether two siblings are instances of the same structure.
///
/// Same kind, and either the same non-zero child count along the same
/// direction, or the same name once copy counters are stripped.
pub fn same_structure(a: &IrNode, b: &IrNode) -> bool {
    if a.kind != b.kind {
        return false;
    }
    let same_shape =
        !a.children.is_empty() && a.children.len() == b.children.len() && a.layout.direction == b.layout.direction;
    same_shape || base_name(&a.name) == base_name(&b.name)
}

/// Find the first run of at least [`MIN_REPEAT`] matching siblings.
///
/// The first child that gathers enough matches becomes the template.
pub fn detect_repetition(children: &[IrNode]) -> Option<RepeatInfo> {
    for (i, template) in children.iter().enumerate() {
        let members: Vec<usize> = std::iter::once(i)
            .chain((i + 1..children.len()).filter(|&j| same_structure(template, &children[j])))
            .collect();
        if members.len() >= MIN_REPEAT {
            return Some(RepeatInfo { template: i, members });
        }
    }
    None
}

/// Mark every repeating container in the subtree.
pub fn apply_patterns(node: &mut IrNode) {
    for child in &mut node.children {
        apply_patterns(child);
    }
    if let Some(repeat) = detect_repetition(&node.children) {
        log::trace!("{} repeats child {} x{}", node.name, repeat.template, repeat.members.len());
        node.meta.is_repeating = true;
        node.meta.repeat = Some(repeat);
    }
}
