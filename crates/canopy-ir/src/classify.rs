//! Node classification.
//!
//! Maps a source node to an IR kind and a target element name. Structural
//! type decides the kind; naming conventions refine the element name.

use canopy_core::ir::NodeKind;
use canopy_core::source::{NodeType, SourceNode};

/// Result of classifying one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: NodeKind,
    pub tag: &'static str,
}

impl Classification {
    fn new(kind: NodeKind, tag: &'static str) -> Self {
        Self { kind, tag }
    }
}

/// Elements whose content model only allows phrasing content.
pub const INLINE_PARENTS: &[&str] = &["button", "a", "label", "span"];

/// Name keywords that suggest behavior the generator cannot synthesize.
const INTERACTION_KEYWORDS: &[&str] = &[
    "hover", "pressed", "open", "closed", "expanded", "dropdown", "modal", "toggle", "tab", "accordion",
];

/// Semantic element names and the name keywords that select them, in
/// priority order.
const SEMANTIC_TAGS: &[(&str, &[&str])] = &[
    ("button", &["button", "btn", "cta"]),
    ("a", &["link"]),
    ("nav", &["nav", "navbar", "navigation"]),
    ("header", &["header", "topbar", "appbar"]),
    ("footer", &["footer"]),
    ("aside", &["aside", "sidebar"]),
    ("main", &["main"]),
    ("form", &["form"]),
    ("article", &["article"]),
    ("section", &["section"]),
];

const TEXT_TAGS: &[(&str, &[&str])] = &[
    ("h1", &["h1", "display"]),
    ("h2", &["h2", "heading", "title", "headline"]),
    ("h3", &["h3", "subtitle", "subheading"]),
    ("h4", &["h4"]),
    ("h5", &["h5"]),
    ("h6", &["h6"]),
];

/// Minimum font size per heading level, descending.
const SIZE_THRESHOLDS: &[(f64, &str)] = &[(32.0, "h1"), (24.0, "h2"), (20.0, "h3")];

/// Keyword-driven classifier.
pub struct NodeClassifier {
    semantic_tags: &'static [(&'static str, &'static [&'static str])],
    text_tags: &'static [(&'static str, &'static [&'static str])],
    size_thresholds: &'static [(f64, &'static str)],
}

impl Default for NodeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeClassifier {
    pub fn new() -> Self {
        Self {
            semantic_tags: SEMANTIC_TAGS,
            text_tags: TEXT_TAGS,
            size_thresholds: SIZE_THRESHOLDS,
        }
    }

    /// Classify `node`, given the element name chosen for its parent.
    pub fn classify(&self, node: &SourceNode, parent_tag: Option<&str>) -> Classification {
        match node.node_type {
            NodeType::Text => Classification::new(NodeKind::Text, self.text_tag(node, parent_tag)),
            NodeType::Component | NodeType::ComponentSet => {
                Classification::new(NodeKind::Component, self.semantic_tag(&node.name).unwrap_or("div"))
            }
            NodeType::Instance => Classification::new(NodeKind::Instance, "div"),
            NodeType::Rectangle | NodeType::Ellipse if node.has_visible_image_fill() => {
                Classification::new(NodeKind::Image, "img")
            }
            NodeType::Line => Classification::new(NodeKind::Divider, "hr"),
            NodeType::Rectangle if has_word(&node.name, &["divider", "separator"]) => {
                Classification::new(NodeKind::Divider, "hr")
            }
            NodeType::Rectangle | NodeType::Ellipse => Classification::new(NodeKind::Container, "div"),
            NodeType::Vector | NodeType::BooleanOperation | NodeType::Star | NodeType::Polygon => {
                Classification::new(NodeKind::Icon, "svg")
            }
            NodeType::Frame | NodeType::Group if is_icon_frame(node) => Classification::new(NodeKind::Icon, "svg"),
            NodeType::Frame | NodeType::Group | NodeType::Section => {
                Classification::new(NodeKind::Container, self.semantic_tag(&node.name).unwrap_or("div"))
            }
            NodeType::Document | NodeType::Canvas | NodeType::Other => Classification::new(NodeKind::Container, "div"),
        }
    }

    /// Semantic element suggested by a node name.
    pub fn semantic_tag(&self, name: &str) -> Option<&'static str> {
        let words = name_words(name);
        self.semantic_tags
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| words.iter().any(|w| w == k)))
            .map(|(tag, _)| *tag)
    }

    fn text_tag(&self, node: &SourceNode, parent_tag: Option<&str>) -> &'static str {
        let words = name_words(&node.name);
        if let Some((tag, _)) = self
            .text_tags
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| words.iter().any(|w| w == k)))
        {
            return *tag;
        }

        if parent_tag.is_some_and(|p| INLINE_PARENTS.contains(&p)) {
            return "span";
        }

        let size = node.style.as_ref().and_then(|s| s.font_size).unwrap_or(0.0);
        self.size_thresholds
            .iter()
            .find(|(min, _)| size >= *min)
            .map(|(_, tag)| *tag)
            .unwrap_or("p")
    }
}

/// A frame named as an icon whose children are all vector shapes.
fn is_icon_frame(node: &SourceNode) -> bool {
    if !has_word(&node.name, &["icon"]) {
        return false;
    }
    let mut children = node.child_nodes().peekable();
    children.peek().is_some() && children.all(|c| c.node_type.is_vector())
}

/// Interaction keyword found in a name, if any.
pub fn interaction_hint(name: &str) -> Option<&'static str> {
    let words = name_words(name);
    INTERACTION_KEYWORDS
        .iter()
        .find(|k| words.iter().any(|w| w == *k))
        .copied()
}

fn has_word(name: &str, keywords: &[&str]) -> bool {
    name_words(name).iter().any(|w| keywords.contains(&w.as_str()))
}

/// Split a layer name into lowercase words.
///
/// Splits on any non-alphanumeric character and on lower-to-upper case
/// transitions, so `NavBar`, `nav-bar` and `Nav Bar` all give `["nav", "bar"]`.
/// Digits stay attached to their word (`H1` gives `["h1"]`).
pub fn name_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in name.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
