//! Neutral intermediate representation of a design.
//!
//! The IR is independent of any styling scheme. It is built once per
//! conversion from an immutable source tree; style adapters and the markup
//! builder only read it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Semantic category of an IR node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Container,
    Text,
    Image,
    Icon,
    Component,
    Instance,
    Divider,
}

/// One visual element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrNode {
    /// Generated id, stable for a given source id.
    pub id: String,
    /// Id of the originating source node.
    pub source_id: String,
    pub kind: NodeKind,
    /// Target element name (`div`, `button`, `h2`, ...).
    pub tag: String,
    pub name: String,
    pub layout: IrLayout,
    pub style: IrStyle,
    /// Text payload for text nodes.
    pub content: Option<String>,
    /// Children in render order.
    pub children: Vec<IrNode>,
    /// Props declared by a component root.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub props: Vec<IrPropDef>,
    /// Component reference for instance nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<InstanceRef>,
    pub meta: IrMeta,
}

impl IrNode {
    /// Create a node with default layout and style.
    pub fn new(
        source_id: impl Into<String>,
        kind: NodeKind,
        tag: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let source_id = source_id.into();
        Self {
            id: ir_id(&source_id),
            source_id,
            kind,
            tag: tag.into(),
            name: name.into(),
            layout: IrLayout::default(),
            style: IrStyle::default(),
            content: None,
            children: Vec::new(),
            props: Vec::new(),
            instance: None,
            meta: IrMeta::default(),
        }
    }

    /// Create a text node.
    pub fn text(source_id: impl Into<String>, tag: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let mut node = Self::new(source_id, NodeKind::Text, tag, content.clone());
        node.content = Some(content);
        node
    }

    pub fn with_child(mut self, child: IrNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_layout(mut self, layout: IrLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_style(mut self, style: IrStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_prop(mut self, prop: IrPropDef) -> Self {
        self.props.push(prop);
        self
    }

    /// Visit this node and all descendants in pre-order.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a IrNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Find a node by IR id in this subtree.
    pub fn find(&self, id: &str) -> Option<&IrNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(IrNode::node_count).sum::<usize>()
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }
}

/// Derive a stable IR id from a source id.
///
/// Source ids look like `12:345` or `I12:34;56:78`; the IR id keeps only
/// identifier-safe characters so it can be used in generated code.
pub fn ir_id(source_id: &str) -> String {
    let body: String = source_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("n{}", body)
}

/// Display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Display {
    Flex,
    #[default]
    Block,
    None,
}

/// Positioning scheme.
///
/// Insets only exist for absolutely positioned nodes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute(Inset),
}

impl Position {
    pub fn is_absolute(&self) -> bool {
        matches!(self, Position::Absolute(_))
    }

    pub fn css(&self) -> &'static str {
        match self {
            Position::Static => "static",
            Position::Relative => "relative",
            Position::Absolute(_) => "absolute",
        }
    }
}

/// Offsets from the nearest positioned ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Inset {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexDirection {
    Row,
    Column,
}

impl FlexDirection {
    pub fn css(&self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Column => "column",
        }
    }
}

/// Main-axis distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justify {
    FlexStart,
    Center,
    FlexEnd,
    SpaceBetween,
}

impl Justify {
    pub fn css(&self) -> &'static str {
        match self {
            Self::FlexStart => "flex-start",
            Self::Center => "center",
            Self::FlexEnd => "flex-end",
            Self::SpaceBetween => "space-between",
        }
    }
}

/// Cross-axis alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    FlexStart,
    Center,
    FlexEnd,
    Baseline,
}

impl Align {
    pub fn css(&self) -> &'static str {
        match self {
            Self::FlexStart => "flex-start",
            Self::Center => "center",
            Self::FlexEnd => "flex-end",
            Self::Baseline => "baseline",
        }
    }
}

/// Sizing policy along one axis.
///
/// Only `Fixed` carries a value, so a value exists exactly when the policy is
/// fixed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum IrSize {
    Fixed(f64),
    Fill,
    Hug,
    #[default]
    Auto,
}

impl IrSize {
    /// The pixel value, present iff the size is fixed.
    pub fn value(&self) -> Option<f64> {
        match self {
            IrSize::Fixed(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, IrSize::Fixed(_))
    }
}

/// Abstract box model of a node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IrLayout {
    pub display: Display,
    pub position: Position,
    pub direction: Option<FlexDirection>,
    pub wrap: bool,
    pub gap: Option<f64>,
    pub row_gap: Option<f64>,
    pub column_gap: Option<f64>,
    /// `[top, right, bottom, left]`.
    pub padding: Option<[f64; 4]>,
    pub justify: Option<Justify>,
    pub align: Option<Align>,
    pub width: IrSize,
    pub height: IrSize,
}

impl IrLayout {
    /// A flex container along the given direction.
    pub fn flex(direction: FlexDirection) -> Self {
        Self {
            display: Display::Flex,
            direction: Some(direction),
            ..Self::default()
        }
    }

    pub fn inset(&self) -> Option<&Inset> {
        match &self.position {
            Position::Absolute(inset) => Some(inset),
            _ => None,
        }
    }
}

/// A color with 8-bit channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha in `0.0..=1.0`.
    pub a: f64,
    /// Shared color style this color came from: its name once resolved
    /// against the document's style table, its id otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_ref: Option<String>,
}

impl IrColor {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0, token_ref: None }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a: a.clamp(0.0, 1.0), token_ref: None }
    }

    /// Convert unit-interval channels.
    pub fn from_unit(r: f64, g: f64, b: f64, a: f64) -> Self {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgba(channel(r), channel(g), channel(b), a)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        let expand = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut chans = hex.chars().map(|c| expand(&format!("{c}{c}")));
                Some(Self::rgb(chans.next()??, chans.next()??, chans.next()??))
            }
            6 => Some(Self::rgb(expand(&hex[0..2])?, expand(&hex[2..4])?, expand(&hex[4..6])?)),
            8 => {
                let a = expand(&hex[6..8])? as f64 / 255.0;
                Some(Self::rgba(expand(&hex[0..2])?, expand(&hex[2..4])?, expand(&hex[4..6])?, a))
            }
            _ => None,
        }
    }

    pub fn with_token_ref(mut self, token_ref: impl Into<String>) -> Self {
        self.token_ref = Some(token_ref.into());
        self
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Lowercase `#rrggbb`, ignoring alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS literal: hex when opaque, `rgba(...)` otherwise.
    pub fn to_css(&self) -> String {
        if self.is_opaque() {
            self.to_hex()
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, format_alpha(self.a))
        }
    }
}

fn format_alpha(a: f64) -> String {
    let rounded = (a * 100.0).round() / 100.0;
    let s = format!("{:.2}", rounded);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Gradient geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientKind {
    Linear,
    Radial,
    Angular,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: IrColor,
    /// Position in `0.0..=1.0`.
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrGradient {
    pub kind: GradientKind,
    /// CSS angle in degrees (0 = to top, 90 = to right), linear only.
    pub angle: Option<f64>,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFill {
    pub image_ref: Option<String>,
    pub scale_mode: Option<String>,
}

/// Background paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    Solid(IrColor),
    Gradient(IrGradient),
    Image(ImageFill),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderStyle {
    Solid,
    Dashed,
}

/// Where the border sits relative to the node edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderPosition {
    Inside,
    Outside,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrBorder {
    pub width: f64,
    pub style: BorderStyle,
    pub color: IrColor,
    pub position: BorderPosition,
}

/// Corner radius: one value, or `[top_left, top_right, bottom_right, bottom_left]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Radius {
    Uniform(f64),
    Corners([f64; 4]),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrShadow {
    pub inset: bool,
    pub x: f64,
    pub y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: IrColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overflow {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Right,
    Center,
    Justify,
}

impl TextAlign {
    pub fn css(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
            Self::Justify => "justify",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextTransform {
    Uppercase,
    Lowercase,
    Capitalize,
}

impl TextTransform {
    pub fn css(&self) -> &'static str {
        match self {
            Self::Uppercase => "uppercase",
            Self::Lowercase => "lowercase",
            Self::Capitalize => "capitalize",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDecorationLine {
    Underline,
    LineThrough,
}

impl TextDecorationLine {
    pub fn css(&self) -> &'static str {
        match self {
            Self::Underline => "underline",
            Self::LineThrough => "line-through",
        }
    }
}

/// Typography of a text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrFont {
    pub family: Option<String>,
    pub size: f64,
    pub weight: u16,
    pub italic: bool,
    /// Line height in px.
    pub line_height: Option<f64>,
    /// Letter spacing in px.
    pub letter_spacing: Option<f64>,
    pub align: Option<TextAlign>,
    pub transform: Option<TextTransform>,
    pub decoration: Option<TextDecorationLine>,
    pub color: Option<IrColor>,
}

impl Default for IrFont {
    fn default() -> Self {
        Self {
            family: None,
            size: 16.0,
            weight: 400,
            italic: false,
            line_height: None,
            letter_spacing: None,
            align: None,
            transform: None,
            decoration: None,
            color: None,
        }
    }
}

/// Abstract style data of a node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IrStyle {
    pub background: Option<Background>,
    pub border: Option<IrBorder>,
    pub border_radius: Option<Radius>,
    pub shadows: SmallVec<[IrShadow; 2]>,
    pub opacity: Option<f64>,
    pub overflow: Option<Overflow>,
    pub font: Option<IrFont>,
}

impl IrStyle {
    pub fn is_empty(&self) -> bool {
        self == &IrStyle::default()
    }
}

/// Type of a component prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropType {
    String,
    Boolean,
    Enum,
    Node,
}

/// A component prop definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrPropDef {
    pub name: String,
    #[serde(rename = "type")]
    pub prop_type: PropType,
    /// Allowed values; non-empty for enums.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl IrPropDef {
    pub fn string(name: impl Into<String>, default_value: Option<String>) -> Self {
        Self {
            name: name.into(),
            prop_type: PropType::String,
            values: Vec::new(),
            default_value,
        }
    }

    pub fn boolean(name: impl Into<String>, default_value: Option<String>) -> Self {
        Self {
            name: name.into(),
            prop_type: PropType::Boolean,
            values: Vec::new(),
            default_value,
        }
    }

    /// An enum prop. Returns `None` when `values` is empty.
    pub fn enumeration(name: impl Into<String>, values: Vec<String>, default_value: Option<String>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            prop_type: PropType::Enum,
            values,
            default_value,
        })
    }

    pub fn node(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prop_type: PropType::Node,
            values: Vec::new(),
            default_value: None,
        }
    }
}

/// Literal value of an instance override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverrideValue {
    Text(String),
    Bool(bool),
}

/// Reference from an instance to its defining component.
///
/// `component_id` is a lookup key into [`ComponentRegistry`], never an
/// embedded copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRef {
    pub component_id: String,
    /// Prop overrides keyed by prop name.
    pub overrides: IndexMap<String, OverrideValue>,
}

/// Repetition detected among a container's children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatInfo {
    /// Index of the child used as iteration template.
    pub template: usize,
    /// Indices of every matching child, template included.
    pub members: Vec<usize>,
}

/// Flags and annotations attached to a node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IrMeta {
    pub is_component_root: bool,
    pub is_variant_container: bool,
    /// True only when backed by at least three structurally identical children.
    pub is_repeating: bool,
    pub repeat: Option<RepeatInfo>,
    pub has_absolute_children: bool,
    pub warnings: Vec<String>,
    /// Shared style references by kind (fill, text, effect).
    pub style_refs: IndexMap<String, String>,
    /// Component prop a text node's content is bound to.
    pub prop_binding: Option<String>,
    /// Why this node probably needs hand-written interactive behavior.
    pub interaction_hint: Option<String>,
}

/// A component known to the conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub id: String,
    pub name: String,
    /// Name of the owning component set for variants.
    pub set_name: Option<String>,
}

impl ComponentEntry {
    /// Name used when rendering instances: the set name for variants.
    pub fn display_name(&self) -> &str {
        self.set_name.as_deref().unwrap_or(&self.name)
    }
}

/// Id-indexed registry of components, used to resolve instances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentRegistry {
    entries: IndexMap<String, ComponentEntry>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component; an existing entry with the same id is kept.
    pub fn register(&mut self, entry: ComponentEntry) {
        self.entries.entry(entry.id.clone()).or_insert(entry);
    }

    pub fn get(&self, id: &str) -> Option<&ComponentEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentEntry> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_value_only_when_fixed() {
        assert_eq!(IrSize::Fixed(120.0).value(), Some(120.0));
        assert_eq!(IrSize::Fill.value(), None);
        assert_eq!(IrSize::Hug.value(), None);
        assert_eq!(IrSize::Auto.value(), None);
    }

    #[test]
    fn test_size_serialized_shape() {
        let fixed = serde_json::to_value(IrSize::Fixed(40.0)).unwrap();
        assert_eq!(fixed, serde_json::json!({"type": "fixed", "value": 40.0}));
        let fill = serde_json::to_value(IrSize::Fill).unwrap();
        assert_eq!(fill, serde_json::json!({"type": "fill"}));
    }

    #[test]
    fn test_color_css() {
        assert_eq!(IrColor::rgb(59, 130, 246).to_css(), "#3b82f6");
        assert_eq!(IrColor::rgba(0, 0, 0, 0.1).to_css(), "rgba(0, 0, 0, 0.1)");
        assert_eq!(IrColor::from_unit(1.0, 0.5, 0.0, 1.0).to_hex(), "#ff8000");
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(IrColor::from_hex("#FFF"), Some(IrColor::rgb(255, 255, 255)));
        assert_eq!(IrColor::from_hex("3B82F6"), Some(IrColor::rgb(59, 130, 246)));
        assert!(IrColor::from_hex("#12").is_none());
    }

    #[test]
    fn test_enum_prop_requires_values() {
        assert!(IrPropDef::enumeration("size", vec![], None).is_none());
        let prop = IrPropDef::enumeration("size", vec!["sm".into()], None).unwrap();
        assert_eq!(prop.prop_type, PropType::Enum);
    }

    #[test]
    fn test_ir_id_is_identifier_safe() {
        assert_eq!(ir_id("12:345"), "n12_345");
        assert_eq!(ir_id("I1:2;3:4"), "nI1_2_3_4");
    }

    #[test]
    fn test_registry_keeps_first_entry() {
        let mut registry = ComponentRegistry::new();
        registry.register(ComponentEntry { id: "1:1".into(), name: "Button".into(), set_name: None });
        registry.register(ComponentEntry { id: "1:1".into(), name: "Other".into(), set_name: None });
        assert_eq!(registry.get("1:1").map(|e| e.name.as_str()), Some("Button"));
        assert_eq!(registry.len(), 1);
    }
}
