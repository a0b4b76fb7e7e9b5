//! Source document model.
//!
//! Mirrors the node JSON delivered by the design tool's file API. Only the
//! attributes the compiler reads are modelled; unknown fields are ignored.
//!
//! Children are parsed leniently: a child that fails to deserialize becomes
//! [`SourceChild::Invalid`] instead of failing the whole document.

use crate::errors::SourceError;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// A complete source document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    /// Document (file) name.
    #[serde(default)]
    pub name: String,
    /// Root node of the tree.
    pub document: SourceNode,
    /// Published component metadata by component id.
    #[serde(default)]
    pub components: IndexMap<String, ComponentMeta>,
    /// Published component set metadata by set id.
    #[serde(default)]
    pub component_sets: IndexMap<String, ComponentMeta>,
    /// Shared style metadata by style id.
    #[serde(default)]
    pub styles: IndexMap<String, StyleMeta>,
}

impl SourceDocument {
    /// Parse a document from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Wrap a bare node tree as a document.
    pub fn from_root(root: SourceNode) -> Self {
        Self {
            name: root.name.clone(),
            document: root,
            components: IndexMap::new(),
            component_sets: IndexMap::new(),
            styles: IndexMap::new(),
        }
    }

    /// Find a node anywhere in the tree.
    pub fn find_node(&self, id: &str) -> Option<&SourceNode> {
        self.document.find(id)
    }
}

/// Component metadata from the document's component table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMeta {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub component_set_id: Option<String>,
}

/// Shared style metadata from the document's style table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleMeta {
    pub name: String,
    /// `FILL`, `TEXT`, `EFFECT` or `GRID`.
    #[serde(default)]
    pub style_type: Option<String>,
}

/// Structural node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Component,
    ComponentSet,
    Instance,
    Text,
    Rectangle,
    Ellipse,
    Line,
    Vector,
    BooleanOperation,
    Star,
    Polygon,
    #[serde(other)]
    Other,
}

impl NodeType {
    /// Shape-like node types rendered as icons or vector art.
    pub fn is_vector(&self) -> bool {
        matches!(
            self,
            Self::Vector | Self::BooleanOperation | Self::Star | Self::Polygon | Self::Line | Self::Ellipse
        )
    }
}

/// Auto-layout mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    None,
    Horizontal,
    Vertical,
    #[serde(other)]
    Other,
}

/// Auto-layout wrap mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutWrap {
    NoWrap,
    Wrap,
    #[serde(other)]
    Other,
}

/// Alignment along either auto-layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisAlign {
    Min,
    Center,
    Max,
    SpaceBetween,
    Baseline,
    #[serde(other)]
    Other,
}

/// Per-axis sizing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizingMode {
    Fixed,
    Fill,
    Hug,
    #[serde(other)]
    Other,
}

/// Whether a child of an auto-layout frame opts out of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutPositioning {
    Auto,
    Absolute,
    #[serde(other)]
    Other,
}

/// Resize constraints of a manually positioned node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Constraints {
    pub vertical: VerticalConstraint,
    pub horizontal: HorizontalConstraint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerticalConstraint {
    Top,
    Bottom,
    Center,
    TopBottom,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HorizontalConstraint {
    Left,
    Right,
    Center,
    LeftRight,
    Scale,
}

/// Absolute bounding box in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// A 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

/// A color with unit-interval channels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "one")]
    pub a: f64,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

/// Paint kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintType {
    Solid,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    #[serde(other)]
    Other,
}

/// One gradient color stop.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Rgba,
}

/// One entry of a fill or stroke list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: PaintType,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default = "one")]
    pub opacity: f64,
    #[serde(default)]
    pub color: Option<Rgba>,
    #[serde(default)]
    pub gradient_handle_positions: Vec<Vector2>,
    #[serde(default)]
    pub gradient_stops: Vec<ColorStop>,
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub scale_mode: Option<String>,
}

impl Paint {
    /// A visible solid paint.
    pub fn solid(color: Rgba) -> Self {
        Self {
            paint_type: PaintType::Solid,
            visible: true,
            opacity: 1.0,
            color: Some(color),
            gradient_handle_positions: Vec::new(),
            gradient_stops: Vec::new(),
            image_ref: None,
            scale_mode: None,
        }
    }

    /// A visible image paint.
    pub fn image(image_ref: impl Into<String>) -> Self {
        Self {
            paint_type: PaintType::Image,
            color: None,
            image_ref: Some(image_ref.into()),
            scale_mode: Some("FILL".to_string()),
            ..Self::solid(Rgba::new(0.0, 0.0, 0.0, 1.0))
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Effect kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    DropShadow,
    InnerShadow,
    LayerBlur,
    BackgroundBlur,
    #[serde(other)]
    Other,
}

/// A visual effect (shadow or blur).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default)]
    pub color: Option<Rgba>,
    #[serde(default)]
    pub offset: Option<Vector2>,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub spread: f64,
}

/// Line-height unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum LineHeightUnit {
    #[serde(rename = "PIXELS")]
    Pixels,
    #[serde(rename = "FONT_SIZE_%")]
    FontSizePercent,
    #[serde(rename = "INTRINSIC_%")]
    IntrinsicPercent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlignHorizontal {
    Left,
    Right,
    Center,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextCase {
    Original,
    Upper,
    Lower,
    Title,
    SmallCaps,
    SmallCapsForced,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextDecoration {
    None,
    Underline,
    Strikethrough,
}

/// Text style payload.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_weight: Option<f64>,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub line_height_px: Option<f64>,
    #[serde(default)]
    pub line_height_percent_font_size: Option<f64>,
    #[serde(default)]
    pub line_height_unit: Option<LineHeightUnit>,
    #[serde(default)]
    pub letter_spacing: Option<f64>,
    #[serde(default)]
    pub text_align_horizontal: Option<TextAlignHorizontal>,
    #[serde(default)]
    pub text_case: Option<TextCase>,
    #[serde(default)]
    pub text_decoration: Option<TextDecoration>,
}

/// Kind of a component property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentPropertyType {
    Boolean,
    Text,
    InstanceSwap,
    Variant,
}

/// A property value set on an instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentProperty {
    #[serde(rename = "type")]
    pub prop_type: ComponentPropertyType,
    pub value: serde_json::Value,
}

/// A property declared by a component or component set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPropertyDefinition {
    #[serde(rename = "type")]
    pub prop_type: ComponentPropertyType,
    #[serde(default)]
    pub default_value: serde_json::Value,
    #[serde(default)]
    pub variant_options: Vec<String>,
}

/// Stroke alignment relative to the node edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrokeAlign {
    Inside,
    Outside,
    Center,
    #[serde(other)]
    Other,
}

/// One node of the source tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(rename = "type")]
    pub node_type: NodeType,

    // Auto-layout
    #[serde(default)]
    pub layout_mode: Option<LayoutMode>,
    #[serde(default)]
    pub layout_wrap: Option<LayoutWrap>,
    #[serde(default)]
    pub primary_axis_align_items: Option<AxisAlign>,
    #[serde(default)]
    pub counter_axis_align_items: Option<AxisAlign>,
    #[serde(default)]
    pub item_spacing: Option<f64>,
    #[serde(default)]
    pub counter_axis_spacing: Option<f64>,
    #[serde(default)]
    pub padding_top: Option<f64>,
    #[serde(default)]
    pub padding_right: Option<f64>,
    #[serde(default)]
    pub padding_bottom: Option<f64>,
    #[serde(default)]
    pub padding_left: Option<f64>,
    #[serde(default)]
    pub layout_sizing_horizontal: Option<SizingMode>,
    #[serde(default)]
    pub layout_sizing_vertical: Option<SizingMode>,
    #[serde(default)]
    pub layout_positioning: Option<LayoutPositioning>,
    #[serde(default)]
    pub constraints: Option<Constraints>,
    #[serde(default)]
    pub absolute_bounding_box: Option<Rect>,

    // Paint
    #[serde(default)]
    pub fills: Vec<Paint>,
    #[serde(default)]
    pub strokes: Vec<Paint>,
    #[serde(default)]
    pub stroke_weight: Option<f64>,
    #[serde(default)]
    pub stroke_align: Option<StrokeAlign>,
    #[serde(default)]
    pub stroke_dashes: Vec<f64>,
    #[serde(default)]
    pub corner_radius: Option<f64>,
    #[serde(default)]
    pub rectangle_corner_radii: Option<[f64; 4]>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub clips_content: bool,

    // Text
    #[serde(default)]
    pub characters: Option<String>,
    #[serde(default)]
    pub style: Option<TypeStyle>,

    // Components
    #[serde(default)]
    pub component_id: Option<String>,
    #[serde(default)]
    pub component_properties: IndexMap<String, ComponentProperty>,
    #[serde(default)]
    pub component_property_definitions: IndexMap<String, ComponentPropertyDefinition>,
    #[serde(default)]
    pub component_property_references: IndexMap<String, String>,
    #[serde(default)]
    pub variant_properties: Option<IndexMap<String, String>>,

    /// Shared style references by kind (fill, text, effect).
    #[serde(default)]
    pub styles: IndexMap<String, String>,

    #[serde(default, deserialize_with = "lenient_children")]
    pub children: Vec<SourceChild>,
}

/// A child slot in the source tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceChild {
    Node(SourceNode),
    /// A child that failed to parse.
    Invalid(InvalidNode),
}

/// What is known about a child that failed to parse.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidNode {
    pub id: Option<String>,
    pub name: Option<String>,
    pub reason: String,
}

impl SourceChild {
    fn from_value(value: serde_json::Value) -> Self {
        let id = value.get("id").and_then(|v| v.as_str()).map(str::to_string);
        let name = value.get("name").and_then(|v| v.as_str()).map(str::to_string);
        match serde_json::from_value::<SourceNode>(value) {
            Ok(node) => SourceChild::Node(node),
            Err(e) => {
                log::debug!("Unparseable source node {:?}: {}", id, e);
                SourceChild::Invalid(InvalidNode {
                    id,
                    name,
                    reason: e.to_string(),
                })
            }
        }
    }

    pub fn as_node(&self) -> Option<&SourceNode> {
        match self {
            SourceChild::Node(n) => Some(n),
            SourceChild::Invalid(_) => None,
        }
    }
}

fn lenient_children<'de, D>(deserializer: D) -> Result<Vec<SourceChild>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(SourceChild::from_value).collect())
}

fn yes() -> bool {
    true
}

fn one() -> f64 {
    1.0
}

impl SourceNode {
    /// Create a bare node with every optional attribute unset.
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visible: true,
            node_type,
            layout_mode: None,
            layout_wrap: None,
            primary_axis_align_items: None,
            counter_axis_align_items: None,
            item_spacing: None,
            counter_axis_spacing: None,
            padding_top: None,
            padding_right: None,
            padding_bottom: None,
            padding_left: None,
            layout_sizing_horizontal: None,
            layout_sizing_vertical: None,
            layout_positioning: None,
            constraints: None,
            absolute_bounding_box: None,
            fills: Vec::new(),
            strokes: Vec::new(),
            stroke_weight: None,
            stroke_align: None,
            stroke_dashes: Vec::new(),
            corner_radius: None,
            rectangle_corner_radii: None,
            effects: Vec::new(),
            opacity: None,
            clips_content: false,
            characters: None,
            style: None,
            component_id: None,
            component_properties: IndexMap::new(),
            component_property_definitions: IndexMap::new(),
            component_property_references: IndexMap::new(),
            variant_properties: None,
            styles: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create a text node.
    pub fn text(id: impl Into<String>, name: impl Into<String>, characters: impl Into<String>) -> Self {
        let mut node = Self::new(id, name, NodeType::Text);
        node.characters = Some(characters.into());
        node
    }

    /// Add a child node.
    pub fn with_child(mut self, child: SourceNode) -> Self {
        self.children.push(SourceChild::Node(child));
        self
    }

    /// Set the bounding box.
    pub fn with_bounds(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.absolute_bounding_box = Some(Rect::new(x, y, width, height));
        self
    }

    /// Enable auto-layout along an axis.
    pub fn with_auto_layout(mut self, mode: LayoutMode, spacing: f64) -> Self {
        self.layout_mode = Some(mode);
        self.item_spacing = Some(spacing);
        self
    }

    /// Whether the node arranges children with auto-layout.
    pub fn has_auto_layout(&self) -> bool {
        matches!(self.layout_mode, Some(LayoutMode::Horizontal | LayoutMode::Vertical))
    }

    /// Iterate parsed children, skipping invalid ones.
    pub fn child_nodes(&self) -> impl Iterator<Item = &SourceNode> {
        self.children.iter().filter_map(SourceChild::as_node)
    }

    /// Whether any visible fill is an image.
    pub fn has_visible_image_fill(&self) -> bool {
        self.fills
            .iter()
            .any(|p| p.visible && p.paint_type == PaintType::Image)
    }

    /// Find a node by id in this subtree.
    pub fn find(&self, id: &str) -> Option<&SourceNode> {
        if self.id == id {
            return Some(self);
        }
        self.child_nodes().find_map(|c| c.find(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let json = r#"{
            "name": "Kit",
            "document": {
                "id": "0:0",
                "name": "Document",
                "type": "DOCUMENT",
                "children": [
                    {"id": "1:1", "name": "Button", "type": "COMPONENT",
                     "layoutMode": "HORIZONTAL", "itemSpacing": 8,
                     "fills": [{"type": "SOLID", "color": {"r": 1, "g": 0, "b": 0}}]}
                ]
            }
        }"#;

        let doc = SourceDocument::from_json_str(json).unwrap();
        let button = doc.find_node("1:1").unwrap();
        assert_eq!(button.node_type, NodeType::Component);
        assert!(button.has_auto_layout());
        assert_eq!(button.item_spacing, Some(8.0));
        assert!(button.visible);
        assert_eq!(button.fills[0].opacity, 1.0);
        assert_eq!(button.fills[0].color.map(|c| c.a), Some(1.0));
    }

    #[test]
    fn test_invalid_child_does_not_fail_document() {
        let json = r#"{
            "document": {
                "id": "0:0", "name": "Root", "type": "FRAME",
                "children": [
                    {"id": "1:1", "name": "Ok", "type": "TEXT", "characters": "hi"},
                    {"id": "1:2", "name": "Broken", "type": "FRAME", "itemSpacing": "wide"},
                    {"id": "1:3", "name": "Also ok", "type": "RECTANGLE"}
                ]
            }
        }"#;

        let doc = SourceDocument::from_json_str(json).unwrap();
        let root = &doc.document;
        assert_eq!(root.children.len(), 3);
        assert!(matches!(root.children[0], SourceChild::Node(_)));
        match &root.children[1] {
            SourceChild::Invalid(bad) => {
                assert_eq!(bad.id.as_deref(), Some("1:2"));
                assert_eq!(bad.name.as_deref(), Some("Broken"));
            }
            other => panic!("expected invalid child, got {other:?}"),
        }
        assert_eq!(root.child_nodes().count(), 2);
    }

    #[test]
    fn test_unknown_node_type_is_other() {
        let json = r#"{"id": "9:9", "name": "Sticky", "type": "STICKY"}"#;
        let node: SourceNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.node_type, NodeType::Other);
    }

    #[test]
    fn test_unknown_attribute_values_degrade_alone() {
        let json = r#"{"id": "9:1", "name": "Row", "type": "FRAME",
            "layoutMode": "HORIZONTAL", "layoutWrap": "SPIRAL",
            "primaryAxisAlignItems": "STRETCH", "layoutSizingHorizontal": "SHRINK",
            "layoutPositioning": "STICKY", "strokeAlign": "MIDDLE", "itemSpacing": 4}"#;
        let node: SourceNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.layout_wrap, Some(LayoutWrap::Other));
        assert_eq!(node.primary_axis_align_items, Some(AxisAlign::Other));
        assert_eq!(node.layout_sizing_horizontal, Some(SizingMode::Other));
        assert_eq!(node.layout_positioning, Some(LayoutPositioning::Other));
        assert_eq!(node.stroke_align, Some(StrokeAlign::Other));
        assert_eq!(node.item_spacing, Some(4.0));

        let style: TypeStyle = serde_json::from_str(r#"{"fontSize": 12, "textCase": "SHOUTING"}"#).unwrap();
        assert_eq!(style.text_case, Some(TextCase::Other));
    }

    #[test]
    fn test_line_height_units() {
        let json = r#"{"fontSize": 16, "lineHeightUnit": "FONT_SIZE_%", "lineHeightPercentFontSize": 150}"#;
        let style: TypeStyle = serde_json::from_str(json).unwrap();
        assert_eq!(style.line_height_unit, Some(LineHeightUnit::FontSizePercent));
    }
}
