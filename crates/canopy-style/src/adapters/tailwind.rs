//! Utility-class styling.

use super::{StyleAdapter, StyleOutput};
use crate::mapper::{collapse_box, format_number, BoxShorthand, GradientValue, MappingStats, TokenMapper, TokenValue};
use canopy_core::ir::{
    Align, Background, BorderStyle, Display, FlexDirection, IrNode, IrSize, Justify, Overflow, Position, Radius,
    TextAlign, TextDecorationLine, TextTransform,
};
use canopy_core::tokens::DesignTokens;
use std::sync::Arc;

/// Emits Tailwind utility classes as a `className` attribute.
#[derive(Debug, Clone)]
pub struct TailwindAdapter {
    mapper: TokenMapper,
}

impl TailwindAdapter {
    pub fn new(tokens: Arc<DesignTokens>) -> Self {
        Self { mapper: TokenMapper::new(tokens) }
    }

    /// Utility classes for one node, in a stable order.
    pub fn classes(&mut self, node: &IrNode) -> Vec<String> {
        let mut classes = Vec::new();
        self.layout_classes(node, &mut classes);
        self.style_classes(node, &mut classes);
        self.font_classes(node, &mut classes);
        classes
    }

    fn layout_classes(&mut self, node: &IrNode, out: &mut Vec<String>) {
        let layout = &node.layout;
        match layout.display {
            Display::Flex => out.push("flex".into()),
            Display::None => out.push("hidden".into()),
            Display::Block => {}
        }
        match layout.position {
            Position::Static => {}
            Position::Relative => out.push("relative".into()),
            Position::Absolute(inset) => {
                out.push("absolute".into());
                for (prefix, value) in [("top", inset.top), ("right", inset.right), ("bottom", inset.bottom), ("left", inset.left)] {
                    if let Some(v) = value {
                        let mapped = self.mapper.map_spacing(v);
                        out.push(format!("{}-{}", prefix, spacing_suffix(&mapped)));
                    }
                }
            }
        }
        if layout.direction == Some(FlexDirection::Column) {
            out.push("flex-col".into());
        }
        if layout.wrap {
            out.push("flex-wrap".into());
        }
        for (prefix, value) in [("gap", layout.gap), ("gap-y", layout.row_gap), ("gap-x", layout.column_gap)] {
            if let Some(v) = value {
                let mapped = self.mapper.map_spacing(v);
                out.push(format!("{}-{}", prefix, spacing_suffix(&mapped)));
            }
        }
        if let Some(padding) = layout.padding {
            let sides: Vec<(&str, f64)> = match collapse_box(padding) {
                BoxShorthand::One(v) => vec![("p", v)],
                BoxShorthand::Pair { vertical, horizontal } => vec![("py", vertical), ("px", horizontal)],
                BoxShorthand::Four([t, r, b, l]) => vec![("pt", t), ("pr", r), ("pb", b), ("pl", l)],
            };
            for (prefix, v) in sides {
                let mapped = self.mapper.map_spacing(v);
                out.push(format!("{}-{}", prefix, spacing_suffix(&mapped)));
            }
        }
        if let Some(justify) = layout.justify {
            out.push(
                match justify {
                    Justify::FlexStart => "justify-start",
                    Justify::Center => "justify-center",
                    Justify::FlexEnd => "justify-end",
                    Justify::SpaceBetween => "justify-between",
                }
                .into(),
            );
        }
        if let Some(align) = layout.align {
            out.push(
                match align {
                    Align::FlexStart => "items-start",
                    Align::Center => "items-center",
                    Align::FlexEnd => "items-end",
                    Align::Baseline => "items-baseline",
                }
                .into(),
            );
        }
        for (prefix, size) in [("w", layout.width), ("h", layout.height)] {
            match size {
                IrSize::Fixed(v) => {
                    let mapped = self.mapper.map_spacing(v);
                    out.push(format!("{}-{}", prefix, spacing_suffix(&mapped)));
                }
                IrSize::Fill => out.push(format!("{}-full", prefix)),
                IrSize::Hug => out.push(format!("{}-fit", prefix)),
                IrSize::Auto => {}
            }
        }
    }

    fn style_classes(&mut self, node: &IrNode, out: &mut Vec<String>) {
        let style = &node.style;
        match &style.background {
            Some(Background::Solid(color)) => {
                let mapped = self.mapper.map_color(color);
                out.push(format!("bg-{}", color_suffix(&mapped)));
            }
            Some(Background::Gradient(gradient)) => match self.mapper.map_gradient(gradient) {
                GradientValue::Directional { direction, from, to } => {
                    out.push(format!("bg-gradient-to-{}", direction));
                    out.push(format!("from-{}", color_suffix(&from)));
                    out.push(format!("to-{}", color_suffix(&to)));
                }
                GradientValue::Raw(css) => out.push(format!("bg-[{}]", arbitrary(&css))),
            },
            Some(Background::Image(fill)) => {
                if let Some(image_ref) = &fill.image_ref {
                    out.push(format!("bg-[url({})]", arbitrary(image_ref)));
                }
                out.push("bg-cover".into());
                out.push("bg-center".into());
            }
            None => {}
        }

        if let Some(border) = &style.border {
            out.push(match border.width {
                w if w == 1.0 => "border".to_string(),
                w if [0.0, 2.0, 4.0, 8.0].contains(&w) => format!("border-{}", format_number(w)),
                w => format!("border-[{}px]", format_number(w)),
            });
            if border.style == BorderStyle::Dashed {
                out.push("border-dashed".into());
            }
            let mapped = self.mapper.map_color(&border.color);
            out.push(format!("border-{}", color_suffix(&mapped)));
        }

        match style.border_radius {
            Some(Radius::Uniform(r)) => {
                let mapped = self.mapper.map_radius(r);
                out.push(keyed_class("rounded", &mapped));
            }
            Some(Radius::Corners(corners)) => {
                for (corner, r) in ["tl", "tr", "br", "bl"].iter().zip(corners) {
                    let mapped = self.mapper.map_radius(r);
                    out.push(keyed_class(&format!("rounded-{}", corner), &mapped));
                }
            }
            None => {}
        }

        if !style.shadows.is_empty() {
            let mapped = self.mapper.map_shadow(&style.shadows);
            out.push(keyed_class("shadow", &mapped));
        }
        if let Some(opacity) = style.opacity {
            let pct = (opacity * 100.0).round();
            if pct % 5.0 == 0.0 {
                out.push(format!("opacity-{}", pct));
            } else {
                out.push(format!("opacity-[{}]", format_number(opacity)));
            }
        }
        if style.overflow == Some(Overflow::Hidden) {
            out.push("overflow-hidden".into());
        }
    }

    fn font_classes(&mut self, node: &IrNode, out: &mut Vec<String>) {
        let Some(font) = &node.style.font else {
            return;
        };
        if let Some(family) = &font.family {
            out.push(format!("font-['{}']", arbitrary(family)));
        }
        let size = self.mapper.map_font_size(font.size);
        out.push(match &size {
            TokenValue::Token { path, .. } => format!("text-{}", path.key()),
            TokenValue::Raw(css) => format!("text-[{}]", arbitrary(css)),
        });
        if font.weight != 400 {
            out.push(weight_class(font.weight));
        }
        if font.italic {
            out.push("italic".into());
        }
        if let Some(lh) = font.line_height {
            out.push(format!("leading-[{}px]", format_number(lh)));
        }
        if let Some(ls) = font.letter_spacing {
            out.push(format!("tracking-[{}px]", format_number(ls)));
        }
        match font.align {
            Some(TextAlign::Center) => out.push("text-center".into()),
            Some(TextAlign::Right) => out.push("text-right".into()),
            Some(TextAlign::Justify) => out.push("text-justify".into()),
            Some(TextAlign::Left) | None => {}
        }
        match font.transform {
            Some(TextTransform::Uppercase) => out.push("uppercase".into()),
            Some(TextTransform::Lowercase) => out.push("lowercase".into()),
            Some(TextTransform::Capitalize) => out.push("capitalize".into()),
            None => {}
        }
        match font.decoration {
            Some(TextDecorationLine::Underline) => out.push("underline".into()),
            Some(TextDecorationLine::LineThrough) => out.push("line-through".into()),
            None => {}
        }
        if let Some(color) = &font.color {
            let mapped = self.mapper.map_color(color);
            out.push(format!("text-{}", color_suffix(&mapped)));
        }
    }
}

impl StyleAdapter for TailwindAdapter {
    fn name(&self) -> &'static str {
        "tailwind"
    }

    fn generate_style(&mut self, node: &IrNode) -> StyleOutput {
        let classes = self.classes(node);
        if classes.is_empty() {
            return StyleOutput::default();
        }
        StyleOutput {
            inline_props: vec![("className".to_string(), format!("\"{}\"", classes.join(" ")))],
            ..StyleOutput::default()
        }
    }

    fn imports(&self) -> Vec<String> {
        Vec::new()
    }

    fn reset(&mut self) {
        self.mapper.reset_stats();
    }

    fn stats(&self) -> MappingStats {
        self.mapper.stats()
    }
}

/// Tailwind arbitrary values cannot contain spaces; they become underscores.
fn arbitrary(css: &str) -> String {
    css.replace(", ", ",").replace(' ', "_")
}

fn spacing_suffix(value: &TokenValue) -> String {
    match value {
        TokenValue::Token { path, .. } => path.key().to_string(),
        TokenValue::Raw(css) => format!("[{}]", arbitrary(css)),
    }
}

fn color_suffix(value: &TokenValue) -> String {
    match value {
        TokenValue::Token { path, .. } => match path.0.as_slice() {
            [_, group, shade] if shade == "DEFAULT" => group.clone(),
            [_, group, shade] => format!("{}-{}", group, shade),
            _ => path.key().to_string(),
        },
        TokenValue::Raw(css) => format!("[{}]", arbitrary(css)),
    }
}

/// `rounded`, `rounded-lg`, `rounded-[5px]`; the `DEFAULT` step drops its key.
fn keyed_class(prefix: &str, value: &TokenValue) -> String {
    match value {
        TokenValue::Token { path, .. } if path.key() == "DEFAULT" => prefix.to_string(),
        TokenValue::Token { path, .. } => format!("{}-{}", prefix, path.key()),
        TokenValue::Raw(css) => format!("{}-[{}]", prefix, arbitrary(css)),
    }
}

fn weight_class(weight: u16) -> String {
    let name = match weight {
        100 => "thin",
        200 => "extralight",
        300 => "light",
        400 => "normal",
        500 => "medium",
        600 => "semibold",
        700 => "bold",
        800 => "extrabold",
        900 => "black",
        other => return format!("font-[{}]", other),
    };
    format!("font-{}", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::ir::{IrColor, IrFont, IrLayout, IrShadow, IrStyle, NodeKind};
    use indexmap::IndexMap;

    fn adapter() -> TailwindAdapter {
        TailwindAdapter::new(Arc::new(DesignTokens::default()))
    }

    fn flex_with_gap(gap: f64) -> IrNode {
        let mut layout = IrLayout::flex(FlexDirection::Row);
        layout.gap = Some(gap);
        IrNode::new("1:1", NodeKind::Container, "div", "Row").with_layout(layout)
    }

    #[test]
    fn test_gap_maps_to_spacing_step() {
        let mut tokens = DesignTokens::empty();
        tokens.spacing = IndexMap::from([("4".to_string(), 16.0)]);
        let mut adapter = TailwindAdapter::new(Arc::new(tokens));
        let classes = adapter.classes(&flex_with_gap(16.0));
        assert!(classes.contains(&"gap-4".to_string()), "{classes:?}");
    }

    #[test]
    fn test_large_gap_uses_arbitrary_value() {
        let mut adapter = adapter();
        let classes = adapter.classes(&flex_with_gap(300.0));
        let gap = classes.iter().find(|c| c.starts_with("gap-")).unwrap();
        assert!(gap.contains("300"));
        assert_eq!(adapter.stats().fallbacks, 1);
    }

    #[test]
    fn test_class_name_attribute() {
        let mut adapter = adapter();
        let style = IrStyle {
            background: Some(Background::Solid(IrColor::rgb(0x3b, 0x82, 0xf6))),
            border_radius: Some(Radius::Uniform(4.0)),
            shadows: [IrShadow {
                inset: false,
                x: 0.0,
                y: 4.0,
                blur: 6.0,
                spread: -1.0,
                color: IrColor::rgba(0, 0, 0, 0.1),
            }]
            .into_iter()
            .collect(),
            ..IrStyle::default()
        };
        let mut layout = IrLayout::flex(FlexDirection::Row);
        layout.padding = Some([8.0, 16.0, 8.0, 16.0]);
        let node = IrNode::new("1:1", NodeKind::Component, "button", "Button")
            .with_layout(layout)
            .with_style(style);

        let output = adapter.generate_style(&node);
        assert_eq!(
            output.inline_props,
            vec![(
                "className".to_string(),
                "\"flex py-2 px-4 bg-blue-500 rounded shadow-md\"".to_string()
            )]
        );
        assert_eq!(adapter.stats().token_hits, 5);
    }

    #[test]
    fn test_text_classes() {
        let mut adapter = adapter();
        let font = IrFont {
            size: 24.0,
            weight: 700,
            align: Some(TextAlign::Center),
            color: Some(IrColor::rgb(255, 255, 255)),
            ..IrFont::default()
        };
        let node = IrNode::text("2:1", "h2", "Hello").with_style(IrStyle { font: Some(font), ..IrStyle::default() });
        assert_eq!(adapter.classes(&node), vec!["text-2xl", "font-bold", "text-center", "text-white"]);
    }

    #[test]
    fn test_raw_color_arbitrary_value() {
        let mut adapter = adapter();
        let node = IrNode::new("3:1", NodeKind::Container, "div", "Overlay").with_style(IrStyle {
            background: Some(Background::Solid(IrColor::rgba(0, 0, 0, 0.5))),
            ..IrStyle::default()
        });
        assert_eq!(adapter.classes(&node), vec!["bg-[rgba(0,0,0,0.5)]"]);
    }

    #[test]
    fn test_empty_node_has_no_attribute() {
        let mut adapter = adapter();
        let node = IrNode::new("4:1", NodeKind::Container, "div", "Plain");
        assert!(adapter.generate_style(&node).is_empty());
    }
}
