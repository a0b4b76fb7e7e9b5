//! CSS declaration generation shared by the stylesheet and CSS-in-JS adapters.

use crate::mapper::{collapse_box, format_number, px, BoxShorthand, GradientValue, TokenMapper, TokenValue};
use canopy_core::ir::{Background, BorderStyle, Display, IrNode, IrSize, Overflow, Position, Radius};
use canopy_core::tokens::{DesignTokens, TokenPath};

/// How a token hit is written into CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenStyle {
    /// The token's literal value.
    #[default]
    Literal,
    /// A styled-components theme interpolation, `${({ theme }) => theme.x}`.
    ThemeProps,
    /// An interpolation of a `theme` binding in scope, `${theme.x}`.
    ThemeScope,
    /// A CSS custom property, `var(--x)`.
    CssVar,
}

impl TokenStyle {
    pub fn render(&self, value: &TokenValue) -> String {
        let path = match (self, value) {
            (TokenStyle::Literal, _) | (_, TokenValue::Raw(_)) => return value.css().to_string(),
            (_, TokenValue::Token { path, .. }) => path,
        };
        match self {
            TokenStyle::ThemeProps => format!("${{({{ theme }}) => {}}}", path.js_accessor("theme")),
            TokenStyle::ThemeScope => format!("${{{}}}", path.js_accessor("theme")),
            TokenStyle::CssVar => path.css_var(),
            TokenStyle::Literal => value.css().to_string(),
        }
    }

    pub fn is_themed(&self) -> bool {
        *self != TokenStyle::Literal
    }
}

/// A single `property: value` pair.
pub type Declaration = (&'static str, String);

/// CSS declarations for one node, in a stable order.
pub fn declarations(node: &IrNode, mapper: &mut TokenMapper, style: TokenStyle) -> Vec<Declaration> {
    let mut out: Vec<Declaration> = Vec::new();
    let layout = &node.layout;

    match layout.display {
        Display::Flex => out.push(("display", "flex".into())),
        Display::None => out.push(("display", "none".into())),
        Display::Block => {}
    }
    if layout.position != Position::Static {
        out.push(("position", layout.position.css().into()));
    }
    if let Some(inset) = layout.inset() {
        for (prop, value) in [("top", inset.top), ("right", inset.right), ("bottom", inset.bottom), ("left", inset.left)] {
            if let Some(v) = value {
                out.push((prop, px(v)));
            }
        }
    }
    if let Some(direction) = layout.direction {
        out.push(("flex-direction", direction.css().into()));
    }
    if layout.wrap {
        out.push(("flex-wrap", "wrap".into()));
    }
    for (prop, value) in [("gap", layout.gap), ("row-gap", layout.row_gap), ("column-gap", layout.column_gap)] {
        if let Some(v) = value {
            let mapped = mapper.map_spacing(v);
            out.push((prop, style.render(&mapped)));
        }
    }
    if let Some(padding) = layout.padding {
        let parts: Vec<f64> = match collapse_box(padding) {
            BoxShorthand::One(v) => vec![v],
            BoxShorthand::Pair { vertical, horizontal } => vec![vertical, horizontal],
            BoxShorthand::Four(all) => all.to_vec(),
        };
        let rendered: Vec<String> = parts
            .into_iter()
            .map(|v| {
                let mapped = mapper.map_spacing(v);
                style.render(&mapped)
            })
            .collect();
        out.push(("padding", rendered.join(" ")));
    }
    if let Some(justify) = layout.justify {
        out.push(("justify-content", justify.css().into()));
    }
    if let Some(align) = layout.align {
        out.push(("align-items", align.css().into()));
    }
    for (prop, size) in [("width", layout.width), ("height", layout.height)] {
        match size {
            IrSize::Fixed(v) => out.push((prop, px(v))),
            IrSize::Fill => out.push((prop, "100%".into())),
            IrSize::Hug => out.push((prop, "fit-content".into())),
            IrSize::Auto => {}
        }
    }

    let s = &node.style;
    match &s.background {
        Some(Background::Solid(color)) => {
            let mapped = mapper.map_color(color);
            out.push(("background-color", style.render(&mapped)));
        }
        Some(Background::Gradient(gradient)) => {
            let css = match mapper.map_gradient(gradient) {
                GradientValue::Directional { direction, from, to } => format!(
                    "linear-gradient({}, {}, {})",
                    direction_keyword(direction),
                    style.render(&from),
                    style.render(&to)
                ),
                GradientValue::Raw(css) => css,
            };
            out.push(("background", css));
        }
        Some(Background::Image(fill)) => {
            if let Some(image_ref) = &fill.image_ref {
                out.push(("background-image", format!("url(\"{}\")", image_ref)));
            }
            out.push(("background-size", "cover".into()));
            out.push(("background-position", "center".into()));
        }
        None => {}
    }
    if let Some(border) = &s.border {
        let color = mapper.map_color(&border.color);
        let line = match border.style {
            BorderStyle::Solid => "solid",
            BorderStyle::Dashed => "dashed",
        };
        out.push(("border", format!("{} {} {}", px(border.width), line, style.render(&color))));
    }
    match s.border_radius {
        Some(Radius::Uniform(r)) => {
            let mapped = mapper.map_radius(r);
            out.push(("border-radius", style.render(&mapped)));
        }
        Some(Radius::Corners(corners)) => {
            let rendered: Vec<String> = corners.iter().map(|c| px(*c)).collect();
            out.push(("border-radius", rendered.join(" ")));
        }
        None => {}
    }
    if !s.shadows.is_empty() {
        let mapped = mapper.map_shadow(&s.shadows);
        out.push(("box-shadow", style.render(&mapped)));
    }
    if let Some(opacity) = s.opacity {
        out.push(("opacity", format_number(opacity)));
    }
    if let Some(overflow) = s.overflow {
        let value = match overflow {
            Overflow::Hidden => "hidden",
            Overflow::Visible => "visible",
        };
        out.push(("overflow", value.into()));
    }

    if let Some(font) = &s.font {
        if let Some(family) = &font.family {
            out.push(("font-family", format!("'{}', sans-serif", family)));
        }
        let size = mapper.map_font_size(font.size);
        out.push(("font-size", style.render(&size)));
        if font.weight != 400 {
            out.push(("font-weight", font.weight.to_string()));
        }
        if font.italic {
            out.push(("font-style", "italic".into()));
        }
        if let Some(lh) = font.line_height {
            out.push(("line-height", px(lh)));
        }
        if let Some(ls) = font.letter_spacing {
            out.push(("letter-spacing", px(ls)));
        }
        if let Some(align) = font.align {
            out.push(("text-align", align.css().into()));
        }
        if let Some(transform) = font.transform {
            out.push(("text-transform", transform.css().into()));
        }
        if let Some(decoration) = font.decoration {
            out.push(("text-decoration", decoration.css().into()));
        }
        if let Some(color) = &font.color {
            let mapped = mapper.map_color(color);
            out.push(("color", style.render(&mapped)));
        }
    }
    out
}

/// CSS keyword for a principal direction short name.
pub fn direction_keyword(direction: &str) -> &'static str {
    match direction {
        "t" => "to top",
        "tr" => "to top right",
        "r" => "to right",
        "br" => "to bottom right",
        "b" => "to bottom",
        "bl" => "to bottom left",
        "l" => "to left",
        _ => "to top left",
    }
}

/// Render declarations as an indented block body.
pub fn block_body(decls: &[Declaration], indent: &str) -> String {
    decls
        .iter()
        .map(|(prop, value)| format!("{}{}: {};\n", indent, prop, value))
        .collect()
}

/// A `:root` block declaring every color, spacing and radius token as a
/// custom property.
pub fn tokens_stylesheet(tokens: &DesignTokens) -> String {
    let mut lines = vec![":root {".to_string()];
    for (path, value) in tokens.color_entries() {
        lines.push(format!("  {}: {};", var_name(&path), value));
    }
    for (table, entries) in [("spacing", &tokens.spacing), ("borderRadius", &tokens.border_radius)] {
        for (key, value) in entries {
            let path = TokenPath::new([table, key.as_str()]);
            lines.push(format!("  {}: {};", var_name(&path), px(*value)));
        }
    }
    for (key, value) in &tokens.shadows {
        lines.push(format!("  {}: {};", var_name(&TokenPath::new(["shadows", key.as_str()])), value));
    }
    for (key, value) in &tokens.typography {
        lines.push(format!(
            "  {}: {};",
            var_name(&TokenPath::new(["typography", key.as_str()])),
            px(value.font_size)
        ));
    }
    lines.push("}".to_string());
    lines.join("\n") + "\n"
}

fn var_name(path: &TokenPath) -> String {
    let var = path.css_var();
    var.trim_start_matches("var(").trim_end_matches(')').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::ir::{FlexDirection, IrColor, IrLayout, IrStyle, NodeKind};
    use std::sync::Arc;

    fn mapper() -> TokenMapper {
        TokenMapper::new(Arc::new(DesignTokens::default()))
    }

    fn card() -> IrNode {
        let mut layout = IrLayout::flex(FlexDirection::Column);
        layout.gap = Some(16.0);
        layout.padding = Some([8.0, 16.0, 8.0, 16.0]);
        let style = IrStyle {
            background: Some(Background::Solid(IrColor::rgb(0x3b, 0x82, 0xf6))),
            border_radius: Some(Radius::Uniform(8.0)),
            ..IrStyle::default()
        };
        IrNode::new("1:1", NodeKind::Container, "div", "Card").with_layout(layout).with_style(style)
    }

    fn find<'a>(decls: &'a [Declaration], prop: &str) -> Option<&'a str> {
        decls.iter().find(|(p, _)| *p == prop).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_literal_declarations() {
        let decls = declarations(&card(), &mut mapper(), TokenStyle::Literal);
        assert_eq!(find(&decls, "display"), Some("flex"));
        assert_eq!(find(&decls, "flex-direction"), Some("column"));
        assert_eq!(find(&decls, "gap"), Some("16px"));
        assert_eq!(find(&decls, "padding"), Some("8px 16px"));
        assert_eq!(find(&decls, "background-color"), Some("#3b82f6"));
        assert_eq!(find(&decls, "border-radius"), Some("8px"));
    }

    #[test]
    fn test_themed_declarations() {
        let decls = declarations(&card(), &mut mapper(), TokenStyle::ThemeProps);
        assert_eq!(
            find(&decls, "background-color"),
            Some("${({ theme }) => theme.colors.blue[500]}")
        );
        let decls = declarations(&card(), &mut mapper(), TokenStyle::CssVar);
        assert_eq!(find(&decls, "gap"), Some("var(--spacing-4)"));
        let decls = declarations(&card(), &mut mapper(), TokenStyle::ThemeScope);
        assert_eq!(find(&decls, "border-radius"), Some("${theme.borderRadius.lg}"));
    }

    #[test]
    fn test_tokens_stylesheet() {
        let css = tokens_stylesheet(&DesignTokens::default());
        assert!(css.starts_with(":root {"));
        assert!(css.contains("  --colors-blue-500: #3b82f6;"));
        assert!(css.contains("  --spacing-4: 16px;"));
    }
}
