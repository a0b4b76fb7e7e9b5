//! Style normalization.
//!
//! Extracts backgrounds, borders, radii, shadows and typography from a source
//! node. Fill selection and stroke selection deliberately differ: the last
//! visible fill is the one painted on top, while the first visible stroke is
//! the one the source tool reports as the node's border.

use crate::layout::round2;
use canopy_core::diagnostics::{DiagnosticCode, Diagnostics};
use canopy_core::ir::{
    Background, BorderPosition, BorderStyle, GradientKind, GradientStop, ImageFill, IrBorder, IrColor,
    IrFont, IrGradient, IrShadow, IrStyle, Overflow, Radius, TextAlign, TextDecorationLine, TextTransform,
};
use canopy_core::source::{
    EffectType, LineHeightUnit, NodeType, Paint, PaintType, Rgba, SourceNode, StrokeAlign, StyleMeta,
    TextAlignHorizontal, TextCase, TextDecoration, TypeStyle,
};
use indexmap::IndexMap;

/// Compute the abstract style of a node.
///
/// Unsupported features fall back to the nearest representable style and
/// record an [`DiagnosticCode::UnsupportedStyle`] diagnostic.
pub fn normalize_style(node: &SourceNode, diagnostics: &mut Diagnostics) -> IrStyle {
    let mut style = IrStyle::default();

    if node.node_type == NodeType::Text {
        style.font = Some(font_of(node, diagnostics));
    } else {
        style.background = background(&node.fills).and_then(|paint| paint_background(node, paint, diagnostics));
    }

    style.border = border(node, diagnostics);
    style.border_radius = radius(node);

    for effect in node.effects.iter().filter(|e| e.visible) {
        match effect.effect_type {
            EffectType::DropShadow | EffectType::InnerShadow => {
                let offset = effect.offset.unwrap_or_default();
                style.shadows.push(IrShadow {
                    inset: effect.effect_type == EffectType::InnerShadow,
                    x: round2(offset.x),
                    y: round2(offset.y),
                    blur: round2(effect.radius),
                    spread: round2(effect.spread),
                    color: effect
                        .color
                        .map(|c| color(c, 1.0))
                        .unwrap_or_else(|| IrColor::rgba(0, 0, 0, 0.25)),
                });
            }
            EffectType::LayerBlur | EffectType::BackgroundBlur => {
                diagnostics.warn(
                    DiagnosticCode::UnsupportedStyle,
                    Some(node.id.as_str()),
                    "blur effects are not supported and were dropped",
                );
            }
            EffectType::Other => {}
        }
    }

    if let Some(opacity) = node.opacity.filter(|o| *o < 1.0) {
        style.opacity = Some(round2(opacity));
    }
    if node.clips_content {
        style.overflow = Some(Overflow::Hidden);
    }
    attach_style_refs(node, &mut style);
    style
}

/// Shared style id a node references for `fill` or `stroke` paints.
fn style_ref<'n>(node: &'n SourceNode, kind: &str) -> Option<&'n String> {
    node.styles.get(kind).or_else(|| node.styles.get(&format!("{kind}s")))
}

/// Tag solid fill and stroke colors with the shared style they came from.
fn attach_style_refs(node: &SourceNode, style: &mut IrStyle) {
    if let Some(fill) = style_ref(node, "fill") {
        if let Some(Background::Solid(c)) = &mut style.background {
            c.token_ref = Some(fill.clone());
        }
        if let Some(c) = style.font.as_mut().and_then(|f| f.color.as_mut()) {
            c.token_ref = Some(fill.clone());
        }
    }
    if let (Some(stroke), Some(border)) = (style_ref(node, "stroke"), style.border.as_mut()) {
        border.color.token_ref = Some(stroke.clone());
    }
}

/// Replace style ids in color token refs with their names from the
/// document's style table. Unknown ids are kept.
pub fn resolve_style_names(style: &mut IrStyle, styles: &IndexMap<String, StyleMeta>) {
    let background = match &mut style.background {
        Some(Background::Solid(c)) => Some(c),
        _ => None,
    };
    let border = style.border.as_mut().map(|b| &mut b.color);
    let font = style.font.as_mut().and_then(|f| f.color.as_mut());
    for color in [background, border, font].into_iter().flatten() {
        if let Some(meta) = color.token_ref.as_ref().and_then(|id| styles.get(id)) {
            color.token_ref = Some(meta.name.clone());
        }
    }
}

/// The fill that ends up painted: the last visible one.
pub fn background(fills: &[Paint]) -> Option<&Paint> {
    fills.iter().rev().find(|p| p.visible)
}

/// The stroke used as the border: the first visible one.
pub fn stroke(strokes: &[Paint]) -> Option<&Paint> {
    strokes.iter().find(|p| p.visible)
}

fn paint_background(node: &SourceNode, paint: &Paint, diagnostics: &mut Diagnostics) -> Option<Background> {
    match paint.paint_type {
        PaintType::Solid => paint.color.map(|c| Background::Solid(color(c, paint.opacity))),
        PaintType::GradientLinear => Some(Background::Gradient(gradient(paint, GradientKind::Linear))),
        PaintType::GradientRadial => Some(Background::Gradient(gradient(paint, GradientKind::Radial))),
        PaintType::GradientAngular => Some(Background::Gradient(gradient(paint, GradientKind::Angular))),
        PaintType::GradientDiamond => {
            diagnostics.warn(
                DiagnosticCode::UnsupportedStyle,
                Some(node.id.as_str()),
                "diamond gradient rendered as radial",
            );
            Some(Background::Gradient(gradient(paint, GradientKind::Radial)))
        }
        PaintType::Image => Some(Background::Image(ImageFill {
            image_ref: paint.image_ref.clone(),
            scale_mode: paint.scale_mode.clone(),
        })),
        PaintType::Other => None,
    }
}

/// Convert a unit color, multiplying its alpha by the paint opacity.
pub fn color(c: Rgba, opacity: f64) -> IrColor {
    IrColor::from_unit(c.r, c.g, c.b, round2(c.a * opacity))
}

fn gradient(paint: &Paint, kind: GradientKind) -> IrGradient {
    let angle = match kind {
        GradientKind::Linear => Some(gradient_angle(paint)),
        _ => None,
    };
    IrGradient {
        kind,
        angle,
        stops: paint
            .gradient_stops
            .iter()
            .map(|stop| GradientStop {
                color: color(stop.color, paint.opacity),
                position: round2(stop.position),
            })
            .collect(),
    }
}

/// CSS angle of a linear gradient (0 = to top, 90 = to right).
///
/// Handle coordinates grow downwards, so a handle pointing straight down
/// yields 180.
pub fn gradient_angle(paint: &Paint) -> f64 {
    let [start, end, ..] = paint.gradient_handle_positions.as_slice() else {
        return 180.0;
    };
    let (dx, dy) = (end.x - start.x, end.y - start.y);
    if dx == 0.0 && dy == 0.0 {
        return 180.0;
    }
    let degrees = dy.atan2(dx).to_degrees() + 90.0;
    round2(degrees.rem_euclid(360.0))
}

fn border(node: &SourceNode, diagnostics: &mut Diagnostics) -> Option<IrBorder> {
    let paint = stroke(&node.strokes)?;
    let border_color = match (paint.paint_type, paint.color) {
        (PaintType::Solid, Some(c)) => color(c, paint.opacity),
        _ => {
            let first_stop = paint.gradient_stops.first()?;
            diagnostics.warn(
                DiagnosticCode::UnsupportedStyle,
                Some(node.id.as_str()),
                "non-solid stroke rendered with its first color",
            );
            color(first_stop.color, paint.opacity)
        }
    };
    let width = node.stroke_weight.unwrap_or(1.0);
    if width <= 0.0 {
        return None;
    }
    Some(IrBorder {
        width: round2(width),
        style: if node.stroke_dashes.is_empty() { BorderStyle::Solid } else { BorderStyle::Dashed },
        color: border_color,
        position: match node.stroke_align {
            Some(StrokeAlign::Outside) => BorderPosition::Outside,
            Some(StrokeAlign::Center) => BorderPosition::Center,
            Some(StrokeAlign::Inside | StrokeAlign::Other) | None => BorderPosition::Inside,
        },
    })
}

fn radius(node: &SourceNode) -> Option<Radius> {
    if let Some(corners) = node.rectangle_corner_radii {
        let corners = corners.map(round2);
        if corners.iter().all(|c| *c == corners[0]) {
            return (corners[0] > 0.0).then_some(Radius::Uniform(corners[0]));
        }
        return Some(Radius::Corners(corners));
    }
    node.corner_radius
        .filter(|r| *r > 0.0)
        .map(|r| Radius::Uniform(round2(r)))
}

fn font_of(node: &SourceNode, diagnostics: &mut Diagnostics) -> IrFont {
    let fallback = TypeStyle::default();
    let ts = node.style.as_ref().unwrap_or(&fallback);
    let mut font = IrFont {
        family: ts.font_family.clone(),
        italic: ts.italic,
        ..IrFont::default()
    };
    if let Some(size) = ts.font_size {
        font.size = round2(size);
    }
    if let Some(weight) = ts.font_weight {
        font.weight = weight.round().clamp(1.0, 1000.0) as u16;
    }

    font.line_height = match ts.line_height_unit {
        Some(LineHeightUnit::IntrinsicPercent) => None,
        Some(LineHeightUnit::FontSizePercent) => ts
            .line_height_percent_font_size
            .map(|pct| round2(font.size * pct / 100.0)),
        Some(LineHeightUnit::Pixels) | None => ts.line_height_px.map(round2),
    };
    font.letter_spacing = ts.letter_spacing.filter(|s| *s != 0.0).map(round2);

    font.align = match ts.text_align_horizontal {
        Some(TextAlignHorizontal::Center) => Some(TextAlign::Center),
        Some(TextAlignHorizontal::Right) => Some(TextAlign::Right),
        Some(TextAlignHorizontal::Justified) => Some(TextAlign::Justify),
        Some(TextAlignHorizontal::Left) | None => None,
    };
    font.transform = match ts.text_case {
        Some(TextCase::Upper) => Some(TextTransform::Uppercase),
        Some(TextCase::Lower) => Some(TextTransform::Lowercase),
        Some(TextCase::Title) => Some(TextTransform::Capitalize),
        _ => None,
    };
    font.decoration = match ts.text_decoration {
        Some(TextDecoration::Underline) => Some(TextDecorationLine::Underline),
        Some(TextDecoration::Strikethrough) => Some(TextDecorationLine::LineThrough),
        Some(TextDecoration::None) | None => None,
    };

    font.color = match background(&node.fills) {
        Some(Paint { paint_type: PaintType::Solid, color: Some(c), opacity, .. }) => Some(color(*c, *opacity)),
        Some(paint) => {
            diagnostics.warn(
                DiagnosticCode::UnsupportedStyle,
                Some(node.id.as_str()),
                format!("{:?} text fill rendered with the default color", paint.paint_type),
            );
            None
        }
        None => None,
    };
    font
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::source::{ColorStop, Effect, Vector2};

    fn rect() -> SourceNode {
        SourceNode::new("1:1", "Box", NodeType::Rectangle)
    }

    fn red() -> Rgba {
        Rgba::new(1.0, 0.0, 0.0, 1.0)
    }

    fn blue() -> Rgba {
        Rgba::new(0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn test_last_visible_fill_wins() {
        let mut node = rect();
        node.fills = vec![Paint::solid(red()), Paint::solid(blue()), Paint::solid(red()).hidden()];
        let style = normalize_style(&node, &mut Diagnostics::new());
        assert_eq!(style.background, Some(Background::Solid(IrColor::rgb(0, 0, 255))));
    }

    #[test]
    fn test_style_refs_tag_colors() {
        let mut node = rect();
        node.fills = vec![Paint::solid(blue())];
        node.strokes = vec![Paint::solid(red())];
        node.stroke_weight = Some(1.0);
        node.styles.insert("fill".into(), "S:fill,1:1".into());
        node.styles.insert("strokes".into(), "S:line,1:2".into());

        let mut style = normalize_style(&node, &mut Diagnostics::new());
        match &style.background {
            Some(Background::Solid(c)) => assert_eq!(c.token_ref.as_deref(), Some("S:fill,1:1")),
            other => panic!("expected solid background, got {other:?}"),
        }
        assert_eq!(style.border.as_ref().and_then(|b| b.color.token_ref.as_deref()), Some("S:line,1:2"));

        let mut styles = IndexMap::new();
        styles.insert("S:fill,1:1".to_string(), StyleMeta { name: "Blue/500".into(), style_type: None });
        resolve_style_names(&mut style, &styles);
        match &style.background {
            Some(Background::Solid(c)) => assert_eq!(c.token_ref.as_deref(), Some("Blue/500")),
            other => panic!("expected solid background, got {other:?}"),
        }
        assert_eq!(style.border.as_ref().and_then(|b| b.color.token_ref.as_deref()), Some("S:line,1:2"));
    }

    #[test]
    fn test_text_fill_style_ref() {
        let mut node = SourceNode::text("1:2", "Label", "Hi");
        node.fills = vec![Paint::solid(red())];
        node.styles.insert("fill".into(), "S:ink".into());
        let style = normalize_style(&node, &mut Diagnostics::new());
        let color = style.font.and_then(|f| f.color);
        assert_eq!(color.and_then(|c| c.token_ref).as_deref(), Some("S:ink"));
    }

    #[test]
    fn test_no_visible_fill_means_no_background() {
        let mut node = rect();
        assert_eq!(normalize_style(&node, &mut Diagnostics::new()).background, None);
        node.fills = vec![Paint::solid(red()).hidden()];
        assert_eq!(normalize_style(&node, &mut Diagnostics::new()).background, None);
    }

    #[test]
    fn test_first_visible_stroke_wins() {
        let mut node = rect();
        node.strokes = vec![Paint::solid(red()).hidden(), Paint::solid(blue()), Paint::solid(red())];
        node.stroke_weight = Some(2.0);
        let border = normalize_style(&node, &mut Diagnostics::new()).border.unwrap();
        assert_eq!(border.color, IrColor::rgb(0, 0, 255));
        assert_eq!(border.width, 2.0);
        assert_eq!(border.style, BorderStyle::Solid);
    }

    #[test]
    fn test_paint_opacity_multiplies_alpha() {
        let mut node = rect();
        let mut paint = Paint::solid(Rgba::new(0.0, 0.0, 0.0, 0.5));
        paint.opacity = 0.5;
        node.fills = vec![paint];
        match normalize_style(&node, &mut Diagnostics::new()).background {
            Some(Background::Solid(c)) => assert_eq!(c.a, 0.25),
            other => panic!("unexpected background {other:?}"),
        }
    }

    #[test]
    fn test_radius_collapses() {
        let mut node = rect();
        node.rectangle_corner_radii = Some([8.0, 8.0, 8.0, 8.0]);
        assert_eq!(radius(&node), Some(Radius::Uniform(8.0)));
        node.rectangle_corner_radii = Some([8.0, 8.0, 0.0, 0.0]);
        assert_eq!(radius(&node), Some(Radius::Corners([8.0, 8.0, 0.0, 0.0])));
        node.rectangle_corner_radii = Some([0.0; 4]);
        assert_eq!(radius(&node), None);
    }

    #[test]
    fn test_blur_dropped_with_diagnostic() {
        let mut node = rect();
        node.effects = vec![
            Effect {
                effect_type: EffectType::LayerBlur,
                visible: true,
                color: None,
                offset: None,
                radius: 4.0,
                spread: 0.0,
            },
            Effect {
                effect_type: EffectType::DropShadow,
                visible: true,
                color: Some(Rgba::new(0.0, 0.0, 0.0, 0.1)),
                offset: Some(Vector2 { x: 0.0, y: 4.0 }),
                radius: 6.0,
                spread: -1.0,
            },
        ];
        let mut diagnostics = Diagnostics::new();
        let style = normalize_style(&node, &mut diagnostics);
        assert_eq!(style.shadows.len(), 1);
        assert_eq!(style.shadows[0].y, 4.0);
        assert_eq!(diagnostics.count(DiagnosticCode::UnsupportedStyle), 1);
    }

    #[test]
    fn test_gradient_angle_from_handles() {
        let mut paint = Paint::solid(red());
        paint.paint_type = PaintType::GradientLinear;
        paint.gradient_handle_positions = vec![Vector2 { x: 0.0, y: 0.5 }, Vector2 { x: 1.0, y: 0.5 }];
        assert_eq!(gradient_angle(&paint), 90.0);
        paint.gradient_handle_positions = vec![Vector2 { x: 0.5, y: 0.0 }, Vector2 { x: 0.5, y: 1.0 }];
        assert_eq!(gradient_angle(&paint), 180.0);
        paint.gradient_handle_positions = vec![Vector2 { x: 0.5, y: 1.0 }, Vector2 { x: 0.5, y: 0.0 }];
        assert_eq!(gradient_angle(&paint), 0.0);
    }

    #[test]
    fn test_gradient_stops_keep_order() {
        let mut node = rect();
        let mut paint = Paint::solid(red());
        paint.paint_type = PaintType::GradientLinear;
        paint.color = None;
        paint.gradient_stops = vec![
            ColorStop { position: 0.0, color: red() },
            ColorStop { position: 1.0, color: blue() },
        ];
        node.fills = vec![paint];
        match normalize_style(&node, &mut Diagnostics::new()).background {
            Some(Background::Gradient(g)) => {
                assert_eq!(g.kind, GradientKind::Linear);
                assert_eq!(g.stops[0].color.to_hex(), "#ff0000");
                assert_eq!(g.stops[1].position, 1.0);
            }
            other => panic!("unexpected background {other:?}"),
        }
    }

    #[test]
    fn test_text_fill_becomes_font_color() {
        let mut node = SourceNode::text("2:1", "Title", "Hello");
        node.fills = vec![Paint::solid(red())];
        node.style = Some(TypeStyle {
            font_size: Some(20.0),
            font_weight: Some(600.0),
            line_height_unit: Some(LineHeightUnit::FontSizePercent),
            line_height_percent_font_size: Some(150.0),
            text_case: Some(TextCase::Upper),
            text_decoration: Some(TextDecoration::Strikethrough),
            ..TypeStyle::default()
        });

        let style = normalize_style(&node, &mut Diagnostics::new());
        assert_eq!(style.background, None);
        let font = style.font.unwrap();
        assert_eq!(font.color, Some(IrColor::rgb(255, 0, 0)));
        assert_eq!(font.weight, 600);
        assert_eq!(font.line_height, Some(30.0));
        assert_eq!(font.transform, Some(TextTransform::Uppercase));
        assert_eq!(font.decoration, Some(TextDecorationLine::LineThrough));
    }
}
