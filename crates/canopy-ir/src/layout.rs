//! Layout normalization.
//!
//! Translates the source tool's auto-layout attributes into the flexbox-like
//! [`IrLayout`] box model, and manually positioned children into absolute
//! offsets.

use canopy_core::ir::{Align, Display, FlexDirection, Inset, IrLayout, IrSize, Justify, Position};
use canopy_core::source::{
    AxisAlign, HorizontalConstraint, LayoutMode, LayoutPositioning, LayoutWrap, Rect, SizingMode,
    SourceNode, VerticalConstraint,
};

/// Warning attached to containers that position children by hand.
pub const NO_AUTO_LAYOUT_WARNING: &str = "no auto-layout, review responsiveness";

/// Compute the box model of a node, ignoring its position among siblings.
pub fn normalize_layout(node: &SourceNode) -> IrLayout {
    let mut layout = IrLayout::default();

    if node.has_auto_layout() {
        layout.display = Display::Flex;
        layout.direction = match node.layout_mode {
            Some(LayoutMode::Vertical) => Some(FlexDirection::Column),
            _ => Some(FlexDirection::Row),
        };
        layout.justify = node.primary_axis_align_items.and_then(primary_align);
        layout.align = node.counter_axis_align_items.and_then(counter_align);

        let item_spacing = node.item_spacing.filter(|s| *s != 0.0);
        if node.layout_wrap == Some(LayoutWrap::Wrap) {
            layout.wrap = true;
            let row_gap = node.counter_axis_spacing.filter(|s| *s != 0.0);
            if row_gap.is_none() || row_gap == item_spacing {
                layout.gap = item_spacing;
            } else {
                layout.row_gap = row_gap;
                layout.column_gap = item_spacing;
            }
        } else {
            layout.gap = item_spacing;
        }

        let padding = [
            node.padding_top.unwrap_or(0.0),
            node.padding_right.unwrap_or(0.0),
            node.padding_bottom.unwrap_or(0.0),
            node.padding_left.unwrap_or(0.0),
        ];
        if padding.iter().any(|p| *p != 0.0) {
            layout.padding = Some(padding);
        }
    }

    let bbox = node.absolute_bounding_box;
    layout.width = axis_size(node.layout_sizing_horizontal, bbox.map(|b| b.width));
    layout.height = axis_size(node.layout_sizing_vertical, bbox.map(|b| b.height));
    layout
}

fn primary_align(align: AxisAlign) -> Option<Justify> {
    match align {
        AxisAlign::Min => Some(Justify::FlexStart),
        AxisAlign::Center => Some(Justify::Center),
        AxisAlign::Max => Some(Justify::FlexEnd),
        AxisAlign::SpaceBetween => Some(Justify::SpaceBetween),
        AxisAlign::Baseline | AxisAlign::Other => None,
    }
}

fn counter_align(align: AxisAlign) -> Option<Align> {
    match align {
        AxisAlign::Min => Some(Align::FlexStart),
        AxisAlign::Center => Some(Align::Center),
        AxisAlign::Max => Some(Align::FlexEnd),
        AxisAlign::Baseline => Some(Align::Baseline),
        AxisAlign::SpaceBetween | AxisAlign::Other => None,
    }
}

fn axis_size(mode: Option<SizingMode>, extent: Option<f64>) -> IrSize {
    match (mode, extent) {
        (Some(SizingMode::Fill), _) => IrSize::Fill,
        (Some(SizingMode::Hug), _) => IrSize::Hug,
        (Some(SizingMode::Fixed | SizingMode::Other) | None, Some(v)) => IrSize::Fixed(round2(v)),
        (_, None) => IrSize::Auto,
    }
}

/// Whether a child of an auto-layout frame opted out of the flow.
pub fn is_explicitly_absolute(node: &SourceNode) -> bool {
    node.layout_positioning == Some(LayoutPositioning::Absolute)
}

/// Absolute position of `child` relative to the positioned ancestor `origin`.
///
/// Horizontal RIGHT anchors to the right edge, LEFT_RIGHT to both edges;
/// every other constraint anchors left. The vertical axis works the same way.
pub fn absolute_position(child: &SourceNode, origin: Option<Rect>) -> Position {
    let (Some(bbox), Some(origin)) = (child.absolute_bounding_box, origin) else {
        return Position::Absolute(Inset { top: Some(0.0), left: Some(0.0), ..Inset::default() });
    };

    let left = round2(bbox.x - origin.x);
    let top = round2(bbox.y - origin.y);
    let right = round2(origin.x + origin.width - (bbox.x + bbox.width));
    let bottom = round2(origin.y + origin.height - (bbox.y + bbox.height));

    let mut inset = Inset::default();
    match child.constraints.map(|c| c.horizontal) {
        Some(HorizontalConstraint::Right) => inset.right = Some(right),
        Some(HorizontalConstraint::LeftRight) => {
            inset.left = Some(left);
            inset.right = Some(right);
        }
        _ => inset.left = Some(left),
    }
    match child.constraints.map(|c| c.vertical) {
        Some(VerticalConstraint::Bottom) => inset.bottom = Some(bottom),
        Some(VerticalConstraint::TopBottom) => {
            inset.top = Some(top);
            inset.bottom = Some(bottom);
        }
        _ => inset.top = Some(top),
    }
    Position::Absolute(inset)
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::source::{Constraints, NodeType};

    fn frame() -> SourceNode {
        SourceNode::new("1:1", "Frame", NodeType::Frame).with_bounds(0.0, 0.0, 200.0, 100.0)
    }

    #[test]
    fn test_auto_layout_becomes_flex() {
        let mut node = frame().with_auto_layout(LayoutMode::Vertical, 12.0);
        node.primary_axis_align_items = Some(AxisAlign::Center);
        node.counter_axis_align_items = Some(AxisAlign::Max);

        let layout = normalize_layout(&node);
        assert_eq!(layout.display, Display::Flex);
        assert_eq!(layout.direction, Some(FlexDirection::Column));
        assert_eq!(layout.justify, Some(Justify::Center));
        assert_eq!(layout.align, Some(Align::FlexEnd));
        assert_eq!(layout.gap, Some(12.0));
        assert_eq!(layout.padding, None);
    }

    #[test]
    fn test_space_between_keeps_gap() {
        let mut node = frame().with_auto_layout(LayoutMode::Horizontal, 8.0);
        node.primary_axis_align_items = Some(AxisAlign::SpaceBetween);

        let layout = normalize_layout(&node);
        assert_eq!(layout.justify, Some(Justify::SpaceBetween));
        assert_eq!(layout.gap, Some(8.0));
    }

    #[test]
    fn test_unknown_sizing_keeps_fixed_extent() {
        let mut node = frame();
        node.layout_sizing_horizontal = Some(SizingMode::Other);
        node.primary_axis_align_items = Some(AxisAlign::Other);
        assert_eq!(normalize_layout(&node).width, IrSize::Fixed(200.0));

        let mut flex = frame().with_auto_layout(LayoutMode::Horizontal, 4.0);
        flex.primary_axis_align_items = Some(AxisAlign::Other);
        assert_eq!(normalize_layout(&flex).justify, None);
    }

    #[test]
    fn test_padding_only_when_nonzero() {
        let mut node = frame().with_auto_layout(LayoutMode::Horizontal, 0.0);
        node.padding_top = Some(0.0);
        assert_eq!(normalize_layout(&node).padding, None);

        node.padding_left = Some(16.0);
        node.padding_right = Some(16.0);
        assert_eq!(normalize_layout(&node).padding, Some([0.0, 16.0, 0.0, 16.0]));
    }

    #[test]
    fn test_wrap_splits_gaps() {
        let mut node = frame().with_auto_layout(LayoutMode::Horizontal, 8.0);
        node.layout_wrap = Some(LayoutWrap::Wrap);
        node.counter_axis_spacing = Some(24.0);

        let layout = normalize_layout(&node);
        assert!(layout.wrap);
        assert_eq!(layout.row_gap, Some(24.0));
        assert_eq!(layout.column_gap, Some(8.0));
        assert_eq!(layout.gap, None);
    }

    #[test]
    fn test_sizing_modes() {
        let mut node = frame();
        node.layout_sizing_horizontal = Some(SizingMode::Fill);
        node.layout_sizing_vertical = Some(SizingMode::Hug);
        let layout = normalize_layout(&node);
        assert_eq!(layout.width, IrSize::Fill);
        assert_eq!(layout.height, IrSize::Hug);

        let unspecified = normalize_layout(&frame());
        assert_eq!(unspecified.width, IrSize::Fixed(200.0));

        let no_bbox = normalize_layout(&SourceNode::new("2:2", "Loose", NodeType::Frame));
        assert_eq!(no_bbox.width, IrSize::Auto);
        assert_eq!(no_bbox.width.value(), None);
    }

    #[test]
    fn test_absolute_offsets_follow_constraints() {
        let origin = Rect::new(100.0, 100.0, 400.0, 300.0);
        let mut child = SourceNode::new("3:3", "Badge", NodeType::Frame).with_bounds(450.0, 110.0, 40.0, 20.0);
        child.constraints = Some(Constraints {
            vertical: VerticalConstraint::Top,
            horizontal: HorizontalConstraint::Right,
        });

        let Position::Absolute(inset) = absolute_position(&child, Some(origin)) else {
            panic!("expected absolute position");
        };
        assert_eq!(inset.right, Some(10.0));
        assert_eq!(inset.left, None);
        assert_eq!(inset.top, Some(10.0));
        assert_eq!(inset.bottom, None);
    }

    #[test]
    fn test_default_constraints_anchor_top_left() {
        let origin = Rect::new(0.0, 0.0, 100.0, 100.0);
        let child = SourceNode::new("4:4", "Dot", NodeType::Ellipse).with_bounds(10.5, 20.25, 5.0, 5.0);
        let position = absolute_position(&child, Some(origin));
        assert_eq!(
            position,
            Position::Absolute(Inset { top: Some(20.25), left: Some(10.5), right: None, bottom: None })
        );
    }
}
