use super::{StyleAdapter, StyleCollector, StyleOutput};
use crate::css::TokenStyle;
use crate::mapper::MappingStats;
use canopy_core::ir::IrNode;

/// An adapter whose token hits can reference a theme instead of literals.
pub trait Themeable {
    /// How token hits are written when theming is on.
    fn themed_style(&self) -> TokenStyle;

    fn set_token_style(&mut self, style: TokenStyle);

    /// Extra imports a themed component file needs.
    fn theme_imports(&self) -> Vec<String>;
}

/// Theming layered over any themeable adapter.
///
/// Switches the inner adapter to its theme-reference style on construction
/// and appends the theme imports; everything else is delegated.
#[derive(Debug, Clone)]
pub struct Themed<A> {
    inner: A,
}

impl<A: StyleAdapter + Themeable> Themed<A> {
    pub fn new(mut inner: A) -> Self {
        let style = inner.themed_style();
        inner.set_token_style(style);
        Self { inner }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn into_inner(self) -> A {
        self.inner
    }
}

impl<A: StyleAdapter + Themeable> StyleAdapter for Themed<A> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn begin_component(&mut self, component: &str) {
        self.inner.begin_component(component)
    }

    fn generate_style(&mut self, node: &IrNode) -> StyleOutput {
        self.inner.generate_style(node)
    }

    fn imports(&self) -> Vec<String> {
        let mut imports = self.inner.imports();
        for import in self.inner.theme_imports() {
            if !imports.contains(&import) {
                imports.push(import);
            }
        }
        imports
    }

    fn requires_separate_file(&self) -> bool {
        self.inner.requires_separate_file()
    }

    fn generate_style_file(&mut self, nodes: &[&IrNode]) -> Option<String> {
        self.inner.generate_style_file(nodes)
    }

    fn collector(&self) -> Option<&StyleCollector> {
        self.inner.collector()
    }

    fn reset(&mut self) {
        self.inner.reset()
    }

    fn stats(&self) -> MappingStats {
        self.inner.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{EmotionAdapter, StyledComponentsAdapter};
    use canopy_core::ir::{Background, IrColor, IrStyle, NodeKind};
    use canopy_core::tokens::DesignTokens;
    use std::sync::Arc;

    fn blue_box() -> IrNode {
        IrNode::new("1:1", NodeKind::Container, "div", "Box").with_style(IrStyle {
            background: Some(Background::Solid(IrColor::rgb(0x3b, 0x82, 0xf6))),
            ..IrStyle::default()
        })
    }

    #[test]
    fn test_themed_styled_components_reference_theme() {
        let tokens = Arc::new(DesignTokens::default());
        let mut adapter = Themed::new(StyledComponentsAdapter::new(tokens));
        assert_eq!(adapter.inner().themed_style(), TokenStyle::ThemeProps);

        let output = adapter.generate_style(&blue_box());
        let definition = output.styled_definition.unwrap();
        assert!(definition.source.contains("background-color: ${({ theme }) => theme.colors.blue[500]};"));
        assert_eq!(adapter.imports(), vec!["import styled from 'styled-components';".to_string()]);
    }

    #[test]
    fn test_themed_emotion_adds_theme_import() {
        let tokens = Arc::new(DesignTokens::default());
        let mut adapter = Themed::new(EmotionAdapter::new(tokens));
        let output = adapter.generate_style(&blue_box());
        let definition = output.styled_definition.unwrap();
        assert!(definition.source.starts_with("const boxStyles = (theme: Theme) => css`"));
        assert!(definition.source.contains("${theme.colors.blue[500]}"));
        assert_eq!(output.inline_props, vec![("css".to_string(), "{boxStyles}".to_string())]);
        assert!(adapter.imports().iter().any(|i| i.contains("Theme")));
    }
}
