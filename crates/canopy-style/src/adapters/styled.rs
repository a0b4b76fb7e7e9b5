use super::{StyleAdapter, StyleCollector, StyleOutput, StyledDefinition, Themeable};
use crate::css::{block_body, declarations, TokenStyle};
use crate::mapper::{MappingStats, TokenMapper};
use canopy_core::ir::IrNode;
use canopy_core::tokens::DesignTokens;
use canopy_ir::naming::component_ident;
use std::sync::Arc;

/// Emits one `styled.tag` definition per styled node.
#[derive(Debug, Clone)]
pub struct StyledComponentsAdapter {
    mapper: TokenMapper,
    collector: StyleCollector,
    token_style: TokenStyle,
}

impl StyledComponentsAdapter {
    pub fn new(tokens: Arc<DesignTokens>) -> Self {
        Self {
            mapper: TokenMapper::new(tokens),
            collector: StyleCollector::new(),
            token_style: TokenStyle::Literal,
        }
    }
}

impl StyleAdapter for StyledComponentsAdapter {
    fn name(&self) -> &'static str {
        "styled-components"
    }

    fn generate_style(&mut self, node: &IrNode) -> StyleOutput {
        let decls = declarations(node, &mut self.mapper, self.token_style);
        if decls.is_empty() {
            return StyleOutput::default();
        }
        let name = self
            .collector
            .reserve(&node.id, &format!("Styled{}", component_ident(&node.name)));
        let source = format!("const {} = styled.{}`\n{}`;", name, node.tag, block_body(&decls, "  "));
        self.collector.insert(&name, source.clone());
        StyleOutput {
            styled_definition: Some(StyledDefinition { name, replaces_tag: true, source }),
            ..StyleOutput::default()
        }
    }

    fn imports(&self) -> Vec<String> {
        vec!["import styled from 'styled-components';".to_string()]
    }

    fn collector(&self) -> Option<&StyleCollector> {
        Some(&self.collector)
    }

    fn reset(&mut self) {
        self.collector.clear();
        self.mapper.reset_stats();
    }

    fn stats(&self) -> MappingStats {
        self.mapper.stats()
    }
}

impl Themeable for StyledComponentsAdapter {
    fn themed_style(&self) -> TokenStyle {
        TokenStyle::ThemeProps
    }

    fn set_token_style(&mut self, style: TokenStyle) {
        self.token_style = style;
    }

    /// The theme arrives through the `ThemeProvider` props.
    fn theme_imports(&self) -> Vec<String> {
        Vec::new()
    }
}
