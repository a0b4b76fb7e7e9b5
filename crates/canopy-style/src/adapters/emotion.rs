use super::{StyleAdapter, StyleCollector, StyleOutput, StyledDefinition, Themeable};
use crate::css::{block_body, declarations, TokenStyle};
use crate::mapper::{MappingStats, TokenMapper};
use canopy_core::ir::IrNode;
use canopy_core::tokens::DesignTokens;
use canopy_ir::naming::to_identifier;
use convert_case::Case;
use std::sync::Arc;

/// Emits a `css` tagged template per node, attached through the `css` prop.
#[derive(Debug, Clone)]
pub struct EmotionAdapter {
    mapper: TokenMapper,
    collector: StyleCollector,
    token_style: TokenStyle,
}

impl EmotionAdapter {
    pub fn new(tokens: Arc<DesignTokens>) -> Self {
        Self {
            mapper: TokenMapper::new(tokens),
            collector: StyleCollector::new(),
            token_style: TokenStyle::Literal,
        }
    }
}

impl StyleAdapter for EmotionAdapter {
    fn name(&self) -> &'static str {
        "emotion"
    }

    fn generate_style(&mut self, node: &IrNode) -> StyleOutput {
        let decls = declarations(node, &mut self.mapper, self.token_style);
        if decls.is_empty() {
            return StyleOutput::default();
        }
        let wanted = format!("{}Styles", to_identifier(&node.name, Case::Camel));
        let name = self.collector.reserve(&node.id, &wanted);
        let body = block_body(&decls, "  ");
        // Themed styles are functions of the theme; the css prop calls them.
        let source = if self.token_style.is_themed() {
            format!("const {} = (theme: Theme) => css`\n{}`;", name, body)
        } else {
            format!("const {} = css`\n{}`;", name, body)
        };
        self.collector.insert(&name, source.clone());
        StyleOutput {
            inline_props: vec![("css".to_string(), format!("{{{}}}", name))],
            styled_definition: Some(StyledDefinition { name, replaces_tag: false, source }),
            ..StyleOutput::default()
        }
    }

    fn imports(&self) -> Vec<String> {
        vec![
            "/** @jsxImportSource @emotion/react */".to_string(),
            "import { css } from '@emotion/react';".to_string(),
        ]
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

impl Themeable for EmotionAdapter {
    fn themed_style(&self) -> TokenStyle {
        TokenStyle::ThemeScope
    }

    fn set_token_style(&mut self, style: TokenStyle) {
        self.token_style = style;
    }

    fn theme_imports(&self) -> Vec<String> {
        vec!["import type { Theme } from '../theme';".to_string()]
    }
}
