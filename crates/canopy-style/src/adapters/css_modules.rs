use super::{StyleAdapter, StyleCollector, StyleOutput, Themeable};
use crate::css::{block_body, declarations, TokenStyle};
use crate::mapper::{MappingStats, TokenMapper};
use canopy_core::ir::IrNode;
use canopy_core::tokens::DesignTokens;
use canopy_ir::naming::to_identifier;
use convert_case::Case;
use std::sync::Arc;

/// Emits class rules into a `<Component>.module.css` file and references them
/// through the imported `styles` object.
#[derive(Debug, Clone)]
pub struct CssModulesAdapter {
    mapper: TokenMapper,
    collector: StyleCollector,
    token_style: TokenStyle,
    module: String,
}

impl CssModulesAdapter {
    pub fn new(tokens: Arc<DesignTokens>) -> Self {
        Self {
            mapper: TokenMapper::new(tokens),
            collector: StyleCollector::new(),
            token_style: TokenStyle::Literal,
            module: "styles".to_string(),
        }
    }

    /// File name of the stylesheet for the current component.
    pub fn module_file(&self) -> String {
        format!("{}.module.css", self.module)
    }
}

impl StyleAdapter for CssModulesAdapter {
    fn name(&self) -> &'static str {
        "css-modules"
    }

    fn begin_component(&mut self, component: &str) {
        self.module = component.to_string();
    }

    fn generate_style(&mut self, node: &IrNode) -> StyleOutput {
        let decls = declarations(node, &mut self.mapper, self.token_style);
        if decls.is_empty() {
            return StyleOutput::default();
        }
        let class = self.collector.reserve(&node.id, &to_identifier(&node.name, Case::Camel));
        let rule = format!(".{} {{\n{}}}\n", class, block_body(&decls, "  "));
        self.collector.insert(&class, rule.clone());
        StyleOutput {
            inline_props: vec![("className".to_string(), format!("{{styles.{}}}", class))],
            style_rules: Some(rule),
            ..StyleOutput::default()
        }
    }

    fn imports(&self) -> Vec<String> {
        vec![format!("import styles from './{}';", self.module_file())]
    }

    fn requires_separate_file(&self) -> bool {
        true
    }

    /// Rules of every styled node in the given trees, in tree order.
    fn generate_style_file(&mut self, nodes: &[&IrNode]) -> Option<String> {
        let mut all: Vec<&IrNode> = Vec::new();
        for root in nodes {
            root.walk(&mut |n| all.push(n));
        }
        let mut rules = Vec::new();
        for node in all {
            if self.collector.name_for(&node.id).is_none() {
                self.generate_style(node);
            }
            if let Some(rule) = self.collector.name_for(&node.id).and_then(|name| self.collector.get(name)) {
                rules.push(rule.to_string());
            }
        }
        if rules.is_empty() {
            return None;
        }
        Some(rules.join("\n"))
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

impl Themeable for CssModulesAdapter {
    fn themed_style(&self) -> TokenStyle {
        TokenStyle::CssVar
    }

    fn set_token_style(&mut self, style: TokenStyle) {
        self.token_style = style;
    }

    fn theme_imports(&self) -> Vec<String> {
        vec!["import '../theme/tokens.css';".to_string()]
    }
}
