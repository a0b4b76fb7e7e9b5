//! Style adapters.
//!
//! Each adapter turns the abstract style of an IR node into one styling
//! scheme. They are peers behind [`StyleAdapter`]; theming is layered on top
//! by [`Themed`] instead of being a fifth implementation.

mod collector;
mod css_modules;
mod emotion;
mod styled;
mod tailwind;
mod themed;

pub use collector::StyleCollector;
pub use css_modules::CssModulesAdapter;
pub use emotion::EmotionAdapter;
pub use styled::StyledComponentsAdapter;
pub use tailwind::TailwindAdapter;
pub use themed::{Themeable, Themed};

use crate::mapper::MappingStats;
use canopy_core::ir::IrNode;

/// A component-level style definition emitted ahead of the component body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledDefinition {
    /// Identifier the definition is bound to.
    pub name: String,
    /// When set, the element is rendered as `name` instead of its tag.
    pub replaces_tag: bool,
    /// Complete source of the definition.
    pub source: String,
}

/// Style of one node in a given scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleOutput {
    /// JSX attributes as `(name, value expression)`, e.g. `("className", "\"flex\"")`.
    pub inline_props: Vec<(String, String)>,
    /// Stylesheet rules for this node, for adapters with a separate file.
    pub style_rules: Option<String>,
    pub styled_definition: Option<StyledDefinition>,
}

impl StyleOutput {
    pub fn is_empty(&self) -> bool {
        self.inline_props.is_empty() && self.style_rules.is_none() && self.styled_definition.is_none()
    }
}

/// A styling scheme.
pub trait StyleAdapter {
    /// Short scheme name, used in logs.
    fn name(&self) -> &'static str;

    /// Called before the nodes of a component are styled.
    fn begin_component(&mut self, _component: &str) {}

    /// Style one node. May record definitions in the adapter's collector.
    fn generate_style(&mut self, node: &IrNode) -> StyleOutput;

    /// Import lines the generated component file needs.
    fn imports(&self) -> Vec<String>;

    /// Whether styles live in a stylesheet next to the component.
    fn requires_separate_file(&self) -> bool {
        false
    }

    /// Contents of the separate stylesheet for the given trees.
    fn generate_style_file(&mut self, _nodes: &[&IrNode]) -> Option<String> {
        None
    }

    /// Definitions accumulated this run, for adapters that keep them.
    fn collector(&self) -> Option<&StyleCollector> {
        None
    }

    /// Drop all per-run state.
    fn reset(&mut self);

    fn stats(&self) -> MappingStats;
}

impl<A: StyleAdapter + ?Sized> StyleAdapter for Box<A> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn begin_component(&mut self, component: &str) {
        (**self).begin_component(component)
    }

    fn generate_style(&mut self, node: &IrNode) -> StyleOutput {
        (**self).generate_style(node)
    }

    fn imports(&self) -> Vec<String> {
        (**self).imports()
    }

    fn requires_separate_file(&self) -> bool {
        (**self).requires_separate_file()
    }

    fn generate_style_file(&mut self, nodes: &[&IrNode]) -> Option<String> {
        (**self).generate_style_file(nodes)
    }

    fn collector(&self) -> Option<&StyleCollector> {
        (**self).collector()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn stats(&self) -> MappingStats {
        (**self).stats()
    }
}
