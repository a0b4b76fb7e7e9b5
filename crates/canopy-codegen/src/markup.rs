//! JSX rendering of an IR tree.
//!
//! Rendering is recursive and dispatched on node kind. Styling is delegated to
//! the active [`StyleAdapter`]; everything the component file needs besides the
//! markup itself (styled definitions, component and icon imports, repeat
//! collections) is gathered into [`Markup`] along the way.

use crate::config::ConvertOptions;
use canopy_core::ir::{Background, ComponentRegistry, IrNode, NodeKind, OverrideValue};
use canopy_ir::naming::{component_ident, to_identifier};
use canopy_ir::patterns::base_name;
use canopy_style::{StyleAdapter, StyledDefinition};
use convert_case::Case;

/// A default import of an icon asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImport {
    pub ident: String,
    pub url: String,
}

/// A placeholder collection iterated by a repeating container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub name: String,
    /// Number of repeated children in the design.
    pub count: usize,
}

/// Rendered markup of one component and what it depends on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Markup {
    pub jsx: String,
    pub definitions: Vec<StyledDefinition>,
    /// Other components referenced by instances.
    pub components: Vec<String>,
    pub icons: Vec<IconImport>,
    pub collections: Vec<Collection>,
    /// Warnings on the root element, which cannot carry a JSX comment.
    pub notes: Vec<String>,
}

pub struct MarkupBuilder<'a, A: StyleAdapter + ?Sized> {
    adapter: &'a mut A,
    registry: &'a ComponentRegistry,
    options: &'a ConvertOptions,
    indent: String,
    component: String,
    markup: Markup,
}

impl<'a, A: StyleAdapter + ?Sized> MarkupBuilder<'a, A> {
    pub fn new(adapter: &'a mut A, registry: &'a ComponentRegistry, options: &'a ConvertOptions) -> Self {
        Self {
            adapter,
            registry,
            options,
            indent: options.indent_unit(),
            component: String::new(),
            markup: Markup::default(),
        }
    }

    /// Render `root` as the body of component `component`, starting at `depth`.
    pub fn build(mut self, component: &str, root: &IrNode, depth: usize) -> Markup {
        self.component = component.to_string();
        self.markup.notes = root.meta.warnings.clone();
        let mut lines = Vec::new();
        self.element(root, depth, None, &mut lines);
        self.markup.jsx = lines.join("\n");
        self.markup
    }

    fn pad(&self, depth: usize) -> String {
        self.indent.repeat(depth)
    }

    /// A child element preceded by a comment per warning.
    fn child(&mut self, node: &IrNode, depth: usize, lines: &mut Vec<String>) {
        self.comments(node, depth, lines);
        self.element(node, depth, None, lines);
    }

    fn comments(&self, node: &IrNode, depth: usize, lines: &mut Vec<String>) {
        let pad = self.pad(depth);
        for warning in &node.meta.warnings {
            lines.push(format!("{}{{/* {} */}}", pad, comment_text(warning)));
        }
    }

    fn element(&mut self, node: &IrNode, depth: usize, key: Option<&str>, lines: &mut Vec<String>) {
        match node.kind {
            NodeKind::Text => self.text(node, depth, key, lines),
            NodeKind::Image => self.image(node, depth, key, lines),
            NodeKind::Icon => self.icon(node, depth, key, lines),
            NodeKind::Instance => self.instance(node, depth, key, lines),
            NodeKind::Divider => {
                let (name, attrs) = self.styled(node, key);
                lines.push(format!("{}<{}{} />", self.pad(depth), name, attrs));
            }
            NodeKind::Container | NodeKind::Component => self.container(node, depth, key, lines),
        }
    }

    /// Element name and attribute string after styling.
    fn styled(&mut self, node: &IrNode, key: Option<&str>) -> (String, String) {
        let output = self.adapter.generate_style(node);
        let mut name = node.tag.clone();
        if let Some(definition) = output.styled_definition {
            if definition.replaces_tag {
                name = definition.name.clone();
            }
            if !self.markup.definitions.iter().any(|d| d.name == definition.name) {
                self.markup.definitions.push(definition);
            }
        }
        let mut attrs = String::new();
        if let Some(key) = key {
            attrs.push_str(&format!(" key={{{}}}", key));
        }
        for (prop, value) in output.inline_props {
            attrs.push_str(&format!(" {}={}", prop, value));
        }
        (name, attrs)
    }

    fn text(&mut self, node: &IrNode, depth: usize, key: Option<&str>, lines: &mut Vec<String>) {
        let (name, attrs) = self.styled(node, key);
        let content = match &node.meta.prop_binding {
            Some(prop) => format!("{{{}}}", prop),
            None => escape_text(node.content.as_deref().unwrap_or_default()),
        };
        let pad = self.pad(depth);
        if content.is_empty() {
            lines.push(format!("{}<{}{} />", pad, name, attrs));
        } else {
            lines.push(format!("{}<{}{}>{}</{}>", pad, name, attrs, content, name));
        }
    }

    fn image(&mut self, node: &IrNode, depth: usize, key: Option<&str>, lines: &mut Vec<String>) {
        let (name, mut attrs) = self.styled(node, key);
        let image_ref = match &node.style.background {
            Some(Background::Image(fill)) => fill.image_ref.as_deref(),
            _ => None,
        };
        let file = self
            .options
            .assets
            .get(&node.source_id)
            .or_else(|| image_ref.and_then(|r| self.options.assets.get(r)))
            .cloned()
            .unwrap_or_else(|| format!("{}.png", to_identifier(&node.name, Case::Kebab)));
        attrs.push_str(&format!(" src={}", attr_value(&self.options.asset_url(&file))));
        attrs.push_str(&format!(" alt={}", attr_value(&alt_text(&node.name))));
        lines.push(format!("{}<{}{} />", self.pad(depth), name, attrs));
    }

    fn icon(&mut self, node: &IrNode, depth: usize, key: Option<&str>, lines: &mut Vec<String>) {
        let pad = self.pad(depth);
        let Some(file) = self.options.assets.get(&node.source_id) else {
            lines.push(format!("{}{{/* icon: {} */}}", pad, comment_text(&node.name)));
            return;
        };
        let ident = icon_ident(&node.name);
        if !self.markup.icons.iter().any(|i| i.ident == ident) {
            self.markup.icons.push(IconImport { ident: ident.clone(), url: self.options.asset_url(file) });
        }
        let key_attr = key.map(|k| format!(" key={{{}}}", k)).unwrap_or_default();
        lines.push(format!("{}<{}{} />", pad, ident, key_attr));
    }

    fn instance(&mut self, node: &IrNode, depth: usize, key: Option<&str>, lines: &mut Vec<String>) {
        let pad = self.pad(depth);
        let resolved = node
            .instance
            .as_ref()
            .filter(|instance| self.registry.contains(&instance.component_id));
        let Some(instance) = resolved else {
            lines.push(format!("{}{{/* missing component: {} */}}", pad, comment_text(&node.name)));
            return;
        };
        if node.tag != self.component && !self.markup.components.contains(&node.tag) {
            self.markup.components.push(node.tag.clone());
        }

        let mut attrs = key.map(|k| format!(" key={{{}}}", k)).unwrap_or_default();
        for (prop, value) in &instance.overrides {
            match value {
                OverrideValue::Text(text) => attrs.push_str(&format!(" {}={}", prop, attr_value(text))),
                OverrideValue::Bool(true) => attrs.push_str(&format!(" {}", prop)),
                OverrideValue::Bool(false) => attrs.push_str(&format!(" {}={{false}}", prop)),
            }
        }
        lines.push(format!("{}<{}{} />", pad, node.tag, attrs));
    }

    fn container(&mut self, node: &IrNode, depth: usize, key: Option<&str>, lines: &mut Vec<String>) {
        let (name, attrs) = self.styled(node, key);
        let pad = self.pad(depth);
        if node.children.is_empty() {
            lines.push(format!("{}<{}{} />", pad, name, attrs));
            return;
        }

        if let [only] = node.children.as_slice() {
            if only.is_text() && only.meta.warnings.is_empty() {
                let mut inner = Vec::new();
                self.element(only, 0, None, &mut inner);
                lines.push(format!("{}<{}{}>{}</{}>", pad, name, attrs, inner.join(""), name));
                return;
            }
        }

        lines.push(format!("{}<{}{}>", pad, name, attrs));
        let repeat = node.meta.repeat.as_ref().filter(|_| node.meta.is_repeating);
        for (i, child) in node.children.iter().enumerate() {
            match repeat {
                Some(info) if i == info.template => self.repeat(child, info.members.len(), depth + 1, lines),
                Some(info) if info.members.contains(&i) => {}
                _ => self.child(child, depth + 1, lines),
            }
        }
        lines.push(format!("{}</{}>", pad, name));
    }

    /// `{items.map((item, index) => (...))}` over a placeholder collection.
    fn repeat(&mut self, template: &IrNode, count: usize, depth: usize, lines: &mut Vec<String>) {
        let base = format!("{}Items", to_identifier(base_name(&template.name), Case::Camel));
        let mut name = base.clone();
        let mut n = 2;
        while self.markup.collections.iter().any(|c| c.name == name) {
            name = format!("{}{}", base, n);
            n += 1;
        }
        self.markup.collections.push(Collection { name: name.clone(), count });

        self.comments(template, depth, lines);
        let pad = self.pad(depth);
        lines.push(format!("{}{{{}.map((item, index) => (", pad, name));
        self.element(template, depth + 1, Some("index"), lines);
        lines.push(format!("{}))}}", pad));
    }
}

/// JSX text content with braces, entities and angle brackets escaped.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '{' => out.push_str("{'{'}"),
            '}' => out.push_str("{'}'}"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\n' => out.push_str("<br />"),
            c => out.push(c),
        }
    }
    out
}

/// A JSX attribute value: a plain string literal when possible, otherwise a
/// JS string expression.
pub fn attr_value(value: &str) -> String {
    if value.contains(['"', '\\', '\n', '{', '}']) {
        format!("{{{}}}", serde_json::Value::String(value.to_string()))
    } else {
        format!("\"{}\"", value)
    }
}

fn comment_text(text: &str) -> String {
    text.replace("*/", "* /")
}

/// Readable alt text from a layer name, e.g. `hero/banner-image` -> `hero banner image`.
fn alt_text(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn icon_ident(name: &str) -> String {
    let ident = component_ident(name);
    if ident.ends_with("Icon") {
        ident
    } else {
        format!("{}Icon", ident)
    }
}
