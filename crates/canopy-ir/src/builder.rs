//! IR construction.
//!
//! Walks one component's source subtree and produces the decorated IR tree:
//! layout, style and classification per node, component props, instance
//! references, interaction hints and repetition.

use crate::classify::{interaction_hint, Classification, NodeClassifier};
use crate::layout::{absolute_position, is_explicitly_absolute, normalize_layout, NO_AUTO_LAYOUT_WARNING};
use crate::naming::component_ident;
use crate::patterns::apply_patterns;
use crate::style::{normalize_style, resolve_style_names};
use crate::variants::{extract_variant_props, prop_identifier};
use canopy_core::diagnostics::{DiagnosticCode, Diagnostics};
use canopy_core::ir::{
    ir_id, ComponentEntry, ComponentRegistry, InstanceRef, IrNode, IrPropDef, NodeKind, OverrideValue, Position,
};
use canopy_core::source::{
    ComponentPropertyDefinition, ComponentPropertyType, InvalidNode, NodeType, SourceChild, SourceDocument, SourceNode,
    StyleMeta,
};
use indexmap::IndexMap;

/// Context handed down while walking a component.
struct Scope<'s> {
    parent_tag: Option<&'s str>,
    /// Text property keys of the component root, mapped to prop names.
    text_props: &'s IndexMap<String, String>,
}

/// Builds IR trees for components of one document.
pub struct IrBuilder<'a> {
    classifier: NodeClassifier,
    registry: &'a ComponentRegistry,
    styles: Option<&'a IndexMap<String, StyleMeta>>,
    diagnostics: Diagnostics,
}

impl<'a> IrBuilder<'a> {
    pub fn new(registry: &'a ComponentRegistry) -> Self {
        Self {
            classifier: NodeClassifier::new(),
            registry,
            styles: None,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Resolve color style references against the document's style table.
    pub fn with_styles(mut self, styles: &'a IndexMap<String, StyleMeta>) -> Self {
        self.styles = Some(styles);
        self
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Consume the builder, returning its diagnostics.
    pub fn finish(self) -> Diagnostics {
        self.diagnostics
    }

    /// Build the IR for a component root (component, variant set or frame).
    pub fn build(&mut self, node: &SourceNode) -> IrNode {
        let mut root = if node.node_type == NodeType::ComponentSet {
            self.build_variant_set(node)
        } else {
            let text_props = text_prop_names(&node.component_property_definitions);
            let scope = Scope { parent_tag: None, text_props: &text_props };
            let mut root = self.build_node(node, &scope);
            root.props = definition_props(&node.component_property_definitions, true);
            root
        };
        root.meta.is_component_root = true;
        apply_patterns(&mut root);

        log::debug!("Built IR for {} ({} nodes)", node.name, root.node_count());
        root
    }

    /// A variant set renders its first (default) variant, under the set's
    /// identity, with one prop per variant property.
    fn build_variant_set(&mut self, set: &SourceNode) -> IrNode {
        let text_props = text_prop_names(&set.component_property_definitions);
        let scope = Scope { parent_tag: None, text_props: &text_props };
        let class = Classification {
            kind: NodeKind::Component,
            tag: self.classifier.semantic_tag(&set.name).unwrap_or("div"),
        };

        let mut root = match set.child_nodes().next() {
            Some(default_variant) => self.build_with(default_variant, class, &scope),
            None => self.build_with(set, class, &scope),
        };
        root.id = ir_id(&set.id);
        root.source_id = set.id.clone();
        root.name = set.name.clone();
        root.meta.is_variant_container = true;

        let mut props: Vec<IrPropDef> = extract_variant_props(set)
            .into_iter()
            .map(|mut prop| {
                prop.name = prop_identifier(&prop.name);
                prop
            })
            .collect();
        for prop in definition_props(&set.component_property_definitions, false) {
            if !props.iter().any(|p| p.name == prop.name) {
                props.push(prop);
            }
        }

        if root.meta.interaction_hint.is_none() {
            let state_hint = props
                .iter()
                .flat_map(|p| p.values.iter())
                .find_map(|value| interaction_hint(value));
            if let Some(hint) = state_hint {
                self.hint(&mut root, &set.id, hint);
            }
        }
        root.props = props;
        root
    }

    fn build_node(&mut self, node: &SourceNode, scope: &Scope<'_>) -> IrNode {
        let class = self.classifier.classify(node, scope.parent_tag);
        self.build_with(node, class, scope)
    }

    fn build_with(&mut self, node: &SourceNode, class: Classification, scope: &Scope<'_>) -> IrNode {
        let mut ir = IrNode::new(&node.id, class.kind, class.tag, &node.name);
        ir.layout = normalize_layout(node);
        ir.style = normalize_style(node, &mut self.diagnostics);
        if let Some(styles) = self.styles {
            resolve_style_names(&mut ir.style, styles);
        }
        ir.meta.style_refs = node.styles.clone();

        if let Some(hint) = interaction_hint(&node.name) {
            self.hint(&mut ir, &node.id, hint);
        }

        match class.kind {
            NodeKind::Text => {
                ir.content = Some(node.characters.clone().unwrap_or_default());
                ir.meta.prop_binding = node
                    .component_property_references
                    .get("characters")
                    .and_then(|key| scope.text_props.get(key))
                    .cloned();
                return ir;
            }
            NodeKind::Instance => {
                self.resolve_instance(&mut ir, node);
                return ir;
            }
            NodeKind::Image | NodeKind::Icon | NodeKind::Divider => return ir,
            NodeKind::Container | NodeKind::Component => {}
        }

        self.build_children(&mut ir, node, scope);
        ir
    }

    fn build_children(&mut self, ir: &mut IrNode, node: &SourceNode, scope: &Scope<'_>) {
        let visible: Vec<&SourceChild> = node
            .children
            .iter()
            .filter(|c| c.as_node().map_or(true, |n| n.visible))
            .collect();
        if visible.is_empty() {
            return;
        }

        let manual = !node.has_auto_layout();
        let any_absolute = manual || visible.iter().any(|c| c.as_node().is_some_and(is_explicitly_absolute));
        if any_absolute {
            if !ir.layout.position.is_absolute() {
                ir.layout.position = Position::Relative;
            }
            ir.meta.has_absolute_children = true;
        }
        if manual {
            ir.meta.warnings.push(NO_AUTO_LAYOUT_WARNING.to_string());
            self.diagnostics.warn(
                DiagnosticCode::NoAutoLayout,
                Some(node.id.as_str()),
                format!("{} positions its children manually", node.name),
            );
        }

        let tag = ir.tag.clone();
        let child_scope = Scope { parent_tag: Some(tag.as_str()), text_props: scope.text_props };
        for (index, child) in visible.into_iter().enumerate() {
            let built = match child {
                SourceChild::Node(child) => {
                    let mut built = self.build_node(child, &child_scope);
                    if manual || is_explicitly_absolute(child) {
                        built.layout.position = absolute_position(child, node.absolute_bounding_box);
                    }
                    built
                }
                SourceChild::Invalid(bad) => self.placeholder(node, index, bad),
            };
            ir.children.push(built);
        }
    }

    /// Stand-in for a child that failed to parse.
    fn placeholder(&mut self, parent: &SourceNode, index: usize, bad: &InvalidNode) -> IrNode {
        let source_id = bad.id.clone().unwrap_or_else(|| format!("{}-{}", parent.id, index));
        let name = bad.name.clone().unwrap_or_else(|| "Unparsed node".to_string());
        log::warn!("Replacing unparseable node {} with a placeholder", source_id);

        let mut ir = IrNode::new(&source_id, NodeKind::Container, "div", name);
        ir.meta.warnings.push(format!("source node could not be parsed: {}", bad.reason));
        self.diagnostics.warn(DiagnosticCode::NodeParseFailure, Some(source_id.as_str()), bad.reason.clone());
        ir
    }

    fn resolve_instance(&mut self, ir: &mut IrNode, node: &SourceNode) {
        let Some(component_id) = node.component_id.clone() else {
            ir.meta.warnings.push("instance without a component reference".to_string());
            self.diagnostics.warn(
                DiagnosticCode::NodeNotFound,
                Some(node.id.as_str()),
                "instance has no component id",
            );
            return;
        };

        match self.registry.get(&component_id) {
            Some(entry) => ir.tag = component_ident(entry.display_name()),
            None => {
                ir.meta.warnings.push(format!("component {component_id} not found"));
                self.diagnostics.warn(
                    DiagnosticCode::NodeNotFound,
                    Some(node.id.as_str()),
                    format!("instance refers to unknown component {component_id}"),
                );
            }
        }

        let mut overrides = IndexMap::new();
        for (key, prop) in &node.component_properties {
            let value = match prop.prop_type {
                ComponentPropertyType::Variant | ComponentPropertyType::Text => {
                    prop.value.as_str().map(|s| OverrideValue::Text(s.to_string()))
                }
                ComponentPropertyType::Boolean => prop.value.as_bool().map(OverrideValue::Bool),
                ComponentPropertyType::InstanceSwap => None,
            };
            if let Some(value) = value {
                overrides.insert(prop_identifier(key), value);
            }
        }
        ir.instance = Some(InstanceRef { component_id, overrides });
    }

    fn hint(&mut self, ir: &mut IrNode, source_id: &str, hint: &str) {
        ir.meta.interaction_hint = Some(hint.to_string());
        ir.meta.warnings.push(format!("interactive behavior likely needed ({hint})"));
        self.diagnostics.warn(
            DiagnosticCode::InteractionHint,
            Some(source_id),
            format!("{} suggests interactive behavior ({hint})", ir.name),
        );
    }
}

/// Prop names of the TEXT properties a component declares, by property key.
fn text_prop_names(defs: &IndexMap<String, ComponentPropertyDefinition>) -> IndexMap<String, String> {
    defs.iter()
        .filter(|(_, def)| def.prop_type == ComponentPropertyType::Text)
        .map(|(key, _)| (key.clone(), prop_identifier(key)))
        .collect()
}

/// Props for declared component properties.
fn definition_props(defs: &IndexMap<String, ComponentPropertyDefinition>, include_variants: bool) -> Vec<IrPropDef> {
    let mut props: Vec<IrPropDef> = Vec::new();
    for (key, def) in defs {
        let name = prop_identifier(key);
        if props.iter().any(|p| p.name == name) {
            continue;
        }
        let prop = match def.prop_type {
            ComponentPropertyType::Text => Some(IrPropDef::string(name, def.default_value.as_str().map(str::to_string))),
            ComponentPropertyType::Boolean => Some(IrPropDef::boolean(
                name,
                def.default_value.as_bool().map(|b| b.to_string()),
            )),
            ComponentPropertyType::InstanceSwap => Some(IrPropDef::node(name)),
            ComponentPropertyType::Variant if include_variants => IrPropDef::enumeration(
                name,
                def.variant_options.clone(),
                def.default_value.as_str().map(str::to_string),
            ),
            ComponentPropertyType::Variant => None,
        };
        props.extend(prop);
    }
    props
}

/// Collect every component a document defines or publishes.
pub fn build_registry(doc: &SourceDocument) -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    register_tree(&doc.document, None, &mut registry);

    for (id, meta) in &doc.components {
        let set_name = meta
            .component_set_id
            .as_ref()
            .and_then(|set_id| doc.component_sets.get(set_id))
            .map(|set| set.name.clone());
        registry.register(ComponentEntry { id: id.clone(), name: meta.name.clone(), set_name });
    }
    registry
}

fn register_tree(node: &SourceNode, parent: Option<&SourceNode>, registry: &mut ComponentRegistry) {
    if node.node_type == NodeType::Component {
        let set_name = parent
            .filter(|p| p.node_type == NodeType::ComponentSet)
            .map(|p| p.name.clone());
        registry.register(ComponentEntry { id: node.id.clone(), name: node.name.clone(), set_name });
    }
    for child in node.child_nodes() {
        register_tree(child, Some(node), registry);
    }
}

/// Build one component's IR with a throwaway builder.
pub fn build_ir(node: &SourceNode, registry: &ComponentRegistry) -> (IrNode, Diagnostics) {
    let mut builder = IrBuilder::new(registry);
    let ir = builder.build(node);
    (ir, builder.finish())
}
