//! The conversion pipeline.
//!
//! One run turns a source document into component files: targets are
//! resolved, each component is built into IR, styled and rendered with its
//! own adapter, and the files are assembled. A component that fails is
//! reported and skipped; the rest of the run continues.

use crate::config::ConvertOptions;
use crate::error::Result;
use crate::files::FileAssembler;
use crate::markup::MarkupBuilder;
use crate::templates::TemplateEngine;
use canopy_core::diagnostics::{DiagnosticCode, Diagnostics};
use canopy_core::ir::ComponentRegistry;
use canopy_core::output::GeneratedFile;
use canopy_core::source::{NodeType, SourceDocument, SourceNode, StyleMeta};
use canopy_core::tokens::DesignTokens;
use canopy_ir::{build_registry, component_ident, IrBuilder};
use canopy_style::{create_adapter, MappingStats};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Everything a conversion run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionOutput {
    pub files: Vec<GeneratedFile>,
    pub diagnostics: Diagnostics,
    /// Token hits and raw fallbacks over all components.
    pub stats: MappingStats,
    /// Names of the components that were generated.
    pub components: Vec<String>,
}

impl ConversionOutput {
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// Output of one component.
struct ComponentOutput {
    files: Vec<GeneratedFile>,
    diagnostics: Diagnostics,
    stats: MappingStats,
}

/// A conversion target with its resolved component name.
struct Target<'d> {
    node: &'d SourceNode,
    name: String,
}

/// Converts source documents with one set of options.
pub struct Converter {
    options: ConvertOptions,
    tokens: Arc<DesignTokens>,
    engine: TemplateEngine<'static>,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Result<Self> {
        options.validate()?;
        let tokens = Arc::new(options.tokens.clone().unwrap_or_default());
        Ok(Self {
            options,
            tokens,
            engine: TemplateEngine::new()?,
        })
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Parse and convert a document from JSON text.
    pub fn convert_json(&self, json: &str) -> Result<ConversionOutput> {
        let doc = SourceDocument::from_json_str(json)?;
        self.convert(&doc)
    }

    pub fn convert(&self, doc: &SourceDocument) -> Result<ConversionOutput> {
        let registry = build_registry(doc);
        let mut output = ConversionOutput::default();
        let targets = self.targets(doc, &mut output.diagnostics);
        log::debug!(
            "Converting {} component(s) from '{}' with the {} backend",
            targets.len(),
            doc.name,
            self.options.backend
        );

        #[cfg(feature = "parallel")]
        let results: Vec<_> = targets
            .par_iter()
            .map(|target| self.convert_component(target, &registry, &doc.styles))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = targets
            .iter()
            .map(|target| self.convert_component(target, &registry, &doc.styles))
            .collect();

        for (target, result) in targets.iter().zip(results) {
            match result {
                Ok(component) => {
                    output.files.extend(component.files);
                    output.diagnostics.extend(component.diagnostics);
                    output.stats.merge(component.stats);
                    output.components.push(target.name.clone());
                }
                Err(err) => {
                    log::warn!("Component {} failed: {}", target.name, err);
                    output.diagnostics.error(
                        DiagnosticCode::ComponentFailed,
                        Some(target.node.id.as_str()),
                        format!("{} was not generated: {}", target.name, err),
                    );
                }
            }
        }

        if !output.components.is_empty() {
            let assembler = FileAssembler::new(&self.engine, &self.options);
            output.files.push(assembler.index(&output.components)?);
            if let Some(theme) = assembler.theme(&self.tokens)? {
                output.files.push(theme);
            }
        }

        log::debug!(
            "Generated {} file(s), {} diagnostic(s), {} token hit(s), {} fallback(s)",
            output.files.len(),
            output.diagnostics.len(),
            output.stats.token_hits,
            output.stats.fallbacks
        );
        Ok(output)
    }

    /// Explicit targets when configured, otherwise every top-level component.
    fn targets<'d>(&self, doc: &'d SourceDocument, diagnostics: &mut Diagnostics) -> Vec<Target<'d>> {
        let mut nodes = Vec::new();
        if self.options.targets.is_empty() {
            collect_components(&doc.document, &mut nodes);
        } else {
            for id in &self.options.targets {
                match doc.find_node(id) {
                    Some(node) => nodes.push(node),
                    None => {
                        log::warn!("Target node {} not found in '{}'", id, doc.name);
                        diagnostics.warn(DiagnosticCode::NodeNotFound, Some(id.as_str()), "target node not found");
                    }
                }
            }
        }

        let mut used: Vec<String> = Vec::new();
        nodes
            .into_iter()
            .map(|node| {
                let base = component_ident(&node.name);
                let mut name = base.clone();
                let mut n = 2;
                while used.contains(&name) {
                    name = format!("{}{}", base, n);
                    n += 1;
                }
                if name != base {
                    log::warn!("Component name {} is taken; generating {} for {}", base, name, node.id);
                }
                used.push(name.clone());
                Target { node, name }
            })
            .collect()
    }

    fn convert_component(
        &self,
        target: &Target<'_>,
        registry: &ComponentRegistry,
        styles: &IndexMap<String, StyleMeta>,
    ) -> Result<ComponentOutput> {
        let name = target.name.as_str();
        log::debug!("Generating {} from {}", name, target.node.id);

        let mut adapter = create_adapter(self.options.backend, self.options.themed, Arc::clone(&self.tokens));
        adapter.reset();
        adapter.begin_component(name);

        let mut builder = IrBuilder::new(registry).with_styles(styles);
        let ir = builder.build(target.node);
        let diagnostics = builder.finish();
        let markup = MarkupBuilder::new(adapter.as_mut(), registry, &self.options).build(name, &ir, 2);

        let stylesheet = if adapter.requires_separate_file() {
            adapter.generate_style_file(&[&ir])
        } else {
            None
        };
        let mut imports = adapter.imports();
        if adapter.requires_separate_file() && stylesheet.is_none() {
            imports.retain(|line| !line.contains(".module.css"));
        }

        let assembler = FileAssembler::new(&self.engine, &self.options);
        let mut files = vec![assembler.component(name, &ir, &markup, &imports)?];
        if let Some(types) = assembler.types(name, &ir, &markup)? {
            files.push(types);
        }
        if let Some(css) = stylesheet {
            files.push(assembler.stylesheet(name, &css));
        }

        Ok(ComponentOutput {
            files,
            diagnostics,
            stats: adapter.stats(),
        })
    }
}

/// Convert a document with the given options.
pub fn convert(doc: &SourceDocument, options: ConvertOptions) -> Result<ConversionOutput> {
    Converter::new(options)?.convert(doc)
}

fn collect_components<'d>(node: &'d SourceNode, out: &mut Vec<&'d SourceNode>) {
    if !node.visible {
        return;
    }
    if matches!(node.node_type, NodeType::Component | NodeType::ComponentSet) {
        out.push(node);
        return;
    }
    for child in node.child_nodes() {
        collect_components(child, out);
    }
}
