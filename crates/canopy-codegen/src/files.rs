//! Assembly of generated files around rendered markup.

use crate::config::ConvertOptions;
use crate::error::Result;
use crate::markup::Markup;
use crate::templates::TemplateEngine;
use canopy_core::ir::{IrNode, IrPropDef, PropType};
use canopy_core::output::{FileKind, GeneratedFile};
use canopy_core::tokens::DesignTokens;
use canopy_style::{tokens_stylesheet, Backend};
use serde::Serialize;

#[derive(Serialize)]
struct ComponentData<'a> {
    header: &'a str,
    imports: String,
    user_imports: String,
    definitions: String,
    name: &'a str,
    params: String,
    user_logic: String,
    notes: String,
    jsx: &'a str,
}

#[derive(Serialize)]
struct TypesData<'a> {
    header: &'a str,
    react_import: &'a str,
    name: &'a str,
    body: String,
}

#[derive(Serialize)]
struct IndexData<'a> {
    header: &'a str,
    exports: String,
}

/// Builds the files of a conversion run.
pub struct FileAssembler<'a> {
    engine: &'a TemplateEngine<'a>,
    options: &'a ConvertOptions,
}

impl<'a> FileAssembler<'a> {
    pub fn new(engine: &'a TemplateEngine<'a>, options: &'a ConvertOptions) -> Self {
        Self { engine, options }
    }

    /// The `@generated` line opening every script file.
    pub fn header(&self) -> String {
        match &self.options.timestamp {
            Some(ts) => format!("// @generated by canopy at {}. Edits outside user blocks are overwritten.", ts),
            None => "// @generated by canopy. Edits outside user blocks are overwritten.".to_string(),
        }
    }

    fn path(&self, file: &str) -> String {
        format!("{}/{}", self.options.components_dir.trim_end_matches('/'), file)
    }

    /// Component source file.
    ///
    /// `adapter_imports` are placed after the React import, except for
    /// pragma comments, which must open the file.
    pub fn component(&self, name: &str, root: &IrNode, markup: &Markup, adapter_imports: &[String]) -> Result<GeneratedFile> {
        let (pragmas, imports): (Vec<&String>, Vec<&String>) =
            adapter_imports.iter().partition(|line| line.starts_with("/**"));

        let mut lines: Vec<String> = pragmas.into_iter().cloned().collect();
        lines.push("import React from 'react';".to_string());
        lines.extend(imports.into_iter().cloned());
        for component in &markup.components {
            lines.push(format!("import {{ {} }} from './{}';", component, component));
        }
        for icon in &markup.icons {
            lines.push(format!("import {} from '{}';", icon.ident, icon.url));
        }
        if self.options.typescript {
            lines.push(format!("import type {{ {}Props }} from './{}.types';", name, name));
        }

        let definitions = if markup.definitions.is_empty() {
            "\n".to_string()
        } else {
            let sources: Vec<&str> = markup.definitions.iter().map(|d| d.source.as_str()).collect();
            format!("\n{}\n\n", sources.join("\n\n"))
        };
        let notes: String = markup.notes.iter().map(|n| format!("  // {}\n", n)).collect();

        let header = self.header();
        let data = ComponentData {
            header: &header,
            imports: lines.join("\n"),
            user_imports: canopy_merge::user_block("imports", ""),
            definitions,
            name,
            params: self.params(name, root, markup),
            user_logic: canopy_merge::user_block("logic", "  "),
            notes,
            jsx: &markup.jsx,
        };
        let content = self.engine.render("component", &data)?;
        Ok(GeneratedFile::new(
            self.path(&format!("{}.{}", name, self.options.component_ext())),
            content,
            FileKind::Component,
        ))
    }

    /// Destructured props with their defaults, plus placeholder collections.
    fn params(&self, name: &str, root: &IrNode, markup: &Markup) -> String {
        let mut fields: Vec<String> = root.props.iter().map(param).collect();
        for collection in &markup.collections {
            fields.push(format!("{} = Array.from({{ length: {} }})", collection.name, collection.count));
        }
        if fields.is_empty() {
            return String::new();
        }
        let pattern = format!("{{ {} }}", fields.join(", "));
        if self.options.typescript {
            format!("{}: {}Props", pattern, name)
        } else {
            pattern
        }
    }

    /// Props interface. Only emitted for TypeScript output.
    pub fn types(&self, name: &str, root: &IrNode, markup: &Markup) -> Result<Option<GeneratedFile>> {
        if !self.options.typescript {
            return Ok(None);
        }
        let mut fields: Vec<String> = root
            .props
            .iter()
            .map(|prop| format!("  {}?: {};", prop.name, prop_type(prop)))
            .collect();
        for collection in &markup.collections {
            fields.push(format!("  {}?: unknown[];", collection.name));
        }
        let body = if fields.is_empty() {
            "{}".to_string()
        } else {
            format!("{{\n{}\n}}", fields.join("\n"))
        };
        let needs_react = root.props.iter().any(|p| p.prop_type == PropType::Node);

        let header = self.header();
        let data = TypesData {
            header: &header,
            react_import: if needs_react { "import type * as React from 'react';\n\n" } else { "" },
            name,
            body,
        };
        let content = self.engine.render("types", &data)?;
        Ok(Some(GeneratedFile::new(self.path(&format!("{}.types.ts", name)), content, FileKind::Types)))
    }

    /// Module stylesheet beside the component.
    pub fn stylesheet(&self, name: &str, css: &str) -> GeneratedFile {
        let content = format!("/* @generated by canopy */\n{}", css);
        GeneratedFile::new(self.path(&format!("{}.module.css", name)), content, FileKind::Stylesheet)
    }

    /// Barrel re-exporting every component and its props type.
    pub fn index(&self, components: &[String]) -> Result<GeneratedFile> {
        let mut exports = String::new();
        for component in components {
            exports.push_str(&format!("export {{ {} }} from './{}';\n", component, component));
            if self.options.typescript {
                exports.push_str(&format!("export type {{ {}Props }} from './{}.types';\n", component, component));
            }
        }
        let header = self.header();
        let content = self.engine.render("index", &IndexData { header: &header, exports })?;
        Ok(GeneratedFile::new(
            self.path(&format!("index.{}", self.options.module_ext())),
            content,
            FileKind::Index,
        ))
    }

    /// Theme module referenced by themed styles, when the backend needs one.
    pub fn theme(&self, tokens: &DesignTokens) -> Result<Option<GeneratedFile>> {
        if !self.options.themed {
            return Ok(None);
        }
        let dir = self.theme_dir();
        let file = match self.options.backend {
            Backend::Tailwind => None,
            Backend::CssModules => Some(GeneratedFile::new(
                format!("{}/tokens.css", dir),
                format!("/* @generated by canopy */\n{}", tokens_stylesheet(tokens)),
                FileKind::Theme,
            )),
            Backend::StyledComponents | Backend::Emotion => {
                let json = serde_json::to_string_pretty(tokens).map_err(canopy_core::errors::SourceError::Json)?;
                let mut content = format!("{}\nexport const theme = {};\n", self.header(), json);
                if self.options.typescript {
                    content.push_str("\nexport type Theme = typeof theme;\n");
                }
                Some(GeneratedFile::new(
                    format!("{}/index.{}", dir, self.options.module_ext()),
                    content,
                    FileKind::Theme,
                ))
            }
        };
        Ok(file)
    }

    /// `theme` beside the components directory, matching the `../theme` imports.
    fn theme_dir(&self) -> String {
        match self.options.components_dir.trim_end_matches('/').rsplit_once('/') {
            Some((parent, _)) => format!("{}/theme", parent),
            None => "theme".to_string(),
        }
    }
}

fn param(prop: &IrPropDef) -> String {
    let default = match prop.prop_type {
        PropType::Node => None,
        PropType::Boolean => prop.default_value.clone(),
        PropType::String => prop.default_value.as_deref().map(js_string),
        PropType::Enum => prop.default_value.as_deref().or(prop.values.first().map(String::as_str)).map(js_string),
    };
    match default {
        Some(value) => format!("{} = {}", prop.name, value),
        None => prop.name.clone(),
    }
}

fn prop_type(prop: &IrPropDef) -> String {
    match prop.prop_type {
        PropType::String => "string".to_string(),
        PropType::Boolean => "boolean".to_string(),
        PropType::Node => "React.ReactNode".to_string(),
        PropType::Enum => prop.values.iter().map(|v| js_string(v)).collect::<Vec<_>>().join(" | "),
    }
}

/// Single-quoted JS string literal.
fn js_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n");
    format!("'{}'", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{Collection, IconImport};
    use canopy_core::ir::NodeKind;
    use canopy_style::StyledDefinition;

    fn button() -> IrNode {
        IrNode::new("1:1", NodeKind::Component, "button", "Button")
            .with_prop(IrPropDef::string("label", Some("Submit".into())))
            .with_prop(IrPropDef::boolean("disabled", Some("false".into())))
            .with_prop(IrPropDef::enumeration("size", vec!["sm".into(), "lg".into()], None).unwrap())
            .with_prop(IrPropDef::node("icon"))
    }

    fn markup() -> Markup {
        Markup {
            jsx: "    <button className=\"flex\"><span>{label}</span></button>".into(),
            ..Markup::default()
        }
    }

    #[test]
    fn test_component_file() {
        let engine = TemplateEngine::new().unwrap();
        let options = ConvertOptions { timestamp: Some("2024-01-01".into()), ..ConvertOptions::default() };
        let file = FileAssembler::new(&engine, &options)
            .component("Button", &button(), &markup(), &[])
            .unwrap();

        assert_eq!(file.path, "components/Button.tsx");
        assert_eq!(file.kind, FileKind::Component);
        assert_eq!(
            file.content,
            "// @generated by canopy at 2024-01-01. Edits outside user blocks are overwritten.\n\
             import React from 'react';\n\
             import type { ButtonProps } from './Button.types';\n\
             \n\
             // @canopy-user-start imports\n\
             // @canopy-user-end\n\
             \n\
             export function Button({ label = 'Submit', disabled = false, size = 'sm', icon }: ButtonProps) {\n  \
             // @canopy-user-start logic\n  \
             // @canopy-user-end\n  \
             return (\n    \
             <button className=\"flex\"><span>{label}</span></button>\n  \
             );\n\
             }\n\
             \n\
             export default Button;\n"
        );
    }

    #[test]
    fn test_component_imports_and_definitions() {
        let engine = TemplateEngine::new().unwrap();
        let options = ConvertOptions::default();
        let markup = Markup {
            jsx: "    <StyledCard />".into(),
            definitions: vec![StyledDefinition {
                name: "StyledCard".into(),
                replaces_tag: true,
                source: "const StyledCard = styled.div`\n  display: flex;\n`;".into(),
            }],
            components: vec!["Avatar".into()],
            icons: vec![IconImport { ident: "CheckIcon".into(), url: "/assets/check.svg".into() }],
            collections: vec![Collection { name: "rowItems".into(), count: 3 }],
            notes: vec!["interactive behavior likely needed (hover)".into()],
        };
        let imports = vec![
            "/** @jsxImportSource @emotion/react */".to_string(),
            "import styled from 'styled-components';".to_string(),
        ];
        let root = IrNode::new("1:1", NodeKind::Component, "div", "Card");
        let content = FileAssembler::new(&engine, &options)
            .component("Card", &root, &markup, &imports)
            .unwrap()
            .content;

        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[1], "/** @jsxImportSource @emotion/react */");
        assert_eq!(lines[2], "import React from 'react';");
        assert_eq!(lines[3], "import styled from 'styled-components';");
        assert_eq!(lines[4], "import { Avatar } from './Avatar';");
        assert_eq!(lines[5], "import CheckIcon from '/assets/check.svg';");
        assert!(content.contains("// @canopy-user-end\n\nconst StyledCard = styled.div`\n  display: flex;\n`;\n\nexport function"));
        assert!(content.contains("export function Card({ rowItems = Array.from({ length: 3 }) }: CardProps) {"));
        assert!(content.contains("  // interactive behavior likely needed (hover)\n  return ("));
    }

    #[test]
    fn test_types_file() {
        let engine = TemplateEngine::new().unwrap();
        let options = ConvertOptions::default();
        let markup = Markup { collections: vec![Collection { name: "cardItems".into(), count: 3 }], ..markup() };
        let file = FileAssembler::new(&engine, &options)
            .types("Button", &button(), &markup)
            .unwrap()
            .unwrap();
        assert_eq!(file.path, "components/Button.types.ts");
        assert!(file.content.contains("import type * as React from 'react';\n\nexport interface ButtonProps {\n"));
        assert!(file.content.contains("  label?: string;\n  disabled?: boolean;\n  size?: 'sm' | 'lg';\n  icon?: React.ReactNode;\n  cardItems?: unknown[];\n}\n"));
    }

    #[test]
    fn test_javascript_output() {
        let engine = TemplateEngine::new().unwrap();
        let options = ConvertOptions { typescript: false, ..ConvertOptions::default() };
        let assembler = FileAssembler::new(&engine, &options);
        let file = assembler.component("Button", &button(), &markup(), &[]).unwrap();
        assert_eq!(file.path, "components/Button.jsx");
        assert!(file.content.contains("export function Button({ label = 'Submit', disabled = false, size = 'sm', icon }) {"));
        assert!(!file.content.contains("ButtonProps"));
        assert!(assembler.types("Button", &button(), &markup()).unwrap().is_none());
    }

    #[test]
    fn test_index_file() {
        let engine = TemplateEngine::new().unwrap();
        let options = ConvertOptions::default();
        let file = FileAssembler::new(&engine, &options)
            .index(&["Button".to_string(), "Card".to_string()])
            .unwrap();
        assert_eq!(file.path, "components/index.ts");
        assert!(file.content.ends_with(
            "export { Button } from './Button';\n\
             export type { ButtonProps } from './Button.types';\n\
             export { Card } from './Card';\n\
             export type { CardProps } from './Card.types';\n"
        ));
    }

    #[test]
    fn test_theme_files() {
        let engine = TemplateEngine::new().unwrap();
        let tokens = DesignTokens::default();

        let options = ConvertOptions {
            backend: Backend::Emotion,
            themed: true,
            components_dir: "src/components".into(),
            ..ConvertOptions::default()
        };
        let theme = FileAssembler::new(&engine, &options).theme(&tokens).unwrap().unwrap();
        assert_eq!(theme.path, "src/theme/index.ts");
        assert!(theme.content.contains("export const theme = {"));
        assert!(theme.content.ends_with("export type Theme = typeof theme;\n"));

        let options = ConvertOptions { backend: Backend::CssModules, themed: true, ..ConvertOptions::default() };
        let css = FileAssembler::new(&engine, &options).theme(&tokens).unwrap().unwrap();
        assert_eq!(css.path, "theme/tokens.css");
        assert!(css.content.contains(":root {"));

        let options = ConvertOptions { themed: true, ..ConvertOptions::default() };
        assert!(FileAssembler::new(&engine, &options).theme(&tokens).unwrap().is_none());
    }

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string("it's"), "'it\\'s'");
    }
}
