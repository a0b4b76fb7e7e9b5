//! Template engine for file skeletons.

use crate::error::{CodegenError, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// Component source file.
pub const COMPONENT_TEMPLATE: &str = "\
{{header}}
{{imports}}

{{user_imports}}
{{definitions}}export function {{name}}({{params}}) {
{{user_logic}}
{{notes}}  return (
{{jsx}}
  );
}

export default {{name}};
";

/// Props type definitions.
pub const TYPES_TEMPLATE: &str = "\
{{header}}
{{react_import}}export interface {{name}}Props {{body}}
";

/// Barrel re-exporting every component.
pub const INDEX_TEMPLATE: &str = "\
{{header}}
{{exports}}";

/// Handlebars with the skeleton templates registered.
///
/// Output is code, so HTML escaping is disabled.
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> TemplateEngine<'a> {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);

        let mut engine = Self { handlebars };
        engine.register_template("component", COMPONENT_TEMPLATE)?;
        engine.register_template("types", TYPES_TEMPLATE)?;
        engine.register_template("index", INDEX_TEMPLATE)?;
        Ok(engine)
    }

    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(CodegenError::InvalidTemplate)?;
        Ok(())
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        self.handlebars.render(name, data).map_err(CodegenError::TemplateError)
    }
}
