//! Client stub rendering.
//!
//! Script generation delegates to a [`TemplateRenderer`] collaborator:
//! template name and variable bag in, string out. The template engine itself
//! lives outside this core; [`StubRenderer`] is the built-in implementation
//! covering the two stub templates the registry needs.

use serde_json::Value;

/// Template producing the stub block for one callable class.
pub const OBJECT_TEMPLATE: &str = "support/object.js";

/// Template producing the stub for one user function.
pub const FUNCTION_TEMPLATE: &str = "support/function.js";

/// External template-render collaborator.
pub trait TemplateRenderer {
    /// Renders a template by name with a variable bag.
    ///
    /// Unknown template names render as the empty string.
    fn render(&self, template: &str, vars: &Value) -> String;
}

/// Built-in renderer for the registry's stub templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubRenderer;

impl TemplateRenderer for StubRenderer {
    fn render(&self, template: &str, vars: &Value) -> String {
        match template {
            OBJECT_TEMPLATE => render_object(vars),
            FUNCTION_TEMPLATE => render_function(vars),
            _ => String::new(),
        }
    }
}

fn string_var<'v>(vars: &'v Value, key: &str) -> &'v str {
    vars.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Renders the `key: value` config pairs appended to a stub's request options.
fn render_config_pairs(config: &Value) -> String {
    let mut pairs = String::new();
    if let Value::Object(entries) = config {
        for (key, value) in entries {
            let rendered = serde_json::to_string(value).unwrap_or_default();
            pairs.push_str(&format!(", {key}: {rendered}"));
        }
    }
    pairs
}

fn render_object(vars: &Value) -> String {
    let prefix = string_var(vars, "prefix");
    let class = string_var(vars, "class");
    let identity = string_var(vars, "identity");

    let mut stub = format!("{prefix}{class} = {{}};\n");
    let empty = Vec::new();
    let methods = vars
        .get("methods")
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    for method in methods {
        let name = string_var(method, "name");
        let config = render_config_pairs(method.get("config").unwrap_or(&Value::Null));
        stub.push_str(&format!(
            "{prefix}{class}.{name} = function() {{ return trellis.request({{ cls: '{identity}', method: '{name}' }}, {{ parameters: arguments{config} }}); }};\n"
        ));
    }
    stub
}

fn render_function(vars: &Value) -> String {
    let prefix = string_var(vars, "prefix");
    let alias = string_var(vars, "alias");
    let function = string_var(vars, "function");
    let config = render_config_pairs(vars.get("config").unwrap_or(&Value::Null));

    format!(
        "{prefix}{alias} = function() {{ return trellis.request({{ fn: '{function}' }}, {{ parameters: arguments{config} }}); }};\n"
    )
}
