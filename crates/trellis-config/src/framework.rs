//! Framework-wide options consumed during client script generation.

use serde::{Deserialize, Serialize};

/// Default prefix prepended to client-side class identifiers.
pub const DEFAULT_CLASS_PREFIX: &str = "Trellis";

/// Default prefix prepended to client-side function stubs.
pub const DEFAULT_FUNCTION_PREFIX: &str = "trellis_";

/// Default URI the generated stubs post their requests to.
pub const DEFAULT_REQUEST_URI: &str = "ajax";

/// Framework-wide settings read by the registry and script generator.
///
/// Replaces keyed option lookups (`core.prefix.class`, `js.app.extern`, ...)
/// with typed field access. Constructed once at startup and passed by
/// reference to the components that need it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkOptions {
    /// Prefix for client-side class identifiers.
    #[serde(default = "default_class_prefix")]
    pub class_prefix: String,
    /// Prefix for client-side function stubs.
    #[serde(default = "default_function_prefix")]
    pub function_prefix: String,
    /// URI the generated stubs send their requests to.
    #[serde(default = "default_request_uri")]
    pub request_uri: String,
    /// Whether the generated script is exported to an external file.
    #[serde(default)]
    pub export_script: bool,
    /// Whether the exported script file is minified.
    #[serde(default)]
    pub minify_script: bool,
}

fn default_class_prefix() -> String {
    DEFAULT_CLASS_PREFIX.to_owned()
}

fn default_function_prefix() -> String {
    DEFAULT_FUNCTION_PREFIX.to_owned()
}

fn default_request_uri() -> String {
    DEFAULT_REQUEST_URI.to_owned()
}

impl Default for FrameworkOptions {
    fn default() -> Self {
        Self {
            class_prefix: default_class_prefix(),
            function_prefix: default_function_prefix(),
            request_uri: default_request_uri(),
            export_script: false,
            minify_script: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let options = FrameworkOptions::default();
        assert_eq!(options.class_prefix, DEFAULT_CLASS_PREFIX);
        assert_eq!(options.function_prefix, DEFAULT_FUNCTION_PREFIX);
        assert_eq!(options.request_uri, DEFAULT_REQUEST_URI);
        assert!(!options.export_script);
        assert!(!options.minify_script);
    }

    #[test]
    fn deserialises_with_partial_fields() {
        let options: FrameworkOptions =
            serde_json::from_str(r#"{"class_prefix":"App"}"#).expect("parse options");
        assert_eq!(options.class_prefix, "App");
        assert_eq!(options.function_prefix, DEFAULT_FUNCTION_PREFIX);
    }
}
