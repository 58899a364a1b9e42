//! User function descriptors.
//!
//! A [`UserFunction`] stores one plain function exposed for client
//! invocation, together with its client alias, optional include file and the
//! option bag forwarded to the generated stub. Registration is two-phase:
//! the descriptor is constructed with its invocation handler up front, so the
//! target symbol is resolved when the registration call is written, and
//! `configure` calls are applied before first use.

use serde_json::Value;

use trellis_config::MethodOptions;
use trellis_response::Response;

use crate::class::InvocationError;
use crate::descriptor::IncludeFile;
use crate::error::RegistryError;
use crate::script::{FUNCTION_TEMPLATE, TemplateRenderer};

/// Invocation handler bound to a user function.
pub type FunctionHandler =
    Box<dyn FnMut(&[Value], &mut Response) -> Result<(), InvocationError>>;

/// One registered user function.
pub struct UserFunction {
    server_name: String,
    class: Option<String>,
    js_name: String,
    include: Option<IncludeFile>,
    config: MethodOptions,
    handler: FunctionHandler,
}

impl UserFunction {
    /// Registers a function under its server-side name with its handler.
    ///
    /// The client alias defaults to the server name until `configure`
    /// overrides it.
    #[must_use]
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: FnMut(&[Value], &mut Response) -> Result<(), InvocationError> + 'static,
    {
        let name = name.into();
        Self {
            server_name: name.clone(),
            class: None,
            js_name: name,
            include: None,
            config: MethodOptions::new(),
            handler: Box::new(handler),
        }
    }

    /// Applies one configuration option.
    ///
    /// `class` marks the function as an alias for a method of the given
    /// class, `alias` overrides the client-side name, `include` records a
    /// source file loaded before the first call; every other key lands in
    /// the option bag forwarded to the generated stub.
    pub fn configure(&mut self, option: &str, value: Value) {
        match option {
            "class" => {
                if let Some(class) = value.as_str() {
                    self.class = Some(class.to_owned());
                }
            }
            "alias" => {
                if let Some(alias) = value.as_str() {
                    self.js_name = alias.to_owned();
                }
            }
            "include" => {
                if let Some(path) = value.as_str() {
                    self.include = Some(IncludeFile::new(path));
                }
            }
            _ => {
                self.config.insert(option.to_owned(), value);
            }
        }
    }

    /// Returns the client-side name of the function.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.js_name
    }

    /// Returns the server-side target, `Class::function` when aliased to a
    /// class method.
    #[must_use]
    pub fn server_name(&self) -> String {
        self.class.as_ref().map_or_else(
            || self.server_name.clone(),
            |class| format!("{class}::{}", self.server_name),
        )
    }

    /// Returns the stub option bag.
    #[must_use]
    pub const fn config(&self) -> &MethodOptions {
        &self.config
    }

    /// Loads the include file, exactly once; a no-op without one.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IncludeMissing`] when the recorded file does
    /// not exist.
    pub fn load(&mut self) -> Result<(), RegistryError> {
        let identity = self.js_name.clone();
        self.include
            .as_mut()
            .map_or(Ok(()), |include| include.load(&identity))
    }

    /// Invokes the function with the decoded request arguments.
    ///
    /// Callers load the include file first; see [`UserFunction::load`].
    ///
    /// # Errors
    ///
    /// Propagates the handler's [`InvocationError`].
    pub fn call(
        &mut self,
        arguments: &[Value],
        response: &mut Response,
    ) -> Result<(), InvocationError> {
        (self.handler)(arguments, response)
    }

    /// Renders the client stub for this function.
    #[must_use]
    pub fn script(&self, prefix: &str, renderer: &dyn TemplateRenderer) -> String {
        let vars = serde_json::json!({
            "prefix": prefix,
            "alias": self.js_name,
            "function": self.js_name,
            "config": self.config,
        });
        renderer.render(FUNCTION_TEMPLATE, &vars)
    }
}

impl std::fmt::Debug for UserFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserFunction")
            .field("server_name", &self.server_name)
            .field("class", &self.class)
            .field("js_name", &self.js_name)
            .field("include", &self.include)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
