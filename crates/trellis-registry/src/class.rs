//! The callable-class seam and the explicit implementation table entry.
//!
//! Runtime class discovery is replaced by explicit registration: each
//! exposed class registers a [`CallableImpl`] pairing its declared public
//! method list with a factory closure. Materialization consults this table;
//! an identity without an entry is "not found", never an error.

use serde_json::Value;
use thiserror::Error;

use trellis_response::Response;

/// Error raised by a callable while executing a method.
///
/// Invocation failures are the only recoverable runtime error class: the
/// dispatcher routes them to the error hook when one is registered and
/// propagates them otherwise.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct InvocationError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl InvocationError {
    /// Creates an invocation error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an invocation error wrapping an underlying cause.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates the error reported when a method is not part of a callable.
    #[must_use]
    pub fn unknown_method(identity: &str, method: &str) -> Self {
        Self::new(format!("callable '{identity}' has no method '{method}'"))
    }
}

/// A server-side class exposed for client invocation.
///
/// Implementations receive the shared [`Response`] on every call and write
/// their client-side effects into it.
pub trait CallableClass {
    /// One-time initialization, run before the first method invocation.
    fn init(&mut self) {}

    /// Invokes one method with the decoded request arguments.
    ///
    /// # Errors
    ///
    /// Returns an [`InvocationError`] when the method name is unknown or the
    /// method itself fails.
    fn invoke(
        &mut self,
        method: &str,
        arguments: &[Value],
        response: &mut Response,
    ) -> Result<(), InvocationError>;
}

/// Factory closure producing a fresh callable instance.
pub type CallableFactory = Box<dyn Fn() -> Box<dyn CallableClass>>;

/// Implementation table entry: declared methods plus instance factory.
pub struct CallableImpl {
    methods: Vec<String>,
    factory: CallableFactory,
}

impl CallableImpl {
    /// Creates a table entry from a declared method list and a factory.
    #[must_use]
    pub fn new<F>(methods: Vec<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn CallableClass> + 'static,
    {
        Self {
            methods,
            factory: Box::new(factory),
        }
    }

    /// Returns the declared public methods in declaration order.
    #[must_use]
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// Produces a fresh instance.
    #[must_use]
    pub fn instantiate(&self) -> Box<dyn CallableClass> {
        (self.factory)()
    }
}

impl std::fmt::Debug for CallableImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallableImpl")
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}
