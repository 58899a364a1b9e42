//! The dispatch lifecycle.
//!
//! A [`Processor`] runs each request through
//! `Validating → Resolving → Invoking → Completed`, with early exits to
//! `Rejected` (invalid input, unknown target, before-hook interruption) and
//! `Failed` (invocation error). Every terminal state returns the shared
//! response; the single exception is an invocation failure with no error
//! hook registered, which propagates to the caller.
//!
//! Hooks are explicit collaborators passed in as closures: `init` runs once
//! per target before its first invocation, `before` may interrupt the
//! request, `after` runs on success, `invalid` observes rejections and
//! `error` recovers invocation failures.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use serde_json::Value;

use trellis_registry::{CallableClass, InvocationError, Repository};
use trellis_response::Response;

use crate::errors::DispatchError;
use crate::request::{AjaxRequest, CallTarget};
use crate::validate::{is_valid_class_identifier, is_valid_method_name};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::processor");

/// Lifecycle state of the current request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchState {
    /// No request is being processed.
    #[default]
    Idle,
    /// The incoming identifiers are being validated.
    Validating,
    /// The target callable is being resolved.
    Resolving,
    /// The target method is executing.
    Invoking,
    /// The request completed successfully.
    Completed,
    /// The request was rejected before invocation.
    Rejected,
    /// The invocation raised an error.
    Failed,
}

impl DispatchState {
    /// Returns the canonical state name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Resolving => "resolving",
            Self::Invoking => "invoking",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// Hook run once per target before its first invocation.
pub type InitHook = Box<dyn FnMut(&mut dyn CallableClass)>;

/// Hook run before every invocation; setting the flag ends the request.
pub type BeforeHook = Box<dyn FnMut(&mut Response, &str, &str, &mut bool)>;

/// Hook run after every successful invocation.
pub type AfterHook = Box<dyn FnMut(&mut Response, &str, &str)>;

/// Hook observing rejected requests with a descriptive reason.
pub type InvalidHook = Box<dyn FnMut(&mut Response, &str)>;

/// Hook recovering invocation failures.
pub type ErrorHook = Box<dyn FnMut(&mut Response, &InvocationError)>;

/// Runs requests through the dispatch lifecycle against a repository.
#[derive(Default)]
pub struct Processor {
    response: Response,
    state: DispatchState,
    initialized: BTreeSet<String>,
    init_hook: Option<InitHook>,
    before_hook: Option<BeforeHook>,
    after_hook: Option<AfterHook>,
    invalid_hook: Option<InvalidHook>,
    error_hook: Option<ErrorHook>,
}

impl Processor {
    /// Creates a processor with no hooks registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the target-initialization hook.
    pub fn on_init<F>(&mut self, hook: F)
    where
        F: FnMut(&mut dyn CallableClass) + 'static,
    {
        self.init_hook = Some(Box::new(hook));
    }

    /// Registers the pre-invocation hook.
    pub fn on_before<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Response, &str, &str, &mut bool) + 'static,
    {
        self.before_hook = Some(Box::new(hook));
    }

    /// Registers the post-invocation hook.
    pub fn on_after<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Response, &str, &str) + 'static,
    {
        self.after_hook = Some(Box::new(hook));
    }

    /// Registers the invalid-request hook.
    pub fn on_invalid<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Response, &str) + 'static,
    {
        self.invalid_hook = Some(Box::new(hook));
    }

    /// Registers the invocation-error hook.
    ///
    /// With no error hook, invocation failures propagate to the caller.
    pub fn on_error<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Response, &InvocationError) + 'static,
    {
        self.error_hook = Some(Box::new(hook));
    }

    /// Returns the lifecycle state of the last processed request.
    #[must_use]
    pub const fn state(&self) -> DispatchState {
        self.state
    }

    /// Returns the shared response.
    #[must_use]
    pub const fn response(&self) -> &Response {
        &self.response
    }

    /// Takes the accumulated response, leaving an empty one behind.
    pub fn take_response(&mut self) -> Response {
        std::mem::take(&mut self.response)
    }

    /// Processes one request to a terminal state.
    ///
    /// Always returns the shared response, whatever the outcome, so callers
    /// have a serializable payload for the client.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Registry`] on environment failures during
    /// lazy materialization, and [`DispatchError::Invocation`] when the
    /// target method fails and no error hook is registered.
    pub fn process(
        &mut self,
        repository: &mut Repository,
        request: &AjaxRequest,
    ) -> Result<&Response, DispatchError> {
        self.state = DispatchState::Validating;
        match request.target() {
            Some(CallTarget::Class { name, method }) => {
                self.process_class_call(repository, name, method, request.arguments())
            }
            Some(CallTarget::Function { name }) => {
                self.process_function_call(repository, name, request.arguments())
            }
            None => Ok(self.reject("request names no callable target")),
        }
    }

    fn process_class_call(
        &mut self,
        repository: &mut Repository,
        name: &str,
        method: &str,
        arguments: &[Value],
    ) -> Result<&Response, DispatchError> {
        if !is_valid_class_identifier(name) {
            return Ok(self.reject(format!("invalid class identifier '{name}'")));
        }
        if !is_valid_method_name(method) {
            return Ok(self.reject(format!("invalid method name '{method}'")));
        }

        self.state = DispatchState::Resolving;
        let resolved = match repository.get_callable(name)? {
            Some(descriptor) => {
                let identity = descriptor.identity().to_owned();
                let exposed = descriptor.is_exposed(method);
                Some((identity, exposed))
            }
            None => None,
        };
        let Some((identity, exposed)) = resolved else {
            return Ok(self.reject(format!("no callable registered for '{name}'")));
        };
        if !exposed {
            return Ok(self.reject(format!(
                "method '{method}' of '{identity}' is not exposed"
            )));
        }

        let Some(instance) = repository.registered_instance(&identity)? else {
            return Ok(self.reject(format!("no instance available for '{identity}'")));
        };
        if self.initialized.insert(identity.clone()) {
            if let Some(hook) = self.init_hook.as_mut() {
                hook(&mut *instance);
            }
            instance.init();
            debug!(target: DISPATCH_TARGET, identity, "target initialized");
        }

        self.state = DispatchState::Invoking;
        let mut end_request = false;
        if let Some(hook) = self.before_hook.as_mut() {
            hook(&mut self.response, &identity, method, &mut end_request);
        }
        if end_request {
            self.state = DispatchState::Rejected;
            debug!(target: DISPATCH_TARGET, identity, method, "request ended by before hook");
            return Ok(&self.response);
        }

        let outcome = instance.invoke(method, arguments, &mut self.response);
        self.finish_invocation(&identity, method, outcome)
    }

    fn process_function_call(
        &mut self,
        repository: &mut Repository,
        name: &str,
        arguments: &[Value],
    ) -> Result<&Response, DispatchError> {
        if !is_valid_method_name(name) {
            return Ok(self.reject(format!("invalid function name '{name}'")));
        }

        self.state = DispatchState::Resolving;
        let Some(function) = repository.user_function_mut(name) else {
            return Ok(self.reject(format!("no function registered for '{name}'")));
        };
        function.load()?;

        self.state = DispatchState::Invoking;
        let mut end_request = false;
        if let Some(hook) = self.before_hook.as_mut() {
            hook(&mut self.response, name, name, &mut end_request);
        }
        if end_request {
            self.state = DispatchState::Rejected;
            debug!(target: DISPATCH_TARGET, function = name, "request ended by before hook");
            return Ok(&self.response);
        }

        let outcome = function.call(arguments, &mut self.response);
        self.finish_invocation(name, name, outcome)
    }

    /// Routes an invocation outcome through the after or error hooks.
    fn finish_invocation(
        &mut self,
        target: &str,
        method: &str,
        outcome: Result<(), InvocationError>,
    ) -> Result<&Response, DispatchError> {
        match outcome {
            Ok(()) => {
                if let Some(hook) = self.after_hook.as_mut() {
                    hook(&mut self.response, target, method);
                }
                self.state = DispatchState::Completed;
                Ok(&self.response)
            }
            Err(error) => {
                self.state = DispatchState::Failed;
                warn!(target: DISPATCH_TARGET, %error, "invocation failed");
                if let Some(hook) = self.error_hook.as_mut() {
                    hook(&mut self.response, &error);
                    Ok(&self.response)
                } else {
                    Err(DispatchError::Invocation(error))
                }
            }
        }
    }

    /// Rejects the request, notifying the invalid hook with the reason.
    fn reject(&mut self, reason: impl Into<String>) -> &Response {
        let message = reason.into();
        self.state = DispatchState::Rejected;
        warn!(target: DISPATCH_TARGET, reason = message, "request rejected");
        if let Some(hook) = self.invalid_hook.as_mut() {
            hook(&mut self.response, &message);
        }
        &self.response
    }
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("state", &self.state)
            .field("initialized", &self.initialized)
            .field("commands", &self.response.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
