//! Request deserialization for the dispatch lifecycle.
//!
//! The transport encoding is an external collaborator's concern; this module
//! only requires that a target identifier, a method name and a decoded
//! argument list arrive as JSON. Embedders that already hold decoded fields
//! construct requests directly through [`AjaxRequest::class_call`] and
//! [`AjaxRequest::function_call`].

use serde::Deserialize;
use serde_json::Value;

use crate::errors::DispatchError;

/// Parsed AJAX request from a client.
#[derive(Debug, Deserialize)]
pub struct AjaxRequest {
    /// Target identification (class plus method, or function).
    pub call: CallDescriptor,
    /// Decoded arguments forwarded to the invocation.
    #[serde(default)]
    pub arguments: Vec<Value>,
}

/// Target identification within a request.
///
/// A class target carries both `class` and `method`; a function target
/// carries `function` alone. When both are present the class target wins.
#[derive(Debug, Default, Deserialize)]
pub struct CallDescriptor {
    /// Class identifier, dotted or underscored.
    #[serde(default)]
    pub class: Option<String>,
    /// Method name on the class.
    #[serde(default)]
    pub method: Option<String>,
    /// Registered user function name.
    #[serde(default)]
    pub function: Option<String>,
}

/// Resolved view of the request target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallTarget<'r> {
    /// A class method invocation.
    Class {
        /// Class identifier.
        name: &'r str,
        /// Method name.
        method: &'r str,
    },
    /// A user function invocation.
    Function {
        /// Registered function name.
        name: &'r str,
    },
}

impl AjaxRequest {
    /// Builds a class method request from decoded fields.
    #[must_use]
    pub fn class_call(
        class: impl Into<String>,
        method: impl Into<String>,
        arguments: Vec<Value>,
    ) -> Self {
        Self {
            call: CallDescriptor {
                class: Some(class.into()),
                method: Some(method.into()),
                function: None,
            },
            arguments,
        }
    }

    /// Builds a user function request from decoded fields.
    #[must_use]
    pub fn function_call(function: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            call: CallDescriptor {
                class: None,
                method: None,
                function: Some(function.into()),
            },
            arguments,
        }
    }

    /// Parses a JSON request payload.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MalformedRequest`] if the payload is empty or
    /// not valid JSON matching the request schema.
    pub fn parse(payload: &[u8]) -> Result<Self, DispatchError> {
        let trimmed = trim_ascii_whitespace(payload);
        if trimmed.is_empty() {
            return Err(DispatchError::malformed("empty request payload"));
        }
        serde_json::from_slice(trimmed).map_err(DispatchError::from_json_error)
    }

    /// Validates that the request names a target.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidStructure`] when no target is named,
    /// or a class is named without a method.
    pub fn validate(&self) -> Result<(), DispatchError> {
        match (&self.call.class, &self.call.method, &self.call.function) {
            (Some(class), method, _) => {
                if class.trim().is_empty() {
                    return Err(DispatchError::invalid_structure("class field is empty"));
                }
                if method.as_ref().is_none_or(|name| name.trim().is_empty()) {
                    return Err(DispatchError::invalid_structure(
                        "class target named without a method",
                    ));
                }
                Ok(())
            }
            (None, _, Some(function)) => {
                if function.trim().is_empty() {
                    return Err(DispatchError::invalid_structure("function field is empty"));
                }
                Ok(())
            }
            (None, _, None) => Err(DispatchError::invalid_structure(
                "request names no callable target",
            )),
        }
    }

    /// Returns the resolved target, trimmed, when one is named.
    #[must_use]
    pub fn target(&self) -> Option<CallTarget<'_>> {
        if let (Some(class), Some(method)) = (&self.call.class, &self.call.method) {
            let name = class.trim();
            let method_name = method.trim();
            if !name.is_empty() && !method_name.is_empty() {
                return Some(CallTarget::Class {
                    name,
                    method: method_name,
                });
            }
        }
        self.call.function.as_ref().and_then(|function| {
            let name = function.trim();
            (!name.is_empty()).then_some(CallTarget::Function { name })
        })
    }

    /// Returns the decoded argument list.
    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }
}

/// Trims leading and trailing ASCII whitespace from a byte slice.
fn trim_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|byte| !byte.is_ascii_whitespace())
        .map_or(start, |position| position + 1);
    bytes.get(start..end).unwrap_or_default()
}
