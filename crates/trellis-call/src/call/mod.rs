//! Client call expressions and per-callable builder factories.
//!
//! A [`JsCall`] is one client-side call expression: a client identifier plus
//! an encoded parameter list, optionally wrapped in a confirmation prompt.
//! The [`RequestFactory`] and [`PaginatorFactory`] are bound to a single
//! registered callable and hand out pre-named builders; the repository
//! constructs one of each per callable and memoizes them.

use crate::parameter::Parameter;

/// One client-side call expression under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct JsCall {
    name: String,
    parameters: Vec<Parameter>,
    confirm: Option<String>,
}

impl JsCall {
    /// Creates a call to the given client identifier with no arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            confirm: None,
        }
    }

    /// Appends an argument.
    #[must_use]
    pub fn arg(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Wraps the call in a client-side confirmation prompt.
    #[must_use]
    pub fn confirm(mut self, question: impl Into<String>) -> Self {
        self.confirm = Some(question.into());
        self
    }

    /// Returns the client identifier this call targets.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the page number on every [`Parameter::PageNumber`] argument.
    pub fn set_page(&mut self, page: u64) {
        for parameter in &mut self.parameters {
            parameter.set_page(page);
        }
    }

    /// Renders the call expression.
    #[must_use]
    pub fn script(&self) -> String {
        let arguments: Vec<String> = self.parameters.iter().map(Parameter::script).collect();
        let call = format!("{}({})", self.name, arguments.join(", "));
        let Some(question) = &self.confirm else {
            return call;
        };
        format!(
            "if(confirm({})){{{call};}}",
            Parameter::QuotedString(question.clone()).script()
        )
    }
}

impl std::fmt::Display for JsCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.script())
    }
}

/// Builder factory for request calls to one registered callable.
///
/// Constructed once per callable by the repository and memoized; `call`
/// produces a fresh [`JsCall`] for one exposed method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFactory {
    client_name: String,
}

impl RequestFactory {
    /// Creates a factory bound to a prefixed client identifier.
    #[must_use]
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
        }
    }

    /// Returns the bound client identifier.
    #[must_use]
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// Starts a call to one method of the bound callable.
    #[must_use]
    pub fn call(&self, method: &str) -> JsCall {
        JsCall::new(format!("{}.{method}", self.client_name))
    }
}

/// Builder factory for paginated request calls to one registered callable.
///
/// Calls carry a [`Parameter::PageNumber`] placeholder which
/// [`PaginatorFactory::links`] substitutes per page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatorFactory {
    client_name: String,
}

impl PaginatorFactory {
    /// Creates a factory bound to a prefixed client identifier.
    #[must_use]
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
        }
    }

    /// Starts a paginated call to one method; the page-number placeholder is
    /// appended as the first argument.
    #[must_use]
    pub fn call(&self, method: &str) -> JsCall {
        JsCall::new(format!("{}.{method}", self.client_name)).arg(Parameter::PageNumber(1))
    }

    /// Renders one call script per page from 1 to `last_page` inclusive.
    #[must_use]
    pub fn links(&self, call: &JsCall, last_page: u64) -> Vec<(u64, String)> {
        (1..=last_page)
            .map(|page| {
                let mut page_call = call.clone();
                page_call.set_page(page);
                (page, page_call.script())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
