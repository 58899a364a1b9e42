//! The append-ordered response stream.

use serde::Serialize;

use crate::command::ResponseCommand;
use crate::error::ResponseError;

/// Accumulates the client-side effects of one request.
///
/// Commands are kept in strict append order with no deduplication, no
/// reordering and no size limit; serialization preserves that order exactly.
/// One `Response` is shared across the whole dispatch lifecycle and returned
/// to the caller from every terminal state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Response {
    #[serde(rename = "cmds")]
    commands: Vec<ResponseCommand>,
}

impl Response {
    /// Creates an empty response.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Appends a command to the end of the stream.
    pub fn append(&mut self, command: ResponseCommand) {
        self.commands.push(command);
    }

    /// Returns the accumulated commands in append order.
    #[must_use]
    pub fn commands(&self) -> &[ResponseCommand] {
        &self.commands
    }

    /// Returns the number of accumulated commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` when no commands have been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Appends a command running a JavaScript fragment on the client.
    pub fn script(&mut self, code: impl Into<String>) {
        self.append(ResponseCommand::script(code));
    }

    /// Appends an alert command.
    pub fn alert(&mut self, message: impl Into<String>) {
        self.append(ResponseCommand::alert(message));
    }

    /// Appends an attribute assignment command.
    pub fn assign(&mut self, element_id: &str, attribute: &str, value: impl Into<String>) {
        self.append(ResponseCommand::assign(element_id, attribute, value));
    }

    /// Appends an attribute append command.
    pub fn append_html(&mut self, element_id: &str, attribute: &str, value: impl Into<String>) {
        self.append(ResponseCommand::append(element_id, attribute, value));
    }

    /// Appends a redirect command.
    pub fn redirect(&mut self, url: impl Into<String>, delay_secs: u64) {
        self.append(ResponseCommand::redirect(url, delay_secs));
    }

    /// Serializes the stream as the wire payload.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::Serialize`] if a command payload cannot be
    /// represented as JSON.
    pub fn serialize(&self) -> Result<String, ResponseError> {
        Ok(serde_json::to_string(self)?)
    }
}
