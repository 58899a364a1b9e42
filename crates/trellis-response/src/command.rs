//! Response command type and constructors for the built-in commands.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// One client-side instruction emitted by a server-side invocation.
///
/// A command pairs a type identifier with command-specific payload data. The
/// payload structure is a contract between the emitting server code and the
/// client-side handler registered for the command name; the stream itself
/// never inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseCommand {
    /// Command type identifier, matched against client-side handlers.
    #[serde(rename = "cmd")]
    pub name: String,
    /// Command-specific structured data.
    #[serde(rename = "data")]
    pub payload: Value,
}

impl ResponseCommand {
    /// Creates a command with an arbitrary name and payload.
    #[must_use]
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Runs a JavaScript fragment on the client.
    #[must_use]
    pub fn script(code: impl Into<String>) -> Self {
        Self::new("script", Value::String(code.into()))
    }

    /// Shows an alert message.
    #[must_use]
    pub fn alert(message: impl Into<String>) -> Self {
        Self::new("alert", Value::String(message.into()))
    }

    /// Assigns a value to an attribute of a DOM element.
    #[must_use]
    pub fn assign(element_id: &str, attribute: &str, value: impl Into<String>) -> Self {
        Self::new(
            "assign",
            json!({
                "id": element_id,
                "attr": attribute,
                "value": value.into(),
            }),
        )
    }

    /// Appends a value to an attribute of a DOM element.
    #[must_use]
    pub fn append(element_id: &str, attribute: &str, value: impl Into<String>) -> Self {
        Self::new(
            "append",
            json!({
                "id": element_id,
                "attr": attribute,
                "value": value.into(),
            }),
        )
    }

    /// Redirects the browser, optionally after a delay in seconds.
    #[must_use]
    pub fn redirect(url: impl Into<String>, delay_secs: u64) -> Self {
        Self::new(
            "redirect",
            json!({
                "url": url.into(),
                "delay": delay_secs,
            }),
        )
    }

    /// Wraps a payload produced by a response plugin.
    #[must_use]
    pub fn plugin(plugin_name: &str, payload: Value) -> Self {
        Self::new(plugin_name, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_command_carries_the_code_as_payload() {
        let command = ResponseCommand::script("console.log('hi')");
        assert_eq!(command.name, "script");
        assert_eq!(command.payload, Value::String("console.log('hi')".to_owned()));
    }

    #[test]
    fn assign_command_payload_names_element_attribute_and_value() {
        let command = ResponseCommand::assign("status", "innerHTML", "done");
        assert_eq!(command.name, "assign");
        assert_eq!(
            command.payload,
            json!({"id": "status", "attr": "innerHTML", "value": "done"})
        );
    }

    #[test]
    fn commands_serialize_with_cmd_and_data_fields() {
        let command = ResponseCommand::alert("saved");
        let wire = serde_json::to_string(&command).expect("serialize command");
        assert_eq!(wire, r#"{"cmd":"alert","data":"saved"}"#);
    }
}
