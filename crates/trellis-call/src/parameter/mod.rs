//! Tagged parameter values and their client-syntax encoding.
//!
//! A [`Parameter`] is classified exactly once, either explicitly through a
//! variant constructor or by [`Parameter::make`], and the tag is never
//! re-inspected with runtime type tests downstream. Encoding is a pure
//! function of the value: every variant has a defined encoding and no error
//! conditions exist.

use std::fmt::Write as _;

use serde_json::Value;

/// Client-side namespace the DOM-read expressions are rooted in.
pub const CLIENT_NAMESPACE: &str = "trellis";

/// One argument of a client-side call expression.
///
/// The DOM-read variants (`FormValues`, `InputValue`, `CheckedValue`,
/// `InnerHtml`) carry an element or form identifier and encode to an
/// expression the client evaluates at call time; the remaining variants
/// embed a server-side value directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// All input values of a form, read on the client (`trellis.getFormValues`).
    FormValues(String),
    /// The `value` attribute of a DOM element, read on the client.
    InputValue(String),
    /// The `checked` attribute of a DOM element, read on the client.
    CheckedValue(String),
    /// The `innerHTML` of a DOM element, read on the client.
    InnerHtml(String),
    /// A string embedded as a single-quoted literal.
    QuotedString(String),
    /// A boolean literal.
    Boolean(bool),
    /// A page number substituted by the paginator.
    PageNumber(u64),
    /// A numeric value embedded unquoted.
    Numeric(serde_json::Number),
    /// A raw client-side value; arrays and objects serialise with
    /// single-quoted string delimiters, scalars embed in plain form.
    RawJs(Value),
}

impl Parameter {
    /// Creates a form-values parameter for the given form identifier.
    #[must_use]
    pub fn form_values(form_id: impl Into<String>) -> Self {
        Self::FormValues(form_id.into())
    }

    /// Creates an input-value parameter for the given element identifier.
    #[must_use]
    pub fn input_value(element_id: impl Into<String>) -> Self {
        Self::InputValue(element_id.into())
    }

    /// Creates a checked-value parameter for the given element identifier.
    #[must_use]
    pub fn checked_value(element_id: impl Into<String>) -> Self {
        Self::CheckedValue(element_id.into())
    }

    /// Creates an inner-HTML parameter for the given element identifier.
    #[must_use]
    pub fn inner_html(element_id: impl Into<String>) -> Self {
        Self::InnerHtml(element_id.into())
    }

    /// Classifies a raw value into a parameter.
    ///
    /// Numbers and numeric strings become [`Parameter::Numeric`], other
    /// strings become [`Parameter::QuotedString`], booleans become
    /// [`Parameter::Boolean`], and arrays, objects and null become
    /// [`Parameter::RawJs`].
    #[must_use]
    pub fn make(value: Value) -> Self {
        match value {
            Value::Bool(flag) => Self::Boolean(flag),
            Value::Number(number) => Self::Numeric(number),
            Value::String(text) => parse_number(&text)
                .map_or_else(|| Self::QuotedString(text.clone()), Self::Numeric),
            other => Self::RawJs(other),
        }
    }

    /// Replaces the page number carried by a [`Parameter::PageNumber`].
    ///
    /// Every other variant is immutable after construction; this is the one
    /// value-replacement operation, used by the paginator.
    pub const fn set_page(&mut self, page: u64) {
        if let Self::PageNumber(current) = self {
            *current = page;
        }
    }

    /// Encodes the parameter as a client-side argument expression.
    #[must_use]
    pub fn script(&self) -> String {
        match self {
            Self::FormValues(form_id) => dom_call("getFormValues", form_id),
            Self::InputValue(element_id) => format!("{}.value", dom_call("$", element_id)),
            Self::CheckedValue(element_id) => format!("{}.checked", dom_call("$", element_id)),
            Self::InnerHtml(element_id) => format!("{}.innerHTML", dom_call("$", element_id)),
            Self::QuotedString(text) => quote(text),
            Self::Boolean(flag) => String::from(if *flag { "true" } else { "false" }),
            Self::PageNumber(page) => page.to_string(),
            Self::Numeric(number) => number.to_string(),
            Self::RawJs(value) => match value {
                Value::Array(_) | Value::Object(_) => js_literal(value),
                Value::String(text) => text.clone(),
                scalar => scalar.to_string(),
            },
        }
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.script())
    }
}

/// Parameters embed as their encoded call-syntax fragment when a response
/// payload carrying one is serialized.
impl serde::Serialize for Parameter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.script())
    }
}

/// Parses a textually numeric string, preserving integer form when possible.
fn parse_number(text: &str) -> Option<serde_json::Number> {
    if let Ok(int) = text.parse::<i64>() {
        return Some(serde_json::Number::from(int));
    }
    text.parse::<f64>().ok().and_then(serde_json::Number::from_f64)
}

/// Builds a client call reading a DOM element or form.
fn dom_call(function: &str, argument: &str) -> String {
    format!("{CLIENT_NAMESPACE}.{function}({})", quote(argument))
}

/// Wraps a string in single quotes, escaping embedded quotes and backslashes.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '"' => quoted.push_str("\\\""),
            other => quoted.push(other),
        }
    }
    quoted.push('\'');
    quoted
}

/// Serialises a structured value using single quotes for all string
/// delimiters.
///
/// The client call syntax cannot escape embedded double quotes, so quote
/// characters inside strings are hex-escaped and the delimiters themselves
/// are single quotes.
fn js_literal(value: &Value) -> String {
    let mut out = String::new();
    write_js_value(value, &mut out);
    out
}

fn write_js_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
        Value::Number(number) => {
            // String pushes cannot fail; write! into a String is infallible.
            let _ = write!(out, "{number}");
        }
        Value::String(text) => write_js_string(text, out),
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_js_value(item, out);
            }
            out.push(']');
        }
        Value::Object(entries) => {
            out.push('{');
            for (index, (key, item)) in entries.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_js_string(key, out);
                out.push(':');
                write_js_value(item, out);
            }
            out.push('}');
        }
    }
}

fn write_js_string(text: &str, out: &mut String) {
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\'' => out.push_str("\\u0027"),
            '"' => out.push_str("\\u0022"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            control if (control as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", control as u32);
            }
            other => out.push(other),
        }
    }
    out.push('\'');
}

#[cfg(test)]
mod tests;
