//! Unit tests for user function descriptors.

use serde_json::json;

use trellis_response::Response;

use crate::script::StubRenderer;

use super::*;

fn noop_function(name: &str) -> UserFunction {
    UserFunction::new(name, |_arguments, _response| Ok(()))
}

#[test]
fn client_name_defaults_to_the_server_name() {
    let function = noop_function("hello");
    assert_eq!(function.name(), "hello");
    assert_eq!(function.server_name(), "hello");
}

#[test]
fn alias_overrides_the_client_name_only() {
    let mut function = noop_function("hello");
    function.configure("alias", json!("hi"));
    assert_eq!(function.name(), "hi");
    assert_eq!(function.server_name(), "hello");
}

#[test]
fn class_option_marks_a_method_alias() {
    let mut function = noop_function("save");
    function.configure("class", json!("Store"));
    assert_eq!(function.server_name(), "Store::save");
}

#[test]
fn unknown_options_land_in_the_stub_config() {
    let mut function = noop_function("hello");
    function.configure("mode", json!("sync"));
    assert_eq!(function.config().get("mode"), Some(&json!("sync")));
}

#[test]
fn call_routes_arguments_and_response_to_the_handler() {
    let mut function = UserFunction::new("greet", |arguments, response| {
        let who = arguments
            .first()
            .and_then(Value::as_str)
            .unwrap_or("world");
        response.alert(format!("hello {who}"));
        Ok(())
    });

    let mut response = Response::new();
    function
        .call(&[json!("trellis")], &mut response)
        .expect("call succeeds");
    assert_eq!(response.len(), 1);
}

#[test]
fn load_without_include_is_a_no_op() {
    let mut function = noop_function("hello");
    function.load().expect("no include to load");
}

#[test]
fn load_with_missing_include_fails() {
    let mut function = noop_function("hello");
    function.configure("include", json!("/nonexistent/hello.rs"));
    let error = function.load().expect_err("missing include");
    assert!(matches!(error, RegistryError::IncludeMissing { .. }));
}

#[test]
fn script_renders_a_prefixed_stub() {
    let mut function = noop_function("hello");
    function.configure("mode", json!("sync"));
    let stub = function.script("trellis_", &StubRenderer);
    assert!(stub.contains("trellis_hello = function()"));
    assert!(stub.contains("fn: 'hello'"));
    assert!(stub.contains("mode: \"sync\""));
}
