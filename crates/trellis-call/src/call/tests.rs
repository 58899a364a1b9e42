//! Unit tests for call expression building.

use serde_json::json;

use super::*;

#[test]
fn call_without_arguments_renders_empty_parens() {
    let call = JsCall::new("trellis_hello");
    assert_eq!(call.script(), "trellis_hello()");
}

#[test]
fn call_renders_arguments_in_append_order() {
    let call = JsCall::new("TrellisApp.Calc.add")
        .arg(Parameter::Numeric(2.into()))
        .arg(Parameter::QuotedString("plus".to_owned()))
        .arg(Parameter::make(json!(true)));
    assert_eq!(call.script(), "TrellisApp.Calc.add(2, 'plus', true)");
}

#[test]
fn confirm_wraps_the_call() {
    let call = JsCall::new("TrellisApp.User.remove")
        .arg(Parameter::Numeric(7.into()))
        .confirm("Really remove?");
    assert_eq!(
        call.script(),
        "if(confirm('Really remove?')){TrellisApp.User.remove(7);}"
    );
}

#[test]
fn request_factory_prefixes_methods_with_the_client_name() {
    let factory = RequestFactory::new("TrellisApp.Calc");
    let call = factory.call("add").arg(Parameter::input_value("lhs"));
    assert_eq!(call.script(), "TrellisApp.Calc.add(trellis.$('lhs').value)");
}

#[test]
fn paginator_factory_seeds_a_page_placeholder() {
    let factory = PaginatorFactory::new("TrellisApp.Items");
    let call = factory.call("list");
    assert_eq!(call.script(), "TrellisApp.Items.list(1)");
}

#[test]
fn paginator_links_substitute_each_page() {
    let factory = PaginatorFactory::new("TrellisApp.Items");
    let call = factory.call("list").arg(Parameter::QuotedString("desc".to_owned()));
    let links = factory.links(&call, 3);
    assert_eq!(links.len(), 3);
    assert_eq!(
        links.first().map(|(_, script)| script.as_str()),
        Some("TrellisApp.Items.list(1, 'desc')")
    );
    assert_eq!(
        links.last().map(|(_, script)| script.as_str()),
        Some("TrellisApp.Items.list(3, 'desc')")
    );
}
