//! Unit tests for parameter classification and encoding.

use rstest::rstest;
use serde_json::json;

use super::*;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[test]
fn make_classifies_strings_as_quoted() {
    let parameter = Parameter::make(json!("hello"));
    assert_eq!(parameter, Parameter::QuotedString("hello".to_owned()));
    assert_eq!(parameter.script(), "'hello'");
}

#[test]
fn make_classifies_numbers_as_numeric() {
    let parameter = Parameter::make(json!(42));
    assert_eq!(parameter.script(), "42");
}

#[test]
fn make_classifies_numeric_strings_as_numeric() {
    let parameter = Parameter::make(json!("42"));
    assert_eq!(parameter, Parameter::Numeric(42.into()));
    assert_eq!(parameter.script(), "42");
}

#[test]
fn make_classifies_booleans() {
    assert_eq!(Parameter::make(json!(true)).script(), "true");
    assert_eq!(Parameter::make(json!(false)).script(), "false");
}

#[test]
fn make_classifies_structured_values_as_raw_js() {
    let parameter = Parameter::make(json!({"a": 1}));
    assert!(matches!(parameter, Parameter::RawJs(_)));
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

#[test]
fn quoted_string_escapes_embedded_single_quote() {
    let parameter = Parameter::QuotedString("it's".to_owned());
    assert_eq!(parameter.script(), "'it\\'s'");
}

#[test]
fn raw_js_object_uses_single_quoted_delimiters() {
    let parameter = Parameter::make(json!({"a": 1}));
    assert_eq!(parameter.script(), "{'a':1}");
}

#[test]
fn raw_js_hex_escapes_quotes_inside_strings() {
    let parameter = Parameter::RawJs(json!({"msg": "say \"hi\", don't shout"}));
    assert_eq!(
        parameter.script(),
        "{'msg':'say \\u0022hi\\u0022, don\\u0027t shout'}"
    );
}

#[test]
fn raw_js_scalar_embeds_in_plain_form() {
    assert_eq!(Parameter::RawJs(json!(7)).script(), "7");
    assert_eq!(Parameter::RawJs(json!(null)).script(), "null");
}

#[test]
fn raw_js_nested_array_encodes_recursively() {
    let parameter = Parameter::RawJs(json!(["a", [1, true], {"k": "v"}]));
    assert_eq!(parameter.script(), "['a',[1,true],{'k':'v'}]");
}

#[rstest]
#[case::form(Parameter::form_values("order"), "trellis.getFormValues('order')")]
#[case::input(Parameter::input_value("name"), "trellis.$('name').value")]
#[case::checked(Parameter::checked_value("opt"), "trellis.$('opt').checked")]
#[case::html(Parameter::inner_html("panel"), "trellis.$('panel').innerHTML")]
fn dom_read_parameters_encode_as_client_expressions(
    #[case] parameter: Parameter,
    #[case] expected: &str,
) {
    assert_eq!(parameter.script(), expected);
}

#[test]
fn page_number_encodes_unquoted_and_is_replaceable() {
    let mut parameter = Parameter::PageNumber(1);
    assert_eq!(parameter.script(), "1");
    parameter.set_page(12);
    assert_eq!(parameter.script(), "12");
}

#[test]
fn set_page_leaves_other_variants_untouched() {
    let mut parameter = Parameter::Numeric(5.into());
    parameter.set_page(9);
    assert_eq!(parameter.script(), "5");
}

#[test]
fn parameters_serialize_as_their_script_form() {
    let parameter = Parameter::input_value("name");
    let wire = serde_json::to_string(&parameter).expect("serialize parameter");
    assert_eq!(wire, r#""trellis.$('name').value""#);
}
