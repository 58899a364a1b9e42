//! Unit tests for the dispatch lifecycle.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rstest::{fixture, rstest};
use serde_json::json;

use trellis_config::{ClassOptions, FrameworkOptions};
use trellis_registry::UserFunction;

use super::*;

struct Counter {
    total: i64,
}

impl CallableClass for Counter {
    fn invoke(
        &mut self,
        method: &str,
        arguments: &[Value],
        response: &mut Response,
    ) -> Result<(), InvocationError> {
        match method {
            "add" => {
                self.total += arguments.first().and_then(Value::as_i64).unwrap_or(0);
                response.assign("total", "innerHTML", self.total.to_string());
                Ok(())
            }
            "fail" => Err(InvocationError::new("counter failure")),
            other => Err(InvocationError::unknown_method("Counter", other)),
        }
    }
}

fn counter_factory() -> Box<dyn CallableClass> {
    Box::new(Counter { total: 0 })
}

#[fixture]
fn repository() -> Repository {
    let mut repository = Repository::new(FrameworkOptions::default());
    repository.register_class_impl(
        "App.Counter",
        vec!["add".to_owned(), "fail".to_owned(), "secret".to_owned()],
        counter_factory,
    );
    repository.add_class(
        "App.Counter",
        ClassOptions {
            protected: Some(vec!["secret".to_owned()]),
            ..ClassOptions::default()
        },
    );
    repository.register_function(UserFunction::new("greet", |_arguments, response| {
        response.alert("hi");
        Ok(())
    }));
    repository
}

fn add_request(amount: i64) -> AjaxRequest {
    AjaxRequest::class_call("App.Counter", "add", vec![json!(amount)])
}

// ---------------------------------------------------------------------------
// Successful dispatch
// ---------------------------------------------------------------------------

#[rstest]
fn class_call_completes_and_appends_commands(mut repository: Repository) {
    let mut processor = Processor::new();
    let response = processor
        .process(&mut repository, &add_request(2))
        .expect("process");
    assert_eq!(response.len(), 1);
    assert_eq!(processor.state(), DispatchState::Completed);
}

#[rstest]
fn underscored_identifier_reaches_the_same_target(mut repository: Repository) {
    let mut processor = Processor::new();
    let request = AjaxRequest::class_call("App_Counter", "add", vec![json!(4)]);
    processor.process(&mut repository, &request).expect("process");
    assert_eq!(processor.state(), DispatchState::Completed);
}

#[rstest]
fn function_call_completes(mut repository: Repository) {
    let mut processor = Processor::new();
    let request = AjaxRequest::function_call("greet", Vec::new());
    let response = processor.process(&mut repository, &request).expect("process");
    assert_eq!(response.len(), 1);
    assert_eq!(processor.state(), DispatchState::Completed);
}

#[rstest]
fn after_hook_runs_on_success(mut repository: Repository) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let mut processor = Processor::new();
    processor.on_after(move |_response, target, method| {
        sink.borrow_mut().push(format!("{target}::{method}"));
    });
    processor
        .process(&mut repository, &add_request(1))
        .expect("process");

    assert_eq!(seen.borrow().as_slice(), ["App.Counter::add"]);
}

// ---------------------------------------------------------------------------
// Rejection paths
// ---------------------------------------------------------------------------

#[rstest]
fn malformed_identifier_is_rejected_before_invocation(mut repository: Repository) {
    let reasons = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&reasons);

    let mut processor = Processor::new();
    processor.on_invalid(move |_response, reason| {
        sink.borrow_mut().push(reason.to_owned());
    });

    let request = AjaxRequest::class_call("; DROP", "add", Vec::new());
    let response = processor.process(&mut repository, &request).expect("process");

    assert!(response.is_empty());
    assert_eq!(processor.state(), DispatchState::Rejected);
    assert!(reasons.borrow().iter().any(|reason| reason.contains("; DROP")));
}

#[rstest]
fn unknown_identifier_is_rejected(mut repository: Repository) {
    let mut processor = Processor::new();
    let request = AjaxRequest::class_call("Ghost", "add", Vec::new());
    processor.process(&mut repository, &request).expect("process");
    assert_eq!(processor.state(), DispatchState::Rejected);
}

#[rstest]
fn protected_method_is_rejected(mut repository: Repository) {
    let mut processor = Processor::new();
    let request = AjaxRequest::class_call("App.Counter", "secret", Vec::new());
    processor.process(&mut repository, &request).expect("process");
    assert_eq!(processor.state(), DispatchState::Rejected);
}

#[rstest]
fn before_hook_can_end_the_request(mut repository: Repository) {
    let mut processor = Processor::new();
    processor.on_before(|_response, _target, _method, end_request| {
        *end_request = true;
    });

    let response = processor
        .process(&mut repository, &add_request(5))
        .expect("process");

    // The method never ran, so no assign command was appended.
    assert!(response.is_empty());
    assert_eq!(processor.state(), DispatchState::Rejected);
}

#[rstest]
fn unknown_function_is_rejected(mut repository: Repository) {
    let mut processor = Processor::new();
    let request = AjaxRequest::function_call("missing", Vec::new());
    processor.process(&mut repository, &request).expect("process");
    assert_eq!(processor.state(), DispatchState::Rejected);
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

#[rstest]
fn error_hook_recovers_invocation_failures(mut repository: Repository) {
    let seen = Rc::new(Cell::new(false));
    let sink = Rc::clone(&seen);

    let mut processor = Processor::new();
    processor.on_error(move |response, error| {
        sink.set(true);
        response.alert(error.to_string());
    });

    let request = AjaxRequest::class_call("App.Counter", "fail", Vec::new());
    let response = processor.process(&mut repository, &request).expect("recovered");

    assert!(seen.get());
    assert_eq!(response.len(), 1);
    assert_eq!(processor.state(), DispatchState::Failed);
}

#[rstest]
fn invocation_failure_propagates_without_an_error_hook(mut repository: Repository) {
    let mut processor = Processor::new();
    let request = AjaxRequest::class_call("App.Counter", "fail", Vec::new());
    let result = processor.process(&mut repository, &request);
    assert!(matches!(result, Err(DispatchError::Invocation(_))));
    assert_eq!(processor.state(), DispatchState::Failed);
}

// ---------------------------------------------------------------------------
// Target initialization
// ---------------------------------------------------------------------------

#[rstest]
fn init_hook_runs_once_per_target(mut repository: Repository) {
    let count = Rc::new(Cell::new(0_u32));
    let sink = Rc::clone(&count);

    let mut processor = Processor::new();
    processor.on_init(move |_target| {
        sink.set(sink.get() + 1);
    });

    processor
        .process(&mut repository, &add_request(1))
        .expect("first call");
    processor
        .process(&mut repository, &add_request(2))
        .expect("second call");

    assert_eq!(count.get(), 1);
}

#[rstest]
fn target_state_survives_across_requests(mut repository: Repository) {
    let mut processor = Processor::new();
    processor
        .process(&mut repository, &add_request(2))
        .expect("first call");
    processor
        .process(&mut repository, &add_request(3))
        .expect("second call");

    let last = processor
        .response()
        .commands()
        .last()
        .expect("assign command");
    assert_eq!(last.payload.get("value"), Some(&json!("5")));
}

#[rstest]
fn take_response_resets_the_stream(mut repository: Repository) {
    let mut processor = Processor::new();
    processor
        .process(&mut repository, &add_request(1))
        .expect("process");
    let taken = processor.take_response();
    assert_eq!(taken.len(), 1);
    assert!(processor.response().is_empty());
}
