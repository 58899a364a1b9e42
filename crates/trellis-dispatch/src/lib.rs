//! Request dispatch for the Trellis server core.
//!
//! The `trellis-dispatch` crate receives an incoming AJAX request (target
//! identifier, method, decoded arguments), validates the identifiers against
//! a syntactic whitelist, resolves the matching callable through the
//! repository, invokes it, and routes the `init` / `before` / `after` /
//! `invalid` / `error` lifecycle hooks. Whatever the outcome, the caller
//! gets back the shared response command stream, except for invocation
//! failures with no error hook registered, which propagate.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use trellis_config::FrameworkOptions;
//! use trellis_dispatch::{AjaxRequest, DispatchState, Processor};
//! use trellis_registry::{Repository, UserFunction};
//!
//! let mut repository = Repository::new(FrameworkOptions::default());
//! repository.register_function(UserFunction::new("greet", |_args, response| {
//!     response.alert("hello");
//!     Ok(())
//! }));
//!
//! let mut processor = Processor::new();
//! let request = AjaxRequest::function_call("greet", vec![json!("world")]);
//! let response = processor.process(&mut repository, &request).unwrap();
//! assert_eq!(response.len(), 1);
//! assert_eq!(processor.state(), DispatchState::Completed);
//! ```

mod errors;
pub mod processor;
pub mod request;
pub mod validate;

pub use self::errors::DispatchError;
pub use self::processor::{
    AfterHook, BeforeHook, DispatchState, ErrorHook, InitHook, InvalidHook, Processor,
};
pub use self::request::{AjaxRequest, CallDescriptor, CallTarget};
pub use self::validate::{is_valid_class_identifier, is_valid_method_name};
