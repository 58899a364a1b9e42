//! Callable registry for the Trellis server core.
//!
//! The `trellis-registry` crate owns the mapping from registration inputs to
//! invokable server-side entities. Classes are registered explicitly, by
//! directory scan, or through a namespace rule that defers its scan until
//! the full registered set is needed; plain functions register as
//! [`UserFunction`] descriptors. Every resolved identity materializes into a
//! cached [`CallableDescriptor`], and the aggregate surface is exposed to
//! the client as a generated stub script versioned by a content hash.
//!
//! Runtime class discovery is replaced by an explicit implementation table:
//! each identity pairs a declared method list with a factory closure (see
//! [`Repository::register_class_impl`]), so no dynamic symbol lookup happens
//! at dispatch time.
//!
//! # Example
//!
//! ```
//! use serde_json::Value;
//! use trellis_config::{ClassOptions, FrameworkOptions};
//! use trellis_registry::{CallableClass, InvocationError, Repository};
//! use trellis_response::Response;
//!
//! struct Greeter;
//!
//! impl CallableClass for Greeter {
//!     fn invoke(
//!         &mut self,
//!         method: &str,
//!         _arguments: &[Value],
//!         response: &mut Response,
//!     ) -> Result<(), InvocationError> {
//!         match method {
//!             "hello" => {
//!                 response.alert("hello");
//!                 Ok(())
//!             }
//!             other => Err(InvocationError::unknown_method("Greeter", other)),
//!         }
//!     }
//! }
//!
//! let mut repository = Repository::new(FrameworkOptions::default());
//! repository.register_class_impl("Greeter", vec!["hello".into()], || Box::new(Greeter));
//! repository.add_class("Greeter", ClassOptions::default());
//!
//! let descriptor = repository.get_callable("Greeter").unwrap().unwrap();
//! assert_eq!(descriptor.exposed_methods(), vec!["hello"]);
//! ```

pub mod class;
pub mod descriptor;
pub mod error;
pub mod function;
pub mod repository;
pub mod script;

pub use self::class::{CallableClass, CallableFactory, CallableImpl, InvocationError};
pub use self::descriptor::{
    BASE_METHODS, CallableDescriptor, CallableKind, IncludeFile, IncludeState,
};
pub use self::error::RegistryError;
pub use self::function::{FunctionHandler, UserFunction};
pub use self::repository::{Repository, normalize_identity};
pub use self::script::{FUNCTION_TEMPLATE, OBJECT_TEMPLATE, StubRenderer, TemplateRenderer};
