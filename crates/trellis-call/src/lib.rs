//! Client-side call syntax generation for the Trellis server core.
//!
//! The `trellis-call` crate converts server-side values into fragments of the
//! client-side call language. [`Parameter`] is the tagged value model: the
//! type of every argument is decided once, at the boundary where the raw
//! value enters the system, and carried as an explicit tag from then on.
//! [`JsCall`] assembles full call expressions from a client identifier and a
//! parameter list, and the [`RequestFactory`] / [`PaginatorFactory`] pair
//! produces pre-bound builders for one registered callable.
//!
//! # Example
//!
//! ```
//! use trellis_call::{JsCall, Parameter};
//!
//! let call = JsCall::new("TrellisApp.Calc.add")
//!     .arg(Parameter::Numeric(2.into()))
//!     .arg(Parameter::input_value("rhs"));
//! assert_eq!(call.script(), "TrellisApp.Calc.add(2, trellis.$('rhs').value)");
//! ```

pub mod call;
pub mod parameter;

pub use self::call::{JsCall, PaginatorFactory, RequestFactory};
pub use self::parameter::{CLIENT_NAMESPACE, Parameter};
