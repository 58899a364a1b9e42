//! Typed configuration for the Trellis server core.
//!
//! The `trellis-config` crate replaces the dot-keyed option lookups of
//! classic AJAX frameworks with typed structures: [`FrameworkOptions`] for
//! the framework-wide settings consumed during script generation, and the
//! registration option bags ([`ClassOptions`], [`DirectoryOptions`],
//! [`NamespaceOptions`]) that callers pass when exposing server-side
//! callables to the client.
//!
//! Merge precedence between option layers is fixed and documented on the
//! types themselves: directory-wide defaults, then wildcard (`*`) entries,
//! then class-specific entries; per-method wildcard bags merge under the
//! method-specific bag with the specific key winning on conflict.

mod framework;
mod registration;
mod separator;

pub use self::framework::{
    DEFAULT_CLASS_PREFIX, DEFAULT_FUNCTION_PREFIX, DEFAULT_REQUEST_URI, FrameworkOptions,
};
pub use self::registration::{
    ClassOptions, DirectoryOptions, MethodOptions, NamespaceOptions, WILDCARD_METHOD,
    merge_method_options,
};
pub use self::separator::Separator;
