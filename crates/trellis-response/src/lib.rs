//! Ordered response command stream for the Trellis server core.
//!
//! Every server-side invocation writes its client-side effects into a shared
//! [`Response`]: an append-ordered list of [`ResponseCommand`] values that is
//! serialized as the request's result payload. Commands are opaque to the
//! stream; it never interprets payloads, only orders and serializes them.
//! Client-side execution order depends on the append order being preserved
//! exactly.
//!
//! Response plugins (e.g. a jQuery bridge) extend the command vocabulary
//! through the [`ResponsePlugin`] seam; their widget internals are out of
//! scope here.

mod command;
mod error;
mod plugin;
mod stream;

pub use self::command::ResponseCommand;
pub use self::error::ResponseError;
pub use self::plugin::{ResponsePlugin, ScriptPlugin};
pub use self::stream::Response;
