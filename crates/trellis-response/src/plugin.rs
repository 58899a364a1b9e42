//! Response plugin seam.
//!
//! Response plugins extend the command vocabulary sent to the client. Each
//! plugin contributes an init script that registers its command handler with
//! the client runtime, and a version hash folded into the cache-busting
//! surface. Widget internals live outside this core.

use serde_json::Value;

use crate::command::ResponseCommand;
use crate::stream::Response;

/// A named extension of the response command vocabulary.
pub trait ResponsePlugin {
    /// Returns the plugin name, used as the command type identifier.
    fn name(&self) -> &'static str;

    /// Returns a version hash for the plugin, folded into cache busting.
    fn hash(&self) -> String;

    /// Returns the client-side init script registering the command handler.
    fn client_script(&self) -> String;

    /// Emits one plugin command into the shared response.
    fn emit(&self, response: &mut Response, payload: Value) {
        response.append(ResponseCommand::plugin(self.name(), payload));
    }
}

/// Built-in plugin running raw script payloads through the client's script
/// executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptPlugin;

impl ResponsePlugin for ScriptPlugin {
    fn name(&self) -> &'static str {
        "script"
    }

    fn hash(&self) -> String {
        // The command format has not changed since 1.0.
        "1.0.0".to_owned()
    }

    fn client_script(&self) -> String {
        "\ntrellis.command.handler.register(\"script\", function(args) {\n    trellis.cmd.script.execute(args);\n});\n"
            .to_owned()
    }
}
