//! Host shim: the glue between an editor and the core. It turns cursor
//! context into engine queries and render commands into host-native UI.

pub mod session;
pub mod symbol;

pub use session::{JsonLinesHost, Session, SessionMessage, SessionRequest};
pub use symbol::symbol_at;

use crate::core::EngineCommand;

/// Title of the surface showing the result of `command` on `target`.
pub fn surface_title(command: EngineCommand, target: Option<&str>) -> String {
    let target = target.unwrap_or_default();
    match command {
        EngineCommand::CallGraph => format!("Method Flow: {target}"),
        EngineCommand::IncomingCalls => format!("Callers of: {target}"),
        EngineCommand::Dependencies => format!("Dependencies: {target}"),
        EngineCommand::Impact => format!("Impact Analysis: {target}"),
        EngineCommand::CircularDeps => "Circular Dependencies".to_string(),
        EngineCommand::FullGraph => "Full Graph".to_string(),
    }
}

/// Progress notification shown while the engine runs.
pub fn progress_title(command: EngineCommand, target: Option<&str>) -> String {
    let target = target.unwrap_or_default();
    match command {
        EngineCommand::CallGraph => format!("CodeMap: Analyzing {target}..."),
        EngineCommand::IncomingCalls => format!("CodeMap: Finding callers of {target}..."),
        EngineCommand::Dependencies => {
            format!("CodeMap: Analyzing dependencies of {target}...")
        }
        EngineCommand::Impact => format!("CodeMap: Impact analysis for {target}..."),
        EngineCommand::CircularDeps => "CodeMap: Detecting circular dependencies...".to_string(),
        EngineCommand::FullGraph => "CodeMap: Building full project graph...".to_string(),
    }
}

/// What to tell the user when the cursor is not on a symbol.
pub fn missing_symbol_hint(command: EngineCommand) -> &'static str {
    match command {
        EngineCommand::CallGraph | EngineCommand::IncomingCalls => "Place cursor on a method name.",
        _ => "Place cursor on a class name.",
    }
}
