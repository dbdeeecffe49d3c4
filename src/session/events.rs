//! Completion events sent from background threads to the dispatcher loop

use std::time::Duration;

use crate::actions::ScriptAction;
use crate::executor::{ActionResult, BridgeError};

#[derive(Debug)]
pub enum SessionEvent {
    /// A script action ran to completion, failed to start, or timed out
    ActionFinished {
        invocation_id: String,
        action: ScriptAction,
        result: Result<ActionResult, BridgeError>,
        duration: Duration,
    },
    /// The reachability probe returned
    ProbeFinished { outcome: Result<(), String> },
}

impl SessionEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::ActionFinished { .. } => "action_finished",
            SessionEvent::ProbeFinished { .. } => "probe_finished",
        }
    }
}
