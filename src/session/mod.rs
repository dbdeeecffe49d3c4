//! Operator session
//!
//! One [`Session`] per running process. It owns the form, the activity log and the login
//! gate, turns action triggers into bridge invocations on background threads, and applies
//! their results when the dispatcher loop delivers the completion events.
//!
//! - `controller` - the session itself and the dispatcher loop
//! - `events` - messages from worker threads back to the dispatcher

mod controller;
mod events;

pub use controller::{run_dispatcher, DispatchOutcome, Session, SessionSettings};
pub use events::SessionEvent;

#[cfg(test)]
#[path = "../session_tests.rs"]
mod tests;
