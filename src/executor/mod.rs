//! Process bridge to the external interpreter
//!
//! This module handles all aspects of running the automation script:
//! - Building structured invocations (program plus explicit argument list)
//! - The two entry styles of the script: dot-source + function call, and script file + arguments
//! - Ad-hoc command execution with an optional timeout
//! - Capturing exit code, stdout and stderr
//!
//! A non-zero exit code is returned as data in [`ActionResult`]. Only failures to start or
//! finish the process are [`BridgeError`]s.

mod invocation;
mod output;
mod runner;

pub use invocation::{Interpreter, Invocation, ScriptArgs};
pub use runner::{
    resolve_program, ActionResult, ActionRunner, BridgeError, ProcessBridge, ProcessRunner,
};

#[cfg(test)]
#[path = "../executor_tests.rs"]
mod tests;
