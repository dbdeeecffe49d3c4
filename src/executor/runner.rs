//! Process spawning and result capture

use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::invocation::{Interpreter, Invocation, ScriptArgs};
use super::output::{collect, spawn_pipe_reader};
use crate::escape::PsScript;

/// How often a time-bounded wait checks the child
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Exit code reported when the child was ended by a signal
const NO_EXIT_CODE: i32 = -1;

/// Captured outcome of one finished process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ActionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// The process could not be started or did not finish
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{program}' did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },
    #[error("I/O error while running process: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs an [`Invocation`] to completion.
///
/// The seam between session logic and real processes; tests substitute fakes.
pub trait ActionRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> Result<ActionResult, BridgeError>;
}

/// Resolve `program` through PATH, falling back to the name as given.
pub fn resolve_program(program: &str) -> PathBuf {
    match which::which(program) {
        Ok(path) => {
            debug!(program = program, resolved = %path.display(), "Resolved interpreter");
            path
        }
        Err(e) => {
            debug!(program = program, error = %e, "Interpreter not on PATH, using name as given");
            PathBuf::from(program)
        }
    }
}

/// Spawns real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ActionRunner for ProcessRunner {
    #[instrument(name = "run_process", skip_all, fields(program = %invocation.program))]
    fn run(&self, invocation: &Invocation) -> Result<ActionResult, BridgeError> {
        let start = Instant::now();
        let executable = resolve_program(&invocation.program);

        let mut child = Command::new(&executable)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| {
                warn!(program = %invocation.program, error = %source, "Process spawn failed");
                BridgeError::Spawn {
                    program: invocation.program.clone(),
                    source,
                }
            })?;

        debug!(pid = child.id(), invocation = %invocation.describe(), "Process started");

        let stdout_reader = spawn_pipe_reader(child.stdout.take(), "stdout");
        let stderr_reader = spawn_pipe_reader(child.stderr.take(), "stderr");

        let status = match invocation.timeout {
            None => child.wait()?,
            Some(timeout) => match wait_with_deadline(&mut child, timeout)? {
                Some(status) => status,
                None => {
                    // Readers are left detached: a grandchild may still hold the pipes open.
                    warn!(
                        program = %invocation.program,
                        timeout_ms = timeout.as_millis() as u64,
                        "Process timed out, killed"
                    );
                    return Err(BridgeError::Timeout {
                        program: invocation.program.clone(),
                        timeout,
                    });
                }
            },
        };

        let result = ActionResult {
            exit_code: status.code().unwrap_or(NO_EXIT_CODE),
            stdout: collect(stdout_reader)?,
            stderr: collect(stderr_reader)?,
        };

        info!(
            program = %invocation.program,
            exit_code = result.exit_code,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Process finished"
        );

        Ok(result)
    }
}

/// Poll until the child exits or `timeout` passes. On expiry the child is killed and
/// reaped, and `None` is returned.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(WAIT_POLL_INTERVAL);
    }
}

/// Interpreter plus runner: the two operation modes of the bridge.
#[derive(Clone)]
pub struct ProcessBridge {
    interpreter: Interpreter,
    runner: Arc<dyn ActionRunner>,
}

impl ProcessBridge {
    pub fn new(interpreter: Interpreter, runner: Arc<dyn ActionRunner>) -> Self {
        Self {
            interpreter,
            runner,
        }
    }

    /// Run an ad-hoc command, bounded by `timeout` when given.
    pub fn run_command(
        &self,
        script: &PsScript,
        timeout: Option<Duration>,
    ) -> Result<ActionResult, BridgeError> {
        let inv = self.interpreter.command(script).with_timeout(timeout);
        self.runner.run(&inv)
    }

    /// Dot-source `script_path`, apply `prelude`, call `function`.
    pub fn run_named_function(
        &self,
        script_path: &Path,
        function: &'static str,
        prelude: &PsScript,
        timeout: Option<Duration>,
    ) -> Result<ActionResult, BridgeError> {
        let inv = self
            .interpreter
            .dot_source(script_path, function, prelude)
            .with_timeout(timeout);
        self.runner.run(&inv)
    }

    /// Run `script_path` as a program with the fixed argument list.
    pub fn run_script_action(
        &self,
        script_path: &Path,
        args: &ScriptArgs,
        timeout: Option<Duration>,
    ) -> Result<ActionResult, BridgeError> {
        let inv = self
            .interpreter
            .script_file(script_path, args)
            .with_timeout(timeout);
        self.runner.run(&inv)
    }
}

impl std::fmt::Debug for ProcessBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessBridge")
            .field("interpreter", &self.interpreter)
            .finish_non_exhaustive()
    }
}
