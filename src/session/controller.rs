use async_channel::{Receiver, Sender};
use parking_lot::RwLock;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::events::SessionEvent;
use crate::activity_log::ActivityLog;
use crate::actions::ScriptAction;
use crate::auth::{AuthGate, AuthState, ReachabilityProbe};
use crate::config::{Config, InvocationStyle};
use crate::error::{QuickStartError, Result, ResultExt};
use crate::executor::{ActionResult, BridgeError, ProcessBridge, ScriptArgs};
use crate::form::{normalize, validate, FormState, NormalizedForm};
use crate::logging;
use crate::prelude::{build_prelude, PreludeOptions};
use crate::protocol;

/// What the session needs from the config to run actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub script_path: PathBuf,
    pub invocation_style: InvocationStyle,
    pub action_timeout: Option<Duration>,
    pub prelude: PreludeOptions,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            script_path: config.resolved_script_path(),
            invocation_style: config.invocation_style,
            action_timeout: config.action_timeout(),
            prelude: PreludeOptions {
                control_shims: config.control_shims,
            },
        }
    }
}

/// Result of an action trigger that was allowed past the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A worker thread is running the action
    Started { invocation_id: String },
    /// Validation stopped the action; the message is already in the activity log
    Rejected { message: String },
}

pub struct Session {
    form: RwLock<FormState>,
    /// Bumped whenever script output rewrites form fields
    revision: AtomicU64,
    log: ActivityLog,
    auth: AuthGate,
    bridge: ProcessBridge,
    probe: Arc<dyn ReachabilityProbe>,
    settings: SessionSettings,
    events: Sender<SessionEvent>,
}

impl Session {
    pub fn new(
        initial: FormState,
        settings: SessionSettings,
        bridge: ProcessBridge,
        probe: Arc<dyn ReachabilityProbe>,
        events: Sender<SessionEvent>,
    ) -> Self {
        Self {
            form: RwLock::new(initial),
            revision: AtomicU64::new(0),
            log: ActivityLog::new(),
            auth: AuthGate::new(),
            bridge,
            probe,
            settings,
            events,
        }
    }

    pub fn form(&self) -> FormState {
        self.form.read().clone()
    }

    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth.state()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn script_found(&self) -> bool {
        self.settings.script_path.is_file()
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.auth.is_unlocked() {
            Ok(())
        } else {
            Err(QuickStartError::Locked)
        }
    }

    /// Replace the form with the operator's current values. Last write wins, including
    /// over fields an in-flight action may later fill in.
    pub fn update_form(&self, form: FormState) -> Result<u64> {
        self.ensure_unlocked()?;
        *self.form.write() = form;
        Ok(self.revision())
    }

    pub fn clear_log(&self) -> Result<()> {
        self.ensure_unlocked()?;
        self.log.clear();
        Ok(())
    }

    /// Start the reachability probe on a background thread unless one is already running.
    pub fn start_probe(&self) -> bool {
        if !self.auth.begin_check() {
            return false;
        }
        self.spawn_probe();
        true
    }

    /// Login modal submit: both fields required, then the probe runs.
    pub fn login(&self, username: &str, password: &str) -> std::result::Result<bool, String> {
        let started = self.auth.submit_credentials(username, password)?;
        if started {
            self.spawn_probe();
        }
        Ok(started)
    }

    /// The gate must already be in `Checking`.
    fn spawn_probe(&self) {
        let probe = Arc::clone(&self.probe);
        let events = self.events.clone();
        let spawned = thread::Builder::new()
            .name("reachability-probe".to_string())
            .spawn(move || {
                let outcome = match panic::catch_unwind(AssertUnwindSafe(|| probe.check())) {
                    Ok(result) => result.map_err(|e| e.user_message()),
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        warn!(
                            event_type = "probe_panicked",
                            error = %message,
                            "Reachability probe panicked"
                        );
                        Err(format!("Network authentication error: {}", message))
                    }
                };
                if events
                    .send_blocking(SessionEvent::ProbeFinished { outcome })
                    .is_err()
                {
                    warn!("Event channel closed, dropping probe result");
                }
            });
        match spawned {
            Ok(_) => debug!(event_type = "probe_started", "Reachability probe started"),
            Err(e) => self
                .auth
                .finish(Err(format!("Network authentication error: {}", e))),
        }
    }

    /// Validate the form for `action` and, when it passes, run the action on a worker thread.
    #[instrument(skip_all, fields(action = %action))]
    pub fn dispatch(&self, action: ScriptAction) -> Result<DispatchOutcome> {
        self.ensure_unlocked()?;

        let form = normalize(&self.form.read());
        if let Err(e) = validate(&form, action.requirements()) {
            let err = QuickStartError::Validation(action.rejection_message(&e));
            info!(
                event_type = "action_rejected",
                severity = ?err.severity(),
                reason = %err,
                "Action not dispatched"
            );
            let message = err.user_message();
            self.log.append(&message);
            return Ok(DispatchOutcome::Rejected { message });
        }

        let invocation_id = Uuid::new_v4().to_string();
        self.log
            .append(format!("> {} ({})", action.label(), action.identifier()));

        let bridge = self.bridge.clone();
        let settings = self.settings.clone();
        let events = self.events.clone();
        let id = invocation_id.clone();
        thread::Builder::new()
            .name(format!("action-{}", action.identifier()))
            .spawn(move || {
                let start = Instant::now();
                let result = run_action(&bridge, &settings, &form, action);
                let event = SessionEvent::ActionFinished {
                    invocation_id: id,
                    action,
                    result,
                    duration: start.elapsed(),
                };
                events.send_blocking(event).log_err();
            })?;

        info!(
            event_type = "action_dispatched",
            invocation_id = %invocation_id,
            style = ?self.settings.invocation_style,
            "Action dispatched"
        );
        Ok(DispatchOutcome::Started { invocation_id })
    }

    /// Apply one completion event. Called only from the dispatcher loop.
    pub fn handle_event(&self, event: SessionEvent) {
        debug!(event = event.kind(), "Handling session event");
        match event {
            SessionEvent::ProbeFinished { outcome } => self.auth.finish(outcome),
            SessionEvent::ActionFinished {
                invocation_id,
                action,
                result,
                duration,
            } => self.finish_action(&invocation_id, action, result, duration),
        }
    }

    fn finish_action(
        &self,
        invocation_id: &str,
        action: ScriptAction,
        result: std::result::Result<ActionResult, BridgeError>,
        duration: Duration,
    ) {
        let duration_ms = duration.as_millis() as u64;
        match result {
            Ok(output) => {
                let lines = self.render_output(&output);
                self.log.append_block(&lines);
                logging::log_action_event(
                    invocation_id,
                    action.identifier(),
                    Some(output.exit_code),
                    duration_ms,
                    output.success(),
                );
            }
            Err(e) => {
                self.log.append(format!(
                    "EXCEPTION: Error executing {}: {}",
                    action.identifier(),
                    e
                ));
                let err = QuickStartError::from(e);
                warn!(
                    invocation_id = invocation_id,
                    action = %action,
                    severity = ?err.severity(),
                    error = %err.user_message(),
                    "Action failed before completion"
                );
                logging::log_action_event(
                    invocation_id,
                    action.identifier(),
                    None,
                    duration_ms,
                    false,
                );
            }
        }
    }

    /// Log lines for a finished action. Marker data, when present, is applied to the form.
    fn render_output(&self, output: &ActionResult) -> Vec<String> {
        let extracted = protocol::extract(&output.stdout);
        let mut lines = Vec::new();

        match extracted.payload {
            Some(Ok(data)) => {
                if data.apply_to(&mut self.form.write()) {
                    self.revision.fetch_add(1, Ordering::SeqCst);
                }
                lines.push(format!("✓ Project Insight data loaded: {}", data.summary()));
            }
            Some(Err(e)) => {
                let err = QuickStartError::from(e);
                warn!(severity = ?err.severity(), error = %err, "Project Insight data ignored");
                lines.push(err.user_message());
            }
            None => {}
        }

        lines.push(extracted.log_text);
        let stderr = output.stderr.trim();
        if !stderr.is_empty() {
            lines.push(format!("STDERR:\n{}", stderr));
        }
        lines.push(format!("> Exit code: {}", output.exit_code));
        lines
    }
}

fn run_action(
    bridge: &ProcessBridge,
    settings: &SessionSettings,
    form: &NormalizedForm,
    action: ScriptAction,
) -> std::result::Result<ActionResult, BridgeError> {
    match settings.invocation_style {
        InvocationStyle::ScriptFile => bridge.run_script_action(
            &settings.script_path,
            &ScriptArgs::from_form(form, action.identifier()),
            settings.action_timeout,
        ),
        InvocationStyle::DotSource => bridge.run_named_function(
            &settings.script_path,
            action.identifier(),
            &build_prelude(form, settings.prelude),
            settings.action_timeout,
        ),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "probe panicked".to_string()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("revision", &self.revision())
            .field("auth", &self.auth.state())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Drain completion events until every sender is gone.
pub async fn run_dispatcher(session: Arc<Session>, events: Receiver<SessionEvent>) {
    info!("Session dispatcher started");
    while let Ok(event) = events.recv().await {
        session.handle_event(event);
    }
    info!("Session dispatcher stopped");
}
