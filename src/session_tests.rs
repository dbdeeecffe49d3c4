use super::*;
use crate::actions::ScriptAction;
use crate::auth::{AuthState, ReachabilityProbe};
use crate::config::{InterpreterConfig, InvocationStyle};
use crate::error::{self, QuickStartError};
use crate::executor::{
    ActionResult, ActionRunner, BridgeError, Interpreter, Invocation, ProcessBridge,
};
use crate::form::FormState;
use crate::prelude::PreludeOptions;
use async_channel::Receiver;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

type Responder = dyn Fn(&Invocation) -> Result<ActionResult, BridgeError> + Send + Sync;

/// Records invocations and answers through a closure
struct ScriptedRunner {
    seen: Mutex<Vec<Invocation>>,
    respond: Box<Responder>,
}

impl ScriptedRunner {
    fn new<F>(respond: F) -> Arc<Self>
    where
        F: Fn(&Invocation) -> Result<ActionResult, BridgeError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    fn stdout(text: &'static str) -> Arc<Self> {
        Self::new(move |_| {
            Ok(ActionResult {
                exit_code: 0,
                stdout: text.to_string(),
                stderr: String::new(),
            })
        })
    }

    fn count(&self) -> usize {
        self.seen.lock().len()
    }
}

impl ActionRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<ActionResult, BridgeError> {
        self.seen.lock().push(invocation.clone());
        (self.respond)(invocation)
    }
}

struct FixedProbe(Result<(), String>);

impl ReachabilityProbe for FixedProbe {
    fn check(&self) -> error::Result<()> {
        self.0.clone().map_err(QuickStartError::Probe)
    }
}

struct PanickingProbe;

impl ReachabilityProbe for PanickingProbe {
    fn check(&self) -> error::Result<()> {
        panic!("tls backend exploded");
    }
}

fn settings(style: InvocationStyle) -> SessionSettings {
    SessionSettings {
        script_path: PathBuf::from("/opt/qs.ps1"),
        invocation_style: style,
        action_timeout: None,
        prelude: PreludeOptions::default(),
    }
}

fn build(
    runner: Arc<ScriptedRunner>,
    probe: Result<(), String>,
    style: InvocationStyle,
) -> (Session, Receiver<SessionEvent>) {
    let (tx, rx) = async_channel::unbounded();
    let bridge = ProcessBridge::new(
        Interpreter::new(InterpreterConfig {
            program: "powershell.exe".into(),
            ..InterpreterConfig::default()
        }),
        runner,
    );
    let session = Session::new(
        FormState::new("jdoe"),
        settings(style),
        bridge,
        Arc::new(FixedProbe(probe)),
        tx,
    );
    (session, rx)
}

/// Run the next pending event through the session, as the dispatcher loop would
fn pump(session: &Session, rx: &Receiver<SessionEvent>) {
    let event = rx.recv_blocking().expect("event");
    session.handle_event(event);
}

fn unlocked(runner: Arc<ScriptedRunner>, style: InvocationStyle) -> (Session, Receiver<SessionEvent>) {
    let (session, rx) = build(runner, Ok(()), style);
    assert!(session.start_probe());
    pump(&session, &rx);
    assert_eq!(session.auth_state(), AuthState::Unlocked);
    (session, rx)
}

fn valid_form() -> FormState {
    let mut form = FormState::new("jdoe");
    form.sales_order = " t12345678 ".into();
    form.customer_name = "Acme".into();
    form.production = true;
    form
}

// ============================================================================
// Gate
// ============================================================================

#[test]
fn test_locked_session_refuses_everything() {
    let runner = ScriptedRunner::stdout("x");
    let (session, _rx) = build(runner.clone(), Ok(()), InvocationStyle::ScriptFile);

    assert!(matches!(
        session.dispatch(ScriptAction::CreateTeam),
        Err(QuickStartError::Locked)
    ));
    assert!(matches!(
        session.update_form(valid_form()),
        Err(QuickStartError::Locked)
    ));
    assert!(matches!(session.clear_log(), Err(QuickStartError::Locked)));
    assert_eq!(runner.count(), 0);
}

#[test]
fn test_probe_failure_keeps_session_locked_with_message() {
    let (session, rx) = build(
        ScriptedRunner::stdout(""),
        Err("Network authentication failed: Status 503".into()),
        InvocationStyle::ScriptFile,
    );
    assert!(session.start_probe());
    assert!(!session.start_probe(), "second probe while checking");
    pump(&session, &rx);
    assert_eq!(
        session.auth_state(),
        AuthState::Locked {
            error: Some("Network authentication failed: Status 503".into())
        }
    );
}

#[test]
fn test_login_requires_both_fields() {
    let (session, rx) = build(ScriptedRunner::stdout(""), Ok(()), InvocationStyle::ScriptFile);
    assert!(session.login("alice", "").is_err());
    assert!(rx.is_empty());

    assert_eq!(session.login("alice", "secret"), Ok(true));
    pump(&session, &rx);
    assert_eq!(session.auth_state(), AuthState::Unlocked);
}

#[test]
fn test_probe_panic_returns_gate_to_locked_and_allows_retry() {
    let (tx, rx) = async_channel::unbounded();
    let bridge = ProcessBridge::new(
        Interpreter::new(InterpreterConfig::default()),
        ScriptedRunner::stdout(""),
    );
    let session = Session::new(
        FormState::new("jdoe"),
        settings(InvocationStyle::ScriptFile),
        bridge,
        Arc::new(PanickingProbe),
        tx,
    );

    assert!(session.start_probe());
    pump(&session, &rx);
    match session.auth_state() {
        AuthState::Locked { error: Some(message) } => {
            assert!(message.starts_with("Network authentication error"), "{}", message);
            assert!(message.contains("tls backend exploded"), "{}", message);
        }
        other => panic!("expected locked with error, got {:?}", other),
    }

    assert_eq!(session.login("alice", "pw"), Ok(true));
    pump(&session, &rx);
    assert!(matches!(session.auth_state(), AuthState::Locked { error: Some(_) }));
}

#[test]
fn test_login_rejects_blank_password() {
    let (session, rx) = build(ScriptedRunner::stdout(""), Ok(()), InvocationStyle::ScriptFile);
    assert!(session.login("alice", "   ").is_err());
    assert!(rx.is_empty());
    assert!(matches!(session.auth_state(), AuthState::Locked { error: Some(_) }));
}

// ============================================================================
// Validation before dispatch
// ============================================================================

#[test]
fn test_submit_refused_without_spawning() {
    let runner = ScriptedRunner::stdout("x");
    let (session, _rx) = unlocked(runner.clone(), InvocationStyle::ScriptFile);

    let cases: [(fn(&mut FormState), &str); 3] = [
        (|f| f.sales_order = "T1234567".into(), "Sales order must be"),
        (|f| f.customer_name = "   ".into(), "Customer name is required."),
        (|f| f.production = false, "Select at least one Workbook Type"),
    ];
    for (breaks, expected) in cases {
        let mut form = valid_form();
        breaks(&mut form);
        session.update_form(form).unwrap();
        match session.dispatch(ScriptAction::Submit).unwrap() {
            DispatchOutcome::Rejected { message } => assert!(message.starts_with(expected)),
            other => panic!("Expected rejection, got {:?}", other),
        }
    }

    assert_eq!(runner.count(), 0);
    assert_eq!(session.log().len(), 3);
}

#[test]
fn test_actions_without_requirements_always_dispatch() {
    let runner = ScriptedRunner::stdout("opened");
    let (session, rx) = unlocked(runner.clone(), InvocationStyle::ScriptFile);

    let outcome = session.dispatch(ScriptAction::BrowseProjectInsight).unwrap();
    assert!(matches!(outcome, DispatchOutcome::Started { .. }));
    pump(&session, &rx);
    assert_eq!(runner.count(), 1);
}

// ============================================================================
// Completion handling
// ============================================================================

#[test]
fn test_submit_runs_script_file_and_logs_block() {
    let runner = ScriptedRunner::new(|_| {
        Ok(ActionResult {
            exit_code: 1,
            stdout: "Submitting...\n".into(),
            stderr: "warning: slow\n".into(),
        })
    });
    let (session, rx) = unlocked(runner.clone(), InvocationStyle::ScriptFile);
    session.update_form(valid_form()).unwrap();

    let outcome = session.dispatch(ScriptAction::Submit).unwrap();
    assert!(matches!(outcome, DispatchOutcome::Started { .. }));
    pump(&session, &rx);

    let seen = runner.seen.lock();
    let args = &seen[0].args;
    assert!(
        args.contains(&"-SalesOrder:t12345678".to_string()),
        "normalized value is sent"
    );
    assert_eq!(args.last().map(String::as_str), Some("-Action:SdmSubmit"));

    let entries = session.log().entries();
    assert_eq!(entries[0].text, "> Submit (SdmSubmit)");
    assert_eq!(
        entries[1].text,
        "Submitting...\nSTDERR:\nwarning: slow\n> Exit code: 1"
    );
}

#[test]
fn test_marker_data_fills_form_and_bumps_revision() {
    let runner = ScriptedRunner::stdout(
        "Looking up\n===BEGIN_PI_DATA===\n{\"CustomerName\":\"Acme Corp\",\"PINumber\":4521,\"PMName\":\"Pat\"}\n===END_PI_DATA===\nDone",
    );
    let (session, rx) = unlocked(runner, InvocationStyle::ScriptFile);
    let mut form = valid_form();
    form.customer_name = "typed by operator".into();
    session.update_form(form).unwrap();
    assert_eq!(session.revision(), 0);

    session.dispatch(ScriptAction::ValidateSalesNumber).unwrap();
    pump(&session, &rx);

    let form = session.form();
    assert_eq!(form.customer_name, "Acme Corp");
    assert_eq!(form.pi_number, "4521");
    assert_eq!(form.pm_name, "Pat");
    assert_eq!(session.revision(), 1);

    let last = session.log().entries().pop().unwrap().text;
    assert_eq!(
        last,
        "✓ Project Insight data loaded: Acme Corp - 4521\n\
         Looking up\n[PI DATA LOADED]\nDone\n\
         > Exit code: 0"
    );
}

#[test]
fn test_malformed_marker_data_is_logged_and_output_kept() {
    let runner = ScriptedRunner::stdout(
        "before\n===BEGIN_PI_DATA===\n{not json\n===END_PI_DATA===\nafter",
    );
    let (session, rx) = unlocked(runner, InvocationStyle::ScriptFile);
    session.update_form(valid_form()).unwrap();

    session.dispatch(ScriptAction::ValidateSalesNumber).unwrap();
    pump(&session, &rx);

    assert_eq!(session.form().customer_name, "Acme");
    assert_eq!(session.revision(), 0);
    let last = session.log().entries().pop().unwrap().text;
    assert!(last.starts_with("Error parsing Project Insight data: "), "{}", last);
    assert!(last.contains("before\n[PI DATA LOADED]\nafter"));
    assert!(last.ends_with("> Exit code: 0"));
}

#[test]
fn test_spawn_failure_is_logged_as_exception() {
    let runner = ScriptedRunner::new(|inv| {
        Err(BridgeError::Spawn {
            program: inv.program.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })
    });
    let (session, rx) = unlocked(runner, InvocationStyle::ScriptFile);

    session.dispatch(ScriptAction::CreateTeam).unwrap();
    pump(&session, &rx);

    let last = session.log().entries().pop().unwrap().text;
    assert_eq!(
        last,
        "EXCEPTION: Error executing CreateTeam: failed to start 'powershell.exe': not found"
    );
    // the session keeps working
    session.dispatch(ScriptAction::CreateTeam).unwrap();
    pump(&session, &rx);
}

#[test]
fn test_timeout_is_logged_as_exception() {
    let runner = ScriptedRunner::new(|inv| {
        Err(BridgeError::Timeout {
            program: inv.program.clone(),
            timeout: Duration::from_secs(30),
        })
    });
    let (session, rx) = unlocked(runner, InvocationStyle::ScriptFile);
    session.dispatch(ScriptAction::CreateTeam).unwrap();
    pump(&session, &rx);

    let last = session.log().entries().pop().unwrap().text;
    assert!(last.starts_with("EXCEPTION: Error executing CreateTeam: "));
    assert!(last.contains("did not finish within 30s"));
}

#[test]
fn test_dot_source_style_sends_prelude_and_function() {
    let runner = ScriptedRunner::stdout("");
    let (session, rx) = unlocked(runner.clone(), InvocationStyle::DotSource);
    let mut form = valid_form();
    form.customer_name = "O'Neil".into();
    session.update_form(form).unwrap();

    session.dispatch(ScriptAction::CreateOneNoteSection).unwrap();
    pump(&session, &rx);

    let seen = runner.seen.lock();
    let command = seen[0].args.last().unwrap();
    assert!(command.starts_with(". '/opt/qs.ps1'; $ErrorActionPreference='Stop';\n"));
    assert!(command.contains("$global:CustName = 'O''Neil'"));
    assert!(command.ends_with("CreateOneNoteSection\n"));
}

#[test]
fn test_concurrent_actions_append_contiguous_blocks() {
    let runner = ScriptedRunner::new(|inv| {
        let action = inv.args.last().cloned().unwrap_or_default();
        std::thread::sleep(Duration::from_millis(20));
        Ok(ActionResult {
            exit_code: 0,
            stdout: format!("{a} line 1\n{a} line 2\n{a} line 3", a = action),
            stderr: String::new(),
        })
    });
    let (session, rx) = unlocked(runner, InvocationStyle::ScriptFile);
    session.update_form(valid_form()).unwrap();

    session.dispatch(ScriptAction::CreateTeam).unwrap();
    session.dispatch(ScriptAction::BrowseProjectInsight).unwrap();
    pump(&session, &rx);
    pump(&session, &rx);

    let completions: Vec<String> = session
        .log()
        .entries()
        .into_iter()
        .map(|e| e.text)
        .filter(|t| t.ends_with("> Exit code: 0"))
        .collect();
    assert_eq!(completions.len(), 2);
    for block in completions {
        let action = block.split(' ').next().unwrap().to_string();
        assert_eq!(
            block,
            format!(
                "{a} line 1\n{a} line 2\n{a} line 3\n> Exit code: 0",
                a = action
            )
        );
    }
}

#[tokio::test]
async fn test_dispatcher_loop_applies_probe_result() {
    let (session, rx) = build(ScriptedRunner::stdout(""), Ok(()), InvocationStyle::ScriptFile);
    let session = Arc::new(session);
    tokio::spawn(run_dispatcher(Arc::clone(&session), rx));

    assert!(session.start_probe());
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while !session.auth_state().is_unlocked() {
        assert!(std::time::Instant::now() < deadline, "probe result never applied");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
