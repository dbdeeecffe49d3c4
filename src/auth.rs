//! Login gate
//!
//! The gate only checks that a fixed remote host answers HTTP 200. Credentials are
//! required to be non-empty but are never sent anywhere.

use parking_lot::Mutex;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::ProbeConfig;
use crate::error::{QuickStartError, Result};

pub const MISSING_CREDENTIALS: &str = "Username and password are required.";

/// Current gate state as shown to the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum AuthState {
    Locked { error: Option<String> },
    Checking,
    Unlocked,
}

impl AuthState {
    pub fn is_unlocked(&self) -> bool {
        matches!(self, AuthState::Unlocked)
    }
}

/// A time-bounded reachability check. The error's user message is shown in the login modal.
pub trait ReachabilityProbe: Send + Sync {
    fn check(&self) -> Result<()>;
}

/// GET against the configured URL; only status 200 counts as reachable
#[derive(Debug, Clone)]
pub struct UreqProbe {
    url: String,
    timeout: Duration,
}

impl UreqProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(config.url.clone(), config.timeout())
    }
}

impl ReachabilityProbe for UreqProbe {
    fn check(&self) -> Result<()> {
        let start = Instant::now();
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .http_status_as_error(false)
            .build()
            .into();

        let outcome = match agent.get(&self.url).call() {
            Ok(response) => {
                let status = response.status().as_u16();
                if status == 200 {
                    Ok(())
                } else {
                    Err(QuickStartError::Probe(format!(
                        "Network authentication failed: Status {}",
                        status
                    )))
                }
            }
            Err(e) => Err(QuickStartError::Probe(format!(
                "Network authentication error: {}",
                e
            ))),
        };

        debug!(
            url = %self.url,
            ok = outcome.is_ok(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Reachability probe finished"
        );
        outcome
    }
}

/// `Locked -> Checking -> Unlocked | Locked(error)`, with `Unlocked` terminal
#[derive(Debug)]
pub struct AuthGate {
    state: Mutex<AuthState>,
}

impl Default for AuthGate {
    fn default() -> Self {
        Self {
            state: Mutex::new(AuthState::Locked { error: None }),
        }
    }
}

impl AuthGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AuthState {
        self.state.lock().clone()
    }

    pub fn is_unlocked(&self) -> bool {
        self.state.lock().is_unlocked()
    }

    /// Move to `Checking`. Returns false when a probe is already running or the gate is
    /// already open, in which case no new probe should start.
    pub fn begin_check(&self) -> bool {
        let mut state = self.state.lock();
        match *state {
            AuthState::Locked { .. } => {
                *state = AuthState::Checking;
                true
            }
            AuthState::Checking | AuthState::Unlocked => false,
        }
    }

    /// Validate the modal's fields, then move to `Checking`.
    ///
    /// Missing fields put the gate back to `Locked` with an error and return `Err`.
    /// `Ok(false)` means a probe is already in flight or the gate is open.
    pub fn submit_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> std::result::Result<bool, String> {
        if username.trim().is_empty() || password.trim().is_empty() {
            let mut state = self.state.lock();
            if !state.is_unlocked() {
                *state = AuthState::Locked {
                    error: Some(MISSING_CREDENTIALS.to_string()),
                };
            }
            return Err(MISSING_CREDENTIALS.to_string());
        }
        Ok(self.begin_check())
    }

    /// Record a probe outcome. Once unlocked the gate stays unlocked.
    pub fn finish(&self, outcome: std::result::Result<(), String>) {
        let mut state = self.state.lock();
        if state.is_unlocked() {
            return;
        }
        match outcome {
            Ok(()) => {
                info!(event_type = "auth_unlocked", "Reachability check passed, session unlocked");
                *state = AuthState::Unlocked;
            }
            Err(message) => {
                warn!(event_type = "auth_failed", error = %message, "Reachability check failed");
                *state = AuthState::Locked {
                    error: Some(message),
                };
            }
        }
    }
}
