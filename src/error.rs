use thiserror::Error;
use tracing::{error, warn};

use crate::executor::BridgeError;
use crate::protocol::PayloadError;

/// Error severity for display in the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,     // informational, nothing was attempted
    Warning,  // recoverable, the rest of the response is still handled
    Error,    // the single action failed
    Critical, // the gate stays locked
}

/// Domain-specific errors for QuickStart
#[derive(Error, Debug)]
pub enum QuickStartError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Process spawn failed for '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process '{program}' timed out after {seconds}s")]
    Timeout { program: String, seconds: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse Project Insight data: {0}")]
    ProtocolParse(#[from] PayloadError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Reachability check failed: {0}")]
    Probe(String),

    #[error("Session is locked")]
    Locked,
}

impl QuickStartError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation(_) => ErrorSeverity::Info,
            Self::Spawn { .. } => ErrorSeverity::Error,
            Self::Timeout { .. } => ErrorSeverity::Error,
            Self::Io(_) => ErrorSeverity::Error,
            Self::ProtocolParse(_) => ErrorSeverity::Warning,
            Self::Config(_) => ErrorSeverity::Warning,
            Self::Probe(_) => ErrorSeverity::Critical,
            Self::Locked => ErrorSeverity::Critical,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Spawn { program, source } => {
                format!("Could not start '{}': {}", program, source)
            }
            Self::Timeout { program, seconds } => {
                format!("'{}' did not finish within {} seconds", program, seconds)
            }
            Self::Io(e) => format!("I/O error: {}", e),
            Self::ProtocolParse(e) => format!("Error parsing Project Insight data: {}", e),
            Self::Config(msg) => format!("Configuration issue: {}", msg),
            Self::Probe(msg) => msg.clone(),
            Self::Locked => "Login required".to_string(),
        }
    }
}

impl From<BridgeError> for QuickStartError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Spawn { program, source } => Self::Spawn { program, source },
            BridgeError::Timeout { program, timeout } => Self::Timeout {
                program,
                seconds: timeout.as_secs(),
            },
            BridgeError::Io(e) => Self::Io(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuickStartError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the operator doesn't need to know.
///
/// # Examples
///
/// ```ignore
/// use quickstart_web::error::ResultExt;
///
/// let cfg = std::fs::read_to_string(path).warn_on_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}
