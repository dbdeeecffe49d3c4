use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::AppState;
use crate::actions::ScriptAction;
use crate::auth::AuthState;
use crate::error::{ErrorSeverity, QuickStartError};
use crate::form::FormState;
use crate::session::DispatchOutcome;

static INDEX_HTML: &str = include_str!("../../assets/index.html");

// ============================================================================
// Envelope
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Status code plus message, rendered as a failed envelope
#[derive(Debug)]
pub(super) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<QuickStartError> for ApiError {
    fn from(err: QuickStartError) -> Self {
        let status = match (&err, err.severity()) {
            (QuickStartError::Locked, _) => StatusCode::FORBIDDEN,
            (_, ErrorSeverity::Info) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.user_message())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::err(self.message);
        (self.status, Json(body)).into_response()
    }
}

// ============================================================================
// Views
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ActionView {
    id: &'static str,
    label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StateView {
    auth: AuthState,
    /// Withheld until the gate opens
    form: Option<FormState>,
    revision: u64,
    log: Vec<String>,
    script_found: bool,
    script_path: String,
    actions: Vec<ActionView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FormUpdated {
    revision: u64,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub(super) enum DispatchView {
    Started {
        #[serde(rename = "invocationId")]
        invocation_id: String,
    },
    Rejected {
        message: String,
    },
}

impl From<DispatchOutcome> for DispatchView {
    fn from(outcome: DispatchOutcome) -> Self {
        match outcome {
            DispatchOutcome::Started { invocation_id } => DispatchView::Started { invocation_id },
            DispatchOutcome::Rejected { message } => DispatchView::Rejected { message },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub(super) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(super) async fn health() -> &'static str {
    "ok"
}

pub(super) async fn get_state(State(state): State<AppState>) -> Json<ApiResponse<StateView>> {
    let session = &state.session;
    let auth = session.auth_state();
    let unlocked = auth.is_unlocked();
    let view = StateView {
        auth,
        form: unlocked.then(|| session.form()),
        revision: session.revision(),
        log: if unlocked {
            session.log().entries().iter().map(|e| e.render()).collect()
        } else {
            Vec::new()
        },
        script_found: session.script_found(),
        script_path: session.settings().script_path.display().to_string(),
        actions: ScriptAction::ALL
            .into_iter()
            .map(|a| ActionView {
                id: a.identifier(),
                label: a.label(),
            })
            .collect(),
    };
    Json(ApiResponse::ok(view))
}

pub(super) async fn put_form(
    State(state): State<AppState>,
    Json(form): Json<FormState>,
) -> ApiResult<FormUpdated> {
    let revision = state.session.update_form(form)?;
    Ok(Json(ApiResponse::ok(FormUpdated { revision })))
}

pub(super) async fn run_action(
    State(state): State<AppState>,
    Path(action): Path<String>,
) -> ApiResult<DispatchView> {
    let action = ScriptAction::from_identifier(&action).ok_or_else(|| {
        ApiError::new(StatusCode::NOT_FOUND, format!("Unknown action: {}", action))
    })?;
    let outcome = state.session.dispatch(action)?;
    Ok(Json(ApiResponse::ok(outcome.into())))
}

pub(super) async fn clear_log(State(state): State<AppState>) -> ApiResult<()> {
    state.session.clear_log()?;
    Ok(Json(ApiResponse::ok(())))
}

pub(super) async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<AuthState> {
    match state.session.login(&request.username, &request.password) {
        Ok(started) => {
            info!(started = started, "Login submitted");
            Ok(Json(ApiResponse::ok(state.session.auth_state())))
        }
        Err(message) => Err(ApiError::new(StatusCode::BAD_REQUEST, message)),
    }
}

pub(super) async fn exit(State(state): State<AppState>) -> StatusCode {
    warn!(event_type = "exit_requested", "Exit requested from the page");
    (state.exit)();
    StatusCode::NO_CONTENT
}
