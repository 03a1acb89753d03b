use crate::app::AppState;
use crate::domain::{ExceptionInfo, LogEntry, Severity};
use crate::error::LoggingError;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Body of `POST /v1/log`.
#[derive(Deserialize, Debug)]
pub struct LogRequest {
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub exception: Option<ExceptionInfo>,
}

impl From<LogRequest> for LogEntry {
    fn from(request: LogRequest) -> Self {
        let mut entry = LogEntry::new(request.severity, request.message);
        if let Some(source) = request.source {
            entry = entry.with_source(source);
        }
        if let Some(exception) = request.exception {
            entry = entry.with_exception(exception);
        }
        entry
    }
}

#[derive(Serialize, Debug)]
pub struct LogResponse {
    pub id: Option<String>,
}

#[derive(Serialize, Debug)]
struct ErrorBody {
    kind: &'static str,
    error: String,
}

fn parse_body(body: &str) -> Result<LogEntry, LoggingError> {
    if body.trim().is_empty() {
        return Err(LoggingError::InvalidArgument("Empty log entry".into()));
    }
    serde_json::from_str::<LogRequest>(body)
        .map(LogEntry::from)
        .map_err(|e| LoggingError::InvalidArgument(format!("Malformed log entry: {e}")))
}

fn error_response(err: &LoggingError, status: StatusCode) -> Response {
    let body = ErrorBody {
        kind: err.kind(),
        error: err.to_string(),
    };
    (status, Json(body)).into_response()
}

fn into_response(result: Result<Option<String>, LoggingError>) -> Response {
    match result {
        Ok(id) => (StatusCode::OK, Json(LogResponse { id })).into_response(),
        Err(err @ LoggingError::InvalidArgument(_)) => {
            warn!("Rejected log request: {err}");
            error_response(&err, StatusCode::BAD_REQUEST)
        }
        Err(err) => {
            error!("Failed to log entry: {err}");
            error_response(&err, StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handler for POST /v1/log
pub async fn log_handler(State(state): State<AppState>, body: String) -> Response {
    info!("Received log request with body length: {}", body.len());

    let entry = match parse_body(&body) {
        Ok(entry) => entry,
        Err(err) => return into_response(Err(err)),
    };
    into_response(state.graph.log(&entry).await)
}

/// Handler for POST /v1/log/{provider}
pub async fn log_to_handler(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    body: String,
) -> Response {
    info!(provider = %provider, "Received log request with body length: {}", body.len());

    if state.graph.provider(&provider).is_none() {
        let err =
            LoggingError::InvalidArgument(format!("No provider named '{provider}' is configured."));
        warn!("{err}");
        return error_response(&err, StatusCode::NOT_FOUND);
    }

    let entry = match parse_body(&body) {
        Ok(entry) => entry,
        Err(err) => return into_response(Err(err)),
    };
    into_response(state.graph.log_to(&provider, &entry).await)
}
