use super::severity::Severity;
use crate::error::LoggingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error details attached to a log entry.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExceptionInfo {
    pub type_name: String,
    pub message: String,
}

impl ExceptionInfo {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Capture any error under the given type name.
    pub fn from_error(type_name: impl Into<String>, error: &dyn std::error::Error) -> Self {
        Self::new(type_name, error.to_string())
    }
}

impl From<&LoggingError> for ExceptionInfo {
    fn from(error: &LoggingError) -> Self {
        Self::new(error.kind(), error.to_string())
    }
}

/// A single log event. Entries are never modified once created.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LogEntry {
    severity: Severity,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exception: Option<ExceptionInfo>,
    timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            source: None,
            exception: None,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn exception(&self) -> Option<&ExceptionInfo> {
        self.exception.as_ref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_optional_fields() {
        let entry = LogEntry::new(Severity::Error, "disk full")
            .with_source("storage")
            .with_exception(ExceptionInfo::new("IoError", "no space left"));

        assert_eq!(entry.severity(), Severity::Error);
        assert_eq!(entry.message(), "disk full");
        assert_eq!(entry.source(), Some("storage"));
        assert_eq!(entry.exception().map(|e| e.type_name.as_str()), Some("IoError"));
    }

    #[test]
    fn test_empty_message_is_allowed() {
        let entry = LogEntry::new(Severity::Debug, "");
        assert_eq!(entry.message(), "");
        assert!(entry.source().is_none());
    }

    #[test]
    fn test_exception_from_logging_error() {
        let err = LoggingError::Transport("relay refused".into());
        let info = ExceptionInfo::from(&err);
        assert_eq!(info.type_name, "TransportError");
        assert!(info.message.contains("relay refused"));
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{"severity":"Warning","message":"hi","timestamp":"2024-06-15T10:30:00Z"}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.severity(), Severity::Warning);
        assert!(entry.exception().is_none());
    }
}
