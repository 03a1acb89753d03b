use super::subject::SubjectFormat;
use crate::domain::{LogEntry, Severity};
use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MailPriority {
    Normal,
    High,
}

impl MailPriority {
    pub fn for_severity(severity: Severity) -> Self {
        if severity == Severity::Critical {
            Self::High
        } else {
            Self::Normal
        }
    }
}

/// A mail ready to hand to a `MailTransport`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub priority: MailPriority,
}

impl MailMessage {
    pub fn build(
        from: &str,
        to: &[String],
        subject_format: &SubjectFormat,
        entry: &LogEntry,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_vec(),
            subject: subject_format.render(entry, now),
            body: build_body(entry),
            priority: MailPriority::for_severity(entry.severity()),
        }
    }
}

pub fn build_body(entry: &LogEntry) -> String {
    let mut body = format!("{}\r\nSeverity: {}\r\n", entry.message(), entry.severity());
    if let Some(source) = entry.source() {
        body.push_str(&format!("Source: {source}\r\n"));
    }
    if let Some(exception) = entry.exception() {
        body.push_str(&format!(
            "Exception: {}\r\nException message: {}\r\n",
            exception.type_name, exception.message
        ));
    }
    body
}

/// Loose `local@domain` check; delivery problems surface from the relay.
pub fn is_valid_address(address: &str) -> bool {
    if address.is_empty() || address.contains(char::is_whitespace) {
        return false;
    }
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
