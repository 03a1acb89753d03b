use crate::domain::{LogEntry, Severity};
use chrono::{DateTime, Utc};
use clickhouse::serde::chrono::datetime64::millis;
use serde::{Deserialize, Serialize};

#[derive(clickhouse::Row, Serialize, Deserialize, Clone, Debug)]
pub struct LogEntryRow {
    pub event_id: String,          // UUID as String
    pub severity: i8,              // Enum8 -> underlying Int8
    pub message: String,           // String
    pub source: String,            // LowCardinality(String)
    pub exception_type: String,    // LowCardinality(String)
    pub exception_message: String, // String
    #[serde(with = "millis")]
    pub timestamp: DateTime<Utc>, // DateTime64(3,'UTC')
}

impl LogEntryRow {
    pub fn new(event_id: impl Into<String>, entry: &LogEntry) -> Self {
        let (exception_type, exception_message) = entry
            .exception()
            .map(|e| (e.type_name.clone(), e.message.clone()))
            .unwrap_or_default();

        Self {
            event_id: event_id.into(),
            severity: severity_code(entry.severity()),
            message: entry.message().to_string(),
            source: entry.source().unwrap_or_default().to_string(),
            exception_type,
            exception_message,
            timestamp: entry.timestamp(),
        }
    }
}

fn severity_code(severity: Severity) -> i8 {
    match severity {
        Severity::Debug => 0,
        Severity::Information => 1,
        Severity::Warning => 2,
        Severity::Error => 3,
        Severity::Critical => 4,
    }
}
