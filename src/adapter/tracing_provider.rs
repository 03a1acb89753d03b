//! Re-emits entries as `tracing` events so they land in the process log.

use crate::domain::{LogEntry, ProviderAttributes, Severity};
use crate::engine::LogContext;
use crate::error::LoggingError;
use crate::port::{LoggingProvider, ProviderFuture};
use tracing::{debug, error, info, warn};

const TARGET_ATTRIBUTE: &str = "target";

#[derive(Debug, Default)]
pub struct TracingProvider {
    name: String,
    target: Option<String>,
}

impl TracingProvider {
    /// Label attached to every event; defaults to the provider name.
    pub fn target(&self) -> &str {
        self.target.as_deref().unwrap_or(&self.name)
    }

    fn emit(&self, entry: &LogEntry) {
        let provider = self.target();
        let source = entry.source().unwrap_or_default();
        let exception = entry
            .exception()
            .map(|e| format!("{}: {}", e.type_name, e.message))
            .unwrap_or_default();
        let exception = exception.as_str();
        let message = entry.message();

        match entry.severity() {
            Severity::Debug => debug!(provider, source, exception, "{message}"),
            Severity::Information => info!(provider, source, exception, "{message}"),
            Severity::Warning => warn!(provider, source, exception, "{message}"),
            Severity::Error | Severity::Critical => {
                error!(provider, source, exception, severity = %entry.severity(), "{message}")
            }
        }
    }
}

impl LoggingProvider for TracingProvider {
    fn default_description(&self) -> &'static str {
        "Tracing logging provider"
    }

    fn initialize(
        &mut self,
        name: &str,
        attributes: &mut ProviderAttributes,
    ) -> Result<(), LoggingError> {
        self.name = name.to_string();
        self.target = attributes.take(TARGET_ATTRIBUTE);
        Ok(())
    }

    fn log<'a>(&'a self, entry: &'a LogEntry, _ctx: LogContext<'a>) -> ProviderFuture<'a> {
        self.emit(entry);
        Box::pin(async { Ok(None) })
    }
}
