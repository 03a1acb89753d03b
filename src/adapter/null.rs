use crate::domain::{LogEntry, ProviderAttributes};
use crate::engine::LogContext;
use crate::error::LoggingError;
use crate::port::{LoggingProvider, ProviderFuture};

/// Accepts and discards every entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProvider;

impl LoggingProvider for NullProvider {
    fn default_description(&self) -> &'static str {
        "Null logging provider"
    }

    fn initialize(&mut self, _: &str, _: &mut ProviderAttributes) -> Result<(), LoggingError> {
        Ok(())
    }

    fn log<'a>(&'a self, _entry: &'a LogEntry, _ctx: LogContext<'a>) -> ProviderFuture<'a> {
        Box::pin(async { Ok(None) })
    }
}
