//! Mail provider: sends one message per entry through a `MailTransport`.
//!
//! Attributes: `to` (`;`-separated), `from`, `relayUrl` and an optional
//! `subjectFormatString`.

pub mod message;
pub mod subject;
pub mod transport;

pub use message::{MailMessage, MailPriority};
pub use subject::{SubjectFormat, SubjectFormatError};
pub use transport::{HttpRelayTransport, MailTransport, SendFuture};

use crate::domain::{LogEntry, ProviderAttributes};
use crate::engine::LogContext;
use crate::error::LoggingError;
use crate::port::{LoggingProvider, ProviderFuture};
use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::debug;

const TO_ATTRIBUTE: &str = "to";
const FROM_ATTRIBUTE: &str = "from";
const RELAY_URL_ATTRIBUTE: &str = "relayUrl";
const SUBJECT_FORMAT_ATTRIBUTE: &str = "subjectFormatString";

#[derive(Default)]
pub struct MailProvider {
    to: Vec<String>,
    from: String,
    subject_format: SubjectFormat,
    transport: Option<Arc<dyn MailTransport>>,
}

impl MailProvider {
    /// Use `transport` instead of the HTTP relay; `relayUrl` is still required.
    pub fn with_transport(transport: Arc<dyn MailTransport>) -> Self {
        Self {
            transport: Some(transport),
            ..Self::default()
        }
    }

    pub fn recipients(&self) -> &[String] {
        &self.to
    }

    pub fn sender(&self) -> &str {
        &self.from
    }

    pub fn subject_format(&self) -> &SubjectFormat {
        &self.subject_format
    }

    pub fn build_message(&self, entry: &LogEntry, now: DateTime<Local>) -> MailMessage {
        MailMessage::build(&self.from, &self.to, &self.subject_format, entry, now)
    }
}

fn parse_recipients(value: &str, provider: &str) -> Result<Vec<String>, LoggingError> {
    value
        .split(';')
        .map(|address| {
            let address = address.trim();
            if message::is_valid_address(address) {
                Ok(address.to_string())
            } else {
                Err(LoggingError::Configuration(format!(
                    "Invalid mail address '{address}' in attribute '{TO_ATTRIBUTE}' \
                     of provider '{provider}'."
                )))
            }
        })
        .collect()
}

impl LoggingProvider for MailProvider {
    fn default_description(&self) -> &'static str {
        "Mail logging provider"
    }

    fn initialize(
        &mut self,
        name: &str,
        attributes: &mut ProviderAttributes,
    ) -> Result<(), LoggingError> {
        let to = attributes.take_required(TO_ATTRIBUTE, name)?;
        self.to = parse_recipients(&to, name)?;

        let from = attributes.take_required(FROM_ATTRIBUTE, name)?;
        if !message::is_valid_address(from.trim()) {
            return Err(LoggingError::Configuration(format!(
                "Invalid mail address '{from}' in attribute '{FROM_ATTRIBUTE}' of provider '{name}'."
            )));
        }
        self.from = from.trim().to_string();

        let relay_url = attributes.take_required(RELAY_URL_ATTRIBUTE, name)?;
        if !relay_url.starts_with("http://") && !relay_url.starts_with("https://") {
            return Err(LoggingError::Configuration(format!(
                "Attribute '{RELAY_URL_ATTRIBUTE}' of provider '{name}' must be an http(s) URL."
            )));
        }

        if let Some(format) = attributes.take(SUBJECT_FORMAT_ATTRIBUTE) {
            self.subject_format = SubjectFormat::parse(&format).map_err(|e| {
                LoggingError::Configuration(format!(
                    "Invalid '{SUBJECT_FORMAT_ATTRIBUTE}' in the configuration of provider \
                     '{name}': {e}."
                ))
            })?;
        }

        if self.transport.is_none() {
            self.transport = Some(Arc::new(HttpRelayTransport::new(relay_url)?));
        }
        debug!(provider = name, recipients = self.to.len(), "Mail provider configured");
        Ok(())
    }

    fn log<'a>(&'a self, entry: &'a LogEntry, _ctx: LogContext<'a>) -> ProviderFuture<'a> {
        Box::pin(async move {
            let transport = self.transport.as_ref().ok_or_else(|| {
                LoggingError::InvalidState("Mail provider has no transport.".into())
            })?;
            let message = self.build_message(entry, Local::now());
            transport.send(&message).await?;
            Ok(None)
        })
    }
}
