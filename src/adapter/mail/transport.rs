use super::message::MailMessage;
use crate::error::LoggingError;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<(), LoggingError>> + Send + 'a>>;

/// Delivers a built mail message.
pub trait MailTransport: Send + Sync {
    fn send<'a>(&'a self, message: &'a MailMessage) -> SendFuture<'a>;
}

/// Posts messages as JSON to an HTTP mail relay.
pub struct HttpRelayTransport {
    client: reqwest::Client,
    relay_url: String,
}

impl HttpRelayTransport {
    pub fn new(relay_url: impl Into<String>) -> Result<Self, LoggingError> {
        let client = reqwest::Client::builder()
            .timeout(RELAY_TIMEOUT)
            .build()
            .map_err(|e| {
                LoggingError::Configuration(format!("Failed to create mail relay client: {e}"))
            })?;

        Ok(Self {
            client,
            relay_url: relay_url.into(),
        })
    }
}

impl MailTransport for HttpRelayTransport {
    fn send<'a>(&'a self, message: &'a MailMessage) -> SendFuture<'a> {
        Box::pin(async move {
            let response = self
                .client
                .post(&self.relay_url)
                .json(message)
                .send()
                .await
                .map_err(|e| LoggingError::Transport(format!("Mail relay request failed: {e}")))?;

            if !response.status().is_success() {
                return Err(LoggingError::Transport(format!(
                    "Mail relay returned status: {}",
                    response.status()
                )));
            }
            Ok(())
        })
    }
}
