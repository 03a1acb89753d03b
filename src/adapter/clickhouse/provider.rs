use super::row::LogEntryRow;
use crate::domain::{LogEntry, ProviderAttributes};
use crate::engine::LogContext;
use crate::error::LoggingError;
use crate::port::{LoggingProvider, ProviderFuture};
use clickhouse::Client;
use tracing::error;
use uuid::Uuid;

const DEFAULT_DATABASE: &str = "default";
const DEFAULT_TABLE: &str = "log_entries";

/// Persists entries into a ClickHouse table and returns the generated event id.
#[derive(Default)]
pub struct ClickHouseProvider {
    client: Option<Client>,
    table: String,
}

impl ClickHouseProvider {
    pub fn table(&self) -> &str {
        &self.table
    }

    async fn insert(&self, client: &Client, row: &LogEntryRow) -> Result<(), clickhouse::error::Error> {
        let mut insert = client.insert::<LogEntryRow>(&self.table)?;
        insert.write(row).await?;
        insert.end().await
    }
}

impl LoggingProvider for ClickHouseProvider {
    fn default_description(&self) -> &'static str {
        "ClickHouse logging provider"
    }

    fn initialize(
        &mut self,
        name: &str,
        attributes: &mut ProviderAttributes,
    ) -> Result<(), LoggingError> {
        let url = attributes.take_required("url", name)?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(LoggingError::Configuration(format!(
                "Invalid value '{url}' for attribute 'url' of provider '{name}': expected an http(s) URL."
            )));
        }
        let database = attributes
            .take("database")
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        self.table = attributes
            .take("table")
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());

        let mut client = Client::default().with_url(url).with_database(database);
        if let Some(user) = attributes.take("user") {
            client = client.with_user(user);
        }
        if let Some(password) = attributes.take("password") {
            client = client.with_password(password);
        }
        self.client = Some(client);
        Ok(())
    }

    fn log<'a>(&'a self, entry: &'a LogEntry, _ctx: LogContext<'a>) -> ProviderFuture<'a> {
        Box::pin(async move {
            let client = self.client.as_ref().ok_or_else(|| {
                LoggingError::InvalidState("ClickHouse client has not been configured.".into())
            })?;

            let event_id = Uuid::new_v4().to_string();
            let row = LogEntryRow::new(event_id.clone(), entry);

            if let Err(e) = self.insert(client, &row).await {
                error!("Failed to write log entry to ClickHouse: {e}");
                return Err(LoggingError::Transport(format!(
                    "Failed to write log entry to ClickHouse table '{}': {e}",
                    self.table
                )));
            }

            Ok(Some(event_id))
        })
    }
}
