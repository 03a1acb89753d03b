//! Composite provider: forwards each entry to an ordered list of other providers.
//!
//! With a single member the call is a plain pass-through, so the member's
//! identifier and error reach the caller untouched. With several members every
//! one of them is tried in order; failures are collected and reported together
//! as one `LoggingError::Aggregate`, and no identifier is returned.

use super::graph::{LogContext, ProviderId};
use crate::domain::{LogEntry, ProviderAttributes};
use crate::error::LoggingError;
use crate::port::{LoggingProvider, ProviderFuture};
use tracing::warn;

const PROVIDER_ATTRIBUTE_PREFIX: &str = "provider";

#[derive(Debug, Default)]
pub struct CompositeProvider {
    name: String,
    reference_names: Vec<String>,
    members: Vec<ProviderId>,
}

impl CompositeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(&self) -> &[ProviderId] {
        &self.members
    }

    async fn forward_to_all(
        &self,
        entry: &LogEntry,
        ctx: LogContext<'_>,
    ) -> Result<Option<String>, LoggingError> {
        let mut failures = Vec::new();

        for &member in &self.members {
            if let Err(error) = ctx.forward(member, entry).await {
                warn!(
                    composite = %self.name,
                    provider = ctx.provider_name(member),
                    error = %error,
                    "Member provider failed, continuing fan-out"
                );
                failures.push(error);
            }
        }

        if failures.is_empty() {
            Ok(None)
        } else {
            Err(LoggingError::Aggregate(failures))
        }
    }
}

impl LoggingProvider for CompositeProvider {
    fn default_description(&self) -> &'static str {
        "Composite logging provider"
    }

    fn initialize(
        &mut self,
        name: &str,
        attributes: &mut ProviderAttributes,
    ) -> Result<(), LoggingError> {
        self.name = name.to_string();
        self.reference_names = attributes.take_indexed(PROVIDER_ATTRIBUTE_PREFIX);
        Ok(())
    }

    fn references(&self) -> &[String] {
        &self.reference_names
    }

    fn requires_references(&self) -> bool {
        true
    }

    fn complete_initialization(&mut self, resolved: Vec<ProviderId>) -> Result<(), LoggingError> {
        self.members = resolved;
        Ok(())
    }

    fn log<'a>(&'a self, entry: &'a LogEntry, ctx: LogContext<'a>) -> ProviderFuture<'a> {
        Box::pin(async move {
            match self.members.as_slice() {
                [] => Err(LoggingError::InvalidState(format!(
                    "Composite provider '{}' has no resolved members.",
                    self.name
                ))),
                [single] => ctx.forward(*single, entry).await,
                _ => self.forward_to_all(entry, ctx).await,
            }
        })
    }
}
