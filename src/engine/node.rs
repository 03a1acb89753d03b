//! Graph node wrapping a `LoggingProvider` with the behaviour every provider
//! shares: lifecycle tracking, the threshold gate and fallback routing.

use super::graph::{LogContext, ProviderId, ProviderIndex};
use super::validator;
use crate::domain::{ExceptionInfo, LogEntry, ProviderAttributes, ProviderName, Severity};
use crate::error::LoggingError;
use crate::port::LoggingProvider;
use tracing::{debug, warn};

const THRESHOLD_ATTRIBUTE: &str = "threshold";
const FALLBACK_PROVIDER_ATTRIBUTE: &str = "fallbackProvider";
const DESCRIPTION_ATTRIBUTE: &str = "description";

/// Initialization progress of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    /// Own attributes consumed; references not yet resolved.
    AttributesBound,
    Ready,
}

pub struct ProviderNode {
    name: ProviderName,
    type_identifier: String,
    description: Option<String>,
    threshold: Severity,
    fallback_name: Option<String>,
    fallback: Option<ProviderId>,
    members: Vec<ProviderId>,
    state: Lifecycle,
    provider: Box<dyn LoggingProvider>,
}

impl ProviderNode {
    pub fn new(
        name: impl Into<String>,
        type_identifier: impl Into<String>,
        provider: Box<dyn LoggingProvider>,
    ) -> Self {
        Self {
            name: ProviderName::new(name),
            type_identifier: type_identifier.into(),
            description: None,
            threshold: Severity::default(),
            fallback_name: None,
            fallback: None,
            members: Vec::new(),
            state: Lifecycle::Uninitialized,
            provider,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn type_identifier(&self) -> &str {
        &self.type_identifier
    }

    pub fn description(&self) -> &str {
        self.description
            .as_deref()
            .unwrap_or_else(|| self.provider.default_description())
    }

    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    pub fn fallback_name(&self) -> Option<&str> {
        self.fallback_name.as_deref()
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub(crate) fn fallback(&self) -> Option<ProviderId> {
        self.fallback
    }

    pub(crate) fn members(&self) -> &[ProviderId] {
        &self.members
    }

    /// Handles this node points at: its fallback first, then its members.
    pub(crate) fn outgoing(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.fallback.into_iter().chain(self.members.iter().copied())
    }

    /// Phase 1: bind the generic attributes, let the provider claim its own,
    /// then reject whatever is left.
    pub fn initialize(&mut self, attributes: &mut ProviderAttributes) -> Result<(), LoggingError> {
        if self.state != Lifecycle::Uninitialized {
            return Err(LoggingError::InvalidState(format!(
                "Provider '{}' has already been initialized.",
                self.name
            )));
        }

        self.description = attributes.take(DESCRIPTION_ATTRIBUTE);
        self.threshold = match attributes.take(THRESHOLD_ATTRIBUTE) {
            None => Severity::default(),
            Some(raw) => raw.parse::<Severity>().map_err(|_| {
                LoggingError::Configuration(format!(
                    "Invalid value '{raw}' for attribute '{THRESHOLD_ATTRIBUTE}' of provider '{}'.",
                    self.name
                ))
            })?,
        };
        self.fallback_name = attributes.take(FALLBACK_PROVIDER_ATTRIBUTE);

        self.provider.initialize(self.name.as_str(), attributes)?;

        if let Some(key) = attributes.unrecognized().first() {
            return Err(LoggingError::Configuration(format!(
                "Unrecognized attribute '{key}' in the configuration of provider '{}'.",
                self.name
            )));
        }

        self.state = Lifecycle::AttributesBound;
        Ok(())
    }

    /// Phase 2: resolve the fallback and member names against the complete index.
    pub(crate) fn complete_initialization(
        &mut self,
        id: ProviderId,
        index: &ProviderIndex,
    ) -> Result<(), LoggingError> {
        if self.state != Lifecycle::AttributesBound {
            return Err(LoggingError::InvalidState(format!(
                "Provider '{}' cannot complete initialization from state {:?}.",
                self.name, self.state
            )));
        }

        let owner = (self.name.as_str(), id);
        self.fallback = validator::resolve_fallback(owner, self.fallback_name.as_deref(), index)?;
        let members = validator::resolve_references(
            owner,
            self.provider.references(),
            self.provider.requires_references(),
            index,
        )?;

        self.provider.complete_initialization(members.clone())?;
        self.members = members;
        self.state = Lifecycle::Ready;
        Ok(())
    }

    pub(crate) async fn log(
        &self,
        entry: &LogEntry,
        ctx: LogContext<'_>,
    ) -> Result<Option<String>, LoggingError> {
        if self.state != Lifecycle::Ready {
            return Err(LoggingError::InvalidState(format!(
                "Provider '{}' has not been initialized correctly and cannot accept entries.",
                self.name
            )));
        }

        if entry.severity() < self.threshold {
            debug!(
                provider = %self.name,
                severity = %entry.severity(),
                threshold = %self.threshold,
                "Entry below threshold, discarded"
            );
            return Ok(None);
        }

        match self.provider.log(entry, ctx).await {
            Err(error) if error.is_routable() => match self.fallback {
                Some(fallback) => self.route_to_fallback(fallback, entry, error, ctx).await,
                None => Err(error),
            },
            result => result,
        }
    }

    /// Report the failure to the fallback provider, then hand it the original entry.
    async fn route_to_fallback(
        &self,
        fallback: ProviderId,
        entry: &LogEntry,
        error: LoggingError,
        ctx: LogContext<'_>,
    ) -> Result<Option<String>, LoggingError> {
        warn!(
            provider = %self.name,
            fallback = ctx.provider_name(fallback),
            error = %error,
            "Provider failed, routing entry to fallback provider"
        );

        let failure = LogEntry::new(
            Severity::Error,
            format!("Logging to provider '{}' failed: {error}", self.name),
        )
        .with_source(self.name.as_str())
        .with_exception(ExceptionInfo::from(&error));

        ctx.forward(fallback, &failure).await?;
        ctx.forward(fallback, entry).await
    }
}

impl std::fmt::Debug for ProviderNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderNode")
            .field("name", &self.name.as_str())
            .field("type", &self.type_identifier)
            .field("threshold", &self.threshold)
            .field("fallback", &self.fallback_name)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
