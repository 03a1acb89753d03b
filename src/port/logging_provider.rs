//! LoggingProvider trait: the contract every transport and the composite implement.
//!
//! The generic parts of a provider (threshold gate, fallback routing,
//! lifecycle) live in `engine::ProviderNode`; implementations only deal with
//! their own attributes and their own delivery.

use crate::domain::{LogEntry, ProviderAttributes};
use crate::engine::{LogContext, ProviderId};
use crate::error::LoggingError;
use std::future::Future;
use std::pin::Pin;

/// Result of logging one entry: an optional identifier assigned by the provider.
pub type ProviderFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<String>, LoggingError>> + Send + 'a>>;

/// Provider-specific behaviour plugged into a graph node.
///
/// This trait is dyn-compatible by using boxed futures instead of `impl Future`.
pub trait LoggingProvider: Send + Sync {
    /// Description used when the configuration does not supply one.
    fn default_description(&self) -> &'static str {
        "Logging provider"
    }

    /// Phase 1: claim this provider's own attributes.
    ///
    /// Every recognized key must be removed from `attributes`; leftovers are
    /// reported by the caller.
    fn initialize(
        &mut self,
        name: &str,
        attributes: &mut ProviderAttributes,
    ) -> Result<(), LoggingError>;

    /// Names of the providers this one forwards to, in delivery order.
    fn references(&self) -> &[String] {
        &[]
    }

    /// Whether an empty reference list is a configuration error.
    fn requires_references(&self) -> bool {
        false
    }

    /// Phase 2: receive the resolved handles for `references()`, same order.
    fn complete_initialization(&mut self, _resolved: Vec<ProviderId>) -> Result<(), LoggingError> {
        Ok(())
    }

    /// Deliver one entry. Threshold and fallback handling happen around this
    /// call, never inside it.
    fn log<'a>(&'a self, entry: &'a LogEntry, ctx: LogContext<'a>) -> ProviderFuture<'a>;
}
