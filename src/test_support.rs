//! Shared test support utilities
//!
//! `SpyProvider` records every entry that reaches its core logic in a shared
//! `Journal`, so tests can assert both what was delivered and in which order.
//! Spies fail with a transport error when configured with `fail = "true"` or
//! when the journal marks them as failing at runtime.

use crate::domain::{LogEntry, ProviderAttributes, ProviderDescriptor};
use crate::engine::{LogContext, ProviderRegistry};
use crate::error::LoggingError;
use crate::port::{LoggingProvider, ProviderFuture};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub provider: String,
    pub entry: LogEntry,
}

/// Global, ordered record of spy invocations.
#[derive(Debug, Default)]
pub struct Journal {
    invocations: Mutex<Vec<Invocation>>,
    failing: Mutex<HashSet<String>>,
}

impl Journal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn record(&self, provider: &str, entry: &LogEntry) {
        self.invocations.lock().unwrap().push(Invocation {
            provider: provider.to_string(),
            entry: entry.clone(),
        });
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// Provider names in invocation order.
    pub fn order(&self) -> Vec<String> {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .map(|i| i.provider.clone())
            .collect()
    }

    pub fn entries_for(&self, provider: &str) -> Vec<LogEntry> {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.provider.eq_ignore_ascii_case(provider))
            .map(|i| i.entry.clone())
            .collect()
    }

    pub fn count_for(&self, provider: &str) -> usize {
        self.entries_for(provider).len()
    }

    /// Make `provider` fail from now on.
    pub fn fail(&self, provider: &str) {
        self.failing.lock().unwrap().insert(provider.to_lowercase());
    }

    pub fn recover(&self, provider: &str) {
        self.failing.lock().unwrap().remove(&provider.to_lowercase());
    }

    pub fn clear(&self) {
        self.invocations.lock().unwrap().clear();
    }

    fn is_failing(&self, provider: &str) -> bool {
        self.failing.lock().unwrap().contains(&provider.to_lowercase())
    }
}

/// Leaf provider recording entries into a `Journal`.
///
/// Attributes: `fail` (bool) and `returns` (identifier handed back on success).
pub struct SpyProvider {
    journal: Arc<Journal>,
    name: String,
    fail: bool,
    returns: Option<String>,
}

impl SpyProvider {
    pub fn new(journal: Arc<Journal>) -> Self {
        Self {
            journal,
            name: String::new(),
            fail: false,
            returns: None,
        }
    }
}

impl LoggingProvider for SpyProvider {
    fn default_description(&self) -> &'static str {
        "Spy logging provider"
    }

    fn initialize(
        &mut self,
        name: &str,
        attributes: &mut ProviderAttributes,
    ) -> Result<(), LoggingError> {
        self.name = name.to_string();
        self.fail = attributes.take_parsed("fail", name, false)?;
        self.returns = attributes.take("returns");
        Ok(())
    }

    fn log<'a>(&'a self, entry: &'a LogEntry, _ctx: LogContext<'a>) -> ProviderFuture<'a> {
        Box::pin(async move {
            self.journal.record(&self.name, entry);
            if self.fail || self.journal.is_failing(&self.name) {
                return Err(LoggingError::Transport(format!("{} is unavailable", self.name)));
            }
            Ok(self.returns.clone())
        })
    }
}

/// Built-in providers plus the `spy` type writing into `journal`.
pub fn spy_registry(journal: &Arc<Journal>) -> ProviderRegistry {
    let mut registry = ProviderRegistry::with_builtin_providers();
    let journal = journal.clone();
    registry.register("spy", move || Box::new(SpyProvider::new(journal.clone())));
    registry
}

pub fn descriptor(name: &str, type_identifier: &str, attrs: &[(&str, &str)]) -> ProviderDescriptor {
    ProviderDescriptor::new(name, type_identifier, attrs.iter().copied())
}
