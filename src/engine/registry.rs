//! Provider registry: instantiates providers by type identifier and wires them
//! into a `ProviderGraph` in two phases.
//!
//! Phase 1 lets each provider consume its own attributes, in any order. Phase 2
//! runs only once every provider exists, so references may point forwards or
//! backwards in the configuration.

use super::composite::CompositeProvider;
use super::graph::{ProviderGraph, ProviderId, ProviderIndex};
use super::node::ProviderNode;
use super::validator;
use crate::adapter::clickhouse::ClickHouseProvider;
use crate::adapter::json_file::JsonFileProvider;
use crate::adapter::mail::MailProvider;
use crate::adapter::{NullProvider, TracingProvider};
use crate::domain::{ProviderDescriptor, ProviderName};
use crate::error::LoggingError;
use crate::port::LoggingProvider;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Constructor for one provider type.
pub type ProviderFactory = Arc<dyn Fn() -> Box<dyn LoggingProvider> + Send + Sync>;

/// Registry of provider constructors keyed by case-insensitive type identifier.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    factories: HashMap<String, (String, ProviderFactory)>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every provider type shipped with the crate.
    pub fn with_builtin_providers() -> Self {
        let mut registry = Self::new();
        registry.register("composite", || Box::new(CompositeProvider::new()));
        registry.register("null", || Box::new(NullProvider));
        registry.register("tracing", || Box::new(TracingProvider::default()));
        registry.register("jsonFile", || Box::new(JsonFileProvider::default()));
        registry.register("clickhouse", || Box::new(ClickHouseProvider::default()));
        registry.register("mail", || Box::new(MailProvider::default()));
        registry
    }

    /// Register (or replace) the constructor for a type identifier.
    pub fn register<F>(&mut self, type_identifier: &str, factory: F)
    where
        F: Fn() -> Box<dyn LoggingProvider> + Send + Sync + 'static,
    {
        self.factories.insert(
            type_identifier.to_lowercase(),
            (type_identifier.to_string(), Arc::new(factory)),
        );
        debug!(type_identifier, "Registered provider type");
    }

    pub fn has_type(&self, type_identifier: &str) -> bool {
        self.factories.contains_key(&type_identifier.to_lowercase())
    }

    /// Registered type identifiers, sorted.
    pub fn provider_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self
            .factories
            .values()
            .map(|(display, _)| display.as_str())
            .collect();
        types.sort_unstable();
        types
    }

    /// Create an uninitialized node for a descriptor.
    pub fn instantiate(&self, descriptor: &ProviderDescriptor) -> Result<ProviderNode, LoggingError> {
        let (_, factory) = self
            .factories
            .get(&descriptor.type_identifier.to_lowercase())
            .ok_or_else(|| {
                LoggingError::Configuration(format!(
                    "The provider '{}' has an unknown type '{}'.",
                    descriptor.name, descriptor.type_identifier
                ))
            })?;

        Ok(ProviderNode::new(
            descriptor.name.clone(),
            descriptor.type_identifier.clone(),
            factory(),
        ))
    }

    /// Build a frozen provider graph from raw descriptors.
    pub fn build(
        &self,
        descriptors: Vec<ProviderDescriptor>,
        default_provider: &str,
    ) -> Result<ProviderGraph, LoggingError> {
        if default_provider.trim().is_empty() {
            return Err(LoggingError::Configuration(
                "No default provider has been configured.".into(),
            ));
        }

        let mut index = ProviderIndex::default();
        let mut pending = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            let name = ProviderName::new(descriptor.name.as_str());
            if name.is_empty() {
                return Err(LoggingError::Configuration(
                    "A provider with an empty name has been configured.".into(),
                ));
            }

            let node = self.instantiate(&descriptor)?;
            if !index.insert(name, ProviderId(pending.len())) {
                return Err(LoggingError::Configuration(format!(
                    "Provider names must be unique; '{}' has been configured more than once.",
                    descriptor.name
                )));
            }
            pending.push((node, descriptor));
        }

        let default_id = index.get(default_provider).ok_or_else(|| {
            LoggingError::Configuration(format!(
                "The default provider '{default_provider}' does not exist."
            ))
        })?;

        // Phase 1
        let mut nodes = Vec::with_capacity(pending.len());
        for (mut node, mut descriptor) in pending {
            node.initialize(&mut descriptor.attributes)?;
            nodes.push(node);
        }

        // Phase 2
        for (i, node) in nodes.iter_mut().enumerate() {
            node.complete_initialization(ProviderId(i), &index)?;
        }
        validator::detect_cycles(&nodes)?;

        info!(
            providers = nodes.len(),
            default_provider = nodes[default_id.0].name(),
            "Provider graph built"
        );

        Ok(ProviderGraph::new(nodes, index, default_id))
    }
}
