//! The frozen provider graph produced by `ProviderRegistry::build`.

use super::node::ProviderNode;
use crate::domain::{LogEntry, ProviderName, Severity};
use crate::error::LoggingError;
use crate::port::ProviderFuture;
use std::collections::HashMap;

/// Handle to a provider inside a `ProviderGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderId(pub(crate) usize);

impl ProviderId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Case-insensitive name lookup for every configured provider.
#[derive(Debug, Default, Clone)]
pub struct ProviderIndex {
    ids: HashMap<ProviderName, ProviderId>,
}

impl ProviderIndex {
    /// Returns `false` when the name is already taken.
    pub fn insert(&mut self, name: ProviderName, id: ProviderId) -> bool {
        if self.ids.contains_key(&name) {
            return false;
        }
        self.ids.insert(name, id);
        true
    }

    pub fn get(&self, name: &str) -> Option<ProviderId> {
        self.ids.get(&ProviderName::new(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Handed to providers while they log so they can forward to other nodes.
#[derive(Clone, Copy)]
pub struct LogContext<'a> {
    graph: &'a ProviderGraph,
}

impl<'a> LogContext<'a> {
    /// Log `entry` through another provider of the same graph, including
    /// that provider's threshold gate and fallback routing.
    pub fn forward<'b>(self, id: ProviderId, entry: &'b LogEntry) -> ProviderFuture<'b>
    where
        'a: 'b,
    {
        self.graph.dispatch(id, entry)
    }

    pub fn provider_name(self, id: ProviderId) -> &'a str {
        self.graph
            .nodes
            .get(id.0)
            .map_or("<unknown>", |node| node.name())
    }
}

/// Resolved links of one provider, by provider name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTopology {
    pub name: String,
    pub type_identifier: String,
    pub threshold: Severity,
    pub fallback: Option<String>,
    pub members: Vec<String>,
}

/// Name-indexed providers plus the default entry point.
///
/// The graph is immutable once built and can be shared across tasks.
#[derive(Debug)]
pub struct ProviderGraph {
    nodes: Vec<ProviderNode>,
    index: ProviderIndex,
    default_provider: ProviderId,
}

impl ProviderGraph {
    pub(crate) fn new(
        nodes: Vec<ProviderNode>,
        index: ProviderIndex,
        default_provider: ProviderId,
    ) -> Self {
        Self {
            nodes,
            index,
            default_provider,
        }
    }

    /// Log through the default provider.
    pub async fn log(&self, entry: &LogEntry) -> Result<Option<String>, LoggingError> {
        self.dispatch(self.default_provider, entry).await
    }

    /// Log through a named provider instead of the default one.
    pub async fn log_to(
        &self,
        provider: &str,
        entry: &LogEntry,
    ) -> Result<Option<String>, LoggingError> {
        let id = self.index.get(provider).ok_or_else(|| {
            LoggingError::InvalidArgument(format!("No provider named '{provider}' is configured."))
        })?;
        self.dispatch(id, entry).await
    }

    pub(crate) fn dispatch<'a>(&'a self, id: ProviderId, entry: &'a LogEntry) -> ProviderFuture<'a> {
        Box::pin(async move {
            let node = self.nodes.get(id.0).ok_or_else(|| {
                LoggingError::InvalidArgument(format!("Unknown provider handle {}", id.0))
            })?;
            node.log(entry, LogContext { graph: self }).await
        })
    }

    pub fn default_provider(&self) -> &ProviderNode {
        &self.nodes[self.default_provider.0]
    }

    pub fn provider(&self, name: &str) -> Option<&ProviderNode> {
        self.index.get(name).map(|id| &self.nodes[id.0])
    }

    pub fn providers(&self) -> impl Iterator<Item = &ProviderNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolved references of every provider, in configuration order.
    pub fn topology(&self) -> Vec<NodeTopology> {
        let name_of = |id: ProviderId| self.nodes[id.0].name().to_string();

        self.nodes
            .iter()
            .map(|node| NodeTopology {
                name: node.name().to_string(),
                type_identifier: node.type_identifier().to_string(),
                threshold: node.threshold(),
                fallback: node.fallback().map(name_of),
                members: node.members().iter().copied().map(name_of).collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProviderAttributes;
    use crate::engine::node::Lifecycle;
    use crate::error::LoggingError;
    use crate::port::LoggingProvider;

    struct Echo;

    impl LoggingProvider for Echo {
        fn initialize(&mut self, _: &str, _: &mut ProviderAttributes) -> Result<(), LoggingError> {
            Ok(())
        }

        fn log<'a>(&'a self, entry: &'a LogEntry, _: LogContext<'a>) -> ProviderFuture<'a> {
            let message = entry.message().to_string();
            Box::pin(async move { Ok(Some(message)) })
        }
    }

    fn single_node_graph(node: ProviderNode) -> ProviderGraph {
        let mut index = ProviderIndex::default();
        index.insert(ProviderName::new(node.name()), ProviderId(0));
        ProviderGraph::new(vec![node], index, ProviderId(0))
    }

    #[test]
    fn test_index_rejects_duplicate_names_case_insensitively() {
        let mut index = ProviderIndex::default();
        assert!(index.insert(ProviderName::new("Mail"), ProviderId(0)));
        assert!(!index.insert(ProviderName::new("MAIL"), ProviderId(1)));
        assert_eq!(index.get("mail"), Some(ProviderId(0)));
        assert_eq!(index.len(), 1);
    }

    #[tokio::test]
    async fn test_uninitialized_provider_rejects_log() {
        let graph = single_node_graph(ProviderNode::new("Echo", "echo", Box::new(Echo)));
        assert_eq!(graph.default_provider().state(), Lifecycle::Uninitialized);

        let err = graph
            .log(&LogEntry::new(Severity::Error, "boom"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoggingError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_provider_bound_but_not_completed_rejects_log() {
        let mut node = ProviderNode::new("Echo", "echo", Box::new(Echo));
        node.initialize(&mut ProviderAttributes::new()).unwrap();
        let graph = single_node_graph(node);

        let err = graph
            .log(&LogEntry::new(Severity::Error, "boom"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoggingError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_log_to_unknown_provider_is_invalid_argument() {
        let graph = single_node_graph(ProviderNode::new("Echo", "echo", Box::new(Echo)));
        let err = graph
            .log_to("Nope", &LogEntry::new(Severity::Error, "boom"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoggingError::InvalidArgument(_)));
        assert!(err.to_string().contains("Nope"));
    }
}
