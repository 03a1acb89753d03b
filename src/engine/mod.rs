//! Provider composition engine:
//! - `ProviderRegistry`: factories plus the two-phase graph build
//! - `ProviderNode`: lifecycle, threshold gate and fallback routing per provider
//! - `validator`: reference and cycle checks
//! - `CompositeProvider`: ordered fan-out with failure aggregation
//! - `ProviderGraph`: the frozen, shareable result

pub mod composite;
pub mod graph;
pub mod node;
pub mod registry;
pub mod validator;

pub use composite::CompositeProvider;
pub use graph::{LogContext, NodeTopology, ProviderGraph, ProviderId, ProviderIndex};
pub use node::{Lifecycle, ProviderNode};
pub use registry::{ProviderFactory, ProviderRegistry};
