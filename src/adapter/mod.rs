pub mod clickhouse;
pub mod json_file;
pub mod mail;
pub mod null;
pub mod tracing_provider;

pub use null::NullProvider;
pub use tracing_provider::TracingProvider;
