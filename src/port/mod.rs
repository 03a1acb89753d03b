pub mod logging_provider;

pub use logging_provider::{LoggingProvider, ProviderFuture};
