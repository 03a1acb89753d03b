#![warn(rust_2018_idioms)]

//! Pluggable logging backbone: named providers composed into a validated graph.

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod handler;
pub mod healthcheck;
pub mod port;

#[doc(hidden)]
pub mod test_support;

pub use domain::{LogEntry, Severity};
pub use engine::{ProviderGraph, ProviderRegistry};
pub use error::LoggingError;
pub use healthcheck::{healthcheck, healthcheck_with_port};
