//! Domain types shared by the engine and every provider:
//! - `LogEntry` / `ExceptionInfo`: the unit of work
//! - `Severity`: ordered entry severity
//! - `ProviderDescriptor` / `ProviderAttributes` / `ProviderName`: raw provider configuration

pub mod descriptor;
pub mod log_entry;
pub mod severity;

pub use descriptor::{ProviderAttributes, ProviderDescriptor, ProviderName};
pub use log_entry::{ExceptionInfo, LogEntry};
pub use severity::{ParseSeverityError, Severity};
