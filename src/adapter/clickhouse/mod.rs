pub mod provider;
pub mod row;

pub use provider::ClickHouseProvider;
pub use row::LogEntryRow;
