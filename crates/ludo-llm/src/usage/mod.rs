//! Usage Log - audit trail of backend dispatches
//!
//! # Module Structure
//!
//! - `record`: `UsageLogEntry` and aggregated `UsageStats`
//! - `log`: `UsageSink` trait and the in-memory `UsageLog`

mod log;
mod record;

#[cfg(test)]
mod tests;

pub use log::{NullUsageSink, UsageLog, UsageSink};
pub use record::{ModuleStats, UsageLogEntry, UsageStats};
