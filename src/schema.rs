use crate::projection::Projection;
use serde::Serialize;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub tool_version: String,
    pub timestamp_utc: String,
    pub filter: String,
    /// Store revision the table was projected from.
    pub revision: u64,
    pub events_applied: u64,
    pub events_ignored: u64,
    pub events_rejected: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub run: RunMeta,
    pub table: Projection,
}
