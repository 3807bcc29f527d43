use clap::ValueEnum;

pub mod channel;
pub mod error;
pub mod launch;
pub mod projection;
pub mod render;
pub mod schema;
pub mod simulate;
pub mod stats;
pub mod store;

pub use channel::{Delivery, DeliveryCounts, ReportChannel, ReportEvent};
pub use projection::{project, Projection};
pub use store::{ResultStore, SampleBatch};

/// How a projected results table is written out.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain-text table, lower is better.
    #[default]
    Table,
    /// JSON document with run metadata and the full projection.
    Json,
}
