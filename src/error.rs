//! Error types for the store and the inbound report channel.

use thiserror::Error;

/// Errors raised by [`crate::store::ResultStore::update`].
///
/// An update that fails leaves the store exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("test case {test_case:?} has no samples")]
    EmptySampleSet { test_case: String },
}

/// Reasons a `report` event was discarded at the channel boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("report event has no `data` object")]
    MissingData,

    #[error("report field `{0}` is missing or not a string")]
    InvalidField(&'static str),

    #[error("report `samples` is missing or not an object")]
    InvalidSamples,

    #[error("test case {test_case:?}: {reason}")]
    InvalidSampleSet { test_case: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
