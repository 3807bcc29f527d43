//! Inbound report events.
//!
//! Events arrive as untyped JSON of the form `{ "type": ..., "data": ... }` from any
//! sender sharing the transport. Only `type == "report"` is acted on; everything else is
//! ignored. A malformed report is discarded and logged; it never reaches the store.
//!
//! ```text
//! {
//!   "type": "report",
//!   "data": {
//!     "name": "React",
//!     "version": "15.3.0",
//!     "samples": { "table/[100,4]/render": [0.0123, 0.0119] }
//!   }
//! }
//! ```

use crate::error::ChannelError;
use crate::store::{ResultStore, SampleBatch, SampleSet, UpdateOutcome};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::{self, BufRead};
use tracing::{debug, warn};

/// Event type tag for benchmark reports.
pub const REPORT_EVENT_TYPE: &str = "report";

/// A decoded, validated `report` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEvent {
    pub name: String,
    pub version: String,
    pub samples: SampleBatch,
}

/// Wire envelope, used when producing events.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: &'a ReportEvent,
}

impl ReportEvent {
    pub fn new(name: impl Into<String>, version: impl Into<String>, samples: SampleBatch) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            samples,
        }
    }

    /// The full `{type, data}` message for this report.
    pub fn to_message(&self) -> serde_json::Result<Value> {
        serde_json::to_value(Envelope {
            kind: REPORT_EVENT_TYPE,
            data: self,
        })
    }
}

/// Decode an inbound event.
///
/// Returns `Ok(None)` for anything that is not a report event, `Err` for a report event
/// that fails validation.
pub fn decode(event: &Value) -> Result<Option<ReportEvent>, ChannelError> {
    let Some(envelope) = event.as_object() else {
        return Ok(None);
    };
    if envelope.get("type").and_then(Value::as_str) != Some(REPORT_EVENT_TYPE) {
        return Ok(None);
    }

    let data = envelope
        .get("data")
        .and_then(Value::as_object)
        .ok_or(ChannelError::MissingData)?;

    let name = string_field(data, "name")?;
    let version = string_field(data, "version")?;
    let samples = data
        .get("samples")
        .and_then(Value::as_object)
        .ok_or(ChannelError::InvalidSamples)?;

    let mut batch = SampleBatch::new();
    for (test_case, raw) in samples {
        batch.push(test_case.clone(), sample_set(test_case, raw)?);
    }

    Ok(Some(ReportEvent {
        name,
        version,
        samples: batch,
    }))
}

fn string_field(data: &Map<String, Value>, field: &'static str) -> Result<String, ChannelError> {
    data.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ChannelError::InvalidField(field))
}

fn sample_set(test_case: &str, raw: &Value) -> Result<SampleSet, ChannelError> {
    let invalid = |reason: &str| ChannelError::InvalidSampleSet {
        test_case: test_case.to_string(),
        reason: reason.to_string(),
    };

    let values = raw.as_array().ok_or_else(|| invalid("samples must be an array"))?;
    if values.is_empty() {
        return Err(invalid("no samples"));
    }

    values
        .iter()
        .map(|v| match v.as_f64() {
            Some(x) if x.is_finite() => Ok(x),
            _ => Err(invalid("samples must be finite numbers")),
        })
        .collect()
}

/// Result of delivering one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// The report was merged into the store; re-project.
    Applied(UpdateOutcome),
    /// Not a report event.
    Ignored,
    /// A report event that failed validation. The store is unchanged.
    Rejected(ChannelError),
}

impl Delivery {
    pub fn is_applied(&self) -> bool {
        matches!(self, Delivery::Applied(_))
    }
}

/// Per-outcome counts of delivered events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryCounts {
    pub applied: u64,
    pub ignored: u64,
    pub rejected: u64,
}

impl DeliveryCounts {
    pub fn record(&mut self, delivery: &Delivery) {
        match delivery {
            Delivery::Applied(_) => self.applied += 1,
            Delivery::Ignored => self.ignored += 1,
            Delivery::Rejected(_) => self.rejected += 1,
        }
    }
}

impl std::ops::Add for DeliveryCounts {
    type Output = DeliveryCounts;

    fn add(self, rhs: DeliveryCounts) -> DeliveryCounts {
        DeliveryCounts {
            applied: self.applied + rhs.applied,
            ignored: self.ignored + rhs.ignored,
            rejected: self.rejected + rhs.rejected,
        }
    }
}

/// Feeds decoded report events into a [`ResultStore`].
///
/// Holds nothing but the store reference, so any transport (stdin, a socket, a test
/// calling [`ReportChannel::deliver`] directly) can drive it.
pub struct ReportChannel<'s> {
    store: &'s mut ResultStore,
}

impl<'s> ReportChannel<'s> {
    pub fn new(store: &'s mut ResultStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ResultStore {
        &*self.store
    }

    pub fn deliver(&mut self, event: &Value) -> Delivery {
        match decode(event) {
            Ok(Some(report)) => self.apply(report),
            Ok(None) => {
                debug!("ignoring non-report event");
                Delivery::Ignored
            }
            Err(err) => {
                warn!(error = %err, "discarding malformed report event");
                Delivery::Rejected(err)
            }
        }
    }

    /// Deliver a raw JSON message. Text that is not JSON is ignored.
    pub fn deliver_str(&mut self, raw: &str) -> Delivery {
        match serde_json::from_str::<Value>(raw) {
            Ok(event) => self.deliver(&event),
            Err(err) => {
                debug!(error = %err, "ignoring non-JSON message");
                Delivery::Ignored
            }
        }
    }

    /// Deliver newline-delimited messages from `reader`, skipping blank lines.
    ///
    /// Lines that are not valid UTF-8 are decoded lossily and end up ignored like any
    /// other non-JSON text. Only read failures are returned as errors.
    ///
    /// `on_applied` runs after every applied report, with the store already updated and
    /// the counts so far.
    pub fn deliver_lines<R, F>(
        &mut self,
        mut reader: R,
        mut on_applied: F,
    ) -> io::Result<DeliveryCounts>
    where
        R: BufRead,
        F: FnMut(&ResultStore, &UpdateOutcome, &DeliveryCounts) -> io::Result<()>,
    {
        let mut counts = DeliveryCounts::default();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            if line.trim().is_empty() {
                continue;
            }
            let delivery = self.deliver_str(&line);
            counts.record(&delivery);
            if let Delivery::Applied(outcome) = &delivery {
                on_applied(&*self.store, outcome, &counts)?;
            }
        }
        Ok(counts)
    }

    /// Apply an already decoded report.
    pub fn apply(&mut self, report: ReportEvent) -> Delivery {
        match self
            .store
            .update(&report.name, &report.version, report.samples)
        {
            Ok(outcome) => Delivery::Applied(outcome),
            Err(err) => {
                warn!(name = %report.name, version = %report.version, error = %err, "store rejected report");
                Delivery::Rejected(err.into())
            }
        }
    }
}
