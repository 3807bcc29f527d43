//! Aggregation of benchmark reports.
//!
//! A [`ResultStore`] owns one [`Report`] per `(name, version)` pair, in arrival order,
//! plus the [`TestCaseRegistry`] of every test-case name seen so far. Sample sets are
//! append-only: a repeated submission for the same test case is concatenated onto the
//! existing samples, never replaced and never deduplicated.

use crate::error::StoreError;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Timing samples for one test case, in arrival order.
pub type SampleSet = Vec<f64>;

/// One submission of samples keyed by test-case name.
///
/// Entry order is preserved from the wire, so first-seen ordering of test cases holds
/// inside a single batch as well as across batches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleBatch {
    entries: Vec<(String, SampleSet)>,
}

impl SampleBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, test_case: impl Into<String>, samples: SampleSet) {
        self.entries.push((test_case.into(), samples));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn test_cases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    fn into_entries(self) -> Vec<(String, SampleSet)> {
        self.entries
    }
}

impl<K: Into<String>> FromIterator<(K, SampleSet)> for SampleBatch {
    fn from_iter<I: IntoIterator<Item = (K, SampleSet)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl Serialize for SampleBatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct SampleBatchVisitor;

impl<'de> Visitor<'de> for SampleBatchVisitor {
    type Value = SampleBatch;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of test-case name to an array of numbers")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((k, v)) = access.next_entry::<String, SampleSet>()? {
            entries.push((k, v));
        }
        Ok(SampleBatch { entries })
    }
}

impl<'de> Deserialize<'de> for SampleBatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SampleBatchVisitor)
    }
}

/// Accumulated samples of one contestant build.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub name: String,
    pub version: String,
    samples: HashMap<String, SampleSet>,
}

impl Report {
    fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            samples: HashMap::new(),
        }
    }

    /// Samples recorded for `test_case`, if this report has any.
    pub fn samples(&self, test_case: &str) -> Option<&[f64]> {
        self.samples.get(test_case).map(Vec::as_slice)
    }

    pub fn test_case_count(&self) -> usize {
        self.samples.len()
    }

    fn matches(&self, name: &str, version: &str) -> bool {
        self.name == name && self.version == version
    }

    /// Append every entry of `batch`; returns the number of samples added.
    fn add_samples(&mut self, batch: Vec<(String, SampleSet)>) -> usize {
        let mut added = 0;
        for (test_case, incoming) in batch {
            added += incoming.len();
            match self.samples.get_mut(&test_case) {
                Some(existing) => existing.extend(incoming),
                None => {
                    self.samples.insert(test_case, incoming);
                }
            }
        }
        added
    }
}

/// Distinct test-case names in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct TestCaseRegistry {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl TestCaseRegistry {
    /// Register `name`; returns `true` if it was not known before.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_string(), self.names.len());
        self.names.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// What a successful [`ResultStore::update`] changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// A new report was created for the `(name, version)` pair.
    pub created: bool,
    pub appended_samples: usize,
    /// Test cases registered for the first time, in registration order.
    pub new_test_cases: Vec<String>,
    /// Store revision after the update.
    pub revision: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    reports: Vec<Report>,
    test_cases: TestCaseRegistry,
    revision: u64,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The unique report for `(name, version)`, if one has arrived.
    pub fn find(&self, name: &str, version: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.matches(name, version))
    }

    /// Merge `batch` into the report for `(name, version)`, creating it on first sight.
    ///
    /// A batch holding an empty sample set is rejected whole and the store is left
    /// untouched. Every successful call bumps [`ResultStore::revision`], which is the
    /// signal for hosts to re-project.
    pub fn update(
        &mut self,
        name: &str,
        version: &str,
        batch: SampleBatch,
    ) -> Result<UpdateOutcome, StoreError> {
        if let Some((test_case, _)) = batch.iter().find(|(_, s)| s.is_empty()) {
            return Err(StoreError::EmptySampleSet {
                test_case: test_case.to_string(),
            });
        }

        let mut new_test_cases = Vec::new();
        for test_case in batch.test_cases() {
            if self.test_cases.insert(test_case) {
                new_test_cases.push(test_case.to_string());
            }
        }

        let entries = batch.into_entries();
        let (created, appended_samples) =
            match self.reports.iter_mut().find(|r| r.matches(name, version)) {
                Some(report) => (false, report.add_samples(entries)),
                None => {
                    let mut report = Report::new(name, version);
                    let added = report.add_samples(entries);
                    self.reports.push(report);
                    (true, added)
                }
            };

        self.revision += 1;

        debug!(
            name,
            version,
            created,
            appended_samples,
            new_test_cases = new_test_cases.len(),
            revision = self.revision,
            "merged report"
        );

        Ok(UpdateOutcome {
            created,
            appended_samples,
            new_test_cases,
            revision: self.revision,
        })
    }

    /// Reports in arrival order.
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn test_cases(&self) -> &TestCaseRegistry {
        &self.test_cases
    }

    /// Number of successful updates so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
