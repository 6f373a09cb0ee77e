use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::parser::AvailabilityRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedTotal {
    pub name: String,
    pub births: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeriodKey {
    pub year: i32,
    pub month: u32,
}

/// Append-only store of availability submissions
///
/// Records are never edited or removed; schedulers work on a [`snapshot`](Self::snapshot).
#[derive(Debug, Clone, Default)]
pub struct SubmissionRepository {
    records: Vec<AvailabilityRecord>,
}

impl SubmissionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: AvailabilityRecord) {
        self.records.push(record);
    }

    pub fn extend<I: IntoIterator<Item = AvailabilityRecord>>(&mut self, records: I) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[AvailabilityRecord] {
        &self.records
    }

    pub fn snapshot(&self) -> Vec<AvailabilityRecord> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Months that have at least one submission, oldest first
    pub fn periods(&self) -> Vec<PeriodKey> {
        let mut periods: Vec<PeriodKey> = self
            .records
            .iter()
            .map(|r| PeriodKey { year: r.year, month: r.month })
            .collect();
        periods.sort();
        periods.dedup();
        periods
    }

    /// Births requested per provider across all submissions
    pub fn requested_totals(&self) -> Vec<RequestedTotal> {
        let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
        for record in &self.records {
            *totals.entry(record.name.as_str()).or_insert(0) += u64::from(record.requested);
        }
        totals
            .into_iter()
            .map(|(name, births)| RequestedTotal { name: name.to_string(), births })
            .collect()
    }
}

impl From<Vec<AvailabilityRecord>> for SubmissionRepository {
    fn from(records: Vec<AvailabilityRecord>) -> Self {
        Self { records }
    }
}
