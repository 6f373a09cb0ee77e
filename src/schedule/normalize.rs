use std::collections::{BTreeMap, BTreeSet};

use crate::error::ScheduleError;
use crate::parser::{AvailabilityRecord, HalfDay};
use super::period::Period;

/// A provider's submission for the target month, with labels resolved to day indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub name: String,
    pub requested: u32,
    pub unavailable: BTreeSet<usize>,
    pub admin_available: BTreeSet<usize>,
    pub admin_assigned: BTreeSet<usize>,
    pub preferred: BTreeSet<(usize, HalfDay)>,
}

impl ProviderRequest {
    /// Whether either half of `day` was flagged as preferred
    pub fn prefers(&self, day: usize) -> bool {
        self.preferred
            .range((day, HalfDay::Am)..=(day, HalfDay::Pm))
            .next()
            .is_some()
    }
}

fn resolve_days<'a, I>(labels: I, period: &Period, provider: &str) -> BTreeSet<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    labels
        .into_iter()
        .filter_map(|label| {
            let day = period.day_index(label);
            if day.is_none() {
                tracing::debug!(provider, label, "Ignoring label outside the scheduled month");
            }
            day
        })
        .collect()
}

fn normalize_record(record: &AvailabilityRecord, period: &Period) -> ProviderRequest {
    let name = record.name.as_str();
    let days = |labels: &BTreeSet<String>| resolve_days(labels.iter().map(String::as_str), period, name);

    let preferred = record
        .preferred
        .iter()
        .filter_map(|slot| match period.day_index(&slot.day) {
            Some(day) => Some((day, slot.half)),
            None => {
                tracing::debug!(provider = name, label = %slot, "Ignoring preference outside the scheduled month");
                None
            }
        })
        .collect();

    ProviderRequest {
        name: record.name.clone(),
        requested: record.requested,
        unavailable: days(&record.unavailable),
        admin_available: days(&record.admin_available),
        admin_assigned: days(&record.admin_assigned),
        preferred,
    }
}

/// Keeps the records for `period` and reshapes them per provider, ordered by name
///
/// A provider with several records for the same month keeps the last one.
pub fn normalize_requests(
    records: &[AvailabilityRecord],
    period: &Period,
) -> Result<Vec<ProviderRequest>, ScheduleError> {
    let mut by_name: BTreeMap<&str, ProviderRequest> = BTreeMap::new();

    for record in records.iter().filter(|r| r.is_for(period.month(), period.year())) {
        let request = normalize_record(record, period);
        if by_name.insert(record.name.as_str(), request).is_some() {
            tracing::warn!(provider = %record.name, "Duplicate submission for the month, keeping the latest");
        }
    }

    if by_name.is_empty() {
        return Err(ScheduleError::NoSubmissions {
            month: period.month(),
            year: period.year(),
        });
    }

    Ok(by_name.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PreferredSlot;

    fn march() -> Period {
        Period::new(3, 2025).unwrap()
    }

    #[test]
    fn test_filters_to_target_month_and_sorts_by_name() {
        let records = vec![
            AvailabilityRecord::new("Zoe", 3, 2025, 2),
            AvailabilityRecord::new("Amy", 3, 2025, 4),
            AvailabilityRecord::new("Kim", 4, 2025, 6),
            AvailabilityRecord::new("Lou", 3, 2024, 6),
        ];
        let requests = normalize_requests(&records, &march()).unwrap();
        let names: Vec<&str> = requests.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Zoe"]);
    }

    #[test]
    fn test_no_matching_records_signals_no_submissions() {
        let records = vec![AvailabilityRecord::new("Kim", 4, 2025, 6)];
        assert_eq!(
            normalize_requests(&records, &march()),
            Err(ScheduleError::NoSubmissions { month: 3, year: 2025 })
        );
        assert!(normalize_requests(&[], &march()).is_err());
    }

    #[test]
    fn test_labels_resolve_to_day_indices() {
        let record = AvailabilityRecord::new("Amy", 3, 2025, 4)
            .with_unavailable(["Mar 1", "Mar 31", "Apr 2"])
            .with_admin_available(["Mar 3"])
            .with_admin_assigned(["Mar 4"])
            .with_preferred([PreferredSlot::new("Mar 5", HalfDay::Pm)]);
        let requests = normalize_requests(&[record], &march()).unwrap();
        let amy = &requests[0];

        assert_eq!(amy.unavailable, BTreeSet::from([0, 30]));
        assert_eq!(amy.admin_available, BTreeSet::from([2]));
        assert_eq!(amy.admin_assigned, BTreeSet::from([3]));
        assert!(amy.prefers(4));
        assert!(!amy.prefers(3));
        assert!(!amy.prefers(5));
    }

    #[test]
    fn test_duplicate_submission_keeps_latest() {
        let records = vec![
            AvailabilityRecord::new("Amy", 3, 2025, 4),
            AvailabilityRecord::new("Amy", 3, 2025, 9),
        ];
        let requests = normalize_requests(&records, &march()).unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].requested, 9);
    }
}
