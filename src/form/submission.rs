use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::parser::{AvailabilityRecord, PreferredSlot};
use crate::schedule::{parse_month, Period};

/// Most births a provider may request in one month
pub const MAX_REQUESTED: u32 = 31;

/// Month as sent by a client: a number or a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonthField {
    Number(u32),
    Name(String),
}

impl MonthField {
    pub fn resolve(&self) -> Option<u32> {
        match self {
            MonthField::Number(n) => (1..=12).contains(n).then_some(*n),
            MonthField::Name(name) => parse_month(name),
        }
    }
}

/// Availability form submission from a client
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionRequest {
    pub name: String,
    #[serde(alias = "requested")]
    pub births: u32,
    pub month: MonthField,
    pub year: i32,
    #[serde(default)]
    pub unavailable: Vec<String>,
    #[serde(default)]
    pub admin_days: Vec<String>,
    #[serde(default)]
    pub admin_available: Vec<String>,
    #[serde(default)]
    pub preferred: Vec<String>,
}

fn check_labels<'a, I>(labels: I, period: &Period, field: &str) -> Result<(), String>
where
    I: IntoIterator<Item = &'a str>,
{
    for label in labels {
        if period.day_index(label).is_none() {
            return Err(format!(
                "{} date '{}' is not a day of {} {}",
                field,
                label,
                period.month_abbrev(),
                period.year()
            ));
        }
    }
    Ok(())
}

/// Checks a record against the rules every submission must meet
pub fn validate_record(record: &AvailabilityRecord) -> Result<(), String> {
    if record.name.trim().is_empty() {
        return Err("Name is required".to_string());
    }
    if record.requested > MAX_REQUESTED {
        return Err(format!(
            "Requested births must be between 0 and {}",
            MAX_REQUESTED
        ));
    }

    let period = Period::new(record.month, record.year).map_err(|e| e.to_string())?;
    check_labels(record.unavailable.iter().map(String::as_str), &period, "Unavailable")?;
    check_labels(record.admin_assigned.iter().map(String::as_str), &period, "Admin assigned")?;
    check_labels(record.admin_available.iter().map(String::as_str), &period, "Admin available")?;
    check_labels(record.preferred.iter().map(|s| s.day.as_str()), &period, "Preferred")?;
    Ok(())
}

/// Validates a form submission and turns it into a record
pub fn validate_submission(req: &SubmissionRequest) -> Result<AvailabilityRecord, String> {
    let month = req
        .month
        .resolve()
        .ok_or_else(|| "Month must be a month name or a number from 1 to 12".to_string())?;

    let preferred = req
        .preferred
        .iter()
        .map(|s| s.parse::<PreferredSlot>())
        .collect::<Result<BTreeSet<_>, _>>()?;

    let trimmed = |values: &[String]| -> BTreeSet<String> {
        values
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };

    let record = AvailabilityRecord {
        name: req.name.trim().to_string(),
        month,
        year: req.year,
        requested: req.births,
        unavailable: trimmed(&req.unavailable),
        admin_assigned: trimmed(&req.admin_days),
        admin_available: trimmed(&req.admin_available),
        preferred,
    };

    validate_record(&record)?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SubmissionRequest {
        SubmissionRequest {
            name: "  Dana ".to_string(),
            births: 4,
            month: MonthField::Name("June".to_string()),
            year: 2025,
            unavailable: vec!["Jun 3".to_string(), " ".to_string()],
            admin_days: vec![],
            admin_available: vec!["Jun 10".to_string()],
            preferred: vec!["Jun 12 AM".to_string()],
        }
    }

    #[test]
    fn test_valid_submission_becomes_record() {
        let record = validate_submission(&request()).unwrap();
        assert_eq!(record.name, "Dana");
        assert_eq!(record.month, 6);
        assert_eq!(record.unavailable.len(), 1);
        assert_eq!(record.preferred.len(), 1);
    }

    #[test]
    fn test_name_is_required() {
        let mut req = request();
        req.name = "   ".to_string();
        assert_eq!(validate_submission(&req), Err("Name is required".to_string()));
    }

    #[test]
    fn test_births_are_bounded() {
        let mut req = request();
        req.births = 32;
        assert!(validate_submission(&req).is_err());
    }

    #[test]
    fn test_dates_must_belong_to_month() {
        let mut req = request();
        req.unavailable.push("Jul 1".to_string());
        let err = validate_submission(&req).unwrap_err();
        assert!(err.contains("Jul 1"));

        let mut req = request();
        req.preferred = vec!["Jun 31 PM".to_string()];
        assert!(validate_submission(&req).is_err());
    }

    #[test]
    fn test_preferred_needs_half_day() {
        let mut req = request();
        req.preferred = vec!["Jun 12".to_string()];
        assert!(validate_submission(&req).is_err());
    }

    #[test]
    fn test_month_field_accepts_number_or_name() {
        let from_number: SubmissionRequest = serde_json::from_str(
            r#"{"name":"Eve","births":2,"month":7,"year":2025}"#,
        )
        .unwrap();
        assert_eq!(from_number.month.resolve(), Some(7));
        assert_eq!(MonthField::Number(0).resolve(), None);
        assert_eq!(MonthField::Name("Jul".to_string()).resolve(), Some(7));
    }
}
