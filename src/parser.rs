use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::BTreeSet;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IngestError;
use crate::schedule::parse_month;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HalfDay {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl HalfDay {
    pub fn label(self) -> &'static str {
        match self {
            HalfDay::Am => "AM",
            HalfDay::Pm => "PM",
        }
    }
}

/// A half day a provider would most like to be on call, e.g. "Mar 7 PM"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PreferredSlot {
    pub day: String,
    pub half: HalfDay,
}

impl PreferredSlot {
    pub fn new(day: impl Into<String>, half: HalfDay) -> Self {
        Self { day: day.into(), half }
    }
}

impl fmt::Display for PreferredSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.half.label())
    }
}

impl FromStr for PreferredSlot {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (day, half) = value
            .trim()
            .rsplit_once(' ')
            .ok_or_else(|| format!("Preferred slot '{}' must end in AM or PM", value.trim()))?;
        let half = match half.to_ascii_uppercase().as_str() {
            "AM" => HalfDay::Am,
            "PM" => HalfDay::Pm,
            _ => return Err(format!("Preferred slot '{}' must end in AM or PM", value.trim())),
        };
        Ok(Self::new(day.trim(), half))
    }
}

impl TryFrom<String> for PreferredSlot {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PreferredSlot> for String {
    fn from(slot: PreferredSlot) -> Self {
        slot.to_string()
    }
}

/// One provider's availability for one month, as submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub name: String,
    pub month: u32,
    pub year: i32,
    #[serde(alias = "births")]
    pub requested: u32,
    #[serde(default)]
    pub unavailable: BTreeSet<String>,
    #[serde(default)]
    pub admin_assigned: BTreeSet<String>,
    #[serde(default)]
    pub admin_available: BTreeSet<String>,
    #[serde(default)]
    pub preferred: BTreeSet<PreferredSlot>,
}

impl AvailabilityRecord {
    pub fn new(name: impl Into<String>, month: u32, year: i32, requested: u32) -> Self {
        Self {
            name: name.into(),
            month,
            year,
            requested,
            unavailable: BTreeSet::new(),
            admin_assigned: BTreeSet::new(),
            admin_available: BTreeSet::new(),
            preferred: BTreeSet::new(),
        }
    }

    pub fn with_unavailable<I, S>(mut self, days: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unavailable.extend(days.into_iter().map(Into::into));
        self
    }

    pub fn with_admin_assigned<I, S>(mut self, days: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.admin_assigned.extend(days.into_iter().map(Into::into));
        self
    }

    pub fn with_admin_available<I, S>(mut self, days: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.admin_available.extend(days.into_iter().map(Into::into));
        self
    }

    pub fn with_preferred<I>(mut self, slots: I) -> Self
    where
        I: IntoIterator<Item = PreferredSlot>,
    {
        self.preferred.extend(slots);
        self
    }

    pub fn is_for(&self, month: u32, year: i32) -> bool {
        self.month == month && self.year == year
    }
}

/// Splits a comma-separated cell into trimmed, non-empty labels
pub(crate) fn parse_label_list(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_preferred_list(value: &str) -> Result<BTreeSet<PreferredSlot>, String> {
    parse_label_list(value).iter().map(|s| s.parse()).collect()
}

/// Parses a count, treating an empty cell as zero
fn parse_count(value: &str) -> Result<u32, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse()
        .map_err(|_| format!("'{}' is not a valid number of births", trimmed))
}

struct Columns {
    name: usize,
    births: Option<usize>,
    month: usize,
    year: usize,
    unavailable: Option<usize>,
    admin_days: Option<usize>,
    admin_available: Option<usize>,
    preferred: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, IngestError> {
        let find = |key: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(key))
        };
        Ok(Self {
            name: find("name").ok_or(IngestError::MissingColumn("name"))?,
            births: find("births").or_else(|| find("requested")),
            month: find("month").ok_or(IngestError::MissingColumn("month"))?,
            year: find("year").ok_or(IngestError::MissingColumn("year"))?,
            unavailable: find("unavailable"),
            admin_days: find("admin_days").or_else(|| find("admin_assigned")),
            admin_available: find("admin_available"),
            preferred: find("preferred"),
        })
    }
}

fn cell(record: &StringRecord, column: Option<usize>) -> &str {
    column.and_then(|c| record.get(c)).unwrap_or("")
}

fn parse_row(record: &StringRecord, columns: &Columns) -> Result<Option<AvailabilityRecord>, String> {
    let name = cell(record, Some(columns.name)).trim().to_string();
    // Blank rows and rows without a provider carry nothing to schedule
    if name.is_empty() {
        return Ok(None);
    }

    let month_cell = cell(record, Some(columns.month));
    let month = parse_month(month_cell)
        .ok_or_else(|| format!("'{}' is not a valid month", month_cell.trim()))?;
    let year_cell = cell(record, Some(columns.year)).trim();
    let year: i32 = year_cell
        .parse()
        .map_err(|_| format!("'{}' is not a valid year", year_cell))?;

    Ok(Some(AvailabilityRecord {
        name,
        month,
        year,
        requested: parse_count(cell(record, columns.births))?,
        unavailable: parse_label_list(cell(record, columns.unavailable)),
        admin_assigned: parse_label_list(cell(record, columns.admin_days)),
        admin_available: parse_label_list(cell(record, columns.admin_available)),
        preferred: parse_preferred_list(cell(record, columns.preferred))?,
    }))
}

/// Reads availability submissions from CSV
///
/// Expected header: `name,births,month,year,unavailable,admin_days,admin_available,preferred`.
/// Only `name`, `month` and `year` are mandatory; list cells hold comma-separated labels.
pub fn read_submissions<R: Read>(reader: R) -> Result<Vec<AvailabilityRecord>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::locate(reader.headers()?)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        if let Some(record) =
            parse_row(&row, &columns).map_err(|message| IngestError::InvalidRow { line, message })?
        {
            records.push(record);
        }
    }

    tracing::debug!(count = records.len(), "Loaded availability submissions");
    Ok(records)
}

/// Loads availability submissions from a CSV file
pub fn load_submissions<P: AsRef<Path>>(csv_path: P) -> Result<Vec<AvailabilityRecord>, IngestError> {
    let file = std::fs::File::open(csv_path)?;
    read_submissions(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_slot_parses_half() {
        let slot: PreferredSlot = "Mar 7 pm".parse().unwrap();
        assert_eq!(slot, PreferredSlot::new("Mar 7", HalfDay::Pm));
        assert_eq!(slot.to_string(), "Mar 7 PM");
        assert!("Mar 7".parse::<PreferredSlot>().is_err());
        assert!("Mar 7 noon".parse::<PreferredSlot>().is_err());
    }

    #[test]
    fn test_read_submissions_parses_lists_and_month_names() {
        let data = "\
name,births,month,year,unavailable,admin_days,admin_available,preferred
Alice,4,March,2025,\"Mar 3, Mar 4\",Mar 10,\"Mar 1,Mar 2\",Mar 5 AM
Bea,,3,2025,,,,
,2,March,2025,,,,
";
        let records = read_submissions(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let alice = &records[0];
        assert_eq!(alice.month, 3);
        assert_eq!(alice.requested, 4);
        assert!(alice.unavailable.contains("Mar 3"));
        assert!(alice.unavailable.contains("Mar 4"));
        assert!(alice.admin_assigned.contains("Mar 10"));
        assert_eq!(alice.admin_available.len(), 2);
        assert!(alice.preferred.contains(&PreferredSlot::new("Mar 5", HalfDay::Am)));

        assert_eq!(records[1].name, "Bea");
        assert_eq!(records[1].requested, 0);
    }

    #[test]
    fn test_read_submissions_reports_bad_line() {
        let data = "name,births,month,year\nAlice,four,March,2025\n";
        match read_submissions(data.as_bytes()) {
            Err(IngestError::InvalidRow { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("four"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_read_submissions_requires_name_column() {
        let data = "births,month,year\n4,March,2025\n";
        assert!(matches!(
            read_submissions(data.as_bytes()),
            Err(IngestError::MissingColumn("name"))
        ));
    }

    #[test]
    fn test_record_deserializes_births_alias() {
        let json = r#"{"name":"Cara","month":5,"year":2025,"births":3,"preferred":["May 2 AM"]}"#;
        let record: AvailabilityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.requested, 3);
        assert!(record.unavailable.is_empty());
        assert_eq!(record.preferred.len(), 1);
    }
}
