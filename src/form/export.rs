use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;

use crate::error::IngestError;
use crate::parser::AvailabilityRecord;
use crate::schedule::{Rank, Schedule};

const SUBMISSION_HEADERS: [&str; 8] = [
    "name",
    "births",
    "month",
    "year",
    "unavailable",
    "admin_days",
    "admin_available",
    "preferred",
];

fn join<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: ToString,
{
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Writes submissions in the same CSV layout `parser::read_submissions` accepts
pub fn write_submissions<W: Write>(
    records: &[AvailabilityRecord],
    writer: W,
) -> Result<(), IngestError> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(SUBMISSION_HEADERS)?;

    for record in records {
        wtr.write_record([
            record.name.clone(),
            record.requested.to_string(),
            record.month.to_string(),
            record.year.to_string(),
            join(&record.unavailable),
            join(&record.admin_assigned),
            join(&record.admin_available),
            join(&record.preferred),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the roster as one row per day, leaving unfilled slots blank
pub fn write_schedule_csv<W: Write>(schedule: &Schedule, writer: W) -> Result<(), IngestError> {
    let mut wtr = WriterBuilder::new().from_writer(writer);

    let mut header = vec!["Date"];
    header.extend(Rank::ALL.iter().map(|r| r.label()));
    wtr.write_record(&header)?;

    for day in &schedule.days {
        let mut row = vec![day.label.as_str()];
        row.extend(Rank::ALL.iter().map(|&r| day.get(r).unwrap_or("")));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn save_schedule_csv(schedule: &Schedule, csv_path: &Path) -> Result<(), IngestError> {
    let file = std::fs::File::create(csv_path)?;
    write_schedule_csv(schedule, file)
}
