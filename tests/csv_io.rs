// =====================================================================================
// CSV INGEST AND EXPORT
// =====================================================================================

use std::io::Write;

use doula_scheduler::form::save_schedule_csv;
use doula_scheduler::parser::load_submissions;
use doula_scheduler::schedule::{generate_schedule, Rank};
use doula_scheduler::IngestError;

const SUBMISSIONS: &str = "\
name,births,month,year,unavailable,admin_days,admin_available,preferred
Ada,4,February,2026,\"Feb 2, Feb 3\",,\"Feb 1, Feb 2, Feb 3, Feb 4\",Feb 9 AM
Bea,4,2,2026,Feb 14,Feb 5,\"Feb 5, Feb 6\",
Cat,4,Feb,2026,,,,
Dee,4,February,2026,,,,\"Feb 20 PM, Feb 21 AM\"
Eli,6,March,2026,,,,
";

#[test]
fn test_loaded_file_drives_a_schedule() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SUBMISSIONS.as_bytes()).unwrap();

    let records = load_submissions(file.path()).unwrap();
    assert_eq!(records.len(), 5);

    let generated = generate_schedule(&records, 2, 2026, 11).unwrap();
    assert_eq!(generated.schedule.days.len(), 28);
    assert_eq!(generated.providers.len(), 4);
    assert!(generated.tally("Eli").is_none());

    let feb_5 = &generated.schedule.days[4];
    assert_ne!(feb_5.get(Rank::Admin), Some("Bea"));
    for day in &generated.schedule.days[1..3] {
        assert_eq!(day.rank_of("Ada"), None);
    }
}

#[test]
fn test_schedule_csv_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = tempfile::NamedTempFile::new_in(dir.path()).unwrap();
    file.write_all(SUBMISSIONS.as_bytes()).unwrap();

    let records = load_submissions(file.path()).unwrap();
    let generated = generate_schedule(&records, 2, 2026, 4).unwrap();

    let out = dir.path().join("schedule_feb_2026.csv");
    save_schedule_csv(&generated.schedule, &out).unwrap();

    let written = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 29);
    assert_eq!(lines[0], "Date,1st On Call,2nd On Call,3rd On Call,Admin");
    assert!(lines[1].starts_with("Feb 1,"));
    assert!(lines[28].starts_with("Feb 28,"));
}

#[test]
fn test_missing_column_reported() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"name,births,year\nAda,4,2026\n").unwrap();

    assert!(matches!(
        load_submissions(file.path()),
        Err(IngestError::MissingColumn("month"))
    ));
}

#[test]
fn test_bad_row_reports_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"name,births,month,year\nAda,4,Feb,2026\nBea,lots,Feb,2026\n")
        .unwrap();

    match load_submissions(file.path()) {
        Err(IngestError::InvalidRow { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected an invalid row, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_submissions(dir.path().join("absent.csv")),
        Err(IngestError::Io(_))
    ));
}
