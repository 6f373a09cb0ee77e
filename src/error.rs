use thiserror::Error;

/// Outcomes of a generation run that produce no roster
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("No submissions for {month}/{year}")]
    NoSubmissions { month: u32, year: i32 },

    #[error("Invalid period: month {month}, year {year}")]
    InvalidPeriod { month: u32, year: i32 },
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing column: {0}")]
    MissingColumn(&'static str),

    #[error("Line {line}: {message}")]
    InvalidRow { line: u64, message: String },
}
