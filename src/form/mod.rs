pub mod submission;
pub mod repository;
pub mod export;

pub use submission::{validate_record, validate_submission, MonthField, SubmissionRequest};
pub use repository::{PeriodKey, RequestedTotal, SubmissionRepository};
pub use export::{save_schedule_csv, write_schedule_csv, write_submissions};
