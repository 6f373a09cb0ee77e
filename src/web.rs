use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, ResponseError};
use serde::{Deserialize, Serialize};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

use crate::config::AppConfig;
use crate::error::{IngestError, ScheduleError};
use crate::form::{
    validate_record, validate_submission, write_schedule_csv, write_submissions, MonthField,
    PeriodKey, RequestedTotal, SubmissionRepository, SubmissionRequest,
};
use crate::parser::{read_submissions, AvailabilityRecord};
use crate::schedule::{
    generate_schedule, parse_month, summarize, DayRoster, GeneratedSchedule, Rank, ScheduleReport,
};

/// Shared service state. Submissions are only appended; schedules are generated
/// from a snapshot taken under the read lock.
pub struct AppState {
    pub repository: RwLock<SubmissionRepository>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig, repository: SubmissionRepository) -> Self {
        Self {
            repository: RwLock::new(repository),
            config,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, SubmissionRepository>, ApiError> {
        self.repository
            .read()
            .map_err(|_| ApiError::Internal("submission store unavailable".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, SubmissionRepository>, ApiError> {
        self.repository
            .write()
            .map_err(|_| ApiError::Internal("submission store unavailable".to_string()))
    }

    fn snapshot(&self) -> Result<Vec<AvailabilityRecord>, ApiError> {
        Ok(self.read()?.snapshot())
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Schedule(ScheduleError::NoSubmissions { .. }) => StatusCode::NOT_FOUND,
            ApiError::Schedule(ScheduleError::InvalidPeriod { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Ingest(IngestError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Ingest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Error: {}: {}", status, self);
        }
        HttpResponse::build(status).json(serde_json::json!({
            "success": false,
            "error": self.to_string()
        }))
    }
}

#[derive(Deserialize)]
pub struct ScheduleRequest {
    pub month: MonthField,
    pub year: i32,
    pub seed: Option<u64>,
}

#[derive(Serialize, Deserialize)]
pub struct ScheduleRow {
    pub date: String,
    pub first: Option<String>,
    pub second: Option<String>,
    pub third: Option<String>,
    pub admin: Option<String>,
}

impl From<&DayRoster> for ScheduleRow {
    fn from(day: &DayRoster) -> Self {
        let holder = |rank| day.get(rank).map(str::to_string);
        Self {
            date: day.label.clone(),
            first: holder(Rank::First),
            second: holder(Rank::Second),
            third: holder(Rank::Third),
            admin: holder(Rank::Admin),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub month: u32,
    pub year: i32,
    /// Seed that reproduces this roster
    pub seed: u64,
    pub days: Vec<ScheduleRow>,
    pub report: ScheduleReport,
}

#[derive(Serialize, Deserialize)]
pub struct SummaryResponse {
    pub total_submissions: usize,
    pub requested_totals: Vec<RequestedTotal>,
    pub periods: Vec<PeriodKey>,
}

fn month_number(month: &MonthField) -> Result<u32, ApiError> {
    match month {
        MonthField::Number(n) => Ok(*n),
        MonthField::Name(name) => parse_month(name)
            .ok_or_else(|| ApiError::Validation(format!("'{}' is not a month", name))),
    }
}

fn csv_response(body: Vec<u8>, filename: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(body)
}

fn run_schedule(
    state: &AppState,
    month: &MonthField,
    year: i32,
    seed: Option<u64>,
) -> Result<(GeneratedSchedule, u64), ApiError> {
    let month = month_number(month)?;
    let seed = seed
        .or(state.config.default_seed)
        .unwrap_or_else(rand::random);
    let records = state.snapshot()?;
    let generated = generate_schedule(&records, month, year, seed)?;
    Ok((generated, seed))
}

// Availability submission endpoint
async fn submit_availability(
    req: web::Json<SubmissionRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let record = validate_submission(&req).map_err(ApiError::Validation)?;
    state.write()?.append(record.clone());
    tracing::info!(provider = %record.name, month = record.month, year = record.year, "Availability submitted");
    Ok(HttpResponse::Created().json(record))
}

async fn list_submissions(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.snapshot()?))
}

async fn export_submissions(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let records = state.snapshot()?;
    let mut body = Vec::new();
    write_submissions(&records, &mut body)?;
    Ok(csv_response(body, "submissions.csv"))
}

// CSV upload endpoint; the whole upload is rejected if any row is invalid
async fn upload_submissions(
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let records = read_submissions(body.as_ref())?;
    for record in &records {
        validate_record(record)
            .map_err(|e| ApiError::Validation(format!("{}: {}", record.name, e)))?;
    }

    let count = records.len();
    state.write()?.extend(records);
    tracing::info!(count, "Uploaded availability submissions");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "count": count
    })))
}

async fn get_summary(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let repository = state.read()?;
    let summary = SummaryResponse {
        total_submissions: repository.len(),
        requested_totals: repository.requested_totals(),
        periods: repository.periods(),
    };
    Ok(HttpResponse::Ok().json(summary))
}

async fn post_schedule(
    req: web::Json<ScheduleRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let (generated, seed) = run_schedule(&state, &req.month, req.year, req.seed)?;
    let report = summarize(&generated);
    let schedule = generated.schedule;

    Ok(HttpResponse::Ok().json(ScheduleResponse {
        month: schedule.month,
        year: schedule.year,
        seed,
        days: schedule.days.iter().map(ScheduleRow::from).collect(),
        report,
    }))
}

async fn export_schedule(
    query: web::Query<ScheduleRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let (generated, seed) = run_schedule(&state, &query.month, query.year, query.seed)?;
    let mut body = Vec::new();
    write_schedule_csv(&generated.schedule, &mut body)?;

    let mut response = csv_response(body, "schedule.csv");
    response
        .headers_mut()
        .insert(HeaderName::from_static("x-schedule-seed"), HeaderValue::from(seed));
    Ok(response)
}

/// Registers every API route; shared by the server and tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/submissions")
            .route(web::get().to(list_submissions))
            .route(web::post().to(submit_availability)),
    )
    .route("/api/submissions/export", web::get().to(export_submissions))
    .route("/api/upload", web::post().to(upload_submissions))
    .route("/api/summary", web::get().to(get_summary))
    .route("/api/schedule", web::post().to(post_schedule))
    .route("/api/schedule/export", web::get().to(export_schedule));
}

pub async fn start_server(config: AppConfig, repository: SubmissionRepository) -> std::io::Result<()> {
    let bind = (config.bind_address.clone(), config.port);
    let app_state = web::Data::new(AppState::new(config, repository));

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(bind)?
    .run()
    .await
}
