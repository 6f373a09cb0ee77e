use std::path::Path;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doula_scheduler::config::AppConfig;
use doula_scheduler::display::{print_schedule, write_schedule_to_file};
use doula_scheduler::form::{save_schedule_csv, SubmissionRepository};
use doula_scheduler::parser::load_submissions;
use doula_scheduler::schedule::{generate_schedule, parse_month, summarize, Period};
use doula_scheduler::{web, ScheduleError};

const USAGE: &str = "Usage:
  doula-scheduler web [port]
  doula-scheduler generate <submissions.csv> <month> <year> [seed]";

fn run_generate(args: &[String], config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let [csv_path, month, year, rest @ ..] = args else {
        return Err(USAGE.into());
    };
    let month = parse_month(month).ok_or_else(|| format!("'{}' is not a month", month))?;
    let year: i32 = year.parse()?;
    let seed = match rest.first() {
        Some(seed) => seed.parse()?,
        None => config.default_seed.unwrap_or_else(rand::random),
    };

    println!("Loading submissions from {}...", csv_path);
    let records = load_submissions(csv_path)?;
    println!("Loaded {} submissions", records.len());

    let generated = match generate_schedule(&records, month, year, seed) {
        Ok(generated) => generated,
        Err(ScheduleError::NoSubmissions { month, year }) => {
            println!("No submissions for {}/{}, nothing to schedule.", month, year);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let report = summarize(&generated);

    let period = Period::new(month, year)?;
    let title = format!("{} {} On-Call Schedule (seed {})", period.month_abbrev(), year, seed);
    print_schedule(&title, &generated, &report);

    let stem = format!("schedule_{}_{}", period.month_abbrev().to_lowercase(), year);
    let txt_path = format!("{}.txt", stem);
    let csv_out = format!("{}.csv", stem);
    write_schedule_to_file(&title, &generated.schedule, &txt_path)?;
    save_schedule_csv(&generated.schedule, Path::new(&csv_out))?;
    println!("\nSchedule saved to:");
    println!("  - {}", txt_path);
    println!("  - {}", csv_out);

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config = AppConfig::from_env();

    match args.get(1).map(String::as_str) {
        Some("web") => {
            if let Some(port) = args.get(2).and_then(|p| p.parse::<u16>().ok()) {
                config.port = port;
            }

            let mut repository = SubmissionRepository::new();
            if let Some(path) = &config.submissions_csv {
                repository.extend(load_submissions(path)?);
                info!(count = repository.len(), path = %path.display(), "Preloaded submissions");
            }

            info!("Starting web server on {}:{}", config.bind_address, config.port);
            web::start_server(config, repository).await?;
            Ok(())
        }
        Some("generate") => run_generate(&args[2..], &config),
        _ => {
            println!("{}", USAGE);
            Ok(())
        }
    }
}
