use std::fs::File;
use std::io::Write;

use crate::schedule::{GeneratedSchedule, Rank, Schedule, ScheduleReport};

/// Formats a slot holder, marking empty slots
pub fn format_slot(holder: Option<&str>) -> String {
    holder.map_or_else(|| "[EMPTY]".to_string(), str::to_string)
}

/// Writes a schedule to a file in the format: Mon D: 1st / 2nd / 3rd / Admin
pub fn write_schedule_to_file(
    title: &str,
    schedule: &Schedule,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;

    writeln!(file, "** {} **", title)?;

    for day in &schedule.days {
        let holders: Vec<String> = Rank::ALL.iter().map(|&r| format_slot(day.get(r))).collect();
        writeln!(file, "{}: {}", day.label, holders.join(" / "))?;
    }

    Ok(())
}

/// Prints the roster and the fairness report
pub fn print_schedule(title: &str, generated: &GeneratedSchedule, report: &ScheduleReport) {
    println!("\n=== {} ===", title);
    println!(
        "Slots filled: {} of {}",
        report.filled_slots, report.total_slots
    );

    println!("\n{:<8} {:<18} {:<18} {:<18} {:<18}", "Date", "1st On Call", "2nd On Call", "3rd On Call", "Admin");
    for day in &generated.schedule.days {
        println!(
            "{:<8} {:<18} {:<18} {:<18} {:<18}",
            day.label,
            format_slot(day.get(Rank::First)),
            format_slot(day.get(Rank::Second)),
            format_slot(day.get(Rank::Third)),
            format_slot(day.get(Rank::Admin)),
        );
    }

    println!("\nAssignments by provider:");
    for p in &report.providers {
        println!(
            "  {} -> {} assigned (target {}, requested {}, {:+}) [1st {}, 2nd {}, 3rd {}, Admin {}]",
            p.name,
            p.assigned,
            p.target,
            p.requested,
            p.deviation,
            p.per_rank.first,
            p.per_rank.second,
            p.per_rank.third,
            p.per_rank.admin,
        );
    }

    if report.unfilled_count() > 0 {
        println!("\n⚠️  Unfilled slots ({}):", report.unfilled_count());
        for slot in &report.unfilled {
            println!("  - {} {}", slot.date, slot.rank);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::DayRoster;
    use chrono::NaiveDate;

    #[test]
    fn test_schedule_file_marks_empty_slots() {
        let schedule = Schedule {
            month: 7,
            year: 2025,
            days: vec![DayRoster {
                date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                label: "Jul 1".to_string(),
                slots: [Some("Ada".to_string()), None, Some("Bo".to_string()), None],
            }],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.txt");
        let path_str = path.to_str().unwrap();

        write_schedule_to_file("July 2025", &schedule, path_str).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "** July 2025 **\nJul 1: Ada / [EMPTY] / Bo / [EMPTY]\n");
    }
}
