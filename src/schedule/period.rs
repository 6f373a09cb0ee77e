use chrono::{Datelike, Month, NaiveDate};

use crate::error::ScheduleError;
use super::types::Rank;

/// A calendar month being scheduled. Days are addressed by a 0-based index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    month: u32,
    year: i32,
    first: NaiveDate,
    num_days: usize,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Result<Self, ScheduleError> {
        let invalid = ScheduleError::InvalidPeriod { month, year };
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(invalid.clone())?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or(invalid)?;

        Ok(Self {
            month,
            year,
            first,
            num_days: (next - first).num_days() as usize,
        })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn num_days(&self) -> usize {
        self.num_days
    }

    /// Every rank on every day
    pub fn total_slots(&self) -> usize {
        self.num_days * Rank::ALL.len()
    }

    pub fn date(&self, day: usize) -> Option<NaiveDate> {
        if day >= self.num_days {
            return None;
        }
        self.first.with_day(day as u32 + 1)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.num_days).filter_map(move |day| self.date(day))
    }

    /// Three-letter month name, e.g. "Mar"
    pub fn month_abbrev(&self) -> String {
        self.first.format("%b").to_string()
    }

    pub fn day_label(&self, day: usize) -> Option<String> {
        self.date(day).map(day_label)
    }

    /// Resolves a label such as "Mar 7" to its day index within this period
    pub fn day_index(&self, label: &str) -> Option<usize> {
        let (month_part, day_part) = label.trim().split_once(' ')?;
        if !month_part.eq_ignore_ascii_case(&self.month_abbrev()) {
            return None;
        }
        let day: usize = day_part.trim().parse().ok()?;
        if day == 0 || day > self.num_days {
            return None;
        }
        Some(day - 1)
    }
}

/// Renders a date as "<3-letter month> <day-number>"
pub fn day_label(date: NaiveDate) -> String {
    format!("{} {}", date.format("%b"), date.day())
}

/// Parses a month given as a number ("3"), a name ("March") or an abbreviation ("Mar")
pub fn parse_month(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    if let Ok(number) = trimmed.parse::<u32>() {
        return (1..=12).contains(&number).then_some(number);
    }
    trimmed.parse::<Month>().ok().map(|m| m.number_from_month())
}
