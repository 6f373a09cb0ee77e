use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily duty slots, evaluated in declaration order each day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    First,
    Second,
    Third,
    Admin,
}

impl Rank {
    pub const ALL: [Rank; 4] = [Rank::First, Rank::Second, Rank::Third, Rank::Admin];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Column heading used in tables and CSV exports
    pub fn label(self) -> &'static str {
        match self {
            Rank::First => "1st On Call",
            Rank::Second => "2nd On Call",
            Rank::Third => "3rd On Call",
            Rank::Admin => "Admin",
        }
    }

    pub fn is_on_call(self) -> bool {
        !matches!(self, Rank::Admin)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Assignments held per rank
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankCounts {
    pub first: u32,
    pub second: u32,
    pub third: u32,
    pub admin: u32,
}

impl RankCounts {
    pub fn get(&self, rank: Rank) -> u32 {
        match rank {
            Rank::First => self.first,
            Rank::Second => self.second,
            Rank::Third => self.third,
            Rank::Admin => self.admin,
        }
    }

    pub fn increment(&mut self, rank: Rank) {
        match rank {
            Rank::First => self.first += 1,
            Rank::Second => self.second += 1,
            Rank::Third => self.third += 1,
            Rank::Admin => self.admin += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.first + self.second + self.third + self.admin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastAssignment {
    pub rank: Rank,
    pub day: usize,
}

/// Where a provider stands with respect to a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutyStatus {
    Available,
    /// Already holds a rank on this day
    OnDuty,
    /// Worked First, Second or Admin the day before
    CoolingDown,
    /// Worked Third the day before, which does not lock the next day
    Exempt,
}

/// Per-provider bookkeeping for one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderState {
    pub total: u32,
    pub per_rank: RankCounts,
    pub last: Option<LastAssignment>,
}

impl ProviderState {
    pub fn record(&mut self, rank: Rank, day: usize) {
        self.total += 1;
        self.per_rank.increment(rank);
        self.last = Some(LastAssignment { rank, day });
    }

    pub fn status(&self, day: usize, on_duty_today: bool) -> DutyStatus {
        if on_duty_today {
            return DutyStatus::OnDuty;
        }
        let Some(last) = self.last else {
            return DutyStatus::Available;
        };
        match day.checked_sub(last.day) {
            Some(0) => DutyStatus::OnDuty,
            Some(1) if last.rank == Rank::Third => DutyStatus::Exempt,
            Some(1) => DutyStatus::CoolingDown,
            _ => DutyStatus::Available,
        }
    }
}

/// One row of the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRoster {
    pub date: NaiveDate,
    pub label: String,
    pub slots: [Option<String>; 4],
}

impl DayRoster {
    pub fn get(&self, rank: Rank) -> Option<&str> {
        self.slots[rank.index()].as_deref()
    }

    /// The rank `name` holds on this day, if any
    pub fn rank_of(&self, name: &str) -> Option<Rank> {
        Rank::ALL.into_iter().find(|&rank| self.get(rank) == Some(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub month: u32,
    pub year: i32,
    pub days: Vec<DayRoster>,
}

impl Schedule {
    pub fn filled_count(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| d.slots.iter())
            .filter(|s| s.is_some())
            .count()
    }

    /// (day label, rank) pairs nobody could take
    pub fn unfilled_slots(&self) -> Vec<(String, Rank)> {
        self.days
            .iter()
            .flat_map(|d| {
                Rank::ALL
                    .into_iter()
                    .filter(|&rank| d.get(rank).is_none())
                    .map(|rank| (d.label.clone(), rank))
            })
            .collect()
    }
}

/// What one provider requested, was targeted for, and received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderTally {
    pub name: String,
    pub requested: u32,
    pub target: u32,
    pub total: u32,
    pub per_rank: RankCounts,
}

/// Result of one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSchedule {
    pub schedule: Schedule,
    pub providers: Vec<ProviderTally>,
}

impl GeneratedSchedule {
    pub fn tally(&self, name: &str) -> Option<&ProviderTally> {
        self.providers.iter().find(|p| p.name == name)
    }
}
