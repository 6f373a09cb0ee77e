use serde::{Deserialize, Serialize};

use super::tie_break::fairness_gap;
use super::types::{GeneratedSchedule, Rank, RankCounts};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub name: String,
    pub requested: u32,
    pub target: u32,
    pub assigned: u32,
    /// Assigned minus target
    pub deviation: i64,
    pub per_rank: RankCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnfilledSlot {
    pub date: String,
    pub rank: Rank,
}

/// Fairness and coverage view of a generated roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub month: u32,
    pub year: i32,
    pub total_slots: usize,
    pub filled_slots: usize,
    pub unfilled: Vec<UnfilledSlot>,
    pub providers: Vec<ProviderSummary>,
}

impl ScheduleReport {
    pub fn unfilled_count(&self) -> usize {
        self.unfilled.len()
    }

    /// Largest distance from target across providers
    pub fn max_deviation(&self) -> i64 {
        self.providers
            .iter()
            .map(|p| p.deviation.abs())
            .max()
            .unwrap_or(0)
    }
}

pub fn summarize(generated: &GeneratedSchedule) -> ScheduleReport {
    let schedule = &generated.schedule;
    let unfilled: Vec<UnfilledSlot> = schedule
        .unfilled_slots()
        .into_iter()
        .map(|(date, rank)| UnfilledSlot { date, rank })
        .collect();

    let providers = generated
        .providers
        .iter()
        .map(|p| ProviderSummary {
            name: p.name.clone(),
            requested: p.requested,
            target: p.target,
            assigned: p.total,
            deviation: -fairness_gap(p.target, p.total),
            per_rank: p.per_rank,
        })
        .collect();

    ScheduleReport {
        month: schedule.month,
        year: schedule.year,
        total_slots: schedule.days.len() * Rank::ALL.len(),
        filled_slots: schedule.filled_count(),
        unfilled,
        providers,
    }
}
