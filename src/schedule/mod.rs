pub mod types;
pub mod period;
pub mod normalize;
pub mod targets;
pub mod eligibility;
pub mod tie_break;
pub mod assigner;
pub mod report;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ScheduleError;
use crate::parser::AvailabilityRecord;

pub use types::{
    DayRoster, DutyStatus, GeneratedSchedule, LastAssignment, ProviderState, ProviderTally, Rank,
    RankCounts, Schedule,
};
pub use period::{day_label, parse_month, Period};
pub use normalize::{normalize_requests, ProviderRequest};
pub use targets::proportional_targets;
pub use assigner::SlotAssigner;
pub use report::{summarize, ProviderSummary, ScheduleReport, UnfilledSlot};

/// Builds the on-call roster for one month
///
/// Pure over its inputs: the same records, period and seed always give the same roster.
pub fn generate_schedule(
    records: &[AvailabilityRecord],
    month: u32,
    year: i32,
    seed: u64,
) -> Result<GeneratedSchedule, ScheduleError> {
    generate_schedule_with_rng(records, month, year, StdRng::seed_from_u64(seed))
}

/// Same as [`generate_schedule`] with a caller-supplied random source for tie-breaks
#[tracing::instrument(skip(records, rng), fields(records = records.len()))]
pub fn generate_schedule_with_rng<R: Rng>(
    records: &[AvailabilityRecord],
    month: u32,
    year: i32,
    rng: R,
) -> Result<GeneratedSchedule, ScheduleError> {
    let period = Period::new(month, year)?;
    let requests = normalize_requests(records, &period)?;
    let targets = proportional_targets(&requests, period.total_slots());

    let (assignments, states) = SlotAssigner::new(&requests, &targets, rng).run(period.num_days());

    let name_of = |slot: Option<usize>| slot.map(|p| requests[p].name.clone());
    let days: Vec<DayRoster> = period
        .dates()
        .zip(assignments)
        .map(|(date, slots)| DayRoster {
            date,
            label: day_label(date),
            slots: slots.map(name_of),
        })
        .collect();

    let providers: Vec<ProviderTally> = requests
        .iter()
        .zip(targets.iter().zip(states))
        .map(|(request, (&target, state))| ProviderTally {
            name: request.name.clone(),
            requested: request.requested,
            target,
            total: state.total,
            per_rank: state.per_rank,
        })
        .collect();

    let schedule = Schedule { month, year, days };
    let filled = schedule.filled_count();
    tracing::info!(
        providers = providers.len(),
        filled,
        unfilled = period.total_slots() - filled,
        "Generated on-call schedule"
    );

    Ok(GeneratedSchedule { schedule, providers })
}
