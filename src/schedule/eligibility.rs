//! Hard constraints and the preference narrowing applied to each (day, rank) slot.
//!
//! Every rule is a standalone predicate; `eligible_candidates` composes them in a
//! fixed order and returns provider indices in ascending order.

use super::normalize::ProviderRequest;
use super::types::{DutyStatus, LastAssignment, ProviderState, Rank};

/// Read-only view of the run state that eligibility is decided against
#[derive(Debug, Clone, Copy)]
pub struct AssignmentView<'a> {
    pub requests: &'a [ProviderRequest],
    pub states: &'a [ProviderState],
    pub assigned_today: &'a [bool],
}

/// Not already holding a rank today
pub fn free_today(assigned_today: bool) -> bool {
    !assigned_today
}

/// Day not marked unavailable
pub fn available_on(request: &ProviderRequest, day: usize) -> bool {
    !request.unavailable.contains(&day)
}

/// Nothing yesterday, or Third yesterday
pub fn clear_of_adjacency(state: &ProviderState, day: usize) -> bool {
    matches!(
        state.status(day, false),
        DutyStatus::Available | DutyStatus::Exempt
    )
}

/// Offered admin availability for the day
pub fn admin_available_on(request: &ProviderRequest, day: usize) -> bool {
    request.admin_available.contains(&day)
}

/// Admin-available and not already on admin duty elsewhere that day
pub fn admin_eligible(request: &ProviderRequest, day: usize) -> bool {
    admin_available_on(request, day) && !request.admin_assigned.contains(&day)
}

/// Did not hold First or Second on the previous day
pub fn not_after_first_or_second(state: &ProviderState, day: usize) -> bool {
    !matches!(
        state.last,
        Some(LastAssignment { rank: Rank::First | Rank::Second, day: last })
            if last + 1 == day
    )
}

fn base_eligible(view: &AssignmentView<'_>, provider: usize, day: usize) -> bool {
    free_today(view.assigned_today[provider])
        && available_on(&view.requests[provider], day)
        && clear_of_adjacency(&view.states[provider], day)
}

fn rank_eligible(view: &AssignmentView<'_>, provider: usize, day: usize, rank: Rank) -> bool {
    match rank {
        Rank::Admin => admin_eligible(&view.requests[provider], day),
        Rank::Third => not_after_first_or_second(&view.states[provider], day),
        Rank::First | Rank::Second => true,
    }
}

/// Restricts on-call candidates to those who prefer the day, when any of them do
pub fn narrow_to_preferred(
    candidates: Vec<usize>,
    requests: &[ProviderRequest],
    day: usize,
    rank: Rank,
) -> Vec<usize> {
    if !rank.is_on_call() {
        return candidates;
    }
    let preferred: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&p| requests[p].prefers(day))
        .collect();
    if preferred.is_empty() {
        candidates
    } else {
        preferred
    }
}

/// Providers from the admin-available pool who may stand in for an unfillable Third slot.
/// The adjacency rule applies unchanged.
fn third_fallback(view: &AssignmentView<'_>, day: usize) -> Vec<usize> {
    (0..view.requests.len())
        .filter(|&p| {
            base_eligible(view, p, day)
                && admin_available_on(&view.requests[p], day)
                && not_after_first_or_second(&view.states[p], day)
        })
        .collect()
}

/// Everyone who may take `rank` on `day`
pub fn eligible_candidates(view: &AssignmentView<'_>, day: usize, rank: Rank) -> Vec<usize> {
    let primary: Vec<usize> = (0..view.requests.len())
        .filter(|&p| base_eligible(view, p, day) && rank_eligible(view, p, day, rank))
        .collect();
    let candidates = narrow_to_preferred(primary, view.requests, day, rank);

    if candidates.is_empty() && rank == Rank::Third {
        let fallback = third_fallback(view, day);
        if !fallback.is_empty() {
            tracing::debug!(day, "Third slot filled from the admin-available pool");
        }
        return narrow_to_preferred(fallback, view.requests, day, rank);
    }

    candidates
}
