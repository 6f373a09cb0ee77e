use rand::Rng;

use super::eligibility::{eligible_candidates, AssignmentView};
use super::normalize::ProviderRequest;
use super::tie_break::pick_candidate;
use super::types::{ProviderState, Rank};

/// Provider index per rank, for one day
pub type DayAssignment = [Option<usize>; 4];

/// Walks every (day, rank) pair in order and commits one pick per slot
pub struct SlotAssigner<'a, R> {
    requests: &'a [ProviderRequest],
    targets: &'a [u32],
    states: Vec<ProviderState>,
    assigned_today: Vec<bool>,
    rng: R,
}

impl<'a, R: Rng> SlotAssigner<'a, R> {
    pub fn new(requests: &'a [ProviderRequest], targets: &'a [u32], rng: R) -> Self {
        Self {
            requests,
            targets,
            states: vec![ProviderState::default(); requests.len()],
            assigned_today: vec![false; requests.len()],
            rng,
        }
    }

    /// Fills `num_days` days and returns them along with the final per-provider state
    pub fn run(mut self, num_days: usize) -> (Vec<DayAssignment>, Vec<ProviderState>) {
        let days = (0..num_days).map(|day| self.fill_day(day)).collect();
        (days, self.states)
    }

    fn fill_day(&mut self, day: usize) -> DayAssignment {
        self.assigned_today.iter_mut().for_each(|a| *a = false);

        let mut slots: DayAssignment = [None; 4];
        for rank in Rank::ALL {
            let view = AssignmentView {
                requests: self.requests,
                states: &self.states,
                assigned_today: &self.assigned_today,
            };
            let candidates = eligible_candidates(&view, day, rank);
            match pick_candidate(&candidates, self.targets, &self.states, &mut self.rng) {
                Some(provider) => {
                    self.commit(provider, day, rank);
                    slots[rank.index()] = Some(provider);
                }
                None => {
                    tracing::debug!(day, %rank, "No eligible provider, slot left unfilled");
                }
            }
        }
        slots
    }

    fn commit(&mut self, provider: usize, day: usize, rank: Rank) {
        self.states[provider].record(rank, day);
        self.assigned_today[provider] = true;
        tracing::trace!(day, %rank, provider = %self.requests[provider].name, "Assigned");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn request(name: &str, requested: u32) -> ProviderRequest {
        ProviderRequest {
            name: name.to_string(),
            requested,
            unavailable: BTreeSet::new(),
            admin_available: BTreeSet::new(),
            admin_assigned: BTreeSet::new(),
            preferred: BTreeSet::new(),
        }
    }

    #[test]
    fn test_single_provider_alternates_through_third() {
        // Alone, a provider can only take First; the next day is locked.
        let requests = vec![request("solo", 1)];
        let targets = vec![4];
        let (days, states) = SlotAssigner::new(&requests, &targets, StdRng::seed_from_u64(3)).run(4);

        assert_eq!(days[0], [Some(0), None, None, None]);
        assert_eq!(days[1], [None, None, None, None]);
        assert_eq!(days[2], [Some(0), None, None, None]);
        assert_eq!(states[0].total, 2);
    }

    #[test]
    fn test_third_holder_may_return_next_day() {
        // Three providers fill First..Third; only the Third holder can work day 1.
        let requests = vec![request("a", 1), request("b", 1), request("c", 1)];
        let targets = vec![4, 4, 4];
        let (days, states) = SlotAssigner::new(&requests, &targets, StdRng::seed_from_u64(11)).run(2);

        let third = days[0][Rank::Third.index()].unwrap();
        assert_eq!(days[0][Rank::Admin.index()], None);
        assert_eq!(days[1][Rank::First.index()], Some(third));
        assert_eq!(days[1][Rank::Second.index()], None);
        assert_eq!(states.iter().map(|s| s.total).sum::<u32>(), 4);
    }
}
