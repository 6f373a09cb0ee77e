use rand::seq::SliceRandom;
use rand::Rng;

use super::types::ProviderState;

/// How far a provider sits below (positive) or above (negative) their fair share
pub fn fairness_gap(target: u32, assigned: u32) -> i64 {
    i64::from(target) - i64::from(assigned)
}

/// Picks the candidate furthest below target, breaking ties with `rng`
///
/// `candidates` must be in a stable order for a seeded `rng` to reproduce the pick.
pub fn pick_candidate<R: Rng + ?Sized>(
    candidates: &[usize],
    targets: &[u32],
    states: &[ProviderState],
    rng: &mut R,
) -> Option<usize> {
    let gap = |p: usize| fairness_gap(targets[p], states[p].total);

    let best = candidates.iter().map(|&p| gap(p)).max()?;
    let leaders: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&p| gap(p) == best)
        .collect();

    leaders.choose(rng).copied()
}
