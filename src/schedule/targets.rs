use super::normalize::ProviderRequest;

/// Rounds `requested / sum * total_slots` to the nearest integer, halves away from zero
pub fn proportional_share(requested: u32, sum: u64, total_slots: u64) -> u32 {
    if sum == 0 {
        return 0;
    }
    let numerator = 2 * u64::from(requested) * total_slots + sum;
    (numerator / (2 * sum)) as u32
}

/// Fair-share slot counts, aligned with `requests`
pub fn proportional_targets(requests: &[ProviderRequest], total_slots: usize) -> Vec<u32> {
    let sum: u64 = requests.iter().map(|r| u64::from(r.requested)).sum();
    requests
        .iter()
        .map(|r| proportional_share(r.requested, sum, total_slots as u64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_targets_follow_requested_ratio() {
        let requests = vec![request("a", 10), request("b", 5), request("c", 5)];
        assert_eq!(proportional_targets(&requests, 40), vec![20, 10, 10]);
    }

    #[test]
    fn test_zero_demand_gives_zero_targets() {
        let requests = vec![request("a", 0), request("b", 0)];
        assert_eq!(proportional_targets(&requests, 120), vec![0, 0]);
    }

    #[test]
    fn test_halves_round_away_from_zero() {
        // 1/4 of 10 = 2.5, 3/4 of 10 = 7.5
        assert_eq!(proportional_share(1, 4, 10), 3);
        assert_eq!(proportional_share(3, 4, 10), 8);
        // 1/3 of 10 = 3.33, 2/3 of 10 = 6.67
        assert_eq!(proportional_share(1, 3, 10), 3);
        assert_eq!(proportional_share(2, 3, 10), 7);
    }
}
