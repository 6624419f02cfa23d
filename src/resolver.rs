//! Threshold lookups: value → tier, next tier, progress toward it.

use serde::{Deserialize, Serialize};

use crate::challenges::ChallengeId;
use crate::tiers::{TIER_ORDER, Tier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextTier {
    pub tier: Tier,
    pub required_value: u32,
}

/// highest tier whose threshold is <= value
pub fn resolve_tier(challenge: ChallengeId, value: f64) -> Tier {
    TIER_ORDER
        .iter()
        .rev()
        .find(|tier| value >= f64::from(challenge.threshold(**tier)))
        .copied()
        .unwrap_or(Tier::SemRanking)
}

/// tier after `current` and its threshold, None when maxed
pub fn next_tier(challenge: ChallengeId, current: Tier) -> Option<NextTier> {
    current.next().map(|tier| NextTier {
        tier,
        required_value: challenge.threshold(tier),
    })
}

/// 0..=100 progress from the current tier's threshold to the next one
pub fn progress_fraction(challenge: ChallengeId, current_value: f64, current: Tier) -> f64 {
    let Some(next) = next_tier(challenge, current) else {
        return 100.0;
    };

    let floor = f64::from(challenge.threshold(current));
    let ceiling = f64::from(next.required_value);
    if ceiling <= floor {
        // flat step in the table, nothing left to cover
        return if current_value >= ceiling { 100.0 } else { 0.0 };
    }

    let progress = (current_value - floor) / (ceiling - floor) * 100.0;
    progress.clamp(0.0, 100.0)
}
