use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::challenges::ChallengeId;
use crate::models::{ChallengeMap, ChallengeState, ChallengeValue, TierHistoryEntry, TierUpEvent};
use crate::tiers::Tier;

/// one event per tier crossed between `old` and `new`.
///
/// Challenges missing from `old` start at `SemRanking`. Tiers already in
/// a challenge's history are not emitted again. Events for a challenge are
/// ascending; all share `now`.
pub fn detect_tier_ups(
    old: &ChallengeMap,
    new: &BTreeMap<ChallengeId, ChallengeValue>,
    now: DateTime<Utc>,
) -> Vec<TierUpEvent> {
    let mut tier_ups = Vec::new();

    for (id, fresh) in new {
        let previous = old.get(id);
        let old_index = previous.map(|s| s.current_tier).unwrap_or_default().index();
        let new_index = fresh.current_tier.index();

        for index in (old_index + 1)..=new_index {
            let (Some(tier), Some(previous_tier)) = (Tier::from_index(index), Tier::from_index(index - 1))
            else {
                continue;
            };
            if previous.is_some_and(|s| s.has_reached(tier)) {
                continue;
            }
            tier_ups.push(TierUpEvent {
                challenge_id: *id,
                tier,
                previous_tier,
                value: fresh.current_value,
                unlocked_at: now,
                viewed: false,
            });
        }
    }

    tier_ups
}

/// fold detected tier-ups into persisted state.
///
/// History only ever grows, and a tier already in history is not added twice.
pub fn apply_tier_ups(state: &mut ChallengeMap, tier_ups: &[TierUpEvent]) {
    for tier_up in tier_ups {
        let entry = state.entry(tier_up.challenge_id).or_insert_with(|| ChallengeState {
            current_tier: tier_up.tier,
            current_value: tier_up.value,
            tier_history: Vec::new(),
        });

        entry.current_tier = tier_up.tier;
        entry.current_value = tier_up.value;

        if !entry.has_reached(tier_up.tier) {
            entry.tier_history.push(TierHistoryEntry {
                tier: tier_up.tier,
                unlocked_at: tier_up.unlocked_at,
                viewed: false,
            });
        }
    }
}

/// overwrite live tier/value with fresh results, keeping history
pub fn refresh_live_values(state: &mut ChallengeMap, fresh: &BTreeMap<ChallengeId, ChallengeValue>) {
    for (id, value) in fresh {
        let entry = state.entry(*id).or_default();
        entry.current_tier = value.current_tier;
        entry.current_value = value.current_value;
    }
}
