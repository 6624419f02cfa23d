use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::challenges::ChallengeId;
use crate::detector::{apply_tier_ups, detect_tier_ups, refresh_live_values};
use crate::error::ApiResult;
use crate::metrics::compute_all;
use crate::models::{ChallengeValue, TierHistoryEntry, TierUpEvent, UserDocument};
use crate::resolver::{NextTier, next_tier, progress_fraction};
use crate::service::{Caller, TrueStreak};
use crate::store::{Clock, DocumentStore};
use crate::telemetry::{Telemetry, TelemetryEvent};
use crate::tiers::Tier;

/// one challenge as shown on the achievements screen
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeView {
    pub id: ChallengeId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub is_percentage: bool,
    pub current_tier: Tier,
    pub current_value: u32,
    pub formatted_value: String,
    pub progress: f64,
    pub next_tier: Option<NextTier>,
    pub tier_history: Vec<TierHistoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserChallengesResponse {
    pub challenges: BTreeMap<ChallengeId, ChallengeView>,
    pub unviewed_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkViewedResponse {
    pub success: bool,
}

fn view(id: ChallengeId, value: ChallengeValue, tier_history: Vec<TierHistoryEntry>) -> ChallengeView {
    let def = id.definition();
    ChallengeView {
        id,
        name: def.name,
        description: def.description,
        icon: def.icon,
        is_percentage: def.is_percentage,
        current_tier: value.current_tier,
        current_value: value.current_value,
        formatted_value: id.format_value(value.current_value),
        progress: progress_fraction(id, value.raw_value, value.current_tier),
        next_tier: next_tier(id, value.current_tier),
        tier_history,
    }
}

impl<S: DocumentStore, T: Telemetry, C: Clock> TrueStreak<S, T, C> {
    /// fresh values merged with stored history; read-only
    pub fn get_user_challenges(&self, caller: &Caller) -> ApiResult<UserChallengesResponse> {
        let user_id = caller.require()?;
        let mut doc = self.load_user(user_id)?;
        let fresh = compute_all(&doc.workouts, &doc.stats, doc.created_at, self.clock.now());

        let challenges: BTreeMap<ChallengeId, ChallengeView> = fresh
            .into_iter()
            .map(|(id, value)| {
                let history = doc
                    .challenges
                    .remove(&id)
                    .map(|s| s.tier_history)
                    .unwrap_or_default();
                (id, view(id, value, history))
            })
            .collect();

        let unviewed_count = challenges
            .values()
            .flat_map(|c| &c.tier_history)
            .filter(|t| !t.viewed)
            .count();

        Ok(UserChallengesResponse {
            challenges,
            unviewed_count,
        })
    }

    pub fn mark_achievements_as_viewed(&self, caller: &Caller) -> ApiResult<MarkViewedResponse> {
        let user_id = caller.require()?;
        let mut doc = self.load_user(user_id)?;

        let mut flipped = 0;
        for entry in doc.challenges.values_mut().flat_map(|c| c.tier_history.iter_mut()) {
            if !entry.viewed {
                entry.viewed = true;
                flipped += 1;
            }
        }
        self.store.update_challenges(user_id, &doc.challenges)?;

        info!(user_id, flipped, "achievements marked as viewed");
        self.telemetry.track(TelemetryEvent::AchievementsViewed);
        Ok(MarkViewedResponse { success: true })
    }

    /// recompute, detect and persist tier-ups for an already stored workout
    pub(crate) fn update_challenges_after_workout(&self, user_id: &str) -> ApiResult<Vec<TierUpEvent>> {
        let mut doc: UserDocument = self.load_user(user_id)?;
        let now = self.clock.now();

        let fresh = compute_all(&doc.workouts, &doc.stats, doc.created_at, now);
        let tier_ups = detect_tier_ups(&doc.challenges, &fresh, now);
        debug!(user_id, tier_ups = tier_ups.len(), "challenges recomputed");

        refresh_live_values(&mut doc.challenges, &fresh);
        apply_tier_ups(&mut doc.challenges, &tier_ups);
        self.store.update_challenges(user_id, &doc.challenges)?;

        for tier_up in &tier_ups {
            info!(
                user_id,
                challenge = tier_up.challenge_id.as_str(),
                tier = tier_up.tier.id(),
                "tier unlocked"
            );
            self.telemetry.track(TelemetryEvent::AchievementUnlocked {
                challenge: tier_up.challenge_id,
                tier: tier_up.tier,
            });
        }

        Ok(tier_ups)
    }
}
