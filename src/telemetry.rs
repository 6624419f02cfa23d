use tracing::info;

use crate::challenges::ChallengeId;
use crate::models::SkipReason;
use crate::tiers::Tier;

/// product analytics events
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryEvent {
    WorkoutCompleted {
        cycle_id: String,
        day_position: usize,
        exercises_completed: usize,
        is_first_workout: bool,
    },
    WorkoutSkipped {
        cycle_id: String,
        day_position: usize,
        reason: SkipReason,
    },
    AchievementUnlocked {
        challenge: ChallengeId,
        tier: Tier,
    },
    AchievementsViewed,
    CycleCreated {
        cycle_id: String,
        days: usize,
    },
    CycleEdited {
        cycle_id: String,
    },
    FeedbackSubmitted,
    RatingSubmitted {
        rating: u8,
        has_comment: bool,
    },
    StreakMilestone {
        streak_days: u32,
    },
}

impl TelemetryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TelemetryEvent::WorkoutCompleted { .. } => "workout_completed",
            TelemetryEvent::WorkoutSkipped { .. } => "workout_skipped",
            TelemetryEvent::AchievementUnlocked { .. } => "achievement_unlocked",
            TelemetryEvent::AchievementsViewed => "achievements_viewed",
            TelemetryEvent::CycleCreated { .. } => "cycle_created",
            TelemetryEvent::CycleEdited { .. } => "cycle_edited",
            TelemetryEvent::FeedbackSubmitted => "feedback_submitted",
            TelemetryEvent::RatingSubmitted { .. } => "rating_submitted",
            TelemetryEvent::StreakMilestone { .. } => "streak_milestone",
        }
    }
}

/// fire-and-forget sink; implementations must not fail the caller
pub trait Telemetry {
    fn track(&self, event: TelemetryEvent);
}

/// emits events as `tracing` records under `truestreak::telemetry`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn track(&self, event: TelemetryEvent) {
        let name = event.name();
        match event {
            TelemetryEvent::WorkoutCompleted {
                cycle_id,
                day_position,
                exercises_completed,
                is_first_workout,
            } => info!(
                target: "truestreak::telemetry",
                event = name,
                %cycle_id,
                day_position,
                exercises_completed,
                is_first_workout
            ),
            TelemetryEvent::WorkoutSkipped {
                cycle_id,
                day_position,
                reason,
            } => info!(
                target: "truestreak::telemetry",
                event = name,
                %cycle_id,
                day_position,
                reason = reason.as_str()
            ),
            TelemetryEvent::AchievementUnlocked { challenge, tier } => info!(
                target: "truestreak::telemetry",
                event = name,
                challenge = challenge.as_str(),
                tier = tier.id()
            ),
            TelemetryEvent::CycleCreated { cycle_id, days } => {
                info!(target: "truestreak::telemetry", event = name, %cycle_id, days)
            }
            TelemetryEvent::CycleEdited { cycle_id } => {
                info!(target: "truestreak::telemetry", event = name, %cycle_id)
            }
            TelemetryEvent::RatingSubmitted { rating, has_comment } => {
                info!(target: "truestreak::telemetry", event = name, rating, has_comment)
            }
            TelemetryEvent::StreakMilestone { streak_days } => info!(
                target: "truestreak::telemetry",
                event = name,
                streak_days,
                milestone_type = milestone_type(streak_days)
            ),
            TelemetryEvent::AchievementsViewed | TelemetryEvent::FeedbackSubmitted => {
                info!(target: "truestreak::telemetry", event = name)
            }
        }
    }
}

/// discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn track(&self, _event: TelemetryEvent) {}
}

fn milestone_type(days: u32) -> &'static str {
    match days {
        7 => "week",
        30 => "month",
        90 => "quarter",
        365 => "year",
        _ => "custom",
    }
}
