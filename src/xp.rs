use chrono::{DateTime, Utc};

use crate::models::{
    PlanDay, SkipReason, StatsSnapshot, XP_FULL_COMPLETION_BONUS, XP_PER_LEVEL, XP_PER_WORKOUT,
};

/// streak lengths worth a telemetry milestone
pub const STREAK_MILESTONES: [u32; 4] = [7, 30, 90, 365];

pub fn calculate_xp(fully_completed: bool) -> u32 {
    if fully_completed {
        XP_PER_WORKOUT + XP_FULL_COMPLETION_BONUS
    } else {
        XP_PER_WORKOUT
    }
}

pub fn calculate_level(total_xp: u32) -> u32 {
    (total_xp / XP_PER_LEVEL) + 1
}

/// 0.0..1.0 progress within current level
pub fn level_progress(total_xp: u32) -> f32 {
    (total_xp % XP_PER_LEVEL) as f32 / XP_PER_LEVEL as f32
}

/// position after `day`, wrapping around the plan
pub fn next_position(day: &PlanDay, plan_len: usize) -> usize {
    if plan_len == 0 {
        return 0;
    }
    (day.position + 1) % plan_len
}

/// apply a logged workout to the snapshot
pub fn record_workout(
    stats: &mut StatsSnapshot,
    day: &PlanDay,
    plan_len: usize,
    any_completed: bool,
    fully_completed: bool,
    now: DateTime<Utc>,
) {
    if any_completed {
        stats.current_streak += 1;
        stats.total_workouts += 1;
        stats.xp += calculate_xp(fully_completed);
        stats.longest_streak = stats.longest_streak.max(stats.current_streak);
        stats.level = calculate_level(stats.xp);
    }

    stats.last_workout_date = Some(now);
    stats.next_day_position = next_position(day, plan_len);
}

/// apply a skip; returns true when the streak was broken
pub fn record_skip(
    stats: &mut StatsSnapshot,
    day: &PlanDay,
    plan_len: usize,
    reason: SkipReason,
    next_day_choice: Option<usize>,
    now: DateTime<Utc>,
) -> bool {
    let streak_broken = day.is_mandatory && reason == SkipReason::Wont;

    if streak_broken {
        stats.longest_streak = stats.longest_streak.max(stats.current_streak);
        stats.current_streak = 0;
    } else if !day.is_mandatory {
        // optional days keep the chain going
        stats.current_streak += 1;
        stats.longest_streak = stats.longest_streak.max(stats.current_streak);
    }

    stats.last_workout_date = Some(now);
    stats.next_day_position = next_day_choice.unwrap_or_else(|| next_position(day, plan_len));
    streak_broken
}

/// milestone hit by moving from `before` to `after`
pub fn streak_milestone(before: u32, after: u32) -> Option<u32> {
    STREAK_MILESTONES
        .into_iter()
        .find(|m| before < *m && after >= *m)
}
