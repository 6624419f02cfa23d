//! Challenge metrics, recomputed from the full workout history.
//!
//! Every function here is pure: the same history, stats and clock reading
//! always produce the same values.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::challenges::ChallengeId;
use crate::models::{COMPLETION_RATE_WINDOW, ChallengeValue, StatsSnapshot, WorkoutEvent};
use crate::resolver::resolve_tier;

/// current value + tier for all seven challenges
pub fn compute_all(
    workouts: &[WorkoutEvent],
    stats: &StatsSnapshot,
    account_created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> BTreeMap<ChallengeId, ChallengeValue> {
    let mut out = BTreeMap::new();

    let mut put = |id: ChallengeId, raw: f64, stored: u32| {
        out.insert(
            id,
            ChallengeValue {
                current_value: stored,
                current_tier: resolve_tier(id, raw),
                raw_value: raw,
            },
        );
    };

    let total = total_workouts(workouts);
    put(ChallengeId::TotalWorkouts, f64::from(total), total);

    let best = stats.longest_streak;
    put(ChallengeId::BestStreak, f64::from(best), best);

    let exercises = total_exercises(workouts);
    put(ChallengeId::TotalExercises, f64::from(exercises), exercises);

    // tier from the exact rate, stored rounded
    let rate = completion_rate(workouts);
    put(ChallengeId::CompletionRate, rate, rate.round() as u32);

    let weeks = perfect_weeks(workouts);
    put(ChallengeId::PerfectWeeks, f64::from(weeks), weeks);

    let steady = days_without_refusal(workouts);
    put(ChallengeId::DaysWithoutRefusal, f64::from(steady), steady);

    let age = account_age_days(account_created_at, now);
    put(ChallengeId::AccountAge, f64::from(age), age);

    out
}

pub fn total_workouts(workouts: &[WorkoutEvent]) -> u32 {
    workouts.iter().filter(|w| w.counts_as_workout()).count() as u32
}

pub fn total_exercises(workouts: &[WorkoutEvent]) -> u32 {
    workouts.iter().map(|w| w.completed_count() as u32).sum()
}

/// % fully completed among the 30 most recent events, 0 when empty
pub fn completion_rate(workouts: &[WorkoutEvent]) -> f64 {
    let recent = newest_first(workouts);
    let window = &recent[..recent.len().min(COMPLETION_RATE_WINDOW)];
    if window.is_empty() {
        return 0.0;
    }
    let full = window.iter().filter(|w| w.was_fully_completed).count();
    (full * 100) as f64 / window.len() as f64
}

/// 7-event windows spanning at most 7 calendar days where every event counts.
///
/// Each event anchors its own window, so overlapping windows are counted
/// independently.
pub fn perfect_weeks(workouts: &[WorkoutEvent]) -> u32 {
    let mut sorted: Vec<&WorkoutEvent> = workouts.iter().collect();
    sorted.sort_by_key(|w| w.date);

    let mut count = 0;
    for anchor in 0..sorted.len().saturating_sub(6) {
        let start = sorted[anchor].date;
        let end = start + Duration::days(6);

        let lo = sorted.partition_point(|w| w.date < start);
        let hi = sorted.partition_point(|w| w.date <= end);
        let week = &sorted[lo..hi];

        if week.len() == 7 && week.iter().all(|w| w.counts_as_workout()) {
            count += 1;
        }
    }
    count
}

/// events since (not including) the most recent mandatory "wont"
pub fn days_without_refusal(workouts: &[WorkoutEvent]) -> u32 {
    newest_first(workouts)
        .iter()
        .take_while(|w| !w.is_refusal())
        .count() as u32
}

pub fn account_age_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    (now - created_at).num_days().max(0) as u32
}

/// stable: events sharing a timestamp keep insertion order
fn newest_first(workouts: &[WorkoutEvent]) -> Vec<&WorkoutEvent> {
    let mut sorted: Vec<&WorkoutEvent> = workouts.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}
