use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::challenges::ChallengeId;
use crate::tiers::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipReason {
    /// unable to train; never counts against discipline
    Cant,
    /// declined; breaks streaks on mandatory days
    Wont,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Cant => "cant",
            SkipReason::Wont => "wont",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cant" => Some(SkipReason::Cant),
            "wont" => Some(SkipReason::Wont),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedExercise {
    pub exercise_id: String,
    pub exercise_name: String,
    pub completed: bool,
}

/// one logged or skipped workout, immutable once appended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEvent {
    pub id: String,
    pub cycle_id: String,
    pub day_id: String,
    #[serde(default)]
    pub day_name: String,
    #[serde(default)]
    pub day_position: usize,
    pub date: DateTime<Utc>,
    pub completed_exercises: Vec<CompletedExercise>,
    pub was_fully_completed: bool,
    pub was_mandatory: bool,
    pub skipped_reason: Option<SkipReason>,
    #[serde(default)]
    pub notes: String,
}

impl WorkoutEvent {
    pub fn completed_count(&self) -> usize {
        self.completed_exercises.iter().filter(|e| e.completed).count()
    }

    pub fn has_any_completed(&self) -> bool {
        self.completed_exercises.iter().any(|e| e.completed)
    }

    /// counts toward totals and perfect weeks
    pub fn counts_as_workout(&self) -> bool {
        self.was_fully_completed || self.has_any_completed()
    }

    pub fn is_refusal(&self) -> bool {
        self.was_mandatory && self.skipped_reason == Some(SkipReason::Wont)
    }

    /// closes the calendar day for further submissions
    pub fn closes_day(&self) -> bool {
        self.has_any_completed() || self.skipped_reason.is_some()
    }
}

/// running aggregate, updated per event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_workouts: u32,
    pub xp: u32,
    pub level: u32,
    pub last_workout_date: Option<DateTime<Utc>>,
    pub next_day_position: usize,
}

impl Default for StatsSnapshot {
    fn default() -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            total_workouts: 0,
            xp: 0,
            level: 1,
            last_workout_date: None,
            next_day_position: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sets_reps: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDay {
    pub id: String,
    pub position: usize,
    pub name: String,
    pub is_mandatory: bool,
    pub exercises: Vec<Exercise>,
}

/// a workout cycle; at most one is active per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current_position: usize,
    pub days: Vec<PlanDay>,
}

impl Plan {
    pub fn day(&self, day_id: &str) -> Option<&PlanDay> {
        self.days.iter().find(|d| d.id == day_id)
    }
}

/// client-supplied exercise, ids optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseInput {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub sets_reps: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// client-supplied plan day, ids optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayInput {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub is_mandatory: bool,
    #[serde(default)]
    pub exercises: Vec<ExerciseInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierHistoryEntry {
    pub tier: Tier,
    pub unlocked_at: DateTime<Utc>,
    pub viewed: bool,
}

/// persisted per-challenge state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeState {
    pub current_tier: Tier,
    pub current_value: u32,
    #[serde(default)]
    pub tier_history: Vec<TierHistoryEntry>,
}

impl ChallengeState {
    pub fn unviewed_count(&self) -> usize {
        self.tier_history.iter().filter(|t| !t.viewed).count()
    }

    pub fn has_reached(&self, tier: Tier) -> bool {
        self.tier_history.iter().any(|t| t.tier == tier)
    }
}

pub type ChallengeMap = BTreeMap<ChallengeId, ChallengeState>;

/// freshly computed value + tier for one challenge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeValue {
    pub current_value: u32,
    pub current_tier: Tier,
    /// unrounded metric the tier was resolved from; never stored
    #[serde(skip)]
    pub raw_value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierUpEvent {
    pub challenge_id: ChallengeId,
    pub tier: Tier,
    pub previous_tier: Tier,
    pub value: u32,
    pub unlocked_at: DateTime<Utc>,
    pub viewed: bool,
}

/// everything stored for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub workouts: Vec<WorkoutEvent>,
    #[serde(default)]
    pub stats: StatsSnapshot,
    #[serde(default)]
    pub challenges: ChallengeMap,
    #[serde(default)]
    pub cycles: Vec<Plan>,
}

impl UserDocument {
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            workouts: Vec::new(),
            stats: StatsSnapshot::default(),
            challenges: ChallengeMap::new(),
            cycles: Vec::new(),
        }
    }

    pub fn active_cycle(&self) -> Option<&Plan> {
        self.cycles.iter().find(|c| c.is_active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    New,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub user_id: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub status: SubmissionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub user_id: String,
    pub rating: u8,
    pub comment: Option<String>,
    pub allow_public_share: bool,
    pub created_at: DateTime<Utc>,
    pub status: SubmissionStatus,
}

/// xp for a workout with any completed exercise
pub const XP_PER_WORKOUT: u32 = 10;
/// extra xp when every exercise is done
pub const XP_FULL_COMPLETION_BONUS: u32 = 5;
pub const XP_PER_LEVEL: u32 = 100;
pub const COMPLETION_RATE_WINDOW: usize = 30;
pub const DEFAULT_HISTORY_LIMIT: usize = 30;
