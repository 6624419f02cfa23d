use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    CompletedExercise, DEFAULT_HISTORY_LIMIT, PlanDay, SkipReason, StatsSnapshot, TierUpEvent,
    UserDocument, WorkoutEvent,
};
use crate::service::{Caller, TrueStreak};
use crate::store::{Clock, DocumentStore};
use crate::telemetry::{Telemetry, TelemetryEvent};
use crate::validation::{require_id, validate_completed_exercises};
use crate::xp::{level_progress, record_skip, record_workout, streak_milestone};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogWorkoutRequest {
    pub cycle_id: String,
    pub day_id: String,
    pub completed_exercises: Vec<CompletedExercise>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogWorkoutResponse {
    pub success: bool,
    pub workout: WorkoutEvent,
    pub stats: StatsSnapshot,
    pub tier_ups: Vec<TierUpEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipWorkoutRequest {
    pub cycle_id: String,
    pub day_id: String,
    /// "cant" or "wont"
    pub reason: String,
    #[serde(default)]
    pub next_day_choice: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipWorkoutResponse {
    pub success: bool,
    pub streak_broken: bool,
    /// mandatory days let the user pick where to resume
    pub needs_next_day_choice: bool,
    pub stats: StatsSnapshot,
    pub tier_ups: Vec<TierUpEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutHistoryResponse {
    pub success: bool,
    pub workouts: Vec<WorkoutEvent>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub success: bool,
    pub stats: StatsSnapshot,
    /// 0.0..1.0 through the current level
    pub level_progress: f32,
}

/// the active plan's day, plus the plan length
fn locate_day(doc: &UserDocument, cycle_id: &str, day_id: &str) -> ApiResult<(PlanDay, usize)> {
    let cycle = doc
        .active_cycle()
        .filter(|c| c.id == cycle_id)
        .ok_or_else(|| ApiError::not_found("Ciclo ativo não encontrado"))?;
    let day = cycle
        .day(day_id)
        .ok_or_else(|| ApiError::not_found("Dia não encontrado"))?;
    Ok((day.clone(), cycle.days.len()))
}

/// one closing event per UTC calendar day
fn ensure_day_open(workouts: &[WorkoutEvent], now: DateTime<Utc>) -> ApiResult<()> {
    let today = now.date_naive();
    if workouts
        .iter()
        .any(|w| w.date.date_naive() == today && w.closes_day())
    {
        return Err(ApiError::AlreadyExists("Você já treinou hoje".to_string()));
    }
    Ok(())
}

impl<S: DocumentStore, T: Telemetry, C: Clock> TrueStreak<S, T, C> {
    pub fn log_workout(&self, caller: &Caller, req: LogWorkoutRequest) -> ApiResult<LogWorkoutResponse> {
        let user_id = caller.require()?;
        require_id(&req.cycle_id, "cycleId")?;
        require_id(&req.day_id, "dayId")?;
        validate_completed_exercises(&req.completed_exercises)?;

        let mut doc = self.load_user(user_id)?;
        let (day, plan_len) = locate_day(&doc, &req.cycle_id, &req.day_id)?;
        let now = self.clock.now();
        ensure_day_open(&doc.workouts, now)?;

        let was_fully_completed = req.completed_exercises.iter().all(|e| e.completed);
        let any_completed = req.completed_exercises.iter().any(|e| e.completed);

        let workout = WorkoutEvent {
            id: format!("workout-{}", Uuid::new_v4()),
            cycle_id: req.cycle_id,
            day_id: day.id.clone(),
            day_name: day.name.clone(),
            day_position: day.position,
            date: now,
            completed_exercises: req.completed_exercises,
            was_fully_completed,
            was_mandatory: day.is_mandatory,
            skipped_reason: None,
            notes: req.notes.unwrap_or_default().trim().to_string(),
        };

        let streak_before = doc.stats.current_streak;
        let is_first_workout = any_completed && doc.stats.total_workouts == 0;
        record_workout(&mut doc.stats, &day, plan_len, any_completed, was_fully_completed, now);
        doc.workouts.push(workout.clone());
        self.store
            .update_workouts_and_stats(user_id, &doc.workouts, &doc.stats)?;

        info!(
            user_id,
            workout_id = %workout.id,
            completed = workout.completed_count(),
            streak = doc.stats.current_streak,
            "workout logged"
        );
        self.telemetry.track(TelemetryEvent::WorkoutCompleted {
            cycle_id: workout.cycle_id.clone(),
            day_position: workout.day_position,
            exercises_completed: workout.completed_count(),
            is_first_workout,
        });
        self.track_milestone(streak_before, doc.stats.current_streak);

        let tier_ups = self.tier_ups_best_effort(user_id);
        Ok(LogWorkoutResponse {
            success: true,
            workout,
            stats: doc.stats,
            tier_ups,
        })
    }

    pub fn skip_workout(&self, caller: &Caller, req: SkipWorkoutRequest) -> ApiResult<SkipWorkoutResponse> {
        let user_id = caller.require()?;
        require_id(&req.cycle_id, "cycleId")?;
        require_id(&req.day_id, "dayId")?;
        let reason = SkipReason::from_str(&req.reason)
            .ok_or_else(|| ApiError::invalid("reason deve ser \"cant\" ou \"wont\""))?;

        let mut doc = self.load_user(user_id)?;
        let (day, plan_len) = locate_day(&doc, &req.cycle_id, &req.day_id)?;
        if req.next_day_choice.is_some_and(|choice| choice >= plan_len) {
            return Err(ApiError::invalid("nextDayChoice fora do ciclo"));
        }
        let now = self.clock.now();
        ensure_day_open(&doc.workouts, now)?;

        let skip = WorkoutEvent {
            id: format!("workout-{}", Uuid::new_v4()),
            cycle_id: req.cycle_id,
            day_id: day.id.clone(),
            day_name: day.name.clone(),
            day_position: day.position,
            date: now,
            completed_exercises: Vec::new(),
            was_fully_completed: false,
            was_mandatory: day.is_mandatory,
            skipped_reason: Some(reason),
            notes: String::new(),
        };

        let streak_before = doc.stats.current_streak;
        let streak_broken = record_skip(&mut doc.stats, &day, plan_len, reason, req.next_day_choice, now);
        doc.workouts.push(skip.clone());
        self.store
            .update_workouts_and_stats(user_id, &doc.workouts, &doc.stats)?;

        if streak_broken {
            warn!(user_id, lost = streak_before, "streak broken");
        }
        info!(user_id, reason = reason.as_str(), day = day.position, "workout skipped");
        self.telemetry.track(TelemetryEvent::WorkoutSkipped {
            cycle_id: skip.cycle_id,
            day_position: skip.day_position,
            reason,
        });
        self.track_milestone(streak_before, doc.stats.current_streak);

        let tier_ups = self.tier_ups_best_effort(user_id);
        Ok(SkipWorkoutResponse {
            success: true,
            streak_broken,
            needs_next_day_choice: day.is_mandatory,
            stats: doc.stats,
            tier_ups,
        })
    }

    /// newest first, `limit` defaults to 30
    pub fn get_workout_history(&self, caller: &Caller, limit: Option<usize>) -> ApiResult<WorkoutHistoryResponse> {
        let user_id = caller.require()?;
        let mut workouts = self.load_user(user_id)?.workouts;
        workouts.sort_by(|a, b| b.date.cmp(&a.date));
        workouts.truncate(limit.unwrap_or(DEFAULT_HISTORY_LIMIT));
        Ok(WorkoutHistoryResponse {
            success: true,
            workouts,
        })
    }

    pub fn get_current_stats(&self, caller: &Caller) -> ApiResult<StatsResponse> {
        let user_id = caller.require()?;
        let doc = self.load_user(user_id)?;
        Ok(StatsResponse {
            success: true,
            level_progress: level_progress(doc.stats.xp),
            stats: doc.stats,
        })
    }

    fn track_milestone(&self, before: u32, after: u32) {
        if let Some(streak_days) = streak_milestone(before, after) {
            self.telemetry.track(TelemetryEvent::StreakMilestone { streak_days });
        }
    }

    /// the workout is already stored; a challenge failure only costs the tier-ups
    fn tier_ups_best_effort(&self, user_id: &str) -> Vec<TierUpEvent> {
        match self.update_challenges_after_workout(user_id) {
            Ok(tier_ups) => tier_ups,
            Err(err) => {
                error!(user_id, error = %err, "failed to update challenges");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::challenges::ChallengeId;
    use crate::db::SqliteStore;
    use crate::error::StoreError;
    use crate::handlers::CreateCycleRequest;
    use crate::models::{ChallengeMap, Feedback, Plan, Review};
    use crate::service::testing::{RecordingTelemetry, TestApp, app, caller, day_input, start};
    use crate::store::ManualClock;
    use crate::tiers::Tier;

    /// two-day plan: mandatory A (2 exercises), optional B (1 exercise)
    fn with_plan() -> (TestApp, Plan) {
        let app = app();
        let res = app
            .create_cycle(
                &caller(),
                CreateCycleRequest {
                    name: "ABC".to_string(),
                    days: vec![
                        day_input("Treino A", true, &["Supino", "Remada"]),
                        day_input("Treino B", false, &["Agachamento"]),
                    ],
                },
            )
            .unwrap();
        (app, res.cycle)
    }

    fn done(day: &PlanDay, completed: bool) -> Vec<CompletedExercise> {
        day.exercises
            .iter()
            .map(|e| CompletedExercise {
                exercise_id: e.id.clone(),
                exercise_name: e.name.clone(),
                completed,
            })
            .collect()
    }

    fn log(app: &TestApp, plan: &Plan, position: usize, completed: bool) -> ApiResult<LogWorkoutResponse> {
        let day = &plan.days[position];
        app.log_workout(
            &caller(),
            LogWorkoutRequest {
                cycle_id: plan.id.clone(),
                day_id: day.id.clone(),
                completed_exercises: done(day, completed),
                notes: None,
            },
        )
    }

    fn skip(app: &TestApp, plan: &Plan, position: usize, reason: &str) -> ApiResult<SkipWorkoutResponse> {
        app.skip_workout(
            &caller(),
            SkipWorkoutRequest {
                cycle_id: plan.id.clone(),
                day_id: plan.days[position].id.clone(),
                reason: reason.to_string(),
                next_day_choice: None,
            },
        )
    }

    #[test]
    fn test_log_full_workout() {
        let (app, plan) = with_plan();
        let res = log(&app, &plan, 0, true).unwrap();

        assert!(res.workout.was_fully_completed);
        assert_eq!(res.workout.day_name, "Treino A");
        assert!(res.workout.id.starts_with("workout-"));
        assert_eq!(res.stats.current_streak, 1);
        assert_eq!(res.stats.xp, 15);
        assert_eq!(res.stats.next_day_position, 1);

        // first workout ever unlocks the first tiers
        let total: Vec<Tier> = res
            .tier_ups
            .iter()
            .filter(|t| t.challenge_id == ChallengeId::TotalWorkouts)
            .map(|t| t.tier)
            .collect();
        assert_eq!(total, vec![Tier::Cobre]);

        let names = app.telemetry.names();
        assert!(names.contains(&"workout_completed"));
        assert!(names.contains(&"achievement_unlocked"));
    }

    #[test]
    fn test_partial_workout_gives_base_xp() {
        let (app, plan) = with_plan();
        let day = &plan.days[0];
        let mut exercises = done(day, true);
        exercises[1].completed = false;
        let res = app
            .log_workout(
                &caller(),
                LogWorkoutRequest {
                    cycle_id: plan.id.clone(),
                    day_id: day.id.clone(),
                    completed_exercises: exercises,
                    notes: Some(" pesado ".to_string()),
                },
            )
            .unwrap();
        assert!(!res.workout.was_fully_completed);
        assert_eq!(res.workout.notes, "pesado");
        assert_eq!(res.stats.xp, 10);
    }

    #[test]
    fn test_same_day_rejected() {
        let (app, plan) = with_plan();
        log(&app, &plan, 0, true).unwrap();
        app.clock().advance(Duration::hours(3));

        let err = log(&app, &plan, 1, true).unwrap_err();
        assert_eq!(err.code(), "already-exists");
        let err = skip(&app, &plan, 1, "cant").unwrap_err();
        assert_eq!(err.code(), "already-exists");

        app.clock().advance(Duration::days(1));
        assert!(log(&app, &plan, 1, true).is_ok());
    }

    #[test]
    fn test_empty_attempt_keeps_day_open() {
        let (app, plan) = with_plan();
        let res = log(&app, &plan, 0, false).unwrap();
        assert_eq!(res.stats.current_streak, 0);
        assert_eq!(res.stats.total_workouts, 0);
        assert!(log(&app, &plan, 0, true).is_ok());
    }

    #[test]
    fn test_mandatory_wont_resets_streak() {
        let (app, plan) = with_plan();
        for _ in 0..3 {
            log(&app, &plan, 0, true).unwrap();
            app.clock().advance(Duration::days(1));
        }

        let res = skip(&app, &plan, 0, "wont").unwrap();
        assert!(res.streak_broken);
        assert!(res.needs_next_day_choice);
        assert_eq!(res.stats.current_streak, 0);
        assert_eq!(res.stats.longest_streak, 3);
        assert!(app.telemetry.names().contains(&"workout_skipped"));
    }

    #[test]
    fn test_optional_skip_extends_streak() {
        let (app, plan) = with_plan();
        log(&app, &plan, 0, true).unwrap();
        app.clock().advance(Duration::days(1));
        let res = skip(&app, &plan, 1, "wont").unwrap();
        assert!(!res.streak_broken);
        assert!(!res.needs_next_day_choice);
        assert_eq!(res.stats.current_streak, 2);
    }

    #[test]
    fn test_next_day_choice_bounds() {
        let (app, plan) = with_plan();
        let mut req = SkipWorkoutRequest {
            cycle_id: plan.id.clone(),
            day_id: plan.days[0].id.clone(),
            reason: "cant".to_string(),
            next_day_choice: Some(2),
        };
        let err = app.skip_workout(&caller(), req.clone()).unwrap_err();
        assert_eq!(err.code(), "invalid-argument");

        req.next_day_choice = Some(0);
        let res = app.skip_workout(&caller(), req).unwrap();
        assert_eq!(res.stats.next_day_position, 0);
    }

    #[test]
    fn test_bad_reason_rejected() {
        let (app, plan) = with_plan();
        let err = skip(&app, &plan, 0, "lazy").unwrap_err();
        assert_eq!(err.code(), "invalid-argument");
        assert!(app.get_workout_history(&caller(), None).unwrap().workouts.is_empty());
    }

    #[test]
    fn test_inactive_cycle_and_missing_day() {
        let (app, plan) = with_plan();
        app.create_cycle(
            &caller(),
            CreateCycleRequest {
                name: "Novo".to_string(),
                days: vec![day_input("X", true, &["Terra"])],
            },
        )
        .unwrap();
        assert_eq!(log(&app, &plan, 0, true).unwrap_err().code(), "not-found");

        let active = app.get_active_cycle(&caller()).unwrap().cycle.unwrap();
        let err = app
            .log_workout(
                &caller(),
                LogWorkoutRequest {
                    cycle_id: active.id,
                    day_id: "day-ghost".to_string(),
                    completed_exercises: Vec::new(),
                    notes: None,
                },
            )
            .unwrap_err();
        assert_eq!(err.code(), "not-found");
    }

    #[test]
    fn test_unauthenticated_log() {
        let (app, plan) = with_plan();
        let err = app
            .log_workout(
                &Caller::anonymous(),
                LogWorkoutRequest {
                    cycle_id: plan.id.clone(),
                    day_id: plan.days[0].id.clone(),
                    completed_exercises: Vec::new(),
                    notes: None,
                },
            )
            .unwrap_err();
        assert_eq!(err.code(), "unauthenticated");
    }

    #[test]
    fn test_week_streak_milestone() {
        let (app, plan) = with_plan();
        for i in 0..7 {
            log(&app, &plan, i % 2, true).unwrap();
            app.clock().advance(Duration::days(1));
        }
        let milestones = app
            .telemetry
            .events
            .borrow()
            .iter()
            .filter(|e| matches!(e, TelemetryEvent::StreakMilestone { streak_days: 7 }))
            .count();
        assert_eq!(milestones, 1);
    }

    #[test]
    fn test_history_newest_first_with_limit() {
        let (app, plan) = with_plan();
        for _ in 0..4 {
            log(&app, &plan, 0, true).unwrap();
            app.clock().advance(Duration::days(1));
        }
        let history = app.get_workout_history(&caller(), Some(2)).unwrap().workouts;
        assert_eq!(history.len(), 2);
        assert!(history[0].date > history[1].date);

        let stats = app.get_current_stats(&caller()).unwrap().stats;
        assert_eq!(stats.total_workouts, 4);
    }

    #[test]
    fn test_stats_include_level_progress() {
        let (app, plan) = with_plan();
        let res = app.get_current_stats(&caller()).unwrap();
        assert_eq!(res.level_progress, 0.0);

        log(&app, &plan, 0, true).unwrap();
        let res = app.get_current_stats(&caller()).unwrap();
        assert_eq!(res.level_progress, level_progress(res.stats.xp));
        assert!(res.level_progress > 0.0 && res.level_progress < 1.0);

        let json = serde_json::to_value(&res).unwrap();
        assert!(json.get("levelProgress").is_some());
    }

    /// sqlite store whose challenge writes always fail
    struct FailingChallenges(SqliteStore);

    impl DocumentStore for FailingChallenges {
        fn get_user(&self, user_id: &str) -> Result<Option<UserDocument>, StoreError> {
            self.0.get_user(user_id)
        }

        fn create_user(&self, user_id: &str, doc: &UserDocument) -> Result<bool, StoreError> {
            self.0.create_user(user_id, doc)
        }

        fn update_workouts_and_stats(
            &self,
            user_id: &str,
            workouts: &[WorkoutEvent],
            stats: &StatsSnapshot,
        ) -> Result<(), StoreError> {
            self.0.update_workouts_and_stats(user_id, workouts, stats)
        }

        fn update_challenges(&self, _user_id: &str, _challenges: &ChallengeMap) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }

        fn update_cycles(&self, user_id: &str, cycles: &[Plan]) -> Result<(), StoreError> {
            self.0.update_cycles(user_id, cycles)
        }

        fn add_feedback(&self, feedback: &Feedback) -> Result<String, StoreError> {
            self.0.add_feedback(feedback)
        }

        fn has_review(&self, user_id: &str) -> Result<bool, StoreError> {
            self.0.has_review(user_id)
        }

        fn add_review(&self, review: &Review) -> Result<String, StoreError> {
            self.0.add_review(review)
        }
    }

    #[test]
    fn test_challenge_failure_does_not_fail_log() {
        let app = TrueStreak::new(
            FailingChallenges(SqliteStore::open_in_memory().unwrap()),
            RecordingTelemetry::default(),
            ManualClock::new(start()),
        );
        app.create_user(&caller()).unwrap();
        let plan = app
            .create_cycle(
                &caller(),
                CreateCycleRequest {
                    name: "A".to_string(),
                    days: vec![day_input("Treino A", true, &["Supino"])],
                },
            )
            .unwrap()
            .cycle;

        let res = app
            .log_workout(
                &caller(),
                LogWorkoutRequest {
                    cycle_id: plan.id.clone(),
                    day_id: plan.days[0].id.clone(),
                    completed_exercises: done(&plan.days[0], true),
                    notes: None,
                },
            )
            .unwrap();
        assert!(res.success);
        assert!(res.tier_ups.is_empty());

        let doc = app.store().get_user("u1").unwrap().unwrap();
        assert_eq!(doc.workouts.len(), 1);
        assert_eq!(doc.stats.total_workouts, 1);
        assert!(doc.challenges.is_empty());
        assert!(!app.telemetry.names().contains(&"achievement_unlocked"));
    }
}
