//! Developer seeding: canned workout histories for exercising the
//! challenge screens without logging weeks of workouts by hand.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::models::{CompletedExercise, Exercise, Plan, PlanDay, SkipReason, StatsSnapshot, WorkoutEvent};
use crate::service::{Caller, TrueStreak};
use crate::store::{Clock, DocumentStore};
use crate::telemetry::Telemetry;

pub const MOCK_CYCLE_ID: &str = "mock-cycle-id";
pub const MOCK_DAY_ID: &str = "mock-day-id";
const MOCK_DAY_NAME: &str = "Treino Full Body";

const MOCK_EXERCISES: [(&str, &str, &str); 4] = [
    ("ex1", "Supino Reto", "3x12"),
    ("ex2", "Agachamento", "3x15"),
    ("ex3", "Remada", "3x12"),
    ("ex4", "Desenvolvimento", "3x10"),
];

const VARIED_EXERCISES: [&str; 16] = [
    "Supino Reto",
    "Supino Inclinado",
    "Agachamento",
    "Leg Press",
    "Remada Curvada",
    "Remada Cavalinho",
    "Desenvolvimento",
    "Elevação Lateral",
    "Rosca Direta",
    "Rosca Martelo",
    "Tríceps Testa",
    "Tríceps Corda",
    "Stiff",
    "Mesa Flexora",
    "Panturrilha",
    "Abdominal",
];

const IRREGULAR_DAYS_AGO: [i64; 37] = [
    0, 2, 3, 7, 10, 14, 15, 16, 20, 25, 28, 30, 35, 40, 42, 45, 50, 55, 60, 63, 65, 70, 75, 77, 80,
    85, 90, 92, 95, 100, 105, 107, 110, 112, 115, 118, 119,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// 30 full days in a row
    HighStreak,
    /// 15 days, a mandatory "wont", then 5 more
    BrokenStreak,
    /// 7 full days plus a few sparse ones
    PerfectWeek,
    /// 100 workouts on alternate days
    Massive,
    /// 37 workouts with uneven gaps over four months
    Irregular,
    /// 60 days, roughly half of them skipped
    ManySkips,
    /// 40 days of 3 to 5 exercises drawn from a larger pool
    VariedExercises,
}

impl Scenario {
    pub const ALL: [Scenario; 7] = [
        Scenario::HighStreak,
        Scenario::BrokenStreak,
        Scenario::PerfectWeek,
        Scenario::Massive,
        Scenario::Irregular,
        Scenario::ManySkips,
        Scenario::VariedExercises,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::HighStreak => "streak-alto",
            Scenario::BrokenStreak => "streak-quebrado",
            Scenario::PerfectWeek => "semana-perfeita",
            Scenario::Massive => "massivo",
            Scenario::Irregular => "irregular",
            Scenario::ManySkips => "muitos-skips",
            Scenario::VariedExercises => "exercicios-variados",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sc| sc.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedResponse {
    pub success: bool,
    pub count: usize,
}

fn mock_plan(now: DateTime<Utc>, is_active: bool) -> Plan {
    Plan {
        id: MOCK_CYCLE_ID.to_string(),
        name: "Ciclo de Teste (Dev)".to_string(),
        is_active,
        started_at: now - Duration::days(150),
        ended_at: None,
        current_position: 0,
        days: vec![PlanDay {
            id: MOCK_DAY_ID.to_string(),
            position: 0,
            name: MOCK_DAY_NAME.to_string(),
            is_mandatory: true,
            exercises: MOCK_EXERCISES[..3]
                .iter()
                .map(|(id, name, sets_reps)| Exercise {
                    id: id.to_string(),
                    name: name.to_string(),
                    sets_reps: sets_reps.to_string(),
                    notes: "Exercício mock".to_string(),
                })
                .collect(),
        }],
    }
}

fn mock_event(id: String, date: DateTime<Utc>, completed: &[bool]) -> WorkoutEvent {
    let completed_exercises = MOCK_EXERCISES
        .iter()
        .zip(completed)
        .map(|((id, name, _), done)| CompletedExercise {
            exercise_id: id.to_string(),
            exercise_name: name.to_string(),
            completed: *done,
        })
        .collect();
    event_with(id, date, completed_exercises)
}

fn event_with(id: String, date: DateTime<Utc>, completed_exercises: Vec<CompletedExercise>) -> WorkoutEvent {
    WorkoutEvent {
        id,
        cycle_id: MOCK_CYCLE_ID.to_string(),
        day_id: MOCK_DAY_ID.to_string(),
        day_name: MOCK_DAY_NAME.to_string(),
        day_position: 0,
        date,
        was_fully_completed: completed_exercises.iter().all(|e| e.completed),
        completed_exercises,
        was_mandatory: true,
        skipped_reason: None,
        notes: String::new(),
    }
}

/// build the scenario's events, oldest first, relative to `now`
pub fn scenario_workouts<R: Rng>(scenario: Scenario, now: DateTime<Utc>, rng: &mut R) -> Vec<WorkoutEvent> {
    let stamp = now.timestamp_millis();
    let days_ago = |n: i64| now - Duration::days(n);

    match scenario {
        Scenario::HighStreak => (0..30)
            .map(|i| {
                let mut w = mock_event(format!("workout-{}-{}", stamp, i), days_ago(29 - i), &[true; 3]);
                w.notes = "Treino completo!".to_string();
                w
            })
            .collect(),

        Scenario::BrokenStreak => {
            let mut out: Vec<WorkoutEvent> = (0..15)
                .map(|i| mock_event(format!("workout-{}-{}", stamp, i), days_ago(25 - i), &[true; 2]))
                .collect();

            let mut refusal = mock_event(format!("workout-{}-break", stamp), days_ago(9), &[]);
            refusal.was_fully_completed = false;
            refusal.skipped_reason = Some(SkipReason::Wont);
            refusal.notes = "Quebrei o streak".to_string();
            out.push(refusal);

            out.extend((0..5).map(|i| {
                mock_event(format!("workout-{}-recovery-{}", stamp, i), days_ago(4 - i), &[true])
            }));
            out
        }

        Scenario::PerfectWeek => {
            let mut out: Vec<WorkoutEvent> = [30, 25, 20, 15, 10]
                .into_iter()
                .enumerate()
                .map(|(i, n)| mock_event(format!("workout-{}-sparse-{}", stamp, i), days_ago(n), &[true; 2]))
                .collect();
            out.extend(
                (0..7).map(|i| mock_event(format!("workout-{}-{}", stamp, i), days_ago(6 - i), &[true; 4])),
            );
            out
        }

        Scenario::Massive => (0..100)
            .map(|i| {
                let completed = [true, rng.gen_bool(0.8), rng.gen_bool(0.7)];
                let mut w = mock_event(format!("workout-{}-{}", stamp, i), days_ago(2 * (99 - i)), &completed);
                w.was_mandatory = rng.gen_bool(0.7);
                w
            })
            .collect(),

        Scenario::Irregular => IRREGULAR_DAYS_AGO
            .into_iter()
            .rev()
            .enumerate()
            .map(|(i, n)| {
                let completed = [true, rng.gen_bool(0.7), rng.gen_bool(0.5)];
                let mut w = mock_event(format!("workout-{}-{}", stamp, i), days_ago(n), &completed);
                w.was_mandatory = rng.gen_bool(0.8);
                w
            })
            .collect(),

        Scenario::ManySkips => (0..60)
            .map(|i| {
                let id = format!("workout-{}-{}", stamp, i);
                if rng.gen_bool(0.5) {
                    let mut w = mock_event(id, days_ago(59 - i), &[]);
                    w.was_fully_completed = false;
                    w.skipped_reason = Some(if rng.gen_bool(0.7) { SkipReason::Cant } else { SkipReason::Wont });
                    w.notes = "Não deu pra ir".to_string();
                    w
                } else {
                    mock_event(id, days_ago(59 - i), &[true; 2])
                }
            })
            .collect(),

        Scenario::VariedExercises => (0..40)
            .map(|i| {
                let amount = rng.gen_range(3..=5);
                let picked: Vec<&&str> = VARIED_EXERCISES.choose_multiple(rng, amount).collect();
                let exercises = picked
                    .into_iter()
                    .enumerate()
                    .map(|(j, name)| CompletedExercise {
                        exercise_id: format!("ex{}", j),
                        exercise_name: name.to_string(),
                        completed: rng.gen_bool(0.8),
                    })
                    .collect();
                let mut w = event_with(format!("workout-{}-{}", stamp, i), days_ago(39 - i), exercises);
                w.was_mandatory = rng.gen_bool(0.7);
                w
            })
            .collect(),
    }
}

impl<S: DocumentStore, T: Telemetry, C: Clock> TrueStreak<S, T, C> {
    /// append a canned history; stats are left as they are
    pub fn seed_workouts(&self, caller: &Caller, scenario: &str) -> ApiResult<SeedResponse> {
        let user_id = caller.require()?;
        let scenario =
            Scenario::from_str(scenario).ok_or_else(|| ApiError::invalid("Cenário inválido"))?;

        let mut doc = self.load_user(user_id)?;
        let now = self.clock.now();

        if !doc.cycles.iter().any(|c| c.id == MOCK_CYCLE_ID) {
            let is_active = doc.active_cycle().is_none();
            doc.cycles.push(mock_plan(now, is_active));
            self.store.update_cycles(user_id, &doc.cycles)?;
        }

        let events = scenario_workouts(scenario, now, &mut rand::thread_rng());
        let count = events.len();
        doc.workouts.extend(events);
        self.store
            .update_workouts_and_stats(user_id, &doc.workouts, &doc.stats)?;

        info!(user_id, scenario = scenario.as_str(), count, "workouts seeded");
        Ok(SeedResponse {
            success: true,
            count,
        })
    }

    /// drop all history and reset stats; returns how many events were removed
    pub fn clear_workouts(&self, caller: &Caller) -> ApiResult<SeedResponse> {
        let user_id = caller.require()?;
        let doc = self.load_user(user_id)?;
        let count = doc.workouts.len();

        self.store
            .update_workouts_and_stats(user_id, &[], &StatsSnapshot::default())?;

        info!(user_id, count, "workouts cleared");
        Ok(SeedResponse {
            success: true,
            count,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::challenges::ChallengeId;
    use crate::metrics::{days_without_refusal, perfect_weeks};
    use crate::service::testing::{app, caller, start};
    use crate::tiers::Tier;

    #[test]
    fn test_scenario_names() {
        for sc in Scenario::ALL {
            assert_eq!(Scenario::from_str(sc.as_str()), Some(sc));
        }
        assert_eq!(Scenario::from_str("inexistente"), None);
    }

    #[test]
    fn test_broken_streak_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let events = scenario_workouts(Scenario::BrokenStreak, start(), &mut rng);
        assert_eq!(events.len(), 21);
        assert_eq!(events.iter().filter(|w| w.is_refusal()).count(), 1);
        assert_eq!(days_without_refusal(&events), 5);
    }

    #[test]
    fn test_perfect_week_has_one_window() {
        let mut rng = StdRng::seed_from_u64(7);
        let events = scenario_workouts(Scenario::PerfectWeek, start(), &mut rng);
        assert_eq!(events.len(), 12);
        assert!(perfect_weeks(&events) >= 1);
    }

    #[test]
    fn test_massive_spans_alternate_days() {
        let mut rng = StdRng::seed_from_u64(7);
        let events = scenario_workouts(Scenario::Massive, start(), &mut rng);
        assert_eq!(events.len(), 100);
        assert_eq!(events[99].date - events[98].date, Duration::days(2));
        assert!(events.iter().all(|w| w.completed_exercises[0].completed));
    }

    #[test]
    fn test_irregular_gaps() {
        let mut rng = StdRng::seed_from_u64(7);
        let events = scenario_workouts(Scenario::Irregular, start(), &mut rng);
        assert_eq!(events.len(), 37);
        assert_eq!(events[0].date, start() - Duration::days(119));
        assert_eq!(events[36].date, start());
        assert!(events.windows(2).all(|w| w[0].date < w[1].date));
        assert!(events.iter().all(|w| w.skipped_reason.is_none()));
    }

    #[test]
    fn test_many_skips_mixes_refusals() {
        let mut rng = StdRng::seed_from_u64(7);
        let events = scenario_workouts(Scenario::ManySkips, start(), &mut rng);
        assert_eq!(events.len(), 60);

        let skips: Vec<&WorkoutEvent> = events.iter().filter(|w| w.skipped_reason.is_some()).collect();
        assert!(!skips.is_empty() && skips.len() < 60);
        assert!(skips.iter().all(|w| w.completed_exercises.is_empty() && !w.was_fully_completed));
        assert!(events.iter().filter(|w| w.skipped_reason.is_none()).all(|w| w.was_fully_completed));
    }

    #[test]
    fn test_varied_exercises_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let events = scenario_workouts(Scenario::VariedExercises, start(), &mut rng);
        assert_eq!(events.len(), 40);
        for w in &events {
            let n = w.completed_exercises.len();
            assert!((3..=5).contains(&n));
            assert!(w.completed_exercises.iter().all(|e| VARIED_EXERCISES.contains(&e.exercise_name.as_str())));
            assert_eq!(w.was_fully_completed, w.completed_exercises.iter().all(|e| e.completed));
        }
    }

    #[test]
    fn test_seed_creates_mock_cycle_and_appends() {
        let app = app();
        let res = app.seed_workouts(&caller(), "streak-alto").unwrap();
        assert_eq!(res.count, 30);
        app.seed_workouts(&caller(), "semana-perfeita").unwrap();

        let doc = app.store().get_user("u1").unwrap().unwrap();
        assert_eq!(doc.workouts.len(), 42);
        assert_eq!(doc.cycles.len(), 1);
        assert_eq!(doc.active_cycle().unwrap().id, MOCK_CYCLE_ID);

        let challenges = app.get_user_challenges(&caller()).unwrap().challenges;
        assert!(challenges[&ChallengeId::TotalWorkouts].current_tier >= Tier::Prata);
    }

    #[test]
    fn test_unknown_scenario() {
        let app = app();
        let err = app.seed_workouts(&caller(), "inexistente").unwrap_err();
        assert_eq!(err.code(), "invalid-argument");
    }

    #[test]
    fn test_clear_resets_everything() {
        let app = app();
        app.seed_workouts(&caller(), "streak-quebrado").unwrap();
        let res = app.clear_workouts(&caller()).unwrap();
        assert_eq!(res.count, 21);

        let doc = app.store().get_user("u1").unwrap().unwrap();
        assert!(doc.workouts.is_empty());
        assert_eq!(doc.stats, StatsSnapshot::default());
    }
}
