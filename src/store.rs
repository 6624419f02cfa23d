//! Seams to the outside world: document storage and the clock.

use std::cell::Cell;

use chrono::{DateTime, Duration, Utc};

use crate::error::StoreError;
use crate::models::{ChallengeMap, Feedback, Plan, Review, StatsSnapshot, UserDocument, WorkoutEvent};

/// per-user document storage plus the feedback/review collections.
///
/// Writes replace whole subtrees; there is no cross-call transaction.
pub trait DocumentStore {
    fn get_user(&self, user_id: &str) -> Result<Option<UserDocument>, StoreError>;

    /// insert a new document; returns false if one already exists
    fn create_user(&self, user_id: &str, doc: &UserDocument) -> Result<bool, StoreError>;

    fn update_workouts_and_stats(
        &self,
        user_id: &str,
        workouts: &[WorkoutEvent],
        stats: &StatsSnapshot,
    ) -> Result<(), StoreError>;

    fn update_challenges(&self, user_id: &str, challenges: &ChallengeMap) -> Result<(), StoreError>;

    fn update_cycles(&self, user_id: &str, cycles: &[Plan]) -> Result<(), StoreError>;

    /// returns the new feedback id
    fn add_feedback(&self, feedback: &Feedback) -> Result<String, StoreError>;

    fn has_review(&self, user_id: &str) -> Result<bool, StoreError>;

    /// returns the new review id
    fn add_review(&self, review: &Review) -> Result<String, StoreError>;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// clock that only moves when told to; used by tests and seeding
#[derive(Debug)]
pub struct ManualClock(Cell<DateTime<Utc>>);

impl ManualClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(Cell::new(at))
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.0.set(at);
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.get()
    }
}
