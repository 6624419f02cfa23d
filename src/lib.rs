//! Workout habit tracking: plans, logged and skipped workouts, streaks,
//! xp/levels, and seven tiered challenges recomputed from history.

pub mod challenges;
pub mod config;
pub mod db;
pub mod detector;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod resolver;
pub mod seed;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod tiers;
pub mod validation;
pub mod xp;

pub use challenges::{CHALLENGE_ORDER, ChallengeId};
pub use config::Config;
pub use db::SqliteStore;
pub use error::{ApiError, ApiResult, StoreError};
pub use service::{Caller, TrueStreak};
pub use store::{Clock, DocumentStore, ManualClock, SystemClock};
pub use telemetry::{NoopTelemetry, Telemetry, TelemetryEvent, TracingTelemetry};
pub use tiers::{TIER_ORDER, Tier};
