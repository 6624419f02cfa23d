//! The callable surface: one method per operation, all taking a `Caller`.
//!
//! ```ignore
//! let app = TrueStreak::new(SqliteStore::open(&path)?, TracingTelemetry, SystemClock);
//! let caller = Caller::user("uid-123");
//! let res = app.log_workout(&caller, request)?;
//! for tier_up in res.tier_ups { /* celebrate */ }
//! ```

use crate::error::{ApiError, ApiResult};
use crate::models::UserDocument;
use crate::store::{Clock, DocumentStore};
use crate::telemetry::Telemetry;

/// identity attached to a call, as supplied by the auth layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Option<String>,
}

impl Caller {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn require(&self) -> ApiResult<&str> {
        match self.user_id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(ApiError::Unauthenticated),
        }
    }
}

/// handlers over an injected store, telemetry sink and clock
pub struct TrueStreak<S, T, C> {
    pub(crate) store: S,
    pub(crate) telemetry: T,
    pub(crate) clock: C,
}

impl<S: DocumentStore, T: Telemetry, C: Clock> TrueStreak<S, T, C> {
    pub fn new(store: S, telemetry: T, clock: C) -> Self {
        Self {
            store,
            telemetry,
            clock,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub(crate) fn load_user(&self, user_id: &str) -> ApiResult<UserDocument> {
        self.store
            .get_user(user_id)?
            .ok_or_else(ApiError::user_not_found)
    }
}
