use serde::Serialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::models::UserDocument;
use crate::service::{Caller, TrueStreak};
use crate::store::{Clock, DocumentStore};
use crate::telemetry::Telemetry;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub success: bool,
    pub user: UserDocument,
}

impl<S: DocumentStore, T: Telemetry, C: Clock> TrueStreak<S, T, C> {
    /// empty document stamped with the signup time
    pub fn create_user(&self, caller: &Caller) -> ApiResult<CreateUserResponse> {
        let user_id = caller.require()?;
        let doc = UserDocument::new(self.clock.now());

        if !self.store.create_user(user_id, &doc)? {
            return Err(ApiError::AlreadyExists("Usuário já cadastrado".to_string()));
        }

        info!(user_id, "user created");
        Ok(CreateUserResponse {
            success: true,
            user: doc,
        })
    }
}
