use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::models::{Feedback, Review, SubmissionStatus};
use crate::service::{Caller, TrueStreak};
use crate::store::{Clock, DocumentStore};
use crate::telemetry::{Telemetry, TelemetryEvent};
use crate::validation::{validate_feedback_message, validate_rating, validate_review_comment};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub success: bool,
    pub feedback_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub allow_public_share: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub success: bool,
    pub review_id: String,
}

impl<S: DocumentStore, T: Telemetry, C: Clock> TrueStreak<S, T, C> {
    pub fn submit_feedback(&self, caller: &Caller, message: &str) -> ApiResult<FeedbackResponse> {
        let user_id = caller.require()?;
        let message = validate_feedback_message(message)?;

        let feedback = Feedback {
            user_id: user_id.to_string(),
            message,
            created_at: self.clock.now(),
            status: SubmissionStatus::New,
        };
        let feedback_id = self.store.add_feedback(&feedback)?;

        info!(user_id, %feedback_id, "feedback stored");
        self.telemetry.track(TelemetryEvent::FeedbackSubmitted);
        Ok(FeedbackResponse {
            success: true,
            feedback_id,
        })
    }

    /// one review per user
    pub fn submit_review(&self, caller: &Caller, req: ReviewRequest) -> ApiResult<ReviewResponse> {
        let user_id = caller.require()?;
        validate_rating(req.rating)?;
        let comment = validate_review_comment(req.comment.as_deref())?;

        if self.store.has_review(user_id)? {
            return Err(ApiError::AlreadyExists(
                "Você já enviou uma avaliação. Obrigado!".to_string(),
            ));
        }

        let has_comment = comment.is_some();
        let review = Review {
            user_id: user_id.to_string(),
            rating: req.rating,
            comment,
            allow_public_share: req.allow_public_share,
            created_at: self.clock.now(),
            status: SubmissionStatus::New,
        };
        let review_id = self.store.add_review(&review)?;

        info!(user_id, %review_id, rating = req.rating, "review stored");
        self.telemetry.track(TelemetryEvent::RatingSubmitted {
            rating: req.rating,
            has_comment,
        });
        Ok(ReviewResponse {
            success: true,
            review_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::{app, caller};

    fn review(rating: u8, comment: Option<&str>) -> ReviewRequest {
        ReviewRequest {
            rating,
            comment: comment.map(str::to_string),
            allow_public_share: false,
        }
    }

    #[test]
    fn test_feedback_stored() {
        let app = app();
        let res = app.submit_feedback(&caller(), "  faltou modo escuro  ").unwrap();
        assert!(res.success);
        assert!(!res.feedback_id.is_empty());
        assert_eq!(app.telemetry.names(), vec!["feedback_submitted"]);
    }

    #[test]
    fn test_feedback_too_short() {
        let app = app();
        let err = app.submit_feedback(&caller(), "ok").unwrap_err();
        assert_eq!(err.code(), "invalid-argument");
        assert!(app.telemetry.names().is_empty());
    }

    #[test]
    fn test_review_only_once() {
        let app = app();
        app.submit_review(&caller(), review(5, Some("Muito bom"))).unwrap();
        let err = app.submit_review(&caller(), review(4, None)).unwrap_err();
        assert_eq!(err.code(), "already-exists");

        let other = Caller::user("u2");
        assert!(app.submit_review(&other, review(3, None)).is_ok());
    }

    #[test]
    fn test_review_rating_range() {
        let app = app();
        assert_eq!(
            app.submit_review(&caller(), review(0, None)).unwrap_err().code(),
            "invalid-argument"
        );
        assert_eq!(
            app.submit_review(&caller(), review(6, None)).unwrap_err().code(),
            "invalid-argument"
        );
        assert!(!app.store().has_review("u1").unwrap());
    }

    #[test]
    fn test_anonymous_feedback_rejected() {
        let app = app();
        let err = app
            .submit_feedback(&Caller::anonymous(), "mensagem longa o bastante")
            .unwrap_err();
        assert_eq!(err.code(), "unauthenticated");
    }
}
