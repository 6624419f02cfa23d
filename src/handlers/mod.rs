//! Operation handlers, grouped by the document area they touch.

pub mod account;
pub mod challenges;
pub mod cycles;
pub mod feedback;
pub mod workouts;

pub use account::CreateUserResponse;
pub use challenges::{ChallengeView, MarkViewedResponse, UserChallengesResponse};
pub use cycles::{
    ActiveCycleResponse, CreateCycleRequest, CreateCycleResponse, CycleHistoryResponse,
    RenameCycleRequest, SuccessResponse, UpdateCycleStructureRequest, UpdateCycleStructureResponse,
};
pub use feedback::{FeedbackResponse, ReviewRequest, ReviewResponse};
pub use workouts::{
    LogWorkoutRequest, LogWorkoutResponse, SkipWorkoutRequest, SkipWorkoutResponse, StatsResponse,
    WorkoutHistoryResponse,
};
