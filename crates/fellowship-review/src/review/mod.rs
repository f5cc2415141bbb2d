//! Stage-aware questionnaire resolution for fellowship applications.
//!
//! Raw submissions arrive in several historical shapes. The [`resolver`] turns each one
//! into the question set for its detected stage, with answers and AI scores merged by
//! canonical question key; [`summary`] and [`views`] derive what the admin dashboard shows.

pub(crate) mod aliases;
pub mod domain;
pub mod evaluation;
pub(crate) mod extractor;
pub(crate) mod normalizer;
pub mod payload;
pub mod poller;
pub mod questions;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod service;
pub mod stage;
pub mod summary;
pub mod team;
pub mod views;

#[cfg(test)]
mod tests;

pub use aliases::AliasTable;
pub use domain::{
    AdminScore, Application, ApplicationId, EvaluationStatus, QuestionDefinition,
    ResolvedQuestion, ReviewStatus, Stage,
};
pub use evaluation::{EvaluationMatch, EvaluationScores, QuestionEvaluation};
pub use payload::{AnswerPayload, ParsedPayload, PayloadShape};
pub use poller::{BoardSource, DashboardPoller, PollerHandle, SharedBoard, MIN_POLL_PERIOD};
pub use questions::questions_for_stage;
pub use repository::{
    ApplicationRepository, ApplicationUpdate, EvaluationMode, EvaluationTrigger,
    RepositoryError, TriggerError,
};
pub use resolver::{QuestionnaireResolver, ResolvedAnswers, ResolvedApplication};
pub use router::{dashboard_router, review_router, DEFAULT_LIST_LIMIT};
pub use service::{
    AdminScoreInput, Notification, NotificationLevel, ReviewService, ReviewServiceError,
};
pub use stage::{detect_stage, StageDetection};
pub use team::TeamSnapshot;
pub use views::{
    ApplicationReviewView, ApplicationRowView, Badge, ConnectionState, DashboardBoard,
    DebugPanel, QuestionCardView, ReviewSummary, ScoreBand, StagePanel, Tone,
};
