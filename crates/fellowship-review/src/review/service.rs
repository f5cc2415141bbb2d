use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{AdminScore, Application, ApplicationId, EvaluationStatus, ReviewStatus};
use super::repository::{
    ApplicationRepository, ApplicationUpdate, EvaluationMode, EvaluationTrigger, RepositoryError,
};
use super::resolver::{QuestionnaireResolver, ResolvedApplication};
use super::views::{ApplicationReviewView, ApplicationRowView};

pub const MAX_ADMIN_SCORE: i64 = 10;
pub const MAX_NOTES_CHARS: usize = 2000;

/// Service composing the application store, the evaluation trigger, and the resolver.
pub struct ReviewService<R, E> {
    repository: Arc<R>,
    trigger: Arc<E>,
    resolver: Arc<QuestionnaireResolver>,
}

impl<R, E> ReviewService<R, E>
where
    R: ApplicationRepository + 'static,
    E: EvaluationTrigger + 'static,
{
    pub fn new(repository: Arc<R>, trigger: Arc<E>) -> Self {
        Self::with_resolver(repository, trigger, QuestionnaireResolver::default())
    }

    pub fn with_resolver(
        repository: Arc<R>,
        trigger: Arc<E>,
        resolver: QuestionnaireResolver,
    ) -> Self {
        Self {
            repository,
            trigger,
            resolver: Arc::new(resolver),
        }
    }

    pub fn resolver(&self) -> &QuestionnaireResolver {
        &self.resolver
    }

    /// Table rows for the most recent applications.
    pub fn list(&self, limit: usize) -> Result<Vec<ApplicationRowView>, ReviewServiceError> {
        let applications = self.repository.list(limit)?;
        Ok(applications
            .iter()
            .map(|application| self.resolver.resolve(application).row_view(application))
            .collect())
    }

    pub fn resolve(&self, id: &ApplicationId) -> Result<ResolvedApplication, ReviewServiceError> {
        let application = self.load(id)?;
        Ok(self.resolver.resolve(&application))
    }

    /// Full card view for one application.
    pub fn review(&self, id: &ApplicationId) -> Result<ApplicationReviewView, ReviewServiceError> {
        let application = self.load(id)?;
        Ok(self.resolver.resolve(&application).review_view(&application))
    }

    /// Asks the scoring service to evaluate an application. Trigger failures come back as
    /// an error notification; stored answers and scores are left untouched.
    pub fn trigger_evaluation(
        &self,
        id: &ApplicationId,
        mode: EvaluationMode,
    ) -> Result<Notification, ReviewServiceError> {
        let application = self.load(id)?;

        match (application.evaluation_status, mode) {
            (EvaluationStatus::InProgress, _) => {
                return Ok(Notification::info(
                    "Evaluation already running",
                    format!("Application {id} is still being evaluated."),
                ));
            }
            (EvaluationStatus::Completed, EvaluationMode::Initial) => {
                return Ok(Notification::info(
                    "Already evaluated",
                    format!("Application {id} already has scores; request a re-evaluation instead."),
                ));
            }
            _ => {}
        }

        if let Err(err) = self.trigger.request(id, mode) {
            warn!(application_id = %id, error = %err, mode = mode.label(), "evaluation request failed");
            return Ok(Notification::error(
                "Evaluation request failed",
                format!("Could not start {} for {id}: {err}", mode.label()),
            ));
        }

        self.repository.update(
            id,
            ApplicationUpdate::evaluation_status(EvaluationStatus::InProgress),
        )?;
        info!(application_id = %id, mode = mode.label(), "evaluation requested");

        Ok(Notification::success(
            "Evaluation started",
            format!("Started {} for {id}.", mode.label()),
        ))
    }

    /// Stores a reviewer score and moves fresh submissions into review.
    pub fn submit_score(
        &self,
        id: &ApplicationId,
        input: AdminScoreInput,
    ) -> Result<Notification, ReviewServiceError> {
        let score = input.validate()?;
        self.load(id)?;

        self.repository.update(id, ApplicationUpdate::admin_score(score))?;
        info!(application_id = %id, score = input.score, "admin score recorded");

        Ok(Notification::success(
            "Score saved",
            format!("Recorded score {} for {id}.", input.score),
        ))
    }

    pub fn set_review_status(
        &self,
        id: &ApplicationId,
        status: ReviewStatus,
    ) -> Result<Notification, ReviewServiceError> {
        let previous = self.load(id)?.review_status;
        self.repository.update(id, ApplicationUpdate::review_status(status))?;
        info!(application_id = %id, from = previous.label(), to = status.label(), "review status changed");

        Ok(Notification::success(
            "Status updated",
            format!("{id} moved from {} to {}.", previous.label(), status.label()),
        ))
    }

    fn load(&self, id: &ApplicationId) -> Result<Application, ReviewServiceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| ReviewServiceError::NotFound(id.clone()))
    }
}

/// Reviewer-submitted score before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminScoreInput {
    pub score: i64,
    #[serde(default)]
    pub notes: Option<String>,
    pub reviewer: String,
}

impl AdminScoreInput {
    fn validate(&self) -> Result<AdminScore, ReviewServiceError> {
        if !(0..=MAX_ADMIN_SCORE).contains(&self.score) {
            return Err(ReviewServiceError::InvalidScore(self.score));
        }

        let reviewer = self.reviewer.trim();
        if reviewer.is_empty() {
            return Err(ReviewServiceError::MissingReviewer);
        }

        let notes = self
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty());
        if notes.is_some_and(|notes| notes.chars().count() > MAX_NOTES_CHARS) {
            return Err(ReviewServiceError::NotesTooLong);
        }

        Ok(AdminScore {
            score: self.score as u8,
            notes: notes.map(str::to_string),
            reviewer: reviewer.to_string(),
            scored_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// Transient, user-visible outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: &'static str,
    pub message: String,
}

impl Notification {
    pub fn success(title: &'static str, message: String) -> Self {
        Self {
            level: NotificationLevel::Success,
            title,
            message,
        }
    }

    pub fn info(title: &'static str, message: String) -> Self {
        Self {
            level: NotificationLevel::Info,
            title,
            message,
        }
    }

    pub fn error(title: &'static str, message: String) -> Self {
        Self {
            level: NotificationLevel::Error,
            title,
            message,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Error raised by the review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error("application {0} not found")]
    NotFound(ApplicationId),
    #[error("score must be between 0 and 10 (got {0})")]
    InvalidScore(i64),
    #[error("notes must be at most 2000 characters")]
    NotesTooLong,
    #[error("reviewer name is required")]
    MissingReviewer,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ReviewServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidScore(_) | Self::NotesTooLong | Self::MissingReviewer
        )
    }
}
