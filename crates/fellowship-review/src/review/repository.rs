use serde::{Deserialize, Serialize};

use super::domain::{AdminScore, Application, ApplicationId, EvaluationStatus, ReviewStatus};

/// Read/write access to the hosted application store.
///
/// Writes go through [`ApplicationUpdate`]; answers and evaluation data are owned by the
/// submission flow and the scoring service and are never written from here.
pub trait ApplicationRepository: Send + Sync {
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    /// Most recently submitted first.
    fn list(&self, limit: usize) -> Result<Vec<Application>, RepositoryError>;
    /// Applies `update` to the stored record, or fails with `NotFound`.
    fn update(&self, id: &ApplicationId, update: ApplicationUpdate) -> Result<(), RepositoryError>;
}

/// Field-level change to a stored application. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationUpdate {
    pub evaluation_status: Option<EvaluationStatus>,
    pub review_status: Option<ReviewStatus>,
    pub admin_score: Option<AdminScore>,
}

impl ApplicationUpdate {
    pub fn evaluation_status(status: EvaluationStatus) -> Self {
        Self {
            evaluation_status: Some(status),
            ..Self::default()
        }
    }

    pub fn review_status(status: ReviewStatus) -> Self {
        Self {
            review_status: Some(status),
            ..Self::default()
        }
    }

    /// Records a reviewer score. A `submitted` record moves to `under_review`, judged
    /// against the stored status at write time.
    pub fn admin_score(score: AdminScore) -> Self {
        Self {
            admin_score: Some(score),
            ..Self::default()
        }
    }

    /// Writes the set fields onto `application`.
    pub fn apply_to(self, application: &mut Application) {
        if let Some(status) = self.evaluation_status {
            application.evaluation_status = status;
        }
        if let Some(status) = self.review_status {
            application.review_status = status;
        }
        if let Some(score) = self.admin_score {
            application.admin_score = Some(score);
            if self.review_status.is_none() && application.review_status == ReviewStatus::Submitted {
                application.review_status = ReviewStatus::UnderReview;
            }
        }
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    #[default]
    Initial,
    Rerun,
}

impl EvaluationMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Initial => "evaluation",
            Self::Rerun => "re-evaluation",
        }
    }
}

/// Outbound hook to the AI scoring service. Requests are fire-and-forget; results arrive
/// later through the repository.
pub trait EvaluationTrigger: Send + Sync {
    fn request(&self, id: &ApplicationId, mode: EvaluationMode) -> Result<(), TriggerError>;
}

/// Evaluation trigger failure.
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    #[error("evaluation service unavailable: {0}")]
    Transport(String),
    #[error("evaluation service rejected the request: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn score(value: u8) -> AdminScore {
        AdminScore {
            score: value,
            notes: None,
            reviewer: "dana".to_string(),
            scored_at: Utc::now(),
        }
    }

    #[test]
    fn update_leaves_answers_and_evaluation_data_alone() {
        let mut application = Application::new("a", json!({ "stage": "idea", "ideaDescription": "original" }));
        application.evaluation_data = json!({ "scores": { "idea_description": { "score": 8 } } });

        ApplicationUpdate::evaluation_status(EvaluationStatus::InProgress).apply_to(&mut application);

        assert_eq!(application.answers["ideaDescription"], "original");
        assert_eq!(application.evaluation_data["scores"]["idea_description"]["score"], 8);
        assert_eq!(application.evaluation_status, EvaluationStatus::InProgress);
    }

    #[test]
    fn status_update_keeps_an_existing_admin_score() {
        let mut application = Application::new("a", json!({}));
        ApplicationUpdate::admin_score(score(7)).apply_to(&mut application);

        ApplicationUpdate::evaluation_status(EvaluationStatus::InProgress).apply_to(&mut application);

        assert_eq!(application.admin_score.map(|stored| stored.score), Some(7));
    }

    #[test]
    fn scoring_promotes_only_submitted_records() {
        let mut fresh = Application::new("a", json!({}));
        ApplicationUpdate::admin_score(score(5)).apply_to(&mut fresh);
        assert_eq!(fresh.review_status, ReviewStatus::UnderReview);

        let mut shortlisted = Application::new("b", json!({}));
        shortlisted.review_status = ReviewStatus::Shortlisted;
        ApplicationUpdate::admin_score(score(5)).apply_to(&mut shortlisted);
        assert_eq!(shortlisted.review_status, ReviewStatus::Shortlisted);
    }
}
