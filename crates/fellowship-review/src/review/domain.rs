use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier wrapper for fellowship applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One applicant's submission as stored by the hosted backend.
///
/// `answers` and `evaluation_data` are kept as raw JSON: their shape varies across
/// submission versions and is interpreted by the resolver, never at deserialization time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    #[serde(default)]
    pub answers: Value,
    #[serde(default)]
    pub evaluation_data: Value,
    #[serde(default)]
    pub evaluation_status: EvaluationStatus,
    #[serde(default)]
    pub review_status: ReviewStatus,
    #[serde(default)]
    pub admin_score: Option<AdminScore>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Application {
    pub fn new(id: impl Into<String>, answers: Value) -> Self {
        Self {
            id: ApplicationId(id.into()),
            answers,
            evaluation_data: Value::Null,
            evaluation_status: EvaluationStatus::Pending,
            review_status: ReviewStatus::Submitted,
            admin_score: None,
            submitted_at: None,
        }
    }

    pub fn with_evaluation(mut self, evaluation_data: Value) -> Self {
        self.evaluation_data = evaluation_data;
        self.evaluation_status = EvaluationStatus::Completed;
        self
    }
}

/// Venture maturity of the applicant's project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idea,
    Mvp,
    EarlyRevenue,
}

impl Stage {
    pub const fn ordered() -> [Self; 3] {
        [Self::Idea, Self::Mvp, Self::EarlyRevenue]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Idea => "Idea Stage",
            Self::Mvp => "MVP",
            Self::EarlyRevenue => "Early Revenue",
        }
    }
}

/// Progress of the external AI evaluation for an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl EvaluationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

/// Admin-side decision state for an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Submitted,
    UnderReview,
    Shortlisted,
    Rejected,
}

impl ReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::UnderReview => "Under Review",
            Self::Shortlisted => "Shortlisted",
            Self::Rejected => "Rejected",
        }
    }
}

/// Reviewer-entered score stored alongside the AI evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminScore {
    pub score: u8,
    pub notes: Option<String>,
    pub reviewer: String,
    pub scored_at: DateTime<Utc>,
}

/// Static definition of a question in a stage's questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionDefinition {
    pub key: &'static str,
    pub text: &'static str,
}

/// A question of the applicant's stage with its answer and any merged AI evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedQuestion {
    pub question_key: &'static str,
    pub question_text: &'static str,
    pub user_answer: Option<String>,
    pub has_answer: bool,
    pub ai_score: Option<f64>,
    pub ai_strengths: Option<Vec<String>>,
    pub ai_improvements: Option<Vec<String>>,
    pub ai_raw_feedback: Option<String>,
    pub answer_source: Option<String>,
    pub evaluation_key: Option<String>,
}

impl ResolvedQuestion {
    pub fn is_evaluated(&self) -> bool {
        self.ai_score.is_some()
    }
}
