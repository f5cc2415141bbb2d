use super::domain::{ApplicationId, EvaluationStatus, ReviewStatus, Stage};
use super::payload::PayloadShape;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const NOT_PROVIDED: &str = "Not provided";
pub const EVALUATION_PENDING: &str = "Evaluation pending";
pub const EVALUATED: &str = "Evaluated";
pub const STAGE_UNDETERMINED: &str = "Cannot determine stage";

/// Visual tone of a badge; the UI maps tones to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Caution,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Good,
    Fair,
    NeedsWork,
}

impl ScoreBand {
    pub const GOOD_THRESHOLD: f64 = 8.0;
    pub const FAIR_THRESHOLD: f64 = 5.0;

    pub fn for_score(score: f64) -> Self {
        if score >= Self::GOOD_THRESHOLD {
            Self::Good
        } else if score >= Self::FAIR_THRESHOLD {
            Self::Fair
        } else {
            Self::NeedsWork
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::NeedsWork => "Needs Work",
        }
    }

    pub const fn tone(self) -> Tone {
        match self {
            Self::Good => Tone::Positive,
            Self::Fair => Tone::Caution,
            Self::NeedsWork => Tone::Negative,
        }
    }
}

/// Backend reachability as seen by the dashboard poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }

    pub const fn tone(self) -> Tone {
        match self {
            Self::Connecting => Tone::Neutral,
            Self::Connected => Tone::Positive,
            Self::Disconnected => Tone::Negative,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub tone: Tone,
}

impl Badge {
    pub fn evaluation(status: EvaluationStatus) -> Self {
        let tone = match status {
            EvaluationStatus::Completed => Tone::Positive,
            EvaluationStatus::InProgress => Tone::Caution,
            EvaluationStatus::Failed => Tone::Negative,
            EvaluationStatus::Pending => Tone::Neutral,
        };
        Self {
            label: status.label(),
            tone,
        }
    }

    pub fn review(status: ReviewStatus) -> Self {
        let tone = match status {
            ReviewStatus::Shortlisted => Tone::Positive,
            ReviewStatus::UnderReview => Tone::Caution,
            ReviewStatus::Rejected => Tone::Negative,
            ReviewStatus::Submitted => Tone::Neutral,
        };
        Self {
            label: status.label(),
            tone,
        }
    }

    pub fn connection(state: ConnectionState) -> Self {
        Self {
            label: state.label(),
            tone: state.tone(),
        }
    }

    pub fn score(band: ScoreBand) -> Self {
        Self {
            label: band.label(),
            tone: band.tone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionCardView {
    pub question_key: &'static str,
    pub question_text: &'static str,
    pub answer: String,
    pub has_answer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_badge: Option<Badge>,
    pub evaluation_pending: bool,
    pub evaluation_label: &'static str,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strengths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub improvements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub total: usize,
    pub answered: usize,
    pub evaluated: usize,
    pub percent_complete: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StagePanel {
    Determined {
        stage: Stage,
        label: &'static str,
        raw_value: Option<String>,
        source: String,
    },
    Undetermined {
        message: &'static str,
        raw_value: Option<String>,
        warnings: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugPanel {
    pub payload_shape: PayloadShape,
    pub payload_shape_label: &'static str,
    pub stage_source: String,
    pub answer_sources: Vec<(String, String)>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationReviewView {
    pub application_id: ApplicationId,
    pub team_name: String,
    pub team_members: Vec<String>,
    pub stage: StagePanel,
    pub evaluation_status: Badge,
    pub review_status: Badge,
    pub summary: ReviewSummary,
    pub questions: Vec<QuestionCardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_score: Option<u8>,
    pub debug: DebugPanel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationRowView {
    pub application_id: ApplicationId,
    pub team_name: String,
    pub stage_label: &'static str,
    pub answered: usize,
    pub total: usize,
    pub percent_complete: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_score: Option<u8>,
    pub evaluation_status: Badge,
    pub review_status: Badge,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    pub needs_attention: bool,
}

/// Latest poll result shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardBoard {
    pub generation: u64,
    pub connection: Badge,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<DateTime<Utc>>,
    pub rows: Vec<ApplicationRowView>,
}
