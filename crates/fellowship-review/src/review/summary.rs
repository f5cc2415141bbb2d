use super::domain::{Application, ResolvedQuestion};
use super::resolver::ResolvedApplication;
use super::views::{
    ApplicationReviewView, ApplicationRowView, Badge, DebugPanel, QuestionCardView,
    ReviewSummary, ScoreBand, StagePanel, EVALUATED, EVALUATION_PENDING, NOT_PROVIDED,
    STAGE_UNDETERMINED,
};
use tracing::trace;

impl ReviewSummary {
    pub fn from_questions(questions: &[ResolvedQuestion]) -> Self {
        let total = questions.len();
        let answered = questions.iter().filter(|question| question.has_answer).count();
        let scores: Vec<f64> = questions
            .iter()
            .filter_map(|question| question.ai_score)
            .collect();

        let percent_complete = if total == 0 {
            0
        } else {
            ((answered as f64 / total as f64) * 100.0).round() as u8
        };

        let average_score = if scores.is_empty() {
            None
        } else {
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            Some((mean * 10.0).round() / 10.0)
        };

        Self {
            total,
            answered,
            evaluated: scores.len(),
            percent_complete,
            average_score,
        }
    }
}

impl QuestionCardView {
    pub fn from_question(question: &ResolvedQuestion) -> Self {
        Self {
            question_key: question.question_key,
            question_text: question.question_text,
            answer: question
                .user_answer
                .clone()
                .unwrap_or_else(|| NOT_PROVIDED.to_string()),
            has_answer: question.has_answer,
            ai_score: question.ai_score,
            score_badge: question
                .ai_score
                .map(|score| Badge::score(ScoreBand::for_score(score))),
            evaluation_pending: question.ai_score.is_none(),
            evaluation_label: if question.ai_score.is_some() {
                EVALUATED
            } else {
                EVALUATION_PENDING
            },
            strengths: question.ai_strengths.clone().unwrap_or_default(),
            improvements: question.ai_improvements.clone().unwrap_or_default(),
            raw_feedback: question.ai_raw_feedback.clone(),
        }
    }
}

impl ResolvedApplication {
    pub fn summary(&self) -> ReviewSummary {
        ReviewSummary::from_questions(&self.questions)
    }

    pub fn stage_panel(&self) -> StagePanel {
        match self.detection.stage {
            Some(stage) => StagePanel::Determined {
                stage,
                label: stage.label(),
                raw_value: self.detection.raw_value.clone(),
                source: self.detection.source.clone(),
            },
            None => StagePanel::Undetermined {
                message: STAGE_UNDETERMINED,
                raw_value: self.detection.raw_value.clone(),
                warnings: self.detection.warnings.clone(),
            },
        }
    }

    pub fn debug_panel(&self) -> DebugPanel {
        let mut warnings = self.detection.warnings.clone();
        warnings.extend(self.warnings.iter().cloned());

        DebugPanel {
            payload_shape: self.shape,
            payload_shape_label: self.shape.label(),
            stage_source: self.detection.source.clone(),
            answer_sources: self
                .questions
                .iter()
                .filter_map(|question| {
                    question
                        .answer_source
                        .as_ref()
                        .map(|source| (question.question_key.to_string(), source.clone()))
                })
                .collect(),
            warnings,
        }
    }

    /// Full card view; `application` supplies the stored status metadata.
    pub fn review_view(&self, application: &Application) -> ApplicationReviewView {
        trace!(application_id = %self.application_id, "building review view");
        ApplicationReviewView {
            application_id: self.application_id.clone(),
            team_name: self.team.display_name().to_string(),
            team_members: self.team.members.clone(),
            stage: self.stage_panel(),
            evaluation_status: Badge::evaluation(application.evaluation_status),
            review_status: Badge::review(application.review_status),
            summary: self.summary(),
            questions: self
                .questions
                .iter()
                .map(QuestionCardView::from_question)
                .collect(),
            overall_score: self.overall_score,
            overall_feedback: self.overall_feedback.clone(),
            admin_score: application.admin_score.as_ref().map(|score| score.score),
            debug: self.debug_panel(),
        }
    }

    pub fn row_view(&self, application: &Application) -> ApplicationRowView {
        let summary = self.summary();
        let has_warnings = !self.warnings.is_empty() || !self.detection.warnings.is_empty();

        ApplicationRowView {
            application_id: self.application_id.clone(),
            team_name: self.team.display_name().to_string(),
            stage_label: self
                .detection
                .stage
                .map(|stage| stage.label())
                .unwrap_or(STAGE_UNDETERMINED),
            answered: summary.answered,
            total: summary.total,
            percent_complete: summary.percent_complete,
            average_score: summary.average_score,
            admin_score: application.admin_score.as_ref().map(|score| score.score),
            evaluation_status: Badge::evaluation(application.evaluation_status),
            review_status: Badge::review(application.review_status),
            submitted_at: application.submitted_at,
            needs_attention: !self.detection.is_determined() || has_warnings,
        }
    }
}
