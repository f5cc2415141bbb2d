use super::aliases::AliasTable;
use super::domain::{Application, ApplicationId, ResolvedQuestion};
use super::evaluation::EvaluationScores;
use super::extractor::extract_answers;
use super::payload::{AnswerPayload, PayloadShape};
use super::questions::questions_for_stage;
use super::stage::{detect_stage_in, StageDetection};
use super::team::TeamSnapshot;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Everything the admin views need for one application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedApplication {
    pub application_id: ApplicationId,
    pub detection: StageDetection,
    pub shape: PayloadShape,
    pub team: TeamSnapshot,
    pub questions: Vec<ResolvedQuestion>,
    pub overall_score: Option<f64>,
    pub overall_feedback: Option<String>,
    /// Parse and extraction warnings; detection warnings stay on `detection`.
    pub warnings: Vec<String>,
}

/// Resolution output independent of storage metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAnswers {
    pub detection: StageDetection,
    pub shape: PayloadShape,
    pub team: TeamSnapshot,
    pub questions: Vec<ResolvedQuestion>,
    pub evaluation: EvaluationScores,
    pub warnings: Vec<String>,
}

/// Stage detection, question set lookup, answer extraction, and evaluation merge as a
/// single pipeline parameterized by an alias table.
#[derive(Debug, Clone)]
pub struct QuestionnaireResolver {
    aliases: AliasTable,
}

impl Default for QuestionnaireResolver {
    fn default() -> Self {
        Self::new(AliasTable::canonical().clone())
    }
}

impl QuestionnaireResolver {
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn resolve(&self, application: &Application) -> ResolvedApplication {
        let resolved = self.resolve_answers(&application.answers, &application.evaluation_data);
        debug!(
            application_id = %application.id,
            stage = ?resolved.detection.stage,
            questions = resolved.questions.len(),
            warnings = resolved.warnings.len(),
            "application resolved"
        );

        ResolvedApplication {
            application_id: application.id.clone(),
            detection: resolved.detection,
            shape: resolved.shape,
            team: resolved.team,
            questions: resolved.questions,
            overall_score: resolved.evaluation.overall_score,
            overall_feedback: resolved.evaluation.overall_feedback,
            warnings: resolved.warnings,
        }
    }

    pub fn resolve_answers(&self, answers: &Value, evaluation_data: &Value) -> ResolvedAnswers {
        let parsed = AnswerPayload::parse(answers);
        let mut warnings = parsed.warnings;
        let payload = parsed.payload;

        let detection = detect_stage_in(&payload);
        let question_set = questions_for_stage(detection.stage);
        let evaluation = EvaluationScores::parse(evaluation_data, &mut warnings);
        let extracted = extract_answers(&payload, question_set, &self.aliases, &mut warnings);

        let questions = question_set
            .iter()
            .zip(extracted)
            .map(|(question, answer)| {
                let matched = evaluation.lookup(question.key, &self.aliases);
                let evaluation = matched.map(|hit| hit.evaluation);

                ResolvedQuestion {
                    question_key: question.key,
                    question_text: question.text,
                    has_answer: answer.text.is_some(),
                    user_answer: answer.text,
                    ai_score: evaluation.and_then(|entry| entry.score),
                    ai_strengths: evaluation.map(|entry| entry.strengths.clone()),
                    ai_improvements: evaluation.map(|entry| entry.areas_for_improvement.clone()),
                    ai_raw_feedback: evaluation.and_then(|entry| entry.raw_feedback.clone()),
                    answer_source: answer.source,
                    evaluation_key: matched.map(|hit| hit.key.to_string()),
                }
            })
            .collect();

        ResolvedAnswers {
            detection,
            shape: payload.shape(),
            team: TeamSnapshot::from_payload(&payload),
            questions,
            evaluation,
            warnings,
        }
    }
}
