use super::aliases::{stage_for_normalized, STAGE_FIELD_PATHS};
use super::domain::Stage;
use super::normalizer::normalize_value;
use super::payload::{json_kind, AnswerPayload};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

pub const STAGE_SOURCE_NONE: &str = "none";

/// Outcome of stage detection. An unknown or missing stage is reported, never guessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageDetection {
    pub stage: Option<Stage>,
    pub raw_value: Option<String>,
    pub source: String,
    pub warnings: Vec<String>,
}

impl StageDetection {
    pub fn is_determined(&self) -> bool {
        self.stage.is_some()
    }
}

/// Detects the stage from a raw `answers` value of any shape.
pub fn detect_stage(answers: &Value) -> StageDetection {
    let parsed = AnswerPayload::parse(answers);
    let mut detection = detect_stage_in(&parsed.payload);
    let mut warnings = parsed.warnings;
    warnings.append(&mut detection.warnings);
    detection.warnings = warnings;
    detection
}

pub(crate) fn detect_stage_in(payload: &AnswerPayload) -> StageDetection {
    let mut warnings = Vec::new();

    for path in STAGE_FIELD_PATHS {
        let source = path.join(".");
        let Some(value) = payload.lookup(path) else {
            continue;
        };

        let raw = match value {
            Value::String(text) if !text.trim().is_empty() => text.trim().to_string(),
            Value::String(_) | Value::Null => continue,
            other => {
                warn!(%source, kind = json_kind(other), "ignoring non-text stage field");
                warnings.push(format!(
                    "stage field {source} holds a {} and was ignored",
                    json_kind(other)
                ));
                continue;
            }
        };

        let stage = stage_for_normalized(&normalize_value(&raw));
        match stage {
            Some(stage) => debug!(%source, raw = %raw, ?stage, "stage detected"),
            None => {
                warn!(%source, raw = %raw, "unrecognized stage value");
                warnings.push(format!("unrecognized stage value '{raw}' at {source}"));
            }
        }

        return StageDetection {
            stage,
            raw_value: Some(raw),
            source,
            warnings,
        };
    }

    let checked = STAGE_FIELD_PATHS
        .iter()
        .map(|path| path.join("."))
        .collect::<Vec<_>>()
        .join(", ");
    warnings.push(format!("stage not found (checked {checked})"));

    StageDetection {
        stage: None,
        raw_value: None,
        source: STAGE_SOURCE_NONE.to_string(),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_stage_from_questionnaire_field() {
        let detection = detect_stage(&json!({
            "questionnaire_answers": { "productStage": "Idea Stage" }
        }));

        assert_eq!(detection.stage, Some(Stage::Idea));
        assert_eq!(detection.raw_value.as_deref(), Some("Idea Stage"));
        assert_eq!(detection.source, "questionnaire_answers.productStage");
        assert!(detection.warnings.is_empty());
    }

    #[test]
    fn priority_order_prefers_questionnaire_over_team() {
        let detection = detect_stage(&json!({
            "team": { "product_stage": "early revenue" },
            "questionnaire_answers": { "product_stage": "prototype" }
        }));

        assert_eq!(detection.stage, Some(Stage::Mvp));
        assert_eq!(detection.source, "questionnaire_answers.product_stage");
    }

    #[test]
    fn blank_candidates_are_skipped() {
        let detection = detect_stage(&json!({
            "productStage": "  ",
            "team": { "productStage": "MVP" }
        }));

        assert_eq!(detection.stage, Some(Stage::Mvp));
        assert_eq!(detection.source, "team.productStage");
    }

    #[test]
    fn unknown_value_surfaces_warning_instead_of_default() {
        let detection = detect_stage(&json!({ "productStage": "Series B" }));

        assert_eq!(detection.stage, None);
        assert_eq!(detection.raw_value.as_deref(), Some("Series B"));
        assert_eq!(detection.source, "productStage");
        assert!(detection.warnings[0].contains("'Series B'"));
    }

    #[test]
    fn missing_stage_reports_not_found() {
        let detection = detect_stage(&json!({}));

        assert_eq!(detection.stage, None);
        assert_eq!(detection.raw_value, None);
        assert_eq!(detection.source, STAGE_SOURCE_NONE);
        assert_eq!(detection.warnings.len(), 1);
        assert!(detection.warnings[0].starts_with("stage not found"));
    }

    #[test]
    fn non_text_stage_field_is_skipped_with_warning() {
        let detection = detect_stage(&json!({
            "productStage": 2,
            "stage": "idea"
        }));

        assert_eq!(detection.stage, Some(Stage::Idea));
        assert_eq!(detection.source, "stage");
        assert!(detection.warnings[0].contains("productStage holds a number"));
    }

    #[test]
    fn detection_is_deterministic() {
        let answers = json!({ "product_stage": "Early-Revenue" });
        assert_eq!(detect_stage(&answers), detect_stage(&answers));
    }
}
