use super::aliases::AliasTable;
use super::domain::QuestionDefinition;
use super::payload::AnswerPayload;
use serde_json::Value;
use tracing::warn;

const MAX_FLATTEN_DEPTH: usize = 4;
const PLACEHOLDER_ANSWERS: [&str; 2] = ["undefined", "null"];

/// Answer found for one question, before evaluation data is merged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtractedAnswer {
    pub(crate) text: Option<String>,
    pub(crate) source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TooDeep;

/// Renders a raw answer for display. `Ok(None)` means the applicant gave no answer.
///
/// Zero and `false` are answers. Arrays and objects are flattened for display only.
pub(crate) fn display_text(value: &Value) -> Result<Option<String>, TooDeep> {
    flatten(value, 0)
}

fn flatten(value: &Value, depth: usize) -> Result<Option<String>, TooDeep> {
    if depth > MAX_FLATTEN_DEPTH {
        return Err(TooDeep);
    }

    let text = match value {
        Value::Null => None,
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() || PLACEHOLDER_ANSWERS.contains(&trimmed) {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                if let Some(part) = flatten(item, depth + 1)? {
                    parts.push(part);
                }
            }
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(fields) => {
            let mut parts = Vec::with_capacity(fields.len());
            for (key, field) in fields {
                if let Some(part) = flatten(field, depth + 1)? {
                    parts.push(format!("{key}: {part}"));
                }
            }
            (!parts.is_empty()).then(|| parts.join("; "))
        }
    };

    Ok(text)
}

/// Looks up every question of the set in the payload, probing each section with each
/// alias. Warnings are appended for values that could not be read.
pub(crate) fn extract_answers(
    payload: &AnswerPayload,
    questions: &[QuestionDefinition],
    aliases: &AliasTable,
    warnings: &mut Vec<String>,
) -> Vec<ExtractedAnswer> {
    let sections = payload.sections();

    questions
        .iter()
        .map(|question| {
            let candidates = aliases.answer_aliases(question.key);
            let mut found = ExtractedAnswer {
                text: None,
                source: None,
            };

            'probe: for (section_name, section) in &sections {
                for alias in &candidates {
                    let Some(value) = section.get(alias.as_str()) else {
                        continue;
                    };

                    match display_text(value) {
                        Ok(Some(text)) => {
                            found.text = Some(text);
                            found.source = Some(format!("{section_name}.{alias}"));
                            break 'probe;
                        }
                        Ok(None) => {}
                        Err(TooDeep) => {
                            warn!(
                                question = question.key,
                                field = %format!("{section_name}.{alias}"),
                                "answer nested too deeply to display"
                            );
                            warnings.push(format!(
                                "answer for {} at {section_name}.{alias} is nested deeper than {MAX_FLATTEN_DEPTH} levels",
                                question.key
                            ));
                        }
                    }
                }
            }

            found
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(value: Value) -> Option<String> {
        display_text(&value).expect("flattens")
    }

    #[test]
    fn provided_boundaries_distinguish_absent_from_falsy() {
        assert_eq!(text(json!("")), None);
        assert_eq!(text(json!("   ")), None);
        assert_eq!(text(json!("undefined")), None);
        assert_eq!(text(json!(" null ")), None);
        assert_eq!(text(Value::Null), None);
        assert_eq!(text(json!("0")), Some("0".to_string()));
        assert_eq!(text(json!(0)), Some("0".to_string()));
        assert_eq!(text(json!(false)), Some("false".to_string()));
    }

    #[test]
    fn arrays_and_objects_flatten_for_display() {
        assert_eq!(
            text(json!(["Students", "", null, "Teachers"])),
            Some("Students, Teachers".to_string())
        );
        assert_eq!(
            text(json!({ "mrr": 1200, "currency": "USD", "note": "" })),
            Some("currency: USD; mrr: 1200".to_string())
        );
        assert_eq!(text(json!([])), None);
        assert_eq!(text(json!({ "empty": "" })), None);
    }

    #[test]
    fn deep_nesting_is_rejected_not_panicking() {
        let deep = json!([[[[[["too deep"]]]]]]);
        assert_eq!(display_text(&deep), Err(TooDeep));
    }

    #[test]
    fn extraction_falls_through_empty_aliases_to_historical_names() {
        let parsed = AnswerPayload::parse(&json!({
            "questionnaire_answers": {
                "problemSolved": "",
                "problem_statement": "Students lack mentors"
            }
        }));
        let questions = [QuestionDefinition {
            key: "problemSolved",
            text: "What problem are you solving?",
        }];
        let mut warnings = Vec::new();

        let answers = extract_answers(
            &parsed.payload,
            &questions,
            AliasTable::canonical(),
            &mut warnings,
        );

        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].text.as_deref(), Some("Students lack mentors"));
        assert_eq!(
            answers[0].source.as_deref(),
            Some("questionnaire_answers.problem_statement")
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn too_deep_answers_degrade_to_absent_with_warning() {
        let parsed = AnswerPayload::parse(&json!({
            "teamFit": [[[[[["deep"]]]]]]
        }));
        let questions = [QuestionDefinition {
            key: "teamFit",
            text: "Why is your team the right one to build this?",
        }];
        let mut warnings = Vec::new();

        let answers = extract_answers(
            &parsed.payload,
            &questions,
            AliasTable::canonical(),
            &mut warnings,
        );

        assert_eq!(answers[0].text, None);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("answers.teamFit"));
    }
}
