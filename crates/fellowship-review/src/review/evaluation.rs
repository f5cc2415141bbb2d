use super::aliases::AliasTable;
use super::normalizer::fold_key;
use super::payload::json_kind;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// AI feedback for one question as produced by the upstream scoring service.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QuestionEvaluation {
    pub score: Option<f64>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub raw_feedback: Option<String>,
}

/// Per-question evaluation entries keyed exactly as the scoring service wrote them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EvaluationScores {
    pub entries: BTreeMap<String, QuestionEvaluation>,
    pub overall_score: Option<f64>,
    pub overall_feedback: Option<String>,
}

/// A matched evaluation entry and the key it was found under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationMatch<'a> {
    pub key: &'a str,
    pub evaluation: &'a QuestionEvaluation,
}

impl EvaluationScores {
    /// Reads `{ scores: { <key>: { score, strengths, areas_for_improvement, raw_feedback } } }`.
    /// Anything unreadable is skipped with a warning; absence of data is not a warning.
    pub fn parse(raw: &Value, warnings: &mut Vec<String>) -> Self {
        let decoded;
        let root = match raw {
            Value::Null => return Self::default(),
            Value::String(text) if text.trim().is_empty() => return Self::default(),
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(value) => {
                    decoded = value;
                    &decoded
                }
                Err(err) => {
                    warn!(error = %err, "evaluation data is not valid JSON");
                    warnings.push(format!("evaluation data is not valid JSON: {err}"));
                    return Self::default();
                }
            },
            other => other,
        };

        let Some(root) = root.as_object() else {
            warnings.push(format!(
                "evaluation data is a {} rather than an object",
                json_kind(root)
            ));
            return Self::default();
        };

        let mut scores = Self {
            entries: BTreeMap::new(),
            overall_score: root.get("overall_score").and_then(read_score),
            overall_feedback: root
                .get("overall_feedback")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string),
        };

        match root.get("scores") {
            Some(Value::Object(entries)) => {
                for (key, entry) in entries {
                    match entry {
                        Value::Object(fields) => {
                            scores.entries.insert(key.clone(), read_entry(fields));
                        }
                        Value::Number(_) => {
                            scores.entries.insert(
                                key.clone(),
                                QuestionEvaluation {
                                    score: read_score(entry),
                                    ..QuestionEvaluation::default()
                                },
                            );
                        }
                        other => {
                            warn!(key = %key, kind = json_kind(other), "skipping evaluation entry");
                            warnings.push(format!(
                                "evaluation entry {key} is a {} and was skipped",
                                json_kind(other)
                            ));
                        }
                    }
                }
            }
            Some(Value::Null) | None => {}
            Some(other) => warnings.push(format!(
                "evaluation scores is a {} rather than an object",
                json_kind(other)
            )),
        }

        scores
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the entry for a question: the alias-mapped evaluation key, then the question
    /// key verbatim, then lower-cased, then a case- and separator-insensitive match.
    pub fn lookup<'a>(
        &'a self,
        question_key: &str,
        aliases: &AliasTable,
    ) -> Option<EvaluationMatch<'a>> {
        let canonical = aliases.canonical_key(question_key).unwrap_or(question_key);
        let mapped = aliases
            .evaluation_key(canonical)
            .or_else(|| aliases.evaluation_key(question_key));

        let exact = [
            mapped.map(str::to_string),
            Some(question_key.to_string()),
            Some(question_key.to_lowercase()),
        ];

        for candidate in exact.into_iter().flatten() {
            if let Some((key, evaluation)) = self.entries.get_key_value(&candidate) {
                return Some(EvaluationMatch {
                    key: key.as_str(),
                    evaluation,
                });
            }
        }

        [Some(question_key), Some(canonical), mapped]
            .into_iter()
            .flatten()
            .map(fold_key)
            .find_map(|folded| {
                self.entries
                    .iter()
                    .find(|(key, _)| fold_key(key) == folded)
            })
            .map(|(key, evaluation)| EvaluationMatch {
                key: key.as_str(),
                evaluation,
            })
    }

    /// Mean of the per-question scores, if any were given.
    pub fn average_score(&self) -> Option<f64> {
        let scores: Vec<f64> = self.entries.values().filter_map(|entry| entry.score).collect();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        }
    }
}

fn read_entry(fields: &Map<String, Value>) -> QuestionEvaluation {
    QuestionEvaluation {
        score: fields.get("score").and_then(read_score),
        strengths: fields.get("strengths").map(read_list).unwrap_or_default(),
        areas_for_improvement: fields
            .get("areas_for_improvement")
            .map(read_list)
            .unwrap_or_default(),
        raw_feedback: fields
            .get("raw_feedback")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string),
    }
}

/// Scores pass through unchanged; numeric strings are read as numbers.
fn read_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn read_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text.trim().to_string()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|text| !text.is_empty())
            .collect(),
        Value::String(text) if !text.trim().is_empty() => vec![text.trim().to_string()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(raw: Value) -> EvaluationScores {
        let mut warnings = Vec::new();
        let scores = EvaluationScores::parse(&raw, &mut warnings);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        scores
    }

    #[test]
    fn parses_scores_with_feedback_lists() {
        let scores = parse(json!({
            "scores": {
                "problem_statement": {
                    "score": 7,
                    "strengths": ["clear"],
                    "areas_for_improvement": [],
                    "raw_feedback": "Solid framing."
                }
            },
            "overall_score": "6.5"
        }));

        let entry = &scores.entries["problem_statement"];
        assert_eq!(entry.score, Some(7.0));
        assert_eq!(entry.strengths, vec!["clear".to_string()]);
        assert!(entry.areas_for_improvement.is_empty());
        assert_eq!(entry.raw_feedback.as_deref(), Some("Solid framing."));
        assert_eq!(scores.overall_score, Some(6.5));
    }

    #[test]
    fn scores_are_not_clamped() {
        let scores = parse(json!({ "scores": { "team_fit": { "score": 12.5 } } }));
        assert_eq!(scores.entries["team_fit"].score, Some(12.5));
    }

    #[test]
    fn lookup_prefers_mapped_key_then_verbatim_then_lowercase() {
        let scores = parse(json!({
            "scores": {
                "problem_statement": { "score": 7 },
                "problemSolved": { "score": 3 },
                "customkey": { "score": 5 }
            }
        }));
        let aliases = AliasTable::canonical();

        let hit = scores.lookup("problemSolved", aliases).expect("mapped hit");
        assert_eq!(hit.key, "problem_statement");

        let hit = scores.lookup("customKey", aliases).expect("lowercase hit");
        assert_eq!(hit.key, "customkey");
        assert_eq!(hit.evaluation.score, Some(5.0));
    }

    #[test]
    fn lookup_is_insensitive_to_key_casing() {
        let scores = parse(json!({ "scores": { "ProblemSolved": { "score": 9 } } }));
        let aliases = AliasTable::canonical();

        for question_key in ["problemSolved", "problem_solved"] {
            let hit = scores
                .lookup(question_key, aliases)
                .unwrap_or_else(|| panic!("{question_key} should match"));
            assert_eq!(hit.key, "ProblemSolved");
            assert_eq!(hit.evaluation.score, Some(9.0));
        }
    }

    #[test]
    fn folded_match_follows_candidate_order_not_key_order() {
        let scores = parse(json!({
            "scores": {
                "Problem_Statement": { "score": 2 },
                "problem-solved": { "score": 8 }
            }
        }));

        let hit = scores
            .lookup("problemSolved", AliasTable::canonical())
            .expect("folded hit");

        assert_eq!(hit.key, "problem-solved");
        assert_eq!(hit.evaluation.score, Some(8.0));
    }

    #[test]
    fn missing_entry_is_not_an_error() {
        let scores = parse(Value::Null);
        assert!(scores.is_empty());
        assert!(scores
            .lookup("ideaDescription", AliasTable::canonical())
            .is_none());
    }

    #[test]
    fn malformed_entries_are_skipped_with_warnings() {
        let mut warnings = Vec::new();
        let scores = EvaluationScores::parse(
            &json!({ "scores": { "team_fit": "great", "traction": { "score": 4 } } }),
            &mut warnings,
        );

        assert_eq!(scores.entries.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("team_fit"));
    }

    #[test]
    fn average_score_ignores_unscored_entries() {
        let scores = parse(json!({
            "scores": {
                "a": { "score": 6 },
                "b": { "score": 8 },
                "c": { "strengths": ["ok"] }
            }
        }));
        assert_eq!(scores.average_score(), Some(7.0));
    }
}
