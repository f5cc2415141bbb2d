use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

const QUESTIONNAIRE_FIELD: &str = "questionnaire_answers";
const TEAM_FIELD: &str = "team";

/// Known shapes of the raw `answers` column.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerPayload {
    /// `{ team: {...}, questionnaire_answers: {...}, ... }`
    Nested {
        root: Map<String, Value>,
        questionnaire: Map<String, Value>,
        team: Option<Map<String, Value>>,
    },
    /// Answers written directly at the top level, possibly beside a `team` section.
    Flat {
        root: Map<String, Value>,
        team: Option<Map<String, Value>>,
    },
    /// No answers stored.
    Missing,
    /// Anything else, kept verbatim for the debug panel.
    Unknown(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    Nested,
    Flat,
    Missing,
    Unknown,
}

impl PayloadShape {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nested => "team + questionnaire_answers",
            Self::Flat => "flat answers",
            Self::Missing => "no answers",
            Self::Unknown => "unrecognized payload",
        }
    }
}

/// Result of interpreting a raw payload; warnings describe anything that was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPayload {
    pub payload: AnswerPayload,
    pub warnings: Vec<String>,
}

impl AnswerPayload {
    /// Interprets `raw` without failing. Payloads stored as JSON-encoded strings are
    /// decoded once.
    pub fn parse(raw: &Value) -> ParsedPayload {
        let mut warnings = Vec::new();
        let payload = Self::parse_value(raw, true, &mut warnings);
        ParsedPayload { payload, warnings }
    }

    fn parse_value(raw: &Value, decode_strings: bool, warnings: &mut Vec<String>) -> Self {
        match raw {
            Value::Null => Self::Missing,
            Value::String(text) if text.trim().is_empty() => Self::Missing,
            Value::String(text) if decode_strings => match serde_json::from_str::<Value>(text) {
                Ok(decoded) => Self::parse_value(&decoded, false, warnings),
                Err(err) => {
                    warn!(error = %err, "answers payload is not valid JSON");
                    warnings.push(format!("answers payload is not valid JSON: {err}"));
                    Self::Unknown(raw.clone())
                }
            },
            Value::Object(root) => Self::from_object(root, warnings),
            other => {
                warn!(kind = json_kind(other), "answers payload has unexpected shape");
                warnings.push(format!(
                    "answers payload is a {} rather than an object",
                    json_kind(other)
                ));
                Self::Unknown(other.clone())
            }
        }
    }

    fn from_object(root: &Map<String, Value>, warnings: &mut Vec<String>) -> Self {
        let team = root
            .get(TEAM_FIELD)
            .and_then(|value| section_map(TEAM_FIELD, value, warnings));

        match root
            .get(QUESTIONNAIRE_FIELD)
            .and_then(|value| section_map(QUESTIONNAIRE_FIELD, value, warnings))
        {
            Some(questionnaire) => Self::Nested {
                root: root.clone(),
                questionnaire,
                team,
            },
            None => Self::Flat {
                root: root.clone(),
                team,
            },
        }
    }

    pub fn shape(&self) -> PayloadShape {
        match self {
            Self::Nested { .. } => PayloadShape::Nested,
            Self::Flat { .. } => PayloadShape::Flat,
            Self::Missing => PayloadShape::Missing,
            Self::Unknown(_) => PayloadShape::Unknown,
        }
    }

    /// Reads a field path. The `questionnaire_answers` and `team` prefixes resolve against
    /// the decoded sections so string-encoded sections behave like objects.
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        match path {
            [QUESTIONNAIRE_FIELD, field] => self.questionnaire()?.get(*field),
            [TEAM_FIELD, field] => self.team()?.get(*field),
            [first, rest @ ..] => rest
                .iter()
                .try_fold(self.root()?.get(*first)?, |value, segment| {
                    value.get(*segment)
                }),
            [] => None,
        }
    }

    /// Sections probed for answers, highest priority first.
    pub fn sections(&self) -> Vec<(&'static str, &Map<String, Value>)> {
        match self {
            Self::Nested {
                root,
                questionnaire,
                team,
            } => {
                let mut sections = vec![(QUESTIONNAIRE_FIELD, questionnaire)];
                if let Some(team) = team {
                    sections.push((TEAM_FIELD, team));
                }
                sections.push(("answers", root));
                sections
            }
            Self::Flat { root, team } => {
                let mut sections = Vec::with_capacity(2);
                if let Some(team) = team {
                    sections.push((TEAM_FIELD, team));
                }
                sections.push(("answers", root));
                sections
            }
            Self::Missing | Self::Unknown(_) => Vec::new(),
        }
    }

    pub fn team(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Nested { team, .. } | Self::Flat { team, .. } => team.as_ref(),
            Self::Missing | Self::Unknown(_) => None,
        }
    }

    fn questionnaire(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Nested { questionnaire, .. } => Some(questionnaire),
            _ => None,
        }
    }

    fn root(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Nested { root, .. } | Self::Flat { root, .. } => Some(root),
            Self::Missing | Self::Unknown(_) => None,
        }
    }
}

fn section_map(
    name: &str,
    value: &Value,
    warnings: &mut Vec<String>,
) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map.clone()),
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Some(map),
            Ok(other) => {
                warn!(section = name, kind = json_kind(&other), "section is not an object");
                warnings.push(format!("{name} decodes to a {} rather than an object", json_kind(&other)));
                None
            }
            Err(err) => {
                warn!(section = name, error = %err, "section is not valid JSON");
                warnings.push(format!("{name} is not valid JSON: {err}"));
                None
            }
        },
        other => {
            warn!(section = name, kind = json_kind(other), "section is not an object");
            warnings.push(format!("{name} is a {} rather than an object", json_kind(other)));
            None
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
