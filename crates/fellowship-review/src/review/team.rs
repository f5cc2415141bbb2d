use super::extractor::display_text;
use super::payload::AnswerPayload;
use serde::Serialize;
use serde_json::{Map, Value};

const TEAM_NAME_FIELDS: [&str; 3] = ["teamName", "team_name", "name"];
const MEMBER_LIST_FIELDS: [&str; 2] = ["members", "team_members"];
const MEMBER_NAME_FIELDS: [&str; 4] = ["fullName", "full_name", "name", "email"];

/// Team details shown in the application header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TeamSnapshot {
    pub name: Option<String>,
    pub members: Vec<String>,
}

impl TeamSnapshot {
    pub(crate) fn from_payload(payload: &AnswerPayload) -> Self {
        let Some(team) = payload.team() else {
            return Self::default();
        };

        Self {
            name: first_text(team, &TEAM_NAME_FIELDS),
            members: MEMBER_LIST_FIELDS
                .iter()
                .find_map(|field| team.get(*field).and_then(Value::as_array))
                .map(|members| members.iter().filter_map(member_name).collect())
                .unwrap_or_default(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed team")
    }
}

fn member_name(member: &Value) -> Option<String> {
    match member {
        Value::Object(fields) => first_text(fields, &MEMBER_NAME_FIELDS),
        other => display_text(other).ok().flatten(),
    }
}

fn first_text(fields: &Map<String, Value>, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|field| {
        fields
            .get(*field)
            .and_then(|value| display_text(value).ok().flatten())
    })
}
