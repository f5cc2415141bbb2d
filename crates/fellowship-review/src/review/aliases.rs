//! Fixed lookup tables: stage raw values, stage field paths, and the canonical
//! question alias table.
//!
//! Submissions from earlier questionnaire versions used different names for the same
//! field. Those names live here as answer aliases of one canonical key; they are
//! migration data, not parallel schemas.

use super::domain::Stage;
use super::normalizer::{fold_key, normalize_value, to_snake_case};
use std::collections::HashMap;
use std::sync::OnceLock;

static STAGE_VALUE_MAP: OnceLock<HashMap<String, Stage>> = OnceLock::new();
static CANONICAL_ALIASES: OnceLock<AliasTable> = OnceLock::new();

/// Candidate locations of the stage field, highest priority first.
pub(crate) const STAGE_FIELD_PATHS: &[&[&str]] = &[
    &["questionnaire_answers", "productStage"],
    &["questionnaire_answers", "product_stage"],
    &["productStage"],
    &["product_stage"],
    &["team", "productStage"],
    &["team", "product_stage"],
    &["questionnaire_answers", "stage"],
    &["stage"],
];

pub(crate) fn stage_for_normalized(normalized_value: &str) -> Option<Stage> {
    stage_value_map().get(normalized_value).copied()
}

fn stage_value_map() -> &'static HashMap<String, Stage> {
    STAGE_VALUE_MAP.get_or_init(|| {
        const VALUE_TO_STAGE: &[(&str, Stage)] = &[
            // Idea
            ("idea", Stage::Idea),
            ("idea stage", Stage::Idea),
            ("idea phase", Stage::Idea),
            ("concept", Stage::Idea),
            ("just an idea", Stage::Idea),
            ("ideation", Stage::Idea),
            // MVP
            ("mvp", Stage::Mvp),
            ("mvp stage", Stage::Mvp),
            ("prototype", Stage::Mvp),
            ("prototype stage", Stage::Mvp),
            ("building mvp", Stage::Mvp),
            ("minimum viable product", Stage::Mvp),
            ("mvp / prototype", Stage::Mvp),
            // Early revenue
            ("early revenue", Stage::EarlyRevenue),
            ("early revenue stage", Stage::EarlyRevenue),
            ("early stage revenue", Stage::EarlyRevenue),
            ("revenue", Stage::EarlyRevenue),
            ("generating revenue", Stage::EarlyRevenue),
            ("first customers", Stage::EarlyRevenue),
        ];

        let mut map = HashMap::with_capacity(VALUE_TO_STAGE.len());
        for (value, stage) in VALUE_TO_STAGE {
            map.insert(normalize_value(value), *stage);
        }
        map
    })
}

struct AliasSeed {
    key: &'static str,
    historical: &'static [&'static str],
    evaluation_key: &'static str,
}

const CANONICAL_SEEDS: &[AliasSeed] = &[
    AliasSeed {
        key: "ideaDescription",
        historical: &["tell_us_about_idea", "idea"],
        evaluation_key: "tell_us_about_idea",
    },
    AliasSeed {
        key: "problemSolved",
        historical: &["problem_statement", "problem"],
        evaluation_key: "problem_statement",
    },
    AliasSeed {
        key: "targetCustomer",
        historical: &["target_audience", "customer_segment"],
        evaluation_key: "target_customer",
    },
    AliasSeed {
        key: "uniqueValue",
        historical: &["unique_value_proposition", "differentiation"],
        evaluation_key: "unique_value_proposition",
    },
    AliasSeed {
        key: "validationSteps",
        historical: &["idea_validation"],
        evaluation_key: "idea_validation",
    },
    AliasSeed {
        key: "teamFit",
        historical: &["why_your_team", "team_strength"],
        evaluation_key: "team_fit",
    },
    AliasSeed {
        key: "productDescription",
        historical: &["mvp_description"],
        evaluation_key: "product_description",
    },
    AliasSeed {
        key: "userFeedback",
        historical: &["early_feedback"],
        evaluation_key: "user_feedback",
    },
    AliasSeed {
        key: "tractionMetrics",
        historical: &["traction"],
        evaluation_key: "traction",
    },
    AliasSeed {
        key: "revenueModel",
        historical: &["business_model"],
        evaluation_key: "business_model",
    },
    AliasSeed {
        key: "currentRevenue",
        historical: &["monthly_revenue"],
        evaluation_key: "current_revenue",
    },
    AliasSeed {
        key: "customerAcquisition",
        historical: &["acquisition_channels"],
        evaluation_key: "customer_acquisition",
    },
    AliasSeed {
        key: "growthPlan",
        historical: &["growth_strategy"],
        evaluation_key: "growth_plan",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct AliasRow {
    answer_aliases: Vec<String>,
    evaluation_key: Option<String>,
}

/// Maps canonical question keys to their answer aliases and evaluation key.
///
/// Answer aliases are probed in order; the canonical key and its snake_case spelling
/// always come first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AliasTable {
    rows: HashMap<&'static str, AliasRow>,
}

impl AliasTable {
    /// The single source of truth used by the service.
    pub fn canonical() -> &'static AliasTable {
        CANONICAL_ALIASES.get_or_init(|| {
            CANONICAL_SEEDS
                .iter()
                .fold(AliasTable::default(), |table, seed| {
                    let table = table.with_evaluation_key(seed.key, seed.evaluation_key);
                    seed.historical
                        .iter()
                        .fold(table, |table, alias| table.with_answer_alias(seed.key, alias))
                })
        })
    }

    pub fn with_answer_alias(mut self, key: &'static str, alias: &str) -> Self {
        let row = self.rows.entry(key).or_insert_with(|| AliasRow::seeded(key));
        if !row.answer_aliases.iter().any(|existing| existing == alias) {
            row.answer_aliases.push(alias.to_string());
        }
        self
    }

    pub fn with_evaluation_key(mut self, key: &'static str, evaluation_key: &str) -> Self {
        let row = self.rows.entry(key).or_insert_with(|| AliasRow::seeded(key));
        row.evaluation_key = Some(evaluation_key.to_string());
        self
    }

    /// Field names to probe for `key`, in priority order.
    pub fn answer_aliases(&self, key: &str) -> Vec<String> {
        match self.rows.get(key) {
            Some(row) => row.answer_aliases.clone(),
            None => AliasRow::seeded(key).answer_aliases,
        }
    }

    pub fn evaluation_key(&self, key: &str) -> Option<&str> {
        self.rows
            .get(key)
            .and_then(|row| row.evaluation_key.as_deref())
    }

    /// Resolves an incoming key spelled in any known form back to its canonical key.
    pub fn canonical_key(&self, raw: &str) -> Option<&'static str> {
        let folded = fold_key(raw);
        self.rows.iter().find_map(|(key, row)| {
            let matches = fold_key(key) == folded
                || row
                    .answer_aliases
                    .iter()
                    .any(|alias| fold_key(alias) == folded);
            matches.then_some(*key)
        })
    }
}

impl AliasRow {
    fn seeded(key: &str) -> Self {
        let mut answer_aliases = vec![key.to_string()];
        let snake = to_snake_case(key);
        if snake != key {
            answer_aliases.push(snake);
        }
        Self {
            answer_aliases,
            evaluation_key: None,
        }
    }
}

#[cfg(test)]
pub(crate) fn stage_lookup_for_tests(value: &str) -> Option<Stage> {
    stage_for_normalized(&normalize_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_table_recognizes_historical_spellings() {
        assert_eq!(stage_lookup_for_tests("Idea Stage"), Some(Stage::Idea));
        assert_eq!(stage_lookup_for_tests("idea_stage"), Some(Stage::Idea));
        assert_eq!(stage_lookup_for_tests("Prototype"), Some(Stage::Mvp));
        assert_eq!(
            stage_lookup_for_tests("early-revenue"),
            Some(Stage::EarlyRevenue)
        );
        assert_eq!(stage_lookup_for_tests("series b"), None);
    }

    #[test]
    fn canonical_aliases_probe_camel_then_snake_then_history() {
        let aliases = AliasTable::canonical().answer_aliases("ideaDescription");
        assert_eq!(
            aliases,
            vec!["ideaDescription", "idea_description", "tell_us_about_idea", "idea"]
        );
    }

    #[test]
    fn evaluation_key_comes_from_single_table() {
        let table = AliasTable::canonical();
        assert_eq!(table.evaluation_key("problemSolved"), Some("problem_statement"));
        assert_eq!(table.evaluation_key("unknownKey"), None);
    }

    #[test]
    fn canonical_key_accepts_any_known_spelling() {
        let table = AliasTable::canonical();
        assert_eq!(table.canonical_key("problem_solved"), Some("problemSolved"));
        assert_eq!(table.canonical_key("ProblemSolved"), Some("problemSolved"));
        assert_eq!(table.canonical_key("problem_statement"), Some("problemSolved"));
        assert_eq!(table.canonical_key("favourite_colour"), None);
    }

    #[test]
    fn unknown_keys_still_probe_their_snake_case_spelling() {
        let table = AliasTable::default();
        assert_eq!(
            table.answer_aliases("burnRate"),
            vec!["burnRate".to_string(), "burn_rate".to_string()]
        );
    }
}
