use fellowship_review::review::{
    detect_stage, questions_for_stage, AliasTable, Application, PayloadShape,
    QuestionnaireResolver, Stage, StagePanel,
};
use serde_json::{json, Value};

fn submission_versions() -> Vec<(&'static str, Value)> {
    vec![
        (
            "current nested",
            json!({
                "team": { "teamName": "Loop", "members": [{ "fullName": "Ife" }] },
                "questionnaire_answers": {
                    "productStage": "Early Revenue",
                    "productDescription": "Scheduling SaaS for clinics",
                    "problemSolved": "No-shows",
                    "revenueModel": "Per-seat subscription",
                    "currentRevenue": 4200,
                    "customerAcquisition": ["referrals", "conferences"],
                    "growthPlan": "Expand to dental",
                    "teamFit": "Ex-clinic operators"
                }
            }),
        ),
        (
            "string encoded",
            Value::String(
                json!({
                    "questionnaire_answers": "{\"product_stage\":\"early revenue\",\"product_description\":\"Scheduling SaaS for clinics\",\"problem_solved\":\"No-shows\",\"revenue_model\":\"Per-seat subscription\",\"current_revenue\":4200,\"customer_acquisition\":[\"referrals\",\"conferences\"],\"growth_plan\":\"Expand to dental\",\"team_fit\":\"Ex-clinic operators\"}"
                })
                .to_string(),
            ),
        ),
        (
            "legacy flat",
            json!({
                "stage": "Generating revenue",
                "mvp_description": "Scheduling SaaS for clinics",
                "problem_statement": "No-shows",
                "business_model": "Per-seat subscription",
                "monthly_revenue": 4200,
                "acquisition_channels": ["referrals", "conferences"],
                "growth_strategy": "Expand to dental",
                "why_your_team": "Ex-clinic operators"
            }),
        ),
    ]
}

#[test]
fn every_submission_version_resolves_to_the_same_answers() {
    let resolver = QuestionnaireResolver::default();

    let answers: Vec<Vec<Option<String>>> = submission_versions()
        .into_iter()
        .map(|(label, payload)| {
            let resolved = resolver.resolve_answers(&payload, &Value::Null);
            assert_eq!(
                resolved.detection.stage,
                Some(Stage::EarlyRevenue),
                "{label} stage"
            );
            resolved
                .questions
                .into_iter()
                .map(|question| question.user_answer)
                .collect()
        })
        .collect();

    assert!(answers.iter().all(|set| set == &answers[0]));
    assert!(answers[0].iter().all(Option::is_some));
    assert_eq!(answers[0][3].as_deref(), Some("4200"));
    assert_eq!(answers[0][4].as_deref(), Some("referrals, conferences"));
}

#[test]
fn stage_detection_is_exposed_without_resolution() {
    let detection = detect_stage(&json!({ "team": { "productStage": "prototype" } }));

    assert_eq!(detection.stage, Some(Stage::Mvp));
    assert_eq!(detection.source, "team.productStage");
    assert!(detection.is_determined());
}

#[test]
fn numeric_stage_value_is_reported_and_skipped() {
    let detection = detect_stage(&json!({ "productStage": 2, "stage": "idea" }));

    assert_eq!(detection.stage, Some(Stage::Idea));
    assert_eq!(detection.source, "stage");
    assert!(detection
        .warnings
        .iter()
        .any(|warning| warning.contains("productStage") && warning.contains("number")));
}

#[test]
fn question_sets_share_team_fit() {
    for stage in Stage::ordered() {
        let questions = questions_for_stage(Some(stage));
        assert_eq!(
            questions.last().map(|question| question.key),
            Some("teamFit"),
            "{stage:?}"
        );
    }
    assert!(questions_for_stage(None).is_empty());
}

#[test]
fn evaluation_feedback_flows_into_review_cards() {
    let application = Application::new(
        "app-42",
        json!({
            "questionnaire_answers": {
                "productStage": "idea",
                "ideaDescription": "Peer tutoring",
                "uniqueValue": "Verified tutors"
            }
        }),
    )
    .with_evaluation(json!({
        "overall_score": "6.5",
        "scores": {
            "tell_us_about_idea": {
                "score": 9,
                "strengths": "Clear vision",
                "areas_for_improvement": ["pricing", "channels"],
                "raw_feedback": "Strong concept."
            },
            "unique_value_proposition": { "score": 4.5 }
        }
    }));

    let resolved = QuestionnaireResolver::default().resolve(&application);
    let view = resolved.review_view(&application);

    assert_eq!(view.overall_score, Some(6.5));
    assert_eq!(view.summary.evaluated, 2);
    assert_eq!(view.summary.average_score, Some(6.8));

    let idea = &view.questions[0];
    assert_eq!(idea.score_badge.as_ref().map(|badge| badge.label), Some("Good"));
    assert_eq!(idea.strengths, vec!["Clear vision".to_string()]);
    assert_eq!(idea.improvements.len(), 2);
    assert_eq!(idea.raw_feedback.as_deref(), Some("Strong concept."));

    let unique = &view.questions[3];
    assert_eq!(unique.question_key, "uniqueValue");
    assert_eq!(unique.score_badge.as_ref().map(|badge| badge.label), Some("Needs Work"));
}

#[test]
fn unknown_payload_shape_is_undetermined_not_an_error() {
    let application = Application::new("app-array", json!(["idea", "mvp"]));

    let resolved = QuestionnaireResolver::default().resolve(&application);

    assert_eq!(resolved.shape, PayloadShape::Unknown);
    assert!(matches!(resolved.stage_panel(), StagePanel::Undetermined { .. }));
    assert!(resolved.debug_panel().warnings.len() >= 2);
}

#[test]
fn alias_table_resolves_any_spelling_to_canonical_key() {
    let aliases = AliasTable::canonical();

    assert_eq!(aliases.canonical_key("problem_statement"), Some("problemSolved"));
    assert_eq!(aliases.canonical_key("Problem-Solved"), Some("problemSolved"));
    assert_eq!(aliases.evaluation_key("teamFit"), Some("team_fit"));
    assert_eq!(aliases.canonical_key("favouriteColour"), None);
}
