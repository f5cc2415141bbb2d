use chrono::{DateTime, Duration, TimeZone, Utc};
use fellowship_review::review::{
    Application, ApplicationId, ApplicationRepository, ApplicationUpdate, EvaluationMode,
    EvaluationTrigger, RepositoryError, TriggerError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl InMemoryApplicationRepository {
    pub(crate) fn seeded(applications: Vec<Application>) -> Self {
        let repository = Self::default();
        if let Ok(mut guard) = repository.records.lock() {
            for application in applications {
                guard.insert(application.id.clone(), application);
            }
        }
        repository
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("repository lock poisoned".to_string())
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        let mut applications: Vec<Application> = guard.values().cloned().collect();
        applications.sort_by(|left, right| {
            right
                .submitted_at
                .cmp(&left.submitted_at)
                .then_with(|| left.id.cmp(&right.id))
        });
        applications.truncate(limit);
        Ok(applications)
    }

    fn update(&self, id: &ApplicationId, update: ApplicationUpdate) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        let stored = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        update.apply_to(stored);
        Ok(())
    }
}

/// Evaluation request accepted for the scoring service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QueuedEvaluation {
    pub(crate) application_id: ApplicationId,
    pub(crate) mode: EvaluationMode,
    pub(crate) queued_at: DateTime<Utc>,
}

/// Collects evaluation requests until a scoring backend picks them up.
#[derive(Default, Clone)]
pub(crate) struct QueuedEvaluationTrigger {
    queue: Arc<Mutex<Vec<QueuedEvaluation>>>,
}

impl QueuedEvaluationTrigger {
    pub(crate) fn queued(&self) -> Vec<QueuedEvaluation> {
        self.queue
            .lock()
            .map(|queue| queue.clone())
            .unwrap_or_default()
    }
}

impl EvaluationTrigger for QueuedEvaluationTrigger {
    fn request(&self, id: &ApplicationId, mode: EvaluationMode) -> Result<(), TriggerError> {
        let mut queue = self
            .queue
            .lock()
            .map_err(|_| TriggerError::Transport("evaluation queue poisoned".to_string()))?;
        queue.push(QueuedEvaluation {
            application_id: id.clone(),
            mode,
            queued_at: Utc::now(),
        });
        info!(application_id = %id, mode = mode.label(), depth = queue.len(), "evaluation queued");
        Ok(())
    }
}

/// Sample submissions covering every stored shape the resolver understands.
pub(crate) fn sample_applications() -> Vec<Application> {
    let base = Utc
        .with_ymd_and_hms(2025, 2, 3, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);

    let mut current = Application::new(
        "app-1001",
        json!({
            "team": {
                "teamName": "Transit Loop",
                "members": [{ "fullName": "Ana Ruiz" }, { "fullName": "Kofi Mensah" }]
            },
            "questionnaire_answers": {
                "productStage": "MVP",
                "productDescription": "A transfer-aware route planner in closed beta",
                "problemSolved": "Riders miss connections between bus lines",
                "targetCustomer": "Daily commuters in mid-size cities",
                "userFeedback": ["clearer maps", "offline mode"],
                "tractionMetrics": { "beta_users": 340, "weekly_active": 120 },
                "teamFit": "Two of us ran dispatch at the city transit agency"
            }
        }),
    )
    .with_evaluation(json!({
        "overall_score": 7.4,
        "overall_feedback": "Credible team with early usage; needs a retention story.",
        "scores": {
            "ProblemSolved": {
                "score": 8,
                "strengths": ["specific, observed pain"],
                "areas_for_improvement": ["quantify missed connections"]
            },
            "product_description": { "score": 7 },
            "traction": { "score": 6.5, "raw_feedback": "Early but real." }
        }
    }));
    current.submitted_at = Some(base + Duration::days(3));

    let mut encoded = Application::new(
        "app-1002",
        Value::String(
            json!({
                "questionnaire_answers": {
                    "product_stage": "idea stage",
                    "idea_description": "Shared tool library for apartment buildings",
                    "problem_solved": "Renters buy tools they use once",
                    "unique_value": 0,
                    "team_fit": false
                }
            })
            .to_string(),
        ),
    );
    encoded.submitted_at = Some(base + Duration::days(2));

    let mut legacy = Application::new(
        "app-1003",
        json!({
            "stage": "Generating revenue",
            "mvp_description": "Scheduling for physiotherapy clinics",
            "problem_statement": "No-shows cost clinics a fifth of their hours",
            "business_model": "Per-seat subscription",
            "monthly_revenue": 4200,
            "acquisition_channels": ["referrals", "trade shows"],
            "growth_strategy": "Expand into dental practices",
            "why_your_team": "Former clinic operators"
        }),
    )
    .with_evaluation(Value::String(
        r#"{"scores":{"problem_statement":{"score":9},"business_model":{"score":4}}}"#.to_string(),
    ));
    legacy.submitted_at = Some(base + Duration::days(1));

    let mut unstaged = Application::new(
        "app-1004",
        json!({ "questionnaire_answers": { "productStage": "Series B" } }),
    );
    unstaged.submitted_at = Some(base);

    vec![current, encoded, legacy, unstaged]
}
