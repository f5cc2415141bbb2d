use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use crate::review::domain::{Application, ApplicationId};
use crate::review::repository::{
    ApplicationRepository, ApplicationUpdate, EvaluationMode, EvaluationTrigger, RepositoryError,
    TriggerError,
};
use crate::review::service::ReviewService;

pub(super) fn idea_application(id: &str) -> Application {
    let mut application = Application::new(
        id,
        json!({
            "team": { "teamName": "Bus Buddies", "members": ["Ana", "Kofi"] },
            "questionnaire_answers": {
                "productStage": "Idea Stage",
                "ideaDescription": "We build X",
                "problemSolved": "Commuters miss connections",
                "teamFit": "We ran the city transit hackathon"
            }
        }),
    );
    application.submitted_at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).single();
    application
}

pub(super) fn mvp_application(id: &str) -> Application {
    let mut application = Application::new(
        id,
        json!({
            "productStage": "MVP",
            "productDescription": "Route planner beta",
            "problem_statement": "Transfers are unreliable",
            "userFeedback": ["faster", "clearer maps"],
            "tractionMetrics": 0
        }),
    )
    .with_evaluation(json!({
        "overall_score": 7.5,
        "overall_feedback": "Promising early traction.",
        "scores": {
            "problem_statement": {
                "score": 7,
                "strengths": ["clear pain point"],
                "areas_for_improvement": ["size the market"]
            },
            "product_description": { "score": 8.5 }
        }
    }));
    application.submitted_at = Utc.with_ymd_and_hms(2025, 3, 4, 15, 30, 0).single();
    application
}

pub(super) fn unstaged_application(id: &str) -> Application {
    Application::new(id, json!({}))
}

pub(super) fn build_service() -> (
    ReviewService<MemoryRepository, RecordingTrigger>,
    Arc<MemoryRepository>,
    Arc<RecordingTrigger>,
) {
    let repository = Arc::new(MemoryRepository::with(vec![
        idea_application("app-idea"),
        mvp_application("app-mvp"),
        unstaged_application("app-blank"),
    ]));
    let trigger = Arc::new(RecordingTrigger::default());
    let service = ReviewService::new(repository.clone(), trigger.clone());
    (service, repository, trigger)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl MemoryRepository {
    pub(super) fn with(applications: Vec<Application>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.records.lock().expect("repository mutex poisoned");
            for application in applications {
                guard.insert(application.id.clone(), application);
            }
        }
        repository
    }

    pub(super) fn stored(&self, id: &str) -> Application {
        self.fetch(&ApplicationId(id.to_string()))
            .expect("fetch succeeds")
            .expect("record present")
    }
}

impl ApplicationRepository for MemoryRepository {
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut applications: Vec<_> = guard.values().cloned().collect();
        applications.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(a.id.cmp(&b.id)));
        applications.truncate(limit);
        Ok(applications)
    }

    fn update(&self, id: &ApplicationId, update: ApplicationUpdate) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        update.apply_to(stored);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _limit: usize) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _id: &ApplicationId, _update: ApplicationUpdate) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingTrigger {
    requests: Arc<Mutex<Vec<(ApplicationId, EvaluationMode)>>>,
}

impl RecordingTrigger {
    pub(super) fn requests(&self) -> Vec<(ApplicationId, EvaluationMode)> {
        self.requests.lock().expect("trigger mutex poisoned").clone()
    }
}

impl EvaluationTrigger for RecordingTrigger {
    fn request(&self, id: &ApplicationId, mode: EvaluationMode) -> Result<(), TriggerError> {
        self.requests
            .lock()
            .expect("trigger mutex poisoned")
            .push((id.clone(), mode));
        Ok(())
    }
}

pub(super) struct FailingTrigger;

impl EvaluationTrigger for FailingTrigger {
    fn request(&self, _id: &ApplicationId, _mode: EvaluationMode) -> Result<(), TriggerError> {
        Err(TriggerError::Transport("connection refused".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
