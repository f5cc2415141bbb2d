use crate::infra::{sample_applications, InMemoryApplicationRepository, QueuedEvaluationTrigger};
use clap::Args;
use fellowship_review::error::AppError;
use fellowship_review::review::{
    AdminScoreInput, Application, ApplicationId, ApplicationReviewView, ApplicationRowView,
    EvaluationMode, Notification, QuestionnaireResolver, ReviewService, StagePanel,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ResolveArgs {
    /// Path to a stored application record (JSON with `id`, `answers`, `evaluation_data`)
    pub(crate) path: PathBuf,
    /// Print the raw resolution (sources, warnings, evaluation keys) instead of the card view
    #[arg(long)]
    pub(crate) debug: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the review views as JSON instead of text cards
    #[arg(long)]
    pub(crate) json: bool,
    /// Skip the reviewer actions (evaluation requests and scoring)
    #[arg(long)]
    pub(crate) skip_actions: bool,
}

pub(crate) fn run_resolve(args: ResolveArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.path)?;
    let application: Application = serde_json::from_str(&raw)?;

    let resolved = QuestionnaireResolver::default().resolve(&application);
    let rendered = if args.debug {
        serde_json::to_string_pretty(&resolved)?
    } else {
        serde_json::to_string_pretty(&resolved.review_view(&application))?
    };
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { json, skip_actions } = args;

    let repository = Arc::new(InMemoryApplicationRepository::seeded(sample_applications()));
    let trigger = Arc::new(QueuedEvaluationTrigger::default());
    let service = ReviewService::new(repository, trigger.clone());

    let rows = service.list(usize::MAX)?;
    println!("Fellowship review demo");
    render_table(&rows);

    for row in &rows {
        let view = service.review(&row.application_id)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&view)?);
        } else {
            render_card(&view);
        }
    }

    if skip_actions {
        return Ok(());
    }

    println!("\nReviewer actions");
    let encoded = ApplicationId("app-1002".to_string());
    let scored = ApplicationId("app-1001".to_string());

    render_notification(&service.trigger_evaluation(&encoded, EvaluationMode::Initial)?);
    render_notification(&service.trigger_evaluation(&scored, EvaluationMode::Initial)?);
    render_notification(&service.submit_score(
        &scored,
        AdminScoreInput {
            score: 8,
            notes: Some("Strong operator background.".to_string()),
            reviewer: "Demo Reviewer".to_string(),
        },
    )?);

    let queued = trigger.queued();
    if queued.is_empty() {
        println!("  Evaluation queue: empty");
    } else {
        println!("  Evaluation queue:");
        for request in queued {
            println!(
                "    - {} ({}) at {}",
                request.application_id,
                request.mode.label(),
                request.queued_at.format("%Y-%m-%d %H:%M:%S")
            );
        }
    }

    Ok(())
}

fn render_table(rows: &[ApplicationRowView]) {
    println!("\nApplications ({})", rows.len());
    for row in rows {
        let score = row
            .average_score
            .map(|score| format!("{score:.1}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "- {} | {} | {} | {}/{} answered ({}%) | AI {} | {} / {}{}",
            row.application_id,
            row.team_name,
            row.stage_label,
            row.answered,
            row.total,
            row.percent_complete,
            score,
            row.evaluation_status.label,
            row.review_status.label,
            if row.needs_attention { " | needs attention" } else { "" }
        );
    }
}

fn render_card(view: &ApplicationReviewView) {
    println!("\n{} - {}", view.application_id, view.team_name);
    if !view.team_members.is_empty() {
        println!("  Team: {}", view.team_members.join(", "));
    }

    match &view.stage {
        StagePanel::Determined {
            label,
            raw_value,
            source,
            ..
        } => println!(
            "  Stage: {label} (raw {:?} from {source})",
            raw_value.as_deref().unwrap_or("")
        ),
        StagePanel::Undetermined {
            message, warnings, ..
        } => {
            println!("  Stage: {message}");
            for warning in warnings {
                println!("    ! {warning}");
            }
            return;
        }
    }

    println!(
        "  Progress: {}/{} answered ({}%), {} evaluated",
        view.summary.answered, view.summary.total, view.summary.percent_complete, view.summary.evaluated
    );
    for card in &view.questions {
        let score = match (&card.ai_score, &card.score_badge) {
            (Some(score), Some(badge)) => format!("{score:.1} {}", badge.label),
            _ => card.evaluation_label.to_string(),
        };
        println!("  * {} [{score}]", card.question_text);
        println!("      {}", card.answer);
        for strength in &card.strengths {
            println!("      + {strength}");
        }
        for improvement in &card.improvements {
            println!("      - {improvement}");
        }
    }
    if let Some(feedback) = &view.overall_feedback {
        println!("  Overall: {feedback}");
    }
    for warning in &view.debug.warnings {
        println!("  ! {warning}");
    }
}

fn render_notification(notification: &Notification) {
    println!("  [{:?}] {}: {}", notification.level, notification.title, notification.message);
}
