use super::domain::{QuestionDefinition, Stage};

const IDEA_QUESTIONS: &[QuestionDefinition] = &[
    QuestionDefinition {
        key: "ideaDescription",
        text: "Describe your idea.",
    },
    QuestionDefinition {
        key: "problemSolved",
        text: "What problem are you solving, and for whom?",
    },
    QuestionDefinition {
        key: "targetCustomer",
        text: "Who is your target customer?",
    },
    QuestionDefinition {
        key: "uniqueValue",
        text: "What makes your solution different from existing alternatives?",
    },
    QuestionDefinition {
        key: "validationSteps",
        text: "How have you validated the idea so far?",
    },
    QuestionDefinition {
        key: "teamFit",
        text: "Why is your team the right one to build this?",
    },
];

const MVP_QUESTIONS: &[QuestionDefinition] = &[
    QuestionDefinition {
        key: "productDescription",
        text: "Describe your product and what the MVP does today.",
    },
    QuestionDefinition {
        key: "problemSolved",
        text: "What problem are you solving, and for whom?",
    },
    QuestionDefinition {
        key: "targetCustomer",
        text: "Who is your target customer?",
    },
    QuestionDefinition {
        key: "userFeedback",
        text: "What feedback have early users given you?",
    },
    QuestionDefinition {
        key: "tractionMetrics",
        text: "What traction have you seen so far?",
    },
    QuestionDefinition {
        key: "teamFit",
        text: "Why is your team the right one to build this?",
    },
];

const EARLY_REVENUE_QUESTIONS: &[QuestionDefinition] = &[
    QuestionDefinition {
        key: "productDescription",
        text: "Describe your product and what the MVP does today.",
    },
    QuestionDefinition {
        key: "problemSolved",
        text: "What problem are you solving, and for whom?",
    },
    QuestionDefinition {
        key: "revenueModel",
        text: "How does your business make money?",
    },
    QuestionDefinition {
        key: "currentRevenue",
        text: "What is your current monthly revenue?",
    },
    QuestionDefinition {
        key: "customerAcquisition",
        text: "How do you acquire customers?",
    },
    QuestionDefinition {
        key: "growthPlan",
        text: "What is your growth plan for the next 12 months?",
    },
    QuestionDefinition {
        key: "teamFit",
        text: "Why is your team the right one to build this?",
    },
];

/// Ordered question set for a stage; empty when the stage is unknown.
pub fn questions_for_stage(stage: Option<Stage>) -> &'static [QuestionDefinition] {
    match stage {
        Some(Stage::Idea) => IDEA_QUESTIONS,
        Some(Stage::Mvp) => MVP_QUESTIONS,
        Some(Stage::EarlyRevenue) => EARLY_REVENUE_QUESTIONS,
        None => &[],
    }
}
