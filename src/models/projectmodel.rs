use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Open => "open",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }

    /// Status only moves forward; cancellation is reachable from any
    /// non-terminal state.
    pub fn can_transition_to(&self, to: ProjectStatus) -> bool {
        match (self, to) {
            (ProjectStatus::Draft, ProjectStatus::Open) => true,
            (ProjectStatus::Open, ProjectStatus::InProgress) => true,
            (ProjectStatus::InProgress, ProjectStatus::Completed) => true,
            (ProjectStatus::Draft, ProjectStatus::Cancelled) => true,
            (ProjectStatus::Open, ProjectStatus::Cancelled) => true,
            (ProjectStatus::InProgress, ProjectStatus::Cancelled) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "project_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Fixed,
    Hourly,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "priority_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub budget_min: f64,
    pub budget_max: f64,
    pub project_type: ProjectType,
    pub duration_estimate: String,
    pub status: ProjectStatus,
    pub priority: PriorityLevel,
    pub deadline: Option<DateTime<Utc>>,
    pub required_skills: Vec<String>,
    pub proposals_count: i32,
    pub views_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(ProjectStatus::Draft.can_transition_to(ProjectStatus::Open));
        assert!(ProjectStatus::Open.can_transition_to(ProjectStatus::InProgress));
        assert!(ProjectStatus::InProgress.can_transition_to(ProjectStatus::Completed));
        assert!(ProjectStatus::Open.can_transition_to(ProjectStatus::Cancelled));
    }

    #[test]
    fn test_backward_and_terminal_transitions_rejected() {
        assert!(!ProjectStatus::Open.can_transition_to(ProjectStatus::Draft));
        assert!(!ProjectStatus::InProgress.can_transition_to(ProjectStatus::Open));
        assert!(!ProjectStatus::Completed.can_transition_to(ProjectStatus::Cancelled));
        assert!(!ProjectStatus::Cancelled.can_transition_to(ProjectStatus::Open));
        assert!(!ProjectStatus::Open.can_transition_to(ProjectStatus::Open));
    }
}
