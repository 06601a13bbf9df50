use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::projectmodel::{PriorityLevel, ProjectStatus, ProjectType};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_budget_range"))]
pub struct CreateProjectDto {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,

    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,

    #[validate(range(min = 0.0, message = "Minimum budget must be positive"))]
    pub budget_min: f64,

    #[validate(range(min = 0.0, message = "Maximum budget must be positive"))]
    pub budget_max: f64,

    pub project_type: ProjectType,

    pub duration_estimate: Option<String>,

    pub priority: Option<PriorityLevel>,

    pub deadline: Option<DateTime<Utc>>,

    #[validate(length(min = 1, message = "At least one required skill must be provided"))]
    pub required_skills: Vec<String>,
}

fn validate_budget_range(dto: &CreateProjectDto) -> Result<(), ValidationError> {
    if dto.budget_min > dto.budget_max {
        let mut error = ValidationError::new("budget_range");
        error.message = Some("Minimum budget cannot exceed maximum budget".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProjectFilterQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    #[serde(rename = "minBudget")]
    pub min_budget: Option<f64>,
    #[serde(rename = "maxBudget")]
    pub max_budget: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateProjectStatusDto {
    pub status: ProjectStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_project_dto() -> CreateProjectDto {
        CreateProjectDto {
            title: "E-commerce Website Development".to_string(),
            description: "Modern storefront with catalog and checkout".to_string(),
            category: "Web Development".to_string(),
            budget_min: 1000.0,
            budget_max: 2000.0,
            project_type: ProjectType::Fixed,
            duration_estimate: Some("6-8 weeks".to_string()),
            priority: None,
            deadline: None,
            required_skills: vec!["Rust".to_string(), "SQL".to_string()],
        }
    }

    #[test]
    fn test_valid_project_passes() {
        assert!(valid_project_dto().validate().is_ok());
    }

    #[test]
    fn test_inverted_budget_range_rejected() {
        let mut dto = valid_project_dto();
        dto.budget_min = 3000.0;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_equal_budgets_allowed() {
        let mut dto = valid_project_dto();
        dto.budget_min = 1500.0;
        dto.budget_max = 1500.0;
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_empty_skills_rejected() {
        let mut dto = valid_project_dto();
        dto.required_skills = vec![];
        assert!(dto.validate().is_err());
    }
}
