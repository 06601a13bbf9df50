use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalDto {
    pub project_id: Uuid,

    #[validate(length(min = 10, max = 5000, message = "Cover letter must be between 10 and 5000 characters"))]
    pub cover_letter: String,

    #[validate(range(min = 0.0, message = "Proposed budget must be positive"))]
    pub proposed_budget: f64,

    #[validate(length(min = 1, max = 100, message = "Proposed timeline is required"))]
    pub proposed_timeline: String,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct RespondToProposalDto {
    #[validate(length(min = 1))]
    pub response: String, // "accepted" or "rejected"
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProposalQuery {
    pub project_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_cover_letter_rejected() {
        let dto = CreateProposalDto {
            project_id: Uuid::new_v4(),
            cover_letter: "too short".to_string(),
            proposed_budget: 1500.0,
            proposed_timeline: "7 weeks".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_negative_budget_rejected() {
        let dto = CreateProposalDto {
            project_id: Uuid::new_v4(),
            cover_letter: "I am excited about this project and well suited for it".to_string(),
            proposed_budget: -10.0,
            proposed_timeline: "7 weeks".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
