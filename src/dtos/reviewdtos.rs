use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewDto {
    pub reviewee_id: Uuid,
    pub project_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Overall rating must be between 1 and 5"))]
    pub overall_rating: i32,

    #[validate(range(min = 1, max = 5, message = "Skills rating must be between 1 and 5"))]
    pub skills_rating: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Communication rating must be between 1 and 5"))]
    pub communication_rating: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Quality rating must be between 1 and 5"))]
    pub quality_rating: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Timeliness rating must be between 1 and 5"))]
    pub timeliness_rating: Option<i32>,

    #[validate(length(max = 5000, message = "Comment must not exceed 5000 characters"))]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReviewsQuery {
    pub user_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_out_of_range_rejected() {
        let dto = CreateReviewDto {
            reviewee_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            overall_rating: 6,
            skills_rating: None,
            communication_rating: None,
            quality_rating: None,
            timeliness_rating: None,
            comment: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_optional_sub_ratings_validated_when_present() {
        let dto = CreateReviewDto {
            reviewee_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            overall_rating: 5,
            skills_rating: Some(0),
            communication_rating: None,
            quality_rating: None,
            timeliness_rating: None,
            comment: None,
        };
        assert!(dto.validate().is_err());
    }
}
