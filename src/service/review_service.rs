use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{db::DBClient, projectdb::ProjectExt, reviewdb::ReviewExt, userdb::UserExt},
    dtos::reviewdtos::CreateReviewDto,
    models::reviewmodel::{Review, ReviewWithReviewer},
    service::error::ServiceError,
};

#[derive(Debug, Clone)]
pub struct ReviewService {
    db_client: Arc<DBClient>,
}

impl ReviewService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Record a rating from one project participant about another. One
    /// review per (reviewer, reviewee, project); the reviewee's aggregate
    /// rating is recomputed in the same transaction as the insert.
    pub async fn create_review(
        &self,
        reviewer_id: Uuid,
        body: CreateReviewDto,
    ) -> Result<Review, ServiceError> {
        if body.reviewee_id == reviewer_id {
            return Err(ServiceError::Validation(
                "You cannot review yourself".to_string(),
            ));
        }

        let project = self
            .db_client
            .get_project_by_id(body.project_id)
            .await?
            .ok_or(ServiceError::ProjectNotFound(body.project_id))?;

        self.db_client
            .get_user(Some(body.reviewee_id), None)
            .await?
            .ok_or(ServiceError::UserNotFound(body.reviewee_id))?;

        let involved = self
            .db_client
            .is_user_involved_in_project(reviewer_id, project.id)
            .await?;

        if !involved {
            return Err(ServiceError::NotInvolvedInProject);
        }

        let review = self
            .db_client
            .create_review(
                reviewer_id,
                body.reviewee_id,
                body.project_id,
                body.overall_rating,
                body.skills_rating,
                body.communication_rating,
                body.quality_rating,
                body.timeliness_rating,
                body.comment,
            )
            .await
            .map_err(|e| ServiceError::from_sqlx(e, ServiceError::DuplicateReview))?;

        tracing::info!(
            "review {} recorded for user {} on project {}",
            review.id,
            body.reviewee_id,
            body.project_id
        );

        Ok(review)
    }

    pub async fn list_reviews_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ReviewWithReviewer>, ServiceError> {
        Ok(self.db_client.get_reviews_for_user(user_id).await?)
    }

    pub async fn list_reviews_for_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<ReviewWithReviewer>, ServiceError> {
        Ok(self.db_client.get_reviews_for_project(project_id).await?)
    }
}
