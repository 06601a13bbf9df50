use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::reviewmodel::{Review, ReviewWithReviewer};

#[async_trait]
pub trait ReviewExt {
    /// True when the user is the project's client or an accepted
    /// freelancer on it.
    async fn is_user_involved_in_project(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<bool, sqlx::Error>;

    /// Insert the review and recompute the reviewee's aggregate rating in
    /// the same transaction. A duplicate (reviewer, reviewee, project)
    /// triple surfaces as a unique-constraint database error.
    #[allow(clippy::too_many_arguments)]
    async fn create_review(
        &self,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
        project_id: Uuid,
        overall_rating: i32,
        skills_rating: Option<i32>,
        communication_rating: Option<i32>,
        quality_rating: Option<i32>,
        timeliness_rating: Option<i32>,
        comment: Option<String>,
    ) -> Result<Review, sqlx::Error>;

    async fn get_reviews_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ReviewWithReviewer>, sqlx::Error>;

    async fn get_reviews_for_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<ReviewWithReviewer>, sqlx::Error>;
}

#[async_trait]
impl ReviewExt for DBClient {
    async fn is_user_involved_in_project(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM projects
                WHERE id = $1
                  AND (client_id = $2 OR id IN (
                      SELECT project_id FROM proposals
                      WHERE freelancer_id = $2 AND status = 'accepted'::proposal_status
                  ))
            )
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn create_review(
        &self,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
        project_id: Uuid,
        overall_rating: i32,
        skills_rating: Option<i32>,
        communication_rating: Option<i32>,
        quality_rating: Option<i32>,
        timeliness_rating: Option<i32>,
        comment: Option<String>,
    ) -> Result<Review, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews
                (reviewer_id, reviewee_id, project_id, overall_rating, skills_rating,
                 communication_rating, quality_rating, timeliness_rating, comment)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                id, reviewer_id, reviewee_id, project_id, overall_rating,
                skills_rating, communication_rating, quality_rating,
                timeliness_rating, comment, created_at
            "#,
        )
        .bind(reviewer_id)
        .bind(reviewee_id)
        .bind(project_id)
        .bind(overall_rating)
        .bind(skills_rating)
        .bind(communication_rating)
        .bind(quality_rating)
        .bind(timeliness_rating)
        .bind(comment)
        .fetch_one(&mut *tx)
        .await?;

        // Reviewee aggregate: mean of all overall ratings received
        sqlx::query(
            r#"
            UPDATE users
            SET rating = (
                    SELECT AVG(overall_rating)::double precision
                    FROM reviews WHERE reviewee_id = $1
                ),
                total_reviews = (
                    SELECT COUNT(*) FROM reviews WHERE reviewee_id = $1
                ),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(reviewee_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(review)
    }

    async fn get_reviews_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ReviewWithReviewer>, sqlx::Error> {
        sqlx::query_as::<_, ReviewWithReviewer>(
            r#"
            SELECT
                r.id, r.reviewer_id, r.reviewee_id, r.project_id, r.overall_rating,
                r.skills_rating, r.communication_rating, r.quality_rating,
                r.timeliness_rating, r.comment, r.created_at,
                reviewer.first_name || ' ' || reviewer.last_name AS reviewer_name,
                reviewer.avatar_url AS reviewer_avatar,
                p.title AS project_title
            FROM reviews r
            JOIN users reviewer ON r.reviewer_id = reviewer.id
            JOIN projects p ON r.project_id = p.id
            WHERE r.reviewee_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_reviews_for_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<ReviewWithReviewer>, sqlx::Error> {
        sqlx::query_as::<_, ReviewWithReviewer>(
            r#"
            SELECT
                r.id, r.reviewer_id, r.reviewee_id, r.project_id, r.overall_rating,
                r.skills_rating, r.communication_rating, r.quality_rating,
                r.timeliness_rating, r.comment, r.created_at,
                reviewer.first_name || ' ' || reviewer.last_name AS reviewer_name,
                reviewer.avatar_url AS reviewer_avatar,
                p.title AS project_title
            FROM reviews r
            JOIN users reviewer ON r.reviewer_id = reviewer.id
            JOIN projects p ON r.project_id = p.id
            WHERE r.project_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
    }
}
