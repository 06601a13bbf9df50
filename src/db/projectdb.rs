use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::projectmodel::{PriorityLevel, Project, ProjectStatus, ProjectType};

#[async_trait]
pub trait ProjectExt {
    async fn create_project(
        &self,
        client_id: Uuid,
        title: String,
        description: String,
        category: String,
        budget_min: f64,
        budget_max: f64,
        project_type: ProjectType,
        duration_estimate: String,
        priority: PriorityLevel,
        deadline: Option<DateTime<Utc>>,
        required_skills: Vec<String>,
    ) -> Result<Project, sqlx::Error>;

    async fn get_project_by_id(&self, project_id: Uuid) -> Result<Option<Project>, sqlx::Error>;

    /// Fetch a project and bump its view counter in one round trip.
    async fn view_project(&self, project_id: Uuid) -> Result<Option<Project>, sqlx::Error>;

    async fn list_projects(
        &self,
        category: Option<String>,
        search: Option<String>,
        min_budget: Option<f64>,
        max_budget: Option<f64>,
    ) -> Result<Vec<Project>, sqlx::Error>;

    async fn update_project_status(
        &self,
        project_id: Uuid,
        status: ProjectStatus,
    ) -> Result<Project, sqlx::Error>;
}

#[async_trait]
impl ProjectExt for DBClient {
    async fn create_project(
        &self,
        client_id: Uuid,
        title: String,
        description: String,
        category: String,
        budget_min: f64,
        budget_max: f64,
        project_type: ProjectType,
        duration_estimate: String,
        priority: PriorityLevel,
        deadline: Option<DateTime<Utc>>,
        required_skills: Vec<String>,
    ) -> Result<Project, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects
                (client_id, title, description, category, budget_min, budget_max,
                 project_type, duration_estimate, status, priority, deadline, required_skills)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'open'::project_status, $9, $10, $11)
            RETURNING
                id, client_id, title, description, category, budget_min, budget_max,
                project_type, duration_estimate, status, priority, deadline,
                required_skills, proposals_count, views_count, created_at, updated_at
            "#,
        )
        .bind(client_id)
        .bind(title)
        .bind(description)
        .bind(category)
        .bind(budget_min)
        .bind(budget_max)
        .bind(project_type)
        .bind(duration_estimate)
        .bind(priority)
        .bind(deadline)
        .bind(required_skills)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_project_by_id(&self, project_id: Uuid) -> Result<Option<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT
                id, client_id, title, description, category, budget_min, budget_max,
                project_type, duration_estimate, status, priority, deadline,
                required_skills, proposals_count, views_count, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn view_project(&self, project_id: Uuid) -> Result<Option<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET views_count = views_count + 1
            WHERE id = $1
            RETURNING
                id, client_id, title, description, category, budget_min, budget_max,
                project_type, duration_estimate, status, priority, deadline,
                required_skills, proposals_count, views_count, created_at, updated_at
            "#,
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_projects(
        &self,
        category: Option<String>,
        search: Option<String>,
        min_budget: Option<f64>,
        max_budget: Option<f64>,
    ) -> Result<Vec<Project>, sqlx::Error> {
        // All filters AND together; each predicate is skipped when its
        // parameter is NULL.
        sqlx::query_as::<_, Project>(
            r#"
            SELECT
                id, client_id, title, description, category, budget_min, budget_max,
                project_type, duration_estimate, status, priority, deadline,
                required_skills, proposals_count, views_count, created_at, updated_at
            FROM projects
            WHERE ($1::text IS NULL OR LOWER(category) = LOWER($1))
              AND ($2::text IS NULL
                   OR title ILIKE '%' || $2 || '%'
                   OR description ILIKE '%' || $2 || '%'
                   OR EXISTS (
                        SELECT 1 FROM unnest(required_skills) AS skill
                        WHERE skill ILIKE '%' || $2 || '%'
                   ))
              AND ($3::double precision IS NULL OR budget_min >= $3)
              AND ($4::double precision IS NULL OR budget_max <= $4)
            ORDER BY created_at DESC
            "#,
        )
        .bind(category)
        .bind(search)
        .bind(min_budget)
        .bind(max_budget)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_project_status(
        &self,
        project_id: Uuid,
        status: ProjectStatus,
    ) -> Result<Project, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, client_id, title, description, category, budget_min, budget_max,
                project_type, duration_estimate, status, priority, deadline,
                required_skills, proposals_count, views_count, created_at, updated_at
            "#,
        )
        .bind(project_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }
}
