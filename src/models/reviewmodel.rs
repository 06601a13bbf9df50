use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Review {
    pub id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub project_id: Uuid,
    pub overall_rating: i32,
    pub skills_rating: Option<i32>,
    pub communication_rating: Option<i32>,
    pub quality_rating: Option<i32>,
    pub timeliness_rating: Option<i32>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Review joined with reviewer display data and the project title.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct ReviewWithReviewer {
    pub id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub project_id: Uuid,
    pub overall_rating: i32,
    pub skills_rating: Option<i32>,
    pub communication_rating: Option<i32>,
    pub quality_rating: Option<i32>,
    pub timeliness_rating: Option<i32>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewer_name: String,
    pub reviewer_avatar: Option<String>,
    pub project_title: String,
}
