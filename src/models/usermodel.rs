use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Client,
    Freelancer,
    Both,
}

impl UserType {
    pub fn to_str(&self) -> &str {
        match self {
            UserType::Client => "client",
            UserType::Freelancer => "freelancer",
            UserType::Both => "both",
        }
    }

    /// Clients and dual-role accounts may post projects.
    pub fn can_post_projects(&self) -> bool {
        !matches!(self, UserType::Freelancer)
    }

    /// Freelancers and dual-role accounts may submit proposals.
    pub fn can_submit_proposals(&self) -> bool {
        !matches!(self, UserType::Client)
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: uuid::Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub user_type: UserType,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub hourly_rate: Option<f64>,
    pub avatar_url: Option<String>,
    pub rating: f64,
    pub total_reviews: i32,
    pub verified: bool,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_capabilities() {
        assert!(UserType::Client.can_post_projects());
        assert!(UserType::Both.can_post_projects());
        assert!(!UserType::Freelancer.can_post_projects());

        assert!(UserType::Freelancer.can_submit_proposals());
        assert!(UserType::Both.can_submit_proposals());
        assert!(!UserType::Client.can_submit_proposals());
    }
}
