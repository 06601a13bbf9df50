use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::usermodel::{User, UserType};

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn save_user<T: Into<String> + Send>(
        &self,
        email: T,
        first_name: T,
        last_name: T,
        password: T,
        user_type: UserType,
    ) -> Result<User, sqlx::Error>;

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        first_name: Option<String>,
        last_name: Option<String>,
        bio: Option<String>,
        location: Option<String>,
        hourly_rate: Option<f64>,
        avatar_url: Option<String>,
    ) -> Result<User, sqlx::Error>;

    async fn get_top_freelancers(&self, limit: i64) -> Result<Vec<User>, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, email, first_name, last_name, password, user_type,
                bio, location, hourly_rate, avatar_url,
                rating, total_reviews, verified,
                created_at, updated_at
            FROM users
            WHERE ($1::uuid IS NULL OR id = $1)
              AND ($2::text IS NULL OR email = $2)
            "#,
        )
        .bind(user_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_user<T: Into<String> + Send>(
        &self,
        email: T,
        first_name: T,
        last_name: T,
        password: T,
        user_type: UserType,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, first_name, last_name, password, user_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id, email, first_name, last_name, password, user_type,
                bio, location, hourly_rate, avatar_url,
                rating, total_reviews, verified,
                created_at, updated_at
            "#,
        )
        .bind(email.into())
        .bind(first_name.into())
        .bind(last_name.into())
        .bind(password.into())
        .bind(user_type)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        first_name: Option<String>,
        last_name: Option<String>,
        bio: Option<String>,
        location: Option<String>,
        hourly_rate: Option<f64>,
        avatar_url: Option<String>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                bio = COALESCE($4, bio),
                location = COALESCE($5, location),
                hourly_rate = COALESCE($6, hourly_rate),
                avatar_url = COALESCE($7, avatar_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, email, first_name, last_name, password, user_type,
                bio, location, hourly_rate, avatar_url,
                rating, total_reviews, verified,
                created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(first_name)
        .bind(last_name)
        .bind(bio)
        .bind(location)
        .bind(hourly_rate)
        .bind(avatar_url)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_top_freelancers(&self, limit: i64) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, email, first_name, last_name, password, user_type,
                bio, location, hourly_rate, avatar_url,
                rating, total_reviews, verified,
                created_at, updated_at
            FROM users
            WHERE user_type IN ('freelancer'::user_type, 'both'::user_type)
              AND total_reviews > 0
            ORDER BY rating DESC, total_reviews DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
