use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::usermodel::{User, UserType};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters"),
        length(max = 64, message = "Password must not be more than 64 characters")
    )]
    pub password: String,

    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    pub user_type: UserType,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters"),
        length(max = 64, message = "Password must not be more than 64 characters")
    )]
    pub password: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,

    #[validate(length(max = 2000, message = "Bio must not exceed 2000 characters"))]
    pub bio: Option<String>,

    #[validate(length(max = 255, message = "Location must not exceed 255 characters"))]
    pub location: Option<String>,

    #[validate(range(min = 0.0, message = "Hourly rate must be positive"))]
    pub hourly_rate: Option<f64>,

    #[validate(url(message = "Invalid avatar URL"))]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct TopFreelancersQuery {
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<u32>,
}

/// Account owner's view of their own record; the password hash never
/// leaves the service.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterUserDto {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub hourly_rate: Option<f64>,
    pub avatar_url: Option<String>,
    pub rating: f64,
    pub total_reviews: i32,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            email: user.email.to_owned(),
            first_name: user.first_name.to_owned(),
            last_name: user.last_name.to_owned(),
            user_type: user.user_type,
            bio: user.bio.clone(),
            location: user.location.clone(),
            hourly_rate: user.hourly_rate,
            avatar_url: user.avatar_url.clone(),
            rating: user.rating,
            total_reviews: user.total_reviews,
            verified: user.verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// What other marketplace participants see: no email.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUserDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub hourly_rate: Option<f64>,
    pub avatar_url: Option<String>,
    pub rating: f64,
    pub total_reviews: i32,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl PublicUserDto {
    pub fn from_user(user: &User) -> Self {
        PublicUserDto {
            id: user.id.to_string(),
            first_name: user.first_name.to_owned(),
            last_name: user.last_name.to_owned(),
            user_type: user.user_type,
            bio: user.bio.clone(),
            location: user.location.clone(),
            hourly_rate: user.hourly_rate,
            avatar_url: user.avatar_url.clone(),
            rating: user.rating,
            total_reviews: user.total_reviews,
            verified: user.verified,
            created_at: user.created_at,
        }
    }

    pub fn from_users(users: &[User]) -> Vec<Self> {
        users.iter().map(Self::from_user).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register_dto() -> RegisterUserDto {
        RegisterUserDto {
            email: "jane@example.com".to_string(),
            password: "password123".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            user_type: UserType::Client,
        }
    }

    #[test]
    fn test_register_dto_valid() {
        assert!(valid_register_dto().validate().is_ok());
    }

    #[test]
    fn test_register_dto_rejects_bad_email() {
        let mut dto = valid_register_dto();
        dto.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_register_dto_rejects_short_password() {
        let mut dto = valid_register_dto();
        dto.password = "short".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_user_type_parses_lowercase_wire_values() {
        let dto: RegisterUserDto = serde_json::from_str(
            r#"{"email":"a@b.com","password":"password123","firstName":"A","lastName":"B","userType":"freelancer"}"#,
        )
        .unwrap();
        assert_eq!(dto.user_type, UserType::Freelancer);
    }
}
