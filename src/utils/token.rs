use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorMessage, HttpError};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

pub fn create_token(
    user_id: &str,
    secret: &[u8],
    expires_in_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    if user_id.is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
    }

    let now = Utc::now();
    let claims = TokenClaims {
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::minutes(expires_in_minutes)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

pub fn decode_token<T: Into<String>>(token: T, secret: &[u8]) -> Result<String, HttpError> {
    let decoded = decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    );

    match decoded {
        Ok(token) => Ok(token.claims.sub),
        Err(_) => Err(HttpError::unauthorized(
            ErrorMessage::InvalidToken.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn test_create_and_decode_token() {
        let user_id = "b5f3e3a4-9f2e-4c8a-b1d0-111111111111";
        let token = create_token(user_id, SECRET, 60).unwrap();
        let decoded = decode_token(token, SECRET).unwrap();

        assert_eq!(decoded, user_id);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Issued with a negative lifetime, so exp is well past the
        // validation leeway window
        let token = create_token("some-user", SECRET, -10).unwrap();
        let result = decode_token(token, SECRET);

        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token("some-user", SECRET, 60).unwrap();
        let result = decode_token(token, b"other-secret");

        assert!(result.is_err());
    }

    #[test]
    fn test_empty_user_id_rejected() {
        assert!(create_token("", SECRET, 60).is_err());
    }
}
