//! JWT authentication glue
//!
//! Authentication proper (login, identity providers) is the platform's
//! concern; the media subsystem only needs to know which user a request
//! acts for, so this module verifies bearer tokens and resolves the caller
//! to a [`User`].

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{models::User, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

pub fn create_jwt(user: &User, secret: &str) -> anyhow::Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        iat: now.timestamp(),
        exp: (now + chrono::Duration::hours(24)).timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn verify_jwt(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Authenticated caller, resolved against the user directory on every
/// request so a deleted account stops working immediately even with a
/// valid token.
pub struct AuthUser {
    pub user: User,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let token = header.strip_prefix("Bearer ").ok_or(StatusCode::UNAUTHORIZED)?;

        let claims = verify_jwt(token, &state.config.jwt_secret)
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        let user = state
            .db
            .get_user_by_id(claims.sub)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(AuthUser { user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "testy".to_string(),
            display_name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trips_claims() {
        let user = test_user();
        let token = create_jwt(&user, "test-secret").unwrap();
        let claims = verify_jwt(&token, "test-secret").unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, user.username);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn verification_fails_with_wrong_secret() {
        let token = create_jwt(&test_user(), "right-secret").unwrap();
        assert!(verify_jwt(&token, "wrong-secret").is_err());
    }

    #[test]
    fn verification_fails_for_garbage_tokens() {
        assert!(verify_jwt("not-a-token", "secret").is_err());
    }
}
