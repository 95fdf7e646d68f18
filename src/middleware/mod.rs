use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::JwtConfig;
use crate::error::AppError;

pub const ADMIN_ROLE: &str = "Admin";

// Token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: i64,
}

/// Caller identity taken from a `Bearer` token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub subject: String,
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn require_role(&self, role: &str) -> Result<(), AppError> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!("{} role required", role)))
        }
    }
}

/// Caller that passed the admin capability check.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

/// Signs a token for `subject` carrying `roles`.
pub fn issue_token(
    jwt: &JwtConfig,
    subject: &str,
    roles: &[&str],
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: subject.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        exp: Utc::now().timestamp() + jwt.expires_in_hours * 3600,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(jwt.secret.as_bytes()))
}

fn verify_token(jwt: &JwtConfig, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })
}

// Bearer auth extractor
impl FromRequestParts<Arc<crate::AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Expected a Bearer token".to_string()))?;

        let claims = verify_token(&state.jwt, token)?;

        Ok(AuthUser {
            subject: claims.sub,
            roles: claims.roles,
        })
    }
}

impl FromRequestParts<Arc<crate::AppState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require_role(ADMIN_ROLE)?;
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt() -> JwtConfig {
        JwtConfig { secret: "unit-test-secret".into(), expires_in_hours: 1 }
    }

    #[test]
    fn issued_token_round_trips_roles() {
        let token = issue_token(&jwt(), "alice", &[ADMIN_ROLE]).unwrap();
        let claims = verify_token(&jwt(), &token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.roles, vec![ADMIN_ROLE.to_string()]);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let other = JwtConfig { secret: "someone-else".into(), expires_in_hours: 1 };
        let token = issue_token(&other, "mallory", &[ADMIN_ROLE]).unwrap();
        assert!(matches!(verify_token(&jwt(), &token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired = JwtConfig { secret: "unit-test-secret".into(), expires_in_hours: -2 };
        let token = issue_token(&expired, "alice", &[]).unwrap();
        assert!(matches!(verify_token(&jwt(), &token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn require_role_is_forbidden_without_it() {
        let user = AuthUser { subject: "bob".into(), roles: vec!["User".into()] };
        assert!(matches!(user.require_role(ADMIN_ROLE), Err(AppError::Forbidden(_))));
        assert!(user.require_role("User").is_ok());
    }
}
