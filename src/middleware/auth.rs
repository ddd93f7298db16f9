use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::{str::FromStr, sync::Arc};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::user::{self, Entity as UserEntity, Role};
use crate::state::AppState;

/// Per-route auth configuration: the shared state plus the roles allowed to
/// pass. Route descriptors carry the role list; this is how it reaches the
/// middleware.
#[derive(Clone)]
pub struct AuthState {
    pub state: Arc<AppState>,
    pub roles: &'static [Role],
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub role: String,
    pub exp: usize,
}

pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => {
            header.strip_prefix("Bearer ").unwrap_or_default()
        }
        _ => return Err(StatusCode::UNAUTHORIZED),
    };

    let claims = match validate_token(&auth, token).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "Rejected bearer token");
            return Err(match err {
                AuthError::Forbidden => StatusCode::FORBIDDEN,
                _ => StatusCode::UNAUTHORIZED,
            });
        }
    };

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub fn generate_token(user_id: Uuid, role: Role, secret: &str) -> Result<String, AuthError> {
    let exp = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or(AuthError::GenerationFail)?
        .timestamp() as usize;

    let claims = Claims {
        user_id,
        role: role.to_string(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::GenerationFail)
}

async fn validate_token(auth: &AuthState, token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.state.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AuthError::TokenInvalid)?;

    let claims = token_data.claims;
    let role = Role::from_str(&claims.role).map_err(|_| AuthError::InvalidUserOrRole)?;

    // The token must still match a live user carrying the claimed role.
    let known = UserEntity::find_by_id(claims.user_id)
        .filter(user::Column::Role.eq(role))
        .one(&auth.state.db)
        .await
        .map_err(|_| AuthError::InternalServerError)?;

    if known.is_none() {
        return Err(AuthError::InvalidUserOrRole);
    }
    if !auth.roles.contains(&role) {
        return Err(AuthError::Forbidden);
    }

    Ok(claims)
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid user id or role")]
    InvalidUserOrRole,
    #[error("Token expired or malformed")]
    TokenInvalid,
    #[error("Role not allowed on this route")]
    Forbidden,
    #[error("Failed to generate token")]
    GenerationFail,
    #[error("Internal server error")]
    InternalServerError,
}
