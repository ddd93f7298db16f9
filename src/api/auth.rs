use argon2::{password_hash::PasswordHash, Argon2, PasswordVerifier};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::api::{ok_response, RouteDef, ADMIN};
use crate::entities::user::{self, Entity as User};
use crate::error::ApiError;
use crate::middleware::auth::generate_token;
use crate::services::parse_id;
use crate::state::AppState;

//ROUTING TABLE
pub fn routes() -> Vec<RouteDef> {
    vec![
        RouteDef::open("/login", post(login)),
        RouteDef::gated("/users", get(list_users), ADMIN),
        RouteDef::gated("/user/:id", get(get_user), ADMIN),
    ]
}

//ROUTES
async fn login(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Response, ApiError> {
    let unknown = || ApiError::InvalidInput("Invalid username or password".into());

    let account = User::find()
        .filter(user::Column::Username.eq(&payload.username))
        .one(&state.db)
        .await?
        .ok_or_else(unknown)?;

    let parsed_hash = PasswordHash::new(&account.password)
        .map_err(|_| ApiError::Internal("Stored password hash is malformed".into()))?;
    Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| unknown())?;

    let token = generate_token(account.id, account.role, &state.jwt_secret)
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok((StatusCode::OK, Json(json!({ "token": token }))).into_response())
}

async fn list_users(Extension(state): Extension<Arc<AppState>>) -> Result<Response, ApiError> {
    let users = User::find()
        .order_by_desc(user::Column::CreatedAt)
        .all(&state.db)
        .await?;

    if users.is_empty() {
        return Err(ApiError::NotFound("No users found".into()));
    }

    let names = users
        .iter()
        .map(|account| account.username.clone())
        .collect::<Vec<_>>()
        .join(", ");
    Ok(ok_response(format!("Users {} retrieved", names), users))
}

async fn get_user(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let id = parse_id("user", &id)?;
    let account = User::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found with ID: {}", id)))?;

    Ok(ok_response(
        format!("User {} with ID {} retrieved", account.username, account.id),
        account,
    ))
}

//Structs
#[derive(Deserialize)]
struct LoginPayload {
    username: String,
    password: String,
}
