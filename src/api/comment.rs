use axum::{
    extract::{Extension, Path},
    response::Response,
    routing::{delete, get, patch, post},
    Json,
};
use std::sync::Arc;

use crate::api::{created_response, ok_response, RouteDef, ADMIN, ANY_ROLE};
use crate::error::ApiError;
use crate::services::comment::{self as comment_service, CreateCommentInput, UpdateCommentInput};
use crate::state::AppState;

//ROUTING TABLE
pub fn routes() -> Vec<RouteDef> {
    vec![
        RouteDef::open("/comments", get(list_comments)),
        RouteDef::gated("/comments", post(create_comment), ANY_ROLE),
        RouteDef::gated("/comment/:id", get(get_comment), ANY_ROLE),
        RouteDef::gated("/comment/edit/:id", patch(update_comment), ANY_ROLE),
        RouteDef::gated("/comment/:id", delete(delete_comment), ADMIN),
    ]
}

//ROUTES
async fn list_comments(Extension(state): Extension<Arc<AppState>>) -> Result<Response, ApiError> {
    let comments = comment_service::list_comments(&state.db).await?;

    let ids = comments
        .iter()
        .map(|comment| comment.id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Ok(ok_response(
        format!("Comments with IDs {} retrieved", ids),
        comments,
    ))
}

async fn get_comment(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let details = comment_service::get_comment(&state.db, &id).await?;
    Ok(ok_response(
        format!("Comment with ID {} retrieved", details.comment.id),
        details,
    ))
}

async fn create_comment(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CreateCommentInput>,
) -> Result<Response, ApiError> {
    let comment = comment_service::create_comment(&state, payload).await?;
    Ok(created_response(
        format!(
            "Comment by {} with ID {} is created",
            comment.user.username, comment.id
        ),
        comment,
    ))
}

async fn update_comment(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<UpdateCommentInput>,
) -> Result<Response, ApiError> {
    let comment = comment_service::update_comment(&state, &id, payload).await?;
    Ok(ok_response(
        format!("Comment with ID {} is updated", comment.id),
        comment,
    ))
}

async fn delete_comment(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let comment = comment_service::delete_comment(&state.db, &id).await?;
    Ok(ok_response(
        format!("Comment with ID {} is deleted", comment.id),
        comment,
    ))
}
