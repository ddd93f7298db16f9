pub mod auth;
pub mod brand;
pub mod comment;
pub mod product;
pub mod transaction;

use axum::{
    extract::Multipart,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::MethodRouter,
    Extension, Json, Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::entities::user::Role;
use crate::error::ApiError;
use crate::media::UploadFile;
use crate::middleware::auth::{auth_middleware, AuthState};
use crate::state::AppState;

pub const ADMIN: &[Role] = &[Role::Admin];
pub const STAFF: &[Role] = &[Role::Admin, Role::Employee];
pub const ANY_ROLE: &[Role] = &[Role::Admin, Role::Employee, Role::Customer];
pub const CUSTOMER: &[Role] = &[Role::Customer];

/// One routing table entry: path, required roles and the method-bound
/// handler. Each resource module exposes its table as data and
/// `register_routes` turns the whole thing into a router, wiring the auth
/// middleware onto gated entries.
pub struct RouteDef {
    pub path: &'static str,
    pub roles: Option<&'static [Role]>,
    pub handler: MethodRouter,
}

impl RouteDef {
    pub fn open(path: &'static str, handler: MethodRouter) -> Self {
        Self {
            path,
            roles: None,
            handler,
        }
    }

    pub fn gated(path: &'static str, handler: MethodRouter, roles: &'static [Role]) -> Self {
        Self {
            path,
            roles: Some(roles),
            handler,
        }
    }
}

pub fn register_routes(defs: Vec<RouteDef>, state: &Arc<AppState>) -> Router {
    defs.into_iter().fold(Router::new(), |router, def| {
        let RouteDef {
            path,
            roles,
            handler,
        } = def;
        let handler = match roles {
            Some(roles) => handler.layer(from_fn_with_state(
                AuthState {
                    state: state.clone(),
                    roles,
                },
                auth_middleware,
            )),
            None => handler,
        };
        router.route(path, handler)
    })
}

pub fn create_api_router(state: Arc<AppState>) -> Router {
    let mut defs = Vec::new();
    defs.extend(auth::routes());
    defs.extend(brand::routes());
    defs.extend(product::routes());
    defs.extend(comment::routes());
    defs.extend(transaction::routes());

    register_routes(defs, &state).layer(Extension(state))
}

//Response envelopes
pub fn ok_response(message: String, data: impl Serialize) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "message": message, "data": data })),
    )
        .into_response()
}

pub fn created_response(message: String, data: impl Serialize) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({ "message": message, "data": data })),
    )
        .into_response()
}

//Multipart handling
static FILE_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9 ._-]+$").expect("file name regex must compile")
});

const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Splits a multipart body into plain text fields and attached files. Parts
/// carrying a file name are treated as uploads and must be images with a sane
/// file name; everything else is a text field.
pub async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(HashMap<String, String>, Vec<UploadFile>), ApiError> {
    let mut fields = HashMap::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::InvalidInput(err.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(|value| value.to_string());
        let content_type = field.content_type().map(|value| value.to_string());

        match file_name {
            Some(original_name) => {
                if !FILE_NAME_REGEX.is_match(&original_name) {
                    return Err(ApiError::InvalidInput(
                        "Invalid file name. It should contain only Latin letters, numbers, spaces, '.', '-', or '_'."
                            .into(),
                    ));
                }
                let content_type = content_type
                    .ok_or_else(|| ApiError::InvalidInput("Content type is not set.".into()))?;
                if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
                    return Err(ApiError::InvalidInput("Unsupported content type.".into()));
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::InvalidInput(err.to_string()))?;
                files.push(UploadFile {
                    original_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| ApiError::InvalidInput(err.to_string()))?;
                fields.insert(name, value);
            }
        }
    }

    Ok((fields, files))
}

pub fn require_field(fields: &HashMap<String, String>, key: &str) -> Result<String, ApiError> {
    fields
        .get(key)
        .cloned()
        .ok_or_else(|| ApiError::InvalidInput(format!("Please enter a {}", key)))
}

//Fallback
const NOT_FOUND_PAGE: &str = "./public/404.html";

/// Unmatched routes answer 404 with a body negotiated from `Accept`:
/// an HTML page, a JSON object or plain text.
pub async fn fallback_404(headers: HeaderMap) -> Response {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if accept.contains("text/html") || accept.contains("*/*") {
        if let Ok(file) = tokio::fs::File::open(NOT_FOUND_PAGE).await {
            let content_type = mime_guess::from_path(NOT_FOUND_PAGE)
                .first_raw()
                .unwrap_or("text/html");
            let body = axum::body::Body::from_stream(ReaderStream::new(file));
            let mut headers = HeaderMap::new();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_str(content_type)
                    .unwrap_or(HeaderValue::from_static("text/html")),
            );
            return (StatusCode::NOT_FOUND, headers, body).into_response();
        }
        return (StatusCode::NOT_FOUND, "404 Not Found").into_response();
    }

    if accept.contains("json") {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "404 Not Found" })),
        )
            .into_response();
    }

    (StatusCode::NOT_FOUND, "404 Not Found").into_response()
}
