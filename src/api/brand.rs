use axum::{
    extract::{Extension, Multipart, Path},
    response::Response,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;

use crate::api::{
    created_response, ok_response, require_field, RouteDef, ADMIN, ANY_ROLE, STAFF,
};
use crate::error::ApiError;
use crate::services::brand::{self as brand_service, CreateBrandInput, UpdateBrandInput};
use crate::state::AppState;

//ROUTING TABLE
pub fn routes() -> Vec<RouteDef> {
    vec![
        RouteDef::open("/brands", get(list_brands)),
        RouteDef::gated("/brands", post(create_brand), STAFF),
        RouteDef::gated("/brand/:id", get(get_brand), ANY_ROLE),
        RouteDef::gated("/brand/edit/:id", patch(update_brand), STAFF),
        RouteDef::gated("/brand/:id", delete(delete_brand), ADMIN),
    ]
}

//ROUTES
async fn list_brands(Extension(state): Extension<Arc<AppState>>) -> Result<Response, ApiError> {
    let brands = brand_service::list_brands(&state.db).await?;

    let ids = brands
        .iter()
        .map(|brand| brand.id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Ok(ok_response(
        format!("Brands with IDs {} retrieved", ids),
        brands,
    ))
}

async fn get_brand(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let brand = brand_service::get_brand(&state.db, &id).await?;
    Ok(ok_response(
        format!("Brand {} with ID {} retrieved", brand.name, brand.id),
        brand,
    ))
}

async fn create_brand(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let (fields, files) = crate::api::read_multipart(multipart).await?;

    let input = CreateBrandInput {
        name: require_field(&fields, "name")?,
        variant: fields
            .get("variant")
            .map(|value| value.parse())
            .transpose()
            .map_err(ApiError::InvalidInput)?,
    };

    let brand = brand_service::create_brand(&state, input, files).await?;
    Ok(created_response(
        format!("Brand {} with ID {} is created", brand.name, brand.id),
        brand,
    ))
}

async fn update_brand(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let (fields, files) = crate::api::read_multipart(multipart).await?;

    let input = UpdateBrandInput {
        name: fields.get("name").cloned(),
        variant: fields
            .get("variant")
            .map(|value| value.parse())
            .transpose()
            .map_err(ApiError::InvalidInput)?,
    };

    let brand = brand_service::update_brand(&state, &id, input, files).await?;
    Ok(ok_response(
        format!("Brand {} with ID {} is updated", brand.name, brand.id),
        brand,
    ))
}

async fn delete_brand(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let brand = brand_service::delete_brand(&state, &id).await?;
    Ok(ok_response(
        format!("Brand {} with ID {} is deleted", brand.name, brand.id),
        brand,
    ))
}
