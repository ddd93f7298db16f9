use axum::{
    extract::{Extension, Multipart, Path},
    response::Response,
    routing::{delete, get, patch, post},
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{
    created_response, ok_response, require_field, RouteDef, ADMIN, ANY_ROLE, STAFF,
};
use crate::error::ApiError;
use crate::services::product::{self as product_service, CreateProductInput, UpdateProductInput};
use crate::state::AppState;

//ROUTING TABLE
pub fn routes() -> Vec<RouteDef> {
    vec![
        RouteDef::open("/products", get(list_products)),
        RouteDef::gated("/products", post(create_product), STAFF),
        RouteDef::gated("/product/:id", get(get_product), ANY_ROLE),
        RouteDef::gated("/product/edit/:id", patch(update_product), STAFF),
        RouteDef::gated("/product/:id", delete(delete_product), ADMIN),
        RouteDef::open("/wishlist/:id/:user_id", post(add_to_wishlist)),
        RouteDef::open("/wishlist/:id/:user_id", delete(remove_from_wishlist)),
    ]
}

//ROUTES
async fn list_products(Extension(state): Extension<Arc<AppState>>) -> Result<Response, ApiError> {
    let products = product_service::list_products(&state.db).await?;

    let names = products
        .iter()
        .map(|product| product.name.clone())
        .collect::<Vec<_>>()
        .join(", ");
    Ok(ok_response(
        format!("Products {} retrieved", names),
        products,
    ))
}

async fn get_product(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let product = product_service::get_product(&state.db, &id).await?;
    Ok(ok_response(
        format!("Product {} with ID {} retrieved", product.name, product.id),
        product,
    ))
}

async fn create_product(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let (fields, files) = crate::api::read_multipart(multipart).await?;

    let input = CreateProductInput {
        name: require_field(&fields, "name")?,
        brand_id: parse_uuid(&require_field(&fields, "brand")?, "brand")?,
        kind: require_field(&fields, "type")?
            .parse()
            .map_err(ApiError::InvalidInput)?,
        price: parse_number(&fields, "price")?
            .ok_or_else(|| ApiError::InvalidInput("Please enter a price".into()))?,
        stock: parse_integer(&fields, "stock")?
            .ok_or_else(|| ApiError::InvalidInput("Please enter a stock".into()))?,
    };

    let product = product_service::create_product(&state, input, files).await?;
    Ok(created_response(
        format!("Product {} with ID {} is created", product.name, product.id),
        product,
    ))
}

async fn update_product(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let (fields, files) = crate::api::read_multipart(multipart).await?;

    let input = UpdateProductInput {
        name: fields.get("name").cloned(),
        brand_id: fields
            .get("brand")
            .map(|value| parse_uuid(value, "brand"))
            .transpose()?,
        kind: fields
            .get("type")
            .map(|value| value.parse())
            .transpose()
            .map_err(ApiError::InvalidInput)?,
        price: parse_number(&fields, "price")?,
        stock: parse_integer(&fields, "stock")?,
    };

    let product = product_service::update_product(&state, &id, input, files).await?;
    Ok(ok_response(
        format!("Product {} with ID {} is updated", product.name, product.id),
        product,
    ))
}

async fn delete_product(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let product = product_service::delete_product(&state, &id).await?;
    Ok(ok_response(
        format!("Product {} with ID {} is deleted", product.name, product.id),
        product,
    ))
}

async fn add_to_wishlist(
    Path((id, user_id)): Path<(String, String)>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let product = product_service::add_to_wishlist(&state.db, &id, &user_id).await?;
    Ok(created_response(
        format!("User {} added to wishlist of {}", user_id, product.name),
        product,
    ))
}

async fn remove_from_wishlist(
    Path((id, user_id)): Path<(String, String)>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let product = product_service::remove_from_wishlist(&state.db, &id, &user_id).await?;
    Ok(ok_response(
        format!("User {} removed from wishlist of {}", user_id, product.name),
        product,
    ))
}

//Field parsing
fn parse_uuid(value: &str, key: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value).map_err(|_| ApiError::InvalidInput(format!("Invalid {} ID: {}", key, value)))
}

fn parse_number(fields: &HashMap<String, String>, key: &str) -> Result<Option<f64>, ApiError> {
    fields
        .get(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ApiError::InvalidInput(format!("Invalid number for {}", key)))
        })
        .transpose()
}

fn parse_integer(fields: &HashMap<String, String>, key: &str) -> Result<Option<i32>, ApiError> {
    fields
        .get(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ApiError::InvalidInput(format!("Invalid integer for {}", key)))
        })
        .transpose()
}
