use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::entities::brand::{self, Entity as Brand, Variant};
use crate::entities::image::ImageSet;
use crate::entities::product::{self, Entity as Product};
use crate::error::ApiError;
use crate::media::UploadFile;
use crate::services::{parse_id, product::delete_product_cascade, upload_all};
use crate::state::AppState;

#[derive(Debug, Validate)]
pub struct CreateBrandInput {
    #[validate(length(
        min = 1,
        max = 30,
        message = "The brand name cannot exceed 30 characters"
    ))]
    pub name: String,
    pub variant: Option<Variant>,
}

#[derive(Debug, Default, Validate)]
pub struct UpdateBrandInput {
    #[validate(length(
        min = 1,
        max = 30,
        message = "The brand name cannot exceed 30 characters"
    ))]
    pub name: Option<String>,
    pub variant: Option<Variant>,
}

pub async fn list_brands(db: &DatabaseConnection) -> Result<Vec<brand::Model>, ApiError> {
    let brands = Brand::find()
        .order_by_desc(brand::Column::CreatedAt)
        .all(db)
        .await?;

    if brands.is_empty() {
        return Err(ApiError::NotFound("No brands found".into()));
    }
    Ok(brands)
}

pub async fn get_brand(db: &DatabaseConnection, id: &str) -> Result<brand::Model, ApiError> {
    let id = parse_id("brand", id)?;
    Brand::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Brand not found with ID: {}", id)))
}

pub async fn create_brand(
    state: &AppState,
    input: CreateBrandInput,
    files: Vec<UploadFile>,
) -> Result<brand::Model, ApiError> {
    input.validate()?;
    assert_unique_name(&state.db, &input.name, None).await?;

    let images = upload_all(state, &files).await?;
    if images.is_empty() {
        return Err(ApiError::InvalidInput(
            "At least one image is required".into(),
        ));
    }

    let new_brand = brand::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        variant: Set(input.variant.unwrap_or_default()),
        images: Set(ImageSet(images)),
        created_at: Set(Utc::now()),
    };

    Ok(new_brand.insert(&state.db).await?)
}

pub async fn update_brand(
    state: &AppState,
    id: &str,
    input: UpdateBrandInput,
    files: Vec<UploadFile>,
) -> Result<brand::Model, ApiError> {
    let id = parse_id("brand", id)?;
    input.validate()?;

    let existing = Brand::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Brand not found with ID: {}", id)))?;

    if let Some(name) = &input.name {
        assert_unique_name(&state.db, name, Some(id)).await?;
    }

    let old_images = existing.images.clone();
    let mut active: brand::ActiveModel = existing.into();

    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(variant) = input.variant {
        active.variant = Set(variant);
    }
    // New files fully replace the image set; the previous assets are removed
    // from the media host.
    if !files.is_empty() {
        let images = upload_all(state, &files).await?;
        active.images = Set(ImageSet(images));
        state.media.delete_many(&old_images.public_ids()).await?;
    }

    Ok(active.update(&state.db).await?)
}

/// Deletes the brand, its media assets and every product carrying the brand
/// (transitively the products' transactions and assets). The legs run
/// concurrently with no compensation; a partial failure leaves the remainder
/// in place and surfaces the first error.
pub async fn delete_brand(state: &AppState, id: &str) -> Result<brand::Model, ApiError> {
    let id = parse_id("brand", id)?;

    let existing = Brand::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Brand not found with ID: {}", id)))?;

    let dependents = Product::find()
        .filter(product::Column::BrandId.eq(id))
        .all(&state.db)
        .await?;

    let public_ids = existing.images.public_ids();
    let (brand_result, images_result, cascade_results) = futures::join!(
        Brand::delete_by_id(id).exec(&state.db),
        state.media.delete_many(&public_ids),
        futures::future::join_all(
            dependents
                .iter()
                .map(|dependent| delete_product_cascade(state, dependent)),
        ),
    );

    brand_result?;
    images_result?;
    for result in cascade_results {
        result?;
    }

    Ok(existing)
}

async fn assert_unique_name(
    db: &DatabaseConnection,
    name: &str,
    exclude: Option<Uuid>,
) -> Result<(), ApiError> {
    let mut query = Brand::find().filter(
        Expr::expr(Func::lower(Expr::col(brand::Column::Name))).eq(name.to_lowercase()),
    );
    if let Some(id) = exclude {
        query = query.filter(brand::Column::Id.ne(id));
    }

    match query.one(db).await? {
        Some(_) => Err(ApiError::Conflict("Duplicate brand name".into())),
        None => Ok(()),
    }
}
