use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::entities::image::ImageSet;
use crate::entities::product::{self, Entity as Product, ProductKind, Wishlist, WishlistEntry};
use crate::entities::transaction::{self, Entity as Transaction};
use crate::error::ApiError;
use crate::media::UploadFile;
use crate::services::{parse_id, upload_all};
use crate::state::AppState;

#[derive(Debug, Validate)]
pub struct CreateProductInput {
    #[validate(length(
        min = 1,
        max = 30,
        message = "The product name cannot exceed 30 characters"
    ))]
    pub name: String,
    pub brand_id: Uuid,
    pub kind: ProductKind,
    pub price: f64,
    #[validate(range(min = 1, message = "Stock must be at least 1"))]
    pub stock: i32,
}

#[derive(Debug, Default, Validate)]
pub struct UpdateProductInput {
    #[validate(length(
        min = 1,
        max = 30,
        message = "The product name cannot exceed 30 characters"
    ))]
    pub name: Option<String>,
    pub brand_id: Option<Uuid>,
    pub kind: Option<ProductKind>,
    pub price: Option<f64>,
    #[validate(range(min = 1, message = "Stock must be at least 1"))]
    pub stock: Option<i32>,
}

pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>, ApiError> {
    let products = Product::find()
        .order_by_desc(product::Column::CreatedAt)
        .all(db)
        .await?;

    if products.is_empty() {
        return Err(ApiError::NotFound("No products found".into()));
    }
    Ok(products)
}

pub async fn get_product(db: &DatabaseConnection, id: &str) -> Result<product::Model, ApiError> {
    let id = parse_id("product", id)?;
    Product::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found with ID: {}", id)))
}

pub async fn create_product(
    state: &AppState,
    input: CreateProductInput,
    files: Vec<UploadFile>,
) -> Result<product::Model, ApiError> {
    input.validate()?;
    assert_unique_name(&state.db, &input.name, None).await?;

    let images = upload_all(state, &files).await?;
    if images.is_empty() {
        return Err(ApiError::InvalidInput(
            "At least one image is required".into(),
        ));
    }

    let new_product = product::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        brand_id: Set(input.brand_id),
        kind: Set(input.kind),
        price: Set(input.price),
        stock: Set(input.stock),
        images: Set(ImageSet(images)),
        wishlist: Set(Wishlist::default()),
        created_at: Set(Utc::now()),
    };

    Ok(new_product.insert(&state.db).await?)
}

pub async fn update_product(
    state: &AppState,
    id: &str,
    input: UpdateProductInput,
    files: Vec<UploadFile>,
) -> Result<product::Model, ApiError> {
    let id = parse_id("product", id)?;
    input.validate()?;

    let existing = Product::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found with ID: {}", id)))?;

    if let Some(name) = &input.name {
        assert_unique_name(&state.db, name, Some(id)).await?;
    }

    let old_images = existing.images.clone();
    let mut active: product::ActiveModel = existing.into();

    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(brand_id) = input.brand_id {
        active.brand_id = Set(brand_id);
    }
    if let Some(kind) = input.kind {
        active.kind = Set(kind);
    }
    if let Some(price) = input.price {
        active.price = Set(price);
    }
    if let Some(stock) = input.stock {
        active.stock = Set(stock);
    }
    // New files fully replace the image set, not merge into it.
    if !files.is_empty() {
        let images = upload_all(state, &files).await?;
        active.images = Set(ImageSet(images));
        state.media.delete_many(&old_images.public_ids()).await?;
    }

    Ok(active.update(&state.db).await?)
}

pub async fn delete_product(state: &AppState, id: &str) -> Result<product::Model, ApiError> {
    let id = parse_id("product", id)?;

    let existing = Product::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found with ID: {}", id)))?;

    delete_product_cascade(state, &existing).await?;
    Ok(existing)
}

/// Deletes the product row, its media assets and every transaction whose
/// order items reference it — whole transactions, not single line items.
/// Legs run concurrently with no compensation.
pub(crate) async fn delete_product_cascade(
    state: &AppState,
    existing: &product::Model,
) -> Result<(), ApiError> {
    let dependent_ids = transactions_referencing(&state.db, existing.id).await?;

    let public_ids = existing.images.public_ids();
    let (product_result, images_result, transactions_result) = futures::join!(
        Product::delete_by_id(existing.id).exec(&state.db),
        state.media.delete_many(&public_ids),
        delete_transactions(&state.db, dependent_ids),
    );

    product_result?;
    images_result?;
    transactions_result?;
    Ok(())
}

pub async fn add_to_wishlist(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
) -> Result<product::Model, ApiError> {
    let id = parse_id("product", id)?;
    let user_id = parse_id("user", user_id)?;

    let existing = Product::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;

    if existing.wishlist.contains(user_id) {
        return Err(ApiError::Conflict(
            "User already exists in the wishlist".into(),
        ));
    }

    let mut wishlist = existing.wishlist.clone();
    wishlist.0.push(WishlistEntry { user: user_id });

    let mut active: product::ActiveModel = existing.into();
    active.wishlist = Set(wishlist);
    Ok(active.update(db).await?)
}

pub async fn remove_from_wishlist(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
) -> Result<product::Model, ApiError> {
    let id = parse_id("product", id)?;
    let user_id = parse_id("user", user_id)?;

    let existing = Product::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;

    if !existing.wishlist.contains(user_id) {
        return Err(ApiError::NotFound(format!(
            "Wishlist entry not found for user {}",
            user_id
        )));
    }

    let mut wishlist = existing.wishlist.clone();
    wishlist.0.retain(|entry| entry.user != user_id);

    let mut active: product::ActiveModel = existing.into();
    active.wishlist = Set(wishlist);
    Ok(active.update(db).await?)
}

/// Order items are a denormalized snapshot, so dependent transactions are
/// found by scanning the line items rather than through a foreign key.
async fn transactions_referencing(
    db: &DatabaseConnection,
    product_id: Uuid,
) -> Result<Vec<Uuid>, ApiError> {
    let transactions = Transaction::find().all(db).await?;
    Ok(transactions
        .into_iter()
        .filter(|record| record.order_items.references(product_id))
        .map(|record| record.id)
        .collect())
}

async fn delete_transactions(db: &DatabaseConnection, ids: Vec<Uuid>) -> Result<(), ApiError> {
    if ids.is_empty() {
        return Ok(());
    }
    Transaction::delete_many()
        .filter(transaction::Column::Id.is_in(ids))
        .exec(db)
        .await?;
    Ok(())
}

async fn assert_unique_name(
    db: &DatabaseConnection,
    name: &str,
    exclude: Option<Uuid>,
) -> Result<(), ApiError> {
    let mut query = Product::find().filter(
        Expr::expr(Func::lower(Expr::col(product::Column::Name))).eq(name.to_lowercase()),
    );
    if let Some(id) = exclude {
        query = query.filter(product::Column::Id.ne(id));
    }

    match query.one(db).await? {
        Some(_) => Err(ApiError::Conflict("Duplicate product name".into())),
        None => Ok(()),
    }
}
