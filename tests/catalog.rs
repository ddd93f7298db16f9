mod common;

use uuid::Uuid;

use common::{insert_user, line_item, png, seed_brand, seed_product, setup};
use hardware_mart::entities::brand::Variant;
use hardware_mart::entities::comment::CommentUser;
use hardware_mart::entities::product::Entity as Product;
use hardware_mart::entities::transaction::Entity as Transaction;
use hardware_mart::entities::user::Role;
use hardware_mart::error::ApiError;
use hardware_mart::services::brand::{self, CreateBrandInput};
use hardware_mart::services::comment::{self, CreateCommentInput};
use hardware_mart::services::product::{self, CreateProductInput, UpdateProductInput};
use hardware_mart::services::transaction::{self, CreateTransactionInput};
use sea_orm::EntityTrait;

#[tokio::test]
async fn created_product_is_retrievable_with_all_images() {
    let ctx = setup().await;
    let brand = seed_brand(&ctx, "Makita").await;

    let created = product::create_product(
        &ctx.state,
        CreateProductInput {
            name: "Cordless Drill".into(),
            brand_id: brand.id,
            kind: hardware_mart::entities::product::ProductKind::PowerTools,
            price: 149.0,
            stock: 5,
        },
        vec![png("front.png"), png("side.png"), png("back.png")],
    )
    .await
    .expect("Failed to create product");

    let fetched = product::get_product(&ctx.state.db, &created.id.to_string())
        .await
        .expect("Failed to fetch product");
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.images.len(), 3);
    assert_eq!(fetched.stock, 5);
}

#[tokio::test]
async fn product_creation_without_images_is_rejected() {
    let ctx = setup().await;
    let brand = seed_brand(&ctx, "Bosch").await;

    let result = product::create_product(
        &ctx.state,
        CreateProductInput {
            name: "Imageless".into(),
            brand_id: brand.id,
            kind: hardware_mart::entities::product::ProductKind::HandTools,
            price: 10.0,
            stock: 1,
        },
        vec![],
    )
    .await;

    match result {
        Err(ApiError::InvalidInput(message)) => {
            assert_eq!(message, "At least one image is required")
        }
        other => panic!("Expected InvalidInput, got {:?}", other.map(|m| m.id)),
    }
}

#[tokio::test]
async fn media_host_failure_surfaces_upstream_and_persists_nothing() {
    let ctx = setup().await;
    let brand = seed_brand(&ctx, "Hikoki").await;
    ctx.media
        .fail_uploads
        .store(true, std::sync::atomic::Ordering::Relaxed);

    let result = product::create_product(
        &ctx.state,
        CreateProductInput {
            name: "Demolition Hammer".into(),
            brand_id: brand.id,
            kind: hardware_mart::entities::product::ProductKind::PowerTools,
            price: 399.0,
            stock: 2,
        },
        vec![png("hammer.png")],
    )
    .await;
    assert!(matches!(result, Err(ApiError::Upstream(_))));

    let products = Product::find()
        .all(&ctx.state.db)
        .await
        .expect("Failed to list products");
    assert!(products.is_empty());
}

#[tokio::test]
async fn duplicate_product_name_conflicts_case_insensitively() {
    let ctx = setup().await;
    let brand = seed_brand(&ctx, "Stanley").await;
    seed_product(&ctx, "Claw Hammer", brand.id, 3).await;

    let result = product::create_product(
        &ctx.state,
        CreateProductInput {
            name: "CLAW HAMMER".into(),
            brand_id: brand.id,
            kind: hardware_mart::entities::product::ProductKind::HandTools,
            price: 15.0,
            stock: 2,
        },
        vec![png("hammer.png")],
    )
    .await;

    assert!(matches!(result, Err(ApiError::Conflict(_))));
}

#[tokio::test]
async fn duplicate_brand_name_conflicts_case_insensitively() {
    let ctx = setup().await;
    seed_brand(&ctx, "DeWalt").await;

    let result = brand::create_brand(
        &ctx.state,
        CreateBrandInput {
            name: "dewalt".into(),
            variant: Some(Variant::International),
        },
        vec![png("logo.png")],
    )
    .await;

    assert!(matches!(result, Err(ApiError::Conflict(_))));
}

#[tokio::test]
async fn malformed_ids_are_rejected_before_lookup() {
    let ctx = setup().await;

    assert!(matches!(
        product::get_product(&ctx.state.db, "not-a-uuid").await,
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        brand::get_brand(&ctx.state.db, "42").await,
        Err(ApiError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let ctx = setup().await;
    let id = Uuid::new_v4().to_string();

    assert!(matches!(
        product::get_product(&ctx.state.db, &id).await,
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        brand::get_brand(&ctx.state.db, &id).await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn empty_product_list_is_not_found() {
    let ctx = setup().await;

    assert!(matches!(
        product::list_products(&ctx.state.db).await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn new_files_replace_the_image_set_and_delete_old_assets() {
    let ctx = setup().await;
    let brand = seed_brand(&ctx, "Hitachi").await;
    let created = seed_product(&ctx, "Circular Saw", brand.id, 4).await;
    let old_ids = created.images.public_ids();

    let updated = product::update_product(
        &ctx.state,
        &created.id.to_string(),
        UpdateProductInput {
            price: Some(199.0),
            ..Default::default()
        },
        vec![png("new-a.png"), png("new-b.png")],
    )
    .await
    .expect("Failed to update product");

    assert_eq!(updated.images.len(), 2);
    assert_eq!(updated.price, 199.0);
    let deleted = ctx.media.deleted.lock().expect("deleted lock").clone();
    for id in old_ids {
        assert!(deleted.contains(&id), "old asset {} was not deleted", id);
    }
}

#[tokio::test]
async fn update_without_files_keeps_existing_images() {
    let ctx = setup().await;
    let brand = seed_brand(&ctx, "Ryobi").await;
    let created = seed_product(&ctx, "Angle Grinder", brand.id, 2).await;

    let updated = product::update_product(
        &ctx.state,
        &created.id.to_string(),
        UpdateProductInput {
            name: Some("Angle Grinder Pro".into()),
            ..Default::default()
        },
        vec![],
    )
    .await
    .expect("Failed to update product");

    assert_eq!(updated.images, created.images);
    assert_eq!(updated.name, "Angle Grinder Pro");
    assert!(ctx.media.deleted.lock().expect("deleted lock").is_empty());
}

#[tokio::test]
async fn deleting_a_brand_cascades_to_products_and_transactions() {
    let ctx = setup().await;
    let customer = insert_user(&ctx.state.db, "casey", "casey@example.com", Role::Customer).await;
    let brand = seed_brand(&ctx, "Irwin").await;
    let first = seed_product(&ctx, "Chisel Set", brand.id, 10).await;
    let second = seed_product(&ctx, "Clamp", brand.id, 10).await;

    transaction::create_transaction(
        &ctx.state,
        CreateTransactionInput {
            user: customer.id,
            status: None,
            date_ordered: None,
            payment: None,
            shipping: None,
            order_items: vec![line_item(&first, 1)],
            items_price: None,
            shipping_price: None,
            total_price: Some(25.0),
        },
    )
    .await
    .expect("Failed to create transaction");

    brand::delete_brand(&ctx.state, &brand.id.to_string())
        .await
        .expect("Failed to delete brand");

    let products = Product::find()
        .all(&ctx.state.db)
        .await
        .expect("Failed to list products");
    assert!(products.is_empty());

    let transactions = Transaction::find()
        .all(&ctx.state.db)
        .await
        .expect("Failed to list transactions");
    assert!(transactions.is_empty());

    // Both products' assets and the brand's own assets are gone.
    let deleted = ctx.media.deleted.lock().expect("deleted lock").clone();
    for id in brand
        .images
        .public_ids()
        .into_iter()
        .chain(first.images.public_ids())
        .chain(second.images.public_ids())
    {
        assert!(deleted.contains(&id), "asset {} was not deleted", id);
    }
}

#[tokio::test]
async fn wishlist_add_rejects_duplicates() {
    let ctx = setup().await;
    let customer = insert_user(&ctx.state.db, "dana", "dana@example.com", Role::Customer).await;
    let brand = seed_brand(&ctx, "Wera").await;
    let created = seed_product(&ctx, "Screwdriver", brand.id, 8).await;

    product::add_to_wishlist(
        &ctx.state.db,
        &created.id.to_string(),
        &customer.id.to_string(),
    )
    .await
    .expect("Failed to add to wishlist");

    let second = product::add_to_wishlist(
        &ctx.state.db,
        &created.id.to_string(),
        &customer.id.to_string(),
    )
    .await;

    match second {
        Err(ApiError::Conflict(message)) => {
            assert_eq!(message, "User already exists in the wishlist")
        }
        other => panic!("Expected Conflict, got {:?}", other.map(|m| m.id)),
    }
}

#[tokio::test]
async fn wishlist_remove_of_non_member_is_not_found() {
    let ctx = setup().await;
    let customer = insert_user(&ctx.state.db, "eli", "eli@example.com", Role::Customer).await;
    let brand = seed_brand(&ctx, "Knipex").await;
    let created = seed_product(&ctx, "Pliers", brand.id, 8).await;

    let result = product::remove_from_wishlist(
        &ctx.state.db,
        &created.id.to_string(),
        &customer.id.to_string(),
    )
    .await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn profane_comments_are_rejected() {
    let ctx = setup().await;
    let customer = insert_user(&ctx.state.db, "finn", "finn@example.com", Role::Customer).await;
    let brand = seed_brand(&ctx, "Festool").await;
    let created = seed_product(&ctx, "Sander", brand.id, 8).await;

    // "gubbins" is on the custom blocklist configured in the test context.
    let result = comment::create_comment(
        &ctx.state,
        CreateCommentInput {
            product: created.id,
            transaction: None,
            ratings: 1,
            text: "utter gubbins, do not buy".into(),
            user: CommentUser {
                id: customer.id,
                username: customer.username.clone(),
            },
        },
    )
    .await;

    match result {
        Err(ApiError::InvalidInput(message)) => {
            assert_eq!(message, "Comments cannot contain profanity.")
        }
        other => panic!("Expected InvalidInput, got {:?}", other.map(|m| m.id)),
    }
}

#[tokio::test]
async fn comment_ratings_must_be_within_range() {
    let ctx = setup().await;
    let customer = insert_user(&ctx.state.db, "gus", "gus@example.com", Role::Customer).await;
    let brand = seed_brand(&ctx, "Metabo").await;
    let created = seed_product(&ctx, "Router", brand.id, 8).await;

    let result = comment::create_comment(
        &ctx.state,
        CreateCommentInput {
            product: created.id,
            transaction: None,
            ratings: 6,
            text: "great".into(),
            user: CommentUser {
                id: customer.id,
                username: customer.username.clone(),
            },
        },
    )
    .await;

    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}
