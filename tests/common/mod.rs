#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use uuid::Uuid;

use hardware_mart::entities::image::ImageAsset;
use hardware_mart::entities::product::{self, ProductKind};
use hardware_mart::entities::transaction::OrderItem;
use hardware_mart::entities::user::{self, Role};
use hardware_mart::entities::{brand, setup_schema};
use hardware_mart::error::ApiError;
use hardware_mart::media::{MediaHost, UploadFile};
use hardware_mart::notifier::Notifier;
use hardware_mart::profanity::ProfanityFilter;
use hardware_mart::services::brand::CreateBrandInput;
use hardware_mart::services::product::CreateProductInput;
use hardware_mart::state::AppState;

/// Media host fake that mints asset ids locally and records every call.
#[derive(Default)]
pub struct FakeMediaHost {
    pub uploads: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
    pub fail_uploads: AtomicBool,
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    async fn upload(&self, file: &UploadFile) -> Result<ImageAsset, ApiError> {
        if self.fail_uploads.load(Ordering::Relaxed) {
            return Err(ApiError::Upstream("media host down".into()));
        }
        let public_id = Uuid::new_v4().to_string();
        self.uploads
            .lock()
            .expect("uploads lock")
            .push(file.original_name.clone());
        Ok(ImageAsset {
            public_id: public_id.clone(),
            url: format!("https://media.test/{}", public_id),
            original_name: file.original_name.clone(),
        })
    }

    async fn delete_many(&self, public_ids: &[String]) -> Result<(), ApiError> {
        self.deleted
            .lock()
            .expect("deleted lock")
            .extend(public_ids.iter().cloned());
        Ok(())
    }
}

/// Notifier fake recording (recipient, subject) pairs.
#[derive(Default)]
pub struct FakeNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail_sends: AtomicBool,
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, to: &str, subject: &str, _html: &str) -> Result<(), ApiError> {
        if self.fail_sends.load(Ordering::Relaxed) {
            return Err(ApiError::Upstream("mail service down".into()));
        }
        self.sent
            .lock()
            .expect("sent lock")
            .push((to.to_string(), subject.to_string()));
        Ok(())
    }
}

pub struct TestContext {
    pub state: Arc<AppState>,
    pub media: Arc<FakeMediaHost>,
    pub notifier: Arc<FakeNotifier>,
}

pub async fn setup() -> TestContext {
    let db: DatabaseConnection = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory store");
    setup_schema(&db).await;

    let media = Arc::new(FakeMediaHost::default());
    let notifier = Arc::new(FakeNotifier::default());
    let state = Arc::new(AppState {
        db,
        media: media.clone(),
        notifier: notifier.clone(),
        profanity: ProfanityFilter::new(&["gubbins".to_string()]),
        jwt_secret: "test-secret".into(),
    });

    TestContext {
        state,
        media,
        notifier,
    }
}

pub fn png(name: &str) -> UploadFile {
    UploadFile {
        original_name: name.to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    }
}

pub async fn insert_user(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    role: Role,
) -> user::Model {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password("Secret15".as_bytes(), &salt)
        .expect("Failed to hash password")
        .to_string();

    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password: Set(password_hash),
        role: Set(role),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert user")
}

pub async fn seed_brand(ctx: &TestContext, name: &str) -> brand::Model {
    hardware_mart::services::brand::create_brand(
        &ctx.state,
        CreateBrandInput {
            name: name.to_string(),
            variant: None,
        },
        vec![png("logo.png")],
    )
    .await
    .expect("Failed to create brand")
}

pub async fn seed_product(
    ctx: &TestContext,
    name: &str,
    brand_id: Uuid,
    stock: i32,
) -> product::Model {
    hardware_mart::services::product::create_product(
        &ctx.state,
        CreateProductInput {
            name: name.to_string(),
            brand_id,
            kind: ProductKind::HandTools,
            price: 99.5,
            stock,
        },
        vec![png("tool.png")],
    )
    .await
    .expect("Failed to create product")
}

pub fn line_item(product: &product::Model, quantity: i32) -> OrderItem {
    OrderItem {
        product_name: product.name.clone(),
        brand_id: product.brand_id,
        product_kind: "Hand Tools".to_string(),
        quantity,
        images: product.images.urls(),
        price: product.price,
        product_id: product.id,
    }
}
