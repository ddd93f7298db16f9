pub mod brand;
pub mod comment;
pub mod image;
pub mod product;
pub mod transaction;
pub mod user;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Schema, Set};
use uuid::Uuid;

use crate::entities::{
    brand::Entity as Brand, comment::Entity as Comment, product::Entity as Product,
    transaction::Entity as Transaction, user::Entity as User,
};

pub async fn setup_schema(db: &DatabaseConnection) {
    let schema = Schema::new(db.get_database_backend());
    let create_brand_table = schema.create_table_from_entity(Brand);
    let create_product_table = schema.create_table_from_entity(Product);
    let create_comment_table = schema.create_table_from_entity(Comment);
    let create_transaction_table = schema.create_table_from_entity(Transaction);
    let create_user_table = schema.create_table_from_entity(User);

    db.execute(db.get_database_backend().build(&create_brand_table))
        .await
        .expect("Failed to create brand schema");
    db.execute(db.get_database_backend().build(&create_product_table))
        .await
        .expect("Failed to create product schema");
    db.execute(db.get_database_backend().build(&create_comment_table))
        .await
        .expect("Failed to create comment schema");
    db.execute(db.get_database_backend().build(&create_transaction_table))
        .await
        .expect("Failed to create transaction schema");
    db.execute(db.get_database_backend().build(&create_user_table))
        .await
        .expect("Failed to create user schema");
}

/// Seeds a first admin account so the role-gated routes are reachable on a
/// fresh database. Does nothing when any user already exists.
pub async fn seed_admin(db: &DatabaseConnection, username: &str, email: &str, password: &str) {
    let existing = User::find()
        .count(db)
        .await
        .expect("Failed to count users during seeding");
    if existing > 0 {
        return;
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .expect("Failed to hash seed password")
        .to_string();

    let admin = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_owned()),
        email: Set(email.to_owned()),
        password: Set(password_hash),
        role: Set(user::Role::Admin),
        created_at: Set(Utc::now()),
    };

    User::insert(admin)
        .exec(db)
        .await
        .expect("Failed to seed admin user");
    tracing::info!(username, "Seeded initial admin account");
}
