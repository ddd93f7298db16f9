use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::comment::{self, CommentUser, Entity as Comment};
use crate::entities::product::Entity as Product;
use crate::entities::transaction::{Entity as Transaction, Payment, Status};
use crate::entities::user::Entity as User;
use crate::error::ApiError;
use crate::services::parse_id;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    pub product: Uuid,
    pub transaction: Option<Uuid>,
    #[validate(range(min = 1, max = 5, message = "Ratings must be between 1 and 5"))]
    pub ratings: i32,
    #[validate(length(min = 1, message = "Please enter a text"))]
    pub text: String,
    pub user: CommentUser,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCommentInput {
    #[validate(range(min = 1, max = 5, message = "Ratings must be between 1 and 5"))]
    pub ratings: Option<i32>,
    #[validate(length(min = 1, message = "Please enter a text"))]
    pub text: Option<String>,
}

/// Comment plus display-only context joined from the related transaction,
/// user and product.
#[derive(Debug, Serialize)]
pub struct CommentDetails {
    #[serde(flatten)]
    pub comment: comment::Model,
    pub product_name: Option<String>,
    pub transaction: Option<TransactionSummary>,
}

#[derive(Debug, Serialize)]
pub struct TransactionSummary {
    pub status: Status,
    pub payment: Option<Payment>,
    pub user_name: Option<String>,
}

pub async fn list_comments(db: &DatabaseConnection) -> Result<Vec<comment::Model>, ApiError> {
    let comments = Comment::find()
        .order_by_desc(comment::Column::CreatedAt)
        .all(db)
        .await?;

    if comments.is_empty() {
        return Err(ApiError::NotFound("No comments found".into()));
    }
    Ok(comments)
}

pub async fn get_comment(db: &DatabaseConnection, id: &str) -> Result<CommentDetails, ApiError> {
    let id = parse_id("comment", id)?;

    let comment = Comment::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Comment not found with ID: {}", id)))?;

    let product_name = Product::find_by_id(comment.product_id)
        .one(db)
        .await?
        .map(|record| record.name);

    let transaction = match comment.transaction_id {
        Some(transaction_id) => match Transaction::find_by_id(transaction_id).one(db).await? {
            Some(record) => {
                let user_name = User::find_by_id(record.user_id)
                    .one(db)
                    .await?
                    .map(|user| user.username);
                Some(TransactionSummary {
                    status: record.status,
                    payment: record.payment,
                    user_name,
                })
            }
            None => None,
        },
        None => None,
    };

    Ok(CommentDetails {
        comment,
        product_name,
        transaction,
    })
}

pub async fn create_comment(
    state: &AppState,
    input: CreateCommentInput,
) -> Result<comment::Model, ApiError> {
    input.validate()?;

    if state.profanity.is_profane(&input.text) {
        return Err(ApiError::InvalidInput(
            "Comments cannot contain profanity.".into(),
        ));
    }

    let new_comment = comment::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(input.product),
        transaction_id: Set(input.transaction),
        ratings: Set(input.ratings),
        text: Set(input.text),
        user: Set(input.user),
        created_at: Set(Utc::now()),
    };

    Ok(new_comment.insert(&state.db).await?)
}

pub async fn update_comment(
    state: &AppState,
    id: &str,
    input: UpdateCommentInput,
) -> Result<comment::Model, ApiError> {
    let id = parse_id("comment", id)?;
    input.validate()?;

    let existing = Comment::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Comment not found with ID: {}", id)))?;

    if let Some(text) = &input.text {
        if state.profanity.is_profane(text) {
            return Err(ApiError::InvalidInput(
                "Comments cannot contain profanity.".into(),
            ));
        }
    }

    let mut active: comment::ActiveModel = existing.into();
    if let Some(ratings) = input.ratings {
        active.ratings = Set(ratings);
    }
    if let Some(text) = input.text {
        active.text = Set(text);
    }

    Ok(active.update(&state.db).await?)
}

pub async fn delete_comment(db: &DatabaseConnection, id: &str) -> Result<comment::Model, ApiError> {
    let id = parse_id("comment", id)?;

    let existing = Comment::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Comment not found with ID: {}", id)))?;

    Comment::delete_by_id(id).exec(db).await?;
    Ok(existing)
}
