//! Order lifecycle: creation with best-effort confirmation mail, status
//! updates with stock decrement coupled into the same store transaction,
//! cascading deletion and the sales aggregates.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::comment::{self, Entity as Comment};
use crate::entities::product::{self, Entity as Product};
use crate::entities::transaction::{
    self, Entity as Transaction, OrderItem, OrderItems, Payment, ShippingInfo, Status,
};
use crate::entities::user::Entity as User;
use crate::error::ApiError;
use crate::notifier::{order_completed_email, order_created_email};
use crate::services::parse_id;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransactionInput {
    pub user: Uuid,
    pub status: Option<Status>,
    pub date_ordered: Option<DateTime<Utc>>,
    pub payment: Option<Payment>,
    #[validate(nested)]
    pub shipping: Option<ShippingInfo>,
    pub order_items: Vec<OrderItem>,
    pub items_price: Option<f64>,
    pub shipping_price: Option<f64>,
    pub total_price: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTransactionInput {
    pub status: Option<Status>,
    pub order_items: Option<Vec<OrderItem>>,
    pub payment: Option<Payment>,
    #[validate(nested)]
    pub shipping: Option<ShippingInfo>,
    pub items_price: Option<f64>,
    pub shipping_price: Option<f64>,
    pub total_price: Option<f64>,
    pub delivered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct YearlySales {
    pub year: i32,
    pub total_sales: f64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct MonthlySales {
    pub year: i32,
    pub month: String,
    pub total_amount: f64,
    pub count: u64,
}

pub async fn list_transactions(
    db: &DatabaseConnection,
) -> Result<Vec<transaction::Model>, ApiError> {
    let transactions = Transaction::find()
        .order_by_desc(transaction::Column::CreatedAt)
        .all(db)
        .await?;

    if transactions.is_empty() {
        return Err(ApiError::NotFound("No transactions found".into()));
    }
    Ok(transactions)
}

pub async fn get_transaction(
    db: &DatabaseConnection,
    id: &str,
) -> Result<transaction::Model, ApiError> {
    let id = parse_id("transaction", id)?;
    Transaction::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Transaction not found with ID: {}", id)))
}

/// Persists a new order with the caller's line-item snapshot and totals as
/// submitted — totals are trusted, not recomputed. The confirmation mail is
/// best-effort: a missing user or a notifier failure never aborts creation.
pub async fn create_transaction(
    state: &AppState,
    input: CreateTransactionInput,
) -> Result<transaction::Model, ApiError> {
    input.validate()?;

    let email = match User::find_by_id(input.user).one(&state.db).await {
        Ok(Some(user)) => Some(user.email),
        Ok(None) => None,
        Err(err) => {
            tracing::warn!(error = %err, "User lookup failed during order creation");
            None
        }
    };

    let new_transaction = transaction::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(input.user),
        status: Set(input.status.unwrap_or_default()),
        date_ordered: Set(input.date_ordered.unwrap_or_else(Utc::now)),
        payment: Set(input.payment),
        shipping: Set(input.shipping),
        order_items: Set(OrderItems(input.order_items)),
        items_price: Set(input.items_price.unwrap_or(0.0)),
        shipping_price: Set(input.shipping_price.unwrap_or(0.0)),
        total_price: Set(input.total_price.unwrap_or(0.0)),
        delivered_at: Set(None),
        created_at: Set(Utc::now()),
    };

    let created = new_transaction.insert(&state.db).await?;

    if let Some(email) = email {
        let (subject, html) = order_created_email();
        if let Err(err) = state.notifier.send(&email, subject, &html).await {
            tracing::warn!(error = %err, "Order confirmation email failed");
        }
    }

    Ok(created)
}

/// Applies a merge-patch with a mandatory `status`. Every submitted line item
/// decrements the referenced product's stock inside the same store
/// transaction as the order update, so either all of it commits or none does.
/// There is deliberately no floor: stock can go negative, matching the
/// behavior this service has always had.
///
/// `Pending -> Completed` and `Pending -> Cancelled` are the only transitions;
/// both targets are terminal and a terminal order accepts no further updates,
/// so a decrement or completion mail can never run twice. Completing the
/// order sends exactly one completion mail; any other resulting status sends
/// none.
pub async fn update_transaction(
    state: &AppState,
    id: &str,
    input: UpdateTransactionInput,
) -> Result<transaction::Model, ApiError> {
    let id = parse_id("transaction", id)?;
    input.validate()?;

    let status = input
        .status
        .ok_or_else(|| ApiError::InvalidInput("status is required".into()))?;

    let txn = state.db.begin().await?;

    let existing = Transaction::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Transaction not found with ID: {}", id)))?;

    if existing.status.is_terminal() {
        return Err(ApiError::Conflict(format!(
            "Transaction is already {}",
            existing.status
        )));
    }

    if let Some(items) = &input.order_items {
        for item in items {
            decrement_stock(&txn, item.product_id, item.quantity).await?;
            tracing::debug!(product = %item.product_name, quantity = item.quantity, "Stock updated");
        }
    }

    let mut active: transaction::ActiveModel = existing.into();
    active.status = Set(status);
    if let Some(items) = input.order_items {
        active.order_items = Set(OrderItems(items));
    }
    if let Some(payment) = input.payment {
        active.payment = Set(Some(payment));
    }
    if let Some(shipping) = input.shipping {
        active.shipping = Set(Some(shipping));
    }
    if let Some(items_price) = input.items_price {
        active.items_price = Set(items_price);
    }
    if let Some(shipping_price) = input.shipping_price {
        active.shipping_price = Set(shipping_price);
    }
    if let Some(total_price) = input.total_price {
        active.total_price = Set(total_price);
    }
    if let Some(delivered_at) = input.delivered_at {
        active.delivered_at = Set(Some(delivered_at));
    }

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    if updated.status == Status::Completed {
        match User::find_by_id(updated.user_id).one(&state.db).await {
            Ok(Some(user)) => {
                let (subject, html) = order_completed_email();
                if let Err(err) = state.notifier.send(&user.email, subject, &html).await {
                    tracing::warn!(error = %err, "Completion email failed");
                }
            }
            Ok(None) => {
                tracing::warn!(user_id = %updated.user_id, "No user to notify for completed order")
            }
            Err(err) => tracing::warn!(error = %err, "User lookup failed for completion email"),
        }
    }

    Ok(updated)
}

/// Deletes the order and every comment referencing it, concurrently and
/// without compensation.
pub async fn delete_transaction(
    db: &DatabaseConnection,
    id: &str,
) -> Result<transaction::Model, ApiError> {
    let id = parse_id("transaction", id)?;

    let existing = Transaction::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Transaction not found with ID: {}", id)))?;

    let (transaction_result, comments_result) = futures::join!(
        Transaction::delete_by_id(id).exec(db),
        Comment::delete_many()
            .filter(comment::Column::TransactionId.eq(id))
            .exec(db),
    );
    transaction_result?;
    comments_result?;

    Ok(existing)
}

/// Total sales per calendar year of `date_ordered`, ascending by year.
pub async fn sales_per_year(db: &DatabaseConnection) -> Result<Vec<YearlySales>, ApiError> {
    let transactions = Transaction::find().all(db).await?;

    let mut buckets: BTreeMap<i32, f64> = BTreeMap::new();
    for record in transactions {
        *buckets.entry(record.date_ordered.year()).or_insert(0.0) += record.total_price;
    }

    Ok(buckets
        .into_iter()
        .map(|(year, total_sales)| YearlySales { year, total_sales })
        .collect())
}

/// Sales and order counts bucketed by (year, full month name), ascending by
/// year then month name. The month key is the English month name compared as
/// a string, so "April" sorts before "January" — long-standing reporting
/// behavior that downstream consumers rely on.
pub async fn sales_per_month(db: &DatabaseConnection) -> Result<Vec<MonthlySales>, ApiError> {
    let transactions = Transaction::find().all(db).await?;

    let mut buckets: BTreeMap<(i32, String), (f64, u64)> = BTreeMap::new();
    for record in transactions {
        let key = (
            record.date_ordered.year(),
            record.date_ordered.format("%B").to_string(),
        );
        let bucket = buckets.entry(key).or_insert((0.0, 0));
        bucket.0 += record.total_price;
        bucket.1 += 1;
    }

    Ok(buckets
        .into_iter()
        .map(|((year, month), (total_amount, count))| MonthlySales {
            year,
            month,
            total_amount,
            count,
        })
        .collect())
}

/// Atomic `stock = stock - quantity` against the store; zero rows touched
/// means the line item references a product that no longer exists, which
/// fails (and thereby rolls back) the whole order update.
async fn decrement_stock(
    txn: &DatabaseTransaction,
    product_id: Uuid,
    quantity: i32,
) -> Result<(), ApiError> {
    let result = Product::update_many()
        .col_expr(
            product::Column::Stock,
            Expr::col(product::Column::Stock).sub(quantity),
        )
        .filter(product::Column::Id.eq(product_id))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!(
            "Product not found with ID: {}",
            product_id
        )));
    }
    Ok(())
}
