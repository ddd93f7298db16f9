use axum::{
    extract::{Extension, Path},
    response::Response,
    routing::{delete, get, patch, post},
    Json,
};
use std::sync::Arc;

use crate::api::{created_response, ok_response, RouteDef, ADMIN, ANY_ROLE, CUSTOMER, STAFF};
use crate::error::ApiError;
use crate::services::transaction::{
    self as transaction_service, CreateTransactionInput, UpdateTransactionInput,
};
use crate::state::AppState;

//ROUTING TABLE
pub fn routes() -> Vec<RouteDef> {
    vec![
        RouteDef::gated("/transactions", get(list_transactions), ANY_ROLE),
        RouteDef::gated("/transactions", post(create_transaction), CUSTOMER),
        RouteDef::gated("/transaction/:id", get(get_transaction), ANY_ROLE),
        RouteDef::gated("/transaction/edit/:id", patch(update_transaction), STAFF),
        RouteDef::gated("/transaction/:id", delete(delete_transaction), ADMIN),
        RouteDef::gated("/transactions/year", get(sales_per_year), STAFF),
        RouteDef::gated("/transactions/month", get(sales_per_month), STAFF),
    ]
}

//ROUTES
async fn list_transactions(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let transactions = transaction_service::list_transactions(&state.db).await?;

    let ids = transactions
        .iter()
        .map(|transaction| transaction.id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Ok(ok_response(
        format!("Transactions with IDs {} retrieved", ids),
        transactions,
    ))
}

async fn get_transaction(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let transaction = transaction_service::get_transaction(&state.db, &id).await?;
    Ok(ok_response(
        format!(
            "Transaction with ID {} is {}",
            transaction.id, transaction.status
        ),
        transaction,
    ))
}

async fn create_transaction(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CreateTransactionInput>,
) -> Result<Response, ApiError> {
    let transaction = transaction_service::create_transaction(&state, payload).await?;
    Ok(created_response(
        format!("Transaction with ID {} is created", transaction.id),
        transaction,
    ))
}

async fn update_transaction(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<UpdateTransactionInput>,
) -> Result<Response, ApiError> {
    let transaction = transaction_service::update_transaction(&state, &id, payload).await?;
    Ok(ok_response(
        format!(
            "Transaction on {} with ID {} is updated",
            transaction.date_ordered, transaction.id
        ),
        transaction,
    ))
}

async fn delete_transaction(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let transaction = transaction_service::delete_transaction(&state.db, &id).await?;
    Ok(ok_response(
        format!(
            "Transaction on {} with ID {} is deleted",
            transaction.date_ordered, transaction.id
        ),
        transaction,
    ))
}

async fn sales_per_year(Extension(state): Extension<Arc<AppState>>) -> Result<Response, ApiError> {
    let sales = transaction_service::sales_per_year(&state.db).await?;
    Ok(ok_response("Sales per year retrieved".into(), sales))
}

async fn sales_per_month(Extension(state): Extension<Arc<AppState>>) -> Result<Response, ApiError> {
    let sales = transaction_service::sales_per_month(&state.db).await?;
    Ok(ok_response("Sales per month retrieved".into(), sales))
}
