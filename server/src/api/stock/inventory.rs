use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewStockEntry, NewStockLogRow, Product};
use crate::schema::{products, stock_entries, stock_log};
use crate::stock::{apply_consumption, load_live_batches};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use larder_core::{plan_consumption, TransactionType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Set a product's absolute on-hand amount after counting the shelf.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InventoryRequest {
    pub product_id: Uuid,
    pub new_amount: Decimal,
    /// Best-before date for a surplus batch, when the count is higher
    /// than the ledger
    pub best_before_date: Option<NaiveDate>,
    pub location_id: Option<Uuid>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InventoryResponse {
    /// Signed difference the correction applied (positive = stock added)
    pub amount_changed: Decimal,
    pub correlation_id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/stock/inventory",
    tag = "stock",
    request_body = InventoryRequest,
    responses(
        (status = 200, description = "Stock corrected to the counted amount", body = InventoryResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn inventory_correction(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<InventoryRequest>,
) -> impl IntoResponse {
    if request.new_amount < Decimal::ZERO {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Counted amount cannot be negative".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let product: Product = match products::table
        .filter(products::id.eq(request.product_id))
        .filter(products::household_id.eq(user.household_id))
        .filter(products::deleted_at.is_null())
        .select(Product::as_select())
        .first(&mut conn)
    {
        Ok(p) => p,
        Err(diesel::NotFound) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Product not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to verify product: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to verify product".to_string(),
                }),
            )
                .into_response();
        }
    };

    let batches = match load_live_batches(&mut conn, user.household_id, product.id) {
        Ok(b) => b,
        Err(e) => {
            tracing::error!("Failed to load stock entries: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to load stock entries".to_string(),
                }),
            )
                .into_response();
        }
    };

    let current: Decimal = batches.iter().map(|b| b.amount).sum();
    if current == request.new_amount {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Stock already matches the counted amount".to_string(),
            }),
        )
            .into_response();
    }

    let correlation_id = Uuid::new_v4();
    let amount_changed = request.new_amount - current;

    let result = conn.transaction(|conn| {
        if amount_changed < Decimal::ZERO {
            // Count came up short: remove the difference, expiring first.
            let plan = plan_consumption(&batches, -amount_changed);
            apply_consumption(
                conn,
                user.household_id,
                &batches,
                &plan,
                correlation_id,
                TransactionType::InventoryCorrection,
            )?;
        } else {
            // Count found surplus: add it as a fresh batch.
            let today = Utc::now().date_naive();
            let entry_id: Uuid = diesel::insert_into(stock_entries::table)
                .values(NewStockEntry {
                    household_id: user.household_id,
                    product_id: product.id,
                    amount: amount_changed,
                    best_before_date: request.best_before_date,
                    purchased_on: today,
                    opened_on: None,
                    price: request.price,
                    location_id: request.location_id.or(product.location_id),
                })
                .returning(stock_entries::id)
                .get_result(conn)?;

            diesel::insert_into(stock_log::table)
                .values(NewStockLogRow {
                    household_id: user.household_id,
                    product_id: product.id,
                    entry_id,
                    amount: amount_changed,
                    transaction_type: TransactionType::InventoryCorrection.as_str(),
                    best_before_date: request.best_before_date,
                    purchased_on: today,
                    opened_on: None,
                    price: request.price,
                    location_id: request.location_id.or(product.location_id),
                    correlation_id,
                })
                .execute(conn)?;
        }

        Ok::<_, diesel::result::Error>(())
    });

    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(InventoryResponse {
                amount_changed,
                correlation_id,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to apply inventory correction: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to apply inventory correction".to_string(),
                }),
            )
                .into_response()
        }
    }
}
