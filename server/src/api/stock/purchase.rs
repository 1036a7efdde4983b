use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewStockEntry, NewStockLogRow, Product};
use crate::schema::{products, stock_entries, stock_log};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{Duration, NaiveDate, Utc};
use diesel::prelude::*;
use larder_core::TransactionType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PurchaseRequest {
    pub product_id: Uuid,
    pub amount: Decimal,
    /// Defaults to today plus the product's shelf-life offset; null with a
    /// zero offset means the batch never expires
    pub best_before_date: Option<NaiveDate>,
    /// Defaults to today
    pub purchased_on: Option<NaiveDate>,
    pub price: Option<Decimal>,
    /// Defaults to the product's default location
    pub location_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PurchaseResponse {
    pub entry_id: Uuid,
    pub correlation_id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/stock/purchase",
    tag = "stock",
    request_body = PurchaseRequest,
    responses(
        (status = 201, description = "Batch added to stock", body = PurchaseResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn purchase(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<PurchaseRequest>,
) -> impl IntoResponse {
    if request.amount <= Decimal::ZERO {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Amount must be positive".to_string(),
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

    let today = Utc::now().date_naive();
    let purchased_on = request.purchased_on.unwrap_or(today);
    let best_before_date = request.best_before_date.or_else(|| {
        (product.default_best_before_days > 0)
            .then(|| today + Duration::days(product.default_best_before_days as i64))
    });
    let location_id = request.location_id.or(product.location_id);
    let correlation_id = Uuid::new_v4();

    let result = conn.transaction(|conn| {
        let entry_id: Uuid = diesel::insert_into(stock_entries::table)
            .values(NewStockEntry {
                household_id: user.household_id,
                product_id: product.id,
                amount: request.amount,
                best_before_date,
                purchased_on,
                opened_on: None,
                price: request.price,
                location_id,
            })
            .returning(stock_entries::id)
            .get_result(conn)?;

        diesel::insert_into(stock_log::table)
            .values(NewStockLogRow {
                household_id: user.household_id,
                product_id: product.id,
                entry_id,
                amount: request.amount,
                transaction_type: TransactionType::Purchase.as_str(),
                best_before_date,
                purchased_on,
                opened_on: None,
                price: request.price,
                location_id,
                correlation_id,
            })
            .execute(conn)?;

        Ok::<_, diesel::result::Error>(entry_id)
    });

    match result {
        Ok(entry_id) => (
            StatusCode::CREATED,
            Json(PurchaseResponse {
                entry_id,
                correlation_id,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to add stock: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to add stock".to_string(),
                }),
            )
                .into_response()
        }
    }
}
