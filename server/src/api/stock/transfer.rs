use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewStockLogRow, StockEntry};
use crate::schema::{locations, stock_entries, stock_log};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use diesel::prelude::*;
use larder_core::TransactionType;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TransferRequest {
    pub entry_id: Uuid,
    pub to_location_id: Uuid,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransferResponse {
    pub correlation_id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/stock/transfer",
    tag = "stock",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Batch moved to the new location", body = TransferResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Stock entry not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn transfer_entry(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<TransferRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let location_exists = match locations::table
        .filter(locations::id.eq(request.to_location_id))
        .filter(locations::household_id.eq(user.household_id))
        .filter(locations::deleted_at.is_null())
        .select(locations::id)
        .first::<Uuid>(&mut conn)
        .optional()
    {
        Ok(record) => record.is_some(),
        Err(e) => {
            tracing::error!("Failed to verify location: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to verify location".to_string(),
                }),
            )
                .into_response();
        }
    };

    if !location_exists {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Target location not found".to_string(),
            }),
        )
            .into_response();
    }

    let entry: StockEntry = match stock_entries::table
        .filter(stock_entries::id.eq(request.entry_id))
        .filter(stock_entries::household_id.eq(user.household_id))
        .select(StockEntry::as_select())
        .first(&mut conn)
    {
        Ok(e) => e,
        Err(diesel::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Stock entry not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch stock entry: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch stock entry".to_string(),
                }),
            )
                .into_response();
        }
    };

    if entry.location_id == Some(request.to_location_id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Batch is already at that location".to_string(),
            }),
        )
            .into_response();
    }

    let correlation_id = Uuid::new_v4();

    let result = conn.transaction(|conn| {
        diesel::update(stock_entries::table.filter(stock_entries::id.eq(entry.id)))
            .set((
                stock_entries::location_id.eq(request.to_location_id),
                stock_entries::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;

        // The journal row snapshots the pre-transfer location.
        diesel::insert_into(stock_log::table)
            .values(NewStockLogRow {
                household_id: user.household_id,
                product_id: entry.product_id,
                entry_id: entry.id,
                amount: entry.amount,
                transaction_type: TransactionType::Transfer.as_str(),
                best_before_date: entry.best_before_date,
                purchased_on: entry.purchased_on,
                opened_on: entry.opened_on,
                price: entry.price,
                location_id: entry.location_id,
                correlation_id,
            })
            .execute(conn)?;

        Ok::<_, diesel::result::Error>(())
    });

    match result {
        Ok(()) => (StatusCode::OK, Json(TransferResponse { correlation_id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to transfer stock entry: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to transfer stock entry".to_string(),
                }),
            )
                .into_response()
        }
    }
}
