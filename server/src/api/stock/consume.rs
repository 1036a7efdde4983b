use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::products;
use crate::stock::{apply_consumption, load_live_batches, spawn_below_min_stock_check};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use larder_core::{plan_consumption, TransactionType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConsumeRequest {
    pub product_id: Uuid,
    pub amount: Decimal,
    /// Record the removal as spoilage instead of consumption
    #[serde(default)]
    pub spoiled: bool,
    /// Accept a plan that consumes less than requested when stock is short
    #[serde(default)]
    pub allow_partial: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConsumeResponse {
    /// Actually consumed; equals the request unless `allow_partial` let a
    /// short plan through
    pub consumed: Decimal,
    /// Undo handle for this consumption
    pub correlation_id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/stock/consume",
    tag = "stock",
    request_body = ConsumeRequest,
    responses(
        (status = 200, description = "Stock consumed", body = ConsumeResponse),
        (status = 400, description = "Invalid request or not enough stock", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn consume(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<ConsumeRequest>,
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

    let product_exists = match products::table
        .filter(products::id.eq(request.product_id))
        .filter(products::household_id.eq(user.household_id))
        .filter(products::deleted_at.is_null())
        .select(products::id)
        .first::<Uuid>(&mut conn)
        .optional()
    {
        Ok(record) => record.is_some(),
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

    if !product_exists {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Product not found".to_string(),
            }),
        )
            .into_response();
    }

    let batches = match load_live_batches(&mut conn, user.household_id, request.product_id) {
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

    let plan = plan_consumption(&batches, request.amount);

    if plan.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Product is not in stock".to_string(),
            }),
        )
            .into_response();
    }

    if plan.total_consumed < request.amount && !request.allow_partial {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!(
                    "Not enough stock: requested {}, available {}",
                    request.amount, plan.total_consumed
                ),
            }),
        )
            .into_response();
    }

    let transaction_type = if request.spoiled {
        TransactionType::Spoiled
    } else {
        TransactionType::Consume
    };
    let correlation_id = Uuid::new_v4();

    let result = conn.transaction(|conn| {
        apply_consumption(
            conn,
            user.household_id,
            &batches,
            &plan,
            correlation_id,
            transaction_type,
        )
    });

    match result {
        Ok(()) => {
            spawn_below_min_stock_check(pool.clone(), user.household_id);
            (
                StatusCode::OK,
                Json(ConsumeResponse {
                    consumed: plan.total_consumed,
                    correlation_id,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to consume stock: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to consume stock".to_string(),
                }),
            )
                .into_response()
        }
    }
}
