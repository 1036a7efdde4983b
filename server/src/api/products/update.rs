use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::products;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location_id: Option<Uuid>,
    pub default_best_before_days: Option<i32>,
    pub min_stock_amount: Option<Decimal>,
    pub not_check_stock_fulfillment: Option<bool>,
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 204, description = "Product updated"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProductRequest>,
) -> impl IntoResponse {
    if let Some(min) = request.min_stock_amount {
        if min < Decimal::ZERO {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Minimum stock amount cannot be negative".to_string(),
                }),
            )
                .into_response();
        }
    }

    let mut conn = get_conn!(pool);

    #[derive(AsChangeset)]
    #[diesel(table_name = products)]
    struct ProductChanges<'a> {
        name: Option<&'a str>,
        description: Option<&'a str>,
        location_id: Option<Uuid>,
        default_best_before_days: Option<i32>,
        min_stock_amount: Option<Decimal>,
        not_check_stock_fulfillment: Option<bool>,
        updated_at: chrono::DateTime<Utc>,
    }

    let changes = ProductChanges {
        name: request.name.as_deref(),
        description: request.description.as_deref(),
        location_id: request.location_id,
        default_best_before_days: request.default_best_before_days,
        min_stock_amount: request.min_stock_amount,
        not_check_stock_fulfillment: request.not_check_stock_fulfillment,
        updated_at: Utc::now(),
    };

    let updated = diesel::update(
        products::table
            .filter(products::id.eq(id))
            .filter(products::household_id.eq(user.household_id))
            .filter(products::deleted_at.is_null()),
    )
    .set(changes)
    .execute(&mut conn);

    match updated {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Product not found".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to update product: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update product".to_string(),
                }),
            )
                .into_response()
        }
    }
}
